//! Error taxonomy for the client.
//!
//! Each component owns its error type; [`ClientError`] is the umbrella
//! returned by one-shot queries. Scalar parse failures during binding are
//! not errors at all (see [`crate::binding`]).

use thiserror::Error;

pub use crate::binding::BindError;
pub use crate::snapshot::DecodeError;
pub use crate::transport::TransportError;

/// Errors surfaced by [`crate::Client`] operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The base URL could not be used to build service endpoints.
    #[error("invalid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The service could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered with a status other than 200.
    #[error("request error, status: {0}")]
    Request(u16),

    /// The response body was not a valid snapshot.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The snapshot could not be bound into the target.
    #[error(transparent)]
    Bind(#[from] BindError),
}

impl ClientError {
    /// Metric label describing which stage of a poll failed.
    pub(crate) fn outcome(&self) -> &'static str {
        match self {
            ClientError::InvalidUrl { .. } => "invalid_url",
            ClientError::Transport(_) => "transport_error",
            ClientError::Request(_) => "request_error",
            ClientError::Decode(_) => "decode_error",
            ClientError::Bind(_) => "bind_error",
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
