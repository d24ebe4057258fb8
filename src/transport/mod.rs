//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! Client builds endpoint URL
//!     → Transport::fetch (single GET, whole body read)
//!     → RawResponse { status, body }
//!     → snapshot decoder (only when status == 200)
//! ```
//!
//! # Design Decisions
//! - No retries and no request timeout here; the watch loop owns retry
//!   policy and the server owns the long-poll deadline
//! - Non-2xx statuses are data, not errors, so callers can tell
//!   "reachable but rejected" from "unreachable"

use std::future::Future;

use thiserror::Error;
use url::Url;

pub mod http;
#[cfg(test)]
pub(crate) mod scripted;

pub use http::HttpTransport;

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Entire response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the service accepted the request.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Errors raised when the service cannot be reached or the body cannot be read.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client failed to send the request or read the body.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection-level failure reported by a non-reqwest transport.
    #[error("connection error: {0}")]
    Connection(String),
}

/// Issues GET requests against the configuration service.
pub trait Transport: Send + Sync {
    /// Fetch `url`, returning the status and the whole body.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}
