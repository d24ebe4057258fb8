//! Snapshot model and decoding.
//!
//! # Responsibilities
//! - Define the wire records returned by the service
//! - Decode single-entry and multi-entry snapshots from response bodies
//!
//! # Design Decisions
//! - The shape is chosen by the call site (which endpoint was invoked),
//!   never by sniffing the body
//! - Empty datasets (`null` data, `null` entries, empty maps) decode fine;
//!   deciding what they mean is the binder's job

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// One configuration item as last observed from the service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    /// Server-side modification time.
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: i64,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, timestamp: i64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            timestamp,
        }
    }
}

/// Explicit `null` members decode like missing ones.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Key → entry mapping of a multi-entry snapshot. Entries may be `null`.
pub type Dataset = HashMap<String, Option<ConfigEntry>>;

/// Result of `GET /api/config`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSnapshot {
    pub data: Option<Dataset>,
    /// Cursor to pass as `lastIndex` on the next long poll.
    #[serde(deserialize_with = "null_as_default")]
    pub recent_index: u64,
}

/// Result of `GET /api/config/{key}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeySnapshot {
    pub data: Option<ConfigEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub recent_index: u64,
}

/// The response body is not a well-formed snapshot.
#[derive(Debug, Error)]
#[error("decode error, detail: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Decode the body of a multi-entry response.
pub fn decode_app(body: &[u8]) -> Result<AppSnapshot, DecodeError> {
    Ok(serde_json::from_slice(body)?)
}

/// Decode the body of a single-entry response.
pub fn decode_key(body: &[u8]) -> Result<KeySnapshot, DecodeError> {
    Ok(serde_json::from_slice(body)?)
}
