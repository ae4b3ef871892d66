//! # Error handling utilities.
//! Application plumbing uses the generic anyhow error type.
//! Storage failures get their own `StoreError` so callers can tell a
//! rejected write apart from everything else.

use thiserror::Error;

pub type Result<T> = anyhow::Result<T>;

/// Result of a storage gateway write.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures raised at the storage gateway boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying key/value backend refused the operation.
    #[error("storage backend failure on key {key}: {source}")]
    Backend {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The value could not be serialized to JSON.
    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stored text is not a valid record of the requested type.
    #[error("failed to decode value for key {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
