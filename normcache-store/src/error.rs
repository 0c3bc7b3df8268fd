//! Error types for the store layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the normalized store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A snapshot section had an unexpected shape.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
}
