//! Registry error types
//!
//! Only write paths return these. Reads collapse failures to `None`.

use thiserror::Error;

use crate::store::StoreError;

/// Error type for registry write operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The backing store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Namespace is empty or a bare number
    #[error("invalid namespace: {0:?}")]
    InvalidNamespace(String),

    /// Room state could not be serialized
    #[error("failed to encode room state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
