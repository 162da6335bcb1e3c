//! Store error types

use thiserror::Error;

/// Error type for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store client returned an error (I/O, protocol, auth, bad reply)
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A data operation was issued before `open` or after `close`
    #[error("store connection is not open")]
    NotConnected,

    /// The requested keyspace does not exist on the store
    #[error("invalid keyspace: {0}")]
    InvalidKeyspace(i64),
}
