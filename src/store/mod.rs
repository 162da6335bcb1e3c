//! Hash-structured key-value store abstraction
//!
//! The registry needs only a narrow slice of a key-value store: select a
//! logical keyspace, flush it, and read/write individual fields of a hash.
//! [`RoomStore`] captures that contract so the registry can run against
//! Redis in production and an in-memory map in tests.
//!
//! ```text
//!   keyspace N
//!   ├── "chat"            (hash = namespace)
//!   │    ├── "lobby"  ->  {"clients":["u1"],"active":true}
//!   │    └── "random" ->  {"clients":[],"active":false}
//!   └── "game"
//!        └── "table-1" -> {"clients":["u2","u3"],"active":true}
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

pub mod error;
pub mod memory;
pub mod redis;

pub use self::error::StoreError;
pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Narrow async contract over a hash-capable key-value store
///
/// All data operations fail with [`StoreError::NotConnected`] until
/// [`open`](RoomStore::open) has succeeded, and again after
/// [`close`](RoomStore::close).
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Connect (if needed) and select the given logical keyspace
    async fn open(&self, keyspace: i64) -> Result<(), StoreError>;

    /// Remove every key in the selected keyspace
    async fn flush(&self) -> Result<(), StoreError>;

    /// Read one field of a hash; `None` if the key or field is missing
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    /// Read every field of a hash; empty if the key is missing
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Write one field of a hash, overwriting any previous value
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError>;

    /// Delete one field of a hash; returns whether it existed
    async fn hdel(&self, key: &str, field: &str) -> Result<bool, StoreError>;

    /// Drop the connection. No-op if not connected.
    async fn close(&self);

    /// Whether the store currently holds an open connection
    async fn is_open(&self) -> bool;
}
