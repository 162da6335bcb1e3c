//! In-memory [`RoomStore`]
//!
//! Mirrors the subset of Redis semantics the registry relies on: sixteen
//! numbered keyspaces, hashes of string fields, and per-connection keyspace
//! selection. Several handles created with [`MemoryStore::new_handle`] share
//! the same data, the way several workers share one Redis server.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RoomStore, StoreError};

/// Number of keyspaces, matching a default Redis configuration
pub const KEYSPACE_COUNT: i64 = 16;

type Hash = HashMap<String, String>;
type Keyspace = HashMap<String, Hash>;

/// Shared in-memory hash store
pub struct MemoryStore {
    data: Arc<RwLock<Vec<Keyspace>>>,
    selected: RwLock<Option<usize>>,
}

impl MemoryStore {
    /// Create an empty store with its own data
    pub fn new() -> Self {
        let keyspaces = (0..KEYSPACE_COUNT).map(|_| Keyspace::new()).collect();

        Self {
            data: Arc::new(RwLock::new(keyspaces)),
            selected: RwLock::new(None),
        }
    }

    /// Create another unopened handle onto the same data
    pub fn new_handle(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            selected: RwLock::new(None),
        }
    }

    async fn selected(&self) -> Result<usize, StoreError> {
        self.selected.read().await.ok_or(StoreError::NotConnected)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn open(&self, keyspace: i64) -> Result<(), StoreError> {
        if !(0..KEYSPACE_COUNT).contains(&keyspace) {
            return Err(StoreError::InvalidKeyspace(keyspace));
        }

        *self.selected.write().await = Some(keyspace as usize);
        Ok(())
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let index = self.selected().await?;
        self.data.write().await[index].clear();
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let index = self.selected().await?;
        let data = self.data.read().await;

        Ok(data[index]
            .get(key)
            .and_then(|hash| hash.get(field))
            .cloned())
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let index = self.selected().await?;
        let data = self.data.read().await;

        Ok(data[index].get(key).cloned().unwrap_or_default())
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let index = self.selected().await?;
        let mut data = self.data.write().await;

        data[index]
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<bool, StoreError> {
        let index = self.selected().await?;
        let mut data = self.data.write().await;
        let keyspace = &mut data[index];

        let Some(hash) = keyspace.get_mut(key) else {
            return Ok(false);
        };
        let removed = hash.remove(field).is_some();

        // Redis deletes a hash once its last field is gone
        if hash.is_empty() {
            keyspace.remove(key);
        }

        Ok(removed)
    }

    async fn close(&self) {
        self.selected.write().await.take();
    }

    async fn is_open(&self) -> bool {
        self.selected.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_validates_keyspace() {
        let store = MemoryStore::new();

        assert!(matches!(
            store.open(KEYSPACE_COUNT).await,
            Err(StoreError::InvalidKeyspace(16))
        ));
        assert!(matches!(
            store.open(-3).await,
            Err(StoreError::InvalidKeyspace(-3))
        ));
        assert!(!store.is_open().await);

        store.open(15).await.unwrap();
        assert!(store.is_open().await);
    }

    #[tokio::test]
    async fn test_requires_open() {
        let store = MemoryStore::new();

        assert!(matches!(
            store.hset("ns", "room", "{}").await,
            Err(StoreError::NotConnected)
        ));

        tokio_test::assert_ok!(store.open(0).await);
        tokio_test::assert_ok!(store.hset("ns", "room", "{}").await);

        store.close().await;
        assert!(matches!(
            store.hget("ns", "room").await,
            Err(StoreError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_keyspaces_are_isolated() {
        let a = MemoryStore::new();
        let b = a.new_handle();
        a.open(1).await.unwrap();
        b.open(2).await.unwrap();

        a.hset("ns", "room", "one").await.unwrap();
        assert_eq!(b.hget("ns", "room").await.unwrap(), None);

        b.flush().await.unwrap();
        assert_eq!(a.hget("ns", "room").await.unwrap().as_deref(), Some("one"));
    }

    #[tokio::test]
    async fn test_handles_share_data() {
        let a = MemoryStore::new();
        let b = a.new_handle();
        a.open(4).await.unwrap();
        b.open(4).await.unwrap();

        a.hset("ns", "room", "value").await.unwrap();
        assert_eq!(b.hget("ns", "room").await.unwrap().as_deref(), Some("value"));

        let all = b.hgetall("ns").await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(b.hgetall("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hdel() {
        let store = MemoryStore::new();
        store.open(0).await.unwrap();

        store.hset("ns", "a", "1").await.unwrap();
        store.hset("ns", "b", "2").await.unwrap();

        assert!(store.hdel("ns", "a").await.unwrap());
        assert!(!store.hdel("ns", "a").await.unwrap());
        assert!(!store.hdel("other", "a").await.unwrap());

        assert!(store.hdel("ns", "b").await.unwrap());
        assert!(store.hgetall("ns").await.unwrap().is_empty());
    }
}
