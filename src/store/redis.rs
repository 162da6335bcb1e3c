//! Redis-backed [`RoomStore`]

use std::collections::HashMap;

use ::redis::aio::MultiplexedConnection;
use ::redis::{AsyncCommands, Client, IntoConnectionInfo};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RoomStore, StoreError};

const IDENTIFIER: &str = "redis_store";

/// Room store backed by a single Redis connection
///
/// The `Client` is created eagerly so that a malformed URL is rejected at
/// construction time, but no network I/O happens until [`RoomStore::open`].
/// The connection is owned exclusively by this store; `SELECT` is issued on
/// it, so it must not be shared with code expecting another database.
pub struct RedisStore {
    client: Client,
    conn: RwLock<Option<MultiplexedConnection>>,
}

impl RedisStore {
    /// Create a store from a `redis://` URL or a
    /// [`ConnectionInfo`](::redis::ConnectionInfo) without connecting
    pub fn open_client(params: impl IntoConnectionInfo) -> Result<Self, StoreError> {
        let client = Client::open(params)?;

        Ok(Self {
            client,
            conn: RwLock::new(None),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        self.conn
            .read()
            .await
            .clone()
            .ok_or(StoreError::NotConnected)
    }
}

#[async_trait]
impl RoomStore for RedisStore {
    async fn open(&self, keyspace: i64) -> Result<(), StoreError> {
        if keyspace < 0 {
            return Err(StoreError::InvalidKeyspace(keyspace));
        }

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = ::redis::cmd("SELECT")
            .arg(keyspace)
            .query_async(&mut conn)
            .await?;

        *self.conn.write().await = Some(conn);

        tracing::debug!(identifier = IDENTIFIER, keyspace = keyspace, "Connected");
        Ok(())
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let _: () = ::redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.hget(key, field).await?;
        Ok(value)
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.connection().await?;
        let fields: HashMap<String, String> = conn.hgetall(key).await?;
        Ok(fields)
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let _: () = conn.hset(key, field, value).await?;
        Ok(())
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection().await?;
        let removed: i64 = conn.hdel(key, field).await?;
        Ok(removed > 0)
    }

    async fn close(&self) {
        // Dropping the last handle shuts the multiplexed connection down
        if self.conn.write().await.take().is_some() {
            tracing::debug!(identifier = IDENTIFIER, "Connection closed");
        }
    }

    async fn is_open(&self) -> bool {
        self.conn.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_url() {
        assert!(RedisStore::open_client("not a url").is_err());
        assert!(RedisStore::open_client("http://localhost:6379").is_err());
    }

    #[test]
    fn test_accepts_url_without_connecting() {
        // Nothing listens on this port; construction must still succeed
        assert!(RedisStore::open_client("redis://127.0.0.1:1/").is_ok());
    }

    #[tokio::test]
    async fn test_operations_require_open() {
        let store = RedisStore::open_client("redis://127.0.0.1:1/").unwrap();

        assert!(!store.is_open().await);
        assert!(matches!(
            store.hget("chat", "lobby").await,
            Err(StoreError::NotConnected)
        ));
        assert!(matches!(store.flush().await, Err(StoreError::NotConnected)));

        // Closing an unopened store is a no-op
        store.close().await;
        assert!(!store.is_open().await);
    }

    #[tokio::test]
    async fn test_negative_keyspace_rejected_before_connecting() {
        let store = RedisStore::open_client("redis://127.0.0.1:1/").unwrap();

        assert!(matches!(
            store.open(-1).await,
            Err(StoreError::InvalidKeyspace(-1))
        ));
    }
}
