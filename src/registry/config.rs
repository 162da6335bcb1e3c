//! Registry configuration

use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use serde::Deserialize;

/// Connection and keyspace settings for a [`RoomRegistry`](super::RoomRegistry)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Redis host name or address
    pub host: String,

    /// Redis port
    pub port: u16,

    /// ACL user name (Redis 6+)
    pub username: Option<String>,

    /// Password for `AUTH`
    pub password: Option<String>,

    /// Logical database owned exclusively by this registry.
    /// `init` flushes it.
    pub keyspace: i64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            username: None,
            password: None,
            keyspace: 0,
        }
    }
}

impl RegistryConfig {
    /// Build a config from `REDIS_HOST`, `REDIS_PORT`, `REDIS_USERNAME`,
    /// `REDIS_PASSWORD` and `REDIS_KEYSPACE`
    ///
    /// Unset or unparseable variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("REDIS_HOST").unwrap_or(defaults.host),
            port: lookup("REDIS_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            username: lookup("REDIS_USERNAME").filter(|v| !v.is_empty()),
            password: lookup("REDIS_PASSWORD").filter(|v| !v.is_empty()),
            keyspace: lookup("REDIS_KEYSPACE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.keyspace),
        }
    }

    /// Set the host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set credentials
    pub fn credentials(mut self, username: Option<String>, password: impl Into<String>) -> Self {
        self.username = username;
        self.password = Some(password.into());
        self
    }

    /// Set the keyspace
    pub fn keyspace(mut self, keyspace: i64) -> Self {
        self.keyspace = keyspace;
        self
    }

    /// Connection parameters for the Redis client
    ///
    /// Credentials are passed as-is, never embedded in a URL. The database
    /// stays at 0 here; the keyspace is selected explicitly after connecting.
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                username: self.username.clone(),
                password: self.password.clone(),
                ..Default::default()
            },
        }
    }
}
