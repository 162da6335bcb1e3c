//! Room membership registry for stateless realtime workers
//!
//! `roomsync` lets many worker processes agree on which rooms exist in a
//! namespace, which clients are in them, and whether each room is active.
//! State is kept in Redis (one logical database per registry), so it
//! survives restarts and is visible cluster-wide.
//!
//! ```rust,ignore
//! use roomsync::{RegistryConfig, RoomRegistry};
//!
//! let registry = RoomRegistry::new(RegistryConfig::from_env().keyspace(3))?;
//! if !registry.init().await {
//!     return Err("redis unavailable".into());
//! }
//!
//! registry.add_client("chat", "lobby", "u1").await?;
//! assert!(registry.room_exists("chat", "lobby").await);
//!
//! registry.destroy().await;
//! ```

pub mod registry;
pub mod store;
pub mod util;

pub use registry::{RegistryConfig, RegistryError, Room, RoomKey, RoomRegistry};
pub use store::{MemoryStore, RedisStore, RoomStore, StoreError};
