//! Distributed room registry
//!
//! The registry tracks which rooms exist in each namespace, which clients
//! belong to them, and whether each room is active. All state lives in a
//! shared store so every worker process sees the same membership.
//!
//! # Architecture
//!
//! ```text
//!     worker A                worker B                worker C
//!  RoomRegistry            RoomRegistry            RoomRegistry
//!  (own connection)        (own connection)        (own connection)
//!        │                       │                       │
//!        └───────────────┬───────┴───────────────┬───────┘
//!                        ▼                       ▼
//!                 ┌──────────────────────────────────────┐
//!                 │ keyspace N                           │
//!                 │   HASH <namespace>                   │
//!                 │     <room> -> {"clients","active"}   │
//!                 └──────────────────────────────────────┘
//! ```
//!
//! # Consistency
//!
//! Each mutation reads the whole room, changes it in memory and writes the
//! whole room back. Two workers mutating the same room at the same time
//! can lose one of the updates. Different rooms are independent.

pub mod config;
pub mod entry;
pub mod error;
pub mod key;
pub mod store;

pub use config::RegistryConfig;
pub use entry::Room;
pub use error::{RegistryError, Result};
pub use key::{validate_namespace, RoomKey};
pub use store::RoomRegistry;
