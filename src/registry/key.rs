//! Room addressing
//!
//! A room is addressed by its namespace (the hash key in the store) and its
//! name (the field within that hash).

use super::error::RegistryError;

/// Identifier for a room (namespace + room name)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomKey {
    /// Namespace (e.g., "chat")
    pub namespace: String,
    /// Room name within the namespace (e.g., "lobby")
    pub room: String,
}

impl RoomKey {
    /// Create a new room key
    pub fn new(namespace: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            room: room.into(),
        }
    }
}

impl std::fmt::Display for RoomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.room)
    }
}

/// Check that a namespace can be used as a store key
///
/// Bare numeric strings are rejected since some stores parse them as
/// integers; empty strings are rejected outright.
pub fn validate_namespace(namespace: &str) -> Result<(), RegistryError> {
    let body = namespace.trim_start_matches(|c: char| c == '-' || c == '+');
    let numeric = body.chars().any(|c| c.is_ascii_digit())
        && body.chars().all(|c| c.is_ascii_digit() || c == '.');

    if namespace.is_empty() || numeric {
        return Err(RegistryError::InvalidNamespace(namespace.to_string()));
    }

    Ok(())
}
