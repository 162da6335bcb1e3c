//! Room state and lookup types
//!
//! This module defines the per-room state persisted in the store, and the
//! tagged result reads produce before they are collapsed to `Option`.

use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Membership state for one room
///
/// Persisted as `{"clients":[...],"active":bool}`. Both fields are required
/// when decoding; a stored value missing either one is treated as corrupt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Client identifiers in join order. Duplicates are separate entries.
    pub clients: Vec<String>,
    /// Informational flag for collaborators
    pub active: bool,
}

impl Room {
    /// A freshly created room: no clients, active
    pub fn new() -> Self {
        Self {
            clients: Vec::new(),
            active: true,
        }
    }

    /// Whether the room has no clients
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Whether `client` appears at least once
    pub fn contains(&self, client: &str) -> bool {
        self.clients.iter().any(|c| c == client)
    }

    /// Remove the first occurrence of `client`; returns whether one was found
    pub fn remove_client(&mut self, client: &str) -> bool {
        match self.clients.iter().position(|c| c == client) {
            Some(index) => {
                self.clients.remove(index);
                true
            }
            None => false,
        }
    }

    pub(super) fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub(super) fn decode(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of reading stored state, before it is collapsed for callers
#[derive(Debug)]
pub(super) enum Lookup<T> {
    Found(T),
    Absent,
    /// Stored value exists but does not decode
    Corrupt {
        room: String,
        error: serde_json::Error,
    },
    /// Store could not be read
    Unavailable(StoreError),
}
