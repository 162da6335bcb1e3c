//! Room registry implementation
//!
//! The registry keeps no state of its own beyond a store handle: every read
//! goes to the store and every mutation is a full read-modify-write of one
//! room. Registries in different processes pointed at the same keyspace
//! therefore see each other's changes, but two concurrent mutations of the
//! *same* room can lose one update (the later write wins). Mutations of
//! different rooms never interfere.

use std::collections::BTreeMap;

use crate::store::{RedisStore, RoomStore};
use crate::util::for_each_sequential;

use super::config::RegistryConfig;
use super::entry::{Lookup, Room};
use super::error::{RegistryError, Result};
use super::key::{validate_namespace, RoomKey};

const IDENTIFIER: &str = "room_registry";

/// Room membership registry backed by a shared hash store
///
/// Call [`init`](Self::init) once before anything else and
/// [`destroy`](Self::destroy) on shutdown.
pub struct RoomRegistry<S: RoomStore = RedisStore> {
    store: S,
    keyspace: i64,
}

impl RoomRegistry<RedisStore> {
    /// Create a Redis-backed registry
    ///
    /// Fails only if the client cannot be built from `config`.
    /// No connection is made until [`init`](Self::init).
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let store = RedisStore::open_client(config.connection_info())?;
        Ok(Self::with_store(store, config.keyspace))
    }
}

impl<S: RoomStore> RoomRegistry<S> {
    /// Create a registry over an arbitrary store
    pub fn with_store(store: S, keyspace: i64) -> Self {
        Self { store, keyspace }
    }

    /// The keyspace this registry owns
    pub fn keyspace(&self) -> i64 {
        self.keyspace
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Connect, select the keyspace and flush it
    ///
    /// Destructive: all prior state in the keyspace is wiped. Returns `false`
    /// (and logs) on any store error instead of failing.
    pub async fn init(&self) -> bool {
        let result = async {
            self.store.open(self.keyspace).await?;
            self.store.flush().await
        }
        .await;

        match result {
            Ok(()) => {
                tracing::info!(
                    identifier = IDENTIFIER,
                    keyspace = self.keyspace,
                    "Room registry initialized"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    identifier = IDENTIFIER,
                    keyspace = self.keyspace,
                    error = %e,
                    "Failed to initialize room registry"
                );
                false
            }
        }
    }

    /// Close the store connection. No-op if not connected.
    pub async fn destroy(&self) {
        if self.store.is_open().await {
            self.store.close().await;
            tracing::info!(
                identifier = IDENTIFIER,
                keyspace = self.keyspace,
                "Room registry closed"
            );
        }
    }

    /// All rooms in a namespace
    ///
    /// Returns `None` if the namespace has no rooms, if the store cannot be
    /// read, or if *any* room in it holds malformed state.
    pub async fn get_rooms(&self, namespace: &str) -> Option<BTreeMap<String, Room>> {
        let lookup = self.lookup_rooms(namespace).await;
        settle(lookup, namespace, None)
    }

    /// One room, or `None` if absent, malformed or unreadable
    pub async fn get_room(&self, namespace: &str, room: &str) -> Option<Room> {
        let lookup = self.lookup_room(namespace, room).await;
        settle(lookup, namespace, Some(room))
    }

    /// Whether the room exists (and holds well-formed state)
    pub async fn room_exists(&self, namespace: &str, room: &str) -> bool {
        self.get_room(namespace, room).await.is_some()
    }

    /// Whether the room is missing or has no clients
    pub async fn room_empty(&self, namespace: &str, room: &str) -> bool {
        self.get_room(namespace, room)
            .await
            .map_or(true, |r| r.is_empty())
    }

    /// Create an empty, active room
    ///
    /// Returns `false` without writing if the room already exists.
    pub async fn add_room(&self, namespace: &str, room: &str) -> Result<bool> {
        validate_namespace(namespace)?;

        if self.load_room(namespace, room).await?.is_some() {
            return Ok(false);
        }

        self.persist(namespace, room, &Room::new()).await?;

        tracing::info!(
            identifier = IDENTIFIER,
            room = %RoomKey::new(namespace, room),
            "Room created"
        );

        Ok(true)
    }

    /// Mark a room active, creating it if needed
    pub async fn activate_room(&self, namespace: &str, room: &str) -> Result<()> {
        self.set_active(namespace, room, true).await
    }

    /// Mark a room inactive, creating it if needed
    pub async fn deactivate_room(&self, namespace: &str, room: &str) -> Result<()> {
        self.set_active(namespace, room, false).await
    }

    /// Append a client to a room, creating the room if needed
    ///
    /// Duplicates are kept as separate entries.
    pub async fn add_client(&self, namespace: &str, room: &str, client: &str) -> Result<()> {
        let mut state = self.ensure_room(namespace, room).await?;
        state.clients.push(client.to_string());
        self.persist(namespace, room, &state).await?;

        tracing::debug!(
            identifier = IDENTIFIER,
            room = %RoomKey::new(namespace, room),
            client = client,
            clients = state.clients.len(),
            "Client added"
        );

        Ok(())
    }

    /// Remove the first occurrence of a client from a room
    ///
    /// Returns `false` if the room does not exist or does not contain the
    /// client. A store read failure is an error, not `false`.
    pub async fn remove_client_from_room(
        &self,
        namespace: &str,
        room: &str,
        client: &str,
    ) -> Result<bool> {
        let Some(mut state) = self.load_room(namespace, room).await? else {
            return Ok(false);
        };

        if !state.remove_client(client) {
            return Ok(false);
        }

        self.persist(namespace, room, &state).await?;

        tracing::debug!(
            identifier = IDENTIFIER,
            room = %RoomKey::new(namespace, room),
            client = client,
            clients = state.clients.len(),
            "Client removed"
        );

        Ok(true)
    }

    /// Remove a client from every room of a namespace
    ///
    /// Returns `true` if the client was removed from at least one room.
    pub async fn remove_client_from_namespace(&self, namespace: &str, client: &str) -> Result<bool> {
        let removed = self
            .remove_client_from_namespace_detailed(namespace, client)
            .await?;
        Ok(!removed.is_empty())
    }

    /// Remove a client from every room of a namespace, reporting which rooms
    /// it was removed from (in room-name order)
    ///
    /// Rooms are visited one at a time. A store error stops the sweep;
    /// removals already persisted are kept.
    pub async fn remove_client_from_namespace_detailed(
        &self,
        namespace: &str,
        client: &str,
    ) -> Result<Vec<String>> {
        let Some(rooms) = self.load_rooms(namespace).await? else {
            return Ok(Vec::new());
        };

        let results = for_each_sequential(rooms.into_keys(), move |room: String| async move {
            let removed = self.remove_client_from_room(namespace, &room, client).await?;
            Ok::<_, RegistryError>((room, removed))
        })
        .await?;

        Ok(results
            .into_iter()
            .filter_map(|(room, removed)| removed.then_some(room))
            .collect())
    }

    /// Names of the rooms in a namespace that contain `client`
    pub async fn client_rooms(&self, namespace: &str, client: &str) -> Vec<String> {
        self.get_rooms(namespace)
            .await
            .map(|rooms| {
                rooms
                    .into_iter()
                    .filter(|(_, room)| room.contains(client))
                    .map(|(name, _)| name)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Delete rooms that are both empty and inactive
    ///
    /// Rooms are never removed implicitly; this must be called explicitly.
    /// Returns the number of rooms deleted. A missing or malformed namespace
    /// prunes nothing.
    pub async fn prune_namespace(&self, namespace: &str) -> Result<usize> {
        let Some(rooms) = self.load_rooms(namespace).await? else {
            return Ok(0);
        };

        let mut pruned = 0;
        for (name, room) in rooms {
            if room.is_empty() && !room.active && self.store.hdel(namespace, &name).await? {
                pruned += 1;
                tracing::info!(
                    identifier = IDENTIFIER,
                    room = %RoomKey::new(namespace, &name),
                    "Room pruned"
                );
            }
        }

        Ok(pruned)
    }

    async fn set_active(&self, namespace: &str, room: &str, active: bool) -> Result<()> {
        let mut state = self.ensure_room(namespace, room).await?;
        state.active = active;
        self.persist(namespace, room, &state).await?;

        tracing::debug!(
            identifier = IDENTIFIER,
            room = %RoomKey::new(namespace, room),
            active = active,
            "Room state changed"
        );

        Ok(())
    }

    /// Current state of a room, creating it first if it does not exist
    async fn ensure_room(&self, namespace: &str, room: &str) -> Result<Room> {
        validate_namespace(namespace)?;

        if let Some(state) = self.load_room(namespace, room).await? {
            return Ok(state);
        }

        let state = Room::new();
        self.persist(namespace, room, &state).await?;

        tracing::info!(
            identifier = IDENTIFIER,
            room = %RoomKey::new(namespace, room),
            "Room created"
        );

        Ok(state)
    }

    /// Sole write path for room state: overwrite the whole room
    async fn persist(&self, namespace: &str, room: &str, state: &Room) -> Result<()> {
        let value = state.encode()?;
        self.store.hset(namespace, room, &value).await?;
        Ok(())
    }

    /// Read a room for a mutation: corrupt state counts as absent, but a
    /// failed read is an error so nothing gets written over live state
    async fn load_room(&self, namespace: &str, room: &str) -> Result<Option<Room>> {
        match self.lookup_room(namespace, room).await {
            Lookup::Unavailable(e) => Err(e.into()),
            lookup => Ok(settle(lookup, namespace, Some(room))),
        }
    }

    async fn load_rooms(&self, namespace: &str) -> Result<Option<BTreeMap<String, Room>>> {
        match self.lookup_rooms(namespace).await {
            Lookup::Unavailable(e) => Err(e.into()),
            lookup => Ok(settle(lookup, namespace, None)),
        }
    }

    async fn lookup_rooms(&self, namespace: &str) -> Lookup<BTreeMap<String, Room>> {
        if let Err(e) = validate_namespace(namespace) {
            tracing::warn!(identifier = IDENTIFIER, error = %e, "Rejected namespace on read");
            return Lookup::Absent;
        }

        let raw = match self.store.hgetall(namespace).await {
            Ok(raw) => raw,
            Err(e) => return Lookup::Unavailable(e),
        };

        if raw.is_empty() {
            return Lookup::Absent;
        }

        let mut rooms = BTreeMap::new();
        for (name, value) in raw {
            match Room::decode(&value) {
                Ok(room) => {
                    rooms.insert(name, room);
                }
                Err(error) => return Lookup::Corrupt { room: name, error },
            }
        }

        Lookup::Found(rooms)
    }

    async fn lookup_room(&self, namespace: &str, room: &str) -> Lookup<Room> {
        if let Err(e) = validate_namespace(namespace) {
            tracing::warn!(identifier = IDENTIFIER, error = %e, "Rejected namespace on read");
            return Lookup::Absent;
        }

        match self.store.hget(namespace, room).await {
            Ok(Some(value)) => match Room::decode(&value) {
                Ok(state) => Lookup::Found(state),
                Err(error) => Lookup::Corrupt {
                    room: room.to_string(),
                    error,
                },
            },
            Ok(None) => Lookup::Absent,
            Err(e) => Lookup::Unavailable(e),
        }
    }
}

/// Collapse a lookup to the public `Option` contract, logging the reason
/// for anything other than a hit or a plain miss
fn settle<T>(lookup: Lookup<T>, namespace: &str, room: Option<&str>) -> Option<T> {
    match lookup {
        Lookup::Found(value) => Some(value),
        Lookup::Absent => None,
        Lookup::Corrupt { room: bad, error } => {
            tracing::warn!(
                identifier = IDENTIFIER,
                namespace = namespace,
                room = %bad,
                scope = if room.is_some() { "room" } else { "namespace" },
                error = %error,
                "Malformed room state in store"
            );
            None
        }
        Lookup::Unavailable(error) => {
            tracing::error!(
                identifier = IDENTIFIER,
                namespace = namespace,
                room = room.unwrap_or("*"),
                error = %error,
                "Failed to read room state"
            );
            None
        }
    }
}
