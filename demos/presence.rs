//! Presence walkthrough against a live Redis server
//!
//! Run with: cargo run --example presence
//!
//! Connection settings come from the environment:
//!   REDIS_HOST (default 127.0.0.1), REDIS_PORT (6379),
//!   REDIS_USERNAME, REDIS_PASSWORD, REDIS_KEYSPACE (default 0)
//!
//! The selected keyspace is FLUSHED on startup. Point it at a database
//! nothing else uses.
//!
//! Pass `--memory` to run without Redis.

use roomsync::{MemoryStore, RegistryConfig, RoomRegistry, RoomStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roomsync=debug".parse()?),
        )
        .init();

    let config = RegistryConfig::from_env();

    if std::env::args().any(|arg| arg == "--memory") {
        println!("Using in-memory store (keyspace {})", config.keyspace);
        let registry = RoomRegistry::with_store(MemoryStore::new(), config.keyspace);
        return run(registry).await;
    }

    println!(
        "Using Redis at {}:{} (keyspace {})",
        config.host, config.port, config.keyspace
    );
    let registry = RoomRegistry::new(config)?;
    run(registry).await
}

async fn run<S: RoomStore>(registry: RoomRegistry<S>) -> Result<(), Box<dyn std::error::Error>> {
    if !registry.init().await {
        return Err("room registry failed to initialize".into());
    }

    // Two clients join the lobby, one also joins a side room
    registry.add_room("chat", "lobby").await?;
    registry.add_client("chat", "lobby", "alice").await?;
    registry.add_client("chat", "lobby", "bob").await?;
    registry.add_client("chat", "side", "alice").await?;
    print_namespace(&registry, "chat").await;

    // alice disconnects: drop her from every room in the namespace
    let left = registry
        .remove_client_from_namespace_detailed("chat", "alice")
        .await?;
    println!("alice left: {:?}", left);

    // The side room is now empty; close it and collect it
    if registry.room_empty("chat", "side").await {
        registry.deactivate_room("chat", "side").await?;
    }
    let pruned = registry.prune_namespace("chat").await?;
    println!("pruned {} room(s)", pruned);
    print_namespace(&registry, "chat").await;

    registry.destroy().await;
    Ok(())
}

async fn print_namespace<S: RoomStore>(registry: &RoomRegistry<S>, namespace: &str) {
    match registry.get_rooms(namespace).await {
        Some(rooms) => {
            println!("{}:", namespace);
            for (name, room) in rooms {
                println!(
                    "  {:<8} active={:<5} clients={:?}",
                    name, room.active, room.clients
                );
            }
        }
        None => println!("{}: (no rooms)", namespace),
    }
}
