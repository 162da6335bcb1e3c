//! Several registries sharing one store, as separate worker processes would

use std::sync::Arc;

use roomsync::{MemoryStore, RegistryConfig, Room, RoomRegistry, RoomStore};

const KEYSPACE: i64 = 5;

async fn workers(count: usize) -> Vec<RoomRegistry<MemoryStore>> {
    let server = MemoryStore::new();
    let mut registries = Vec::with_capacity(count);

    for _ in 0..count {
        let registry = RoomRegistry::with_store(server.new_handle(), KEYSPACE);
        // Only the first worker flushes; the rest just connect
        if registries.is_empty() {
            assert!(registry.init().await);
        } else {
            registry.store().open(KEYSPACE).await.unwrap();
        }
        registries.push(registry);
    }

    registries
}

#[tokio::test]
async fn test_writes_are_visible_to_other_workers() {
    let workers = workers(2).await;
    let (a, b) = (&workers[0], &workers[1]);

    a.add_client("chat", "lobby", "u1").await.unwrap();
    b.add_client("chat", "lobby", "u2").await.unwrap();

    let expected = Room {
        clients: vec!["u1".to_string(), "u2".to_string()],
        active: true,
    };
    assert_eq!(a.get_room("chat", "lobby").await, Some(expected.clone()));
    assert_eq!(b.get_room("chat", "lobby").await, Some(expected));

    assert!(b.remove_client_from_namespace("chat", "u1").await.unwrap());
    assert_eq!(a.client_rooms("chat", "u1").await, Vec::<String>::new());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 3)]
async fn test_concurrent_writes_to_different_rooms_do_not_interfere() {
    let workers: Vec<Arc<RoomRegistry<MemoryStore>>> =
        workers(3).await.into_iter().map(Arc::new).collect();

    let tasks: Vec<_> = workers
        .iter()
        .enumerate()
        .map(|(i, worker)| {
            let worker = Arc::clone(worker);
            tokio::spawn(async move {
                for n in 0..10 {
                    worker
                        .add_client("game", &format!("table-{}", i), &format!("p{}", n))
                        .await
                        .unwrap();
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    let rooms = workers[0].get_rooms("game").await.unwrap();
    assert_eq!(rooms.len(), 3);
    for room in rooms.values() {
        assert_eq!(room.clients.len(), 10);
    }
}

#[tokio::test]
async fn test_init_on_shared_keyspace_wipes_other_workers_state() {
    let workers = workers(2).await;
    workers[0].add_room("chat", "lobby").await.unwrap();

    assert!(workers[1].init().await);
    assert!(!workers[0].room_exists("chat", "lobby").await);
}

#[tokio::test]
async fn test_destroying_one_worker_leaves_others_connected() {
    let workers = workers(2).await;
    workers[0].add_room("chat", "lobby").await.unwrap();

    workers[0].destroy().await;

    assert!(workers[1].room_exists("chat", "lobby").await);
    assert!(workers[1].add_client("chat", "lobby", "u1").await.is_ok());
}

/// Scenario against a live server; set REDIS_HOST/REDIS_PORT to run
#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_redis_lobby_scenario() {
    let registry = RoomRegistry::new(RegistryConfig::from_env().keyspace(3)).unwrap();
    assert!(registry.init().await);

    assert!(registry.add_room("chat", "lobby").await.unwrap());
    registry.add_client("chat", "lobby", "u1").await.unwrap();
    registry.deactivate_room("chat", "lobby").await.unwrap();

    assert_eq!(
        registry.get_room("chat", "lobby").await,
        Some(Room {
            clients: vec!["u1".to_string()],
            active: false,
        })
    );

    registry.destroy().await;
}
