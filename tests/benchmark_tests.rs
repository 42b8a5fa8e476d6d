//! Performance benchmarks for the routing hot paths

use serde_json::json;
use server::connection::{Connection, ConnectionId};
use server::router::Router;
use server::session::SessionSettings;
use shared::{decode_inbound, PlayerId};
use std::time::Instant;
use tokio::sync::mpsc;

/// Benchmarks decoding of direction-change frames
#[test]
fn benchmark_decode_user_input() {
    let frame = json!({
        "name": "UserInput",
        "sessionName": "S1",
        "clientId": PlayerId::generate().to_string(),
        "data": {"type": "ChangeDirection", "direction": "left"}
    })
    .to_string();

    let iterations = 100_000;
    let start = Instant::now();

    for _ in 0..iterations {
        assert!(decode_inbound(&frame).is_some());
    }

    let duration = start.elapsed();
    println!(
        "Input decoding: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 5 seconds even in debug builds
    assert!(duration.as_secs() < 5);
}

/// Benchmarks join and disconnect churn across many sessions
#[test]
fn benchmark_join_disconnect_churn() {
    let mut router: Router = Router::new(SessionSettings::default());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let connections: Vec<Connection> = (0..1_000)
        .map(|i| Connection::new(ConnectionId(i), tx.clone()))
        .collect();

    let start = Instant::now();

    for connection in &connections {
        router.join_session(connection);
    }
    let sessions = router.pool().len();

    for connection in &connections {
        router.handle_disconnect(connection.id());
    }
    let reaped = router.sweep();

    let duration = start.elapsed();
    println!(
        "Join/disconnect churn: {} connections over {} sessions in {:?}",
        connections.len(),
        sessions,
        duration
    );

    assert_eq!(sessions, 1_000 / shared::DEFAULT_MAX_PLAYERS);
    assert_eq!(reaped, sessions);
    assert!(router.pool().is_empty());
    assert!(router.registry().is_empty());

    let mut confirmations = 0;
    while rx.try_recv().is_ok() {
        confirmations += 1;
    }
    assert_eq!(confirmations, 1_000);

    // Linear scans over ~125 sessions stay well under a second
    assert!(duration.as_secs() < 5);
}

/// Benchmarks routing of direction changes to joined players
#[test]
fn benchmark_direction_routing() {
    let mut router: Router = Router::new(SessionSettings::default());
    let (tx, _rx) = mpsc::unbounded_channel();

    let players: Vec<(Connection, PlayerId)> = (0..100)
        .map(|i| {
            let connection = Connection::new(ConnectionId(i), tx.clone());
            let player_id = router.join_session(&connection);
            (connection, player_id)
        })
        .collect();

    let frames: Vec<String> = players
        .iter()
        .map(|(_, player_id)| {
            let session = router
                .pool()
                .find_owning_session(*player_id)
                .expect("Player should be in a session");
            json!({
                "name": "UserInput",
                "sessionName": server::session::GameSession::name(session),
                "clientId": player_id.to_string(),
                "data": {"type": "ChangeDirection", "direction": "up"}
            })
            .to_string()
        })
        .collect();

    let rounds = 100;
    let start = Instant::now();

    for _ in 0..rounds {
        for ((connection, _), frame) in players.iter().zip(&frames) {
            router.handle_frame(connection, frame);
        }
    }

    let duration = start.elapsed();
    println!(
        "Direction routing: {} frames in {:?}",
        rounds * players.len(),
        duration
    );

    assert!(duration.as_secs() < 5);
}
