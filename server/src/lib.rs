//! # Matchmaking Server Library
//!
//! This library provides the connection and matchmaking core for a real-time
//! multiplayer arcade game. Clients connect over WebSocket, are placed into
//! shared play sessions, and exchange small JSON control messages (join,
//! input, direction change, respawn) for the duration of play.
//!
//! ## Core Responsibilities
//!
//! ### Matchmaking
//! Every joining connection is assigned to exactly one session: the first
//! joinable session in creation order, or a new one when none has room.
//!
//! ### Connection Tracking
//! A registry maps each live connection to the player it represents. A
//! connection never represents more than one player, and the mapping is
//! removed when the connection closes or leaves.
//!
//! ### Input Routing
//! `UserInput` messages name a session and a player and are forwarded to
//! that player. Inputs for players or sessions that no longer exist are
//! dropped.
//!
//! ### Session Reaping
//! A periodic sweep removes sessions that have no members left.
//!
//! ## Architecture Design
//!
//! ### Single-Writer Event Loop
//! All routing state is owned by one task. Connection tasks only read
//! frames and forward them over a channel, so joins, disconnects, inputs and
//! sweeps are processed one at a time and never race.
//!
//! ### Opaque Game World
//! Sessions and players are reached only through the `GameSession` and
//! `SessionPlayer` traits. `SnakeSession` is the default implementation.
//!
//! ## Module Organization
//!
//! - `connection`: connection handle and non-blocking outbound queue
//! - `registry`: connection to player mapping
//! - `session`: capability traits for sessions and players
//! - `game`: default snake arena session
//! - `pool`: ordered session collection, matchmaking and sweep
//! - `router`: join/leave/input/disconnect protocols
//! - `network`: WebSocket listener, per-connection tasks, router task
//! - `config`, `error`: runtime configuration and control-surface errors
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new(ServerConfig::default());
//!     let addr = server.start(8080).await?;
//!     println!("Listening on {}", addr);
//!
//!     tokio::signal::ctrl_c().await?;
//!     server.close();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod game;
pub mod network;
pub mod pool;
pub mod registry;
pub mod router;
pub mod session;
