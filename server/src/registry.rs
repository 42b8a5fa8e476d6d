//! Connection-to-player bookkeeping for the matchmaking server
//!
//! The registry answers one question: which player does this live connection
//! currently represent? It holds at most one player per connection and knows
//! nothing about sessions; keeping membership consistent with these entries
//! is the router's job.

use crate::connection::ConnectionId;
use log::debug;
use shared::PlayerId;
use std::collections::HashMap;

/// Maps live connections to the player each one joined as
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// Bound player indexed by connection
    players: HashMap<ConnectionId, PlayerId>,
}

impl ConnectionRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
        }
    }

    /// Associates a connection with a player
    ///
    /// Replaces any previous association. Callers unbind (and remove the old
    /// player from its session) before rebinding, so a replaced entry here
    /// signals a routing bug and is logged.
    pub fn bind(&mut self, connection: ConnectionId, player_id: PlayerId) {
        if let Some(previous) = self.players.insert(connection, player_id) {
            debug!(
                "Connection {} rebound from player {} to {}",
                connection, previous, player_id
            );
        }
    }

    /// Returns the player bound to a connection, if any
    pub fn player_of(&self, connection: ConnectionId) -> Option<PlayerId> {
        self.players.get(&connection).copied()
    }

    /// Removes a connection's association
    ///
    /// Returns the player that was bound, or None if the connection had no
    /// entry. Calling this twice is harmless.
    pub fn unbind(&mut self, connection: ConnectionId) -> Option<PlayerId> {
        self.players.remove(&connection)
    }

    /// Returns the number of bound connections
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns true if no connection is bound
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
