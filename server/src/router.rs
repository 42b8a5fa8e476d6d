//! Message routing between connections and sessions
//!
//! The router owns the connection registry and the session pool and is the
//! only thing that mutates either. It is driven from a single task (see
//! `network`), so every join, leave, disconnect, input and sweep is
//! serialized; `&mut self` on each entry point is the exclusion scope.
//!
//! ### Join
//! A connection that already represents a player is first removed from that
//! player's session, then matched into the first joinable session (a new
//! one if none is) under a freshly generated player ID, bound in the
//! registry, and sent a `JoinedSession` confirmation.
//!
//! ### Input
//! `UserInput` names a session and a player. If either is gone (the player
//! disconnected, the session was reaped) the input is dropped.
//!
//! ### Malformed frames
//! Dropped without a reply and without touching any state. They are logged
//! at debug level only.

use crate::connection::{Connection, ConnectionId};
use crate::game::SnakeSession;
use crate::pool::SessionPool;
use crate::registry::ConnectionRegistry;
use crate::session::{GameSession, SessionPlayer, SessionSettings};
use log::{debug, info};
use shared::{
    decode_inbound, InboundMessage, OutboundMessage, PlayerAction, PlayerId, UserInputData,
};

pub struct Router<S: GameSession = SnakeSession> {
    registry: ConnectionRegistry,
    pool: SessionPool<S>,
}

impl<S: GameSession> Router<S> {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            pool: SessionPool::new(settings),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &SessionPool<S> {
        &self.pool
    }

    /// Decodes a text frame and dispatches it
    pub fn handle_frame(&mut self, connection: &Connection, text: &str) {
        match decode_inbound(text) {
            Some(message) => self.handle_message(connection, message),
            None => debug!("Dropping malformed frame from {}", connection.id()),
        }
    }

    pub fn handle_message(&mut self, connection: &Connection, message: InboundMessage) {
        match message {
            InboundMessage::JoinSession => {
                self.join_session(connection);
            }
            InboundMessage::LeaveSession => self.leave_session(connection.id()),
            InboundMessage::UserInput {
                session_name,
                client_id,
                data,
            } => self.handle_user_input(&session_name, client_id, data),
        }
    }

    /// Places the connection's new player in a session and confirms it
    pub fn join_session(&mut self, connection: &Connection) -> PlayerId {
        if let Some(previous) = self.release_player(connection.id()) {
            info!(
                "Connection {} rejoining, dropped previous player {}",
                connection.id(),
                previous
            );
        }

        let player_id = PlayerId::generate();
        let session = self.pool.find_or_create_joinable();
        session.add_player(S::Player::create(player_id, connection.clone()));
        let session_info = session.info();

        self.registry.bind(connection.id(), player_id);

        info!(
            "Player {} joined session {} via {}",
            player_id,
            session_info.name,
            connection.id()
        );
        connection.send(&OutboundMessage::joined_session(player_id, session_info));

        player_id
    }

    /// Explicit leave; the connection stays open and may join again
    pub fn leave_session(&mut self, connection: ConnectionId) {
        match self.release_player(connection) {
            Some(player_id) => info!("Player {} left via {}", player_id, connection),
            None => debug!("Leave from {} which has no player", connection),
        }
    }

    /// Transport-level close. Safe to call more than once per connection.
    pub fn handle_disconnect(&mut self, connection: ConnectionId) {
        match self.release_player(connection) {
            Some(player_id) => info!("Player {} disconnected ({})", player_id, connection),
            None => debug!("Connection {} closed without a player", connection),
        }
    }

    /// Removes the connection's player from its session and unbinds it
    fn release_player(&mut self, connection: ConnectionId) -> Option<PlayerId> {
        let player_id = self.registry.unbind(connection)?;
        if let Some(session) = self.pool.find_owning_session_mut(player_id) {
            session.remove_player_by_id(player_id);
        }
        Some(player_id)
    }

    fn handle_user_input(&mut self, session_name: &str, player_id: PlayerId, data: UserInputData) {
        let Some(session) = self.pool.find_by_name_mut(session_name) else {
            debug!("Input for unknown session {}", session_name);
            return;
        };

        match data {
            UserInputData::PerformAction {
                action: PlayerAction::Respawn,
            } => {
                if !session.respawn_player_by_id(player_id) {
                    debug!("Respawn for unknown player {} in {}", player_id, session_name);
                }
            }
            UserInputData::ChangeDirection { direction } => match session.player_mut(player_id) {
                Some(player) => player.change_direction(direction),
                None => debug!(
                    "Direction change for unknown player {} in {}",
                    player_id, session_name
                ),
            },
        }
    }

    /// Reaps empty sessions; returns how many were removed
    pub fn sweep(&mut self) -> usize {
        self.pool.sweep()
    }
}
