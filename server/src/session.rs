//! Capability interface between the matchmaking core and the game world
//!
//! The router and session pool only ever talk to sessions and players
//! through these traits. Movement, collisions and scoring live behind them,
//! which lets the routing layer be driven by test doubles.

use crate::connection::Connection;
use shared::{Direction, PlayerId, SessionInfo, SessionState};

/// Fixed parameters every new session is created with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub field_width: u32,
    pub field_height: u32,
    pub max_players: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            field_width: shared::DEFAULT_FIELD_WIDTH,
            field_height: shared::DEFAULT_FIELD_HEIGHT,
            max_players: shared::DEFAULT_MAX_PLAYERS,
        }
    }
}

pub trait SessionPlayer {
    fn create(id: PlayerId, connection: Connection) -> Self;

    fn id(&self) -> PlayerId;

    fn change_direction(&mut self, direction: Direction);
}

pub trait GameSession {
    type Player: SessionPlayer;

    /// Builds an empty session. `name` is already unique within the process.
    fn create(name: String, settings: &SessionSettings) -> Self;

    fn name(&self) -> &str;

    fn state(&self) -> SessionState;

    fn field_width(&self) -> u32;

    fn field_height(&self) -> u32;

    fn member_count(&self) -> usize;

    /// True while the session has a free slot and its state admits entrants
    fn is_joinable(&self) -> bool;

    fn add_player(&mut self, player: Self::Player);

    /// Returns false if no member has this ID
    fn remove_player_by_id(&mut self, id: PlayerId) -> bool;

    /// Returns false if no member has this ID
    fn respawn_player_by_id(&mut self, id: PlayerId) -> bool;

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Self::Player>;

    fn contains_player(&self, id: PlayerId) -> bool;

    fn is_empty(&self) -> bool {
        self.member_count() == 0
    }

    /// Metadata echoed to a client when it joins
    fn info(&self) -> SessionInfo {
        SessionInfo {
            name: self.name().to_string(),
            state: self.state(),
            field_width: self.field_width(),
            field_height: self.field_height(),
        }
    }
}
