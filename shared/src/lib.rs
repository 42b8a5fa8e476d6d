use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const DEFAULT_FIELD_WIDTH: u32 = 80;
pub const DEFAULT_FIELD_HEIGHT: u32 = 60;
pub const DEFAULT_MAX_PLAYERS: usize = 8;
pub const SWEEP_INTERVAL_SECS: u64 = 10;
pub const STATUS_OK: u16 = 200;

/// Identity of a joined player, generated once per successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Lifecycle phase of a session. Only `Ended` turns new entrants away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Waiting,
    Running,
    Ended,
}

impl SessionState {
    pub fn accepts_players(self) -> bool {
        !matches!(self, SessionState::Ended)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerAction {
    Respawn,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum UserInputData {
    PerformAction { action: PlayerAction },
    ChangeDirection { direction: Direction },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "name")]
pub enum InboundMessage {
    JoinSession,
    LeaveSession,
    #[serde(rename_all = "camelCase")]
    UserInput {
        session_name: String,
        client_id: PlayerId,
        data: UserInputData,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub name: String,
    pub state: SessionState,
    pub field_width: u32,
    pub field_height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedSessionData {
    pub session: SessionInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum OutboundMessage {
    #[serde(rename_all = "camelCase")]
    JoinedSession {
        client_id: PlayerId,
        session_name: String,
        status: u16,
        data: JoinedSessionData,
    },
}

impl OutboundMessage {
    pub fn joined_session(client_id: PlayerId, session: SessionInfo) -> Self {
        OutboundMessage::JoinedSession {
            client_id,
            session_name: session.name.clone(),
            status: STATUS_OK,
            data: JoinedSessionData { session },
        }
    }
}

/// Decodes an inbound text frame. Anything unparseable, unknown or missing a
/// required field yields `None`; callers drop such frames without replying.
pub fn decode_inbound(text: &str) -> Option<InboundMessage> {
    serde_json::from_str(text).ok()
}

pub fn encode_outbound(message: &OutboundMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}
