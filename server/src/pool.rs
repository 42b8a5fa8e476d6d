//! Ordered collection of live sessions and the matchmaking over it
//!
//! Pool order is matchmaking priority: the first joinable session in
//! insertion order receives the next player. Sessions are appended when
//! nothing is joinable and dropped by `sweep` once they have no members.
//! Lookups are linear scans; session counts per process are small.

use crate::session::{GameSession, SessionSettings};
use log::info;
use shared::PlayerId;

pub struct SessionPool<S: GameSession> {
    sessions: Vec<S>,
    settings: SessionSettings,
    /// Number used in the next generated session name, never reused
    next_session_number: u64,
}

impl<S: GameSession> SessionPool<S> {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            sessions: Vec::new(),
            settings,
            next_session_number: 1,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    fn joinable_index(&self) -> Option<usize> {
        self.sessions.iter().position(|session| session.is_joinable())
    }

    /// First joinable session in pool order
    pub fn find_joinable(&self) -> Option<&S> {
        self.joinable_index().map(|index| &self.sessions[index])
    }

    /// Appends a fresh session with a new unique name
    pub fn create_session(&mut self) -> &mut S {
        let name = format!("S{}", self.next_session_number);
        self.next_session_number += 1;

        self.sessions.push(S::create(name, &self.settings));
        let index = self.sessions.len() - 1;
        &mut self.sessions[index]
    }

    /// Matchmaking: the first joinable session, or a newly created one
    pub fn find_or_create_joinable(&mut self) -> &mut S {
        match self.joinable_index() {
            Some(index) => &mut self.sessions[index],
            None => self.create_session(),
        }
    }

    /// Removes every session without members, keeping survivors in order.
    /// Returns how many sessions were reaped.
    pub fn sweep(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|session| {
            let keep = !session.is_empty();
            if !keep {
                info!("Reaping empty session {}", session.name());
            }
            keep
        });
        before - self.sessions.len()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&S> {
        self.sessions.iter().find(|session| session.name() == name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut S> {
        self.sessions.iter_mut().find(|session| session.name() == name)
    }

    pub fn find_owning_session(&self, player_id: PlayerId) -> Option<&S> {
        self.sessions
            .iter()
            .find(|session| session.contains_player(player_id))
    }

    pub fn find_owning_session_mut(&mut self, player_id: PlayerId) -> Option<&mut S> {
        self.sessions
            .iter_mut()
            .find(|session| session.contains_player(player_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
