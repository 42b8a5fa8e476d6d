use crate::connection::Connection;
use crate::session::{GameSession, SessionPlayer, SessionSettings};
use log::{debug, info};
use rand::Rng;
use shared::{Direction, PlayerId, SessionState};

const INITIAL_LENGTH: u32 = 3;

#[derive(Debug, Clone)]
pub struct Snake {
    pub id: PlayerId,
    pub connection: Connection,
    pub head: (u32, u32),
    pub direction: Direction,
    pub length: u32,
    pub alive: bool,
}

impl Snake {
    fn respawn(&mut self, field_width: u32, field_height: u32) {
        let mut rng = rand::thread_rng();
        self.head = (
            rng.gen_range(0..field_width.max(1)),
            rng.gen_range(0..field_height.max(1)),
        );
        self.direction = Direction::Right;
        self.length = INITIAL_LENGTH;
        self.alive = true;
    }
}

impl SessionPlayer for Snake {
    fn create(id: PlayerId, connection: Connection) -> Self {
        Self {
            id,
            connection,
            head: (0, 0),
            direction: Direction::Right,
            length: INITIAL_LENGTH,
            alive: false,
        }
    }

    fn id(&self) -> PlayerId {
        self.id
    }

    fn change_direction(&mut self, direction: Direction) {
        // A snake cannot turn back into its own body
        if self.length > 1 && direction == self.direction.opposite() {
            debug!("Ignoring reversal to {:?} for player {}", direction, self.id);
            return;
        }
        self.direction = direction;
    }
}

/// Default session: a shared snake arena
#[derive(Debug)]
pub struct SnakeSession {
    name: String,
    state: SessionState,
    field_width: u32,
    field_height: u32,
    max_players: usize,
    snakes: Vec<Snake>,
}

impl SnakeSession {
    pub fn end(&mut self) {
        self.state = SessionState::Ended;
    }

    pub fn snake(&self, id: PlayerId) -> Option<&Snake> {
        self.snakes.iter().find(|snake| snake.id == id)
    }
}

impl GameSession for SnakeSession {
    type Player = Snake;

    fn create(name: String, settings: &SessionSettings) -> Self {
        info!(
            "Created session {} ({}x{}, up to {} players)",
            name, settings.field_width, settings.field_height, settings.max_players
        );
        Self {
            name,
            state: SessionState::Waiting,
            field_width: settings.field_width,
            field_height: settings.field_height,
            max_players: settings.max_players,
            snakes: Vec::new(),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> SessionState {
        self.state
    }

    fn field_width(&self) -> u32 {
        self.field_width
    }

    fn field_height(&self) -> u32 {
        self.field_height
    }

    fn member_count(&self) -> usize {
        self.snakes.len()
    }

    fn is_joinable(&self) -> bool {
        self.state.accepts_players() && self.snakes.len() < self.max_players
    }

    fn add_player(&mut self, mut player: Snake) {
        player.respawn(self.field_width, self.field_height);
        info!(
            "Added player {} to session {} at ({}, {})",
            player.id, self.name, player.head.0, player.head.1
        );
        self.snakes.push(player);

        if self.state == SessionState::Waiting {
            self.state = SessionState::Running;
        }
    }

    fn remove_player_by_id(&mut self, id: PlayerId) -> bool {
        let before = self.snakes.len();
        self.snakes.retain(|snake| snake.id != id);
        let removed = self.snakes.len() < before;
        if removed {
            info!("Removed player {} from session {}", id, self.name);
        }
        removed
    }

    fn respawn_player_by_id(&mut self, id: PlayerId) -> bool {
        let (width, height) = (self.field_width, self.field_height);
        match self.player_mut(id) {
            Some(snake) => {
                snake.respawn(width, height);
                true
            }
            None => false,
        }
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Snake> {
        self.snakes.iter_mut().find(|snake| snake.id == id)
    }

    fn contains_player(&self, id: PlayerId) -> bool {
        self.snakes.iter().any(|snake| snake.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionId;
    use tokio::sync::mpsc;

    fn test_snake(conn: u64) -> Snake {
        let (tx, _rx) = mpsc::unbounded_channel();
        Snake::create(
            PlayerId::generate(),
            Connection::new(ConnectionId(conn), tx),
        )
    }

    fn test_session(max_players: usize) -> SnakeSession {
        SnakeSession::create(
            "S1".to_string(),
            &SessionSettings {
                field_width: 20,
                field_height: 10,
                max_players,
            },
        )
    }

    #[test]
    fn test_session_creation() {
        let session = test_session(4);
        assert_eq!(session.name(), "S1");
        assert_eq!(session.state(), SessionState::Waiting);
        assert_eq!(session.field_width(), 20);
        assert_eq!(session.field_height(), 10);
        assert!(session.is_empty());
        assert!(session.is_joinable());
    }

    #[test]
    fn test_add_player_spawns_inside_field() {
        let mut session = test_session(4);
        let snake = test_snake(1);
        let id = snake.id;

        session.add_player(snake);

        let snake = session.snake(id).unwrap();
        assert!(snake.alive);
        assert!(snake.head.0 < 20);
        assert!(snake.head.1 < 10);
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_capacity_limits_joinability() {
        let mut session = test_session(2);
        session.add_player(test_snake(1));
        assert!(session.is_joinable());

        session.add_player(test_snake(2));
        assert!(!session.is_joinable());
        assert_eq!(session.member_count(), 2);
    }

    #[test]
    fn test_ended_session_is_not_joinable() {
        let mut session = test_session(4);
        session.end();
        assert!(!session.is_joinable());
    }

    #[test]
    fn test_remove_player_by_id() {
        let mut session = test_session(4);
        let snake = test_snake(1);
        let id = snake.id;
        session.add_player(snake);

        assert!(session.remove_player_by_id(id));
        assert!(!session.remove_player_by_id(id));
        assert!(session.is_empty());
    }

    #[test]
    fn test_respawn_resets_snake() {
        let mut session = test_session(4);
        let snake = test_snake(1);
        let id = snake.id;
        session.add_player(snake);

        {
            let snake = session.player_mut(id).unwrap();
            snake.alive = false;
            snake.length = 12;
        }

        assert!(session.respawn_player_by_id(id));
        let snake = session.snake(id).unwrap();
        assert!(snake.alive);
        assert_eq!(snake.length, INITIAL_LENGTH);

        assert!(!session.respawn_player_by_id(PlayerId::generate()));
    }

    #[test]
    fn test_change_direction_rejects_reversal() {
        let mut snake = test_snake(1);
        snake.direction = Direction::Right;

        snake.change_direction(Direction::Left);
        assert_eq!(snake.direction, Direction::Right);

        snake.change_direction(Direction::Up);
        assert_eq!(snake.direction, Direction::Up);
    }

    #[test]
    fn test_info_reflects_session() {
        let mut session = test_session(4);
        session.add_player(test_snake(1));

        let info = session.info();
        assert_eq!(info.name, "S1");
        assert_eq!(info.state, SessionState::Running);
        assert_eq!(info.field_width, 20);
        assert_eq!(info.field_height, 10);
    }
}
