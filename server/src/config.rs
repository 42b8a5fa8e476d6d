use crate::session::SessionSettings;
use std::time::Duration;

/// Runtime configuration for the matchmaking server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub host: String,
    /// Port used by the binary when calling `Server::start`
    pub port: u16,
    /// How often empty sessions are reaped
    pub sweep_interval: Duration,
    /// Parameters every new session is created with
    pub session: SessionSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            sweep_interval: Duration::from_secs(shared::SWEEP_INTERVAL_SECS),
            session: SessionSettings::default(),
        }
    }
}
