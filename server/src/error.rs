use std::net::SocketAddr;
use thiserror::Error;

/// Failures of the process control surface. Routing itself never fails.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Sweep interval must be non-zero")]
    InvalidSweepInterval,

    #[error("Server is already listening on {0}")]
    AlreadyStarted(SocketAddr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
