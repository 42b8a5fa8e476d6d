//! Handle to a live client connection
//!
//! A `Connection` is what the routing layer sees of a WebSocket: a stable
//! numeric ID to key registry entries by, and a non-blocking outbound queue
//! drained by the connection's writer task. Cloning is cheap and every clone
//! refers to the same socket.

use log::{error, warn};
use shared::{encode_outbound, OutboundMessage};
use std::fmt;
use tokio::sync::mpsc;

/// Process-unique identifier of a transport connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    outbound: mpsc::UnboundedSender<String>,
}

impl Connection {
    pub fn new(id: ConnectionId, outbound: mpsc::UnboundedSender<String>) -> Self {
        Self { id, outbound }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queues a message for the writer task
    ///
    /// Never blocks. A closed queue means the socket is already going away,
    /// which the reader side reports separately as a disconnect.
    pub fn send(&self, message: &OutboundMessage) {
        let text = match encode_outbound(message) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to encode message for {}: {}", self.id, e);
                return;
            }
        };

        if self.outbound.send(text).is_err() {
            warn!("Dropping message for closed connection {}", self.id);
        }
    }
}
