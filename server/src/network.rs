//! Server network layer handling WebSocket connections and router coordination

use crate::config::ServerConfig;
use crate::connection::{Connection, ConnectionId};
use crate::error::ServerError;
use crate::game::SnakeSession;
use crate::router::Router;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// Events sent from connection tasks to the router task
#[derive(Debug)]
pub enum ServerEvent {
    FrameReceived { connection: Connection, text: String },
    ConnectionClosed { connection_id: ConnectionId },
}

struct RunningServer {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
}

/// Matchmaking server: accepts WebSocket clients and feeds their frames to
/// a single router task
pub struct Server {
    config: ServerConfig,
    running: Option<RunningServer>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            running: None,
        }
    }

    /// Binds the listener and spawns the accept loop and the router task.
    /// Port 0 picks a free port; the bound address is returned.
    pub async fn start(&mut self, port: u16) -> Result<SocketAddr, ServerError> {
        if let Some(running) = &self.running {
            return Err(ServerError::AlreadyStarted(running.local_addr));
        }
        if self.config.sweep_interval.is_zero() {
            return Err(ServerError::InvalidSweepInterval);
        }

        let addr = format!("{}:{}", self.config.host, port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let router = Router::<SnakeSession>::new(self.config.session);
        tokio::spawn(run_router(
            router,
            event_rx,
            self.config.clone(),
            shutdown_rx.clone(),
        ));
        tokio::spawn(accept_loop(listener, event_tx, shutdown_rx));

        info!("Server listening on {}", local_addr);
        self.running = Some(RunningServer {
            local_addr,
            shutdown_tx,
        });

        Ok(local_addr)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|running| running.local_addr)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Stops accepting connections and shuts down the router task and open
    /// connections. Does nothing if the server is not running.
    pub fn close(&mut self) {
        if let Some(running) = self.running.take() {
            // Receivers may already be gone if every task has exited
            let _ = running.shutdown_tx.send(true);
            info!("Server on {} closed", running.local_addr);
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.close();
    }
}

/// Owns the router; every state mutation happens on this task
async fn run_router(
    mut router: Router<SnakeSession>,
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
    config: ServerConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut sweep_timer = interval(config.sweep_interval);
    sweep_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Skip the first tick since it fires immediately
    sweep_timer.tick().await;

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(ServerEvent::FrameReceived { connection, text }) => {
                        router.handle_frame(&connection, &text);
                    }
                    Some(ServerEvent::ConnectionClosed { connection_id }) => {
                        router.handle_disconnect(connection_id);
                    }
                    None => break,
                }
            }

            _ = sweep_timer.tick() => {
                let reaped = router.sweep();
                debug!(
                    "Sweep reaped {} sessions, {} live, {} bound connections",
                    reaped,
                    router.pool().len(),
                    router.registry().len()
                );
            }

            _ = shutdown.changed() => break,
        }
    }

    info!("Router shutting down");
}

async fn accept_loop(
    listener: TcpListener,
    events: mpsc::UnboundedSender<ServerEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut next_connection_id: u64 = 1;

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, addr)) => {
                        let connection_id = ConnectionId(next_connection_id);
                        next_connection_id += 1;
                        tokio::spawn(handle_connection(
                            stream,
                            addr,
                            connection_id,
                            events.clone(),
                            shutdown.clone(),
                        ));
                    }
                    Err(e) => {
                        error!("Accept error: {}", e);
                        // Back off so a persistent error such as EMFILE doesn't spin
                        sleep(Duration::from_millis(100)).await;
                    }
                }
            }

            _ = shutdown.changed() => break,
        }
    }

    info!("Listener stopped accepting connections");
}

/// Reads frames from one client until it goes away, then reports the close
/// exactly once
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    connection_id: ConnectionId,
    events: mpsc::UnboundedSender<ServerEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake failed for {}: {}", addr, e);
            return;
        }
    };
    info!("Connection {} opened from {}", connection_id, addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    let connection = Connection::new(connection_id, outbound_tx);

    let writer = tokio::spawn(async move {
        while let Some(text) = outbound_rx.recv().await {
            if let Err(e) = ws_sender.send(Message::Text(text)).await {
                warn!("Failed to write to {}: {}", connection_id, e);
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    loop {
        tokio::select! {
            frame = ws_receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let event = ServerEvent::FrameReceived {
                            connection: connection.clone(),
                            text,
                        };
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    // Binary frames are not part of the protocol
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Read error on {}: {}", connection_id, e);
                        break;
                    }
                }
            }

            _ = shutdown.changed() => break,
        }
    }

    let _ = events.send(ServerEvent::ConnectionClosed { connection_id });
    writer.abort();
    info!("Connection {} closed", connection_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_server_starts_closed() {
        let server = Server::new(test_config());
        assert!(!server.is_running());
        assert!(server.local_addr().is_none());
    }

    #[test]
    fn test_close_before_start_is_noop() {
        let mut server = Server::new(test_config());
        server.close();
        server.close();
        assert!(!server.is_running());
    }

    #[tokio::test]
    async fn test_start_binds_ephemeral_port() {
        let mut server = Server::new(test_config());
        let addr = assert_ok!(server.start(0).await);

        assert_ne!(addr.port(), 0);
        assert_eq!(server.local_addr(), Some(addr));

        server.close();
        assert!(!server.is_running());
        server.close();
    }

    #[tokio::test]
    async fn test_zero_sweep_interval_is_rejected() {
        let mut server = Server::new(ServerConfig {
            sweep_interval: Duration::ZERO,
            ..test_config()
        });

        match server.start(0).await {
            Err(ServerError::InvalidSweepInterval) => {}
            other => panic!("Unexpected start result: {:?}", other),
        }
        assert!(!server.is_running());
        assert!(server.local_addr().is_none());
    }

    #[tokio::test]
    async fn test_double_start_is_rejected() {
        let mut server = Server::new(test_config());
        let addr = server.start(0).await.unwrap();

        match server.start(0).await {
            Err(ServerError::AlreadyStarted(running)) => assert_eq!(running, addr),
            other => panic!("Unexpected start result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_start_after_close_rebinds() {
        let mut server = Server::new(test_config());
        assert_ok!(server.start(0).await);
        server.close();

        let addr = assert_ok!(server.start(0).await);
        assert_eq!(server.local_addr(), Some(addr));
    }

    #[tokio::test]
    async fn test_router_task_handles_events() {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let router = Router::<SnakeSession>::new(ServerConfig::default().session);
        let task = tokio::spawn(run_router(
            router,
            event_rx,
            test_config(),
            shutdown_rx,
        ));

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
        let connection = Connection::new(ConnectionId(1), outbound_tx);
        event_tx
            .send(ServerEvent::FrameReceived {
                connection,
                text: r#"{"name": "JoinSession"}"#.to_string(),
            })
            .unwrap();

        let reply = outbound_rx.recv().await.unwrap();
        assert!(reply.contains("\"sessionName\":\"S1\""));

        event_tx
            .send(ServerEvent::ConnectionClosed {
                connection_id: ConnectionId(1),
            })
            .unwrap();

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
    }
}
