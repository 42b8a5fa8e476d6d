use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use shared::OutboundMessage;
use std::time::Duration;
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Joins a session, steers once, respawns, and disconnects
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// WebSocket URL of the server
    #[clap(short, long, default_value = "ws://127.0.0.1:8080")]
    url: String,
    /// Direction to steer after joining (up, down, left, right)
    #[clap(short, long, default_value = "up")]
    direction: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let (mut ws, _) = connect_async(args.url.as_str()).await?;
    println!("Connected to {}", args.url);

    ws.send(Message::Text(json!({"name": "JoinSession"}).to_string()))
        .await?;

    let (client_id, session_name) = loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                let message: OutboundMessage = serde_json::from_str(&text)?;
                let OutboundMessage::JoinedSession {
                    client_id,
                    session_name,
                    data,
                    ..
                } = message;
                println!(
                    "Joined {} as {} ({}x{}, {:?})",
                    session_name,
                    client_id,
                    data.session.field_width,
                    data.session.field_height,
                    data.session.state
                );
                break (client_id, session_name);
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
            None => return Err("Server closed the connection before confirming".into()),
        }
    };

    ws.send(Message::Text(
        json!({
            "name": "UserInput",
            "sessionName": session_name,
            "clientId": client_id.to_string(),
            "data": {"type": "ChangeDirection", "direction": args.direction}
        })
        .to_string(),
    ))
    .await?;
    println!("Sent direction change: {}", args.direction);

    sleep(Duration::from_millis(100)).await;

    ws.send(Message::Text(
        json!({
            "name": "UserInput",
            "sessionName": session_name,
            "clientId": client_id.to_string(),
            "data": {"type": "PerformAction", "action": "respawn"}
        })
        .to_string(),
    ))
    .await?;
    println!("Requested respawn");

    ws.close(None).await?;
    println!("Disconnected");

    Ok(())
}
