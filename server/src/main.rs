use clap::Parser;
use log::info;
use server::config::ServerConfig;
use server::network::Server;
use server::session::SessionSettings;
use std::time::Duration;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Server port to listen on
    #[clap(short, long, default_value = "8080")]
    port: u16,
    /// Seconds between sweeps of empty sessions
    #[clap(long, default_value_t = shared::SWEEP_INTERVAL_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    sweep_interval_secs: u64,
    /// Width of every session's play field
    #[clap(long, default_value_t = shared::DEFAULT_FIELD_WIDTH)]
    field_width: u32,
    /// Height of every session's play field
    #[clap(long, default_value_t = shared::DEFAULT_FIELD_HEIGHT)]
    field_height: u32,
    /// Players per session before a new one is opened
    #[clap(long, default_value_t = shared::DEFAULT_MAX_PLAYERS)]
    max_players: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        sweep_interval: Duration::from_secs(args.sweep_interval_secs),
        session: SessionSettings {
            field_width: args.field_width,
            field_height: args.field_height,
            max_players: args.max_players,
        },
    };

    let mut server = Server::new(config.clone());
    server.start(config.port).await?;

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl+C, shutting down gracefully...");
    server.close();

    Ok(())
}
