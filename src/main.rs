//! Chat relay server - Entry point
//!
//! Loads configuration, starts the ChatServer actor and the TCP
//! listener, and spawns one handler per accepted connection.

use std::env;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chat_relay::{handle_connection, ChatServer, ServerConfig};

/// Channel buffer size for server commands
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    // Optional config file path as the first argument
    let config = match env::args().nth(1) {
        Some(path) => ServerConfig::load(&path)?,
        None => ServerConfig::default(),
    };

    // Start TCP listener
    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("{} running on port {}", config.server_name, config.port);
    info!("{} banned phrase(s) loaded", config.banned_phrases.len());

    // Create ChatServer actor channel and start
    let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    let server = ChatServer::new(&config, cmd_rx);
    tokio::spawn(server.run());

    // Connection accept loop
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("new connection from {}", addr);
                let cmd_tx = cmd_tx.clone();

                // Spawn handler task for each connection
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, cmd_tx).await {
                        error!("connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                // Accept failure stops the server; live handlers are
                // torn down with the process.
                error!("failed to accept connection: {}", e);
                return Err(e.into());
            }
        }
    }
}
