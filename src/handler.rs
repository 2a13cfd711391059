//! TCP connection handler
//!
//! Handles one client connection: name registration, the line read
//! loop, and the write task that drains the session's outbound channel
//! to the socket.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::protocol::{self, ClientCommand, ServerLine};
use crate::server::ServerCommand;

/// Outbound channel depth per connection. A client that falls this far
/// behind starts losing lines rather than stalling delivery to others.
const OUTBOUND_BUFFER: usize = 32;

/// Handle a new TCP connection
///
/// Reads the registration line, claims the name with the server actor,
/// then relays parsed protocol lines until the connection ends. On any
/// exit path the session is deregistered and the departure announced.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("new TCP connection from {}", peer_addr);

    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // Write task (ServerLine -> socket). Owns the write half; ends when
    // every sender for this channel is gone.
    let (msg_tx, mut msg_rx) = mpsc::channel::<ServerLine>(OUTBOUND_BUFFER);
    let write_task = tokio::spawn(async move {
        while let Some(line) = msg_rx.recv().await {
            let framed = format!("{}\n", line);
            if write_half.write_all(framed.as_bytes()).await.is_err() {
                debug!("socket write failed, ending write task");
                break;
            }
        }
        debug!("write task ended");
        let _ = write_half.shutdown().await;
    });

    // First line is the requested display name.
    let Some(first) = lines.next_line().await? else {
        debug!("{} closed before registering", peer_addr);
        return Ok(());
    };
    let name = first.trim_end_matches('\r').to_string();

    let (resp_tx, resp_rx) = oneshot::channel();
    let register = ServerCommand::Register {
        name: name.clone(),
        sender: msg_tx,
        respond_to: resp_tx,
    };
    if cmd_tx.send(register).await.is_err() {
        error!("failed to register '{}' - server closed", name);
        return Err(AppError::ChannelSend);
    }

    match resp_rx.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            info!("registration rejected for {}: {}", peer_addr, err);
            // The rejection line is already queued; let the writer
            // flush it before the connection drops.
            let _ = write_task.await;
            return Ok(());
        }
        Err(_) => return Err(AppError::ChannelSend),
    }

    info!("'{}' registered from {}", name, peer_addr);

    // Read task (socket lines -> ServerCommand).
    let cmd_tx_read = cmd_tx.clone();
    let read_name = name.clone();
    let read_task = tokio::spawn(async move {
        loop {
            match lines.next_line().await {
                Ok(Some(raw)) => {
                    let line = raw.trim_end_matches('\r');
                    let cmd = command_for(&read_name, protocol::parse_line(line));
                    if cmd_tx_read.send(cmd).await.is_err() {
                        debug!("server closed, ending read task for '{}'", read_name);
                        break;
                    }
                }
                Ok(None) => {
                    debug!("'{}' reached end of stream", read_name);
                    break;
                }
                Err(e) => {
                    warn!("read error for '{}': {}", read_name, e);
                    break;
                }
            }
        }
    });

    // Either side ending tears the session down.
    tokio::select! {
        _ = read_task => {
            debug!("read task completed for '{}'", name);
        }
        _ = write_task => {
            debug!("write task completed for '{}'", name);
        }
    }

    // Only the handler that registered this name deregisters it; the
    // registry drops the session sender, which ends the write task.
    let _ = cmd_tx
        .send(ServerCommand::Disconnect { name: name.clone() })
        .await;

    info!("'{}' disconnected", name);

    Ok(())
}

/// Convert a parsed ClientCommand to a ServerCommand
fn command_for(name: &str, cmd: ClientCommand) -> ServerCommand {
    let name = name.to_string();
    match cmd {
        ClientCommand::GetBannedWords => ServerCommand::GetBannedWords { name },
        ClientCommand::GetInstructions => ServerCommand::GetInstructions { name },
        ClientCommand::Broadcast { body } => ServerCommand::Broadcast { name, body },
        ClientCommand::Include { targets, body } => ServerCommand::Include {
            name,
            targets,
            body,
        },
        ClientCommand::Exclude { targets, body } => ServerCommand::Exclude {
            name,
            targets,
            body,
        },
        ClientCommand::Malformed(directive) => ServerCommand::Malformed { name, directive },
    }
}
