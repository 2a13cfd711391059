//! Multi-user chat relay library
//!
//! A line-oriented TCP chat relay: clients register a display name and
//! exchange newline-terminated messages routed by per-message delivery
//! scope (everyone, an include-list, or an exclude-list).
//!
//! # Features
//! - Name registration with banned-phrase and uniqueness checks
//! - Global, include-scoped, and exclude-scoped message routing
//! - Banned-phrase screening of outgoing payloads
//! - Roster notices and user-list broadcasts on join/leave
//! - `GET_BANNED_WORDS` / `GET_INSTRUCTIONS` directives
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning the session registry and
//!   the phrase filter
//! - Each connection has a handler task communicating with the server
//! - No locks needed - all state access goes through message passing,
//!   so every broadcast sees a consistent roster
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chat_relay::{ChatServer, ServerConfig, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let listener = TcpListener::bind(config.bind_addr()).await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(&config, cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod handler;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;

// Re-export main types for convenience
pub use config::ServerConfig;
pub use error::{AppError, MalformedDirective, RegistrationError, SendError};
pub use filter::PhraseFilter;
pub use handler::handle_connection;
pub use protocol::{parse_line, ClientCommand, ServerLine};
pub use registry::Registry;
pub use server::{ChatServer, ServerCommand};
pub use session::Session;
