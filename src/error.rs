//! Error types for the chat relay
//!
//! Defines handler-level errors, registration rejections, malformed
//! directive reports, and session send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Handler and startup errors
///
/// Covers fatal faults on a single connection's path as well as
/// configuration loading failures at startup.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (fatal for the affected connection)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parse error
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Channel send error (fatal - the server actor is gone)
    #[error("server channel closed")]
    ChannelSend,
}

/// Registration rejections
///
/// Reported privately to the registering client before the connection
/// is closed. Never mutates shared state.
///
/// Display renders the detail part of the wire line; `ServerLine::Error`
/// adds the `ERROR: ` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The requested name contains one or more banned phrases
    #[error("Username contains banned word(s): {}", .0.join(", "))]
    BannedName(Vec<String>),

    /// The requested name already has an active session
    #[error("Username '{0}' is already taken.")]
    NameTaken(String),
}

/// Malformed delivery directives
///
/// An `INCLUDE:`/`EXCLUDE:` line missing the second `:` separator.
/// Reported privately to the sender; nothing is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedDirective {
    #[error("Invalid INCLUDE message format.")]
    Include,

    #[error("Invalid EXCLUDE message format. Correct format is EXCLUDE:username1,username2:message")]
    Exclude,
}

/// Session send errors
///
/// Occurs when delivering a line to a session's outbound channel.
/// Delivery is best-effort; callers may ignore these.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("session channel closed")]
    Closed,

    /// The outbound buffer is full (client not keeping up)
    #[error("session channel full")]
    Full,
}
