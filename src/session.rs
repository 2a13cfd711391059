//! Session struct definition
//!
//! Represents one connected, named client: an identity plus the
//! outbound sink used to deliver protocol lines.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::protocol::ServerLine;

/// Connected, named client
///
/// The registry holds one Session per active name. The sink feeds the
/// connection's write task; it is never read from outside the handler.
#[derive(Debug)]
pub struct Session {
    /// Registered display name, unique while active
    pub name: String,
    /// Server → client line channel
    sender: mpsc::Sender<ServerLine>,
}

impl Session {
    /// Create a new session with the given name and sender channel
    pub fn new(name: impl Into<String>, sender: mpsc::Sender<ServerLine>) -> Self {
        Self {
            name: name.into(),
            sender,
        }
    }

    /// Queue a line for delivery to this client.
    ///
    /// Non-blocking: a full buffer or a closed channel returns an error
    /// instead of stalling the caller, so a slow client never holds up
    /// delivery to anyone else.
    pub fn send(&self, line: ServerLine) -> Result<(), SendError> {
        self.sender.try_send(line).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => SendError::Full,
            mpsc::error::TrySendError::Closed(_) => SendError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_queues_line() {
        let (tx, mut rx) = mpsc::channel(4);
        let session = Session::new("alice", tx);

        session.send(ServerLine::Joined("alice".to_string())).unwrap();

        let line = rx.try_recv().unwrap();
        assert_eq!(line.to_string(), "alice has joined the chat!");
    }

    #[test]
    fn test_send_to_closed_channel() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let session = Session::new("alice", tx);

        let err = session.send(ServerLine::Instructions).unwrap_err();
        assert!(matches!(err, SendError::Closed));
    }

    #[test]
    fn test_send_to_full_channel() {
        let (tx, _rx) = mpsc::channel(1);
        let session = Session::new("alice", tx);

        session.send(ServerLine::Instructions).unwrap();
        let err = session.send(ServerLine::Instructions).unwrap_err();
        assert!(matches!(err, SendError::Full));
    }
}
