//! Session registry
//!
//! The single shared table of active sessions keyed by name. The raw
//! map is never exposed; every operation is atomic from the caller's
//! point of view because the registry is owned by the `ChatServer`
//! actor, which processes one command at a time. A broadcast therefore
//! always observes a consistent roster that no concurrent register or
//! deregister can change mid-enumeration.

use std::collections::{HashMap, HashSet};

use crate::error::RegistrationError;
use crate::protocol::ServerLine;
use crate::session::Session;

/// Name → Session table with guarded operations
///
/// Invariant: at most one session per name at any instant.
#[derive(Debug, Default)]
pub struct Registry {
    sessions: HashMap<String, Session>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Insert a session under its name.
    ///
    /// Fails with `NameTaken` if the name already has an active session,
    /// handing the rejected session back so the caller can deliver the
    /// error through its sink. The existing session is left untouched.
    pub fn register(&mut self, session: Session) -> Result<(), (RegistrationError, Session)> {
        if self.sessions.contains_key(&session.name) {
            let err = RegistrationError::NameTaken(session.name.clone());
            return Err((err, session));
        }
        self.sessions.insert(session.name.clone(), session);
        Ok(())
    }

    /// Remove the session for `name`, if present.
    ///
    /// Returns whether an entry was removed; no-op otherwise.
    pub fn deregister(&mut self, name: &str) -> bool {
        self.sessions.remove(name).is_some()
    }

    /// Whether `name` currently has an active session
    pub fn contains(&self, name: &str) -> bool {
        self.sessions.contains_key(name)
    }

    /// Number of active sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the registry has no active sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Point-in-time listing of all registered names, sorted for
    /// deterministic enumeration.
    pub fn snapshot_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sessions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Deliver `line` to every session whose name is not in `excluding`.
    ///
    /// Delivery is best-effort; sessions with a closed or saturated sink
    /// are skipped.
    pub fn broadcast_all(&self, line: &ServerLine, excluding: Option<&HashSet<String>>) {
        for (name, session) in &self.sessions {
            if let Some(excluded) = excluding {
                if excluded.contains(name) {
                    continue;
                }
            }
            let _ = session.send(line.clone());
        }
    }

    /// Deliver `line` only to sessions whose name is in `names`.
    ///
    /// Names with no matching session are silently skipped; they may
    /// have disconnected mid-request.
    pub fn deliver_to(&self, names: &HashSet<String>, line: &ServerLine) {
        for name in names {
            if let Some(session) = self.sessions.get(name) {
                let _ = session.send(line.clone());
            }
        }
    }

    /// Deliver `line` to a single named session.
    ///
    /// Returns whether the line was queued.
    pub fn send_to(&self, name: &str, line: ServerLine) -> bool {
        match self.sessions.get(name) {
            Some(session) => session.send(line).is_ok(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::sync::mpsc;

    fn session(name: &str) -> (Session, mpsc::Receiver<ServerLine>) {
        let (tx, rx) = mpsc::channel(16);
        (Session::new(name, tx), rx)
    }

    fn received(rx: &mut mpsc::Receiver<ServerLine>) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line.to_string());
        }
        lines
    }

    fn names(items: &[&str]) -> HashSet<String> {
        items.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_register_and_snapshot() {
        let mut registry = Registry::new();
        let (alice, _rx_a) = session("alice");
        let (bob, _rx_b) = session("bob");

        registry.register(bob).unwrap();
        registry.register(alice).unwrap();

        assert_eq!(registry.snapshot_names(), vec!["alice", "bob"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected_and_original_untouched() {
        let mut registry = Registry::new();
        let (first, mut rx_first) = session("alice");
        let (second, _rx_second) = session("alice");

        registry.register(first).unwrap();
        let (err, rejected) = registry.register(second).unwrap_err();

        assert_eq!(err, RegistrationError::NameTaken("alice".to_string()));
        assert_eq!(rejected.name, "alice");
        assert_eq!(registry.snapshot_names(), vec!["alice"]);

        // The surviving entry is still the first session's sink.
        registry.send_to("alice", ServerLine::Instructions);
        assert_eq!(received(&mut rx_first).len(), 1);
    }

    #[test]
    fn test_deregister() {
        let mut registry = Registry::new();
        let (alice, _rx) = session("alice");
        registry.register(alice).unwrap();

        assert!(registry.deregister("alice"));
        assert!(!registry.deregister("alice"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_broadcast_all_with_exclusions() {
        let mut registry = Registry::new();
        let (alice, mut rx_a) = session("alice");
        let (bob, mut rx_b) = session("bob");
        let (carol, mut rx_c) = session("carol");
        registry.register(alice).unwrap();
        registry.register(bob).unwrap();
        registry.register(carol).unwrap();

        let line = ServerLine::Chat {
            from: "alice".to_string(),
            body: "hi".to_string(),
        };
        registry.broadcast_all(&line, Some(&names(&["bob"])));

        assert_eq!(received(&mut rx_a), vec!["alice: hi"]);
        assert!(received(&mut rx_b).is_empty());
        assert_eq!(received(&mut rx_c), vec!["alice: hi"]);
    }

    #[test]
    fn test_deliver_to_skips_unknown_names() {
        let mut registry = Registry::new();
        let (alice, mut rx_a) = session("alice");
        let (bob, mut rx_b) = session("bob");
        registry.register(alice).unwrap();
        registry.register(bob).unwrap();

        let line = ServerLine::Chat {
            from: "alice".to_string(),
            body: "hi".to_string(),
        };
        registry.deliver_to(&names(&["bob", "ghost"]), &line);

        assert!(received(&mut rx_a).is_empty());
        assert_eq!(received(&mut rx_b), vec!["alice: hi"]);
    }

    #[test]
    fn test_send_to_missing_session() {
        let registry = Registry::new();
        assert!(!registry.send_to("nobody", ServerLine::Instructions));
    }
}
