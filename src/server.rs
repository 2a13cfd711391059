//! ChatServer Actor implementation
//!
//! The central actor owning all shared state: the session registry and
//! the banned-phrase filter. Uses the Actor pattern with mpsc channels
//! for message passing; commands are processed one at a time, which
//! serializes every registry mutation and every broadcast enumeration.

use std::collections::HashSet;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::{MalformedDirective, RegistrationError};
use crate::filter::PhraseFilter;
use crate::protocol::ServerLine;
use crate::registry::Registry;
use crate::session::Session;

/// Commands sent from connection handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// First line of a connection: claim a display name.
    /// The outcome is reported back on `respond_to`; on rejection the
    /// error line is also queued on `sender` before it is dropped.
    Register {
        name: String,
        sender: mpsc::Sender<ServerLine>,
        respond_to: oneshot::Sender<Result<(), RegistrationError>>,
    },
    /// Deliver a message to everyone
    Broadcast { name: String, body: String },
    /// Deliver a message only to the named users (plus the sender)
    Include {
        name: String,
        targets: Vec<String>,
        body: String,
    },
    /// Deliver a message to everyone except the named users
    Exclude {
        name: String,
        targets: Vec<String>,
        body: String,
    },
    /// Request the banned-phrase list
    GetBannedWords { name: String },
    /// Request the usage text
    GetInstructions { name: String },
    /// Report a directive that failed to parse
    Malformed {
        name: String,
        directive: MalformedDirective,
    },
    /// Connection ended; tear the session down
    Disconnect { name: String },
}

/// The main ChatServer actor
///
/// Owns the registry and the phrase filter. Because all access goes
/// through its command loop, no locks are needed and every delivery
/// sees a consistent roster.
pub struct ChatServer {
    registry: Registry,
    filter: PhraseFilter,
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer from the loaded configuration and the
    /// given command receiver
    pub fn new(config: &ServerConfig, receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            registry: Registry::new(),
            filter: PhraseFilter::new(config.banned_phrases.iter().cloned()),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders
    /// are dropped.
    pub async fn run(mut self) {
        info!("chat server started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("chat server shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Register {
                name,
                sender,
                respond_to,
            } => {
                self.handle_register(name, sender, respond_to);
            }
            ServerCommand::Broadcast { name, body } => {
                self.handle_broadcast(name, body);
            }
            ServerCommand::Include {
                name,
                targets,
                body,
            } => {
                self.handle_include(name, targets, body);
            }
            ServerCommand::Exclude {
                name,
                targets,
                body,
            } => {
                self.handle_exclude(name, targets, body);
            }
            ServerCommand::GetBannedWords { name } => {
                self.handle_get_banned_words(&name);
            }
            ServerCommand::GetInstructions { name } => {
                self.handle_get_instructions(&name);
            }
            ServerCommand::Malformed { name, directive } => {
                self.handle_malformed(&name, directive);
            }
            ServerCommand::Disconnect { name } => {
                self.handle_disconnect(&name);
            }
        }
    }

    /// Handle a registration attempt
    fn handle_register(
        &mut self,
        name: String,
        sender: mpsc::Sender<ServerLine>,
        respond_to: oneshot::Sender<Result<(), RegistrationError>>,
    ) {
        let matches: Vec<String> = self
            .filter
            .scan(&name)
            .into_iter()
            .map(|m| m.to_string())
            .collect();

        let session = Session::new(name, sender);

        if !matches.is_empty() {
            warn!("registration rejected for '{}': banned name", session.name);
            let err = RegistrationError::BannedName(matches);
            let _ = session.send(err.clone().into());
            let _ = respond_to.send(Err(err));
            return;
        }

        let name = session.name.clone();
        if let Err((err, rejected)) = self.registry.register(session) {
            warn!("registration rejected for '{}': name taken", rejected.name);
            let _ = rejected.send(err.clone().into());
            let _ = respond_to.send(Err(err));
            return;
        }

        info!("'{}' joined", name);
        self.registry
            .broadcast_all(&ServerLine::Joined(name), None);
        self.broadcast_user_list();
        debug!("total clients: {}", self.registry.len());
        let _ = respond_to.send(Ok(()));
    }

    /// Screen a payload; on a match notify only the sender.
    ///
    /// Returns true if the message was rejected and must not be routed.
    fn reject_if_banned(&self, sender: &str, body: &str) -> bool {
        let matches: Vec<String> = self
            .filter
            .scan(body)
            .into_iter()
            .map(|m| m.to_string())
            .collect();
        if matches.is_empty() {
            return false;
        }
        debug!("message from '{}' rejected: {:?}", sender, matches);
        self.registry.send_to(sender, ServerLine::Rejected(matches));
        true
    }

    /// Handle an unscoped chat message
    fn handle_broadcast(&mut self, name: String, body: String) {
        if !self.registry.contains(&name) {
            return;
        }
        if self.reject_if_banned(&name, &body) {
            return;
        }
        self.registry
            .broadcast_all(&ServerLine::Chat { from: name, body }, None);
    }

    /// Handle an include-scoped chat message
    fn handle_include(&mut self, name: String, targets: Vec<String>, body: String) {
        if !self.registry.contains(&name) {
            return;
        }
        if self.reject_if_banned(&name, &body) {
            return;
        }
        // The sender always gets an echo; folding them into the
        // recipient set delivers exactly one copy even if they listed
        // themselves.
        let mut recipients: HashSet<String> = targets.into_iter().collect();
        recipients.insert(name.clone());
        self.registry
            .deliver_to(&recipients, &ServerLine::Chat { from: name, body });
    }

    /// Handle an exclude-scoped chat message
    fn handle_exclude(&mut self, name: String, targets: Vec<String>, body: String) {
        if !self.registry.contains(&name) {
            return;
        }
        if self.reject_if_banned(&name, &body) {
            return;
        }
        // The sender is not excluded from their own message unless they
        // named themselves.
        let excluded: HashSet<String> = targets.into_iter().collect();
        self.registry
            .broadcast_all(&ServerLine::Chat { from: name, body }, Some(&excluded));
    }

    /// Reply privately with the banned-phrase list
    fn handle_get_banned_words(&self, name: &str) {
        let phrases = self.filter.phrases().to_vec();
        self.registry.send_to(name, ServerLine::BannedWords(phrases));
    }

    /// Reply privately with the usage text
    fn handle_get_instructions(&self, name: &str) {
        self.registry.send_to(name, ServerLine::Instructions);
    }

    /// Reply privately with a directive-format error
    fn handle_malformed(&self, name: &str, directive: MalformedDirective) {
        debug!("malformed {:?} directive from '{}'", directive, name);
        self.registry.send_to(name, directive.into());
    }

    /// Handle session teardown after a connection ended
    fn handle_disconnect(&mut self, name: &str) {
        if !self.registry.deregister(name) {
            return;
        }
        info!("'{}' left", name);
        if self.filter.scan(name).is_empty() {
            self.registry
                .broadcast_all(&ServerLine::Left(name.to_string()), None);
        }
        self.broadcast_user_list();
        debug!("total clients: {}", self.registry.len());
    }

    /// Broadcast the current roster to everyone
    fn broadcast_user_list(&self) {
        let names = self.registry.snapshot_names();
        self.registry
            .broadcast_all(&ServerLine::UserList(names), None);
    }
}
