//! Wire protocol definitions
//!
//! Line-oriented text protocol: every message is one newline-terminated
//! UTF-8 line, parsed by fixed prefix match followed by bounded splits.
//! `ClientCommand` models inbound lines, `ServerLine` models outbound
//! lines and renders them through `Display`.

use std::fmt;

use crate::error::{MalformedDirective, RegistrationError};

/// Usage text returned for `GET_INSTRUCTIONS` (single line).
pub const INSTRUCTIONS_TEXT: &str = "Send a plain line to deliver it to everyone. \
    INCLUDE:user1,user2:message delivers only to the listed users and echoes back to you. \
    EXCLUDE:user1,user2:message delivers to everyone except the listed users. \
    GET_BANNED_WORDS lists the phrases the server rejects.";

const INCLUDE_PREFIX: &str = "INCLUDE:";
const EXCLUDE_PREFIX: &str = "EXCLUDE:";

/// Client → Server line
///
/// One parsed inbound line from an active session. The first line of a
/// connection is the registration name and never reaches this parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Request the banned-phrase list
    GetBannedWords,
    /// Request the usage text
    GetInstructions,
    /// Deliver to everyone
    Broadcast { body: String },
    /// Deliver only to the named users (plus the sender)
    Include { targets: Vec<String>, body: String },
    /// Deliver to everyone except the named users
    Exclude { targets: Vec<String>, body: String },
    /// Directive missing its second `:` separator
    Malformed(MalformedDirective),
}

/// Parse one inbound line.
///
/// Classification priority: literal directives first, then the
/// `INCLUDE:`/`EXCLUDE:` prefixes, otherwise the whole line is a
/// broadcast payload.
pub fn parse_line(line: &str) -> ClientCommand {
    if line == "GET_BANNED_WORDS" {
        return ClientCommand::GetBannedWords;
    }
    if line == "GET_INSTRUCTIONS" {
        return ClientCommand::GetInstructions;
    }
    if let Some(rest) = line.strip_prefix(INCLUDE_PREFIX) {
        return match split_directive(rest) {
            Some((targets, body)) => ClientCommand::Include { targets, body },
            None => ClientCommand::Malformed(MalformedDirective::Include),
        };
    }
    if let Some(rest) = line.strip_prefix(EXCLUDE_PREFIX) {
        return match split_directive(rest) {
            Some((targets, body)) => ClientCommand::Exclude { targets, body },
            None => ClientCommand::Malformed(MalformedDirective::Exclude),
        };
    }
    ClientCommand::Broadcast {
        body: line.to_string(),
    }
}

/// Split a directive remainder into its name list and body.
///
/// The remainder is trimmed, then split on the first `:`; each name in
/// the comma-separated list is trimmed individually.
fn split_directive(rest: &str) -> Option<(Vec<String>, String)> {
    let (names, body) = rest.trim().split_once(':')?;
    let targets = names.split(',').map(|name| name.trim().to_string()).collect();
    Some((targets, body.to_string()))
}

/// Server → Client line
///
/// Everything the server can put on the wire. The write task renders
/// each value with `Display` and appends the newline.
#[derive(Debug, Clone)]
pub enum ServerLine {
    /// A routed chat message, prefixed with the sender's name
    Chat { from: String, body: String },
    /// Roster change notice (unscoped, no sender prefix)
    Joined(String),
    /// Roster change notice (unscoped, no sender prefix)
    Left(String),
    /// Full current roster
    UserList(Vec<String>),
    /// Reply to `GET_BANNED_WORDS`
    BannedWords(Vec<String>),
    /// Reply to `GET_INSTRUCTIONS`
    Instructions,
    /// Sender-only rejection of a message that matched the filter
    Rejected(Vec<String>),
    /// Registration or directive-format failure
    Error(String),
}

impl fmt::Display for ServerLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerLine::Chat { from, body } => write!(f, "{}: {}", from, body),
            ServerLine::Joined(name) => write!(f, "{} has joined the chat!", name),
            ServerLine::Left(name) => write!(f, "{} has left the chat.", name),
            ServerLine::UserList(names) => write!(f, "USER_LIST:{}", names.join(",")),
            ServerLine::BannedWords(phrases) => write!(f, "BANNED_WORDS:{}", phrases.join(",")),
            ServerLine::Instructions => write!(f, "INSTRUCTIONS:{}", INSTRUCTIONS_TEXT),
            ServerLine::Rejected(matches) => write!(
                f,
                "BANNED: Message contains banned phrases: {}",
                matches.join(", ")
            ),
            ServerLine::Error(detail) => write!(f, "ERROR: {}", detail),
        }
    }
}

/// Convert a registration rejection into its wire line
impl From<RegistrationError> for ServerLine {
    fn from(err: RegistrationError) -> Self {
        ServerLine::Error(err.to_string())
    }
}

/// Convert a malformed directive report into its wire line
impl From<MalformedDirective> for ServerLine {
    fn from(err: MalformedDirective) -> Self {
        ServerLine::Error(err.to_string())
    }
}
