//! Server configuration
//!
//! The configuration object consumed once at startup: listen port,
//! display name of the server, and the banned-phrase list. Loaded from
//! a JSON file whose path is passed on the command line, with built-in
//! defaults when no path is given.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

/// Static server configuration
///
/// Loaded before the listener starts and never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Port the listener binds
    pub port: u16,
    /// Display name used in startup logging
    pub server_name: String,
    /// Phrases rejected in names and message payloads
    pub banned_phrases: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            server_name: "Chat Relay".to_string(),
            banned_phrases: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Address string for the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let raw = r#"{
            "port": 5000,
            "serverName": "Main Chat Server",
            "bannedPhrases": ["spam", "wine"]
        }"#;
        let config: ServerConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.server_name, "Main Chat Server");
        assert_eq!(config.banned_phrases, vec!["spam", "wine"]);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ServerConfig = serde_json::from_str(r#"{"port": 4000}"#).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.server_name, "Chat Relay");
        assert!(config.banned_phrases.is_empty());
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig {
            port: 7777,
            ..ServerConfig::default()
        };
        assert_eq!(config.bind_addr(), "0.0.0.0:7777");
    }
}
