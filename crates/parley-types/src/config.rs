//! Relay configuration types for Parley.
//!
//! `RelayConfig` represents the top-level `parley.toml` that lists the bots
//! to run, the order allow-list, and where settings and history live.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the relay.
///
/// Loaded from `parley.toml`. All fields except `bots` have defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Names of the bots run by this process.
    #[serde(default)]
    pub bots: Vec<String>,

    /// Senders allowed to issue orders.
    #[serde(default)]
    pub admins: Vec<String>,

    /// Order markers recognized per bot name.
    #[serde(default)]
    pub orders: HashMap<String, Vec<String>>,

    /// Directory holding `<bot><order>.json` settings files.
    #[serde(default = "default_settings_dir")]
    pub settings_dir: PathBuf,

    /// Backing file of the conversation history.
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,

    /// Maximum number of lines in a reconstructed dialog.
    #[serde(default = "default_memory_limit")]
    pub memory_limit: usize,

    /// Base URL of the generation server.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_settings_dir() -> PathBuf {
    PathBuf::from("./confs")
}

fn default_history_path() -> PathBuf {
    PathBuf::from("./history.json")
}

fn default_memory_limit() -> usize {
    10
}

fn default_endpoint() -> String {
    "http://llm-server:8000".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bots: Vec::new(),
            admins: Vec::new(),
            orders: HashMap::new(),
            settings_dir: default_settings_dir(),
            history_path: default_history_path(),
            memory_limit: default_memory_limit(),
            endpoint: default_endpoint(),
        }
    }
}

impl RelayConfig {
    /// Order markers configured for `bot` (empty when none).
    pub fn orders_for(&self, bot: &str) -> &[String] {
        self.orders.get(bot).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Errors loading the relay configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
