//! Relay configuration loader for Parley.
//!
//! Reads `parley.toml` and deserializes it into [`RelayConfig`]. Unlike the
//! history file, a missing or malformed configuration is fatal: the relay
//! cannot know which bots to run without it.

use std::path::Path;

use parley_types::config::{ConfigError, RelayConfig};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "parley.toml";

/// Load the relay configuration from `path`.
///
/// Missing optional fields take their defaults. The loaded configuration is
/// validated before it is returned.
pub async fn load_relay_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let config: RelayConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    validate(&config)?;
    tracing::debug!(
        bots = config.bots.len(),
        "Loaded relay configuration from {}",
        path.display()
    );
    Ok(config)
}

/// Reject configurations the relay cannot run with.
pub fn validate(config: &RelayConfig) -> Result<(), ConfigError> {
    if config.memory_limit == 0 {
        return Err(ConfigError::Invalid("memory_limit must be at least 1".to_string()));
    }
    if config.endpoint.trim().is_empty() {
        return Err(ConfigError::Invalid("endpoint must not be empty".to_string()));
    }
    if let Some(bot) = config.bots.iter().find(|bot| bot.trim().is_empty()) {
        return Err(ConfigError::Invalid(format!("invalid bot name {bot:?}")));
    }
    for (bot, orders) in &config.orders {
        if orders.iter().any(String::is_empty) {
            return Err(ConfigError::Invalid(format!("bot {bot} has an empty order marker")));
        }
    }
    Ok(())
}
