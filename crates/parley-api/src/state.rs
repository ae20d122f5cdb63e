//! Application state wiring all services together.
//!
//! AppState holds the concrete instances used by the CLI commands: the
//! loaded configuration, the shared conversation store and the infra
//! adapters pinned behind the core port traits.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use parley_core::history::store::ConversationStore;
use parley_infra::config::{DEFAULT_CONFIG_FILE, load_relay_config};
use parley_infra::generation::HttpGenerator;
use parley_infra::history_file::JsonHistoryFile;
use parley_types::config::RelayConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub store: Arc<ConversationStore>,
    pub storage: Arc<JsonHistoryFile>,
    pub generator: Arc<HttpGenerator>,
}

impl AppState {
    /// Load the configuration, open the history file and build the
    /// generation client.
    ///
    /// A missing `parley.toml` at the default location falls back to the
    /// defaults; an explicitly named file must exist.
    pub async fn init(config_path: &Path) -> anyhow::Result<Self> {
        let config = if config_path == Path::new(DEFAULT_CONFIG_FILE)
            && !tokio::fs::try_exists(config_path).await.unwrap_or(false)
        {
            tracing::info!("No {DEFAULT_CONFIG_FILE} found, using defaults");
            RelayConfig::default()
        } else {
            load_relay_config(config_path).await?
        };

        let storage = Arc::new(JsonHistoryFile::new(&config.history_path));
        let store = Arc::new(ConversationStore::load(storage.as_ref()).await);
        let generator = Arc::new(
            HttpGenerator::new(config.endpoint.clone())
                .context("failed to build generation client")?,
        );

        Ok(Self {
            config: Arc::new(config),
            store,
            storage,
            generator,
        })
    }

    /// Write the in-memory history back to the history file.
    pub async fn persist(&self) -> anyhow::Result<()> {
        self.store
            .persist(self.storage.as_ref())
            .await
            .with_context(|| format!("failed to save {}", self.storage.path().display()))
    }
}
