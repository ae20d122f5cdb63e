//! JSON file backing for the conversation history.
//!
//! Implements the `HistoryStorage` trait from `parley-core` on top of a
//! single file. The file (and its parent directory) is created on first
//! read so a fresh deployment starts with an empty history.

use std::path::{Path, PathBuf};

use parley_core::history::storage::HistoryStorage;
use parley_types::error::StoreError;

/// History stored as one JSON document on the local filesystem.
///
/// All operations go through `tokio::fs` for async I/O.
#[derive(Debug, Clone)]
pub struct JsonHistoryFile {
    path: PathBuf,
}

impl JsonHistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent(&self) -> Result<(), StoreError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                tokio::fs::create_dir_all(parent).await?;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl HistoryStorage for JsonHistoryFile {
    async fn read(&self) -> Result<Vec<u8>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No history file at {}, creating it", self.path.display());
                self.ensure_parent().await?;
                tokio::fs::write(&self.path, b"").await?;
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, data: &[u8]) -> Result<(), StoreError> {
        self.ensure_parent().await?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }
}
