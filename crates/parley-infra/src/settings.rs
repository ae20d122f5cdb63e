//! Per-bot generation settings loader.
//!
//! Settings live next to each other in the settings directory as
//! `<bot><order>.json` and are re-read for every request, so edits take
//! effect without a restart.

use std::path::Path;

use parley_types::generation::{GenerationError, Settings};

/// Load and decode the settings file at `path`.
///
/// Missing keys take their zero value. A missing or malformed file is a
/// configuration error and is never retried.
pub async fn load_settings(path: &Path) -> Result<Settings, GenerationError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| GenerationError::Settings {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    serde_json::from_slice(&data).map_err(|e| GenerationError::Settings {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
