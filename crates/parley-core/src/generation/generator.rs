//! Generator trait definition.
//!
//! The abstraction the bot worker uses to turn a dialog into a reply. The
//! HTTP implementation lives in parley-infra (`HttpGenerator`).

use std::path::Path;

use parley_types::generation::GenerationError;

/// Backend that produces the next reply for a dialog.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait Generator: Send + Sync {
    /// Generate a reply to `dialog` (oldest line first).
    ///
    /// Settings are read from `settings_path` on every call, and
    /// `context_label` (the chat title) is substituted into the system prompt.
    fn send(
        &self,
        dialog: Vec<String>,
        settings_path: &Path,
        context_label: &str,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
