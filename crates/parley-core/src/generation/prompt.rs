//! System prompt templating.

use parley_types::generation::{CONTEXT_PLACEHOLDER, GenerationError, Settings};

/// Substitute the chat title into the system prompt.
///
/// The prompt must contain exactly one [`CONTEXT_PLACEHOLDER`]; anything else
/// is a configuration error, reported before any request is made.
pub fn apply_context_label(settings: &mut Settings, context_label: &str) -> Result<(), GenerationError> {
    let found = settings.system_prompt.matches(CONTEXT_PLACEHOLDER).count();
    if found != 1 {
        return Err(GenerationError::Placeholder { found });
    }
    settings.system_prompt = settings
        .system_prompt
        .replacen(CONTEXT_PLACEHOLDER, context_label, 1);
    Ok(())
}
