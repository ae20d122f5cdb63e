//! One-shot generation command.

use anyhow::Result;
use console::style;

use parley_core::bot::orders::settings_path;
use parley_core::generation::generator::Generator;

use crate::state::AppState;

/// Send `lines` to the generation server using `bot`'s settings.
pub async fn generate(
    state: &AppState,
    bot: &str,
    order: Option<&str>,
    title: &str,
    lines: Vec<String>,
    json: bool,
) -> Result<()> {
    let path = settings_path(&state.config.settings_dir, bot, order);
    tracing::debug!(settings = %path.display(), lines = lines.len(), "One-shot generation");

    let spinner = (!json).then(|| super::spinner(format!("{bot} is thinking...")));
    let result = state.generator.send(lines, &path, title).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let response = result?;

    if json {
        println!("{}", serde_json::json!({ "bot": bot, "response": response }));
    } else {
        println!("{} {}", style(format!("{bot}:")).cyan().bold(), response);
    }
    Ok(())
}
