//! History maintenance commands: stats, sweep, dialog.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use parley_types::history::ChatStats;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// Show per-chat entry counts.
    Stats,

    /// Remove entries older than the retention window and save.
    Sweep,

    /// Print the dialog the bot would see for a pair of lines.
    Dialog {
        /// Bot name.
        #[arg(long)]
        bot: String,

        /// Chat id.
        #[arg(long, allow_negative_numbers = true)]
        chat: i64,

        /// Starting lines: the newest line, then the line it replied to.
        #[arg(long, num_args = 1)]
        line: Vec<String>,

        /// Maximum dialog length (defaults to the configured memory limit).
        #[arg(long)]
        depth: Option<usize>,
    },
}

pub async fn handle(state: &AppState, action: HistoryCommand, json: bool) -> Result<()> {
    match action {
        HistoryCommand::Stats => stats(state, json).await,
        HistoryCommand::Sweep => sweep(state, json).await,
        HistoryCommand::Dialog {
            bot,
            chat,
            line,
            depth,
        } => {
            let depth = depth.unwrap_or(state.config.memory_limit);
            dialog(state, &bot, chat, &line, depth, json).await
        }
    }
}

async fn stats(state: &AppState, json: bool) -> Result<()> {
    let stats = state.store.stats().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if stats.is_empty() {
        println!();
        println!("  {} History is empty.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    println!("{}", stats_table(&stats));
    let total: usize = stats.iter().map(|s| s.entries).sum();
    println!(
        "  {} entries in {} chats",
        style(total).bold(),
        style(stats.len()).bold()
    );
    Ok(())
}

fn stats_table(stats: &[ChatStats]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Bot").fg(Color::White),
            Cell::new("Chat").fg(Color::White),
            Cell::new("Entries").fg(Color::White),
            Cell::new("Last recorded").fg(Color::White),
        ]);

    for s in stats {
        let last = s
            .last_recorded
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&s.bot).fg(Color::Cyan),
            Cell::new(s.chat_id),
            Cell::new(s.entries),
            Cell::new(last).fg(Color::DarkGrey),
        ]);
    }
    table
}

async fn sweep(state: &AppState, json: bool) -> Result<()> {
    let removed = state.store.evict_expired().await;
    state.persist().await?;
    tracing::info!(removed, "Swept history");

    if json {
        println!("{}", serde_json::json!({ "removed": removed }));
    } else {
        println!(
            "  {} Removed {} expired entries",
            style("✓").green().bold(),
            style(removed).bold()
        );
    }
    Ok(())
}

async fn dialog(
    state: &AppState,
    bot: &str,
    chat_id: i64,
    lines: &[String],
    depth: usize,
    json: bool,
) -> Result<()> {
    if lines.len() > 2 {
        anyhow::bail!("at most two --line values (newest, previous) are accepted");
    }

    let chat = state.store.bot(bot).await.chat(chat_id).await;
    let dialog = chat.dialog(lines, depth).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&dialog)?);
        return Ok(());
    }

    for line in &dialog {
        println!("  {}", line);
    }
    println!();
    println!(
        "  {}",
        style(format!("{} lines (depth {depth})", dialog.len())).dim()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn stats_table_lists_every_chat() {
        let stats = vec![
            ChatStats {
                bot: "luna_bot".to_string(),
                chat_id: -100,
                entries: 3,
                last_recorded: Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()),
            },
            ChatStats {
                bot: "sol_bot".to_string(),
                chat_id: 5,
                entries: 0,
                last_recorded: None,
            },
        ];
        let rendered = stats_table(&stats).to_string();
        assert!(rendered.contains("luna_bot"));
        assert!(rendered.contains("-100"));
        assert!(rendered.contains("2026-03-01 12:00:00"));
        assert!(rendered.contains("sol_bot"));
    }
}
