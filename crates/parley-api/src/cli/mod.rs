//! CLI command definitions and dispatch for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod generate;
pub mod history;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

/// Relay chat messages to an LLM server and keep reply-chain history.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the relay configuration.
    #[arg(long, global = true, env = "PARLEY_CONFIG", default_value = "parley.toml")]
    pub config: PathBuf,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Talk to a bot from the terminal.
    Chat {
        /// Bot to run.
        #[arg(long)]
        bot: String,

        /// Chat id the conversation is stored under.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        chat: i64,

        /// Chat title substituted into the system prompt.
        #[arg(long, default_value = "console")]
        title: String,

        /// Name you appear under in the history.
        #[arg(long, env = "USER", default_value = "you")]
        user: String,
    },

    /// Run every configured bot together from the terminal.
    Run {
        /// Chat id the conversations are stored under.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        chat: i64,

        /// Chat title substituted into the system prompt.
        #[arg(long, default_value = "console")]
        title: String,

        /// Name you appear under in the history.
        #[arg(long, env = "USER", default_value = "you")]
        user: String,
    },

    /// Inspect and maintain the conversation history.
    History {
        #[command(subcommand)]
        action: history::HistoryCommand,
    },

    /// Send a one-off dialog to the generation server.
    Generate {
        /// Bot whose settings are used.
        #[arg(long)]
        bot: String,

        /// Order marker selecting alternate settings.
        #[arg(long)]
        order: Option<String>,

        /// Chat title substituted into the system prompt.
        #[arg(long, default_value = "console")]
        title: String,

        /// Dialog lines, oldest first.
        #[arg(required = true)]
        lines: Vec<String>,
    },
}

/// A steadily ticking spinner showing `message`.
pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
