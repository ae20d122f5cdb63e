//! Parley CLI entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes logging and application state, then
//! dispatches to the command handler.

mod cli;
mod console;
mod state;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use cli::chat::Session;
use cli::{Cli, Commands};
use parley_observe::tracing_setup::{default_filter, init_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet, cli.log_json)?;

    let state = AppState::init(&cli.config).await?;

    match cli.command {
        Commands::Chat {
            bot,
            chat,
            title,
            user,
        } => {
            let session = Session {
                chat_id: chat,
                title: &title,
                user: &user,
            };
            cli::chat::run_chat(&state, &bot, session, shutdown_token()).await?;
        }

        Commands::Run { chat, title, user } => {
            let session = Session {
                chat_id: chat,
                title: &title,
                user: &user,
            };
            cli::chat::run_fleet(&state, session, shutdown_token()).await?;
        }

        Commands::History { action } => {
            cli::history::handle(&state, action, cli.json).await?;
        }

        Commands::Generate {
            bot,
            order,
            title,
            lines,
        } => {
            cli::generate::generate(&state, &bot, order.as_deref(), &title, lines, cli.json)
                .await?;
        }
    }

    Ok(())
}

/// Install the global tracing subscriber for the given CLI verbosity.
fn init_logging(verbose: u8, quiet: bool, json: bool) -> anyhow::Result<()> {
    init_tracing(default_filter(verbose, quiet), json).map_err(|err| anyhow::anyhow!(err))
}

/// A token cancelled on Ctrl+C or SIGTERM.
fn shutdown_token() -> CancellationToken {
    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown requested");
        trigger.cancel();
    });
    shutdown
}

/// Wait for Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed that signal source never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
