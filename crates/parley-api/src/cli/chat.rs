//! Console sessions: one bot (`chat`) or every configured bot (`run`).
//!
//! Both go through the fleet runner over console transports, so a session
//! takes the same orders, history and generation path as a platform bot
//! would.

use std::sync::Arc;

use anyhow::Result;
use console::style;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use parley_core::bot::fleet::run_workers;
use parley_core::bot::worker::{BotWorker, WorkerConfig};

use crate::console::{ConsoleTransport, spawn_router, spawn_stdin_reader};
use crate::state::AppState;

/// Console options shared by every bot in a session.
pub struct Session<'a> {
    pub chat_id: i64,
    pub title: &'a str,
    pub user: &'a str,
}

/// Chat with `bot` until end of input or `shutdown`.
pub async fn run_chat(
    state: &AppState,
    bot: &str,
    session: Session<'_>,
    shutdown: CancellationToken,
) -> Result<()> {
    if !state.config.bots.iter().any(|b| b == bot) {
        tracing::warn!(bot, "Bot is not listed in the configuration");
    }

    println!();
    println!(
        "  {} Chatting with {} as {} (Ctrl-D to finish)",
        style("●").green(),
        style(bot).cyan().bold(),
        style(session.user).bold()
    );
    println!();

    let bots = [bot.to_string()];
    run_session(state, &bots, vec![spawn_stdin_reader()], session, shutdown).await
}

/// Run every configured bot at once. Lines are addressed as `@<bot> <text>`.
pub async fn run_fleet(state: &AppState, session: Session<'_>, shutdown: CancellationToken) -> Result<()> {
    let bots = state.config.bots.clone();
    if bots.is_empty() {
        anyhow::bail!("no bots configured; list them under `bots` in the configuration");
    }

    println!();
    println!(
        "  {} Running {} as {} (address with @<bot>, Ctrl-D to finish)",
        style("●").green(),
        style(bots.join(", ")).cyan().bold(),
        style(session.user).bold()
    );
    println!();

    let inputs = spawn_router(spawn_stdin_reader(), &bots);
    run_session(state, &bots, inputs, session, shutdown).await
}

async fn run_session(
    state: &AppState,
    bots: &[String],
    inputs: Vec<mpsc::Receiver<String>>,
    session: Session<'_>,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut workers = Vec::with_capacity(bots.len());
    for (bot, input) in bots.iter().zip(inputs) {
        let transport = Arc::new(ConsoleTransport::new(
            bot.as_str(),
            session.user,
            session.chat_id,
            session.title,
            input,
        ));
        workers.push(
            BotWorker::new(
                bot,
                transport,
                Arc::clone(&state.generator),
                Arc::clone(&state.store),
                Arc::clone(&state.storage),
                WorkerConfig::from_relay(&state.config, bot),
            )
            .await,
        );
    }

    run_workers(
        workers,
        Arc::clone(&state.store),
        Arc::clone(&state.storage),
        shutdown,
    )
    .await?;

    println!();
    println!("  {} History saved", style("✓").green().bold());
    Ok(())
}
