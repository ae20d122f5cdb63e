//! Terminal chat transport.
//!
//! Implements the `ChatTransport` trait from `parley-core` over lines typed
//! on stdin. Every line is a private message from the local user that
//! replies to the bot's previous answer, so a console session builds one
//! continuous reply chain.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use console::style;
use indicatif::ProgressBar;
use tokio::sync::mpsc;

use parley_core::bot::transport::ChatTransport;
use parley_types::message::{ChatKind, InboundMessage, TransportError};

/// Read stdin on a dedicated thread and forward each line.
///
/// The thread ends at end of input or once the receiver is dropped.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Split a line addressed as `@<bot> <text>` into the bot's index and text.
pub fn route_line<'a>(line: &'a str, bots: &[String]) -> Option<(usize, &'a str)> {
    let rest = line.trim().strip_prefix('@')?;
    let (name, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let index = bots.iter().position(|bot| bot == name)?;
    Some((index, text.trim()))
}

/// Fan `input` out to one channel per bot, in the order of `bots`.
///
/// Lines must be addressed as `@<bot> <text>` unless there is a single bot.
/// Every output channel closes when `input` ends.
pub fn spawn_router(mut input: mpsc::Receiver<String>, bots: &[String]) -> Vec<mpsc::Receiver<String>> {
    let (senders, receivers): (Vec<_>, Vec<_>) = bots.iter().map(|_| mpsc::channel(16)).unzip();
    let bots = bots.to_vec();
    tokio::spawn(async move {
        while let Some(line) = input.recv().await {
            let (index, text) = match route_line(&line, &bots) {
                Some((index, text)) => (index, text.to_string()),
                None if senders.len() == 1 => (0, line),
                None => {
                    tracing::warn!("Address a bot as @<name> <text>, one of: {}", bots.join(", "));
                    continue;
                }
            };
            if senders[index].send(text).await.is_err() {
                tracing::debug!(bot = bots[index].as_str(), "Bot stopped reading input");
            }
        }
    });
    receivers
}

/// One console conversation with a single bot.
pub struct ConsoleTransport {
    bot: String,
    user: String,
    chat_id: i64,
    chat_title: String,
    input: tokio::sync::Mutex<mpsc::Receiver<String>>,
    last_reply: Mutex<Option<InboundMessage>>,
    typing: Mutex<Option<ProgressBar>>,
    next_id: AtomicI64,
}

impl ConsoleTransport {
    pub fn new(
        bot: impl Into<String>,
        user: impl Into<String>,
        chat_id: i64,
        chat_title: impl Into<String>,
        input: mpsc::Receiver<String>,
    ) -> Self {
        Self {
            bot: bot.into(),
            user: user.into(),
            chat_id,
            chat_title: chat_title.into(),
            input: tokio::sync::Mutex::new(input),
            last_reply: Mutex::new(None),
            typing: Mutex::new(None),
            next_id: AtomicI64::new(1),
        }
    }

    fn clear_typing(&self) {
        let spinner = self.typing.lock().ok().and_then(|mut typing| typing.take());
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl ChatTransport for ConsoleTransport {
    async fn next_message(&self) -> Option<InboundMessage> {
        self.clear_typing();
        let mut input = self.input.lock().await;
        loop {
            let text = input.recv().await?;
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let reply_to = self
                .last_reply
                .lock()
                .ok()
                .and_then(|last| last.clone())
                .map(Box::new);
            return Some(InboundMessage {
                message_id: self.next_id(),
                chat_id: self.chat_id,
                chat_title: self.chat_title.clone(),
                chat_kind: ChatKind::Private,
                sender: self.user.clone(),
                text: text.to_string(),
                reply_to,
            });
        }
    }

    async fn send_typing(&self, _chat_id: i64) -> Result<(), TransportError> {
        let mut typing = self
            .typing
            .lock()
            .map_err(|e| TransportError::Send(e.to_string()))?;
        if typing.is_none() {
            *typing = Some(crate::cli::spinner(format!("{} is typing...", self.bot)));
        }
        Ok(())
    }

    async fn reply(&self, to: &InboundMessage, text: &str) -> Result<InboundMessage, TransportError> {
        self.clear_typing();
        println!("{} {}", style(format!("{}:", self.bot)).cyan().bold(), text);

        let sent = InboundMessage {
            message_id: self.next_id(),
            chat_id: to.chat_id,
            chat_title: to.chat_title.clone(),
            chat_kind: to.chat_kind,
            sender: self.bot.clone(),
            text: text.to_string(),
            reply_to: None,
        };
        let mut last = self
            .last_reply
            .lock()
            .map_err(|e| TransportError::Send(e.to_string()))?;
        *last = Some(sent.clone());
        Ok(sent)
    }
}
