//! Per-bot worker: the receive loop that ties transport, history and
//! generation together.
//!
//! For every inbound message the worker records it against the message it
//! replied to, reconstructs the dialog, asks the generator for a reply, sends
//! it, and records the reply against the inbound line. After each handled
//! message the shared history is swept and persisted.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use parley_types::config::RelayConfig;
use parley_types::message::InboundMessage;

use crate::generation::generator::Generator;
use crate::history::line::{LineSource, OrderedMessage};
use crate::history::storage::HistoryStorage;
use crate::history::store::{BotHistoryHandle, ChatHistoryHandle, ConversationStore};

use super::orders::{is_asked, resolve_order, settings_path};
use super::presence::{TYPING_INTERVAL, start_typing};
use super::transport::ChatTransport;

/// Per-bot settings derived from the relay configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub admins: Vec<String>,
    pub orders: Vec<String>,
    pub settings_dir: PathBuf,
    /// Maximum dialog length.
    pub memory_limit: usize,
    pub typing_interval: Duration,
}

impl WorkerConfig {
    /// Settings for `bot` taken from the relay configuration.
    pub fn from_relay(config: &RelayConfig, bot: &str) -> Self {
        Self {
            admins: config.admins.clone(),
            orders: config.orders_for(bot).to_vec(),
            settings_dir: config.settings_dir.clone(),
            memory_limit: config.memory_limit,
            typing_interval: TYPING_INTERVAL,
        }
    }
}

/// Receive loop of a single bot.
pub struct BotWorker<T, G, S> {
    transport: Arc<T>,
    generator: Arc<G>,
    store: Arc<ConversationStore>,
    storage: Arc<S>,
    history: BotHistoryHandle,
    config: WorkerConfig,
}

impl<T, G, S> BotWorker<T, G, S>
where
    T: ChatTransport,
    G: Generator,
    S: HistoryStorage,
{
    /// Create a worker for bot `name` sharing `store` with every other worker.
    pub async fn new(
        name: &str,
        transport: Arc<T>,
        generator: Arc<G>,
        store: Arc<ConversationStore>,
        storage: Arc<S>,
        config: WorkerConfig,
    ) -> Self {
        let history = store.bot(name).await;
        Self {
            transport,
            generator,
            store,
            storage,
            history,
            config,
        }
    }

    pub fn name(&self) -> &str {
        self.history.name()
    }

    /// Process inbound messages until the transport closes or `shutdown` fires.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(bot = self.name(), "Bot worker started");
        loop {
            let message = tokio::select! {
                _ = shutdown.cancelled() => break,
                message = self.transport.next_message() => message,
            };
            let Some(message) = message else {
                info!(bot = self.name(), "Transport closed");
                break;
            };
            self.process(message).await;
        }
        info!(bot = self.name(), "Bot worker stopped");
    }

    /// Handle one inbound message end to end.
    ///
    /// Returns the sent reply, or `None` when the message was ignored or
    /// could not be answered. The history is swept and persisted for every
    /// message the bot was asked to answer, answered or not.
    pub async fn process(&self, message: InboundMessage) -> Option<InboundMessage> {
        if message.is_empty() {
            return None;
        }

        let order = resolve_order(&message.text, &self.config.orders);
        if !is_asked(&message, order, self.name(), &self.config.admins) {
            return None;
        }
        info!(bot = self.name(), chat_id = message.chat_id, order, "Got message");

        let chat = self.history.chat(message.chat_id).await;
        let reply = self.handle_message(&message, order, &chat).await;

        self.store.evict_expired().await;
        if let Err(err) = self.store.persist(self.storage.as_ref()).await {
            error!(bot = self.name(), "Failed to save history: {err}");
        }

        reply
    }

    async fn handle_message(
        &self,
        message: &InboundMessage,
        order: Option<&str>,
        chat: &ChatHistoryHandle,
    ) -> Option<InboundMessage> {
        let _typing = start_typing(
            Arc::clone(&self.transport),
            message.chat_id,
            self.config.typing_interval,
        );

        let request = OrderedMessage { message, order };
        let replied = message.reply_to.as_deref().map(|m| m as &dyn LineSource);
        let lines = chat.record(&request, replied, None).await;
        if lines[0].is_empty() {
            debug!(bot = self.name(), chat_id = message.chat_id, "Nothing to answer");
            return None;
        }

        let dialog = chat.dialog(&lines, self.config.memory_limit).await;
        let path = settings_path(&self.config.settings_dir, self.name(), order);
        let text = match self.generator.send(dialog, &path, &message.chat_title).await {
            Ok(text) => text,
            Err(err) => {
                error!(
                    bot = self.name(),
                    chat = message.chat_title.as_str(),
                    "Generation failed: {err}"
                );
                return None;
            }
        };

        let sent = match self.transport.reply(message, &text).await {
            Ok(sent) => sent,
            Err(err) => {
                warn!(bot = self.name(), chat_id = message.chat_id, "Failed to send reply: {err}");
                return None;
            }
        };

        chat.record(&sent, None, Some(&lines[0])).await;
        Some(sent)
    }
}
