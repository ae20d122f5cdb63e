//! Shared conversation store.
//!
//! `ConversationStore` owns the whole bot -> chat -> chain history behind a
//! single `RwLock`. Every bot worker shares the same store (and so the same
//! lock): recording, sweeping, persisting and handle creation take it
//! exclusively, dialog reconstruction takes it shared. The lock never leaves
//! this module; callers go through [`BotHistoryHandle`] and
//! [`ChatHistoryHandle`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use parley_types::error::StoreError;
use parley_types::history::{ChatHistory, ChatStats, History, MessageEntry};

use super::dialog::reconstruct;
use super::line::{LineSource, format_line};
use super::storage::HistoryStorage;

/// Process-wide conversation history.
#[derive(Debug, Default)]
pub struct ConversationStore {
    history: RwLock<History>,
}

impl ConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already loaded history.
    pub fn from_history(history: History) -> Self {
        Self {
            history: RwLock::new(history),
        }
    }

    /// Load the history from `storage`.
    ///
    /// Unreadable or undecodable storage is not fatal: the store starts empty.
    pub async fn load(storage: &impl HistoryStorage) -> Self {
        let data = match storage.read().await {
            Ok(data) => data,
            Err(err) => {
                warn!("Failed to read history, starting empty: {err}");
                return Self::new();
            }
        };

        match serde_json::from_slice::<History>(&data) {
            Ok(history) => {
                info!(bots = history.len(), "History loaded");
                Self::from_history(history)
            }
            Err(err) => {
                if !data.is_empty() {
                    warn!("Failed to decode history, starting empty: {err}");
                }
                info!("History created");
                Self::new()
            }
        }
    }

    /// Encode the full history and write it to `storage`.
    ///
    /// The exclusive lock is held until the write completes so concurrent
    /// persists never interleave on the same backing file.
    pub async fn persist(&self, storage: &impl HistoryStorage) -> Result<(), StoreError> {
        let history = self.history.write().await;
        let data = serde_json::to_vec(&*history).map_err(|e| StoreError::Encode(e.to_string()))?;
        storage.write(&data).await?;
        debug!(bytes = data.len(), "History written");
        Ok(())
    }

    /// Get (creating if absent) the history of bot `name`.
    pub async fn bot(self: &Arc<Self>, name: &str) -> BotHistoryHandle {
        let mut history = self.history.write().await;
        history.entry(name.to_string()).or_default();
        BotHistoryHandle {
            store: Arc::clone(self),
            bot: name.to_string(),
        }
    }

    /// Remove every entry older than the retention window.
    pub async fn evict_expired(&self) -> usize {
        self.evict_expired_at(Utc::now()).await
    }

    /// Remove every entry that is expired at `now`, across all bots and chats.
    ///
    /// Returns the number of removed entries. Bot and chat containers are
    /// kept even when they become empty.
    pub async fn evict_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut history = self.history.write().await;
        let mut removed = 0;
        for chat in history.values_mut().flat_map(|bot| bot.values_mut()) {
            let before = chat.len();
            chat.retain(|_, entry| !entry.is_expired(now));
            removed += before - chat.len();
        }
        if removed > 0 {
            debug!(removed, "Swept expired history entries");
        }
        removed
    }

    /// Per-chat entry counts, sorted by bot name then chat id.
    pub async fn stats(&self) -> Vec<ChatStats> {
        let history = self.history.read().await;
        let mut stats: Vec<ChatStats> = history
            .iter()
            .flat_map(|(bot, chats)| {
                chats.iter().map(move |(chat_id, chat)| ChatStats {
                    bot: bot.clone(),
                    chat_id: *chat_id,
                    entries: chat.len(),
                    last_recorded: chat.values().map(|entry| entry.timestamp).max(),
                })
            })
            .collect();
        stats.sort_by(|a, b| a.bot.cmp(&b.bot).then(a.chat_id.cmp(&b.chat_id)));
        stats
    }

    /// A copy of the full history.
    pub async fn snapshot(&self) -> History {
        self.history.read().await.clone()
    }
}

/// Handle to one bot's history inside a shared [`ConversationStore`].
#[derive(Debug, Clone)]
pub struct BotHistoryHandle {
    store: Arc<ConversationStore>,
    bot: String,
}

impl BotHistoryHandle {
    pub fn name(&self) -> &str {
        &self.bot
    }

    /// Get (creating if absent) the history of chat `chat_id`.
    pub async fn chat(&self, chat_id: i64) -> ChatHistoryHandle {
        let mut history = self.store.history.write().await;
        history
            .entry(self.bot.clone())
            .or_default()
            .entry(chat_id)
            .or_default();
        ChatHistoryHandle {
            store: Arc::clone(&self.store),
            bot: self.bot.clone(),
            chat_id,
        }
    }
}

/// Handle to one chat's reply-chain history.
#[derive(Debug, Clone)]
pub struct ChatHistoryHandle {
    store: Arc<ConversationStore>,
    bot: String,
    chat_id: i64,
}

impl ChatHistoryHandle {
    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    /// Record that `newest` replied to its predecessor.
    ///
    /// The predecessor is `reused_line` when given (a line returned by an
    /// earlier call), otherwise the line of `previous`. Returns
    /// `[newest, previous]`, or just `[newest]` when there is no usable
    /// predecessor. The link is only stored when both lines are non-empty.
    pub async fn record(
        &self,
        newest: &dyn LineSource,
        previous: Option<&dyn LineSource>,
        reused_line: Option<&str>,
    ) -> Vec<String> {
        let mut lines = vec![format_line(newest)];
        match reused_line.filter(|line| !line.is_empty()) {
            Some(line) => lines.push(line.to_string()),
            None => {
                let previous_line = previous.map(|message| format_line(message)).unwrap_or_default();
                if !previous_line.is_empty() {
                    lines.push(previous_line);
                }
            }
        }

        if lines.len() < 2 || lines[0].is_empty() {
            return lines;
        }

        let mut history = self.store.history.write().await;
        history
            .entry(self.bot.clone())
            .or_default()
            .entry(self.chat_id)
            .or_default()
            .insert(lines[0].clone(), MessageEntry::new(lines[1].clone()));
        lines
    }

    /// Reconstruct the dialog ending at `starting_lines`, at most `depth` lines long.
    pub async fn dialog(&self, starting_lines: &[String], depth: usize) -> Vec<String> {
        let history = self.store.history.read().await;
        match history.get(&self.bot).and_then(|bot| bot.get(&self.chat_id)) {
            Some(chat) => reconstruct(starting_lines, chat, depth),
            None => reconstruct(starting_lines, &ChatHistory::new(), depth),
        }
    }

    /// The predecessor recorded for `line`, if any.
    pub async fn predecessor(&self, line: &str) -> Option<String> {
        let history = self.store.history.read().await;
        history
            .get(&self.bot)
            .and_then(|bot| bot.get(&self.chat_id))
            .and_then(|chat| chat.get(line))
            .map(|entry| entry.line.clone())
    }
}
