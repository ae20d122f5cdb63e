//! Conversation history types for Parley.
//!
//! The persisted history is a three-level mapping:
//! bot name -> chat id -> line text -> [`MessageEntry`].
//!
//! Each line is the key of its own entry, and the entry records the line it
//! replied to. A chat history is therefore a forest of linked lists keyed by
//! message content rather than by message id.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long an entry is retained after its timestamp.
pub const TIME_LIMIT: Duration = Duration::hours(24);

/// One recorded link of a reply chain.
///
/// Serialized as `{ "msg": <predecessor line>, "ts": <RFC 3339 timestamp> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    /// The line this entry replied to.
    #[serde(rename = "msg")]
    pub line: String,
    /// When the link was recorded.
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
}

impl MessageEntry {
    /// Create an entry pointing at `line`, stamped with the current time.
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            timestamp: Utc::now(),
        }
    }

    /// Whether the entry is older than [`TIME_LIMIT`] at `now`.
    ///
    /// The comparison is strict: an entry exactly at the limit is kept.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.timestamp) > TIME_LIMIT
    }
}

/// Reply-chain graph of one chat, keyed by line text.
pub type ChatHistory = HashMap<String, MessageEntry>;

/// Chat histories of one bot, keyed by chat id.
pub type BotHistory = HashMap<i64, ChatHistory>;

/// Root of the persisted structure, keyed by bot name.
pub type History = HashMap<String, BotHistory>;

/// Entry count of a single chat, as reported by history statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStats {
    pub bot: String,
    pub chat_id: i64,
    pub entries: usize,
    /// Timestamp of the most recent entry, if the chat has any.
    pub last_recorded: Option<DateTime<Utc>>,
}
