//! Chat message types for Parley.
//!
//! `InboundMessage` is the platform-neutral view of a chat message that bot
//! transports hand to the worker. Only the fields the relay needs are kept:
//! identity (sender, chat), text, and the message it replied to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of chat a message was posted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatKind::Private => write!(f, "private"),
            ChatKind::Group => write!(f, "group"),
        }
    }
}

/// A chat message received by (or sent from) a bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub message_id: i64,
    pub chat_id: i64,
    /// Chat title; for private chats, the other party's name.
    pub chat_title: String,
    pub chat_kind: ChatKind,
    /// Sender display name. Empty when the platform hides the sender.
    pub sender: String,
    pub text: String,
    /// The message this one replied to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Box<InboundMessage>>,
}

impl InboundMessage {
    /// A message with neither text nor sender carries nothing to relay.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.sender.is_empty()
    }

    /// Whether this message replies to a message sent by `sender`.
    pub fn replies_to(&self, sender: &str) -> bool {
        self.reply_to
            .as_deref()
            .is_some_and(|parent| parent.sender == sender)
    }
}

/// Errors raised by a chat transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to send message: {0}")]
    Send(String),
}
