//! ChatTransport trait for abstracting the bot platform.
//!
//! A transport delivers inbound messages for one bot and sends its replies.
//! Platform adapters implement it; the worker never talks to a platform
//! directly.

use parley_types::message::{InboundMessage, TransportError};

/// Message source and sink of a single bot.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatTransport: Send + Sync + 'static {
    /// Wait for the next inbound message. `None` means the stream ended.
    fn next_message(&self) -> impl std::future::Future<Output = Option<InboundMessage>> + Send;

    /// Show a "typing" indicator in `chat_id`.
    fn send_typing(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;

    /// Reply to `to` with `text`, returning the message that was sent.
    fn reply(
        &self,
        to: &InboundMessage,
        text: &str,
    ) -> impl std::future::Future<Output = Result<InboundMessage, TransportError>> + Send;
}
