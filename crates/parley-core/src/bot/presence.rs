//! "Typing" presence while a reply is being generated.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

use super::transport::ChatTransport;

/// How often the typing indicator is refreshed.
pub const TYPING_INTERVAL: Duration = Duration::from_secs(4);

/// Spawn a task that keeps the typing indicator up in `chat_id`.
///
/// The task runs until the returned guard is dropped. It is never awaited,
/// and failures to send the indicator are ignored.
pub fn start_typing<T: ChatTransport>(transport: Arc<T>, chat_id: i64, interval: Duration) -> DropGuard {
    let token = CancellationToken::new();
    let cancelled = token.clone();

    tokio::spawn(async move {
        loop {
            if let Err(err) = transport.send_typing(chat_id).await {
                debug!(chat_id, "Typing indicator failed: {err}");
            }
            tokio::select! {
                _ = cancelled.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
    });

    token.drop_guard()
}
