//! Fleet runner: every configured bot on its own task over one shared store.
//!
//! Workers share nothing but the `Arc<ConversationStore>` (and the storage it
//! persists to). When the last worker has stopped the history is swept and
//! written one final time.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use parley_types::error::StoreError;

use crate::generation::generator::Generator;
use crate::history::storage::HistoryStorage;
use crate::history::store::ConversationStore;

use super::transport::ChatTransport;
use super::worker::BotWorker;

/// Run `workers` concurrently until each transport closes or `shutdown` fires.
///
/// A worker that panics is logged and does not stop the others. Returns the
/// result of the final persist.
pub async fn run_workers<T, G, S>(
    workers: Vec<BotWorker<T, G, S>>,
    store: Arc<ConversationStore>,
    storage: Arc<S>,
    shutdown: CancellationToken,
) -> Result<(), StoreError>
where
    T: ChatTransport,
    G: Generator + 'static,
    S: HistoryStorage + 'static,
{
    let mut set = JoinSet::new();
    for worker in workers {
        let token = shutdown.clone();
        set.spawn(async move {
            worker.run(token).await;
            worker.name().to_string()
        });
    }
    info!(bots = set.len(), "Bot fleet started");

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(bot) => info!(bot = bot.as_str(), "Bot finished"),
            Err(err) => error!("Bot worker task failed: {err}"),
        }
    }

    let removed = store.evict_expired().await;
    store.persist(storage.as_ref()).await?;
    info!(removed, "Bot fleet stopped, history saved");
    Ok(())
}
