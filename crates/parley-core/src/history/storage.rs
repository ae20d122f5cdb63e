//! HistoryStorage trait for abstracting where the history is persisted.
//!
//! Defined in parley-core so the conversation store can load and persist
//! without depending on any specific backend. The JSON file adapter lives in
//! parley-infra.

use parley_types::error::StoreError;

/// Backing storage for the serialized conversation history.
///
/// The store always reads and writes the whole history as one JSON document.
pub trait HistoryStorage: Send + Sync {
    /// Read the stored document, creating an empty backing store if absent.
    fn read(&self) -> impl std::future::Future<Output = Result<Vec<u8>, StoreError>> + Send;

    /// Replace the stored document with `data`.
    fn write(&self, data: &[u8]) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
