//! Conversation history: line formatting, the shared store, dialog
//! reconstruction, and the storage port used for persistence.

pub mod dialog;
pub mod line;
pub mod storage;
pub mod store;
