//! Conversation logic and port trait definitions for Parley.
//!
//! This crate owns the shared conversation store, dialog reconstruction,
//! the retry policy and the bot worker loop. It defines the ports
//! ([`history::storage::HistoryStorage`], [`generation::generator::Generator`],
//! [`bot::transport::ChatTransport`]) that parley-infra and parley-api
//! implement. It depends only on `parley-types`, never on `parley-infra`.

pub mod bot;
pub mod generation;
pub mod history;
