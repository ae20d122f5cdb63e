//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the relay:
//! conversation history, generation payloads, chat messages, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod generation;
pub mod history;
pub mod message;
