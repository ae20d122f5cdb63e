//! Infrastructure layer for Parley.
//!
//! Contains implementations of the port traits defined in `parley-core`:
//! the JSON history file, the HTTP generation client, and the loaders for
//! `parley.toml` and per-bot settings files.

pub mod config;
pub mod generation;
pub mod history_file;
pub mod settings;
