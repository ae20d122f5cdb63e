//! Generation requests: the generator port, system prompt templating, and
//! the retry/backoff policy shared by generator implementations.

pub mod generator;
pub mod prompt;
pub mod retry;
