//! Observability setup for Parley: tracing subscriber initialization.

pub mod tracing_setup;
