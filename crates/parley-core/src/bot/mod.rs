//! Bot-facing logic: transport port, orders, typing presence, the per-bot
//! worker loop and the fleet runner that drives all workers together.

pub mod fleet;
pub mod orders;
pub mod presence;
pub mod transport;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;
