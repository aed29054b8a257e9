//! Plain data shared across the croupier table crates.
//!
//! Everything here is a value type: wheel variants and their pocket order,
//! game phases, chips, bet descriptions, the events the table publishes and
//! the records it persists. Behavior lives in `croupier-execution`.

pub mod roulette;

pub use roulette::*;
