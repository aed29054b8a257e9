//! Roulette domain types.
//!
//! Defines wheel/bet/event/save-state records and constants used by the execution layer
//! and the table services.

mod bet;
mod constants;
mod events;
mod save;
mod wheel;

pub use bet::*;
pub use constants::*;
pub use events::*;
pub use save::*;
pub use wheel::*;

#[cfg(test)]
mod tests;
