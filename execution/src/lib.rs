//! Croupier table core.
//!
//! This crate contains the roulette wheel simulation (pocket layout, jump
//! lattice, ball trajectory), the betting path (anchors, ledger, wallet,
//! payouts) and the [`Table`] that runs rounds over them.
//!
//! ## Determinism requirements
//! - Do not read wall-clock time inside the core; time only advances through `tick(dt)`.
//! - Draw randomness only from the table's seeded [`TableRng`].
//! - Avoid iteration order of hash-based collections influencing outputs.
//!
//! The same seed and the same sequence of inputs and tick deltas always
//! produce the same targets, trajectories and payouts.
//!
//! ## Minimal round (example)
//! ```rust
//! use std::time::Duration;
//! use croupier_execution::{Table, TableConfig};
//! use croupier_types::BetType;
//!
//! let config = TableConfig { seed: Some(7), ..TableConfig::default() };
//! let mut table = Table::new(&config)?;
//!
//! // 1) Bet while the table is in Betting.
//! let seventeen = table.bets().board().find(BetType::Straight, &[17]).unwrap();
//! assert!(table.place(seventeen, 10));
//!
//! // 2) Rig the result and spin.
//! table.set_target(17)?;
//! table.request_spin()?;
//!
//! // 3) Tick until the round resolves.
//! let outcome = loop {
//!     if let Some(outcome) = table.tick(Duration::from_millis(16))? {
//!         break outcome;
//!     }
//! };
//! assert_eq!(outcome.result.winning_amount, 370);
//! # Ok::<(), croupier_execution::ConfigError>(())
//! ```

pub mod betting;
pub mod history;
pub mod rng;
pub mod round_scheduler;
pub mod signal;
pub mod snapshot;
pub mod table;
pub mod wheel;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

#[cfg(test)]
mod integration_tests;

mod error;

pub use betting::{
    standard_layout, AnchorBoard, AnchorPayout, BetAnchor, BetLedger, BetManager, PayoutResolver,
    Resolution, Wallet, WalletService,
};
pub use error::{ConfigError, SnapshotError};
pub use history::RoundHistory;
pub use rng::TableRng;
pub use round_scheduler::{duration_to_ms, PhaseConfig, RoundScheduler, TransitionResult};
pub use signal::{Signal, SubscriptionId};
pub use snapshot::{Saveable, Snapshot, SnapshotRegistry};
pub use table::{RoundOutcome, Table, TableConfig};
pub use wheel::{
    BallTrajectory, DiamondConfig, JumpLattice, JumpRingConfig, LayoutConfig, PocketLayout,
    TrajectoryConfig, TrajectoryPhase, TrajectoryStatus, WheelConfig, WheelController, WheelFrame,
};
