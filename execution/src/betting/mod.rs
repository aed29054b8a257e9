//! Betting: anchors on the layout, the undo ledger, the wallet, payout resolution
//! and the manager that is the single entry point for all of them.

mod anchors;
mod ledger;
mod manager;
mod payout;
mod wallet;

pub use anchors::{standard_layout, AnchorBoard, BetAnchor};
pub use ledger::BetLedger;
pub use manager::BetManager;
pub use payout::{AnchorPayout, PayoutResolver, Resolution};
pub use wallet::{Wallet, WalletService};
