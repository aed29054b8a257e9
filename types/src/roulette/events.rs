use serde::{Deserialize, Serialize};

use super::{ChipType, GamePhase, PocketColor};

/// The ball came to rest in a pocket. Published once per spin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallStopped {
    pub result_number: u8,
    pub slot_count: u8,
}

/// Outcome of resolving every anchor against a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetResult {
    pub winning_amount: u64,
    pub winner_number: u8,
    /// Total staked when nothing won, otherwise zero.
    pub lose_amount: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetCountChanged {
    pub count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetAmountChanged {
    pub total: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChanged {
    pub balance: u64,
    /// Balance relative to the starting balance.
    pub profit: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSelected {
    pub number: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChanged {
    pub phase: GamePhase,
    pub round_id: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipSelected {
    pub chip: Option<ChipType>,
}

/// One row of the result history panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub round_id: u64,
    pub number: u8,
    pub label: String,
    pub color: PocketColor,
    pub won: bool,
    pub winning_amount: u64,
}
