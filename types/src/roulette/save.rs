use serde::{Deserialize, Serialize};

use super::{AnchorId, BetAction, ChipType, HistoryEntry};

/// Persisted wheel state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelSave {
    pub target_number: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorStake {
    pub anchor_id: AnchorId,
    pub stake: u64,
}

/// Persisted betting state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetsSave {
    /// Ledger actions, oldest first.
    pub actions: Vec<BetAction>,
    /// Non-zero anchor stakes.
    pub stakes: Vec<AnchorStake>,
    #[serde(default)]
    pub selected_chip: Option<ChipType>,
}

impl BetsSave {
    pub fn total(&self) -> u64 {
        self.actions
            .iter()
            .fold(0u64, |acc, action| acc.saturating_add(action.amount))
    }
}

/// Persisted result history, newest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySave {
    pub entries: Vec<HistoryEntry>,
}
