//! Undo-capable record of chip placements.

use std::collections::BTreeMap;

use croupier_types::{AnchorId, BetAction, BetCountChanged, PlacedBet};
use tracing::debug;

use crate::Signal;

/// LIFO stack of placements plus the per-anchor totals derived from it.
///
/// Undo pops the most recent action across all anchors. Refunding is the
/// caller's business: the ledger only reports what it removed.
#[derive(Debug)]
pub struct BetLedger {
    actions: Vec<BetAction>,
    placed: Vec<PlacedBet>,
    count_changed: Signal<BetCountChanged>,
}

impl Default for BetLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl BetLedger {
    pub fn new() -> Self {
        let mut ledger = Self {
            actions: Vec::new(),
            placed: Vec::new(),
            count_changed: Signal::replaying("bet_count_changed"),
        };
        ledger.notify();
        ledger
    }

    pub fn place(&mut self, anchor_id: AnchorId, amount: u64) {
        self.actions.push(BetAction { anchor_id, amount });
        debug!(anchor_id, amount, count = self.actions.len(), "bet recorded");
        self.recompute();
        self.notify();
    }

    /// Pop the most recent placement.
    pub fn undo(&mut self) -> Option<BetAction> {
        let action = self.actions.pop()?;
        debug!(anchor_id = action.anchor_id, amount = action.amount, "bet undone");
        self.recompute();
        self.notify();
        Some(action)
    }

    /// Drop every placement, returning the sum removed.
    pub fn clear(&mut self) -> u64 {
        let total = self.total();
        self.actions.clear();
        self.recompute();
        self.notify();
        total
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Placements, oldest first.
    pub fn actions(&self) -> &[BetAction] {
        &self.actions
    }

    /// Totals per anchor, by anchor id.
    pub fn placed(&self) -> &[PlacedBet] {
        &self.placed
    }

    pub fn stake_on(&self, anchor_id: AnchorId) -> u64 {
        self.placed
            .iter()
            .find(|bet| bet.anchor_id == anchor_id)
            .map_or(0, |bet| bet.total_amount)
    }

    pub fn total(&self) -> u64 {
        self.actions
            .iter()
            .fold(0u64, |acc, action| acc.saturating_add(action.amount))
    }

    pub fn count_changed(&mut self) -> &mut Signal<BetCountChanged> {
        &mut self.count_changed
    }

    fn recompute(&mut self) {
        let mut totals: BTreeMap<AnchorId, u64> = BTreeMap::new();
        for action in &self.actions {
            let total = totals.entry(action.anchor_id).or_default();
            *total = total.saturating_add(action.amount);
        }
        self.placed = totals
            .into_iter()
            .map(|(anchor_id, total_amount)| PlacedBet {
                anchor_id,
                total_amount,
            })
            .collect();
    }

    fn notify(&mut self) {
        self.count_changed.publish(BetCountChanged {
            count: self.actions.len(),
        });
    }
}
