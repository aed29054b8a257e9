//! Bounded record of recent results, newest first.

use std::collections::VecDeque;

use croupier_types::{pocket_label, HistoryEntry, HistorySave, PocketColor, HISTORY_CAPACITY};
use tracing::debug;

use crate::betting::Resolution;
use crate::{Saveable, SnapshotError};

#[derive(Clone, Debug)]
pub struct RoundHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for RoundHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl RoundHistory {
    /// A capacity of zero keeps nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a settled round and evict the oldest entry past capacity.
    pub fn record(&mut self, round_id: u64, resolution: &Resolution) -> HistoryEntry {
        let number = resolution.result_number;
        let entry = HistoryEntry {
            round_id,
            number,
            label: pocket_label(number),
            color: PocketColor::of(number),
            won: resolution.total_payout > 0,
            winning_amount: resolution.total_payout,
        };
        if self.capacity > 0 {
            self.entries.push_front(entry.clone());
            self.entries.truncate(self.capacity);
        }
        debug!(round_id, number, len = self.entries.len(), "history recorded");
        entry
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Saveable for RoundHistory {
    const SAVE_KEY: &'static str = "history";
    type State = HistorySave;

    fn capture_state(&self) -> HistorySave {
        HistorySave {
            entries: self.entries.iter().cloned().collect(),
        }
    }

    fn restore_state(&mut self, state: HistorySave) -> Result<(), SnapshotError> {
        self.entries = state.entries.into_iter().take(self.capacity).collect();
        Ok(())
    }
}
