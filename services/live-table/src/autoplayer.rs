use croupier_execution::{Table, WalletService};
use croupier_types::{AnchorId, ChipType};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::AutoplayerConfig;

/// What the autoplayer did during one betting phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BettingSummary {
    pub placed: usize,
    pub rejected: usize,
    pub undone: usize,
}

/// Places random chips on random anchors, like a player clicking the layout.
pub struct Autoplayer {
    config: AutoplayerConfig,
    rng: StdRng,
}

impl Autoplayer {
    pub fn new(config: AutoplayerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Bet on `table` for the current round. Does nothing outside Betting.
    pub fn play<W: WalletService + 'static>(&mut self, table: &mut Table<W>) -> BettingSummary {
        let mut summary = BettingSummary::default();
        if !self.config.enabled || !table.scheduler().is_betting_open(table.phase()) {
            return summary;
        }
        let anchors: Vec<AnchorId> =
            table.bets().board().iter().map(|anchor| anchor.id()).collect();
        let bets = self
            .rng
            .gen_range(self.config.bets_per_round_min..=self.config.bets_per_round_max);

        for _ in 0..bets {
            let (Some(&anchor_id), Some(&chip)) = (
                anchors.choose(&mut self.rng),
                self.config.chips.choose(&mut self.rng),
            ) else {
                break;
            };
            if table.bets().selected_chip() != Some(chip) {
                table.select_chip(chip);
            }
            if !table.place_bet(anchor_id) {
                summary.rejected += 1;
                continue;
            }
            summary.placed += 1;
            if self.rng.gen_bool(self.config.undo_chance) && table.undo().is_some() {
                summary.undone += 1;
            }
        }
        debug!(
            round_id = table.round_id(),
            placed = summary.placed,
            rejected = summary.rejected,
            undone = summary.undone,
            total = table.bets().total_bet(),
            "autoplayer bets placed"
        );
        summary
    }

    /// Cheapest configured chip.
    pub fn min_chip(&self) -> Option<ChipType> {
        self.config.chips.iter().copied().min()
    }
}
