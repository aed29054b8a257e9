//! Converts a landed number into exact integer payouts.

use croupier_types::{AnchorId, BallStopped, BetResult, PayoutRule};
use tracing::debug;

use super::AnchorBoard;

/// Return paid on one anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorPayout {
    pub anchor_id: AnchorId,
    pub stake: u64,
    /// Zero when the anchor lost.
    pub payout: u64,
}

/// Every staked anchor resolved against one result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub result_number: u8,
    pub payouts: Vec<AnchorPayout>,
    pub total_staked: u64,
    pub total_payout: u64,
}

impl Resolution {
    pub fn winners(&self) -> impl Iterator<Item = &AnchorPayout> {
        self.payouts.iter().filter(|payout| payout.payout > 0)
    }

    /// The event published for this resolution. Losses are only reported when
    /// nothing won.
    pub fn bet_result(&self) -> BetResult {
        BetResult {
            winning_amount: self.total_payout,
            winner_number: self.result_number,
            lose_amount: if self.total_payout > 0 {
                0
            } else {
                self.total_staked
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PayoutResolver {
    rule: PayoutRule,
}

impl PayoutResolver {
    pub fn new(rule: PayoutRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> PayoutRule {
        self.rule
    }

    /// Collect winnings from every anchor. Every anchor is cleared afterwards,
    /// winners and losers alike.
    pub fn resolve(&self, event: &BallStopped, board: &mut AnchorBoard) -> Resolution {
        let mut resolution = Resolution {
            result_number: event.result_number,
            ..Resolution::default()
        };
        for anchor in board.iter_mut() {
            let stake = anchor.stake();
            let payout = anchor.collect_winnings(event.result_number, event.slot_count, self.rule);
            if stake == 0 {
                continue;
            }
            resolution.total_staked = resolution.total_staked.saturating_add(stake);
            resolution.total_payout = resolution.total_payout.saturating_add(payout);
            resolution.payouts.push(AnchorPayout {
                anchor_id: anchor.id(),
                stake,
                payout,
            });
        }
        debug!(
            result = event.result_number,
            staked = resolution.total_staked,
            payout = resolution.total_payout,
            "bets resolved"
        );
        resolution
    }
}
