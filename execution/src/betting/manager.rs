//! Single entry point for betting input.

use croupier_types::{
    AnchorId, AnchorStake, BallStopped, BetAction, BetAmountChanged, BetResult, BetsSave,
    ChipSelected, ChipType,
};
use tracing::{debug, info, warn};

use super::{AnchorBoard, BetLedger, PayoutResolver, Resolution, Wallet, WalletService};
use crate::{Saveable, Signal, SnapshotError};

/// Keeps the wallet, the anchors and the ledger consistent with each other.
///
/// Every stake on an anchor was paid for by exactly one ledger action, and
/// every ledger action was debited from the wallet when it was placed.
#[derive(Debug)]
pub struct BetManager<W: WalletService = Wallet> {
    wallet: W,
    board: AnchorBoard,
    ledger: BetLedger,
    resolver: PayoutResolver,
    selected_chip: Option<ChipType>,
    chip_selected: Signal<ChipSelected>,
    bet_amount: Signal<BetAmountChanged>,
    bet_result: Signal<BetResult>,
}

impl<W: WalletService> BetManager<W> {
    pub fn new(wallet: W, board: AnchorBoard) -> Self {
        let resolver = PayoutResolver::new(board.rule());
        let mut manager = Self {
            wallet,
            board,
            ledger: BetLedger::new(),
            resolver,
            selected_chip: None,
            chip_selected: Signal::replaying("chip_selected"),
            bet_amount: Signal::replaying("bet_amount_changed"),
            bet_result: Signal::one_shot("bet_result"),
        };
        manager.chip_selected.publish(ChipSelected { chip: None });
        manager.notify_amount();
        manager
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut W {
        &mut self.wallet
    }

    pub fn board(&self) -> &AnchorBoard {
        &self.board
    }

    pub fn ledger(&self) -> &BetLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut BetLedger {
        &mut self.ledger
    }

    pub fn selected_chip(&self) -> Option<ChipType> {
        self.selected_chip
    }

    pub fn total_bet(&self) -> u64 {
        self.ledger.total()
    }

    pub fn select_chip(&mut self, chip: ChipType) {
        self.selected_chip = Some(chip);
        self.chip_selected.publish(ChipSelected { chip: Some(chip) });
    }

    /// Place the selected chip on `anchor_id`.
    pub fn place_bet(&mut self, anchor_id: AnchorId) -> bool {
        let Some(chip) = self.selected_chip else {
            debug!(anchor_id, "no chip selected");
            return false;
        };
        self.place(anchor_id, chip.value())
    }

    /// Place `amount` on `anchor_id`. Nothing changes unless the anchor exists
    /// and the wallet covers the amount.
    pub fn place(&mut self, anchor_id: AnchorId, amount: u64) -> bool {
        if amount == 0 {
            return false;
        }
        if !self.board.contains(anchor_id) {
            warn!(anchor_id, "bet on unknown anchor");
            return false;
        }
        if !self.wallet.try_spend(amount) {
            return false;
        }
        if let Some(anchor) = self.board.get_mut(anchor_id) {
            anchor.add_chips(amount);
        }
        self.ledger.place(anchor_id, amount);
        self.notify_amount();
        true
    }

    /// Take back the most recent placement and refund it.
    pub fn undo(&mut self) -> Option<BetAction> {
        let action = self.ledger.undo()?;
        match self.board.get_mut(action.anchor_id) {
            Some(anchor) => anchor.remove_chips(action.amount),
            None => warn!(anchor_id = action.anchor_id, "undo on unknown anchor"),
        }
        self.wallet.add_funds(action.amount);
        self.notify_amount();
        Some(action)
    }

    /// Take every chip off the table and refund it.
    pub fn clear_bets(&mut self) -> u64 {
        let refunded = self.ledger.clear();
        self.board.clear_all();
        if refunded > 0 {
            self.wallet.add_funds(refunded);
        }
        debug!(refunded, "bets cleared");
        self.notify_amount();
        refunded
    }

    /// Pay out every anchor for `event`, credit the wallet once, publish one
    /// result and drain the ledger without refund.
    pub fn settle(&mut self, event: &BallStopped) -> Resolution {
        let resolution = self.resolver.resolve(event, &mut self.board);
        if resolution.total_payout > 0 {
            self.wallet.add_funds(resolution.total_payout);
        }
        self.ledger.clear();
        let result = resolution.bet_result();
        info!(
            result = result.winner_number,
            won = result.winning_amount,
            lost = result.lose_amount,
            balance = self.wallet.balance(),
            "round settled"
        );
        self.bet_result.publish(result);
        self.notify_amount();
        resolution
    }

    pub fn chip_selected(&mut self) -> &mut Signal<ChipSelected> {
        &mut self.chip_selected
    }

    pub fn bet_amount(&mut self) -> &mut Signal<BetAmountChanged> {
        &mut self.bet_amount
    }

    pub fn bet_result(&mut self) -> &mut Signal<BetResult> {
        &mut self.bet_result
    }

    fn notify_amount(&mut self) {
        let total = self.ledger.total();
        self.bet_amount.publish(BetAmountChanged { total });
    }
}

impl<W: WalletService> Saveable for BetManager<W> {
    const SAVE_KEY: &'static str = "bets";
    type State = BetsSave;

    fn capture_state(&self) -> BetsSave {
        BetsSave {
            actions: self.ledger.actions().to_vec(),
            stakes: self.board.stakes(),
            selected_chip: self.selected_chip,
        }
    }

    /// Refunds the live stakes, then replays the saved actions onto empty
    /// anchors and debits their total from the wallet.
    fn restore_state(&mut self, state: BetsSave) -> Result<(), SnapshotError> {
        for action in &state.actions {
            if !self.board.contains(action.anchor_id) {
                return Err(SnapshotError::UnknownAnchor(action.anchor_id));
            }
            if action.amount == 0 {
                return Err(SnapshotError::ZeroAmount(action.anchor_id));
            }
        }
        let mut replayed = BetLedger::new();
        for action in &state.actions {
            replayed.place(action.anchor_id, action.amount);
        }
        for &AnchorStake { anchor_id, stake } in &state.stakes {
            if !self.board.contains(anchor_id) {
                return Err(SnapshotError::UnknownAnchor(anchor_id));
            }
            let replayed_stake = replayed.stake_on(anchor_id);
            if replayed_stake != stake {
                return Err(SnapshotError::InconsistentStake {
                    anchor_id,
                    saved: stake,
                    replayed: replayed_stake,
                });
            }
        }
        if let Some(bet) = replayed
            .placed()
            .iter()
            .find(|bet| !state.stakes.iter().any(|s| s.anchor_id == bet.anchor_id))
        {
            return Err(SnapshotError::InconsistentStake {
                anchor_id: bet.anchor_id,
                saved: 0,
                replayed: bet.total_amount,
            });
        }

        let live = self.ledger.total();
        let needed = state.total();
        let available = self.wallet.balance().saturating_add(live);
        if needed > available {
            return Err(SnapshotError::InsufficientFunds { needed, available });
        }

        let refund = self.ledger.clear();
        self.board.clear_all();
        if refund > 0 {
            self.wallet.add_funds(refund);
        }
        if needed > 0 && !self.wallet.try_spend(needed) {
            return Err(SnapshotError::InsufficientFunds { needed, available });
        }
        debug!(refund, debited = needed, "bets replaced from snapshot");
        for action in state.actions {
            if let Some(anchor) = self.board.get_mut(action.anchor_id) {
                anchor.add_chips(action.amount);
            }
            self.ledger.place(action.anchor_id, action.amount);
        }
        self.selected_chip = state.selected_chip;
        self.chip_selected.publish(ChipSelected {
            chip: state.selected_chip,
        });
        self.notify_amount();
        Ok(())
    }
}
