//! The table: one wheel, one player's bets and the round loop around them.
//!
//! [`Table::tick`] is the only clock input. Within one tick the table applies
//! a due timed transition, advances the wheel, and if the ball lands during
//! Spinning it settles the bets, records history and enters Result before
//! returning.

use std::mem;
use std::time::Duration;

use croupier_types::{
    AnchorId, AnchorSpec, BallStopped, BetAction, BetAmountChanged, BetCountChanged, BetResult,
    ChipSelected, ChipType, GamePhase, HistoryEntry, PayoutRule, PhaseChanged, TargetSelected,
    HISTORY_CAPACITY, STARTING_BALANCE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::betting::{AnchorBoard, BetManager, Resolution, Wallet, WalletService};
use crate::history::RoundHistory;
use crate::round_scheduler::{duration_to_ms, PhaseConfig, RoundScheduler, TransitionResult};
use crate::snapshot::{Snapshot, SnapshotRegistry};
use crate::wheel::{WheelConfig, WheelController};
use crate::{ConfigError, Signal, SnapshotError, TableRng};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub wheel: WheelConfig,
    pub phases: PhaseConfig,
    pub payout_rule: PayoutRule,
    pub starting_balance: u64,
    pub history_capacity: usize,
    /// Fixed seed for reproducible tables; entropy when unset.
    pub seed: Option<u64>,
    /// Custom anchors. Empty means the standard layout for the wheel variant.
    pub anchors: Vec<AnchorSpec>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            wheel: WheelConfig::default(),
            phases: PhaseConfig::default(),
            payout_rule: PayoutRule::default(),
            starting_balance: STARTING_BALANCE,
            history_capacity: HISTORY_CAPACITY,
            seed: None,
            anchors: Vec::new(),
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.phases
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                field: "phases",
                reason,
            })?;
        self.wheel.validate()
    }

    pub fn board(&self) -> Result<AnchorBoard, ConfigError> {
        let variant = self.wheel.variant;
        if self.anchors.is_empty() {
            AnchorBoard::standard(variant, self.payout_rule)
        } else {
            AnchorBoard::new(variant, self.payout_rule, self.anchors.iter().cloned())
        }
    }
}

/// Everything that happened when a round resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundOutcome {
    pub round_id: u64,
    pub stopped: BallStopped,
    pub result: BetResult,
    pub resolution: Resolution,
    pub history: HistoryEntry,
}

pub struct Table<W: WalletService + 'static = Wallet> {
    scheduler: RoundScheduler,
    wheel: WheelController,
    bets: BetManager<W>,
    history: RoundHistory,
    phase: GamePhase,
    phase_ends_at_ms: Option<u64>,
    elapsed: Duration,
    round_id: u64,
    phase_changed: Signal<PhaseChanged>,
    registry: SnapshotRegistry<Table<W>>,
}

impl Table<Wallet> {
    /// A table with an in-memory wallet holding `config.starting_balance`.
    pub fn new(config: &TableConfig) -> Result<Self, ConfigError> {
        Self::with_wallet(config, Wallet::new(config.starting_balance))
    }
}

impl<W: WalletService + 'static> Table<W> {
    pub fn with_wallet(config: &TableConfig, wallet: W) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = config.board()?;
        let mut rng = match config.seed {
            Some(seed) => TableRng::seeded(seed),
            None => TableRng::from_entropy(),
        };
        let wheel = WheelController::new(&config.wheel, rng.fork())?;
        let scheduler = RoundScheduler::new(config.phases);
        let phase_ends_at_ms = scheduler.phase_timing(GamePhase::Betting, 0);

        let mut table = Self {
            scheduler,
            wheel,
            bets: BetManager::new(wallet, board),
            history: RoundHistory::new(config.history_capacity),
            phase: GamePhase::Betting,
            phase_ends_at_ms,
            elapsed: Duration::ZERO,
            round_id: 1,
            phase_changed: Signal::replaying("phase_changed"),
            registry: SnapshotRegistry::new(),
        };
        table.register_components().map_err(|err| {
            error!(?err, "table components could not be registered");
            ConfigError::Invalid {
                field: "registry",
                reason: "save key registered twice",
            }
        })?;
        table.phase_changed.publish(PhaseChanged {
            phase: GamePhase::Betting,
            round_id: 1,
        });
        info!(
            variant = %config.wheel.variant,
            anchors = table.bets.board().len(),
            seed = ?config.seed,
            "table opened"
        );
        Ok(table)
    }

    fn register_components(&mut self) -> Result<(), SnapshotError> {
        self.registry
            .register_component(Self::wheel, Self::wheel_mut)?;
        self.registry.register_component(Self::bets, Self::bets_mut)?;
        self.registry
            .register_component(Self::history, Self::history_mut)?;
        Ok(())
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    /// Table time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        duration_to_ms(self.elapsed)
    }

    pub fn phase_ends_at_ms(&self) -> Option<u64> {
        self.phase_ends_at_ms
    }

    pub fn scheduler(&self) -> &RoundScheduler {
        &self.scheduler
    }

    pub fn wheel(&self) -> &WheelController {
        &self.wheel
    }

    fn wheel_mut(&mut self) -> &mut WheelController {
        &mut self.wheel
    }

    pub fn bets(&self) -> &BetManager<W> {
        &self.bets
    }

    fn bets_mut(&mut self) -> &mut BetManager<W> {
        &mut self.bets
    }

    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    fn history_mut(&mut self) -> &mut RoundHistory {
        &mut self.history
    }

    pub fn wallet(&self) -> &W {
        self.bets.wallet()
    }

    pub fn wallet_mut(&mut self) -> &mut W {
        self.bets.wallet_mut()
    }

    pub fn balance(&self) -> u64 {
        self.bets.wallet().balance()
    }

    pub fn select_chip(&mut self, chip: ChipType) {
        self.bets.select_chip(chip);
    }

    pub fn place_bet(&mut self, anchor_id: AnchorId) -> bool {
        self.betting_open("place_bet") && self.bets.place_bet(anchor_id)
    }

    pub fn place(&mut self, anchor_id: AnchorId, amount: u64) -> bool {
        self.betting_open("place") && self.bets.place(anchor_id, amount)
    }

    pub fn undo(&mut self) -> Option<BetAction> {
        if !self.betting_open("undo") {
            return None;
        }
        self.bets.undo()
    }

    pub fn clear_bets(&mut self) -> u64 {
        if !self.betting_open("clear_bets") {
            return 0;
        }
        self.bets.clear_bets()
    }

    /// Rig the next result. Returns `Ok(false)` once the spin has started.
    pub fn set_target(&mut self, number: u8) -> Result<bool, ConfigError> {
        if !self.betting_open("set_target") {
            return Ok(false);
        }
        self.wheel.set_target(number)?;
        Ok(true)
    }

    /// Close betting and launch the ball. Returns `Ok(false)` outside Betting.
    pub fn request_spin(&mut self) -> Result<bool, ConfigError> {
        if !self.scheduler.can_request_spin(self.phase) {
            debug!(phase = self.phase.as_str(), "spin requested outside betting");
            return Ok(false);
        }
        self.enter_phase(GamePhase::Spinning, None)?;
        Ok(true)
    }

    /// Advance table time by `dt`. Returns the outcome on the tick the round resolves.
    pub fn tick(&mut self, dt: Duration) -> Result<Option<RoundOutcome>, ConfigError> {
        self.elapsed = self.elapsed.saturating_add(dt);
        let now_ms = self.now_ms();

        if let TransitionResult::TransitionTo {
            phase,
            phase_ends_at_ms,
        } = self
            .scheduler
            .check_transition(self.phase, self.phase_ends_at_ms, now_ms)
        {
            self.enter_phase(phase, phase_ends_at_ms)?;
        }

        let Some(stopped) = self.wheel.tick(dt) else {
            return Ok(None);
        };
        if !self.scheduler.can_settle(self.phase) {
            warn!(
                phase = self.phase.as_str(),
                result = stopped.result_number,
                "ball stopped outside a spin"
            );
            return Ok(None);
        }

        let round_id = self.round_id;
        let resolution = self.bets.settle(&stopped);
        let history = self.history.record(round_id, &resolution);
        let ends = self.scheduler.phase_timing(GamePhase::Result, now_ms);
        self.enter_phase(GamePhase::Result, ends)?;
        Ok(Some(RoundOutcome {
            round_id,
            stopped,
            result: resolution.bet_result(),
            resolution,
            history,
        }))
    }

    pub fn capture(&self) -> Result<Snapshot, SnapshotError> {
        self.registry.capture(self)
    }

    /// Restore saved components. Only allowed while betting; on failure the
    /// table is put back the way it was.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<usize, SnapshotError> {
        if self.phase != GamePhase::Betting {
            return Err(SnapshotError::RoundInProgress(self.phase));
        }
        let registry = mem::take(&mut self.registry);
        let result = registry.capture(self).and_then(|backup| {
            registry.restore(self, snapshot).map_err(|err| {
                if let Err(rollback) = registry.restore(self, &backup) {
                    warn!(?rollback, "rollback after failed restore");
                }
                err
            })
        });
        self.registry = registry;
        match &result {
            Ok(restored) => info!(restored, "table state restored"),
            Err(err) => warn!(?err, "table state rejected"),
        }
        result
    }

    pub fn phase_changed(&mut self) -> &mut Signal<PhaseChanged> {
        &mut self.phase_changed
    }

    pub fn ball_stopped(&mut self) -> &mut Signal<BallStopped> {
        self.wheel.ball_stopped()
    }

    pub fn target_selected(&mut self) -> &mut Signal<TargetSelected> {
        self.wheel.target_selected()
    }

    pub fn bet_result(&mut self) -> &mut Signal<BetResult> {
        self.bets.bet_result()
    }

    pub fn bet_amount(&mut self) -> &mut Signal<BetAmountChanged> {
        self.bets.bet_amount()
    }

    pub fn bet_count(&mut self) -> &mut Signal<BetCountChanged> {
        self.bets.ledger_mut().count_changed()
    }

    pub fn chip_selected(&mut self) -> &mut Signal<ChipSelected> {
        self.bets.chip_selected()
    }

    fn betting_open(&self, action: &'static str) -> bool {
        let open = self.scheduler.is_betting_open(self.phase);
        if !open {
            debug!(action, phase = self.phase.as_str(), "betting closed");
        }
        open
    }

    fn enter_phase(
        &mut self,
        phase: GamePhase,
        phase_ends_at_ms: Option<u64>,
    ) -> Result<(), ConfigError> {
        if self.phase == GamePhase::Result && phase == GamePhase::Betting {
            self.round_id = self.round_id.saturating_add(1);
        }
        self.phase = phase;
        self.phase_ends_at_ms = phase_ends_at_ms;
        info!(
            round_id = self.round_id,
            phase = phase.as_str(),
            ends_at_ms = ?phase_ends_at_ms,
            "phase changed"
        );
        self.wheel.on_phase_changed(phase)?;
        self.phase_changed.publish(PhaseChanged {
            phase,
            round_id: self.round_id,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{play_round, seeded_table, FRAME};
    use croupier_types::{BetType, WheelVariant};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_new_table_opens_betting() {
        let mut table = seeded_table(1);
        assert_eq!(table.phase(), GamePhase::Betting);
        assert_eq!(table.round_id(), 1);
        assert_eq!(table.balance(), STARTING_BALANCE);
        assert_eq!(table.phase_ends_at_ms(), None);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        table
            .phase_changed()
            .subscribe(move |event: &PhaseChanged| sink.borrow_mut().push(*event));
        assert_eq!(
            *seen.borrow(),
            vec![PhaseChanged {
                phase: GamePhase::Betting,
                round_id: 1
            }]
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TableConfig {
            phases: PhaseConfig::new(0, 0),
            ..TableConfig::default()
        };
        assert!(matches!(
            Table::new(&config),
            Err(ConfigError::Invalid { field: "phases", .. })
        ));

        let config = TableConfig {
            anchors: vec![AnchorSpec::new(1, BetType::Straight, vec![40])],
            ..TableConfig::default()
        };
        assert!(matches!(
            Table::new(&config),
            Err(ConfigError::AnchorOffWheel { id: 1, number: 40, .. })
        ));
    }

    #[test]
    fn test_custom_anchors_replace_standard_layout() {
        let config = TableConfig {
            seed: Some(2),
            anchors: vec![
                AnchorSpec::new(10, BetType::Straight, vec![5]),
                AnchorSpec::new(11, BetType::Split, vec![5, 8]),
            ],
            ..TableConfig::default()
        };
        let table = Table::new(&config).unwrap();
        assert_eq!(table.bets().board().len(), 2);
        assert!(table.bets().board().contains(11));
    }

    #[test]
    fn test_request_spin_only_from_betting() {
        let mut table = seeded_table(3);
        assert!(table.request_spin().unwrap());
        assert_eq!(table.phase(), GamePhase::Spinning);
        assert!(table.wheel().is_spinning());
        assert!(!table.request_spin().unwrap());
    }

    #[test]
    fn test_betting_closed_while_spinning() {
        let mut table = seeded_table(4);
        let anchor = table.bets().board().find(BetType::Straight, &[7]).unwrap();
        assert!(table.place(anchor, 10));
        table.request_spin().unwrap();

        assert!(!table.place(anchor, 10));
        assert_eq!(table.undo(), None);
        assert_eq!(table.clear_bets(), 0);
        assert_eq!(table.set_target(3), Ok(false));
        assert_eq!(table.bets().total_bet(), 10);
        assert_eq!(table.balance(), STARTING_BALANCE - 10);
    }

    #[test]
    fn test_round_resolves_on_target() {
        let mut table = seeded_table(5);
        let anchor = table.bets().board().find(BetType::Straight, &[26]).unwrap();
        table.place(anchor, 10);
        assert_eq!(table.set_target(26), Ok(true));

        let outcome = play_round(&mut table).unwrap();
        assert_eq!(outcome.round_id, 1);
        assert_eq!(outcome.stopped.result_number, 26);
        assert_eq!(outcome.result.winning_amount, 370);
        assert_eq!(outcome.history.label, "26");
        assert_eq!(table.phase(), GamePhase::Result);
        assert_eq!(table.balance(), STARTING_BALANCE - 10 + 370);
        assert_eq!(table.history().len(), 1);
    }

    #[test]
    fn test_result_phase_returns_to_betting() {
        let mut table = seeded_table(6);
        play_round(&mut table).unwrap();
        let resolved_at = table.now_ms();
        assert_eq!(table.phase_ends_at_ms(), Some(resolved_at + 2_000));

        let mut ticks = 0;
        while table.phase() == GamePhase::Result {
            table.tick(FRAME).unwrap();
            ticks += 1;
            assert!(ticks < 1_000);
        }
        assert_eq!(table.phase(), GamePhase::Betting);
        assert_eq!(table.round_id(), 2);
        assert!(!table.wheel().is_spinning());
        assert!(table.now_ms() >= resolved_at + 2_000);
    }

    #[test]
    fn test_timed_betting_spins_automatically() {
        let config = TableConfig {
            seed: Some(7),
            phases: PhaseConfig::new(1_000, 500),
            ..TableConfig::default()
        };
        let mut table = Table::new(&config).unwrap();
        assert_eq!(table.phase_ends_at_ms(), Some(1_000));
        table.tick(Duration::from_millis(999)).unwrap();
        assert_eq!(table.phase(), GamePhase::Betting);
        table.tick(Duration::from_millis(1)).unwrap();
        assert_eq!(table.phase(), GamePhase::Spinning);
        assert_eq!(table.phase_ends_at_ms(), None);
    }

    #[test]
    fn test_american_table() {
        let config = TableConfig {
            seed: Some(8),
            wheel: WheelConfig::with_variant(WheelVariant::American),
            ..TableConfig::default()
        };
        let mut table = Table::new(&config).unwrap();
        table.set_target(croupier_types::DOUBLE_ZERO).unwrap();
        let outcome = play_round(&mut table).unwrap();
        assert_eq!(outcome.stopped.slot_count, 38);
        assert_eq!(outcome.history.label, "00");
    }

    #[test]
    fn test_restore_rejected_mid_round() {
        let mut table = seeded_table(9);
        let snapshot = table.capture().unwrap();
        table.request_spin().unwrap();
        assert!(matches!(
            table.restore(&snapshot),
            Err(SnapshotError::RoundInProgress(GamePhase::Spinning))
        ));
    }
}
