use std::time::Duration;

use croupier_types::{AnchorId, BallStopped, BetType, GamePhase};

use crate::wheel::{WheelConfig, WheelController};
use crate::{RoundOutcome, Table, TableConfig, TableRng, WalletService};

/// One 60 Hz frame.
pub const FRAME: Duration = Duration::from_micros(16_667);

/// Upper bound on frames for a single spin (about half an hour of table time).
pub const MAX_SPIN_FRAMES: usize = 100_000;

/// Creates a manual-spin European table with a fixed seed
pub fn seeded_table(seed: u64) -> Table {
    let config = TableConfig {
        seed: Some(seed),
        ..TableConfig::default()
    };
    match Table::new(&config) {
        Ok(table) => table,
        Err(err) => panic!("default table config rejected: {err}"),
    }
}

/// Creates a wheel with default geometry for `config.variant`
pub fn test_wheel(config: &WheelConfig, seed: u64) -> WheelController {
    match WheelController::new(config, TableRng::seeded(seed)) {
        Ok(wheel) => wheel,
        Err(err) => panic!("wheel config rejected: {err}"),
    }
}

/// Ticks `wheel` by `dt` until the ball lands or `max_ticks` run out
pub fn run_until_stopped(
    wheel: &mut WheelController,
    dt: Duration,
    max_ticks: usize,
) -> Option<BallStopped> {
    (0..max_ticks).find_map(|_| wheel.tick(dt))
}

/// Spins from Betting and ticks until the round resolves
pub fn play_round<W: WalletService + 'static>(table: &mut Table<W>) -> Option<RoundOutcome> {
    if table.phase() == GamePhase::Betting && !table.request_spin().ok()? {
        return None;
    }
    for _ in 0..MAX_SPIN_FRAMES {
        if let Some(outcome) = table.tick(FRAME).ok()? {
            return Some(outcome);
        }
    }
    None
}

/// Ticks through the Result phase until betting reopens
pub fn wait_for_betting<W: WalletService + 'static>(table: &mut Table<W>) -> bool {
    for _ in 0..MAX_SPIN_FRAMES {
        if table.phase() == GamePhase::Betting {
            return true;
        }
        if table.tick(FRAME).is_err() {
            return false;
        }
    }
    false
}

/// Looks up an anchor on the table by bet type and covered numbers
pub fn anchor<W: WalletService + 'static>(
    table: &Table<W>,
    bet_type: BetType,
    numbers: &[u8],
) -> AnchorId {
    match table.bets().board().find(bet_type, numbers) {
        Some(id) => id,
        None => panic!("no {bet_type:?} anchor covering {numbers:?}"),
    }
}
