//! Round scheduler state machine for the roulette table.
//!
//! This module provides a deterministic state machine for the table's round
//! phases. It encapsulates the phase transition logic and timing calculations
//! separately from the wheel, the bets and the clock that drives them.
//!
//! ## Phases
//!
//! A round progresses through three phases:
//! 1. **Betting** - Players can place, undo and clear bets
//! 2. **Spinning** - Bets are locked, the ball is in flight
//! 3. **Result** - Payouts are settled and the result is on display
//!
//! Betting ends either on an explicit spin request or, when `betting_ms` is
//! non-zero, when its timer runs out. Spinning has no timer: it ends when the
//! ball lands. Result always lasts `result_ms`.
//!
//! ## Deterministic Clock
//!
//! All timing is in milliseconds of table time, accumulated from tick deltas
//! rather than read from the wall clock.
//!
//! ## Usage
//!
//! ```rust
//! use croupier_execution::round_scheduler::{PhaseConfig, RoundScheduler, TransitionResult};
//! use croupier_types::GamePhase;
//!
//! let scheduler = RoundScheduler::new(PhaseConfig::new(15_000, 2_000));
//!
//! // A round opens at t=0 with a timed betting window.
//! let ends = scheduler.phase_timing(GamePhase::Betting, 0);
//! assert_eq!(ends, Some(15_000));
//!
//! // Later, the window closes and the wheel spins.
//! assert_eq!(
//!     scheduler.check_transition(GamePhase::Betting, ends, 15_000),
//!     TransitionResult::TransitionTo { phase: GamePhase::Spinning, phase_ends_at_ms: None },
//! );
//! ```

use std::time::Duration;

use croupier_types::{GamePhase, RESULT_DISPLAY_MS};
use serde::{Deserialize, Serialize};

/// Phase configuration with durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    /// Duration of the betting phase in milliseconds; zero waits for a spin request.
    pub betting_ms: u64,
    /// Duration of the result phase in milliseconds.
    pub result_ms: u64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            betting_ms: 0,
            result_ms: RESULT_DISPLAY_MS,
        }
    }
}

impl PhaseConfig {
    /// Create a new phase configuration with the given durations.
    pub fn new(betting_ms: u64, result_ms: u64) -> Self {
        Self {
            betting_ms,
            result_ms,
        }
    }

    /// Validate the configuration (the result phase must have a duration).
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.result_ms == 0 {
            return Err("result_ms must be greater than zero");
        }
        Ok(())
    }

    /// Whether betting closes on a timer rather than on request.
    pub fn is_timed_betting(&self) -> bool {
        self.betting_ms > 0
    }

    /// Get the duration for a specific phase, or `None` if the phase has no timer.
    pub fn duration_for_phase(&self, phase: GamePhase) -> Option<u64> {
        match phase {
            GamePhase::Betting => self.is_timed_betting().then_some(self.betting_ms),
            GamePhase::Spinning => None, // Ends when the ball lands
            GamePhase::Result => Some(self.result_ms),
        }
    }
}

/// Result of a phase transition check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionResult {
    /// No transition needed, remain in current phase.
    NoTransition,
    /// Transition to the specified phase with the given end time.
    TransitionTo {
        phase: GamePhase,
        phase_ends_at_ms: Option<u64>,
    },
}

/// Pure state machine for round phase management.
///
/// This struct provides deterministic phase transition logic without any I/O.
/// It can be used to:
/// - Determine if a timed phase transition is due
/// - Calculate the next phase and its end time
/// - Validate whether an action is allowed in the current phase
#[derive(Clone, Debug)]
pub struct RoundScheduler {
    config: PhaseConfig,
}

impl RoundScheduler {
    /// Create a new round scheduler with the given configuration.
    pub fn new(config: PhaseConfig) -> Self {
        Self { config }
    }

    /// Get the phase configuration.
    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    /// Determine the next phase after the given phase. The cycle never ends.
    pub fn next_phase(phase: GamePhase) -> GamePhase {
        match phase {
            GamePhase::Betting => GamePhase::Spinning,
            GamePhase::Spinning => GamePhase::Result,
            GamePhase::Result => GamePhase::Betting,
        }
    }

    /// Check if a timed transition from the current phase is due.
    ///
    /// A transition is due when:
    /// - The phase has an end time and current time >= phase_ends_at_ms
    /// - The phase is not Spinning (which only ends on a landed ball)
    pub fn check_transition(
        &self,
        current_phase: GamePhase,
        phase_ends_at_ms: Option<u64>,
        now_ms: u64,
    ) -> TransitionResult {
        // Untimed phase
        let Some(ends_at) = phase_ends_at_ms else {
            return TransitionResult::NoTransition;
        };

        // Not time yet
        if now_ms < ends_at || current_phase == GamePhase::Spinning {
            return TransitionResult::NoTransition;
        }

        let next_phase = Self::next_phase(current_phase);
        TransitionResult::TransitionTo {
            phase: next_phase,
            phase_ends_at_ms: self.phase_timing(next_phase, now_ms),
        }
    }

    /// Calculate the end time of `phase` if it starts at `start_time_ms`.
    pub fn phase_timing(&self, phase: GamePhase, start_time_ms: u64) -> Option<u64> {
        self.config
            .duration_for_phase(phase)
            .map(|duration| start_time_ms.saturating_add(duration))
    }

    /// Check if bets may be placed, undone or cleared.
    pub fn is_betting_open(&self, current_phase: GamePhase) -> bool {
        matches!(current_phase, GamePhase::Betting)
    }

    /// Check if a spin may be requested.
    pub fn can_request_spin(&self, current_phase: GamePhase) -> bool {
        matches!(current_phase, GamePhase::Betting)
    }

    /// Check if a landed ball should be settled.
    pub fn can_settle(&self, current_phase: GamePhase) -> bool {
        matches!(current_phase, GamePhase::Spinning)
    }
}

/// Convert a table-time duration to whole milliseconds, saturating.
#[inline]
pub fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
