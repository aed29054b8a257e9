use croupier_types::{AnchorId, BetType, GamePhase, WheelVariant};
use thiserror::Error as ThisError;

/// Fatal configuration problems. Surfaced at construction or before a spin starts,
/// never recovered from by the table itself.
#[derive(Debug, ThisError, Clone, PartialEq)]
pub enum ConfigError {
    #[error("pocket layout is empty")]
    EmptyLayout,
    #[error("pocket {0} appears more than once in the layout")]
    DuplicatePocket(u8),
    #[error("pocket {number} is not on the wheel")]
    UnknownPocket { number: u8 },
    #[error("divider angle leaves no room for pockets (slots={slots}, divider={divider})")]
    InvalidDivider { slots: usize, divider: f32 },
    #[error("target number out of range (got={number}, slots={slot_count})")]
    TargetOutOfRange { number: u8, slot_count: u8 },
    #[error("anchor {0} is defined more than once")]
    DuplicateAnchor(AnchorId),
    #[error("anchor {id} lists number {number} twice")]
    DuplicateAnchorNumber { id: AnchorId, number: u8 },
    #[error("anchor {id} covers {got} numbers, a {bet_type:?} bet covers {expected}")]
    AnchorCoverage {
        id: AnchorId,
        bet_type: BetType,
        got: usize,
        expected: usize,
    },
    #[error("anchor {id} covers {number}, which is not on a {variant} wheel")]
    AnchorOffWheel {
        id: AnchorId,
        number: u8,
        variant: WheelVariant,
    },
    #[error("anchor {id} covers {covered} numbers, which does not divide the payout table")]
    IndivisiblePayout { id: AnchorId, covered: usize },
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Failures while capturing or restoring table state.
#[derive(Debug, ThisError)]
pub enum SnapshotError {
    #[error("save key {0} is registered twice")]
    DuplicateKey(&'static str),
    #[error("save entry {key} could not be encoded or decoded")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("saved bet references unknown anchor {0}")]
    UnknownAnchor(AnchorId),
    #[error("saved bet on anchor {0} has zero amount")]
    ZeroAmount(AnchorId),
    #[error("saved stake disagrees with the ledger (anchor={anchor_id}, saved={saved}, replayed={replayed})")]
    InconsistentStake {
        anchor_id: AnchorId,
        saved: u64,
        replayed: u64,
    },
    #[error("saved bets cost more than the wallet holds (needed={needed}, available={available})")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("state can only be restored while betting (phase={0:?})")]
    RoundInProgress(GamePhase),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
