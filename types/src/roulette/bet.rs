use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use super::STANDARD_ODDS_NUMERATOR;

/// Identifier of a bet anchor on the layout.
pub type AnchorId = u32;

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum ChipValueError {
    #[error("no chip with value {0}")]
    Unknown(u64),
}

/// Chip denominations available at the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum ChipType {
    One,
    Five,
    Ten,
    Fifty,
    Hundred,
    FiveHundred,
}

impl ChipType {
    pub const ALL: [ChipType; 6] = [
        ChipType::One,
        ChipType::Five,
        ChipType::Ten,
        ChipType::Fifty,
        ChipType::Hundred,
        ChipType::FiveHundred,
    ];

    /// Face value in balance units.
    pub const fn value(self) -> u64 {
        match self {
            ChipType::One => 1,
            ChipType::Five => 5,
            ChipType::Ten => 10,
            ChipType::Fifty => 50,
            ChipType::Hundred => 100,
            ChipType::FiveHundred => 500,
        }
    }
}

impl From<ChipType> for u64 {
    fn from(chip: ChipType) -> Self {
        chip.value()
    }
}

impl TryFrom<u64> for ChipType {
    type Error = ChipValueError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        ChipType::ALL
            .into_iter()
            .find(|chip| chip.value() == value)
            .ok_or(ChipValueError::Unknown(value))
    }
}

/// Roulette bet types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetType {
    Straight,
    Split,
    Street,
    Corner,
    SixLine,
    Column,
    Dozen,
    Red,
    Black,
    Even,
    Odd,
    Low,
    High,
    Zero,
    DoubleZero,
}

impl BetType {
    /// How many numbers an anchor of this type covers.
    pub const fn coverage(self) -> usize {
        match self {
            BetType::Straight | BetType::Zero | BetType::DoubleZero => 1,
            BetType::Split => 2,
            BetType::Street => 3,
            BetType::Corner => 4,
            BetType::SixLine => 6,
            BetType::Column | BetType::Dozen => 12,
            BetType::Red
            | BetType::Black
            | BetType::Even
            | BetType::Odd
            | BetType::Low
            | BetType::High => 18,
        }
    }
}

/// Description of a bet anchor: a betting position and the numbers it covers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSpec {
    pub id: AnchorId,
    pub bet_type: BetType,
    pub numbers: Vec<u8>,
}

impl AnchorSpec {
    pub fn new(id: AnchorId, bet_type: BetType, numbers: Vec<u8>) -> Self {
        Self {
            id,
            bet_type,
            numbers,
        }
    }
}

/// How a winning anchor's multiplier is derived from its coverage.
///
/// Chips are debited when placed, so the multiplier is the total return
/// (stake included).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutRule {
    /// `slot_count / covered`, truncated.
    #[default]
    SlotRatio,
    /// `36 / covered`, the official odds table.
    StandardOdds,
}

impl PayoutRule {
    /// Total-return multiplier for an anchor covering `covered` numbers.
    pub fn multiplier(self, slot_count: u8, covered: usize) -> u64 {
        if covered == 0 {
            return 0;
        }
        let covered = covered as u64;
        match self {
            PayoutRule::SlotRatio => u64::from(slot_count) / covered,
            PayoutRule::StandardOdds => STANDARD_ODDS_NUMERATOR / covered,
        }
    }

    /// Whether an anchor covering `covered` numbers pays an exact multiple under this rule.
    pub fn is_exact(self, covered: usize) -> bool {
        match self {
            PayoutRule::SlotRatio => covered > 0,
            PayoutRule::StandardOdds => {
                covered > 0 && STANDARD_ODDS_NUMERATOR % covered as u64 == 0
            }
        }
    }
}

/// One chip placement on the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetAction {
    pub anchor_id: AnchorId,
    pub amount: u64,
}

/// Aggregated stake on one anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedBet {
    pub anchor_id: AnchorId,
    pub total_amount: u64,
}

/// Table game phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Betting,
    Spinning,
    Result,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Betting => "betting",
            GamePhase::Spinning => "spinning",
            GamePhase::Result => "result",
        }
    }
}
