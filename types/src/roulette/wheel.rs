use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AMERICAN_POCKET_ORDER, DOUBLE_ZERO, EUROPEAN_POCKET_ORDER, RED_NUMBERS};

/// Physical wheel variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelVariant {
    /// Single zero, 37 pockets.
    #[default]
    European,
    /// Zero and double zero, 38 pockets.
    American,
}

impl WheelVariant {
    /// Pocket numbers in wheel order.
    pub fn pocket_order(&self) -> &'static [u8] {
        match self {
            WheelVariant::European => &EUROPEAN_POCKET_ORDER,
            WheelVariant::American => &AMERICAN_POCKET_ORDER,
        }
    }

    /// Number of pockets on the wheel.
    pub fn slot_count(&self) -> u8 {
        match self {
            WheelVariant::European => 37,
            WheelVariant::American => 38,
        }
    }

    /// Whether `number` names a pocket on this wheel.
    pub fn contains(&self, number: u8) -> bool {
        number < self.slot_count()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WheelVariant::European => "european",
            WheelVariant::American => "american",
        }
    }
}

impl fmt::Display for WheelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pocket color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PocketColor {
    Green,
    Red,
    Black,
}

impl PocketColor {
    pub fn of(number: u8) -> Self {
        if number == 0 || number == DOUBLE_ZERO {
            PocketColor::Green
        } else if is_red(number) {
            PocketColor::Red
        } else {
            PocketColor::Black
        }
    }
}

/// Check if a number is red.
pub fn is_red(number: u8) -> bool {
    RED_NUMBERS.contains(&number)
}

/// Display label of a pocket ("00" for the double zero).
pub fn pocket_label(number: u8) -> String {
    if number == DOUBLE_ZERO {
        "00".to_string()
    } else {
        number.to_string()
    }
}
