/// Pocket order of a single-zero wheel, clockwise from zero.
pub const EUROPEAN_POCKET_ORDER: [u8; 37] = [
    0, 26, 3, 35, 12, 28, 7, 29, 18, 22, 9, 31, 14, 20, 1, 33, 16, 24, 5, 10, 23, 8, 30, 11, 36,
    13, 27, 6, 34, 17, 25, 2, 21, 4, 19, 15, 32,
];

/// Pocket number that encodes "00" on a double-zero wheel.
pub const DOUBLE_ZERO: u8 = 37;

/// Pocket order of a double-zero wheel, clockwise from zero.
pub const AMERICAN_POCKET_ORDER: [u8; 38] = [
    0, 28, 9, 26, 30, 11, 7, 20, 32, 17, 5, 22, 34, 15, 3, 24, 36, 13, 1, DOUBLE_ZERO, 27, 10, 25,
    29, 12, 8, 19, 31, 18, 6, 21, 33, 16, 4, 23, 35, 14, 2,
];

/// Red numbers on a roulette wheel.
pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Total-return numerator of the official odds table (35:1 straight = 36 back).
pub const STANDARD_ODDS_NUMERATOR: u64 = 36;

/// Starting wallet balance for a new player.
pub const STARTING_BALANCE: u64 = 1_000;

/// How long the result stays on the table before betting reopens.
pub const RESULT_DISPLAY_MS: u64 = 2_000;

/// Number of past results kept by the history panel.
pub const HISTORY_CAPACITY: usize = 20;
