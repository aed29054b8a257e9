//! Bet anchors: the clickable betting positions and the stakes sitting on them.

use std::collections::BTreeMap;

use croupier_types::{
    AnchorId, AnchorSpec, AnchorStake, BetType, PayoutRule, WheelVariant, DOUBLE_ZERO,
};

use crate::ConfigError;

/// A betting position and the chips on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BetAnchor {
    id: AnchorId,
    bet_type: BetType,
    numbers: Vec<u8>,
    stake: u64,
}

impl BetAnchor {
    pub fn id(&self) -> AnchorId {
        self.id
    }

    pub fn bet_type(&self) -> BetType {
        self.bet_type
    }

    /// Covered numbers, ascending.
    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn covers(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    pub fn stake(&self) -> u64 {
        self.stake
    }

    pub fn add_chips(&mut self, amount: u64) {
        self.stake = self.stake.saturating_add(amount);
    }

    pub fn remove_chips(&mut self, amount: u64) {
        self.stake = self.stake.saturating_sub(amount);
    }

    /// Remove every chip, returning the stake removed.
    pub fn clear(&mut self) -> u64 {
        std::mem::take(&mut self.stake)
    }

    /// Collect the anchor's return for `result` and clear it.
    ///
    /// A covered result pays `stake * multiplier`; anything else forfeits the stake.
    pub fn collect_winnings(&mut self, result: u8, slot_count: u8, rule: PayoutRule) -> u64 {
        let stake = self.clear();
        if !self.covers(result) {
            return 0;
        }
        stake.saturating_mul(rule.multiplier(slot_count, self.numbers.len()))
    }
}

/// Every anchor on the table, keyed by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorBoard {
    variant: WheelVariant,
    rule: PayoutRule,
    anchors: Vec<BetAnchor>,
    index: BTreeMap<AnchorId, usize>,
}

impl AnchorBoard {
    pub fn new(
        variant: WheelVariant,
        rule: PayoutRule,
        specs: impl IntoIterator<Item = AnchorSpec>,
    ) -> Result<Self, ConfigError> {
        let mut anchors = Vec::new();
        let mut index = BTreeMap::new();
        for spec in specs {
            let anchor = validate(variant, rule, spec)?;
            if index.insert(anchor.id, anchors.len()).is_some() {
                return Err(ConfigError::DuplicateAnchor(anchor.id));
            }
            anchors.push(anchor);
        }
        Ok(Self {
            variant,
            rule,
            anchors,
            index,
        })
    }

    /// The full table layout for `variant`.
    pub fn standard(variant: WheelVariant, rule: PayoutRule) -> Result<Self, ConfigError> {
        Self::new(variant, rule, standard_layout(variant))
    }

    pub fn variant(&self) -> WheelVariant {
        self.variant
    }

    pub fn rule(&self) -> PayoutRule {
        self.rule
    }

    pub fn slot_count(&self) -> u8 {
        self.variant.slot_count()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn contains(&self, id: AnchorId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: AnchorId) -> Option<&BetAnchor> {
        self.index.get(&id).map(|&idx| &self.anchors[idx])
    }

    pub fn get_mut(&mut self, id: AnchorId) -> Option<&mut BetAnchor> {
        self.index.get(&id).map(|&idx| &mut self.anchors[idx])
    }

    /// First anchor of `bet_type` covering exactly `numbers` (any order).
    pub fn find(&self, bet_type: BetType, numbers: &[u8]) -> Option<AnchorId> {
        let mut wanted = numbers.to_vec();
        wanted.sort_unstable();
        self.anchors
            .iter()
            .find(|anchor| anchor.bet_type == bet_type && anchor.numbers == wanted)
            .map(|anchor| anchor.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BetAnchor> {
        self.anchors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BetAnchor> {
        self.anchors.iter_mut()
    }

    /// Clear every anchor, returning the total removed.
    pub fn clear_all(&mut self) -> u64 {
        self.anchors
            .iter_mut()
            .fold(0u64, |acc, anchor| acc.saturating_add(anchor.clear()))
    }

    pub fn total_staked(&self) -> u64 {
        self.anchors
            .iter()
            .fold(0u64, |acc, anchor| acc.saturating_add(anchor.stake))
    }

    /// Non-zero stakes in board order.
    pub fn stakes(&self) -> Vec<AnchorStake> {
        self.anchors
            .iter()
            .filter(|anchor| anchor.stake > 0)
            .map(|anchor| AnchorStake {
                anchor_id: anchor.id,
                stake: anchor.stake,
            })
            .collect()
    }
}

fn validate(
    variant: WheelVariant,
    rule: PayoutRule,
    spec: AnchorSpec,
) -> Result<BetAnchor, ConfigError> {
    let AnchorSpec {
        id,
        bet_type,
        mut numbers,
    } = spec;
    let expected = bet_type.coverage();
    if numbers.len() != expected {
        return Err(ConfigError::AnchorCoverage {
            id,
            bet_type,
            got: numbers.len(),
            expected,
        });
    }
    if let Some(&number) = numbers.iter().find(|&&number| !variant.contains(number)) {
        return Err(ConfigError::AnchorOffWheel {
            id,
            number,
            variant,
        });
    }
    numbers.sort_unstable();
    if let Some(pair) = numbers.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(ConfigError::DuplicateAnchorNumber { id, number: pair[0] });
    }
    if !rule.is_exact(numbers.len()) {
        return Err(ConfigError::IndivisiblePayout {
            id,
            covered: numbers.len(),
        });
    }
    Ok(BetAnchor {
        id,
        bet_type,
        numbers,
        stake: 0,
    })
}

/// Every standard betting position on a `variant` table.
///
/// The grid has twelve rows of three (`1 2 3`, `4 5 6`, ...); zeros sit above
/// the first row. Ids are assigned sequentially from 1.
pub fn standard_layout(variant: WheelVariant) -> Vec<AnchorSpec> {
    let double_zero = variant == WheelVariant::American;
    let mut specs: Vec<(BetType, Vec<u8>)> = Vec::new();

    specs.push((BetType::Zero, vec![0]));
    if double_zero {
        specs.push((BetType::DoubleZero, vec![DOUBLE_ZERO]));
    }
    for n in 1..=36u8 {
        specs.push((BetType::Straight, vec![n]));
    }

    // Splits: beside and below on the grid, then across the zeros.
    for n in 1..=36u8 {
        if n % 3 != 0 {
            specs.push((BetType::Split, vec![n, n + 1]));
        }
        if n <= 33 {
            specs.push((BetType::Split, vec![n, n + 3]));
        }
    }
    if double_zero {
        for pair in [[0, 1], [0, 2], [DOUBLE_ZERO, 2], [DOUBLE_ZERO, 3], [0, DOUBLE_ZERO]] {
            specs.push((BetType::Split, pair.to_vec()));
        }
    } else {
        for pair in [[0, 1], [0, 2], [0, 3]] {
            specs.push((BetType::Split, pair.to_vec()));
        }
    }

    // Streets, including the trios that touch the zeros.
    for row in 0..12u8 {
        let first = row * 3 + 1;
        specs.push((BetType::Street, vec![first, first + 1, first + 2]));
    }
    if double_zero {
        specs.push((BetType::Street, vec![0, 1, 2]));
        specs.push((BetType::Street, vec![DOUBLE_ZERO, 2, 3]));
    } else {
        specs.push((BetType::Street, vec![0, 1, 2]));
        specs.push((BetType::Street, vec![0, 2, 3]));
    }

    for n in 1..=32u8 {
        if n % 3 != 0 {
            specs.push((BetType::Corner, vec![n, n + 1, n + 3, n + 4]));
        }
    }
    if !double_zero {
        specs.push((BetType::Corner, vec![0, 1, 2, 3]));
    }

    for row in 0..11u8 {
        let first = row * 3 + 1;
        specs.push((BetType::SixLine, (first..first + 6).collect()));
    }
    for column in 1..=3u8 {
        specs.push((BetType::Column, (column..=36).step_by(3).collect()));
    }
    for dozen in 0..3u8 {
        let first = dozen * 12 + 1;
        specs.push((BetType::Dozen, (first..first + 12).collect()));
    }

    let numbers = 1..=36u8;
    specs.push((BetType::Red, numbers.clone().filter(|&n| croupier_types::is_red(n)).collect()));
    specs.push((BetType::Black, numbers.clone().filter(|&n| !croupier_types::is_red(n)).collect()));
    specs.push((BetType::Even, numbers.clone().filter(|n| n % 2 == 0).collect()));
    specs.push((BetType::Odd, numbers.clone().filter(|n| n % 2 == 1).collect()));
    specs.push((BetType::Low, (1..=18).collect()));
    specs.push((BetType::High, (19..=36).collect()));

    specs
        .into_iter()
        .zip(1..)
        .map(|((bet_type, numbers), id)| AnchorSpec::new(id, bet_type, numbers))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rule: PayoutRule) -> AnchorBoard {
        AnchorBoard::standard(WheelVariant::European, rule).unwrap()
    }

    #[test]
    fn test_standard_layout_counts() {
        let european = board(PayoutRule::SlotRatio);
        let count = |bet_type| european.iter().filter(|a| a.bet_type() == bet_type).count();
        assert_eq!(count(BetType::Straight), 36);
        assert_eq!(count(BetType::Zero), 1);
        assert_eq!(count(BetType::DoubleZero), 0);
        assert_eq!(count(BetType::Split), 60);
        assert_eq!(count(BetType::Street), 14);
        assert_eq!(count(BetType::Corner), 23);
        assert_eq!(count(BetType::SixLine), 11);
        assert_eq!(count(BetType::Column), 3);
        assert_eq!(count(BetType::Dozen), 3);
        for outside in [
            BetType::Red,
            BetType::Black,
            BetType::Even,
            BetType::Odd,
            BetType::Low,
            BetType::High,
        ] {
            assert_eq!(count(outside), 1);
        }

        let american =
            AnchorBoard::standard(WheelVariant::American, PayoutRule::SlotRatio).unwrap();
        let count = |bet_type| american.iter().filter(|a| a.bet_type() == bet_type).count();
        assert_eq!(count(BetType::DoubleZero), 1);
        assert_eq!(count(BetType::Split), 62);
        assert_eq!(count(BetType::Corner), 22);
    }

    #[test]
    fn test_standard_layout_is_valid_under_standard_odds() {
        for variant in [WheelVariant::European, WheelVariant::American] {
            assert!(AnchorBoard::standard(variant, PayoutRule::StandardOdds).is_ok());
        }
    }

    #[test]
    fn test_every_number_has_a_straight_up() {
        let board = board(PayoutRule::SlotRatio);
        for n in 1..=36 {
            assert!(board.find(BetType::Straight, &[n]).is_some());
        }
        assert!(board.find(BetType::Zero, &[0]).is_some());
        assert!(board.find(BetType::Split, &[2, 1]).is_some());
        assert!(board.find(BetType::Split, &[1, 5]).is_none());
    }

    #[test]
    fn test_collect_winnings_clears_stake() {
        let mut board = board(PayoutRule::SlotRatio);
        let straight = board.find(BetType::Straight, &[17]).unwrap();
        let low = board.find(BetType::Low, &(1..=18).collect::<Vec<u8>>()).unwrap();
        let high = board.find(BetType::High, &(19..=36).collect::<Vec<u8>>()).unwrap();

        board.get_mut(straight).unwrap().add_chips(10);
        board.get_mut(low).unwrap().add_chips(20);
        board.get_mut(high).unwrap().add_chips(5);
        assert_eq!(board.total_staked(), 35);

        let rule = board.rule();
        let won: Vec<u64> = board
            .iter_mut()
            .map(|anchor| anchor.collect_winnings(17, 37, rule))
            .filter(|&amount| amount > 0)
            .collect();
        assert_eq!(won, vec![370, 40]);
        assert_eq!(board.total_staked(), 0);
    }

    #[test]
    fn test_stake_arithmetic_saturates() {
        let mut board = board(PayoutRule::SlotRatio);
        let anchor = board.get_mut(1).unwrap();
        anchor.add_chips(u64::MAX);
        anchor.add_chips(1);
        assert_eq!(anchor.stake(), u64::MAX);
        assert_eq!(anchor.collect_winnings(0, 37, PayoutRule::SlotRatio), u64::MAX);
        anchor.remove_chips(5);
        assert_eq!(anchor.stake(), 0);
    }

    #[test]
    fn test_rejects_bad_specs() {
        let european = WheelVariant::European;
        let rule = PayoutRule::SlotRatio;
        assert_eq!(
            AnchorBoard::new(european, rule, [
                AnchorSpec::new(1, BetType::Straight, vec![4]),
                AnchorSpec::new(1, BetType::Straight, vec![5]),
            ]),
            Err(ConfigError::DuplicateAnchor(1))
        );
        assert!(matches!(
            AnchorBoard::new(european, rule, [AnchorSpec::new(2, BetType::Split, vec![4])]),
            Err(ConfigError::AnchorCoverage { id: 2, got: 1, expected: 2, .. })
        ));
        assert!(matches!(
            AnchorBoard::new(
                european,
                rule,
                [AnchorSpec::new(3, BetType::DoubleZero, vec![DOUBLE_ZERO])]
            ),
            Err(ConfigError::AnchorOffWheel { id: 3, number: DOUBLE_ZERO, .. })
        ));
        assert_eq!(
            AnchorBoard::new(european, rule, [AnchorSpec::new(4, BetType::Split, vec![7, 7])]),
            Err(ConfigError::DuplicateAnchorNumber { id: 4, number: 7 })
        );
        assert!(AnchorBoard::new(european, rule, Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_clear_all_returns_total() {
        let mut board = board(PayoutRule::SlotRatio);
        board.get_mut(1).unwrap().add_chips(5);
        board.get_mut(2).unwrap().add_chips(7);
        assert_eq!(
            board.stakes(),
            vec![
                AnchorStake { anchor_id: 1, stake: 5 },
                AnchorStake { anchor_id: 2, stake: 7 },
            ]
        );
        assert_eq!(board.clear_all(), 12);
        assert!(board.stakes().is_empty());
    }
}
