use super::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

#[test]
fn test_pocket_orders_cover_every_number_once() {
    for variant in [WheelVariant::European, WheelVariant::American] {
        let order = variant.pocket_order();
        assert_eq!(order.len(), variant.slot_count() as usize);
        let distinct: BTreeSet<u8> = order.iter().copied().collect();
        assert_eq!(distinct.len(), order.len());
        assert!(order.iter().all(|&number| variant.contains(number)));
        assert_eq!(order[0], 0);
    }
}

#[test]
fn test_double_zero_only_on_american_wheel() {
    assert!(!WheelVariant::European.contains(DOUBLE_ZERO));
    assert!(WheelVariant::American.contains(DOUBLE_ZERO));
    assert_eq!(pocket_label(DOUBLE_ZERO), "00");
    assert_eq!(pocket_label(0), "0");
    assert_eq!(pocket_label(17), "17");
}

#[test]
fn test_pocket_colors() {
    assert_eq!(PocketColor::of(0), PocketColor::Green);
    assert_eq!(PocketColor::of(DOUBLE_ZERO), PocketColor::Green);
    assert_eq!(PocketColor::of(1), PocketColor::Red);
    assert_eq!(PocketColor::of(2), PocketColor::Black);
    assert_eq!(PocketColor::of(36), PocketColor::Red);
    let reds = (1..=36).filter(|&n| PocketColor::of(n) == PocketColor::Red).count();
    assert_eq!(reds, 18);
}

#[test]
fn test_chip_values_roundtrip() {
    let values: Vec<u64> = ChipType::ALL.iter().map(|chip| chip.value()).collect();
    assert_eq!(values, vec![1, 5, 10, 50, 100, 500]);
    for chip in ChipType::ALL {
        assert_eq!(ChipType::try_from(chip.value()), Ok(chip));
    }
    assert_eq!(ChipType::try_from(25), Err(ChipValueError::Unknown(25)));
}

#[test]
fn test_chip_serializes_as_face_value() {
    let encoded = serde_json::to_string(&ChipType::Fifty).unwrap();
    assert_eq!(encoded, "50");
    let decoded: ChipType = serde_json::from_str("500").unwrap();
    assert_eq!(decoded, ChipType::FiveHundred);
    assert!(serde_json::from_str::<ChipType>("7").is_err());
}

#[test]
fn test_slot_ratio_truncates() {
    let rule = PayoutRule::SlotRatio;
    assert_eq!(rule.multiplier(37, 1), 37);
    assert_eq!(rule.multiplier(37, 18), 2);
    assert_eq!(rule.multiplier(37, 12), 3);
    assert_eq!(rule.multiplier(38, 2), 19);
    assert_eq!(rule.multiplier(37, 0), 0);
}

#[test]
fn test_standard_odds_table() {
    let rule = PayoutRule::StandardOdds;
    let table: Vec<(usize, u64)> = [1, 2, 3, 4, 6, 12, 18]
        .into_iter()
        .map(|covered| (covered, rule.multiplier(37, covered)))
        .collect();
    assert_eq!(
        table,
        vec![(1, 36), (2, 18), (3, 12), (4, 9), (6, 6), (12, 3), (18, 2)]
    );
    assert!(rule.is_exact(12));
    assert!(!rule.is_exact(5));
    assert!(PayoutRule::SlotRatio.is_exact(5));
    assert!(!PayoutRule::SlotRatio.is_exact(0));
}

#[test]
fn test_bet_type_coverage() {
    assert_eq!(BetType::Straight.coverage(), 1);
    assert_eq!(BetType::SixLine.coverage(), 6);
    assert_eq!(BetType::Dozen.coverage(), 12);
    assert_eq!(BetType::Red.coverage(), 18);
    assert_eq!(BetType::DoubleZero.coverage(), 1);
}

#[test]
fn test_phase_serde_uses_snake_case() {
    let encoded = serde_json::to_string(&GamePhase::Spinning).unwrap();
    assert_eq!(encoded, "\"spinning\"");
    let variant: WheelVariant = serde_json::from_str("\"american\"").unwrap();
    assert_eq!(variant, WheelVariant::American);
}

#[test]
fn test_bets_save_total() {
    let save = BetsSave {
        actions: vec![
            BetAction { anchor_id: 1, amount: 10 },
            BetAction { anchor_id: 2, amount: 20 },
        ],
        stakes: vec![],
        selected_chip: Some(ChipType::Ten),
    };
    assert_eq!(save.total(), 30);
    let decoded: BetsSave =
        serde_json::from_str(&serde_json::to_string(&save).unwrap()).unwrap();
    assert_eq!(decoded, save);
}

proptest! {
    #[test]
    fn test_slot_ratio_never_exceeds_slot_count(slot_count in 1u8..=38, covered in 1usize..=38) {
        let multiplier = PayoutRule::SlotRatio.multiplier(slot_count, covered);
        prop_assert!(multiplier <= u64::from(slot_count));
        prop_assert!(multiplier * covered as u64 <= u64::from(slot_count));
    }
}
