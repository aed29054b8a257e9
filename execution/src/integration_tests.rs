//! Full-round scenarios across the wheel, the betting path and the table loop.
//!
//! These tests drive a [`Table`](crate::Table) the way the live-table service
//! does: select chips, place bets, rig or draw a target, spin and tick frames
//! until the round resolves. They check the money and the history, not the
//! ball physics (which the wheel modules cover).

#[cfg(test)]
mod tests {
    use crate::mocks::{anchor, play_round, seeded_table, wait_for_betting, FRAME};
    use crate::{
        PhaseConfig, SnapshotError, Table, TableConfig, WalletService, WheelConfig,
    };
    use croupier_types::{
        BalanceChanged, BetCountChanged, BetResult, BetType, ChipType, GamePhase, PayoutRule,
        PocketColor, WheelVariant, STARTING_BALANCE,
    };
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn low() -> Vec<u8> {
        (1..=18).collect()
    }

    #[test]
    fn test_seventeen_pays_straight_and_low() {
        let mut table = seeded_table(11);
        let straight = anchor(&table, BetType::Straight, &[17]);
        let low = anchor(&table, BetType::Low, &low());

        table.select_chip(ChipType::Ten);
        assert!(table.place_bet(straight));
        table.select_chip(ChipType::Ten);
        assert!(table.place_bet(low));
        assert!(table.place_bet(low));
        assert_eq!(table.balance(), STARTING_BALANCE - 30);

        table.set_target(17).unwrap();
        let outcome = play_round(&mut table).unwrap();
        assert_eq!(outcome.stopped.result_number, 17);
        assert_eq!(outcome.resolution.total_staked, 30);
        // 10 x 37 on the straight, 20 x (37 / 18) on low.
        assert_eq!(
            outcome.result,
            BetResult {
                winning_amount: 410,
                winner_number: 17,
                lose_amount: 0
            }
        );
        assert_eq!(outcome.resolution.winners().count(), 2);
        assert_eq!(table.balance(), STARTING_BALANCE - 30 + 410);
        assert_eq!(table.bets().total_bet(), 0);
        assert_eq!(table.bets().board().total_staked(), 0);
    }

    #[test]
    fn test_standard_odds_table() {
        let config = TableConfig {
            seed: Some(12),
            payout_rule: PayoutRule::StandardOdds,
            ..TableConfig::default()
        };
        let mut table = Table::new(&config).unwrap();
        table.place(anchor(&table, BetType::Straight, &[17]), 10);
        table.place(anchor(&table, BetType::Low, &low()), 20);
        table.set_target(17).unwrap();
        let outcome = play_round(&mut table).unwrap();
        assert_eq!(outcome.result.winning_amount, 360 + 40);
    }

    #[test]
    fn test_losing_round_reports_stake() {
        let mut table = seeded_table(13);
        table.place(anchor(&table, BetType::Red, &croupier_types::RED_NUMBERS), 50);
        table.set_target(0).unwrap();
        let outcome = play_round(&mut table).unwrap();
        assert_eq!(
            outcome.result,
            BetResult {
                winning_amount: 0,
                winner_number: 0,
                lose_amount: 50
            }
        );
        assert_eq!(outcome.history.color, PocketColor::Green);
        assert!(!outcome.history.won);
        assert_eq!(table.balance(), STARTING_BALANCE - 50);
    }

    #[test]
    fn test_insufficient_funds_leaves_table_untouched() {
        let config = TableConfig {
            seed: Some(14),
            starting_balance: 50,
            ..TableConfig::default()
        };
        let mut table = Table::new(&config).unwrap();
        let counts = Rc::new(RefCell::new(Vec::new()));
        let sink = counts.clone();
        table
            .bet_count()
            .subscribe(move |event: &BetCountChanged| sink.borrow_mut().push(event.count));

        table.select_chip(ChipType::Hundred);
        assert!(!table.place_bet(anchor(&table, BetType::Straight, &[5])));
        assert_eq!(table.balance(), 50);
        assert_eq!(table.bets().total_bet(), 0);
        assert!(table.bets().ledger().is_empty());
        assert_eq!(*counts.borrow(), vec![0]);
    }

    #[test]
    fn test_undo_pops_latest_across_anchors() {
        let mut table = seeded_table(15);
        let a = anchor(&table, BetType::Straight, &[9]);
        let b = anchor(&table, BetType::Odd, &(1..=36).filter(|n| n % 2 == 1).collect::<Vec<u8>>());
        table.place(a, 10);
        table.place(b, 25);
        table.place(a, 10);

        let undone = table.undo().unwrap();
        assert_eq!((undone.anchor_id, undone.amount), (a, 10));
        let undone = table.undo().unwrap();
        assert_eq!((undone.anchor_id, undone.amount), (b, 25));
        assert_eq!(table.bets().board().get(a).unwrap().stake(), 10);
        assert_eq!(table.balance(), STARTING_BALANCE - 10);
    }

    #[test]
    fn test_balance_signal_tracks_profit() {
        let mut table = seeded_table(16);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        table
            .wallet_mut()
            .balance_changed()
            .subscribe(move |event: &BalanceChanged| sink.borrow_mut().push(*event));

        table.place(anchor(&table, BetType::Straight, &[3]), 10);
        table.set_target(3).unwrap();
        play_round(&mut table).unwrap();

        let last = *seen.borrow().last().unwrap();
        assert_eq!(last.balance, STARTING_BALANCE + 360);
        assert_eq!(last.profit, 360);
        // Replay, debit, one credit for the whole round.
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_rounds_cycle_and_history_grows() {
        let mut table = seeded_table(17);
        let mut numbers = Vec::new();
        for round in 1..=4u64 {
            assert_eq!(table.round_id(), round);
            let outcome = play_round(&mut table).unwrap();
            assert_eq!(outcome.round_id, round);
            assert_eq!(outcome.stopped.result_number, outcome.history.number);
            numbers.push(outcome.stopped.result_number);
            assert!(wait_for_betting(&mut table));
        }
        let recorded: Vec<u8> = table.history().entries().map(|entry| entry.number).collect();
        numbers.reverse();
        assert_eq!(recorded, numbers);
        assert_eq!(table.round_id(), 5);
    }

    #[test]
    fn test_same_seed_same_table() {
        let play = |seed: u64| {
            let mut table = seeded_table(seed);
            let mut results = Vec::new();
            for _ in 0..3 {
                let outcome = play_round(&mut table).unwrap();
                results.push((outcome.stopped.result_number, table.now_ms()));
                wait_for_betting(&mut table);
            }
            results
        };
        assert_eq!(play(99), play(99));
    }

    #[test]
    fn test_restore_round_trip_between_tables() {
        let mut table = seeded_table(18);
        let a = anchor(&table, BetType::Dozen, &(13..=24).collect::<Vec<u8>>());
        let b = anchor(&table, BetType::Zero, &[0]);
        table.select_chip(ChipType::Five);
        table.place_bet(a);
        table.place_bet(b);
        table.place_bet(a);
        table.set_target(22).unwrap();
        let snapshot = table.capture().unwrap();
        let text = serde_json::to_string(&snapshot).unwrap();

        let mut restored = seeded_table(19);
        let snapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(restored.restore(&snapshot).unwrap(), 3);
        assert_eq!(restored.wheel().target(), 22);
        assert_eq!(restored.bets().board().get(a).unwrap().stake(), 10);
        assert_eq!(restored.bets().ledger().len(), 3);
        assert_eq!(restored.bets().selected_chip(), Some(ChipType::Five));
        assert_eq!(restored.capture().unwrap(), table.capture().unwrap());
        assert_eq!(restored.balance(), STARTING_BALANCE - 15);

        let outcome = play_round(&mut restored).unwrap();
        assert_eq!(outcome.stopped.result_number, 22);
        assert_eq!(outcome.result.winning_amount, 10 * 3);
    }

    #[test]
    fn test_restore_keeps_chips_on_table_accounted() {
        let mut table = seeded_table(1);
        let empty = table.capture().unwrap();
        let seventeen = anchor(&table, BetType::Straight, &[17]);
        assert!(table.place(seventeen, 100));
        let before = table.balance() + table.bets().total_bet();

        assert_eq!(table.restore(&empty).unwrap(), 3);
        assert_eq!(table.bets().total_bet(), 0);
        assert_eq!(table.balance() + table.bets().total_bet(), before);
        assert_eq!(table.balance(), STARTING_BALANCE);
    }

    #[test]
    fn test_failed_restore_rolls_back() {
        let mut table = seeded_table(20);
        let a = anchor(&table, BetType::Straight, &[4]);
        table.place(a, 10);
        table.set_target(4).unwrap();
        let before = table.capture().unwrap();

        let mut other = seeded_table(21);
        other.place(anchor(&other, BetType::Straight, &[30]), 5);
        other.set_target(30).unwrap();
        let mut snapshot = other.capture().unwrap();
        snapshot.insert(
            "bets",
            serde_json::json!({
                "actions": [{"anchor_id": 99999, "amount": 5}],
                "stakes": [],
            }),
        );

        assert!(matches!(
            table.restore(&snapshot),
            Err(SnapshotError::UnknownAnchor(99999))
        ));
        assert_eq!(table.capture().unwrap(), before);
        assert_eq!(table.wheel().target(), 4);
    }

    #[test]
    fn test_timed_table_plays_itself() {
        let config = TableConfig {
            seed: Some(22),
            phases: PhaseConfig::new(500, 250),
            ..TableConfig::default()
        };
        let mut table = Table::new(&config).unwrap();
        let phases = Rc::new(RefCell::new(Vec::new()));
        let sink = phases.clone();
        table
            .phase_changed()
            .subscribe(move |event| sink.borrow_mut().push(event.phase));

        let mut resolved = 0;
        for _ in 0..200_000 {
            if table.tick(FRAME).unwrap().is_some() {
                resolved += 1;
                if resolved == 2 {
                    break;
                }
            }
        }
        assert_eq!(resolved, 2);
        assert_eq!(
            *phases.borrow(),
            vec![
                GamePhase::Betting,
                GamePhase::Spinning,
                GamePhase::Result,
                GamePhase::Betting,
                GamePhase::Spinning,
                GamePhase::Result,
            ]
        );
    }

    #[test]
    fn test_coarse_ticks_still_resolve_on_target() {
        let config = TableConfig {
            seed: Some(23),
            wheel: WheelConfig::with_variant(WheelVariant::American),
            ..TableConfig::default()
        };
        let mut table = Table::new(&config).unwrap();
        table.set_target(36).unwrap();
        table.request_spin().unwrap();
        let outcome = (0..10_000)
            .find_map(|_| table.tick(Duration::from_millis(250)).unwrap())
            .unwrap();
        assert_eq!(outcome.stopped.result_number, 36);
        assert_eq!(table.phase(), GamePhase::Result);
    }

    /// Wallet that refuses any single debit above a house limit.
    #[derive(Debug)]
    struct LimitWallet {
        balance: u64,
        limit: u64,
    }

    impl WalletService for LimitWallet {
        fn try_spend(&mut self, amount: u64) -> bool {
            if amount > self.limit || amount > self.balance {
                return false;
            }
            self.balance -= amount;
            true
        }

        fn add_funds(&mut self, amount: u64) {
            self.balance += amount;
        }

        fn balance(&self) -> u64 {
            self.balance
        }
    }

    #[test]
    fn test_custom_wallet_service() {
        let wallet = LimitWallet {
            balance: 500,
            limit: 25,
        };
        let config = TableConfig {
            seed: Some(24),
            ..TableConfig::default()
        };
        let mut table = Table::with_wallet(&config, wallet).unwrap();
        let a = anchor(&table, BetType::Column, &(1..=34).step_by(3).collect::<Vec<u8>>());
        assert!(!table.place(a, 50));
        assert!(table.place(a, 25));
        table.set_target(7).unwrap();
        let outcome = play_round(&mut table).unwrap();
        assert_eq!(outcome.result.winning_amount, 25 * 3);
        assert_eq!(table.wallet().balance, 500 - 25 + 75);
    }
}
