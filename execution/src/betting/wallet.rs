//! Player balance.

use croupier_types::{BalanceChanged, STARTING_BALANCE};
use tracing::debug;

use crate::Signal;

/// Balance operations the betting path depends on.
pub trait WalletService {
    /// Deduct `amount` if the balance covers it. Never deducts partially.
    fn try_spend(&mut self, amount: u64) -> bool;
    fn add_funds(&mut self, amount: u64);
    fn balance(&self) -> u64;
}

/// In-memory wallet that reports every balance change.
#[derive(Debug)]
pub struct Wallet {
    balance: u64,
    starting_balance: u64,
    balance_changed: Signal<BalanceChanged>,
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(STARTING_BALANCE)
    }
}

impl Wallet {
    pub fn new(starting_balance: u64) -> Self {
        let mut wallet = Self {
            balance: starting_balance,
            starting_balance,
            balance_changed: Signal::replaying("balance_changed"),
        };
        wallet.notify();
        wallet
    }

    pub fn starting_balance(&self) -> u64 {
        self.starting_balance
    }

    /// Balance relative to the starting balance.
    pub fn profit(&self) -> i64 {
        let balance = i128::from(self.balance);
        let start = i128::from(self.starting_balance);
        (balance - start).clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    pub fn balance_changed(&mut self) -> &mut Signal<BalanceChanged> {
        &mut self.balance_changed
    }

    fn notify(&mut self) {
        let event = BalanceChanged {
            balance: self.balance,
            profit: self.profit(),
        };
        self.balance_changed.publish(event);
    }
}

impl WalletService for Wallet {
    fn try_spend(&mut self, amount: u64) -> bool {
        let Some(balance) = self.balance.checked_sub(amount) else {
            debug!(amount, balance = self.balance, "insufficient funds");
            return false;
        };
        self.balance = balance;
        self.notify();
        true
    }

    fn add_funds(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
        self.notify();
    }

    fn balance(&self) -> u64 {
        self.balance
    }
}
