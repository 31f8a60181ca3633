//! Currency ledger.
//!
//! Tracks the spendable gold balance plus the monotonic lifetime total.
//! All mutation goes through `earn` and `spend` so the balance can never
//! go negative and bogus amounts are dropped instead of corrupting state.

use serde::{Deserialize, Serialize};

/// The village's gold accounts.
///
/// `gold` is the spendable balance; `lifetime_gold` only ever grows and
/// survives prestige (a full reset is the only thing that clears it).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ledger {
    pub gold: f64,
    pub lifetime_gold: f64,
}

impl Ledger {
    /// Spendable balance floored to whole gold, for display and pricing.
    pub fn balance(&self) -> u64 {
        self.gold.max(0.0).floor() as u64
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        self.gold >= cost as f64
    }

    /// Deducts `cost` if the balance covers it. Returns whether it did.
    pub fn spend(&mut self, cost: u64) -> bool {
        if self.can_afford(cost) {
            self.gold -= cost as f64;
            true
        } else {
            false
        }
    }

    /// Credits `amount`. Zero, negative, and non-finite amounts are ignored.
    pub fn earn(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.gold += amount;
            self.lifetime_gold += amount;
        }
    }
}
