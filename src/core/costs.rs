//! Tiered cost scaler.
//!
//! Generator prices compound per purchase through three growth tiers: the
//! first ten purchases grow gently, the next fifteen harder, and everything
//! past that steeply. The running cost is floored to whole gold after every
//! step, so cheap generators sit at their base price for a stretch before
//! the curve catches up — that plateau is intended.

use crate::core::bonus::{bonus_sum, BonusTarget, EffectType};
use crate::core::constants::*;
use crate::core::game_state::GameState;
use crate::generators::GeneratorType;

/// Growth factor charged for one purchase index.
pub fn growth_factor(purchase_index: u32) -> f64 {
    if purchase_index < COST_TIER_MID_START {
        COST_TIER_EARLY
    } else if purchase_index < COST_TIER_LATE_START {
        COST_TIER_MID
    } else {
        COST_TIER_LATE
    }
}

/// Undiscounted price after `purchases` prior purchases.
///
/// Applies each purchase's growth factor in sequence, flooring after every
/// multiplication.
pub fn tiered_cost(base_cost: u64, purchases: u32) -> u64 {
    let mut cost = base_cost as f64;
    for index in 0..purchases {
        cost = (cost * growth_factor(index)).floor();
    }
    cost as u64
}

/// Applies a total cost reduction to a price.
///
/// The reduction is clamped to [0, 0.75] and the result floored; a price of
/// zero is legal.
pub fn apply_discount(cost: u64, reduction: f64) -> u64 {
    let reduction = reduction.clamp(0.0, COST_REDUCTION_CAP);
    (cost as f64 * (1.0 - reduction)).floor() as u64
}

/// The price the player actually pays for the next unit of `ty`.
pub fn generator_price(state: &GameState, ty: GeneratorType) -> u64 {
    let undiscounted = tiered_cost(ty.base_cost(), state.generator(ty).count);
    let reduction = bonus_sum(state, EffectType::CostReduction, BonusTarget::Generator(ty));
    apply_discount(undiscounted, reduction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_factor_tiers() {
        assert_eq!(growth_factor(0), COST_TIER_EARLY);
        assert_eq!(growth_factor(9), COST_TIER_EARLY);
        assert_eq!(growth_factor(10), COST_TIER_MID);
        assert_eq!(growth_factor(24), COST_TIER_MID);
        assert_eq!(growth_factor(25), COST_TIER_LATE);
        assert_eq!(growth_factor(1000), COST_TIER_LATE);
    }

    #[test]
    fn test_tiered_cost_floors_every_step() {
        // floor(5 * 1.15) == 5, so the villager price plateaus through the
        // entire early tier before the mid tier finally moves it.
        assert_eq!(tiered_cost(5, 0), 5);
        assert_eq!(tiered_cost(5, 9), 5);
        assert_eq!(tiered_cost(5, 10), 5);
        assert_eq!(tiered_cost(5, 11), 6);
        assert_eq!(tiered_cost(5, 12), 7);
    }

    #[test]
    fn test_tiered_cost_larger_base() {
        // 100 -> 115 -> 132 -> 151: flooring diverges from a single pow.
        assert_eq!(tiered_cost(100, 1), 115);
        assert_eq!(tiered_cost(100, 2), 132);
        assert_eq!(tiered_cost(100, 3), 151);
    }

    #[test]
    fn test_tiered_cost_is_monotonic_nondecreasing() {
        let mut last = 0;
        for purchases in 0..60 {
            let cost = tiered_cost(2000, purchases);
            assert!(cost >= last, "cost dropped at purchase {}", purchases);
            last = cost;
        }
    }

    #[test]
    fn test_discount_is_capped() {
        assert_eq!(apply_discount(1000, 0.0), 1000);
        assert_eq!(apply_discount(1000, 0.5), 500);
        // 90% asked for, 75% granted.
        assert_eq!(apply_discount(1000, 0.9), 250);
        // Negative reductions never inflate the price.
        assert_eq!(apply_discount(1000, -0.5), 1000);
    }

    #[test]
    fn test_discount_can_reach_zero() {
        assert_eq!(apply_discount(1, 0.75), 0);
    }
}
