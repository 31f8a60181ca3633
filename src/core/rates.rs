//! Aggregate production rate calculator.
//!
//! The advertised gold-per-second figure: per-type unit rates scaled by
//! bonuses and counts, summed, then multiplied by temporary boosts and the
//! prestige multiplier. Offline catch-up and the fortune skill both price
//! themselves off this number.

use crate::core::bonus::{bonus_sum, BonusTarget, EffectType};
use crate::core::constants::{CHIEF_GENERATOR_BONUS_MULT, RALLY_RATE_MULT};
use crate::core::game_state::GameState;
use crate::generators::GeneratorType;

/// Gold per second produced by a single unit of `ty` with current bonuses.
pub fn unit_rate(state: &GameState, ty: GeneratorType) -> f64 {
    let speed = bonus_sum(state, EffectType::SpeedBonus, BonusTarget::Generator(ty));
    let gold = bonus_sum(state, EffectType::GoldBonus, BonusTarget::Generator(ty));
    ty.base_rate() * (1.0 + speed) * (1.0 + gold)
}

/// Multiplier from currently-active temporary boosts.
///
/// The chief's post-click generator bonus and an active rally stack
/// multiplicatively.
pub fn temp_boost_multiplier(state: &GameState) -> f64 {
    let chief_boost = if state.chief.generator_bonus_secs > 0 {
        CHIEF_GENERATOR_BONUS_MULT
    } else {
        1.0
    };
    let rally_boost = if state.chief.skills.rally.duration_secs > 0 {
        RALLY_RATE_MULT
    } else {
        1.0
    };
    chief_boost * rally_boost
}

/// Total gold per second across every owned generator.
///
/// Zero is a valid answer for a village with no generators.
pub fn aggregate_rate(state: &GameState) -> f64 {
    let mut rate = 0.0;
    for ty in GeneratorType::ALL {
        let count = state.generator(ty).count;
        if count > 0 {
            rate += unit_rate(state, ty) * count as f64;
        }
    }
    rate * temp_boost_multiplier(state) * state.prestige.bonus_multiplier
}
