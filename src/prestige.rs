//! Prestige: reset the village, keep the wisdom.
//!
//! Once lifetime earnings for the current run cross the threshold the
//! village can be reborn. The run's progress is wiped, wisdom points are
//! awarded, and every future run earns gold faster through the wisdom
//! multiplier. Each prestige raises the next threshold tenfold.

use serde::{Deserialize, Serialize};

use crate::commands::CommandError;
use crate::core::bonus::{bonus_sum, BonusTarget, EffectType};
use crate::core::constants::*;
use crate::core::game_state::GameState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrestigeState {
    /// Completed prestiges.
    pub count: u32,
    /// Total wisdom ever earned. Drives the multiplier.
    pub wisdom_points: u64,
    /// Wisdom not yet spent on techs.
    pub available_wisdom: u64,
    /// Gold earned during the current run.
    pub total_gold_earned: f64,
    /// Cached production multiplier derived from wisdom.
    pub bonus_multiplier: f64,
}

impl Default for PrestigeState {
    fn default() -> Self {
        PrestigeState {
            count: 0,
            wisdom_points: 0,
            available_wisdom: 0,
            total_gold_earned: 0.0,
            bonus_multiplier: 1.0,
        }
    }
}

/// Result of a completed prestige.
#[derive(Debug, Clone, Copy)]
pub struct PrestigeResult {
    pub wisdom_gained: u64,
    pub count: u32,
    pub multiplier: f64,
}

/// Gold-earned threshold for the next prestige. Grows tenfold each time.
pub fn current_threshold(prestige_count: u32) -> f64 {
    PRESTIGE_BASE_THRESHOLD * PRESTIGE_THRESHOLD_GROWTH.powi(prestige_count as i32)
}

/// Whether the current run has earned enough to prestige.
pub fn can_prestige(state: &GameState) -> bool {
    state.prestige.total_gold_earned >= current_threshold(state.prestige.count)
}

/// Wisdom awarded if the player prestiged right now.
///
/// Sub-threshold progress earns nothing; past it, gains grow with the
/// square root of the overshoot, plus any flat tech bonus.
pub fn wisdom_gain(state: &GameState) -> u64 {
    let threshold = current_threshold(state.prestige.count);
    if state.prestige.total_gold_earned < threshold {
        return 0;
    }
    let base = (state.prestige.total_gold_earned / threshold).sqrt().floor() as u64;
    let tech_bonus =
        bonus_sum(state, EffectType::WisdomGainBonus, BonusTarget::All).floor() as u64;
    base + 1 + tech_bonus
}

/// Recomputes the cached prestige multiplier from wisdom and tech bonuses.
///
/// Called after anything that changes wisdom points or the amplifier techs:
/// a prestige, a tech purchase, or a save load.
pub fn recompute_multiplier(state: &mut GameState) {
    let base = WISDOM_MULTIPLIER_BASE.powi(state.prestige.wisdom_points.min(i32::MAX as u64) as i32);
    let amplifier = 1.0 + bonus_sum(state, EffectType::PrestigeAmplifier, BonusTarget::All);
    state.prestige.bonus_multiplier = base * amplifier;
}

/// Performs the prestige reset.
pub fn perform_prestige(state: &mut GameState) -> Result<PrestigeResult, CommandError> {
    if !can_prestige(state) {
        return Err(CommandError::PrestigeNotReady {
            needed: current_threshold(state.prestige.count) as u64,
            earned: state.prestige.total_gold_earned as u64,
        });
    }

    let gained = wisdom_gain(state);
    state.prestige.wisdom_points += gained;
    state.prestige.available_wisdom += gained;
    state.prestige.count += 1;

    state.reset_progress();
    recompute_multiplier(state);

    Ok(PrestigeResult {
        wisdom_gained: gained,
        count: state.prestige.count,
        multiplier: state.prestige.bonus_multiplier,
    })
}
