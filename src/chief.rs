//! The village chief: active clicking, upgrades, and skills.
//!
//! Clicking puts the chief to work for their cooldown; the payout lands
//! when the work completes, scaled by the click streak, any chief gold
//! bonuses, and the prestige multiplier. Completing a click also grants a
//! short +50% boost to generator output. The three skills (rally, inspire,
//! fortune) are second-granularity timers driven from the tick.

use serde::{Deserialize, Serialize};

use crate::commands::CommandError;
use crate::core::bonus::{
    bonus_sum, BonusSource, BonusTarget, Contribution, ContributionSource, EffectType,
};
use crate::core::constants::*;
use crate::core::game_state::GameState;
use crate::core::rates::aggregate_rate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChiefState {
    pub gold_per_click: u64,
    pub cooldown_ms: u64,
    pub busy: bool,
    pub work_start_ms: i64,
    pub gold_upgrade_cost: u64,
    pub cooldown_upgrade_cost: u64,
    /// Seconds left on the post-click +50% generator boost.
    pub generator_bonus_secs: u32,
    pub click_streak: u32,
    pub last_click_ms: i64,
    pub skills: ChiefSkills,
}

impl Default for ChiefState {
    fn default() -> Self {
        Self {
            gold_per_click: CHIEF_BASE_GOLD_PER_CLICK,
            cooldown_ms: CHIEF_BASE_COOLDOWN_MS,
            busy: false,
            work_start_ms: 0,
            gold_upgrade_cost: CHIEF_GOLD_UPGRADE_BASE_COST,
            cooldown_upgrade_cost: CHIEF_COOLDOWN_UPGRADE_BASE_COST,
            generator_bonus_secs: 0,
            click_streak: 0,
            last_click_ms: 0,
            skills: ChiefSkills::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChiefSkills {
    pub rally: RallyState,
    pub inspire: InspireState,
    pub fortune: FortuneState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RallyState {
    pub duration_secs: u32,
    pub cooldown_secs: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InspireState {
    pub stacks: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FortuneState {
    pub cooldown_secs: u32,
}

/// The payout of one completed chief click.
#[derive(Debug, Clone, Copy)]
pub struct ClickReward {
    pub gold: u64,
    pub streak: u32,
    pub multiplier: f64,
}

/// Outcome of a chief upgrade purchase.
#[derive(Debug, Clone, Copy)]
pub struct ChiefUpgrade {
    pub cost_paid: u64,
    pub gold_per_click: u64,
    pub cooldown_ms: u64,
    pub next_cost: u64,
}

impl BonusSource for ChiefState {
    fn contribute(&self, out: &mut Vec<Contribution>) {
        if self.skills.inspire.stacks > 0 {
            out.push(Contribution {
                effect: EffectType::CostReduction,
                target: BonusTarget::All,
                amount: self.skills.inspire.stacks as f64 * INSPIRE_DISCOUNT_PER_STACK,
                source: ContributionSource::Chief,
            });
        }
    }
}

/// Puts the chief to work. The payout arrives via `finish_due_work`.
pub fn click_chief(state: &mut GameState, now_ms: i64) -> Result<(), CommandError> {
    if state.chief.busy {
        return Err(CommandError::ChiefBusy);
    }
    state.chief.busy = true;
    state.chief.work_start_ms = now_ms;
    Ok(())
}

/// Pays out the chief's work if the cooldown has elapsed.
///
/// Advances the click streak (or resets it when the window lapsed) and
/// arms the 10-second generator boost.
pub fn finish_due_work(state: &mut GameState, now_ms: i64) -> Option<ClickReward> {
    if !state.chief.busy {
        return None;
    }
    let deadline = state.chief.work_start_ms + state.chief.cooldown_ms as i64;
    if now_ms < deadline {
        return None;
    }

    let streak = if now_ms - state.chief.last_click_ms <= CLICK_STREAK_WINDOW_MS {
        (state.chief.click_streak + 1).min(CLICK_STREAK_MAX)
    } else {
        1
    };
    let multiplier = click_streak_multiplier(streak, state.prestige.total_gold_earned);
    let chief_bonus = bonus_sum(state, EffectType::ChiefGoldBonus, BonusTarget::All);

    let mut gold = (state.chief.gold_per_click as f64 * multiplier).floor();
    gold = (gold * (1.0 + chief_bonus)).floor();
    gold = (gold * state.prestige.bonus_multiplier).floor();

    state.chief.busy = false;
    state.chief.click_streak = streak;
    state.chief.last_click_ms = now_ms;
    state.chief.generator_bonus_secs = CHIEF_GENERATOR_BONUS_SECS;
    state.earn(gold);

    Some(ClickReward {
        gold: gold as u64,
        streak,
        multiplier,
    })
}

/// Streak multiplier, scaled down as the village gets richer.
///
/// Piecewise: exponential for the first three clicks, linear up to seven,
/// diminishing to ten. Never drops below +5% per streak step.
pub fn click_streak_multiplier(streak: u32, total_gold_earned: f64) -> f64 {
    if streak == 0 {
        return 1.0;
    }
    let progress = (1.0 - total_gold_earned / 100_000.0).max(0.3);
    let s = streak as f64;

    let multiplier = if streak <= 3 {
        1.0 + s.powf(1.8) * 0.5 * progress
    } else if streak <= 7 {
        let base = 3f64.powf(1.8) * 0.5 * progress;
        1.0 + base + (s - 3.0) * 0.3 * progress
    } else {
        let base = 3f64.powf(1.8) * 0.5 * progress + 4.0 * 0.3 * progress;
        1.0 + base + (s - 7.0) * 0.15 * progress
    };

    multiplier.max(1.0 + s * 0.05)
}

/// Buys +gold-per-click. The increase grows every third upgrade.
pub fn upgrade_gold(state: &mut GameState) -> Result<ChiefUpgrade, CommandError> {
    let cost = state.chief.gold_upgrade_cost;
    if !state.ledger.spend(cost) {
        return Err(CommandError::InsufficientGold {
            needed: cost,
            available: state.ledger.balance(),
        });
    }

    let upgrade_level = state.chief.gold_per_click.saturating_sub(1);
    let increase = (upgrade_level / 3 + 1).max(1);
    state.chief.gold_per_click += increase;
    state.chief.gold_upgrade_cost = (cost as f64 * CHIEF_GOLD_COST_GROWTH).floor() as u64;

    Ok(ChiefUpgrade {
        cost_paid: cost,
        gold_per_click: state.chief.gold_per_click,
        cooldown_ms: state.chief.cooldown_ms,
        next_cost: state.chief.gold_upgrade_cost,
    })
}

/// Buys a 500 ms cooldown reduction, down to the 500 ms floor.
pub fn upgrade_cooldown(state: &mut GameState) -> Result<ChiefUpgrade, CommandError> {
    if state.chief.cooldown_ms <= CHIEF_MIN_COOLDOWN_MS {
        return Err(CommandError::ChiefCooldownAtMinimum);
    }
    let cost = state.chief.cooldown_upgrade_cost;
    if !state.ledger.spend(cost) {
        return Err(CommandError::InsufficientGold {
            needed: cost,
            available: state.ledger.balance(),
        });
    }

    state.chief.cooldown_ms -= CHIEF_COOLDOWN_STEP_MS;
    state.chief.cooldown_upgrade_cost = (cost as f64 * CHIEF_COOLDOWN_COST_GROWTH).floor() as u64;

    Ok(ChiefUpgrade {
        cost_paid: cost,
        gold_per_click: state.chief.gold_per_click,
        cooldown_ms: state.chief.cooldown_ms,
        next_cost: state.chief.cooldown_upgrade_cost,
    })
}

// ── Skills ───────────────────────────────────────────────────────────────

/// The chief's three active skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skill {
    Rally,
    Inspire,
    Fortune,
}

fn effective_cooldown_secs(state: &GameState, base: u32) -> u32 {
    let reduction =
        bonus_sum(state, EffectType::CooldownReduction, BonusTarget::All).min(COOLDOWN_REDUCTION_CAP);
    (base as f64 * (1.0 - reduction)).floor() as u32
}

/// Rally: doubles the aggregate rate for 30 seconds.
pub fn use_rally(state: &mut GameState) -> Result<(), CommandError> {
    if state.chief.skills.rally.cooldown_secs > 0 {
        return Err(CommandError::SkillOnCooldown {
            skill: "rally",
            remaining_secs: state.chief.skills.rally.cooldown_secs,
        });
    }
    let cooldown = effective_cooldown_secs(state, RALLY_COOLDOWN_SECS);
    state.chief.skills.rally.duration_secs = RALLY_DURATION_SECS;
    state.chief.skills.rally.cooldown_secs = cooldown;
    Ok(())
}

/// Inspire: banks a 25% generator discount stack, up to five.
pub fn use_inspire(state: &mut GameState) -> Result<u32, CommandError> {
    let stacks = state.chief.skills.inspire.stacks;
    if stacks >= INSPIRE_MAX_STACKS {
        return Err(CommandError::InspireStacksFull(stacks));
    }
    state.chief.skills.inspire.stacks = stacks + 1;
    Ok(stacks + 1)
}

/// Fortune: instantly pays two seconds of the aggregate rate.
pub fn use_fortune(state: &mut GameState) -> Result<u64, CommandError> {
    if state.chief.skills.fortune.cooldown_secs > 0 {
        return Err(CommandError::SkillOnCooldown {
            skill: "fortune",
            remaining_secs: state.chief.skills.fortune.cooldown_secs,
        });
    }
    let bonus = (aggregate_rate(state) * FORTUNE_RATE_MULT).floor();
    if bonus <= 0.0 {
        return Err(CommandError::NoProduction);
    }
    let cooldown = effective_cooldown_secs(state, FORTUNE_COOLDOWN_SECS);
    state.earn(bonus);
    state.chief.skills.fortune.cooldown_secs = cooldown;
    Ok(bonus as u64)
}

/// Consumes one banked inspire stack, if any. Called on generator purchase.
pub fn consume_inspire_stack(state: &mut GameState) {
    if state.chief.skills.inspire.stacks > 0 {
        state.chief.skills.inspire.stacks -= 1;
    }
}

/// Advances the chief's second-granularity timers by one tick.
pub fn tick_timers(state: &mut GameState, now_ms: i64) {
    let chief = &mut state.chief;
    chief.generator_bonus_secs = chief.generator_bonus_secs.saturating_sub(1);
    chief.skills.rally.duration_secs = chief.skills.rally.duration_secs.saturating_sub(1);
    chief.skills.rally.cooldown_secs = chief.skills.rally.cooldown_secs.saturating_sub(1);
    chief.skills.fortune.cooldown_secs = chief.skills.fortune.cooldown_secs.saturating_sub(1);

    if chief.click_streak > 0 && now_ms - chief.last_click_ms > CLICK_STREAK_WINDOW_MS {
        chief.click_streak = 0;
    }
}
