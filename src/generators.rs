//! Passive income generators and their production cycles.
//!
//! Each generator type runs discrete work cycles rather than trickling gold
//! continuously: a cycle is started (by hand, or automatically once the
//! central building is tall enough), runs for its effective duration, and
//! pays out a lump reward when it completes. Completions are deadline
//! checks against the tick clock, so a missed tick never loses a payout.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::commands::CommandError;
use crate::core::bonus::{bonus_sum, BonusTarget, EffectType};
use crate::core::constants::MIN_CYCLE_DURATION_MS;
use crate::core::costs::{generator_price, tiered_cost};
use crate::core::game_state::GameState;

/// The five generator types, cheapest to most expensive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorType {
    Villager,
    Trader,
    Warrior,
    Seer,
    Elite,
}

impl GeneratorType {
    pub const ALL: [GeneratorType; 5] = [
        GeneratorType::Villager,
        GeneratorType::Trader,
        GeneratorType::Warrior,
        GeneratorType::Seer,
        GeneratorType::Elite,
    ];

    /// Price of the very first unit.
    pub fn base_cost(self) -> u64 {
        match self {
            GeneratorType::Villager => 5,
            GeneratorType::Trader => 25,
            GeneratorType::Warrior => 100,
            GeneratorType::Seer => 500,
            GeneratorType::Elite => 2_000,
        }
    }

    /// Gold per second per unit, before bonuses.
    pub fn base_rate(self) -> f64 {
        match self {
            GeneratorType::Villager => 1.0,
            GeneratorType::Trader => 3.0,
            GeneratorType::Warrior => 5.0,
            GeneratorType::Seer => 20.0,
            GeneratorType::Elite => 100.0,
        }
    }

    /// Unmodified production cycle length.
    pub fn base_cycle_ms(self) -> u64 {
        match self {
            GeneratorType::Villager => 2_000,
            GeneratorType::Trader => 4_000,
            GeneratorType::Warrior => 6_000,
            GeneratorType::Seer => 10_000,
            GeneratorType::Elite => 15_000,
        }
    }

    /// Central building level at which this type runs by itself.
    pub fn automation_threshold(self) -> u32 {
        match self {
            GeneratorType::Villager => 1,
            GeneratorType::Trader => 2,
            GeneratorType::Warrior => 3,
            GeneratorType::Seer => 4,
            GeneratorType::Elite => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GeneratorType::Villager => "villager",
            GeneratorType::Trader => "trader",
            GeneratorType::Warrior => "warrior",
            GeneratorType::Seer => "seer",
            GeneratorType::Elite => "elite",
        }
    }
}

impl fmt::Display for GeneratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mutable per-type state: owned count plus the in-flight cycle, if any.
///
/// `cost` caches the undiscounted price of the next unit for the save
/// document; live pricing always goes through the cost scaler.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Generator {
    pub count: u32,
    pub cost: u64,
    pub busy: bool,
    pub cycle_start_ms: i64,
    pub cycle_duration_ms: u64,
}

/// Outcome of a successful generator purchase.
#[derive(Debug, Clone, Copy)]
pub struct Purchase {
    pub generator: GeneratorType,
    pub cost_paid: u64,
    pub count: u32,
    pub next_cost: u64,
}

/// A cycle that just entered the Working state.
#[derive(Debug, Clone, Copy)]
pub struct CycleStart {
    pub generator: GeneratorType,
    pub duration_ms: u64,
}

/// A cycle that just paid out.
#[derive(Debug, Clone, Copy)]
pub struct CycleCompletion {
    pub generator: GeneratorType,
    pub reward: u64,
}

/// Whether the central building runs this type automatically.
pub fn is_automated(state: &GameState, ty: GeneratorType) -> bool {
    state.building.level >= ty.automation_threshold()
}

/// Cycle length after speed bonuses, clamped to the 200 ms floor.
pub fn effective_cycle_ms(state: &GameState, ty: GeneratorType) -> u64 {
    let speed = bonus_sum(state, EffectType::SpeedBonus, BonusTarget::Generator(ty));
    let shortened = (ty.base_cycle_ms() as f64 / (1.0 + speed)).floor() as u64;
    shortened.max(MIN_CYCLE_DURATION_MS)
}

/// Reward for a completed cycle of the given duration.
///
/// Base payout floors first, then the gold bonus, then the prestige
/// multiplier — three separate flooring steps, in that order.
pub fn cycle_reward(state: &GameState, ty: GeneratorType, duration_ms: u64) -> u64 {
    let seconds = duration_ms as f64 / 1_000.0;
    let count = state.generator(ty).count;
    let mut reward = (ty.base_rate() * count as f64 * seconds).floor();

    let gold = bonus_sum(state, EffectType::GoldBonus, BonusTarget::Generator(ty));
    reward = (reward * (1.0 + gold)).floor();
    reward = (reward * state.prestige.bonus_multiplier).floor();
    reward as u64
}

/// Buys one unit of `ty` at the current discounted price.
///
/// Consumes one inspire stack if any are held.
pub fn buy_generator(state: &mut GameState, ty: GeneratorType) -> Result<Purchase, CommandError> {
    let price = generator_price(state, ty);
    if !state.ledger.spend(price) {
        return Err(CommandError::InsufficientGold {
            needed: price,
            available: state.ledger.balance(),
        });
    }

    crate::chief::consume_inspire_stack(state);

    let generator = state.generator_mut(ty);
    generator.count += 1;
    let count = generator.count;
    generator.cost = tiered_cost(ty.base_cost(), count);

    Ok(Purchase {
        generator: ty,
        cost_paid: price,
        count,
        next_cost: generator_price(state, ty),
    })
}

/// Starts a cycle by hand. Rejected for empty, busy, or automated types.
pub fn trigger_manual_cycle(
    state: &mut GameState,
    ty: GeneratorType,
    now_ms: i64,
) -> Result<CycleStart, CommandError> {
    let generator = state.generator(ty);
    if generator.count == 0 {
        return Err(CommandError::NoUnits(ty));
    }
    if generator.busy {
        return Err(CommandError::GeneratorBusy(ty));
    }
    if is_automated(state, ty) {
        return Err(CommandError::GeneratorAutomated(ty));
    }
    Ok(start_cycle(state, ty, now_ms))
}

pub(crate) fn start_cycle(state: &mut GameState, ty: GeneratorType, now_ms: i64) -> CycleStart {
    let duration_ms = effective_cycle_ms(state, ty);
    let generator = state.generator_mut(ty);
    generator.busy = true;
    generator.cycle_start_ms = now_ms;
    generator.cycle_duration_ms = duration_ms;
    CycleStart {
        generator: ty,
        duration_ms,
    }
}

/// Pays out every cycle whose deadline has passed.
///
/// Called at the top of the tick, before any new cycles are started, so a
/// cycle can never start and complete within the same tick.
pub fn complete_due_cycles(state: &mut GameState, now_ms: i64) -> Vec<CycleCompletion> {
    let mut completed = Vec::new();
    for ty in GeneratorType::ALL {
        let generator = state.generator(ty);
        if !generator.busy {
            continue;
        }
        let deadline = generator.cycle_start_ms + generator.cycle_duration_ms as i64;
        if now_ms < deadline {
            continue;
        }

        let reward = cycle_reward(state, ty, generator.cycle_duration_ms);
        let generator = state.generator_mut(ty);
        generator.busy = false;
        generator.cycle_start_ms = 0;
        generator.cycle_duration_ms = 0;
        state.earn(reward as f64);
        completed.push(CycleCompletion {
            generator: ty,
            reward,
        });
    }
    completed
}

/// Puts every idle automated type back to work.
pub fn start_automated_cycles(state: &mut GameState, now_ms: i64) -> Vec<CycleStart> {
    let mut started = Vec::new();
    for ty in GeneratorType::ALL {
        let generator = state.generator(ty);
        if generator.count > 0 && !generator.busy && is_automated(state, ty) {
            started.push(start_cycle(state, ty, now_ms));
        }
    }
    started
}

/// Total units owned across all types.
pub fn total_count(state: &GameState) -> u32 {
    GeneratorType::ALL
        .iter()
        .map(|&ty| state.generator(ty).count)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_generator_deducts_and_reprices() {
        let mut state = GameState::default();
        state.earn(100.0);

        let purchase = buy_generator(&mut state, GeneratorType::Villager).unwrap();
        assert_eq!(purchase.cost_paid, 5);
        assert_eq!(purchase.count, 1);
        assert_eq!(state.ledger.balance(), 95);
    }

    #[test]
    fn test_buy_generator_rejects_when_broke() {
        let mut state = GameState::default();
        state.earn(4.0);

        let err = buy_generator(&mut state, GeneratorType::Villager).unwrap_err();
        assert!(matches!(
            err,
            CommandError::InsufficientGold { needed: 5, .. }
        ));
        assert_eq!(state.generator(GeneratorType::Villager).count, 0);
    }

    #[test]
    fn test_manual_cycle_requires_units() {
        let mut state = GameState::default();
        let err = trigger_manual_cycle(&mut state, GeneratorType::Trader, 0).unwrap_err();
        assert!(matches!(err, CommandError::NoUnits(GeneratorType::Trader)));
    }

    #[test]
    fn test_manual_cycle_rejects_busy_generator() {
        let mut state = GameState::default();
        state.generator_mut(GeneratorType::Trader).count = 1;

        trigger_manual_cycle(&mut state, GeneratorType::Trader, 1_000).unwrap();
        let err = trigger_manual_cycle(&mut state, GeneratorType::Trader, 2_000).unwrap_err();
        assert!(matches!(err, CommandError::GeneratorBusy(_)));
    }

    #[test]
    fn test_manual_cycle_rejects_automated_generator() {
        let mut state = GameState::default();
        state.generator_mut(GeneratorType::Villager).count = 1;
        state.building.level = 1;

        let err = trigger_manual_cycle(&mut state, GeneratorType::Villager, 0).unwrap_err();
        assert!(matches!(err, CommandError::GeneratorAutomated(_)));
    }

    #[test]
    fn test_cycle_completes_exactly_once() {
        let mut state = GameState::default();
        state.generator_mut(GeneratorType::Villager).count = 3;
        trigger_manual_cycle(&mut state, GeneratorType::Villager, 0).unwrap();

        assert!(complete_due_cycles(&mut state, 1_999).is_empty());

        let completed = complete_due_cycles(&mut state, 2_000);
        assert_eq!(completed.len(), 1);
        // 1 gps * 3 units * 2 seconds
        assert_eq!(completed[0].reward, 6);
        assert_eq!(state.ledger.balance(), 6);

        assert!(complete_due_cycles(&mut state, 3_000).is_empty());
    }

    #[test]
    fn test_late_completion_pays_the_same() {
        let mut state = GameState::default();
        state.generator_mut(GeneratorType::Villager).count = 3;
        trigger_manual_cycle(&mut state, GeneratorType::Villager, 0).unwrap();

        // The host slept for an hour; the payout is for the cycle's
        // duration, not the elapsed wall time.
        let completed = complete_due_cycles(&mut state, 3_600_000);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].reward, 6);
    }

    #[test]
    fn test_automated_start_skips_busy_and_empty() {
        let mut state = GameState::default();
        state.building.level = 2;
        state.generator_mut(GeneratorType::Villager).count = 1;
        state.generator_mut(GeneratorType::Trader).count = 1;

        let started = start_automated_cycles(&mut state, 0);
        assert_eq!(started.len(), 2);

        // Both already busy, nothing new starts.
        assert!(start_automated_cycles(&mut state, 500).is_empty());
    }

    #[test]
    fn test_total_count_spans_types() {
        let mut state = GameState::default();
        assert_eq!(total_count(&state), 0);

        state.generator_mut(GeneratorType::Villager).count = 3;
        state.generator_mut(GeneratorType::Elite).count = 2;
        assert_eq!(total_count(&state), 5);
    }

    #[test]
    fn test_effective_cycle_floor() {
        let mut state = GameState::default();
        state.generator_mut(GeneratorType::Villager).count = 1;
        // An absurd speed bonus still cannot go below the floor.
        state
            .building
            .upgrades
            .get_mut(&GeneratorType::Villager)
            .unwrap()
            .speed = 100;

        assert_eq!(
            effective_cycle_ms(&state, GeneratorType::Villager),
            MIN_CYCLE_DURATION_MS
        );
    }

    #[test]
    fn test_cycle_reward_flooring_order() {
        let mut state = GameState::default();
        state.generator_mut(GeneratorType::Villager).count = 1;
        state.prestige.bonus_multiplier = 1.1;
        state
            .building
            .upgrades
            .get_mut(&GeneratorType::Villager)
            .unwrap()
            .gold_bonus = 1;

        // base: floor(1 * 1 * 2.0) = 2; gold: floor(2 * 1.5) = 3;
        // prestige: floor(3 * 1.1) = 3.
        assert_eq!(cycle_reward(&state, GeneratorType::Villager, 2_000), 3);
    }
}
