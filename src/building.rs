//! The central building and its per-generator stat upgrades.
//!
//! Raising the building unlocks generator automation (one type per level)
//! and raises the cap on the speed / gold / luck upgrade tracks. Luck is
//! rolled once per tick: each upgraded generator unit gets a tiny chance
//! at a bonus payout, and a hit puts the roll on a 30-second cooldown.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::commands::CommandError;
use crate::core::bonus::{
    bonus_sum, BonusSource, BonusTarget, Contribution, ContributionSource, EffectType,
};
use crate::core::constants::*;
use crate::core::game_state::GameState;
use crate::generators::GeneratorType;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildingState {
    pub level: u32,
    pub upgrades: BTreeMap<GeneratorType, StatUpgrades>,
    /// Seconds left on the luck-roll cooldown.
    pub luck_timer_secs: u32,
}

impl Default for BuildingState {
    fn default() -> Self {
        let upgrades = GeneratorType::ALL
            .into_iter()
            .map(|ty| (ty, StatUpgrades::default()))
            .collect();
        BuildingState {
            level: 0,
            upgrades,
            luck_timer_secs: 0,
        }
    }
}

/// Upgrade levels for one generator type's three stat tracks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatUpgrades {
    pub speed: u32,
    pub gold_bonus: u32,
    pub luck_bonus: u32,
}

/// One of the three stat upgrade tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeStat {
    Speed,
    GoldBonus,
    LuckBonus,
}

/// Outcome of a building level purchase.
#[derive(Debug, Clone, Copy)]
pub struct BuildingUpgrade {
    pub cost_paid: u64,
    pub level: u32,
    pub next_cost: Option<u64>,
}

/// Outcome of a stat upgrade purchase.
#[derive(Debug, Clone, Copy)]
pub struct StatUpgrade {
    pub generator: GeneratorType,
    pub cost_paid: u64,
    pub level: u32,
}

/// A lucky bonus payout from an upgraded generator.
#[derive(Debug, Clone, Copy)]
pub struct LuckBonus {
    pub generator: GeneratorType,
    pub gold: u64,
}

impl BuildingState {
    pub fn max_level(&self) -> u32 {
        BUILDING_LEVEL_COSTS.len() as u32
    }

    /// Stat tracks cap at twice the building level.
    pub fn max_stat_level(&self) -> u32 {
        self.level * 2
    }

    fn stat_level(&self, ty: GeneratorType, stat: UpgradeStat) -> u32 {
        let upgrades = self.upgrades.get(&ty).copied().unwrap_or_default();
        match stat {
            UpgradeStat::Speed => upgrades.speed,
            UpgradeStat::GoldBonus => upgrades.gold_bonus,
            UpgradeStat::LuckBonus => upgrades.luck_bonus,
        }
    }
}

impl BonusSource for BuildingState {
    fn contribute(&self, out: &mut Vec<Contribution>) {
        for (&ty, upgrades) in &self.upgrades {
            if upgrades.speed > 0 {
                out.push(Contribution {
                    effect: EffectType::SpeedBonus,
                    target: BonusTarget::Generator(ty),
                    amount: upgrades.speed as f64 * STAT_SPEED_PER_LEVEL,
                    source: ContributionSource::Building,
                });
            }
            if upgrades.gold_bonus > 0 {
                out.push(Contribution {
                    effect: EffectType::GoldBonus,
                    target: BonusTarget::Generator(ty),
                    amount: upgrades.gold_bonus as f64 * STAT_GOLD_PER_LEVEL,
                    source: ContributionSource::Building,
                });
            }
        }
    }
}

/// Gold cost of raising the building from `level` to `level + 1`.
pub fn building_upgrade_cost(level: u32) -> Option<u64> {
    BUILDING_LEVEL_COSTS.get(level as usize).copied()
}

/// Base price for the first level of a stat track.
pub fn stat_base_cost(ty: GeneratorType, stat: UpgradeStat) -> u64 {
    let (speed, gold, luck) = match ty {
        GeneratorType::Villager => (100, 150, 200),
        GeneratorType::Trader => (200, 300, 400),
        GeneratorType::Warrior => (300, 450, 600),
        GeneratorType::Seer => (800, 1_200, 1_600),
        GeneratorType::Elite => (2_000, 3_000, 4_000),
    };
    match stat {
        UpgradeStat::Speed => speed,
        UpgradeStat::GoldBonus => gold,
        UpgradeStat::LuckBonus => luck,
    }
}

/// Price of the next level of a stat track.
pub fn stat_upgrade_cost(ty: GeneratorType, stat: UpgradeStat, current_level: u32) -> u64 {
    let base = stat_base_cost(ty, stat) as f64;
    (base * STAT_UPGRADE_COST_GROWTH.powi(current_level as i32)).floor() as u64
}

/// Raises the central building one level.
pub fn upgrade_building(state: &mut GameState) -> Result<BuildingUpgrade, CommandError> {
    let cost = building_upgrade_cost(state.building.level).ok_or(CommandError::BuildingMaxLevel)?;
    if !state.ledger.spend(cost) {
        return Err(CommandError::InsufficientGold {
            needed: cost,
            available: state.ledger.balance(),
        });
    }
    state.building.level += 1;
    Ok(BuildingUpgrade {
        cost_paid: cost,
        level: state.building.level,
        next_cost: building_upgrade_cost(state.building.level),
    })
}

/// Buys one level of a generator's stat track.
pub fn upgrade_generator_stat(
    state: &mut GameState,
    ty: GeneratorType,
    stat: UpgradeStat,
) -> Result<StatUpgrade, CommandError> {
    if state.building.level == 0 {
        return Err(CommandError::BuildingRequired);
    }
    let current = state.building.stat_level(ty, stat);
    let max = state.building.max_stat_level();
    if current >= max {
        return Err(CommandError::StatUpgradeCapped { max });
    }

    let cost = stat_upgrade_cost(ty, stat, current);
    if !state.ledger.spend(cost) {
        return Err(CommandError::InsufficientGold {
            needed: cost,
            available: state.ledger.balance(),
        });
    }

    let upgrades = state.building.upgrades.entry(ty).or_default();
    match stat {
        UpgradeStat::Speed => upgrades.speed += 1,
        UpgradeStat::GoldBonus => upgrades.gold_bonus += 1,
        UpgradeStat::LuckBonus => upgrades.luck_bonus += 1,
    }

    Ok(StatUpgrade {
        generator: ty,
        cost_paid: cost,
        level: current + 1,
    })
}

/// Runs the once-per-tick luck roll.
///
/// Each unit of a luck-upgraded generator rolls independently; the first
/// hit pays out and arms the cooldown, so at most one bonus lands per roll.
pub fn roll_luck<R: Rng>(state: &mut GameState, rng: &mut R) -> Option<LuckBonus> {
    if state.building.luck_timer_secs > 0 {
        state.building.luck_timer_secs -= 1;
        return None;
    }

    let amplifier = 1.0 + bonus_sum(state, EffectType::LuckEffectBonus, BonusTarget::All);
    for ty in GeneratorType::ALL {
        let generator = state.generator(ty);
        if generator.count == 0 {
            continue;
        }
        let luck_level = state.building.stat_level(ty, UpgradeStat::LuckBonus);
        if luck_level == 0 {
            continue;
        }

        let chance = luck_level as f64 * STAT_LUCK_PER_LEVEL / 100.0 * amplifier;
        for _ in 0..generator.count {
            if rng.gen::<f64>() < chance {
                let gold = (ty.base_rate() * LUCK_REWARD_RATE_MULT).floor() as u64;
                state.earn(gold as f64);
                state.building.luck_timer_secs = LUCK_ROLL_COOLDOWN_SECS;
                return Some(LuckBonus {
                    generator: ty,
                    gold,
                });
            }
        }
    }
    None
}
