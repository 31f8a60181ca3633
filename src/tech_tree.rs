//! The wisdom-funded tech tree.
//!
//! Sixteen repeatable techs across four branches, paid in wisdom earned
//! through prestige. Tech levels survive a prestige and feed the bonus
//! registry permanently, which is what makes each run faster than the last.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::commands::CommandError;
use crate::core::bonus::{BonusSource, BonusTarget, Contribution, ContributionSource, EffectType};
use crate::core::game_state::GameState;
use crate::generators::GeneratorType;
use crate::prestige;

/// The four branches of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechCategory {
    Production,
    Combat,
    Knowledge,
    Mystical,
}

/// One bonus a tech grants per level.
#[derive(Debug, Clone, Copy)]
pub struct TechEffect {
    pub effect: EffectType,
    pub target: BonusTarget,
    pub amount_per_level: f64,
}

/// Static definition of one tech node.
#[derive(Debug, Clone, Copy)]
pub struct TechDef {
    pub id: &'static str,
    pub name: &'static str,
    pub category: TechCategory,
    pub effects: &'static [TechEffect],
    pub max_level: u32,
    pub base_cost: u64,
    pub cost_mult: f64,
    pub prerequisites: &'static [&'static str],
}

macro_rules! effect {
    ($effect:ident, $target:expr, $amount:expr) => {
        TechEffect {
            effect: EffectType::$effect,
            target: $target,
            amount_per_level: $amount,
        }
    };
}

const ALL: BonusTarget = BonusTarget::All;
const WARRIOR: BonusTarget = BonusTarget::Generator(GeneratorType::Warrior);
const SEER: BonusTarget = BonusTarget::Generator(GeneratorType::Seer);
const ELITE: BonusTarget = BonusTarget::Generator(GeneratorType::Elite);

pub const TECH_DEFS: &[TechDef] = &[
    // ── production ──
    TechDef {
        id: "efficient_workers",
        name: "Efficient Workers",
        category: TechCategory::Production,
        effects: &[effect!(GoldBonus, ALL, 0.1)],
        max_level: 10,
        base_cost: 2,
        cost_mult: 1.5,
        prerequisites: &[],
    },
    TechDef {
        id: "mass_production",
        name: "Mass Production",
        category: TechCategory::Production,
        effects: &[effect!(SpeedBonus, ALL, 0.15)],
        max_level: 8,
        base_cost: 3,
        cost_mult: 1.6,
        prerequisites: &["efficient_workers"],
    },
    TechDef {
        id: "golden_touch",
        name: "Golden Touch",
        category: TechCategory::Production,
        effects: &[effect!(ChiefGoldBonus, ALL, 0.25)],
        max_level: 5,
        base_cost: 4,
        cost_mult: 1.8,
        prerequisites: &[],
    },
    TechDef {
        id: "automation",
        name: "Automation",
        category: TechCategory::Production,
        effects: &[effect!(CostReduction, ALL, 0.12)],
        max_level: 6,
        base_cost: 5,
        cost_mult: 1.7,
        prerequisites: &["mass_production"],
    },
    // ── combat ──
    TechDef {
        id: "warrior_training",
        name: "Warrior Training",
        category: TechCategory::Combat,
        effects: &[effect!(GoldBonus, WARRIOR, 0.2), effect!(GoldBonus, ELITE, 0.2)],
        max_level: 8,
        base_cost: 3,
        cost_mult: 1.6,
        prerequisites: &[],
    },
    TechDef {
        id: "tactical_advantage",
        name: "Tactical Advantage",
        category: TechCategory::Combat,
        effects: &[effect!(CampRewardBonus, ALL, 0.3)],
        max_level: 6,
        base_cost: 4,
        cost_mult: 1.7,
        prerequisites: &["warrior_training"],
    },
    TechDef {
        id: "battle_fury",
        name: "Battle Fury",
        category: TechCategory::Combat,
        effects: &[effect!(RaidPowerBonus, ALL, 0.25)],
        max_level: 5,
        base_cost: 5,
        cost_mult: 1.8,
        prerequisites: &[],
    },
    TechDef {
        id: "war_economy",
        name: "War Economy",
        category: TechCategory::Combat,
        effects: &[
            effect!(CostReduction, WARRIOR, 0.15),
            effect!(CostReduction, ELITE, 0.15),
        ],
        max_level: 4,
        base_cost: 6,
        cost_mult: 1.9,
        prerequisites: &["tactical_advantage", "battle_fury"],
    },
    // ── knowledge ──
    TechDef {
        id: "faster_research",
        name: "Faster Research",
        category: TechCategory::Knowledge,
        effects: &[effect!(ResearchSpeedBonus, ALL, 0.2)],
        max_level: 6,
        base_cost: 4,
        cost_mult: 1.7,
        prerequisites: &[],
    },
    TechDef {
        id: "cheaper_research",
        name: "Cheaper Research",
        category: TechCategory::Knowledge,
        effects: &[effect!(ResearchCostReduction, ALL, 0.15)],
        max_level: 5,
        base_cost: 5,
        cost_mult: 1.8,
        prerequisites: &[],
    },
    TechDef {
        id: "wisdom_amplifier",
        name: "Wisdom Amplifier",
        category: TechCategory::Knowledge,
        effects: &[effect!(WisdomGainBonus, ALL, 1.0)],
        max_level: 3,
        base_cost: 10,
        cost_mult: 2.0,
        prerequisites: &["faster_research", "cheaper_research"],
    },
    TechDef {
        id: "ancient_knowledge",
        name: "Ancient Knowledge",
        category: TechCategory::Knowledge,
        effects: &[effect!(ResearchEffectBonus, ALL, 0.25)],
        max_level: 4,
        base_cost: 8,
        cost_mult: 2.2,
        prerequisites: &["wisdom_amplifier"],
    },
    // ── mystical ──
    TechDef {
        id: "fortune_blessing",
        name: "Fortune Blessing",
        category: TechCategory::Mystical,
        effects: &[effect!(LuckEffectBonus, ALL, 0.5)],
        max_level: 4,
        base_cost: 6,
        cost_mult: 1.8,
        prerequisites: &[],
    },
    TechDef {
        id: "time_mastery",
        name: "Time Mastery",
        category: TechCategory::Mystical,
        effects: &[effect!(CooldownReduction, ALL, 0.2)],
        max_level: 5,
        base_cost: 7,
        cost_mult: 1.9,
        prerequisites: &[],
    },
    TechDef {
        id: "mana_efficiency",
        name: "Mana Efficiency",
        category: TechCategory::Mystical,
        effects: &[effect!(GoldBonus, SEER, 0.3)],
        max_level: 6,
        base_cost: 5,
        cost_mult: 1.7,
        prerequisites: &[],
    },
    TechDef {
        id: "transcendence",
        name: "Transcendence",
        category: TechCategory::Mystical,
        effects: &[effect!(PrestigeAmplifier, ALL, 0.25)],
        max_level: 3,
        base_cost: 15,
        cost_mult: 2.5,
        prerequisites: &["fortune_blessing", "time_mastery", "mana_efficiency"],
    },
];

/// Looks up a tech definition by id.
pub fn tech_def(id: &str) -> Option<&'static TechDef> {
    TECH_DEFS.iter().find(|def| def.id == id)
}

/// Purchased tech levels, keyed by tech id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TechTreeState {
    pub levels: BTreeMap<String, u32>,
}

impl TechTreeState {
    pub fn level(&self, id: &str) -> u32 {
        self.levels.get(id).copied().unwrap_or(0)
    }
}

impl BonusSource for TechTreeState {
    fn contribute(&self, out: &mut Vec<Contribution>) {
        for def in TECH_DEFS {
            let level = self.level(def.id);
            if level == 0 {
                continue;
            }
            for effect in def.effects {
                out.push(Contribution {
                    effect: effect.effect,
                    target: effect.target,
                    amount: effect.amount_per_level * level as f64,
                    source: ContributionSource::TechTree,
                });
            }
        }
    }
}

/// Wisdom price of the next level of `def` given the current level.
pub fn tech_cost(def: &TechDef, current_level: u32) -> u64 {
    (def.base_cost as f64 * def.cost_mult.powi(current_level as i32)).ceil() as u64
}

/// Outcome of a tech purchase.
#[derive(Debug, Clone, Copy)]
pub struct TechPurchase {
    pub wisdom_paid: u64,
    pub level: u32,
}

/// Spends wisdom on one level of a tech.
pub fn purchase_tech(state: &mut GameState, id: &str) -> Result<TechPurchase, CommandError> {
    let def = tech_def(id).ok_or_else(|| CommandError::UnknownTech {
        id: id.to_string(),
    })?;

    let current = state.tech_tree.level(def.id);
    if current >= def.max_level {
        return Err(CommandError::TechMaxed);
    }
    for &prereq in def.prerequisites {
        if state.tech_tree.level(prereq) == 0 {
            return Err(CommandError::TechPrerequisiteMissing {
                tech: prereq.to_string(),
            });
        }
    }

    let cost = tech_cost(def, current);
    if state.prestige.available_wisdom < cost {
        return Err(CommandError::InsufficientWisdom {
            needed: cost,
            available: state.prestige.available_wisdom,
        });
    }
    state.prestige.available_wisdom -= cost;
    state.tech_tree.levels.insert(def.id.to_string(), current + 1);

    // Transcendence changes the prestige multiplier immediately.
    prestige::recompute_multiplier(state);

    Ok(TechPurchase {
        wisdom_paid: cost,
        level: current + 1,
    })
}
