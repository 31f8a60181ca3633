//! The university and its gold-funded research tracks.
//!
//! Research is the mid-game gold sink: one project runs at a time, takes
//! real time to finish, and grants a permanent bonus on completion. Tracks
//! unlock as the village's generator counts grow; finished research is
//! wiped by prestige, unlike the tech tree.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::commands::CommandError;
use crate::core::bonus::{
    bonus_sum, BonusSource, BonusTarget, Contribution, ContributionSource, EffectType,
};
use crate::core::constants::*;
use crate::core::costs::apply_discount;
use crate::core::game_state::GameState;
use crate::generators::{self, GeneratorType};

/// What a research track needs before it shows up.
#[derive(Debug, Clone, Copy)]
pub enum UnlockCondition {
    /// Total generator units across all types.
    TotalGenerators(u32),
    /// Units of one specific type.
    GeneratorCount(GeneratorType, u32),
}

/// Static definition of one research project.
#[derive(Debug, Clone, Copy)]
pub struct ResearchDef {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u64,
    pub duration_secs: u64,
    pub unlock: UnlockCondition,
    pub prerequisite: Option<&'static str>,
    pub effect: EffectType,
    pub target: BonusTarget,
    pub amount: f64,
}

const ALL: BonusTarget = BonusTarget::All;

macro_rules! targeted {
    ($ty:ident) => {
        BonusTarget::Generator(GeneratorType::$ty)
    };
}

pub const RESEARCH_DEFS: &[ResearchDef] = &[
    // ── general ──
    ResearchDef {
        id: "efficiency_basics",
        name: "Efficiency Basics",
        cost: 5_000,
        duration_secs: 300,
        unlock: UnlockCondition::TotalGenerators(50),
        prerequisite: None,
        effect: EffectType::CostReduction,
        target: ALL,
        amount: 0.1,
    },
    ResearchDef {
        id: "mass_production",
        name: "Mass Production",
        cost: 10_000,
        duration_secs: 600,
        unlock: UnlockCondition::TotalGenerators(100),
        prerequisite: Some("efficiency_basics"),
        effect: EffectType::SpeedBonus,
        target: ALL,
        amount: 0.15,
    },
    ResearchDef {
        id: "wealth_accumulation",
        name: "Wealth Accumulation",
        cost: 25_000,
        duration_secs: 900,
        unlock: UnlockCondition::TotalGenerators(200),
        prerequisite: Some("mass_production"),
        effect: EffectType::GoldBonus,
        target: ALL,
        amount: 0.2,
    },
    ResearchDef {
        id: "advanced_economics",
        name: "Advanced Economics",
        cost: 50_000,
        duration_secs: 1_200,
        unlock: UnlockCondition::TotalGenerators(500),
        prerequisite: Some("wealth_accumulation"),
        effect: EffectType::CostReduction,
        target: ALL,
        amount: 0.25,
    },
    // ── villager ──
    ResearchDef {
        id: "farming_techniques",
        name: "Farming Techniques",
        cost: 2_000,
        duration_secs: 180,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Villager, 10),
        prerequisite: None,
        effect: EffectType::CostReduction,
        target: targeted!(Villager),
        amount: 0.25,
    },
    ResearchDef {
        id: "agricultural_revolution",
        name: "Agricultural Revolution",
        cost: 5_000,
        duration_secs: 360,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Villager, 25),
        prerequisite: Some("farming_techniques"),
        effect: EffectType::GoldBonus,
        target: targeted!(Villager),
        amount: 0.5,
    },
    ResearchDef {
        id: "village_automation",
        name: "Village Automation",
        cost: 12_000,
        duration_secs: 540,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Villager, 50),
        prerequisite: Some("agricultural_revolution"),
        effect: EffectType::SpeedBonus,
        target: targeted!(Villager),
        amount: 0.4,
    },
    // ── trader ──
    ResearchDef {
        id: "trade_routes",
        name: "Trade Routes",
        cost: 8_000,
        duration_secs: 240,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Trader, 10),
        prerequisite: None,
        effect: EffectType::CostReduction,
        target: targeted!(Trader),
        amount: 0.25,
    },
    ResearchDef {
        id: "merchant_guilds",
        name: "Merchant Guilds",
        cost: 15_000,
        duration_secs: 480,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Trader, 25),
        prerequisite: Some("trade_routes"),
        effect: EffectType::GoldBonus,
        target: targeted!(Trader),
        amount: 0.5,
    },
    ResearchDef {
        id: "global_commerce",
        name: "Global Commerce",
        cost: 30_000,
        duration_secs: 720,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Trader, 50),
        prerequisite: Some("merchant_guilds"),
        effect: EffectType::SpeedBonus,
        target: targeted!(Trader),
        amount: 0.35,
    },
    // ── warrior ──
    ResearchDef {
        id: "military_tactics",
        name: "Military Tactics",
        cost: 15_000,
        duration_secs: 300,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Warrior, 10),
        prerequisite: None,
        effect: EffectType::CostReduction,
        target: targeted!(Warrior),
        amount: 0.25,
    },
    ResearchDef {
        id: "warrior_discipline",
        name: "Warrior Discipline",
        cost: 35_000,
        duration_secs: 600,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Warrior, 25),
        prerequisite: Some("military_tactics"),
        effect: EffectType::GoldBonus,
        target: targeted!(Warrior),
        amount: 0.5,
    },
    ResearchDef {
        id: "elite_training",
        name: "Elite Training",
        cost: 75_000,
        duration_secs: 900,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Warrior, 50),
        prerequisite: Some("warrior_discipline"),
        effect: EffectType::SpeedBonus,
        target: targeted!(Warrior),
        amount: 0.35,
    },
    // ── seer ──
    ResearchDef {
        id: "mystical_knowledge",
        name: "Mystical Knowledge",
        cost: 40_000,
        duration_secs: 360,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Seer, 10),
        prerequisite: None,
        effect: EffectType::CostReduction,
        target: targeted!(Seer),
        amount: 0.25,
    },
    ResearchDef {
        id: "arcane_mastery",
        name: "Arcane Mastery",
        cost: 100_000,
        duration_secs: 720,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Seer, 25),
        prerequisite: Some("mystical_knowledge"),
        effect: EffectType::GoldBonus,
        target: targeted!(Seer),
        amount: 0.5,
    },
    ResearchDef {
        id: "time_manipulation",
        name: "Time Manipulation",
        cost: 250_000,
        duration_secs: 1_080,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Seer, 50),
        prerequisite: Some("arcane_mastery"),
        effect: EffectType::SpeedBonus,
        target: targeted!(Seer),
        amount: 0.4,
    },
    // ── elite ──
    ResearchDef {
        id: "legendary_weapons",
        name: "Legendary Weapons",
        cost: 100_000,
        duration_secs: 480,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Elite, 10),
        prerequisite: None,
        effect: EffectType::CostReduction,
        target: targeted!(Elite),
        amount: 0.25,
    },
    ResearchDef {
        id: "heroic_presence",
        name: "Heroic Presence",
        cost: 250_000,
        duration_secs: 960,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Elite, 25),
        prerequisite: Some("legendary_weapons"),
        effect: EffectType::GoldBonus,
        target: targeted!(Elite),
        amount: 0.5,
    },
    ResearchDef {
        id: "divine_power",
        name: "Divine Power",
        cost: 500_000,
        duration_secs: 1_440,
        unlock: UnlockCondition::GeneratorCount(GeneratorType::Elite, 50),
        prerequisite: Some("heroic_presence"),
        effect: EffectType::SpeedBonus,
        target: targeted!(Elite),
        amount: 0.4,
    },
];

/// Looks up a research definition by id.
pub fn research_def(id: &str) -> Option<&'static ResearchDef> {
    RESEARCH_DEFS.iter().find(|def| def.id == id)
}

/// The project currently on the bench.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveResearch {
    pub id: String,
    pub start_ms: i64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UniversityState {
    pub built: bool,
    pub completed: BTreeSet<String>,
    /// Researches whose unlock condition has been seen satisfied.
    pub discovered: BTreeSet<String>,
    pub active: Option<ActiveResearch>,
}

impl BonusSource for UniversityState {
    fn contribute(&self, out: &mut Vec<Contribution>) {
        for def in RESEARCH_DEFS {
            if self.completed.contains(def.id) {
                out.push(Contribution {
                    effect: def.effect,
                    target: def.target,
                    amount: def.amount,
                    source: ContributionSource::University,
                });
            }
        }
    }
}

/// Outcome of starting a research project.
#[derive(Debug, Clone)]
pub struct ResearchStart {
    pub id: String,
    pub cost_paid: u64,
    pub duration_ms: u64,
}

/// Outcome of paying gold to shorten the active project.
#[derive(Debug, Clone, Copy)]
pub struct ResearchSpeedup {
    pub gold_paid: u64,
    pub seconds_saved: u64,
}

fn unlock_met(state: &GameState, condition: UnlockCondition) -> bool {
    match condition {
        UnlockCondition::TotalGenerators(needed) => generators::total_count(state) >= needed,
        UnlockCondition::GeneratorCount(ty, needed) => state.generator(ty).count >= needed,
    }
}

/// Whether `def` can be started right now (ignoring gold and the bench).
pub fn is_unlocked(state: &GameState, def: &ResearchDef) -> bool {
    if let Some(prereq) = def.prerequisite {
        if !state.university.completed.contains(prereq) {
            return false;
        }
    }
    unlock_met(state, def.unlock)
}

/// Gold price after the tech tree's research discount.
pub fn research_cost(state: &GameState, def: &ResearchDef) -> u64 {
    let reduction = bonus_sum(state, EffectType::ResearchCostReduction, BonusTarget::All);
    apply_discount(def.cost, reduction)
}

/// Research duration after the tech tree's speed bonus.
pub fn research_duration_ms(state: &GameState, def: &ResearchDef) -> u64 {
    let speed = bonus_sum(state, EffectType::ResearchSpeedBonus, BonusTarget::All);
    ((def.duration_secs * 1_000) as f64 / (1.0 + speed)).floor() as u64
}

/// Constructs the university building.
pub fn build_university(state: &mut GameState) -> Result<(), CommandError> {
    if state.university.built {
        return Err(CommandError::UniversityAlreadyBuilt);
    }
    if !state.ledger.spend(UNIVERSITY_BUILD_COST) {
        return Err(CommandError::InsufficientGold {
            needed: UNIVERSITY_BUILD_COST,
            available: state.ledger.balance(),
        });
    }
    state.university.built = true;
    Ok(())
}

/// Puts a project on the bench.
pub fn start_research(
    state: &mut GameState,
    id: &str,
    now_ms: i64,
) -> Result<ResearchStart, CommandError> {
    if !state.university.built {
        return Err(CommandError::UniversityRequired);
    }
    if state.university.active.is_some() {
        return Err(CommandError::ResearchInProgress);
    }
    let def = research_def(id).ok_or_else(|| CommandError::UnknownResearch {
        id: id.to_string(),
    })?;
    if state.university.completed.contains(def.id) {
        return Err(CommandError::ResearchCompleted);
    }
    if !is_unlocked(state, def) {
        return Err(CommandError::ResearchLocked);
    }

    let cost = research_cost(state, def);
    if !state.ledger.spend(cost) {
        return Err(CommandError::InsufficientGold {
            needed: cost,
            available: state.ledger.balance(),
        });
    }

    let duration_ms = research_duration_ms(state, def);
    state.university.active = Some(ActiveResearch {
        id: def.id.to_string(),
        start_ms: now_ms,
        duration_ms,
    });
    Ok(ResearchStart {
        id: def.id.to_string(),
        cost_paid: cost,
        duration_ms,
    })
}

/// Spends gold to pull the active project's finish time closer.
///
/// Five gold buys one second. Pays for the full remainder when affordable,
/// otherwise spends the whole balance (requiring at least ten gold so the
/// button cannot be mashed for free time).
pub fn speed_up_research(state: &mut GameState, now_ms: i64) -> Result<ResearchSpeedup, CommandError> {
    let (start_ms, duration_ms) = match &state.university.active {
        Some(active) => (active.start_ms, active.duration_ms),
        None => return Err(CommandError::NoActiveResearch),
    };

    let deadline = start_ms + duration_ms as i64;
    let remaining_ms = (deadline - now_ms).max(0) as u64;
    if remaining_ms == 0 {
        return Err(CommandError::ResearchCompleted);
    }

    let balance = state.ledger.balance();
    if balance < RESEARCH_SPEEDUP_MIN_GOLD {
        return Err(CommandError::InsufficientGold {
            needed: RESEARCH_SPEEDUP_MIN_GOLD,
            available: balance,
        });
    }

    let full_price = remaining_ms.div_ceil(1_000) * RESEARCH_SPEEDUP_GOLD_PER_SEC;
    let payment = full_price.min(balance);
    // spend() cannot fail here; payment is capped by the balance.
    state.ledger.spend(payment);

    let reduction_ms = payment / RESEARCH_SPEEDUP_GOLD_PER_SEC * 1_000;
    if let Some(active) = &mut state.university.active {
        active.start_ms -= reduction_ms as i64;
    }
    Ok(ResearchSpeedup {
        gold_paid: payment,
        seconds_saved: reduction_ms / 1_000,
    })
}

/// Per-tick bookkeeping: finishes a due project and records fresh unlocks.
///
/// Returns the id of the research that completed this tick, if any, and
/// the ids newly added to the discovered list.
pub fn tick_university(state: &mut GameState, now_ms: i64) -> (Option<String>, Vec<String>) {
    let mut completed = None;
    if let Some(active) = &state.university.active {
        if now_ms >= active.start_ms + active.duration_ms as i64 {
            let id = active.id.clone();
            state.university.completed.insert(id.clone());
            state.university.active = None;
            completed = Some(id);
        }
    }

    let mut discovered = Vec::new();
    if state.university.built {
        for def in RESEARCH_DEFS {
            if !state.university.discovered.contains(def.id) && is_unlocked(state, def) {
                state.university.discovered.insert(def.id.to_string());
                discovered.push(def.id.to_string());
            }
        }
    }
    (completed, discovered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built_state() -> GameState {
        let mut state = GameState::default();
        state.earn(1_000_000.0);
        build_university(&mut state).unwrap();
        state
    }

    #[test]
    fn test_building_twice_is_rejected() {
        let mut state = built_state();
        assert_eq!(state.ledger.balance(), 900_000);
        assert!(matches!(
            build_university(&mut state),
            Err(CommandError::UniversityAlreadyBuilt)
        ));
    }

    #[test]
    fn test_research_needs_the_university() {
        let mut state = GameState::default();
        state.earn(1_000_000.0);
        state.generator_mut(GeneratorType::Villager).count = 10;
        assert!(matches!(
            start_research(&mut state, "farming_techniques", 0),
            Err(CommandError::UniversityRequired)
        ));
    }

    #[test]
    fn test_unlock_conditions_gate_research() {
        let mut state = built_state();
        assert!(matches!(
            start_research(&mut state, "farming_techniques", 0),
            Err(CommandError::ResearchLocked)
        ));
        state.generator_mut(GeneratorType::Villager).count = 10;
        start_research(&mut state, "farming_techniques", 0).unwrap();
    }

    #[test]
    fn test_general_track_counts_generators_across_types() {
        let mut state = built_state();
        state.generator_mut(GeneratorType::Villager).count = 30;
        state.generator_mut(GeneratorType::Trader).count = 19;
        assert!(matches!(
            start_research(&mut state, "efficiency_basics", 0),
            Err(CommandError::ResearchLocked)
        ));

        // One more unit anywhere tips the 50-generator requirement.
        state.generator_mut(GeneratorType::Elite).count = 1;
        start_research(&mut state, "efficiency_basics", 0).unwrap();
    }

    #[test]
    fn test_one_project_at_a_time() {
        let mut state = built_state();
        state.generator_mut(GeneratorType::Villager).count = 10;
        state.generator_mut(GeneratorType::Trader).count = 10;

        start_research(&mut state, "farming_techniques", 0).unwrap();
        assert!(matches!(
            start_research(&mut state, "trade_routes", 0),
            Err(CommandError::ResearchInProgress)
        ));
    }

    #[test]
    fn test_completion_grants_the_bonus() {
        let mut state = built_state();
        state.generator_mut(GeneratorType::Villager).count = 10;
        start_research(&mut state, "farming_techniques", 0).unwrap();

        // 180s project started at t=0.
        let (done, _) = tick_university(&mut state, 179_999);
        assert!(done.is_none());
        let (done, _) = tick_university(&mut state, 180_000);
        assert_eq!(done.as_deref(), Some("farming_techniques"));
        assert!(state.university.active.is_none());

        let reduction = bonus_sum(
            &state,
            EffectType::CostReduction,
            BonusTarget::Generator(GeneratorType::Villager),
        );
        assert!((reduction - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_prerequisite_chains() {
        let mut state = built_state();
        state.generator_mut(GeneratorType::Villager).count = 25;
        assert!(matches!(
            start_research(&mut state, "agricultural_revolution", 0),
            Err(CommandError::ResearchLocked)
        ));
        state.university.completed.insert("farming_techniques".into());
        start_research(&mut state, "agricultural_revolution", 0).unwrap();
    }

    #[test]
    fn test_speed_up_shortens_the_project() {
        let mut state = built_state();
        state.generator_mut(GeneratorType::Villager).count = 10;
        start_research(&mut state, "farming_techniques", 0).unwrap();

        // 180s remain; the full buyout costs 900 gold.
        let speedup = speed_up_research(&mut state, 0).unwrap();
        assert_eq!(speedup.gold_paid, 900);
        assert_eq!(speedup.seconds_saved, 180);

        let (done, _) = tick_university(&mut state, 0);
        assert_eq!(done.as_deref(), Some("farming_techniques"));
    }

    #[test]
    fn test_partial_speed_up_spends_the_balance() {
        let mut state = built_state();
        state.generator_mut(GeneratorType::Villager).count = 10;
        start_research(&mut state, "farming_techniques", 0).unwrap();
        // Leave exactly 100 gold in the ledger.
        let excess = state.ledger.balance() - 100;
        state.ledger.spend(excess);

        let speedup = speed_up_research(&mut state, 0).unwrap();
        assert_eq!(speedup.gold_paid, 100);
        assert_eq!(speedup.seconds_saved, 20);
        assert_eq!(state.ledger.balance(), 0);

        let active = state.university.active.as_ref().unwrap();
        assert_eq!(active.start_ms, -20_000);
    }

    #[test]
    fn test_discoveries_are_reported_once() {
        let mut state = built_state();
        state.generator_mut(GeneratorType::Villager).count = 10;

        let (_, discovered) = tick_university(&mut state, 0);
        assert!(discovered.contains(&"farming_techniques".to_string()));
        let (_, again) = tick_university(&mut state, 1_000);
        assert!(again.is_empty());
    }
}
