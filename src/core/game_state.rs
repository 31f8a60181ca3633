//! The whole village in one serializable struct.
//!
//! Every subsystem hangs off `GameState`; commands and the tick mutate it,
//! the save manager round-trips it through JSON. Persistence is tolerant:
//! every field defaults, so a save from an older build (or a hand-edited
//! one missing half its keys) loads onto a fresh state instead of failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::building::BuildingState;
use crate::chief::ChiefState;
use crate::combat::{Camp, CampId};
use crate::core::constants::SAVE_VERSION;
use crate::core::costs::tiered_cost;
use crate::core::ledger::Ledger;
use crate::generators::{Generator, GeneratorType};
use crate::prestige::{self, PrestigeState};
use crate::tech_tree::TechTreeState;
use crate::university::UniversityState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameState {
    #[serde(flatten)]
    pub ledger: Ledger,
    pub generators: BTreeMap<GeneratorType, Generator>,
    pub chief: ChiefState,
    pub camps: BTreeMap<CampId, Camp>,
    pub building: BuildingState,
    pub university: UniversityState,
    pub tech_tree: TechTreeState,
    pub prestige: PrestigeState,
    /// Wall-clock milliseconds of the last processed tick.
    pub timestamp: i64,
    pub version: String,
}

impl Default for GameState {
    fn default() -> Self {
        let mut state = GameState {
            ledger: Ledger::default(),
            generators: BTreeMap::new(),
            chief: ChiefState::default(),
            camps: BTreeMap::new(),
            building: BuildingState::default(),
            university: UniversityState::default(),
            tech_tree: TechTreeState::default(),
            prestige: PrestigeState::default(),
            timestamp: 0,
            version: SAVE_VERSION.to_string(),
        };
        state.fill_maps();
        state
    }
}

impl GameState {
    /// A fresh village stamped with the current time.
    pub fn new(now_ms: i64) -> Self {
        GameState {
            timestamp: now_ms,
            ..GameState::default()
        }
    }

    /// Credits gold to the ledger and the current run's prestige progress.
    pub fn earn(&mut self, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.ledger.earn(amount);
        self.prestige.total_gold_earned += amount;
    }

    pub fn generator(&self, ty: GeneratorType) -> Generator {
        self.generators.get(&ty).copied().unwrap_or_default()
    }

    pub fn generator_mut(&mut self, ty: GeneratorType) -> &mut Generator {
        self.generators.entry(ty).or_default()
    }

    pub fn camp(&self, id: CampId) -> Camp {
        self.camps.get(&id).copied().unwrap_or_default()
    }

    pub fn camp_mut(&mut self, id: CampId) -> &mut Camp {
        self.camps.entry(id).or_default()
    }

    fn fill_maps(&mut self) {
        for ty in GeneratorType::ALL {
            let generator = self.generators.entry(ty).or_default();
            if generator.cost == 0 {
                generator.cost = tiered_cost(ty.base_cost(), generator.count);
            }
            self.building.upgrades.entry(ty).or_default();
        }
        for id in CampId::ALL {
            self.camps.entry(id).or_default();
        }
    }

    /// Repairs a state that came out of deserialization.
    ///
    /// Fills any map entries a partial save omitted, re-derives each
    /// generator's next price from its count, scrubs non-finite gold, and
    /// refreshes the cached prestige multiplier.
    pub fn normalize(&mut self) {
        self.fill_maps();
        if !self.ledger.gold.is_finite() || self.ledger.gold < 0.0 {
            self.ledger.gold = 0.0;
        }
        if !self.ledger.lifetime_gold.is_finite() || self.ledger.lifetime_gold < 0.0 {
            self.ledger.lifetime_gold = 0.0;
        }
        if !self.prestige.total_gold_earned.is_finite() || self.prestige.total_gold_earned < 0.0 {
            self.prestige.total_gold_earned = 0.0;
        }
        for ty in GeneratorType::ALL {
            let generator = self.generator_mut(ty);
            generator.cost = tiered_cost(ty.base_cost(), generator.count);
        }
        self.version = SAVE_VERSION.to_string();
        prestige::recompute_multiplier(self);
    }

    /// Wipes the current run. Wisdom, the tech tree, and lifetime earnings
    /// survive; everything bought with gold does not.
    pub fn reset_progress(&mut self) {
        self.ledger.gold = 0.0;
        self.generators.clear();
        self.chief = ChiefState::default();
        self.camps.clear();
        self.building = BuildingState::default();
        self.university = UniversityState::default();
        self.prestige.total_gold_earned = 0.0;
        self.fill_maps();
    }

    /// Hard reset: back to a brand-new village, wisdom included.
    pub fn reset_all(&mut self) {
        *self = GameState::new(self.timestamp);
    }
}
