//! Player-facing command surface.
//!
//! Everything a UI can ask the engine to do goes through here. The
//! simulation modules themselves take explicit timestamps and RNGs so they
//! stay deterministic under test; this facade is the one place the wall
//! clock and a real RNG are injected.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use log::warn;
use thiserror::Error;

use crate::building::{self, BuildingUpgrade, StatUpgrade, UpgradeStat};
use crate::chief::{self, ChiefUpgrade, Skill};
use crate::combat::{self, CampId, RaidOutcome};
use crate::core::game_state::GameState;
use crate::core::offline::{self, OfflineProgress};
use crate::core::tick::{self, TickResult};
use crate::generators::{self, CycleStart, GeneratorType, Purchase};
use crate::prestige::{self, PrestigeResult};
use crate::save_manager::SaveManager;
use crate::tech_tree::{self, TechPurchase};
use crate::university::{self, ResearchSpeedup, ResearchStart};

/// Why a command was refused.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("not enough gold: need {needed}, have {available}")]
    InsufficientGold { needed: u64, available: u64 },
    #[error("not enough wisdom: need {needed}, have {available}")]
    InsufficientWisdom { needed: u64, available: u64 },
    #[error("no {0} units owned")]
    NoUnits(GeneratorType),
    #[error("{0} is already working")]
    GeneratorBusy(GeneratorType),
    #[error("{0} cycles run automatically")]
    GeneratorAutomated(GeneratorType),
    #[error("the chief is already working")]
    ChiefBusy,
    #[error("the chief's cooldown is already at its minimum")]
    ChiefCooldownAtMinimum,
    #[error("{skill} is on cooldown for {remaining_secs}s")]
    SkillOnCooldown {
        skill: &'static str,
        remaining_secs: u32,
    },
    #[error("inspire is already at {0} stacks")]
    InspireStacksFull(u32),
    #[error("the village produces no gold yet")]
    NoProduction,
    #[error("the building is at its maximum level")]
    BuildingMaxLevel,
    #[error("stat upgrades require the building")]
    BuildingRequired,
    #[error("stat track is capped at level {max} for the current building")]
    StatUpgradeCapped { max: u32 },
    #[error("that camp is still recovering")]
    CampOnCooldown,
    #[error("no warriors were sent")]
    NoWarriorsSent,
    #[error("sent {sent} warriors but only {available} are available")]
    NotEnoughWarriors { sent: u32, available: u32 },
    #[error("prestige needs {needed} gold earned this run, have {earned}")]
    PrestigeNotReady { needed: u64, earned: u64 },
    #[error("the university is already built")]
    UniversityAlreadyBuilt,
    #[error("research requires the university")]
    UniversityRequired,
    #[error("another research project is already running")]
    ResearchInProgress,
    #[error("no research project is running")]
    NoActiveResearch,
    #[error("that research is already complete")]
    ResearchCompleted,
    #[error("that research is not unlocked yet")]
    ResearchLocked,
    #[error("unknown research '{id}'")]
    UnknownResearch { id: String },
    #[error("unknown tech '{id}'")]
    UnknownTech { id: String },
    #[error("unknown upgrade category '{0}'")]
    UnknownUpgradeCategory(String),
    #[error("that tech is at its maximum level")]
    TechMaxed,
    #[error("tech '{tech}' must be purchased first")]
    TechPrerequisiteMissing { tech: String },
    #[error("save data is invalid: {0}")]
    InvalidSave(String),
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

// ── economy ──

pub fn buy_generator(state: &mut GameState, ty: GeneratorType) -> Result<Purchase, CommandError> {
    generators::buy_generator(state, ty)
}

pub fn trigger_cycle(
    state: &mut GameState,
    ty: GeneratorType,
) -> Result<CycleStart, CommandError> {
    generators::trigger_manual_cycle(state, ty, now_ms())
}

// ── chief ──

pub fn click_chief(state: &mut GameState) -> Result<(), CommandError> {
    chief::click_chief(state, now_ms())
}

pub fn upgrade_chief_gold(state: &mut GameState) -> Result<ChiefUpgrade, CommandError> {
    chief::upgrade_gold(state)
}

pub fn upgrade_chief_cooldown(state: &mut GameState) -> Result<ChiefUpgrade, CommandError> {
    chief::upgrade_cooldown(state)
}

pub fn use_skill(state: &mut GameState, skill: Skill) -> Result<(), CommandError> {
    match skill {
        Skill::Rally => chief::use_rally(state),
        Skill::Inspire => chief::use_inspire(state).map(|_| ()),
        Skill::Fortune => chief::use_fortune(state).map(|_| ()),
    }
}

// ── building and combat ──

pub fn upgrade_building(state: &mut GameState) -> Result<BuildingUpgrade, CommandError> {
    building::upgrade_building(state)
}

pub fn upgrade_generator_stat(
    state: &mut GameState,
    ty: GeneratorType,
    stat: UpgradeStat,
) -> Result<StatUpgrade, CommandError> {
    building::upgrade_generator_stat(state, ty, stat)
}

pub fn raid_camp(
    state: &mut GameState,
    camp: CampId,
    warriors: u32,
) -> Result<RaidOutcome, CommandError> {
    combat::raid_camp(state, camp, warriors, &mut rand::thread_rng())
}

// ── progression ──

pub fn perform_prestige(state: &mut GameState) -> Result<PrestigeResult, CommandError> {
    prestige::perform_prestige(state)
}

pub fn build_university(state: &mut GameState) -> Result<(), CommandError> {
    university::build_university(state)
}

pub fn start_research(state: &mut GameState, id: &str) -> Result<ResearchStart, CommandError> {
    university::start_research(state, id, now_ms())
}

pub fn speed_up_research(state: &mut GameState) -> Result<ResearchSpeedup, CommandError> {
    university::speed_up_research(state, now_ms())
}

pub fn purchase_tech(state: &mut GameState, id: &str) -> Result<TechPurchase, CommandError> {
    tech_tree::purchase_tech(state, id)
}

/// String-keyed upgrade dispatch for UIs that route everything through one
/// call. `category` is `"tech"` or `"research"`.
pub fn spend_on_upgrade(
    state: &mut GameState,
    category: &str,
    id: &str,
) -> Result<(), CommandError> {
    match category {
        "tech" => purchase_tech(state, id).map(|_| ()),
        "research" => start_research(state, id).map(|_| ()),
        other => {
            warn!("upgrade request for unknown category '{other}'");
            Err(CommandError::UnknownUpgradeCategory(other.to_string()))
        }
    }
}

// ── time and persistence ──

/// Advances the simulation to the current wall-clock time.
pub fn tick(state: &mut GameState) -> TickResult {
    tick::game_tick(state, now_ms(), &mut rand::thread_rng())
}

/// Stamps the state with the current time and writes it to disk.
pub fn save_now(state: &mut GameState, manager: &SaveManager) -> std::io::Result<()> {
    state.timestamp = now_ms();
    manager.save(state)
}

/// Loads the save and credits any offline production.
pub fn load_game(manager: &SaveManager) -> std::io::Result<(GameState, Option<OfflineProgress>)> {
    let mut state = manager.load()?;
    let progress = offline::apply_offline_progress(&mut state, now_ms());
    Ok((state, progress))
}

/// Hard reset to a brand-new village, wisdom and tech tree included.
pub fn reset_all(state: &mut GameState) {
    state.reset_all();
    state.timestamp = now_ms();
}

/// Serializes the state to a base64 string for clipboard transfer.
pub fn export_save(state: &GameState) -> String {
    // GameState always serializes; the JSON step cannot fail.
    let json = serde_json::to_string(state).unwrap_or_default();
    BASE64.encode(json)
}

/// Parses a base64 export back into a playable state.
pub fn import_save(encoded: &str) -> Result<GameState, CommandError> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| CommandError::InvalidSave(e.to_string()))?;
    let mut state: GameState =
        serde_json::from_slice(&bytes).map_err(|e| CommandError::InvalidSave(e.to_string()))?;
    state.normalize();
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_import_roundtrip() {
        let mut state = GameState::default();
        state.earn(4_242.0);
        state.generator_mut(GeneratorType::Warrior).count = 12;

        let encoded = export_save(&state);
        let restored = import_save(&encoded).unwrap();
        assert_eq!(restored.ledger.balance(), 4_242);
        assert_eq!(restored.generator(GeneratorType::Warrior).count, 12);
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(
            import_save("not base64 at all!!!"),
            Err(CommandError::InvalidSave(_))
        ));
        // Valid base64, invalid JSON.
        let encoded = BASE64.encode("hello");
        assert!(matches!(
            import_save(&encoded),
            Err(CommandError::InvalidSave(_))
        ));
    }

    #[test]
    fn test_unknown_upgrade_category() {
        let mut state = GameState::default();
        assert!(matches!(
            spend_on_upgrade(&mut state, "potions", "healing"),
            Err(CommandError::UnknownUpgradeCategory(_))
        ));
    }

    #[test]
    fn test_error_messages_read_well() {
        let err = CommandError::InsufficientGold {
            needed: 100,
            available: 25,
        };
        assert_eq!(err.to_string(), "not enough gold: need 100, have 25");
    }
}
