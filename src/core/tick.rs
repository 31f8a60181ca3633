//! The once-per-second game tick.
//!
//! One entry point advances everything that moves on its own: production
//! cycles, the chief's work, skill and camp timers, the luck roll, and the
//! research bench. Completions are always processed before new cycles
//! start, so a cycle never starts and finishes in the same tick.

use rand::Rng;

use crate::building::{self, LuckBonus};
use crate::chief::{self, ClickReward};
use crate::combat;
use crate::core::game_state::GameState;
use crate::generators::{self, CycleCompletion, CycleStart};
use crate::prestige;
use crate::university;

/// Everything one tick did, for the caller to render or log.
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    pub completed_cycles: Vec<CycleCompletion>,
    pub started_cycles: Vec<CycleStart>,
    pub chief_reward: Option<ClickReward>,
    pub luck_bonus: Option<LuckBonus>,
    pub research_completed: Option<String>,
    pub research_discovered: Vec<String>,
    pub can_prestige: bool,
}

/// Advances the village to `now_ms`.
pub fn game_tick<R: Rng>(state: &mut GameState, now_ms: i64, rng: &mut R) -> TickResult {
    let completed_cycles = generators::complete_due_cycles(state, now_ms);
    let chief_reward = chief::finish_due_work(state, now_ms);
    let started_cycles = generators::start_automated_cycles(state, now_ms);

    chief::tick_timers(state, now_ms);
    combat::tick_camps(state);
    let luck_bonus = building::roll_luck(state, rng);
    let (research_completed, research_discovered) = university::tick_university(state, now_ms);

    state.timestamp = now_ms;

    TickResult {
        completed_cycles,
        started_cycles,
        chief_reward,
        luck_bonus,
        research_completed,
        research_discovered,
        can_prestige: prestige::can_prestige(state),
    }
}
