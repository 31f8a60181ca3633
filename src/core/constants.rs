//! Shared balance constants for the village economy.
//!
//! All core tuning numbers live here. Change once, test everywhere.

// =============================================================================
// TIMING
// =============================================================================

/// Host tick cadence the engine is balanced around.
pub const TICK_INTERVAL_MS: u64 = 1_000;

/// Floor on effective production cycle duration, no matter how much
/// speed bonus is stacked.
pub const MIN_CYCLE_DURATION_MS: u64 = 200;

// =============================================================================
// COST SCALER
// =============================================================================

/// Growth factor for purchases 0-9.
pub const COST_TIER_EARLY: f64 = 1.15;

/// Growth factor for purchases 10-24.
pub const COST_TIER_MID: f64 = 1.25;

/// Growth factor for purchases 25 and up.
pub const COST_TIER_LATE: f64 = 1.40;

/// First purchase index taxed at the mid tier.
pub const COST_TIER_MID_START: u32 = 10;

/// First purchase index taxed at the late tier.
pub const COST_TIER_LATE_START: u32 = 25;

/// Total cost reduction is clamped here before a price is discounted.
pub const COST_REDUCTION_CAP: f64 = 0.75;

// =============================================================================
// PRESTIGE
// =============================================================================

/// Total gold earned required for the first prestige.
pub const PRESTIGE_BASE_THRESHOLD: f64 = 1_000_000.0;

/// Each completed prestige multiplies the next threshold by this.
pub const PRESTIGE_THRESHOLD_GROWTH: f64 = 10.0;

/// Per-wisdom-point production multiplier (compounding).
pub const WISDOM_MULTIPLIER_BASE: f64 = 1.05;

// =============================================================================
// OFFLINE CATCH-UP
// =============================================================================

/// Absences at or under this are ignored entirely.
pub const OFFLINE_MIN_ELAPSED_MS: i64 = 60_000;

/// Offline credit is capped at 24 hours of absence.
pub const OFFLINE_CAP_MS: i64 = 24 * 60 * 60 * 1_000;

/// Offline production runs at this fraction of the live rate.
pub const OFFLINE_EFFICIENCY: f64 = 0.8;

// =============================================================================
// CHIEF
// =============================================================================

/// Starting gold per completed chief click.
pub const CHIEF_BASE_GOLD_PER_CLICK: u64 = 1;

/// Starting chief work cooldown.
pub const CHIEF_BASE_COOLDOWN_MS: u64 = 5_000;

/// Cooldown upgrades stop here.
pub const CHIEF_MIN_COOLDOWN_MS: u64 = 500;

/// Milliseconds shaved off per cooldown upgrade.
pub const CHIEF_COOLDOWN_STEP_MS: u64 = 500;

/// First gold-per-click upgrade price.
pub const CHIEF_GOLD_UPGRADE_BASE_COST: u64 = 25;

/// First cooldown upgrade price.
pub const CHIEF_COOLDOWN_UPGRADE_BASE_COST: u64 = 75;

/// Gold upgrade price growth per purchase.
pub const CHIEF_GOLD_COST_GROWTH: f64 = 1.5;

/// Cooldown upgrade price growth per purchase.
pub const CHIEF_COOLDOWN_COST_GROWTH: f64 = 2.0;

/// Seconds of +50% generator output granted by a completed click.
pub const CHIEF_GENERATOR_BONUS_SECS: u32 = 10;

/// The temporary generator boost multiplier itself.
pub const CHIEF_GENERATOR_BONUS_MULT: f64 = 1.5;

/// Clicks within this window extend the streak.
pub const CLICK_STREAK_WINDOW_MS: i64 = 10_000;

/// Streak counter cap.
pub const CLICK_STREAK_MAX: u32 = 10;

// =============================================================================
// CHIEF SKILLS
// =============================================================================

pub const RALLY_DURATION_SECS: u32 = 30;
pub const RALLY_COOLDOWN_SECS: u32 = 300;

/// Rally doubles the aggregate production rate while active.
pub const RALLY_RATE_MULT: f64 = 2.0;

pub const INSPIRE_MAX_STACKS: u32 = 5;

/// Cost reduction contributed per inspire stack.
pub const INSPIRE_DISCOUNT_PER_STACK: f64 = 0.25;

pub const FORTUNE_COOLDOWN_SECS: u32 = 120;

/// Fortune pays out this many seconds worth of the aggregate rate at once.
pub const FORTUNE_RATE_MULT: f64 = 2.0;

/// Cooldown reduction bonuses are clamped here.
pub const COOLDOWN_REDUCTION_CAP: f64 = 0.8;

// =============================================================================
// CENTRAL BUILDING
// =============================================================================

/// Gold cost of building levels 1 through 5.
pub const BUILDING_LEVEL_COSTS: [u64; 5] = [500, 2_000, 8_000, 30_000, 100_000];

/// Stat upgrade price growth per level.
pub const STAT_UPGRADE_COST_GROWTH: f64 = 1.8;

/// Speed bonus per stat upgrade level.
pub const STAT_SPEED_PER_LEVEL: f64 = 0.2;

/// Gold bonus per stat upgrade level.
pub const STAT_GOLD_PER_LEVEL: f64 = 0.5;

/// Luck percentage points per stat upgrade level.
pub const STAT_LUCK_PER_LEVEL: f64 = 0.1;

/// Seconds between luck payouts once one fires.
pub const LUCK_ROLL_COOLDOWN_SECS: u32 = 30;

/// A luck payout is worth this many seconds of one unit's base rate.
pub const LUCK_REWARD_RATE_MULT: f64 = 2.0;

// =============================================================================
// CAMPS
// =============================================================================

/// Raid success chance never exceeds this.
pub const RAID_SUCCESS_CAP: f64 = 0.95;

/// Fraction of sent warriors lost on a failed raid, lower bound.
pub const RAID_LOSS_MIN_FRACTION: f64 = 0.2;

/// Fraction of sent warriors lost on a failed raid, upper bound.
pub const RAID_LOSS_MAX_FRACTION: f64 = 1.0;

/// Reward bonus per warrior sent beyond the camp difficulty.
pub const RAID_OVERKILL_BONUS: f64 = 0.1;

// =============================================================================
// UNIVERSITY
// =============================================================================

/// One-time gold cost of the university building.
pub const UNIVERSITY_BUILD_COST: u64 = 100_000;

/// Speeding up research costs this much gold per second removed.
pub const RESEARCH_SPEEDUP_GOLD_PER_SEC: u64 = 5;

/// Minimum balance required to speed up at all.
pub const RESEARCH_SPEEDUP_MIN_GOLD: u64 = 10;

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Save document schema version.
pub const SAVE_VERSION: &str = "1.0.0";
