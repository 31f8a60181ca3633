//! Bonus registry.
//!
//! Every subsystem that grants passive modifiers (the central building, the
//! tech tree, completed university research, active chief skills) expresses
//! them as `Contribution` records. Consumers never talk to those subsystems
//! directly; they ask `bonus_sum` for the additive total of one effect
//! against one target. Nothing is cached — sums are recomputed from live
//! state on every query, so a bonus source disappearing (a spent inspire
//! stack, a prestige reset) is reflected immediately.

use crate::core::game_state::GameState;
use crate::generators::GeneratorType;

/// Kinds of passive modifiers subsystems can contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectType {
    /// Reduces generator purchase prices.
    CostReduction,
    /// Shortens production cycles.
    SpeedBonus,
    /// Increases cycle rewards and the aggregate rate.
    GoldBonus,
    /// Increases the chief's click payout.
    ChiefGoldBonus,
    /// Increases camp raid rewards.
    CampRewardBonus,
    /// Raises effective warrior strength when judging raid success.
    RaidPowerBonus,
    /// Shortens university research durations.
    ResearchSpeedBonus,
    /// Reduces university research prices.
    ResearchCostReduction,
    /// Amplifies the effects of completed research.
    ResearchEffectBonus,
    /// Extra wisdom points granted per prestige.
    WisdomGainBonus,
    /// Amplifies the prestige production multiplier.
    PrestigeAmplifier,
    /// Shortens chief skill and camp cooldowns.
    CooldownReduction,
    /// Amplifies building luck-roll chances.
    LuckEffectBonus,
}

/// What a contribution applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusTarget {
    /// Applies to every generator (and to global queries).
    All,
    /// Applies to one generator type only.
    Generator(GeneratorType),
}

impl BonusTarget {
    /// Whether a contribution with this target counts toward `query`.
    ///
    /// `All` contributions count toward everything; a per-generator
    /// contribution only counts toward a query for that same generator.
    pub fn applies_to(self, query: BonusTarget) -> bool {
        match (self, query) {
            (BonusTarget::All, _) => true,
            (BonusTarget::Generator(a), BonusTarget::Generator(b)) => a == b,
            (BonusTarget::Generator(_), BonusTarget::All) => false,
        }
    }
}

/// Which subsystem produced a contribution. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionSource {
    Building,
    TechTree,
    University,
    Chief,
}

/// One additive modifier record.
#[derive(Debug, Clone, Copy)]
pub struct Contribution {
    pub effect: EffectType,
    pub target: BonusTarget,
    pub amount: f64,
    pub source: ContributionSource,
}

/// Implemented by every subsystem that grants passive modifiers.
pub trait BonusSource {
    /// Appends this subsystem's currently-active contributions.
    fn contribute(&self, out: &mut Vec<Contribution>);
}

/// Collects every active contribution in the game.
///
/// University contributions are amplified by the tech tree's research
/// effect bonus before they enter the pool, so a single `bonus_sum` query
/// sees the amplified values.
pub fn collect_contributions(state: &GameState) -> Vec<Contribution> {
    let mut out = Vec::new();
    state.building.contribute(&mut out);
    state.tech_tree.contribute(&mut out);
    state.chief.contribute(&mut out);

    let research_amp = 1.0 + sum_of(&out, EffectType::ResearchEffectBonus, BonusTarget::All);
    let mut research = Vec::new();
    state.university.contribute(&mut research);
    for mut contribution in research {
        contribution.amount *= research_amp;
        out.push(contribution);
    }

    out
}

/// Additive total of one effect against one target.
pub fn bonus_sum(state: &GameState, effect: EffectType, target: BonusTarget) -> f64 {
    sum_of(&collect_contributions(state), effect, target)
}

fn sum_of(contributions: &[Contribution], effect: EffectType, target: BonusTarget) -> f64 {
    contributions
        .iter()
        .filter(|c| c.effect == effect && c.target.applies_to(target))
        .map(|c| c.amount)
        .sum()
}
