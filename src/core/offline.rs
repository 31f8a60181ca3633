//! Offline catch-up.
//!
//! When a save comes back after an absence, production for the missed time
//! is paid out in one lump at reduced efficiency. Short gaps are ignored so
//! a quick reload does not print money, and very long absences are capped
//! at a day of credit.

use log::info;

use crate::core::constants::*;
use crate::core::game_state::GameState;
use crate::core::rates::aggregate_rate;

/// What an absence paid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfflineProgress {
    pub elapsed_ms: i64,
    pub credited_ms: i64,
    pub gold: u64,
}

/// Credits production for the time between the save's timestamp and now.
///
/// Returns `None` when there is nothing to credit: no usable timestamp,
/// an absence under a minute, or a village with no production.
pub fn apply_offline_progress(state: &mut GameState, now_ms: i64) -> Option<OfflineProgress> {
    if state.timestamp <= 0 {
        return None;
    }
    let elapsed_ms = now_ms - state.timestamp;
    if elapsed_ms <= OFFLINE_MIN_ELAPSED_MS {
        return None;
    }

    let credited_ms = elapsed_ms.min(OFFLINE_CAP_MS);
    let rate = aggregate_rate(state);
    let gold = (rate * credited_ms as f64 / 1_000.0 * OFFLINE_EFFICIENCY).floor() as u64;
    if gold == 0 {
        return None;
    }

    state.earn(gold as f64);
    info!(
        "offline catch-up: {}s away, {} gold credited",
        elapsed_ms / 1_000,
        gold
    );
    Some(OfflineProgress {
        elapsed_ms,
        credited_ms,
        gold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::GeneratorType;

    fn producing_state(timestamp: i64) -> GameState {
        let mut state = GameState::new(timestamp);
        state.generator_mut(GeneratorType::Villager).count = 10;
        state
    }

    #[test]
    fn test_short_absences_are_ignored() {
        let mut state = producing_state(1_000_000);
        assert_eq!(apply_offline_progress(&mut state, 1_000_000 + 60_000), None);
        assert_eq!(state.ledger.balance(), 0);
    }

    #[test]
    fn test_absence_pays_at_reduced_efficiency() {
        let mut state = producing_state(1_000_000);
        // 10 gps for 1000s at 80%.
        let progress = apply_offline_progress(&mut state, 1_000_000 + 1_000_000).unwrap();
        assert_eq!(progress.gold, 8_000);
        assert_eq!(state.ledger.balance(), 8_000);
    }

    #[test]
    fn test_credit_caps_at_one_day() {
        let mut state = producing_state(1_000_000);
        let week_ms = 7 * OFFLINE_CAP_MS;
        let progress = apply_offline_progress(&mut state, 1_000_000 + week_ms).unwrap();

        assert_eq!(progress.credited_ms, OFFLINE_CAP_MS);
        // 10 gps * 86400s * 0.8
        assert_eq!(progress.gold, 691_200);
    }

    #[test]
    fn test_unset_timestamp_yields_nothing() {
        let mut state = producing_state(0);
        assert_eq!(apply_offline_progress(&mut state, 10_000_000), None);
    }

    #[test]
    fn test_empty_village_earns_nothing() {
        let mut state = GameState::new(1_000_000);
        assert_eq!(
            apply_offline_progress(&mut state, 1_000_000 + 1_000_000),
            None
        );
    }
}
