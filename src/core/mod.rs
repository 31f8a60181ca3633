//! Core simulation: currency, bonuses, pricing, rates, and the tick.

pub mod bonus;
pub mod constants;
pub mod costs;
pub mod game_state;
pub mod ledger;
pub mod offline;
pub mod rates;
pub mod tick;

pub use constants::*;
pub use game_state::GameState;
pub use tick::{game_tick, TickResult};
