//! Dorp - Village-Building Idle Game Engine
//!
//! The full simulation behind a clicker village: production generators,
//! the clickable chief, the central building, camp raids, a university,
//! a wisdom-funded tech tree, and prestige. The engine is headless and
//! deterministic: callers pass timestamps and RNGs in, and drive it with
//! one tick per second.

pub mod building;
pub mod chief;
pub mod combat;
pub mod commands;
pub mod core;
pub mod generators;
pub mod prestige;
pub mod save_manager;
pub mod tech_tree;
pub mod university;

pub use crate::commands::CommandError;
pub use crate::core::game_state::GameState;
pub use crate::core::tick::{game_tick, TickResult};
pub use crate::save_manager::SaveManager;
