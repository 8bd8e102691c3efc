//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Randomness only through a `RandomSource`
//! - Items processed in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, rects_intersect};
pub use spawn::{RandomSource, ScriptedRandom, choose_kind, fall_speed, spawn_item};
pub use state::{GameEvent, GamePhase, GameState, Item, ItemKind, Player};
pub use tick::{TickInput, tick};
