//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing
//! - Input events
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod input;
pub mod storage;
pub mod time;

pub use input::{Direction, InputState, Key};
pub use storage::{MemoryStorage, Storage};
pub use time::FrameClock;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
