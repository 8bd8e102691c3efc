//! Goose Catch - a falling-items arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, session state)
//! - `highscores`: Top-10 leaderboard and the game-over name request
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Synthesized sound cues
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Typed JSON load/save over platform storage
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{Leaderboard, NameRequest};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Upper bound on a single frame's dt (seconds), avoids jumps after tab switches
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Field dimensions
    pub const FIELD_WIDTH: f32 = 480.0;
    pub const FIELD_HEIGHT: f32 = 640.0;

    /// Player (the goose)
    pub const PLAYER_WIDTH: f32 = 70.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    /// Distance from the top of the player to the bottom of the field
    pub const PLAYER_BOTTOM_OFFSET: f32 = 90.0;
    /// Horizontal speed (pixels/s)
    pub const PLAYER_SPEED: f32 = 280.0;

    /// Base fall speed (pixels/s)
    pub const BASE_FALL_SPEED: f32 = 140.0;
    /// Random extra fall speed as a fraction of the base
    pub const FALL_JITTER: f32 = 0.3;
    /// Fall speed added per level above 1 (pixels/s)
    pub const FALL_SPEED_PER_LEVEL: f32 = 25.0;

    /// Item sizes
    pub const ITEM_SIZE: f32 = 45.0;
    pub const FLOOD_WIDTH: f32 = 55.0;
    pub const FLOOD_HEIGHT: f32 = 26.0;
    /// Items spawn this far above the top edge
    pub const SPAWN_GAP: f32 = 10.0;
    /// Items are dropped once their top edge is this far below the field
    pub const DESPAWN_MARGIN: f32 = 60.0;

    /// Spawn interval (ms)
    pub const SPAWN_INTERVAL_MS: f32 = 900.0;
    pub const SPAWN_INTERVAL_STEP_MS: f32 = 70.0;
    pub const SPAWN_INTERVAL_MIN_MS: f32 = 350.0;

    /// Scoring
    pub const POINTS_PER_ORDER: u32 = 10;
    pub const LEVEL_SCORE_STEP: u32 = 100;
    pub const START_LIVES: u8 = 3;

    /// Spawn weights: GoodOrder, PhishAttack, UsbAttack, FloodAttack
    pub const SPAWN_WEIGHTS: [f32; 4] = [0.6, 0.2, 0.1, 0.1];

    /// Storage keys
    pub const LEADERBOARD_KEY: &str = "gosha-secure-lb";
    pub const SETTINGS_KEY: &str = "goose_catch_settings";

    /// Delay before asking for a name after game over (ms)
    pub const NAME_PROMPT_DELAY_MS: i32 = 50;
}

/// Current wall-clock time in milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current wall-clock time in milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
