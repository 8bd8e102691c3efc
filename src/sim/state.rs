//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; nothing is global.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh session, waiting for the start toggle
    Idle,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Out of lives; frozen until restart
    Ended,
}

/// Things that happened during a tick, for audio/HUD/leaderboard glue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Entered Running (start or resume)
    Started,
    /// Left Running via the toggle
    Paused,
    /// Caught a parcel
    Collected { score: u32 },
    /// Caught an attack
    Hit { lives: u8 },
    LevelUp { level: u32 },
    /// Lives reached zero. Emitted exactly once per session.
    GameOver { score: u32, level: u32 },
    /// Session reset to Idle
    Restarted,
}

/// Falling item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    GoodOrder,
    PhishAttack,
    UsbAttack,
    FloodAttack,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::GoodOrder,
        ItemKind::PhishAttack,
        ItemKind::UsbAttack,
        ItemKind::FloodAttack,
    ];

    /// Nominal (width, height); floods are wider and shorter
    pub fn size(self, tuning: &Tuning) -> Vec2 {
        match self {
            ItemKind::FloodAttack => Vec2::new(tuning.flood_width, tuning.flood_height),
            _ => Vec2::splat(tuning.item_size),
        }
    }
}

/// A falling item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub rect: Rect,
    /// Pixels per second, fixed at spawn
    pub fall_speed: f32,
}

/// The player's goose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Horizontal velocity from the last update (pixels/s)
    pub vel_x: f32,
    pub speed: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            rect: Rect::new(
                tuning.player_start_x(),
                tuning.player_y(),
                tuning.player_width,
                tuning.player_height,
            ),
            vel_x: 0.0,
            speed: tuning.player_speed,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.rect.pos.x
    }

    /// Move to `x`, clamped so the whole body stays on the field
    pub fn set_x(&mut self, x: f32, tuning: &Tuning) {
        let x = if x.is_finite() { x } else { self.rect.pos.x };
        self.rect.pos.x = x.clamp(0.0, tuning.player_max_x());
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u8,
    pub level: u32,
    /// Current spawn interval (ms); only ever decreases within a session
    pub spawn_interval_ms: f32,
    /// Accumulated time since the last spawn (ms)
    pub spawn_timer_ms: f32,
    pub player: Player,
    /// Active items in spawn order
    pub items: Vec<Item>,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Simulation updates performed this session
    pub time_ticks: u64,
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl GameState {
    /// Create an Idle session with the given balance
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            phase: GamePhase::Idle,
            score: 0,
            lives: tuning.start_lives,
            level: 1,
            spawn_interval_ms: tuning.spawn_interval_ms,
            spawn_timer_ms: 0.0,
            player: Player::new(&tuning),
            items: Vec::new(),
            events: Vec::new(),
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Return to Idle with every counter at its starting value
    pub fn reset(&mut self) {
        let tuning = self.tuning;
        *self = Self::new(tuning);
        self.events.push(GameEvent::Restarted);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put an item of `kind` with its top-left at `pos`
    pub fn spawn_item_at(&mut self, kind: ItemKind, pos: Vec2, fall_speed: f32) -> u32 {
        let size = kind.size(&self.tuning);
        let id = self.next_entity_id();
        self.items.push(Item {
            id,
            kind,
            rect: Rect { pos, size },
            fall_speed,
        });
        id
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    /// Score at which the next level starts
    pub fn next_level_score(&self) -> u32 {
        self.level.saturating_mul(self.tuning.level_score_step)
    }
}
