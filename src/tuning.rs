//! Data-driven game balance
//!
//! All numbers that shape a session live here. Defaults come from
//! [`crate::consts`]; a partial JSON document can override any of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected balance values
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(String),
    #[error("field must have a positive size (got {width}x{height})")]
    EmptyField { width: f32, height: f32 },
    #[error("player ({player}px) does not fit in the field ({field}px)")]
    PlayerTooWide { player: f32, field: f32 },
    #[error("item width {width}px does not fit in the field")]
    ItemTooWide { width: f32 },
    #[error("spawn interval floor {floor}ms exceeds the initial interval {initial}ms")]
    SpawnFloorAboveInitial { floor: f32, initial: f32 },
    #[error("spawn interval must be positive")]
    NonPositiveSpawnInterval,
    #[error("spawn weights must be non-negative and sum to 1 (sum {sum})")]
    BadWeights { sum: f32 },
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("player offset {offset}px must be between its height {height}px and the field")]
    PlayerOffField { offset: f32, height: f32 },
}

/// Balance constants for one session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field_width: f32,
    pub field_height: f32,

    pub player_width: f32,
    pub player_height: f32,
    /// Player top edge sits this far above the bottom of the field
    pub player_bottom_offset: f32,
    pub player_speed: f32,

    pub base_fall_speed: f32,
    pub fall_jitter: f32,
    pub fall_speed_per_level: f32,

    pub item_size: f32,
    pub flood_width: f32,
    pub flood_height: f32,
    pub spawn_gap: f32,
    pub despawn_margin: f32,

    pub spawn_interval_ms: f32,
    pub spawn_interval_step_ms: f32,
    pub spawn_interval_min_ms: f32,

    pub points_per_order: u32,
    /// Level `n` ends once the score reaches `n * level_score_step`. This is a
    /// threshold: when `points_per_order` does not divide the step, levels come
    /// at the first score past each boundary rather than on exact multiples.
    pub level_score_step: u32,
    pub start_lives: u8,

    /// GoodOrder, PhishAttack, UsbAttack, FloodAttack
    pub spawn_weights: [f32; 4],

    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,
            player_speed: PLAYER_SPEED,
            base_fall_speed: BASE_FALL_SPEED,
            fall_jitter: FALL_JITTER,
            fall_speed_per_level: FALL_SPEED_PER_LEVEL,
            item_size: ITEM_SIZE,
            flood_width: FLOOD_WIDTH,
            flood_height: FLOOD_HEIGHT,
            spawn_gap: SPAWN_GAP,
            despawn_margin: DESPAWN_MARGIN,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,
            spawn_interval_min_ms: SPAWN_INTERVAL_MIN_MS,
            points_per_order: POINTS_PER_ORDER,
            level_score_step: LEVEL_SCORE_STEP,
            start_lives: START_LIVES,
            spawn_weights: SPAWN_WEIGHTS,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the values describe a playable session
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(TuningError::EmptyField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if self.player_width <= 0.0 || self.player_height <= 0.0 {
            return Err(TuningError::NonPositive("player size"));
        }
        if self.player_width > self.field_width {
            return Err(TuningError::PlayerTooWide {
                player: self.player_width,
                field: self.field_width,
            });
        }
        if self.player_bottom_offset < self.player_height
            || self.player_bottom_offset > self.field_height
        {
            return Err(TuningError::PlayerOffField {
                offset: self.player_bottom_offset,
                height: self.player_height,
            });
        }
        let widest = self.item_size.max(self.flood_width);
        if widest > self.field_width {
            return Err(TuningError::ItemTooWide { width: widest });
        }
        if self.item_size <= 0.0 || self.flood_width <= 0.0 || self.flood_height <= 0.0 {
            return Err(TuningError::NonPositive("item size"));
        }
        if self.base_fall_speed <= 0.0 {
            return Err(TuningError::NonPositive("base fall speed"));
        }
        for (value, name) in [
            (self.fall_jitter, "fall jitter"),
            (self.fall_speed_per_level, "fall speed per level"),
            (self.spawn_gap, "spawn gap"),
            (self.despawn_margin, "despawn margin"),
            (self.spawn_interval_step_ms, "spawn interval step"),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(TuningError::Negative(name));
            }
        }
        if self.player_speed <= 0.0 {
            return Err(TuningError::NonPositive("player speed"));
        }
        if self.max_frame_dt <= 0.0 {
            return Err(TuningError::NonPositive("max frame dt"));
        }
        if self.points_per_order == 0 || self.level_score_step == 0 {
            return Err(TuningError::NonPositive("scoring step"));
        }
        if self.start_lives == 0 {
            return Err(TuningError::NonPositive("starting lives"));
        }
        if self.spawn_interval_min_ms <= 0.0 {
            return Err(TuningError::NonPositiveSpawnInterval);
        }
        if self.spawn_interval_min_ms > self.spawn_interval_ms {
            return Err(TuningError::SpawnFloorAboveInitial {
                floor: self.spawn_interval_min_ms,
                initial: self.spawn_interval_ms,
            });
        }
        let sum: f32 = self.spawn_weights.iter().sum();
        if self.spawn_weights.iter().any(|w| *w < 0.0) || (sum - 1.0).abs() > 1e-3 {
            return Err(TuningError::BadWeights { sum });
        }
        Ok(())
    }

    /// Top edge of the player
    pub fn player_y(&self) -> f32 {
        self.field_height - self.player_bottom_offset
    }

    /// Left edge that centers the player in the field
    pub fn player_start_x(&self) -> f32 {
        (self.field_width - self.player_width) / 2.0
    }

    /// Rightmost allowed player x
    pub fn player_max_x(&self) -> f32 {
        (self.field_width - self.player_width).max(0.0)
    }

    /// Cumulative spawn cut points (0.6 / 0.8 / 0.9 with the defaults)
    ///
    /// The upper cuts are taken from the top so f32 rounding of the running
    /// sum cannot push a boundary past its nominal value.
    pub fn spawn_cut_points(&self) -> [f32; 3] {
        let w = self.spawn_weights;
        [w[0], 1.0 - (w[2] + w[3]), 1.0 - w[3]]
    }

    /// CSS `aspect-ratio` value matching the field
    pub fn aspect_ratio_css(&self) -> String {
        format!("{} / {}", self.field_width, self.field_height)
    }
}
