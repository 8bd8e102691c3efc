//! Weighted item spawning
//!
//! Draws come from a [`RandomSource`] so tests can script exact values.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GameState, ItemKind};
use crate::tuning::Tuning;

/// Uniform draws in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

impl RandomSource for Pcg32 {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(0.0, 1.0 - f32::EPSILON)
    }
}

/// Pick a kind from one draw using the cumulative spawn weights
pub fn choose_kind(roll: f32, tuning: &Tuning) -> ItemKind {
    let [good, phish, usb] = tuning.spawn_cut_points();
    if roll < good {
        ItemKind::GoodOrder
    } else if roll < phish {
        ItemKind::PhishAttack
    } else if roll < usb {
        ItemKind::UsbAttack
    } else {
        ItemKind::FloodAttack
    }
}

/// Fall speed for an item spawned at `level` with a jitter draw
pub fn fall_speed(level: u32, jitter_roll: f32, tuning: &Tuning) -> f32 {
    let base = tuning.base_fall_speed;
    let level_bonus = level.saturating_sub(1) as f32 * tuning.fall_speed_per_level;
    base + jitter_roll * base * tuning.fall_jitter + level_bonus
}

/// Spawn one item just above the field. Consumes three draws: kind, x, jitter.
pub fn spawn_item(state: &mut GameState, rng: &mut impl RandomSource) -> u32 {
    let tuning = state.tuning;
    let kind = choose_kind(rng.next_unit(), &tuning);
    let size = kind.size(&tuning);
    let x = rng.next_unit() * (tuning.field_width - size.x).max(0.0);
    let y = -size.y - tuning.spawn_gap;
    let speed = fall_speed(state.level, rng.next_unit(), &tuning);
    state.spawn_item_at(kind, Vec2::new(x, y), speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_weight_boundaries() {
        let t = Tuning::default();
        assert_eq!(choose_kind(0.0, &t), ItemKind::GoodOrder);
        assert_eq!(choose_kind(0.599, &t), ItemKind::GoodOrder);
        assert_eq!(choose_kind(0.6, &t), ItemKind::PhishAttack);
        assert_eq!(choose_kind(0.799, &t), ItemKind::PhishAttack);
        assert_eq!(choose_kind(0.8, &t), ItemKind::UsbAttack);
        assert_eq!(choose_kind(0.899, &t), ItemKind::UsbAttack);
        assert_eq!(choose_kind(0.9, &t), ItemKind::FloodAttack);
        assert_eq!(choose_kind(0.999, &t), ItemKind::FloodAttack);
    }

    #[test]
    fn test_spawn_geometry() {
        let mut state = GameState::default();
        let t = state.tuning;
        // Flood, mid-field, no jitter
        let mut rng = ScriptedRandom::new([0.95, 0.5, 0.0]);
        spawn_item(&mut state, &mut rng);

        let item = &state.items[0];
        assert_eq!(item.kind, ItemKind::FloodAttack);
        assert_eq!(item.rect.size, Vec2::new(t.flood_width, t.flood_height));
        assert!((item.rect.pos.x - 0.5 * (t.field_width - t.flood_width)).abs() < 1e-3);
        assert_eq!(item.rect.pos.y, -t.flood_height - t.spawn_gap);
        assert_eq!(item.fall_speed, t.base_fall_speed);
    }

    #[test]
    fn test_fall_speed_includes_jitter_and_level() {
        let t = Tuning::default();
        assert_eq!(fall_speed(1, 0.0, &t), 140.0);
        assert!((fall_speed(1, 0.5, &t) - (140.0 + 21.0)).abs() < 1e-3);
        assert!((fall_speed(3, 0.0, &t) - (140.0 + 50.0)).abs() < 1e-3);
    }

    #[test]
    fn test_spawned_items_stay_in_field_horizontally() {
        let mut state = GameState::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            spawn_item(&mut state, &mut rng);
        }
        let w = state.tuning.field_width;
        assert!(
            state
                .items
                .iter()
                .all(|i| i.rect.left() >= 0.0 && i.rect.right() <= w)
        );
        // Every kind shows up with a real generator
        for kind in ItemKind::ALL {
            assert!(state.items.iter().any(|i| i.kind == kind));
        }
    }

    #[test]
    fn test_scripted_random_cycles() {
        let mut rng = ScriptedRandom::new([0.1, 0.2]);
        assert_eq!(rng.next_unit(), 0.1);
        assert_eq!(rng.next_unit(), 0.2);
        assert_eq!(rng.next_unit(), 0.1);
        let mut empty = ScriptedRandom::new(Vec::new());
        assert_eq!(empty.next_unit(), 0.0);
    }
}
