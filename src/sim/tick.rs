//! Per-frame simulation tick
//!
//! Core game loop that advances the session by one animation frame.

use super::spawn::{RandomSource, spawn_item};
use super::state::{GameEvent, GamePhase, GameState, Item, ItemKind};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Left held (keyboard, button or touch)
    pub left: bool,
    /// Right held
    pub right: bool,
    /// Absolute pointer x in field coordinates (recenters the player)
    pub pointer_x: Option<f32>,
    /// Start/pause/resume toggle (one-shot)
    pub toggle: bool,
    /// Restart the session (one-shot)
    pub restart: bool,
}

/// Advance the game by one frame of `dt` seconds
///
/// One-shot commands are handled first (restart, then toggle). The simulation
/// only moves while the phase is Running.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, rng: &mut impl RandomSource) {
    if input.restart {
        state.reset();
        log::info!("Session restarted");
    }

    if input.toggle {
        match state.phase {
            GamePhase::Idle | GamePhase::Paused => {
                state.phase = GamePhase::Running;
                state.events.push(GameEvent::Started);
                log::info!("Session running (level {})", state.level);
            }
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                log::info!("Session paused");
                return;
            }
            GamePhase::Ended => {}
        }
    }

    if state.phase != GamePhase::Running {
        return;
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, state.tuning.max_frame_dt)
    } else {
        0.0
    };
    update(state, input, dt, rng);
}

/// One simulation step: move, spawn, fall, collide
fn update(state: &mut GameState, input: &TickInput, dt: f32, rng: &mut impl RandomSource) {
    state.time_ticks += 1;
    let tuning = state.tuning;

    // --- PLAYER ---
    if let Some(px) = input.pointer_x {
        let x = px - state.player.rect.size.x / 2.0;
        state.player.set_x(x, &tuning);
    }
    let mut vel_x = 0.0;
    if input.left {
        vel_x -= state.player.speed;
    }
    if input.right {
        vel_x += state.player.speed;
    }
    state.player.vel_x = vel_x;
    let x = state.player.x() + vel_x * dt;
    state.player.set_x(x, &tuning);

    // --- SPAWN ---
    state.spawn_timer_ms += dt * 1000.0;
    if state.spawn_timer_ms >= state.spawn_interval_ms {
        state.spawn_timer_ms = 0.0;
        spawn_item(state, rng);
    }

    // --- ITEMS ---
    let player_rect = state.player.rect;
    let despawn_y = tuning.field_height + tuning.despawn_margin;
    let mut leveled = false;

    let mut pending = std::mem::take(&mut state.items).into_iter();
    let mut survivors: Vec<Item> = Vec::with_capacity(pending.len());

    for mut item in pending.by_ref() {
        item.rect.pos.y += item.fall_speed * dt;

        if item.rect.intersects(&player_rect) {
            resolve_collision(state, item.kind, &mut leveled);
            if state.phase == GamePhase::Ended {
                break;
            }
            continue;
        }

        if item.rect.top() > despawn_y {
            continue;
        }

        survivors.push(item);
    }

    // Items after a game-over stay exactly where they were
    survivors.extend(pending);
    state.items = survivors;
}

/// Apply the effect of the player touching an item of `kind`
fn resolve_collision(state: &mut GameState, kind: ItemKind, leveled: &mut bool) {
    match kind {
        ItemKind::GoodOrder => {
            state.score = state.score.saturating_add(state.tuning.points_per_order);
            state.events.push(GameEvent::Collected { score: state.score });

            if !*leveled && state.score >= state.next_level_score() {
                *leveled = true;
                level_up(state);
            }
        }
        ItemKind::PhishAttack | ItemKind::UsbAttack | ItemKind::FloodAttack => {
            state.lives = state.lives.saturating_sub(1);
            state.events.push(GameEvent::Hit { lives: state.lives });

            if state.lives == 0 {
                state.phase = GamePhase::Ended;
                state.events.push(GameEvent::GameOver {
                    score: state.score,
                    level: state.level,
                });
                log::info!(
                    "Game over: score {} at level {}",
                    state.score,
                    state.level
                );
            }
        }
    }
}

fn level_up(state: &mut GameState) {
    let tuning = &state.tuning;
    state.level += 1;
    state.spawn_interval_ms = (state.spawn_interval_ms - tuning.spawn_interval_step_ms)
        .max(tuning.spawn_interval_min_ms)
        .min(state.spawn_interval_ms);
    state.events.push(GameEvent::LevelUp { level: state.level });
    log::info!(
        "Level {} (spawn every {:.0}ms)",
        state.level,
        state.spawn_interval_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::ScriptedRandom;
    use crate::consts::MAX_FRAME_DT;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running_state() -> GameState {
        let mut state = GameState::default();
        let toggle = TickInput {
            toggle: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, 0.0, &mut ScriptedRandom::new([0.0]));
        state.drain_events();
        state
    }

    /// Drop an item right on top of the player
    fn drop_on_player(state: &mut GameState, kind: ItemKind) {
        let pos = state.player.rect.pos;
        state.spawn_item_at(kind, Vec2::new(pos.x, pos.y), 0.0);
    }

    fn step(state: &mut GameState) {
        tick(state, &TickInput::default(), 0.001, &mut ScriptedRandom::new([0.0]));
    }

    #[test]
    fn test_idle_to_running() {
        let mut state = GameState::default();
        assert_eq!(state.phase, GamePhase::Idle);

        // No toggle - nothing moves
        drop_on_player(&mut state, ItemKind::GoodOrder);
        step(&mut state);
        assert_eq!(state.score, 0);
        assert_eq!(state.items.len(), 1);

        let toggle = TickInput {
            toggle: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, 0.001, &mut ScriptedRandom::new([0.0]));
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.drain_events()[0], GameEvent::Started);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = running_state();
        let toggle = TickInput {
            toggle: true,
            ..Default::default()
        };

        tick(&mut state, &toggle, 0.016, &mut ScriptedRandom::new([0.0]));
        assert_eq!(state.phase, GamePhase::Paused);

        // Paused: holding right does nothing
        let x = state.player.x();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, 0.016, &mut ScriptedRandom::new([0.0]));
        assert_eq!(state.player.x(), x);

        tick(&mut state, &toggle, 0.016, &mut ScriptedRandom::new([0.0]));
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_movement_and_clamp() {
        let mut state = running_state();
        let start = state.player.x();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, 0.01, &mut ScriptedRandom::new([0.0]));
        assert!((state.player.x() - (start + 2.8)).abs() < 1e-3);

        // Both held cancels
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        let x = state.player.x();
        tick(&mut state, &both, 0.01, &mut ScriptedRandom::new([0.0]));
        assert_eq!(state.player.x(), x);
        assert_eq!(state.player.vel_x, 0.0);

        // Far left: clamped at 0
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &left, 0.033, &mut ScriptedRandom::new([0.0]));
        }
        assert_eq!(state.player.x(), 0.0);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut state = running_state();
        let start = state.player.x();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, 5.0, &mut ScriptedRandom::new([0.0]));
        let moved = state.player.x() - start;
        assert!((moved - 280.0 * MAX_FRAME_DT).abs() < 1e-3);

        let x = state.player.x();
        tick(&mut state, &right, f32::NAN, &mut ScriptedRandom::new([0.0]));
        assert_eq!(state.player.x(), x);
    }

    #[test]
    fn test_pointer_recenters_player() {
        let mut state = running_state();
        let input = TickInput {
            pointer_x: Some(100.0),
            ..Default::default()
        };
        tick(&mut state, &input, 0.0, &mut ScriptedRandom::new([0.0]));
        assert!((state.player.rect.center().x - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_spawn_timer() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::new([0.1, 0.5, 0.0]);
        // 900ms interval with 30ms frames: 30 frames to spawn
        for _ in 0..29 {
            tick(&mut state, &TickInput::default(), 0.030, &mut rng);
        }
        assert!(state.items.is_empty());
        tick(&mut state, &TickInput::default(), 0.030, &mut rng);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.spawn_timer_ms, 0.0);
        assert_eq!(state.items[0].kind, ItemKind::GoodOrder);
    }

    #[test]
    fn test_good_order_at_90_levels_up() {
        let mut state = running_state();
        state.score = 90;
        let interval = state.spawn_interval_ms;
        drop_on_player(&mut state, ItemKind::GoodOrder);
        step(&mut state);

        assert_eq!(state.score, 100);
        assert_eq!(state.level, 2);
        assert_eq!(state.spawn_interval_ms, interval - 70.0);
        assert!(state.items.is_empty());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Collected { score: 100 }));
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_spawn_interval_floor() {
        let mut state = running_state();
        state.spawn_interval_ms = 380.0;
        state.score = 90;
        drop_on_player(&mut state, ItemKind::GoodOrder);
        step(&mut state);
        assert_eq!(state.spawn_interval_ms, 350.0);

        state.score = 190;
        drop_on_player(&mut state, ItemKind::GoodOrder);
        step(&mut state);
        assert_eq!(state.level, 3);
        assert_eq!(state.spawn_interval_ms, 350.0);
    }

    #[test]
    fn test_level_threshold_with_uneven_points() {
        let tuning = Tuning {
            points_per_order: 30,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning);
        tick(
            &mut state,
            &TickInput { toggle: true, ..Default::default() },
            0.0,
            &mut ScriptedRandom::new([0.0]),
        );

        // 90 -> 120 crosses 100 without landing on it
        state.score = 90;
        drop_on_player(&mut state, ItemKind::GoodOrder);
        step(&mut state);
        assert_eq!(state.score, 120);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_two_orders_one_frame_level_once() {
        let mut state = running_state();
        state.score = 90;
        drop_on_player(&mut state, ItemKind::GoodOrder);
        drop_on_player(&mut state, ItemKind::GoodOrder);
        step(&mut state);

        assert_eq!(state.score, 110);
        assert_eq!(state.level, 2);
        let level_ups = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .count();
        assert_eq!(level_ups, 1);
    }

    #[test]
    fn test_attack_costs_a_life() {
        let mut state = running_state();
        state.score = 50;
        drop_on_player(&mut state, ItemKind::UsbAttack);
        step(&mut state);
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 50);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.drain_events(), vec![GameEvent::Hit { lives: 2 }]);
    }

    #[test]
    fn test_last_life_ends_session() {
        let mut state = running_state();
        state.lives = 1;
        state.score = 40;
        drop_on_player(&mut state, ItemKind::PhishAttack);
        // Later items must not be processed after game over
        drop_on_player(&mut state, ItemKind::GoodOrder);
        drop_on_player(&mut state, ItemKind::FloodAttack);
        step(&mut state);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.score, 40);
        assert_eq!(state.items.len(), 2);
        let game_overs: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(game_overs, vec![GameEvent::GameOver { score: 40, level: 1 }]);

        // Frozen: ticks and toggles change nothing
        let snapshot_items: Vec<_> = state.items.iter().map(|i| i.rect).collect();
        let toggle = TickInput {
            toggle: true,
            right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &toggle, 0.033, &mut ScriptedRandom::new([0.0]));
        }
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.lives, 0);
        assert!(state.drain_events().is_empty());
        let after: Vec<_> = state.items.iter().map(|i| i.rect).collect();
        assert_eq!(snapshot_items, after);
    }

    #[test]
    fn test_restart_after_end() {
        let mut state = running_state();
        state.lives = 1;
        state.score = 300;
        state.level = 4;
        state.spawn_interval_ms = 690.0;
        state.player.set_x(0.0, &state.tuning.clone());
        drop_on_player(&mut state, ItemKind::FloodAttack);
        state.spawn_item_at(ItemKind::GoodOrder, Vec2::new(10.0, 10.0), 100.0);
        step(&mut state);
        assert_eq!(state.phase, GamePhase::Ended);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, 0.016, &mut ScriptedRandom::new([0.0]));
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 1);
        assert!(state.items.is_empty());
        assert_eq!(state.spawn_interval_ms, 900.0);
        assert_eq!(state.player.x(), state.tuning.player_start_x());
        assert!(state.drain_events().contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_missed_items_are_dropped_in_order() {
        let mut state = running_state();
        let h = state.tuning.field_height;
        // Far from the player horizontally
        state.player.set_x(0.0, &state.tuning.clone());
        let a = state.spawn_item_at(ItemKind::GoodOrder, Vec2::new(300.0, 0.0), 0.0);
        let b = state.spawn_item_at(ItemKind::PhishAttack, Vec2::new(300.0, h + 61.0), 0.0);
        let c = state.spawn_item_at(ItemKind::UsbAttack, Vec2::new(400.0, 10.0), 0.0);
        let d = state.spawn_item_at(ItemKind::FloodAttack, Vec2::new(300.0, h + 60.0), 0.0);
        step(&mut state);

        let ids: Vec<u32> = state.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![a, c, d]);
        assert!(!ids.contains(&b));
        // Missing costs nothing
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_items_fall() {
        let mut state = running_state();
        state.player.set_x(0.0, &state.tuning.clone());
        state.spawn_item_at(ItemKind::GoodOrder, Vec2::new(300.0, 0.0), 200.0);
        tick(&mut state, &TickInput::default(), 0.025, &mut ScriptedRandom::new([0.0]));
        assert!((state.items[0].rect.pos.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = running_state();
        let mut state2 = running_state();
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);

        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..2000 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, 0.016, &mut rng1);
            tick(&mut state2, input, 0.016, &mut rng2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.lives, state2.lives);
        assert_eq!(state1.items.len(), state2.items.len());
        assert!((state1.player.x() - state2.player.x()).abs() < 0.0001);
    }
}
