/// Timer-driven enemy creation.

use rand::Rng;

use crate::entities::{Enemy, GameState};
use crate::rules::{ScoreScaling, SpawnPolicy};

pub const ENEMY_SIZE: f32 = 30.0;
/// Enemies are larger on touch sessions so fingers can follow them.
pub const TOUCH_ENEMY_SCALE: f32 = 1.5;
/// Horizontal distance from either edge that spawns keep clear of.
pub const SPAWN_MARGIN: f32 = 30.0;

/// Milliseconds between spawns under the adaptive policy.
///
/// `difficulty = total_level / 10 + kills / 100`, and every point of
/// difficulty takes `step_ms` off the base interval, down to `floor_ms`.
pub fn adaptive_interval(base_ms: f64, floor_ms: f64, step_ms: f64, total_level: u32, kills: u32) -> f64 {
    let difficulty = f64::from(total_level) / 10.0 + f64::from(kills) / 100.0;
    (base_ms - difficulty * step_ms).max(floor_ms)
}

/// Health and descent speed of an enemy spawned at `score`.
pub fn scaled_stats(scaling: &ScoreScaling, score: f64) -> (f32, f32) {
    let health = scaling.base_health + (score.max(0.0) / scaling.health_step).floor() as f32;
    let speed = (scaling.base_speed + score.max(0.0) as f32 * scaling.speed_per_point)
        .min(scaling.max_speed);
    (health, speed)
}

/// Advance the spawn accumulator by `elapsed` (milliseconds for the adaptive
/// policy, ticks for the frame-count policy) and add at most one enemy.
pub fn update(state: &mut GameState, elapsed: f64, rng: &mut impl Rng) {
    state.spawn_timer += elapsed;

    match state.rules.spawn {
        SpawnPolicy::Adaptive {
            base_ms,
            floor_ms,
            step_ms,
            max_enemies,
            health,
            speed,
        } => {
            let interval = adaptive_interval(
                base_ms,
                floor_ms,
                step_ms,
                state.upgrades.total_level(),
                state.kills,
            );
            if state.spawn_timer >= interval {
                if state.enemies.len() < max_enemies {
                    spawn_enemy(state, health, speed, rng);
                }
                state.spawn_timer = 0.0;
            }
        }
        SpawnPolicy::FrameCount { frames, scaling } => {
            if state.spawn_timer >= f64::from(frames) {
                let (health, speed) = scaled_stats(&scaling, state.score);
                spawn_enemy(state, health, speed, rng);
                state.spawn_timer = 0.0;
            }
        }
    }
}

fn spawn_enemy(state: &mut GameState, health: f32, speed: f32, rng: &mut impl Rng) {
    let size = if state.touch_session {
        ENEMY_SIZE * TOUCH_ENEMY_SCALE
    } else {
        ENEMY_SIZE
    };
    let span = (state.width() - 2.0 * SPAWN_MARGIN).max(0.0);
    let x = rng.gen::<f32>() * span + SPAWN_MARGIN;

    tracing::trace!(x, health, speed, "enemy spawned");
    state.enemies.push(Enemy {
        x,
        y: -size,
        size,
        health,
        max_health: health,
        speed,
    });
}
