/// Turns the fire input and the upgrade table into bullets.

use std::f32::consts::PI;

use rand::Rng;

use crate::entities::{Bullet, Enemy, GameState};
use crate::math::{aim_angle, deg_to_rad, distance, velocity_from_angle};
use crate::upgrades::MIN_DAMAGE;

/// Degrees between neighbouring bullets of one volley.
pub const SPREAD_DEGREES: f32 = 10.0;
/// Enemies lower than this fraction of the screen are not aimed at.
pub const AIM_CUTOFF: f32 = 0.8;

pub const BOUNCE_SPEED_FACTOR: f32 = 0.7;
pub const BOUNCE_RADIUS: f32 = 3.0;

/// True once the fire-rate cooldown has elapsed.  The interval is read from
/// the current upgrade levels on every call.
pub fn ready_to_fire(state: &GameState) -> bool {
    match state.last_shot_ms {
        None => true,
        Some(last) => state.clock_ms - last > state.upgrades.fire_interval_ms(),
    }
}

/// Nearest enemy to the player, unless that enemy is already in the bottom
/// part of the screen, in which case there is no target at all.
pub fn aim_target<'a>(state: &'a GameState) -> Option<&'a Enemy> {
    let p = &state.player;
    let closest = state.enemies.iter().min_by(|a, b| {
        distance(p.x, p.y, a.x, a.y).total_cmp(&distance(p.x, p.y, b.x, b.y))
    })?;
    if closest.y > state.height() * AIM_CUTOFF {
        None
    } else {
        Some(closest)
    }
}

/// Build one volley from the player's current position.
pub fn volley(state: &GameState) -> Vec<Bullet> {
    let upgrades = &state.upgrades;
    let count = upgrades.bullet_count();
    let speed = upgrades.bullet_speed();
    let damage = upgrades.damage();
    let radius = upgrades.radius();
    let p = &state.player;

    let aiming = count == 1 && upgrades.aim_strength() > 0.0;
    let correction = if aiming {
        aim_target(state)
            .map(|e| aim_angle(p.x, p.y, e.x, e.y) * upgrades.aim_strength())
            .unwrap_or(0.0)
    } else {
        0.0
    };

    (0..count)
        .map(|i| {
            let slot = i as f32 - (count - 1) as f32 / 2.0;
            let angle = deg_to_rad(slot * SPREAD_DEGREES) + correction;
            let (vx, vy) = velocity_from_angle(angle, speed);
            Bullet {
                x: p.x,
                y: p.y,
                radius,
                speed,
                vx,
                vy,
                damage,
                is_bounce: false,
                is_aim: aiming,
            }
        })
        .collect()
}

/// Fire a volley if the trigger is held and the cooldown allows it.
/// Returns the number of bullets added.
pub fn fire_if_due(state: &mut GameState, trigger: bool) -> usize {
    if !trigger || !ready_to_fire(state) {
        return 0;
    }
    let shots = volley(state);
    let n = shots.len();
    state.bullets.extend(shots);
    state.last_shot_ms = Some(state.clock_ms);
    n
}

/// Roll for a bounce bullet after `bullet` hit something.
pub fn maybe_bounce(bullet: &Bullet, chance: f64, rng: &mut impl Rng) -> Option<Bullet> {
    if chance <= 0.0 || rng.gen::<f64>() >= chance {
        return None;
    }
    let angle = rng.gen::<f32>() * 2.0 * PI;
    let speed = bullet.speed * BOUNCE_SPEED_FACTOR;
    let (vx, vy) = velocity_from_angle(angle, speed);
    Some(Bullet {
        x: bullet.x,
        y: bullet.y,
        radius: BOUNCE_RADIUS,
        speed,
        vx,
        vy,
        damage: (bullet.damage / 2.0).max(MIN_DAMAGE),
        is_bounce: true,
        is_aim: false,
    })
}
