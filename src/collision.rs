/// Bullet ↔ enemy resolution: damage, kills, score, bounce bullets and
/// cosmetic particles.

use std::collections::HashSet;

use rand::Rng;

use crate::entities::{Bullet, Enemy, GameState, Particle};
use crate::math::distance;
use crate::rules::{HitRadius, KillValue};
use crate::shooter::maybe_bounce;

const HIT_PARTICLES: usize = 4;
const HIT_PARTICLE_LIFE: i32 = 15;
const HIT_COLOR: [u8; 3] = [255, 220, 90];
const KILL_PARTICLES: usize = 12;
const KILL_PARTICLE_LIFE: i32 = 30;
const KILL_COLOR: [u8; 3] = [255, 110, 40];
const PARTICLE_SPEED: f32 = 2.0;

/// What one resolution pass did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    pub hits: usize,
    pub kills: u32,
    pub score_gained: f64,
}

/// Score for a single kill given the bought upgrade levels.
pub fn kill_value(policy: &KillValue, total_level: u32) -> f64 {
    match *policy {
        KillValue::Decaying {
            base,
            per_level,
            floor,
        } => (base - f64::from(total_level) * per_level).max(floor),
        KillValue::Flat(value) => value,
    }
}

pub fn overlaps(policy: &HitRadius, enemy: &Enemy, bullet: &Bullet) -> bool {
    let reach = match *policy {
        HitRadius::EnemySize => enemy.size / 2.0 + bullet.radius,
        HitRadius::Fixed(r) => r,
    };
    distance(bullet.x, bullet.y, enemy.x, enemy.y) < reach
}

/// Run one pairwise pass over the current stores.
///
/// A bullet hits at most one enemy: the first enemy in store order that it
/// overlaps consumes it.
pub fn resolve(state: &mut GameState, rng: &mut impl Rng) -> Resolution {
    let hit_radius = state.rules.hit_radius;
    let bounce_chance = state.upgrades.bounce_chance();
    let emit_particles = state.rules.particles;

    let mut consumed: HashSet<usize> = HashSet::new();
    let mut bounced: Vec<Bullet> = Vec::new();
    let mut sparks: Vec<Particle> = Vec::new();

    for enemy in state.enemies.iter_mut() {
        for (bi, bullet) in state.bullets.iter().enumerate() {
            if consumed.contains(&bi) || !overlaps(&hit_radius, enemy, bullet) {
                continue;
            }
            enemy.health -= bullet.damage;
            consumed.insert(bi);

            if let Some(b) = maybe_bounce(bullet, bounce_chance, rng) {
                bounced.push(b);
            }
            if emit_particles {
                burst(&mut sparks, bullet.x, bullet.y, HIT_PARTICLES, HIT_PARTICLE_LIFE, HIT_COLOR, rng);
            }
        }
    }

    let value = kill_value(&state.rules.kill_value, state.upgrades.total_level());
    let mut result = Resolution {
        hits: consumed.len(),
        ..Resolution::default()
    };

    state.enemies.retain(|enemy| {
        if enemy.health <= 0.0 {
            result.kills += 1;
            result.score_gained += value;
            if emit_particles {
                burst(&mut sparks, enemy.x, enemy.y, KILL_PARTICLES, KILL_PARTICLE_LIFE, KILL_COLOR, rng);
            }
            false
        } else {
            true
        }
    });

    let mut index = 0;
    state.bullets.retain(|_| {
        let keep = !consumed.contains(&index);
        index += 1;
        keep
    });
    state.bullets.extend(bounced);
    state.particles.extend(sparks);

    state.score += result.score_gained;
    state.kills += result.kills;
    result
}

fn burst(
    out: &mut Vec<Particle>,
    x: f32,
    y: f32,
    count: usize,
    life: i32,
    color: [u8; 3],
    rng: &mut impl Rng,
) {
    for _ in 0..count {
        out.push(Particle {
            x,
            y,
            vx: rng.gen_range(-PARTICLE_SPEED..PARTICLE_SPEED),
            vy: rng.gen_range(-PARTICLE_SPEED..PARTICLE_SPEED),
            life,
            color,
        });
    }
}
