use upgrade_shooter::collision::*;
use upgrade_shooter::compute::init_state;
use upgrade_shooter::entities::*;
use upgrade_shooter::rules::{KillValue, Rules};
use upgrade_shooter::upgrades::UpgradeKind;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn bullet_at(x: f32, y: f32, damage: f32) -> Bullet {
    Bullet {
        x,
        y,
        radius: 4.0,
        speed: 10.0,
        vx: 0.0,
        vy: -10.0,
        damage,
        is_bounce: false,
        is_aim: false,
    }
}

fn enemy_at(x: f32, y: f32, health: f32) -> Enemy {
    Enemy {
        x,
        y,
        size: 30.0,
        health,
        max_health: health,
        speed: 1.2,
    }
}

// ── Damage & kills ────────────────────────────────────────────────────────────

#[test]
fn three_hits_kill_a_three_health_enemy_once() {
    let mut s = init_state(Rules::classic());
    let mut rng = seeded_rng();
    s.enemies.push(enemy_at(100.0, 100.0, 3.0));

    for expected_health in [2.0, 1.0] {
        s.bullets.push(bullet_at(100.0, 100.0, 1.0));
        let r = resolve(&mut s, &mut rng);
        assert_eq!(r.hits, 1);
        assert_eq!(r.kills, 0);
        assert_eq!(s.enemies[0].health, expected_health);
        assert_eq!(s.score, 0.0);
    }

    s.bullets.push(bullet_at(100.0, 100.0, 1.0));
    let r = resolve(&mut s, &mut rng);
    assert_eq!(r.kills, 1);
    assert!(s.enemies.is_empty());
    assert_relative_eq!(s.score, 3.0);
    assert_eq!(s.kills, 1);

    // Nothing left to award on a later pass
    let r = resolve(&mut s, &mut rng);
    assert_eq!(r, Resolution::default());
    assert_relative_eq!(s.score, 3.0);
}

#[test]
fn lethal_hit_removes_enemy_in_same_pass() {
    let mut s = init_state(Rules::economy());
    s.enemies.push(enemy_at(100.0, 100.0, 1.0));
    s.bullets.push(bullet_at(100.0, 100.0, 1.0));
    let r = resolve(&mut s, &mut seeded_rng());
    assert!(s.enemies.is_empty());
    assert_eq!(r.kills, 1);
    assert_eq!(r.score_gained, 10.0);
    assert_eq!(s.score, 10.0);
}

#[test]
fn bullet_hits_only_first_overlapping_enemy() {
    let mut s = init_state(Rules::classic());
    s.enemies.push(enemy_at(100.0, 100.0, 6.0));
    s.enemies.push(enemy_at(105.0, 100.0, 6.0));
    s.bullets.push(bullet_at(102.0, 100.0, 1.0));
    let r = resolve(&mut s, &mut seeded_rng());
    assert_eq!(r.hits, 1);
    assert_eq!(s.enemies[0].health, 5.0);
    assert_eq!(s.enemies[1].health, 6.0);
    assert!(s.bullets.is_empty());
}

#[test]
fn many_bullets_on_one_enemy_each_count_once() {
    let mut s = init_state(Rules::classic());
    s.enemies.push(enemy_at(100.0, 100.0, 6.0));
    for _ in 0..4 {
        s.bullets.push(bullet_at(100.0, 100.0, 1.0));
    }
    let r = resolve(&mut s, &mut seeded_rng());
    assert_eq!(r.hits, 4);
    assert_eq!(s.enemies[0].health, 2.0);
    assert!(s.bullets.is_empty());
}

#[test]
fn overkill_awards_score_once() {
    let mut s = init_state(Rules::economy());
    s.enemies.push(enemy_at(100.0, 100.0, 1.0));
    for _ in 0..3 {
        s.bullets.push(bullet_at(100.0, 100.0, 1.0));
    }
    let r = resolve(&mut s, &mut seeded_rng());
    assert_eq!(r.kills, 1);
    assert_eq!(s.score, 10.0);
}

// ── Overlap test ──────────────────────────────────────────────────────────────

#[test]
fn touching_exactly_is_not_a_hit() {
    let mut s = init_state(Rules::classic());
    s.enemies.push(enemy_at(100.0, 100.0, 6.0));
    s.bullets.push(bullet_at(119.0, 100.0, 1.0)); // 15 + 4 = 19 away
    let r = resolve(&mut s, &mut seeded_rng());
    assert_eq!(r.hits, 0);
    assert_eq!(s.bullets.len(), 1);
}

#[test]
fn just_inside_is_a_hit() {
    let mut s = init_state(Rules::classic());
    s.enemies.push(enemy_at(100.0, 100.0, 6.0));
    s.bullets.push(bullet_at(118.5, 100.0, 1.0));
    assert_eq!(resolve(&mut s, &mut seeded_rng()).hits, 1);
}

#[test]
fn fixed_radius_ignores_sizes() {
    let mut s = init_state(Rules::economy()); // fixed 20
    s.enemies.push(Enemy { size: 200.0, ..enemy_at(100.0, 100.0, 6.0) });
    s.bullets.push(bullet_at(125.0, 100.0, 1.0));
    assert_eq!(resolve(&mut s, &mut seeded_rng()).hits, 0);
    s.bullets[0].x = 115.0;
    assert_eq!(resolve(&mut s, &mut seeded_rng()).hits, 1);
}

// ── Bullet removal ────────────────────────────────────────────────────────────

#[test]
fn only_the_consumed_bullet_is_removed() {
    let mut s = init_state(Rules::classic());
    s.enemies.push(enemy_at(100.0, 100.0, 6.0));
    s.bullets.push(bullet_at(300.0, 300.0, 1.0));
    s.bullets.push(bullet_at(100.0, 100.0, 1.0));
    s.bullets.push(bullet_at(350.0, 300.0, 1.0));
    resolve(&mut s, &mut seeded_rng());
    let xs: Vec<f32> = s.bullets.iter().map(|b| b.x).collect();
    assert_eq!(xs, vec![300.0, 350.0]);
}

// ── Kill value ────────────────────────────────────────────────────────────────

#[test]
fn kill_value_decays_with_upgrades() {
    let policy = KillValue::Decaying { base: 3.0, per_level: 0.02, floor: 0.1 };
    assert_relative_eq!(kill_value(&policy, 0), 3.0);
    assert_relative_eq!(kill_value(&policy, 10), 2.8);
    assert_relative_eq!(kill_value(&policy, 1000), 0.1);
    assert_eq!(kill_value(&KillValue::Flat(10.0), 50), 10.0);
}

#[test]
fn bought_upgrades_cheapen_kills() {
    let mut s = init_state(Rules::classic());
    for _ in 0..10 {
        s.upgrades.increment(UpgradeKind::Damage); // damage 11
    }
    s.enemies.push(enemy_at(100.0, 100.0, 6.0));
    s.bullets.push(bullet_at(100.0, 100.0, 11.0));
    resolve(&mut s, &mut seeded_rng());
    assert_relative_eq!(s.score, 2.8);
}

// ── Bounce & particles ────────────────────────────────────────────────────────

#[test]
fn full_bounce_level_replaces_hit_bullet_with_bounce() {
    let mut s = init_state(Rules::classic());
    s.upgrades.set_level(UpgradeKind::Bounce, 10); // chance 1.0
    s.enemies.push(enemy_at(100.0, 100.0, 6.0));
    s.bullets.push(bullet_at(100.0, 100.0, 2.0));
    resolve(&mut s, &mut seeded_rng());
    assert_eq!(s.bullets.len(), 1);
    assert!(s.bullets[0].is_bounce);
    assert_eq!(s.bullets[0].damage, 1.0);
}

#[test]
fn no_bounce_without_the_upgrade() {
    let mut s = init_state(Rules::classic());
    s.enemies.push(enemy_at(100.0, 100.0, 6.0));
    s.bullets.push(bullet_at(100.0, 100.0, 1.0));
    resolve(&mut s, &mut seeded_rng());
    assert!(s.bullets.is_empty());
}

#[test]
fn deluxe_emits_particles_for_hits_and_kills() {
    let mut s = init_state(Rules::deluxe());
    s.enemies.push(enemy_at(100.0, 100.0, 2.0));
    s.bullets.push(bullet_at(100.0, 100.0, 1.0));
    resolve(&mut s, &mut seeded_rng());
    assert_eq!(s.particles.len(), 4);

    s.bullets.push(bullet_at(100.0, 100.0, 1.0));
    resolve(&mut s, &mut seeded_rng());
    assert_eq!(s.particles.len(), 4 + 4 + 12);
}

#[test]
fn classic_emits_no_particles() {
    let mut s = init_state(Rules::classic());
    s.enemies.push(enemy_at(100.0, 100.0, 1.0));
    s.bullets.push(bullet_at(100.0, 100.0, 1.0));
    resolve(&mut s, &mut seeded_rng());
    assert!(s.particles.is_empty());
}
