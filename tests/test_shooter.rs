use upgrade_shooter::compute::init_state;
use upgrade_shooter::entities::*;
use upgrade_shooter::rules::Rules;
use upgrade_shooter::shooter::*;
use upgrade_shooter::upgrades::UpgradeKind;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> GameState {
    init_state(Rules::classic()) // player at (200, 550)
}

fn enemy_at(x: f32, y: f32) -> Enemy {
    Enemy {
        x,
        y,
        size: 30.0,
        health: 6.0,
        max_health: 6.0,
        speed: 1.2,
    }
}

// ── Cooldown ──────────────────────────────────────────────────────────────────

#[test]
fn single_shot_from_fresh_game() {
    let mut s = make_state();
    let fired = fire_if_due(&mut s, true);
    assert_eq!(fired, 1);
    assert_eq!(s.bullets.len(), 1);
    let b = &s.bullets[0];
    assert_eq!(b.x, s.player.x);
    assert_eq!(b.y, s.player.y);
    assert_eq!(b.vx, 0.0);
    assert_eq!(b.vy, -10.0);
    assert_eq!(b.damage, 1.0);
    assert_eq!(b.radius, 4.0);
    assert!(!b.is_aim);
    assert!(!b.is_bounce);
}

#[test]
fn no_shot_without_trigger() {
    let mut s = make_state();
    assert_eq!(fire_if_due(&mut s, false), 0);
    assert!(s.bullets.is_empty());
}

#[test]
fn cooldown_blocks_until_interval_elapsed() {
    let mut s = make_state();
    fire_if_due(&mut s, true);

    s.clock_ms = 400.0; // needs strictly more than 400
    assert_eq!(fire_if_due(&mut s, true), 0);

    s.clock_ms = 401.0;
    assert_eq!(fire_if_due(&mut s, true), 1);
    assert_eq!(s.last_shot_ms, Some(401.0));
}

#[test]
fn fire_rate_level_applies_immediately() {
    let mut s = make_state();
    fire_if_due(&mut s, true);
    s.clock_ms = 250.0;
    assert!(!ready_to_fire(&s));

    s.upgrades.increment(UpgradeKind::FireRate); // 400 / 2 = 200 ms
    assert!(ready_to_fire(&s));
}

// ── Volleys ───────────────────────────────────────────────────────────────────

#[test]
fn volley_size_follows_bullet_count() {
    let mut s = make_state();
    s.upgrades.set_level(UpgradeKind::BulletCount, 3);
    let shots = volley(&s);
    assert_eq!(shots.len(), 3);
}

#[test]
fn volley_fans_out_symmetrically() {
    let mut s = make_state();
    s.upgrades.set_level(UpgradeKind::BulletCount, 3);
    let shots = volley(&s);

    assert!(shots[0].vx < 0.0);
    assert_relative_eq!(shots[1].vx, 0.0);
    assert!(shots[2].vx > 0.0);
    assert_relative_eq!(shots[0].vx, -shots[2].vx, epsilon = 1e-5);
    // 10° either side of straight up
    assert_relative_eq!(shots[2].vx, 10.0 * 10f32.to_radians().sin(), epsilon = 1e-4);
    assert!(shots.iter().all(|b| b.vy < 0.0));
}

#[test]
fn even_volley_has_no_centre_bullet() {
    let mut s = make_state();
    s.upgrades.set_level(UpgradeKind::BulletCount, 2);
    let shots = volley(&s);
    // ±5°
    assert_relative_eq!(shots[0].vx, -10.0 * 5f32.to_radians().sin(), epsilon = 1e-4);
    assert_relative_eq!(shots[1].vx, 10.0 * 5f32.to_radians().sin(), epsilon = 1e-4);
}

#[test]
fn bullet_stats_follow_levels() {
    let mut s = make_state();
    s.upgrades.set_level(UpgradeKind::Damage, 3);
    s.upgrades.set_level(UpgradeKind::Speed, 2);
    s.upgrades.set_level(UpgradeKind::Radius, 2);
    let b = &volley(&s)[0];
    assert_eq!(b.damage, 3.0);
    assert_eq!(b.speed, 20.0);
    assert_eq!(b.vy, -20.0);
    assert_eq!(b.radius, 8.0);
}

// ── Auto-aim ──────────────────────────────────────────────────────────────────

#[test]
fn auto_aim_leans_toward_target() {
    let mut s = make_state();
    s.upgrades.set_level(UpgradeKind::AutoAim, 1);
    s.enemies.push(enemy_at(300.0, 100.0));
    let b = &volley(&s)[0];
    assert!(b.is_aim);
    assert!(b.vx > 0.0);

    let expected = (100f32).atan2(450.0) * 0.005;
    assert_relative_eq!(b.vx, expected.sin() * 10.0, epsilon = 1e-5);
}

#[test]
fn auto_aim_strength_scales_with_level() {
    let mut s = make_state();
    s.enemies.push(enemy_at(100.0, 100.0));
    s.upgrades.set_level(UpgradeKind::AutoAim, 1);
    let weak = volley(&s)[0].vx;
    s.upgrades.set_level(UpgradeKind::AutoAim, 4);
    let strong = volley(&s)[0].vx;
    assert!(weak < 0.0);
    assert!(strong < weak);
}

#[test]
fn auto_aim_ignores_enemy_near_bottom() {
    let mut s = make_state();
    s.upgrades.set_level(UpgradeKind::AutoAim, 1);
    s.enemies.push(enemy_at(300.0, 500.0)); // below 0.8 × 600
    assert!(aim_target(&s).is_none());
    let b = &volley(&s)[0];
    assert!(b.is_aim);
    assert_eq!(b.vx, 0.0);
}

#[test]
fn auto_aim_has_no_target_when_nearest_is_too_low() {
    let mut s = make_state();
    s.enemies.push(enemy_at(210.0, 520.0)); // nearest, but too low
    s.enemies.push(enemy_at(100.0, 100.0));
    assert!(aim_target(&s).is_none());
}

#[test]
fn auto_aim_picks_nearest_enemy() {
    let mut s = make_state();
    s.enemies.push(enemy_at(100.0, 100.0));
    s.enemies.push(enemy_at(250.0, 300.0));
    let target = aim_target(&s).expect("target");
    assert_eq!(target.x, 250.0);
}

#[test]
fn auto_aim_only_for_single_bullet_volleys() {
    let mut s = make_state();
    s.upgrades.set_level(UpgradeKind::AutoAim, 3);
    s.upgrades.set_level(UpgradeKind::BulletCount, 2);
    s.enemies.push(enemy_at(350.0, 100.0));
    let shots = volley(&s);
    assert!(shots.iter().all(|b| !b.is_aim));
    assert_relative_eq!(shots[0].vx, -shots[1].vx, epsilon = 1e-5);
}

// ── Bounce ────────────────────────────────────────────────────────────────────

#[test]
fn bounce_always_spawns_at_full_chance() {
    let s = make_state();
    let parent = volley(&s)[0].clone();
    let mut rng = StdRng::seed_from_u64(7);
    let b = maybe_bounce(&parent, 1.0, &mut rng).expect("bounce");
    assert!(b.is_bounce);
    assert_eq!(b.radius, 3.0);
    assert_eq!(b.damage, 0.5);
    assert_relative_eq!(b.speed, 7.0, epsilon = 1e-5);
    assert_relative_eq!((b.vx * b.vx + b.vy * b.vy).sqrt(), 7.0, epsilon = 1e-4);
    assert_eq!((b.x, b.y), (parent.x, parent.y));
}

#[test]
fn bounce_never_spawns_at_zero_chance() {
    let s = make_state();
    let parent = volley(&s)[0].clone();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        assert!(maybe_bounce(&parent, 0.0, &mut rng).is_none());
    }
}

#[test]
fn bounce_damage_has_a_floor() {
    let s = make_state();
    let mut parent = volley(&s)[0].clone();
    parent.damage = 0.1;
    let mut rng = StdRng::seed_from_u64(7);
    let b = maybe_bounce(&parent, 1.0, &mut rng).expect("bounce");
    assert_eq!(b.damage, 0.1);
}
