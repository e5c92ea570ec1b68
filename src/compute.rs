/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG.

use rand::Rng;

use crate::collision;
use crate::economy;
use crate::entities::{GameState, GameStatus, InputState, Player};
use crate::rules::{Movement, Rules, Timing};
use crate::save::SaveRecord;
use crate::shooter;
use crate::spawner;
use crate::upgrades::Upgrades;

pub const PLAYER_SIZE: f32 = 20.0;
/// Distance of the ship from the bottom edge.
pub const PLAYER_OFFSET: f32 = 50.0;
/// Fraction of the remaining distance to the pointer covered each step.
pub const POINTER_FOLLOW: f32 = 0.25;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the state of a fresh run.
pub fn init_state(rules: Rules) -> GameState {
    let player = Player {
        x: rules.width / 2.0,
        y: rules.height - PLAYER_OFFSET,
        size: PLAYER_SIZE,
        vx: 0.0,
        health: rules.starting_health,
    };
    GameState {
        rules,
        player,
        bullets: Vec::new(),
        enemies: Vec::new(),
        particles: Vec::new(),
        upgrades: Upgrades::default(),
        score: 0.0,
        kills: 0,
        status: GameStatus::Playing,
        clock_ms: 0.0,
        last_shot_ms: None,
        spawn_timer: 0.0,
        frame: 0,
        touch_session: false,
    }
}

/// Resume a saved run: upgrades, score and health come from the record,
/// everything else starts fresh.
pub fn continue_state(rules: Rules, record: &SaveRecord) -> GameState {
    let mut state = init_state(rules);
    state.upgrades = record.upgrades.clone();
    state.score = record.score;
    state.player.health = record.health;
    tracing::info!(score = record.score, health = record.health, "run continued");
    state
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Apply one step of movement input to the player.
pub fn move_player(state: &GameState, input: &InputState) -> GameState {
    let mut next = state.clone();
    steer(&mut next, input);
    next
}

fn steer(state: &mut GameState, input: &InputState) {
    let width = state.width();
    let movement = state.rules.movement;
    let p = &mut state.player;
    let half = p.size / 2.0;

    if let Some(target) = input.pointer {
        p.x += (target - p.x) * POINTER_FOLLOW;
        p.vx = 0.0;
    } else {
        let dir = match (input.left, input.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        match movement {
            Movement::Direct { speed } => p.x += dir * speed,
            Movement::Momentum {
                accel,
                friction,
                max_speed,
            } => {
                p.vx = ((p.vx + dir * accel) * friction).clamp(-max_speed, max_speed);
                p.x += p.vx;
            }
        }
    }

    let clamped = p.x.clamp(half, width - half);
    if clamped != p.x {
        p.x = clamped;
        p.vx = 0.0;
    }
}

// ── Entity advancement ───────────────────────────────────────────────────────

/// Move bullets, enemies and particles by `scale` steps and drop whatever
/// left the play field.  Every enemy that breaches the bottom edge costs one
/// health; the run ends on the step health first reaches zero.
pub fn advance(state: &mut GameState, scale: f32) {
    let (width, height) = (state.width(), state.height());

    state.bullets.retain_mut(|b| {
        b.x += b.vx * scale;
        b.y += b.vy * scale;
        b.y > 0.0 && b.x > 0.0 && b.x < width
    });

    let mut breaches = 0u32;
    state.enemies.retain_mut(|e| {
        e.y += e.speed * scale;
        if e.y < height + e.size / 2.0 {
            true
        } else {
            breaches += 1;
            false
        }
    });
    if breaches > 0 {
        lose_health(state, breaches);
    }

    state.particles.retain_mut(|p| {
        p.x += p.vx * scale;
        p.y += p.vy * scale;
        p.life -= 1;
        p.life > 0
    });
}

fn lose_health(state: &mut GameState, amount: u32) {
    state.player.health = state.player.health.saturating_sub(amount);
    if state.player.health == 0 && state.status != GameStatus::GameOver {
        state.status = GameStatus::GameOver;
        tracing::info!(
            final_score = state.display_score(),
            kills = state.kills,
            frame = state.frame,
            "game over"
        );
    }
}

// ── Per-frame tick (nearly pure, RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// `dt_ms` is the wall time since the previous frame; fixed-step rules ignore
/// it.  Nothing happens unless the run is in `Playing`.
pub fn tick(state: &GameState, input: &InputState, dt_ms: f64, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let mut next = state.clone();
    next.frame += 1;

    let (scale, elapsed_ms, spawn_elapsed) = match next.rules.timing {
        Timing::DeltaScaled {
            baseline_ms,
            max_delta_ms,
        } => {
            let dt = dt_ms.clamp(0.0, max_delta_ms);
            ((dt / baseline_ms) as f32, dt, dt)
        }
        Timing::FixedStep { step_ms } => (1.0, step_ms, 1.0),
    };
    next.clock_ms += elapsed_ms;

    // ── 1. Player ────────────────────────────────────────────────────────────
    if input.pointer.is_some() {
        next.touch_session = true;
    }
    steer(&mut next, input);

    // ── 2. Fire ──────────────────────────────────────────────────────────────
    let trigger = input.fire || next.touch_session;
    shooter::fire_if_due(&mut next, trigger);

    // ── 3. Advance stores, spawn ─────────────────────────────────────────────
    advance(&mut next, scale);
    spawner::update(&mut next, spawn_elapsed, rng);

    // ── 4. Resolve collisions ────────────────────────────────────────────────
    collision::resolve(&mut next, rng);

    // ── 5. Upgrade gate ──────────────────────────────────────────────────────
    if next.status == GameStatus::Playing {
        economy::check_gate(&mut next);
    }

    next
}
