/// All game entity types. Pure data, no logic.

use crate::rules::Rules;
use crate::upgrades::Upgrades;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Simulation is paused while the player shops.
    UpgradeOpen,
    GameOver,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Controls sampled once per frame by the front end.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    /// Horizontal world coordinate the pointer is pressing at, if any.
    pub pointer: Option<f32>,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Scalar speed the velocity was built from (bounce bullets derive theirs from it).
    pub speed: f32,
    pub vx: f32,
    pub vy: f32,
    pub damage: f32,
    pub is_bounce: bool,
    pub is_aim: bool,
}

// ── Player, enemies & particles ───────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Horizontal velocity; only momentum movement uses it.
    pub vx: f32,
    pub health: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub health: f32,
    /// Health at spawn time, kept for the health bar.
    pub max_health: f32,
    /// Descent per step.
    pub speed: f32,
}

/// Cosmetic spark; has no gameplay effect.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining frames.
    pub life: i32,
    pub color: [u8; 3],
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state of one run.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub rules: Rules,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub upgrades: Upgrades,
    pub score: f64,
    pub kills: u32,
    pub status: GameStatus,
    /// Monotonic simulation clock in milliseconds.
    pub clock_ms: f64,
    /// Clock reading of the last volley; `None` until the first shot.
    pub last_shot_ms: Option<f64>,
    /// Milliseconds (delta timing) or ticks (fixed step) since the last spawn.
    pub spawn_timer: f64,
    pub frame: u64,
    /// Set on the first pointer press; touch sessions fire continuously.
    pub touch_session: bool,
}

impl GameState {
    pub fn width(&self) -> f32 {
        self.rules.width
    }

    pub fn height(&self) -> f32 {
        self.rules.height
    }

    /// Score as shown to the player.
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }
}
