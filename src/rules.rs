/// Rule variants of the game, expressed as strategy parameters.
///
/// The three variants share one simulation; everything that differs between
/// them lives in a [`Rules`] value built by [`Rules::for_variant`].

use serde::{Deserialize, Serialize};

use crate::upgrades::UpgradeKind;

/// Score needed before the upgrade screen opens (or becomes available).
pub const UPGRADE_THRESHOLD: f64 = 10.0;

pub const DEFAULT_WIDTH: f32 = 400.0;
pub const DEFAULT_HEIGHT: f32 = 600.0;
pub const DEFAULT_HEALTH: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Classic,
    Economy,
    Deluxe,
}

impl Variant {
    pub fn label(self) -> &'static str {
        match self {
            Variant::Classic => "CLASSIC",
            Variant::Economy => "ECONOMY",
            Variant::Deluxe => "DELUXE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Timing {
    /// Movement scaled by `dt / baseline_ms`; `dt` clamped to `max_delta_ms`.
    DeltaScaled { baseline_ms: f64, max_delta_ms: f64 },
    /// One velocity unit per tick; the clock advances by `step_ms`.
    FixedStep { step_ms: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreScaling {
    pub base_health: f32,
    /// Score needed for each extra point of enemy health.
    pub health_step: f64,
    pub base_speed: f32,
    pub speed_per_point: f32,
    pub max_speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnPolicy {
    /// Interval shrinks with upgrade levels and kills, concurrent enemies capped.
    Adaptive {
        base_ms: f64,
        floor_ms: f64,
        step_ms: f64,
        max_enemies: usize,
        health: f32,
        speed: f32,
    },
    /// Fixed tick count between spawns, enemy toughness grows with score.
    FrameCount { frames: u32, scaling: ScoreScaling },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CostCurve {
    Flat { cost: f64 },
    Linear { base_cost: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatePolicy {
    /// Opens itself at the threshold, closes once score drops below it.
    Auto,
    /// Only exposes an affordance; the player opens and closes it.
    Manual,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KillValue {
    /// `max(floor, base − total_level × per_level)`
    Decaying { base: f64, per_level: f64, floor: f64 },
    Flat(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitRadius {
    /// `enemy.size / 2 + bullet.radius`
    EnemySize,
    Fixed(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Movement {
    /// Position changes by `speed` per step while a key is held.
    Direct { speed: f32 },
    /// Keys accelerate, friction decays velocity every step.
    Momentum { accel: f32, friction: f32, max_speed: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    pub variant: Variant,
    pub width: f32,
    pub height: f32,
    pub starting_health: u32,
    pub timing: Timing,
    pub spawn: SpawnPolicy,
    pub cost: CostCurve,
    pub gate: GatePolicy,
    pub kill_value: KillValue,
    pub hit_radius: HitRadius,
    pub movement: Movement,
    pub particles: bool,
    /// Total points and save/continue are kept across runs.
    pub persistent: bool,
    /// Rejected purchases are reported to the player.
    pub announce_rejections: bool,
    pub offered: Vec<UpgradeKind>,
}

const FIXED_STEP_MS: f64 = 1000.0 / 60.0;

const ECONOMY_OFFER: [UpgradeKind; 5] = [
    UpgradeKind::FireRate,
    UpgradeKind::BulletCount,
    UpgradeKind::Damage,
    UpgradeKind::Speed,
    UpgradeKind::Radius,
];

fn score_scaling() -> ScoreScaling {
    ScoreScaling {
        base_health: 1.0,
        health_step: 50.0,
        base_speed: 1.0,
        speed_per_point: 0.002,
        max_speed: 4.0,
    }
}

impl Rules {
    pub fn for_variant(variant: Variant, width: f32, height: f32, starting_health: u32) -> Self {
        match variant {
            Variant::Classic => Rules {
                variant,
                width,
                height,
                starting_health,
                timing: Timing::DeltaScaled {
                    baseline_ms: 16.0,
                    max_delta_ms: 100.0,
                },
                spawn: SpawnPolicy::Adaptive {
                    base_ms: 3000.0,
                    floor_ms: 200.0,
                    step_ms: 100.0,
                    max_enemies: 20,
                    health: 6.0,
                    speed: 1.2,
                },
                cost: CostCurve::Flat {
                    cost: UPGRADE_THRESHOLD,
                },
                gate: GatePolicy::Auto,
                kill_value: KillValue::Decaying {
                    base: 3.0,
                    per_level: 0.02,
                    floor: 0.1,
                },
                hit_radius: HitRadius::EnemySize,
                movement: Movement::Direct { speed: 5.0 },
                particles: false,
                persistent: false,
                announce_rejections: true,
                offered: UpgradeKind::ALL.to_vec(),
            },
            Variant::Economy => Rules {
                variant,
                width,
                height,
                starting_health,
                timing: Timing::FixedStep {
                    step_ms: FIXED_STEP_MS,
                },
                spawn: SpawnPolicy::FrameCount {
                    frames: 100,
                    scaling: score_scaling(),
                },
                cost: CostCurve::Linear { base_cost: 20.0 },
                gate: GatePolicy::Manual,
                kill_value: KillValue::Flat(10.0),
                hit_radius: HitRadius::Fixed(20.0),
                movement: Movement::Direct { speed: 5.0 },
                particles: false,
                persistent: true,
                announce_rejections: false,
                offered: ECONOMY_OFFER.to_vec(),
            },
            Variant::Deluxe => Rules {
                variant,
                spawn: SpawnPolicy::FrameCount {
                    frames: 80,
                    scaling: score_scaling(),
                },
                movement: Movement::Momentum {
                    accel: 1.2,
                    friction: 0.85,
                    max_speed: 8.0,
                },
                particles: true,
                ..Rules::for_variant(Variant::Economy, width, height, starting_health)
            },
        }
    }

    pub fn classic() -> Self {
        Self::for_variant(Variant::Classic, DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_HEALTH)
    }

    pub fn economy() -> Self {
        Self::for_variant(Variant::Economy, DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_HEALTH)
    }

    pub fn deluxe() -> Self {
        Self::for_variant(Variant::Deluxe, DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_HEALTH)
    }

    pub fn offers(&self, kind: UpgradeKind) -> bool {
        self.offered.contains(&kind)
    }
}
