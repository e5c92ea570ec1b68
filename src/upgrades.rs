/// The upgrade table: which upgrades exist, their levels, and the stats a
/// level translates into.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── Base stats (per level) ───────────────────────────────────────────────────

/// Milliseconds between volleys at fire-rate level 1.
pub const BASE_FIRE_INTERVAL_MS: f64 = 400.0;
pub const BASE_BULLET_SPEED: f32 = 10.0;
pub const BASE_DAMAGE: f32 = 1.0;
pub const BASE_RADIUS: f32 = 4.0;
/// Chance per hit, per bounce level, of spawning a bounce bullet.
pub const BOUNCE_CHANCE_PER_LEVEL: f64 = 0.1;
/// Fraction of the target angle applied per auto-aim level.
pub const AIM_STRENGTH_PER_LEVEL: f32 = 0.005;
/// Damage never drops below this, including halved bounce damage.
pub const MIN_DAMAGE: f32 = 0.1;
/// Highest level any upgrade can reach.
pub const MAX_LEVEL: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeKind {
    FireRate,
    BulletCount,
    Bounce,
    Damage,
    Speed,
    Radius,
    AutoAim,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 7] = [
        UpgradeKind::FireRate,
        UpgradeKind::BulletCount,
        UpgradeKind::Bounce,
        UpgradeKind::Damage,
        UpgradeKind::Speed,
        UpgradeKind::Radius,
        UpgradeKind::AutoAim,
    ];

    /// Identifier used in save files and log lines.
    pub fn id(self) -> &'static str {
        match self {
            UpgradeKind::FireRate => "fireRate",
            UpgradeKind::BulletCount => "bulletCount",
            UpgradeKind::Bounce => "bounce",
            UpgradeKind::Damage => "damage",
            UpgradeKind::Speed => "speed",
            UpgradeKind::Radius => "radius",
            UpgradeKind::AutoAim => "autoAim",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UpgradeKind::FireRate => "Fire rate",
            UpgradeKind::BulletCount => "Bullet count",
            UpgradeKind::Bounce => "Bounce shot",
            UpgradeKind::Damage => "Damage",
            UpgradeKind::Speed => "Bullet speed",
            UpgradeKind::Radius => "Hit radius",
            UpgradeKind::AutoAim => "Auto-aim",
        }
    }

    /// Toggle-style upgrades start switched off (level 0).
    pub fn starting_level(self) -> u32 {
        match self {
            UpgradeKind::Bounce | UpgradeKind::AutoAim => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Upgrade levels keyed by kind. Serializes as `{ "fireRate": 1, ... }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Upgrades {
    levels: BTreeMap<UpgradeKind, u32>,
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            levels: UpgradeKind::ALL
                .iter()
                .map(|&k| (k, k.starting_level()))
                .collect(),
        }
    }
}

impl Upgrades {
    /// Current level; kinds missing from a loaded save fall back to their
    /// starting level.
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        self.levels
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.starting_level())
    }

    pub fn set_level(&mut self, kind: UpgradeKind, level: u32) {
        self.levels
            .insert(kind, level.clamp(kind.starting_level(), MAX_LEVEL));
    }

    pub fn increment(&mut self, kind: UpgradeKind) {
        let next = (self.level(kind) + 1).min(MAX_LEVEL);
        self.levels.insert(kind, next);
    }

    pub fn is_maxed(&self, kind: UpgradeKind) -> bool {
        self.level(kind) >= MAX_LEVEL
    }

    /// Every level lies between its kind's starting level and [`MAX_LEVEL`].
    /// Only tables read from outside (save files) can break this.
    pub fn in_range(&self) -> bool {
        self.levels
            .iter()
            .all(|(&kind, &level)| (kind.starting_level()..=MAX_LEVEL).contains(&level))
    }

    /// Levels bought beyond the starting table; `0` for a fresh table.
    pub fn total_level(&self) -> u32 {
        UpgradeKind::ALL
            .iter()
            .map(|&k| self.level(k).saturating_sub(k.starting_level()))
            .sum()
    }

    // ── Derived stats ────────────────────────────────────────────────────────

    pub fn fire_interval_ms(&self) -> f64 {
        BASE_FIRE_INTERVAL_MS / f64::from(self.level(UpgradeKind::FireRate).max(1))
    }

    pub fn bullet_count(&self) -> u32 {
        self.level(UpgradeKind::BulletCount).max(1)
    }

    pub fn bullet_speed(&self) -> f32 {
        BASE_BULLET_SPEED * self.level(UpgradeKind::Speed) as f32
    }

    pub fn damage(&self) -> f32 {
        (BASE_DAMAGE * self.level(UpgradeKind::Damage) as f32).max(MIN_DAMAGE)
    }

    pub fn radius(&self) -> f32 {
        BASE_RADIUS * self.level(UpgradeKind::Radius) as f32
    }

    pub fn bounce_chance(&self) -> f64 {
        BOUNCE_CHANCE_PER_LEVEL * f64::from(self.level(UpgradeKind::Bounce))
    }

    pub fn aim_strength(&self) -> f32 {
        AIM_STRENGTH_PER_LEVEL * self.level(UpgradeKind::AutoAim) as f32
    }
}
