//! Bullet pattern generation
//!
//! Enemies pick a pattern from a weighted table once per volley; the boss
//! cycles through a fixed attack per phase.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind};
use crate::consts::ENEMY_BASE_BULLET_SPEED;
use crate::heading;

/// A list of `(weight, variant)` pairs sampled with a single uniform roll
#[derive(Debug, Clone, Copy)]
pub struct WeightedTable<T: 'static> {
    entries: &'static [(f32, T)],
}

impl<T: Copy> WeightedTable<T> {
    pub const fn new(entries: &'static [(f32, T)]) -> Self {
        assert!(!entries.is_empty(), "weighted table needs at least one entry");
        Self { entries }
    }

    /// Map a roll in [0, 1) onto the table. Weights need not sum to 1.
    pub fn pick(&self, roll: f32) -> T {
        let total: f32 = self.entries.iter().map(|(w, _)| *w).sum();
        let target = roll.clamp(0.0, 1.0) * total;
        let mut cumulative = 0.0;
        for &(weight, variant) in self.entries {
            cumulative += weight;
            if target < cumulative {
                return variant;
            }
        }
        self.entries[self.entries.len() - 1].1
    }

    pub fn sample(&self, rng: &mut impl Rng) -> T {
        self.pick(rng.random())
    }
}

/// Shapes an ordinary enemy can fire
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyPattern {
    /// One bullet straight down
    Straight,
    /// Downward bullets fanned by the given angle offsets (radians)
    Spread(&'static [f32]),
    /// One bullet at the player
    Aimed,
    /// Evenly spaced ring of bullets
    Circle(u32),
}

/// Shooters mix aimed shots, spreads and rings
pub const SHOOTER_PATTERNS: WeightedTable<EnemyPattern> = WeightedTable::new(&[
    (0.40, EnemyPattern::Aimed),
    (0.30, EnemyPattern::Spread(&[-0.3, 0.3])),
    (0.15, EnemyPattern::Spread(&[-0.4, 0.0, 0.4])),
    (0.15, EnemyPattern::Circle(8)),
]);

/// Normal and fast enemies only shoot straight or spread
pub const BASIC_PATTERNS: WeightedTable<EnemyPattern> = WeightedTable::new(&[
    (0.5, EnemyPattern::Straight),
    (0.3, EnemyPattern::Spread(&[-0.2, 0.2])),
    (0.2, EnemyPattern::Spread(&[-0.3, 0.0, 0.3])),
]);

pub fn pattern_table(kind: EnemyKind) -> &'static WeightedTable<EnemyPattern> {
    match kind {
        EnemyKind::Shooter => &SHOOTER_PATTERNS,
        EnemyKind::Normal | EnemyKind::Fast => &BASIC_PATTERNS,
    }
}

/// Bullet speed for an enemy volley. Slower until the first boss falls.
pub fn enemy_bullet_speed(kind: EnemyKind, boss_clear_count: u32) -> f32 {
    let difficulty = if boss_clear_count == 0 { 0.6 } else { 1.2 };
    let base = ENEMY_BASE_BULLET_SPEED * difficulty;
    match kind {
        EnemyKind::Fast => base * 1.2,
        EnemyKind::Normal | EnemyKind::Shooter => base,
    }
}

impl EnemyPattern {
    /// Velocities for one volley fired from `origin`
    pub fn velocities(self, origin: Vec2, target: Vec2, speed: f32) -> Vec<Vec2> {
        match self {
            EnemyPattern::Straight => vec![Vec2::new(0.0, speed)],
            EnemyPattern::Spread(offsets) => offsets
                .iter()
                .map(|offset| Vec2::new(offset.sin() * speed, speed))
                .collect(),
            EnemyPattern::Aimed => {
                let to_target = target - origin;
                vec![heading(to_target.y.atan2(to_target.x), speed)]
            }
            EnemyPattern::Circle(count) => (0..count)
                .map(|i| heading(i as f32 * TAU / count as f32, speed))
                .collect(),
        }
    }
}

/// Choose a pattern with `roll` and produce the enemy's volley toward `target`
pub fn enemy_volley(enemy: &Enemy, target: Vec2, boss_clear_count: u32, roll: f32) -> Vec<Vec2> {
    let pattern = pattern_table(enemy.kind).pick(roll);
    let speed = enemy_bullet_speed(enemy.kind, boss_clear_count);
    pattern.velocities(enemy.pos, target, speed)
}

/// Timing of a boss attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackCadence {
    /// Volleys per set
    pub shots: u32,
    /// Sets before the boss moves to its next phase
    pub sets: u32,
    /// Minimum gap between volleys
    pub interval_ms: f64,
    /// Pause after a completed set
    pub set_interval_ms: f64,
}

/// Boss attacks, selected by `phase mod 3`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossAttack {
    AimedBurst,
    SpreadShot,
    CircleShot,
}

impl BossAttack {
    pub fn from_phase(phase: u8) -> Self {
        match phase % 3 {
            0 => BossAttack::AimedBurst,
            1 => BossAttack::SpreadShot,
            _ => BossAttack::CircleShot,
        }
    }

    pub fn cadence(self) -> AttackCadence {
        match self {
            BossAttack::AimedBurst => AttackCadence {
                shots: 20,
                sets: 3,
                interval_ms: 50.0,
                set_interval_ms: 1000.0,
            },
            BossAttack::SpreadShot => AttackCadence {
                shots: 4,
                sets: 3,
                interval_ms: 650.0,
                set_interval_ms: 1000.0,
            },
            BossAttack::CircleShot => AttackCadence {
                shots: 16,
                sets: 2,
                interval_ms: 300.0,
                set_interval_ms: 2000.0,
            },
        }
    }

    /// Velocities for one volley. The spread widens after the first clear.
    pub fn volley(self, origin: Vec2, target: Vec2, boss_clear_count: u32) -> Vec<Vec2> {
        match self {
            BossAttack::AimedBurst => EnemyPattern::Aimed.velocities(origin, target, 6.0),
            BossAttack::SpreadShot => {
                let count: u32 = if boss_clear_count > 0 { 8 } else { 6 };
                let start = FRAC_PI_2 - FRAC_PI_4 / 2.0;
                (0..count)
                    .map(|i| {
                        let angle = start + FRAC_PI_4 * i as f32 / (count - 1) as f32;
                        heading(angle, 3.0)
                    })
                    .collect()
            }
            BossAttack::CircleShot => EnemyPattern::Circle(16).velocities(origin, target, 4.0),
        }
    }
}
