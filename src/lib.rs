//! Barrage - A vertical arcade shooter simulation
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, bullet patterns, boss, collisions)
//! - `scheduler`: Frame pacing while a session is playing
//! - `session`: Lifecycle state machine (start, playing, game over, ranking)
//! - `input`: Pointer/touch/keyboard translation into tick input
//! - `play_limit`: Daily play-limit gate consumed at session start
//! - `submission`: Signed score submission produced at game over
//! - `rankings`: Local leaderboard
//! - `settings`: Player identity and session configuration

pub mod error;
pub mod input;
pub mod play_limit;
pub mod rankings;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sim;
pub mod submission;

pub use error::{BarrageError, Result};
pub use rankings::{Rankings, ScoreTier};
pub use session::{Lifecycle, Session};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 360.0;
    pub const FIELD_HEIGHT: f32 = 520.0;

    /// Reference frame length; per-frame speeds are expressed against it
    pub const BASE_FRAME_MS: f64 = 16.0;

    /// Player ship
    pub const PLAYER_Y: f32 = FIELD_HEIGHT - 120.0;
    pub const PLAYER_START_X: f32 = 160.0;
    pub const PLAYER_MIN_X: f32 = 20.0;
    pub const PLAYER_MAX_X: f32 = FIELD_WIDTH - 20.0;
    /// Held-fire cadence
    pub const PLAYER_FIRE_INTERVAL_MS: f64 = 150.0;
    pub const PLAYER_BULLET_SPEED: f32 = 8.0;
    /// Angle between neighbouring bullets of the player's fan
    pub const PLAYER_FAN_STEP: f32 = std::f32::consts::FRAC_PI_8;
    pub const MIN_POWER_LEVEL: u8 = 1;
    pub const MAX_POWER_LEVEL: u8 = 3;

    /// Enemy waves
    pub const ENEMY_SPAWN_INTERVAL_MS: f64 = 800.0;
    /// Enemies only fire while above this line (60% of the field)
    pub const ENEMY_FIRE_CEILING_Y: f32 = FIELD_HEIGHT * 0.6;
    pub const ENEMY_SPAWN_MARGIN: f32 = 20.0;
    pub const ENEMY_SPAWN_Y: f32 = -20.0;
    pub const ENEMY_SPAWN_STAGGER: f32 = 30.0;
    pub const ENEMY_BASE_BULLET_SPEED: f32 = 4.0;

    /// Power-ups
    pub const POWERUP_DROP_CHANCE: f32 = 0.1;
    pub const POWERUP_SPEED: f32 = 2.0;
    pub const POWERUP_SCORE: u64 = 500;

    /// Collision radii (Euclidean distance, strict less-than)
    pub const PLAYER_HIT_RADIUS: f32 = 10.0;
    pub const POWERUP_PICKUP_RADIUS: f32 = 30.0;
    pub const BOSS_HIT_RADIUS: f32 = 40.0;

    /// Boss encounter
    pub const BOSS_TRIGGER_SCORE: u64 = 5000;
    pub const BOSS_BONUS_SCORE: u64 = 30_000;
    pub const BOSS_MAX_HP: i32 = 1000;
    pub const BOSS_HIT_DAMAGE: i32 = 10;
    pub const BOSS_SPAWN_Y: f32 = -50.0;
    /// Distance travelled while appearing (rests at y = 100)
    pub const BOSS_ENTRY_TRAVEL: f32 = 150.0;
    pub const BOSS_SWAY: f32 = 100.0;
    pub const BOSS_APPEAR_MS: f64 = 2000.0;
    pub const BOSS_DEATH_MS: f64 = 1500.0;
    pub const BOSS_DEATH_EXPLOSION_CHANCE: f32 = 0.3;

    /// Out-of-bounds margins
    pub const BULLET_MARGIN: f32 = 10.0;
    pub const ENEMY_EXIT_Y: f32 = FIELD_HEIGHT - 20.0;

    /// Background
    pub const STAR_COUNT: usize = 25;
    pub const STAR_RESPAWN_Y: f32 = -10.0;
}

/// Clamp a lateral position to the player's allowed range.
/// Non-finite positions are rejected.
#[inline]
pub fn clamp_player_x(x: f32) -> Option<f32> {
    x.is_finite()
        .then(|| x.clamp(consts::PLAYER_MIN_X, consts::PLAYER_MAX_X))
}

/// The player's ship position for a given lateral coordinate
#[inline]
pub fn player_position(x: f32) -> Vec2 {
    Vec2::new(x, consts::PLAYER_Y)
}

/// Velocity of magnitude `speed` pointing along `angle` (radians, y down)
#[inline]
pub fn heading(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * speed
}
