//! Game state and core simulation types
//!
//! Entities are plain records; behaviour lives in the sibling systems.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Shooter,
    Fast,
}

impl EnemyKind {
    /// Descent speed (units per 16ms frame)
    pub fn base_speed(self) -> f32 {
        match self {
            EnemyKind::Normal => 4.0,
            EnemyKind::Shooter => 1.5,
            EnemyKind::Fast => 4.2,
        }
    }

    /// Distance under which a player bullet counts as a hit
    pub fn hit_radius(self) -> f32 {
        match self {
            EnemyKind::Shooter => 30.0,
            EnemyKind::Normal | EnemyKind::Fast => 20.0,
        }
    }

    pub fn kill_score(self) -> u64 {
        match self {
            EnemyKind::Shooter => 200,
            EnemyKind::Normal | EnemyKind::Fast => 100,
        }
    }

    /// Minimum time between volleys
    pub fn fire_interval_ms(self) -> f64 {
        match self {
            EnemyKind::Shooter => 800.0,
            EnemyKind::Fast => 1200.0,
            EnemyKind::Normal => 1000.0,
        }
    }

    /// Explosion size when destroyed (bigger ships, bigger blast)
    pub fn explosion_size(self) -> f32 {
        match self {
            EnemyKind::Shooter => 2.0,
            EnemyKind::Normal | EnemyKind::Fast => 1.0,
        }
    }
}

/// An ordinary enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub speed: f32,
    /// Timestamp (ms) of the last volley
    pub last_shot: f64,
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Velocity per 16ms frame
    pub vel: Vec2,
    pub owner: BulletOwner,
}

impl Bullet {
    /// True while the bullet is inside the field plus the bullet margin
    pub fn in_bounds(&self) -> bool {
        self.pos.x > -BULLET_MARGIN
            && self.pos.x < FIELD_WIDTH + BULLET_MARGIN
            && self.pos.y > -BULLET_MARGIN
            && self.pos.y < FIELD_HEIGHT + BULLET_MARGIN
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Widens the player's fan by one bullet
    MultiShot,
}

/// A falling power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub speed: f32,
    pub kind: PowerUpKind,
}

/// Visual blast. Decays once `duration_ms` has elapsed; never affects play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub duration_ms: f64,
    pub started_at: f64,
}

impl Explosion {
    /// Fraction of the lifetime elapsed at `now` (0-1)
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now - self.started_at >= self.duration_ms
    }
}

/// Background parallax star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub brightness: f32,
}

impl Star {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * FIELD_WIDTH,
                rng.random::<f32>() * FIELD_HEIGHT,
            ),
            size: rng.random::<f32>() * 1.2 + 0.2,
            speed: rng.random::<f32>() * 1.5 + 0.5,
            brightness: rng.random::<f32>() * 0.5 + 0.5,
        }
    }
}

/// Boss lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossState {
    /// Sliding in from above the field
    Appearing,
    /// Swaying and attacking; takes damage
    Fighting,
    /// Death sequence; removed when progress reaches 1
    Dying,
}

/// The boss. At most one exists, and only while the boss phase is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub pos: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    /// Attack phase (0-2, cyclic)
    pub phase: u8,
    pub last_shot: f64,
    /// Volleys fired in the current set
    pub shot_count: u32,
    /// Sets completed in the current phase
    pub set_count: u32,
    pub state: BossState,
    /// Entry progress while appearing, death progress while dying (0-1)
    pub progress: f32,
}

impl Boss {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            pos: Vec2::new(FIELD_WIDTH / 2.0, BOSS_SPAWN_Y),
            hp: BOSS_MAX_HP,
            max_hp: BOSS_MAX_HP,
            phase: 0,
            last_shot: 0.0,
            shot_count: 0,
            set_count: 0,
            state: BossState::Appearing,
            progress: 0.0,
        }
    }

    /// Remaining health as a fraction (for HP bars)
    pub fn hp_ratio(&self) -> f32 {
        (self.hp.max(0) as f32) / (self.max_hp as f32)
    }
}

/// Per-session counters reported with the final score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayStats {
    pub shots_fired: u32,
    pub enemies_destroyed: u32,
    pub powerups_collected: u32,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyDestroyed { kind: EnemyKind, score: u64 },
    PowerUpCollected { power_level: u8 },
    BossAppeared { boss_id: u32 },
    BossDying { boss_id: u32 },
    BossDefeated { boss_clear_count: u32 },
    PlayerDestroyed,
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Player lateral position
    pub player_x: f32,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    pub explosions: Vec<Explosion>,
    pub stars: Vec<Star>,
    pub score: u64,
    /// Shot/power level (1-3)
    pub power_level: u8,
    /// Bosses defeated this session; only ever increases
    pub boss_clear_count: u32,
    pub boss: Option<Boss>,
    pub boss_phase: bool,
    /// Score recorded at the last boss entry / defeat
    pub last_boss_score: u64,
    pub last_enemy_spawn: f64,
    pub last_shot: f64,
    /// Firing intent as of the last tick
    pub firing: bool,
    pub stats: PlayStats,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh state with a randomised starfield
    pub fn new(rng: &mut impl Rng) -> Self {
        let stars = (0..STAR_COUNT).map(|_| Star::random(rng)).collect();
        Self {
            player_x: PLAYER_START_X,
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            explosions: Vec::new(),
            stars,
            score: 0,
            power_level: MIN_POWER_LEVEL,
            boss_clear_count: 0,
            boss: None,
            boss_phase: false,
            last_boss_score: 0,
            last_enemy_spawn: 0.0,
            last_shot: 0.0,
            firing: false,
            stats: PlayStats::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Player ship position
    pub fn player_pos(&self) -> Vec2 {
        crate::player_position(self.player_x)
    }

    /// Push enemy-owned bullets leaving `origin` with the given velocities
    pub fn spawn_enemy_bullets(&mut self, origin: Vec2, velocities: &[Vec2]) {
        for &vel in velocities {
            let id = self.next_entity_id();
            self.enemy_bullets.push(Bullet {
                id,
                pos: origin,
                vel,
                owner: BulletOwner::Enemy,
            });
        }
    }

    /// Start a blast at `pos`
    pub fn spawn_explosion(&mut self, pos: Vec2, size: f32, duration_ms: f64, now: f64) {
        let id = self.next_entity_id();
        self.explosions.push(Explosion {
            id,
            pos,
            size,
            duration_ms,
            started_at: now,
        });
    }

    /// Add to the score. Score only ever grows.
    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.player_bullets.sort_by_key(|b| b.id);
        self.enemy_bullets.sort_by_key(|b| b.id);
        self.enemies.sort_by_key(|e| e.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}
