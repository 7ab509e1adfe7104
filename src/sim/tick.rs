//! Per-frame simulation tick
//!
//! Order within a tick: input, boss entry, spawning or boss update, movement,
//! collisions, bounds purge. Speeds are per 16ms frame and scale with the
//! frame's elapsed time.

use glam::Vec2;
use rand::Rng;

use super::boss::{enter_boss_phase_if_due, update_boss};
use super::collision::{CollisionReport, resolve_collisions};
use super::patterns::enemy_volley;
use super::spawner::spawn_tick;
use super::state::{Bullet, BulletOwner, GameEvent, GameState};
use crate::clamp_player_x;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Target lateral position (from pointer/touch/keys)
    pub target_x: Option<f32>,
    /// Fire button held
    pub firing: bool,
    /// Single shot (click/tap), fired regardless of the held-fire cadence
    pub shoot: bool,
    /// Demo mode - the autopilot steers and fires
    pub autopilot: bool,
}

/// Timing for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    /// Frame timestamp (ms)
    pub now: f64,
    /// Time since the previous tick (ms); 0 on the first tick
    pub delta: f64,
}

impl FrameClock {
    pub fn new(now: f64, delta: f64) -> Self {
        Self {
            now,
            delta: delta.max(0.0),
        }
    }

    /// Multiplier applied to per-frame speeds
    pub fn scale(&self) -> f32 {
        (self.delta / BASE_FRAME_MS) as f32
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
    pub collisions: CollisionReport,
}

impl TickOutcome {
    pub fn player_destroyed(&self) -> bool {
        self.collisions.player_destroyed
    }
}

/// Advance the game state by one frame
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    clock: FrameClock,
    rng: &mut impl Rng,
) -> TickOutcome {
    let mut events = Vec::new();

    let input = if input.autopilot {
        autopilot(state, input)
    } else {
        input.clone()
    };

    if let Some(x) = input.target_x.and_then(clamp_player_x) {
        state.player_x = x;
    }
    state.firing = input.firing;

    if let Some(boss_id) = enter_boss_phase_if_due(state) {
        events.push(GameEvent::BossAppeared { boss_id });
    }

    update_stars(state, clock.scale(), rng);
    fire_player(state, &input, clock.now);

    enforce_boss_exclusivity(state);
    if state.boss_phase {
        update_boss(state, &clock, rng, &mut events);
    } else {
        spawn_tick(state, clock.now, rng);
    }

    integrate(state, &clock, rng);
    let collisions = resolve_collisions(state, clock.now, rng, &mut events);
    purge_out_of_bounds(state);
    state.explosions.retain(|explosion| !explosion.is_expired(clock.now));

    // Ensure deterministic ordering
    state.normalize_order();

    TickOutcome { events, collisions }
}

/// No ordinary enemy may coexist with the boss
fn enforce_boss_exclusivity(state: &mut GameState) {
    if state.boss_phase && state.boss.is_none() {
        log::warn!("Boss phase active without a boss, leaving boss phase");
        state.boss_phase = false;
    }
    if state.boss.is_none() {
        return;
    }
    debug_assert!(
        state.enemies.is_empty(),
        "enemies present while the boss is active"
    );
    if !state.enemies.is_empty() {
        log::warn!(
            "Clearing {} enemies present during boss phase",
            state.enemies.len()
        );
        state.enemies.clear();
    }
}

/// Click shots fire immediately; held fire follows the cadence
fn fire_player(state: &mut GameState, input: &TickInput, now: f64) {
    if input.shoot {
        fire_volley(state);
    }
    if state.firing && now - state.last_shot > PLAYER_FIRE_INTERVAL_MS {
        fire_volley(state);
        state.last_shot = now;
    }
}

/// Fan of `power_level` bullets, one fan step apart, centred straight up
fn fire_volley(state: &mut GameState) {
    state.stats.shots_fired += 1;
    let origin = state.player_pos();
    let level = state.power_level;
    let centre = (level as f32 - 1.0) / 2.0;
    for i in 0..level {
        let angle = (i as f32 - centre) * PLAYER_FAN_STEP;
        let id = state.next_entity_id();
        state.player_bullets.push(Bullet {
            id,
            pos: origin,
            vel: Vec2::new(angle.sin(), -angle.cos()) * PLAYER_BULLET_SPEED,
            owner: BulletOwner::Player,
        });
    }
}

fn update_stars(state: &mut GameState, scale: f32, rng: &mut impl Rng) {
    for star in &mut state.stars {
        star.pos.y += star.speed * scale;
        if star.pos.y > FIELD_HEIGHT {
            star.pos.y = STAR_RESPAWN_Y;
            star.pos.x = rng.random::<f32>() * FIELD_WIDTH;
        }
    }
}

/// Move everything. Enemies fire from where they stand, then descend.
fn integrate(state: &mut GameState, clock: &FrameClock, rng: &mut impl Rng) {
    let scale = clock.scale();

    for bullet in state
        .player_bullets
        .iter_mut()
        .chain(state.enemy_bullets.iter_mut())
    {
        bullet.pos += bullet.vel * scale;
    }

    for power_up in &mut state.power_ups {
        power_up.pos.y += power_up.speed * scale;
    }

    let target = state.player_pos();
    let boss_clear_count = state.boss_clear_count;
    let mut volleys = Vec::new();
    for enemy in &mut state.enemies {
        let ready = clock.now - enemy.last_shot > enemy.kind.fire_interval_ms();
        if enemy.pos.y < ENEMY_FIRE_CEILING_Y && ready {
            volleys.push((enemy.pos, enemy_volley(enemy, target, boss_clear_count, rng.random())));
            enemy.last_shot = clock.now;
        }
        enemy.pos.y += enemy.speed * scale;
    }
    for (origin, velocities) in volleys {
        state.spawn_enemy_bullets(origin, &velocities);
    }
}

fn purge_out_of_bounds(state: &mut GameState) {
    state.player_bullets.retain(Bullet::in_bounds);
    state.enemy_bullets.retain(Bullet::in_bounds);
    state
        .power_ups
        .retain(|power_up| power_up.pos.y < FIELD_HEIGHT + BULLET_MARGIN);
    state.enemies.retain(|enemy| enemy.pos.y < ENEMY_EXIT_Y);
}

/// Demo pilot: sidestep the closest incoming bullet, otherwise drift under
/// the boss or the lowest enemy. Always holds fire.
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = input.clone();
    input.firing = true;
    let player = state.player_pos();

    let threat = state
        .enemy_bullets
        .iter()
        .filter(|bullet| bullet.vel.y > 0.0 && bullet.pos.y < player.y)
        .filter(|bullet| player.y - bullet.pos.y < 120.0 && (bullet.pos.x - player.x).abs() < 30.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    if let Some(bullet) = threat {
        let away = if bullet.pos.x > player.x { -1.0 } else { 1.0 };
        let mut target = player.x + away * 40.0;
        // Pinned against a wall: cut back across instead
        if target <= PLAYER_MIN_X || target >= PLAYER_MAX_X {
            target = player.x - away * 40.0;
        }
        input.target_x = Some(target);
        return input;
    }

    let aim = state.boss.as_ref().map(|boss| boss.pos.x).or_else(|| {
        state
            .enemies
            .iter()
            .filter(|enemy| enemy.pos.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|enemy| enemy.pos.x)
    });
    if let Some(x) = aim {
        input.target_x = Some(player.x + (x - player.x).clamp(-6.0, 6.0));
    }
    input
}
