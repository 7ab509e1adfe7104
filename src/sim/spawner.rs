//! Enemy wave spawning and difficulty scaling

use glam::Vec2;
use rand::Rng;

use super::patterns::WeightedTable;
use super::state::{Enemy, EnemyKind, GameState};
use crate::consts::*;

/// Enemy mix before any boss has been cleared
pub const BASELINE_KINDS: WeightedTable<EnemyKind> = WeightedTable::new(&[
    (0.5, EnemyKind::Normal),
    (0.3, EnemyKind::Shooter),
    (0.2, EnemyKind::Fast),
]);

/// Enemy mix once the player has cleared a boss (hard mode)
pub const HARD_MODE_KINDS: WeightedTable<EnemyKind> = WeightedTable::new(&[
    (0.80, EnemyKind::Shooter),
    (0.05, EnemyKind::Fast),
    (0.15, EnemyKind::Normal),
]);

/// Number of enemies in a batch given the base roll (2-4)
///
/// The first encounter is halved (minimum 1); max power adds four more.
pub fn batch_size(base: u32, boss_clear_count: u32, power_level: u8) -> u32 {
    let mut count = base;
    if boss_clear_count == 0 {
        count = (count / 2).max(1);
    }
    if power_level >= MAX_POWER_LEVEL {
        count += 4;
    }
    count
}

/// Descent speed for a freshly spawned enemy
fn initial_speed(kind: EnemyKind, power_level: u8, hard_mode: bool) -> f32 {
    let mut speed = kind.base_speed();
    if kind == EnemyKind::Shooter {
        match power_level {
            3 => speed *= 0.8,
            2 => speed *= 0.4,
            _ => {}
        }
        if hard_mode {
            speed *= 0.8;
        }
    }
    speed
}

/// Spawn a batch if the spawn interval has elapsed. Returns how many spawned.
///
/// Never spawns while the boss phase is active.
pub fn spawn_tick(state: &mut GameState, now: f64, rng: &mut impl Rng) -> usize {
    if state.boss_phase || now - state.last_enemy_spawn <= ENEMY_SPAWN_INTERVAL_MS {
        return 0;
    }

    let base = rng.random_range(2..=4);
    let count = batch_size(base, state.boss_clear_count, state.power_level);
    let hard_mode = state.boss_clear_count > 0;
    let table = if hard_mode {
        &HARD_MODE_KINDS
    } else {
        &BASELINE_KINDS
    };
    // Hard mode enemies are ready to fire as soon as they enter range
    let first_shot = if hard_mode {
        now - ENEMY_SPAWN_INTERVAL_MS
    } else {
        now
    };

    let usable_width = FIELD_WIDTH - 2.0 * ENEMY_SPAWN_MARGIN;
    for i in 0..count {
        let kind = table.sample(rng);
        let x = rng.random::<f32>() * usable_width + ENEMY_SPAWN_MARGIN;
        let y = ENEMY_SPAWN_Y - i as f32 * ENEMY_SPAWN_STAGGER;
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos: Vec2::new(x, y),
            kind,
            speed: initial_speed(kind, state.power_level, hard_mode),
            last_shot: first_shot,
        });
    }
    state.last_enemy_spawn = now;

    log::debug!(
        "Spawned {} enemies (power {}, clears {})",
        count,
        state.power_level,
        state.boss_clear_count
    );
    count as usize
}
