//! Collision detection and response
//!
//! Every test is a Euclidean distance check against a fixed radius (strict
//! less-than). Consumed entities are removed before the pass returns so the
//! next tick never resolves them twice.

use glam::Vec2;
use rand::Rng;

use super::state::{BossState, GameEvent, GameState, PowerUp, PowerUpKind};
use crate::consts::*;

/// True if `a` and `b` are closer than `radius`
#[inline]
pub fn within(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Summary of one collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub enemies_destroyed: u32,
    pub boss_hits: u32,
    pub powerups_collected: u32,
    pub player_destroyed: bool,
}

/// Run every collision test for this tick
pub fn resolve_collisions(
    state: &mut GameState,
    now: f64,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    player_bullets_vs_enemies(state, now, rng, events, &mut report);
    player_bullets_vs_boss(state, now, events, &mut report);
    power_ups_vs_player(state, events, &mut report);
    report.player_destroyed = enemy_bullets_vs_player(state, now, events);
    report
}

/// Each bullet destroys at most one enemy; each enemy absorbs at most one bullet
fn player_bullets_vs_enemies(
    state: &mut GameState,
    now: f64,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
    report: &mut CollisionReport,
) {
    let mut enemy_hit = vec![false; state.enemies.len()];
    let mut bullet_spent = vec![false; state.player_bullets.len()];

    for (bullet_idx, bullet) in state.player_bullets.iter().enumerate() {
        let target = state.enemies.iter().enumerate().position(|(enemy_idx, enemy)| {
            !enemy_hit[enemy_idx] && within(bullet.pos, enemy.pos, enemy.kind.hit_radius())
        });
        if let Some(enemy_idx) = target {
            enemy_hit[enemy_idx] = true;
            bullet_spent[bullet_idx] = true;
        }
    }

    let destroyed: Vec<_> = state
        .enemies
        .iter()
        .zip(&enemy_hit)
        .filter(|(_, hit)| **hit)
        .map(|(enemy, _)| (enemy.kind, enemy.pos))
        .collect();
    if destroyed.is_empty() {
        return;
    }

    let mut idx = 0;
    state.player_bullets.retain(|_| {
        let keep = !bullet_spent[idx];
        idx += 1;
        keep
    });
    let mut idx = 0;
    state.enemies.retain(|_| {
        let keep = !enemy_hit[idx];
        idx += 1;
        keep
    });

    for (kind, pos) in destroyed {
        let points = kind.kill_score();
        state.award(points);
        state.spawn_explosion(pos, kind.explosion_size(), 500.0, now);

        if rng.random::<f32>() < POWERUP_DROP_CHANCE {
            let id = state.next_entity_id();
            state.power_ups.push(PowerUp {
                id,
                pos,
                speed: POWERUP_SPEED,
                kind: PowerUpKind::MultiShot,
            });
        }

        state.stats.enemies_destroyed += 1;
        report.enemies_destroyed += 1;
        events.push(GameEvent::EnemyDestroyed {
            kind,
            score: points,
        });
    }
}

/// Only a fighting boss takes damage; the lethal hit stops further hits
fn player_bullets_vs_boss(
    state: &mut GameState,
    now: f64,
    events: &mut Vec<GameEvent>,
    report: &mut CollisionReport,
) {
    let Some(boss) = state
        .boss
        .as_mut()
        .filter(|boss| boss.state == BossState::Fighting)
    else {
        return;
    };

    let mut impacts = Vec::new();
    let mut killed = false;
    state.player_bullets.retain(|bullet| {
        if killed || !within(bullet.pos, boss.pos, BOSS_HIT_RADIUS) {
            return true;
        }
        killed = boss.take_hit();
        impacts.push(bullet.pos);
        false
    });
    let boss_id = boss.id;

    for pos in &impacts {
        state.spawn_explosion(*pos, 0.5, 200.0, now);
    }
    report.boss_hits += impacts.len() as u32;

    if killed {
        log::info!("Boss {} destroyed, starting death sequence", boss_id);
        events.push(GameEvent::BossDying { boss_id });
    }
}

fn power_ups_vs_player(
    state: &mut GameState,
    events: &mut Vec<GameEvent>,
    report: &mut CollisionReport,
) {
    let player = state.player_pos();
    let before = state.power_ups.len();
    state
        .power_ups
        .retain(|power_up| !within(power_up.pos, player, POWERUP_PICKUP_RADIUS));
    let collected = before - state.power_ups.len();

    for _ in 0..collected {
        state.power_level = (state.power_level + 1).min(MAX_POWER_LEVEL);
        state.award(POWERUP_SCORE);
        state.stats.powerups_collected += 1;
        report.powerups_collected += 1;
        events.push(GameEvent::PowerUpCollected {
            power_level: state.power_level,
        });
    }
}

/// First hit is lethal
fn enemy_bullets_vs_player(state: &mut GameState, now: f64, events: &mut Vec<GameEvent>) -> bool {
    let player = state.player_pos();
    let hit = state
        .enemy_bullets
        .iter()
        .any(|bullet| within(bullet.pos, player, PLAYER_HIT_RADIUS));
    if hit {
        state.spawn_explosion(player, 2.0, 1000.0, now);
        events.push(GameEvent::PlayerDestroyed);
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FixedRng;
    use crate::sim::state::{Boss, Bullet, BulletOwner, Enemy, EnemyKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fresh() -> (GameState, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(9);
        let state = GameState::new(&mut rng);
        (state, rng)
    }

    fn add_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) {
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos,
            kind,
            speed: kind.base_speed(),
            last_shot: 0.0,
        });
    }

    fn add_player_bullet(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.player_bullets.push(Bullet {
            id,
            pos,
            vel: Vec2::new(0.0, -PLAYER_BULLET_SPEED),
            owner: BulletOwner::Player,
        });
    }

    #[test]
    fn test_within_is_strict() {
        assert!(within(Vec2::ZERO, Vec2::new(9.99, 0.0), 10.0));
        assert!(!within(Vec2::ZERO, Vec2::new(10.0, 0.0), 10.0));
        assert!(within(Vec2::ZERO, Vec2::new(6.0, 6.0), 10.0));
        assert!(!within(Vec2::ZERO, Vec2::new(8.0, 8.0), 10.0));
    }

    #[test]
    fn test_bullet_kills_shooter() {
        let (mut state, mut rng) = fresh();
        add_enemy(&mut state, EnemyKind::Shooter, Vec2::new(100.0, 100.0));
        add_player_bullet(&mut state, Vec2::new(100.0, 115.0));
        let mut events = Vec::new();

        let report = resolve_collisions(&mut state, 1000.0, &mut rng, &mut events);

        assert!(state.enemies.is_empty());
        assert!(state.player_bullets.is_empty());
        assert_eq!(state.score, 200);
        assert_eq!(state.stats.enemies_destroyed, 1);
        assert_eq!(report.enemies_destroyed, 1);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].size, 2.0);
    }

    #[test]
    fn test_hit_radius_depends_on_kind() {
        let (mut state, mut rng) = fresh();
        add_enemy(&mut state, EnemyKind::Normal, Vec2::new(100.0, 100.0));
        add_player_bullet(&mut state, Vec2::new(100.0, 125.0));
        let mut events = Vec::new();

        resolve_collisions(&mut state, 1000.0, &mut rng, &mut events);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.player_bullets.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_low_roll_drops_power_up() {
        let (mut state, _) = fresh();
        add_enemy(&mut state, EnemyKind::Normal, Vec2::new(120.0, 80.0));
        add_player_bullet(&mut state, Vec2::new(120.0, 85.0));
        let mut events = Vec::new();

        resolve_collisions(&mut state, 1000.0, &mut FixedRng(0), &mut events);

        assert_eq!(state.power_ups.len(), 1);
        let power_up = &state.power_ups[0];
        assert_eq!(power_up.kind, PowerUpKind::MultiShot);
        assert_eq!(power_up.speed, POWERUP_SPEED);
        assert_eq!(power_up.pos, Vec2::new(120.0, 80.0));
    }

    #[test]
    fn test_high_roll_drops_nothing() {
        let (mut state, _) = fresh();
        add_enemy(&mut state, EnemyKind::Normal, Vec2::new(120.0, 80.0));
        add_player_bullet(&mut state, Vec2::new(120.0, 85.0));
        let mut events = Vec::new();

        resolve_collisions(&mut state, 1000.0, &mut FixedRng(u32::MAX), &mut events);

        assert!(state.enemies.is_empty());
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_drop_rate_near_ten_percent() {
        let (mut state, mut rng) = fresh();
        let mut drops = 0;
        for _ in 0..1000 {
            add_enemy(&mut state, EnemyKind::Normal, Vec2::new(100.0, 100.0));
            add_player_bullet(&mut state, Vec2::new(100.0, 100.0));
            let mut events = Vec::new();
            resolve_collisions(&mut state, 1000.0, &mut rng, &mut events);
            drops += state.power_ups.len();
            state.power_ups.clear();
        }
        assert!((50..=150).contains(&drops), "drops: {}", drops);
    }

    #[test]
    fn test_one_bullet_one_enemy() {
        let (mut state, mut rng) = fresh();
        add_enemy(&mut state, EnemyKind::Normal, Vec2::new(100.0, 100.0));
        add_enemy(&mut state, EnemyKind::Normal, Vec2::new(105.0, 100.0));
        add_player_bullet(&mut state, Vec2::new(102.0, 100.0));
        add_player_bullet(&mut state, Vec2::new(102.0, 101.0));
        add_player_bullet(&mut state, Vec2::new(102.0, 102.0));
        let mut events = Vec::new();

        let report = resolve_collisions(&mut state, 1000.0, &mut rng, &mut events);

        assert_eq!(report.enemies_destroyed, 2);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player_bullets.len(), 1);
        assert_eq!(state.score, 200);
    }

    #[test]
    fn test_boss_hit_damages_and_consumes() {
        let (mut state, mut rng) = fresh();
        let mut boss = Boss::new(99);
        boss.state = BossState::Fighting;
        boss.pos = Vec2::new(180.0, 100.0);
        state.boss = Some(boss);
        state.boss_phase = true;
        add_player_bullet(&mut state, Vec2::new(180.0, 130.0));
        add_player_bullet(&mut state, Vec2::new(180.0, 140.0));
        let mut events = Vec::new();

        let report = resolve_collisions(&mut state, 1000.0, &mut rng, &mut events);

        assert_eq!(report.boss_hits, 1);
        assert_eq!(state.boss.as_ref().unwrap().hp, BOSS_MAX_HP - BOSS_HIT_DAMAGE);
        assert_eq!(state.player_bullets.len(), 1);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].size, 0.5);
        // Boss hits never score
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_final_boss_hit_starts_dying() {
        let (mut state, mut rng) = fresh();
        let mut boss = Boss::new(99);
        boss.state = BossState::Fighting;
        boss.pos = Vec2::new(180.0, 100.0);
        boss.hp = 10;
        state.boss = Some(boss);
        add_player_bullet(&mut state, Vec2::new(190.0, 110.0));
        add_player_bullet(&mut state, Vec2::new(185.0, 105.0));
        let mut events = Vec::new();

        resolve_collisions(&mut state, 1000.0, &mut rng, &mut events);

        let boss = state.boss.as_ref().unwrap();
        assert!(boss.hp <= 0);
        assert_eq!(boss.state, BossState::Dying);
        assert_eq!(state.player_bullets.len(), 1);
        assert!(events.contains(&GameEvent::BossDying { boss_id: 99 }));
    }

    #[test]
    fn test_appearing_boss_ignores_bullets() {
        let (mut state, mut rng) = fresh();
        let mut boss = Boss::new(99);
        boss.pos = Vec2::new(180.0, 50.0);
        state.boss = Some(boss);
        add_player_bullet(&mut state, Vec2::new(180.0, 50.0));
        let mut events = Vec::new();

        resolve_collisions(&mut state, 1000.0, &mut rng, &mut events);

        assert_eq!(state.boss.as_ref().unwrap().hp, BOSS_MAX_HP);
        assert_eq!(state.player_bullets.len(), 1);
    }

    #[test]
    fn test_power_up_pickup_caps_level() {
        let (mut state, mut rng) = fresh();
        let player = state.player_pos();
        for _ in 0..3 {
            let id = state.next_entity_id();
            state.power_ups.push(PowerUp {
                id,
                pos: player + Vec2::new(10.0, 10.0),
                speed: POWERUP_SPEED,
                kind: PowerUpKind::MultiShot,
            });
        }
        let id = state.next_entity_id();
        state.power_ups.push(PowerUp {
            id,
            pos: player + Vec2::new(0.0, -40.0),
            speed: POWERUP_SPEED,
            kind: PowerUpKind::MultiShot,
        });
        let mut events = Vec::new();

        let report = resolve_collisions(&mut state, 1000.0, &mut rng, &mut events);

        assert_eq!(report.powerups_collected, 3);
        assert_eq!(state.power_level, MAX_POWER_LEVEL);
        assert_eq!(state.score, 3 * POWERUP_SCORE);
        assert_eq!(state.stats.powerups_collected, 3);
        assert_eq!(state.power_ups.len(), 1);
    }

    #[test]
    fn test_enemy_bullet_is_lethal() {
        let (mut state, mut rng) = fresh();
        let player = state.player_pos();
        state.spawn_enemy_bullets(player + Vec2::new(6.0, 6.0), &[Vec2::Y]);
        // A simultaneous kill does not save the player
        add_enemy(&mut state, EnemyKind::Normal, Vec2::new(50.0, 50.0));
        add_player_bullet(&mut state, Vec2::new(50.0, 50.0));
        let mut events = Vec::new();

        let report = resolve_collisions(&mut state, 1000.0, &mut rng, &mut events);

        assert!(report.player_destroyed);
        assert_eq!(report.enemies_destroyed, 1);
        assert_eq!(events.last(), Some(&GameEvent::PlayerDestroyed));
        let blast = state.explosions.last().unwrap();
        assert_eq!(blast.pos, player);
        assert_eq!(blast.size, 2.0);
    }

    #[test]
    fn test_near_miss_is_not_lethal() {
        let (mut state, mut rng) = fresh();
        let player = state.player_pos();
        state.spawn_enemy_bullets(player + Vec2::new(10.0, 0.0), &[Vec2::Y]);
        let mut events = Vec::new();

        let report = resolve_collisions(&mut state, 1000.0, &mut rng, &mut events);

        assert!(!report.player_destroyed);
        assert!(events.is_empty());
    }
}
