//! Boss encounter state machine
//!
//! appearing -> fighting -> dying -> removed. Entering the boss phase clears
//! every ordinary enemy; leaving it pays the bonus and ratchets difficulty.

use glam::Vec2;
use rand::Rng;

use super::patterns::BossAttack;
use super::state::{Boss, BossState, GameEvent, GameState};
use super::tick::FrameClock;
use crate::consts::*;

impl Boss {
    /// Attack for the current phase
    pub fn attack(&self) -> BossAttack {
        BossAttack::from_phase(self.phase)
    }

    /// Apply one player-bullet hit. Returns true if this hit started the
    /// death sequence. Only a fighting boss can be damaged.
    pub fn take_hit(&mut self) -> bool {
        if self.state != BossState::Fighting {
            return false;
        }
        self.hp -= BOSS_HIT_DAMAGE;
        if self.hp <= 0 {
            self.state = BossState::Dying;
            self.progress = 0.0;
            return true;
        }
        false
    }

    /// Step the attack cadence. Returns a volley when one is due.
    fn advance_attack(&mut self, now: f64, target: Vec2, boss_clear_count: u32) -> Option<Vec<Vec2>> {
        let attack = self.attack();
        let cadence = attack.cadence();
        let since_last = now - self.last_shot;
        if since_last <= cadence.interval_ms {
            return None;
        }

        if self.shot_count < cadence.shots {
            self.shot_count += 1;
            self.last_shot = now;
            return Some(attack.volley(self.pos, target, boss_clear_count));
        }

        // Set complete; wait out the set interval before the next one
        if since_last > cadence.set_interval_ms {
            self.shot_count = 0;
            self.set_count += 1;
            if self.set_count >= cadence.sets {
                self.phase = (self.phase + 1) % 3;
                self.set_count = 0;
            }
        }
        None
    }
}

/// Score the player must gain since the last boss before the next one comes
pub fn boss_threshold(boss_clear_count: u32) -> u64 {
    BOSS_TRIGGER_SCORE * (boss_clear_count as u64 + 1)
}

/// Start the boss phase once enough score has accumulated.
/// Returns the new boss ID when the transition fires.
pub fn enter_boss_phase_if_due(state: &mut GameState) -> Option<u32> {
    if state.boss_phase || state.score <= state.last_boss_score {
        return None;
    }
    if state.score - state.last_boss_score < boss_threshold(state.boss_clear_count) {
        return None;
    }

    state.boss_phase = true;
    state.last_boss_score = state.score;
    state.enemies.clear();
    let id = state.next_entity_id();
    state.boss = Some(Boss::new(id));

    log::info!(
        "Boss {} incoming at score {} (clears: {})",
        id,
        state.score,
        state.boss_clear_count
    );
    Some(id)
}

/// Advance the boss through its lifecycle for one tick
pub fn update_boss(
    state: &mut GameState,
    clock: &FrameClock,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let Some(mut boss) = state.boss.take() else {
        return;
    };

    match boss.state {
        BossState::Appearing => {
            boss.progress = (boss.progress + (clock.delta / BOSS_APPEAR_MS) as f32).min(1.0);
            boss.pos.y = BOSS_SPAWN_Y + boss.progress * BOSS_ENTRY_TRAVEL;
            if boss.progress >= 1.0 {
                boss.state = BossState::Fighting;
                log::info!("Boss {} engaged", boss.id);
            }
        }

        BossState::Fighting => {
            let sway = (clock.now / 1000.0).sin() as f32;
            boss.pos.x = FIELD_WIDTH / 2.0 + sway * BOSS_SWAY;

            if let Some(volley) =
                boss.advance_attack(clock.now, state.player_pos(), state.boss_clear_count)
            {
                state.spawn_enemy_bullets(boss.pos, &volley);
            }
        }

        BossState::Dying => {
            boss.progress = (boss.progress + (clock.delta / BOSS_DEATH_MS) as f32).min(1.0);

            if rng.random::<f32>() < BOSS_DEATH_EXPLOSION_CHANCE {
                let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 80.0;
                let size = 1.0 + rng.random::<f32>();
                state.spawn_explosion(boss.pos + jitter, size, 800.0, clock.now);
            }

            if boss.progress >= 1.0 {
                state.award(BOSS_BONUS_SCORE);
                state.last_boss_score = state.score;
                state.enemy_bullets.clear();
                state.boss_phase = false;
                state.boss_clear_count += 1;
                events.push(GameEvent::BossDefeated {
                    boss_clear_count: state.boss_clear_count,
                });
                log::info!(
                    "Boss {} defeated, score {} (clears: {})",
                    boss.id,
                    state.score,
                    state.boss_clear_count
                );
                return;
            }
        }
    }

    state.boss = Some(boss);
}
