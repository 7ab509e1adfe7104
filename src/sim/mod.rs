//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, inputs and frame
//! timestamps, a run replays identically:
//! - Every random decision draws from the injected RNG
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod patterns;
pub mod spawner;
pub mod state;
pub mod tick;

pub use boss::{enter_boss_phase_if_due, update_boss};
pub use collision::{CollisionReport, resolve_collisions, within};
pub use patterns::{BossAttack, EnemyPattern, WeightedTable, enemy_bullet_speed};
pub use spawner::{batch_size, spawn_tick};
pub use state::{
    Boss, BossState, Bullet, BulletOwner, Enemy, EnemyKind, Explosion, GameEvent, GameState,
    PlayStats, PowerUp, PowerUpKind, Star,
};
pub use tick::{FrameClock, TickInput, TickOutcome, tick};

/// RNG that returns the same word forever. `FixedRng(0)` rolls 0.0 and
/// `FixedRng(u32::MAX)` rolls just under 1.0.
#[cfg(test)]
pub(crate) struct FixedRng(pub u32);

#[cfg(test)]
impl rand::RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.0
    }

    fn next_u64(&mut self) -> u64 {
        ((self.0 as u64) << 32) | self.0 as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.0.to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
