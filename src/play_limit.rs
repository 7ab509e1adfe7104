//! Daily play-limit gate
//!
//! The limit itself comes from an external service. A session may start when
//! the player is under their daily count or holds a one-time play permission.

use serde::{Deserialize, Serialize};

use crate::error::{BarrageError, Result};

/// Response of the play-limit service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayLimit {
    pub daily_limit: u32,
    pub current_count: u32,
    /// Hour of day (0-23) at which the count resets
    pub reset_hour: u8,
}

impl PlayLimit {
    pub fn is_exhausted(&self) -> bool {
        self.current_count >= self.daily_limit
    }

    /// Whole hours from `hour` (0-23) until the next reset
    pub fn hours_until_reset(&self, hour: u8) -> u8 {
        let reset = self.reset_hour % 24;
        let hour = hour % 24;
        if hour < reset {
            reset - hour
        } else {
            24 - hour + reset
        }
    }
}

/// Collaborator that knows a player's play limit
pub trait PlayLimitSource {
    fn play_limit(&mut self, player_id: u64) -> Result<PlayLimit>;
}

/// Fixed limit, for tests and offline runs
#[derive(Debug, Clone, Copy)]
pub struct StaticLimit(pub PlayLimit);

impl PlayLimitSource for StaticLimit {
    fn play_limit(&mut self, _player_id: u64) -> Result<PlayLimit> {
        Ok(self.0)
    }
}

/// Decide whether a session may start.
///
/// A missing limit means unrestricted. An exhausted limit is refused unless
/// `permission` is held.
pub fn check_gate(limit: Option<&PlayLimit>, permission: bool) -> Result<()> {
    match limit {
        Some(limit) if limit.is_exhausted() && !permission => Err(BarrageError::PlayLimitReached {
            current: limit.current_count,
            limit: limit.daily_limit,
        }),
        _ => Ok(()),
    }
}
