//! Local leaderboard
//!
//! Top 10 finished sessions, persisted as a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Maximum number of entries to keep
pub const MAX_RANKINGS: usize = 10;

/// Medal awarded on the game-over summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreTier {
    Bronze,
    Silver,
    Gold,
}

impl ScoreTier {
    pub const SILVER_SCORE: u64 = 35_000;
    pub const GOLD_SCORE: u64 = 50_000;

    pub fn for_score(score: u64) -> Self {
        if score >= Self::GOLD_SCORE {
            ScoreTier::Gold
        } else if score >= Self::SILVER_SCORE {
            ScoreTier::Silver
        } else {
            ScoreTier::Bronze
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTier::Bronze => "Bronze",
            ScoreTier::Silver => "Silver",
            ScoreTier::Gold => "Gold",
        }
    }
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub score: u64,
    pub display_name: String,
    /// Bosses defeated during the session
    pub boss_clears: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Rankings {
    pub entries: Vec<RankingEntry>,
}

impl Rankings {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_RANKINGS {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert an entry if it qualifies. Returns the rank achieved.
    pub fn add(&mut self, entry: RankingEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Sorted descending; ties keep the earlier entry ahead
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_RANKINGS);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from a JSON file. A missing file is an empty leaderboard.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No rankings at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let json = fs::read_to_string(path)?;
        let rankings: Rankings = serde_json::from_str(&json)?;
        log::info!("Loaded {} rankings", rankings.entries.len());
        Ok(rankings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Rankings saved ({} entries)", self.entries.len());
        Ok(())
    }
}
