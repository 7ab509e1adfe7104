//! Player identity and session configuration
//!
//! Stored as a JSON file next to the leaderboard. Fields missing from the
//! file take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Who is playing. An id of 0 means anonymous (scores are not submitted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlayerProfile {
    pub id: u64,
    pub user_name: String,
    pub display_name: String,
    pub avatar_url: String,
}

impl PlayerProfile {
    pub fn is_anonymous(&self) -> bool {
        self.id == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerProfile,

    // === Score submission ===
    /// Key for signing submissions; submission is skipped without one
    pub signing_key: Option<String>,
    /// Master switch for submitting scores
    pub submit_scores: bool,

    // === Session ===
    /// Fixed RNG seed (random per session when unset)
    pub seed: Option<u64>,
    /// Let the autopilot fly the ship
    pub autopilot: bool,
    /// Leaderboard file (in-memory only when unset)
    pub rankings_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player: PlayerProfile::default(),
            signing_key: None,
            submit_scores: true,
            seed: None,
            autopilot: false,
            rankings_file: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Whether a finished session should be submitted
    pub fn should_submit(&self) -> bool {
        self.submit_scores && !self.player.is_anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BarrageError;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("barrage-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(&temp_path("absent")).unwrap();
        assert!(settings.submit_scores);
        assert!(settings.player.is_anonymous());
        assert!(!settings.should_submit());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{"player":{"id":7,"display_name":"Ace"},"seed":12}"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.player.id, 7);
        assert_eq!(settings.player.display_name, "Ace");
        assert_eq!(settings.seed, Some(12));
        assert!(settings.should_submit());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_path("malformed");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(BarrageError::Json(_))));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_round_trip() {
        let path = temp_path("roundtrip");
        let mut settings = Settings::default();
        settings.autopilot = true;
        settings.signing_key = Some("k".to_string());
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert!(loaded.autopilot);
        assert_eq!(loaded.signing_key.as_deref(), Some("k"));
        let _ = fs::remove_file(&path);
    }
}
