//! Game settings and preferences
//!
//! Stored as JSON next to the game. A missing or unreadable file is never
//! fatal: the defaults are used and the problem is logged.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_TICK_HZ;
use crate::error::LanderError;

/// Settings file used when `--config` is not given
pub const DEFAULT_SETTINGS_FILE: &str = "jupiter-lander.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ring the terminal bell for crashes and the start tune
    pub sound: bool,
    /// Frames per second the game is paced to
    pub tick_hz: u32,
    /// How long a key counts as held after a press, for terminals
    /// that do not report key releases
    pub key_hold_ms: u64,
    /// Where log output goes (the screen belongs to the game)
    pub log_file: PathBuf,
    /// Leaderboard file
    pub highscore_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            tick_hz: DEFAULT_TICK_HZ,
            key_hold_ms: 120,
            log_file: PathBuf::from("jupiter-lander.log"),
            highscore_file: PathBuf::from("jupiter-lander-scores.json"),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; absent fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, LanderError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        if settings.tick_hz == 0 {
            log::warn!("tick_hz must be positive, using {}", DEFAULT_TICK_HZ);
            settings.tick_hz = DEFAULT_TICK_HZ;
        }
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings to a file
    pub fn save(&self, path: &Path) -> Result<(), LanderError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "sound": false }"#).unwrap();
        assert!(!settings.sound);
        assert_eq!(settings.tick_hz, DEFAULT_TICK_HZ);
        assert_eq!(settings.key_hold_ms, 120);
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let settings = Settings::from_json(r#"{ "tick_hz": 0 }"#).unwrap();
        assert_eq!(settings.tick_hz, DEFAULT_TICK_HZ);
    }

    #[test]
    fn test_malformed_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ sound: yes"),
            Err(LanderError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("jupiter-lander-no-such-settings.json");
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "jupiter-lander-settings-{}.json",
            std::process::id()
        ));
        let settings = Settings {
            tick_hz: 60,
            key_hold_ms: 90,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
