//! Player preferences
//!
//! Persisted separately from tuning as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::sim::{Hand, SpawnMode};

/// Player settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Gameplay ===
    /// Hand holding the gun at session start
    pub preferred_hand: Hand,
    /// Enemy layout for new rounds
    pub spawn_mode: SpawnMode,

    // === Visual Effects ===
    /// Hit flashes and shot beams
    pub effects: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            preferred_hand: Hand::Right,
            spawn_mode: SpawnMode::Spread,
            effects: true,
        }
    }
}

impl Settings {
    /// Effective sound effect volume (respects mute)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings, falling back to defaults when the file is missing or corrupt
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), GameError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_silences() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
        assert!((Settings::default().effective_volume() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/wave-shooter/settings.json"));
        assert_eq!(settings.preferred_hand, Hand::Right);
        assert!(settings.effects);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("wave_shooter_settings_{}.json", std::process::id()));
        let settings = Settings {
            preferred_hand: Hand::Left,
            spawn_mode: SpawnMode::Frontal,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.preferred_hand, Hand::Left);
        assert_eq!(loaded.spawn_mode, SpawnMode::Frontal);
    }
}
