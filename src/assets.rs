//! Asset readiness
//!
//! Loading happens outside the core. The host polls an [`AssetLoader`] until
//! it yields a [`LoadReport`], then hands the report to the session. Failed
//! models become placeholder boxes and failed sounds become no-ops; neither
//! blocks the game from starting.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::audio::{AudioManager, SoundEffect};
use crate::error::GameError;
use crate::tuning::{GunConfig, Tuning};

/// Every cue with a sound file
pub const SOUND_EFFECTS: [SoundEffect; 9] = [
    SoundEffect::Shoot,
    SoundEffect::EnemyHit,
    SoundEffect::EnemyShoot,
    SoundEffect::PlayerHit,
    SoundEffect::Explosion,
    SoundEffect::CoverHit,
    SoundEffect::CoverBreak,
    SoundEffect::RoundClear,
    SoundEffect::GameOver,
];

/// Relative path of a cue's sound file
pub fn sound_path(effect: SoundEffect) -> String {
    let name = match effect {
        SoundEffect::Shoot => "shoot",
        SoundEffect::EnemyHit => "enemy_hit",
        SoundEffect::EnemyShoot => "enemy_shoot",
        SoundEffect::PlayerHit => "player_hit",
        SoundEffect::Explosion => "explosion",
        SoundEffect::CoverHit => "cover_hit",
        SoundEffect::CoverBreak => "cover_break",
        SoundEffect::RoundClear => "round_clear",
        SoundEffect::GameOver => "game_over",
    };
    format!("assets/sounds/{}.wav", name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Model,
    Sound(SoundEffect),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub path: String,
    pub kind: AssetKind,
}

/// Everything the session wants loaded before it starts
#[derive(Debug, Clone, Default)]
pub struct AssetManifest {
    pub entries: Vec<AssetEntry>,
}

impl AssetManifest {
    /// Gun models from the catalog plus one sound per cue
    pub fn from_tuning(tuning: &Tuning) -> Self {
        let models = tuning.guns.iter().map(|gun| AssetEntry {
            path: gun.model_path.clone(),
            kind: AssetKind::Model,
        });
        let sounds = SOUND_EFFECTS.iter().map(|&effect| AssetEntry {
            path: sound_path(effect),
            kind: AssetKind::Sound(effect),
        });
        Self {
            entries: models.chain(sounds).collect(),
        }
    }
}

/// Outcome of a finished load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Manifest paths that could not be loaded
    pub failed: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Poll-based loader; `None` means still loading
pub trait AssetLoader {
    fn poll(&mut self) -> Option<LoadReport>;
}

/// Loader that checks each manifest path under a root directory
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
    manifest: AssetManifest,
    done: bool,
}

impl DirectoryLoader {
    pub fn new(root: impl AsRef<Path>, manifest: AssetManifest) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            manifest,
            done: false,
        }
    }
}

impl AssetLoader for DirectoryLoader {
    fn poll(&mut self) -> Option<LoadReport> {
        if self.done {
            return None;
        }
        self.done = true;
        let failed = self
            .manifest
            .entries
            .iter()
            .filter(|entry| !self.root.join(&entry.path).is_file())
            .map(|entry| entry.path.clone())
            .collect();
        Some(LoadReport { failed })
    }
}

/// Swap in placeholders for failed assets. Returns how many were substituted.
pub fn apply_report(report: &LoadReport, guns: &mut [GunConfig], audio: &mut AudioManager) -> usize {
    if report.is_clean() {
        log::info!("All assets loaded");
        return 0;
    }
    let failed: BTreeSet<&str> = report.failed.iter().map(String::as_str).collect();
    let mut substituted = 0;

    for path in &failed {
        log::warn!("{}; using placeholder", GameError::AssetFailed { path: path.to_string() });
    }

    for gun in guns.iter_mut() {
        if failed.contains(gun.model_path.as_str()) {
            gun.placeholder = true;
            substituted += 1;
        }
    }

    for effect in SOUND_EFFECTS {
        if failed.contains(sound_path(effect).as_str()) {
            audio.silence(effect);
            substituted += 1;
        }
    }

    log::info!("Assets ready with {} placeholders", substituted);
    substituted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_lists_guns_and_sounds() {
        let manifest = AssetManifest::from_tuning(&Tuning::default());
        let models = manifest
            .entries
            .iter()
            .filter(|e| e.kind == AssetKind::Model)
            .count();
        assert_eq!(models, 3);
        assert_eq!(manifest.entries.len(), 3 + SOUND_EFFECTS.len());
    }

    #[test]
    fn test_failed_assets_become_placeholders() {
        let tuning = Tuning::default();
        let mut guns = tuning.guns.clone();
        let mut audio = AudioManager::default();
        let report = LoadReport {
            failed: vec![
                guns[1].model_path.clone(),
                sound_path(SoundEffect::Explosion),
                "assets/unlisted.bin".to_string(),
            ],
        };

        assert_eq!(apply_report(&report, &mut guns, &mut audio), 2);
        assert!(!guns[0].placeholder);
        assert!(guns[1].placeholder);
        assert!(audio.is_silenced(SoundEffect::Explosion));
        assert!(!audio.is_silenced(SoundEffect::Shoot));
    }

    #[test]
    fn test_clean_report_changes_nothing() {
        let tuning = Tuning::default();
        let mut guns = tuning.guns.clone();
        let mut audio = AudioManager::default();
        let report = LoadReport::default();
        assert!(report.is_clean());
        assert_eq!(apply_report(&report, &mut guns, &mut audio), 0);
        assert!(guns.iter().all(|g| !g.placeholder));
        assert!(SOUND_EFFECTS.iter().all(|e| !audio.is_silenced(*e)));
    }

    #[test]
    fn test_directory_loader_reports_once() {
        let manifest = AssetManifest::from_tuning(&Tuning::default());
        let expected = manifest.entries.len();
        let mut loader = DirectoryLoader::new("/nonexistent-asset-root", manifest);
        let report = loader.poll().unwrap();
        assert_eq!(report.failed.len(), expected);
        assert!(!report.is_clean());
        assert!(loader.poll().is_none());
    }
}
