//! Data-driven game balance
//!
//! Every table has a built-in default. A JSON file may override any subset of
//! keys; anything it leaves out keeps the default.

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Enemy type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Grunt,
    Shooter,
    Brute,
}

impl EnemyKind {
    /// Type key used by the archetype table
    pub fn key(&self) -> &'static str {
        match self {
            EnemyKind::Grunt => "grunt",
            EnemyKind::Shooter => "shooter",
            EnemyKind::Brute => "brute",
        }
    }

    /// Case-insensitive inverse of `key`
    pub fn from_key(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "grunt" => Some(EnemyKind::Grunt),
            "shooter" => Some(EnemyKind::Shooter),
            "brute" => Some(EnemyKind::Brute),
            _ => None,
        }
    }
}

/// Per-type enemy stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyArchetype {
    pub name: String,
    pub health: i32,
    pub points: u64,
    /// Hit sphere radius
    pub size: f32,
    /// Multiplies the base oscillation speed
    pub speed_factor: f32,
    /// Aggressiveness: shoot intervals are divided by this
    pub shoot_interval_factor: f32,
    pub projectile_speed: f32,
}

impl EnemyArchetype {
    /// Oscillation amplitude grows with the type's point value
    pub fn oscillation_amplitude(&self) -> f32 {
        0.1 + self.points as f32 * 0.005
    }
}

/// Equipped item (gun) configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GunConfig {
    pub name: String,
    pub model_path: String,
    pub damage: i32,
    pub position_offset: Vec3,
    /// Euler XYZ, radians
    pub rotation_offset: Vec3,
    pub scale: f32,
    /// Set when the model failed to load and a box stands in for it
    #[serde(skip)]
    pub placeholder: bool,
}

/// One static cover object in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverSpec {
    pub position: Vec3,
    pub half_extents: Vec3,
    pub breakable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub max_player_health: u32,
    /// Damage from one enemy projectile reaching the player
    pub player_hit_damage: u32,
    /// Round clock (seconds); running out ends the game
    pub game_duration: f32,
    pub intermission_duration: f32,
    /// Damage from one enemy projectile striking breakable cover
    pub cover_hit_damage: i32,
    pub cover_max_health: i32,
    pub archetypes: BTreeMap<String, EnemyArchetype>,
    pub guns: Vec<GunConfig>,
    pub cover: Vec<CoverSpec>,
}

impl Default for Tuning {
    fn default() -> Self {
        let mut archetypes = BTreeMap::new();
        archetypes.insert(
            "grunt".to_string(),
            EnemyArchetype {
                name: "Grunt".to_string(),
                health: 30,
                points: 10,
                size: 0.15,
                speed_factor: 0.8,
                shoot_interval_factor: 1.2,
                projectile_speed: 4.0,
            },
        );
        archetypes.insert(
            "shooter".to_string(),
            EnemyArchetype {
                name: "Shooter".to_string(),
                health: 50,
                points: 20,
                size: 0.18,
                speed_factor: 1.0,
                shoot_interval_factor: 1.0,
                projectile_speed: 5.0,
            },
        );
        archetypes.insert(
            "brute".to_string(),
            EnemyArchetype {
                name: "Brute".to_string(),
                health: 100,
                points: 30,
                size: 0.22,
                speed_factor: 0.6,
                shoot_interval_factor: 1.5,
                projectile_speed: 6.0,
            },
        );

        let half_pi = std::f32::consts::FRAC_PI_2;
        let guns = vec![
            GunConfig {
                name: "Pistol".to_string(),
                model_path: "assets/models/pistol.glb".to_string(),
                damage: 15,
                position_offset: Vec3::new(0.0, -0.01, -0.05),
                rotation_offset: Vec3::ZERO,
                scale: 0.035,
                placeholder: false,
            },
            GunConfig {
                name: "Shotgun".to_string(),
                model_path: "assets/models/shotgun.glb".to_string(),
                damage: 40,
                position_offset: Vec3::new(0.0, -0.02, -0.08),
                rotation_offset: Vec3::new(-half_pi, 0.0, 0.0),
                scale: 0.035,
                placeholder: false,
            },
            GunConfig {
                name: "Rifle".to_string(),
                model_path: "assets/models/rifle.glb".to_string(),
                damage: 25,
                position_offset: Vec3::new(0.0, -0.02, -0.1),
                rotation_offset: Vec3::new(-half_pi, 0.0, 0.0),
                scale: 0.035,
                placeholder: false,
            },
        ];

        // Low walls either side of the player, pillars further out
        let cover = vec![
            CoverSpec {
                position: Vec3::new(-1.5, 0.75, -2.0),
                half_extents: Vec3::new(0.6, 0.75, 0.15),
                breakable: true,
            },
            CoverSpec {
                position: Vec3::new(1.5, 0.75, -2.0),
                half_extents: Vec3::new(0.6, 0.75, 0.15),
                breakable: true,
            },
            CoverSpec {
                position: Vec3::new(0.0, 1.25, -4.0),
                half_extents: Vec3::new(0.25, 1.25, 0.25),
                breakable: false,
            },
            CoverSpec {
                position: Vec3::new(3.5, 1.25, -1.0),
                half_extents: Vec3::new(0.25, 1.25, 0.25),
                breakable: false,
            },
        ];

        Self {
            max_player_health: 100,
            player_hit_damage: 10,
            game_duration: 180.0,
            intermission_duration: 5.0,
            cover_hit_damage: 10,
            cover_max_health: 50,
            archetypes,
            guns,
            cover,
        }
    }
}

impl Tuning {
    /// Parse overrides from a JSON document
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let tuning: Self = serde_json::from_str(json)?;
        for key in tuning.unused_archetypes() {
            log::warn!("Archetype {:?} matches no enemy type and is ignored", key);
        }
        Ok(tuning)
    }

    /// Archetype keys no enemy type looks up (lookups use the exact lowercase key)
    pub fn unused_archetypes(&self) -> Vec<&str> {
        self.archetypes
            .keys()
            .map(String::as_str)
            .filter(|key| EnemyKind::from_key(key).map(|kind| kind.key()) != Some(*key))
            .collect()
    }

    /// Load overrides from a JSON file
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!(
            "Loaded tuning from {} ({} archetypes, {} guns, {} cover)",
            path.display(),
            tuning.archetypes.len(),
            tuning.guns.len(),
            tuning.cover.len()
        );
        Ok(tuning)
    }

    /// Look up the stats for an enemy type
    pub fn archetype(&self, kind: EnemyKind) -> Result<&EnemyArchetype, GameError> {
        self.archetypes
            .get(kind.key())
            .ok_or_else(|| GameError::UnknownEnemyType {
                key: kind.key().to_string(),
            })
    }
}
