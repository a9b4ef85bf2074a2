//! Wave Shooter - a round-based VR arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (session phases, waves, enemies, projectiles, combat)
//! - `world`: Scene collaborator (placing visuals, ray casts, player position)
//! - `audio`: Fire-and-forget sound cues
//! - `assets`: Asset readiness and placeholder substitution
//! - `ui`: Read-only HUD snapshot
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;
pub mod world;

pub use error::GameError;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the simulation accepts (seconds)
    pub const MAX_DT: f32 = 0.1;

    /// Enemy movement bounds (world units, player stands near the origin)
    pub const BOUNDS_X: f32 = 15.0;
    pub const BOUNDS_Y_MIN: f32 = 0.5;
    pub const BOUNDS_Y_MAX: f32 = 5.0;
    pub const BOUNDS_Z: f32 = 15.0;

    /// Spawn area
    pub const AREA_RADIUS: f32 = 12.0;
    pub const AREA_HEIGHT: f32 = 4.0;
    pub const SPAWN_MIN_HEIGHT: f32 = 1.0;
    /// Spread layout: wide arc, starts 5 units out
    pub const SPREAD_ARC: f32 = 1.8 * std::f32::consts::PI;
    pub const SPREAD_MIN_RADIUS: f32 = 5.0;
    /// Frontal layout: narrow arc, starts 4 units out
    pub const FRONTAL_ARC: f32 = 0.4 * std::f32::consts::PI;
    pub const FRONTAL_MIN_RADIUS: f32 = 4.0;
    /// Performance cap on simultaneous enemies
    pub const MAX_ENEMIES_ON_SCREEN: usize = 20;

    /// Enemy motion
    pub const BASE_OSCILLATION_SPEED: f32 = 1.0;
    pub const DRIFT_SPEED_X: f32 = 0.5;
    pub const DRIFT_SPEED_Y: f32 = 0.3;
    /// Enemy fire cadence before the per-type factor is applied (seconds)
    pub const MIN_SHOOT_INTERVAL: f32 = 2.0;
    pub const MAX_SHOOT_INTERVAL: f32 = 5.0;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 5.0;
    pub const PROJECTILE_RADIUS: f32 = 0.05;
    pub const PLAYER_HIT_RADIUS: f32 = 0.25;
    pub const PROJECTILE_MAX_DIST: f32 = 50.0;
    /// How far in front of an enemy its projectile appears
    pub const ENEMY_SHOOT_OFFSET: f32 = 0.2;
    /// Player beam length (visual only)
    pub const BEAM_LENGTH: f32 = 50.0;

    /// Fallback damage when the equipped item has no data
    pub const FALLBACK_DAMAGE: i32 = 10;

    /// Cosmetic effect lifetimes (seconds)
    pub const EXPLOSION_DURATION: f32 = 1.0;
    pub const EXPLOSION_PARTICLES: usize = 12;
    pub const EXPLOSION_PARTICLE_SPEED: f32 = 2.0;
    pub const HIT_FLASH_DURATION: f32 = 0.1;
    pub const BEAM_DURATION: f32 = 0.1;
    pub const PLAYER_HIT_OVERLAY_DURATION: f32 = 0.1;

    /// Debug tuning steps
    pub const ROTATION_STEP: f32 = 5.0 * std::f32::consts::PI / 180.0;
    pub const POSITION_STEP: f32 = 0.005;
    pub const SCALE_STEP: f32 = 0.001;
    pub const MIN_SCALE: f32 = 0.001;
}

/// Direction from `from` toward `to`, or -Z when the points coincide
#[inline]
pub fn direction_to(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).try_normalize().unwrap_or(Vec3::NEG_Z)
}

/// Yaw and pitch (radians) that orient a -Z-forward object toward `target`
pub fn yaw_pitch_toward(from: Vec3, target: Vec3) -> (f32, f32) {
    let dir = direction_to(from, target);
    let yaw = (-dir.x).atan2(-dir.z);
    let pitch = dir.y.clamp(-1.0, 1.0).asin();
    (yaw, pitch)
}
