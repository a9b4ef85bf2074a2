//! Cosmetic effects
//!
//! Explosions, shot beams, hit flashes and the player-hit overlay. Each carries
//! an explicit end time on the effect clock and is swept by `update_effects`;
//! none of them feed back into the simulation.

use glam::Vec3;
use rand::Rng;

use super::registry::{Entity, EntityId, EntityKind};
use super::state::{GameState, Host};
use crate::consts::*;
use crate::world::Visual;

#[derive(Debug, Clone)]
pub enum EffectKind {
    /// Debris burst at a defeated enemy; `particles` are velocities
    Explosion { origin: Vec3, particles: Vec<Vec3> },
    /// Player shot line
    Beam { from: Vec3, to: Vec3 },
    /// White flash on a damaged enemy
    HitFlash { target: EntityId },
    /// Red overlay after the player is hit
    PlayerHitOverlay,
}

#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    pub started_at: f32,
    pub ends_at: f32,
}

impl Effect {
    pub fn new(kind: EffectKind, now: f32, duration: f32) -> Self {
        Self {
            kind,
            started_at: now,
            ends_at: now + duration,
        }
    }

    pub fn is_expired(&self, now: f32) -> bool {
        now >= self.ends_at
    }

    pub fn visual(&self) -> Option<Visual> {
        match &self.kind {
            EffectKind::Explosion { origin, particles } => Some(Visual::Explosion {
                position: *origin,
                particles: particles.clone(),
            }),
            EffectKind::Beam { from, to } => Some(Visual::Beam {
                from: *from,
                to: *to,
            }),
            EffectKind::HitFlash { .. } | EffectKind::PlayerHitOverlay => None,
        }
    }
}

pub fn spawn_explosion(state: &mut GameState, host: &mut Host, origin: Vec3) -> EntityId {
    let particles = (0..EXPLOSION_PARTICLES)
        .map(|_| {
            let dir = Vec3::new(
                state.rng.random_range(-1.0..1.0),
                state.rng.random_range(-1.0..1.0),
                state.rng.random_range(-1.0..1.0),
            );
            dir.try_normalize().unwrap_or(Vec3::Y) * EXPLOSION_PARTICLE_SPEED
        })
        .collect();
    let effect = Effect::new(
        EffectKind::Explosion { origin, particles },
        state.effect_time,
        EXPLOSION_DURATION,
    );
    state.registry.insert(host.world, Entity::Effect(effect))
}

pub fn spawn_beam(state: &mut GameState, host: &mut Host, from: Vec3, to: Vec3) {
    if !state.effects_enabled {
        return;
    }
    let effect = Effect::new(EffectKind::Beam { from, to }, state.effect_time, BEAM_DURATION);
    state.registry.insert(host.world, Entity::Effect(effect));
}

/// Flash an enemy white; a repeat hit restarts the existing flash
pub fn flash_enemy(state: &mut GameState, host: &mut Host, target: EntityId) {
    if !state.effects_enabled {
        return;
    }
    state.registry.remove_where(host.world, EntityKind::Effect, |e| {
        matches!(e, Entity::Effect(Effect { kind: EffectKind::HitFlash { target: t }, .. }) if *t == target)
    });
    host.world.set_flash(target, true);
    let effect = Effect::new(
        EffectKind::HitFlash { target },
        state.effect_time,
        HIT_FLASH_DURATION,
    );
    state.registry.insert(host.world, Entity::Effect(effect));
}

pub fn flash_player_hit(state: &mut GameState, host: &mut Host) {
    let effect = Effect::new(
        EffectKind::PlayerHitOverlay,
        state.effect_time,
        PLAYER_HIT_OVERLAY_DURATION,
    );
    state.registry.insert(host.world, Entity::Effect(effect));
}

/// Whether the player-hit overlay should be showing
pub fn player_hit_overlay_active(state: &GameState) -> bool {
    state
        .registry
        .effects()
        .any(|(_, fx)| matches!(fx.kind, EffectKind::PlayerHitOverlay))
}

/// Advance the effect clock and remove everything past its end time
pub fn update_effects(state: &mut GameState, host: &mut Host, dt: f32) {
    state.effect_time += dt;
    let now = state.effect_time;

    let expired: Vec<(EntityId, Option<EntityId>)> = state
        .registry
        .effects()
        .filter(|(_, fx)| fx.is_expired(now))
        .map(|(id, fx)| match fx.kind {
            EffectKind::HitFlash { target } => (id, Some(target)),
            _ => (id, None),
        })
        .collect();

    for (id, flash_target) in expired {
        state.registry.remove(host.world, id);
        if let Some(target) = flash_target {
            if state.registry.contains(target) {
                host.world.set_flash(target, false);
            }
        }
    }
}
