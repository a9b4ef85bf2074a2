//! Combat resolution
//!
//! Player beams damage enemies; enemy projectiles damage the player and cover.
//! Defeats feed score, round progress and the game-over check.

use glam::Vec3;

use super::director::start_intermission;
use super::effects::{flash_enemy, flash_player_hit, spawn_beam, spawn_explosion};
use super::registry::{Entity, EntityId};
use super::state::{GameEvent, GamePhase, GameState, Host};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::error::GameError;
use crate::tuning::EnemyKind;

/// Result of one player shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    Miss,
    /// Enemy damaged but still alive
    Hit { id: EntityId, remaining: i32 },
    Defeated { id: EntityId, kind: EnemyKind, points: u64 },
}

/// Fire the equipped gun from the gun hand's controller
pub fn player_shoot(state: &mut GameState, host: &mut Host) -> ShotOutcome {
    let damage = match state.equipped_gun() {
        Ok(gun) => gun.damage,
        Err(e) => {
            log::error!("{}; using fallback damage", e);
            FALLBACK_DAMAGE
        }
    };
    let ray = host.world.controller_ray(state.session.equipped_hand);

    host.audio.play(SoundEffect::Shoot, Some(ray.origin));
    spawn_beam(state, host, ray.origin, ray.at(BEAM_LENGTH));

    let Some(hit) = host.world.cast_ray(&ray) else {
        log::debug!("Miss!");
        return ShotOutcome::Miss;
    };

    if state.registry.cover(hit).is_some() {
        log::debug!("Shot blocked by cover {:?}", hit);
        return ShotOutcome::Miss;
    }

    match damage_enemy(state, host, hit, damage) {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("{}; treating as a miss", e);
            ShotOutcome::Miss
        }
    }
}

/// Apply `damage` to an enemy, defeating it at zero health
pub fn damage_enemy(
    state: &mut GameState,
    host: &mut Host,
    id: EntityId,
    damage: i32,
) -> Result<ShotOutcome, GameError> {
    let enemy = state
        .registry
        .enemy_mut(id)
        .ok_or(GameError::UnrecognizedHit { id: id.0 })?;
    enemy.health -= damage;
    let remaining = enemy.health;
    let position = enemy.position;
    log::debug!(
        "Hit {:?}! Health: {}/{}",
        enemy.kind,
        enemy.health,
        enemy.max_health
    );

    host.audio.play(SoundEffect::EnemyHit, Some(position));
    if remaining > 0 {
        flash_enemy(state, host, id);
        return Ok(ShotOutcome::Hit { id, remaining });
    }

    Ok(defeat_enemy(state, host, id))
}

/// Score, explode and remove a defeated enemy; may end the round
fn defeat_enemy(state: &mut GameState, host: &mut Host, id: EntityId) -> ShotOutcome {
    let Some(Entity::Enemy(enemy)) = state.registry.remove(host.world, id) else {
        return ShotOutcome::Miss;
    };
    log::info!("{:?} defeated! +{}", enemy.kind, enemy.points);

    state.session.score += enemy.points;
    state.session.enemies_remaining = state.session.enemies_remaining.saturating_sub(1);
    state.events.push(GameEvent::EnemyDefeated {
        id,
        kind: enemy.kind,
        points: enemy.points,
    });

    spawn_explosion(state, host, enemy.position);
    host.audio.play(SoundEffect::Explosion, Some(enemy.position));

    if state.session.enemies_remaining == 0 && state.phase() == GamePhase::Playing {
        start_intermission(state, host);
    }

    ShotOutcome::Defeated {
        id,
        kind: enemy.kind,
        points: enemy.points,
    }
}

/// An enemy projectile reached the player
pub fn damage_player(state: &mut GameState, host: &mut Host) {
    if !state.phase().clock_running() {
        return;
    }
    let damage = state.tuning.player_hit_damage;
    let health = state.session.player_health.saturating_sub(damage);
    state.session.player_health = health.min(state.tuning.max_player_health);
    log::info!("Player hit! Health: {}", state.session.player_health);

    state.events.push(GameEvent::PlayerHit {
        health: state.session.player_health,
    });
    flash_player_hit(state, host);
    host.audio.play(SoundEffect::PlayerHit, None);

    if state.session.player_health == 0 {
        log::info!("Game Over - player health depleted");
        game_over(state, host);
    }
}

/// End the run; the simulation clock stops with the phase change
pub fn game_over(state: &mut GameState, host: &mut Host) {
    state.set_phase(GamePhase::GameOver);
    host.audio.play(SoundEffect::GameOver, None);
}

/// An enemy projectile struck cover at `impact`
pub fn damage_cover(state: &mut GameState, host: &mut Host, id: EntityId, impact: Vec3) {
    let damage = state.tuning.cover_hit_damage;
    let Some(cover) = state.registry.cover_mut(id) else {
        return;
    };
    let destroyed = cover.apply_damage(damage);

    if destroyed {
        state.registry.remove(host.world, id);
        state.events.push(GameEvent::CoverDestroyed { id });
        host.audio.play(SoundEffect::CoverBreak, Some(impact));
        log::info!("Cover {:?} destroyed", id);
    } else {
        host.audio.play(SoundEffect::CoverHit, Some(impact));
    }
}
