//! Projectile simulation
//!
//! Each tick every projectile gets exactly one outcome, checked in priority
//! order: blocked by cover, reached the player, out of range, or still flying.
//! Cover and player tests sweep the whole segment travelled this tick.

use glam::Vec3;

use super::collision::{Ray, ray_aabb, ray_sphere};
use super::combat::{damage_cover, damage_player};
use super::registry::{Entity, EntityId, EntityKind};
use super::state::{GamePhase, GameState, Host};
use crate::consts::*;
use crate::world::Visual;

#[derive(Debug, Clone)]
pub struct Projectile {
    /// Launch point; travel is measured from here
    pub origin: Vec3,
    pub position: Vec3,
    /// Unit direction
    pub direction: Vec3,
    pub speed: f32,
    pub source_is_enemy: bool,
}

impl Projectile {
    pub fn new(origin: Vec3, direction: Vec3, speed: f32, source_is_enemy: bool) -> Self {
        Self {
            origin,
            position: origin,
            direction: direction.try_normalize().unwrap_or(Vec3::NEG_Z),
            speed,
            source_is_enemy,
        }
    }

    pub fn visual(&self) -> Visual {
        Visual::Projectile {
            position: self.position,
            radius: PROJECTILE_RADIUS,
        }
    }

    /// Distance travelled from the launch point
    pub fn travelled(&self) -> f32 {
        self.origin.distance(self.position)
    }
}

/// What happened to a projectile this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileOutcome {
    HitCover(EntityId),
    HitPlayer,
    OutOfRange,
    InFlight,
}

/// Spawn a projectile and place its visual
pub fn fire_projectile(
    state: &mut GameState,
    host: &mut Host,
    origin: Vec3,
    direction: Vec3,
    speed: f32,
    source_is_enemy: bool,
) -> EntityId {
    let projectile = Projectile::new(origin, direction, speed, source_is_enemy);
    state
        .registry
        .insert(host.world, Entity::Projectile(projectile))
}

/// Nearest cover piece the segment `from + dir * [0, reach]` touches
fn first_cover_hit(state: &GameState, from: Vec3, direction: Vec3, reach: f32) -> Option<EntityId> {
    let ray = Ray::new(from, direction);
    state
        .registry
        .covers()
        .filter_map(|(id, cover)| {
            ray_aabb(&ray, cover.position, cover.half_extents, reach).map(|t| (id, t))
        })
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(id, _)| id)
}

/// Advance one projectile and resolve its outcome
pub fn step_projectile(
    state: &mut GameState,
    host: &mut Host,
    id: EntityId,
    dt: f32,
    player: Vec3,
) -> ProjectileOutcome {
    let Some(projectile) = state.registry.projectile_mut(id) else {
        return ProjectileOutcome::InFlight;
    };
    let from = projectile.position;
    let direction = projectile.direction;
    let distance = projectile.speed * dt;
    let source_is_enemy = projectile.source_is_enemy;

    // (1) cover along this tick's travel segment
    if let Some(cover_id) = first_cover_hit(state, from, direction, distance) {
        state.registry.remove(host.world, id);
        damage_cover(state, host, cover_id, from);
        return ProjectileOutcome::HitCover(cover_id);
    }

    // (2) player
    let Some(projectile) = state.registry.projectile_mut(id) else {
        return ProjectileOutcome::InFlight;
    };
    projectile.position += direction * distance;
    let position = projectile.position;
    let travelled = projectile.travelled();

    let swept = Ray::new(from, direction);
    let reached_player = ray_sphere(&swept, player, PLAYER_HIT_RADIUS).is_some_and(|t| t <= distance);
    if source_is_enemy && reached_player {
        state.registry.remove(host.world, id);
        damage_player(state, host);
        return ProjectileOutcome::HitPlayer;
    }

    // (3) range
    if travelled > PROJECTILE_MAX_DIST {
        log::trace!("Projectile {:?} out of range", id);
        state.registry.remove(host.world, id);
        return ProjectileOutcome::OutOfRange;
    }

    host.world.set_transform(id, position, 0.0, 0.0);
    ProjectileOutcome::InFlight
}

/// Advance every projectile by `dt`
pub fn update_projectiles(state: &mut GameState, host: &mut Host, dt: f32) {
    let player = host.world.player_position();
    for id in state.registry.ids(EntityKind::Projectile) {
        // A fatal hit freezes everything still in flight
        if state.phase() == GamePhase::GameOver {
            break;
        }
        step_projectile(state, host, id, dt, player);
    }
}

/// Remove in-flight enemy projectiles (round end)
pub fn clear_enemy_projectiles(state: &mut GameState, host: &mut Host) -> usize {
    state
        .registry
        .remove_where(host.world, EntityKind::Projectile, |e| {
            matches!(e, Entity::Projectile(p) if p.source_is_enemy)
        })
}
