//! Static and destructible cover
//!
//! Cover is placed once at scene setup. Indestructible pieces are permanent;
//! breakable pieces are removed when their health runs out and rebuilt on
//! every game reset.

use glam::Vec3;

use super::registry::{Entity, EntityKind};
use super::state::{GameState, Host};
use crate::tuning::CoverSpec;
use crate::world::Visual;

#[derive(Debug, Clone)]
pub struct Cover {
    pub position: Vec3,
    pub half_extents: Vec3,
    pub breakable: bool,
    /// Only meaningful when breakable
    pub health: i32,
}

impl Cover {
    pub fn from_spec(spec: &CoverSpec, max_health: i32) -> Self {
        Self {
            position: spec.position,
            half_extents: spec.half_extents,
            breakable: spec.breakable,
            health: max_health,
        }
    }

    pub fn visual(&self) -> Visual {
        Visual::Cover {
            position: self.position,
            half_extents: self.half_extents,
            breakable: self.breakable,
        }
    }

    /// Apply damage; true when a breakable piece has just been destroyed
    pub fn apply_damage(&mut self, damage: i32) -> bool {
        if !self.breakable {
            return false;
        }
        self.health -= damage;
        self.health <= 0
    }
}

/// Place every cover piece from the layout
pub fn setup_cover(state: &mut GameState, host: &mut Host) {
    let max_health = state.tuning.cover_max_health;
    let specs = state.tuning.cover.clone();
    for spec in &specs {
        state
            .registry
            .insert(host.world, Entity::Cover(Cover::from_spec(spec, max_health)));
    }
    state.scene_ready = true;
    log::info!("Scene setup: {} cover objects", specs.len());
}

/// Rebuild breakable cover at full health; indestructible pieces are untouched
pub fn restore_breakable_cover(state: &mut GameState, host: &mut Host) {
    state.registry.remove_where(host.world, EntityKind::Cover, |e| {
        matches!(e, Entity::Cover(c) if c.breakable)
    });

    let max_health = state.tuning.cover_max_health;
    let specs: Vec<CoverSpec> = state
        .tuning
        .cover
        .iter()
        .filter(|s| s.breakable)
        .cloned()
        .collect();
    for spec in &specs {
        state
            .registry
            .insert(host.world, Entity::Cover(Cover::from_spec(spec, max_health)));
    }
    log::debug!("Restored {} breakable cover objects", specs.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::settings::Settings;
    use crate::tuning::Tuning;
    use crate::world::HeadlessWorld;

    #[test]
    fn test_indestructible_ignores_damage() {
        let spec = CoverSpec {
            position: Vec3::ZERO,
            half_extents: Vec3::ONE,
            breakable: false,
        };
        let mut cover = Cover::from_spec(&spec, 50);
        for _ in 0..20 {
            assert!(!cover.apply_damage(10));
        }
    }

    #[test]
    fn test_restore_rebuilds_only_breakable() {
        let mut state = GameState::new(Tuning::default(), &Settings::default(), 1);
        let mut world = HeadlessWorld::default();
        let mut audio = AudioManager::default();
        let mut host = Host {
            world: &mut world,
            audio: &mut audio,
        };
        setup_cover(&mut state, &mut host);
        let total = state.registry.count(EntityKind::Cover);
        let permanent: Vec<_> = state
            .registry
            .covers()
            .filter(|(_, c)| !c.breakable)
            .map(|(id, _)| id)
            .collect();

        // Knock one breakable piece down
        let (victim, _) = state.registry.covers().find(|(_, c)| c.breakable).unwrap();
        state.registry.remove(host.world, victim);

        restore_breakable_cover(&mut state, &mut host);
        assert_eq!(state.registry.count(EntityKind::Cover), total);
        assert!(state.registry.covers().all(|(_, c)| !c.breakable || c.health == 50));
        for id in permanent {
            assert!(state.registry.contains(id));
        }
        assert_eq!(world.count_where(|v| matches!(v, Visual::Cover { .. })), total);
    }
}
