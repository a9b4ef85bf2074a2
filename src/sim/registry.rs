//! Entity registry
//!
//! A single arena of tagged entities keyed by a stable id. The same id names
//! the entity's visual in the world, so hit results come back as ids and are
//! looked up here instead of walking a scene graph.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cover::Cover;
use super::effects::Effect;
use super::enemy::Enemy;
use super::projectile::Projectile;
use crate::world::{Visual, World};

/// Stable entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Entity discriminant for filtered queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Enemy,
    Projectile,
    Cover,
    Effect,
}

#[derive(Debug, Clone)]
pub enum Entity {
    Enemy(Enemy),
    Projectile(Projectile),
    Cover(Cover),
    Effect(Effect),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Enemy(_) => EntityKind::Enemy,
            Entity::Projectile(_) => EntityKind::Projectile,
            Entity::Cover(_) => EntityKind::Cover,
            Entity::Effect(_) => EntityKind::Effect,
        }
    }

    /// What to place in the world, if anything
    pub fn visual(&self) -> Option<Visual> {
        match self {
            Entity::Enemy(e) => Some(e.visual()),
            Entity::Projectile(p) => Some(p.visual()),
            Entity::Cover(c) => Some(c.visual()),
            Entity::Effect(fx) => fx.visual(),
        }
    }
}

/// Owner of every living entity
#[derive(Debug, Clone)]
pub struct Registry {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u32,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Registry {
    /// Add an entity and place its visual
    pub fn insert(&mut self, world: &mut dyn World, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        if let Some(visual) = entity.visual() {
            world.add_entity(id, visual);
        }
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity and detach its visual. Removing twice is a no-op.
    pub fn remove(&mut self, world: &mut dyn World, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        if entity.visual().is_some() {
            world.remove_entity(id);
        }
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        match self.entities.get(&id) {
            Some(Entity::Enemy(e)) => Some(e),
            _ => None,
        }
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        match self.entities.get_mut(&id) {
            Some(Entity::Enemy(e)) => Some(e),
            _ => None,
        }
    }

    pub fn projectile_mut(&mut self, id: EntityId) -> Option<&mut Projectile> {
        match self.entities.get_mut(&id) {
            Some(Entity::Projectile(p)) => Some(p),
            _ => None,
        }
    }

    pub fn cover(&self, id: EntityId) -> Option<&Cover> {
        match self.entities.get(&id) {
            Some(Entity::Cover(c)) => Some(c),
            _ => None,
        }
    }

    pub fn cover_mut(&mut self, id: EntityId) -> Option<&mut Cover> {
        match self.entities.get_mut(&id) {
            Some(Entity::Cover(c)) => Some(c),
            _ => None,
        }
    }

    /// Ids of one kind, in ascending (spawn) order
    pub fn ids(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.kind() == kind)
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind() == kind).count()
    }

    pub fn enemies(&self) -> impl Iterator<Item = (EntityId, &Enemy)> {
        self.entities.iter().filter_map(|(&id, e)| match e {
            Entity::Enemy(enemy) => Some((id, enemy)),
            _ => None,
        })
    }

    pub fn projectiles(&self) -> impl Iterator<Item = (EntityId, &Projectile)> {
        self.entities.iter().filter_map(|(&id, e)| match e {
            Entity::Projectile(p) => Some((id, p)),
            _ => None,
        })
    }

    pub fn covers(&self) -> impl Iterator<Item = (EntityId, &Cover)> {
        self.entities.iter().filter_map(|(&id, e)| match e {
            Entity::Cover(c) => Some((id, c)),
            _ => None,
        })
    }

    pub fn effects(&self) -> impl Iterator<Item = (EntityId, &Effect)> {
        self.entities.iter().filter_map(|(&id, e)| match e {
            Entity::Effect(fx) => Some((id, fx)),
            _ => None,
        })
    }

    /// Remove every entity of `kind` matching `pred`; returns how many went
    pub fn remove_where(
        &mut self,
        world: &mut dyn World,
        kind: EntityKind,
        pred: impl Fn(&Entity) -> bool,
    ) -> usize {
        let doomed: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| e.kind() == kind && pred(e))
            .map(|(&id, _)| id)
            .collect();
        for &id in &doomed {
            self.remove(world, id);
        }
        doomed.len()
    }

    /// Remove all enemies
    pub fn cleanup_enemies(&mut self, world: &mut dyn World) -> usize {
        let n = self.remove_where(world, EntityKind::Enemy, |_| true);
        if n > 0 {
            log::debug!("Cleaned up {} enemies", n);
        }
        n
    }

    /// Remove all projectiles
    pub fn cleanup_projectiles(&mut self, world: &mut dyn World) -> usize {
        let n = self.remove_where(world, EntityKind::Projectile, |_| true);
        if n > 0 {
            log::debug!("Cleaned up {} projectiles", n);
        }
        n
    }

    /// Remove all cosmetic effects
    pub fn cleanup_effects(&mut self, world: &mut dyn World) -> usize {
        self.remove_where(world, EntityKind::Effect, |_| true)
    }

    /// Remove every dynamic entity (enemies, projectiles, effects); cover stays
    pub fn cleanup_dynamic(&mut self, world: &mut dyn World) -> usize {
        self.cleanup_enemies(world) + self.cleanup_projectiles(world) + self.cleanup_effects(world)
    }
}
