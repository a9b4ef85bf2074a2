//! World collaborator
//!
//! The scene graph lives outside the core. The core places and removes visuals
//! keyed by [`EntityId`], pushes transforms, and asks the world for ray hits,
//! the player's head position and the gun controller's aim ray.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;

use crate::sim::collision::{Ray, ray_aabb, ray_sphere};
use crate::sim::{EntityId, Hand};
use crate::tuning::{EnemyKind, GunConfig};

/// What the world should draw for an entity
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Enemy {
        kind: EnemyKind,
        position: Vec3,
        radius: f32,
    },
    Projectile {
        position: Vec3,
        radius: f32,
    },
    Cover {
        position: Vec3,
        half_extents: Vec3,
        breakable: bool,
    },
    /// Debris burst; the world animates each particle from `position` along
    /// its velocity until the effect is removed
    Explosion {
        position: Vec3,
        particles: Vec<Vec3>,
    },
    Beam {
        from: Vec3,
        to: Vec3,
    },
}

/// Scene operations the core depends on
pub trait World {
    fn add_entity(&mut self, id: EntityId, visual: Visual);
    fn remove_entity(&mut self, id: EntityId);
    /// Move/orient an existing visual; yaw and pitch in radians
    fn set_transform(&mut self, id: EntityId, position: Vec3, yaw: f32, pitch: f32);
    /// Toggle the white hit flash on an enemy visual
    fn set_flash(&mut self, id: EntityId, on: bool);
    /// Nearest hittable visual along the ray
    fn cast_ray(&self, ray: &Ray) -> Option<EntityId>;
    fn player_position(&self) -> Vec3;
    /// World-space aim ray of the controller in `hand`
    fn controller_ray(&self, hand: Hand) -> Ray;
    /// Attach (or re-attach) the gun model with its transform offsets
    fn equip(&mut self, hand: Hand, gun: &GunConfig);
}

/// In-memory world used by the headless driver and by tests
#[derive(Debug, Clone)]
pub struct HeadlessWorld {
    pub visuals: BTreeMap<EntityId, Visual>,
    pub flashing: BTreeSet<EntityId>,
    pub player: Vec3,
    pub left_ray: Ray,
    pub right_ray: Ray,
    /// Hand and gun name of the last equip call
    pub equipped: Option<(Hand, String)>,
}

impl Default for HeadlessWorld {
    fn default() -> Self {
        let player = Vec3::new(0.0, 1.6, 0.0);
        Self {
            visuals: BTreeMap::new(),
            flashing: BTreeSet::new(),
            player,
            left_ray: Ray::new(player + Vec3::new(-0.2, -0.4, -0.3), Vec3::NEG_Z),
            right_ray: Ray::new(player + Vec3::new(0.2, -0.4, -0.3), Vec3::NEG_Z),
            equipped: None,
        }
    }
}

impl HeadlessWorld {
    /// Point a hand's controller at a target
    pub fn aim(&mut self, hand: Hand, target: Vec3) {
        let ray = match hand {
            Hand::Left => &mut self.left_ray,
            Hand::Right => &mut self.right_ray,
        };
        *ray = Ray::new(ray.origin, target - ray.origin);
    }

    pub fn count_where(&self, pred: impl Fn(&Visual) -> bool) -> usize {
        self.visuals.values().filter(|v| pred(v)).count()
    }
}

impl World for HeadlessWorld {
    fn add_entity(&mut self, id: EntityId, visual: Visual) {
        self.visuals.insert(id, visual);
    }

    fn remove_entity(&mut self, id: EntityId) {
        self.visuals.remove(&id);
        self.flashing.remove(&id);
    }

    fn set_transform(&mut self, id: EntityId, new_pos: Vec3, _yaw: f32, _pitch: f32) {
        match self.visuals.get_mut(&id) {
            Some(Visual::Enemy { position, .. })
            | Some(Visual::Projectile { position, .. })
            | Some(Visual::Cover { position, .. })
            | Some(Visual::Explosion { position, .. }) => *position = new_pos,
            _ => {}
        }
    }

    fn set_flash(&mut self, id: EntityId, on: bool) {
        if on {
            self.flashing.insert(id);
        } else {
            self.flashing.remove(&id);
        }
    }

    fn cast_ray(&self, ray: &Ray) -> Option<EntityId> {
        self.visuals
            .iter()
            .filter_map(|(&id, visual)| {
                let t = match visual {
                    Visual::Enemy {
                        position, radius, ..
                    } => ray_sphere(ray, *position, *radius),
                    Visual::Cover {
                        position,
                        half_extents,
                        ..
                    } => ray_aabb(ray, *position, *half_extents, f32::MAX),
                    _ => None,
                };
                t.map(|t| (id, t))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(id, _)| id)
    }

    fn player_position(&self) -> Vec3 {
        self.player
    }

    fn controller_ray(&self, hand: Hand) -> Ray {
        match hand {
            Hand::Left => self.left_ray,
            Hand::Right => self.right_ray,
        }
    }

    fn equip(&mut self, hand: Hand, gun: &GunConfig) {
        self.equipped = Some((hand, gun.name.clone()));
    }
}
