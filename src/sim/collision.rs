//! Collision queries for straight-line shots
//!
//! Player beams are rays against enemy spheres; enemy projectiles are short
//! per-tick segments against cover boxes and a sphere around the player's head.
//! A segment is a ray plus a length limit on the returned distance.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A ray with a unit-length direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing the direction (falls back to -Z)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Distance along `ray` to the first intersection with a sphere
///
/// A ray starting inside the sphere hits at t = 0.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let c = oc.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let b = oc.dot(ray.direction);
    if b > 0.0 {
        // Pointing away and outside
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some(-b - disc.sqrt())
}

/// Distance along `ray` to an axis-aligned box, limited to `max_t`
///
/// Slab test; a ray starting inside the box hits at t = 0.
pub fn ray_aabb(ray: &Ray, center: Vec3, half_extents: Vec3, max_t: f32) -> Option<f32> {
    let min = center - half_extents;
    let max = center + half_extents;
    let mut t_enter = 0.0_f32;
    let mut t_exit = max_t;

    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        if d.abs() < 1e-8 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    Some(t_enter)
}
