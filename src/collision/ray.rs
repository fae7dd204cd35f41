use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::octree::Aabb;

/// Query ray. The direction does not need to be normalized; parameters returned by the
/// slab test are in units of `direction`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Ray {
        Self { origin, direction }
    }

    /// Ray pointing straight down (-y), used for altitude checks
    pub fn down(origin: Vec3) -> Ray {
        Self::new(origin, Vec3::NEG_Y)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Returns `(entry, exit)` of the ray through `aabb`, clipped to `[t_min, t_max]`
    pub(crate) fn slab_interval(&self, aabb: &Aabb, t_min: f32, t_max: f32) -> Option<(f32, f32)> {
        // Parameter interval of a single axis. `None` if a parallel ray lies outside the slab.
        fn slab(min: f32, max: f32, origin: f32, direction: f32) -> Option<(f32, f32)> {
            if direction.abs() > f32::EPSILON {
                let inv_d = 1.0 / direction;
                let mut t0 = (min - origin) * inv_d;
                let mut t1 = (max - origin) * inv_d;
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                Some((t0, t1))
            } else if origin < min || origin > max {
                None
            } else {
                // Parallel and inside: this axis adds no constraint
                Some((f32::NEG_INFINITY, f32::INFINITY))
            }
        }

        let mut interval = (t_min, t_max);
        for axis in 0..3 {
            let (near, far) = slab(
                aabb.min[axis],
                aabb.max[axis],
                self.origin[axis],
                self.direction[axis],
            )?;
            interval = (interval.0.max(near), interval.1.min(far));
            if interval.0 > interval.1 {
                return None;
            }
        }
        Some(interval)
    }
}

/// Parameter window a ray query is evaluated in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RayRange {
    pub t_min: f32,
    pub t_max: f32,
}

impl RayRange {
    /// Fixed two sided window for callers relying on a hard-coded world span
    pub const LEGACY: RayRange = RayRange {
        t_min: -1000.0,
        t_max: 1000.0,
    };

    pub fn new(t_min: f32, t_max: f32) -> RayRange {
        debug_assert!(t_min <= t_max, "Invalid ray range {t_min}..{t_max}");
        Self { t_min, t_max }
    }

    /// Only hits in front of the origin, up to `t_max`
    pub fn forward(t_max: f32) -> RayRange {
        Self::new(0.0, t_max)
    }

    /// Smallest symmetric window `[-d, d]` that contains every parameter at which `ray`
    /// can touch `bounds`.
    pub fn spanning(bounds: &Aabb, ray: &Ray) -> RayRange {
        let speed = ray.direction.length();
        if speed <= f32::EPSILON {
            // A stationary ray only "hits" what contains its origin
            return Self::new(0.0, 0.0);
        }
        let half_diagonal = bounds.size().length() / 2.0;
        let reach = ((ray.origin - bounds.center()).length() + half_diagonal) / speed;
        Self::new(-reach, reach)
    }
}
