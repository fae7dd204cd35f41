use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::Ray;

/// Axis aligned bounding box with inclusive bounds on every axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Corners are taken as given. Zero extent on any axis is allowed.
    pub fn new(min: Vec3, max: Vec3) -> Aabb {
        debug_assert!(max.x >= min.x, "Invalid bounds: x axis");
        debug_assert!(max.y >= min.y, "Invalid bounds: y axis");
        debug_assert!(max.z >= min.z, "Invalid bounds: z axis");
        Self { min, max }
    }

    pub fn new_center(center: &Vec3, size: f32) -> Aabb {
        debug_assert!(size >= 0.0, "Size of BB needs to be >= 0");
        let half = Vec3::splat(size / 2.0);
        Self {
            min: *center - half,
            max: *center + half,
        }
    }

    /// Component-wise bounds of all given points. Returns `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Aabb>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Aabb::new(min, max))
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        // Halving first keeps the midpoint finite for extents beyond f32::MAX
        self.min * 0.5 + self.max * 0.5
    }

    pub fn volume(&self) -> f32 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// True if the box has no extent on any axis
    pub fn is_point(&self) -> bool {
        self.min == self.max
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
            && self.min.z <= point.z
            && point.z <= self.max.z
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        // For each axis, check if one box is completely to one side of the other
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.min.z <= other.min.z
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
            && self.max.z >= other.max.z
    }

    /// Slab test restricted to the parameter window `[t_min, t_max]`.
    ///
    /// Returns the surviving `(entry, exit)` interval, or `None` if the ray misses the box
    /// within the window.
    pub fn ray_interval(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<(f32, f32)> {
        ray.slab_interval(self, t_min, t_max)
    }

    pub fn intersects_ray(&self, ray: &Ray, t_min: f32, t_max: f32) -> bool {
        self.ray_interval(ray, t_min, t_max).is_some()
    }

    /// Splits the box at its center into eight octants.
    ///
    /// Order: the four lower octants walking around the vertical split starting at `min`
    /// (-x-z, +x-z, +x+z, -x+z), then the four upper octants in the same order.
    /// Child corners are taken from the parent's own coordinates, so the octants tile the
    /// parent exactly.
    pub fn subdivide_eight(&self) -> [Aabb; 8] {
        let center = self.center();
        let xs = [(self.min.x, center.x), (center.x, self.max.x)];
        let ys = [(self.min.y, center.y), (center.y, self.max.y)];
        let zs = [(self.min.z, center.z), (center.z, self.max.z)];
        // (x half, z half) walking around the floor
        const FLOOR: [(usize, usize); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

        std::array::from_fn(|i| {
            let (x, y, z) = (xs[FLOOR[i % 4].0], ys[i / 4], zs[FLOOR[i % 4].1]);
            Aabb::new(Vec3::new(x.0, y.0, z.0), Vec3::new(x.1, y.1, z.1))
        })
    }
}
