use glam::Vec3;

use crate::collision::{Ray, RayRange};

use super::Aabb;

/// Node of a built [`Octree`](super::Octree). Never mutated after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialNode {
    pub(super) bounds: Aabb,
    // Indices into the mesh vertex array, taken from the index buffer
    pub(super) points: Vec<u32>,
    pub(super) children: Vec<SpatialNode>,
}

impl SpatialNode {
    pub(super) fn new(bounds: Aabb, points: Vec<u32>) -> Self {
        Self {
            bounds,
            points,
            children: vec![],
        }
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn points(&self) -> &[u32] {
        &self.points
    }

    pub fn children(&self) -> &[SpatialNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Splits this node until `max_levels` is reached. Children without points are dropped,
    /// children holding more than one point are split further.
    pub(super) fn subdivide(&mut self, positions: &[Vec3], max_levels: u32, level: u32) {
        // A point sized box cannot separate its points any further
        if level >= max_levels || self.bounds.is_point() {
            return;
        }

        let child_boxes = self.bounds.subdivide_eight();
        for (i, child_box) in child_boxes.iter().enumerate() {
            // Flat parents produce identical octant pairs; keep only the first of each
            if child_boxes[..i].contains(child_box) {
                continue;
            }
            let points: Vec<u32> = self
                .points
                .iter()
                .copied()
                .filter(|&index| child_box.contains_point(positions[index as usize]))
                .collect();
            if points.is_empty() {
                continue;
            }

            let mut child = SpatialNode::new(*child_box, points);
            if child.points.len() > 1 {
                child.subdivide(positions, max_levels, level + 1);
            }
            self.children.push(child);
        }
    }

    pub(super) fn locate(&self, point: Vec3) -> Option<&SpatialNode> {
        if !self.bounds.contains_point(point) {
            return None;
        }
        if self.is_leaf() {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.locate(point))
    }

    pub(super) fn raycast_first(&self, ray: &Ray, range: RayRange) -> Option<&SpatialNode> {
        if !self.bounds.intersects_ray(ray, range.t_min, range.t_max) {
            return None;
        }
        if self.is_leaf() {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.raycast_first(ray, range))
    }

    pub(super) fn raycast_all<'a>(
        &'a self,
        ray: &Ray,
        range: RayRange,
        res: &mut Vec<&'a SpatialNode>,
    ) {
        if !self.bounds.intersects_ray(ray, range.t_min, range.t_max) {
            return;
        }
        // Exit case
        if self.is_leaf() {
            res.push(self);
            return;
        }

        // Recursion
        for child in &self.children {
            child.raycast_all(ray, range, res);
        }
    }
}
