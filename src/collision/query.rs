use glam::Vec3;
use log::debug;
use rayon::prelude::*;

use crate::octree::{Octree, SpatialNode};

use super::{Contact, Ray, SurfaceHit};

/// Point of `node` closest to `reference`. Ties keep the first point in the node.
pub fn nearest_in_leaf(tree: &Octree, node: &SpatialNode, reference: Vec3) -> Option<SurfaceHit> {
    node.points()
        .iter()
        .filter_map(|&point_index| {
            let position = tree.position(point_index)?;
            Some(SurfaceHit {
                point_index,
                position,
                distance: position.distance(reference),
            })
        })
        .reduce(|best, hit| if hit.distance < best.distance { hit } else { best })
}

/// Distance from `position` to the terrain below it, measured to the first point of the
/// first leaf hit by a downward ray.
pub fn altitude(tree: &Octree, position: Vec3) -> Option<SurfaceHit> {
    let node = tree.raycast_first(&Ray::down(position))?;
    let point_index = *node.points().first()?;
    let surface = tree.position(point_index)?;
    Some(SurfaceHit {
        point_index,
        position: surface,
        distance: surface.distance(position),
    })
}

/// Mesh point (and normal, if any) to resolve a collision against when `position` lies inside a leaf
pub fn ground_contact(tree: &Octree, position: Vec3) -> Option<Contact> {
    let node = tree.locate(position)?;
    let point_index = *node.points().first()?;
    Some(Contact {
        point_index,
        position: tree.position(point_index)?,
        normal: tree.mesh().normal(point_index),
    })
}

/// Across every leaf the ray passes through, the point closest to `reference`
/// (typically the camera position when picking with the mouse)
pub fn pick_nearest(tree: &Octree, ray: &Ray, reference: Vec3) -> Option<SurfaceHit> {
    let leaves = tree.raycast_all(ray);
    let res = leaves
        .iter()
        .filter_map(|node| nearest_in_leaf(tree, node, reference))
        .reduce(|best, hit| if hit.distance < best.distance { hit } else { best });
    debug!("Picked {res:?} out of {} leaves", leaves.len());
    res
}

/// [`Octree::locate`] for many points at once. Results keep the input order.
pub fn locate_many<'a>(tree: &'a Octree, points: &[Vec3]) -> Vec<Option<&'a SpatialNode>> {
    points.par_iter().map(|point| tree.locate(*point)).collect()
}

/// [`Octree::raycast_first`] for many rays at once. Results keep the input order.
pub fn raycast_first_many<'a>(tree: &'a Octree, rays: &[Ray]) -> Vec<Option<&'a SpatialNode>> {
    rays.par_iter().map(|ray| tree.raycast_first(ray)).collect()
}
