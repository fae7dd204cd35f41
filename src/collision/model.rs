use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A mesh point picked out of a query result
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceHit {
    pub point_index: u32,
    pub position: Vec3,
    /// Distance from the query's reference position
    pub distance: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub point_index: u32,
    pub position: Vec3,
    /// None if the mesh carries no normals
    pub normal: Option<Vec3>,
}
