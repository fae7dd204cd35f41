//! Static octree over the vertices of a triangle mesh, with point containment and ray
//! queries for altitude, collision and picking.

pub mod collision;
pub mod config;
pub mod mesh;
pub mod octree;
pub mod stats;
pub mod terrain;

pub use collision::{Ray, RayRange};
pub use config::{ConfigError, OctreeConfig};
pub use mesh::{MeshData, MeshError};
pub use octree::{Aabb, Octree, SpatialNode, WalkMode};
