mod bbs;
mod iter_commons;
mod iter_leaf;
mod iter_node;
mod iter_region;
mod node;
mod tree;

pub use bbs::Aabb;
pub use iter_leaf::OctreeLeafIterator;
pub use iter_node::OctreeNodeIterator;
pub use iter_region::OctreeRegionIterator;
pub use node::SpatialNode;
pub use tree::DEFAULT_MAX_LEVELS;
pub use tree::MAX_SUPPORTED_LEVELS;
pub use tree::Octree;
pub use tree::WalkMode;
pub use tree::level_color;
