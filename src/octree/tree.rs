use glam::Vec3;
use log::{debug, info, warn};
use std::time::Instant;

use crate::{
    collision::{Ray, RayRange},
    config::OctreeConfig,
    mesh::MeshData,
    stats::TreeStats,
};

use super::{
    Aabb, OctreeLeafIterator, OctreeNodeIterator, OctreeRegionIterator, SpatialNode,
};

pub const DEFAULT_MAX_LEVELS: u32 = 8;
/// Past this depth f32 boxes around typical terrain stop shrinking in any useful way
pub const MAX_SUPPORTED_LEVELS: u32 = 16;

/// How [`Octree::walk`] selects the nodes it visits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkMode {
    /// Every node with a depth below the given level count, parents first
    DepthLimited(u32),
    /// Only leaf nodes
    Leaves,
}

/// Static octree over the points of a triangle mesh.
///
/// Built once from the mesh index buffer and never modified afterwards. Rebuilding means
/// creating a new tree.
#[derive(Clone, Debug)]
pub struct Octree {
    pub(super) root: SpatialNode,
    // Source data the tree was built from. Node point lists index into its vertices.
    mesh: MeshData,
    max_levels: u32,
    // Overrides the per-ray window derived from the root bounds
    ray_range: Option<RayRange>,
}

impl Octree {
    pub fn create(mesh: MeshData, max_levels: u32) -> Self {
        let start = Instant::now();
        if max_levels > MAX_SUPPORTED_LEVELS {
            warn!("Building octree with {max_levels} levels, more than the supported {MAX_SUPPORTED_LEVELS}");
        }

        let root = match Aabb::from_points(mesh.vertices().iter().copied()) {
            Some(bounds) if !mesh.indices().is_empty() => {
                let mut root = SpatialNode::new(bounds, mesh.indices().to_vec());
                if root.points.len() > 1 {
                    root.subdivide(mesh.vertices(), max_levels, 0);
                }
                root
            }
            _ => {
                warn!("Building octree from an empty mesh. All queries will miss.");
                SpatialNode::new(Aabb::new(Vec3::ZERO, Vec3::ZERO), vec![])
            }
        };

        let tree = Self {
            root,
            mesh,
            max_levels,
            ray_range: None,
        };
        let stats = tree.stats();
        info!(
            "Built octree over {} point references in {:.2?}: {} nodes, {} leaves, depth {}, largest leaf {} points. Covering region {:?}",
            stats.point_refs,
            start.elapsed(),
            stats.node_count,
            stats.leaf_count,
            stats.max_depth,
            stats.max_leaf_points,
            tree.bounds(),
        );
        tree
    }

    pub fn with_config(mesh: MeshData, config: &OctreeConfig) -> Self {
        let mut tree = Self::create(mesh, config.max_levels);
        tree.ray_range = config.ray_range;
        tree
    }

    pub fn root(&self) -> &SpatialNode {
        &self.root
    }

    pub fn bounds(&self) -> &Aabb {
        &self.root.bounds
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn max_levels(&self) -> u32 {
        self.max_levels
    }

    /// Position of the vertex a node point refers to
    pub fn position(&self, point_index: u32) -> Option<Vec3> {
        self.mesh.vertex(point_index)
    }

    /// Parameter window used by [`Octree::raycast_first`] and [`Octree::raycast_all`]
    pub fn ray_range_for(&self, ray: &Ray) -> RayRange {
        self.ray_range
            .unwrap_or_else(|| RayRange::spanning(self.bounds(), ray))
    }

    /// Leaf whose box contains `point`. Subtrees whose box does not contain the point are skipped.
    pub fn locate(&self, point: Vec3) -> Option<&SpatialNode> {
        if self.root.points.is_empty() {
            return None;
        }
        let res = self.root.locate(point);
        debug!("locate {point}: {:?}", res.map(|n| n.bounds));
        res
    }

    /// First leaf, in child order, whose box the ray passes through
    pub fn raycast_first(&self, ray: &Ray) -> Option<&SpatialNode> {
        self.raycast_first_in(ray, self.ray_range_for(ray))
    }

    pub fn raycast_first_in(&self, ray: &Ray, range: RayRange) -> Option<&SpatialNode> {
        if self.root.points.is_empty() {
            return None;
        }
        self.root.raycast_first(ray, range)
    }

    /// Every leaf whose box the ray passes through, in depth first order
    pub fn raycast_all(&self, ray: &Ray) -> Vec<&SpatialNode> {
        self.raycast_all_in(ray, self.ray_range_for(ray))
    }

    pub fn raycast_all_in(&self, ray: &Ray, range: RayRange) -> Vec<&SpatialNode> {
        let mut res = vec![];
        if !self.root.points.is_empty() {
            self.root.raycast_all(ray, range, &mut res);
        }
        debug!("raycast {ray:?} hit {} leaves", res.len());
        res
    }

    /// Pre-order iterator yielding `(depth, node)` for every node with depth below `levels`
    pub fn iter_nodes(&self, levels: u32) -> OctreeNodeIterator<'_> {
        OctreeNodeIterator::new(levels, self)
    }

    /// Leaves with their depth, in child order
    pub fn iter_leaves(&self) -> OctreeLeafIterator<'_> {
        OctreeLeafIterator::new(self)
    }

    /// Leaves overlapping `region`
    pub fn iter_region(&self, region: Aabb) -> OctreeRegionIterator<'_> {
        OctreeRegionIterator::new(region, self)
    }

    /// Calls `visit` with each selected node and its depth
    pub fn walk<'a, F>(&'a self, mode: WalkMode, mut visit: F)
    where
        F: FnMut(&'a SpatialNode, u32),
    {
        match mode {
            WalkMode::DepthLimited(levels) => {
                for (depth, node) in self.iter_nodes(levels) {
                    visit(node, depth);
                }
            }
            WalkMode::Leaves => {
                for (depth, node) in self.iter_leaves() {
                    visit(node, depth);
                }
            }
        }
    }

    pub fn stats(&self) -> TreeStats {
        fn visit(node: &SpatialNode, depth: u32, stats: &mut TreeStats) {
            stats.node_count += 1;
            stats.max_depth = stats.max_depth.max(depth);
            if node.is_leaf() {
                stats.leaf_count += 1;
                stats.max_leaf_points = stats.max_leaf_points.max(node.points.len());
            }
            for child in &node.children {
                visit(child, depth + 1, stats);
            }
        }

        let mut stats = TreeStats {
            point_refs: self.root.points.len(),
            ..Default::default()
        };
        visit(&self.root, 0, &mut stats);
        stats
    }
}

/// Outline color (rgb) for boxes at `level`, wrapping after ten levels
pub fn level_color(level: u32) -> Vec3 {
    const COLORS: [Vec3; 10] = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.5, 0.0, 0.5),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, 0.65, 0.0),
        Vec3::new(0.65, 0.16, 0.16),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.75, 0.8),
    ];
    COLORS[level as usize % COLORS.len()]
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::{Octree, WalkMode, level_color};
    use crate::{
        collision::{Ray, RayRange},
        config::OctreeConfig,
        mesh::MeshData,
        octree::SpatialNode,
        terrain::HeightmapTerrain,
    };

    fn terrain_tree(levels: u32) -> Octree {
        let mesh = HeightmapTerrain::new(16, 2.0, 99).generate().unwrap();
        Octree::create(mesh, levels)
    }

    fn max_depth(node: &SpatialNode) -> u32 {
        node.children()
            .iter()
            .map(|c| 1 + max_depth(c))
            .max()
            .unwrap_or(0)
    }

    fn all_nodes(node: &SpatialNode) -> Vec<&SpatialNode> {
        let mut res = vec![node];
        for child in node.children() {
            res.extend(all_nodes(child));
        }
        res
    }

    #[test]
    fn test_every_point_is_located() {
        let tree = terrain_tree(6);
        for &index in tree.mesh().indices() {
            let position = tree.position(index).unwrap();
            let leaf = tree
                .locate(position)
                .unwrap_or_else(|| panic!("Point {index} at {position} not found"));
            assert!(leaf.is_leaf());
            assert!(leaf.points().contains(&index));
        }
    }

    #[test]
    fn test_every_point_is_held_by_a_containing_leaf() {
        let tree = terrain_tree(6);
        for &index in tree.mesh().indices() {
            let position = tree.position(index).unwrap();
            assert!(
                tree.iter_leaves()
                    .any(|(_, leaf)| leaf.points().contains(&index)
                        && leaf.bounds().contains_point(position)),
                "Point {index} got lost during subdivision"
            );
        }
    }

    #[test]
    fn test_depth_bound() {
        for levels in 0..6 {
            let tree = terrain_tree(levels);
            assert!(max_depth(tree.root()) <= levels, "levels {levels}");
            assert_eq!(tree.stats().max_depth, max_depth(tree.root()));
        }
    }

    #[test]
    fn test_no_empty_nodes() {
        let tree = terrain_tree(8);
        for node in all_nodes(tree.root()) {
            assert!(!node.points().is_empty());
            assert!(node.children().len() <= 8);
            for child in node.children() {
                assert!(node.bounds().contains(child.bounds()));
            }
        }
    }

    #[test]
    fn test_root_holds_every_index() {
        let tree = terrain_tree(4);
        assert_eq!(tree.root().points(), tree.mesh().indices());
        let vertices = tree.mesh().vertices();
        for v in vertices {
            assert!(tree.bounds().contains_point(*v));
        }
    }

    #[test]
    fn test_single_point_mesh_is_root_leaf() {
        for levels in [0, 1, 8] {
            let mesh = MeshData::new(vec![Vec3::new(3.0, 4.0, 5.0)], vec![0]).unwrap();
            let tree = Octree::create(mesh, levels);
            assert!(tree.root().is_leaf());
            assert_eq!(tree.root().points(), &[0]);
            assert!(tree.bounds().is_point());
            assert!(tree.locate(Vec3::new(3.0, 4.0, 5.0)).is_some());
        }
    }

    #[test]
    fn test_repeated_single_vertex_does_not_split() {
        let mesh = MeshData::new(vec![Vec3::ONE], vec![0, 0, 0]).unwrap();
        let tree = Octree::create(mesh, 8);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().points(), &[0, 0, 0]);
    }

    #[test]
    fn test_flat_mesh_does_not_duplicate_octants() {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 10.0),
        ];
        let mesh = MeshData::new(vertices, vec![0, 1, 2, 2, 3, 0]).unwrap();
        let tree = Octree::create(mesh, 3);
        assert_eq!(tree.root().children().len(), 4);
    }

    #[test]
    fn test_huge_finite_extent_builds() {
        let vertices = vec![Vec3::new(-3e38, 0.0, 0.0), Vec3::new(3e38, 1.0, 1.0)];
        let mesh = MeshData::new(vertices, vec![0, 1]).unwrap();
        let tree = Octree::create(mesh, 4);
        assert_eq!(tree.root().children().len(), 2);
        for &index in tree.mesh().indices() {
            let leaf = tree.locate(tree.position(index).unwrap()).unwrap();
            assert!(leaf.points().contains(&index));
        }
    }

    #[test]
    fn test_empty_mesh() {
        let tree = Octree::create(MeshData::default(), 8);
        assert!(tree.root().is_leaf());
        assert!(tree.root().points().is_empty());
        assert!(tree.bounds().is_point());
        assert!(tree.locate(Vec3::ZERO).is_none());
        let ray = Ray::down(Vec3::new(0.0, 10.0, 0.0));
        assert!(tree.raycast_first(&ray).is_none());
        assert!(tree.raycast_all(&ray).is_empty());
    }

    #[test]
    fn test_outside_queries_miss() {
        let tree = terrain_tree(6);
        let above = tree.bounds().max + Vec3::splat(5.0);
        assert!(tree.locate(above).is_none());
        // Parallel to y, outside the x/z footprint
        let ray = Ray::down(Vec3::new(tree.bounds().max.x + 1.0, 100.0, 0.0));
        assert!(tree.raycast_first(&ray).is_none());
        assert!(tree.raycast_all(&ray).is_empty());
    }

    #[test]
    fn test_raycast_first_is_among_all() {
        let tree = terrain_tree(6);
        let leaves: Vec<_> = tree.iter_leaves().map(|(_, leaf)| leaf).collect();
        let targets = [
            leaves[0].bounds().center(),
            leaves[leaves.len() / 2].bounds().center(),
            leaves[leaves.len() - 1].bounds().center(),
        ];
        let vertex = tree.position(tree.mesh().indices()[40]).unwrap();
        let mut rays = vec![Ray::down(vertex + Vec3::new(0.0, 50.0, 0.0))];
        for target in targets {
            let offset = Vec3::new(-40.0, 30.0, -25.0);
            rays.push(Ray::new(target + offset, -offset));
            rays.push(Ray::down(target + Vec3::new(0.0, 50.0, 0.0)));
        }

        for ray in rays {
            let first = tree.raycast_first(&ray).unwrap();
            let all = tree.raycast_all(&ray);
            assert!(all.iter().any(|n| std::ptr::eq(*n, first)), "{ray:?}");
            assert!(std::ptr::eq(all[0], first));
        }
    }

    #[test]
    fn test_queries_are_idempotent() {
        let tree = terrain_tree(6);
        let point = tree.position(tree.mesh().indices()[17]).unwrap();
        let ray = Ray::down(point + Vec3::new(0.0, 20.0, 0.0));
        assert_eq!(tree.locate(point), tree.locate(point));
        assert_eq!(tree.raycast_first(&ray), tree.raycast_first(&ray));
        assert_eq!(tree.raycast_all(&ray), tree.raycast_all(&ray));
    }

    #[test]
    fn test_legacy_window_misses_far_origin() {
        let tree = terrain_tree(4);
        let ray = Ray::down(tree.bounds().center() + Vec3::new(0.0, 5000.0, 0.0));
        assert!(tree.raycast_first_in(&ray, RayRange::LEGACY).is_none());
        assert!(tree.raycast_first(&ray).is_some());
    }

    #[test]
    fn test_configured_range_overrides_derived_one() {
        let mesh = HeightmapTerrain::new(8, 2.0, 7).generate().unwrap();
        let config = OctreeConfig {
            max_levels: 4,
            ray_range: Some(RayRange::forward(1.0)),
        };
        let tree = Octree::with_config(mesh, &config);
        assert_eq!(tree.max_levels(), 4);
        let ray = Ray::down(tree.bounds().center() + Vec3::new(0.0, 500.0, 0.0));
        assert!(tree.raycast_first(&ray).is_none());
    }

    #[test]
    fn test_walk_modes() {
        let tree = terrain_tree(5);
        let mut leaves = vec![];
        tree.walk(WalkMode::Leaves, |node, depth| leaves.push((depth, node)));
        let iterated: Vec<_> = tree.iter_leaves().collect();
        assert_eq!(leaves, iterated);
        assert_eq!(leaves.len(), tree.stats().leaf_count);
        assert!(leaves.iter().all(|(_, node)| node.is_leaf()));
        // The deepest node is always a leaf
        let deepest = leaves.iter().map(|(depth, _)| *depth).max();
        assert_eq!(deepest, Some(tree.stats().max_depth));

        let mut depths = vec![];
        tree.walk(WalkMode::DepthLimited(3), |_, depth| depths.push(depth));
        assert_eq!(depths[0], 0);
        assert!(depths.iter().all(|d| *d < 3));
        let expected = 1
            + tree.root().children().len()
            + tree
                .root()
                .children()
                .iter()
                .map(|c| c.children().len())
                .sum::<usize>();
        assert_eq!(depths.len(), expected);
    }

    #[test]
    fn test_stats() {
        let tree = terrain_tree(5);
        let stats = tree.stats();
        assert_eq!(stats.point_refs, tree.mesh().indices().len());
        assert_eq!(stats.node_count, all_nodes(tree.root()).len());
        assert!(stats.leaf_count > 1);
        assert!(stats.leaf_count < stats.node_count);
    }

    #[test]
    fn test_level_color_wraps() {
        assert_eq!(level_color(0), level_color(10));
        assert_ne!(level_color(0), level_color(1));
    }
}
