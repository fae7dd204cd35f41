use super::{
    Aabb, Octree, SpatialNode,
    iter_commons::{StackItem, push_children},
};

/// Leaves whose boxes overlap `region` (inclusive bounds)
pub struct OctreeRegionIterator<'a> {
    stack: Vec<StackItem<'a>>,
    region: Aabb,
}

impl<'a> OctreeRegionIterator<'a> {
    pub(super) fn new(region: Aabb, octree: &'a Octree) -> OctreeRegionIterator<'a> {
        OctreeRegionIterator {
            region,
            stack: vec![StackItem {
                node: &octree.root,
                depth: 0,
            }],
        }
    }
}

impl<'a> Iterator for OctreeRegionIterator<'a> {
    type Item = &'a SpatialNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(item) = self.stack.pop() {
            if !item.node.bounds.intersects(&self.region) {
                continue;
            }
            if item.node.is_leaf() {
                return Some(item.node);
            }
            // Recursion push all children to the stack
            push_children(&mut self.stack, &item);
        }
        None
    }
}
