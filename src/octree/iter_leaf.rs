use super::{
    Octree, SpatialNode,
    iter_commons::{StackItem, push_children},
};

/// Visits only the leaves, left to right, yielding `(depth, leaf)`
pub struct OctreeLeafIterator<'a> {
    stack: Vec<StackItem<'a>>,
}

impl<'a> OctreeLeafIterator<'a> {
    pub(super) fn new(octree: &'a Octree) -> OctreeLeafIterator<'a> {
        OctreeLeafIterator {
            stack: vec![StackItem {
                node: &octree.root,
                depth: 0,
            }],
        }
    }
}

impl<'a> Iterator for OctreeLeafIterator<'a> {
    type Item = (u32, &'a SpatialNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(item) = self.stack.pop() {
            if item.node.is_leaf() {
                return Some((item.depth, item.node));
            }
            push_children(&mut self.stack, &item);
        }
        None
    }
}
