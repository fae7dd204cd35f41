use super::{
    Octree, SpatialNode,
    iter_commons::{StackItem, push_children},
};

/// Pre-order walk over every node with a depth below `levels`. Parents come before their
/// children, siblings in stored order.
pub struct OctreeNodeIterator<'a> {
    stack: Vec<StackItem<'a>>,
    levels: u32,
}

impl<'a> OctreeNodeIterator<'a> {
    pub(super) fn new(levels: u32, octree: &'a Octree) -> OctreeNodeIterator<'a> {
        OctreeNodeIterator {
            levels,
            stack: vec![StackItem {
                node: &octree.root,
                depth: 0,
            }],
        }
    }
}

impl<'a> Iterator for OctreeNodeIterator<'a> {
    type Item = (u32, &'a SpatialNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(item) = self.stack.pop() {
            if item.depth >= self.levels {
                continue;
            }
            push_children(&mut self.stack, &item);
            return Some((item.depth, item.node));
        }
        None
    }
}
