use super::node::SpatialNode;

pub(super) struct StackItem<'a> {
    pub(super) node: &'a SpatialNode,
    pub(super) depth: u32,
}

// Pushes children so that popping the stack visits them in their stored order
pub(super) fn push_children<'a>(stack: &mut Vec<StackItem<'a>>, item: &StackItem<'a>) {
    for child in item.node.children.iter().rev() {
        stack.push(StackItem {
            node: child,
            depth: item.depth + 1,
        });
    }
}
