//! Deallocating a tree by the compiler-generated drop code recurses on the
//! tree's structure, which overflows the stack on very deep trees. This
//! module frees a tree with an explicit stack instead.

use super::*;

/// Empties the tree, freeing every node without recursing.
pub fn deallocate_iteratively<K, V, T>(tree: &mut BasicTree<K, V, T>) {
    let mut stack = vec![];
    if let Some(node) = tree.take().into_node_boxed() {
        stack.push(node);
    }
    while let Some(mut node) = stack.pop() {
        if let Some(left) = node.left.take().into_node_boxed() {
            stack.push(left);
        }
        if let Some(right) = node.right.take().into_node_boxed() {
            stack.push(right);
        }
        // the node itself is freed here, both sons already detached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deallocates_a_deep_chain() {
        // built as a chain on purpose, depth equals size
        let mut tree: BasicTree<u64, ()> = Empty;
        let mut slot = &mut tree;
        for x in 0..200_000u64 {
            *slot = BasicTree::from_node(BasicNode::new(x, ()));
            slot = &mut slot.node_mut().unwrap().right;
        }
        deallocate_iteratively(&mut tree);
        assert!(tree.is_empty());
    }
}
