//! In-order iterators over the basic tree, borrowing and owning.
//! Both keep an explicit stack of the left spine instead of recursing, so
//! iteration works on arbitrarily deep trees.

use super::*;

/// A borrowing in-order iterator, yielding the key-value pairs in ascending
/// key order.
pub struct Iter<'a, K, V, T> {
    stack: Vec<&'a BasicNode<K, V, T>>,
}

impl<'a, K, V, T> Iter<'a, K, V, T> {
    pub(crate) fn new(tree: &'a BasicTree<K, V, T>) -> Self {
        let mut iter = Iter { stack: vec![] };
        iter.push_spine(tree);
        iter
    }

    // push the whole left spine of the subtree
    fn push_spine(&mut self, mut tree: &'a BasicTree<K, V, T>) {
        while let Some(node) = tree.node() {
            self.stack.push(node);
            tree = &node.left;
        }
    }
}

impl<'a, K, V, T> Iterator for Iter<'a, K, V, T> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_spine(&node.right);
        Some((node.key(), node.value()))
    }
}

/// An owning in-order iterator, consuming the tree.
pub struct IntoIter<K, V, T> {
    stack: Vec<Box<BasicNode<K, V, T>>>,
}

impl<K, V, T> IntoIter<K, V, T> {
    pub(crate) fn new(tree: BasicTree<K, V, T>) -> Self {
        let mut iter = IntoIter { stack: vec![] };
        iter.push_spine(tree);
        iter
    }

    fn push_spine(&mut self, mut tree: BasicTree<K, V, T>) {
        while let Some(mut node) = tree.into_node_boxed() {
            tree = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<K, V, T> Iterator for IntoIter<K, V, T> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.push_spine(node.right.take());
        Some(node.into_kv())
    }
}
