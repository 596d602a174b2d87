// Implementations of the tree traits for the basic tree and its walker.

use super::*;
use crate::trees::*;

impl<K, V, T> Default for BasicTree<K, V, T> {
    fn default() -> Self {
        Empty
    }
}

impl<'a, K: Ord, V, T> SomeTreeRef<K, V> for &'a mut BasicTree<K, V, T> {
    type Walker = BasicWalker<'a, K, V, T>;
    fn walker(self) -> Self::Walker {
        BasicWalker::new(self)
    }
}

impl<'a, K: Ord, V, T> SomeWalker<K, V> for BasicWalker<'a, K, V, T> {
    fn go_left(&mut self) -> Result<(), ()> {
        BasicWalker::go_left(self)
    }

    fn go_right(&mut self) -> Result<(), ()> {
        BasicWalker::go_right(self)
    }

    /// If successful, returns which son we were of the node we went up to.
    fn go_up(&mut self) -> Result<Side, ()> {
        BasicWalker::go_up(self)
    }

    fn depth(&self) -> usize {
        BasicWalker::depth(self)
    }

    fn far_left_count(&self) -> usize {
        BasicWalker::far_left_count(self)
    }

    fn far_right_count(&self) -> usize {
        BasicWalker::far_right_count(self)
    }
}

impl<'a, K: Ord, V, T> SomeEntry<K, V> for BasicWalker<'a, K, V, T> {
    fn key(&self) -> Option<&K> {
        self.inner().key()
    }

    fn value(&self) -> Option<&V> {
        self.inner().value()
    }

    fn with_value<F, R>(&mut self, f: F) -> Option<R>
    where
        F: FnOnce(&mut V) -> R,
    {
        self.node_mut().map(|node| f(node.value_mut()))
    }

    fn subtree_size(&self) -> usize {
        self.inner().subtree_size()
    }

    fn left_subtree_size(&self) -> Option<usize> {
        self.node().map(|node| node.left.subtree_size())
    }

    fn right_subtree_size(&self) -> Option<usize> {
        self.node().map(|node| node.right.subtree_size())
    }
}

impl<K: Ord, V, T> SomeEntry<K, V> for BasicTree<K, V, T> {
    fn key(&self) -> Option<&K> {
        self.node().map(|node| node.key())
    }

    fn value(&self) -> Option<&V> {
        self.node().map(|node| node.value())
    }

    fn with_value<F, R>(&mut self, f: F) -> Option<R>
    where
        F: FnOnce(&mut V) -> R,
    {
        self.node_mut().map(|node| f(node.value_mut()))
    }

    fn subtree_size(&self) -> usize {
        BasicTree::subtree_size(self)
    }

    fn left_subtree_size(&self) -> Option<usize> {
        self.node().map(|node| node.left.subtree_size())
    }

    fn right_subtree_size(&self) -> Option<usize> {
        self.node().map(|node| node.right.subtree_size())
    }
}

// A plain unbalanced search tree. Every operation preserves order but
// nothing bounds the height, so this is mostly a baseline for the
// balanced variants to be tested against.
impl<K: Ord, V> SomeTree<K, V> for BasicTree<K, V, ()> {
    type TreeData = ();

    fn new() -> Self {
        Empty
    }

    fn size(&self) -> usize {
        self.subtree_size()
    }

    fn iter(&self) -> iterators::Iter<'_, K, V, ()> {
        iterators::Iter::new(self)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.search(key).map(|node| node.value())
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.search_mut(key).map(|node| node.value_mut())
    }

    fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.insert_node(Box::new(BasicNode::new(key, value)))
            .map(|node| node.into_kv())
    }

    fn insert_dup(&mut self, key: K, value: V) {
        self.insert_node_dup(Box::new(BasicNode::new(key, value)));
    }

    fn remove(&mut self, key: &K) -> Option<(K, V)> {
        self.remove_node(key).map(|node| node.into_kv())
    }

    fn select(&self, index: usize) -> Option<(&K, &V)> {
        BasicTree::select(self, index).map(|node| (node.key(), node.value()))
    }

    fn position(&mut self, key: &K) -> Result<usize, usize> {
        BasicTree::position(self, key)
    }

    fn clear(&mut self) {
        deallocate_iteratively(self);
    }

    fn assert_correctness(&self) {
        assert!(self.is_bst());
        self.assert_correctness_with(|_| {});
    }
}

impl<'a, K: Ord, V> ModifiableTreeRef<K, V> for &'a mut BasicTree<K, V, ()> {
    type ModifiableWalker = BasicWalker<'a, K, V, ()>;
}

impl<'a, K: Ord, V> ModifiableWalker<K, V> for BasicWalker<'a, K, V, ()> {
    fn insert(&mut self, key: K, value: V) -> Option<()> {
        self.insert_with_alg_data(key, value, ())
    }

    fn delete(&mut self) -> Option<(K, V)> {
        self.delete_boxed().map(|node| node.into_kv())
    }
}

impl<K: Ord, V> std::iter::FromIterator<(K, V)> for BasicTree<K, V, ()> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Empty;
        for (key, value) in iter {
            tree.insert_node_dup(Box::new(BasicNode::new(key, value)));
        }
        tree
    }
}

impl<K, V, T> IntoIterator for BasicTree<K, V, T> {
    type Item = (K, V);
    type IntoIter = iterators::IntoIter<K, V, T>;
    fn into_iter(self) -> Self::IntoIter {
        iterators::IntoIter::new(self)
    }
}

impl<'a, K, V, T> IntoIterator for &'a BasicTree<K, V, T> {
    type Item = (&'a K, &'a V);
    type IntoIter = iterators::Iter<'a, K, V, T>;
    fn into_iter(self) -> Self::IntoIter {
        iterators::Iter::new(self)
    }
}
