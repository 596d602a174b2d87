//! Implementation of splay trees.
//!
//! Splay trees store no per-node bookkeeping at all. Instead, every access
//! moves the accessed node to the root by rotations, which keeps the tree
//! balanced in an amortized sense: any sequence of `m` operations on a tree
//! of size `n` takes `O(m*log n)` time, even though a single operation may
//! take linear time.

use super::basic_tree::*;
use super::*;

/// A splay tree storing key-value pairs ordered by key.
///
/// Lookups restructure the tree, which is why the lookup methods take
/// `&mut self`. Recently accessed keys are kept near the root, so skewed
/// access patterns are served faster than by the worst-case-balanced trees.
#[derive(Clone)]
pub struct SplayTree<K, V> {
    tree: BasicTree<K, V, ()>,
}

impl<K, V> SplayTree<K, V> {
    /// Creates an empty [`SplayTree`].
    pub fn new() -> Self {
        SplayTree {
            tree: BasicTree::Empty,
        }
    }

    /// Consumes the tree and returns the underlying basic tree.
    pub fn into_inner(self) -> BasicTree<K, V, ()> {
        self.tree
    }

    /// Wraps an existing basic tree. Any search tree is a legal splay tree,
    /// so this cannot break any invariant.
    pub fn from_inner(tree: BasicTree<K, V, ()>) -> Self {
        SplayTree { tree }
    }
}

impl<K: std::fmt::Display, V> SplayTree<K, V> {
    /// Writes the two-line text dump of the tree: the keys in pre-order on
    /// the first line, the subtree sizes in in-order on the second.
    pub fn write_dump<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.tree.write_dump(writer)
    }
}

impl<K, V> Default for SplayTree<K, V> {
    fn default() -> Self {
        SplayTree::new()
    }
}

/// Joins two trees, where all of `left`'s keys are smaller than all of
/// `right`'s, by splaying the greatest node of `left` to its root and
/// hanging `right` off it.
fn join_splay<K: Ord, V>(left: BasicTree<K, V, ()>, right: BasicTree<K, V, ()>) -> BasicTree<K, V, ()> {
    let mut left = left;
    if left.is_empty() {
        return right;
    }
    {
        let mut walker = SplayWalker {
            walker: BasicWalker::new(&mut left),
        };
        while walker.walker.go_right().is_ok() {}
        // dropping the walker splays the greatest node to the root
    }
    let root = left.node_mut().unwrap();
    debug_assert!(root.right.is_empty());
    root.right = right;
    root.rebuild();
    left
}

impl<K: Ord, V> SomeTree<K, V> for SplayTree<K, V> {
    type TreeData = ();

    fn new() -> Self {
        SplayTree::new()
    }

    fn size(&self) -> usize {
        self.tree.subtree_size()
    }

    fn iter(&self) -> iterators::Iter<'_, K, V, ()> {
        iterators::Iter::new(&self.tree)
    }

    /// Searches for `key` and splays: afterwards the node holding `key`, or
    /// the last node on the search path if `key` is absent, is the root.
    fn get(&mut self, key: &K) -> Option<&V> {
        let walker = methods::search(&mut *self, key);
        let tree = walker.into_inner().root_into_ref();
        let node = tree.node()?;
        if node.key() == key {
            Some(node.value())
        } else {
            None
        }
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let walker = methods::search(&mut *self, key);
        let tree = walker.into_inner().root_into_ref();
        let node = tree.node_mut()?;
        if *node.key() == *key {
            Some(node.value_mut())
        } else {
            None
        }
    }

    /// Inserts the pair and splays it to the root.
    ///
    ///```
    /// use arbor::{SomeTree, splay::SplayTree};
    ///
    /// let mut tree: SplayTree<i32, char> = SplayTree::new();
    /// assert_eq!(tree.insert(3, 'a'), None);
    /// assert_eq!(tree.insert(3, 'b'), Some((3, 'b')));
    /// assert_eq!(tree.get(&3), Some(&'a'));
    /// # tree.assert_correctness();
    ///```
    fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        let mut walker = methods::search(&mut *self, &key);
        if walker.is_empty() {
            ModifiableWalker::insert(&mut walker, key, value).unwrap();
            None
        } else {
            Some((key, value))
        }
    }

    fn insert_dup(&mut self, key: K, value: V) {
        let mut walker = self.walker();
        methods::search_dup_subtree(&mut walker, &key);
        ModifiableWalker::insert(&mut walker, key, value).unwrap();
    }

    fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let mut walker = methods::search(&mut *self, key);
        walker.delete()
    }

    fn select(&self, index: usize) -> Option<(&K, &V)> {
        self.tree.select(index).map(|node| (node.key(), node.value()))
    }

    fn position(&mut self, key: &K) -> Result<usize, usize> {
        methods::position(&mut *self, key)
    }

    fn clear(&mut self) {
        deallocate_iteratively(&mut self.tree);
    }

    fn assert_correctness(&self) {
        assert!(self.tree.is_bst());
        self.tree.assert_correctness_with(|_| {});
    }
}

impl<'a, K: Ord, V> SomeTreeRef<K, V> for &'a mut SplayTree<K, V> {
    type Walker = SplayWalker<'a, K, V>;

    fn walker(self) -> Self::Walker {
        SplayWalker {
            walker: BasicWalker::new(&mut self.tree),
        }
    }
}

impl<'a, K: Ord, V> ModifiableTreeRef<K, V> for &'a mut SplayTree<K, V> {
    type ModifiableWalker = SplayWalker<'a, K, V>;
}

impl<'a, K: Ord, V> SplittableTreeRef<K, V> for &'a mut SplayTree<K, V> {
    type T = SplayTree<K, V>;

    type SplittableWalker = SplayWalker<'a, K, V>;
}

derive_SomeEntry! {tree,
    impl<K: Ord, V> SomeEntry<K, V> for SplayTree<K, V> {}
}

impl<K: Ord, V> std::iter::FromIterator<(K, V)> for SplayTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = SplayTree::new();
        for (key, value) in iter {
            tree.insert_dup(key, value);
        }
        tree
    }
}

impl<K, V> IntoIterator for SplayTree<K, V> {
    type Item = (K, V);
    type IntoIter = iterators::IntoIter<K, V, ()>;

    fn into_iter(self) -> Self::IntoIter {
        iterators::IntoIter::new(self.tree)
    }
}

impl<'a, K, V> IntoIterator for &'a SplayTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = iterators::Iter<'a, K, V, ()>;

    fn into_iter(self) -> Self::IntoIter {
        iterators::Iter::new(&self.tree)
    }
}

/// A walker struct for [`SplayTree`].
///
/// Dropping the walker splays the current node all the way to the root.
/// This is what provides the amortized complexity guarantee: whoever walks
/// down the tree pays for restructuring it on the way back up.
#[derive(destructure)]
pub struct SplayWalker<'a, K: Ord, V> {
    walker: BasicWalker<'a, K, V, ()>,
}

impl<'a, K: Ord, V> SplayWalker<'a, K, V> {
    /// If the walker is at the root, does nothing. Otherwise performs a
    /// single splay step: the current node moves up by two levels (or one,
    /// when its parent is the root).
    ///
    /// The amortized cost of every splay step other than the final zig is at
    /// most `3*(log(new_size) - log(old_size))`, which telescopes to
    /// `O(log n)` over a whole splay.
    pub fn splay_step(&mut self) {
        // b1: which son we are of the parent
        let b1 = match self.walker.go_up() {
            Err(()) => return, // already the root
            Ok(side) => side,
        };
        // b2: which son the parent is of the grandparent
        let b2 = match self.walker.is_left_son() {
            None => {
                // the parent is the root - zig step
                self.walker.rot_side(b1.flip()).unwrap();
                return;
            }
            Some(side) => side,
        };
        self.walker.go_up().unwrap();

        if b1 == b2 {
            // zig-zig: rotate the parent up, then the node
            self.walker.rot_side(b2.flip()).unwrap();
            self.walker.rot_side(b1.flip()).unwrap();
        } else {
            // zig-zag: rotate the node up twice
            self.walker.go_side(b2).unwrap();
            self.walker.rot_side(b1.flip()).unwrap();
            self.walker.go_up().unwrap();
            self.walker.rot_side(b2.flip()).unwrap();
        }
    }

    /// Splays the current node to the root of the tree. If the walker is at
    /// an empty position, its parent is splayed instead.
    pub fn splay(&mut self) {
        if self.walker.is_empty() && self.walker.go_up().is_err() {
            return; // the whole tree is empty
        }
        while !self.walker.is_root() {
            self.splay_step();
        }
    }

    /// Splays, and hands back the underlying walker, positioned at the
    /// root.
    pub fn into_inner(mut self) -> BasicWalker<'a, K, V, ()> {
        self.splay();
        // destructure without running the drop code - it has already run
        let (walker,) = self.destructure();
        walker
    }
}

impl<'a, K: Ord, V> Drop for SplayWalker<'a, K, V> {
    fn drop(&mut self) {
        self.splay();
    }
}

derive_SomeWalker! {walker,
    impl<'a, K: Ord, V> SomeWalker<K, V> for SplayWalker<'a, K, V> {
        fn go_up(&mut self) -> Result<Side, ()> {
            self.walker.go_up()
        }
    }
}

derive_SomeEntry! {walker,
    impl<'a, K: Ord, V> SomeEntry<K, V> for SplayWalker<'a, K, V> {}
}

impl<'a, K: Ord, V> ModifiableWalker<K, V> for SplayWalker<'a, K, V> {
    /// Inserts the pair at the current empty position. The new node is
    /// splayed to the root when the walker is dropped.
    fn insert(&mut self, key: K, value: V) -> Option<()> {
        self.walker.insert_with_alg_data(key, value, ())
    }

    /// Removes the node at the current position, joining its two subtrees
    /// by splaying the greatest node of the left one.
    fn delete(&mut self) -> Option<(K, V)> {
        let mut node = self.walker.take_subtree().into_node_boxed()?;
        let joined = join_splay(node.left.take(), node.right.take());
        self.walker.put_subtree(joined).unwrap();
        Some(node.into_kv())
    }
}

impl<'a, K: Ord, V> SplittableWalker<K, V> for SplayWalker<'a, K, V> {
    type T = SplayTree<K, V>;

    /// Will only do anything if the current position is empty.
    /// Splays the parent of the empty position to the root, at which point
    /// the tree separates cleanly into the keys before the position and the
    /// keys after it.
    ///
    ///```
    /// use arbor::{SomeTree, SomeTreeRef, SomeWalker, SplittableWalker, splay::SplayTree};
    /// use arbor::methods;
    ///
    /// let mut tree: SplayTree<i32, i32> = (1..=10).map(|x| (x, x)).collect();
    /// let mut walker = methods::search(&mut tree, &5);
    /// methods::next_empty(&mut walker).unwrap();
    /// let tree2 = walker.split_right().unwrap();
    /// drop(walker);
    ///
    /// assert_eq!(tree.iter().map(|(k, _)| *k).collect::<Vec<_>>(), (1..=5).collect::<Vec<_>>());
    /// assert_eq!(tree2.iter().map(|(k, _)| *k).collect::<Vec<_>>(), (6..=10).collect::<Vec<_>>());
    /// # tree.assert_correctness();
    /// # tree2.assert_correctness();
    ///```
    fn split_right(&mut self) -> Option<Self::T> {
        if !self.walker.is_empty() {
            return None;
        }
        let side = match self.walker.go_up() {
            Err(()) => return Some(SplayTree::new()), // the whole tree is empty
            Ok(side) => side,
        };
        self.splay();
        // after splaying, everything before the empty position is on one
        // side of the root, and everything after it on the other
        let mut root = self.walker.take_subtree().into_node_boxed().unwrap();
        match side {
            Side::Left => {
                let left = root.left.take();
                root.rebuild();
                self.walker.put_subtree(left).unwrap();
                Some(SplayTree {
                    tree: BasicTree::Root(root),
                })
            }
            Side::Right => {
                let right = root.right.take();
                root.rebuild();
                self.walker.put_subtree(BasicTree::Root(root)).unwrap();
                Some(SplayTree { tree: right })
            }
        }
    }

    /// Same as [`SplittableWalker::split_right`], except that the keys
    /// before the current position are returned, and the rest stay.
    fn split_left(&mut self) -> Option<Self::T> {
        let mut right = self.split_right()?;
        std::mem::swap(&mut right.tree, self.walker.inner_mut());
        Some(right)
    }
}

impl<K: Ord, V> ConcatenableTree<K, V> for SplayTree<K, V> {
    /// Concatenates the trees together, in place.
    /// All keys of `right` must be greater than all keys of `self`.
    /// Amortized complexity: `O(log n)`.
    fn concatenate_right(&mut self, right: Self) {
        let left = self.tree.take();
        self.tree = join_splay(left, right.tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessed_key_moves_to_the_root() {
        let mut tree: SplayTree<i32, i32> = (0..100).map(|x| (x, x)).collect();
        assert_eq!(tree.get(&31), Some(&31));
        assert_eq!(tree.tree.node().unwrap().key(), &31);
        tree.assert_correctness();
    }

    #[test]
    fn insert_remove_round() {
        let mut tree: SplayTree<u32, u32> = SplayTree::new();
        for i in 0..100 {
            tree.insert((i * 37) % 100, i);
        }
        tree.assert_correctness();
        assert_eq!(tree.size(), 100);
        for key in 0..100 {
            assert!(tree.remove(&key).is_some());
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn inner_tree_round_trip() {
        let tree: SplayTree<i32, i32> = (0..20).map(|x| (x, x)).collect();
        let inner = tree.into_inner();
        assert!(inner.is_bst());
        let mut tree = SplayTree::from_inner(inner);
        assert_eq!(tree.get(&11), Some(&11));
        tree.assert_correctness();
    }

    #[test]
    fn concatenate_joins_in_order() {
        let mut tree: SplayTree<i32, ()> = (0..5).map(|x| (x, ())).collect();
        let tree2: SplayTree<i32, ()> = (5..10).map(|x| (x, ())).collect();
        tree.concatenate_right(tree2);
        tree.assert_correctness();
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());
    }
}
