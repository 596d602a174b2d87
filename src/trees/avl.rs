//! Implementation of AVL trees.
//! Balanced by keeping track of node ranks, this is a worst-case balancing
//! algorithm that has a small memory overhead per node.

use super::basic_tree::*;
use super::*;

/// The type that is used for rank bookkeeping.
/// `u8` is definitely enough, since the rank of the tree is logarithmic in the tree size.
type T = u8;
/// Used for rank differences
type TD = i8;

/// An AVL tree storing key-value pairs ordered by key. Balanced by keeping
/// track of node ranks: every node's rank is one more than the larger of its
/// sons' ranks, and the sons' ranks may differ by at most one. The rank of a
/// node is therefore exactly the height of its subtree.
#[derive(Clone)]
pub struct AVLTree<K, V> {
    tree: BasicTree<K, V, T>,
}

/// For implementing `rank`, `rank_diff` and `rebuild_ranks` for
/// trees, nodes and walkers alike.
trait Rankable {
    fn rank(&self) -> T;

    /// Returns `true` if the rank of the current node had to be updated,
    /// `false` if it was correct.
    fn rebuild_ranks(&mut self) -> bool;

    /// Returns `right.rank() - left.rank()`
    fn rank_diff(&self) -> TD;
}

impl<K, V> Rankable for BasicTree<K, V, T> {
    fn rank(&self) -> T {
        match self.node() {
            None => 0,
            Some(node) => node.rank(),
        }
    }

    fn rebuild_ranks(&mut self) -> bool {
        if let Some(node) = self.node_mut() {
            node.rebuild_ranks()
        } else {
            true
        }
    }

    /// Returns `right.rank() - left.rank()`
    fn rank_diff(&self) -> TD {
        match self.node() {
            None => 0,
            Some(node) => node.rank_diff(),
        }
    }
}

impl<K, V> Rankable for BasicNode<K, V, T> {
    fn rank(&self) -> T {
        *self.alg_data()
    }

    /// Returns `right.rank() - left.rank()`
    fn rank_diff(&self) -> TD {
        self.right.rank() as TD - self.left.rank() as TD
    }

    fn rebuild_ranks(&mut self) -> bool {
        let new_rank = std::cmp::max(self.left.rank(), self.right.rank()) + 1;
        let changed = self.rank() != new_rank;
        self.alg_data = new_rank;
        changed
    }
}

impl<K, V> AVLTree<K, V> {
    /// Creates an empty [`AVLTree`].
    pub fn new() -> Self {
        AVLTree {
            tree: BasicTree::Empty,
        }
    }

    /// The height of the tree: the number of nodes on the longest
    /// root-to-leaf path. This is exactly the root's rank.
    pub fn height(&self) -> usize {
        self.tree.rank() as usize
    }

    fn assert_ranks_locally_internal(node: &BasicNode<K, V, T>) {
        assert!(node.rank() == node.left.rank() + 1 || node.rank() == node.right.rank() + 1);
        assert!(node.left.rank() == node.rank() - 1 || node.left.rank() == node.rank() - 2);
        assert!(node.right.rank() == node.rank() - 1 || node.right.rank() == node.rank() - 2);
    }

    /// Asserts that the tree's ranks are correct.
    /// Otherwise, panics.
    pub fn assert_ranks(&self) {
        self.tree
            .assert_correctness_with(Self::assert_ranks_locally_internal);
    }

    /// Checks the rank invariant without panicking: every node's stored rank
    /// is one more than the larger of its sons' ranks, and the sons' ranks
    /// differ by at most one. Test-only usage.
    pub fn is_avl(&self) -> bool {
        fn check<K, V>(tree: &BasicTree<K, V, T>) -> bool {
            match tree.node() {
                None => true,
                Some(node) => {
                    node.rank() == std::cmp::max(node.left.rank(), node.right.rank()) + 1
                        && node.rank_diff().abs() <= 1
                        && check(&node.left)
                        && check(&node.right)
                }
            }
        }
        check(&self.tree)
    }
}

impl<K: std::fmt::Display, V> AVLTree<K, V> {
    /// Writes the two-line text dump of the tree: the keys in pre-order on
    /// the first line, the subtree sizes in in-order on the second.
    pub fn write_dump<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.tree.write_dump(writer)
    }
}

impl<K, V> Rankable for AVLTree<K, V> {
    fn rank(&self) -> T {
        self.tree.rank()
    }

    /// Returns `right.rank() - left.rank()`
    fn rank_diff(&self) -> TD {
        self.tree.rank_diff()
    }

    fn rebuild_ranks(&mut self) -> bool {
        self.tree.rebuild_ranks()
    }
}

impl<K, V> Default for AVLTree<K, V> {
    fn default() -> Self {
        AVLTree::new()
    }
}

impl<K: Ord, V> SomeTree<K, V> for AVLTree<K, V> {
    type TreeData = T;

    fn new() -> Self {
        AVLTree::new()
    }

    fn size(&self) -> usize {
        self.tree.subtree_size()
    }

    fn iter(&self) -> iterators::Iter<'_, K, V, T> {
        iterators::Iter::new(&self.tree)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.tree.search(key).map(|node| node.value())
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tree.search_mut(key).map(|node| node.value_mut())
    }

    /// Inserts the pair, rebalancing as needed. Takes `O(log n)` time, and
    /// performs at most two rotations.
    ///
    ///```
    /// use arbor::{SomeTree, avl::AVLTree};
    ///
    /// let mut tree: AVLTree<i32, char> = AVLTree::new();
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
        self.tree
            .assert_correctness_with(Self::assert_ranks_locally_internal);
    }
}

impl<'a, K: Ord, V> SomeTreeRef<K, V> for &'a mut AVLTree<K, V> {
    type Walker = AVLWalker<'a, K, V>;

    fn walker(self) -> Self::Walker {
        AVLWalker {
            walker: BasicWalker::new(&mut self.tree),
        }
    }
}

impl<'a, K: Ord, V> ModifiableTreeRef<K, V> for &'a mut AVLTree<K, V> {
    type ModifiableWalker = AVLWalker<'a, K, V>;
}

impl<'a, K: Ord, V> SplittableTreeRef<K, V> for &'a mut AVLTree<K, V> {
    type T = AVLTree<K, V>;

    type SplittableWalker = AVLWalker<'a, K, V>;
}

derive_SomeEntry! {tree,
    impl<K: Ord, V> SomeEntry<K, V> for AVLTree<K, V> {}
}

impl<K: Ord, V> std::iter::FromIterator<(K, V)> for AVLTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = AVLTree::new();
        for (key, value) in iter {
            tree.insert_dup(key, value);
        }
        tree
    }
}

impl<K, V> IntoIterator for AVLTree<K, V> {
    type Item = (K, V);
    type IntoIter = iterators::IntoIter<K, V, T>;

    fn into_iter(self) -> Self::IntoIter {
        iterators::IntoIter::new(self.tree)
    }
}

impl<'a, K, V> IntoIterator for &'a AVLTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = iterators::Iter<'a, K, V, T>;

    fn into_iter(self) -> Self::IntoIter {
        iterators::Iter::new(&self.tree)
    }
}

/// A walker struct for [`AVLTree`].
pub struct AVLWalker<'a, K, V> {
    walker: BasicWalker<'a, K, V, T>,
}

impl<'a, K, V> Drop for AVLWalker<'a, K, V> {
    fn drop(&mut self) {
        self.walker.go_to_root()
    }
}

derive_SomeWalker! {walker,
    impl<'a, K: Ord, V> SomeWalker<K, V> for AVLWalker<'a, K, V> {
        fn go_up(&mut self) -> Result<Side, ()> {
            let res = self.walker.go_up()?;
            let changed = self.inner_mut().rebuild_ranks();
            assert!(!changed); // it shouldn't have changed without being rebalanced already
            Ok(res)
        }
    }
}

derive_SomeEntry! {walker,
    impl<'a, K: Ord, V> SomeEntry<K, V> for AVLWalker<'a, K, V> {}
}

impl<'a, K, V> Rankable for AVLWalker<'a, K, V> {
    fn rank(&self) -> T {
        match self.walker.node() {
            None => 0,
            Some(node) => *node.alg_data(),
        }
    }

    /// Returns `right.rank() - left.rank()`
    fn rank_diff(&self) -> TD {
        self.walker.inner().rank_diff()
    }

    fn rebuild_ranks(&mut self) -> bool {
        self.walker.inner_mut().rebuild_ranks()
    }
}

impl<'a, K: Ord, V> AVLWalker<'a, K, V> {
    fn inner(&self) -> &BasicTree<K, V, T> {
        self.walker.inner()
    }

    fn inner_mut(&mut self) -> &mut BasicTree<K, V, T> {
        self.walker.inner_mut()
    }

    fn rot_left(&mut self) -> Option<()> {
        let rebuilder = |node: &mut BasicNode<K, V, T>| {
            node.rebuild_ranks();
        };
        self.walker.rot_left_with_custom_rebuilder(rebuilder)
    }

    fn rot_right(&mut self) -> Option<()> {
        let rebuilder = |node: &mut BasicNode<K, V, T>| {
            node.rebuild_ranks();
        };
        self.walker.rot_right_with_custom_rebuilder(rebuilder)
    }

    fn rot_up(&mut self) -> Result<Side, ()> {
        let rebuilder = |node: &mut BasicNode<K, V, T>| {
            node.rebuild_ranks();
        };
        self.walker.rot_up_with_custom_rebuilder(rebuilder)
    }

    /// This function gets called when a node is deleted or inserted,
    /// at the current position.
    fn rebalance(&mut self) {
        if self.is_empty() {
            let res = self.walker.go_up(); // ranks may be incorrect, so go up with the inner walker
            if res.is_err() {
                return;
            }
        }

        self.rebuild_ranks();

        loop {
            let node = self.inner().node().unwrap();
            match self.rank_diff() {
                -2 => {
                    // -2, left is deeper
                    if node.left.rank_diff() <= 0 {
                        // left left case
                        self.rot_right().unwrap();
                    } else {
                        // left right case
                        self.go_left().unwrap();
                        self.rot_left().unwrap();
                        let res = self.rot_up();
                        assert!(res == Ok(Side::Left));
                    }
                }

                -1..=1 => {} // do nothing, the current node is now balanced.

                2 => {
                    // 2, left is shallower
                    if node.right.rank_diff() >= 0 {
                        // right right case
                        self.rot_left().unwrap();
                    } else {
                        // right left case
                        self.go_right().unwrap();
                        self.rot_right().unwrap();
                        let res = self.rot_up();
                        assert!(res == Ok(Side::Right));
                    }
                }

                rd => panic!("illegal rank difference: {}", rd),
            }

            // current node has been balanced. now go up a node,
            // and check if we need to continue rebalancing.
            let res = self.walker.go_up(); // ranks may be incorrect, so go up with the inner walker
            let changed = self.inner_mut().rebuild_ranks();
            let rd = self.inner().rank_diff();
            if !changed && -1 <= rd && rd <= 1 {
                // tree is now balanced correctly
                break;
            }
            if res.is_err() {
                // reached root
                break;
            }
        }
    }

    /// Deletes the node at the current position and returns it with the box.
    /// The walker ends up at an ancestor of the deleted position.
    fn delete_boxed(&mut self) -> Option<Box<BasicNode<K, V, T>>> {
        // the delete implementation mirrors `BasicWalker::delete_boxed`,
        // in order for rebalancing to be done properly.
        let mut node = self.walker.take_subtree().into_node_boxed()?;
        if node.right.is_empty() {
            self.walker.put_subtree(node.left.take()).unwrap();
            self.rebalance();
        } else {
            // find the successor and move it to the current position
            let mut walker = (&mut node.right).walker();
            while walker.go_left().is_ok() {}
            let res = walker.go_up();
            assert_eq!(res, Ok(Side::Left));

            let mut succ = walker.take_subtree().into_node_boxed().unwrap();
            assert!(succ.left.is_empty());
            walker.put_subtree(succ.right.take()).unwrap();
            AVLWalker { walker }.rebalance(); // rebalance the detachment point

            succ.left = node.left.take();
            succ.right = node.right.take();
            succ.rebuild();
            succ.rebuild_ranks();
            self.walker.put_subtree(BasicTree::Root(succ)).unwrap();
            self.rebalance();
        }
        Some(node)
    }
}

impl<'a, K: Ord, V> ModifiableWalker<K, V> for AVLWalker<'a, K, V> {
    /// Inserts the pair into the tree at the current empty position.
    /// If the current position is not empty, returns [`None`].
    /// When the function returns, the walker will be at a position which is
    /// an ancestor of the newly inserted node.
    fn insert(&mut self, key: K, value: V) -> Option<()> {
        self.walker
            .insert_with_alg_data(key, value, 1 /* rank of a node with no sons */)?;
        self.rebalance();
        Some(())
    }

    fn delete(&mut self) -> Option<(K, V)> {
        Some(self.delete_boxed()?.into_kv())
    }
}

impl<'a, K: Ord, V> SplittableWalker<K, V> for AVLWalker<'a, K, V> {
    type T = AVLTree<K, V>;

    /// Will only do anything if the current position is empty.
    /// If it is empty, it will split the tree: the keys before the current
    /// position will remain, and the keys after it will be put in the new
    /// output tree.
    /// The walker will be at the root after this operation, if it succeeds.
    ///
    ///```
    /// use arbor::{SomeTree, SomeTreeRef, SomeWalker, SplittableWalker, avl::AVLTree};
    /// use arbor::methods;
    ///
    /// let mut tree: AVLTree<i32, i32> = (17..88).map(|x| (x, x)).collect();
    /// let mut walker = methods::search(&mut tree, &24);
    /// methods::previous_empty(&mut walker).unwrap();
    /// let tree2 = walker.split_right().unwrap();
    /// drop(walker);
    ///
    /// assert_eq!(tree.iter().map(|(k, _)| *k).collect::<Vec<_>>(), (17..24).collect::<Vec<_>>());
    /// assert_eq!(tree2.iter().map(|(k, _)| *k).collect::<Vec<_>>(), (24..88).collect::<Vec<_>>());
    /// # tree.assert_correctness();
    /// # tree2.assert_correctness();
    ///```
    fn split_right(&mut self) -> Option<Self::T> {
        if !self.is_empty() {
            return None;
        }
        let mut left = AVLTree::new();
        let mut right = AVLTree::new();

        // ranks may be incorrect, so go up with the inner walker
        while let Ok(side) = self.walker.go_up() {
            let mut node = self.walker.take_subtree().into_node_boxed().unwrap();
            match side {
                Side::Left => {
                    assert!(node.left.is_empty());
                    let auxiliary_right = AVLTree { tree: node.right.take() };
                    right.concatenate_boxed_middle_right(node, auxiliary_right);
                }
                Side::Right => {
                    assert!(node.right.is_empty());
                    let auxiliary_left = AVLTree { tree: node.left.take() };
                    left.concatenate_boxed_middle_left(auxiliary_left, node);
                }
            }
        }

        // the `self` tree is empty by this point.
        self.walker.put_subtree(left.tree).unwrap();
        Some(right)
    }

    /// Same as [`SplittableWalker::split_right`], except that the keys
    /// before the current position are returned, and the rest stay.
    fn split_left(&mut self) -> Option<Self::T> {
        let mut right = self.split_right()?;
        std::mem::swap(&mut right.tree, self.inner_mut());
        Some(right)
    }
}

impl<K: Ord, V> AVLTree<K, V> {
    /// Concatenates the trees together, in place, with a given pair for the
    /// middle. All keys of `self` must be smaller than `key`, and all keys
    /// of `right` greater.
    /// Complexity: `O(log n)`. More precisely, `O(dr)` where `dr` is the
    /// difference of ranks between the two trees.
    pub fn concatenate_middle_right(&mut self, key: K, value: V, right: AVLTree<K, V>) {
        let node = BasicNode::new_alg(key, value, 0 /* dummy value */);
        self.concatenate_boxed_middle_right(Box::new(node), right);
    }

    fn concatenate_boxed_middle_right(
        &mut self,
        mut mid: Box<BasicNode<K, V, T>>,
        mut right: AVLTree<K, V>,
    ) {
        if self.rank() < right.rank() {
            std::mem::swap(self, &mut right);
            self.concatenate_boxed_middle_left(right, mid);
            return;
        }
        let mut walker = self.walker();
        while walker.rank() > right.rank() {
            walker.go_right().unwrap();
        }
        mid.alg_data = 0;
        mid.left = walker.walker.take_subtree();
        mid.right = right.tree;
        mid.rebuild();
        walker.walker.put_subtree(BasicTree::Root(mid)).unwrap();
        walker.rebalance();
    }

    /// Concatenates the trees together, in place, with a given pair for the
    /// middle. All keys of `left` must be smaller than `key`, and all keys
    /// of `self` greater.
    /// Complexity: `O(log n)`. More precisely, `O(dr)` where `dr` is the
    /// difference of ranks between the two trees.
    pub fn concatenate_middle_left(&mut self, left: AVLTree<K, V>, key: K, value: V) {
        let node = BasicNode::new_alg(key, value, 0 /* dummy value */);
        self.concatenate_boxed_middle_left(left, Box::new(node));
    }

    fn concatenate_boxed_middle_left(
        &mut self,
        mut left: AVLTree<K, V>,
        mut mid: Box<BasicNode<K, V, T>>,
    ) {
        if self.rank() < left.rank() {
            std::mem::swap(self, &mut left);
            self.concatenate_boxed_middle_right(mid, left);
            return;
        }
        let mut walker = self.walker();
        while walker.rank() > left.rank() {
            walker.go_left().unwrap();
        }
        mid.alg_data = 0;
        mid.right = walker.walker.take_subtree();
        mid.left = left.tree;
        mid.rebuild();
        walker.walker.put_subtree(BasicTree::Root(mid)).unwrap();
        walker.rebalance();
    }
}

impl<K: Ord, V> ConcatenableTree<K, V> for AVLTree<K, V> {
    /// Concatenates the trees together, in place.
    /// All keys of `right` must be greater than all keys of `self`.
    /// Complexity: `O(log n)`.
    ///
    ///```
    /// use arbor::{SomeTree, ConcatenableTree, avl::AVLTree};
    ///
    /// let mut tree: AVLTree<i32, i32> = (17..=89).map(|x| (x, x)).collect();
    /// let tree2: AVLTree<i32, i32> = (90..=99).map(|x| (x, x)).collect();
    /// tree.concatenate_right(tree2);
    ///
    /// assert_eq!(tree.iter().map(|(k, _)| *k).collect::<Vec<_>>(), (17..=99).collect::<Vec<_>>());
    /// # tree.assert_correctness();
    ///```
    fn concatenate_right(&mut self, mut right: Self) {
        if !right.is_empty() {
            let mut walker = (&mut right).walker();
            while walker.go_left().is_ok() {}
            walker.go_up().unwrap();
            let mid = walker.delete_boxed().unwrap();
            drop(walker);
            self.concatenate_boxed_middle_right(mid, right);
        }
    }
}

/// Concatenates the trees together, with a given pair for the middle.
/// Complexity: `O(log n)`. More precisely, `O(dr)` where `dr` is the
/// difference of ranks between the two trees.
pub fn concatenate_with_middle<K: Ord, V>(
    mut left: AVLTree<K, V>,
    key: K,
    value: V,
    right: AVLTree<K, V>,
) -> AVLTree<K, V> {
    left.concatenate_middle_right(key, value, right);
    left
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebalancing_keeps_the_tree_shallow() {
        let mut tree: AVLTree<u32, u32> = AVLTree::new();
        for key in 0..1000 {
            tree.insert(key, key);
        }
        tree.assert_correctness();
        tree.assert_ranks();
        assert!(tree.is_avl());
        // an AVL tree with n keys has height less than 1.44*log2(n+2)
        assert!(tree.height() <= 14, "height {}", tree.height());
    }

    #[test]
    fn insert_dup_keeps_equal_keys() {
        let mut tree: AVLTree<u32, u32> = AVLTree::new();
        for value in 0..10 {
            tree.insert_dup(7, value);
        }
        tree.insert_dup(3, 100);
        tree.assert_correctness();
        assert_eq!(tree.size(), 11);
        // equal keys come out in insertion order
        let values: Vec<u32> = tree.iter().filter(|(k, _)| **k == 7).map(|(_, v)| *v).collect();
        assert_eq!(values, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn walker_counts_partition_the_tree() {
        let mut tree: AVLTree<u32, u32> = (0..100).map(|x| (x, x)).collect();
        let total = tree.size();
        for key in [0, 13, 57, 99] {
            let walker = methods::search(&mut tree, &key);
            assert_eq!(walker.key(), Some(&key));
            assert_eq!(
                walker.far_left_count() + walker.subtree_size() + walker.far_right_count(),
                total
            );
            assert!(walker.depth() < tree_height_bound(total));
        }
    }

    fn tree_height_bound(size: usize) -> usize {
        // 1.44 * log2(size), rounded up generously
        2 * (usize::BITS - size.leading_zeros()) as usize
    }

    #[test]
    fn with_value_mutates_in_place() {
        let mut tree: AVLTree<u32, u32> = (0..10).map(|x| (x, 0)).collect();
        let mut walker = methods::search(&mut tree, &4);
        assert_eq!(walker.with_value(|value| std::mem::replace(value, 9)), Some(0));
        drop(walker);
        assert_eq!(tree.get(&4), Some(&9));
    }

    #[test]
    fn concatenate_with_a_middle_pair() {
        let left: AVLTree<u32, u32> = (0..300).map(|x| (x, x)).collect();
        let right: AVLTree<u32, u32> = (301..=320).map(|x| (x, x)).collect();
        let tree = concatenate_with_middle(left, 300, 300, right);
        tree.assert_correctness();
        assert_eq!(tree.size(), 321);
        let keys: Vec<u32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (0..=320).collect::<Vec<_>>());

        // the mirrored direction, anchoring at the taller right tree
        let left: AVLTree<u32, u32> = (0..20).map(|x| (x, x)).collect();
        let mut tree: AVLTree<u32, u32> = (21..300).map(|x| (x, x)).collect();
        tree.concatenate_middle_left(left, 20, 20);
        tree.assert_correctness();
        assert_eq!(tree.size(), 300);
    }

    #[test]
    fn removal_rebalances_back() {
        let mut tree: AVLTree<u32, u32> = (0..500).map(|x| (x, x)).collect();
        for key in 100..400 {
            assert_eq!(tree.remove(&key), Some((key, key)));
        }
        tree.assert_correctness();
        tree.assert_ranks();
        assert_eq!(tree.size(), 200);
        assert_eq!(tree.remove(&250), None);
    }
}
