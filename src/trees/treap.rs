//! Implementation of treaps.
//!
//! Every node carries a random priority, and the tree is simultaneously a
//! search tree in the keys and a max-heap in the priorities. The random
//! priorities make the tree's shape that of a random binary search tree,
//! so operations take `O(log n)` expected time. Each operation may take up
//! to linear time, but the probability of any operation taking more than
//! `O(log n)` time is extremely low.
//!
//! Treaps are the cheapest of the trees here to split and concatenate.

use super::basic_tree::*;
use super::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// The type that is used for bookkeeping.
// convention: a bigger number should go higher up the tree.
type T = u64;

/// A treap storing key-value pairs ordered by key.
///
/// The tree owns the random generator its priorities are drawn from, so a
/// tree built with [`Treap::with_seed`] behaves reproducibly.
#[derive(Clone)]
pub struct Treap<K, V> {
    tree: BasicTree<K, V, T>,
    rng: StdRng,
}

impl<K, V> BasicTree<K, V, T> {
    fn priority(&self) -> Option<T> {
        Some(self.node()?.alg_data)
    }
}

impl<K, V> Treap<K, V> {
    /// Creates an empty [`Treap`] with system-provided randomness.
    pub fn new() -> Treap<K, V> {
        Treap {
            tree: BasicTree::Empty,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates an empty [`Treap`] whose priorities are drawn from a seeded
    /// generator, so that the tree's shape is reproducible.
    pub fn with_seed(seed: u64) -> Treap<K, V> {
        Treap {
            tree: BasicTree::Empty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The priority of the root node.
    pub fn priority(&self) -> Option<T> {
        self.tree.priority()
    }

    /// Asserts that every node's priority is greater than its sons'.
    /// Otherwise, panics.
    pub fn assert_priorities(&self) {
        Self::assert_priorities_internal(&self.tree);
    }

    fn assert_priorities_locally_internal(node: &BasicNode<K, V, T>) {
        if let Some(left) = node.left.node() {
            assert!(node.alg_data() > left.alg_data());
        }
        if let Some(right) = node.right.node() {
            assert!(node.alg_data() > right.alg_data());
        }
    }

    fn assert_priorities_internal(tree: &BasicTree<K, V, T>) {
        if let Some(node) = tree.node() {
            Self::assert_priorities_locally_internal(node);
            Self::assert_priorities_internal(&node.left);
            Self::assert_priorities_internal(&node.right);
        }
    }

    /// Checks the heap invariant without panicking: every node's priority is
    /// greater than both of its sons'. Test-only usage.
    pub fn is_treap(&self) -> bool {
        fn check<K, V>(tree: &BasicTree<K, V, T>) -> bool {
            match tree.node() {
                None => true,
                Some(node) => {
                    node.left
                        .node()
                        .map_or(true, |left| node.alg_data() > left.alg_data())
                        && node
                            .right
                            .node()
                            .map_or(true, |right| node.alg_data() > right.alg_data())
                        && check(&node.left)
                        && check(&node.right)
                }
            }
        }
        check(&self.tree)
    }
}

impl<K: std::fmt::Display, V> Treap<K, V> {
    /// Writes the two-line text dump of the tree: the keys in pre-order on
    /// the first line, the subtree sizes in in-order on the second.
    pub fn write_dump<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.tree.write_dump(writer)
    }
}

impl<K, V> Default for Treap<K, V> {
    fn default() -> Self {
        Treap::new()
    }
}

impl<K: Ord, V> SomeTree<K, V> for Treap<K, V> {
    type TreeData = T;

    fn new() -> Self {
        Treap::new()
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

    /// Inserts the pair with a freshly drawn priority.
    ///
    ///```
    /// use arbor::{SomeTree, treap::Treap};
    ///
    /// let mut tree: Treap<i32, char> = Treap::with_seed(42);
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
        self.assert_priorities();
    }
}

impl<'a, K: Ord, V> SomeTreeRef<K, V> for &'a mut Treap<K, V> {
    type Walker = TreapWalker<'a, K, V>;

    fn walker(self) -> Self::Walker {
        TreapWalker {
            walker: BasicWalker::new(&mut self.tree),
            rng: &mut self.rng,
        }
    }
}

impl<'a, K: Ord, V> ModifiableTreeRef<K, V> for &'a mut Treap<K, V> {
    type ModifiableWalker = TreapWalker<'a, K, V>;
}

impl<'a, K: Ord, V> SplittableTreeRef<K, V> for &'a mut Treap<K, V> {
    type T = Treap<K, V>;
    type SplittableWalker = TreapWalker<'a, K, V>;
}

derive_SomeEntry! {tree,
    impl<K: Ord, V> SomeEntry<K, V> for Treap<K, V> {}
}

impl<K: Ord, V> std::iter::FromIterator<(K, V)> for Treap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Treap::new();
        for (key, value) in iter {
            tree.insert_dup(key, value);
        }
        tree
    }
}

impl<K, V> IntoIterator for Treap<K, V> {
    type Item = (K, V);
    type IntoIter = iterators::IntoIter<K, V, T>;

    fn into_iter(self) -> Self::IntoIter {
        iterators::IntoIter::new(self.tree)
    }
}

impl<'a, K, V> IntoIterator for &'a Treap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = iterators::Iter<'a, K, V, T>;

    fn into_iter(self) -> Self::IntoIter {
        iterators::Iter::new(&self.tree)
    }
}

/// A walker struct for [`Treap`]. Borrows the tree's random generator, so
/// that insertions through the walker can draw priorities.
pub struct TreapWalker<'a, K, V> {
    walker: BasicWalker<'a, K, V, T>,
    rng: &'a mut StdRng,
}

derive_SomeWalker! {walker,
    impl<'a, K: Ord, V> SomeWalker<K, V> for TreapWalker<'a, K, V> {
        fn go_up(&mut self) -> Result<Side, ()> {
            self.walker.go_up()
        }
    }
}

derive_SomeEntry! {walker,
    impl<'a, K: Ord, V> SomeEntry<K, V> for TreapWalker<'a, K, V> {}
}

impl<'a, K: Ord, V> TreapWalker<'a, K, V> {
    /// Returns the priority of the current node.
    pub fn priority(&self) -> Option<T> {
        self.walker.inner().priority()
    }

    /// Inserts the pair at the current empty position with the given
    /// priority, instead of a random one.
    ///
    /// Rather than rotating the new node up, this walks up the path,
    /// splitting off the subtrees that end up on the new node's far side,
    /// until it finds the node the new one should hang under.
    fn insert_with_priority(&mut self, key: K, value: V, priority: T) -> Option<()> {
        if !self.is_empty() {
            return None;
        }

        let mut temp = BasicTree::Empty;
        // in the first round, this value is irrelevant. choosing this will skip the first if.
        let mut prev_side = self.walker.is_left_son().unwrap_or(Side::Right);
        while let Ok(side) = self.walker.go_up() {
            if self.priority().unwrap() > priority {
                // move to the position in which the node should be inserted
                // then break. insertion happens after the break outside the loop.
                self.walker.go_side(side).unwrap();
                break;
            }
            if prev_side != side {
                let node = self.walker.node_mut().unwrap();
                std::mem::swap(&mut temp, node.son_mut(side));
            }
            self.walker.rebuild();
            prev_side = side;
        }

        // insert the new node, at the current position.
        let mut new: BasicNode<K, V, T> = BasicNode::new_alg(key, value, priority);

        match prev_side {
            Side::Left => {
                new.left = temp;
                new.right = self.walker.take_subtree();
            }
            Side::Right => {
                new.right = temp;
                new.left = self.walker.take_subtree();
            }
        }
        new.rebuild();
        self.walker.put_subtree(BasicTree::Root(Box::new(new))).unwrap();
        Some(())
    }
}

impl<'a, K: Ord, V> ModifiableWalker<K, V> for TreapWalker<'a, K, V> {
    /// Inserts the pair into the tree at the current empty position.
    /// If the current position is not empty, returns [`None`].
    /// When the function returns, the walker will be at the position the
    /// node was inserted.
    fn insert(&mut self, key: K, value: V) -> Option<()> {
        let priority: T = self.rng.gen();
        self.insert_with_priority(key, value, priority)
    }

    /// Removes the current pair from the tree, and returns it.
    /// If currently at an empty position, returns [`None`].
    /// The walker stays in the same position, and only the current node's
    /// subtree changes.
    fn delete(&mut self) -> Option<(K, V)> {
        let mut node = self.walker.take_subtree().into_node_boxed()?;
        let mut merged = node.left.take();
        concatenate_internal(&mut merged, node.right.take());
        self.walker.put_subtree(merged).unwrap();
        Some(node.into_kv())
    }
}

/// Melds two treaps, where all of `tree`'s keys are smaller than all of
/// `right`'s, by zipping down the two heaps' rightmost and leftmost spines.
fn concatenate_internal<K: Ord, V>(tree: &mut BasicTree<K, V, T>, right: BasicTree<K, V, T>) {
    let mut walker = BasicWalker::new(tree);
    let mut tree_r = right;
    loop {
        match (walker.inner().priority(), tree_r.priority()) {
            (None, _) => {
                walker.put_subtree(tree_r).unwrap();
                break;
            }
            (_, None) => break,
            (Some(a), Some(b)) if a > b => {
                walker.go_right().unwrap();
            }
            _ => {
                std::mem::swap(walker.inner_mut(), &mut tree_r);
                walker.go_left().unwrap();
                std::mem::swap(walker.inner_mut(), &mut tree_r);
            }
        }
    }
    // the walker is responsible for going up the tree
    // and rebuilding all the nodes
}

impl<K: Ord, V> ConcatenableTree<K, V> for Treap<K, V> {
    /// Concatenates the trees together, in place.
    /// All keys of `other` must be greater than all keys of `self`.
    /// Expected complexity: `O(log n)`.
    ///
    ///```
    /// use arbor::{SomeTree, ConcatenableTree, treap::Treap};
    ///
    /// let mut tree: Treap<i32, i32> = (17..=89).map(|x| (x, x)).collect();
    /// let tree2: Treap<i32, i32> = (90..=99).map(|x| (x, x)).collect();
    /// tree.concatenate_right(tree2);
    ///
    /// assert_eq!(tree.iter().map(|(k, _)| *k).collect::<Vec<_>>(), (17..=99).collect::<Vec<_>>());
    /// # tree.assert_correctness();
    ///```
    fn concatenate_right(&mut self, other: Treap<K, V>) {
        concatenate_internal(&mut self.tree, other.tree);
    }
}

/// Splits a treap into the keys smaller than `key` and the keys greater or
/// equal to it. Unzipping along the search path keeps the heap order of
/// both halves intact.
fn split_lt_ge<K: Ord, V>(
    tree: BasicTree<K, V, T>,
    key: &K,
) -> (BasicTree<K, V, T>, BasicTree<K, V, T>) {
    match tree {
        BasicTree::Empty => (BasicTree::Empty, BasicTree::Empty),
        BasicTree::Root(mut node) => {
            if *node.key() < *key {
                let (mid_left, mid_right) = split_lt_ge(node.right.take(), key);
                node.right = mid_left;
                node.rebuild();
                (BasicTree::Root(node), mid_right)
            } else {
                let (mid_left, mid_right) = split_lt_ge(node.left.take(), key);
                node.left = mid_right;
                node.rebuild();
                (mid_left, BasicTree::Root(node))
            }
        }
    }
}

fn union_internal<K: Ord, V>(tree1: &mut BasicTree<K, V, T>, mut tree2: BasicTree<K, V, T>) {
    if tree2.is_empty() {
        return;
    }
    if tree1.is_empty() {
        *tree1 = tree2;
        return;
    }
    // the root of the union is the higher-priority of the two roots
    if tree1.priority().unwrap() < tree2.priority().unwrap() {
        std::mem::swap(tree1, &mut tree2);
    }
    let node = tree1.node_mut().unwrap();
    let (left, right) = split_lt_ge(tree2, node.key());
    union_internal(&mut node.left, left);
    union_internal(&mut node.right, right);
    node.rebuild();
}

impl<K: Ord, V> Treap<K, V> {
    /// Computes the union of two treaps, interleaving the keys in order.
    /// This is different from concatenate, because concatenate requires all
    /// of the first tree's keys to be smaller than the second's.
    ///
    /// If pairs with equal keys are found, the ones from `other` are placed
    /// after the ones from `self`.
    ///
    /// # Complexity
    /// If the sizes of the two trees are `n,k`, with `n < k`, then the
    /// complexity is `O(n*log(1+k/n))` in the average case. This has the
    /// effect that if you start with `n` singleton trees and unite them
    /// together in any way whatsoever, the overall complexity is
    /// `O(n*log(n))`.
    ///
    ///```
    /// use arbor::{SomeTree, treap::Treap};
    ///
    /// let mut tree: Treap<i32, ()> = (0..10).map(|x| (x * 2, ())).collect();
    /// let tree2: Treap<i32, ()> = (0..10).map(|x| (x * 2 + 1, ())).collect();
    /// tree.union(tree2);
    ///
    /// assert_eq!(tree.iter().map(|(k, _)| *k).collect::<Vec<_>>(), (0..20).collect::<Vec<_>>());
    /// # tree.assert_correctness();
    ///```
    pub fn union(&mut self, other: Treap<K, V>) {
        union_internal(&mut self.tree, other.tree);
    }
}

/// Computes the union of two treaps, interleaving the keys in order.
/// See [`Treap::union`].
pub fn union<K: Ord, V>(mut tree1: Treap<K, V>, tree2: Treap<K, V>) -> Treap<K, V> {
    tree1.union(tree2);
    tree1
}

impl<'a, K: Ord, V> SplittableWalker<K, V> for TreapWalker<'a, K, V> {
    type T = Treap<K, V>;

    /// Will only do anything if the current position is empty.
    /// If it is empty, it will split the tree: the keys before the current
    /// position will remain, and the keys after it will be put in the new
    /// output tree.
    /// The walker will be at the root after this operation, if it succeeds.
    ///
    ///```
    /// use arbor::{SomeTree, SomeTreeRef, SomeWalker, SplittableWalker, treap::Treap};
    /// use arbor::methods;
    ///
    /// let mut tree: Treap<i32, i32> = (17..88).map(|x| (x, x)).collect();
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
    fn split_right(&mut self) -> Option<Treap<K, V>> {
        if !self.is_empty() {
            return None;
        }

        let mut temp = BasicTree::Empty;
        // in the first round, this value is irrelevant. choosing this will skip the first if.
        let mut prev_side = self.walker.is_left_son().unwrap_or(Side::Right);

        while let Ok(side) = self.walker.go_up() {
            if prev_side != side {
                let node = self.walker.node_mut().unwrap();
                std::mem::swap(&mut temp, node.son_mut(side));
                node.rebuild();
            }
            prev_side = side;
        }

        if prev_side == Side::Left {
            std::mem::swap(self.walker.inner_mut(), &mut temp);
        }
        Some(Treap {
            tree: temp,
            rng: StdRng::seed_from_u64(self.rng.gen()),
        })
    }

    /// Same as [`SplittableWalker::split_right`], except that the keys
    /// before the current position are returned, and the rest stay.
    fn split_left(&mut self) -> Option<Self::T> {
        let mut right = self.split_right()?;
        std::mem::swap(self.walker.inner_mut(), &mut right.tree);
        Some(right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_with(seed: u64, keys: impl IntoIterator<Item = u32>) -> Treap<u32, u32> {
        let mut tree = Treap::with_seed(seed);
        for key in keys {
            tree.insert(key, key);
        }
        tree
    }

    #[test]
    fn insert_upholds_both_orders() {
        let tree = seeded_with(0xbeef, (0..200).map(|i| (i * 89) % 200));
        tree.assert_correctness();
        assert!(tree.is_treap());
        assert_eq!(tree.size(), 200);
        let keys: Vec<u32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (0..200).collect::<Vec<_>>());

        // the root's priority is the maximum
        let root_priority = tree.priority().unwrap();
        tree.tree.traverse_preorder(&mut |node, _, _| {
            assert!(*node.alg_data() <= root_priority);
        });
    }

    #[test]
    fn delete_everything_in_another_order() {
        let mut tree = seeded_with(17, 0..200);
        for i in 0..200 {
            let key = (i * 71) % 200;
            assert_eq!(tree.remove(&key), Some((key, key)));
            if i % 25 == 0 {
                tree.assert_correctness();
            }
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn union_interleaves() {
        let evens = seeded_with(1, (0..100).map(|x| x * 2));
        let odds = seeded_with(2, (0..100).map(|x| x * 2 + 1));
        let tree = union(evens, odds);
        tree.assert_correctness();
        let keys: Vec<u32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn split_and_concatenate_are_inverses() {
        let mut tree = seeded_with(99, 0..100);
        let mut walker = methods::search(&mut tree, &60);
        methods::previous_empty(&mut walker).unwrap();
        let right = walker.split_right().unwrap();
        drop(walker);
        assert_eq!(tree.size(), 60);
        assert_eq!(right.size(), 40);
        tree.assert_correctness();
        right.assert_correctness();

        tree.concatenate_right(right);
        tree.assert_correctness();
        assert_eq!(tree.size(), 100);
    }
}
