//! The basic tree module.
//! This module implements the plain, unbalanced search tree that all of the
//! balanced variants wrap around, and the generic node algorithms operating
//! on it: search, unbalanced insertion and removal, split and join,
//! traversals, and the structural checkers used by tests.

mod implementations;
pub mod iterators;
mod iterative_deallocator;
mod walker;

pub use implementations::*;
pub use iterative_deallocator::deallocate_iteratively;
pub use walker::*;

use crate::trees::Side;
use std::cmp::Ordering;
use std::fmt::Write as _;

/// A basic tree. Might be empty.
///
/// The empty case doubles as the "no child" marker: a leaf is a node whose
/// sons are both [`BasicTree::Empty`]. There is no shared sentinel node.
///
/// `T` is the balancing policy's per-node bookkeeping data: `()` for plain
/// and splay trees, a rank for AVL trees, a color for red-black trees, a
/// priority for treaps.
pub enum BasicTree<K, V, T = ()> {
    Empty,
    Root(Box<BasicNode<K, V, T>>),
}
use BasicTree::*;

/// A basic node. Can be viewed as a non-empty basic tree: it always holds
/// at least one key.
pub struct BasicNode<K, V, T = ()> {
    key: K,
    value: V,
    /// The number of nodes in this node's subtree, including itself.
    /// Kept current by [`BasicNode::rebuild`].
    size: usize,
    pub(crate) alg_data: T,
    pub left: BasicTree<K, V, T>,
    pub right: BasicTree<K, V, T>,
}

impl<K, V, T> BasicNode<K, V, T> {
    pub fn new_alg(key: K, value: V, alg_data: T) -> BasicNode<K, V, T> {
        BasicNode {
            key,
            value,
            size: 1,
            alg_data,
            left: Empty,
            right: Empty,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn alg_data(&self) -> &T {
        &self.alg_data
    }

    /// The size of this node's subtree, including itself.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The son on the given side.
    pub fn son(&self, side: Side) -> &BasicTree<K, V, T> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// The son on the given side.
    pub fn son_mut(&mut self, side: Side) -> &mut BasicTree<K, V, T> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Consumes the node, returning its key-value pair.
    /// The node's sons are dropped.
    pub fn into_kv(self) -> (K, V) {
        (self.key, self.value)
    }

    /// Remakes the data that is stored in this node, based on its sons.
    /// Must be called whenever a son subtree might have changed, on the way
    /// back up to the root.
    pub fn rebuild(&mut self) {
        self.size = 1 + self.left.subtree_size() + self.right.subtree_size();
    }
}

impl<K, V, T: Default> BasicNode<K, V, T> {
    pub fn new(key: K, value: V) -> BasicNode<K, V, T> {
        BasicNode::new_alg(key, value, T::default())
    }
}

impl<K, V, T> BasicTree<K, V, T> {
    pub fn new() -> Self {
        Empty
    }

    pub fn from_node(node: BasicNode<K, V, T>) -> Self {
        Root(Box::new(node))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Empty)
    }

    pub fn node(&self) -> Option<&BasicNode<K, V, T>> {
        match self {
            Empty => None,
            Root(node) => Some(node),
        }
    }

    pub fn node_mut(&mut self) -> Option<&mut BasicNode<K, V, T>> {
        match self {
            Empty => None,
            Root(node) => Some(node),
        }
    }

    pub fn into_node_boxed(self) -> Option<Box<BasicNode<K, V, T>>> {
        match self {
            Empty => None,
            Root(node) => Some(node),
        }
    }

    /// Takes the tree out, leaving [`BasicTree::Empty`] in its place.
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Empty)
    }

    /// The number of keys in this tree.
    pub fn subtree_size(&self) -> usize {
        match self.node() {
            None => 0,
            Some(node) => node.size(),
        }
    }

    /// The number of nodes on the longest root-to-leaf path.
    /// The empty tree has height zero.
    pub fn height(&self) -> usize {
        match self.node() {
            None => 0,
            Some(node) => 1 + std::cmp::max(node.left.height(), node.right.height()),
        }
    }

    /// Remakes the data that is stored in the root node, based on its sons.
    pub fn rebuild(&mut self) {
        if let Root(node) = self {
            node.rebuild();
        }
    }
}

// The generic keyed node algorithms. These only rewire links: nodes are
// allocated and freed by whoever owns the tree, never here.
impl<K: Ord, V, T> BasicTree<K, V, T> {
    /// Standard search by key.
    pub fn search(&self, key: &K) -> Option<&BasicNode<K, V, T>> {
        let mut current = self;
        loop {
            let node = current.node()?;
            match key.cmp(&node.key) {
                Ordering::Less => current = &node.left,
                Ordering::Greater => current = &node.right,
                Ordering::Equal => return Some(node),
            }
        }
    }

    pub fn search_mut(&mut self, key: &K) -> Option<&mut BasicNode<K, V, T>> {
        let mut current = self;
        loop {
            match current {
                Empty => return None,
                Root(node) => match key.cmp(&node.key) {
                    Ordering::Less => current = &mut node.left,
                    Ordering::Greater => current = &mut node.right,
                    Ordering::Equal => return Some(node),
                },
            }
        }
    }

    /// Unbalanced exclusive insertion. If the node's key is already in the
    /// tree, nothing is inserted and the node is handed back.
    pub fn insert_node(
        &mut self,
        mut new: Box<BasicNode<K, V, T>>,
    ) -> Option<Box<BasicNode<K, V, T>>> {
        match self {
            Empty => {
                new.rebuild();
                *self = Root(new);
                None
            }
            Root(node) => {
                let rejected = match new.key.cmp(&node.key) {
                    Ordering::Less => node.left.insert_node(new),
                    Ordering::Greater => node.right.insert_node(new),
                    Ordering::Equal => Some(new),
                };
                if rejected.is_none() {
                    node.rebuild();
                }
                rejected
            }
        }
    }

    /// Unbalanced multiset insertion: always inserts. Equal keys go to the
    /// right, so they end up in insertion order.
    pub fn insert_node_dup(&mut self, mut new: Box<BasicNode<K, V, T>>) {
        match self {
            Empty => {
                new.rebuild();
                *self = Root(new);
            }
            Root(node) => {
                if new.key < node.key {
                    node.left.insert_node_dup(new);
                } else {
                    node.right.insert_node_dup(new);
                }
                node.rebuild();
            }
        }
    }

    /// Unbalanced removal by key. Returns the detached node, with both of
    /// its sons unlinked, so the caller decides its fate.
    ///
    /// A node with two sons is replaced by its in-order successor.
    pub fn remove_node(&mut self, key: &K) -> Option<Box<BasicNode<K, V, T>>> {
        let ord = match self.node() {
            None => return None,
            Some(node) => key.cmp(&node.key),
        };
        match ord {
            Ordering::Less => {
                let node = self.node_mut().unwrap();
                let removed = node.left.remove_node(key);
                if removed.is_some() {
                    node.rebuild();
                }
                removed
            }
            Ordering::Greater => {
                let node = self.node_mut().unwrap();
                let removed = node.right.remove_node(key);
                if removed.is_some() {
                    node.rebuild();
                }
                removed
            }
            Ordering::Equal => {
                let mut node = self.take().into_node_boxed().unwrap();
                if node.right.is_empty() {
                    *self = node.left.take();
                } else {
                    let mut succ = node.right.detach_min().unwrap();
                    succ.left = node.left.take();
                    succ.right = node.right.take();
                    succ.rebuild();
                    *self = Root(succ);
                }
                Some(node)
            }
        }
    }

    /// Detaches the node holding the smallest key.
    pub fn detach_min(&mut self) -> Option<Box<BasicNode<K, V, T>>> {
        if self.node()?.left.is_empty() {
            let mut min = self.take().into_node_boxed().unwrap();
            *self = min.right.take();
            Some(min)
        } else {
            let node = self.node_mut().unwrap();
            let min = node.left.detach_min();
            node.rebuild();
            min
        }
    }

    /// Detaches the node holding the greatest key.
    pub fn detach_max(&mut self) -> Option<Box<BasicNode<K, V, T>>> {
        if self.node()?.right.is_empty() {
            let mut max = self.take().into_node_boxed().unwrap();
            *self = max.left.take();
            Some(max)
        } else {
            let node = self.node_mut().unwrap();
            let max = node.right.detach_max();
            node.rebuild();
            max
        }
    }

    /// Partitions the tree around `key`: everything smaller, the exact
    /// match if present (with its sons unlinked), and everything greater.
    pub fn split_key(self, key: &K) -> (Self, Option<Box<BasicNode<K, V, T>>>, Self) {
        match self {
            Empty => (Empty, None, Empty),
            Root(mut node) => match key.cmp(&node.key) {
                Ordering::Less => {
                    let (smaller, found, rest) = node.left.take().split_key(key);
                    node.left = rest;
                    node.rebuild();
                    (smaller, found, Root(node))
                }
                Ordering::Greater => {
                    let (rest, found, greater) = node.right.take().split_key(key);
                    node.right = rest;
                    node.rebuild();
                    (Root(node), found, greater)
                }
                Ordering::Equal => {
                    let smaller = node.left.take();
                    let greater = node.right.take();
                    node.rebuild();
                    (smaller, Some(node), greater)
                }
            },
        }
    }

    /// Naive join: concatenates two trees, where all of `self`'s keys are
    /// smaller than all of `right`'s. The greatest key of the left tree
    /// becomes the new root. No rebalancing.
    pub fn join(mut self, right: Self) -> Self {
        match self.detach_max() {
            None => right,
            Some(mut root) => {
                root.left = self;
                root.right = right;
                root.rebuild();
                Root(root)
            }
        }
    }

    /// Order statistics: the node holding the `index`-th smallest key.
    pub fn select(&self, mut index: usize) -> Option<&BasicNode<K, V, T>> {
        let mut current = self;
        loop {
            let node = current.node()?;
            let left_size = node.left.subtree_size();
            match index.cmp(&left_size) {
                Ordering::Less => current = &node.left,
                Ordering::Equal => return Some(node),
                Ordering::Greater => {
                    index -= left_size + 1;
                    current = &node.right;
                }
            }
        }
    }

    /// The in-order position of `key`: `Ok(index)` if present, `Err` with
    /// the insertion index otherwise.
    pub fn position(&self, key: &K) -> Result<usize, usize> {
        let mut current = self;
        let mut before = 0;
        loop {
            let node = match current.node() {
                None => return Err(before),
                Some(node) => node,
            };
            match key.cmp(&node.key) {
                Ordering::Less => current = &node.left,
                Ordering::Equal => return Ok(before + node.left.subtree_size()),
                Ordering::Greater => {
                    before += node.left.subtree_size() + 1;
                    current = &node.right;
                }
            }
        }
    }

    /// Checks the search-tree order invariant: for every node, all keys in
    /// its left subtree are smaller than its key, and all keys in its right
    /// subtree are greater. Equal neighboring keys are accepted, so that
    /// multiset trees pass as well.
    pub fn is_bst(&self) -> bool {
        fn within<K: Ord, V, T>(
            tree: &BasicTree<K, V, T>,
            low: Option<&K>,
            high: Option<&K>,
        ) -> bool {
            match tree.node() {
                None => true,
                Some(node) => {
                    low.map_or(true, |l| *l <= node.key)
                        && high.map_or(true, |h| node.key <= *h)
                        && within(&node.left, low, Some(&node.key))
                        && within(&node.right, Some(&node.key), high)
                }
            }
        }
        within(self, None, None)
    }
}

impl<K, V, T> BasicTree<K, V, T> {
    /// Checks that every node's stored subtree size is one more than the sum
    /// of its sons' sizes.
    pub fn check_rank_tree(&self) -> bool {
        match self.node() {
            None => true,
            Some(node) => {
                node.size() == 1 + node.left.subtree_size() + node.right.subtree_size()
                    && node.left.check_rank_tree()
                    && node.right.check_rank_tree()
            }
        }
    }

    /// Asserts that the subtree sizes are correct everywhere and runs an
    /// additional local checker on every node. Panics on violation.
    pub fn assert_correctness_with<F>(&self, checker: F)
    where
        F: Fn(&BasicNode<K, V, T>) + Copy,
    {
        if let Some(node) = self.node() {
            assert_eq!(
                node.size(),
                1 + node.left.subtree_size() + node.right.subtree_size()
            );
            checker(node);
            node.left.assert_correctness_with(checker);
            node.right.assert_correctness_with(checker);
        }
    }

    /// Pre-order traversal. The visitor receives each node along with its
    /// depth and its zero-based visit position.
    pub fn traverse_preorder<F>(&self, visit: &mut F)
    where
        F: FnMut(&BasicNode<K, V, T>, usize, usize),
    {
        fn rec<K, V, T, F>(tree: &BasicTree<K, V, T>, depth: usize, pos: &mut usize, visit: &mut F)
        where
            F: FnMut(&BasicNode<K, V, T>, usize, usize),
        {
            if let Some(node) = tree.node() {
                visit(node, depth, *pos);
                *pos += 1;
                rec(&node.left, depth + 1, pos, visit);
                rec(&node.right, depth + 1, pos, visit);
            }
        }
        rec(self, 0, &mut 0, visit);
    }

    /// In-order traversal, visiting the keys in ascending order.
    pub fn traverse_inorder<F>(&self, visit: &mut F)
    where
        F: FnMut(&BasicNode<K, V, T>, usize, usize),
    {
        fn rec<K, V, T, F>(tree: &BasicTree<K, V, T>, depth: usize, pos: &mut usize, visit: &mut F)
        where
            F: FnMut(&BasicNode<K, V, T>, usize, usize),
        {
            if let Some(node) = tree.node() {
                rec(&node.left, depth + 1, pos, visit);
                visit(node, depth, *pos);
                *pos += 1;
                rec(&node.right, depth + 1, pos, visit);
            }
        }
        rec(self, 0, &mut 0, visit);
    }

    /// Post-order traversal.
    pub fn traverse_postorder<F>(&self, visit: &mut F)
    where
        F: FnMut(&BasicNode<K, V, T>, usize, usize),
    {
        fn rec<K, V, T, F>(tree: &BasicTree<K, V, T>, depth: usize, pos: &mut usize, visit: &mut F)
        where
            F: FnMut(&BasicNode<K, V, T>, usize, usize),
        {
            if let Some(node) = tree.node() {
                rec(&node.left, depth + 1, pos, visit);
                rec(&node.right, depth + 1, pos, visit);
                visit(node, depth, *pos);
                *pos += 1;
            }
        }
        rec(self, 0, &mut 0, visit);
    }
}

impl<K: std::fmt::Display, V, T> BasicTree<K, V, T> {
    /// Writes the two-line text dump consumed by the visualization tooling:
    /// the keys in pre-order on the first line, the subtree sizes in
    /// in-order on the second, both whitespace separated. The format is
    /// positional, not self-describing; readers match the two lines against
    /// each other to reconstruct the shape.
    pub fn write_dump<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut keys = String::new();
        self.traverse_preorder(&mut |node, _, pos| {
            if pos > 0 {
                keys.push(' ');
            }
            let _ = write!(keys, "{}", node.key());
        });
        let mut sizes = String::new();
        self.traverse_inorder(&mut |node, _, pos| {
            if pos > 0 {
                sizes.push(' ');
            }
            let _ = write!(sizes, "{}", node.size());
        });
        writeln!(writer, "{}", keys)?;
        writeln!(writer, "{}", sizes)
    }
}

impl<K: Clone, V: Clone, T: Clone> Clone for BasicNode<K, V, T> {
    fn clone(&self) -> Self {
        BasicNode {
            key: self.key.clone(),
            value: self.value.clone(),
            size: self.size,
            alg_data: self.alg_data.clone(),
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

impl<K: Clone, V: Clone, T: Clone> Clone for BasicTree<K, V, T> {
    fn clone(&self) -> Self {
        match self {
            Empty => Empty,
            Root(node) => Root(node.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &[i32]) -> BasicTree<i32, i32> {
        let mut tree = BasicTree::new();
        for &key in keys {
            assert!(tree.insert_node(Box::new(BasicNode::new(key, key * 10))).is_none());
        }
        tree
    }

    fn keys_of(tree: &BasicTree<i32, i32>) -> Vec<i32> {
        let mut keys = vec![];
        tree.traverse_inorder(&mut |node, _, _| keys.push(*node.key()));
        keys
    }

    #[test]
    fn insertion_keeps_order_and_sizes() {
        let tree = tree_of(&[5, 2, 8, 1, 3, 7, 9]);
        assert!(tree.is_bst());
        assert!(tree.check_rank_tree());
        assert_eq!(keys_of(&tree), vec![1, 2, 3, 5, 7, 8, 9]);
        assert_eq!(tree.subtree_size(), 7);
    }

    #[test]
    fn exclusive_insertion_rejects_duplicates() {
        let mut tree = tree_of(&[5, 2, 8]);
        let rejected = tree.insert_node(Box::new(BasicNode::new(5, 0))).unwrap();
        assert_eq!(rejected.into_kv(), (5, 0));
        assert_eq!(tree.subtree_size(), 3);
    }

    #[test]
    fn removal_splices_the_successor() {
        let mut tree = tree_of(&[5, 2, 8, 1, 3, 7, 9]);
        // 5 has two sons, so its successor 7 takes its place
        let removed = tree.remove_node(&5).unwrap();
        assert_eq!(removed.into_kv(), (5, 50));
        assert!(tree.is_bst());
        assert!(tree.check_rank_tree());
        assert_eq!(keys_of(&tree), vec![1, 2, 3, 7, 8, 9]);
        assert!(tree.remove_node(&100).is_none());
    }

    #[test]
    fn detach_ends() {
        let mut tree = tree_of(&[5, 2, 8, 1, 9]);
        assert_eq!(*tree.detach_min().unwrap().key(), 1);
        assert_eq!(*tree.detach_max().unwrap().key(), 9);
        assert!(tree.check_rank_tree());
        assert_eq!(keys_of(&tree), vec![2, 5, 8]);
    }

    #[test]
    fn split_key_and_join_are_inverses() {
        let tree = tree_of(&[5, 2, 8, 1, 3, 7, 9]);
        let (smaller, found, greater) = tree.split_key(&5);
        assert_eq!(*found.unwrap().key(), 5);
        assert_eq!(keys_of(&smaller), vec![1, 2, 3]);
        assert_eq!(keys_of(&greater), vec![7, 8, 9]);

        let joined = smaller.join(greater);
        assert!(joined.is_bst());
        assert!(joined.check_rank_tree());
        assert_eq!(keys_of(&joined), vec![1, 2, 3, 7, 8, 9]);

        // splitting at an absent key finds nothing
        let tree = tree_of(&[5, 2, 8]);
        let (smaller, found, greater) = tree.split_key(&6);
        assert!(found.is_none());
        assert_eq!(keys_of(&smaller), vec![2, 5]);
        assert_eq!(keys_of(&greater), vec![8]);
    }

    #[test]
    fn select_and_position_agree() {
        let tree = tree_of(&[50, 20, 80, 10, 30, 70, 90]);
        for (index, key) in [10, 20, 30, 50, 70, 80, 90].iter().enumerate() {
            assert_eq!(tree.select(index).unwrap().key(), key);
            assert_eq!(tree.position(key), Ok(index));
        }
        assert_eq!(tree.position(&35), Err(3));
        assert_eq!(tree.position(&100), Err(7));
        assert!(tree.select(7).is_none());
    }

    #[test]
    fn dump_lists_preorder_keys_and_inorder_sizes() {
        let tree = tree_of(&[2, 1, 3]);
        let mut out = Vec::new();
        tree.write_dump(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2 1 3\n1 3 1\n");
    }
}
