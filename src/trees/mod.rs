//! This module contains the tree trait family and the specific balanced
//! search trees implementing it.
//!
//! All of the trees store key-value pairs ordered by key, and are built by
//! wrapping around the [`basic_tree::BasicTree`] type, specialized with the
//! policy's bookkeeping data. Walkers for the specific trees are built by
//! wrapping around the [`basic_tree::BasicWalker`] type in the same way.

#[macro_use]
mod macros;

pub mod basic_tree;
pub mod methods;

pub mod avl;
pub mod rb;
pub mod splay;
pub mod treap;

use basic_tree::iterators;

/// Which son of its parent a node is.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Returns the other side.
    pub fn flip(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// The main trait for ordered search trees. The methods every tree variant
/// supports, regardless of its balancing policy.
///
/// Lookup methods take `&mut self` because some trees restructure themselves
/// on access (splay trees move every accessed node to the root).
pub trait SomeTree<K: Ord, V>: SomeEntry<K, V> + Default
where
    for<'a> &'a mut Self: SomeTreeRef<K, V>,
{
    /// The policy's per-node bookkeeping type: a color for red-black trees,
    /// a rank for AVL trees, a priority for treaps.
    type TreeData;

    /// Creates an empty tree.
    fn new() -> Self;

    /// The number of keys in the tree.
    fn size(&self) -> usize;

    /// In-order iteration over the key-value pairs.
    fn iter(&self) -> iterators::Iter<'_, K, V, Self::TreeData>;

    /// Returns the value associated with `key`, if present.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns a mutable reference to the value associated with `key`.
    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    /// Whether `key` is present in the tree.
    fn contains(&mut self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Exclusive insert. If `key` is not already present, inserts the pair
    /// and returns [`None`]. Otherwise the tree is left untouched and the
    /// rejected pair is handed back to the caller.
    fn insert(&mut self, key: K, value: V) -> Option<(K, V)>;

    /// Multiset insert: always inserts, even if `key` is already present.
    /// Equal keys are kept in insertion order.
    fn insert_dup(&mut self, key: K, value: V);

    /// Removes `key` from the tree and returns the detached pair.
    /// Removing an absent key is a no-op returning [`None`].
    fn remove(&mut self, key: &K) -> Option<(K, V)>;

    /// Order statistics: returns the `index`-th smallest key (zero-based)
    /// and its value.
    fn select(&self, index: usize) -> Option<(&K, &V)>;

    /// The in-order position of `key`: `Ok(index)` if present,
    /// `Err(index)` with the would-be insertion index otherwise.
    fn position(&mut self, key: &K) -> Result<usize, usize>;

    /// Empties the tree, deallocating iteratively so that arbitrarily deep
    /// trees don't overflow the stack.
    fn clear(&mut self);

    /// Checks that the tree upholds both the search-tree order and its
    /// variant's balance invariant. Panics otherwise. Meant for tests.
    fn assert_correctness(&self);
}

/// A mutable reference to a tree, which can hand out a walker over it.
pub trait SomeTreeRef<K: Ord, V> {
    type Walker: SomeWalker<K, V>;
    fn walker(self) -> Self::Walker;
}

/// A walker holds a mutable reference to a tree and a position inside it,
/// and can move up and down. The position may be a node, or an empty slot
/// hanging off a node (where a key could be inserted).
pub trait SomeWalker<K: Ord, V>: SomeEntry<K, V> {
    /// Goes to the left son. Returns `Err(())` at an empty position.
    fn go_left(&mut self) -> Result<(), ()>;
    /// Goes to the right son. Returns `Err(())` at an empty position.
    fn go_right(&mut self) -> Result<(), ()>;
    /// Goes up once, returning which son the previous position was.
    /// Returns `Err(())` at the root.
    fn go_up(&mut self) -> Result<Side, ()>;

    /// The current depth: the root is at depth zero.
    fn depth(&self) -> usize;

    /// How many keys of the whole tree lie strictly before the current
    /// subtree, in key order.
    fn far_left_count(&self) -> usize;
    /// How many keys of the whole tree lie strictly after the current
    /// subtree, in key order.
    fn far_right_count(&self) -> usize;
}

/// Read access to the node at a tree's root, or at a walker's current
/// position.
pub trait SomeEntry<K: Ord, V> {
    /// The key at the current position, or [`None`] at an empty position.
    fn key(&self) -> Option<&K>;

    /// The value at the current position, or [`None`] at an empty position.
    fn value(&self) -> Option<&V>;

    /// Applies `f` to the value at the current position.
    fn with_value<F, R>(&mut self, f: F) -> Option<R>
    where
        F: FnOnce(&mut V) -> R;

    /// The number of keys in the current subtree.
    fn subtree_size(&self) -> usize;

    /// The size of the current node's left subtree, or [`None`] at an empty
    /// position.
    fn left_subtree_size(&self) -> Option<usize>;

    /// The size of the current node's right subtree, or [`None`] at an empty
    /// position.
    fn right_subtree_size(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.subtree_size() == 0
    }
}

/// Trees whose walkers can insert and delete.
pub trait ModifiableTreeRef<K: Ord, V>:
    SomeTreeRef<K, V, Walker = Self::ModifiableWalker>
{
    type ModifiableWalker: ModifiableWalker<K, V>;
}

/// A walker that can insert a pair into an empty position, and delete the
/// node at the current position, rebalancing as its tree variant requires.
pub trait ModifiableWalker<K: Ord, V>: SomeWalker<K, V> {
    /// Inserts the pair at the current empty position, rebalancing.
    /// If the current position isn't empty, returns [`None`].
    fn insert(&mut self, key: K, value: V) -> Option<()>;

    /// Removes the node at the current position and returns its pair,
    /// rebalancing. If the current position is empty, returns [`None`].
    fn delete(&mut self) -> Option<(K, V)>;
}

/// Trees whose walkers can split them.
pub trait SplittableTreeRef<K: Ord, V>:
    SomeTreeRef<K, V, Walker = Self::SplittableWalker>
{
    /// The tree type this walker splits off.
    type T;
    type SplittableWalker: SplittableWalker<K, V, T = Self::T>;
}

/// A walker that can split its tree at the current empty position.
pub trait SplittableWalker<K: Ord, V>: ModifiableWalker<K, V> {
    type T;

    /// Splits the tree in two at the current empty position: everything
    /// before the position stays, everything after it is returned as a new
    /// tree. Returns [`None`] if the current position isn't empty.
    fn split_right(&mut self) -> Option<Self::T>;

    /// Same as [`SplittableWalker::split_right`], except that the keys
    /// before the current position are returned, and the rest stay.
    fn split_left(&mut self) -> Option<Self::T>;
}

/// Trees that can be concatenated.
pub trait ConcatenableTree<K: Ord, V>: SomeTree<K, V>
where
    for<'a> &'a mut Self: SomeTreeRef<K, V>,
{
    /// Concatenates `other` into `self`, in place.
    /// All keys of `other` must be greater than all keys of `self`.
    fn concatenate_right(&mut self, other: Self);

    /// Concatenates two trees into one.
    /// All keys of `right` must be greater than all keys of `left`.
    fn concatenate(left: Self, right: Self) -> Self {
        let mut tree = left;
        tree.concatenate_right(right);
        tree
    }
}
