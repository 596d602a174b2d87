//! Map and set containers on top of the balanced trees.
//!
//! These wrap any of the tree types behind the familiar dictionary
//! interface. The balancing policy is a type parameter, defaulting to the
//! red-black tree; swapping in [`crate::trees::avl::AVLTree`],
//! [`crate::trees::splay::SplayTree`] or [`crate::trees::treap::Treap`]
//! changes the performance profile without changing the interface.
//!
//! Moving a container is `O(1)`: the tree is a single root link, so
//! ownership transfers without copying nodes. Cloning is a deep copy.

use crate::trees::basic_tree::iterators;
use crate::trees::rb::RBTree;
use crate::trees::{SomeTree, SomeTreeRef};
use std::marker::PhantomData;

/// An ordered map from keys to values, backed by a balanced search tree.
///
///```
/// use arbor::TreeMap;
///
/// let mut map: TreeMap<String, u32> = TreeMap::new();
/// map.insert("hello".to_string(), 4);
/// assert_eq!(map.get(&"hello".to_string()), Some(&4));
/// assert_eq!(map.get(&"world".to_string()), None);
///```
#[derive(Clone)]
pub struct TreeMap<K, V, T = RBTree<K, V>> {
    tree: T,
    _phantom: PhantomData<(K, V)>,
}

impl<K: Ord, V, T: SomeTree<K, V>> TreeMap<K, V, T>
where
    for<'a> &'a mut T: SomeTreeRef<K, V>,
{
    /// Creates an empty map.
    pub fn new() -> Self {
        TreeMap {
            tree: T::new(),
            _phantom: PhantomData,
        }
    }

    /// The number of pairs in the map.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value associated with `key`.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.tree.get(key)
    }

    /// Returns a mutable reference to the value associated with `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tree.get_mut(key)
    }

    pub fn contains_key(&mut self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Inserts a pair. If `key` was already present, its value is replaced
    /// and the old value returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.tree.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.tree.insert(key, value);
                None
            }
        }
    }

    /// Removes `key` and returns its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tree.remove(key).map(|(_, value)| value)
    }

    /// Removes `key` and returns the whole pair.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.tree.remove(key)
    }

    /// In-order iteration over the pairs, in ascending key order.
    pub fn iter(&self) -> iterators::Iter<'_, K, V, T::TreeData> {
        self.tree.iter()
    }

    /// Order statistics: the `index`-th smallest key and its value.
    pub fn select(&self, index: usize) -> Option<(&K, &V)> {
        self.tree.select(index)
    }

    /// The in-order position of `key`: `Ok(index)` if present, `Err` with
    /// the would-be insertion index otherwise.
    pub fn position(&mut self, key: &K) -> Result<usize, usize> {
        self.tree.position(key)
    }

    /// Empties the map. Deallocation is iterative, so this is safe on
    /// arbitrarily deep trees.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Checks the backing tree's invariants. Panics on violation.
    /// Meant for tests.
    pub fn assert_correctness(&self) {
        self.tree.assert_correctness();
    }
}

impl<K: Ord + Clone, V: Default, T: SomeTree<K, V>> TreeMap<K, V, T>
where
    for<'a> &'a mut T: SomeTreeRef<K, V>,
{
    /// Returns a mutable reference to the value of `key`, inserting the
    /// default value first if the key is absent.
    ///
    ///```
    /// use arbor::TreeMap;
    ///
    /// let mut counts: TreeMap<char, u32> = TreeMap::new();
    /// for c in "abracadabra".chars() {
    ///     *counts.get_or_default(c) += 1;
    /// }
    /// assert_eq!(counts.get(&'a'), Some(&5));
    /// assert_eq!(counts.get(&'r'), Some(&2));
    ///```
    pub fn get_or_default(&mut self, key: K) -> &mut V {
        if self.tree.get(&key).is_none() {
            self.tree.insert(key.clone(), V::default());
        }
        self.tree.get_mut(&key).unwrap()
    }
}

impl<K: Ord, V, T: SomeTree<K, V>> Default for TreeMap<K, V, T>
where
    for<'a> &'a mut T: SomeTreeRef<K, V>,
{
    fn default() -> Self {
        TreeMap::new()
    }
}

impl<K: Ord, V, T: SomeTree<K, V>> std::iter::FromIterator<(K, V)> for TreeMap<K, V, T>
where
    for<'a> &'a mut T: SomeTreeRef<K, V>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TreeMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K, V, T: IntoIterator<Item = (K, V)>> IntoIterator for TreeMap<K, V, T> {
    type Item = (K, V);
    type IntoIter = T::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

/// An ordered set of keys, backed by a balanced search tree.
///
///```
/// use arbor::TreeSet;
///
/// let mut set: TreeSet<i32> = (0..10).collect();
/// assert!(set.contains(&7));
/// assert!(set.remove(&7));
/// assert!(!set.contains(&7));
///```
#[derive(Clone)]
pub struct TreeSet<K, T = RBTree<K, ()>> {
    map: TreeMap<K, (), T>,
}

impl<K: Ord, T: SomeTree<K, ()>> TreeSet<K, T>
where
    for<'a> &'a mut T: SomeTreeRef<K, ()>,
{
    /// Creates an empty set.
    pub fn new() -> Self {
        TreeSet { map: TreeMap::new() }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&mut self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Inserts `key`. Returns whether it was newly inserted.
    pub fn insert(&mut self, key: K) -> bool {
        self.map.insert(key, ()).is_none()
    }

    /// Removes `key`. Returns whether it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    /// In-order iteration over the keys, ascending.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.map.iter().map(|(key, _)| key)
    }

    /// Order statistics: the `index`-th smallest key.
    pub fn select(&self, index: usize) -> Option<&K> {
        self.map.select(index).map(|(key, _)| key)
    }

    /// The in-order position of `key`: `Ok(index)` if present, `Err` with
    /// the would-be insertion index otherwise.
    pub fn position(&mut self, key: &K) -> Result<usize, usize> {
        self.map.position(key)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Checks the backing tree's invariants. Panics on violation.
    /// Meant for tests.
    pub fn assert_correctness(&self) {
        self.map.assert_correctness();
    }
}

impl<K: Ord, T: SomeTree<K, ()>> Default for TreeSet<K, T>
where
    for<'a> &'a mut T: SomeTreeRef<K, ()>,
{
    fn default() -> Self {
        TreeSet::new()
    }
}

impl<K: Ord, T: SomeTree<K, ()>> std::iter::FromIterator<K> for TreeSet<K, T>
where
    for<'a> &'a mut T: SomeTreeRef<K, ()>,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = TreeSet::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl<K, T: IntoIterator<Item = (K, ())>> IntoIterator for TreeSet<K, T> {
    type Item = K;
    type IntoIter = std::iter::Map<T::IntoIter, fn((K, ())) -> K>;

    fn into_iter(self) -> Self::IntoIter {
        let first: fn((K, ())) -> K = |(key, ())| key;
        self.map.into_iter().map(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trees::avl::AVLTree;
    use crate::trees::splay::SplayTree;
    use crate::trees::treap::Treap;

    #[test]
    fn map_insert_replaces() {
        let mut map: TreeMap<&str, i32> = TreeMap::new();
        assert_eq!(map.insert("a", 1), None);
        assert_eq!(map.insert("a", 2), Some(1));
        assert_eq!(map.get(&"a"), Some(&2));
        assert_eq!(map.len(), 1);
        map.assert_correctness();
    }

    #[test]
    fn map_remove() {
        let mut map: TreeMap<u32, u32> = (0..50).map(|x| (x, x * x)).collect();
        assert_eq!(map.remove(&20), Some(400));
        assert_eq!(map.remove(&20), None);
        assert_eq!(map.remove_entry(&21), Some((21, 441)));
        assert_eq!(map.len(), 48);
        map.assert_correctness();
    }

    #[test]
    fn map_order_statistics() {
        let mut map: TreeMap<u32, ()> = (0..100).map(|x| (x * 3, ())).collect();
        assert_eq!(map.select(40), Some((&120, &())));
        assert_eq!(map.position(&120), Ok(40));
        assert_eq!(map.position(&121), Err(41));
        map.assert_correctness();
    }

    #[test]
    fn map_works_over_every_policy() {
        fn run<T: SomeTree<u32, u32>>()
        where
            for<'a> &'a mut T: SomeTreeRef<u32, u32>,
        {
            let mut map: TreeMap<u32, u32, T> = TreeMap::new();
            for i in 0..100 {
                map.insert((i * 11) % 100, i);
            }
            for i in 0..100 {
                assert!(map.contains_key(&i));
            }
            map.assert_correctness();
            assert_eq!(map.remove(&33), Some(3));
            map.assert_correctness();
            assert_eq!(map.len(), 99);
            map.clear();
            assert!(map.is_empty());
        }
        run::<RBTree<u32, u32>>();
        run::<AVLTree<u32, u32>>();
        run::<SplayTree<u32, u32>>();
        run::<Treap<u32, u32>>();
    }

    #[test]
    fn set_behaves_like_a_set() {
        let mut set: TreeSet<i32> = TreeSet::new();
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.contains(&3));
        assert_eq!(set.len(), 1);
        assert!(set.remove(&3));
        assert!(!set.remove(&3));
        set.assert_correctness();
    }

    #[test]
    fn iteration_is_sorted() {
        let map: TreeMap<u32, u32> = (0..100).map(|i| (((i * 17) % 100), i)).collect();
        let keys: Vec<u32> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (0..100).collect::<Vec<_>>());
    }
}
