//! Implementation of red-black trees.
//!
//! Every node carries one bit of bookkeeping, its color. The tree maintains
//! that no red node has a red son, that the root is black, and that every
//! root-to-leaf path crosses the same number of black nodes. Together these
//! bound the height by `2*log(n+1)`, with at most two rotations per
//! insertion and at most three per deletion.

use super::basic_tree::*;
use super::*;

/// The per-node bookkeeping of the red-black tree.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    Red,
    Black,
}

/// For reading and writing colors of trees and nodes alike.
/// An empty tree reads as black.
trait Colored {
    fn color(&self) -> Color;
    fn set_color(&mut self, color: Color);
}

impl<K, V> Colored for BasicTree<K, V, Color> {
    fn color(&self) -> Color {
        match self.node() {
            None => Color::Black,
            Some(node) => node.alg_data,
        }
    }

    fn set_color(&mut self, color: Color) {
        if let Some(node) = self.node_mut() {
            node.alg_data = color;
        }
    }
}

/// A red-black tree storing key-value pairs ordered by key.
///
/// This is the default balancing policy of the containers in [`crate::maps`]:
/// it does fewer restructuring writes than an AVL tree on mixed workloads,
/// at the price of a slightly looser height bound.
#[derive(Clone)]
pub struct RBTree<K, V> {
    tree: BasicTree<K, V, Color>,
}

impl<K, V> RBTree<K, V> {
    /// Creates an empty [`RBTree`].
    pub fn new() -> Self {
        RBTree {
            tree: BasicTree::Empty,
        }
    }

    /// The height of the tree: the number of nodes on the longest
    /// root-to-leaf path.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Asserts that the tree's colors uphold the red-black invariants:
    /// the root is black, no red node has a red son, and all root-to-leaf
    /// paths cross the same number of black nodes. Otherwise, panics.
    pub fn assert_colors(&self) {
        assert_eq!(self.tree.color(), Color::Black);
        Self::black_height(&self.tree);
    }

    /// Checks the color invariants recursively, returning the number of
    /// black nodes on every path down from this subtree.
    fn black_height(tree: &BasicTree<K, V, Color>) -> usize {
        match tree.node() {
            None => 0,
            Some(node) => {
                if node.alg_data == Color::Red {
                    assert_eq!(node.left.color(), Color::Black);
                    assert_eq!(node.right.color(), Color::Black);
                }
                let left_height = Self::black_height(&node.left);
                let right_height = Self::black_height(&node.right);
                assert_eq!(left_height, right_height);
                left_height + if node.alg_data == Color::Black { 1 } else { 0 }
            }
        }
    }

    /// Checks the color invariants without panicking: the root is black, no
    /// red node has a red son, and all root-to-leaf paths cross the same
    /// number of black nodes. Test-only usage.
    pub fn is_red_black(&self) -> bool {
        fn check<K, V>(tree: &BasicTree<K, V, Color>) -> Option<usize> {
            match tree.node() {
                None => Some(0),
                Some(node) => {
                    if node.alg_data == Color::Red
                        && (node.left.color() == Color::Red || node.right.color() == Color::Red)
                    {
                        return None;
                    }
                    let left_height = check(&node.left)?;
                    let right_height = check(&node.right)?;
                    if left_height != right_height {
                        return None;
                    }
                    Some(left_height + if node.alg_data == Color::Black { 1 } else { 0 })
                }
            }
        }
        self.tree.color() == Color::Black && check(&self.tree).is_some()
    }
}

impl<K: std::fmt::Display, V> RBTree<K, V> {
    /// Writes the two-line text dump of the tree: the keys in pre-order on
    /// the first line, the subtree sizes in in-order on the second.
    pub fn write_dump<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.tree.write_dump(writer)
    }
}

impl<K, V> Default for RBTree<K, V> {
    fn default() -> Self {
        RBTree::new()
    }
}

impl<K: Ord, V> SomeTree<K, V> for RBTree<K, V> {
    type TreeData = Color;

    fn new() -> Self {
        RBTree::new()
    }

    fn size(&self) -> usize {
        self.tree.subtree_size()
    }

    fn iter(&self) -> iterators::Iter<'_, K, V, Color> {
        iterators::Iter::new(&self.tree)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.tree.search(key).map(|node| node.value())
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tree.search_mut(key).map(|node| node.value_mut())
    }

    /// Inserts the pair, recoloring and rotating as needed.
    ///
    ///```
    /// use arbor::{SomeTree, rb::RBTree};
    ///
    /// let mut tree: RBTree<i32, char> = RBTree::new();
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
        self.assert_colors();
    }
}

impl<'a, K: Ord, V> SomeTreeRef<K, V> for &'a mut RBTree<K, V> {
    type Walker = RBWalker<'a, K, V>;

    fn walker(self) -> Self::Walker {
        RBWalker {
            walker: BasicWalker::new(&mut self.tree),
        }
    }
}

impl<'a, K: Ord, V> ModifiableTreeRef<K, V> for &'a mut RBTree<K, V> {
    type ModifiableWalker = RBWalker<'a, K, V>;
}

derive_SomeEntry! {tree,
    impl<K: Ord, V> SomeEntry<K, V> for RBTree<K, V> {}
}

impl<K: Ord, V> std::iter::FromIterator<(K, V)> for RBTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = RBTree::new();
        for (key, value) in iter {
            tree.insert_dup(key, value);
        }
        tree
    }
}

impl<K, V> IntoIterator for RBTree<K, V> {
    type Item = (K, V);
    type IntoIter = iterators::IntoIter<K, V, Color>;

    fn into_iter(self) -> Self::IntoIter {
        iterators::IntoIter::new(self.tree)
    }
}

impl<'a, K, V> IntoIterator for &'a RBTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = iterators::Iter<'a, K, V, Color>;

    fn into_iter(self) -> Self::IntoIter {
        iterators::Iter::new(&self.tree)
    }
}

/// A walker struct for [`RBTree`].
pub struct RBWalker<'a, K, V> {
    walker: BasicWalker<'a, K, V, Color>,
}

impl<'a, K, V> Drop for RBWalker<'a, K, V> {
    fn drop(&mut self) {
        self.walker.go_to_root()
    }
}

derive_SomeWalker! {walker,
    impl<'a, K: Ord, V> SomeWalker<K, V> for RBWalker<'a, K, V> {
        fn go_up(&mut self) -> Result<Side, ()> {
            self.walker.go_up()
        }
    }
}

derive_SomeEntry! {walker,
    impl<'a, K: Ord, V> SomeEntry<K, V> for RBWalker<'a, K, V> {}
}

impl<'a, K: Ord, V> RBWalker<'a, K, V> {
    /// The color of the current node. An empty position reads as black.
    fn color(&self) -> Color {
        self.walker.inner().color()
    }

    fn set_color(&mut self, color: Color) {
        self.walker.inner_mut().set_color(color);
    }

    fn son_color(&self, side: Side) -> Color {
        match self.walker.node() {
            None => Color::Black,
            Some(node) => node.son(side).color(),
        }
    }

    fn set_son_color(&mut self, side: Side, color: Color) {
        if let Some(node) = self.walker.node_mut() {
            node.son_mut(side).set_color(color);
        }
    }

    /// The color of the current node's grandson on the path `s1`, `s2`.
    fn grandson_color(&self, s1: Side, s2: Side) -> Color {
        match self.walker.node().and_then(|node| node.son(s1).node()) {
            None => Color::Black,
            Some(mid) => mid.son(s2).color(),
        }
    }

    /// Restores the red invariant after a red node was inserted at the
    /// current position. The only possible violation is between the new
    /// node and its parent; as long as the parent is red, recolor or rotate
    /// and reconsider further up. Ends at the root.
    fn fix_red(&mut self) {
        loop {
            let side_p = match self.walker.go_up() {
                Err(()) => break,
                Ok(side) => side,
            };
            if self.color() == Color::Black {
                break;
            }
            // the parent is red, so it isn't the root: the grandparent exists
            let side_g = self.walker.go_up().unwrap();

            if self.son_color(side_g.flip()) == Color::Red {
                // red uncle: push the grandparent's blackness down and
                // reconsider from the grandparent
                self.set_son_color(side_g, Color::Black);
                self.set_son_color(side_g.flip(), Color::Black);
                self.set_color(Color::Red);
                continue;
            }

            if side_p != side_g {
                // zig-zag: rotate the new node over its parent first
                self.walker.go_side(side_g).unwrap();
                self.walker.rot_side(side_p.flip()).unwrap();
                self.walker.go_up().unwrap();
            }
            // raise the parent over the black grandparent
            self.walker.rot_side(side_g.flip()).unwrap();
            self.set_color(Color::Black);
            self.set_son_color(side_g.flip(), Color::Red);
            break;
        }
        // the root is black, no matter what
        self.walker.go_to_root();
        self.set_color(Color::Black);
    }

    /// The subtree hanging off the `deficit` son of the current node is one
    /// black node short on every path. Restores the invariant locally.
    /// Returns `true` if the deficit was absorbed, `false` if the current
    /// node's whole subtree is now one black node short instead.
    fn fix_black_step(&mut self, deficit: Side) -> bool {
        loop {
            let sib = deficit.flip();
            // the deficit side is the short one, so the sibling is a real node
            if self.son_color(sib) == Color::Red {
                // red sibling: the parent is black. raise the sibling and
                // descend, so that the new sibling is black
                self.set_son_color(sib, Color::Black);
                self.set_color(Color::Red);
                self.walker.rot_side(deficit).unwrap();
                self.walker.go_side(deficit).unwrap();
                continue;
            }
            if self.grandson_color(sib, sib) == Color::Red {
                // red far nephew: one rotation pays the deficit side's debt
                let parent_color = self.color();
                self.set_color(Color::Black);
                self.set_son_color(sib, parent_color);
                if let Some(sibling) = self.walker.node_mut().unwrap().son_mut(sib).node_mut() {
                    sibling.son_mut(sib).set_color(Color::Black);
                }
                self.walker.rot_side(deficit).unwrap();
                return true;
            }
            if self.grandson_color(sib, deficit) == Color::Red {
                // red near nephew: rotate it over the sibling, turning it
                // into a red far nephew
                self.walker.go_side(sib).unwrap();
                self.set_color(Color::Red);
                self.set_son_color(deficit, Color::Black);
                self.walker.rot_side(sib).unwrap();
                self.walker.go_up().unwrap();
                continue;
            }
            // both nephews black: paint the sibling red, equalizing the
            // sons at one less black each
            self.set_son_color(sib, Color::Red);
            if self.color() == Color::Red {
                self.set_color(Color::Black);
                return true;
            }
            return false;
        }
    }

    /// Propagates a black deficit upwards until it is absorbed or falls off
    /// the root. Returns `true` if it was absorbed inside the tree.
    fn fix_black(&mut self, mut deficit: Side) -> bool {
        loop {
            if self.fix_black_step(deficit) {
                return true;
            }
            match self.walker.go_up() {
                Err(()) => return false,
                Ok(side) => deficit = side,
            }
        }
    }

    /// Deletes the node at the current position and returns it with the
    /// box, restoring the color invariants.
    ///
    /// A node with two sons is spliced out by grafting its in-order
    /// successor in its place, wearing the deleted node's color; the color
    /// fixup then runs where the successor used to be.
    fn delete_boxed(&mut self) -> Option<Box<BasicNode<K, V, Color>>> {
        let mut node = self.walker.take_subtree().into_node_boxed()?;
        if node.right.is_empty() {
            let child = node.left.take();
            let child_missing = child.is_empty();
            self.walker.put_subtree(child).unwrap();
            if node.alg_data == Color::Black {
                if !child_missing {
                    // a black node's lone son is necessarily red
                    self.walker.inner_mut().set_color(Color::Black);
                } else if let Ok(side) = self.walker.go_up() {
                    self.fix_black(side);
                }
            }
        } else {
            let target_color = node.alg_data;
            let mut right = node.right.take();
            let mut resolved = true;
            let mut succ;
            {
                let mut inner = RBWalker {
                    walker: BasicWalker::new(&mut right),
                };
                while inner.walker.go_left().is_ok() {}
                let res = inner.walker.go_up();
                assert_eq!(res, Ok(Side::Left));

                succ = inner.walker.take_subtree().into_node_boxed().unwrap();
                assert!(succ.left.is_empty());
                let child = succ.right.take();
                let child_missing = child.is_empty();
                inner.walker.put_subtree(child).unwrap();
                if succ.alg_data == Color::Black {
                    if !child_missing {
                        inner.walker.inner_mut().set_color(Color::Black);
                    } else {
                        match inner.walker.go_up() {
                            // the successor was the right subtree's root
                            Err(()) => resolved = false,
                            Ok(side) => resolved = inner.fix_black(side),
                        }
                    }
                }
                // inner is dropped here, rebuilding the sizes on its path
            }
            succ.left = node.left.take();
            succ.right = right;
            succ.alg_data = target_color;
            succ.rebuild();
            self.walker.put_subtree(BasicTree::Root(succ)).unwrap();
            if !resolved {
                // the grafted node's right subtree is still one black short
                self.fix_black(Side::Right);
            }
        }
        Some(node)
    }
}

impl<'a, K: Ord, V> ModifiableWalker<K, V> for RBWalker<'a, K, V> {
    /// Inserts the pair at the current empty position as a red node, then
    /// recolors and rotates upwards as needed.
    /// When the function returns, the walker will be at the root.
    fn insert(&mut self, key: K, value: V) -> Option<()> {
        self.walker.insert_with_alg_data(key, value, Color::Red)?;
        self.fix_red();
        Some(())
    }

    fn delete(&mut self) -> Option<(K, V)> {
        Some(self.delete_boxed()?.into_kv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_insertion_scenario() {
        let mut tree: RBTree<i32, i32> = RBTree::new();
        for &x in &[50, 30, 70, 20, 40, 60, 80] {
            assert_eq!(tree.insert(x, x * 10), None);
            assert!(tree.is_red_black());
            tree.assert_correctness();
        }
        assert_eq!(tree.size(), 7);
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(tree.get(&60), Some(&600));
        assert_eq!(tree.get(&65), None);
    }

    #[test]
    fn ascending_insertions_stay_shallow() {
        let mut tree: RBTree<u32, ()> = RBTree::new();
        for x in 0..512 {
            tree.insert(x, ());
            if x % 64 == 0 {
                tree.assert_correctness();
            }
        }
        tree.assert_correctness();
        // height <= 2*log2(n+1)
        assert!(tree.height() <= 18, "height {}", tree.height());
    }

    #[test]
    fn removal_restores_invariants() {
        let mut tree: RBTree<u32, u32> = RBTree::new();
        // 37 is coprime to 100, so this covers every key exactly once
        for i in 0..100 {
            tree.insert((i * 37) % 100, i);
        }
        tree.assert_correctness();
        for i in 0..100 {
            let key = (i * 61) % 100;
            assert!(tree.remove(&key).is_some());
            tree.assert_correctness();
            assert_eq!(tree.size() as u32, 99 - i);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.remove(&3), None);
    }

    #[test]
    fn remove_absent_key_is_a_noop() {
        let mut tree: RBTree<i32, i32> = (0..10).map(|x| (x, x)).collect();
        assert_eq!(tree.remove(&55), None);
        tree.assert_correctness();
        assert_eq!(tree.size(), 10);
    }
}
