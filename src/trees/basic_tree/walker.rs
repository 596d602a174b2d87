// This is a private module, so no documentation for it directly.
// instead look for documentation of the `BasicWalker` struct.

use super::*;
use recursive_reference::*;

use crate::trees::Side;

pub(crate) const NO_VALUE_ERROR: &str = "invariant violated: walker should not be empty";

/// For every frame of the walker's path, how many keys of the whole tree
/// lie strictly outside the current subtree, on each side.
#[derive(Clone, Copy)]
pub(super) struct Frame {
    pub left: usize,
    pub right: usize,
}

impl Frame {
    pub fn empty() -> Frame {
        Frame { left: 0, right: 0 }
    }
}

// Invariant: only nodes on the path from the root to the current node
// (exclusive) may have incorrect subtree sizes. They are rebuilt when the
// walker goes back up.

/// This struct implements a walker for the [`BasicTree`] type.
/// It holds a mutable reference to the tree and a position inside it, and
/// allows walking up and down. The position may be the son of a node that
/// doesn't contain a node by itself, and then it is said to be in an empty
/// position.
///
/// Walkers for the balanced trees are built by wrapping around the
/// [`BasicWalker`] type, as the tree types are built by wrapping around the
/// [`BasicTree`] type.
///
/// The walker will automatically go back up to the root when dropped, in
/// order to rebuild all the nodes on its path.
///
/// Internally, [`recursive_reference::RecRef`] is used, in order to be able
/// to dynamically go up and down the tree without upsetting the borrow
/// checker.
#[derive(destructure)]
pub struct BasicWalker<'a, K, V, T = ()> {
    /// The telescope, holding references to all the subtrees from the root
    /// to the current position.
    pub(super) rec_ref: RecRef<'a, BasicTree<K, V, T>>,

    /// This array holds, for every subtree from the root to the current
    /// subtree, the number of keys before it and after it.
    pub(super) vals: Vec<Frame>,

    /// This array holds for every node on the path, whether the next
    /// subtree in the walker is its left son or its right son. This array
    /// is always one shorter than [`BasicWalker::rec_ref`] and
    /// [`BasicWalker::vals`], because the last subtree has no son in the
    /// walker.
    pub(super) is_left: Vec<Side>,
}

impl<'a, K, V, T> BasicWalker<'a, K, V, T> {
    pub fn new(tree: &'a mut BasicTree<K, V, T>) -> BasicWalker<'a, K, V, T> {
        BasicWalker {
            rec_ref: RecRef::new(tree),
            vals: vec![Frame::empty()],
            is_left: vec![],
        }
    }

    /// Returns true if the walker is at an empty position.
    pub fn is_empty(&self) -> bool {
        self.rec_ref.is_empty()
    }

    /// Goes to the left son. Returns `Err(())` at an empty position.
    ///
    /// The navigation methods are inherent rather than only part of the
    /// [`crate::trees::SomeWalker`] impl, so that they stay callable
    /// without the `K: Ord` bound (notably from the [`Drop`] impl).
    pub fn go_left(&mut self) -> Result<(), ()> {
        let mut frame = *self.vals.last().expect(NO_VALUE_ERROR);
        let res = RecRef::extend_result(&mut self.rec_ref, |tree| match tree {
            Empty => Err(()),
            Root(node) => {
                // everything to the right of the left subtree is now outside
                frame.right += 1 + node.right.subtree_size();
                Ok(&mut node.left)
            }
        });
        if res.is_ok() {
            self.vals.push(frame);
            self.is_left.push(Side::Left);
        }
        res
    }

    /// Goes to the right son. Returns `Err(())` at an empty position.
    pub fn go_right(&mut self) -> Result<(), ()> {
        let mut frame = *self.vals.last().expect(NO_VALUE_ERROR);
        let res = RecRef::extend_result(&mut self.rec_ref, |tree| match tree {
            Empty => Err(()),
            Root(node) => {
                frame.left += node.left.subtree_size() + 1;
                Ok(&mut node.right)
            }
        });
        if res.is_ok() {
            self.vals.push(frame);
            self.is_left.push(Side::Right);
        }
        res
    }

    /// Goes up once, rebuilding the node it lands on.
    /// If successful, returns which son we were of the node we went up to.
    pub fn go_up(&mut self) -> Result<Side, ()> {
        match self.is_left.pop() {
            None => Err(()),
            Some(side) => {
                RecRef::pop(&mut self.rec_ref).expect(NO_VALUE_ERROR);
                self.vals.pop().expect(NO_VALUE_ERROR);
                self.rec_ref.rebuild();
                Ok(side)
            }
        }
    }

    pub fn depth(&self) -> usize {
        self.is_left.len()
    }

    /// The number of keys of the whole tree strictly before the current
    /// subtree.
    pub fn far_left_count(&self) -> usize {
        self.vals.last().expect(NO_VALUE_ERROR).left
    }

    /// The number of keys of the whole tree strictly after the current
    /// subtree.
    pub fn far_right_count(&self) -> usize {
        self.vals.last().expect(NO_VALUE_ERROR).right
    }

    /// Returns true if the walker is at the root of the tree.
    /// Note: the root may also be an empty position.
    pub fn is_root(&self) -> bool {
        self.is_left.is_empty()
    }

    /// If the current position is the left son of a node, returns
    /// [`Some(Side::Left)`], and so on. If at the root, returns [`None`].
    pub fn is_left_son(&self) -> Option<Side> {
        self.is_left.last().cloned()
    }

    /// Not public since the walker should maintain the invariant that only
    /// nodes above the current position may be stale. Ergo, internal use.
    pub(crate) fn rebuild(&mut self) {
        self.rec_ref.rebuild();
    }

    pub fn inner(&self) -> &BasicTree<K, V, T> {
        &*self.rec_ref
    }

    pub(crate) fn inner_mut(&mut self) -> &mut BasicTree<K, V, T> {
        &mut *self.rec_ref
    }

    pub fn node(&self) -> Option<&BasicNode<K, V, T>> {
        self.rec_ref.node()
    }

    pub(crate) fn node_mut(&mut self) -> Option<&mut BasicNode<K, V, T>> {
        self.rec_ref.node_mut()
    }

    /// Performs a left rotation: the right son of the current node becomes
    /// the local root. Returns [`None`] if this is an empty tree or if the
    /// current node has no right son.
    pub fn rot_left(&mut self) -> Option<()> {
        self.rot_left_with_custom_rebuilder(|_| {})
    }

    /// Performs a left rotation, with a callback for an extra rebuilding
    /// action applied in addition to the regular size rebuilding.
    pub fn rot_left_with_custom_rebuilder<F: FnMut(&mut BasicNode<K, V, T>)>(
        &mut self,
        mut rebuilder: F,
    ) -> Option<()> {
        let owned_tree = self.rec_ref.take();

        let mut bn1: Box<BasicNode<K, V, T>> = owned_tree.into_node_boxed()?;
        let mut bn2: Box<BasicNode<K, V, T>> = bn1.right.take().into_node_boxed()?;

        bn1.right = bn2.left.take();
        bn2.size = bn1.size; // this is instead of bn2.rebuild(), since we already know the result
        bn1.rebuild();
        rebuilder(&mut *bn1);
        bn2.left = Root(bn1);
        rebuilder(&mut *bn2);

        *self.rec_ref = Root(bn2); // restore the node back
        Some(())
    }

    /// Performs a right rotation: the left son of the current node becomes
    /// the local root. Returns [`None`] if this is an empty tree or if the
    /// current node has no left son.
    pub fn rot_right(&mut self) -> Option<()> {
        self.rot_right_with_custom_rebuilder(|_| {})
    }

    /// Performs a right rotation, with a callback for an extra rebuilding
    /// action applied in addition to the regular size rebuilding.
    pub fn rot_right_with_custom_rebuilder<F: FnMut(&mut BasicNode<K, V, T>)>(
        &mut self,
        mut rebuilder: F,
    ) -> Option<()> {
        let owned_tree = self.rec_ref.take();

        let mut bn1: Box<BasicNode<K, V, T>> = owned_tree.into_node_boxed()?;
        let mut bn2: Box<BasicNode<K, V, T>> = bn1.left.take().into_node_boxed()?;

        bn1.left = bn2.right.take();
        bn2.size = bn1.size; // this is instead of bn2.rebuild(), since we already know the result
        bn1.rebuild();
        rebuilder(&mut *bn1);
        bn2.right = Root(bn1);
        rebuilder(&mut *bn2);

        *self.rec_ref = Root(bn2); // restore the node back
        Some(())
    }

    /// Performs rot_left if `side` is [`Side::Left`], rot_right otherwise.
    pub fn rot_side(&mut self, side: Side) -> Option<()> {
        match side {
            Side::Left => self.rot_left(),
            Side::Right => self.rot_right(),
        }
    }

    /// Performs rot_left if `side` is [`Side::Left`], rot_right otherwise,
    /// with an extra rebuilding callback.
    pub fn rot_side_with_custom_rebuilder<F: FnMut(&mut BasicNode<K, V, T>)>(
        &mut self,
        side: Side,
        rebuilder: F,
    ) -> Option<()> {
        match side {
            Side::Left => self.rot_left_with_custom_rebuilder(rebuilder),
            Side::Right => self.rot_right_with_custom_rebuilder(rebuilder),
        }
    }

    /// Rotates so that the current node moves up.
    /// Basically moves up and then calls rot_side.
    /// Fails if the current node is the root.
    pub fn rot_up(&mut self) -> Result<Side, ()> {
        let side = self.go_up()?;
        self.rot_side(side.flip())
            .expect("original node went missing?");
        Ok(side)
    }

    /// Rotates so that the current node moves up, with an extra rebuilding
    /// callback.
    pub fn rot_up_with_custom_rebuilder<F: FnMut(&mut BasicNode<K, V, T>)>(
        &mut self,
        rebuilder: F,
    ) -> Result<Side, ()> {
        let side = self.go_up()?;
        self.rot_side_with_custom_rebuilder::<F>(side.flip(), rebuilder)
            .expect("original node went missing?");
        Ok(side)
    }

    /// Goes down to the son on the given side.
    pub fn go_side(&mut self, side: Side) -> Result<(), ()> {
        match side {
            Side::Left => self.go_left(),
            Side::Right => self.go_right(),
        }
    }

    pub fn go_to_root(&mut self) {
        while self.go_up().is_ok() {}
    }

    /// This takes the walker and turns it into a reference to the root.
    pub fn root_into_ref(mut self) -> &'a mut BasicTree<K, V, T> {
        // go to the root
        self.go_to_root();
        let (rec_ref, _, _) = self.destructure();
        RecRef::into_ref(rec_ref)
    }

    /// If the current position is empty, inserts a fresh node there.
    /// Otherwise does nothing and returns [`None`].
    pub fn insert_with_alg_data(&mut self, key: K, value: V, alg_data: T) -> Option<()> {
        match *self.rec_ref {
            Empty => {
                *self.rec_ref = BasicTree::from_node(BasicNode::new_alg(key, value, alg_data));
                Some(())
            }
            _ => None,
        }
    }

    /// Takes the current subtree out of the tree, and writes `Empty`
    /// instead. Intended to help writing tree algorithms.
    pub(crate) fn take_subtree(&mut self) -> BasicTree<K, V, T> {
        self.rec_ref.take()
    }

    /// If the current position is empty, puts the given subtree there
    /// instead. Intended to help writing tree algorithms.
    pub(crate) fn put_subtree(&mut self, new: BasicTree<K, V, T>) -> Option<()> {
        if self.rec_ref.is_empty() {
            *self.rec_ref = new;
            Some(())
        } else {
            None
        }
    }

    /// Detaches the node at the current position without any rebalancing.
    /// A node with two sons is replaced by its in-order successor. The
    /// detached node is returned with both sons unlinked.
    pub(crate) fn delete_boxed(&mut self) -> Option<Box<BasicNode<K, V, T>>> {
        let mut node = self.take_subtree().into_node_boxed()?;
        if node.right.is_empty() {
            self.put_subtree(node.left.take()).unwrap();
        } else {
            // find the successor and move it to the current position
            let mut walker = BasicWalker::new(&mut node.right);
            while walker.go_left().is_ok() {}
            let res = walker.go_up();
            assert_eq!(res, Ok(Side::Left));

            let mut succ = walker.take_subtree().into_node_boxed().unwrap();
            assert!(succ.left.is_empty());
            walker.put_subtree(succ.right.take()).unwrap();
            drop(walker);

            succ.left = node.left.take();
            succ.right = node.right.take();
            succ.rebuild();
            self.put_subtree(Root(succ)).unwrap();
        }
        Some(node)
    }
}

/// This implementation exists in order to rebuild the nodes
/// when the walker gets dropped.
impl<'a, K, V, T> Drop for BasicWalker<'a, K, V, T> {
    fn drop(&mut self) {
        self.go_to_root();
    }
}
