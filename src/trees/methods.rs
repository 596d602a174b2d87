//! Methods that work on all of the tree types, through the walker traits.
//!
//! These functions navigate a walker by key. They are the basis of the
//! keyed operations of the specific trees: a tree type implements `get` or
//! `insert` by searching with these and then acting at the position the
//! walker ends up in.

use super::*;
use std::cmp::Ordering;

/// Returns a walker at the node holding `key`, or at the empty position
/// where `key` would be inserted if it isn't in the tree.
pub fn search<TR, K, V>(tree: TR, key: &K) -> TR::Walker
where
    TR: SomeTreeRef<K, V>,
    K: Ord,
{
    let mut walker = tree.walker();
    search_subtree(&mut walker, key);
    walker
}

/// Searches from the walker's current position downwards. Stops at the node
/// holding `key`, or at the empty position where it would be inserted.
pub fn search_subtree<W, K, V>(walker: &mut W, key: &K)
where
    W: SomeWalker<K, V>,
    K: Ord,
{
    loop {
        let ord = match walker.key() {
            None => break,
            Some(other) => key.cmp(other),
        };
        let res = match ord {
            Ordering::Less => walker.go_left(),
            Ordering::Equal => break,
            Ordering::Greater => walker.go_right(),
        };
        debug_assert!(res.is_ok());
    }
}

/// Searches downwards for the empty position where a new node with `key`
/// should be inserted when equal keys are allowed. Runs past equal keys to
/// the right, so that equal keys end up in insertion order.
///
/// Always ends at an empty position.
pub fn search_dup_subtree<W, K, V>(walker: &mut W, key: &K)
where
    W: SomeWalker<K, V>,
    K: Ord,
{
    loop {
        let go_left = match walker.key() {
            None => break,
            Some(other) => key < other,
        };
        let res = if go_left {
            walker.go_left()
        } else {
            walker.go_right()
        };
        debug_assert!(res.is_ok());
    }
}

/// Moves the walker from a node to the empty position immediately before
/// it in key order. Fails if the walker is at an empty position.
pub fn previous_empty<W, K, V>(walker: &mut W) -> Result<(), ()>
where
    W: SomeWalker<K, V>,
    K: Ord,
{
    walker.go_left()?;
    while walker.go_right().is_ok() {}
    Ok(())
}

/// Moves the walker from a node to the empty position immediately after
/// it in key order. Fails if the walker is at an empty position.
pub fn next_empty<W, K, V>(walker: &mut W) -> Result<(), ()>
where
    W: SomeWalker<K, V>,
    K: Ord,
{
    walker.go_right()?;
    while walker.go_left().is_ok() {}
    Ok(())
}

/// The in-order position of `key` in the tree: `Ok(index)` if present,
/// `Err` with the index it would be inserted at otherwise.
///
/// This is the inverse of [`SomeTree::select`]: if `position` returns
/// `Ok(i)`, then `select(i)` returns the same key.
pub fn position<TR, K, V>(tree: TR, key: &K) -> Result<usize, usize>
where
    TR: SomeTreeRef<K, V>,
    K: Ord,
{
    let mut walker = tree.walker();
    search_subtree(&mut walker, key);
    match walker.left_subtree_size() {
        Some(left_size) => Ok(walker.far_left_count() + left_size),
        None => Err(walker.far_left_count()),
    }
}
