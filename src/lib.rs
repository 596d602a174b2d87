//! A family of balanced binary search trees built on a single generic
//! node substrate.
//!
//! The crate provides one unbalanced node type, [`basic_tree::BasicTree`],
//! and a set of balancing policies layered on top of it: red-black trees ([`rb::RBTree`]),
//! AVL trees ([`avl::AVLTree`]), splay trees ([`splay::SplayTree`]) and
//! treaps ([`treap::Treap`]). Every node carries its subtree size, so all of
//! the variants answer order-statistic queries ([`SomeTree::select`],
//! [`SomeTree::position`]) for free.
//!
//! The balancing policy is chosen at compile time, by picking a tree type or
//! by instantiating the [`maps::TreeMap`] / [`maps::TreeSet`] wrappers with
//! one. There is no runtime policy switch.
//!
//! None of the trees are thread safe. If you need concurrent access, wrap
//! the whole tree in a mutex.

#[macro_use]
extern crate derive_destructure;

pub mod maps;
pub mod trees;

pub use maps::{TreeMap, TreeSet};
pub use trees::*;
