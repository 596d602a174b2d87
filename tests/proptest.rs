pub mod common;
pub use common::*;

use arbor::avl::AVLTree;
use arbor::basic_tree::BasicTree;
use arbor::rb::RBTree;
use arbor::splay::SplayTree;
use arbor::treap::Treap;
use proptest::prelude::*;

/// Keys are drawn from a small space on purpose, so that inserts collide,
/// removals hit, and `position` sees both present and absent keys.
const KEY_SPACE: u32 = 60;

const MAX_ROUNDS: usize = if cfg!(miri) { 40 } else { 400 };

fn round_action() -> impl Strategy<Value = RoundAction<u32, i32>> {
    prop_oneof![
        3 => (0..KEY_SPACE, -100..100i32)
            .prop_map(|(key, value)| RoundAction::Insert { key, value }),
        2 => (0..KEY_SPACE).prop_map(|key| RoundAction::Remove { key }),
        2 => (0..KEY_SPACE).prop_map(|key| RoundAction::Get { key }),
        1 => (0..KEY_SPACE as usize).prop_map(|index| RoundAction::Select { index }),
        1 => (0..KEY_SPACE).prop_map(|key| RoundAction::Position { key }),
    ]
}

fn rounds() -> impl Strategy<Value = Vec<RoundAction<u32, i32>>> {
    prop::collection::vec(round_action(), 1..MAX_ROUNDS)
}

proptest! {
    #[test]
    fn basic_tree_matches_reference(actions in rounds()) {
        check_against_reference::<BasicTree<u32, i32>>(actions);
    }

    #[test]
    fn avl_tree_matches_reference(actions in rounds()) {
        check_against_reference::<AVLTree<u32, i32>>(actions);
    }

    #[test]
    fn rb_tree_matches_reference(actions in rounds()) {
        check_against_reference::<RBTree<u32, i32>>(actions);
    }

    #[test]
    fn splay_tree_matches_reference(actions in rounds()) {
        check_against_reference::<SplayTree<u32, i32>>(actions);
    }

    #[test]
    fn treap_matches_reference(actions in rounds()) {
        check_against_reference::<Treap<u32, i32>>(actions);
    }
}
