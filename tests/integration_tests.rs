mod common;
use common::*;

use arbor::avl::AVLTree;
use arbor::rb::RBTree;
use arbor::splay::SplayTree;
use arbor::treap::Treap;
use arbor::*;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn random_rounds(rng: &mut StdRng, amount: usize) -> Vec<RoundAction<u32, i32>> {
    const KEY_SPACE: u32 = 120;
    (0..amount)
        .map(|_| match rng.gen_range(0..9) {
            0..=2 => RoundAction::Insert {
                key: rng.gen_range(0..KEY_SPACE),
                value: rng.gen_range(-100..100),
            },
            3..=4 => RoundAction::Remove {
                key: rng.gen_range(0..KEY_SPACE),
            },
            5..=6 => RoundAction::Get {
                key: rng.gen_range(0..KEY_SPACE),
            },
            7 => RoundAction::Select {
                index: rng.gen_range(0..KEY_SPACE as usize),
            },
            _ => RoundAction::Position {
                key: rng.gen_range(0..KEY_SPACE),
            },
        })
        .collect()
}

#[test]
fn every_tree_type_matches_the_reference() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    check_against_reference::<AVLTree<u32, i32>>(random_rounds(&mut rng, 3_000));
    check_against_reference::<RBTree<u32, i32>>(random_rounds(&mut rng, 3_000));
    check_against_reference::<SplayTree<u32, i32>>(random_rounds(&mut rng, 3_000));
    check_against_reference::<Treap<u32, i32>>(random_rounds(&mut rng, 3_000));
}

// Inserting an ascending run into an AVL tree builds a perfectly balanced
// tree, so 2^h - 1 keys give height exactly h.
#[test]
fn avl_sequential_inserts_build_a_complete_tree() {
    let mut tree: AVLTree<u32, u32> = AVLTree::new();
    for key in 1..=7 {
        tree.insert(key, key);
    }
    tree.assert_correctness();
    assert_eq!(tree.height(), 3);

    let mut tree: AVLTree<u32, u32> = AVLTree::new();
    for key in 1..=1023 {
        tree.insert(key, key);
    }
    tree.assert_correctness();
    assert_eq!(tree.height(), 10);
}

#[test]
fn rb_survives_shuffled_insertions_and_removals() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut keys: Vec<u32> = (0..512).collect();
    keys.shuffle(&mut rng);

    let mut tree: RBTree<u32, u32> = keys.iter().map(|&key| (key, key * 2)).collect();
    tree.assert_correctness();
    assert_eq!(tree.size(), 512);
    // 2 * log2(n + 1) bounds a red-black tree's height.
    assert!(tree.height() <= 18, "height {} is too large", tree.height());

    keys.shuffle(&mut rng);
    for (round, key) in keys.iter().enumerate() {
        assert_eq!(tree.remove(key), Some((*key, *key * 2)));
        if round % 16 == 0 {
            tree.assert_correctness();
        }
    }
    assert_eq!(tree.size(), 0);
}

fn split_concatenate_round_trip<T>()
where
    T: ConcatenableTree<u32, u32> + std::iter::FromIterator<(u32, u32)>,
    for<'a> &'a mut T: SplittableTreeRef<u32, u32, T = T>,
{
    let mut tree: T = (0..100).map(|key| (key, key)).collect();

    // Split immediately before key 60.
    let mut walker = methods::search(&mut tree, &60);
    methods::previous_empty(&mut walker).unwrap();
    let right = walker.split_right().unwrap();
    drop(walker);

    tree.assert_correctness();
    right.assert_correctness();
    itertools::assert_equal(tree.iter().map(|(key, _)| *key), 0..60);
    itertools::assert_equal(right.iter().map(|(key, _)| *key), 60..100);

    let whole = T::concatenate(tree, right);
    whole.assert_correctness();
    itertools::assert_equal(whole.iter().map(|(key, _)| *key), 0..100);
}

#[test]
fn split_and_concatenate_round_trip() {
    split_concatenate_round_trip::<AVLTree<u32, u32>>();
    split_concatenate_round_trip::<SplayTree<u32, u32>>();
    split_concatenate_round_trip::<Treap<u32, u32>>();
}

#[test]
fn treap_union_merges_overlapping_trees() {
    let mut evens: Treap<u32, u32> = Treap::with_seed(1);
    for key in (0..100).step_by(2) {
        evens.insert(key, key);
    }
    let mut multiples_of_three: Treap<u32, u32> = Treap::with_seed(2);
    for key in (0..100).step_by(3) {
        multiples_of_three.insert(key, key);
    }

    let merged = treap::union(evens, multiples_of_three);
    merged.assert_correctness();
    itertools::assert_equal(
        merged.iter().map(|(key, _)| *key),
        (0..100).filter(|key| key % 2 == 0 || key % 3 == 0),
    );
}

#[test]
fn treap_keeps_the_heap_order_through_bulk_insert_and_remove() {
    let mut rng = StdRng::seed_from_u64(0xdecade);
    let mut keys: Vec<u32> = (0..1000).collect();
    keys.shuffle(&mut rng);

    let mut tree: Treap<u32, u32> = Treap::with_seed(3);
    for &key in &keys {
        tree.insert(key, key);
    }
    assert!(tree.is_treap());
    tree.assert_correctness();
    assert_eq!(tree.size(), 1000);

    keys.shuffle(&mut rng);
    for &key in &keys {
        assert_eq!(tree.remove(&key), Some((key, key)));
    }
    assert!(tree.is_empty());
}

#[test]
fn dump_has_preorder_keys_and_inorder_sizes() {
    let mut tree: AVLTree<u32, u32> = AVLTree::new();
    for key in [2, 1, 3] {
        tree.insert(key, key);
    }
    let mut out = Vec::new();
    tree.write_dump(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].split_whitespace().collect_vec(), ["2", "1", "3"]);
    assert_eq!(lines[1].split_whitespace().collect_vec(), ["1", "3", "1"]);
}

#[test]
fn select_inverts_position_on_every_tree_type() {
    fn check<T>()
    where
        T: SomeTree<u32, u32> + std::iter::FromIterator<(u32, u32)>,
        for<'a> &'a mut T: SomeTreeRef<u32, u32>,
    {
        let mut tree: T = (0..50).map(|key| (key * 3, key)).collect();
        for index in 0..50 {
            let key = *tree.select(index).unwrap().0;
            assert_eq!(tree.position(&key), Ok(index));
        }
        assert_eq!(tree.position(&1), Err(1));
        assert_eq!(tree.position(&1000), Err(50));
        assert_eq!(tree.select(50), None);
    }

    check::<AVLTree<u32, u32>>();
    check::<RBTree<u32, u32>>();
    check::<SplayTree<u32, u32>>();
    check::<Treap<u32, u32>>();
}
