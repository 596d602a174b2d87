//! Shared driver for the integration tests: runs sequences of keyed
//! operations against a tree and against [`std::collections::BTreeMap`] as
//! a reference, and checks that they always agree.

use arbor::*;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Something to perform in one round of tests
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum RoundAction<K, V> {
    Insert { key: K, value: V },
    Remove { key: K },
    Get { key: K },
    Select { index: usize },
    Position { key: K },
}

/// The result after one round
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RoundResult<K, V> {
    Empty,
    Rejected,
    Missing,
    Value(V),
    Pair(K, V),
    Index(Result<usize, usize>),
}

pub fn run_round<K, V, T>(action: RoundAction<K, V>, tree: &mut T) -> RoundResult<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone + Eq + Debug,
    T: SomeTree<K, V>,
    for<'a> &'a mut T: SomeTreeRef<K, V>,
{
    use RoundAction::*;
    use RoundResult::*;

    match action {
        Insert { key, value } => match tree.insert(key, value) {
            None => Empty,
            Some(_) => Rejected,
        },
        Remove { key } => match tree.remove(&key) {
            None => Missing,
            Some((k, v)) => Pair(k, v),
        },
        Get { key } => match tree.get(&key) {
            None => Missing,
            Some(value) => Value(value.clone()),
        },
        Select { index } => match tree.select(index) {
            None => Missing,
            Some((k, v)) => Pair(k.clone(), v.clone()),
        },
        Position { key } => Index(tree.position(&key)),
    }
}

pub fn run_round_reference<K, V>(
    action: RoundAction<K, V>,
    map: &mut BTreeMap<K, V>,
) -> RoundResult<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    use RoundAction::*;
    use RoundResult::*;

    match action {
        Insert { key, value } => {
            if map.contains_key(&key) {
                Rejected
            } else {
                map.insert(key, value);
                Empty
            }
        }
        Remove { key } => match map.remove(&key) {
            None => Missing,
            Some(value) => Pair(key, value),
        },
        Get { key } => match map.get(&key) {
            None => Missing,
            Some(value) => Value(value.clone()),
        },
        Select { index } => match map.iter().nth(index) {
            None => Missing,
            Some((k, v)) => Pair(k.clone(), v.clone()),
        },
        Position { key } => {
            let before = map.range(..key.clone()).count();
            if map.contains_key(&key) {
                Index(Ok(before))
            } else {
                Index(Err(before))
            }
        }
    }
}

/// Runs the whole sequence of actions on a fresh tree and a fresh reference
/// map, asserting that every round gives the same answer, that the tree's
/// invariants hold throughout, and that the final contents agree.
pub fn check_against_reference<T>(actions: Vec<RoundAction<u32, i32>>)
where
    T: SomeTree<u32, i32>,
    for<'a> &'a mut T: SomeTreeRef<u32, i32>,
{
    let mut tree = T::new();
    let mut reference = BTreeMap::new();
    for (round, action) in actions.into_iter().enumerate() {
        let expected = run_round_reference(action.clone(), &mut reference);
        let got = run_round(action, &mut tree);
        assert_eq!(got, expected, "disagreement at round {}", round);
        if round % 32 == 0 {
            tree.assert_correctness();
        }
    }
    tree.assert_correctness();
    assert_eq!(tree.size(), reference.len());

    let tree_pairs: Vec<(u32, i32)> = tree.iter().map(|(k, v)| (*k, *v)).collect();
    let reference_pairs: Vec<(u32, i32)> = reference.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(tree_pairs, reference_pairs);
}
