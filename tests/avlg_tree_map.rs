mod common;

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use avlg_tree::avlg_tree_map;
use avlg_tree::{AvlgTreeMap, Error, NaturalOrder, Rank, Reversed, TreeConfig};
use common::{DRAWS, SEED, assert_balanced, avl_height_bound, mulberry32, num_to_string};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn key_strategy() -> impl Strategy<Value = i64> {
    // Narrow enough that keys collide often.
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Set(i64, i64),
    SetIfAbsent(i64, i64),
    Replace(i64, i64),
    Remove(i64),
    Get(i64),
    Contains(i64),
    GetKeyValue(i64),
    RankOf(i64),
    FirstKeyValue,
    LastKeyValue,
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Set(k, v)),
        2 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::SetIfAbsent(k, v)),
        1 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Replace(k, v)),
        4 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::Contains),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
        1 => key_strategy().prop_map(MapOp::RankOf),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

// ─── Model-based tests against BTreeMap ──────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Replays a random sequence of operations on both AvlgTreeMap and
    /// BTreeMap and asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(
        max_imbalance in 1..=3usize,
        ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE),
    ) {
        let mut avl_map: AvlgTreeMap<i64, i64> = AvlgTreeMap::with_max_imbalance(max_imbalance).unwrap();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Set(k, v) => {
                    prop_assert_eq!(avl_map.set(*k, *v), bt_map.insert(*k, *v), "set({}, {})", k, v);
                }
                MapOp::SetIfAbsent(k, v) => {
                    let existing = bt_map.get(k).copied();
                    bt_map.entry(*k).or_insert(*v);
                    prop_assert_eq!(avl_map.set_if_absent(*k, *v).copied(), existing, "set_if_absent({}, {})", k, v);
                }
                MapOp::Replace(k, v) => {
                    let expected = bt_map.get_mut(k).map(|slot| std::mem::replace(slot, *v));
                    prop_assert_eq!(avl_map.replace(k, *v), expected, "replace({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(avl_map.remove(k), bt_map.remove(k), "remove({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(avl_map.get(k), bt_map.get(k), "get({})", k);
                }
                MapOp::Contains(k) => {
                    prop_assert_eq!(avl_map.contains(k), bt_map.contains_key(k), "contains({})", k);
                }
                MapOp::GetKeyValue(k) => {
                    prop_assert_eq!(avl_map.get_key_value(k), bt_map.get_key_value(k), "get_key_value({})", k);
                }
                MapOp::RankOf(k) => {
                    let expected = bt_map.contains_key(k).then(|| bt_map.range(..*k).count());
                    prop_assert_eq!(avl_map.rank_of(k), expected, "rank_of({})", k);
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(avl_map.first_key_value(), bt_map.first_key_value(), "first_key_value");
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(avl_map.last_key_value(), bt_map.last_key_value(), "last_key_value");
                }
                MapOp::PopFirst => {
                    prop_assert_eq!(avl_map.pop_first(), bt_map.pop_first(), "pop_first");
                }
                MapOp::PopLast => {
                    prop_assert_eq!(avl_map.pop_last(), bt_map.pop_last(), "pop_last");
                }
            }
            prop_assert_eq!(avl_map.len(), bt_map.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(avl_map.is_empty(), bt_map.is_empty(), "is_empty mismatch after {:?}", op);
        }

        assert_balanced(&avl_map);
        let avl_items: Vec<_> = avl_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(avl_items, bt_items);
    }

    /// Tests that iteration order matches BTreeMap after random insertions.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE)) {
        let avl_map: AvlgTreeMap<i64, i64> = entries.iter().copied().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        // Forward iteration
        let avl_items: Vec<_> = avl_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&avl_items, &bt_items, "iter() mismatch");

        // Reverse iteration
        let avl_rev: Vec<_> = avl_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        let bt_rev: Vec<_> = bt_map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&avl_rev, &bt_rev, "iter().rev() mismatch");

        // Keys and values
        prop_assert_eq!(avl_map.keys().collect::<Vec<_>>(), bt_map.keys().collect::<Vec<_>>(), "keys() mismatch");
        prop_assert_eq!(avl_map.values().collect::<Vec<_>>(), bt_map.values().collect::<Vec<_>>(), "values() mismatch");

        // Exact sizes
        prop_assert_eq!(avl_map.iter().len(), bt_map.len());
        prop_assert_eq!(avl_map.keys().len(), bt_map.len());

        // Owning iteration
        prop_assert_eq!(avl_map.clone().into_keys().collect::<Vec<_>>(), bt_map.clone().into_keys().collect::<Vec<_>>());
        prop_assert_eq!(avl_map.into_iter().collect::<Vec<_>>(), bt_map.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn height_stays_within_the_avl_bound(keys in proptest::collection::vec(any::<i32>(), 1..1_000)) {
        let mut map = AvlgTreeMap::new();
        for key in keys {
            map.set(key, ());
            prop_assert!(map.height().unwrap() <= avl_height_bound(map.len()));
        }
        assert_balanced(&map);
    }

    #[test]
    fn removal_keeps_every_node_balanced(
        max_imbalance in 1..=3usize,
        keys in proptest::collection::btree_set(-500i32..500, 1..300),
        removals in proptest::collection::vec(-500i32..500, 0..300),
    ) {
        let mut map = TreeConfig::new().max_imbalance(max_imbalance).build_from(keys.iter().map(|&k| (k, k))).unwrap();
        let mut model = keys;
        for key in removals {
            prop_assert_eq!(map.remove(&key), model.take(&key));
            assert_balanced(&map);
        }
        prop_assert_eq!(map.keys().copied().collect::<BTreeSet<_>>(), model);
    }

    #[test]
    fn filter_matches_retain(entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..500)) {
        let map: AvlgTreeMap<i64, i64> = entries.iter().copied().collect();
        let mut model: BTreeMap<i64, i64> = entries.into_iter().collect();

        let filtered = map.filter(|k, v| (k ^ v) & 1 == 0);
        model.retain(|k, v| (*k ^ *v) & 1 == 0);

        prop_assert_eq!(filtered.iter().collect::<Vec<_>>(), model.iter().collect::<Vec<_>>());
        assert_balanced(&filtered);
    }

    #[test]
    fn merge_is_right_biased(
        left in proptest::collection::btree_map(key_strategy(), value_strategy(), 0..200),
        right in proptest::collection::btree_map(key_strategy(), value_strategy(), 0..200),
    ) {
        let a: AvlgTreeMap<i64, i64> = left.clone().into_iter().collect();
        let b: AvlgTreeMap<i64, i64> = right.clone().into_iter().collect();

        let mut expected = left;
        expected.extend(right);

        let merged = a.merge(&b);
        prop_assert_eq!(merged.iter().collect::<Vec<_>>(), expected.iter().collect::<Vec<_>>());
        assert_balanced(&merged);

        let mut folded = a;
        folded.merge_from(b);
        prop_assert_eq!(folded, merged);
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn empty_map_is_empty() {
    let map: AvlgTreeMap<&str, &str> = AvlgTreeMap::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.get("foo"), None);
}

#[test]
fn set_returns_previous_value() {
    let mut map = AvlgTreeMap::new();
    assert_eq!(map.set("foo", "bar"), None);
    assert_eq!(map.len(), 1);
    assert!(!map.is_empty());
    assert_eq!(map.set("baz", "bang"), None);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("foo"), Some(&"bar"));
    assert_eq!(map.set("foo", "boom"), Some("bar"));
    assert_eq!(map.len(), 2);
    assert_eq!(map["foo"], "boom");
}

#[test]
fn seeded_inserts_are_all_visited_once() {
    let mut unique = BTreeSet::new();
    let keys: Vec<u32> = mulberry32(SEED, DRAWS).filter(|&key| unique.insert(key)).collect();
    let mut map = AvlgTreeMap::new();

    for (i, &key) in keys.iter().enumerate() {
        let value = num_to_string(key);
        map.set(key, value.clone());
        assert_eq!(map.len(), i + 1, "wrong len after set({key}, {value:?})");
    }

    let visited: Vec<u32> = map.keys().copied().collect();
    assert_eq!(visited, unique.into_iter().collect::<Vec<_>>());
    for (key, value) in &map {
        assert_eq!(*value, num_to_string(*key));
    }
    assert_balanced(&map);
}

#[test]
fn mulberry32_is_deterministic() {
    let first: Vec<u32> = mulberry32(SEED, DRAWS).collect();
    let second: Vec<u32> = mulberry32(SEED, DRAWS).collect();
    assert_eq!(first.len(), DRAWS);
    assert_eq!(first, second);
    assert_ne!(mulberry32(SEED + 1, 4).collect::<Vec<_>>(), first[..4]);
}

#[test]
fn remove_on_empty_map_is_none() {
    let mut map: AvlgTreeMap<&str, &str> = AvlgTreeMap::new();
    assert_eq!(map.remove("foo"), None);
    assert_eq!(map.len(), 0);
}

#[test]
fn remove_twice_returns_value_then_none() {
    let mut map = AvlgTreeMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    assert_eq!(map.remove(&2), Some('b'));
    assert_eq!(map.len(), 2);
    assert_eq!(map.remove(&2), None);
    assert_eq!(map.len(), 2);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn ascending_inserts_respect_the_height_bound(#[case] max_imbalance: usize) {
    let mut map = AvlgTreeMap::with_max_imbalance(max_imbalance).unwrap();
    for key in 1..=7 {
        map.set(key, key);
        assert_balanced(&map);
        if max_imbalance == 1 {
            assert!(map.height().unwrap() <= avl_height_bound(map.len()), "height bound broken at {key}");
        }
    }
}

#[test]
fn ascending_inserts_build_a_perfect_tree() {
    let map: AvlgTreeMap<i32, ()> = (1..=7).map(|key| (key, ())).collect();
    assert_eq!(map.height(), Some(2));
    assert_eq!(map.pre_order().map(|(k, _)| *k).collect::<Vec<_>>(), [4, 2, 1, 3, 6, 5, 7]);
}

#[test]
fn two_child_removal_promotes_the_successor() {
    let mut map: AvlgTreeMap<i32, String> = (1..=7).map(|key| (key, key.to_string())).collect();
    // 4 is the root, with children 2 and 6.
    assert_eq!(map.pre_order().next(), Some((&4, &"4".to_string())));

    assert_eq!(map.remove(&4), Some("4".to_string()));

    // The successor 5 now sits where 4 was, and its old leaf is gone.
    assert_eq!(map.pre_order().map(|(k, v)| (*k, v.as_str())).collect::<Vec<_>>(), [
        (5, "5"),
        (2, "2"),
        (1, "1"),
        (3, "3"),
        (6, "6"),
        (7, "7"),
    ]);
    assert_eq!(map.len(), 6);
    assert_balanced(&map);
}

#[test]
fn two_child_removal_rebalances_the_promoted_node() {
    //        4
    //      /   \
    //     2     5
    //    / \
    //   1   3
    let mut map = AvlgTreeMap::new();
    map.set_all([4, 2, 5, 1, 3].map(|key| (key, ())));

    map.remove(&4);

    // 5 takes the root with an empty right side, so the root must rotate.
    assert_eq!(map.pre_order().map(|(k, _)| *k).collect::<Vec<_>>(), [2, 1, 5, 3]);
    assert_eq!(assert_balanced(&map), 2);
}

// ─── Configuration and comparators ───────────────────────────────────────────

#[rstest]
#[case::zero_imbalance(0, Err(Error::InvalidMaxImbalance(0)))]
#[case::classic(1, Ok(1))]
#[case::loose(5, Ok(5))]
fn max_imbalance_is_validated(#[case] requested: usize, #[case] expected: Result<usize, Error>) {
    let map: Result<AvlgTreeMap<u8, u8>, Error> = AvlgTreeMap::with_max_imbalance(requested);
    assert_eq!(map.map(|map| map.max_imbalance()), expected);

    let built: Result<AvlgTreeMap<u8, u8>, Error> = TreeConfig::new().max_imbalance(requested).build();
    assert_eq!(built.map(|map| map.max_imbalance()), expected);
}

#[test]
fn looser_bound_allows_a_taller_tree() {
    let strict: AvlgTreeMap<i32, ()> = (0..64).map(|key| (key, ())).collect();
    let loose = TreeConfig::new().max_imbalance(4).build_from((0..64).map(|key| (key, ()))).unwrap();
    assert!(loose.height() >= strict.height());
    assert_eq!(assert_balanced(&loose), i64::try_from(loose.height().unwrap()).unwrap());
}

#[test]
fn unbounded_imbalance_survives_a_long_chain() {
    const CHAIN: usize = 20_000;
    let mut map = AvlgTreeMap::with_max_imbalance(usize::MAX).unwrap();
    for key in 0..CHAIN {
        map.set(key, key);
    }
    // Ascending inserts never rotate, so every node hangs off the right.
    assert_eq!(map.height(), Some(CHAIN - 1));
    assert_eq!(map.get(&(CHAIN - 1)), Some(&(CHAIN - 1)));
    assert_eq!(map.rank_of(&(CHAIN - 1)), Some(CHAIN - 1));
    assert_eq!(map.set_if_absent(CHAIN - 1, 0), Some(&(CHAIN - 1)));
    assert_eq!(map.replace(&(CHAIN - 1), 7), Some(CHAIN - 1));

    assert_eq!(map.remove(&(CHAIN - 1)), Some(7));
    assert_eq!(map.pop_last(), Some((CHAIN - 2, CHAIN - 2)));
    for key in 0..CHAIN - 2 {
        assert_eq!(map.remove(&key), Some(key));
    }
    assert!(map.is_empty());
    assert_eq!(map.height(), None);
}

#[test]
fn reversed_comparator_orders_descending() {
    let mut map = AvlgTreeMap::with_comparator(Reversed(NaturalOrder));
    map.set_all((1..=5).map(|key| (key, key * 10)));
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [5, 4, 3, 2, 1]);
    assert_eq!(map.first_key_value(), Some((&5, &50)));
    assert_eq!(map[Rank(4)], 10);
}

#[test]
fn closure_comparator_on_unordered_keys() {
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Version(f32);

    let by_number = |a: &Version, b: &Version| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal);
    let mut map = AvlgTreeMap::with_comparator(by_number);
    map.set(Version(1.5), "b");
    map.set(Version(0.9), "a");
    map.set(Version(2.0), "c");

    assert_eq!(map.values().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(map.get(&Version(1.5)), Some(&"b"));
    assert_eq!(map.remove(&Version(0.9)), Some("a"));
}

#[test]
fn set_all_if_absent_keeps_first_value() {
    let mut map = AvlgTreeMap::from([(1, "old")]);
    map.set_all_if_absent([(1, "new"), (2, "first"), (2, "second")]);
    assert_eq!(map.iter().collect::<Vec<_>>(), [(&1, &"old"), (&2, &"first")]);
}

#[test]
fn map_collects_in_key_order() {
    let map = AvlgTreeMap::from([(3, 'c'), (1, 'a'), (2, 'b')]);
    assert_eq!(map.map(|k, v| format!("{k}{v}")), ["1a", "2b", "3c"]);

    let mut seen = Vec::new();
    map.for_each(|k, _| seen.push(*k));
    assert_eq!(seen, [1, 2, 3]);
}

#[test]
fn iterators_are_restartable() {
    let map = AvlgTreeMap::from([(1, ()), (2, ()), (3, ())]);
    let first: Vec<_> = map.keys().collect();
    let second: Vec<_> = map.keys().collect();
    assert_eq!(first, second);

    let iter: avlg_tree_map::Iter<'_, i32, ()> = map.iter();
    assert_eq!(iter.clone().count(), 3);
    assert_eq!(iter.count(), 3);
}

#[test]
fn post_order_ends_at_the_root() {
    let map: AvlgTreeMap<i32, ()> = (1..=7).map(|key| (key, ())).collect();
    assert_eq!(map.post_order().map(|(k, _)| *k).collect::<Vec<_>>(), [1, 3, 2, 5, 7, 6, 4]);
}

#[test]
fn clear_keeps_configuration() {
    let mut map = TreeConfig::new().max_imbalance(3).build_from([(1, 1), (2, 2)]).unwrap();
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.height(), None);
    assert_eq!(map.max_imbalance(), 3);
    map.set(5, 5);
    assert_eq!(map.len(), 1);
}

#[test]
fn get_or_insert_with_counts_words() {
    let mut counts = AvlgTreeMap::new();
    for word in "the quick brown fox jumps over the lazy dog the end".split(' ') {
        *counts.get_or_insert_with(word, || 0) += 1;
    }
    assert_eq!(counts["the"], 3);
    assert_eq!(counts.len(), 9);
    assert_balanced(&counts);
}

#[test]
fn freed_slots_are_reused() {
    let mut map = AvlgTreeMap::with_capacity(8);
    map.set_all((0..8).map(|key| (key, key)));
    let capacity = map.capacity();
    for round in 0..100 {
        let key = round % 8;
        map.remove(&key);
        map.set(key, round);
    }
    assert_eq!(map.capacity(), capacity);
    assert_eq!(map.len(), 8);
}
