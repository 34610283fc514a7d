//! Helpers shared by the integration tests.

#![allow(dead_code)]

/// Seed used by the seeded insertion scenarios.
pub const SEED: u32 = 98_502;

/// Number of draws taken from [`mulberry32`] by default.
pub const DRAWS: usize = 64;

/// The Mulberry32 generator: `count` pseudo-random `u32`s from `seed`.
pub fn mulberry32(seed: u32, count: usize) -> impl Iterator<Item = u32> {
    let mut state = seed;
    (0..count).map(move |_| {
        state = state.wrapping_add(0x6D2B_79F5);
        let mut t = state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    })
}

/// Derives a short test string from a pseudo-random number.
///
/// Each character takes a different slice of the bits of `n`; code points that
/// are not valid `char`s become U+FFFD.
pub fn num_to_string(n: u32) -> String {
    [n & 0x7F, n & 0x1FC0, n & 0x7_F000, n & 0x1FC_0000]
        .into_iter()
        .map(|code| char::from_u32(code & 0xFFFF).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Upper bound on the height of a classic AVL tree holding `len` entries.
pub fn avl_height_bound(len: usize) -> usize {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let bound = (1.44 * ((len + 2) as f64).log2()).ceil() as usize;
    bound
}

/// Checks the balance bound at every node of `map` and returns the height of
/// the tree (`-1` when empty).
///
/// The shape is rebuilt from the pre-order walk: in a search tree the keys after
/// a node that sort below it form its left subtree.
pub fn assert_balanced<K: Ord + std::fmt::Debug, V>(map: &avlg_tree::AvlgTreeMap<K, V>) -> i64 {
    fn subtree_height<K: Ord + std::fmt::Debug>(keys: &[&K], max_imbalance: i64) -> i64 {
        let Some((root, rest)) = keys.split_first() else {
            return -1;
        };
        let split = rest.iter().position(|key| key > root).unwrap_or(rest.len());
        let (left, right) = rest.split_at(split);
        let left_height = subtree_height(left, max_imbalance);
        let right_height = subtree_height(right, max_imbalance);
        assert!(
            (left_height - right_height).abs() <= max_imbalance,
            "node {root:?} has subtree heights {left_height} and {right_height}"
        );
        1 + left_height.max(right_height)
    }

    let keys: Vec<&K> = map.pre_order().map(|(key, _)| key).collect();
    let height = subtree_height(&keys, i64::try_from(map.max_imbalance()).unwrap());
    assert_eq!(map.height().map_or(-1, |h| i64::try_from(h).unwrap()), height, "cached height is stale");
    height
}
