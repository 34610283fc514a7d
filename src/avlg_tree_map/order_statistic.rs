use core::borrow::Borrow;
use core::ops::{Index, IndexMut};

use super::AvlgTreeMap;
use crate::Rank;
use crate::comparator::Comparator;

impl<K, V, C> AvlgTreeMap<K, V, C> {
    /// Returns the key-value pair at position `rank` in key order.
    ///
    /// The rank is zero-based. Returns `None` if `rank` is out of bounds.
    /// Every node caches the size of its subtree, so no traversal is needed.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let mut map = AvlgTreeMap::new();
    /// map.set("a", 10);
    /// map.set("c", 30);
    /// map.set("b", 20);
    ///
    /// let (key, value) = map.get_by_rank(1).unwrap();
    /// assert_eq!((key, value), (&"b", &20));
    /// assert!(map.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        self.raw.select(rank).map(|handle| self.raw.node(handle).entry())
    }

    /// Returns the key and a mutable reference to the value at position `rank`
    /// in key order.
    ///
    /// The key is returned as a shared reference because mutating it could
    /// break the ordering of the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        let handle = self.raw.select(rank)?;
        let node = self.raw.node_mut(handle);
        Some(node.entry_mut())
    }

    /// Returns the zero-based rank of `key` in key order, or `None` if the key
    /// is not present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let mut map = AvlgTreeMap::new();
    /// map.set(10, "a");
    /// map.set(20, "b");
    ///
    /// assert_eq!(map.rank_of(&20), Some(1));
    /// assert_eq!(map.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.rank_of(key)
    }
}

/// Indexes into the map by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use avlg_tree::{AvlgTreeMap, Rank};
///
/// let map = AvlgTreeMap::from([("b", 2), ("a", 1)]);
/// assert_eq!(map[Rank(0)], 1);
/// ```
impl<K, V, C> Index<Rank> for AvlgTreeMap<K, V, C> {
    type Output = V;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}

/// Mutably indexes into the map by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
impl<K, V, C> IndexMut<Rank> for AvlgTreeMap<K, V, C> {
    fn index_mut(&mut self, rank: Rank) -> &mut Self::Output {
        self.get_by_rank_mut(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}
