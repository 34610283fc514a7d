use super::{AvlgTreeMap, DEFAULT_MAX_IMBALANCE};
use crate::comparator::NaturalOrder;
use crate::raw::RawAvlgTree;

impl<K, V> AvlgTreeMap<K, V> {
    /// Creates an empty map with room for at least `capacity` entries before
    /// the node arena reallocates.
    ///
    /// Use [`TreeConfig::capacity`](super::TreeConfig::capacity) to combine a
    /// capacity with another comparator or max imbalance.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let map: AvlgTreeMap<i32, i32> = AvlgTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AvlgTreeMap {
            raw: RawAvlgTree::with_capacity(NaturalOrder, DEFAULT_MAX_IMBALANCE, capacity),
        }
    }
}

impl<K, V, C> AvlgTreeMap<K, V, C> {
    /// Returns how many entries the map can hold before the node arena
    /// reallocates.
    ///
    /// Slots freed by removals are reused before the arena grows.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
