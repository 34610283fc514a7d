use super::{AvlgTreeMap, DEFAULT_MAX_IMBALANCE};
use crate::comparator::{Comparator, NaturalOrder};
use crate::error::Error;
use crate::raw::RawAvlgTree;
use crate::tracing_helpers::{debug_log, warn_log};

/// Checks that `max_imbalance` admits at least one valid tree shape for every
/// number of entries.
pub(super) fn validate_max_imbalance(max_imbalance: usize) -> Result<usize, Error> {
    if max_imbalance == 0 {
        warn_log!(max_imbalance, "rejected AVL-G max imbalance");
        return Err(Error::InvalidMaxImbalance(max_imbalance));
    }
    Ok(max_imbalance)
}

/// Builder for an [`AvlgTreeMap`] with non-default settings.
///
/// | setting         | default          |
/// |-----------------|------------------|
/// | `max_imbalance` | 1                |
/// | `comparator`    | [`NaturalOrder`] |
/// | `capacity`      | 0                |
///
/// Nothing is validated or allocated until [`build`](Self::build) or
/// [`build_from`](Self::build_from).
///
/// # Examples
///
/// ```
/// use avlg_tree::{NaturalOrder, Reversed, TreeConfig};
///
/// let map = TreeConfig::new()
///     .max_imbalance(2)
///     .comparator(Reversed(NaturalOrder))
///     .capacity(16)
///     .build_from([(1, "one"), (2, "two"), (3, "three")])?;
///
/// assert_eq!(map.max_imbalance(), 2);
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// # Ok::<(), avlg_tree::Error>(())
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct TreeConfig<C = NaturalOrder> {
    max_imbalance: usize,
    comparator: C,
    capacity: usize,
}

impl TreeConfig {
    /// Returns the default settings.
    pub const fn new() -> Self {
        TreeConfig {
            max_imbalance: DEFAULT_MAX_IMBALANCE,
            comparator: NaturalOrder,
            capacity: 0,
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig::new()
    }
}

impl<C> TreeConfig<C> {
    /// Sets the largest height difference tolerated between the two subtrees
    /// of any node. Must be at least 1.
    pub fn max_imbalance(mut self, max_imbalance: usize) -> Self {
        self.max_imbalance = max_imbalance;
        self
    }

    /// Replaces the comparator that orders the keys.
    pub fn comparator<D>(self, comparator: D) -> TreeConfig<D> {
        TreeConfig {
            max_imbalance: self.max_imbalance,
            comparator,
            capacity: self.capacity,
        }
    }

    /// Reserves room for `capacity` entries up front.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaxImbalance`] if the max imbalance is 0.
    pub fn build<K, V>(self) -> Result<AvlgTreeMap<K, V, C>, Error> {
        let max_imbalance = validate_max_imbalance(self.max_imbalance)?;
        debug_log!(max_imbalance, capacity = self.capacity, "building AVL-G tree map");
        Ok(AvlgTreeMap {
            raw: RawAvlgTree::with_capacity(self.comparator, max_imbalance, self.capacity),
        })
    }

    /// Builds a map holding `entries`. When a key repeats, the last value wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaxImbalance`] if the max imbalance is 0; no
    /// entry is consumed in that case.
    pub fn build_from<K, V, I>(self, entries: I) -> Result<AvlgTreeMap<K, V, C>, Error>
    where
        C: Comparator<K>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = self.build()?;
        map.set_all(entries);
        Ok(map)
    }
}
