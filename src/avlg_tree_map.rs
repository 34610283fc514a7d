use alloc::vec::{self, Vec};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::Error;
use crate::raw::{self, Arena, Collision, InOrder, Node, Placement, RawAvlgTree};
use crate::tracing_helpers::debug_log;

mod capacity;
mod config;
mod order_statistic;

pub use crate::Rank;
pub use config::TreeConfig;

use config::validate_max_imbalance;

/// The maximum imbalance used when none is given.
pub const DEFAULT_MAX_IMBALANCE: usize = 1;

/// An ordered map based on an [AVL-G tree].
///
/// An AVL-G tree is a height-balanced binary search tree whose balance bound is a
/// parameter: at every node the heights of the two subtrees differ by at most `G`,
/// the map's *max imbalance*. With `G = 1` this is a classic AVL tree. Larger
/// values let the tree drift further from perfect balance, trading slightly
/// longer searches for fewer rotations on insertion and removal.
///
/// Keys are placed by a [`Comparator`]. By default that is [`NaturalOrder`], the
/// key type's [`Ord`] implementation, but any closure of the shape
/// `Fn(&K, &K) -> Ordering` works as well, which allows keys that have no natural
/// order.
///
/// Iterators obtained from functions such as [`AvlgTreeMap::iter`],
/// [`AvlgTreeMap::keys`], or [`AvlgTreeMap::values`] produce their items in key
/// order. They borrow the map, so it cannot change while one is alive.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the comparator, changes while it is in the map. The behavior
/// resulting from such a logic error is not specified, but will be encapsulated to the
/// `AvlgTreeMap` that observed the logic error and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use avlg_tree::AvlgTreeMap;
///
/// // type inference lets us omit an explicit type signature (which
/// // would be `AvlgTreeMap<&str, &str>` in this example).
/// let mut movie_reviews = AvlgTreeMap::new();
///
/// // review some movies.
/// movie_reviews.set("Office Space",       "Deals with real issues in the workplace.");
/// movie_reviews.set("Pulp Fiction",       "Masterpiece.");
/// movie_reviews.set("The Godfather",      "Very enjoyable.");
/// movie_reviews.set("The Blues Brothers", "Eye lyked it a lot.");
///
/// // check for a specific one.
/// if !movie_reviews.contains("Les Miserables") {
///     println!("We've got {} reviews, but Les Miserables ain't one.",
///              movie_reviews.len());
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's delete it.
/// movie_reviews.remove("The Blues Brothers");
///
/// // look up the values associated with some keys.
/// let to_find = ["Up!", "Office Space"];
/// for movie in &to_find {
///     match movie_reviews.get(movie) {
///        Some(review) => println!("{movie}: {review}"),
///        None => println!("{movie} is unreviewed.")
///     }
/// }
///
/// // Look up the value for a key (will panic if the key is not found).
/// println!("Movie review: {}", movie_reviews["Office Space"]);
///
/// // iterate over everything.
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// A looser balance bound and a custom order:
///
/// ```
/// use avlg_tree::AvlgTreeMap;
///
/// let by_length = |a: &&str, b: &&str| a.len().cmp(&b.len()).then(a.cmp(b));
/// let mut map = AvlgTreeMap::with_max_imbalance_and_comparator(3, by_length)?;
/// map.set_all([("pear", 1), ("fig", 2), ("banana", 3)]);
///
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, ["fig", "pear", "banana"]);
/// assert_eq!(map.max_imbalance(), 3);
/// # Ok::<(), avlg_tree::Error>(())
/// ```
///
/// [AVL-G tree]: https://en.wikipedia.org/wiki/AVL_tree
#[derive(Clone)]
pub struct AvlgTreeMap<K, V, C = NaturalOrder> {
    raw: RawAvlgTree<K, V, C>,
}

/// An iterator over the entries of an `AvlgTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`AvlgTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use avlg_tree::AvlgTreeMap;
///
/// let map = AvlgTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: AvlgTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    walk: InOrder<'a, K, V>,
    // The two ends of `walk` meet in the middle; this stops them crossing.
    remaining: usize,
}

/// An owning iterator over the entries of an `AvlgTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`AvlgTreeMap`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of an `AvlgTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`AvlgTreeMap`]. See its
/// documentation for more.
///
/// [`keys`]: AvlgTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `AvlgTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`AvlgTreeMap`]. See its
/// documentation for more.
///
/// [`values`]: AvlgTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An owning iterator over the keys of an `AvlgTreeMap`.
///
/// This `struct` is created by the [`into_keys`] method on [`AvlgTreeMap`].
///
/// [`into_keys`]: AvlgTreeMap::into_keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

/// An owning iterator over the values of an `AvlgTreeMap`.
///
/// This `struct` is created by the [`into_values`] method on [`AvlgTreeMap`].
///
/// [`into_values`]: AvlgTreeMap::into_values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoValues<K, V> {
    inner: IntoIter<K, V>,
}

/// A pre-order iterator over the entries of an `AvlgTreeMap`.
///
/// Each entry is yielded before the entries of its left subtree, which come
/// before those of its right subtree. The first item is the root.
///
/// This `struct` is created by the [`pre_order`] method on [`AvlgTreeMap`].
///
/// [`pre_order`]: AvlgTreeMap::pre_order
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PreOrder<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    walk: raw::PreOrder<'a, K, V>,
}

/// A post-order iterator over the entries of an `AvlgTreeMap`.
///
/// Both subtrees of an entry are yielded before the entry itself. The last
/// item is the root.
///
/// This `struct` is created by the [`post_order`] method on [`AvlgTreeMap`].
///
/// [`post_order`]: AvlgTreeMap::post_order
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PostOrder<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    walk: raw::PostOrder<'a, K, V>,
}

impl<K, V> AvlgTreeMap<K, V> {
    /// Makes a new, empty `AvlgTreeMap` ordered by [`NaturalOrder`] with a max
    /// imbalance of 1.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let mut map = AvlgTreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.set(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> AvlgTreeMap<K, V> {
        AvlgTreeMap {
            raw: RawAvlgTree::new(NaturalOrder, DEFAULT_MAX_IMBALANCE),
        }
    }

    /// Makes a new, empty `AvlgTreeMap` ordered by [`NaturalOrder`] whose
    /// subtree heights may differ by up to `max_imbalance` at every node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaxImbalance`] if `max_imbalance` is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::{AvlgTreeMap, Error};
    ///
    /// let map: AvlgTreeMap<u32, u32> = AvlgTreeMap::with_max_imbalance(2)?;
    /// assert_eq!(map.max_imbalance(), 2);
    ///
    /// let rejected = AvlgTreeMap::<u32, u32>::with_max_imbalance(0);
    /// assert_eq!(rejected.err(), Some(Error::InvalidMaxImbalance(0)));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn with_max_imbalance(max_imbalance: usize) -> Result<AvlgTreeMap<K, V>, Error> {
        AvlgTreeMap::with_max_imbalance_and_comparator(max_imbalance, NaturalOrder)
    }
}

impl<K, V, C> AvlgTreeMap<K, V, C> {
    /// Makes a new, empty `AvlgTreeMap` ordered by `comparator` with a max
    /// imbalance of 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let mut map = AvlgTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// map.set_all([(1, "one"), (2, "two")]);
    /// assert_eq!(map.first_key_value(), Some((&2, &"two")));
    /// ```
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        AvlgTreeMap {
            raw: RawAvlgTree::new(comparator, DEFAULT_MAX_IMBALANCE),
        }
    }

    /// Makes a new, empty `AvlgTreeMap` ordered by `comparator` whose subtree
    /// heights may differ by up to `max_imbalance` at every node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaxImbalance`] if `max_imbalance` is 0.
    pub fn with_max_imbalance_and_comparator(max_imbalance: usize, comparator: C) -> Result<Self, Error> {
        let max_imbalance = validate_max_imbalance(max_imbalance)?;
        debug_log!(max_imbalance, "created AVL-G tree map");
        Ok(AvlgTreeMap {
            raw: RawAvlgTree::new(comparator, max_imbalance),
        })
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let mut a = AvlgTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.set(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all entries.
    ///
    /// The comparator and the max imbalance are kept.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the height of the tree: `None` when empty, `Some(0)` for a
    /// single entry.
    ///
    /// For a max imbalance of 1 the height never exceeds
    /// `1.44 * log2(len + 2)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let mut map = AvlgTreeMap::new();
    /// assert_eq!(map.height(), None);
    ///
    /// // Ascending inserts would build a chain without rotations.
    /// map.set_all((0..7).map(|key| (key, ())));
    /// assert_eq!(map.height(), Some(2));
    /// ```
    #[must_use]
    pub fn height(&self) -> Option<usize> {
        self.raw.height()
    }

    /// Returns the largest height difference the map tolerates between the two
    /// subtrees of any node.
    #[must_use]
    pub const fn max_imbalance(&self) -> usize {
        self.raw.max_imbalance()
    }

    /// Returns the comparator that orders the keys.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
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
    /// assert_eq!(map.first_key_value(), None);
    /// map.set(1, "b");
    /// map.set(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.min().map(|handle| self.raw.node(handle).entry())
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.max().map(|handle| self.raw.node(handle).entry())
    }

    /// Removes and returns the first entry in the map.
    /// The key of this entry is the minimum key that was in the map.
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
    /// let mut map = AvlgTreeMap::from([(1, "a"), (2, "b")]);
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_min()
    }

    /// Removes and returns the last entry in the map.
    /// The key of this entry is the maximum key that was in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_max()
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// comparator must order the borrowed form the same way as the key type.
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
    /// map.set(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.search(key).map(|handle| self.raw.node(handle).value())
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// Useful when keys that compare equal are not identical, to get hold of
    /// the stored one.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.search(key).map(|handle| self.raw.node(handle).entry())
    }

    /// Returns a mutable reference to the value corresponding to the key.
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
    /// map.set(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.raw.search(key)?;
        Some(self.raw.node_mut(handle).value_mut())
    }

    /// Returns `true` if the map contains a value for the specified key.
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
    /// map.set(1, "a");
    /// assert!(map.contains(&1));
    /// assert!(!map.contains(&2));
    /// ```
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.search(key).is_some()
    }

    /// Overwrites the value of an existing key and returns the old value.
    ///
    /// If the key is absent the map is left unchanged, `value` is dropped and
    /// `None` is returned. Replacing never changes the shape of the tree.
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
    /// let mut map = AvlgTreeMap::from([("a", 1)]);
    /// assert_eq!(map.replace("a", 2), Some(1));
    /// assert_eq!(map.replace("b", 3), None);
    /// assert!(!map.contains("b"));
    /// assert_eq!(map["a"], 2);
    /// ```
    pub fn replace<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.replace(key, value)
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
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
    /// map.set(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.remove(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.remove(key)
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// Each call starts a fresh traversal.
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; O(1) amortized per step.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let map = AvlgTreeMap::from([(3, "c"), (2, "b"), (1, "a")]);
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: self.raw.arena(),
            walk: InOrder::new(self.raw.arena(), self.raw.root()),
            remaining: self.raw.len(),
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let mut a = AvlgTreeMap::new();
    /// a.set(2, "b");
    /// a.set(1, "a");
    ///
    /// let keys: Vec<_> = a.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let mut a = AvlgTreeMap::new();
    /// a.set(1, "hello");
    /// a.set(2, "goodbye");
    ///
    /// let values: Vec<&str> = a.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets an iterator that visits every entry before its subtrees, starting
    /// at the root.
    ///
    /// The order depends on the shape of the tree, not only on its contents.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let map = AvlgTreeMap::from([(1, ()), (2, ()), (3, ())]);
    /// let keys: Vec<_> = map.pre_order().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [2, 1, 3]);
    /// ```
    pub fn pre_order(&self) -> PreOrder<'_, K, V> {
        PreOrder {
            nodes: self.raw.arena(),
            walk: raw::PreOrder::new(self.raw.arena(), self.raw.root()),
        }
    }

    /// Gets an iterator that visits every entry after its subtrees, ending at
    /// the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let map = AvlgTreeMap::from([(1, ()), (2, ()), (3, ())]);
    /// let keys: Vec<_> = map.post_order().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [1, 3, 2]);
    /// ```
    pub fn post_order(&self) -> PostOrder<'_, K, V> {
        PostOrder {
            nodes: self.raw.arena(),
            walk: raw::PostOrder::new(self.raw.arena(), self.raw.root()),
        }
    }

    /// Calls `f` on every entry in key order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self {
            f(key, value);
        }
    }

    /// Collects `f(key, value)` for every entry, in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let map = AvlgTreeMap::from([(2, "two"), (1, "one")]);
    /// let labels = map.map(|key, value| format!("{key}={value}"));
    /// assert_eq!(labels, ["1=one", "2=two"]);
    /// ```
    pub fn map<T, F>(&self, mut f: F) -> Vec<T>
    where
        F: FnMut(&K, &V) -> T,
    {
        self.iter().map(|(key, value)| f(key, value)).collect()
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let map = AvlgTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<i32> = map.into_keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues {
            inner: self.into_iter(),
        }
    }
}

impl<K, V, C: Comparator<K>> AvlgTreeMap<K, V, C> {
    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    ///
    /// If the map did have this key present, the value is updated, and the old
    /// value is returned. The key is not updated.
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
    /// assert_eq!(map.set(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.set(37, "b");
    /// assert_eq!(map.set(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        match self.raw.place(key, value, Collision::Overwrite) {
            Placement::Replaced(previous) => Some(previous),
            Placement::Inserted(_) | Placement::Occupied(_) => None,
        }
    }

    /// Inserts a key-value pair only if the key is not already present.
    ///
    /// Returns `None` if the entry was inserted. Otherwise the map is left
    /// unchanged, `value` is dropped and the stored value is returned.
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
    /// assert_eq!(map.set_if_absent("k", 1), None);
    /// assert_eq!(map.set_if_absent("k", 2), Some(&1));
    /// assert_eq!(map["k"], 1);
    /// ```
    pub fn set_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        match self.raw.place(key, value, Collision::Keep) {
            Placement::Occupied(handle) => Some(self.raw.node(handle).value()),
            Placement::Inserted(_) | Placement::Replaced(_) => None,
        }
    }

    /// Returns a mutable reference to the value under `key`, first inserting
    /// `default()` if the key is absent.
    ///
    /// `default` is only called when the key is absent.
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
    /// let mut counts = AvlgTreeMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.get_or_insert_with(word, || 0) += 1;
    /// }
    /// assert_eq!(counts["a"], 2);
    /// assert_eq!(counts["b"], 1);
    /// ```
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let handle = match self.raw.search(&key) {
            Some(handle) => handle,
            None => self.raw.place_new(key, default()),
        };
        self.raw.node_mut(handle).value_mut()
    }

    /// Sets every entry in order, as by repeated [`set`](Self::set). When a key
    /// repeats, the last value wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let mut map = AvlgTreeMap::new();
    /// map.set_all([(1, "a"), (2, "b"), (1, "c")]);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map[&1], "c");
    /// ```
    pub fn set_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.set(key, value);
        }
        debug_log!(len = self.len(), "bulk set");
    }

    /// Sets every entry in order, as by repeated
    /// [`set_if_absent`](Self::set_if_absent). When a key repeats, the first
    /// value wins.
    pub fn set_all_if_absent<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.set_if_absent(key, value);
        }
        debug_log!(len = self.len(), "bulk set if absent");
    }

    /// Moves every entry of `other` into `self`. On a shared key the value
    /// from `other` wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let mut a = AvlgTreeMap::from([(1, "a"), (2, "b")]);
    /// let b = AvlgTreeMap::from([(2, "B"), (3, "C")]);
    /// a.merge_from(b);
    ///
    /// let entries: Vec<_> = a.into_iter().collect();
    /// assert_eq!(entries, [(1, "a"), (2, "B"), (3, "C")]);
    /// ```
    pub fn merge_from<D>(&mut self, other: AvlgTreeMap<K, V, D>) {
        debug_log!(len = self.len(), other_len = other.len(), "merging map in place");
        self.set_all(other);
    }
}

impl<K: Clone, V: Clone, C: Comparator<K> + Clone> AvlgTreeMap<K, V, C> {
    /// Returns a new map with the same comparator and max imbalance holding
    /// the entries for which `predicate` returns `true`. `self` is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let map = AvlgTreeMap::from([(1, "a"), (2, "b"), (3, "c"), (4, "d")]);
    /// let even = map.filter(|key, _| key % 2 == 0);
    ///
    /// assert_eq!(even.keys().copied().collect::<Vec<_>>(), [2, 4]);
    /// assert_eq!(map.len(), 4);
    /// ```
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut filtered = AvlgTreeMap {
            raw: RawAvlgTree::new(self.comparator().clone(), self.max_imbalance()),
        };
        filtered.set_all(
            self.iter()
                .filter(|&(key, value)| predicate(key, value))
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        debug_log!(kept = filtered.len(), len = self.len(), "filtered map");
        filtered
    }

    /// Returns a new map holding the entries of both maps. On a shared key the
    /// value from `other` wins. Neither input is changed.
    ///
    /// The result keeps the comparator and max imbalance of `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let a = AvlgTreeMap::from([(1, "a"), (2, "b")]);
    /// let b = AvlgTreeMap::from([(2, "B"), (3, "C")]);
    /// let merged = a.merge(&b);
    ///
    /// assert_eq!(merged.values().copied().collect::<Vec<_>>(), ["a", "B", "C"]);
    /// assert_eq!(a.len(), 2);
    /// assert_eq!(b.len(), 2);
    /// ```
    #[must_use]
    pub fn merge<D>(&self, other: &AvlgTreeMap<K, V, D>) -> Self {
        let mut merged = self.clone();
        merged.set_all(other.iter().map(|(key, value)| (key.clone(), value.clone())));
        debug_log!(len = self.len(), other_len = other.len(), merged_len = merged.len(), "merged maps");
        merged
    }
}

impl<K: Hash, V: Hash, C> Hash for AvlgTreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for AvlgTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for AvlgTreeMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for AvlgTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for AvlgTreeMap<K, V, C> {
    fn default() -> Self {
        AvlgTreeMap::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for AvlgTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = AvlgTreeMap::default();
        map.set_all(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for AvlgTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.set_all(iter);
    }
}

impl<'a, K: Copy, V: Copy, C: Comparator<K>> Extend<(&'a K, &'a V)> for AvlgTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        self.set_all(iter.into_iter().map(|(&k, &v)| (k, v)));
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlgTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for AvlgTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg_tree::AvlgTreeMap;
    ///
    /// let map = AvlgTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V, C> Index<&Q> for AvlgTreeMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlgTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let nodes = self.nodes;
        self.walk.next().map(|handle| nodes.get(handle).entry())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let nodes = self.nodes;
        self.walk.next_back().map(|handle| nodes.get(handle).entry())
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            walk: self.walk.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoValues<K, V> {}

impl<'a, K, V> Iterator for PreOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        self.walk.next().map(|handle| nodes.get(handle).entry())
    }
}

impl<K, V> FusedIterator for PreOrder<'_, K, V> {}

impl<K, V> Clone for PreOrder<'_, K, V> {
    fn clone(&self) -> Self {
        PreOrder {
            nodes: self.nodes,
            walk: self.walk.clone(),
        }
    }
}

impl<'a, K, V> Iterator for PostOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        self.walk.next().map(|handle| nodes.get(handle).entry())
    }
}

impl<K, V> FusedIterator for PostOrder<'_, K, V> {}

impl<K, V> Clone for PostOrder<'_, K, V> {
    fn clone(&self) -> Self {
        PostOrder {
            nodes: self.nodes,
            walk: self.walk.clone(),
        }
    }
}
