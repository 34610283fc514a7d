/// A zero-based position in the key order of an [`AvlgTreeMap`](crate::AvlgTreeMap).
///
/// Indexing a map with a `Rank` looks up the value by position instead of by key.
///
/// # Examples
///
/// ```
/// use avlg_tree::{AvlgTreeMap, Rank};
///
/// let mut map = AvlgTreeMap::new();
/// map.set("b", 20);
/// map.set("a", 10);
///
/// assert_eq!(map[Rank(0)], 10);
/// assert_eq!(map[Rank(1)], 20);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
