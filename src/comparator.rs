//! Total orders used to place keys in an [`AvlgTreeMap`](crate::AvlgTreeMap).
//!
//! A comparator must describe a total order over the keys it is given:
//!
//! - anti-symmetric: `compare(x, y)` is the reverse of `compare(y, x)`,
//! - transitive: `x < y` and `y < z` imply `x < z`,
//! - consistent: `compare(x, y) == Equal` implies `compare(x, z) == compare(y, z)` for every `z`.
//!
//! Breaking these rules is a logic error. The map will not exhibit undefined behavior,
//! but lookups may miss entries and iteration order is unspecified.
//!
//! # Examples
//!
//! ```
//! use core::cmp::Ordering;
//! use avlg_tree::AvlgTreeMap;
//!
//! #[derive(Debug)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! // `Point` has no natural order, so the map needs one supplied explicitly.
//! let mut map = AvlgTreeMap::with_comparator(|a: &Point, b: &Point| a.x.cmp(&b.x).then(a.y.cmp(&b.y)));
//! map.set(Point { x: 2, y: 0 }, "b");
//! map.set(Point { x: 1, y: 5 }, "a");
//!
//! let first = map.keys().next().unwrap();
//! assert_eq!((first.x, first.y), (1, 5));
//! ```

use core::cmp::Ordering;

/// A three-way comparison over `T`.
///
/// Implemented for [`NaturalOrder`], [`Reversed`], and every closure or function
/// of the shape `Fn(&T, &T) -> Ordering`.
pub trait Comparator<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The order given by the key type's [`Ord`] implementation.
///
/// This is the default comparator of [`AvlgTreeMap`](crate::AvlgTreeMap).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct NaturalOrder;

impl<T: ?Sized + Ord> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts the order of the wrapped comparator.
///
/// # Examples
///
/// ```
/// use avlg_tree::{AvlgTreeMap, NaturalOrder, Reversed};
///
/// let mut map = AvlgTreeMap::with_comparator(Reversed(NaturalOrder));
/// map.set_all([(1, 'a'), (3, 'c'), (2, 'b')]);
///
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, [3, 2, 1]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
