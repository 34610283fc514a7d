use alloc::vec::{self, Vec};
use core::slice;

use super::Collection;
use crate::error::Error;

/// An unordered list of elements backed by a [`Vec`].
///
/// Duplicates are allowed. [`delete`](Collection::delete) removes every copy.
///
/// # Examples
///
/// ```
/// use avlg_tree::{ArrayList, Collection};
///
/// let mut list = ArrayList::from(vec![3, 1, 3]);
/// list.insert(2)?;
///
/// assert!(list.contains(&2));
/// assert_eq!(list.delete(&3), Some(3));
/// assert_eq!(list.as_slice(), [1, 2]);
/// # Ok::<(), avlg_tree::Error>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ArrayList<T> {
    elements: Vec<T>,
}

impl<T> ArrayList<T> {
    /// Creates an empty list. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        ArrayList { elements: Vec::new() }
    }

    /// Returns the elements in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Iterates over the elements in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.elements.iter()
    }
}

impl<T> Default for ArrayList<T> {
    fn default() -> Self {
        ArrayList::new()
    }
}

impl<T: PartialEq> Collection<T> for ArrayList<T> {
    fn insert(&mut self, element: T) -> Result<(), Error> {
        self.elements.push(element);
        Ok(())
    }

    fn contains(&self, element: &T) -> bool {
        self.elements.contains(element)
    }

    fn delete(&mut self, element: &T) -> Option<T> {
        let first = self.elements.iter().position(|stored| stored == element)?;
        let removed = self.elements.remove(first);
        self.elements.retain(|stored| stored != element);
        Some(removed)
    }

    fn len(&self) -> usize {
        self.elements.len()
    }
}

impl<T> From<Vec<T>> for ArrayList<T> {
    fn from(elements: Vec<T>) -> Self {
        ArrayList { elements }
    }
}

impl<T> FromIterator<T> for ArrayList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        ArrayList {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for ArrayList<T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ArrayList<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn delete_missing_element_is_none() {
        let mut list = ArrayList::from(vec!['a', 'b']);
        assert_eq!(list.delete(&'z'), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn delete_removes_every_copy() {
        let mut list: ArrayList<i32> = [1, 2, 1, 3, 1].into_iter().collect();
        assert_eq!(list.delete(&1), Some(1));
        assert_eq!(list.as_slice(), [2, 3]);
        assert!(!list.contains(&1));
    }

    #[test]
    fn insert_all_appends_in_order() {
        let mut list = ArrayList::new();
        list.insert_all(["x", "y"]).unwrap();
        list.insert("x").unwrap();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["x", "y", "x"]);
        assert!(!list.is_empty());
    }
}
