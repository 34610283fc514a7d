//! Simple element containers sharing the [`Collection`] interface.
//!
//! - [`ArrayList`]: an unordered, growable list.
//! - [`Trie`]: a prefix tree over strings whose characters come from a fixed
//!   [`Alphabet`].

use crate::error::Error;

mod array_list;
mod trie;

pub use array_list::ArrayList;
pub use trie::{Alphabet, Trie};

/// A container of elements of type `T`.
pub trait Collection<T> {
    /// Adds `element` to the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot represent `element`. The
    /// collection is unchanged in that case.
    fn insert(&mut self, element: T) -> Result<(), Error>;

    /// Adds every element in order, stopping at the first one that is rejected.
    ///
    /// # Errors
    ///
    /// Returns the error of the first rejected element. Elements before it
    /// remain inserted.
    fn insert_all<I>(&mut self, elements: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
        Self: Sized,
    {
        for element in elements {
            self.insert(element)?;
        }
        Ok(())
    }

    /// Returns `true` if an element equal to `element` is stored.
    fn contains(&self, element: &T) -> bool;

    /// Removes `element`, returning the stored element if there was one.
    fn delete(&mut self, element: &T) -> Option<T>;

    /// Returns the number of stored elements.
    fn len(&self) -> usize;

    /// Returns `true` if no element is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
