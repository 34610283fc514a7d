/// Errors reported for invalid arguments at the public API boundary.
///
/// Every fallible operation validates its arguments before touching the
/// collection, so an `Err` always leaves the collection unchanged.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The maximum imbalance of an AVL-G tree must be at least 1.
    ///
    /// With `0` no tree holding two entries could satisfy the balance invariant.
    #[error("max imbalance must be at least 1, got {0}")]
    InvalidMaxImbalance(usize),

    /// A [`Trie`](crate::Trie) alphabet must contain at least one symbol.
    #[error("trie alphabet size must be strictly positive")]
    EmptyAlphabet,

    /// A character does not fit in the [`Trie`](crate::Trie)'s alphabet.
    #[error("character {ch:?} is outside the trie alphabet of {size} symbols")]
    OutOfAlphabet {
        /// The rejected character.
        ch: char,
        /// Size of the alphabet the trie was built with.
        size: usize,
    },
}
