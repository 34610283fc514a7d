use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::Collection;
use crate::avlg_tree_map::AvlgTreeMap;
use crate::error::Error;
use crate::raw::{Arena, Handle};
use crate::tracing_helpers::warn_log;

/// The set of characters a [`Trie`] accepts: every `char` whose code point is
/// below [`size`](Alphabet::size).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Alphabet {
    /// 7-bit ASCII, 128 symbols.
    #[default]
    Ascii,
    /// ISO 8859-1, 256 symbols.
    Latin1,
    /// The Unicode Basic Multilingual Plane, 65 536 symbols.
    Bmp,
    /// The first `n` code points.
    Custom(usize),
}

impl Alphabet {
    /// Number of symbols in the alphabet.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Alphabet::Ascii => 128,
            Alphabet::Latin1 => 256,
            Alphabet::Bmp => 65_536,
            Alphabet::Custom(size) => size,
        }
    }

    /// Returns `true` if `ch` belongs to the alphabet.
    #[must_use]
    pub fn admits(self, ch: char) -> bool {
        (u32::from(ch) as usize) < self.size()
    }
}

#[derive(Clone, Default)]
struct TrieNode {
    // Sparse and ordered, so enumeration comes out sorted.
    children: AvlgTreeMap<char, Handle>,
    // A stored string ends here.
    terminal: bool,
}

impl TrieNode {
    fn is_prunable(&self) -> bool {
        !self.terminal && self.children.is_empty()
    }
}

enum Step {
    Visit(Handle),
    Descend(char, Handle),
    Leave,
}

/// A prefix tree of strings.
///
/// Each node keeps its children in an [`AvlgTreeMap`] keyed by character, so
/// only characters that occur take up space and prefix queries return their
/// results in lexicographic order. Nodes live in one arena and link to each
/// other by handle, so no operation recurses along a key.
///
/// # Examples
///
/// ```
/// use avlg_tree::Trie;
///
/// let mut trie = Trie::new();
/// for word in ["be", "bean", "beans", "bee"] {
///     trie.insert(word)?;
/// }
///
/// assert!(trie.contains("bean"));
/// assert!(!trie.contains("bea"));
/// assert_eq!(trie.longest_prefix("beanstalk"), "beans");
/// assert_eq!(trie.keys_with_prefix("bea"), ["bean", "beans"]);
///
/// assert!(trie.remove("bean"));
/// assert_eq!(trie.keys_with_prefix("b"), ["be", "beans", "bee"]);
/// # Ok::<(), avlg_tree::Error>(())
/// ```
#[derive(Clone)]
pub struct Trie {
    nodes: Arena<TrieNode>,
    root: Handle,
    alphabet: Alphabet,
    len: usize,
}

impl Trie {
    /// Creates an empty trie over [`Alphabet::Ascii`].
    #[must_use]
    pub fn new() -> Self {
        Trie::over(Alphabet::default())
    }

    /// Creates an empty trie over `alphabet`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyAlphabet`] for `Alphabet::Custom(0)`.
    pub fn with_alphabet(alphabet: Alphabet) -> Result<Self, Error> {
        if alphabet.size() == 0 {
            warn_log!(?alphabet, "rejected empty trie alphabet");
            return Err(Error::EmptyAlphabet);
        }
        Ok(Trie::over(alphabet))
    }

    fn over(alphabet: Alphabet) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.insert(TrieNode::default());
        Trie {
            nodes,
            root,
            alphabet,
            len: 0,
        }
    }

    /// Returns the alphabet the trie accepts.
    #[must_use]
    pub const fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Returns the number of stored strings.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no string is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every string.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.insert(TrieNode::default());
        self.len = 0;
    }

    /// Stores `key`, returning `true` if it was not already stored.
    ///
    /// The empty string can be stored like any other.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfAlphabet`] naming the first character of `key`
    /// outside the alphabet. Nothing is stored in that case.
    pub fn insert(&mut self, key: &str) -> Result<bool, Error> {
        if let Some(ch) = key.chars().find(|&ch| !self.alphabet.admits(ch)) {
            return Err(Error::OutOfAlphabet {
                ch,
                size: self.alphabet.size(),
            });
        }

        let mut node = self.root;
        for ch in key.chars() {
            let existing = self.nodes.get(node).children.get(&ch).copied();
            node = match existing {
                Some(child) => child,
                None => {
                    let child = self.nodes.insert(TrieNode::default());
                    self.nodes.get_mut(node).children.set(ch, child);
                    child
                }
            };
        }

        let added = !core::mem::replace(&mut self.nodes.get_mut(node).terminal, true);
        if added {
            self.len += 1;
        }
        Ok(added)
    }

    /// Returns `true` if `key` is stored.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some_and(|node| self.nodes.get(node).terminal)
    }

    /// Removes `key`, returning `true` if it was stored.
    ///
    /// Branches that no longer lead to a stored string are dropped.
    pub fn remove(&mut self, key: &str) -> bool {
        let mut path = Vec::new();
        let mut node = self.root;
        for ch in key.chars() {
            let Some(&child) = self.nodes.get(node).children.get(&ch) else {
                return false;
            };
            path.push((node, ch));
            node = child;
        }

        if !core::mem::replace(&mut self.nodes.get_mut(node).terminal, false) {
            return false;
        }
        self.len -= 1;

        // Prune upwards; the root is never on the path as a child.
        while let Some((parent, ch)) = path.pop() {
            if !self.nodes.get(node).is_prunable() {
                break;
            }
            self.nodes.remove(node);
            self.nodes.get_mut(parent).children.remove(&ch);
            node = parent;
        }
        true
    }

    /// Returns the longest stored string that is a prefix of `key`, or `""`
    /// when there is none.
    #[must_use]
    pub fn longest_prefix<'k>(&self, key: &'k str) -> &'k str {
        let mut node = self.root;
        let mut longest = 0;
        for (offset, ch) in key.char_indices() {
            let Some(&child) = self.nodes.get(node).children.get(&ch) else {
                break;
            };
            node = child;
            if self.nodes.get(node).terminal {
                longest = offset + ch.len_utf8();
            }
        }
        &key[..longest]
    }

    /// Returns every stored string starting with `prefix`, in lexicographic
    /// order. `prefix` itself is included when stored.
    #[must_use]
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(node) = self.find(prefix) {
            self.collect_into(node, String::from(prefix), &mut keys);
        }
        keys
    }

    /// Returns every stored string in lexicographic order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.keys_with_prefix("")
    }

    fn find(&self, key: &str) -> Option<Handle> {
        key.chars()
            .try_fold(self.root, |node, ch| self.nodes.get(node).children.get(&ch).copied())
    }

    // Pre-order walk with an explicit stack; `Leave` undoes the character
    // pushed by the matching `Descend` once its subtree is done.
    fn collect_into(&self, from: Handle, mut prefix: String, out: &mut Vec<String>) {
        let mut stack = Vec::from([Step::Visit(from)]);
        while let Some(step) = stack.pop() {
            let handle = match step {
                Step::Visit(handle) => handle,
                Step::Descend(ch, handle) => {
                    prefix.push(ch);
                    stack.push(Step::Leave);
                    handle
                }
                Step::Leave => {
                    prefix.pop();
                    continue;
                }
            };

            let node = self.nodes.get(handle);
            if node.terminal {
                out.push(prefix.clone());
            }
            stack.extend(node.children.iter().rev().map(|(&ch, &child)| Step::Descend(ch, child)));
        }
    }
}

impl Default for Trie {
    fn default() -> Self {
        Trie::new()
    }
}

impl PartialEq for Trie {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet && self.len == other.len && self.keys() == other.keys()
    }
}

impl Eq for Trie {}

impl fmt::Debug for Trie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trie")
            .field("alphabet", &self.alphabet)
            .field("len", &self.len)
            .field("keys", &self.keys())
            .finish()
    }
}

impl Collection<String> for Trie {
    fn insert(&mut self, element: String) -> Result<(), Error> {
        Trie::insert(self, &element).map(|_| ())
    }

    fn contains(&self, element: &String) -> bool {
        Trie::contains(self, element)
    }

    fn delete(&mut self, element: &String) -> Option<String> {
        Trie::remove(self, element).then(|| element.clone())
    }

    fn len(&self) -> usize {
        self.len
    }
}
