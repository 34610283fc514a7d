use super::handle::Handle;

/// A single AVL-G tree node.
///
/// Children are handles into the owning tree's arena. `height` and `size`
/// cache the derived subtree height and entry count; they are refreshed by
/// [`Node::update`] whenever a child link changes.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    left: Option<Handle>,
    right: Option<Handle>,
    // Height of this subtree; a leaf has height 0.
    height: u32,
    // Number of entries in this subtree, including this node.
    size: usize,
}

impl<K, V> Node<K, V> {
    /// Creates a detached leaf.
    pub(crate) const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: 0,
            size: 1,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub(crate) fn entry(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    pub(crate) fn entry_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }

    /// Moves `key` and `value` into this node, returning the previous entry.
    pub(crate) fn replace_entry(&mut self, key: K, value: V) -> (K, V) {
        (core::mem::replace(&mut self.key, key), core::mem::replace(&mut self.value, value))
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    #[inline]
    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    /// Recomputes the cached height and size from the children's summaries.
    ///
    /// `None` stands for an absent child (height -1, size 0).
    pub(crate) fn update(&mut self, left: Option<(u32, usize)>, right: Option<(u32, usize)>) {
        self.height = match (left, right) {
            (None, None) => 0,
            (Some((h, _)), None) | (None, Some((h, _))) => h + 1,
            (Some((l, _)), Some((r, _))) => l.max(r) + 1,
        };
        self.size = 1 + left.map_or(0, |(_, s)| s) + right.map_or(0, |(_, s)| s);
    }
}

/// Height of an optional subtree, using -1 for an absent one.
#[inline]
pub(crate) fn signed_height(summary: Option<(u32, usize)>) -> i64 {
    summary.map_or(-1, |(height, _)| i64::from(height))
}
