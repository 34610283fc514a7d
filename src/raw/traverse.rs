//! Stack-based depth-first walks over a node arena.
//!
//! Each walk yields node handles and holds only a shared borrow of the arena,
//! so a new walk can be started at any time and several may run side by side.

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;

// Enough for a classic AVL tree of several billion entries before spilling.
type Stack = SmallVec<[Handle; 48]>;

/// In-order walk, consumable from both ends.
///
/// The two ends walk independently; callers that mix `next` and `next_back`
/// must stop after `len` items in total.
pub(crate) struct InOrder<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    front: Stack,
    back: Stack,
}

impl<'a, K, V> InOrder<'a, K, V> {
    pub(crate) fn new(nodes: &'a Arena<Node<K, V>>, root: Option<Handle>) -> Self {
        let mut walk = Self {
            nodes,
            front: Stack::new(),
            back: Stack::new(),
        };
        walk.descend_left(root);
        walk.descend_right(root);
        walk
    }

    fn descend_left(&mut self, mut link: Option<Handle>) {
        while let Some(handle) = link {
            self.front.push(handle);
            link = self.nodes.get(handle).left();
        }
    }

    fn descend_right(&mut self, mut link: Option<Handle>) {
        while let Some(handle) = link {
            self.back.push(handle);
            link = self.nodes.get(handle).right();
        }
    }

    pub(crate) fn next_back(&mut self) -> Option<Handle> {
        let handle = self.back.pop()?;
        self.descend_right(self.nodes.get(handle).left());
        Some(handle)
    }
}

impl<K, V> Iterator for InOrder<'_, K, V> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        let handle = self.front.pop()?;
        self.descend_left(self.nodes.get(handle).right());
        Some(handle)
    }
}

impl<K, V> Clone for InOrder<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            front: self.front.clone(),
            back: self.back.clone(),
        }
    }
}

/// Pre-order walk: node, then left subtree, then right subtree.
pub(crate) struct PreOrder<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    stack: Stack,
}

impl<'a, K, V> PreOrder<'a, K, V> {
    pub(crate) fn new(nodes: &'a Arena<Node<K, V>>, root: Option<Handle>) -> Self {
        Self {
            nodes,
            stack: root.into_iter().collect(),
        }
    }
}

impl<K, V> Iterator for PreOrder<'_, K, V> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        let handle = self.stack.pop()?;
        let node = self.nodes.get(handle);
        // Right goes first so that the left subtree is popped first.
        self.stack.extend(node.right());
        self.stack.extend(node.left());
        Some(handle)
    }
}

impl<K, V> Clone for PreOrder<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            stack: self.stack.clone(),
        }
    }
}

/// Post-order walk: left subtree, then right subtree, then node.
pub(crate) struct PostOrder<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    // `true` once the node's children have been scheduled.
    stack: SmallVec<[(Handle, bool); 48]>,
}

impl<'a, K, V> PostOrder<'a, K, V> {
    pub(crate) fn new(nodes: &'a Arena<Node<K, V>>, root: Option<Handle>) -> Self {
        Self {
            nodes,
            stack: root.map(|handle| (handle, false)).into_iter().collect(),
        }
    }
}

impl<K, V> Iterator for PostOrder<'_, K, V> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        loop {
            let (handle, expanded) = self.stack.pop()?;
            if expanded {
                return Some(handle);
            }

            let node = self.nodes.get(handle);
            self.stack.push((handle, true));
            self.stack.extend(node.right().map(|right| (right, false)));
            self.stack.extend(node.left().map(|left| (left, false)));
        }
    }
}

impl<K, V> Clone for PostOrder<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            stack: self.stack.clone(),
        }
    }
}
