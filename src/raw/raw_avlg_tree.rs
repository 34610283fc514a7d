use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, signed_height};
use super::traverse::InOrder;
use crate::comparator::Comparator;
use crate::tracing_helpers::{debug_log, trace_log};

/// What to do when an inserted key is already present.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Collision {
    /// Overwrite the stored value.
    Overwrite,
    /// Keep the stored value and drop the offered one.
    Keep,
}

/// Outcome of placing a key into the tree.
pub(crate) enum Placement<V> {
    /// A new node was created; this is its handle.
    Inserted(Handle),
    /// The key existed; this is the value it held before the overwrite.
    Replaced(V),
    /// The key existed and was left untouched; this is its node.
    Occupied(Handle),
}

/// Which child link of a node a descent followed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Side {
    Left,
    Right,
}

// Spills to the heap only for trees far taller than a classic AVL tree, which
// a large max imbalance allows.
type Path = SmallVec<[(Handle, Side); 48]>;

/// The AVL-G tree backing `AvlgTreeMap`.
///
/// Mutations descend iteratively and record the path taken. The changed
/// subtree is then linked back into each recorded parent, bottom-up, and
/// every parent is rebalanced before its own parent is visited. After each
/// public mutation every node satisfies
/// `|height(left) - height(right)| <= max_imbalance`.
#[derive(Clone)]
pub(crate) struct RawAvlgTree<K, V, C> {
    /// Arena owning every node of the tree.
    nodes: Arena<Node<K, V>>,
    /// Root of the tree, if non-empty.
    root: Option<Handle>,
    /// Order used for every placement decision.
    comparator: C,
    /// The "G" of AVL-G. Always at least 1.
    max_imbalance: usize,
}

impl<K, V, C> RawAvlgTree<K, V, C> {
    /// Creates an empty tree. `max_imbalance` must already be validated.
    pub(crate) const fn new(comparator: C, max_imbalance: usize) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            comparator,
            max_imbalance,
        }
    }

    pub(crate) fn with_capacity(comparator: C, max_imbalance: usize, capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            comparator,
            max_imbalance,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn max_imbalance(&self) -> usize {
        self.max_imbalance
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.comparator
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) const fn arena(&self) -> &Arena<Node<K, V>> {
        &self.nodes
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Height of the whole tree, `None` when empty.
    pub(crate) fn height(&self) -> Option<usize> {
        self.root.map(|root| self.nodes.get(root).height() as usize)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Removes every entry in key order without rebalancing.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let order: Vec<Handle> = InOrder::new(&self.nodes, self.root).collect();
        let entries = order.into_iter().map(|handle| self.nodes.remove(handle).into_entry()).collect();
        self.clear();
        entries
    }

    /// Leftmost node of the tree.
    pub(crate) fn min(&self) -> Option<Handle> {
        let mut current = self.root?;
        while let Some(left) = self.nodes.get(current).left() {
            current = left;
        }
        Some(current)
    }

    /// Rightmost node of the tree.
    pub(crate) fn max(&self) -> Option<Handle> {
        let mut current = self.root?;
        while let Some(right) = self.nodes.get(current).right() {
            current = right;
        }
        Some(current)
    }

    /// Removes the smallest entry.
    pub(crate) fn pop_min(&mut self) -> Option<(K, V)> {
        let mut path = Path::new();
        let mut current = self.root?;
        while let Some(left) = self.nodes.get(current).left() {
            path.push((current, Side::Left));
            current = left;
        }
        let min = self.nodes.remove(current);
        self.unwind(path, min.right());
        Some(min.into_entry())
    }

    /// Removes the largest entry.
    pub(crate) fn pop_max(&mut self) -> Option<(K, V)> {
        let mut path = Path::new();
        let mut current = self.root?;
        while let Some(right) = self.nodes.get(current).right() {
            path.push((current, Side::Right));
            current = right;
        }
        let max = self.nodes.remove(current);
        self.unwind(path, max.left());
        Some(max.into_entry())
    }

    /// Returns the node at zero-based position `rank` in key order.
    pub(crate) fn select(&self, mut rank: usize) -> Option<Handle> {
        if rank >= self.len() {
            return None;
        }

        let mut current = self.root?;
        loop {
            let node = self.nodes.get(current);
            let left_size = self.size_of(node.left());
            match rank.cmp(&left_size) {
                Ordering::Less => current = node.left()?,
                Ordering::Equal => return Some(current),
                Ordering::Greater => {
                    rank -= left_size + 1;
                    current = node.right()?;
                }
            }
        }
    }

    // ─── Node bookkeeping ───────────────────────────────────────────────────

    fn summary(&self, link: Option<Handle>) -> Option<(u32, usize)> {
        link.map(|handle| {
            let node = self.nodes.get(handle);
            (node.height(), node.size())
        })
    }

    fn size_of(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |handle| self.nodes.get(handle).size())
    }

    /// Recomputes `handle`'s cached height and size from its children.
    fn refresh(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let left = self.summary(node.left());
        let right = self.summary(node.right());
        self.nodes.get_mut(handle).update(left, right);
    }

    /// `height(left) - height(right)` for the node at `handle`.
    fn balance(&self, handle: Handle) -> i64 {
        let node = self.nodes.get(handle);
        signed_height(self.summary(node.left())) - signed_height(self.summary(node.right()))
    }

    fn limit(&self) -> i64 {
        i64::try_from(self.max_imbalance).unwrap_or(i64::MAX)
    }

    // ─── Rebalancing ────────────────────────────────────────────────────────

    /// Restores the balance invariant at `handle` after one of its child links
    /// changed. Returns the root of the subtree afterwards.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        self.refresh(handle);
        let balance = self.balance(handle);
        let limit = self.limit();

        if balance > limit {
            let left = self.nodes.get(handle).left().expect("`RawAvlgTree::rebalance()` - left-heavy node has no left child!");
            if self.balance(left) >= 0 {
                self.rotate_right(handle)
            } else {
                self.rotate_left_right(handle)
            }
        } else if balance < -limit {
            let right = self.nodes.get(handle).right().expect("`RawAvlgTree::rebalance()` - right-heavy node has no right child!");
            if self.balance(right) <= 0 {
                self.rotate_left(handle)
            } else {
                self.rotate_right_left(handle)
            }
        } else {
            handle
        }
    }

    /// ```text
    ///   t               u
    ///    \             / \
    ///     u     ->    t   v
    ///    / \           \
    ///   m   v           m
    /// ```
    fn rotate_left(&mut self, handle: Handle) -> Handle {
        let pivot = self.nodes.get(handle).right().expect("`RawAvlgTree::rotate_left()` - no right child to rotate up!");
        let inner = self.nodes.get(pivot).left();

        self.nodes.get_mut(handle).set_right(inner);
        self.refresh(handle);
        self.nodes.get_mut(pivot).set_left(Some(handle));
        self.refresh(pivot);

        trace_log!(old_root = handle.index(), new_root = pivot.index(), "rotated left");
        pivot
    }

    /// ```text
    ///       t            u
    ///      /            / \
    ///     u     ->     v   t
    ///    / \              /
    ///   v   m            m
    /// ```
    fn rotate_right(&mut self, handle: Handle) -> Handle {
        let pivot = self.nodes.get(handle).left().expect("`RawAvlgTree::rotate_right()` - no left child to rotate up!");
        let inner = self.nodes.get(pivot).right();

        self.nodes.get_mut(handle).set_left(inner);
        self.refresh(handle);
        self.nodes.get_mut(pivot).set_right(Some(handle));
        self.refresh(pivot);

        trace_log!(old_root = handle.index(), new_root = pivot.index(), "rotated right");
        pivot
    }

    fn rotate_left_right(&mut self, handle: Handle) -> Handle {
        let left = self.nodes.get(handle).left().expect("`RawAvlgTree::rotate_left_right()` - no left child!");
        let left = self.rotate_left(left);
        self.nodes.get_mut(handle).set_left(Some(left));
        self.rotate_right(handle)
    }

    fn rotate_right_left(&mut self, handle: Handle) -> Handle {
        let right = self.nodes.get(handle).right().expect("`RawAvlgTree::rotate_right_left()` - no right child!");
        let right = self.rotate_right(right);
        self.nodes.get_mut(handle).set_right(Some(right));
        self.rotate_left(handle)
    }

    // ─── Path unwinding ─────────────────────────────────────────────────────

    /// Links `child` into the last parent on `path`, rebalances that parent,
    /// and repeats with the resulting subtree root until the path is empty.
    /// The final subtree becomes the root of the tree.
    fn unwind(&mut self, mut path: Path, mut child: Option<Handle>) {
        while let Some((parent, side)) = path.pop() {
            let node = self.nodes.get_mut(parent);
            match side {
                Side::Left => node.set_left(child),
                Side::Right => node.set_right(child),
            }
            child = Some(self.rebalance(parent));
        }
        self.root = child;
    }
}

impl<K, V, C> RawAvlgTree<K, V, C> {
    /// Finds the node holding `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match self.comparator.compare(key, node.key().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Zero-based position of `key` in key order.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut rank = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match self.comparator.compare(key, node.key().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => {
                    rank += self.size_of(node.left()) + 1;
                    node.right()
                }
                Ordering::Equal => return Some(rank + self.size_of(node.left())),
            };
        }
        None
    }

    /// Overwrites the value under `key` without changing the tree's shape.
    pub(crate) fn replace<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.search(key)?;
        Some(core::mem::replace(self.nodes.get_mut(handle).value_mut(), value))
    }

    /// Removes `key`, returning its entry.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut path = Path::new();
        let mut link = self.root;
        let target = loop {
            let handle = link?;
            let node = self.nodes.get(handle);
            link = match self.comparator.compare(key, node.key().borrow()) {
                Ordering::Less => {
                    path.push((handle, Side::Left));
                    node.left()
                }
                Ordering::Greater => {
                    path.push((handle, Side::Right));
                    node.right()
                }
                Ordering::Equal => break handle,
            };
        };

        let Some(right) = self.nodes.get(target).right() else {
            // Leaf, or only a left child: the left subtree takes this node's
            // place.
            let node = self.nodes.remove(target);
            self.unwind(path, node.left());
            return Some(node.into_entry());
        };

        // Pull the in-order successor into `target`. `target` stays on the
        // path, so it is rebalanced too once the successor is unlinked.
        debug_log!(node = target.index(), "removing a node via its successor");
        path.push((target, Side::Right));
        let mut successor = right;
        while let Some(left) = self.nodes.get(successor).left() {
            path.push((successor, Side::Left));
            successor = left;
        }
        let successor = self.nodes.remove(successor);
        let orphan = successor.right();
        let (key, value) = successor.into_entry();
        let removed = self.nodes.get_mut(target).replace_entry(key, value);
        self.unwind(path, orphan);
        Some(removed)
    }
}

impl<K, V, C: Comparator<K>> RawAvlgTree<K, V, C> {
    /// Places `key`, resolving an existing key according to `collision`.
    pub(crate) fn place(&mut self, key: K, value: V, collision: Collision) -> Placement<V> {
        let mut path = Path::new();
        let mut link = self.root;
        while let Some(handle) = link {
            let node = self.nodes.get(handle);
            link = match self.comparator.compare(&key, node.key()) {
                Ordering::Less => {
                    path.push((handle, Side::Left));
                    node.left()
                }
                Ordering::Greater => {
                    path.push((handle, Side::Right));
                    node.right()
                }
                // The shape is unchanged, so nothing on the path needs work.
                Ordering::Equal => {
                    return match collision {
                        Collision::Overwrite => {
                            Placement::Replaced(core::mem::replace(self.nodes.get_mut(handle).value_mut(), value))
                        }
                        Collision::Keep => Placement::Occupied(handle),
                    };
                }
            };
        }

        let leaf = self.nodes.insert(Node::leaf(key, value));
        self.unwind(path, Some(leaf));
        Placement::Inserted(leaf)
    }

    /// Places `key` unless it is already present, and returns the node that
    /// holds it either way.
    pub(crate) fn place_new(&mut self, key: K, value: V) -> Handle {
        match self.place(key, value, Collision::Keep) {
            Placement::Inserted(handle) | Placement::Occupied(handle) => handle,
            Placement::Replaced(_) => unreachable!("`RawAvlgTree::place_new()` - a kept collision never overwrites!"),
        }
    }
}
