//! AVL-G trees for Rust.
//!
//! This crate provides [`AvlgTreeMap`], an ordered map backed by an AVL-G tree: a
//! height-balanced binary search tree in which the heights of the two subtrees of
//! every node may differ by at most `G`. `G = 1` gives a classic AVL tree; larger
//! values trade a slightly taller tree for fewer rotations.
//!
//! - Keys are ordered by a pluggable [`Comparator`] ([`NaturalOrder`] by default,
//!   [`Reversed`], or any `Fn(&K, &K) -> Ordering` closure).
//! - `G` is chosen per map with [`AvlgTreeMap::with_max_imbalance`] or
//!   [`TreeConfig`].
//! - Cached subtree sizes give O(log n) [`get_by_rank`](AvlgTreeMap::get_by_rank)
//!   and [`rank_of`](AvlgTreeMap::rank_of).
//!
//! Two small containers built on the same ground, [`ArrayList`] and [`Trie`],
//! share the [`Collection`] interface.
//!
//! # Example
//!
//! ```
//! use avlg_tree::{AvlgTreeMap, Rank};
//!
//! let mut scores = AvlgTreeMap::with_max_imbalance(2)?;
//! scores.set("Alice", 100);
//! scores.set("Bob", 85);
//! scores.set("Carol", 92);
//!
//! assert_eq!(scores.get("Bob"), Some(&85));
//! assert_eq!(scores.set_if_absent("Bob", 0), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Keys are sorted alphabetically.
//! assert_eq!(scores.rank_of("Carol"), Some(2));
//! assert_eq!(scores[Rank(0)], 100);
//!
//! let passed = scores.filter(|_, score| *score >= 90);
//! assert_eq!(passed.keys().copied().collect::<Vec<_>>(), ["Alice", "Carol"]);
//! # Ok::<(), avlg_tree::Error>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **`tracing`** - Emits rotation, bulk-operation and validation events through
//!   the [`tracing`](https://docs.rs/tracing) crate. Off by default.
//!
//! # Implementation
//!
//! Nodes live in an index arena and refer to their children by handle, so the
//! crate contains no unsafe code. Every insertion and removal rebalances each
//! node on the path back to the root, including the node that receives the
//! in-order successor when an entry with two children is removed.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod comparator;
mod error;
mod order_statistic;
mod raw;
mod tracing_helpers;

pub mod avlg_tree_map;
pub mod collection;

pub use avlg_tree_map::{AvlgTreeMap, TreeConfig};
pub use collection::{Alphabet, ArrayList, Collection, Trie};
pub use comparator::{Comparator, NaturalOrder, Reversed};
pub use error::Error;
pub use order_statistic::Rank;
