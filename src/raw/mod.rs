mod arena;
mod handle;
mod node;
mod raw_avlg_tree;
mod traverse;

pub(crate) use arena::Arena;
pub(crate) use handle::Handle;
pub(crate) use node::Node;
pub(crate) use raw_avlg_tree::{Collision, Placement, RawAvlgTree};
pub(crate) use traverse::{InOrder, PostOrder, PreOrder};
