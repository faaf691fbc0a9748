//! Traversal strategies used by [`Tree`](super::Tree).
//!
//! Every whole-subtree algorithm the tree needs (search, flattening, counting, copying,
//! drawing) goes through the [`Traversal`] trait. Two strategies implement it:
//!
//! *   [`Iterative`]: keeps its frames on an explicit heap stack. Depth is limited only by
//!     memory. This is the default.
//! *   [`Recursive`]: plain call-stack recursion guarded by a depth budget. Exceeding the budget
//!     yields [`TreeError::DepthExhausted`] instead of overflowing the stack, and leaves the tree
//!     untouched.
//!
//! Both strategies visit nodes in pre-order with children in insertion order, so they return
//! identical results on every tree the recursive one can finish.

use std::fmt::{self, Display, Write};

use super::{child_vec::ChildVecStore, TreeError, TreeNodeId};

mod iterative;
mod recursive;


pub use iterative::Iterative;
pub use recursive::Recursive;

/// A node found by a search, with its path relative to where the search started.
pub type Found = (TreeNodeId, Vec<usize>);

pub trait Traversal {
    /// Finds the first node in pre-order below `from` (itself included) whose element equals
    /// `element`. When `skip` is set, that child of `from` is not entered; deeper levels never
    /// skip anything.
    fn find<V: PartialEq>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
        element: &V,
        skip: Option<usize>,
    ) -> Result<Option<Found>, TreeError>;

    /// Like [`Traversal::find`] but collects the path of every match, in discovery order.
    fn find_all<V: PartialEq>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
        element: &V,
        skip: Option<usize>,
    ) -> Result<Vec<Vec<usize>>, TreeError>;

    fn contains<V: PartialEq>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
        element: &V,
    ) -> Result<bool, TreeError>;

    /// Every node of the subtree at `from`, in pre-order.
    fn preorder<V>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
    ) -> Result<Vec<TreeNodeId>, TreeError>;

    /// Number of element-bearing nodes in the subtree at `from`.
    fn count<V>(&self, store: &ChildVecStore<V>, from: TreeNodeId) -> Result<usize, TreeError>;

    /// Deep-copies the subtree at `from` into a fresh store whose root is `TreeNodeId(0)` and
    /// whose handles follow pre-order.
    fn copy_subtree<V: Clone>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
    ) -> Result<ChildVecStore<V>, TreeError>;

    /// Draws the subtree at `from` with box-drawing connectors, one line per node.
    fn draw<V: Display>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
    ) -> Result<String, TreeError>;
}

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const GAP: &str = "    ";

fn matches<V: PartialEq>(store: &ChildVecStore<V>, node: TreeNodeId, element: &V) -> bool {
    store.data(node) == Some(element)
}

/// Writes the line for one node. The start node gets no connector; an empty start node draws
/// nothing.
fn draw_line<V: Display>(
    out: &mut String,
    data: Option<&V>,
    prefix: &str,
    is_start: bool,
    is_last: bool,
) -> fmt::Result {
    let Some(data) = data else {
        return Ok(());
    };
    if is_start {
        writeln!(out, "{data}")
    } else {
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        writeln!(out, "{prefix}{connector}{data}")
    }
}

/// The prefix handed to the children of a node drawn with `prefix`. The start node counts as a
/// last child, so its children are indented by one unit.
fn child_prefix(prefix: &str, is_last: bool) -> String {
    format!("{}{}", prefix, if is_last { GAP } else { PIPE })
}
