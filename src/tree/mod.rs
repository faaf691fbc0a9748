//! A tree of labelled elements with a movable cursor.
//!
//! Nodes live in a [`ChildVecStore`] arena and are addressed by [`TreeNodeId`] handles: each node
//! stores its parent handle, an ordered vector of child handles, and its element. There are no
//! ownership cycles, and dropping a tree never recurses.
//!
//! The main type is [`Tree<E, S>`]:
//! *   it owns the arena, a root handle, the number of stored elements, and one cursor;
//! *   positional operations (insertion, relative paths, subtree copies) start at the cursor;
//! *   whole-subtree algorithms are delegated to a [`Traversal`] strategy `S`, either
//!     [`Iterative`] (the default) or the depth-budgeted [`Recursive`].
//!
//! Paths come in two flavours:
//! *   absolute paths (`&[usize]`) are child indices starting at the root;
//! *   relative paths (`&[Step]`) start at the cursor and may climb with [`Step::Up`].
//!
//! Queries take `&self` and never move the cursor. Path setters are atomic: when a path does not
//! resolve, the cursor stays where it was.

use std::fmt::{self, Display};

use derive_more::{From, Into};
use log::{debug, trace, warn};
use thiserror::Error;

use child_vec::ChildVecStore;
pub use parent_pointer::ParentId;
use traversal::{Iterative, Traversal};

pub mod child_vec;
pub mod iterato;
pub mod parent_pointer;
pub mod traversal;

#[cfg(test)]
mod tests;

/// A type-safe handle to a node in a [`ChildVecStore`].
/// Wraps a `usize` index into the underlying node vector.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into)]
pub struct TreeNodeId(pub(crate) usize);

impl Display for TreeNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// One step of a relative path.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    /// Ascend to the parent. Written `-1` in the integer encoding.
    Up,
    /// Descend to the child at this index.
    Down(usize),
}

impl Step {
    /// Decodes an integer path where `-1` ascends and `i >= 0` descends to child `i`.
    pub fn parse_path(raw: &[isize]) -> Result<Vec<Step>, TreeError> {
        raw.iter().map(|&s| Step::try_from(s)).collect()
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Self {
        Step::Down(index)
    }
}

impl TryFrom<isize> for Step {
    type Error = TreeError;

    fn try_from(raw: isize) -> Result<Self, Self::Error> {
        match raw {
            -1 => Ok(Step::Up),
            i if i >= 0 => Ok(Step::Down(i.unsigned_abs())),
            i => Err(TreeError::InvalidStep(i)),
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Up => write!(f, "-1"),
            Step::Down(i) => write!(f, "{i}"),
        }
    }
}

/// Errors that can occur during tree operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("recursion depth limit of {limit} exhausted")]
    DepthExhausted { limit: usize },
    #[error("the root cannot be removed")]
    RootRemoval,
    #[error("invalid path step {0}: expected -1 or a child index")]
    InvalidStep(isize),
    #[error("Invalid TreeNodeId: {0}")]
    InvalidNodeId(TreeNodeId),
    #[error("{0} is not listed exactly once among its parent's children")]
    WrongParent(TreeNodeId),
    #[error("parent links form a cycle")]
    Cyclic,
    #[error("expected exactly one root, found {0}")]
    RootCount(usize),
    #[error("size is {recorded} but {counted} elements are attached")]
    SizeMismatch { recorded: usize, counted: usize },
    #[error(transparent)]
    Fmt(#[from] fmt::Error),
}

/// A tree of `E` with a cursor, traversed with strategy `S`.
#[derive(Debug)]
pub struct Tree<E, S = Iterative> {
    store: ChildVecStore<E>,
    root: TreeNodeId,
    /// Number of element-bearing nodes; zero exactly when the root is empty.
    size: usize,
    cursor: TreeNodeId,
    traversal: S,
}

impl<E, S: Default> Default for Tree<E, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, S: Default> Tree<E, S> {
    pub fn new() -> Self {
        Self::with_traversal(S::default())
    }
}

/// Construction, accessors and cursor navigation. None of these traverse whole subtrees.
impl<E, S> Tree<E, S> {
    /// An empty tree: a root without element, the cursor on it, size zero.
    pub fn with_traversal(traversal: S) -> Self {
        let mut store = ChildVecStore::new();
        let root = store.add_root(None);
        Tree {
            store,
            root,
            size: 0,
            cursor: root,
            traversal,
        }
    }

    /// Builds a tree around a freshly copied store whose root is `TreeNodeId(0)`, placing the
    /// cursor at `cursor_path`.
    fn from_copy(store: ChildVecStore<E>, size: usize, cursor_path: &[usize], traversal: S) -> Self {
        let root = TreeNodeId(0);
        let mut tree = Tree {
            store,
            root,
            size,
            cursor: root,
            traversal,
        };
        let placed = tree.set_pointer_to_absolute_path(cursor_path);
        debug_assert!(placed, "a structural copy resolves every path of its source");
        tree
    }

    pub fn traversal(&self) -> &S {
        &self.traversal
    }

    pub fn store(&self) -> &ChildVecStore<E> {
        &self.store
    }

    /// Number of stored elements.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn root(&self) -> TreeNodeId {
        self.root
    }

    pub fn cursor(&self) -> TreeNodeId {
        self.cursor
    }

    /// Resets to an empty root with the cursor on it.
    pub fn clear(&mut self) {
        debug!("clearing tree of {} elements", self.size);
        self.store = ChildVecStore::new();
        self.root = self.store.add_root(None);
        self.cursor = self.root;
        self.size = 0;
    }

    /// Inserts `element` below the cursor without moving it.
    pub fn insert(&mut self, element: E) -> TreeNodeId {
        self.insert_at_cursor(element, false)
    }

    /// Inserts `element` as the last child of the cursor, moving the cursor onto it when
    /// `move_cursor` is set. An empty tree stores the element in its root instead, and the cursor
    /// stays on the root.
    pub fn insert_at_cursor(&mut self, element: E, move_cursor: bool) -> TreeNodeId {
        self.size += 1;
        if self.store[self.root].is_none() {
            debug!("populating empty root");
            self.store[self.root] = Some(element);
            return self.root;
        }

        let node = self.store.add_child(element, self.cursor);
        debug!("inserted {node} under {}", self.cursor);
        if move_cursor {
            self.cursor = node;
        }
        node
    }

    // --- Pure navigation: handles in, handles out ---

    /// The node one `step` away from `from`, if there is one.
    ///
    /// Handles that are not attached to this tree yield `None`. A handle kept across a removal
    /// may name a newer node once its slot has been reused.
    pub fn step_from(&self, from: TreeNodeId, step: Step) -> Option<TreeNodeId> {
        if !self.store.is_live(from) {
            return None;
        }
        match step {
            Step::Up => self.store.parent(from).node(),
            Step::Down(i) => self.store.child(from, i),
        }
    }

    pub fn resolve_relative(&self, from: TreeNodeId, path: &[Step]) -> Option<TreeNodeId> {
        if !self.store.is_live(from) {
            return None;
        }
        path.iter()
            .try_fold(from, |node, &step| self.step_from(node, step))
    }

    pub fn resolve_absolute(&self, path: &[usize]) -> Option<TreeNodeId> {
        path.iter()
            .try_fold(self.root, |node, &i| self.store.child(node, i))
    }

    /// Child indices leading from the root to `node`, or `None` if `node` is not attached.
    pub fn absolute_path_to(&self, node: TreeNodeId) -> Option<Vec<usize>> {
        self.store.is_live(node).then(|| self.path_from_root(node))
    }

    fn path_from_root(&self, node: TreeNodeId) -> Vec<usize> {
        let mut path: Vec<usize> = self
            .store
            .iter_ancestors(node)
            .filter_map(|n| self.store.sibling_index(n))
            .collect();
        path.reverse();
        path
    }

    // --- Cursor ---

    fn jump(&mut self, target: Option<TreeNodeId>) -> bool {
        match target {
            Some(node) => {
                trace!("cursor {} -> {node}", self.cursor);
                self.cursor = node;
                true
            }
            None => false,
        }
    }

    /// Moves the cursor one step. Returns `false`, leaving the cursor alone, when there is no
    /// such node.
    pub fn move_pointer(&mut self, step: Step) -> bool {
        self.jump(self.step_from(self.cursor, step))
    }

    pub fn move_pointer_up(&mut self) -> bool {
        self.move_pointer(Step::Up)
    }

    pub fn move_pointer_down(&mut self, index: usize) -> bool {
        self.move_pointer(Step::Down(index))
    }

    /// Moves the cursor to its first child holding `element`.
    pub fn move_pointer_down_to(&mut self, element: &E) -> bool
    where
        E: PartialEq,
    {
        let target = self
            .store
            .iter_children(self.cursor)
            .find(|&c| self.store.data(c) == Some(element));
        self.jump(target)
    }

    pub fn set_pointer_to_root(&mut self) {
        self.jump(Some(self.root));
    }

    /// Follows `path` from the cursor. All or nothing.
    pub fn set_pointer_to_relative_path(&mut self, path: &[Step]) -> bool {
        self.jump(self.resolve_relative(self.cursor, path))
    }

    /// Follows `path` from the root. All or nothing.
    pub fn set_pointer_to_absolute_path(&mut self, path: &[usize]) -> bool {
        self.jump(self.resolve_absolute(path))
    }

    pub fn absolute_path_to_cursor(&self) -> Vec<usize> {
        self.path_from_root(self.cursor)
    }

    /// The element at the cursor; `None` only for an empty tree.
    pub fn get_at_pointer(&self) -> Option<&E> {
        self.store.data(self.cursor)
    }

    /// Replaces the element at the cursor, returning the previous one.
    pub fn set_at_pointer(&mut self, element: E) -> Option<E> {
        let old = self.store.set_node_data(element, self.cursor);
        if old.is_none() {
            self.size += 1;
        }
        old
    }

    pub fn element_at_relative_path(&self, path: &[Step]) -> Option<&E> {
        self.resolve_relative(self.cursor, path)
            .and_then(|node| self.store.data(node))
    }

    pub fn element_at_absolute_path(&self, path: &[usize]) -> Option<&E> {
        self.resolve_absolute(path)
            .and_then(|node| self.store.data(node))
    }

    // --- Removal ---

    /// Splices `node` out of its parent. A cursor inside the removed subtree moves to the parent.
    fn remove_node(&mut self, node: TreeNodeId) -> Result<(), TreeError> {
        let Some(parent) = self.store.parent(node).node() else {
            warn!("refusing to remove the root");
            return Err(TreeError::RootRemoval);
        };
        if self.store.is_in_subtree(node, self.cursor) {
            self.cursor = parent;
        }
        if let Some(released) = self.store.detach(node) {
            debug!("removed {node} under {parent}, releasing {released} elements");
            self.size -= released;
        }
        Ok(())
    }

    /// Removes the node at `path` from the cursor, with its subtree.
    ///
    /// Returns `Ok(false)` if the path does not resolve.
    pub fn remove_node_at_relative_path(&mut self, path: &[Step]) -> Result<bool, TreeError> {
        match self.resolve_relative(self.cursor, path) {
            Some(node) => self.remove_node(node).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn remove_node_at_absolute_path(&mut self, path: &[usize]) -> Result<bool, TreeError> {
        match self.resolve_absolute(path) {
            Some(node) => self.remove_node(node).map(|()| true),
            None => Ok(false),
        }
    }

    /// Pre-order `(element, child count)` pairs, which pin down both shape and contents.
    fn shape(&self) -> Vec<(Option<&E>, usize)> {
        self.store
            .iter_preorder(self.root)
            .map(|n| (self.store.data(n), self.store.children(n).len()))
            .collect()
    }

    /// Checks the arena links, the single root, the cursor, and the element count.
    pub fn validate(&self) -> Result<(), TreeError> {
        let roots = self.store.validate()?;
        if roots != [self.root] {
            return Err(TreeError::RootCount(roots.len()));
        }
        if !self.store.is_live(self.cursor) {
            return Err(TreeError::InvalidNodeId(self.cursor));
        }
        let counted = self
            .store
            .iter_preorder(self.root)
            .filter(|&n| self.store[n].is_some())
            .count();
        if counted != self.size {
            return Err(TreeError::SizeMismatch {
                recorded: self.size,
                counted,
            });
        }
        Ok(())
    }
}

/// Prepends `ups` ascending steps to a downward path.
fn relative_path(ups: usize, down: Vec<usize>) -> Vec<Step> {
    std::iter::repeat(Step::Up)
        .take(ups)
        .chain(down.into_iter().map(Step::Down))
        .collect()
}

/// Operations that walk whole subtrees through the traversal strategy.
impl<E, S: Traversal> Tree<E, S> {
    /// Recounts the stored elements by traversal, independently of [`Tree::size`].
    pub fn count_nodes(&self) -> Result<usize, TreeError> {
        self.traversal.count(&self.store, self.root)
    }

    /// Number of elements strictly below the cursor.
    pub fn size_under_cursor(&self) -> Result<usize, TreeError> {
        let count = self.traversal.count(&self.store, self.cursor)?;
        Ok(count - usize::from(self.store[self.cursor].is_some()))
    }
}

impl<E: PartialEq, S: Traversal> Tree<E, S> {
    pub fn contains(&self, element: &E) -> Result<bool, TreeError> {
        self.traversal.contains(&self.store, self.root, element)
    }

    /// Path from the root to the first occurrence of `element` in pre-order.
    pub fn absolute_path_to_element(&self, element: &E) -> Result<Option<Vec<usize>>, TreeError> {
        let found = self.traversal.find(&self.store, self.root, element, None)?;
        Ok(found.map(|(_, path)| path))
    }

    /// Paths from the root to every occurrence of `element`, in pre-order.
    pub fn absolute_paths_to_element(&self, element: &E) -> Result<Vec<Vec<usize>>, TreeError> {
        self.traversal.find_all(&self.store, self.root, element, None)
    }

    /// Path from the cursor to the nearest occurrence of `element`.
    ///
    /// The cursor's own subtree is searched first; after that each ancestor is searched,
    /// skipping the branch the search just came up from.
    pub fn relative_path_to_element(&self, element: &E) -> Result<Option<Vec<Step>>, TreeError> {
        let mut origin = self.cursor;
        let mut skip = None;
        let mut ups = 0;
        loop {
            if let Some((_, down)) = self.traversal.find(&self.store, origin, element, skip)? {
                return Ok(Some(relative_path(ups, down)));
            }
            let Some(parent) = self.store.parent(origin).node() else {
                return Ok(None);
            };
            skip = self.store.sibling_index(origin);
            origin = parent;
            ups += 1;
        }
    }

    /// Paths from the cursor to every occurrence of `element`: first those below the cursor,
    /// then those reached through each ancestor in turn.
    pub fn relative_paths_to_element(&self, element: &E) -> Result<Vec<Vec<Step>>, TreeError> {
        let mut paths = Vec::new();
        let mut origin = self.cursor;
        let mut skip = None;
        let mut ups = 0;
        loop {
            let found = self.traversal.find_all(&self.store, origin, element, skip)?;
            paths.extend(found.into_iter().map(|down| relative_path(ups, down)));

            let Some(parent) = self.store.parent(origin).node() else {
                return Ok(paths);
            };
            skip = self.store.sibling_index(origin);
            origin = parent;
            ups += 1;
        }
    }

    /// Removes the first node holding `element` in pre-order, with its subtree.
    ///
    /// Returns `Ok(false)` if there is none and [`TreeError::RootRemoval`] if it is the root.
    pub fn remove(&mut self, element: &E) -> Result<bool, TreeError> {
        match self.traversal.find(&self.store, self.root, element, None)? {
            Some((node, _)) => self.remove_node(node).map(|()| true),
            None => Ok(false),
        }
    }
}

impl<E: Clone, S: Traversal> Tree<E, S> {
    /// Every element in pre-order. The length always equals [`Tree::size`].
    pub fn to_list(&self) -> Result<Vec<E>, TreeError> {
        let nodes = self.traversal.preorder(&self.store, self.root)?;
        let mut list = Vec::with_capacity(self.size);
        list.extend(nodes.into_iter().filter_map(|n| self.store.data(n).cloned()));
        Ok(list)
    }

    pub fn to_array(&self) -> Result<Box<[E]>, TreeError> {
        self.to_list().map(Vec::into_boxed_slice)
    }

    /// Attaches a deep copy of `other` as the last child of the cursor.
    ///
    /// An empty `other` changes nothing. When this tree is empty it becomes a copy of `other`
    /// with the cursor on the root.
    pub fn add_tree<T>(&mut self, other: &Tree<E, T>) -> Result<(), TreeError> {
        if other.is_empty() {
            return Ok(());
        }
        let copy = self.traversal.copy_subtree(&other.store, other.root)?;
        let copy_root = TreeNodeId(0);

        if self.is_empty() {
            debug!("adopting a copy of {} elements as the whole tree", other.size);
            self.store = copy;
            self.root = copy_root;
            self.cursor = copy_root;
        } else {
            let grafted = self.store.graft(copy, copy_root, self.cursor);
            debug!("grafted {} elements at {grafted}", other.size);
        }
        self.size += other.size;
        Ok(())
    }
}

impl<E: Clone, S: Traversal + Clone> Tree<E, S> {
    /// Deep copy with the cursor at the same path.
    pub fn make_copy_of_tree(&self) -> Result<Self, TreeError> {
        let store = self.traversal.copy_subtree(&self.store, self.root)?;
        debug!("copied tree of {} elements", self.size);
        Ok(Self::from_copy(
            store,
            self.size,
            &self.absolute_path_to_cursor(),
            self.traversal.clone(),
        ))
    }

    /// A standalone deep copy of the cursor's subtree, with the cursor on its root.
    pub fn copy_subtree_at_cursor(&self) -> Result<Self, TreeError> {
        let store = self.traversal.copy_subtree(&self.store, self.cursor)?;
        let size = store.n_nodes() - usize::from(store[TreeNodeId(0)].is_none());
        Ok(Self::from_copy(store, size, &[], self.traversal.clone()))
    }
}

/// Cloning always copies with [`Iterative`], so it cannot fail on deep trees.
impl<E: Clone, S: Clone> Clone for Tree<E, S> {
    fn clone(&self) -> Self {
        Self::from_copy(
            Iterative::copy(&self.store, self.root),
            self.size,
            &self.absolute_path_to_cursor(),
            self.traversal.clone(),
        )
    }
}

/// Structural and element equality. The cursor and the strategy are ignored.
impl<E: PartialEq, S, T> PartialEq<Tree<E, T>> for Tree<E, S> {
    fn eq(&self, other: &Tree<E, T>) -> bool {
        self.size == other.size && self.shape() == other.shape()
    }
}

impl<E: Display, S: Traversal> Display for Tree<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.traversal.draw(&self.store, self.root) {
            Ok(drawing) => f.write_str(&drawing),
            Err(err) => write!(f, "Tree: size: {} {err}", self.size),
        }
    }
}
