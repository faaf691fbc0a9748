//! Helper iterators over a [`ChildVecStore`].
//!
//! Both keep their state on the heap, so they walk arbitrarily deep trees.

use super::{child_vec::ChildVecStore, ParentId, TreeNodeId};

// --- Ancestors Iterator ---

/// An iterator that traverses upwards from a starting node to its root (inclusive).
#[derive(Clone)]
pub struct AncestorsIter<'a, V> {
    store: &'a ChildVecStore<V>,
    /// The next node ID to yield. `None` once the root has been yielded.
    current: Option<TreeNodeId>,
}

impl<'a, V> AncestorsIter<'a, V> {
    pub fn new(store: &'a ChildVecStore<V>, start_node: TreeNodeId) -> Self {
        AncestorsIter {
            store,
            current: Some(start_node),
        }
    }
}

impl<V> Iterator for AncestorsIter<'_, V> {
    type Item = TreeNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node_to_return = self.current?;
        self.current = match self.store[&node_to_return] {
            ParentId::Root => None,
            ParentId::Node(parent_id) => Some(parent_id),
        };
        Some(node_to_return)
    }
}

// --- Preorder Iterator ---

/// A pre-order DFS iterator state.
pub struct PreorderIter<'a, V> {
    store: &'a ChildVecStore<V>,
    /// Nodes still to visit, next one on top.
    stack: Vec<TreeNodeId>,
}

impl<V> Clone for PreorderIter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            stack: self.stack.clone(),
        }
    }
}

impl<'a, V> PreorderIter<'a, V> {
    /// Create a new pre-order iterator starting at `start`.
    pub fn new(store: &'a ChildVecStore<V>, start: TreeNodeId) -> Self {
        PreorderIter {
            store,
            stack: vec![start],
        }
    }
}

impl<V> Iterator for PreorderIter<'_, V> {
    type Item = TreeNodeId;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Reversed so the first child is popped next.
        self.stack
            .extend(self.store.children(node).iter().rev().copied());

        Some(node)
    }
}
