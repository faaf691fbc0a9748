use std::fmt::Display;

use super::{child_prefix, draw_line, matches, Found, Traversal};
use crate::tree::{child_vec::ChildVecStore, TreeError, TreeNodeId};

/// Explicit-stack traversal. Never fails on depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Iterative;

/// One pending node of a path-tracking search.
struct SearchFrame {
    node: TreeNodeId,
    /// Length of the path from the start node to `node`.
    depth: usize,
    /// Index of `node` among its parent's children; `None` for the start node.
    step: Option<usize>,
}

/// One pending node of a drawing.
struct DrawFrame {
    node: TreeNodeId,
    prefix: String,
    is_start: bool,
    is_last: bool,
}

impl Iterative {
    /// Walks the subtree at `from` in pre-order, keeping `path` equal to the path from `from`
    /// to the visited node. Stops as soon as `visit` returns `true`.
    fn search<V>(
        store: &ChildVecStore<V>,
        from: TreeNodeId,
        skip: Option<usize>,
        mut visit: impl FnMut(TreeNodeId, &[usize]) -> bool,
    ) {
        let mut path = Vec::new();
        let mut stack = vec![SearchFrame {
            node: from,
            depth: 0,
            step: None,
        }];

        while let Some(SearchFrame { node, depth, step }) = stack.pop() {
            if let Some(i) = step {
                path.truncate(depth - 1);
                path.push(i);
            }
            if visit(node, &path) {
                return;
            }

            let skip = if depth == 0 { skip } else { None };
            for (i, &child) in store.children(node).iter().enumerate().rev() {
                if Some(i) != skip {
                    stack.push(SearchFrame {
                        node: child,
                        depth: depth + 1,
                        step: Some(i),
                    });
                }
            }
        }
    }

    /// The infallible core of [`Traversal::copy_subtree`].
    pub(crate) fn copy<V: Clone>(store: &ChildVecStore<V>, from: TreeNodeId) -> ChildVecStore<V> {
        let mut copy = ChildVecStore::new();
        let root = copy.add_root(store[from].clone());

        // (source node, parent of its copy)
        let mut stack: Vec<(TreeNodeId, TreeNodeId)> = store
            .children(from)
            .iter()
            .rev()
            .map(|&c| (c, root))
            .collect();

        while let Some((source, parent)) = stack.pop() {
            let copied = copy.push_child(store[source].clone(), parent);
            stack.extend(store.children(source).iter().rev().map(|&c| (c, copied)));
        }
        copy
    }
}

impl Traversal for Iterative {
    fn find<V: PartialEq>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
        element: &V,
        skip: Option<usize>,
    ) -> Result<Option<Found>, TreeError> {
        let mut found = None;
        Self::search(store, from, skip, |node, path| {
            if matches(store, node, element) {
                found = Some((node, path.to_vec()));
                true
            } else {
                false
            }
        });
        Ok(found)
    }

    fn find_all<V: PartialEq>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
        element: &V,
        skip: Option<usize>,
    ) -> Result<Vec<Vec<usize>>, TreeError> {
        let mut paths = Vec::new();
        Self::search(store, from, skip, |node, path| {
            if matches(store, node, element) {
                paths.push(path.to_vec());
            }
            false
        });
        Ok(paths)
    }

    fn contains<V: PartialEq>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
        element: &V,
    ) -> Result<bool, TreeError> {
        Ok(store
            .iter_preorder(from)
            .any(|node| matches(store, node, element)))
    }

    fn preorder<V>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
    ) -> Result<Vec<TreeNodeId>, TreeError> {
        Ok(store.iter_preorder(from).collect())
    }

    fn count<V>(&self, store: &ChildVecStore<V>, from: TreeNodeId) -> Result<usize, TreeError> {
        Ok(store
            .iter_preorder(from)
            .filter(|&node| store[node].is_some())
            .count())
    }

    fn copy_subtree<V: Clone>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
    ) -> Result<ChildVecStore<V>, TreeError> {
        Ok(Self::copy(store, from))
    }

    fn draw<V: Display>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
    ) -> Result<String, TreeError> {
        let mut out = String::new();
        let mut stack = vec![DrawFrame {
            node: from,
            prefix: String::new(),
            is_start: true,
            is_last: true,
        }];

        while let Some(frame) = stack.pop() {
            draw_line(
                &mut out,
                store.data(frame.node),
                &frame.prefix,
                frame.is_start,
                frame.is_last,
            )?;

            let prefix = child_prefix(&frame.prefix, frame.is_last);
            let children = store.children(frame.node);
            for (i, &child) in children.iter().enumerate().rev() {
                stack.push(DrawFrame {
                    node: child,
                    prefix: prefix.clone(),
                    is_start: false,
                    is_last: i + 1 == children.len(),
                });
            }
        }
        Ok(out)
    }
}
