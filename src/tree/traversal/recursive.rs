use std::fmt::Display;

use log::warn;

use super::{child_prefix, draw_line, matches, Found, Traversal};
use crate::tree::{child_vec::ChildVecStore, TreeError, TreeNodeId};

/// Call-stack recursion with a depth budget.
///
/// A node `d` levels below the start node is only visited while `d <= max_depth`; anything
/// deeper aborts the whole operation with [`TreeError::DepthExhausted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Recursive {
    max_depth: usize,
}

impl Default for Recursive {
    fn default() -> Self {
        Recursive {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

impl Recursive {
    /// Comfortably below what a 2 MiB thread stack holds in an unoptimised build.
    pub const DEFAULT_MAX_DEPTH: usize = 1024;

    pub fn with_max_depth(max_depth: usize) -> Self {
        Recursive { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn descend(&self, depth: usize) -> Result<usize, TreeError> {
        let next = depth + 1;
        if next > self.max_depth {
            warn!(
                "recursive traversal gave up at depth {next} (limit {})",
                self.max_depth
            );
            return Err(TreeError::DepthExhausted {
                limit: self.max_depth,
            });
        }
        Ok(next)
    }

    fn find_from<V: PartialEq>(
        &self,
        store: &ChildVecStore<V>,
        node: TreeNodeId,
        element: &V,
        skip: Option<usize>,
        depth: usize,
        path: &mut Vec<usize>,
    ) -> Result<Option<TreeNodeId>, TreeError> {
        if matches(store, node, element) {
            return Ok(Some(node));
        }
        for (i, &child) in store.children(node).iter().enumerate() {
            if Some(i) == skip {
                continue;
            }
            let depth = self.descend(depth)?;
            path.push(i);
            if let Some(found) = self.find_from(store, child, element, None, depth, path)? {
                return Ok(Some(found));
            }
            path.pop();
        }
        Ok(None)
    }

    #[allow(clippy::too_many_arguments)]
    fn find_all_from<V: PartialEq>(
        &self,
        store: &ChildVecStore<V>,
        node: TreeNodeId,
        element: &V,
        skip: Option<usize>,
        depth: usize,
        path: &mut Vec<usize>,
        paths: &mut Vec<Vec<usize>>,
    ) -> Result<(), TreeError> {
        if matches(store, node, element) {
            paths.push(path.clone());
        }
        for (i, &child) in store.children(node).iter().enumerate() {
            if Some(i) == skip {
                continue;
            }
            let depth = self.descend(depth)?;
            path.push(i);
            self.find_all_from(store, child, element, None, depth, path, paths)?;
            path.pop();
        }
        Ok(())
    }

    fn contains_from<V: PartialEq>(
        &self,
        store: &ChildVecStore<V>,
        node: TreeNodeId,
        element: &V,
        depth: usize,
    ) -> Result<bool, TreeError> {
        if matches(store, node, element) {
            return Ok(true);
        }
        for &child in store.children(node) {
            let depth = self.descend(depth)?;
            if self.contains_from(store, child, element, depth)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn preorder_from<V>(
        &self,
        store: &ChildVecStore<V>,
        node: TreeNodeId,
        depth: usize,
        out: &mut Vec<TreeNodeId>,
    ) -> Result<(), TreeError> {
        out.push(node);
        for &child in store.children(node) {
            let depth = self.descend(depth)?;
            self.preorder_from(store, child, depth, out)?;
        }
        Ok(())
    }

    fn count_from<V>(
        &self,
        store: &ChildVecStore<V>,
        node: TreeNodeId,
        depth: usize,
    ) -> Result<usize, TreeError> {
        let mut count = usize::from(store[node].is_some());
        for &child in store.children(node) {
            let depth = self.descend(depth)?;
            count += self.count_from(store, child, depth)?;
        }
        Ok(count)
    }

    fn copy_from<V: Clone>(
        &self,
        store: &ChildVecStore<V>,
        source: TreeNodeId,
        copy: &mut ChildVecStore<V>,
        parent: TreeNodeId,
        depth: usize,
    ) -> Result<(), TreeError> {
        for &child in store.children(source) {
            let depth = self.descend(depth)?;
            let copied = copy.push_child(store[child].clone(), parent);
            self.copy_from(store, child, copy, copied, depth)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_from<V: Display>(
        &self,
        store: &ChildVecStore<V>,
        node: TreeNodeId,
        prefix: &str,
        is_start: bool,
        is_last: bool,
        depth: usize,
        out: &mut String,
    ) -> Result<(), TreeError> {
        draw_line(out, store.data(node), prefix, is_start, is_last)?;

        let prefix = child_prefix(prefix, is_last);
        let children = store.children(node);
        for (i, &child) in children.iter().enumerate() {
            let depth = self.descend(depth)?;
            let is_last = i + 1 == children.len();
            self.draw_from(store, child, &prefix, false, is_last, depth, out)?;
        }
        Ok(())
    }
}

impl Traversal for Recursive {
    fn find<V: PartialEq>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
        element: &V,
        skip: Option<usize>,
    ) -> Result<Option<Found>, TreeError> {
        let mut path = Vec::new();
        let found = self.find_from(store, from, element, skip, 0, &mut path)?;
        Ok(found.map(|node| (node, path)))
    }

    fn find_all<V: PartialEq>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
        element: &V,
        skip: Option<usize>,
    ) -> Result<Vec<Vec<usize>>, TreeError> {
        let mut paths = Vec::new();
        self.find_all_from(store, from, element, skip, 0, &mut Vec::new(), &mut paths)?;
        Ok(paths)
    }

    fn contains<V: PartialEq>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
        element: &V,
    ) -> Result<bool, TreeError> {
        self.contains_from(store, from, element, 0)
    }

    fn preorder<V>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
    ) -> Result<Vec<TreeNodeId>, TreeError> {
        let mut out = Vec::new();
        self.preorder_from(store, from, 0, &mut out)?;
        Ok(out)
    }

    fn count<V>(&self, store: &ChildVecStore<V>, from: TreeNodeId) -> Result<usize, TreeError> {
        self.count_from(store, from, 0)
    }

    fn copy_subtree<V: Clone>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
    ) -> Result<ChildVecStore<V>, TreeError> {
        let mut copy = ChildVecStore::new();
        let root = copy.add_root(store[from].clone());
        self.copy_from(store, from, &mut copy, root, 0)?;
        Ok(copy)
    }

    fn draw<V: Display>(
        &self,
        store: &ChildVecStore<V>,
        from: TreeNodeId,
    ) -> Result<String, TreeError> {
        let mut out = String::new();
        self.draw_from(store, from, "", true, true, 0, &mut out)?;
        Ok(out)
    }
}
