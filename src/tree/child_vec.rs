use bitvec::vec::BitVec;
use itertools::Itertools;

use super::{
    iterato::{AncestorsIter, PreorderIter},
    parent_pointer::{PPNode, ParentId},
    TreeError, TreeNodeId,
};

/// A node in the ChildVecStore. It contains a PPNode plus an ordered vector of children.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CVNode<V> {
    pub parent_pointer: PPNode<V>,
    pub children: Vec<TreeNodeId>,
}

impl<V> CVNode<V> {
    pub fn shift(&mut self, by: usize) {
        self.parent_pointer.shift(by);
        for c in &mut self.children {
            c.0 += by;
        }
    }

    fn vacant() -> Self {
        CVNode {
            parent_pointer: PPNode::root(None),
            children: Vec::new(),
        }
    }
}

/// Arena of nodes addressed by [`TreeNodeId`].
///
/// Slots freed by [`ChildVecStore::detach`] are recycled by later insertions, so a handle is only
/// meaningful while the node it names is still attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildVecStore<V> {
    pub(crate) nodes: Vec<CVNode<V>>,
    /// Bit `i` is set iff slot `i` holds an attached node.
    live: BitVec,
    free: Vec<TreeNodeId>,
}

impl<V> Default for ChildVecStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

//
// Indexing: `store[&id]` is the parent link, `store[id]` the element.
//
impl<V> std::ops::Index<&TreeNodeId> for ChildVecStore<V> {
    type Output = ParentId;
    fn index(&self, index: &TreeNodeId) -> &Self::Output {
        &self.nodes[index.0].parent_pointer.parent
    }
}

impl<V> std::ops::Index<TreeNodeId> for ChildVecStore<V> {
    type Output = Option<V>;
    fn index(&self, index: TreeNodeId) -> &Self::Output {
        &self.nodes[index.0].parent_pointer.data
    }
}

impl<V> std::ops::IndexMut<TreeNodeId> for ChildVecStore<V> {
    fn index_mut(&mut self, index: TreeNodeId) -> &mut Self::Output {
        &mut self.nodes[index.0].parent_pointer.data
    }
}

impl<V> ChildVecStore<V> {
    pub fn new() -> Self {
        ChildVecStore {
            nodes: Vec::new(),
            live: BitVec::new(),
            free: Vec::new(),
        }
    }

    fn alloc(&mut self, node: CVNode<V>) -> TreeNodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = node;
            self.live.set(id.0, true);
            id
        } else {
            let id = TreeNodeId(self.nodes.len());
            self.nodes.push(node);
            self.live.push(true);
            id
        }
    }

    /// Adds a parentless node. `data` is `None` only for the root of an empty tree.
    pub fn add_root(&mut self, data: Option<V>) -> TreeNodeId {
        self.alloc(CVNode {
            parent_pointer: PPNode::root(data),
            children: Vec::new(),
        })
    }

    /// Adds a new node as the *last* child of `parent`.
    pub fn add_child(&mut self, data: V, parent: TreeNodeId) -> TreeNodeId {
        self.push_child(Some(data), parent)
    }

    pub(crate) fn push_child(&mut self, data: Option<V>, parent: TreeNodeId) -> TreeNodeId {
        let node_id = self.alloc(CVNode {
            parent_pointer: PPNode::child(data, parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(node_id);
        node_id
    }

    /// Number of attached nodes, including an empty root.
    pub fn n_nodes(&self) -> usize {
        self.live.count_ones()
    }

    pub fn is_live(&self, node_id: TreeNodeId) -> bool {
        node_id.0 < self.live.len() && self.live[node_id.0]
    }

    pub fn parent(&self, node_id: TreeNodeId) -> ParentId {
        self[&node_id]
    }

    pub fn children(&self, node_id: TreeNodeId) -> &[TreeNodeId] {
        &self.nodes[node_id.0].children
    }

    pub fn child(&self, node_id: TreeNodeId, index: usize) -> Option<TreeNodeId> {
        self.children(node_id).get(index).copied()
    }

    pub fn iter_children(&self, node_id: TreeNodeId) -> impl Iterator<Item = TreeNodeId> + '_ {
        self.children(node_id).iter().copied()
    }

    /// Position of `node_id` among its parent's children; `None` for a root.
    pub fn sibling_index(&self, node_id: TreeNodeId) -> Option<usize> {
        let parent = self.parent(node_id).node()?;
        self.children(parent)
            .iter()
            .find_position(|c| **c == node_id)
            .map(|(pos, _)| pos)
    }

    pub fn data(&self, node_id: TreeNodeId) -> Option<&V> {
        self[node_id].as_ref()
    }

    pub fn set_node_data(&mut self, data: V, node_id: TreeNodeId) -> Option<V> {
        self[node_id].replace(data)
    }

    pub fn iter_preorder(&self, start: TreeNodeId) -> PreorderIter<'_, V> {
        PreorderIter::new(self, start)
    }

    pub fn iter_ancestors(&self, start: TreeNodeId) -> AncestorsIter<'_, V> {
        AncestorsIter::new(self, start)
    }

    /// Whether `node_id` lies in the subtree rooted at `ancestor` (itself included).
    pub fn is_in_subtree(&self, ancestor: TreeNodeId, node_id: TreeNodeId) -> bool {
        self.iter_ancestors(node_id).any(|a| a == ancestor)
    }

    /// Number of strict descendants of `node_id`.
    pub fn size_under(&self, node_id: TreeNodeId) -> usize {
        self.iter_preorder(node_id).count() - 1
    }

    /// Splices `node_id` out of its parent's children and releases its whole subtree.
    ///
    /// Returns the number of elements released, or `None` if `node_id` is a root.
    pub fn detach(&mut self, node_id: TreeNodeId) -> Option<usize> {
        let parent = self.parent(node_id).node()?;
        let pos = self.sibling_index(node_id)?;
        self.nodes[parent.0].children.remove(pos);

        let doomed: Vec<_> = self.iter_preorder(node_id).collect();
        let mut released = 0;
        for id in doomed {
            let node = std::mem::replace(&mut self.nodes[id.0], CVNode::vacant());
            if node.parent_pointer.data.is_some() {
                released += 1;
            }
            self.live.set(id.0, false);
            self.free.push(id);
        }
        Some(released)
    }

    /// Appends every node of `other` to this store, making `other_root` the last child of
    /// `parent`. Returns the new handle of `other_root`.
    pub fn graft(
        &mut self,
        other: ChildVecStore<V>,
        other_root: TreeNodeId,
        parent: TreeNodeId,
    ) -> TreeNodeId {
        let by = self.nodes.len();
        self.nodes.extend(other.nodes.into_iter().map(|mut n| {
            n.shift(by);
            n
        }));
        self.live.extend(other.live.iter().by_vals());
        self.free
            .extend(other.free.into_iter().map(|f| TreeNodeId(f.0 + by)));

        let new_root = TreeNodeId(other_root.0 + by);
        self.nodes[new_root.0].parent_pointer.parent = ParentId::Node(parent);
        self.nodes[parent.0].children.push(new_root);
        new_root
    }

    /// Checks that parent and child links agree and that every attached node hangs below a root.
    ///
    /// Returns the roots in slot order.
    pub fn validate(&self) -> Result<Vec<TreeNodeId>, TreeError> {
        let mut roots = vec![];
        let mut seen: BitVec = BitVec::repeat(false, self.nodes.len());

        for id in self.live.iter_ones().map(TreeNodeId) {
            match self.parent(id) {
                ParentId::Root => roots.push(id),
                ParentId::Node(p) => {
                    if !self.is_live(p) {
                        return Err(TreeError::InvalidNodeId(p));
                    }
                    if self.children(p).iter().filter(|c| **c == id).count() != 1 {
                        return Err(TreeError::WrongParent(id));
                    }
                }
            }
        }

        for &root in &roots {
            let mut stack = vec![root];
            while let Some(current) = stack.pop() {
                if seen[current.0] {
                    return Err(TreeError::Cyclic);
                }
                seen.set(current.0, true);
                for &c in self.children(current).iter().rev() {
                    if !self.is_live(c) {
                        return Err(TreeError::InvalidNodeId(c));
                    }
                    if self.parent(c) != ParentId::Node(current) {
                        return Err(TreeError::WrongParent(c));
                    }
                    stack.push(c);
                }
            }
        }

        // Anything attached but unreachable from a root must sit on a parent cycle.
        if seen.count_ones() != self.n_nodes() {
            return Err(TreeError::Cyclic);
        }

        Ok(roots)
    }
}
