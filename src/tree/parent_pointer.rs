use super::TreeNodeId;

/// The upward half of a node: its parent link and the element it carries.
///
/// The element is optional only so that an empty tree can own a root before anything has been
/// inserted. Every other node is created with an element.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PPNode<V> {
    pub(crate) parent: ParentId,
    pub(crate) data: Option<V>,
}

impl<V> PPNode<V> {
    pub fn child(data: Option<V>, parent: TreeNodeId) -> Self {
        PPNode {
            parent: ParentId::Node(parent),
            data,
        }
    }

    pub fn root(data: Option<V>) -> Self {
        PPNode {
            parent: ParentId::Root,
            data,
        }
    }

    /// Moves every handle stored in this node forward by `by` slots.
    pub fn shift(&mut self, by: usize) {
        if let ParentId::Node(p) = &mut self.parent {
            p.0 += by;
        }
    }
}

#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParentId {
    Root,
    Node(TreeNodeId),
}

impl ParentId {
    pub fn is_root(&self) -> bool {
        match self {
            ParentId::Root => true,
            ParentId::Node(_) => false,
        }
    }

    pub fn is_node(&self) -> bool {
        !self.is_root()
    }

    pub fn node(&self) -> Option<TreeNodeId> {
        match self {
            ParentId::Root => None,
            ParentId::Node(n) => Some(*n),
        }
    }
}
