//! # Cursortree
//!
//! Cursortree is an in-memory tree container for arbitrary elements, navigated with a single
//! cursor. Elements can be inserted below the cursor, located by absolute paths (child indices
//! from the root) or relative paths (steps from the cursor that may climb towards the root),
//! searched for, removed with their subtrees, flattened in pre-order, deep-copied and drawn.
//!
//! Whole-subtree algorithms come in two flavours, selected by the tree's traversal strategy:
//! an explicit-stack [`Iterative`] walk that handles arbitrarily deep trees, and a call-stack
//! [`Recursive`] walk that refuses to go past a depth budget instead of overflowing.
//!
//! ```
//! use cursortree::{Step, Tree};
//!
//! let mut tree: Tree<&str> = Tree::new();
//! tree.insert("A");
//! tree.insert_at_cursor("B", true);
//! tree.insert("D");
//! tree.move_pointer_up();
//! tree.insert("C");
//!
//! assert_eq!(tree.to_list().unwrap(), ["A", "B", "D", "C"]);
//! assert_eq!(tree.absolute_path_to_element(&"D").unwrap(), Some(vec![0, 0]));
//!
//! tree.set_pointer_to_absolute_path(&[0, 0]);
//! assert_eq!(
//!     tree.relative_path_to_element(&"C").unwrap(),
//!     Some(vec![Step::Up, Step::Up, Step::Down(1)])
//! );
//! ```

pub mod tree;

pub use tree::{
    traversal::{Iterative, Recursive, Traversal},
    Step, Tree, TreeError, TreeNodeId,
};
