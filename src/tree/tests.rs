use insta::assert_snapshot;

use super::{traversal::Recursive, Step, Tree, TreeError};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// ```text
/// A
///     ├── B
///     │   └── D
///     └── C
/// ```
/// with the cursor on the root.
fn abdc() -> Tree<&'static str> {
    let mut tree = Tree::new();
    tree.insert("A");
    tree.insert_at_cursor("B", true);
    tree.insert("D");
    tree.move_pointer_up();
    tree.insert("C");
    tree
}

/// ```text
/// A
///     ├── B
///     │   ├── D
///     │   └── X
///     └── C
///         └── X
/// ```
/// with the cursor on `D`.
fn with_duplicates() -> Tree<&'static str> {
    let mut tree = abdc();
    tree.set_pointer_to_absolute_path(&[1]);
    tree.insert("X");
    tree.set_pointer_to_absolute_path(&[0]);
    tree.insert("X");
    tree.move_pointer_down_to(&"D");
    tree
}

#[test]
fn empty_tree() {
    let tree: Tree<char> = Tree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.size(), 0);
    assert_eq!(tree.get_at_pointer(), None);
    assert_eq!(tree.to_list(), Ok(vec![]));
    assert_eq!(tree.contains(&'a'), Ok(false));
    assert_eq!(tree.absolute_path_to_element(&'a'), Ok(None));
    assert_eq!(tree.relative_paths_to_element(&'a'), Ok(vec![]));
    assert_eq!(tree.absolute_path_to_cursor(), Vec::<usize>::new());
    assert_eq!(tree.to_string(), "");
    assert_eq!(tree.validate(), Ok(()));
}

#[test]
fn first_insert_populates_root() {
    init_logger();
    let mut tree: Tree<char> = Tree::new();
    let root = tree.insert_at_cursor('a', true);
    assert_eq!(root, tree.root());
    assert_eq!(tree.cursor(), tree.root());
    assert_eq!(tree.get_at_pointer(), Some(&'a'));
    assert_eq!(tree.size(), 1);
    assert!(tree.store().children(root).is_empty());
}

#[test]
fn move_cursor_on_insert_nests_the_next_insert() {
    let mut tree: Tree<&str> = Tree::new();
    tree.insert("A");
    tree.insert_at_cursor("B", true);
    tree.insert("C");

    assert_eq!(tree.to_list(), Ok(vec!["A", "B", "C"]));
    assert_eq!(tree.get_at_pointer(), Some(&"B"));
    assert_snapshot!(tree.to_string(), @r"
    A
        └── B
            └── C
    ");
}

#[test]
fn cursor_path_round_trip() {
    let mut tree = abdc();
    assert!(tree.move_pointer_down_to(&"B"));
    assert!(tree.move_pointer_down(0));
    assert_eq!(tree.get_at_pointer(), Some(&"D"));
    assert_eq!(tree.absolute_path_to_cursor(), vec![0, 0]);

    let d = tree.cursor();
    tree.set_pointer_to_root();
    assert_eq!(tree.cursor(), tree.root());
    assert!(tree.set_pointer_to_absolute_path(&[0, 0]));
    assert_eq!(tree.cursor(), d);
}

#[test]
fn failed_moves_leave_cursor_alone() {
    let mut tree = abdc();
    let root = tree.cursor();
    assert!(!tree.move_pointer_up());
    assert!(!tree.move_pointer_down(2));
    assert!(!tree.move_pointer_down_to(&"D"));
    assert_eq!(tree.cursor(), root);

    assert!(tree.move_pointer_down(0));
    let b = tree.cursor();
    assert!(!tree.set_pointer_to_relative_path(&[Step::Down(0), Step::Down(0)]));
    assert!(!tree.set_pointer_to_absolute_path(&[1, 0]));
    assert!(!tree.set_pointer_to_relative_path(&[Step::Up, Step::Up]));
    assert_eq!(tree.cursor(), b);

    assert!(tree.set_pointer_to_relative_path(&[Step::Up, Step::Down(1)]));
    assert_eq!(tree.get_at_pointer(), Some(&"C"));
}

#[test]
fn steps_from_integers() {
    assert_eq!(
        Step::parse_path(&[-1, 0, 3]),
        Ok(vec![Step::Up, Step::Down(0), Step::Down(3)])
    );
    assert_eq!(Step::parse_path(&[0, -2]), Err(TreeError::InvalidStep(-2)));
    assert_eq!(Step::from(4), Step::Down(4));

    let rendered: Vec<String> = [Step::Up, Step::Down(7)].iter().map(Step::to_string).collect();
    assert_eq!(rendered, ["-1", "7"]);
}

#[test]
fn element_lookup_by_path() {
    let mut tree = abdc();
    assert_eq!(tree.element_at_absolute_path(&[]), Some(&"A"));
    assert_eq!(tree.element_at_absolute_path(&[0, 0]), Some(&"D"));
    assert_eq!(tree.element_at_absolute_path(&[0, 1]), None);

    tree.set_pointer_to_absolute_path(&[0, 0]);
    let to_c = Step::parse_path(&[-1, -1, 1]).unwrap();
    assert_eq!(tree.element_at_relative_path(&to_c), Some(&"C"));
    assert_eq!(tree.element_at_relative_path(&[Step::Up; 3]), None);
    assert_eq!(tree.get_at_pointer(), Some(&"D"));
}

#[test]
fn searches_report_paths() {
    let tree = with_duplicates();
    assert_eq!(tree.contains(&"X"), Ok(true));
    assert_eq!(tree.contains(&"Y"), Ok(false));
    assert_eq!(tree.absolute_path_to_element(&"X"), Ok(Some(vec![0, 1])));
    assert_eq!(
        tree.absolute_paths_to_element(&"X"),
        Ok(vec![vec![0, 1], vec![1, 0]])
    );
    assert_eq!(tree.absolute_path_to_element(&"A"), Ok(Some(vec![])));
    assert_eq!(tree.absolute_path_to_element(&"Y"), Ok(None));
}

#[test]
fn relative_searches_climb_from_the_cursor() {
    use Step::{Down, Up};

    let mut tree = with_duplicates();
    assert_eq!(tree.get_at_pointer(), Some(&"D"));
    assert_eq!(tree.relative_path_to_element(&"D"), Ok(Some(vec![])));
    assert_eq!(tree.relative_path_to_element(&"X"), Ok(Some(vec![Up, Down(1)])));
    assert_eq!(
        tree.relative_path_to_element(&"C"),
        Ok(Some(vec![Up, Up, Down(1)]))
    );
    assert_eq!(tree.relative_path_to_element(&"A"), Ok(Some(vec![Up, Up])));
    assert_eq!(tree.relative_path_to_element(&"Y"), Ok(None));
    assert_eq!(
        tree.relative_paths_to_element(&"X"),
        Ok(vec![vec![Up, Down(1)], vec![Up, Up, Down(1), Down(0)]])
    );

    // Matches below the cursor come before those reached by climbing.
    tree.set_pointer_to_root();
    assert_eq!(
        tree.relative_paths_to_element(&"X"),
        Ok(vec![vec![Down(0), Down(1)], vec![Down(1), Down(0)]])
    );
}

#[test]
fn remove_takes_the_whole_subtree() {
    init_logger();
    let mut tree = abdc();
    assert_eq!(tree.remove(&"B"), Ok(true));
    assert_eq!(tree.to_list(), Ok(vec!["A", "C"]));
    assert_eq!(tree.size(), 2);
    assert_eq!(tree.contains(&"D"), Ok(false));
    assert_eq!(tree.remove(&"B"), Ok(false));
    assert_eq!(tree.validate(), Ok(()));
}

#[test]
fn remove_takes_one_occurrence_at_a_time() {
    let mut tree = with_duplicates();
    assert_eq!(tree.remove(&"X"), Ok(true));
    assert_eq!(tree.contains(&"X"), Ok(true));
    assert_eq!(tree.absolute_paths_to_element(&"X"), Ok(vec![vec![1, 0]]));

    assert_eq!(tree.remove(&"X"), Ok(true));
    assert_eq!(tree.contains(&"X"), Ok(false));
    assert_eq!(tree.remove(&"X"), Ok(false));
    assert_eq!(tree.size(), 4);
}

#[test]
fn handles_to_removed_or_foreign_nodes_resolve_to_nothing() {
    let mut tree = abdc();
    let d = tree.resolve_absolute(&[0, 0]).unwrap();
    assert_eq!(tree.absolute_path_to(d), Some(vec![0, 0]));

    assert_eq!(tree.remove(&"B"), Ok(true));
    assert_eq!(tree.absolute_path_to(d), None);
    assert_eq!(tree.step_from(d, Step::Up), None);
    assert_eq!(tree.resolve_relative(d, &[]), None);
    assert_eq!(tree.absolute_path_to(tree.root()), Some(vec![]));

    let empty: Tree<&str> = Tree::new();
    let foreign = tree.resolve_absolute(&[0]).unwrap();
    assert_eq!(empty.step_from(foreign, Step::Up), None);
    assert_eq!(empty.step_from(foreign, Step::Down(0)), None);
    assert_eq!(empty.resolve_relative(foreign, &[Step::Up]), None);
    assert_eq!(empty.absolute_path_to(foreign), None);
}

#[test]
fn removing_the_root_is_an_error() {
    let mut tree = abdc();
    let before = tree.clone();
    assert_eq!(tree.remove(&"A"), Err(TreeError::RootRemoval));
    assert_eq!(tree.remove_node_at_absolute_path(&[]), Err(TreeError::RootRemoval));
    assert_eq!(tree.remove_node_at_relative_path(&[]), Err(TreeError::RootRemoval));
    assert!(tree == before);
    assert_eq!(tree.size(), 4);
}

#[test]
fn removal_relocates_a_cursor_inside_the_subtree() {
    let mut tree = abdc();
    tree.set_pointer_to_absolute_path(&[0, 0]);

    assert_eq!(tree.remove_node_at_relative_path(&[Step::Up]), Ok(true));
    assert_eq!(tree.get_at_pointer(), Some(&"A"));
    assert_eq!(tree.size(), 2);

    assert_eq!(tree.remove_node_at_absolute_path(&[3]), Ok(false));
    assert_eq!(tree.remove_node_at_absolute_path(&[0]), Ok(true));
    assert_eq!(tree.to_list(), Ok(vec!["A"]));
    assert_eq!(tree.validate(), Ok(()));
}

#[test]
fn removal_outside_the_subtree_keeps_the_cursor() {
    let mut tree = abdc();
    tree.set_pointer_to_absolute_path(&[1]);
    let c = tree.cursor();
    assert_eq!(tree.remove(&"D"), Ok(true));
    assert_eq!(tree.cursor(), c);

    // Freed slots are reused by later inserts.
    tree.insert("E");
    assert_eq!(tree.absolute_path_to_element(&"E"), Ok(Some(vec![1, 0])));
    assert_eq!(tree.store().n_nodes(), 4);
    assert_eq!(tree.validate(), Ok(()));
}

#[test]
fn flattening_is_preorder() {
    let tree = with_duplicates();
    assert_eq!(tree.to_list(), Ok(vec!["A", "B", "D", "X", "C", "X"]));
    assert_eq!(tree.to_array().unwrap().len(), tree.size());
    assert_eq!(tree.count_nodes(), Ok(6));
}

#[test]
fn size_under_cursor_counts_descendants() {
    let mut tree = with_duplicates();
    assert_eq!(tree.size_under_cursor(), Ok(0));
    tree.move_pointer_up();
    assert_eq!(tree.size_under_cursor(), Ok(2));
    tree.set_pointer_to_root();
    assert_eq!(tree.size_under_cursor(), Ok(5));
}

#[test]
fn rendering() {
    assert_snapshot!(with_duplicates().to_string(), @r"
    A
        ├── B
        │   ├── D
        │   └── X
        └── C
            └── X
    ");

    similar_asserts::assert_eq!(
        abdc().to_string(),
        String::from("A\n    ├── B\n    │   └── D\n    └── C\n")
    );

    let mut single: Tree<u32> = Tree::new();
    single.insert(42);
    similar_asserts::assert_eq!(single.to_string(), String::from("42\n"));
}

#[test]
fn copy_is_independent() {
    let original = abdc();
    let mut copy = original.make_copy_of_tree().unwrap();
    assert!(copy == original);

    copy.set_pointer_to_absolute_path(&[0, 0]);
    assert_eq!(copy.set_at_pointer("Z"), Some("D"));
    assert_eq!(original.element_at_absolute_path(&[0, 0]), Some(&"D"));
    assert_eq!(copy.element_at_absolute_path(&[0, 0]), Some(&"Z"));
    assert!(copy != original);
}

#[test]
fn copies_keep_the_cursor_path() {
    let mut tree = with_duplicates();
    tree.move_pointer_up();
    let path = tree.absolute_path_to_cursor();

    let copy = tree.make_copy_of_tree().unwrap();
    assert_eq!(copy.absolute_path_to_cursor(), path);
    let cloned = tree.clone();
    assert_eq!(cloned.absolute_path_to_cursor(), path);
    assert_eq!(cloned.get_at_pointer(), Some(&"B"));
}

#[test]
fn subtree_copy_starts_at_the_cursor() {
    let mut tree = with_duplicates();
    tree.move_pointer_up();
    let sub = tree.copy_subtree_at_cursor().unwrap();
    assert_eq!(sub.size(), 3);
    assert_eq!(sub.cursor(), sub.root());
    assert_eq!(sub.to_list(), Ok(vec!["B", "D", "X"]));
    assert_eq!(sub.validate(), Ok(()));

    let empty: Tree<u8> = Tree::new();
    assert!(empty.copy_subtree_at_cursor().unwrap().is_empty());
}

#[test]
fn add_tree_grafts_a_copy_at_the_cursor() {
    init_logger();
    let mut tree = abdc();
    tree.set_pointer_to_absolute_path(&[1]);
    let mut donor = with_duplicates();

    tree.add_tree(&donor).unwrap();
    assert_eq!(tree.size(), 4 + 6);
    assert_eq!(tree.absolute_path_to_element(&"X"), Ok(Some(vec![1, 0, 0, 1])));
    assert_eq!(tree.get_at_pointer(), Some(&"C"));
    assert_eq!(tree.validate(), Ok(()));

    donor.set_pointer_to_root();
    donor.set_at_pointer("Q");
    assert_eq!(tree.contains(&"Q"), Ok(false));
}

#[test]
fn add_tree_edge_cases() {
    let mut tree = abdc();
    let before = tree.clone();
    let nothing: Tree<&str> = Tree::new();
    tree.add_tree(&nothing).unwrap();
    assert!(tree == before);

    let mut empty: Tree<&str, Recursive> = Tree::with_traversal(Recursive::default());
    empty.add_tree(&before).unwrap();
    assert!(empty == before);
    assert_eq!(empty.cursor(), empty.root());
    assert_eq!(empty.validate(), Ok(()));
}

#[test]
fn set_at_pointer_on_empty_tree() {
    let mut tree: Tree<u8> = Tree::new();
    assert_eq!(tree.set_at_pointer(1), None);
    assert_eq!(tree.size(), 1);
    assert_eq!(tree.set_at_pointer(2), Some(1));
    assert_eq!(tree.size(), 1);
}

#[test]
fn clear_resets_everything() {
    let mut tree = with_duplicates();
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.cursor(), tree.root());
    assert_eq!(tree.to_string(), "");
    tree.insert("fresh");
    assert_eq!(tree.to_list(), Ok(vec!["fresh"]));
}
