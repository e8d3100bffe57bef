//! An independent checker for the structure of an [`RbTree`], used by the tests.

use crate::node::{Colour, Direction, NodeId};
use crate::RbTree;

/// Check the links and the ordering, but not the colouring.
///
/// Every child points back at its parent, the root has no parent, keys strictly increase in
/// order, the reachable node count matches `len`, and every arena slot is either reachable or on
/// the free list.
pub(crate) fn assert_links<K: Ord, V>(tree: &RbTree<K, V>) {
    let mut count = 0;
    if let Some(root) = tree.root {
        assert_eq!(tree.nodes[root].parent, None, "root {root:?} has a parent");
        let mut prev: Option<&K> = None;
        walk_links(tree, root, &mut prev, &mut count);
    }
    assert_eq!(count, tree.len(), "reachable nodes do not match len");
    assert_eq!(
        tree.nodes.slot_count(),
        tree.len() + tree.nodes.free_count(),
        "arena slots leaked"
    );
}

fn walk_links<'a, K: Ord, V>(
    tree: &'a RbTree<K, V>,
    node: NodeId,
    prev: &mut Option<&'a K>,
    count: &mut usize,
) {
    let left = tree.nodes[node][Direction::Left];
    let right = tree.nodes[node][Direction::Right];

    if let Some(left) = left {
        assert_eq!(tree.nodes[left].parent, Some(node), "bad parent link at {left:?}");
        walk_links(tree, left, prev, count);
    }

    let key = &tree.nodes[node].key;
    if let Some(prev) = *prev {
        assert!(prev < key, "keys out of order at {node:?}");
    }
    *prev = Some(key);
    *count += 1;

    if let Some(right) = right {
        assert_eq!(tree.nodes[right].parent, Some(node), "bad parent link at {right:?}");
        walk_links(tree, right, prev, count);
    }
}

/// Check every Red-Black property on top of [`assert_links`].
pub(crate) fn assert_valid<K: Ord, V>(tree: &RbTree<K, V>) {
    assert_links(tree);
    assert_eq!(tree.is_empty(), tree.root.is_none());
    if let Some(root) = tree.root {
        assert_eq!(tree.nodes[root].colour, Colour::Black, "red root");
        black_height(tree, Some(root));
    }
}

/// The black height of the subtree at `node`, counting the absent leaves as the one black level.
fn black_height<K: Ord, V>(tree: &RbTree<K, V>, node: Option<NodeId>) -> usize {
    let Some(node) = node else {
        return 1;
    };
    let n = &tree.nodes[node];
    if n.is_red() {
        for child in n.child.into_iter().flatten() {
            assert!(!tree.nodes[child].is_red(), "red {node:?} has red child {child:?}");
        }
    }
    let left = black_height(tree, n[Direction::Left]);
    let right = black_height(tree, n[Direction::Right]);
    assert_eq!(left, right, "black heights differ below {node:?}");
    left + usize::from(!n.is_red())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[should_panic(expected = "red root")]
    fn test_detects_red_root() {
        let mut tree = RbTree::new();
        tree.insert(1, ());
        let root = tree.root.unwrap();
        tree.nodes[root].colour = Colour::Red;
        assert_valid(&tree);
    }

    #[test]
    #[should_panic(expected = "black heights differ")]
    fn test_detects_black_height_mismatch() {
        let mut tree = RbTree::new();
        for k in [2, 1, 3] {
            tree.insert(k, ());
        }
        let root = tree.root.unwrap();
        let left = tree.nodes[root][Direction::Left].unwrap();
        tree.nodes[left].colour = Colour::Black;
        assert_valid(&tree);
    }

    #[test]
    #[should_panic(expected = "has red child")]
    fn test_detects_red_red() {
        let mut tree = RbTree::new();
        for k in [2, 1, 3, 4] {
            tree.insert(k, ());
        }
        // 4 hangs red below 3, which is black after the recolouring.
        let three = tree.find_node(&3).unwrap();
        tree.nodes[three].colour = Colour::Red;
        assert_valid(&tree);
    }
}
