//! Cursors: positions in the ordered key sequence of an [`RbTree`].
//!
//! A cursor borrows its tree, so the tree cannot be restructured while a cursor into it is alive.

use core::fmt::Debug;

use crate::node::{Colour, Direction, NodeId};
use crate::RbTree;

/// A read-only position at a node of an [`RbTree`].
///
/// Besides walking the key order with [`successor`](Cursor::successor) and
/// [`predecessor`](Cursor::predecessor), a cursor can inspect the tree's shape through
/// [`parent`](Cursor::parent), [`left`](Cursor::left) and [`right`](Cursor::right).
pub struct Cursor<'a, K: Ord, V> {
    tree: &'a RbTree<K, V>,
    node: NodeId,
}

impl<'a, K: Ord, V> Cursor<'a, K, V> {
    pub(crate) fn new(tree: &'a RbTree<K, V>, node: NodeId) -> Self {
        Self { tree, node }
    }

    fn at(self, node: Option<NodeId>) -> Option<Self> {
        node.map(|node| Self {
            tree: self.tree,
            node,
        })
    }

    /// The key at this position.
    pub fn key(&self) -> &'a K {
        &self.tree.nodes[self.node].key
    }

    /// The value at this position.
    pub fn value(&self) -> &'a V {
        &self.tree.nodes[self.node].val
    }

    /// The colour of the node at this position.
    pub fn colour(&self) -> Colour {
        self.tree.nodes[self.node].colour
    }

    /// The structural parent, or `None` at the root.
    pub fn parent(self) -> Option<Self> {
        self.at(self.tree.nodes[self.node].parent)
    }

    /// The left child, if any.
    pub fn left(self) -> Option<Self> {
        self.at(self.tree.nodes[self.node][Direction::Left])
    }

    /// The right child, if any.
    pub fn right(self) -> Option<Self> {
        self.at(self.tree.nodes[self.node][Direction::Right])
    }

    /// Advance to the next larger key, or `None` past the maximum.
    ///
    /// ```rust
    /// # use rbtree::RbTree;
    /// let map = RbTree::from_iter([(3, 'c'), (1, 'a'), (2, 'b')]);
    ///
    /// let mut keys = Vec::new();
    /// let mut cursor = map.cursor_begin();
    /// while let Some(cur) = cursor {
    ///     keys.push(*cur.key());
    ///     cursor = cur.successor();
    /// }
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    pub fn successor(self) -> Option<Self> {
        self.at(self.tree.nodes.step(self.node, Direction::Right))
    }

    /// Step back to the next smaller key, or `None` before the minimum.
    pub fn predecessor(self) -> Option<Self> {
        self.at(self.tree.nodes.step(self.node, Direction::Left))
    }
}

impl<K: Ord, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Ord, V> Copy for Cursor<'_, K, V> {}

impl<K: Ord + Debug, V: Debug> Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("key", self.key())
            .field("value", self.value())
            .field("colour", &self.colour())
            .finish()
    }
}

/// A position at a node of an [`RbTree`] through which the value may be modified.
///
/// Only the value can be changed in place; the key, the colour and the links stay untouched, so
/// the tree's invariants are unaffected.
pub struct CursorMut<'a, K: Ord, V> {
    tree: &'a mut RbTree<K, V>,
    node: NodeId,
}

impl<'a, K: Ord, V> CursorMut<'a, K, V> {
    pub(crate) fn new(tree: &'a mut RbTree<K, V>, node: NodeId) -> Self {
        Self { tree, node }
    }

    /// The key at this position.
    pub fn key(&self) -> &K {
        &self.tree.nodes[self.node].key
    }

    /// The value at this position.
    pub fn value(&self) -> &V {
        &self.tree.nodes[self.node].val
    }

    /// Mutable access to the value at this position.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.tree.nodes[self.node].val
    }

    /// Give up the cursor, keeping mutable access to its value for the whole borrow.
    pub fn into_value_mut(self) -> &'a mut V {
        let tree = self.tree;
        &mut tree.nodes[self.node].val
    }

    /// Advance to the next larger key, or `None` past the maximum.
    pub fn successor(self) -> Option<Self> {
        let next = self.tree.nodes.step(self.node, Direction::Right)?;
        Some(Self::new(self.tree, next))
    }

    /// Step back to the next smaller key, or `None` before the minimum.
    pub fn predecessor(self) -> Option<Self> {
        let prev = self.tree.nodes.step(self.node, Direction::Left)?;
        Some(Self::new(self.tree, prev))
    }

    /// Remove the entry at this position from the tree, consuming the cursor.
    ///
    /// ```rust
    /// # use rbtree::RbTree;
    /// let mut map = RbTree::from_iter([(1, 'a'), (2, 'b')]);
    ///
    /// let cursor = map.find_cursor_mut(&1).unwrap();
    /// assert_eq!(cursor.remove(), (1, 'a'));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove(self) -> (K, V) {
        self.tree.remove_node(self.node)
    }
}

impl<K: Ord + Debug, V: Debug> Debug for CursorMut<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CursorMut")
            .field("key", self.key())
            .field("value", self.value())
            .finish()
    }
}
