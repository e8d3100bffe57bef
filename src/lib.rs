//! This crate implements a Red-Black tree used as an ordered map.
//!
//! Every lookup, insertion and removal is `O(log n)` in the worst case: the tree keeps its height
//! below `2 * log2(n + 1)` by colouring nodes red or black and repairing the colouring with local
//! rotations after each change. Nodes are stored in an arena and refer to each other by index, so
//! the parent back links never own anything.
//!
//! The tree is single threaded. It has no internal locking, so sharing it between threads needs
//! an outer lock around every call, reads included.
//!
//! ```rust
//! use rbtree::RbTree;
//!
//! let mut map = RbTree::new();
//! for key in [1, 3, 4, 6, 5, 2] {
//!     map.insert(key, key * 10);
//! }
//!
//! assert_eq!(map.len(), 6);
//! assert!(map.keys().copied().eq(1..=6));
//! assert_eq!(map.remove(&4), Some(40));
//! assert_eq!(map.get(&4), None);
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

extern crate alloc;

mod cursor;
mod error;
mod iter;
mod node;

#[cfg(test)]
mod invariants;

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt::Debug;
use core::hash::Hash;
use core::mem;

use log::{debug, trace};

pub use cursor::{Cursor, CursorMut};
pub use error::RbTreeError;
pub use iter::{IntoIter, Iter, IterMut, Keys, Preorder, PreorderEntry, Values, ValuesMut};
pub use node::Colour;

use node::{Arena, Direction, NodeId, RbNode};

/// A Red-Black tree for use as an ordered map. See the root level documentation for more info.
///
/// Keys are unique. Inserting an existing key replaces its value in place (see
/// [`insert`](RbTree::insert)); [`try_insert`](RbTree::try_insert) rejects it instead.
pub struct RbTree<K: Ord, V> {
    /// Storage for every node of the tree.
    nodes: Arena<K, V>,
    /// The root node of the tree.
    root: Option<NodeId>,
    /// The amount of nodes in the tree.
    len: usize,
}

/// Where a key was found, or where it would have to be attached.
enum Search {
    Found(NodeId),
    Vacant(Option<NodeId>, Direction),
}

impl<K: Ord, V> RbTree<K, V> {
    /// Create a new empty tree.
    pub const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Create a new empty tree with room for `capacity` nodes before it reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the amount of elements stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every element.
    ///
    /// ```rust
    /// # use rbtree::RbTree;
    /// let mut map = RbTree::from_iter([(1, "a"), (2, "b")]);
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.get(&1), None);
    /// ```
    pub fn clear(&mut self) {
        debug!("clearing tree of {} nodes", self.len);
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Descend from the root, going left on smaller keys and right on larger ones.
    fn search<Q>(&self, key: &Q) -> Search
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut parent = None;
        let mut dir = Direction::Left;
        let mut cur = self.root;
        while let Some(node) = cur {
            dir = match key.cmp(self.nodes[node].key.borrow()) {
                Ordering::Less => Direction::Left,
                Ordering::Equal => return Search::Found(node),
                Ordering::Greater => Direction::Right,
            };
            parent = cur;
            cur = self.nodes[node][dir];
        }
        Search::Vacant(parent, dir)
    }

    fn find_node<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found(node) => Some(node),
            Search::Vacant(..) => None,
        }
    }

    pub(crate) fn first_node(&self) -> Option<NodeId> {
        self.root.map(|r| self.nodes.extreme(r, Direction::Left))
    }

    pub(crate) fn last_node(&self) -> Option<NodeId> {
        self.root.map(|r| self.nodes.extreme(r, Direction::Right))
    }

    /// Get a value if it exists.
    ///
    /// ```rust
    /// # use rbtree::RbTree;
    ///
    /// let mut map = RbTree::default();
    ///
    /// map.insert(4, 6);
    /// map.insert(5, 7);
    /// map.insert(6, 8);
    ///
    /// assert!(map.get(&4) == Some(&6));
    /// assert!(map.get(&5) == Some(&7));
    /// assert!(map.get(&6) == Some(&8));
    /// assert!(map.get(&7) == None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|n| &self.nodes[n].val)
    }

    /// Get the stored key and its value if the key exists.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|n| {
            let node = &self.nodes[n];
            (&node.key, &node.val)
        })
    }

    /// Get a mutable reference to a value if it exists. Changing the value never affects the
    /// shape of the tree.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_node(key)?;
        Some(&mut self.nodes[node].val)
    }

    /// Returns whether the key is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).is_some()
    }

    /// The entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first_node().map(|n| {
            let node = &self.nodes[n];
            (&node.key, &node.val)
        })
    }

    /// The entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last_node().map(|n| {
            let node = &self.nodes[n];
            (&node.key, &node.val)
        })
    }

    /// Remove and return the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let node = self.first_node()?;
        Some(self.remove_node(node))
    }

    /// Remove and return the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let node = self.last_node()?;
        Some(self.remove_node(node))
    }

    /// A cursor at the root node.
    ///
    /// Fails with [`RbTreeError::EmptyTree`] when there are no nodes.
    ///
    /// ```rust
    /// # use rbtree::{Colour, RbTree, RbTreeError};
    /// let mut map = RbTree::new();
    /// assert_eq!(map.root().unwrap_err(), RbTreeError::EmptyTree);
    ///
    /// map.insert(1, ());
    /// let root = map.root().unwrap();
    /// assert_eq!(*root.key(), 1);
    /// assert_eq!(root.colour(), Colour::Black);
    /// ```
    pub fn root(&self) -> Result<Cursor<'_, K, V>, RbTreeError> {
        self.root
            .map(|r| Cursor::new(self, r))
            .ok_or(RbTreeError::EmptyTree)
    }

    /// A cursor at the smallest key, or `None` if the tree is empty.
    pub fn cursor_begin(&self) -> Option<Cursor<'_, K, V>> {
        self.first_node().map(|n| Cursor::new(self, n))
    }

    /// A cursor at the largest key, or `None` if the tree is empty.
    pub fn cursor_end(&self) -> Option<Cursor<'_, K, V>> {
        self.last_node().map(|n| Cursor::new(self, n))
    }

    /// A mutable cursor at the smallest key, or `None` if the tree is empty.
    pub fn cursor_begin_mut(&mut self) -> Option<CursorMut<'_, K, V>> {
        let node = self.first_node()?;
        Some(CursorMut::new(self, node))
    }

    /// A cursor at `key`, or `None` if the key is absent.
    pub fn find_cursor<Q>(&self, key: &Q) -> Option<Cursor<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|n| Cursor::new(self, n))
    }

    /// A mutable cursor at `key`, or `None` if the key is absent.
    ///
    /// ```rust
    /// # use rbtree::RbTree;
    /// let mut map = RbTree::from_iter([(4, "dfa3"), (5, "jcd4")]);
    ///
    /// *map.find_cursor_mut(&4).unwrap().value_mut() = "bdsf";
    /// assert_eq!(map.get(&4), Some(&"bdsf"));
    /// assert_eq!(map.get(&5), Some(&"jcd4"));
    /// ```
    pub fn find_cursor_mut<Q>(&mut self, key: &Q) -> Option<CursorMut<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_node(key)?;
        Some(CursorMut::new(self, node))
    }

    /// Insert a key value pair into the map.
    ///
    /// If the key is already present its value is overwritten in place and the old value is
    /// returned; the tree's shape and size do not change.
    ///
    /// ```rust
    /// # use rbtree::RbTree;
    ///
    /// let mut map = RbTree::default();
    ///
    /// map.insert(4, 6);
    /// map.insert(5, 7);
    /// assert_eq!(map.insert(4, 8), Some(6));
    ///
    /// assert!(map.get(&5) == Some(&7));
    /// assert!(map.get(&4) == Some(&8));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn insert(&mut self, key: K, val: V) -> Option<V> {
        match self.search(&key) {
            Search::Found(node) => Some(mem::replace(&mut self.nodes[node].val, val)),
            Search::Vacant(parent, dir) => {
                self.attach(key, val, parent, dir);
                None
            }
        }
    }

    /// Insert a key value pair, refusing to touch an existing entry.
    ///
    /// Returns a mutable reference to the newly inserted value, or
    /// [`RbTreeError::DuplicateKey`] if the key is already present. The rejected value is dropped.
    ///
    /// ```rust
    /// # use rbtree::{RbTree, RbTreeError};
    /// let mut map = RbTree::new();
    /// assert_eq!(map.try_insert(1, "a"), Ok(&mut "a"));
    /// assert_eq!(map.try_insert(1, "b"), Err(RbTreeError::DuplicateKey));
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn try_insert(&mut self, key: K, val: V) -> Result<&mut V, RbTreeError> {
        match self.search(&key) {
            Search::Found(_) => Err(RbTreeError::DuplicateKey),
            Search::Vacant(parent, dir) => {
                let node = self.attach(key, val, parent, dir);
                Ok(&mut self.nodes[node].val)
            }
        }
    }

    /// Hang a new red leaf below `parent` on side `dir` and restore the colouring.
    fn attach(&mut self, key: K, val: V, parent: Option<NodeId>, dir: Direction) -> NodeId {
        let node = self.nodes.alloc(RbNode::leaf(key, val, parent));
        self.len += 1;
        match parent {
            None => {
                self.nodes[node].colour = Colour::Black;
                self.root = Some(node);
            }
            Some(parent) => {
                self.nodes[parent][dir] = Some(node);
                self.insert_fixup(node);
            }
        }
        node
    }

    /// Walk up from a freshly attached red node until no red node has a red parent.
    fn insert_fixup(&mut self, mut node: NodeId) {
        while let Some(parent) = self.nodes[node].parent {
            if !self.nodes[parent].is_red() {
                break;
            }
            // A red parent is never the root, but if it were we could just recolour it below.
            let Some(grandparent) = self.nodes[parent].parent else {
                break;
            };
            let side = self.side_of(grandparent, parent);
            let uncle = self.nodes[grandparent][side.opposite()];

            if let Some(uncle) = uncle.filter(|&u| self.nodes[u].is_red()) {
                // The black grandparent hands its blackness down to both children and the
                // violation, if any, moves two levels up.
                self.nodes[uncle].colour = Colour::Black;
                self.nodes[parent].colour = Colour::Black;
                self.nodes[grandparent].colour = Colour::Red;
                node = grandparent;
                continue;
            }

            // The uncle is black. Turn an inner grandchild into an outer one first.
            let mut top = parent;
            if self.nodes[parent][side.opposite()] == Some(node) {
                self.rotate(parent, side);
                top = node;
            }
            self.nodes[top].colour = Colour::Black;
            self.nodes[grandparent].colour = Colour::Red;
            self.rotate(grandparent, side.opposite());
            trace!("insert fixup settled by rotation at {grandparent:?}");
            break;
        }
        // Finally we correct the root node to be black.
        if let Some(root) = self.root {
            self.nodes[root].colour = Colour::Black;
        }
    }

    /// Remove a value from the map (if it exists). A missing key leaves the tree untouched.
    ///
    /// ```rust
    /// # use rbtree::RbTree;
    ///
    /// let mut map = RbTree::default();
    ///
    /// map.insert(4, 6);
    /// assert!(map.remove(&4) == Some(6));
    /// assert!(map.remove(&4) == None);
    /// assert!(map.get(&4) == None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Remove an entry from the map (if it exists), returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_node(key)?;
        Some(self.remove_node(node))
    }

    /// Unlink `node` from the tree, free its slot and restore the colouring.
    pub(crate) fn remove_node(&mut self, node: NodeId) -> (K, V) {
        let left = self.nodes[node][Direction::Left];
        let right = self.nodes[node][Direction::Right];
        let mut removed_colour = self.nodes[node].colour;

        // The subtree that ends up in the place of the physically removed node, and the parent
        // and side it hangs from. The subtree may be empty, hence the separate parent.
        let replacement;
        let hole;

        match (left, right) {
            (None, _) | (_, None) => {
                // If either side is empty, we can just replace the node with the other side.
                replacement = left.or(right);
                hole = self.nodes[node]
                    .parent
                    .map(|p| (p, self.side_of(p, node)));
                self.transplant(node, replacement);
            }
            (Some(left), Some(right)) => {
                // The in-order successor takes the node's place, keeping the node's colour. It
                // has no left child, so it is the successor that physically leaves its position.
                let successor = self.nodes.extreme(right, Direction::Left);
                removed_colour = self.nodes[successor].colour;
                replacement = self.nodes[successor][Direction::Right];

                match self.nodes[successor].parent {
                    Some(successor_parent) if successor_parent != node => {
                        hole = Some((successor_parent, Direction::Left));
                        self.transplant(successor, replacement);
                        self.nodes[successor][Direction::Right] = Some(right);
                        self.nodes[right].parent = Some(successor);
                    }
                    _ => hole = Some((successor, Direction::Right)),
                }

                self.transplant(node, Some(successor));
                self.nodes[successor][Direction::Left] = Some(left);
                self.nodes[left].parent = Some(successor);
                self.nodes[successor].colour = self.nodes[node].colour;
            }
        }

        let removed = self.nodes.free(node);
        self.len -= 1;

        if removed_colour == Colour::Black {
            self.remove_fixup(replacement, hole);
        }
        (removed.key, removed.val)
    }

    /// Repair the missing black on every path through `node`, which hangs from `hole`.
    fn remove_fixup(&mut self, mut node: Option<NodeId>, mut hole: Option<(NodeId, Direction)>) {
        while let Some((parent, dir)) = hole {
            if node.is_some_and(|n| self.nodes[n].is_red()) {
                break;
            }
            let sibling_dir = dir.opposite();
            // The deficient side has black height one less than the sibling side had, so the
            // sibling side holds at least one black node.
            let Some(mut sibling) = self.nodes[parent][sibling_dir] else {
                unreachable!("black height deficit under {parent:?} without a sibling");
            };

            if self.nodes[sibling].is_red() {
                // Rotate the red sibling above the parent. The new sibling is one of its black
                // children.
                self.nodes[sibling].colour = Colour::Black;
                self.nodes[parent].colour = Colour::Red;
                self.rotate(parent, dir);
                let Some(next) = self.nodes[parent][sibling_dir] else {
                    unreachable!("red sibling of {parent:?} without children");
                };
                sibling = next;
            }

            let near = self.nodes[sibling][dir];
            let far = self.nodes[sibling][sibling_dir];
            if !self.is_red(far) {
                match near.filter(|&n| self.nodes[n].is_red()) {
                    None => {
                        // Both of the sibling's children are black. Taking one black off the
                        // sibling side balances the parent, which is now short by one instead.
                        self.nodes[sibling].colour = Colour::Red;
                        node = Some(parent);
                        hole = self.nodes[parent]
                            .parent
                            .map(|gp| (gp, self.side_of(gp, parent)));
                        continue;
                    }
                    Some(near) => {
                        // Move the red near child to the far side.
                        self.nodes[near].colour = Colour::Black;
                        self.nodes[sibling].colour = Colour::Red;
                        self.rotate(sibling, sibling_dir);
                        sibling = near;
                    }
                }
            }

            // The far child is red. Rotating the sibling over the parent adds a black node to
            // the deficient side without changing the other side.
            self.nodes[sibling].colour = self.nodes[parent].colour;
            self.nodes[parent].colour = Colour::Black;
            if let Some(far) = self.nodes[sibling][sibling_dir] {
                self.nodes[far].colour = Colour::Black;
            }
            self.rotate(parent, dir);
            trace!("remove fixup settled by rotation at {parent:?}");
            node = self.root;
            break;
        }
        if let Some(node) = node {
            self.nodes[node].colour = Colour::Black;
        }
    }

    fn is_red(&self, node: Option<NodeId>) -> bool {
        node.is_some_and(|n| self.nodes[n].is_red())
    }

    /// Which side of `parent` the node `child` hangs on.
    fn side_of(&self, parent: NodeId, child: NodeId) -> Direction {
        match self.nodes[parent][Direction::Left] == Some(child) {
            true => Direction::Left,
            false => Direction::Right,
        }
    }

    /// Rotate the subtree at `root` in direction `dir`: the child on the opposite side becomes
    /// the subtree root and `root` moves down on side `dir`. Returns the new subtree root.
    ///
    /// Both directions share this one body, so left and right rotations mirror each other
    /// exactly.
    fn rotate(&mut self, root: NodeId, dir: Direction) -> NodeId {
        let parent = self.nodes[root].parent;
        let Some(pivot) = self.nodes[root][dir.opposite()] else {
            unreachable!("rotating {root:?} {dir:?} without a {:?} child", dir.opposite());
        };
        let middle = self.nodes[pivot][dir];
        trace!("rotating {root:?} {dir:?}, {pivot:?} comes up");

        self.nodes[root][dir.opposite()] = middle;
        if let Some(middle) = middle {
            self.nodes[middle].parent = Some(root);
        }
        self.nodes[pivot][dir] = Some(root);
        self.nodes[root].parent = Some(pivot);
        self.nodes[pivot].parent = parent;
        self.replace_child(parent, root, Some(pivot));

        pivot
    }

    /// Point whatever referenced `old` from above (a parent or the root slot) at `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let dir = self.side_of(parent, old);
                self.nodes[parent][dir] = new;
            }
        }
    }

    /// Replace the subtree at `point` with the subtree at `new`, as seen from `point`'s parent.
    /// `point` keeps its own links; the caller deals with it.
    fn transplant(&mut self, point: NodeId, new: Option<NodeId>) {
        let parent = self.nodes[point].parent;
        self.replace_child(parent, point, new);
        if let Some(new) = new {
            self.nodes[new].parent = parent;
        }
    }

    /// The node ids in increasing key order.
    fn inorder_nodes(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.len);
        let mut cur = self.first_node();
        while let Some(node) = cur {
            order.push(node);
            cur = self.nodes.step(node, Direction::Right);
        }
        order
    }

    /// Return a borrowing iterator over the key value pairs in the tree, in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Return an iterator over pairs of keys and mutable references to values in the tree, in
    /// key order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order = self.inorder_nodes();
        let mut nodes = self.nodes.nodes_mut();
        let entries = order
            .into_iter()
            .filter_map(|id| nodes[id.index()].take())
            .map(|node| {
                let RbNode { key, val, .. } = node;
                (&*key, val)
            })
            .collect();
        IterMut::new(entries)
    }

    /// The keys in increasing order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// The values in increasing key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Mutable references to the values in increasing key order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// A pre-order walk over the nodes, exposing each node's parent and colour.
    ///
    /// ```rust
    /// # use rbtree::{Colour, RbTree};
    /// let map = RbTree::from_iter([(1, ()), (2, ()), (3, ())]);
    ///
    /// let root = map.preorder().next().unwrap();
    /// assert_eq!((*root.key, root.parent, root.colour), (2, None, Colour::Black));
    /// ```
    pub fn preorder(&self) -> Preorder<'_, K, V> {
        Preorder::new(self)
    }

    /// Log every node in pre-order at debug level.
    ///
    /// The output is meant for people reading logs; nothing should depend on its format.
    pub fn debug_dump(&self)
    where
        K: Debug,
        V: Debug,
    {
        debug!("preorder dump of {} nodes", self.len);
        for entry in self.preorder() {
            match entry.parent {
                Some(parent) => debug!(
                    "({:?} {:?}) parent {:?}, {:?}",
                    entry.key, entry.value, parent, entry.colour
                ),
                None => debug!("({:?} {:?}) root, {:?}", entry.key, entry.value, entry.colour),
            }
        }
    }
}

impl<K: Ord, V> Default for RbTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Clone> Clone for RbTree<K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
        }
    }
}

impl<K: Ord + Debug, V: Debug> Debug for RbTree<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self).finish()
    }
}

impl<K: Ord + PartialEq, V: PartialEq> PartialEq for RbTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<K: Ord + Eq, V: Eq> Eq for RbTree<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for RbTree<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tree = RbTree::default();
        tree.extend(iter);
        tree
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for RbTree<K, V> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V: PartialOrd> PartialOrd for RbTree<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<K: Ord, V: Ord> Ord for RbTree<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<K: Ord + Hash, V: Hash> Hash for RbTree<K, V> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            (k, v).hash(state);
        }
    }
}

impl<K: Ord, V> Extend<(K, V)> for RbTree<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a RbTree<K, V> {
    type Item = (&'a K, &'a V);

    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a mut RbTree<K, V> {
    type Item = (&'a K, &'a mut V);

    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K: Ord, V> IntoIterator for RbTree<K, V> {
    type Item = (K, V);

    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let order = self.inorder_nodes();
        let mut nodes = self.nodes.into_nodes();
        let entries = order
            .into_iter()
            .filter_map(|id| nodes[id.index()].take())
            .map(|node| (node.key, node.val))
            .collect();
        IntoIter::new(entries)
    }
}

#[cfg(test)]
mod test {
    use crate::invariants::{assert_links, assert_valid};
    use crate::node::Direction;
    use crate::{RbTree, RbTreeError};

    fn scenario_tree() -> RbTree<i32, &'static str> {
        let mut tree = RbTree::new();
        tree.insert(1, "123");
        tree.insert(3, "234");
        tree.insert(4, "dfa3");
        tree.insert(6, "sd4");
        tree.insert(5, "jcd4");
        tree.insert(2, "bcd4");
        tree
    }

    #[test]
    fn test_ops() {
        let mut tree = RbTree::default();

        const COUNT: usize = 100_000;

        for key in 0..COUNT {
            tree.insert(key, key);
        }
        for key in 0..COUNT {
            tree.insert(key, key);
        }
        assert!(tree.len() == COUNT);
        assert_valid(&tree);
        for key in 0..COUNT {
            assert!(tree.get(&key) == Some(&key));
        }
        for key in 0..COUNT {
            assert!(tree.remove(&key) == Some(key));
        }
        for key in 0..COUNT {
            assert!(tree.get(&key) == None);
        }
        assert!(tree.is_empty());
        assert_valid(&tree);
    }

    #[test]
    fn test_traits() {
        let mut tree = RbTree::from_iter((0..100).map(|x| (x, x)));

        let mut tree2 = RbTree::new();
        for x in 0..100 {
            tree2.insert(x, x);
        }
        assert_eq!(tree, tree2);

        tree.extend(tree2.into_iter().map(|(k, v)| (k + 100, v)));
        for x in 100..200 {
            assert!(tree.get(&x) == Some(&(x - 100)));
        }

        let tree2 = tree.clone();
        assert_valid(&tree2);
        for item in tree2.iter() {
            assert!(tree.iter().any(|i| i == item));
        }
        for item in tree.iter() {
            assert!(tree2.iter().any(|i| i == item));
        }

        let mut tree3 = RbTree::new();
        tree3.extend(tree.iter());
        assert_eq!(tree, tree3);
        tree3.insert(0, 1);
        assert!(tree < tree3);
    }

    #[test]
    fn test_debug_format() {
        let tree = RbTree::from_iter([(2, 'b'), (1, 'a')]);
        assert_eq!(format!("{tree:?}"), "{1: 'a', 2: 'b'}");
    }

    #[test]
    fn test_six_keys_in_order() {
        let tree = scenario_tree();
        assert_eq!(tree.len(), 6);
        assert_valid(&tree);

        let mut keys = Vec::new();
        let mut cursor = tree.cursor_begin();
        while let Some(cur) = cursor {
            keys.push(*cur.key());
            cursor = cur.successor();
        }
        assert_eq!(keys, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_mutation_does_not_alias() {
        let mut tree = scenario_tree();
        let val = tree.get_mut(&4).unwrap();
        assert_eq!(*val, "dfa3");
        *val = "bdsf";
        assert_eq!(tree.get(&4), Some(&"bdsf"));
        assert_eq!(tree.get(&5), Some(&"jcd4"));
    }

    #[test]
    fn test_delete_ascending() {
        let mut tree = scenario_tree();
        for key in 1..=6 {
            assert!(tree.remove(&key).is_some());
            assert_eq!(tree.len(), 6 - key as usize);
            assert_valid(&tree);
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_delete_descending_and_middle() {
        let mut tree: RbTree<_, _> = (0..64).map(|k| (k, k)).collect();
        for key in [32, 31, 33, 0, 63, 16, 48] {
            assert_eq!(tree.remove(&key), Some(key));
            assert_valid(&tree);
        }
        for key in (0..64).rev() {
            tree.remove(&key);
            assert_valid(&tree);
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_empty_tree() {
        let mut tree: RbTree<i32, &str> = RbTree::new();
        assert_eq!(tree.root().unwrap_err(), RbTreeError::EmptyTree);
        assert_eq!(tree.get(&1), None);
        assert_eq!(tree.remove(&1), None);
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.first_key_value(), None);
        assert_eq!(tree.pop_first(), None);
        assert_eq!(tree.pop_last(), None);
        assert_valid(&tree);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut tree = scenario_tree();
        let before: Vec<_> = tree
            .preorder()
            .map(|e| (*e.key, e.parent.copied(), e.colour))
            .collect();
        assert_eq!(tree.remove(&42), None);
        let after: Vec<_> = tree
            .preorder()
            .map(|e| (*e.key, e.parent.copied(), e.colour))
            .collect();
        assert_eq!(before, after);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn test_clear() {
        let mut tree = scenario_tree();
        tree.clear();
        assert_eq!(tree.len(), 0);
        for key in 1..=6 {
            assert_eq!(tree.get(&key), None);
        }
        assert!(tree.root().is_err());
        assert_valid(&tree);

        tree.insert(1, "bcd4");
        assert_eq!(tree.get(&1), Some(&"bcd4"));
        assert_valid(&tree);
    }

    #[test]
    fn test_duplicate_insert_overwrites() {
        let mut tree = scenario_tree();
        assert_eq!(tree.insert(4, "new"), Some("dfa3"));
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.get(&4), Some(&"new"));
        assert_eq!(tree.remove(&4), Some("new"));
        assert_eq!(tree.get(&4), None);
        assert_valid(&tree);
    }

    #[test]
    fn test_duplicate_try_insert_rejects() {
        let mut tree = scenario_tree();
        assert_eq!(tree.try_insert(4, "new"), Err(RbTreeError::DuplicateKey));
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.get(&4), Some(&"dfa3"));

        *tree.try_insert(7, "seven").unwrap() = "SEVEN";
        assert_eq!(tree.get(&7), Some(&"SEVEN"));
        assert_eq!(tree.len(), 7);
        assert_valid(&tree);
    }

    #[test]
    fn test_first_last_pop() {
        let mut tree = scenario_tree();
        assert_eq!(tree.first_key_value(), Some((&1, &"123")));
        assert_eq!(tree.last_key_value(), Some((&6, &"sd4")));
        assert_eq!(tree.pop_first(), Some((1, "123")));
        assert_eq!(tree.pop_last(), Some((6, "sd4")));
        assert_eq!(tree.len(), 4);
        assert!(tree.keys().copied().eq(2..=5));
        assert_valid(&tree);
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut tree = RbTree::new();
        tree.insert(String::from("b"), 2);
        tree.insert(String::from("a"), 1);
        assert_eq!(tree.get("a"), Some(&1));
        assert!(tree.contains_key("b"));
        assert_eq!(tree.get_key_value("b"), Some((&String::from("b"), &2)));
        assert_eq!(tree.remove_entry("a"), Some((String::from("a"), 1)));
        assert!(!tree.contains_key("a"));
    }

    #[test]
    fn test_slots_are_recycled() {
        let mut tree = RbTree::with_capacity(8);
        for key in 0..8 {
            tree.insert(key, ());
        }
        for key in 0..4 {
            tree.remove(&key);
        }
        for key in 10..14 {
            tree.insert(key, ());
        }
        assert_eq!(tree.nodes.slot_count(), 8);
        assert_valid(&tree);
    }

    /// Rotating one way and then back at the new subtree root restores the exact shape.
    fn assert_rotation_round_trip(first: Direction) {
        let mut tree: RbTree<_, _> = (0..15).map(|k| (k, ())).collect();
        let shape = |tree: &RbTree<i32, ()>| -> Vec<_> {
            tree.preorder().map(|e| (*e.key, e.parent.copied())).collect()
        };
        let before = shape(&tree);

        let root = tree.root.unwrap();
        let pivot = tree.rotate(root, first);
        assert_eq!(tree.root, Some(pivot));
        assert_ne!(pivot, root);
        assert_links(&tree);
        assert!(tree.keys().copied().eq(0..15));

        let back = tree.rotate(pivot, first.opposite());
        assert_eq!(back, root);
        assert_eq!(tree.root, Some(root));
        assert_links(&tree);
        assert_eq!(shape(&tree), before);
    }

    #[test]
    fn test_rotate_left_then_right() {
        assert_rotation_round_trip(Direction::Left);
    }

    #[test]
    fn test_rotate_right_then_left() {
        assert_rotation_round_trip(Direction::Right);
    }

    #[test]
    fn test_rotate_below_root_mirrors() {
        for dir in [Direction::Left, Direction::Right] {
            let mut tree: RbTree<_, _> = (0..31).map(|k| (k, ())).collect();
            let root = tree.root.unwrap();
            let Some(child) = tree.nodes[root][dir] else {
                panic!("expected a {dir:?} child");
            };
            // Rotate away from the root's side so the child keeps the needed grandchild.
            let pivot = tree.rotate(child, dir.opposite());
            assert_eq!(tree.nodes[root][dir], Some(pivot));
            assert_eq!(tree.nodes[pivot].parent, Some(root));
            assert_eq!(tree.root, Some(root));
            assert_links(&tree);
            assert!(tree.keys().copied().eq(0..31));
        }
    }

    #[test]
    fn test_ascending_and_descending_inserts_mirror() {
        let asc: RbTree<_, _> = (0..100).map(|k| (k, ())).collect();
        let desc: RbTree<_, _> = (0..100).map(|k| (-k, ())).collect();
        assert_valid(&asc);
        assert_valid(&desc);
        // Inserting the negated keys in the same order builds the mirror image, so every key
        // keeps its colour and its parent's key up to sign.
        let mut asc_shape: Vec<_> = asc
            .preorder()
            .map(|e| (*e.key, e.parent.copied(), e.colour))
            .collect();
        let mut desc_shape: Vec<_> = desc
            .preorder()
            .map(|e| (-*e.key, e.parent.map(|p| -*p), e.colour))
            .collect();
        asc_shape.sort();
        desc_shape.sort();
        assert_eq!(asc_shape, desc_shape);
    }

    #[test]
    fn test_debug_dump_logs() {
        use simplelog::{Config, LevelFilter, SimpleLogger};
        // Another test may have installed the logger already.
        let _ = SimpleLogger::init(LevelFilter::Trace, Config::default());

        let mut tree = scenario_tree();
        tree.debug_dump();
        tree.remove(&3);
        tree.clear();
        tree.debug_dump();
    }

    mod proptests {
        use std::collections::BTreeMap;

        use proptest::prelude::*;

        use crate::invariants::assert_valid;
        use crate::RbTree;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(i16, u32),
            Remove(i16),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => (0..256i16, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
                2 => (0..256i16).prop_map(Op::Remove),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn ops_match_btreemap(ops in proptest::collection::vec(op(), 0..400)) {
                let mut model = BTreeMap::new();
                let mut tree = RbTree::new();
                for op in ops {
                    match op {
                        Op::Insert(k, v) => prop_assert_eq!(tree.insert(k, v), model.insert(k, v)),
                        Op::Remove(k) => prop_assert_eq!(tree.remove(&k), model.remove(&k)),
                    }
                    assert_valid(&tree);
                    prop_assert_eq!(tree.len(), model.len());
                }
                prop_assert!(tree.iter().eq(model.iter()));
                prop_assert!(tree.iter().rev().eq(model.iter().rev()));
                for (k, v) in &model {
                    prop_assert_eq!(tree.get(k), Some(v));
                }
            }

            #[test]
            fn cursor_walk_is_sorted(keys in proptest::collection::hash_set(any::<i32>(), 0..300)) {
                let tree: RbTree<_, _> = keys.iter().map(|&k| (k, ())).collect();
                let mut sorted: Vec<_> = keys.into_iter().collect();
                sorted.sort();

                let mut walked = Vec::new();
                let mut cursor = tree.cursor_begin();
                while let Some(cur) = cursor {
                    walked.push(*cur.key());
                    cursor = cur.successor();
                }
                prop_assert_eq!(walked, sorted);
            }

            #[test]
            fn drain_by_pop_first(keys in proptest::collection::vec(any::<u16>(), 0..300)) {
                let mut tree: RbTree<_, _> = keys.iter().map(|&k| (k, k)).collect();
                let mut prev = None;
                while let Some((k, v)) = tree.pop_first() {
                    prop_assert_eq!(k, v);
                    prop_assert!(prev < Some(k));
                    prev = Some(k);
                    assert_valid(&tree);
                }
                prop_assert!(tree.is_empty());
            }
        }
    }
}
