//! Iterators over an [`RbTree`].

use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::node::{Colour, Direction, NodeId};
use crate::RbTree;

/// A borrowing iterator over the entries of an `RbTree`, in increasing key order.
pub struct Iter<'a, K: Ord, V> {
    tree: &'a RbTree<K, V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    len: usize,
}

impl<'a, K: Ord, V> Iter<'a, K, V> {
    pub(crate) fn new(tree: &'a RbTree<K, V>) -> Self {
        Self {
            tree,
            front: tree.first_node(),
            back: tree.last_node(),
            len: tree.len(),
        }
    }
}

impl<K: Ord, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

impl<'a, K: Ord + 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let cur = self.front?;
        let tree = self.tree;
        self.front = tree.nodes.step(cur, Direction::Right);
        self.len -= 1;

        let node = &tree.nodes[cur];
        Some((&node.key, &node.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K: Ord + 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let cur = self.back?;
        let tree = self.tree;
        self.back = tree.nodes.step(cur, Direction::Left);
        self.len -= 1;

        let node = &tree.nodes[cur];
        Some((&node.key, &node.val))
    }
}

impl<'a, K: Ord + 'a, V: 'a> ExactSizeIterator for Iter<'a, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, K: Ord + 'a, V: 'a> FusedIterator for Iter<'a, K, V> {}

/// An iterator over pairs of keys and mutable references to values, in increasing key order.
///
/// The entries are gathered when the iterator is created.
pub struct IterMut<'a, K: Ord, V> {
    entries: alloc::vec::IntoIter<(&'a K, &'a mut V)>,
}

impl<'a, K: Ord, V> IterMut<'a, K, V> {
    pub(crate) fn new(entries: Vec<(&'a K, &'a mut V)>) -> Self {
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K: Ord + 'a, V: 'a> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<'a, K: Ord + 'a, V: 'a> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<'a, K: Ord + 'a, V: 'a> ExactSizeIterator for IterMut<'a, K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<'a, K: Ord + 'a, V: 'a> FusedIterator for IterMut<'a, K, V> {}

/// An owning iterator over the entries of an `RbTree`, in increasing key order.
pub struct IntoIter<K: Ord, V> {
    entries: alloc::vec::IntoIter<(K, V)>,
}

impl<K: Ord, V> IntoIter<K, V> {
    pub(crate) fn new(entries: Vec<(K, V)>) -> Self {
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl<K: Ord, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K: Ord, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K: Ord, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K: Ord, V> FusedIterator for IntoIter<K, V> {}

/// An iterator over the keys of an `RbTree`, in increasing order.
pub struct Keys<'a, K: Ord, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K: Ord + 'a, V: 'a> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: Ord + 'a, V: 'a> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<'a, K: Ord + 'a, V: 'a> ExactSizeIterator for Keys<'a, K, V> {}

impl<'a, K: Ord + 'a, V: 'a> FusedIterator for Keys<'a, K, V> {}

/// An iterator over the values of an `RbTree`, in increasing key order.
pub struct Values<'a, K: Ord, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K: Ord + 'a, V: 'a> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: Ord + 'a, V: 'a> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<'a, K: Ord + 'a, V: 'a> ExactSizeIterator for Values<'a, K, V> {}

impl<'a, K: Ord + 'a, V: 'a> FusedIterator for Values<'a, K, V> {}

/// An iterator over mutable references to the values of an `RbTree`, in increasing key order.
pub struct ValuesMut<'a, K: Ord, V> {
    pub(crate) inner: IterMut<'a, K, V>,
}

impl<'a, K: Ord + 'a, V: 'a> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: Ord + 'a, V: 'a> ExactSizeIterator for ValuesMut<'a, K, V> {}

impl<'a, K: Ord + 'a, V: 'a> FusedIterator for ValuesMut<'a, K, V> {}

/// One node as seen by a pre-order walk: the entry, its parent's key and its colour.
#[derive(Debug, PartialEq, Eq)]
pub struct PreorderEntry<'a, K, V> {
    /// The node's key.
    pub key: &'a K,
    /// The node's value.
    pub value: &'a V,
    /// The parent's key, `None` for the root.
    pub parent: Option<&'a K>,
    /// The node's colour.
    pub colour: Colour,
}

/// A pre-order walk over the nodes of an `RbTree`: each node, then its left subtree, then its
/// right subtree.
///
/// This exposes the tree's shape for diagnostics. Call [`RbTree::preorder`] again to restart.
pub struct Preorder<'a, K: Ord, V> {
    tree: &'a RbTree<K, V>,
    stack: Vec<NodeId>,
}

impl<'a, K: Ord, V> Preorder<'a, K, V> {
    pub(crate) fn new(tree: &'a RbTree<K, V>) -> Self {
        Self {
            tree,
            stack: tree.root.into_iter().collect(),
        }
    }
}

impl<'a, K: Ord + 'a, V: 'a> Iterator for Preorder<'a, K, V> {
    type Item = PreorderEntry<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.nodes[cur];

        // Right goes on first so that the left subtree is visited first.
        self.stack.extend(node[Direction::Right]);
        self.stack.extend(node[Direction::Left]);

        Some(PreorderEntry {
            key: &node.key,
            value: &node.val,
            parent: node.parent.map(|p| &tree.nodes[p].key),
            colour: node.colour,
        })
    }
}

impl<'a, K: Ord + 'a, V: 'a> FusedIterator for Preorder<'a, K, V> {}
