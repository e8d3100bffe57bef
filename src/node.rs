//! Node storage for the tree.
//!
//! Nodes live in an [`Arena`] and refer to each other by [`NodeId`]. Child links own their
//! subtree in the sense that only the tree's structural code ever rewrites them; the parent link
//! is a plain back reference used for walking upwards and is never followed during teardown.

use alloc::vec::Vec;
use core::mem;
use core::ops::{Index, IndexMut};

use log::trace;

/// Index of a node inside an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A direction for a node to be in, in a binary tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Get the opposite of a direction.
    pub(crate) fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// The colour of a node. Absent children count as black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Colour {
    /// A red node never has a red child.
    Red,
    /// Black nodes are counted for the black height of a path.
    Black,
}

/// A single entry of the tree together with its structural links.
#[derive(Debug, Clone)]
pub(crate) struct RbNode<K, V> {
    pub(crate) key: K,
    pub(crate) val: V,
    pub(crate) colour: Colour,
    /// None iff the node is the root.
    pub(crate) parent: Option<NodeId>,
    pub(crate) child: [Option<NodeId>; 2],
}

impl<K, V> RbNode<K, V> {
    /// A fresh red leaf hanging below `parent`.
    pub(crate) fn leaf(key: K, val: V, parent: Option<NodeId>) -> Self {
        Self {
            key,
            val,
            colour: Colour::Red,
            parent,
            child: [None, None],
        }
    }

    pub(crate) fn is_red(&self) -> bool {
        self.colour == Colour::Red
    }
}

impl<K, V> Index<Direction> for RbNode<K, V> {
    type Output = Option<NodeId>;

    fn index(&self, index: Direction) -> &Self::Output {
        match index {
            Direction::Left => &self.child[0],
            Direction::Right => &self.child[1],
        }
    }
}

impl<K, V> IndexMut<Direction> for RbNode<K, V> {
    fn index_mut(&mut self, index: Direction) -> &mut Self::Output {
        match index {
            Direction::Left => &mut self.child[0],
            Direction::Right => &mut self.child[1],
        }
    }
}

#[derive(Debug, Clone)]
enum Slot<K, V> {
    Occupied(RbNode<K, V>),
    /// A freed slot, linking to the next free slot.
    Vacant(Option<NodeId>),
}

/// Growable node storage that recycles freed slots through an intrusive free list.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Option<NodeId>,
}

impl<K, V> Arena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: None,
        }
    }

    /// Store a node, reusing a freed slot when one is available.
    pub(crate) fn alloc(&mut self, node: RbNode<K, V>) -> NodeId {
        match self.free {
            Some(id) => {
                let slot = mem::replace(&mut self.slots[id.0], Slot::Occupied(node));
                match slot {
                    Slot::Vacant(next) => self.free = next,
                    Slot::Occupied(_) => unreachable!("free list points at live node {id:?}"),
                }
                trace!("recycled arena slot {}", id.0);
                id
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Take a node out of the arena, putting its slot on the free list.
    pub(crate) fn free(&mut self, id: NodeId) -> RbNode<K, V> {
        match mem::replace(&mut self.slots[id.0], Slot::Vacant(self.free)) {
            Slot::Occupied(node) => {
                self.free = Some(id);
                node
            }
            Slot::Vacant(_) => unreachable!("double free of node {id:?}"),
        }
    }

    /// Drop every node at once. No link is followed.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
    }

    /// Number of slots, live or free.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Length of the free list.
    #[cfg(test)]
    pub(crate) fn free_count(&self) -> usize {
        let mut count = 0;
        let mut cur = self.free;
        while let Some(id) = cur {
            count += 1;
            cur = match self.slots[id.0] {
                Slot::Vacant(next) => next,
                Slot::Occupied(_) => unreachable!("free list points at live node {id:?}"),
            };
        }
        count
    }

    /// Mutable access to every live node, indexed by slot.
    pub(crate) fn nodes_mut(&mut self) -> Vec<Option<&mut RbNode<K, V>>> {
        self.slots
            .iter_mut()
            .map(|slot| match slot {
                Slot::Occupied(node) => Some(node),
                Slot::Vacant(_) => None,
            })
            .collect()
    }

    /// Consume the arena, yielding every live node indexed by slot.
    pub(crate) fn into_nodes(self) -> Vec<Option<RbNode<K, V>>> {
        self.slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Occupied(node) => Some(node),
                Slot::Vacant(_) => None,
            })
            .collect()
    }

    /// Descend from `id` as far as possible in direction `dir`.
    ///
    /// `Left` gives the minimum of the subtree, `Right` its maximum.
    pub(crate) fn extreme(&self, mut id: NodeId, dir: Direction) -> NodeId {
        while let Some(next) = self[id][dir] {
            id = next;
        }
        id
    }

    /// The in-order neighbour of `id` in direction `dir`.
    ///
    /// `Right` gives the successor and `Left` the predecessor. If `id` has a subtree on that side
    /// the neighbour is its extreme in the other direction, otherwise it is the first ancestor
    /// reached from its opposite side.
    pub(crate) fn step(&self, id: NodeId, dir: Direction) -> Option<NodeId> {
        if let Some(sub) = self[id][dir] {
            return Some(self.extreme(sub, dir.opposite()));
        }
        let mut child = id;
        let mut parent = self[id].parent;
        while let Some(p) = parent {
            if self[p][dir] != Some(child) {
                break;
            }
            child = p;
            parent = self[p].parent;
        }
        parent
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = RbNode<K, V>;

    fn index(&self, id: NodeId) -> &Self::Output {
        match &self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("dangling node id {id:?}"),
        }
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match &mut self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("dangling node id {id:?}"),
        }
    }
}
