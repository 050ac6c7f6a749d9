use alloc::vec::Vec;
use core::cell::Cell;
use core::{cmp, fmt, mem};

use crate::InvariantViolation;

/// Handle of a node inside a [`crate::DistanceList`] arena.
///
/// Handles are only meaningful for the list that produced them and are recycled after the
/// node is removed. They show up in [`InvariantViolation`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The arena slot this handle points at.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A lazily computed length.
///
/// `Stale` keeps the last known value around so callers can report deltas, but it is never
/// returned as the current length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Cached {
    Unset,
    Stale(f64),
    Valid(f64),
}

impl Cached {
    pub(crate) fn valid(self) -> Option<f64> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Unset | Self::Stale(_) => None,
        }
    }

    pub(crate) fn previous(self) -> Option<f64> {
        match self {
            Self::Valid(v) | Self::Stale(v) => Some(v),
            Self::Unset => None,
        }
    }

    pub(crate) fn invalidated(self) -> Self {
        match self {
            Self::Valid(v) => Self::Stale(v),
            other => other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) item: T,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) height: u32,
    pub(crate) tree_size: usize,
    pub(crate) length: Cell<Cached>,
    pub(crate) tree_length: Cell<Cached>,
}

impl<T> Node<T> {
    pub(crate) fn leaf(item: T, parent: Option<NodeId>) -> Self {
        Self {
            item,
            parent,
            left: None,
            right: None,
            height: 1,
            tree_size: 1,
            length: Cell::new(Cached::Unset),
            tree_length: Cell::new(Cached::Unset),
        }
    }

    pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn invalidate_length(&self) {
        self.length.set(self.length.get().invalidated());
    }

    pub(crate) fn invalidate_tree_length(&self) {
        self.tree_length.set(self.tree_length.get().invalidated());
    }
}

/// Slot storage for tree nodes. Children are owned through their slot; parent links are plain
/// handles and never keep a slot alive.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<NodeId>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn free_count(&self) -> usize {
        self.free.len()
    }

    pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeId {
        self.len += 1;
        if let Some(id) = self.free.pop() {
            self.slots[id.0] = Some(node);
            return id;
        }
        self.slots.push(Some(node));
        NodeId(self.slots.len() - 1)
    }

    pub(crate) fn release(&mut self, id: NodeId) -> Node<T> {
        let Some(node) = self.slots.get_mut(id.0).and_then(Option::take) else {
            corrupted!(InvariantViolation::VacantSlot { node: id });
        };
        self.len -= 1;
        self.free.push(id);
        node
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    pub(crate) fn try_get(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node<T> {
        match self.try_get(id) {
            Some(node) => node,
            None => corrupted!(InvariantViolation::VacantSlot { node: id }),
        }
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => node,
            None => corrupted!(InvariantViolation::VacantSlot { node: id }),
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeId(i), node)))
    }

    pub(crate) fn height_of(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |id| self.get(id).height)
    }

    pub(crate) fn size_of(&self, id: Option<NodeId>) -> usize {
        id.map_or(0, |id| self.get(id).tree_size)
    }

    pub(crate) fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.get(id).child(side)
    }

    /// Points `id`'s `side` slot at `child` and `child`'s parent link back at `id`.
    pub(crate) fn set_child(&mut self, id: NodeId, side: Side, child: Option<NodeId>) {
        let node = self.get_mut(id);
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
        }
        if let Some(child) = child {
            self.get_mut(child).parent = Some(id);
        }
    }

    /// Which slot of `parent` holds `child`.
    pub(crate) fn side_of(&self, parent: NodeId, child: NodeId) -> Side {
        let node = self.get(parent);
        if node.left == Some(child) {
            Side::Left
        } else if node.right == Some(child) {
            Side::Right
        } else {
            corrupted!(InvariantViolation::ParentLink {
                node: parent,
                child,
                found: self.get(child).parent,
            })
        }
    }

    /// Puts `new` where `old` used to hang below `parent`. With no parent, `new` becomes a
    /// root and only its parent link is cleared.
    pub(crate) fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: NodeId) {
        match parent {
            Some(parent) => {
                let side = self.side_of(parent, old);
                self.set_child(parent, side, Some(new));
            }
            None => self.get_mut(new).parent = None,
        }
    }

    /// Recomputes height and size from the children and marks both lengths stale.
    pub(crate) fn refresh(&mut self, id: NodeId) {
        let (left, right) = {
            let node = self.get(id);
            (node.left, node.right)
        };
        let height = 1 + cmp::max(self.height_of(left), self.height_of(right));
        let tree_size = 1 + self.size_of(left) + self.size_of(right);
        let node = self.get_mut(id);
        node.height = height;
        node.tree_size = tree_size;
        node.invalidate_length();
        node.invalidate_tree_length();
    }

    pub(crate) fn balance(&self, id: NodeId) -> i64 {
        let node = self.get(id);
        i64::from(self.height_of(node.left)) - i64::from(self.height_of(node.right))
    }

    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.get(id).left {
            id = left;
        }
        id
    }

    /// In-order successor, climbing parent links when there is no right subtree.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.get(id).right {
            return Some(self.leftmost(right));
        }
        let mut child = id;
        let mut parent = self.get(id).parent;
        while let Some(p) = parent {
            if self.get(p).left == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.get(p).parent;
        }
        None
    }

    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.get(id).right {
            id = right;
        }
        id
    }

    /// In-order predecessor; the mirror of [`Self::successor`].
    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.get(id).left {
            return Some(self.rightmost(left));
        }
        let mut child = id;
        let mut parent = self.get(id).parent;
        while let Some(p) = parent {
            if self.get(p).right == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.get(p).parent;
        }
        None
    }

    pub(crate) fn swap_items(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (lo, hi) = if a.0 < b.0 { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi.0);
        match (head[lo.0].as_mut(), tail[0].as_mut()) {
            (Some(x), Some(y)) => mem::swap(&mut x.item, &mut y.item),
            (None, _) => corrupted!(InvariantViolation::VacantSlot { node: lo }),
            (_, None) => corrupted!(InvariantViolation::VacantSlot { node: hi }),
        }
    }
}
