use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::node::{Arena, Cached, NodeId, Side};

pub(crate) type MeasureFn<T> = dyn Fn(&T) -> f64 + Send + Sync;

/// Where a query landed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Position {
    pub(crate) node: NodeId,
    pub(crate) index: usize,
    pub(crate) length: f64,
    pub(crate) outer_distance: f64,
    pub(crate) inner_distance: f64,
}

/// Clamps a measurer result to a non-negative finite length.
pub(crate) fn sanitize(length: f64) -> f64 {
    if length.is_finite() && length >= 0.0 {
        length
    } else {
        dwarn!(length, "measurer returned an invalid length; using 0");
        0.0
    }
}

/// Read access to the tree with lazy, memoized length computation.
pub(crate) struct Measure<'a, T> {
    arena: &'a Arena<T>,
    measurer: &'a MeasureFn<T>,
}

impl<'a, T> Measure<'a, T> {
    pub(crate) fn new(arena: &'a Arena<T>, measurer: &'a MeasureFn<T>) -> Self {
        Self { arena, measurer }
    }

    pub(crate) fn length(&self, id: NodeId) -> f64 {
        let node = self.arena.get(id);
        if let Some(length) = node.length.get().valid() {
            return length;
        }
        let length = sanitize((self.measurer)(&node.item));
        node.length.set(Cached::Valid(length));
        length
    }

    pub(crate) fn tree_length_of(&self, id: Option<NodeId>) -> f64 {
        id.map_or(0.0, |id| self.tree_length(id))
    }

    /// Cumulative length of the subtree at `id`.
    ///
    /// Only the invalid part of the subtree is visited, bottom-up with an explicit stack, so a
    /// cold read costs `O(subtree size)` and a warm one `O(1)`.
    pub(crate) fn tree_length(&self, id: NodeId) -> f64 {
        if let Some(total) = self.arena.get(id).tree_length.get().valid() {
            return total;
        }

        let mut stack = Vec::new();
        stack.push((id, false));
        while let Some((cur, expanded)) = stack.pop() {
            let node = self.arena.get(cur);
            if node.tree_length.get().valid().is_some() {
                continue;
            }
            if !expanded {
                stack.push((cur, true));
                for child in [node.left, node.right].into_iter().flatten() {
                    stack.push((child, false));
                }
                continue;
            }
            let total =
                self.length(cur) + self.tree_length_of(node.left) + self.tree_length_of(node.right);
            node.tree_length.set(Cached::Valid(total));
        }

        self.tree_length_of(Some(id))
    }

    pub(crate) fn locate_index(&self, root: NodeId, index: usize) -> Option<Position> {
        let mut cur = root;
        let mut rank = index;
        let mut outer_distance = 0.0;
        loop {
            let node = self.arena.get(cur);
            let left_size = self.arena.size_of(node.left);
            match rank.cmp(&left_size) {
                Ordering::Less => cur = node.left?,
                Ordering::Equal => {
                    outer_distance += self.tree_length_of(node.left);
                    return Some(Position {
                        node: cur,
                        index,
                        length: self.length(cur),
                        outer_distance,
                        inner_distance: 0.0,
                    });
                }
                Ordering::Greater => {
                    outer_distance += self.tree_length_of(node.left) + self.length(cur);
                    rank -= left_size + 1;
                    cur = node.right?;
                }
            }
        }
    }

    pub(crate) fn locate_distance(&self, root: NodeId, distance: f64) -> Option<Position> {
        let mut cur = root;
        let mut remaining = distance;
        let mut outer_distance = 0.0;
        let mut rank = 0usize;
        loop {
            let node = self.arena.get(cur);
            let left_length = self.tree_length_of(node.left);
            if remaining < left_length {
                cur = node.left?;
                continue;
            }

            let length = self.length(cur);
            let left_size = self.arena.size_of(node.left);
            remaining -= left_length;
            if remaining < length {
                let outer_distance = outer_distance + left_length;
                return Some(Position {
                    node: cur,
                    index: rank + left_size,
                    length,
                    outer_distance,
                    inner_distance: (distance - outer_distance).max(0.0),
                });
            }

            remaining -= length;
            outer_distance += left_length + length;
            rank += left_size + 1;
            match node.right {
                Some(right) => cur = right,
                // Summing top-down rounds differently from the cached bottom-up totals, so an
                // offset just below the total can run off the right edge.
                None => return self.last_covering(cur, rank - 1, outer_distance, distance),
            }
        }
    }

    /// The last item with a positive length at or before `id`, which ends at `end`.
    fn last_covering(
        &self,
        mut id: NodeId,
        mut index: usize,
        end: f64,
        distance: f64,
    ) -> Option<Position> {
        loop {
            let length = self.length(id);
            if length > 0.0 {
                let outer_distance = end - length;
                let mut inner_distance = (distance - outer_distance).max(0.0);
                if inner_distance >= length {
                    inner_distance = length * (1.0 - f64::EPSILON);
                }
                return Some(Position {
                    node: id,
                    index,
                    length,
                    outer_distance,
                    inner_distance,
                });
            }
            id = self.arena.predecessor(id)?;
            index = index.checked_sub(1)?;
        }
    }
}

impl<T> Arena<T> {
    /// Node at `index` in sequence order, without touching any length cache.
    pub(crate) fn node_at(&self, root: NodeId, index: usize) -> Option<NodeId> {
        let mut cur = root;
        let mut rank = index;
        loop {
            let node = self.get(cur);
            let left_size = self.size_of(node.left);
            match rank.cmp(&left_size) {
                Ordering::Less => cur = node.left?,
                Ordering::Equal => return Some(cur),
                Ordering::Greater => {
                    rank -= left_size + 1;
                    cur = node.right?;
                }
            }
        }
    }

    /// The empty child slot a new leaf must occupy to end up at `index` (`index <= size`).
    pub(crate) fn insertion_point(&self, root: NodeId, index: usize) -> (NodeId, Side) {
        let mut cur = root;
        let mut rank = index;
        loop {
            let node = self.get(cur);
            let left_size = self.size_of(node.left);
            if rank <= left_size {
                match node.left {
                    Some(left) => cur = left,
                    None => return (cur, Side::Left),
                }
            } else {
                rank -= left_size + 1;
                match node.right {
                    Some(right) => cur = right,
                    None => return (cur, Side::Right),
                }
            }
        }
    }
}
