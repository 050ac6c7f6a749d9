use alloc::vec;
use alloc::vec::Vec;
use core::cmp;
use core::iter::FusedIterator;

use crate::node::{Arena, Node, NodeId};
use crate::query::{Measure, Position, sanitize};
use crate::{DistanceListOptions, InvariantViolation, ItemInfo, TreeStats};

/// An ordered sequence of items with measured lengths, indexed both by rank and by
/// cumulative distance.
///
/// Backed by a self-balancing binary tree keyed implicitly by position: every node caches
/// its subtree size eagerly and its own/subtree length lazily, so both
/// [`Self::get_by_index`] and [`Self::get_by_distance`] descend a single root-to-node path.
/// That path is `O(log n)` only under [`crate::RotationTable::Avl`].
///
/// Lengths come from the measurer given at construction. When an item's length changes
/// behind the list's back, call [`Self::invalidate_length`] (or [`Self::remeasure`]); the
/// new value is picked up on the next read.
///
/// Queries take `&self` and memoize lengths through interior mutability, so the list is
/// `Send` but not `Sync`.
#[derive(Clone, Debug)]
pub struct DistanceList<T> {
    options: DistanceListOptions<T>,
    arena: Arena<T>,
    root: Option<NodeId>,
}

impl<T> DistanceList<T> {
    /// Creates an empty list with default options.
    ///
    /// The default is [`crate::RotationTable::Verbatim`], whose height is not logarithmic. Use
    /// [`Self::with_options`] with [`crate::RotationTable::Avl`] for large append-only lists.
    pub fn new(measurer: impl Fn(&T) -> f64 + Send + Sync + 'static) -> Self {
        Self::with_options(DistanceListOptions::new(measurer))
    }

    /// Creates an empty list. Operations are `O(log n)` when `options` selects
    /// [`crate::RotationTable::Avl`].
    pub fn with_options(options: DistanceListOptions<T>) -> Self {
        ddebug!(
            rotation_table = ?options.rotation_table,
            capacity = options.capacity,
            "DistanceList::new"
        );
        Self {
            arena: Arena::with_capacity(options.capacity),
            options,
            root: None,
        }
    }

    pub fn options(&self) -> &DistanceListOptions<T> {
        &self.options
    }

    /// Number of items.
    pub fn size(&self) -> usize {
        self.arena.size_of(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Sum of every item's length. Measures whatever is not cached yet.
    pub fn total_length(&self) -> f64 {
        self.measure().tree_length_of(self.root)
    }

    /// Height of the underlying tree (`0` when empty).
    pub fn height(&self) -> u32 {
        self.arena.height_of(self.root)
    }

    /// Inserts `item` so that it ends up at rank `index`.
    ///
    /// Returns `false` (and drops `item`) when `index > size()`; the list is left untouched.
    pub fn insert(&mut self, index: usize, item: T) -> bool {
        let size = self.size();
        if index > size {
            dtrace!(index, size, "insert: index out of range");
            return false;
        }

        let Some(root) = self.root else {
            self.root = Some(self.arena.alloc(Node::leaf(item, None)));
            return true;
        };

        let (parent, side) = self.arena.insertion_point(root, index);
        let leaf = self.arena.alloc(Node::leaf(item, Some(parent)));
        self.arena.set_child(parent, side, Some(leaf));
        self.root = Some(self.arena.rebalance(leaf, self.options.rotation_table));
        dtrace!(index, size = size + 1, height = self.height(), "insert");
        true
    }

    /// Inserts `item` after the last item.
    pub fn append(&mut self, item: T) {
        let index = self.size();
        self.insert(index, item);
    }

    /// Removes the item at rank `index` and returns it. Later items move down one rank.
    pub fn delete_by_index(&mut self, index: usize) -> Option<T> {
        let node = self.node_at(index)?;
        dtrace!(index, "delete_by_index");
        Some(self.remove_node(node))
    }

    /// Removes the item covering cumulative offset `distance` and returns it.
    ///
    /// Misses (negative, non-finite or past-the-end offsets) return `None`.
    pub fn delete_by_distance(&mut self, distance: f64) -> Option<T> {
        let position = self.locate_distance(distance)?;
        dtrace!(distance, index = position.index, "delete_by_distance");
        Some(self.remove_node(position.node))
    }

    /// Marks the length of the item at `index` as out of date.
    ///
    /// The item and all of its ancestors are re-aggregated on the next read. Heights and sizes
    /// are not affected. Returns `false` when `index` is out of range.
    pub fn invalidate_length(&mut self, index: usize) -> bool {
        let Some(node) = self.node_at(index) else {
            return false;
        };
        dtrace!(index, "invalidate_length");
        self.invalidate_node(node);
        true
    }

    /// Invalidates and immediately re-measures the item at `index`.
    ///
    /// Returns the change in length (`current - previous`). An item that was never measured
    /// counts as having had length `0`.
    pub fn remeasure(&mut self, index: usize) -> Option<f64> {
        let node = self.node_at(index)?;
        let previous = self.arena.get(node).length.get().previous().unwrap_or(0.0);
        self.invalidate_node(node);
        let current = self.measure().length(node);
        dtrace!(index, previous, current, "remeasure");
        Some(current - previous)
    }

    /// Mutates the item at `index` in place and invalidates its length.
    pub fn update(&mut self, index: usize, f: impl FnOnce(&mut T)) -> bool {
        let Some(node) = self.node_at(index) else {
            return false;
        };
        f(&mut self.arena.get_mut(node).item);
        self.invalidate_node(node);
        true
    }

    pub fn clear(&mut self) {
        ddebug!(size = self.size(), "clear");
        self.arena.clear();
        self.root = None;
    }

    /// The item at `index`, without measuring anything.
    pub fn get(&self, index: usize) -> Option<&T> {
        let node = self.node_at(index)?;
        Some(&self.arena.get(node).item)
    }

    /// Looks up the item at rank `index`.
    ///
    /// `outer_distance` is the total length of the items before it; `inner_distance` is `0`.
    pub fn get_by_index(&self, index: usize) -> Option<ItemInfo<'_, T>> {
        let root = self.root?;
        if index >= self.size() {
            return None;
        }
        let position = self.measure().locate_index(root, index)?;
        Some(self.info(position))
    }

    /// Looks up the item whose span `[outer_distance, outer_distance + length)` contains
    /// `distance`.
    ///
    /// Returns `None` for negative or non-finite offsets and for `distance >= total_length()`.
    /// Zero-length items are never returned.
    pub fn get_by_distance(&self, distance: f64) -> Option<ItemInfo<'_, T>> {
        let position = self.locate_distance(distance)?;
        Some(self.info(position))
    }

    /// Iterates over the items in sequence order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            arena: &self.arena,
            next: self.root.map(|root| self.arena.leftmost(root)),
            remaining: self.size(),
        }
    }

    /// Scans the arena for a structural summary. Nothing is measured.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            size: self.size(),
            height: self.height(),
            slots: self.arena.slot_count(),
            free_slots: self.arena.free_count(),
            ..TreeStats::default()
        };
        for (_, node) in self.arena.iter() {
            if node.length.get().valid().is_some() {
                stats.measured += 1;
            }
            if node.tree_length.get().valid().is_some() {
                stats.aggregated += 1;
            }
        }
        stats
    }

    /// Audits every structural invariant: parent links, subtree sizes, heights, and every
    /// cached length against a fresh measurement.
    ///
    /// Calls the measurer once per item and leaves all caches untouched.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            return match self.arena.len() {
                0 => Ok(()),
                occupied => Err(InvariantViolation::Unreachable {
                    reachable: 0,
                    occupied,
                }),
            };
        };
        let root_node = self.node_checked(root)?;
        if root_node.parent.is_some() {
            return Err(InvariantViolation::RootHasParent { node: root });
        }

        // Pre-order walk; reversed, every node comes after its descendants.
        let mut order = Vec::with_capacity(self.arena.len());
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node_checked(id)?;
            for child in [node.left, node.right].into_iter().flatten() {
                let found = self.node_checked(child)?.parent;
                if found != Some(id) {
                    return Err(InvariantViolation::ParentLink {
                        node: id,
                        child,
                        found,
                    });
                }
                stack.push(child);
            }
            order.push(id);
            if order.len() > self.arena.len() {
                return Err(InvariantViolation::Unreachable {
                    reachable: order.len(),
                    occupied: self.arena.len(),
                });
            }
        }
        if order.len() != self.arena.len() {
            return Err(InvariantViolation::Unreachable {
                reachable: order.len(),
                occupied: self.arena.len(),
            });
        }

        // (height, size, subtree length) per slot, filled bottom-up.
        let mut expected: Vec<Option<Expected>> = vec![None; self.arena.slot_count()];
        let lookup = |expected: &[Option<Expected>], id: Option<NodeId>| {
            id.and_then(|id| expected[id.index()]).unwrap_or((0, 0, 0.0))
        };
        for &id in order.iter().rev() {
            let node = self.arena.get(id);
            let (left_height, left_size, left_length) = lookup(expected.as_slice(), node.left);
            let (right_height, right_size, right_length) = lookup(expected.as_slice(), node.right);

            let height = 1 + cmp::max(left_height, right_height);
            if node.height != height {
                return Err(InvariantViolation::Height {
                    node: id,
                    expected: height,
                    found: node.height,
                });
            }
            let size = 1 + left_size + right_size;
            if node.tree_size != size {
                return Err(InvariantViolation::TreeSize {
                    node: id,
                    expected: size,
                    found: node.tree_size,
                });
            }

            let measured = sanitize((self.options.measurer)(&node.item));
            if let Some(cached) = node.length.get().valid() {
                if !approx_eq(cached, measured) {
                    return Err(InvariantViolation::Length {
                        node: id,
                        cached,
                        measured,
                    });
                }
            }
            let total = measured + left_length + right_length;
            if let Some(cached) = node.tree_length.get().valid() {
                if !approx_eq(cached, total) {
                    return Err(InvariantViolation::TreeLength {
                        node: id,
                        cached,
                        expected: total,
                    });
                }
            }
            expected[id.index()] = Some((height, size, total));
        }
        Ok(())
    }

    fn measure(&self) -> Measure<'_, T> {
        Measure::new(&self.arena, &*self.options.measurer)
    }

    fn info(&self, position: Position) -> ItemInfo<'_, T> {
        ItemInfo {
            index: position.index,
            item: &self.arena.get(position.node).item,
            length: position.length,
            inner_distance: position.inner_distance,
            outer_distance: position.outer_distance,
        }
    }

    fn node_checked(&self, id: NodeId) -> Result<&Node<T>, InvariantViolation> {
        self.arena
            .try_get(id)
            .ok_or(InvariantViolation::VacantSlot { node: id })
    }

    fn node_at(&self, index: usize) -> Option<NodeId> {
        let root = self.root?;
        if index >= self.size() {
            return None;
        }
        self.arena.node_at(root, index)
    }

    fn locate_distance(&self, distance: f64) -> Option<Position> {
        let root = self.root?;
        if !distance.is_finite() || distance < 0.0 {
            return None;
        }
        let measure = self.measure();
        if distance >= measure.tree_length(root) {
            return None;
        }
        measure.locate_distance(root, distance)
    }

    fn invalidate_node(&self, node: NodeId) {
        self.arena.get(node).invalidate_length();
        let mut cur = Some(node);
        while let Some(id) = cur {
            let node = self.arena.get(id);
            node.invalidate_tree_length();
            cur = node.parent;
        }
    }

    /// Splices `node` out of the tree and rebalances from its former parent.
    ///
    /// A node with two children trades items with its in-order successor, which has no left
    /// child and is removed in its place.
    fn remove_node(&mut self, node: NodeId) -> T {
        let target = {
            let n = self.arena.get(node);
            match (n.left, n.right) {
                (Some(_), Some(right)) => {
                    let successor = self.arena.leftmost(right);
                    self.arena.swap_items(node, successor);
                    successor
                }
                _ => node,
            }
        };

        let (parent, child) = {
            let n = self.arena.get(target);
            (n.parent, n.left.or(n.right))
        };
        match (parent, child) {
            (Some(parent), child) => {
                let side = self.arena.side_of(parent, target);
                self.arena.set_child(parent, side, child);
            }
            (None, Some(child)) => self.arena.get_mut(child).parent = None,
            (None, None) => {}
        }

        let removed = self.arena.release(target);
        self.root = match parent {
            Some(parent) => Some(self.arena.rebalance(parent, self.options.rotation_table)),
            None => child,
        };
        removed.item
    }
}

/// Height, size and subtree length recomputed by [`DistanceList::validate`].
type Expected = (u32, usize, f64);

fn approx_eq(a: f64, b: f64) -> bool {
    let diff = if a > b { a - b } else { b - a };
    let scale = if a > b { a } else { b };
    diff <= 1e-9 * scale.max(1.0)
}

impl<T> Extend<T> for DistanceList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.append(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a DistanceList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a [`DistanceList`], following parent links between subtrees.
pub struct Iter<'a, T> {
    arena: &'a Arena<T>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.arena.successor(id);
        self.remaining = self.remaining.saturating_sub(1);
        Some(&self.arena.get(id).item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
