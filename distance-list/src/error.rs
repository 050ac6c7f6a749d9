use thiserror::Error;

use crate::node::NodeId;

/// A broken structural invariant inside a [`crate::DistanceList`].
///
/// This never describes a caller mistake: out-of-range ranks and offsets are reported as
/// `false`/`None` by the regular API. An `InvariantViolation` means the tree itself is
/// corrupted. [`crate::DistanceList::validate`] returns it; internal traversals panic with its
/// message when they hit a missing link.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("distance list corrupted: node {node} refers to a vacant arena slot")]
    VacantSlot { node: NodeId },

    #[error("distance list corrupted: root node {node} has a parent link")]
    RootHasParent { node: NodeId },

    #[error("distance list corrupted: child {child} of node {node} points back to {found:?}")]
    ParentLink {
        node: NodeId,
        child: NodeId,
        found: Option<NodeId>,
    },

    #[error("distance list corrupted: node {node} has tree size {found}, expected {expected}")]
    TreeSize {
        node: NodeId,
        expected: usize,
        found: usize,
    },

    #[error("distance list corrupted: node {node} has height {found}, expected {expected}")]
    Height {
        node: NodeId,
        expected: u32,
        found: u32,
    },

    #[error("distance list corrupted: node {node} caches length {cached}, measurer gives {measured}")]
    Length {
        node: NodeId,
        cached: f64,
        measured: f64,
    },

    #[error(
        "distance list corrupted: node {node} caches tree length {cached}, subtree sums to {expected}"
    )]
    TreeLength {
        node: NodeId,
        cached: f64,
        expected: f64,
    },

    #[error("distance list corrupted: {reachable} nodes reachable from the root, {occupied} slots occupied")]
    Unreachable { reachable: usize, occupied: usize },
}
