//! An order-statistics tree over items with externally measured, variable lengths.
//!
//! [`DistanceList`] keeps a sequence of items (rows, lines, cells...) and answers two dual
//! questions by descending a single root-to-node path:
//! - which item sits at rank `i`, and how far from the start it begins
//!   ([`DistanceList::get_by_index`]);
//! - which item covers cumulative offset `d`, and where inside it `d` falls
//!   ([`DistanceList::get_by_distance`]).
//!
//! Lengths come from a caller-supplied measurer and are memoized per node and per subtree.
//! They are recomputed lazily after [`DistanceList::invalidate_length`], so a long,
//! variable-sized list can be virtualized without re-scanning it on every scroll event.
//!
//! The path length depends on the [`RotationTable`]. With [`RotationTable::Avl`] it is
//! `O(log n)`. The default [`RotationTable::Verbatim`] keeps the historical rotation rules,
//! which leave append-only or prepend-only workloads as an `O(n)` spine; pick `Avl` for large
//! lists built that way.
//!
//! It is UI-agnostic. For viewport bookkeeping and scroll anchoring, see the
//! `distance-list-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod balance;
mod error;
mod list;
mod node;
mod options;
mod query;
mod rotate;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use balance::RotationTable;
pub use error::InvariantViolation;
pub use list::{DistanceList, Iter};
pub use node::NodeId;
pub use options::{DistanceListOptions, Measurer};
pub use state::TreeStats;
pub use types::ItemInfo;
