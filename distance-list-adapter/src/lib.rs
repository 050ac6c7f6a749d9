//! Adapter utilities for the `distance-list` crate.
//!
//! The `distance-list` crate only knows ranks, offsets and lengths. This crate provides the
//! small, framework-neutral pieces a virtualized list view needs on top of it:
//!
//! - Viewport bookkeeping: scroll offset, extent, overscan, and the window of items to render
//! - Scroll anchoring (e.g. prepend in chat/timelines without visual jumps)
//!
//! This crate is intentionally framework-agnostic (no DOM/TUI bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod types;
mod viewport;


pub use anchor::{ScrollAnchor, apply_anchor, capture_first_visible_anchor};
pub use types::Align;
pub use viewport::Viewport;
