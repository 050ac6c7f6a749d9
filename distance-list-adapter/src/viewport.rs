use alloc::vec::Vec;
use core::ops::Range;

use distance_list::{DistanceList, ItemInfo};

use crate::{Align, ScrollAnchor, apply_anchor, capture_first_visible_anchor};

/// A framework-neutral viewport over a [`DistanceList`].
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `set_extent` / `set_scroll_offset` when UI events occur
/// - `for_each_visible_item` / `for_each_virtual_item` (or the `collect_*` variants) when
///   rendering
///
/// Mutations made through the viewport (`insert`, `delete_by_index`, `remeasure`) keep the
/// first visible item steady when the change happens above it. Mutations made through
/// [`Viewport::list_mut`] don't touch the scroll offset.
#[derive(Clone, Debug)]
pub struct Viewport<T> {
    list: DistanceList<T>,
    scroll_offset: f64,
    extent: f64,
    overscan: usize,
}

fn sanitize_extent(extent: f64) -> f64 {
    if extent.is_finite() && extent > 0.0 {
        extent
    } else {
        0.0
    }
}

impl<T> Viewport<T> {
    pub fn new(list: DistanceList<T>) -> Self {
        adebug!(size = list.size(), "viewport created");
        Self {
            list,
            scroll_offset: 0.0,
            extent: 0.0,
            overscan: 1,
        }
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn list(&self) -> &DistanceList<T> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut DistanceList<T> {
        &mut self.list
    }

    pub fn into_list(self) -> DistanceList<T> {
        self.list
    }

    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Sets the visible length of the viewport. Invalid values count as an empty viewport.
    pub fn set_extent(&mut self, extent: f64) {
        self.extent = sanitize_extent(extent);
        self.scroll_offset = self.clamp_scroll_offset(self.scroll_offset);
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn max_scroll_offset(&self) -> f64 {
        (self.list.total_length() - self.extent).max(0.0)
    }

    pub fn clamp_scroll_offset(&self, offset: f64) -> f64 {
        if offset.is_nan() {
            return 0.0;
        }
        offset.clamp(0.0, self.max_scroll_offset())
    }

    /// Scrolls to `offset`, clamped to the scrollable range. Returns the applied offset.
    pub fn set_scroll_offset(&mut self, offset: f64) -> f64 {
        self.scroll_offset = self.clamp_scroll_offset(offset);
        atrace!(requested = offset, applied = self.scroll_offset, "scroll");
        self.scroll_offset
    }

    /// Ranks of the items overlapping `[scroll_offset, scroll_offset + extent)`.
    pub fn visible_range(&self) -> Range<usize> {
        let size = self.list.size();
        if self.extent <= 0.0 {
            return 0..0;
        }
        let Some(first) = self.list.get_by_distance(self.scroll_offset) else {
            return size..size;
        };

        let window_end = self.scroll_offset + self.extent;
        let mut end = first.index + 1;
        let mut next_start = first.end();
        while end < size && next_start < window_end {
            let Some(info) = self.list.get_by_index(end) else {
                break;
            };
            next_start = info.end();
            end += 1;
        }
        first.index..end
    }

    /// The visible range widened by `overscan` items on each side.
    pub fn virtual_range(&self) -> Range<usize> {
        let visible = self.visible_range();
        if visible.is_empty() {
            return visible;
        }
        let start = visible.start.saturating_sub(self.overscan);
        let end = visible
            .end
            .saturating_add(self.overscan)
            .min(self.list.size());
        start..end
    }

    pub fn for_each_visible_item<'a>(&'a self, f: impl FnMut(ItemInfo<'a, T>)) {
        self.for_each_in(self.visible_range(), f);
    }

    pub fn for_each_virtual_item<'a>(&'a self, f: impl FnMut(ItemInfo<'a, T>)) {
        self.for_each_in(self.virtual_range(), f);
    }

    /// Clears `out` and fills it with the items of [`Viewport::visible_range`].
    pub fn collect_visible_items<'a>(&'a self, out: &mut Vec<ItemInfo<'a, T>>) {
        out.clear();
        self.for_each_visible_item(|info| out.push(info));
    }

    /// Clears `out` and fills it with the items of [`Viewport::virtual_range`].
    pub fn collect_virtual_items<'a>(&'a self, out: &mut Vec<ItemInfo<'a, T>>) {
        out.clear();
        self.for_each_virtual_item(|info| out.push(info));
    }

    fn for_each_in<'a>(&'a self, range: Range<usize>, mut f: impl FnMut(ItemInfo<'a, T>)) {
        // Subsequent ranks are cheap once the window's first descent warmed the caches.
        for index in range {
            if let Some(info) = self.list.get_by_index(index) {
                f(info);
            }
        }
    }

    /// The clamped scroll offset that brings item `index` into view, or `None` if there is no
    /// such item.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> Option<f64> {
        let item = self.list.get_by_index(index)?;
        let start = item.outer_distance;
        let end = item.end();
        let target = match align {
            Align::Start => start,
            Align::End => end - self.extent,
            Align::Center => start + item.length / 2.0 - self.extent / 2.0,
            Align::Auto => {
                let current = self.scroll_offset;
                if start >= current && end <= current + self.extent {
                    current
                } else if start < current {
                    start
                } else {
                    end - self.extent
                }
            }
        };
        Some(self.clamp_scroll_offset(target))
    }

    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> Option<f64> {
        let offset = self.scroll_to_index_offset(index, align)?;
        Some(self.set_scroll_offset(offset))
    }

    pub fn capture_first_visible_anchor(&self) -> Option<ScrollAnchor> {
        capture_first_visible_anchor(self)
    }

    pub fn apply_anchor(
        &mut self,
        anchor: &ScrollAnchor,
        remap_index: impl FnMut(usize) -> Option<usize>,
    ) -> bool {
        apply_anchor(self, anchor, remap_index)
    }

    /// Inserts `item` at rank `index`, keeping the first visible item in place if the new
    /// item lands above the scroll offset.
    pub fn insert(&mut self, index: usize, item: T) -> bool {
        let anchor = self.anchor_if_above(index);
        if !self.list.insert(index, item) {
            return false;
        }
        if let Some(anchor) = anchor {
            self.apply_anchor(&anchor, |i| Some(if i >= index { i + 1 } else { i }));
            atrace!(index, offset = self.scroll_offset, "anchored insert");
        }
        true
    }

    pub fn append(&mut self, item: T) {
        self.list.append(item);
    }

    /// Removes the item at rank `index`, keeping the first visible item in place if the removed
    /// item starts above the scroll offset.
    pub fn delete_by_index(&mut self, index: usize) -> Option<T> {
        let anchor = self.anchor_if_above(index);
        let removed = self.list.delete_by_index(index)?;
        if let Some(anchor) = anchor {
            // The anchor item itself is gone; its successor slides into its start.
            let anchor = if anchor.index == index {
                ScrollAnchor {
                    index,
                    offset_in_item: 0.0,
                }
            } else {
                anchor
            };
            self.apply_anchor(&anchor, |i| Some(if i > index { i - 1 } else { i }));
            atrace!(index, offset = self.scroll_offset, "anchored delete");
        }
        self.scroll_offset = self.clamp_scroll_offset(self.scroll_offset);
        Some(removed)
    }

    /// Re-measures item `index` and returns the length delta.
    ///
    /// An item entirely above the scroll offset shifts the offset by the delta. When the offset
    /// falls inside the item, its position within the item is kept, capped at the new length.
    pub fn remeasure(&mut self, index: usize) -> Option<f64> {
        let (start, previous) = {
            let info = self.list.get_by_index(index)?;
            (info.outer_distance, info.length)
        };
        let delta = self.list.remeasure(index)?;
        let offset = if start < self.scroll_offset {
            let offset_in_item = self.scroll_offset - start;
            if offset_in_item < previous {
                start + offset_in_item.min(previous + delta)
            } else {
                self.scroll_offset + delta
            }
        } else {
            self.scroll_offset
        };
        self.scroll_offset = self.clamp_scroll_offset(offset);
        Some(delta)
    }

    fn anchor_if_above(&self, index: usize) -> Option<ScrollAnchor> {
        let start = match self.list.get_by_index(index) {
            Some(info) => info.outer_distance,
            None => self.list.total_length(),
        };
        if start < self.scroll_offset {
            self.capture_first_visible_anchor()
        } else {
            None
        }
    }
}
