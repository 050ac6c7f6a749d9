use crate::Viewport;

/// A scroll anchor that can be used to preserve visual position across data changes.
///
/// Typical use cases:
/// - chat/timeline "prepend" (load older messages above) without content jumping
/// - rows above the viewport growing or shrinking after a re-measure
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor {
    pub index: usize,
    /// The distance from the anchor item's start to the viewport's scroll offset.
    pub offset_in_item: f64,
}

/// Captures an anchor for the item covering the scroll offset.
///
/// Returns `None` if the list is empty or the offset is past its end.
pub fn capture_first_visible_anchor<T>(v: &Viewport<T>) -> Option<ScrollAnchor> {
    let info = v.list().get_by_distance(v.scroll_offset())?;
    Some(ScrollAnchor {
        index: info.index,
        offset_in_item: info.inner_distance,
    })
}

/// Applies a previously captured anchor by adjusting the scroll offset.
///
/// `remap_index` translates the anchor's rank into the rank the same item has *now* (for
/// example `i + 1` after one insert above it). If the item shrank, the offset is capped at
/// its new length.
///
/// Returns `true` when the anchor was successfully applied.
pub fn apply_anchor<T>(
    v: &mut Viewport<T>,
    anchor: &ScrollAnchor,
    mut remap_index: impl FnMut(usize) -> Option<usize>,
) -> bool {
    let Some(index) = remap_index(anchor.index) else {
        return false;
    };
    let Some(target) = v
        .list()
        .get_by_index(index)
        .map(|info| info.outer_distance + anchor.offset_in_item.min(info.length))
    else {
        return false;
    };
    v.set_scroll_offset(target);
    true
}
