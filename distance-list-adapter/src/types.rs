/// Where a scrolled-to item should end up inside the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    /// Don't move if the item is fully visible; otherwise scroll the least amount.
    Auto,
}
