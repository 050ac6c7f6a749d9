/// The result of a rank or distance query.
///
/// `outer_distance` is the cumulative length of every item before this one. For distance
/// queries, `inner_distance` is how far into this item's own span the queried offset falls;
/// rank queries always report `0`.
#[derive(Debug, PartialEq)]
pub struct ItemInfo<'a, T> {
    pub index: usize,
    pub item: &'a T,
    pub length: f64,
    pub inner_distance: f64,
    pub outer_distance: f64,
}

impl<T> Clone for ItemInfo<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ItemInfo<'_, T> {}

impl<T> ItemInfo<'_, T> {
    /// Offset just past this item (`outer_distance + length`).
    pub fn end(&self) -> f64 {
        self.outer_distance + self.length
    }

    /// The offset that was queried (`outer_distance + inner_distance`).
    pub fn distance(&self) -> f64 {
        self.outer_distance + self.inner_distance
    }
}
