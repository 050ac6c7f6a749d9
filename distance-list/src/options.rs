use alloc::sync::Arc;

use crate::RotationTable;

/// Maps an item to its length along the measured axis.
///
/// Must be deterministic between invalidations and return a non-negative finite number;
/// anything else is treated as `0`.
pub type Measurer<T> = Arc<dyn Fn(&T) -> f64 + Send + Sync>;

/// Configuration for [`crate::DistanceList`].
///
/// The measurer is fixed once the list is built. Cloning is cheap: the measurer is shared
/// through an `Arc`.
pub struct DistanceListOptions<T> {
    pub measurer: Measurer<T>,
    /// Balance-factor to rotation mapping used after every insert and delete.
    pub rotation_table: RotationTable,
    /// Number of nodes to reserve up front.
    pub capacity: usize,
}

impl<T> Clone for DistanceListOptions<T> {
    fn clone(&self) -> Self {
        Self {
            measurer: Arc::clone(&self.measurer),
            rotation_table: self.rotation_table,
            capacity: self.capacity,
        }
    }
}

impl<T> DistanceListOptions<T> {
    pub fn new(measurer: impl Fn(&T) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            measurer: Arc::new(measurer),
            rotation_table: RotationTable::default(),
            capacity: 0,
        }
    }

    pub fn with_rotation_table(mut self, rotation_table: RotationTable) -> Self {
        self.rotation_table = rotation_table;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl<T> core::fmt::Debug for DistanceListOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DistanceListOptions")
            .field("rotation_table", &self.rotation_table)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
