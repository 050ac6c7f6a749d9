/// A structural snapshot of a [`crate::DistanceList`].
///
/// Computing it scans the arena once; nothing is measured.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeStats {
    pub size: usize,
    pub height: u32,
    /// Arena slots allocated so far, occupied or not.
    pub slots: usize,
    /// Vacant slots waiting to be reused by the next insert.
    pub free_slots: usize,
    /// Nodes whose own length is currently cached.
    pub measured: usize,
    /// Nodes whose subtree length is currently cached.
    pub aggregated: usize,
}
