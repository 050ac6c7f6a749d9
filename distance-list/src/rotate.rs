use crate::node::{Arena, NodeId, Side};

/// The four structural moves used by the rebalance walk.
///
/// Rotations only relink nodes. Heights, sizes and lengths of the moved nodes are refreshed
/// by the caller afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rotation {
    LeftLeft,
    LeftRight,
    RightRight,
    RightLeft,
}

impl Rotation {
    pub(crate) fn is_double(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }
}

impl<T> Arena<T> {
    /// Applies `rotation` at `z` and returns the new subtree root, which has taken `z`'s place
    /// under `z`'s former parent.
    ///
    /// Returns `None` and leaves the tree untouched when the nodes the rotation pivots on are
    /// absent.
    pub(crate) fn rotate(&mut self, z: NodeId, rotation: Rotation) -> Option<NodeId> {
        match rotation {
            Rotation::LeftLeft => self.rotate_single(z, Side::Left),
            Rotation::RightRight => self.rotate_single(z, Side::Right),
            Rotation::LeftRight => self.rotate_double(z, Side::Left),
            Rotation::RightLeft => self.rotate_double(z, Side::Right),
        }
    }

    /*
             z                         y
            / \                      /   \
           y   T4                   x     z
          / \         ----->       / \   / \
         x   T3                   T1 T2 T3  T4
        / \
      T1   T2
    */
    fn rotate_single(&mut self, z: NodeId, heavy: Side) -> Option<NodeId> {
        let y = self.child(z, heavy)?;
        let parent = self.get(z).parent;
        let inner = self.child(y, heavy.opposite());

        self.set_child(z, heavy, inner);
        self.set_child(y, heavy.opposite(), Some(z));
        self.replace_child(parent, z, y);
        Some(y)
    }

    /*
           z                          x
          / \                       /   \
         y   T4                    y     z
        / \          ----->       / \   / \
      T1   x                     T1 T2 T3  T4
          / \
        T2   T3
    */
    fn rotate_double(&mut self, z: NodeId, heavy: Side) -> Option<NodeId> {
        let y = self.child(z, heavy)?;
        let x = self.child(y, heavy.opposite())?;
        let parent = self.get(z).parent;
        let near = self.child(x, heavy);
        let far = self.child(x, heavy.opposite());

        self.set_child(y, heavy.opposite(), near);
        self.set_child(z, heavy, far);
        self.set_child(x, heavy, Some(y));
        self.set_child(x, heavy.opposite(), Some(z));
        self.replace_child(parent, z, x);
        Some(x)
    }
}
