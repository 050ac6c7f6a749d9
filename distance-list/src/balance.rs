use crate::node::{Arena, NodeId, Side};
use crate::rotate::Rotation;

/// How the rebalance walk maps a node's balance factor to a rotation.
///
/// The balance factor is `height(left) - height(right)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationTable {
    /// The historical table of this structure:
    ///
    /// | balance | rotation    |
    /// |---------|-------------|
    /// | +2      | right-right |
    /// | +1      | right-left  |
    /// | -1      | left-right  |
    /// | -2      | left-left   |
    ///
    /// It reacts at magnitude 1 and pairs rotations with the opposite heavy side. A rotation
    /// whose pivot nodes are missing is skipped. Ordering, sizes and lengths stay exact, but the
    /// height is not bounded by `O(log n)`: append-only workloads degrade to a right spine.
    #[default]
    Verbatim,
    /// Textbook AVL selection: rotate only at `|balance| >= 2`, picking a single or double
    /// rotation from the heavy child's own balance. Keeps the height within `1.44 log2(n)`.
    Avl,
}

impl RotationTable {
    pub(crate) fn select<T>(self, arena: &Arena<T>, node: NodeId, balance: i64) -> Option<Rotation> {
        match self {
            Self::Verbatim => match balance {
                2 => Some(Rotation::RightRight),
                1 => Some(Rotation::RightLeft),
                -1 => Some(Rotation::LeftRight),
                -2 => Some(Rotation::LeftLeft),
                _ => None,
            },
            Self::Avl => {
                if balance > 1 {
                    let heavy = arena.child(node, Side::Left)?;
                    if arena.balance(heavy) >= 0 {
                        Some(Rotation::LeftLeft)
                    } else {
                        Some(Rotation::LeftRight)
                    }
                } else if balance < -1 {
                    let heavy = arena.child(node, Side::Right)?;
                    if arena.balance(heavy) <= 0 {
                        Some(Rotation::RightRight)
                    } else {
                        Some(Rotation::RightLeft)
                    }
                } else {
                    None
                }
            }
        }
    }
}

impl<T> Arena<T> {
    /// Walks from `start` up to the root after a structural change, refreshing every node on
    /// the path and rotating where `table` asks for it. Returns the (possibly new) root.
    pub(crate) fn rebalance(&mut self, start: NodeId, table: RotationTable) -> NodeId {
        let mut cur = start;
        loop {
            self.refresh(cur);
            let balance = self.balance(cur);
            let top = match table.select(self, cur, balance) {
                Some(rotation) => match self.rotate(cur, rotation) {
                    Some(top) => {
                        dtrace!(node = cur.index(), balance, ?rotation, "rotate");
                        self.refresh_rotated(top, rotation);
                        top
                    }
                    None => {
                        dtrace!(node = cur.index(), balance, ?rotation, "rotation not applicable");
                        cur
                    }
                },
                None => cur,
            };

            match self.get(top).parent {
                Some(parent) => cur = parent,
                None => return top,
            }
        }
    }

    fn refresh_rotated(&mut self, top: NodeId, rotation: Rotation) {
        let (left, right) = {
            let node = self.get(top);
            (node.left, node.right)
        };
        if rotation.is_double() {
            // Both children of the lifted grandchild were moved.
            for child in [left, right].into_iter().flatten() {
                self.refresh(child);
            }
        } else {
            let demoted = match rotation {
                Rotation::LeftLeft => right,
                _ => left,
            };
            if let Some(demoted) = demoted {
                self.refresh(demoted);
            }
        }
        self.refresh(top);
    }
}
