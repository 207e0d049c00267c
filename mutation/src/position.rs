//! Insert positions.

use std::fmt;

/// Where a node goes relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertPosition {
    /// New leftmost child of the anchor.
    AsFirstChild,
    /// Immediately before the anchor, under the same parent.
    AsLeftSibling,
    /// Immediately after the anchor, under the same parent.
    AsRightSibling,
}

impl fmt::Display for InsertPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InsertPosition::AsFirstChild => "first child",
            InsertPosition::AsLeftSibling => "left sibling",
            InsertPosition::AsRightSibling => "right sibling",
        })
    }
}
