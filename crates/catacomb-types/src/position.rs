//! Cell coordinates inside the dungeon.

use serde::{Deserialize, Serialize};

use crate::enums::Direction;

/// Coordinates of a dungeon cell: `x` grows eastwards, `y` grows southwards
/// and `z` is the level number (deeper levels have larger `z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column, growing eastwards.
    pub x: i32,
    /// Row, growing southwards.
    pub y: i32,
    /// Level number.
    pub z: i32,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Return the neighbouring position one step towards `direction`.
    ///
    /// Coordinates saturate at the `i32` bounds instead of wrapping.
    #[must_use]
    pub const fn towards(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z,
        }
    }

    /// Whether both positions share a row or a column on the same level.
    pub const fn is_aligned(self, other: Self) -> bool {
        self.z == other.z && (self.x == other.x || self.y == other.y)
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}:{},{}]", self.z, self.x, self.y)
    }
}
