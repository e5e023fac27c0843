//! Enumeration types shared by the kernel and the dungeon model.
//!
//! A dungeon cell is split into four sectors (a 2x2 grid). Entities that
//! move inside the dungeon (projectiles, creatures) step from sector to
//! sector, and only change cell when they leave the edge of the current
//! one.

use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Directions
// ---------------------------------------------------------------------------

/// A compass direction on a dungeon level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards decreasing `y`.
    North,
    /// Towards increasing `x`.
    East,
    /// Towards increasing `y`.
    South,
    /// Towards decreasing `x`.
    West,
}

impl Direction {
    /// All four directions, clockwise from north.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// The `(dx, dy)` cell offset of one step in this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// The axis of a door frame or a corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Runs north to south.
    NorthSouth,
    /// Runs west to east.
    WestEast,
}

// ---------------------------------------------------------------------------
// Sectors
// ---------------------------------------------------------------------------

/// One quarter of a dungeon cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sector {
    /// Top-left quarter.
    NorthWest,
    /// Top-right quarter.
    NorthEast,
    /// Bottom-left quarter.
    SouthWest,
    /// Bottom-right quarter.
    SouthEast,
}

impl Sector {
    /// Whether the sector lies on the northern half of the cell.
    pub const fn is_northern(self) -> bool {
        matches!(self, Self::NorthWest | Self::NorthEast)
    }

    /// Whether the sector lies on the southern half of the cell.
    pub const fn is_southern(self) -> bool {
        !self.is_northern()
    }

    /// Whether the sector lies on the eastern half of the cell.
    pub const fn is_eastern(self) -> bool {
        matches!(self, Self::NorthEast | Self::SouthEast)
    }

    /// Whether the sector lies on the western half of the cell.
    pub const fn is_western(self) -> bool {
        !self.is_eastern()
    }

    /// Whether a step towards `direction` leaves the current cell.
    ///
    /// A sector sits on two edges of its cell; stepping across either edge
    /// changes position, stepping inwards does not.
    pub const fn changes_position(self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.is_northern(),
            Direction::South => self.is_southern(),
            Direction::East => self.is_eastern(),
            Direction::West => self.is_western(),
        }
    }

    /// The sector reached after one step towards `direction`.
    ///
    /// Moving north or south flips the vertical half, moving east or west
    /// flips the horizontal half. When the step leaves the cell the
    /// resulting sector belongs to the neighbouring cell.
    #[must_use]
    pub const fn towards(self, direction: Direction) -> Self {
        match direction {
            Direction::North | Direction::South => match self {
                Self::NorthWest => Self::SouthWest,
                Self::NorthEast => Self::SouthEast,
                Self::SouthWest => Self::NorthWest,
                Self::SouthEast => Self::NorthEast,
            },
            Direction::East | Direction::West => match self {
                Self::NorthWest => Self::NorthEast,
                Self::NorthEast => Self::NorthWest,
                Self::SouthWest => Self::SouthEast,
                Self::SouthEast => Self::SouthWest,
            },
        }
    }

    /// The two sectors on the side of a cell facing `direction`.
    pub const fn facing(direction: Direction) -> [Self; 2] {
        match direction {
            Direction::North => [Self::NorthEast, Self::NorthWest],
            Direction::East => [Self::NorthEast, Self::SouthEast],
            Direction::South => [Self::SouthEast, Self::SouthWest],
            Direction::West => [Self::NorthWest, Self::SouthWest],
        }
    }

    /// Pick one of the two sectors facing `direction` at random.
    pub fn random_facing(direction: Direction, rng: &mut impl Rng) -> Self {
        let [first, second] = Self::facing(direction);
        if rng.random_bool(0.5) { first } else { second }
    }
}

// ---------------------------------------------------------------------------
// Trigger actions
// ---------------------------------------------------------------------------

/// The kind of effect an actuator delivers to its targets when it fires.
///
/// The kernel never interprets the action; each target decides what
/// enabling, disabling or toggling means for it (a door opens, closes or
/// reverses its motion, a launcher fires regardless).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerAction {
    /// Switch the target on (open a door, arm a trap).
    Enable,
    /// Switch the target off.
    Disable,
    /// Flip the target's current state.
    Toggle,
}

// ---------------------------------------------------------------------------
// Speeds
// ---------------------------------------------------------------------------

/// Movement speed of a timed entity, expressed as a cadence in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speed {
    /// One step every 2 ticks.
    Fast,
    /// One step every 4 ticks.
    Normal,
    /// One step every 8 ticks.
    Slow,
}

impl Speed {
    /// Number of ticks between two steps.
    pub const fn ticks(self) -> u32 {
        match self {
            Self::Fast => 2,
            Self::Normal => 4,
            Self::Slow => 8,
        }
    }
}
