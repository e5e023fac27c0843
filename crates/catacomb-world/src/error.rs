//! Error types for the `catacomb-world` crate.
//!
//! Dungeon operations return [`WorldError`]. Inside a tick, world errors
//! travel to the clock as [`ListenerError::World`], which aborts the tick.
//!
//! [`ListenerError::World`]: catacomb_core::clock::ListenerError::World

use catacomb_core::actuator::ActuatorError;
use catacomb_core::clock::ListenerError;
use catacomb_core::projectile::ProjectileError;
use catacomb_core::temporizer::TemporizerError;
use catacomb_types::{CreatureId, ItemId, Position, ProjectileId, Sector};

use crate::door::DoorState;

/// Errors that can occur during dungeon operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No cell exists at the position.
    #[error("no cell at {0}")]
    CellNotFound(Position),

    /// A level with this number already has cells.
    #[error("level {0} already exists")]
    DuplicateLevel(i32),

    /// A level is too small to hold an interior.
    #[error("level {width}x{height} is too small, minimum is 3x3")]
    LevelTooSmall {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },

    /// The cell does not hold a door.
    #[error("no door at {0}")]
    NotADoor(Position),

    /// The cell does not hold a pressure pad.
    #[error("no pressure pad at {0}")]
    NotAPad(Position),

    /// The cell cannot hold creatures or items.
    #[error("cell {0} is solid")]
    Solid(Position),

    /// Another creature already stands in the sector.
    #[error("sector {sector:?} of {position} is already occupied")]
    SectorOccupied {
        /// The cell.
        position: Position,
        /// The taken sector.
        sector: Sector,
    },

    /// The creature is not in the cell.
    #[error("creature {creature} is not at {position}")]
    CreatureNotFound {
        /// The missing creature.
        creature: CreatureId,
        /// Where it was looked for.
        position: Position,
    },

    /// The item is not on the floor of the cell.
    #[error("item {item} is not at {position}")]
    ItemNotFound {
        /// The missing item.
        item: ItemId,
        /// Where it was looked for.
        position: Position,
    },

    /// The projectile is not recorded in the cell.
    #[error("projectile {projectile} is not at {position}")]
    ProjectileNotFound {
        /// The missing projectile.
        projectile: ProjectileId,
        /// Where it was looked for.
        position: Position,
    },

    /// A toggle reached a door that is neither open nor closed and at rest.
    #[error("door at {position} cannot be toggled while {state:?} and idle")]
    AmbiguousToggle {
        /// The door.
        position: Position,
        /// Its current state.
        state: DoorState,
    },

    /// The door is already broken.
    #[error("door at {0} is already broken")]
    AlreadyBroken(Position),

    /// An actuator could not be built.
    #[error("actuator error: {source}")]
    Actuator {
        /// The underlying actuator error.
        #[from]
        source: ActuatorError,
    },

    /// A countdown could not be created.
    #[error("temporizer error: {source}")]
    Temporizer {
        /// The underlying temporizer error.
        #[from]
        source: TemporizerError,
    },

    /// A projectile could not be launched.
    #[error("projectile error: {source}")]
    Projectile {
        /// The underlying projectile error.
        #[from]
        source: ProjectileError,
    },
}

impl From<WorldError> for ListenerError {
    fn from(source: WorldError) -> Self {
        Self::World {
            source: Box::new(source),
        }
    }
}
