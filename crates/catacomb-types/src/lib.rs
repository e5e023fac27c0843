//! Shared value types for the Catacomb simulation kernel.
//!
//! Everything in here is plain data: cheap to copy, comparable, and
//! serializable. The kernel (`catacomb-core`) and the dungeon model
//! (`catacomb-world`) both build on these types.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`enums`] -- Compass directions, sub-cell sectors, trigger actions, speeds
//! - [`position`] -- Integer cell coordinates within a multi-level dungeon

pub mod enums;
pub mod ids;
pub mod position;

// Re-export all public types at crate root for convenience.
pub use enums::{Direction, Orientation, Sector, Speed, TriggerAction};
pub use ids::{ChampionId, CreatureId, ItemId, ProjectileId};
pub use position::Position;
