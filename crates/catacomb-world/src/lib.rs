//! The dungeon the Catacomb clock drives.
//!
//! This crate models the world side of the simulation: a grid of cells with
//! sectors, doors that slide open and shut, pressure pads, wall launchers,
//! and the party's weapon hands. Every time-dependent piece is a listener or
//! a trigger target from `catacomb-core`.
//!
//! # Modules
//!
//! - [`dungeon`] -- The cell grid, its contents, and its [`FlightSpace`] view.
//! - [`door`] -- Door states, animation listener, and the door switch target.
//! - [`pressure_pad`] -- Pads firing actuator copies on item and creature events.
//! - [`launcher`] -- Wall launchers shooting item volleys.
//! - [`impact`] -- Projectile payloads that land in the dungeon.
//! - [`hand`] -- Weapon-hand cooldowns.
//! - [`error`] -- Error types for dungeon operations.
//! - [`starting_dungeon`] -- Default two-room starting level.
//!
//! [`FlightSpace`]: catacomb_core::projectile::FlightSpace

pub mod door;
pub mod dungeon;
pub mod error;
pub mod hand;
pub mod impact;
pub mod launcher;
pub mod pressure_pad;
pub mod starting_dungeon;

// Re-export primary types at crate root.
pub use door::{Door, DoorAnimation, DoorState, DoorSwitch, Motion};
pub use dungeon::{Dungeon, Element};
pub use error::WorldError;
pub use hand::{CooldownError, WeaponHand};
pub use impact::ItemDrop;
pub use launcher::ProjectileLauncher;
pub use pressure_pad::{PadEvent, PressurePad};
pub use starting_dungeon::{StartingDungeon, create_starting_dungeon};
