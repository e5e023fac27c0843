//! Tick clock, timed actions and timed entities for the Catacomb simulation.
//!
//! Every time-dependent behaviour of the dungeon (doors sliding shut, weapon
//! cooldowns, projectiles in flight, trap sequences) is driven by one
//! [`Clock`]. Things that want to be told about elapsed time register as
//! [`Listener`]s; each tick they are asked whether they still care.
//!
//! # Modules
//!
//! - [`clock`] -- Virtual-time clock, listener registry, and tick dispatch.
//! - [`temporizer`] -- Per-listener countdown helper.
//! - [`trigger`] -- [`Triggerable`] targets that actuators fire at.
//! - [`actuator`] -- Leaf, sequence and loop actuators, and [`combine`].
//! - [`entity`] -- State graphs for timed entities.
//! - [`projectile`] -- Projectile flight, the reference timed entity.
//! - [`deferred`] -- One-shot commands run after a delay.
//! - [`runner`] -- Bounded loop driving a clock until it is idle.
//! - [`config`] -- Configuration loading from `catacomb-config.yaml`.
//!
//! [`Clock`]: clock::Clock
//! [`Listener`]: clock::Listener
//! [`Triggerable`]: trigger::Triggerable
//! [`combine`]: actuator::combine

pub mod actuator;
pub mod clock;
pub mod config;
pub mod deferred;
pub mod entity;
pub mod projectile;
pub mod runner;
pub mod temporizer;
pub mod trigger;
