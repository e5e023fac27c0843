//! Projectile flight, the reference timed entity.
//!
//! A projectile registers itself with the clock when launched and moves one
//! sector per cadence tick in a straight line until it hits something or
//! runs out of range:
//!
//! ```text
//! Flying --(wall, closed door, occupant, range exhausted)--> Exploding
//! Exploding --(impact applied, leaves the world)--> Exploded
//! ```
//!
//! The kernel knows nothing about the dungeon. The world the projectile
//! flies through implements [`FlightSpace`], and what happens on impact (an
//! item dropping to the floor, a fireball burning an occupant) is the
//! payload's [`Impact`] implementation.

use catacomb_types::{Direction, Position, ProjectileId, Sector};
use tracing::debug;

use crate::clock::{Interest, Listener, ListenerError, Schedule, TickContext};
use crate::entity::{StateGraph, StateMachine, TransitionError};
use crate::temporizer::{Temporizer, TemporizerError};

/// Default number of ticks between two projectile moves.
pub const DEFAULT_CADENCE: u32 = 3;

/// Errors that can occur when launching a projectile.
#[derive(Debug, thiserror::Error)]
pub enum ProjectileError {
    /// The projectile was given no range to fly.
    #[error("projectile range must be at least 1")]
    ZeroRange,

    /// The cadence countdown could not be created.
    #[error("temporizer error: {source}")]
    Temporizer {
        /// The underlying temporizer error.
        #[from]
        source: TemporizerError,
    },

    /// The world refused the projectile.
    #[error("world error: {source}")]
    World {
        /// The underlying domain error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// What a projectile finds in a cell, as far as flight is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Open floor.
    Floor,
    /// Solid rock.
    Wall,
    /// A door; `traversable` when it is open enough to fly through.
    Door {
        /// Whether a projectile can pass.
        traversable: bool,
    },
    /// Outside the map.
    Void,
}

/// The world seen by a flying projectile.
pub trait FlightSpace {
    /// Error raised when the world cannot record a projectile.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Classify the cell at `position`.
    fn cell_kind(&self, position: Position) -> CellKind;

    /// Whether something blocking stands in `sector` of the cell.
    fn is_occupied(&self, position: Position, sector: Sector) -> bool;

    /// Record the projectile in `sector` of the cell.
    fn enter(
        &mut self,
        id: ProjectileId,
        position: Position,
        sector: Sector,
    ) -> Result<(), Self::Error>;

    /// Remove the projectile from `sector` of the cell.
    fn leave(
        &mut self,
        id: ProjectileId,
        position: Position,
        sector: Sector,
    ) -> Result<(), Self::Error>;
}

/// The effect a projectile has where it explodes.
pub trait Impact<W> {
    /// Apply the impact at `position`/`sector`.
    fn on_impact(
        &mut self,
        ctx: &mut TickContext<'_, W>,
        position: Position,
        sector: Sector,
    ) -> Result<(), ListenerError>;
}

/// Flight phases of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightState {
    /// Moving one sector per cadence tick.
    Flying,
    /// Hit something; the impact is applied on the next cadence tick.
    Exploding,
    /// Impact applied; the projectile is gone.
    Exploded,
}

impl StateGraph for FlightState {
    fn allows(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Flying, Self::Exploding) | (Self::Exploding, Self::Exploded)
        )
    }

    fn is_terminal(self) -> bool {
        self == Self::Exploded
    }
}

/// Where and how a projectile starts its flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flight {
    /// Starting cell.
    pub position: Position,
    /// Direction of travel.
    pub direction: Direction,
    /// Starting sector within the cell.
    pub sector: Sector,
    /// Number of sectors the projectile can cross before it falls.
    pub range: u32,
}

/// A projectile carrying payload `P`.
pub struct Projectile<P> {
    id: ProjectileId,
    label: String,
    position: Position,
    sector: Sector,
    direction: Direction,
    range: u32,
    cadence: Temporizer,
    machine: StateMachine<FlightState>,
    payload: P,
}

fn world_error<E: std::error::Error + Send + Sync + 'static>(source: E) -> ListenerError {
    ListenerError::World {
        source: Box::new(source),
    }
}

impl<P> Projectile<P> {
    /// Build a flying projectile without placing it in a world.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectileError::ZeroRange`] for a range of 0, or a
    /// temporizer error for a zero cadence.
    pub fn new(flight: Flight, payload: P, cadence: u32) -> Result<Self, ProjectileError> {
        if flight.range == 0 {
            return Err(ProjectileError::ZeroRange);
        }
        let id = ProjectileId::new();
        let label = format!("Projectile[{id}]");
        Ok(Self {
            id,
            cadence: Temporizer::new(label.clone(), cadence)?,
            machine: StateMachine::new(label.clone(), FlightState::Flying),
            label,
            position: flight.position,
            sector: flight.sector,
            direction: flight.direction,
            range: flight.range,
            payload,
        })
    }

    /// Build a projectile, place it in `world`, and register it.
    ///
    /// From inside a tick, pass the halves of [`TickContext::split`]; the
    /// projectile then starts moving on the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectileError`] when the flight is invalid or the world
    /// refuses the projectile.
    pub fn launch<W, S>(
        world: &mut W,
        schedule: &mut S,
        flight: Flight,
        payload: P,
        cadence: u32,
    ) -> Result<ProjectileId, ProjectileError>
    where
        W: FlightSpace + 'static,
        S: Schedule<W> + ?Sized,
        P: Impact<W> + 'static,
    {
        let projectile = Self::new(flight, payload, cadence)?;
        let id = projectile.id;
        world
            .enter(id, flight.position, flight.sector)
            .map_err(|source| ProjectileError::World {
                source: Box::new(source),
            })?;
        schedule.register(Box::new(projectile));
        debug!(
            projectile = %id,
            position = %flight.position,
            sector = ?flight.sector,
            direction = ?flight.direction,
            range = flight.range,
            "Projectile launched"
        );
        Ok(id)
    }

    /// Unique id of the projectile.
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Current cell.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current sector.
    pub const fn sector(&self) -> Sector {
        self.sector
    }

    /// Direction of travel.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Redirect the projectile (deflection).
    pub const fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Sectors left to fly.
    pub const fn range(&self) -> u32 {
        self.range
    }

    /// Current flight phase.
    pub const fn state(&self) -> FlightState {
        self.machine.state()
    }

    /// The carried payload.
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    fn explode(&mut self) -> Result<(), TransitionError> {
        debug!(
            projectile = %self.id,
            position = %self.position,
            sector = ?self.sector,
            range = self.range,
            "Projectile exploding"
        );
        self.machine.transition(FlightState::Exploding)
    }

    /// One cadence step while flying.
    fn fly<W: FlightSpace>(&mut self, world: &mut W) -> Result<(), ListenerError> {
        if world.cell_kind(self.position) == (CellKind::Door { traversable: false }) {
            // A door closed on the projectile.
            self.explode()?;
            return Ok(());
        }

        let next_sector = self.sector.towards(self.direction);
        let next_position = if self.sector.changes_position(self.direction) {
            self.position.towards(self.direction)
        } else {
            self.position
        };

        if matches!(world.cell_kind(next_position), CellKind::Wall | CellKind::Void) {
            self.explode()?;
            return Ok(());
        }

        world
            .leave(self.id, self.position, self.sector)
            .map_err(world_error)?;
        world
            .enter(self.id, next_position, next_sector)
            .map_err(world_error)?;
        self.position = next_position;
        self.sector = next_sector;
        self.range = self.range.saturating_sub(1);
        debug!(
            projectile = %self.id,
            position = %self.position,
            sector = ?self.sector,
            range = self.range,
            "Projectile moved"
        );

        if world.is_occupied(next_position, next_sector) || self.range == 0 {
            self.explode()?;
        }
        Ok(())
    }
}

impl<W, P> Listener<W> for Projectile<P>
where
    W: FlightSpace,
    P: Impact<W>,
{
    fn label(&self) -> &str {
        &self.label
    }

    fn on_tick(&mut self, ctx: &mut TickContext<'_, W>) -> Result<Interest, ListenerError> {
        if !self.cadence.trigger() {
            return Ok(Interest::Continue);
        }
        match self.machine.state() {
            FlightState::Flying => {
                self.fly(ctx.world_mut())?;
                Ok(Interest::Continue)
            }
            FlightState::Exploding => {
                self.payload.on_impact(ctx, self.position, self.sector)?;
                self.machine.transition(FlightState::Exploded)?;
                ctx.world_mut()
                    .leave(self.id, self.position, self.sector)
                    .map_err(world_error)?;
                debug!(tick = ctx.tick(), projectile = %self.id, "Projectile exploded");
                Ok(Interest::Done)
            }
            FlightState::Exploded => Ok(Interest::Done),
        }
    }
}
