//! Sliding doors.
//!
//! A door moves through five positions, from fully open to closed, one
//! position per animation step. It only animates while it has somewhere to
//! go: every time it starts moving, [`actuate`] registers a fresh
//! [`DoorAnimation`], which leaves the clock once the door comes to rest.
//!
//! Each animation carries the generation the door handed out when it was
//! registered. Starting a new motion bumps the generation, so an older
//! animation still on the clock finds itself stale and leaves. The door
//! never needs to know whether its listener survived a clock reset.
//!
//! A door closing on a creature or the party bounces back up one position,
//! then resumes closing on the following step.

use catacomb_core::clock::{Interest, Listener, ListenerError, Schedule, TickContext};
use catacomb_core::entity::{StateGraph, StateMachine, TransitionError};
use catacomb_core::temporizer::Temporizer;
use catacomb_core::trigger::{TriggerError, Triggerable};
use catacomb_types::{Orientation, Position, Speed, TriggerAction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dungeon::Dungeon;
use crate::error::WorldError;

/// Default number of ticks between two door animation steps.
pub const DEFAULT_DOOR_CADENCE: u32 = Speed::Normal.ticks();

/// How far a door is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorState {
    /// Fully open.
    Open,
    /// Three quarters open.
    ThreeQuartersOpen,
    /// Half open.
    HalfOpen,
    /// One quarter open.
    OneQuarterOpen,
    /// Fully closed.
    Closed,
    /// Smashed; stays open for good.
    Broken,
}

impl DoorState {
    /// Whether a projectile can fly through the door frame.
    pub const fn is_traversable_by_projectile(self) -> bool {
        matches!(self, Self::Open | Self::ThreeQuartersOpen | Self::Broken)
    }

    /// One position towards open. `Open` and `Broken` stay put.
    #[must_use]
    pub const fn opening_step(self) -> Self {
        match self {
            Self::Closed => Self::OneQuarterOpen,
            Self::OneQuarterOpen => Self::HalfOpen,
            Self::HalfOpen => Self::ThreeQuartersOpen,
            Self::ThreeQuartersOpen | Self::Open => Self::Open,
            Self::Broken => Self::Broken,
        }
    }

    /// One position towards closed. `Closed` and `Broken` stay put.
    #[must_use]
    pub const fn closing_step(self) -> Self {
        match self {
            Self::Open => Self::ThreeQuartersOpen,
            Self::ThreeQuartersOpen => Self::HalfOpen,
            Self::HalfOpen => Self::OneQuarterOpen,
            Self::OneQuarterOpen | Self::Closed => Self::Closed,
            Self::Broken => Self::Broken,
        }
    }
}

impl StateGraph for DoorState {
    fn allows(self, next: Self) -> bool {
        match next {
            Self::Broken => self == Self::Closed,
            _ => next == self.opening_step() || next == self.closing_step(),
        }
    }

    fn is_terminal(self) -> bool {
        self == Self::Broken
    }
}

/// What a door is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motion {
    /// At rest.
    Idle,
    /// Sliding open.
    Opening,
    /// Sliding shut.
    Closing,
    /// Bouncing back after hitting something; closes again next step.
    OpeningAfterRebound,
}

/// A door in a wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Door {
    orientation: Orientation,
    machine: StateMachine<DoorState>,
    motion: Motion,
    breakable: bool,
    cadence: u32,
    /// Generation of the animation allowed to move the door.
    generation: u64,
}

impl Door {
    /// A closed, idle, breakable door.
    pub fn new(orientation: Orientation) -> Self {
        Self::with_state(orientation, DoorState::Closed)
    }

    /// An idle door in the given state.
    pub fn with_state(orientation: Orientation, state: DoorState) -> Self {
        Self {
            orientation,
            machine: StateMachine::new("door", state),
            motion: Motion::Idle,
            breakable: true,
            cadence: DEFAULT_DOOR_CADENCE,
            generation: 0,
        }
    }

    /// Set the number of ticks between two animation steps.
    #[must_use]
    pub const fn with_cadence(mut self, cadence: u32) -> Self {
        self.cadence = cadence;
        self
    }

    /// Make the door immune to [`Door::destroy`].
    #[must_use]
    pub const fn unbreakable(mut self) -> Self {
        self.breakable = false;
        self
    }

    /// The axis of the door frame.
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// How far the door is open.
    pub const fn state(&self) -> DoorState {
        self.machine.state()
    }

    /// What the door is doing.
    pub const fn motion(&self) -> Motion {
        self.motion
    }

    /// Ticks between two animation steps.
    pub const fn cadence(&self) -> u32 {
        self.cadence
    }

    /// Whether a projectile can fly through right now.
    pub const fn is_traversable_by_projectile(&self) -> bool {
        self.state().is_traversable_by_projectile()
    }

    /// Start opening. Returns whether the door started moving.
    pub fn open(&mut self) -> bool {
        if self.machine.is_terminal() || self.motion == Motion::Opening {
            return false;
        }
        self.motion = Motion::Opening;
        true
    }

    /// Start closing. Returns whether the door started moving.
    pub fn close(&mut self) -> bool {
        if self.machine.is_terminal() || self.motion == Motion::Closing {
            return false;
        }
        self.motion = Motion::Closing;
        true
    }

    /// Reverse the current motion, or start moving when at rest.
    ///
    /// Returns whether the door started moving; a broken door ignores
    /// toggles.
    ///
    /// # Errors
    ///
    /// Returns the current state for an idle door stopped midway, which has
    /// no obvious direction to go.
    pub fn toggle(&mut self) -> Result<bool, DoorState> {
        match (self.motion, self.state()) {
            _ if self.machine.is_terminal() => Ok(false),
            (Motion::Opening, _) => Ok(self.close()),
            (Motion::Closing | Motion::OpeningAfterRebound, _) => Ok(self.open()),
            (Motion::Idle, DoorState::Open) => Ok(self.close()),
            (Motion::Idle, DoorState::Closed) => Ok(self.open()),
            (Motion::Idle, state) => Err(state),
        }
    }

    /// Smash a closed door at rest. Returns whether it broke.
    ///
    /// # Errors
    ///
    /// Returns the current state when the door is already broken.
    pub fn destroy(&mut self) -> Result<bool, DoorState> {
        let state = self.state();
        if self.machine.is_terminal() {
            return Err(state);
        }
        if state != DoorState::Closed || self.motion != Motion::Idle || !self.breakable {
            return Ok(false);
        }
        self.machine
            .transition(DoorState::Broken)
            .map(|()| true)
            .map_err(|_transition| state)
    }

    /// Advance the animation by one position.
    ///
    /// `blocked` tells whether something stands under the door. Returns
    /// whether the door is still moving.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the step leaves the door graph.
    pub fn step(&mut self, blocked: bool) -> Result<bool, TransitionError> {
        let from = self.state();
        let next = match self.motion {
            Motion::Idle => return Ok(false),
            Motion::Opening => from.opening_step(),
            Motion::OpeningAfterRebound => {
                self.motion = Motion::Closing;
                from.opening_step()
            }
            Motion::Closing if blocked => {
                // Bounce instead of crushing whatever stands underneath.
                self.motion = Motion::OpeningAfterRebound;
                if from.closing_step() == DoorState::Closed {
                    from
                } else {
                    from.closing_step()
                }
            }
            Motion::Closing => from.closing_step(),
        };

        self.machine.transition(next)?;

        let at_rest = match self.motion {
            Motion::Opening => next == DoorState::Open,
            Motion::Closing => next == DoorState::Closed,
            Motion::Idle => true,
            Motion::OpeningAfterRebound => false,
        };
        if at_rest || self.machine.is_terminal() {
            self.motion = Motion::Idle;
        }
        debug!(from = ?from, to = ?next, motion = ?self.motion, "Door step");
        Ok(self.motion != Motion::Idle)
    }

    /// Generation of the animation currently allowed to move the door.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Retire the current animation and return the generation of the next.
    const fn next_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }
}

/// Apply `action` to the door at `position`, registering a fresh animation
/// with `schedule` whenever the door is left moving.
///
/// Enable opens, disable closes, toggle reverses the current motion.
///
/// # Errors
///
/// Returns [`WorldError::NotADoor`] when there is no door at `position`,
/// [`WorldError::AmbiguousToggle`] for a toggle on a door stopped midway.
pub fn actuate<S>(
    dungeon: &mut Dungeon,
    schedule: &mut S,
    position: Position,
    action: TriggerAction,
) -> Result<(), WorldError>
where
    S: Schedule<Dungeon> + ?Sized,
{
    let door = dungeon.door_mut(position)?;
    let moving = match action {
        TriggerAction::Enable => door.open(),
        TriggerAction::Disable => door.close(),
        TriggerAction::Toggle => door
            .toggle()
            .map_err(|state| WorldError::AmbiguousToggle { position, state })?,
    };
    debug!(
        %position,
        ?action,
        orientation = ?door.orientation(),
        state = ?door.state(),
        motion = ?door.motion(),
        "Door actuated"
    );

    // A repeated command on a moving door still restarts its animation,
    // since the clock may have dropped the previous one.
    if moving || door.motion() != Motion::Idle {
        let generation = door.next_generation();
        let animation = DoorAnimation::new(position, door.cadence(), generation)?;
        schedule.register(Box::new(animation));
    }
    Ok(())
}

/// Listener moving one door one position per cadence tick.
pub struct DoorAnimation {
    label: String,
    position: Position,
    cadence: Temporizer,
    generation: u64,
}

impl DoorAnimation {
    /// Animate the door at `position`, stepping every `cadence` ticks for
    /// as long as the door's generation is `generation`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Temporizer`] for a zero cadence.
    pub fn new(position: Position, cadence: u32, generation: u64) -> Result<Self, WorldError> {
        let label = format!("Door{position}");
        Ok(Self {
            cadence: Temporizer::new(label.clone(), cadence)?,
            label,
            position,
            generation,
        })
    }
}

impl Listener<Dungeon> for DoorAnimation {
    fn label(&self) -> &str {
        &self.label
    }

    fn on_tick(&mut self, ctx: &mut TickContext<'_, Dungeon>) -> Result<Interest, ListenerError> {
        let dungeon = ctx.world_mut();
        if dungeon.door(self.position)?.generation() != self.generation {
            debug!(door = self.label, generation = self.generation, "Stale door animation");
            return Ok(Interest::Done);
        }
        if !self.cadence.trigger() {
            return Ok(Interest::Continue);
        }
        let blocked = dungeon.is_blocked(self.position);
        let door = dungeon.door_mut(self.position)?;
        if door.step(blocked)? {
            return Ok(Interest::Continue);
        }
        debug!(door = self.label, state = ?door.state(), "Door at rest");
        Ok(Interest::Done)
    }
}

/// Trigger target operating a door.
pub struct DoorSwitch {
    label: String,
    position: Position,
}

impl DoorSwitch {
    /// A switch for the door at `position`.
    pub fn new(position: Position) -> Self {
        Self {
            label: format!("Door{position}"),
            position,
        }
    }
}

impl Triggerable<Dungeon> for DoorSwitch {
    fn label(&self) -> &str {
        &self.label
    }

    fn trigger(
        &self,
        ctx: &mut TickContext<'_, Dungeon>,
        action: TriggerAction,
    ) -> Result<(), TriggerError> {
        let (dungeon, registry) = ctx.split();
        actuate(dungeon, registry, self.position, action).map_err(|source| match source {
            WorldError::AmbiguousToggle { state, .. } => TriggerError::Unsupported {
                target: self.label.clone(),
                action,
                reason: format!("door is idle while {state:?}"),
            },
            other => TriggerError::Domain {
                target: self.label.clone(),
                source: Box::new(other),
            },
        })
    }
}
