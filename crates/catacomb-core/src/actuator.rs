//! Composable timed actions.
//!
//! An [`Actuator`] is a listener that fires a [`TriggerAction`] at one or
//! more targets once some number of ticks has elapsed. Actuators compose:
//!
//! - [`Actuator::leaf`] waits `D` ticks, fires its action at every target in
//!   order, and is done.
//! - [`Actuator::sequence`] runs its children one after the other; the total
//!   duration is the sum of the children's.
//! - [`Actuator::repeat`] runs its body a bounded (or unbounded) number of
//!   times, rewinding it after each pass.
//! - [`combine`] merges two optional actuators into one.
//!
//! Cloning an actuator yields an independent copy with fresh countdowns that
//! shares the original's targets. Pressure pads rely on this: they keep a
//! pristine actuator and register a clone each time they are stepped on.

use std::fmt;

use catacomb_types::TriggerAction;
use tracing::debug;

use crate::clock::{Interest, Listener, ListenerError, TickContext};
use crate::temporizer::{Temporizer, TemporizerError};
use crate::trigger::{Target, TriggerError};

/// Errors raised while building or firing an actuator.
#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    /// A leaf was given a zero-tick delay.
    #[error("actuator duration must be at least 1 tick")]
    ZeroDuration,

    /// A leaf was given no target to fire at.
    #[error("actuator needs at least one target")]
    NoTargets,

    /// A sequence or loop bundle was given no child.
    #[error("composite actuator needs at least one child")]
    NoChildren,

    /// The countdown could not be created.
    #[error("temporizer error: {source}")]
    Temporizer {
        /// The underlying temporizer error.
        #[from]
        source: TemporizerError,
    },

    /// A target rejected the action.
    #[error("{actuator} failed to fire {action:?} at {target}: {source}")]
    Target {
        /// Label of the firing actuator.
        actuator: String,
        /// Label of the failing target.
        target: String,
        /// The action being delivered.
        action: TriggerAction,
        /// The target's error.
        source: Box<TriggerError>,
    },
}

/// How many times a loop runs its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repeat {
    /// Exactly this many passes. `Times(0)` finishes without running.
    Times(u32),
    /// Run until the loop is unregistered.
    Forever,
}

impl Repeat {
    /// Whether `completed` passes exhaust the bound.
    pub const fn is_reached(self, completed: u32) -> bool {
        match self {
            Self::Times(limit) => completed >= limit,
            Self::Forever => false,
        }
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Times(limit) => write!(f, "{limit}"),
            Self::Forever => f.write_str("forever"),
        }
    }
}

/// A delayed action fired once at a fixed list of targets.
pub struct Leaf<W> {
    label: String,
    temporizer: Temporizer,
    action: TriggerAction,
    targets: Vec<Target<W>>,
    /// Latched once the action has been delivered.
    fired: bool,
}

impl<W> Leaf<W> {
    /// The action delivered to the targets.
    pub const fn action(&self) -> TriggerAction {
        self.action
    }

    /// The targets, in firing order.
    pub fn targets(&self) -> &[Target<W>] {
        &self.targets
    }

    /// Ticks left before the action fires (0 once fired).
    pub const fn remaining(&self) -> u32 {
        if self.fired { 0 } else { self.temporizer.remaining() }
    }

    fn tick(&mut self, ctx: &mut TickContext<'_, W>) -> Result<Interest, ActuatorError> {
        if self.fired {
            return Ok(Interest::Done);
        }
        if !self.temporizer.trigger() {
            return Ok(Interest::Continue);
        }

        self.fired = true;
        debug!(
            tick = ctx.tick(),
            actuator = self.label,
            action = ?self.action,
            targets = self.targets.len(),
            "Actuator fired"
        );
        for target in &self.targets {
            target
                .trigger(ctx, self.action)
                .map_err(|source| ActuatorError::Target {
                    actuator: self.label.clone(),
                    target: target.label().to_owned(),
                    action: self.action,
                    source: Box::new(source),
                })?;
        }
        Ok(Interest::Done)
    }

    const fn reset(&mut self) {
        self.temporizer.reset();
        self.fired = false;
    }
}

impl<W> Clone for Leaf<W> {
    fn clone(&self) -> Self {
        let mut temporizer = self.temporizer.clone();
        temporizer.reset();
        Self {
            label: self.label.clone(),
            temporizer,
            action: self.action,
            targets: self.targets.clone(),
            fired: false,
        }
    }
}

/// Children run back to back.
pub struct Sequence<W> {
    label: String,
    children: Vec<Actuator<W>>,
    /// Index of the child currently ticking.
    cursor: usize,
}

impl<W> Sequence<W> {
    fn from_children(children: Vec<Actuator<W>>) -> Self {
        let mut sequence = Self {
            label: String::new(),
            children,
            cursor: 0,
        };
        sequence.relabel();
        sequence
    }

    /// Append an actuator to run after the current children.
    pub fn push(&mut self, actuator: Actuator<W>) {
        // Extend the label in place: `Sequence[a,b]` becomes `Sequence[a,b,c]`.
        self.label.pop();
        if !self.children.is_empty() {
            self.label.push(',');
        }
        self.label.push_str(actuator.label());
        self.label.push(']');
        self.children.push(actuator);
    }

    /// The children that have not finished yet, front first.
    pub fn children(&self) -> &[Actuator<W>] {
        self.children.get(self.cursor..).unwrap_or_default()
    }

    fn relabel(&mut self) {
        let labels: Vec<&str> = self.children.iter().map(Actuator::label).collect();
        self.label = format!("Sequence[{}]", labels.join(","));
    }

    fn tick(&mut self, ctx: &mut TickContext<'_, W>) -> Result<Interest, ActuatorError> {
        let Some(front) = self.children.get_mut(self.cursor) else {
            return Ok(Interest::Done);
        };
        if front.tick(ctx)? == Interest::Done {
            self.cursor = self.cursor.saturating_add(1);
            debug!(
                tick = ctx.tick(),
                actuator = self.label,
                remaining = self.children.len().saturating_sub(self.cursor),
                "Sequence advanced"
            );
        }
        Ok(Interest::from_bool(self.cursor < self.children.len()))
    }

    fn reset(&mut self) {
        self.cursor = 0;
        for child in &mut self.children {
            child.reset();
        }
    }

    fn pristine(&self) -> Self {
        Self {
            label: self.label.clone(),
            children: self.children.iter().map(Actuator::pristine).collect(),
            cursor: 0,
        }
    }
}

impl<W> Clone for Sequence<W> {
    fn clone(&self) -> Self {
        Self::from_children(self.children().to_vec())
    }
}

/// A body repeated a bounded number of times.
pub struct Loop<W> {
    label: String,
    body: Box<Actuator<W>>,
    bound: Repeat,
    completed: u32,
}

impl<W> Loop<W> {
    /// The repetition bound.
    pub const fn bound(&self) -> Repeat {
        self.bound
    }

    /// Number of passes completed so far.
    pub const fn completed(&self) -> u32 {
        self.completed
    }

    /// The repeated body.
    pub fn body(&self) -> &Actuator<W> {
        &self.body
    }

    fn tick(&mut self, ctx: &mut TickContext<'_, W>) -> Result<Interest, ActuatorError> {
        if self.bound.is_reached(self.completed) {
            return Ok(Interest::Done);
        }
        if self.body.tick(ctx)? == Interest::Done {
            self.completed = self.completed.saturating_add(1);
            self.body.reset();
            debug!(
                tick = ctx.tick(),
                actuator = self.label,
                completed = self.completed,
                "Loop pass completed"
            );
        }
        Ok(Interest::from_bool(!self.bound.is_reached(self.completed)))
    }

    fn reset(&mut self) {
        self.completed = 0;
        self.body.reset();
    }

    fn pristine(&self) -> Self {
        Self {
            label: self.label.clone(),
            body: Box::new(self.body.pristine()),
            bound: self.bound,
            completed: 0,
        }
    }
}

impl<W> Clone for Loop<W> {
    fn clone(&self) -> Self {
        self.pristine()
    }
}

/// A timed action: a leaf, a sequence of actuators, or a loop.
pub enum Actuator<W> {
    /// Fires once after a delay.
    Leaf(Leaf<W>),
    /// Runs children one after the other.
    Sequence(Sequence<W>),
    /// Repeats a body.
    Loop(Loop<W>),
}

impl<W> Actuator<W> {
    /// Build an actuator firing `action` at `targets` after `duration` ticks.
    ///
    /// # Errors
    ///
    /// Returns [`ActuatorError::ZeroDuration`] or [`ActuatorError::NoTargets`].
    pub fn leaf(
        duration: u32,
        action: TriggerAction,
        targets: Vec<Target<W>>,
    ) -> Result<Self, ActuatorError> {
        if duration == 0 {
            return Err(ActuatorError::ZeroDuration);
        }
        if targets.is_empty() {
            return Err(ActuatorError::NoTargets);
        }
        let labels: Vec<&str> = targets.iter().map(|target| target.label()).collect();
        let label = format!("Actuator[{}]", labels.join(","));
        let temporizer = Temporizer::new(label.clone(), duration)?;
        Ok(Self::Leaf(Leaf {
            label,
            temporizer,
            action,
            targets,
            fired: false,
        }))
    }

    /// Build an actuator running `children` back to back.
    ///
    /// # Errors
    ///
    /// Returns [`ActuatorError::NoChildren`] when `children` is empty.
    pub fn sequence(children: Vec<Self>) -> Result<Self, ActuatorError> {
        if children.is_empty() {
            return Err(ActuatorError::NoChildren);
        }
        Ok(Self::Sequence(Sequence::from_children(children)))
    }

    /// Build an actuator running `body` as many times as `bound` allows.
    pub fn repeat(bound: Repeat, body: Self) -> Self {
        let label = format!("Loop[{bound} x {}]", body.label());
        Self::Loop(Loop {
            label,
            body: Box::new(body),
            bound,
            completed: 0,
        })
    }

    /// Build a loop over a bundle of actuators run in sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ActuatorError::NoChildren`] when `bodies` is empty.
    pub fn repeat_all(bound: Repeat, bodies: Vec<Self>) -> Result<Self, ActuatorError> {
        Ok(Self::repeat(bound, Self::sequence(bodies)?))
    }

    /// Human-readable label built from the target and child labels.
    pub fn label(&self) -> &str {
        match self {
            Self::Leaf(leaf) => &leaf.label,
            Self::Sequence(sequence) => &sequence.label,
            Self::Loop(repeat) => &repeat.label,
        }
    }

    /// Advance by one tick. Returns whether further ticks are wanted.
    ///
    /// # Errors
    ///
    /// Returns [`ActuatorError::Target`] when a target rejects the action.
    pub fn tick(&mut self, ctx: &mut TickContext<'_, W>) -> Result<Interest, ActuatorError> {
        match self {
            Self::Leaf(leaf) => leaf.tick(ctx),
            Self::Sequence(sequence) => sequence.tick(ctx),
            Self::Loop(repeat) => repeat.tick(ctx),
        }
    }

    /// Rewind to the state right after construction.
    pub fn reset(&mut self) {
        match self {
            Self::Leaf(leaf) => leaf.reset(),
            Self::Sequence(sequence) => sequence.reset(),
            Self::Loop(repeat) => repeat.reset(),
        }
    }

    /// A fresh copy including children a sequence already finished.
    fn pristine(&self) -> Self {
        match self {
            Self::Leaf(leaf) => Self::Leaf(leaf.clone()),
            Self::Sequence(sequence) => Self::Sequence(sequence.pristine()),
            Self::Loop(repeat) => Self::Loop(repeat.pristine()),
        }
    }
}

impl<W> Clone for Actuator<W> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(leaf) => Self::Leaf(leaf.clone()),
            Self::Sequence(sequence) => Self::Sequence(sequence.clone()),
            Self::Loop(repeat) => Self::Loop(repeat.clone()),
        }
    }
}

impl<W> fmt::Debug for Actuator<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => f
                .debug_struct("Leaf")
                .field("label", &leaf.label)
                .field("action", &leaf.action)
                .field("remaining", &leaf.remaining())
                .finish(),
            Self::Sequence(sequence) => f
                .debug_struct("Sequence")
                .field("label", &sequence.label)
                .field("children", &sequence.children())
                .finish(),
            Self::Loop(repeat) => f
                .debug_struct("Loop")
                .field("bound", &repeat.bound)
                .field("completed", &repeat.completed)
                .field("body", &repeat.body)
                .finish(),
        }
    }
}

impl<W> Listener<W> for Actuator<W> {
    fn label(&self) -> &str {
        Self::label(self)
    }

    fn on_tick(&mut self, ctx: &mut TickContext<'_, W>) -> Result<Interest, ListenerError> {
        Ok(self.tick(ctx)?)
    }
}

/// Merge two optional actuators so that `second` runs after `first`.
///
/// When `first` is already a sequence, `second` is appended to it in place.
pub fn combine<W>(first: Option<Actuator<W>>, second: Option<Actuator<W>>) -> Option<Actuator<W>> {
    match (first, second) {
        (None, None) => None,
        (None, Some(actuator)) | (Some(actuator), None) => Some(actuator),
        (Some(Actuator::Sequence(mut sequence)), Some(second)) => {
            sequence.push(second);
            Some(Actuator::Sequence(sequence))
        }
        (Some(first), Some(second)) => Some(Actuator::Sequence(Sequence::from_children(vec![
            first, second,
        ]))),
    }
}

/// An optional actuator held by a domain object (a pad, a wall switch).
pub struct ActuatorSlot<W> {
    actuator: Option<Actuator<W>>,
}

impl<W> ActuatorSlot<W> {
    /// An empty slot.
    pub const fn new() -> Self {
        Self { actuator: None }
    }

    /// The held actuator, if any.
    pub const fn get(&self) -> Option<&Actuator<W>> {
        self.actuator.as_ref()
    }

    /// Whether the slot is empty.
    pub const fn is_empty(&self) -> bool {
        self.actuator.is_none()
    }

    /// Replace the held actuator, returning the previous one.
    pub fn set(&mut self, actuator: Actuator<W>) -> Option<Actuator<W>> {
        self.actuator.replace(actuator)
    }

    /// Chain `actuator` after the held one.
    pub fn add(&mut self, actuator: Actuator<W>) {
        self.actuator = combine(self.actuator.take(), Some(actuator));
    }

    /// Remove and return the held actuator.
    pub fn take(&mut self) -> Option<Actuator<W>> {
        self.actuator.take()
    }

    /// Empty the slot.
    pub fn clear(&mut self) {
        self.actuator = None;
    }
}

impl<W> Default for ActuatorSlot<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> fmt::Debug for ActuatorSlot<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActuatorSlot").field(&self.actuator).finish()
    }
}
