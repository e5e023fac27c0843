//! One-shot commands run after a delay.

use tracing::debug;

use crate::clock::{Interest, Listener, ListenerError, TickContext};
use crate::temporizer::{Temporizer, TemporizerError};

/// A listener that runs a closure once, `delay` ticks after registration,
/// then leaves the clock.
pub struct Deferred<W, F> {
    temporizer: Temporizer,
    command: Option<F>,
    _world: std::marker::PhantomData<fn(&mut W)>,
}

impl<W, F> Deferred<W, F>
where
    F: FnOnce(&mut TickContext<'_, W>) -> Result<(), ListenerError>,
{
    /// Schedule `command` to run after `delay` ticks.
    ///
    /// # Errors
    ///
    /// Returns [`TemporizerError`] for a blank label or a zero delay.
    pub fn new(label: impl Into<String>, delay: u32, command: F) -> Result<Self, TemporizerError> {
        Ok(Self {
            temporizer: Temporizer::new(label, delay)?,
            command: Some(command),
            _world: std::marker::PhantomData,
        })
    }

    /// Ticks left before the command runs.
    pub const fn remaining(&self) -> u32 {
        self.temporizer.remaining()
    }
}

impl<W, F> Listener<W> for Deferred<W, F>
where
    F: FnOnce(&mut TickContext<'_, W>) -> Result<(), ListenerError>,
{
    fn label(&self) -> &str {
        self.temporizer.label()
    }

    fn on_tick(&mut self, ctx: &mut TickContext<'_, W>) -> Result<Interest, ListenerError> {
        if !self.temporizer.trigger() {
            return Ok(Interest::Continue);
        }
        if let Some(command) = self.command.take() {
            debug!(tick = ctx.tick(), command = self.temporizer.label(), "Running deferred command");
            command(ctx)?;
        }
        Ok(Interest::Done)
    }
}
