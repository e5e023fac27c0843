//! Bounded simulation loop.
//!
//! [`run_until_idle`] drives a [`Clock`] until no listener is left or a tick
//! budget is spent. It is the top-level loop of the engine binary and of the
//! scenario tests; callers observe progress through a [`TickCallback`].

use serde::Serialize;
use tracing::{info, warn};

use crate::clock::{Clock, ClockError, TickSummary};

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndReason {
    /// Every listener finished.
    Idle,
    /// The tick budget was spent while listeners were still registered.
    MaxTicks,
}

/// Outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    /// Why the run stopped.
    pub end_reason: EndReason,
    /// Number of ticks dispatched by this run.
    pub total_ticks: u64,
    /// Summary of the last tick, if any ran.
    pub last_summary: Option<TickSummary>,
}

/// Observer invoked after every tick of a run.
pub trait TickCallback<W> {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, world: &W);
}

/// A callback that ignores every tick.
pub struct NoOpCallback;

impl<W> TickCallback<W> for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _world: &W) {}
}

/// Tick `clock` until it has no listener left or `max_ticks` ticks ran.
///
/// A clock that is already idle returns immediately without ticking.
///
/// # Errors
///
/// Returns [`RunnerError::Clock`] when a tick fails; the run stops there.
pub fn run_until_idle<W>(
    clock: &mut Clock<W>,
    world: &mut W,
    max_ticks: u64,
    callback: &mut dyn TickCallback<W>,
) -> Result<RunResult, RunnerError> {
    info!(
        start_tick = clock.tick_id(),
        listeners = clock.len(),
        max_ticks,
        "Run starting"
    );

    let mut total_ticks: u64 = 0;
    let mut last_summary = None;

    while !clock.is_empty() {
        if total_ticks >= max_ticks {
            warn!(
                tick = clock.tick_id(),
                listeners = clock.len(),
                labels = ?clock.labels(),
                "Tick budget spent with listeners still registered"
            );
            return Ok(RunResult {
                end_reason: EndReason::MaxTicks,
                total_ticks,
                last_summary,
            });
        }

        let summary = clock.tick(world)?;
        total_ticks = total_ticks.saturating_add(1);
        callback.on_tick(&summary, world);
        last_summary = Some(summary);
    }

    info!(tick = clock.tick_id(), total_ticks, "Run finished, clock idle");
    Ok(RunResult {
        end_reason: EndReason::Idle,
        total_ticks,
        last_summary,
    })
}
