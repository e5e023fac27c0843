//! Virtual-time clock and listener dispatch.
//!
//! The clock is the single source of time for the simulation. It counts
//! ticks (one tick is 1/6 s of game time) and, on every tick, notifies each
//! registered [`Listener`] exactly once, in registration order. A listener
//! answers with an [`Interest`]: [`Interest::Done`] removes it for good.
//!
//! # Dispatch discipline
//!
//! - The registry is moved out of the clock for the duration of a round, so
//!   the round always runs over the listeners present when it started.
//! - Listeners may register or unregister other listeners from inside their
//!   callback through the [`TickContext`]. Those requests are staged in a
//!   [`Registry`] and applied once the round is over: new listeners are first
//!   notified on the next tick, and unregistered ones still receive the
//!   current tick.
//! - A listener returning an error aborts the round. The error is returned
//!   with the offending listener's id and label; the tick is not counted and
//!   no listener is dropped because of the failure.
//!
//! The clock is generic over the world type `W` that listeners mutate. It
//! does not own the world: the simulation root passes it to every
//! [`Clock::tick`] call.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::actuator::ActuatorError;
use crate::entity::TransitionError;
use crate::trigger::TriggerError;

/// Number of ticks in one second of game time.
pub const ONE_SECOND: u64 = 6;

/// Errors a listener can report from its tick callback.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// An actuator failed to fire one of its targets.
    #[error("actuator error: {source}")]
    Actuator {
        /// The underlying actuator error.
        #[from]
        source: ActuatorError,
    },

    /// A timed entity attempted a transition its state graph forbids.
    #[error("transition error: {source}")]
    Transition {
        /// The underlying transition error.
        #[from]
        source: TransitionError,
    },

    /// A target rejected a trigger issued directly by the listener.
    #[error("trigger error: {source}")]
    Trigger {
        /// The underlying trigger error.
        #[from]
        source: TriggerError,
    },

    /// A failure in the world model the listener operates on.
    #[error("world error: {source}")]
    World {
        /// The underlying domain error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors that can occur while advancing the clock.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// A bulk tick was requested with a count of zero.
    #[error("tick count must be at least 1")]
    ZeroTickCount,

    /// A listener failed during dispatch; the tick was aborted.
    #[error("listener {id} ({label}) failed at tick {tick}: {source}")]
    Listener {
        /// Handle of the failing listener.
        id: ListenerId,
        /// Label of the failing listener.
        label: String,
        /// The tick being dispatched.
        tick: u64,
        /// The listener's error.
        source: Box<ListenerError>,
    },
}

/// Handle identifying a registered listener.
///
/// Ids are allocated from a per-clock counter, so the same sequence of
/// registrations always yields the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Return the raw counter value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A listener's answer to a tick notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interest {
    /// Keep the listener registered.
    Continue,
    /// Remove the listener; it will not be notified again.
    Done,
}

impl Interest {
    /// `Continue` when `keep` is true, `Done` otherwise.
    pub const fn from_bool(keep: bool) -> Self {
        if keep { Self::Continue } else { Self::Done }
    }
}

/// Anything that wants to be told when a tick elapses.
pub trait Listener<W> {
    /// Human-readable label for logs and errors.
    fn label(&self) -> &str;

    /// Called once per tick while registered.
    ///
    /// # Errors
    ///
    /// Any error is fatal for the current tick: the clock aborts the round
    /// and reports it to its caller.
    fn on_tick(&mut self, ctx: &mut TickContext<'_, W>) -> Result<Interest, ListenerError>;
}

/// Something listeners can be registered with.
///
/// Implemented by [`Clock`] (changes apply immediately) and by
/// [`Registry`] (changes are staged until the current round ends).
pub trait Schedule<W> {
    /// Register a listener and return its handle.
    fn register(&mut self, listener: Box<dyn Listener<W>>) -> ListenerId;

    /// Request removal of a listener. Unknown ids are ignored.
    fn unregister(&mut self, id: ListenerId);
}

/// A registered listener together with its handle.
struct Entry<W> {
    id: ListenerId,
    listener: Box<dyn Listener<W>>,
}

/// Staging area for registry changes requested during a round.
pub struct Registry<W> {
    /// Next id to hand out.
    next_id: u64,
    /// Listeners registered since the last settle, in request order.
    staged: Vec<Entry<W>>,
    /// Ids whose removal was requested since the last settle.
    retired: BTreeSet<ListenerId>,
}

impl<W> Registry<W> {
    /// Create an empty registry whose ids start at 1.
    pub const fn new() -> Self {
        Self {
            next_id: 1,
            staged: Vec::new(),
            retired: BTreeSet::new(),
        }
    }

    fn allocate(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }
}

impl<W> Default for Registry<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Schedule<W> for Registry<W> {
    fn register(&mut self, listener: Box<dyn Listener<W>>) -> ListenerId {
        let id = self.allocate();
        debug!(listener = %id, label = listener.label(), "Listener staged");
        self.staged.push(Entry { id, listener });
        id
    }

    fn unregister(&mut self, id: ListenerId) {
        let before = self.staged.len();
        self.staged.retain(|entry| entry.id != id);
        if self.staged.len() == before {
            self.retired.insert(id);
        }
    }
}

/// Everything a listener may touch while handling a tick.
pub struct TickContext<'a, W> {
    tick: u64,
    world: &'a mut W,
    registry: &'a mut Registry<W>,
}

impl<'a, W> TickContext<'a, W> {
    /// Build a context for the given tick.
    ///
    /// The clock builds one per round; tests use this to drive a single
    /// listener or actuator directly.
    pub const fn new(tick: u64, world: &'a mut W, registry: &'a mut Registry<W>) -> Self {
        Self {
            tick,
            world,
            registry,
        }
    }

    /// The tick being dispatched (the first tick is 1).
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Shared access to the world.
    pub const fn world(&self) -> &W {
        &*self.world
    }

    /// Mutable access to the world.
    pub const fn world_mut(&mut self) -> &mut W {
        &mut *self.world
    }

    /// Split into the world and the staging registry, for code that needs
    /// to mutate the world and schedule listeners at the same time.
    pub const fn split(&mut self) -> (&mut W, &mut Registry<W>) {
        (&mut *self.world, &mut *self.registry)
    }
}

impl<W> Schedule<W> for TickContext<'_, W> {
    fn register(&mut self, listener: Box<dyn Listener<W>>) -> ListenerId {
        self.registry.register(listener)
    }

    fn unregister(&mut self, id: ListenerId) {
        self.registry.unregister(id);
    }
}

/// Summary of a single tick's dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick that was dispatched.
    pub tick: u64,
    /// Number of listeners notified.
    pub dispatched: usize,
    /// Number of listeners that reported [`Interest::Done`].
    pub released: usize,
    /// Number of listeners registered during the round.
    pub registered: usize,
    /// Number of listeners removed by an unregister request during the round.
    pub unregistered: usize,
    /// Number of listeners registered once the round settled.
    pub live: usize,
}

/// The simulation clock.
pub struct Clock<W> {
    /// Number of ticks dispatched so far.
    tick: u64,
    /// Registered listeners in dispatch order.
    active: Vec<Entry<W>>,
    /// Id allocation and staged changes.
    registry: Registry<W>,
}

impl<W> Clock<W> {
    /// Create a clock at tick 0 with no listeners.
    pub const fn new() -> Self {
        Self {
            tick: 0,
            active: Vec::new(),
            registry: Registry::new(),
        }
    }

    /// Return the number of ticks dispatched so far.
    pub const fn tick_id(&self) -> u64 {
        self.tick
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Whether the given listener is still registered.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.active.iter().any(|entry| entry.id == id)
    }

    /// Labels of the registered listeners, in dispatch order.
    pub fn labels(&self) -> Vec<&str> {
        self.active
            .iter()
            .map(|entry| entry.listener.label())
            .collect()
    }

    /// Register a listener. It is first notified on the next tick.
    pub fn register(&mut self, listener: Box<dyn Listener<W>>) -> ListenerId {
        let id = self.registry.allocate();
        debug!(listener = %id, label = listener.label(), "Registered listener");
        self.active.push(Entry { id, listener });
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.active.len();
        self.active.retain(|entry| entry.id != id);
        let removed = self.active.len() != before;
        if removed {
            debug!(listener = %id, "Unregistered listener");
        }
        removed
    }

    /// Advance virtual time by one tick and notify every listener.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Listener`] if a listener fails (the tick is
    /// then not counted) or [`ClockError::TickOverflow`] at `u64::MAX`.
    pub fn tick(&mut self, world: &mut W) -> Result<TickSummary, ClockError> {
        let tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        debug!(tick, listeners = self.active.len(), "Tick started");

        let round = std::mem::take(&mut self.active);
        let dispatched = round.len();
        let mut survivors = Vec::with_capacity(dispatched);
        let mut released: usize = 0;
        let mut failure = None;
        let mut pending = round.into_iter();

        {
            let mut ctx = TickContext::new(tick, world, &mut self.registry);
            for mut entry in pending.by_ref() {
                match entry.listener.on_tick(&mut ctx) {
                    Ok(Interest::Continue) => survivors.push(entry),
                    Ok(Interest::Done) => {
                        released = released.saturating_add(1);
                        debug!(
                            tick,
                            listener = %entry.id,
                            label = entry.listener.label(),
                            "Listener released"
                        );
                    }
                    Err(source) => {
                        failure = Some((entry.id, entry.listener.label().to_owned(), source));
                        survivors.push(entry);
                        break;
                    }
                }
            }
        }

        // Listeners after a failing one were never visited; keep them.
        survivors.extend(pending);
        self.active = survivors;
        let (registered, unregistered) = self.settle();

        if let Some((id, label, source)) = failure {
            warn!(
                tick,
                listener = %id,
                label = %label,
                error = %source,
                "Listener failed, tick aborted"
            );
            return Err(ClockError::Listener {
                id,
                label,
                tick,
                source: Box::new(source),
            });
        }

        self.tick = tick;
        Ok(TickSummary {
            tick,
            dispatched,
            released,
            registered,
            unregistered,
            live: self.active.len(),
        })
    }

    /// Advance virtual time by `count` ticks. Returns the last summary.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::ZeroTickCount`] when `count` is 0, and stops at
    /// the first failing tick otherwise.
    pub fn tick_n(&mut self, world: &mut W, count: u64) -> Result<TickSummary, ClockError> {
        if count == 0 {
            return Err(ClockError::ZeroTickCount);
        }
        debug!(count, "Ticking");
        let mut last = self.tick(world)?;
        for _ in 1..count {
            last = self.tick(world)?;
        }
        Ok(last)
    }

    /// Drop every listener and rewind time to zero.
    pub fn reset(&mut self) {
        let dropped = self.active.len();
        self.tick = 0;
        self.active.clear();
        self.registry = Registry::new();
        info!(dropped, "Clock reset");
    }

    /// Apply changes staged during the last round.
    ///
    /// New listeners join at the back in request order; removals are applied
    /// afterwards so a listener registered and unregistered in the same round
    /// never runs.
    fn settle(&mut self) -> (usize, usize) {
        let registered = self.registry.staged.len();
        self.active.append(&mut self.registry.staged);

        let retired = std::mem::take(&mut self.registry.retired);
        let before = self.active.len();
        if !retired.is_empty() {
            self.active.retain(|entry| !retired.contains(&entry.id));
        }
        let unregistered = before.saturating_sub(self.active.len());
        (registered, unregistered)
    }
}

impl<W> Default for Clock<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Schedule<W> for Clock<W> {
    fn register(&mut self, listener: Box<dyn Listener<W>>) -> ListenerId {
        Self::register(self, listener)
    }

    fn unregister(&mut self, id: ListenerId) {
        Self::unregister(self, id);
    }
}

impl<W> core::fmt::Debug for Clock<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Clock")
            .field("tick", &self.tick)
            .field("listeners", &self.labels())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    /// World used by the tests: a log of `(tick, label)` notifications.
    type Journal = Vec<(u64, String)>;

    /// Records every tick and stops after `lifetime` ticks.
    struct Recorder {
        label: String,
        lifetime: u32,
        seen: u32,
    }

    impl Recorder {
        fn boxed(label: &str, lifetime: u32) -> Box<dyn Listener<Journal>> {
            Box::new(Self {
                label: label.to_owned(),
                lifetime,
                seen: 0,
            })
        }
    }

    impl Listener<Journal> for Recorder {
        fn label(&self) -> &str {
            &self.label
        }

        fn on_tick(
            &mut self,
            ctx: &mut TickContext<'_, Journal>,
        ) -> Result<Interest, ListenerError> {
            let tick = ctx.tick();
            ctx.world_mut().push((tick, self.label.clone()));
            self.seen = self.seen.saturating_add(1);
            Ok(Interest::from_bool(self.seen < self.lifetime))
        }
    }

    /// Registers a recorder on its first tick, then keeps listening.
    struct Spawner {
        spawned: bool,
    }

    impl Listener<Journal> for Spawner {
        fn label(&self) -> &str {
            "spawner"
        }

        fn on_tick(
            &mut self,
            ctx: &mut TickContext<'_, Journal>,
        ) -> Result<Interest, ListenerError> {
            if !self.spawned {
                ctx.register(Recorder::boxed("child", u32::MAX));
                self.spawned = true;
            }
            Ok(Interest::Continue)
        }
    }

    /// Unregisters the given listener on its first tick.
    struct Killer {
        victim: ListenerId,
    }

    impl Listener<Journal> for Killer {
        fn label(&self) -> &str {
            "killer"
        }

        fn on_tick(
            &mut self,
            ctx: &mut TickContext<'_, Journal>,
        ) -> Result<Interest, ListenerError> {
            ctx.unregister(self.victim);
            Ok(Interest::Done)
        }
    }

    /// Registers a recorder and takes it back within the same callback.
    struct Fickle;

    impl Listener<Journal> for Fickle {
        fn label(&self) -> &str {
            "fickle"
        }

        fn on_tick(
            &mut self,
            ctx: &mut TickContext<'_, Journal>,
        ) -> Result<Interest, ListenerError> {
            let ghost = ctx.register(Recorder::boxed("ghost", u32::MAX));
            ctx.unregister(ghost);
            Ok(Interest::Continue)
        }
    }

    /// Fails on every tick.
    struct Broken;

    impl Listener<Journal> for Broken {
        fn label(&self) -> &str {
            "broken"
        }

        fn on_tick(
            &mut self,
            _ctx: &mut TickContext<'_, Journal>,
        ) -> Result<Interest, ListenerError> {
            Err(ListenerError::World {
                source: "boom".into(),
            })
        }
    }

    #[test]
    fn clock_starts_at_tick_zero() {
        let clock: Clock<Journal> = Clock::new();
        assert_eq!(clock.tick_id(), 0);
        assert!(clock.is_empty());
    }

    #[test]
    fn ticking_without_listeners_advances_time() {
        let mut clock = Clock::new();
        let mut journal = Journal::new();
        let summary = clock.tick_n(&mut journal, 5).unwrap();
        assert_eq!(clock.tick_id(), 5);
        assert_eq!(summary.tick, 5);
        assert_eq!(summary.dispatched, 0);
    }

    #[test]
    fn zero_tick_count_is_rejected() {
        let mut clock: Clock<Journal> = Clock::new();
        let mut journal = Journal::new();
        assert!(matches!(
            clock.tick_n(&mut journal, 0),
            Err(ClockError::ZeroTickCount)
        ));
        assert_eq!(clock.tick_id(), 0);
    }

    #[test]
    fn listeners_are_notified_in_registration_order() {
        let mut clock = Clock::new();
        let mut journal = Journal::new();
        clock.register(Recorder::boxed("a", 10));
        clock.register(Recorder::boxed("b", 10));
        clock.register(Recorder::boxed("c", 10));

        clock.tick(&mut journal).unwrap();

        let labels: Vec<&str> = journal.iter().map(|(_, label)| label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
        assert!(journal.iter().all(|(tick, _)| *tick == 1));
    }

    #[test]
    fn done_listener_is_never_notified_again() {
        let mut clock = Clock::new();
        let mut journal = Journal::new();
        let id = clock.register(Recorder::boxed("once", 1));

        let summary = clock.tick(&mut journal).unwrap();
        assert_eq!(summary.released, 1);
        assert!(!clock.contains(id));

        clock.tick_n(&mut journal, 3).unwrap();
        assert_eq!(journal, vec![(1, "once".to_owned())]);
        // Removing it again is a harmless no-op.
        assert!(!clock.unregister(id));
    }

    #[test]
    fn listener_registered_during_round_starts_next_tick() {
        let mut clock = Clock::new();
        let mut journal = Journal::new();
        clock.register(Box::new(Spawner { spawned: false }));

        let first = clock.tick(&mut journal).unwrap();
        assert_eq!(first.registered, 1);
        assert!(journal.is_empty());
        assert_eq!(clock.len(), 2);

        clock.tick(&mut journal).unwrap();
        assert_eq!(journal, vec![(2, "child".to_owned())]);
    }

    #[test]
    fn unregistration_during_round_applies_after_the_round() {
        let mut clock = Clock::new();
        let mut journal = Journal::new();
        // Ids are allocated sequentially: the killer gets #1, the victim #2.
        clock.register(Box::new(Killer {
            victim: ListenerId(2),
        }));
        let victim = clock.register(Recorder::boxed("victim", u32::MAX));
        assert_eq!(victim, ListenerId(2));

        let summary = clock.tick(&mut journal).unwrap();
        // The victim still received the tick in progress.
        assert_eq!(journal, vec![(1, "victim".to_owned())]);
        assert_eq!(summary.unregistered, 1);
        assert!(!clock.contains(victim));
        assert!(clock.is_empty());

        clock.tick(&mut journal).unwrap();
        assert_eq!(journal.len(), 1);
    }

    #[test]
    fn unregister_unknown_listener_is_a_no_op() {
        let mut clock: Clock<Journal> = Clock::new();
        assert!(!clock.unregister(ListenerId(42)));
    }

    #[test]
    fn failing_listener_aborts_the_tick() {
        let mut clock = Clock::new();
        let mut journal = Journal::new();
        clock.register(Recorder::boxed("before", u32::MAX));
        let broken = clock.register(Box::new(Broken));
        clock.register(Recorder::boxed("after", u32::MAX));

        let err = clock.tick(&mut journal).unwrap_err();
        match err {
            ClockError::Listener { id, label, tick, .. } => {
                assert_eq!(id, broken);
                assert_eq!(label, "broken");
                assert_eq!(tick, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Tick not counted, nobody dropped, the listener after the failure
        // was never visited.
        assert_eq!(clock.tick_id(), 0);
        assert_eq!(clock.len(), 3);
        assert_eq!(journal, vec![(1, "before".to_owned())]);
    }

    #[test]
    fn reset_behaves_like_a_fresh_clock() {
        let mut used = Clock::new();
        let mut journal = Journal::new();
        used.register(Recorder::boxed("old", u32::MAX));
        used.tick_n(&mut journal, 4).unwrap();
        used.reset();
        assert_eq!(used.tick_id(), 0);
        assert!(used.is_empty());

        let mut fresh = Clock::new();
        let mut used_journal = Journal::new();
        let mut fresh_journal = Journal::new();
        let used_id = used.register(Recorder::boxed("x", 2));
        let fresh_id = fresh.register(Recorder::boxed("x", 2));
        assert_eq!(used_id, fresh_id);

        used.tick_n(&mut used_journal, 3).unwrap();
        fresh.tick_n(&mut fresh_journal, 3).unwrap();
        assert_eq!(used_journal, fresh_journal);
        assert_eq!(used.tick_id(), fresh.tick_id());
        assert_eq!(used.len(), fresh.len());
    }

    #[test]
    fn staged_register_then_unregister_never_runs() {
        let mut clock = Clock::new();
        let mut journal = Journal::new();
        clock.register(Box::new(Fickle));

        let summary = clock.tick(&mut journal).unwrap();
        assert_eq!(summary.registered, 0);
        assert_eq!(summary.live, 1);
        clock.tick_n(&mut journal, 3).unwrap();
        assert!(journal.is_empty());
        assert_eq!(clock.labels(), vec!["fickle"]);
    }

    #[test]
    fn time_constants() {
        assert_eq!(ONE_SECOND, 6);
        assert_eq!(Interest::from_bool(true), Interest::Continue);
        assert_eq!(Interest::from_bool(false), Interest::Done);
    }
}
