//! Targets that actuators deliver their effect to.
//!
//! A [`Triggerable`] is anything an actuator can fire at: a door, a
//! launcher, a pressure pad relay. Targets are shared between actuators
//! (and between a pristine actuator and its clones), so they are held as
//! reference-counted [`Target`] handles. A target never owns the state it
//! mutates; it reaches the world through the [`TickContext`] it is handed.

use std::sync::Arc;

use catacomb_types::TriggerAction;

use crate::clock::TickContext;

/// Errors a target can report when triggered.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// The target does not support the requested action in its current state.
    #[error("{target} cannot handle {action:?}: {reason}")]
    Unsupported {
        /// Label of the target.
        target: String,
        /// The rejected action.
        action: TriggerAction,
        /// Why the action was rejected.
        reason: String,
    },

    /// The target failed while updating the world.
    #[error("{target} failed: {source}")]
    Domain {
        /// Label of the target.
        target: String,
        /// The underlying domain error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Something an actuator can fire at.
pub trait Triggerable<W> {
    /// Human-readable label, used in actuator labels and logs.
    fn label(&self) -> &str;

    /// Apply `action` to this target.
    ///
    /// # Errors
    ///
    /// Returns a [`TriggerError`] when the action does not apply to the
    /// target or the world update fails.
    fn trigger(&self, ctx: &mut TickContext<'_, W>, action: TriggerAction)
    -> Result<(), TriggerError>;
}

/// Shared handle to a trigger target.
pub type Target<W> = Arc<dyn Triggerable<W>>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing {
    //! Targets that record what they receive into a log world.

    use super::*;

    /// A world that is just a log of `(target, action)` pairs.
    pub type TriggerLog = Vec<(String, TriggerAction)>;

    /// Appends every trigger it receives to the log.
    pub struct Recording(pub String);

    impl Triggerable<TriggerLog> for Recording {
        fn label(&self) -> &str {
            &self.0
        }

        fn trigger(
            &self,
            ctx: &mut TickContext<'_, TriggerLog>,
            action: TriggerAction,
        ) -> Result<(), TriggerError> {
            ctx.world_mut().push((self.0.clone(), action));
            Ok(())
        }
    }

    /// Rejects every trigger.
    pub struct Refusing;

    impl Triggerable<TriggerLog> for Refusing {
        fn label(&self) -> &str {
            "refusing"
        }

        fn trigger(
            &self,
            _ctx: &mut TickContext<'_, TriggerLog>,
            action: TriggerAction,
        ) -> Result<(), TriggerError> {
            Err(TriggerError::Unsupported {
                target: "refusing".to_owned(),
                action,
                reason: "always refuses".to_owned(),
            })
        }
    }

    /// Build a shared recording target.
    pub fn recording(label: &str) -> Target<TriggerLog> {
        Arc::new(Recording(label.to_owned()))
    }
}
