//! Countdown helper used by listeners to know when, after how many ticks,
//! to act.
//!
//! A [`Temporizer`] is a plain value owned by the listener that calls it.
//! It knows nothing about the [`Clock`]: the owner calls
//! [`Temporizer::trigger`] exactly once per tick it receives, and the
//! temporizer answers `true` on the tick where its countdown reaches zero.
//!
//! After firing, the countdown re-arms itself, so a temporizer of duration
//! `D` fires on calls `D`, `2D`, `3D`... This gives periodic cadences for
//! free (door animation, projectile movement) while keeping the one-shot
//! contract: exactly one `true` within the first `D` calls, on call `D`.
//!
//! [`Clock`]: crate::clock::Clock

use tracing::debug;

/// Errors that can occur when creating a temporizer.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TemporizerError {
    /// The owner label is empty or whitespace.
    #[error("temporizer label must not be blank")]
    BlankLabel,

    /// The duration is zero ticks.
    #[error("temporizer '{label}' duration must be at least 1 tick")]
    ZeroDuration {
        /// Label of the rejected temporizer.
        label: String,
    },
}

/// A named countdown over clock ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Temporizer {
    /// Diagnostic label, usually the owner's name.
    label: String,
    /// Number of ticks between two firings.
    duration: u32,
    /// Ticks left before the next firing.
    remaining: u32,
}

impl Temporizer {
    /// Create a temporizer firing every `duration` ticks.
    ///
    /// # Errors
    ///
    /// Returns [`TemporizerError::BlankLabel`] for an empty label and
    /// [`TemporizerError::ZeroDuration`] when `duration` is 0.
    pub fn new(label: impl Into<String>, duration: u32) -> Result<Self, TemporizerError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(TemporizerError::BlankLabel);
        }
        if duration == 0 {
            return Err(TemporizerError::ZeroDuration { label });
        }
        Ok(Self {
            label,
            duration,
            remaining: duration,
        })
    }

    /// Notify the temporizer that one tick elapsed.
    ///
    /// Returns `true` when the countdown reaches zero on this call; the
    /// countdown then starts over from the full duration.
    pub fn trigger(&mut self) -> bool {
        let before = self.remaining;
        self.remaining = self.remaining.saturating_sub(1);
        debug!(
            temporizer = self.label,
            before,
            after = self.remaining,
            "Temporizer countdown"
        );

        if self.remaining == 0 {
            debug!(temporizer = self.label, "Temporizer timed out");
            self.remaining = self.duration;
            return true;
        }
        false
    }

    /// Restart the countdown from the full duration.
    pub const fn reset(&mut self) {
        self.remaining = self.duration;
    }

    /// Return the diagnostic label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Return the number of ticks between two firings.
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// Return the number of ticks left before the next firing.
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_is_rejected() {
        let result = Temporizer::new("Test", 0);
        assert_eq!(
            result,
            Err(TemporizerError::ZeroDuration {
                label: "Test".to_owned()
            })
        );
    }

    #[test]
    fn blank_label_is_rejected() {
        assert_eq!(Temporizer::new("  ", 3), Err(TemporizerError::BlankLabel));
    }

    #[test]
    fn fires_on_the_last_tick_of_the_countdown() {
        let mut temporizer = Temporizer::new("Test", 3).unwrap();
        assert!(!temporizer.trigger());
        assert!(!temporizer.trigger());
        assert!(temporizer.trigger());
    }

    #[test]
    fn re_arms_after_firing() {
        let mut temporizer = Temporizer::new("Test", 2).unwrap();
        for _ in 0..5 {
            assert!(!temporizer.trigger());
            assert!(temporizer.trigger());
        }
    }

    #[test]
    fn duration_of_one_fires_every_tick() {
        let mut temporizer = Temporizer::new("Test", 1).unwrap();
        for _ in 0..4 {
            assert!(temporizer.trigger());
        }
    }

    #[test]
    fn reset_restarts_the_countdown() {
        let mut temporizer = Temporizer::new("Test", 3).unwrap();
        assert!(!temporizer.trigger());
        assert!(!temporizer.trigger());
        assert_eq!(temporizer.remaining(), 1);
        temporizer.reset();
        assert_eq!(temporizer.remaining(), 3);
        assert!(!temporizer.trigger());
        assert!(!temporizer.trigger());
        assert!(temporizer.trigger());
    }
}
