//! State graphs for timed entities.
//!
//! Timed entities (projectiles, doors, creatures) register themselves with
//! the clock and walk a small state graph, one step per cadence tick. The
//! graph is declared once per entity type by implementing [`StateGraph`];
//! [`StateMachine`] enforces it at runtime and turns an illegal move into a
//! [`TransitionError`] instead of silently corrupting the entity.

use std::fmt::Debug;

use tracing::debug;

/// Raised when an entity attempts a move its state graph forbids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity}: illegal transition {from} -> {to}")]
pub struct TransitionError {
    /// Label of the entity.
    pub entity: String,
    /// State the entity was in.
    pub from: String,
    /// State it tried to reach.
    pub to: String,
}

/// The legal moves between the states of an entity type.
pub trait StateGraph: Copy + Eq + Debug {
    /// Whether the graph has an edge from `self` to `next`.
    fn allows(self, next: Self) -> bool;

    /// Whether no edge leaves this state.
    fn is_terminal(self) -> bool;
}

/// The current state of one entity, checked against its graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMachine<S> {
    owner: String,
    state: S,
}

impl<S: StateGraph> StateMachine<S> {
    /// Start `owner` in `initial`.
    pub fn new(owner: impl Into<String>, initial: S) -> Self {
        Self {
            owner: owner.into(),
            state: initial,
        }
    }

    /// The current state.
    pub const fn state(&self) -> S {
        self.state
    }

    /// Whether the current state is terminal.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Move to `next`. Staying in the current state is always allowed.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the graph has no edge to `next`.
    pub fn transition(&mut self, next: S) -> Result<(), TransitionError> {
        if next == self.state {
            return Ok(());
        }
        if !self.state.allows(next) {
            return Err(TransitionError {
                entity: self.owner.clone(),
                from: format!("{:?}", self.state),
                to: format!("{next:?}"),
            });
        }
        debug!(entity = self.owner, from = ?self.state, to = ?next, "State changed");
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Fuse {
        Lit,
        Burning,
        Spent,
    }

    impl StateGraph for Fuse {
        fn allows(self, next: Self) -> bool {
            matches!(
                (self, next),
                (Self::Lit, Self::Burning) | (Self::Burning, Self::Spent)
            )
        }

        fn is_terminal(self) -> bool {
            self == Self::Spent
        }
    }

    #[test]
    fn follows_the_graph() {
        let mut fuse = StateMachine::new("fuse", Fuse::Lit);
        fuse.transition(Fuse::Burning).unwrap();
        fuse.transition(Fuse::Spent).unwrap();
        assert_eq!(fuse.state(), Fuse::Spent);
        assert!(fuse.is_terminal());
    }

    #[test]
    fn staying_put_is_a_no_op() {
        let mut fuse = StateMachine::new("fuse", Fuse::Burning);
        fuse.transition(Fuse::Burning).unwrap();
        assert_eq!(fuse.state(), Fuse::Burning);
    }

    #[test]
    fn skipping_a_state_is_rejected() {
        let mut fuse = StateMachine::new("fuse", Fuse::Lit);
        let err = fuse.transition(Fuse::Spent).unwrap_err();
        assert_eq!(
            err,
            TransitionError {
                entity: "fuse".to_owned(),
                from: "Lit".to_owned(),
                to: "Spent".to_owned(),
            }
        );
        assert_eq!(fuse.state(), Fuse::Lit);
        assert_eq!(err.to_string(), "fuse: illegal transition Lit -> Spent");
    }

    #[test]
    fn going_backwards_is_rejected() {
        let mut fuse = StateMachine::new("fuse", Fuse::Spent);
        assert!(fuse.transition(Fuse::Lit).is_err());
    }
}
