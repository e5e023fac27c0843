//! Weapon-hand cooldowns.
//!
//! After an attack a champion's weapon hand is unusable for a number of
//! ticks. [`disable`] marks the hand as recovering and registers a
//! [`HandRecovery`] listener that re-enables it when the countdown runs out.

use catacomb_core::clock::{Interest, Listener, ListenerError, Schedule, TickContext};
use catacomb_core::temporizer::{Temporizer, TemporizerError};
use catacomb_types::ChampionId;
use tracing::debug;

use crate::dungeon::Dungeon;

/// Errors raised by weapon-hand cooldowns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CooldownError {
    /// The champion is not in the party.
    #[error("unknown champion {0}")]
    UnknownChampion(ChampionId),

    /// The cooldown duration is zero.
    #[error("{owner}: cooldown must last at least 1 tick")]
    ZeroDuration {
        /// Name of the hand's owner.
        owner: String,
    },

    /// The hand is already recovering.
    #[error("{owner}: weapon hand is already disabled")]
    AlreadyDisabled {
        /// Name of the hand's owner.
        owner: String,
    },

    /// The hand is already usable.
    #[error("{owner}: weapon hand is already enabled")]
    AlreadyEnabled {
        /// Name of the hand's owner.
        owner: String,
    },
}

impl From<CooldownError> for ListenerError {
    fn from(source: CooldownError) -> Self {
        Self::World {
            source: Box::new(source),
        }
    }
}

/// The hand a champion attacks with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponHand {
    owner: String,
    enabled: bool,
}

impl WeaponHand {
    /// A ready hand belonging to `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            enabled: true,
        }
    }

    /// Name of the champion owning the hand.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Whether the hand can be used.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Make the hand usable again.
    ///
    /// # Errors
    ///
    /// Returns [`CooldownError::AlreadyEnabled`] when it was not disabled.
    pub fn enable(&mut self) -> Result<(), CooldownError> {
        if self.enabled {
            return Err(CooldownError::AlreadyEnabled {
                owner: self.owner.clone(),
            });
        }
        self.enabled = true;
        debug!(owner = self.owner, "Weapon hand enabled");
        Ok(())
    }

    fn disable(&mut self) -> Result<(), CooldownError> {
        if !self.enabled {
            return Err(CooldownError::AlreadyDisabled {
                owner: self.owner.clone(),
            });
        }
        self.enabled = false;
        Ok(())
    }
}

/// Disable a champion's weapon hand for `duration` ticks.
///
/// # Errors
///
/// Returns [`CooldownError`] for an unknown champion, a zero duration, or a
/// hand that is already recovering.
pub fn disable<S>(
    dungeon: &mut Dungeon,
    schedule: &mut S,
    champion: ChampionId,
    duration: u32,
) -> Result<(), CooldownError>
where
    S: Schedule<Dungeon> + ?Sized,
{
    let hand = dungeon
        .hand_mut(champion)
        .ok_or(CooldownError::UnknownChampion(champion))?;
    let label = format!("{}.WeaponHand", hand.owner);
    let temporizer = Temporizer::new(label, duration).map_err(|source| match source {
        TemporizerError::BlankLabel | TemporizerError::ZeroDuration { .. } => {
            CooldownError::ZeroDuration {
                owner: hand.owner.clone(),
            }
        }
    })?;
    hand.disable()?;
    debug!(owner = hand.owner, duration, "Weapon hand disabled");
    schedule.register(Box::new(HandRecovery {
        champion,
        temporizer,
    }));
    Ok(())
}

/// Listener re-enabling a weapon hand once its cooldown elapses.
pub struct HandRecovery {
    champion: ChampionId,
    temporizer: Temporizer,
}

impl Listener<Dungeon> for HandRecovery {
    fn label(&self) -> &str {
        self.temporizer.label()
    }

    fn on_tick(&mut self, ctx: &mut TickContext<'_, Dungeon>) -> Result<Interest, ListenerError> {
        if !self.temporizer.trigger() {
            return Ok(Interest::Continue);
        }
        ctx.world_mut()
            .hand_mut(self.champion)
            .ok_or(CooldownError::UnknownChampion(self.champion))?
            .enable()?;
        Ok(Interest::Done)
    }
}
