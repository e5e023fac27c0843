//! Wall-mounted projectile launchers.
//!
//! A launcher sits in a wall cell and shoots into the neighbouring cell.
//! Every trigger, whatever the action, fires a volley of two items side by
//! side from the sectors nearest the wall.

use catacomb_core::clock::{Schedule, TickContext};
use catacomb_core::projectile::{Flight, Projectile, ProjectileError};
use catacomb_core::temporizer::TemporizerError;
use catacomb_core::trigger::{TriggerError, Triggerable};
use catacomb_types::{Direction, ItemId, Position, ProjectileId, Sector, TriggerAction};
use tracing::info;

use crate::dungeon::Dungeon;
use crate::error::WorldError;
use crate::impact::ItemDrop;

/// Trigger target shooting items out of a wall.
#[derive(Debug, Clone)]
pub struct ProjectileLauncher {
    label: String,
    position: Position,
    direction: Direction,
    range: u32,
    cadence: u32,
}

impl ProjectileLauncher {
    /// A launcher in the wall at `position` shooting towards `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Projectile`] for a zero range and
    /// [`WorldError::Temporizer`] for a zero cadence.
    pub fn new(
        position: Position,
        direction: Direction,
        range: u32,
        cadence: u32,
    ) -> Result<Self, WorldError> {
        if range == 0 {
            return Err(ProjectileError::ZeroRange.into());
        }
        let label = format!("Launcher{position}");
        if cadence == 0 {
            return Err(TemporizerError::ZeroDuration { label }.into());
        }
        Ok(Self {
            label,
            position,
            direction,
            range,
            cadence,
        })
    }

    /// Wall cell holding the launcher.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Direction of fire.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Fire one volley into `dungeon`, returning the new projectiles.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Projectile`] when the cell in front of the
    /// launcher cannot take a projectile.
    pub fn fire<S>(
        &self,
        dungeon: &mut Dungeon,
        schedule: &mut S,
    ) -> Result<[ProjectileId; 2], WorldError>
    where
        S: Schedule<Dungeon> + ?Sized,
    {
        let start = self.position.towards(self.direction);
        let [left, right] = Sector::facing(self.direction.opposite());
        let mut shoot = |sector: Sector| {
            Projectile::launch(
                &mut *dungeon,
                &mut *schedule,
                Flight {
                    position: start,
                    direction: self.direction,
                    sector,
                    range: self.range,
                },
                ItemDrop::new(ItemId::new()),
                self.cadence,
            )
        };
        let volley = [shoot(left)?, shoot(right)?];
        info!(launcher = self.label, direction = ?self.direction, "Launcher fired");
        Ok(volley)
    }
}

impl Triggerable<Dungeon> for ProjectileLauncher {
    fn label(&self) -> &str {
        &self.label
    }

    fn trigger(
        &self,
        ctx: &mut TickContext<'_, Dungeon>,
        _action: TriggerAction,
    ) -> Result<(), TriggerError> {
        let (dungeon, registry) = ctx.split();
        self.fire(dungeon, registry)
            .map(|_| ())
            .map_err(|source| TriggerError::Domain {
                target: self.label.clone(),
                source: Box::new(source),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use catacomb_core::actuator::Actuator;
    use catacomb_core::clock::{Clock, ClockError};

    use super::*;
    use crate::dungeon::Element;

    fn gallery() -> Dungeon {
        let mut dungeon = Dungeon::new();
        dungeon.create_level(0, 6, 3).unwrap();
        dungeon
            .set_element(
                Position::new(0, 1, 0),
                Element::Launcher {
                    facing: Direction::East,
                },
            )
            .unwrap();
        dungeon
    }

    #[test]
    fn rejects_zero_range_and_cadence() {
        let at = Position::new(0, 1, 0);
        assert!(matches!(
            ProjectileLauncher::new(at, Direction::East, 0, 3),
            Err(WorldError::Projectile { .. })
        ));
        assert!(matches!(
            ProjectileLauncher::new(at, Direction::East, 3, 0),
            Err(WorldError::Temporizer { .. })
        ));
    }

    #[test]
    fn volley_starts_next_to_the_wall() {
        let mut dungeon = gallery();
        let mut clock: Clock<Dungeon> = Clock::new();
        let launcher = ProjectileLauncher::new(Position::new(0, 1, 0), Direction::East, 4, 3).unwrap();

        let [first, second] = launcher.fire(&mut dungeon, &mut clock).unwrap();
        assert_eq!(clock.len(), 2);
        assert_eq!(
            dungeon.locate_projectile(first),
            Some((Position::new(1, 1, 0), Sector::NorthWest))
        );
        assert_eq!(
            dungeon.locate_projectile(second),
            Some((Position::new(1, 1, 0), Sector::SouthWest))
        );
    }

    #[test]
    fn actuator_fires_the_launcher_and_items_land() {
        let mut dungeon = gallery();
        let launcher: Arc<dyn Triggerable<Dungeon>> =
            Arc::new(ProjectileLauncher::new(Position::new(0, 1, 0), Direction::East, 2, 1).unwrap());
        let mut clock = Clock::new();
        clock.register(Box::new(
            Actuator::leaf(1, TriggerAction::Disable, vec![launcher]).unwrap(),
        ));

        clock.tick(&mut dungeon).unwrap();
        assert_eq!(dungeon.projectile_count(), 2);

        // Range 2: one sector inside the cell, one into the next, then fall.
        clock.tick_n(&mut dungeon, 3).unwrap();
        assert!(clock.is_empty());
        assert_eq!(dungeon.projectile_count(), 0);
        let landed = dungeon.items_at(Position::new(2, 1, 0));
        assert_eq!(landed.len(), 2);
        assert!(landed.iter().any(|(_, sector)| *sector == Sector::NorthWest));
        assert!(landed.iter().any(|(_, sector)| *sector == Sector::SouthWest));
    }

    #[test]
    fn firing_off_the_map_aborts_the_tick() {
        let mut dungeon = gallery();
        let blocked: Arc<dyn Triggerable<Dungeon>> =
            Arc::new(ProjectileLauncher::new(Position::new(0, 1, 0), Direction::West, 2, 1).unwrap());
        let mut clock = Clock::new();
        clock.register(Box::new(
            Actuator::leaf(1, TriggerAction::Toggle, vec![blocked]).unwrap(),
        ));
        // Shooting west from x=0 leaves the map.
        let err = clock.tick(&mut dungeon).unwrap_err();
        assert!(matches!(err, ClockError::Listener { tick: 1, .. }));
        assert_eq!(dungeon.projectile_count(), 0);
    }
}
