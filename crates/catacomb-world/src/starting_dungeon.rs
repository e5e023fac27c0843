//! Default starting dungeon for the Catacomb engine.
//!
//! A single 10x10 level split in two rooms by a wall with a door in the
//! middle. The southern room holds a pressure pad wired to the door and to a
//! launcher set in the west wall, whose volley crosses the pad's row. The
//! party starts in the northern room.
//!
//! ```text
//!   0123456789
//! 0 ##########
//! 1 #........#
//! 2 #@.c.....#
//! 3 #........#
//! 4 #####D####
//! 5 #........#
//! 6 L....P...#
//! 7 #........#
//! 8 #........#
//! 9 ##########
//! ```

use std::sync::Arc;

use catacomb_core::actuator::Actuator;
use catacomb_core::clock::Schedule;
use catacomb_core::config::KernelConfig;
use catacomb_core::trigger::Target;
use catacomb_types::{ChampionId, CreatureId, Direction, Orientation, Position, Sector, TriggerAction};
use tracing::info;

use crate::door::{Door, DoorSwitch};
use crate::dungeon::{Dungeon, Element};
use crate::error::WorldError;
use crate::launcher::ProjectileLauncher;
use crate::pressure_pad::{PadEvent, PressurePad};

/// Level number of the starting level.
pub const STARTING_LEVEL: i32 = 0;

const SIZE: i32 = 10;
const PARTITION_ROW: i32 = 4;

/// Handles to the notable features of the starting dungeon, returned
/// alongside it so callers can drive the scenario.
#[derive(Debug, Clone)]
pub struct StartingDungeon {
    /// The dungeon itself.
    pub dungeon: Dungeon,
    /// Door between the two rooms.
    pub door: Position,
    /// Pressure pad in the southern room.
    pub pad: Position,
    /// The launcher in the west wall.
    pub launcher: ProjectileLauncher,
    /// A creature wandering the northern room.
    pub creature: CreatureId,
    /// Where the creature stands.
    pub creature_position: Position,
    /// The party's only champion.
    pub champion: ChampionId,
    /// Where the party starts.
    pub party: Position,
}

/// Build the starting dungeon.
///
/// Door cadence, projectile cadence and launcher range come from `config`.
/// Placing the creature goes through `schedule` like any other placement.
///
/// # Errors
///
/// Returns [`WorldError`] when a configured value is unusable (a zero
/// cadence or range).
pub fn create_starting_dungeon<S>(
    config: &KernelConfig,
    schedule: &mut S,
) -> Result<StartingDungeon, WorldError>
where
    S: Schedule<Dungeon> + ?Sized,
{
    let at = |x, y| Position::new(x, y, STARTING_LEVEL);
    let mut dungeon = Dungeon::new();
    dungeon.create_level(STARTING_LEVEL, SIZE, SIZE)?;

    let door = at(5, PARTITION_ROW);
    for x in 1..SIZE.saturating_sub(1) {
        let element = if x == door.x {
            Element::Door(Door::new(Orientation::WestEast).with_cadence(config.door.cadence))
        } else {
            Element::Wall
        };
        dungeon.set_element(at(x, PARTITION_ROW), element)?;
    }

    let launcher_position = at(0, 6);
    let launcher = ProjectileLauncher::new(
        launcher_position,
        Direction::East,
        config.projectile.default_range,
        config.projectile.cadence,
    )?;
    dungeon.set_element(
        launcher_position,
        Element::Launcher {
            facing: Direction::East,
        },
    )?;

    let pad = at(5, 6);
    dungeon.set_element(pad, Element::PressurePad(wire_pad(door, &launcher)?))?;

    let creature = CreatureId::new();
    let creature_position = at(3, 2);
    dungeon.place_creature(schedule, creature, creature_position, Sector::NorthWest)?;
    let champion = dungeon.add_champion("Halk");
    let party = at(1, 2);
    dungeon.move_party(schedule, party)?;

    info!(
        cells = dungeon.cell_count(),
        %door,
        %pad,
        launcher = %launcher_position,
        %party,
        "Starting dungeon created"
    );

    Ok(StartingDungeon {
        dungeon,
        door,
        pad,
        launcher,
        creature,
        creature_position,
        champion,
        party,
    })
}

/// Items on the pad hold the door open, the party stepping on it opens the
/// door, and a creature stepping on it sets off the launcher.
fn wire_pad(door: Position, launcher: &ProjectileLauncher) -> Result<PressurePad, WorldError> {
    let switch = || -> Vec<Target<Dungeon>> { vec![Arc::new(DoorSwitch::new(door))] };
    let mut pad = PressurePad::new();
    pad.set_actuator(
        PadEvent::ItemDropped,
        Actuator::leaf(1, TriggerAction::Enable, switch())?,
    );
    pad.set_actuator(
        PadEvent::ItemPickedUp,
        Actuator::leaf(1, TriggerAction::Disable, switch())?,
    );
    pad.set_actuator(
        PadEvent::PartySteppedOn,
        Actuator::leaf(1, TriggerAction::Enable, switch())?,
    );
    let volley: Target<Dungeon> = Arc::new(launcher.clone());
    pad.set_actuator(
        PadEvent::CreatureSteppedOn,
        Actuator::leaf(2, TriggerAction::Toggle, vec![volley])?,
    );
    Ok(pad)
}
