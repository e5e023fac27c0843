//! The trap scenario the engine runs on the starting dungeon.
//!
//! - The door between the rooms cycles open and shut a few times.
//! - The champion attacks, putting their weapon hand on cooldown.
//! - The champion throws an item east across the northern room, leaving
//!   from one of the two eastern sectors picked by a seeded RNG.
//! - Later, an ogre wanders onto the pressure pad, setting off the launcher.

use std::sync::Arc;

use catacomb_core::actuator::{Actuator, Repeat};
use catacomb_core::clock::{Clock, ListenerError, TickContext};
use catacomb_core::config::KernelConfig;
use catacomb_core::deferred::Deferred;
use catacomb_core::projectile::{Flight, Projectile};
use catacomb_core::trigger::Target;
use catacomb_types::{CreatureId, Direction, ItemId, Position, ProjectileId, Sector, TriggerAction};
use catacomb_world::hand::disable;
use catacomb_world::starting_dungeon::STARTING_LEVEL;
use catacomb_world::{DoorSwitch, Dungeon, ItemDrop, StartingDungeon};
use rand::Rng;
use serde::Deserialize;
use tracing::info;

use crate::error::EngineError;

/// Tunables of the trap scenario, read from the `scenario` section of
/// `catacomb-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScenarioConfig {
    /// Seed of the RNG picking the throw sector.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of open/close cycles of the door.
    #[serde(default = "default_door_cycles")]
    pub door_cycles: u32,

    /// Seconds between the open and the close command of a cycle.
    #[serde(default = "default_door_hold_secs")]
    pub door_hold_secs: u32,

    /// Seconds before the ogre steps on the pressure pad.
    #[serde(default = "default_ogre_delay_secs")]
    pub ogre_delay_secs: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            door_cycles: default_door_cycles(),
            door_hold_secs: default_door_hold_secs(),
            ogre_delay_secs: default_ogre_delay_secs(),
        }
    }
}

const fn default_seed() -> u64 {
    7
}

const fn default_door_cycles() -> u32 {
    2
}

const fn default_door_hold_secs() -> u32 {
    4
}

const fn default_ogre_delay_secs() -> u32 {
    5
}

/// Convert a scenario duration to ticks at the configured clock rate.
fn ticks(config: &KernelConfig, field: &str, seconds: u32) -> Result<u32, EngineError> {
    config
        .clock
        .seconds_to_ticks(seconds)
        .ok_or_else(|| EngineError::ScenarioConfig {
            message: format!(
                "scenario.{field} of {seconds}s overflows at {} ticks per second",
                config.clock.ticks_per_second
            ),
        })
}

/// What [`stage`] put in motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staged {
    /// The thrown item's projectile.
    pub throw: ProjectileId,
    /// Sector the item left from.
    pub throw_sector: Sector,
    /// The ogre heading for the pad.
    pub ogre: CreatureId,
}

/// Register every scenario listener on `clock`. Scenario durations are
/// given in seconds and converted with `config.clock.ticks_per_second`.
///
/// # Errors
///
/// Returns [`EngineError`] when a duration overflows once converted to
/// ticks, or when an actuator, cooldown or projectile cannot be set up with
/// the configured values.
pub fn stage(
    start: &mut StartingDungeon,
    clock: &mut Clock<Dungeon>,
    config: &KernelConfig,
    scenario: &ScenarioConfig,
    rng: &mut impl Rng,
) -> Result<Staged, EngineError> {
    let door_hold = ticks(config, "door_hold_secs", scenario.door_hold_secs)?;
    let ogre_delay = ticks(config, "ogre_delay_secs", scenario.ogre_delay_secs)?;

    // Door cycles.
    let switch = || -> Vec<Target<Dungeon>> { vec![Arc::new(DoorSwitch::new(start.door))] };
    let cycle = Actuator::repeat_all(
        Repeat::Times(scenario.door_cycles),
        vec![
            Actuator::leaf(1, TriggerAction::Enable, switch())?,
            Actuator::leaf(door_hold, TriggerAction::Disable, switch())?,
        ],
    )?;
    info!(actuator = cycle.label(), "Door cycle scheduled");
    clock.register(Box::new(cycle));

    // Attack and throw.
    disable(
        &mut start.dungeon,
        clock,
        start.champion,
        config.hand.default_cooldown,
    )?;
    let direction = Direction::East;
    let throw_sector = Sector::random_facing(direction, rng);
    let throw = Projectile::launch(
        &mut start.dungeon,
        clock,
        Flight {
            position: Position::new(1, 2, STARTING_LEVEL),
            direction,
            sector: throw_sector,
            range: config.projectile.default_range,
        },
        ItemDrop::new(ItemId::new()),
        config.projectile.cadence,
    )?;
    info!(projectile = %throw, sector = ?throw_sector, "Item thrown");

    // The ogre arrives.
    let ogre = CreatureId::new();
    let pad = start.pad;
    let arrival = Deferred::new(
        "Ogre.StepOnPad",
        ogre_delay,
        move |ctx: &mut TickContext<'_, Dungeon>| -> Result<(), ListenerError> {
            let (dungeon, registry) = ctx.split();
            dungeon.place_creature(registry, ogre, pad, Sector::NorthWest)?;
            Ok(())
        },
    )?;
    clock.register(Box::new(arrival));
    info!(creature = %ogre, delay = ogre_delay, "Ogre on its way");

    Ok(Staged {
        throw,
        throw_sector,
        ogre,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catacomb_core::runner::{EndReason, NoOpCallback, run_until_idle};
    use catacomb_world::create_starting_dungeon;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn staged(scenario: &ScenarioConfig) -> (StartingDungeon, Clock<Dungeon>, Staged) {
        let config = KernelConfig::default();
        let mut clock = Clock::new();
        let mut start = create_starting_dungeon(&config, &mut clock).unwrap();
        let mut rng = StdRng::seed_from_u64(scenario.seed);
        let staged = stage(&mut start, &mut clock, &config, scenario, &mut rng).unwrap();
        (start, clock, staged)
    }

    #[test]
    fn scenario_config_defaults() {
        let scenario: ScenarioConfig = serde_yml::from_str("door_cycles: 3").unwrap();
        assert_eq!(scenario.door_cycles, 3);
        assert_eq!(scenario.seed, 7);
        assert_eq!(scenario.door_hold_secs, 4);
        assert_eq!(scenario.ogre_delay_secs, 5);
    }

    #[test]
    fn stage_registers_everything() {
        let (start, clock, staged) = staged(&ScenarioConfig::default());
        // Door loop, hand recovery, thrown item, ogre arrival.
        assert_eq!(clock.len(), 4);
        assert!(!start.dungeon.hand(start.champion).unwrap().is_enabled());
        assert!(Sector::facing(Direction::East).contains(&staged.throw_sector));
        assert_eq!(
            start.dungeon.locate_projectile(staged.throw),
            Some((Position::new(1, 2, STARTING_LEVEL), staged.throw_sector))
        );
    }

    #[test]
    fn same_seed_same_throw() {
        let (_, _, first) = staged(&ScenarioConfig::default());
        let (_, _, second) = staged(&ScenarioConfig::default());
        assert_eq!(first.throw_sector, second.throw_sector);
    }

    #[test]
    fn scenario_runs_to_idle() {
        let (mut start, mut clock, staged) = staged(&ScenarioConfig::default());
        let result = run_until_idle(&mut clock, &mut start.dungeon, 600, &mut NoOpCallback).unwrap();
        assert_eq!(result.end_reason, EndReason::Idle);
        assert!(start.dungeon.hand(start.champion).unwrap().is_enabled());
        assert_eq!(start.dungeon.projectile_count(), 0);
        // The thrown item and both launcher items are on the floor.
        assert_eq!(start.dungeon.item_count(), 3);
        assert_eq!(
            start.dungeon.creature_at(start.pad, Sector::NorthWest),
            Some(staged.ogre)
        );
    }

    #[test]
    fn zero_door_hold_is_rejected() {
        let config = KernelConfig::default();
        let mut clock = Clock::new();
        let mut start = create_starting_dungeon(&config, &mut clock).unwrap();
        let scenario = ScenarioConfig {
            door_hold_secs: 0,
            ..ScenarioConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            stage(&mut start, &mut clock, &config, &scenario, &mut rng),
            Err(EngineError::Actuator { .. })
        ));
    }

    #[test]
    fn durations_follow_the_clock_rate() {
        let mut config = KernelConfig::default();
        config.clock.ticks_per_second = 2;
        let mut clock = Clock::new();
        let mut start = create_starting_dungeon(&config, &mut clock).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        stage(&mut start, &mut clock, &config, &ScenarioConfig::default(), &mut rng).unwrap();
        // Ogre due after 5s at 2 ticks per second.
        clock.tick_n(&mut start.dungeon, 9).unwrap();
        assert!(!start.dungeon.has_creatures(start.pad));
        clock.tick(&mut start.dungeon).unwrap();
        assert!(start.dungeon.has_creatures(start.pad));
    }

    #[test]
    fn overflowing_duration_is_rejected() {
        let mut config = KernelConfig::default();
        config.clock.ticks_per_second = u64::from(u32::MAX);
        let mut clock = Clock::new();
        let mut start = create_starting_dungeon(&config, &mut clock).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let err = stage(&mut start, &mut clock, &config, &ScenarioConfig::default(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, EngineError::ScenarioConfig { .. }));
        assert!(err.to_string().contains("door_hold_secs"));
        assert!(clock.is_empty());
    }
}
