//! Engine binary for the Catacomb simulation.
//!
//! Loads configuration, builds the starting dungeon, stages the trap
//! scenario and drives the clock until every listener is done or the tick
//! budget is spent. The run report is printed to stdout as JSON.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `catacomb-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Validate configuration
//! 4. Create the clock
//! 5. Create the starting dungeon
//! 6. Stage the trap scenario
//! 7. Run until idle
//! 8. Print the run report

mod error;
mod report;
mod scenario;

use std::path::Path;

use catacomb_core::clock::Clock;
use catacomb_core::config::{KernelConfig, LoggingConfig};
use catacomb_core::runner::run_until_idle;
use catacomb_world::{Dungeon, create_starting_dungeon};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::report::Timeline;
use crate::scenario::ScenarioConfig;

const CONFIG_PATH: &str = "catacomb-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any startup step or the run itself fails.
fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is not up yet, so remember where it
    //    came from and report it afterwards.
    let config_path = Path::new(CONFIG_PATH);
    let found = config_path.exists();
    let (config, scenario) = if found {
        (
            KernelConfig::from_file(config_path)?,
            load_scenario_config(config_path)?,
        )
    } else {
        (KernelConfig::default(), ScenarioConfig::default())
    };

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("catacomb-engine starting");
    if !found {
        info!("Config file not found, using defaults");
    }

    // 3. Validate configuration.
    config.validate()?;
    info!(
        max_ticks = config.clock.max_ticks,
        ticks_per_second = config.clock.ticks_per_second,
        projectile_cadence = config.projectile.cadence,
        door_cadence = config.door.cadence,
        seed = scenario.seed,
        door_hold_secs = scenario.door_hold_secs,
        ogre_delay_secs = scenario.ogre_delay_secs,
        "Configuration loaded"
    );

    // 4. Create the clock.
    let mut clock: Clock<Dungeon> = Clock::new();

    // 5. Create the starting dungeon.
    let mut start = create_starting_dungeon(&config, &mut clock)?;

    // 6. Stage the trap scenario.
    let mut rng = StdRng::seed_from_u64(scenario.seed);
    let staged = scenario::stage(&mut start, &mut clock, &config, &scenario, &mut rng)?;
    info!(
        listeners = clock.len(),
        throw = %staged.throw,
        throw_sector = ?staged.throw_sector,
        ogre = %staged.ogre,
        "Scenario staged, entering tick loop"
    );

    // 7. Run until idle.
    let mut timeline = Timeline::new(start.door, start.champion);
    let result = run_until_idle(
        &mut clock,
        &mut start.dungeon,
        config.clock.max_ticks,
        &mut timeline,
    )?;

    // 8. Print the run report.
    let report = timeline.finish(&result, &start.dungeon);
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "catacomb-engine shutdown complete"
    );
    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Read the `scenario` section of the config file, defaulting when absent.
fn load_scenario_config(path: &Path) -> Result<ScenarioConfig, EngineError> {
    let contents = std::fs::read_to_string(path).map_err(|e| EngineError::ScenarioConfig {
        message: format!("failed to read config file: {e}"),
    })?;
    let raw: serde_yml::Value =
        serde_yml::from_str(&contents).map_err(|e| EngineError::ScenarioConfig {
            message: format!("failed to parse config YAML: {e}"),
        })?;
    raw.get("scenario").map_or_else(
        || Ok(ScenarioConfig::default()),
        |section| {
            serde_yml::from_value(section.clone()).map_err(|e| EngineError::ScenarioConfig {
                message: format!("failed to parse scenario config: {e}"),
            })
        },
    )
}
