//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup, scenario staging and
//! the run itself, so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: catacomb_core::config::ConfigError,
    },

    /// The `scenario` section of the config file is malformed.
    #[error("scenario config error: {message}")]
    ScenarioConfig {
        /// Description of the problem.
        message: String,
    },

    /// Building or wiring the dungeon failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: catacomb_world::WorldError,
    },

    /// An actuator of the scenario could not be built.
    #[error("actuator error: {source}")]
    Actuator {
        /// The underlying actuator error.
        #[from]
        source: catacomb_core::actuator::ActuatorError,
    },

    /// A delayed command of the scenario could not be scheduled.
    #[error("temporizer error: {source}")]
    Temporizer {
        /// The underlying temporizer error.
        #[from]
        source: catacomb_core::temporizer::TemporizerError,
    },

    /// The thrown item could not be launched.
    #[error("projectile error: {source}")]
    Projectile {
        /// The underlying projectile error.
        #[from]
        source: catacomb_core::projectile::ProjectileError,
    },

    /// The champion could not attack.
    #[error("cooldown error: {source}")]
    Cooldown {
        /// The underlying cooldown error.
        #[from]
        source: catacomb_world::CooldownError,
    },

    /// The run aborted.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: catacomb_core::runner::RunnerError,
    },

    /// The run report could not be serialized.
    #[error("report error: {source}")]
    Report {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
