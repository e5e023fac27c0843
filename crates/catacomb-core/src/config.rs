//! Configuration loading and typed config structures for the kernel.
//!
//! The canonical configuration lives in `catacomb-config.yaml` at the
//! project root. Every field has a default, so a missing file, a missing
//! section or a missing key all fall back to the values below.

use std::path::Path;

use serde::Deserialize;

/// Environment variable overriding `clock.max_ticks`.
pub const MAX_TICKS_ENV: &str = "CATACOMB_MAX_TICKS";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override is not a valid value.
    #[error("invalid value for {variable}: {value:?}")]
    Override {
        /// Name of the environment variable.
        variable: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A value is out of its allowed range.
    #[error("invalid config value {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level kernel configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KernelConfig {
    /// Clock and run bounds.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Projectile flight.
    #[serde(default)]
    pub projectile: ProjectileConfig,

    /// Door animation.
    #[serde(default)]
    pub door: DoorConfig,

    /// Weapon-hand cooldowns.
    #[serde(default)]
    pub hand: HandConfig,

    /// Logging output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KernelConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `CATACOMB_MAX_TICKS` overrides `clock.max_ticks` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, and
    /// [`ConfigError::Override`] for an unparsable override.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config
            .clock
            .apply_max_ticks_override(std::env::var(MAX_TICKS_ENV).ok())?;
        Ok(config)
    }

    /// Check every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock.max_ticks == 0 {
            return Err(ConfigError::Invalid {
                field: "clock.max_ticks",
                reason: "must be at least 1",
            });
        }
        if self.clock.ticks_per_second == 0 {
            return Err(ConfigError::Invalid {
                field: "clock.ticks_per_second",
                reason: "must be at least 1",
            });
        }
        if self.projectile.cadence == 0 {
            return Err(ConfigError::Invalid {
                field: "projectile.cadence",
                reason: "must be at least 1",
            });
        }
        if self.projectile.default_range == 0 {
            return Err(ConfigError::Invalid {
                field: "projectile.default_range",
                reason: "must be at least 1",
            });
        }
        if self.door.cadence == 0 {
            return Err(ConfigError::Invalid {
                field: "door.cadence",
                reason: "must be at least 1",
            });
        }
        if self.hand.default_cooldown == 0 {
            return Err(ConfigError::Invalid {
                field: "hand.default_cooldown",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Clock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// Maximum ticks a run may dispatch before it is cut short.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Ticks per second of game time.
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: u64,
}

impl ClockConfig {
    /// Convert a duration in seconds of game time to ticks. `None` when the
    /// result does not fit a `u32` countdown.
    pub fn seconds_to_ticks(&self, seconds: u32) -> Option<u32> {
        u64::from(seconds)
            .checked_mul(self.ticks_per_second)
            .and_then(|ticks| u32::try_from(ticks).ok())
    }

    /// Replace `max_ticks` with `value` when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Override`] when `value` is not a positive
    /// integer.
    pub fn apply_max_ticks_override(&mut self, value: Option<String>) -> Result<(), ConfigError> {
        let Some(value) = value else {
            return Ok(());
        };
        match value.trim().parse::<u64>() {
            Ok(max_ticks) if max_ticks > 0 => {
                self.max_ticks = max_ticks;
                Ok(())
            }
            _ => Err(ConfigError::Override {
                variable: MAX_TICKS_ENV,
                value,
            }),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            ticks_per_second: default_ticks_per_second(),
        }
    }
}

/// Projectile configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectileConfig {
    /// Ticks between two moves.
    #[serde(default = "default_projectile_cadence")]
    pub cadence: u32,

    /// Sectors a thrown item flies before falling.
    #[serde(default = "default_projectile_range")]
    pub default_range: u32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            cadence: default_projectile_cadence(),
            default_range: default_projectile_range(),
        }
    }
}

/// Door configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DoorConfig {
    /// Ticks between two animation steps.
    #[serde(default = "default_door_cadence")]
    pub cadence: u32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            cadence: default_door_cadence(),
        }
    }
}

/// Weapon-hand configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HandConfig {
    /// Cooldown in ticks after an attack.
    #[serde(default = "default_hand_cooldown")]
    pub default_cooldown: u32,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            default_cooldown: default_hand_cooldown(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (required by serde)
// ---------------------------------------------------------------------------

const fn default_max_ticks() -> u64 {
    600
}

const fn default_ticks_per_second() -> u64 {
    crate::clock::ONE_SECOND
}

const fn default_projectile_cadence() -> u32 {
    crate::projectile::DEFAULT_CADENCE
}

const fn default_projectile_range() -> u32 {
    12
}

const fn default_door_cadence() -> u32 {
    catacomb_types::Speed::Normal.ticks()
}

const fn default_hand_cooldown() -> u32 {
    6
}

fn default_log_level() -> String {
    "info".to_owned()
}
