//! Simulation configuration loaded from TOML.

use std::{fs, io, path::PathBuf};

use elemental_siege_core::{Corridor, ElementTable, Path};
use elemental_siege_system_interaction::Config as InteractionConfig;
use elemental_siege_system_wave_director::Config as WaveConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration from {path}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configuration text is not valid TOML for this schema.
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    /// A run must begin with at least one heart.
    #[error("economy.hearts must be at least 1")]
    NoHearts,
    /// Wave composition would never spawn an enemy.
    #[error("waves must contain at least one enemy")]
    EmptyWaves,
}

/// Starting economy of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Gold seeded into the ledger before any run.
    pub starting_gold: u32,
    /// Diamonds seeded into the ledger before any run.
    pub starting_diamonds: u32,
    /// Hearts restored at the start of every run.
    pub hearts: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_gold: 150,
            starting_diamonds: 0,
            hearts: 10,
        }
    }
}

/// Every tunable of the simulation; an empty document yields the default game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Waypoints enemies follow; the last one is the exit.
    pub path: Path,
    /// No-build region around the path.
    pub corridor: Corridor,
    /// Base stats of every element.
    pub elements: ElementTable,
    /// Starting economy.
    pub economy: EconomyConfig,
    /// Wave composition parameters.
    pub waves: WaveConfig,
    /// Pointer gesture thresholds.
    pub interaction: InteractionConfig,
}

impl SimulationConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        Self::from_toml_str(&source)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.economy.hearts == 0 {
            return Err(ConfigError::NoHearts);
        }
        if self.waves.base_count == 0 && self.waves.count_per_wave == 0 {
            return Err(ConfigError::EmptyWaves);
        }
        Ok(self)
    }
}
