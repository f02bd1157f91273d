//! # Run configuration.
//!
//! Provides [`Config`], the validated settings for one simulation run, loaded
//! from a TOML document:
//!
//! ```toml
//! [registry]
//! limit = 20
//!
//! [generator]
//! min_user_per_tick = 1
//! max_user_per_tick = 5
//! min_processing_time = 2
//! max_processing_time = 8
//! names = ["Anna", "Jan"]
//! surnames = ["Nowak", "Kowalski"]
//! # seed = 42
//! # email_domain = "gmail.com"
//!
//! [pipeline]
//! tick_interval = 100       # ticks to run
//! tick_time_interval = 0.5  # seconds between ticks
//!
//! [file]
//! output = "completed.csv"
//! ```
//!
//! ## Validation
//! Every rule is checked once, before the engine is built:
//! - `registry.limit > 0`
//! - generator bounds are positive and `min <= max`
//! - `names` / `surnames` are non-empty
//! - `tick_time_interval` is finite and `>= 0`
//!
//! `tick_interval = 0` is valid and yields a run with no ticks.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Settings for one simulation run.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Slot table settings.
    pub registry: RegistryConfig,
    /// Arrival generation settings.
    pub generator: GeneratorConfig,
    /// Tick loop settings.
    pub pipeline: PipelineConfig,
    /// Output settings.
    pub file: FileConfig,
}

/// `[registry]` section.
#[derive(Clone, Debug, Deserialize)]
pub struct RegistryConfig {
    /// Number of processing slots.
    pub limit: usize,
}

/// `[generator]` section.
#[derive(Clone, Debug, Deserialize)]
pub struct GeneratorConfig {
    /// Lower bound of arrivals per tick (inclusive).
    pub min_user_per_tick: u32,
    /// Upper bound of arrivals per tick (inclusive).
    pub max_user_per_tick: u32,
    /// Lower bound of processing time in ticks (inclusive).
    pub min_processing_time: u32,
    /// Upper bound of processing time in ticks (inclusive).
    pub max_processing_time: u32,
    /// Given names drawn with replacement.
    pub names: Vec<String>,
    /// Family names drawn with replacement.
    pub surnames: Vec<String>,
    /// Fixed RNG seed; `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Domain used to build e-mail addresses.
    #[serde(default = "default_email_domain")]
    pub email_domain: String,
}

/// `[pipeline]` section.
#[derive(Clone, Debug, Deserialize)]
pub struct PipelineConfig {
    /// Total ticks to run.
    pub tick_interval: u64,
    /// Seconds to wait between ticks.
    pub tick_time_interval: f64,
}

/// `[file]` section.
#[derive(Clone, Debug, Deserialize)]
pub struct FileConfig {
    /// Destination of the CSV record of completed entities.
    pub output: PathBuf,
}

fn default_email_domain() -> String {
    "gmail.com".to_string()
}

impl Config {
    /// Reads, parses and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks every section; the first violation wins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.registry.validate()?;
        self.generator.validate()?;
        self.pipeline.validate()?;
        Ok(())
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::NotPositive {
                field: "registry.limit",
            });
        }
        Ok(())
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("generator.min_user_per_tick", self.min_user_per_tick)?;
        positive("generator.min_processing_time", self.min_processing_time)?;
        ordered(
            "generator.user_per_tick",
            self.min_user_per_tick,
            self.max_user_per_tick,
        )?;
        ordered(
            "generator.processing_time",
            self.min_processing_time,
            self.max_processing_time,
        )?;
        if self.names.is_empty() {
            return Err(ConfigError::EmptyList {
                field: "generator.names",
            });
        }
        if self.surnames.is_empty() {
            return Err(ConfigError::EmptyList {
                field: "generator.surnames",
            });
        }
        Ok(())
    }

    /// Arrivals per tick as an inclusive range.
    #[inline]
    pub fn users_per_tick(&self) -> RangeInclusive<u32> {
        self.min_user_per_tick..=self.max_user_per_tick
    }

    /// Processing time as an inclusive range.
    #[inline]
    pub fn processing_time(&self) -> RangeInclusive<u32> {
        self.min_processing_time..=self.max_processing_time
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tick_delay().map(|_| ())
    }

    /// Inter-tick delay as a `Duration`.
    ///
    /// - `0.0` → no delay (run the whole budget immediately)
    /// - negative, NaN, infinite → [`ConfigError::InvalidInterval`]
    pub fn tick_delay(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.tick_time_interval)
            .map_err(|_| ConfigError::InvalidInterval(self.tick_time_interval))
    }
}

fn positive(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::NotPositive { field });
    }
    Ok(())
}

fn ordered(field: &'static str, min: u32, max: u32) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `limit = 20`
    /// - 1..=5 arrivals per tick, 2..=8 ticks of processing
    /// - `tick_interval = 100`, `tick_time_interval = 1.0s`
    /// - output to `completed.csv`
    fn default() -> Self {
        Self {
            registry: RegistryConfig { limit: 20 },
            generator: GeneratorConfig {
                min_user_per_tick: 1,
                max_user_per_tick: 5,
                min_processing_time: 2,
                max_processing_time: 8,
                names: ["Anna", "Jan", "Maria", "Piotr"].map(String::from).to_vec(),
                surnames: ["Nowak", "Kowalski", "Wiśniewska", "Wójcik"]
                    .map(String::from)
                    .to_vec(),
                seed: None,
                email_domain: default_email_domain(),
            },
            pipeline: PipelineConfig {
                tick_interval: 100,
                tick_time_interval: 1.0,
            },
            file: FileConfig {
                output: PathBuf::from("completed.csv"),
            },
        }
    }
}
