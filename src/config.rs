//! Game configuration: board shape, difficulty constants, weather cadence.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Tunable parameters for a build session.
///
/// All fields carry serde defaults tuned for the standard game balance, so
/// a partial TOML file (or none at all) yields a playable configuration.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of columns in the build area.
    #[serde(default = "default_columns")]
    columns: usize,

    /// Maximum stones counted per column when computing the target.
    #[serde(default = "default_max_stones_per_column")]
    max_stones_per_column: usize,

    /// Collapse risk at experience zero.
    #[serde(default = "default_baseline_risk")]
    baseline_risk: f64,

    /// Risk relief per point of experience.
    #[serde(default = "default_experience_relief")]
    experience_relief: f64,

    /// Milliseconds between weather trials.
    #[serde(default = "default_weather_period_ms")]
    weather_period_ms: u64,

    /// Probability that a weather trial starts a weather event.
    #[serde(default = "default_weather_chance")]
    weather_chance: f64,

    /// Milliseconds an active weather event lasts before it collapses the pyramid.
    #[serde(default = "default_weather_duration_ms")]
    weather_duration_ms: u64,
}

fn default_columns() -> usize {
    7
}

fn default_max_stones_per_column() -> usize {
    10
}

fn default_baseline_risk() -> f64 {
    0.2
}

fn default_experience_relief() -> f64 {
    0.05
}

fn default_weather_period_ms() -> u64 {
    10_000
}

fn default_weather_chance() -> f64 {
    0.1
}

fn default_weather_duration_ms() -> u64 {
    3_000
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(columns = config.columns, "Config loaded successfully");
        Ok(config)
    }

    /// Checks that the configuration describes a playable board.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when `columns` or `max_stones_per_column` is zero;
    /// placement geometry and target computation both need at least one
    /// column holding at least one stone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::new("columns must be at least 1".to_string()));
        }
        if self.max_stones_per_column == 0 {
            return Err(ConfigError::new(
                "max_stones_per_column must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            max_stones_per_column: default_max_stones_per_column(),
            baseline_risk: default_baseline_risk(),
            experience_relief: default_experience_relief(),
            weather_period_ms: default_weather_period_ms(),
            weather_chance: default_weather_chance(),
            weather_duration_ms: default_weather_duration_ms(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
