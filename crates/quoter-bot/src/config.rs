//! Application configuration.

use crate::error::{AppError, AppResult};
use quoter_mm::{StrategyConfig, Trader};
use quoter_telemetry::DEFAULT_MAX_LOG_LENGTH;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "QUOTER_CONFIG";

/// Configuration file used when neither the CLI nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Visualizer output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Write one visualizer line per tick. When off, the raw `TickOutput`
    /// is written instead.
    #[serde(default = "default_logger_enabled")]
    pub enabled: bool,
    /// Cap on a visualizer line in characters. Default: 3750.
    #[serde(default = "default_max_log_length")]
    pub max_log_length: usize,
}

fn default_logger_enabled() -> bool {
    true
}

fn default_max_log_length() -> usize {
    DEFAULT_MAX_LOG_LENGTH
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            enabled: default_logger_enabled(),
            max_log_length: default_max_log_length(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl AppConfig {
    /// Load from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.strategy.instrument_table()?;
        Ok(())
    }

    /// Build the engine described by the strategy section.
    pub fn trader(&self) -> AppResult<Trader> {
        Ok(Trader::new(&self.strategy)?)
    }
}
