//! Configuration schema for ymc.
//!
//! Every field has a default, so an empty YAML document is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    /// Monte Carlo search settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// NDJSON event log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameConfig {
    /// Seats at the table. Monte Carlo evaluation requires exactly two.
    #[serde(default = "default_players")]
    pub players: usize,
}

fn default_players() -> usize {
    2
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: default_players(),
        }
    }
}

/// Monte Carlo search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Rollout threads per evaluation.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Wall-clock budget per decision, in milliseconds.
    #[serde(default = "default_budget_ms")]
    pub budget_ms: u64,
    /// Highest rollout scores kept per candidate move.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Master seed for worker streams (0 = derive from the game seed).
    #[serde(default)]
    pub seed: u64,
}

fn default_workers() -> usize {
    32
}

fn default_budget_ms() -> u64 {
    500
}

fn default_top_n() -> usize {
    100
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            budget_ms: default_budget_ms(),
            top_n: default_top_n(),
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// NDJSON event file; `None` disables event logging.
    #[serde(default)]
    pub events_path: Option<String>,
    /// Flush after this many lines (0 = only on explicit flush / drop).
    #[serde(default)]
    pub flush_every_lines: u64,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Reject values no game or search can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.players == 0 {
            return Err(ConfigError::Invalid("game.players must be >= 1"));
        }
        if self.search.workers == 0 {
            return Err(ConfigError::Invalid("search.workers must be >= 1"));
        }
        if self.search.top_n == 0 {
            return Err(ConfigError::Invalid("search.top_n must be >= 1"));
        }
        if self.search.budget_ms == 0 {
            return Err(ConfigError::Invalid("search.budget_ms must be >= 1"));
        }
        Ok(())
    }
}
