//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::models::{Role, STACK_SIZE};
use crate::roster::validate_riot_id;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Recommendation filter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Minimum games a player needs in a role for an assignment slot to count
    #[serde(default = "default_minimum_number_of_games")]
    pub minimum_number_of_games: u32,
}

fn default_minimum_number_of_games() -> u32 {
    3
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            minimum_number_of_games: default_minimum_number_of_games(),
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Stacks with at least this many games are also written to `atLeast<N>`
    #[serde(default = "default_stack_thresholds")]
    pub stack_thresholds: Vec<u32>,
}

fn default_stack_thresholds() -> Vec<u32> {
    vec![5, 10]
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            stack_thresholds: default_stack_thresholds(),
        }
    }
}

/// One player of a stack query, optionally pinned to a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPlayer {
    pub player: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Role>,
}

impl std::str::FromStr for QueryPlayer {
    type Err = ConfigError;

    /// Parse `Name#TAG` or `Name#TAG=ROLE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (player, position) = match s.rsplit_once('=') {
            Some((player, role)) => {
                let role = role
                    .parse::<Role>()
                    .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
                (player, Some(role))
            }
            None => (s, None),
        };
        Ok(Self {
            player: player.trim().to_string(),
            position,
        })
    }
}

/// Stack query configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default)]
    pub players: Vec<QueryPlayer>,
}

impl QueryConfig {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Validate player count, names and pins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.len() > STACK_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "Query lists {} players, at most {} allowed",
                self.players.len(),
                STACK_SIZE
            )));
        }

        let mut names = HashSet::new();
        let mut pinned = HashSet::new();
        for entry in &self.players {
            validate_riot_id(&entry.player)
                .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
            if !names.insert(entry.player.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Query lists {} more than once",
                    entry.player
                )));
            }
            if let Some(role) = entry.position {
                if !pinned.insert(role) {
                    return Err(ConfigError::ValidationError(format!(
                        "Query pins {} more than once",
                        role
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_roster_file")]
    pub roster_file: PathBuf,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_roster_file() -> PathBuf {
    PathBuf::from("./roster.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            roster_file: default_roster_file(),
            filter: FilterConfig::default(),
            report: ReportConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            warn!("Config file {:?} not found, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.stack_thresholds.contains(&0) {
            return Err(ConfigError::ValidationError(
                "Stack thresholds must be greater than 0".to_string(),
            ));
        }

        self.query.validate()
    }
}
