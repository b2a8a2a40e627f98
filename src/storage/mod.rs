//! Filesystem data directory operations.
//!
//! Handles reading and writing under the data directory:
//! - Cached match records (`matches/*.json`)
//! - Per-player, per-stack and per-duo statistics
//! - Overall player and stack reports

pub mod json;

use std::path::PathBuf;
use thiserror::Error;

pub use json::{read_match_files, write_document, write_reports};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn matches_dir(&self) -> PathBuf {
        self.data_dir.join("matches")
    }

    pub fn statistics_dir(&self) -> PathBuf {
        self.data_dir.join("statistics")
    }

    pub fn players_dir(&self) -> PathBuf {
        self.statistics_dir().join("players")
    }

    pub fn stacks_dir(&self) -> PathBuf {
        self.statistics_dir().join("stacks")
    }

    pub fn duos_dir(&self) -> PathBuf {
        self.statistics_dir().join("duos")
    }

    pub fn overall_players_dir(&self) -> PathBuf {
        self.statistics_dir().join("overall").join("players")
    }

    pub fn overall_stacks_dir(&self) -> PathBuf {
        self.statistics_dir().join("overall").join("stacks")
    }

    /// Stacks with at least `games` games.
    pub fn overall_stacks_at_least_dir(&self, games: u32) -> PathBuf {
        self.overall_stacks_dir().join(format!("atLeast{}", games))
    }

    pub fn summary_file(&self) -> PathBuf {
        self.statistics_dir().join("summary.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
