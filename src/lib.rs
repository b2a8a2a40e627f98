//! # Stack Stats
//!
//! Statistics for a fixed roster of players who queue together, and role
//! recommendations that maximize historical win rate.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (match records, statistics, reports)
//! - **roster**: Tracked players and canonical name resolution
//! - **extract**: Per-match sample extraction
//! - **aggregate**: Per-player, per-stack and per-duo aggregation
//! - **recommend**: Role assignment search
//! - **calculate**: Report synthesis over the aggregates
//! - **ingest**: Batch pipeline from match records to reports
//! - **storage**: Data directory reads and report writes
//! - **config**: Configuration loading and validation

pub mod aggregate;
pub mod calculate;
pub mod config;
pub mod extract;
pub mod ingest;
pub mod models;
pub mod recommend;
pub mod roster;
pub mod storage;

pub use models::*;
