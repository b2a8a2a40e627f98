//! Core data models for the stack tracker.

mod ids;
mod match_record;
mod player_stats;
mod report;
mod role;
mod statistic;

pub use ids::*;
pub use match_record::*;
pub use player_stats::*;
pub use report::*;
pub use role::*;
pub use statistic::*;

#[cfg(test)]
pub(crate) use match_record::fixtures;
