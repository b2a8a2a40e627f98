//! Synthesized report views.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    BooleanStatistic, DuoKey, PlayerRoleAndAggregateStatistics, Role, StackKey, StatField,
};

/// Win percent and sample size of a player in one role.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleWinStat {
    pub percent: f64,
    pub number_of_games: u32,
}

impl RoleWinStat {
    pub fn new(percent: f64, number_of_games: u32) -> Self {
        Self {
            percent,
            number_of_games,
        }
    }

    pub fn as_boolean(&self) -> BooleanStatistic {
        BooleanStatistic::with_count(self.percent, self.number_of_games)
    }
}

impl From<&BooleanStatistic> for RoleWinStat {
    fn from(stat: &BooleanStatistic) -> Self {
        Self::new(stat.percent, stat.count)
    }
}

/// A recommended role assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Role to player.
    #[serde(rename = "recommendedPositions")]
    pub positions: BTreeMap<Role, String>,

    /// Count-weighted win percent of the chosen assignment.
    #[serde(rename = "recommendedPositionsWinPercent")]
    pub win_percent: f64,

    /// Whether the minimum-games filter was in effect for this result.
    pub is_filtered: bool,
}

impl Recommendation {
    pub fn player_for(&self, role: Role) -> Option<&str> {
        self.positions.get(&role).map(String::as_str)
    }
}

/// A teammate and the weighted win statistic of the stacks shared with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeammateStat {
    pub player: String,
    pub win_percent: f64,
    pub number_of_games: u32,
}

/// Cross-stack summary of one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallPlayerStatistics {
    /// Best role per statistic field.
    pub best_by_lane: BTreeMap<StatField, Option<Role>>,

    /// Top stacks by this player's win percent.
    pub winningest_stack: Vec<StackKey>,

    /// As `winningest_stack`, restricted to stacks with enough games.
    pub winningest_stack_at_least_5: Vec<StackKey>,

    pub best_teammates: Vec<TeammateStat>,

    pub win_percent_by_role: BTreeMap<Role, RoleWinStat>,

    pub best_position: Option<Role>,

    pub worst_position: Option<Role>,

    pub aggregate_win_percent: f64,

    pub number_of_games: u32,
}

/// Recommendation derived from a stack's own per-role data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackBasedView {
    pub number_of_games: u32,
    pub win_percent: f64,
    pub player_best_positions: BTreeMap<String, Option<Role>>,
    pub player_worst_positions: BTreeMap<String, Option<Role>>,
    #[serde(flatten)]
    pub recommendation: Option<Recommendation>,
    /// Whether some complete assignment meets the minimum-games threshold.
    pub meets_minimum_games: bool,
}

/// Recommendation derived from the members' cross-stack data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayersBasedView {
    #[serde(flatten)]
    pub recommendation: Option<Recommendation>,
}

/// Summary of one stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStackStatistics {
    pub based_on_stack: StackBasedView,
    pub based_on_players: PlayersBasedView,
    pub based_on_players_filtered: PlayersBasedView,
}

/// Answer to a stack query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryReport {
    pub key: StackKey,
    /// Present when this exact stack has played together.
    pub stack: Option<OverallStackStatistics>,
    /// Honors the pinned positions, filter on.
    pub with_positions: Option<Recommendation>,
    /// No pins, no filter.
    pub without_positions: Option<Recommendation>,
}

/// Everything produced by one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub computed_at: DateTime<Utc>,
    pub matches_folded: usize,
    pub players: BTreeMap<String, PlayerRoleAndAggregateStatistics>,
    pub stacks: BTreeMap<StackKey, BTreeMap<String, PlayerRoleAndAggregateStatistics>>,
    pub duos: BTreeMap<DuoKey, BTreeMap<String, BooleanStatistic>>,
    pub overall_players: BTreeMap<String, OverallPlayerStatistics>,
    pub overall_stacks: BTreeMap<StackKey, OverallStackStatistics>,
    /// Count-weighted win statistic over every tracked player.
    pub group_win: BooleanStatistic,
    pub query: Option<QueryReport>,
}
