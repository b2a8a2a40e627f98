//! Report synthesis.
//!
//! Derives read-only views from a finished [`AggregationIndex`]:
//! - Per-player summaries (best role per statistic, winningest stacks, best teammates)
//! - Per-stack recommendations from stack data and from members' overall data
//! - Group aggregate win rate
//! - Stack queries with pinned roles

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::aggregate::{AggregationIndex, StackStatistics};
use crate::config::QueryPlayer;
use crate::models::{
    BooleanStatistic, OverallPlayerStatistics, OverallStackStatistics,
    PlayerRoleAndAggregateStatistics, PlayersBasedView, QueryReport, Recommendation, Role,
    RoleWinStat, StackBasedView, StackKey, StatField, TeammateStat,
};
use crate::recommend::{Candidate, PositionRecommender, Prefill};

/// Number of stacks listed in a winningest-stack ranking.
pub const WINNINGEST_STACK_LIMIT: usize = 5;

/// Minimum games for a stack to appear in the "at least 5" ranking.
pub const WINNINGEST_STACK_MIN_GAMES: u32 = 5;

/// Win percent and game count for each role the player has data in.
pub fn win_percent_by_role(stats: &PlayerRoleAndAggregateStatistics) -> BTreeMap<Role, RoleWinStat> {
    stats
        .roles()
        .map(|(role, s)| (role, RoleWinStat::from(&s.stats.win)))
        .collect()
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Stacks containing `player`, ranked by the player's win percent in each.
fn winningest_stacks(index: &AggregationIndex, player: &str, min_games: u32) -> Vec<StackKey> {
    let mut ranked: Vec<(&StackKey, f64)> = index
        .stacks_with(player)
        .filter_map(|(key, stack)| {
            let stats = &stack.get(player)?.aggregate.stats;
            (stats.number_of_games.count >= min_games).then_some((key, stats.win.percent))
        })
        .collect();
    ranked.sort_by(|a, b| descending(a.1, b.1));
    ranked
        .into_iter()
        .take(WINNINGEST_STACK_LIMIT)
        .map(|(key, _)| key.clone())
        .collect()
}

/// Weighted win statistic per teammate across every stack shared with `player`.
///
/// Each shared stack contributes the player's own aggregate record in it.
fn best_teammates(index: &AggregationIndex, player: &str) -> Vec<TeammateStat> {
    let mut by_teammate: BTreeMap<&str, BooleanStatistic> = BTreeMap::new();
    for (_, stack) in index.stacks_with(player) {
        let Some(own) = stack.get(player) else {
            continue;
        };
        let record = BooleanStatistic::with_count(
            own.aggregate.stats.win.percent,
            own.aggregate.stats.number_of_games.count,
        );
        for teammate in stack.keys().filter(|name| name.as_str() != player) {
            by_teammate
                .entry(teammate)
                .and_modify(|existing| *existing = existing.merge(&record))
                .or_insert(record);
        }
    }

    let mut teammates: Vec<TeammateStat> = by_teammate
        .into_iter()
        .map(|(name, stat)| TeammateStat {
            player: name.to_string(),
            win_percent: stat.percent,
            number_of_games: stat.count,
        })
        .collect();
    teammates.sort_by(|a, b| descending(a.win_percent, b.win_percent));
    teammates
}

fn overall_player(
    index: &AggregationIndex,
    name: &str,
    stats: &PlayerRoleAndAggregateStatistics,
) -> OverallPlayerStatistics {
    let best_by_lane = StatField::ALL
        .iter()
        .map(|field| (*field, stats.best_role_for(*field)))
        .collect();

    OverallPlayerStatistics {
        best_by_lane,
        winningest_stack: winningest_stacks(index, name, 0),
        winningest_stack_at_least_5: winningest_stacks(index, name, WINNINGEST_STACK_MIN_GAMES),
        best_teammates: best_teammates(index, name),
        win_percent_by_role: win_percent_by_role(stats),
        best_position: stats.best_position(),
        worst_position: stats.worst_position(),
        aggregate_win_percent: stats.aggregate.stats.win.percent,
        number_of_games: stats.aggregate.stats.number_of_games.count,
    }
}

/// Summaries for every player in the index.
pub fn overall_player_statistics(index: &AggregationIndex) -> BTreeMap<String, OverallPlayerStatistics> {
    let overall: BTreeMap<String, OverallPlayerStatistics> = index
        .players
        .iter()
        .map(|(name, stats)| (name.clone(), overall_player(index, name, stats)))
        .collect();
    info!("Synthesized {} player summaries", overall.len());
    overall
}

/// Candidates built from the per-role records of a stack's own games.
fn stack_candidates(stack: &StackStatistics) -> Vec<Candidate> {
    stack
        .iter()
        .map(|(name, stats)| Candidate::new(name.clone(), win_percent_by_role(stats)))
        .collect()
}

/// Candidates built from overall records, for the given names that have any.
fn player_candidates<'a, I>(
    players: &BTreeMap<String, OverallPlayerStatistics>,
    names: I,
) -> Vec<Candidate>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut names: Vec<&str> = names.into_iter().collect();
    names.sort_unstable();
    names.dedup();
    names
        .into_iter()
        .filter_map(|name| {
            players
                .get(name)
                .map(|p| Candidate::new(name, p.win_percent_by_role.clone()))
        })
        .collect()
}

fn overall_stack(
    stack: &StackStatistics,
    players: &BTreeMap<String, OverallPlayerStatistics>,
    recommender: &PositionRecommender,
) -> OverallStackStatistics {
    let (number_of_games, win_percent) = stack
        .values()
        .next()
        .map(|first| {
            let stats = &first.aggregate.stats;
            (stats.number_of_games.count, stats.win.percent)
        })
        .unwrap_or_default();

    let no_pins = Prefill::new();
    let from_stack = stack_candidates(stack);
    let from_players = player_candidates(players, stack.keys().map(String::as_str));

    OverallStackStatistics {
        based_on_stack: StackBasedView {
            number_of_games,
            win_percent,
            player_best_positions: stack
                .iter()
                .map(|(name, stats)| (name.clone(), stats.best_position()))
                .collect(),
            player_worst_positions: stack
                .iter()
                .map(|(name, stats)| (name.clone(), stats.worst_position()))
                .collect(),
            recommendation: recommender.recommend(&from_stack, &no_pins, false),
            meets_minimum_games: recommender.can_satisfy_minimum(&from_stack, &no_pins),
        },
        based_on_players: PlayersBasedView {
            recommendation: recommender.recommend(&from_players, &no_pins, false),
        },
        based_on_players_filtered: PlayersBasedView {
            recommendation: recommender.recommend(&from_players, &no_pins, true),
        },
    }
}

/// Summaries and recommendations for every stack in the index.
pub fn overall_stack_statistics(
    index: &AggregationIndex,
    players: &BTreeMap<String, OverallPlayerStatistics>,
    recommender: &PositionRecommender,
) -> BTreeMap<StackKey, OverallStackStatistics> {
    let overall: BTreeMap<StackKey, OverallStackStatistics> = index
        .stacks
        .iter()
        .map(|(key, stack)| {
            debug!("Synthesizing stack {}", key);
            (key.clone(), overall_stack(stack, players, recommender))
        })
        .collect();
    info!(
        "Synthesized {} stack summaries (minimum {} games per slot)",
        overall.len(),
        recommender.minimum_number_of_games()
    );
    overall
}

/// Count-weighted win statistic over every player's aggregate record.
pub fn group_aggregate_win(players: &BTreeMap<String, OverallPlayerStatistics>) -> BooleanStatistic {
    players
        .values()
        .map(|p| BooleanStatistic::with_count(p.aggregate_win_percent, p.number_of_games))
        .sum()
}

fn query_pins(query: &[QueryPlayer]) -> Prefill {
    query
        .iter()
        .filter_map(|q| q.position.map(|role| (role, q.player.clone())))
        .collect()
}

fn query_candidates(
    query: &[QueryPlayer],
    players: &BTreeMap<String, OverallPlayerStatistics>,
) -> Vec<Candidate> {
    player_candidates(players, query.iter().map(|q| q.player.as_str()))
}

/// Recommend a lineup for the queried players from their overall records,
/// honoring pinned roles.
pub fn recommend_query(
    query: &[QueryPlayer],
    players: &BTreeMap<String, OverallPlayerStatistics>,
    recommender: &PositionRecommender,
    apply_filter: bool,
) -> Option<Recommendation> {
    recommender.recommend(&query_candidates(query, players), &query_pins(query), apply_filter)
}

/// Answer a stack query over canonical names.
///
/// `with_positions` honors the pinned roles with the minimum-games filter on;
/// `without_positions` uses neither.
pub fn stack_query(
    query: &[QueryPlayer],
    players: &BTreeMap<String, OverallPlayerStatistics>,
    stacks: &BTreeMap<StackKey, OverallStackStatistics>,
    recommender: &PositionRecommender,
) -> QueryReport {
    let names: Vec<&str> = query.iter().map(|q| q.player.as_str()).collect();
    let key = StackKey::from_names(&names);

    let candidates = query_candidates(query, players);
    if candidates.len() < names.len() {
        debug!(
            "Stack query {}: {} of {} players have no games",
            key,
            names.len() - candidates.len(),
            names.len()
        );
    }

    let stack = stacks.get(&key).cloned();
    if stack.is_none() {
        info!("No games found for stack query {}", key);
    }

    QueryReport {
        with_positions: recommender.recommend(&candidates, &query_pins(query), true),
        without_positions: recommender.recommend(&candidates, &Prefill::new(), false),
        stack,
        key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::parse_match_statistics;
    use crate::models::fixtures::match_between;
    use crate::roster::fixtures::roster;
    use pretty_assertions::assert_eq;

    const STACK_ONE: [&str; 5] = ["a", "b", "c", "d", "e"];
    const STACK_TWO: [&str; 5] = ["a", "b", "c", "d", "f"];
    const OPPONENTS: [&str; 5] = ["v", "w", "x", "y", "z"];

    /// Stack one wins both its games, stack two splits its two.
    fn two_stack_index() -> AggregationIndex {
        let roster = roster(&["a", "b", "c", "d", "e", "f"]);
        let games = [
            match_between("NA1_1", &STACK_ONE, &OPPONENTS, true),
            match_between("NA1_2", &STACK_ONE, &OPPONENTS, true),
            match_between("NA1_3", &STACK_TWO, &OPPONENTS, true),
            match_between("NA1_4", &STACK_TWO, &OPPONENTS, false),
        ];
        let mut index = AggregationIndex::new();
        for m in &games {
            index.fold(&parse_match_statistics(m, &roster));
        }
        index
    }

    /// One stack, every game won, each player always in the same role.
    fn winning_stack_index(games: usize) -> AggregationIndex {
        let roster = roster(&STACK_ONE);
        let mut index = AggregationIndex::new();
        for i in 0..games {
            let m = match_between(&format!("NA1_{}", i), &STACK_ONE, &OPPONENTS, true);
            index.fold(&parse_match_statistics(&m, &roster));
        }
        index
    }

    fn stack_one_key() -> StackKey {
        StackKey::from_names(&["A#NA1", "B#NA1", "C#NA1", "D#NA1", "E#NA1"])
    }

    fn stack_two_key() -> StackKey {
        StackKey::from_names(&["A#NA1", "B#NA1", "C#NA1", "D#NA1", "F#NA1"])
    }

    #[test]
    fn test_player_summary() {
        let index = two_stack_index();
        let overall = overall_player_statistics(&index);
        let a = &overall["A#NA1"];

        assert_eq!(a.number_of_games, 4);
        assert_eq!(a.aggregate_win_percent, 0.75);
        assert_eq!(a.best_position, Some(Role::Top));
        assert_eq!(a.worst_position, Some(Role::Top));
        assert_eq!(a.win_percent_by_role.len(), 1);
        assert_eq!(a.win_percent_by_role[&Role::Top], RoleWinStat::new(0.75, 4));
    }

    #[test]
    fn test_best_by_lane() {
        let index = two_stack_index();
        let overall = overall_player_statistics(&index);
        let c = &overall["C#NA1"];

        assert_eq!(c.best_by_lane.len(), StatField::ALL.len());
        assert_eq!(c.best_by_lane[&StatField::Kills], Some(Role::Middle));
        assert_eq!(c.best_by_lane[&StatField::Win], Some(Role::Middle));
        // Fixture participants carry no challenge data.
        assert_eq!(c.best_by_lane[&StatField::DamagePerMinute], None);
    }

    #[test]
    fn test_winningest_stacks() {
        let index = two_stack_index();
        let overall = overall_player_statistics(&index);

        let a = &overall["A#NA1"];
        assert_eq!(a.winningest_stack, vec![stack_one_key(), stack_two_key()]);
        // Neither stack has five games yet.
        assert!(a.winningest_stack_at_least_5.is_empty());

        let e = &overall["E#NA1"];
        assert_eq!(e.winningest_stack, vec![stack_one_key()]);
    }

    #[test]
    fn test_winningest_stacks_at_least_five() {
        let index = winning_stack_index(5);
        let overall = overall_player_statistics(&index);
        assert_eq!(overall["A#NA1"].winningest_stack_at_least_5, vec![stack_one_key()]);
    }

    #[test]
    fn test_best_teammates() {
        let index = two_stack_index();
        let overall = overall_player_statistics(&index);
        let teammates = &overall["A#NA1"].best_teammates;

        let names: Vec<&str> = teammates.iter().map(|t| t.player.as_str()).collect();
        assert_eq!(names, vec!["E#NA1", "B#NA1", "C#NA1", "D#NA1", "F#NA1"]);

        assert_eq!(teammates[0].win_percent, 1.0);
        assert_eq!(teammates[0].number_of_games, 2);
        assert_eq!(teammates[1].win_percent, 0.75);
        assert_eq!(teammates[1].number_of_games, 4);
        assert_eq!(teammates[4].win_percent, 0.5);
        assert!(teammates.iter().all(|t| t.player != "A#NA1"));
    }

    #[test]
    fn test_stack_summary() {
        let index = winning_stack_index(6);
        let players = overall_player_statistics(&index);
        let stacks = overall_stack_statistics(&index, &players, &PositionRecommender::new(3));

        assert_eq!(stacks.len(), 1);
        let stack = &stacks[&stack_one_key()];
        let based_on_stack = &stack.based_on_stack;
        assert_eq!(based_on_stack.number_of_games, 6);
        assert_eq!(based_on_stack.win_percent, 1.0);
        assert_eq!(based_on_stack.player_best_positions["C#NA1"], Some(Role::Middle));
        assert_eq!(based_on_stack.player_worst_positions["E#NA1"], Some(Role::Utility));
        assert!(based_on_stack.meets_minimum_games);

        let rec = based_on_stack.recommendation.as_ref().unwrap();
        assert_eq!(rec.player_for(Role::Top), Some("A#NA1"));
        assert_eq!(rec.player_for(Role::Utility), Some("E#NA1"));
        assert_eq!(rec.win_percent, 1.0);
        assert!(!rec.is_filtered);

        let players_rec = stack.based_on_players.recommendation.as_ref().unwrap();
        assert_eq!(players_rec.positions, rec.positions);
        assert!(!players_rec.is_filtered);

        let filtered = stack.based_on_players_filtered.recommendation.as_ref().unwrap();
        assert_eq!(filtered.positions, rec.positions);
        assert!(filtered.is_filtered);
    }

    #[test]
    fn test_stack_summary_below_minimum() {
        let index = winning_stack_index(2);
        let players = overall_player_statistics(&index);
        let stacks = overall_stack_statistics(&index, &players, &PositionRecommender::new(3));

        let stack = &stacks[&stack_one_key()];
        assert!(!stack.based_on_stack.meets_minimum_games);
        let filtered = stack.based_on_players_filtered.recommendation.as_ref().unwrap();
        assert!(!filtered.is_filtered);
    }

    #[test]
    fn test_group_aggregate_win() {
        let index = two_stack_index();
        let players = overall_player_statistics(&index);
        let group = group_aggregate_win(&players);

        // A-D: 3 of 4, E: 2 of 2, F: 1 of 2.
        assert_eq!(group.count, 4 * 4 + 2 + 2);
        assert!((group.percent - 15.0 / 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_aggregate_win_empty() {
        let group = group_aggregate_win(&BTreeMap::new());
        assert_eq!(group, BooleanStatistic::default());
    }

    fn query(entries: &[(&str, Option<Role>)]) -> Vec<QueryPlayer> {
        entries
            .iter()
            .map(|(player, position)| QueryPlayer {
                player: player.to_string(),
                position: *position,
            })
            .collect()
    }

    #[test]
    fn test_stack_query_with_pins() {
        let index = winning_stack_index(6);
        let recommender = PositionRecommender::new(3);
        let players = overall_player_statistics(&index);
        let stacks = overall_stack_statistics(&index, &players, &recommender);

        let q = query(&[
            ("E#NA1", None),
            ("A#NA1", Some(Role::Middle)),
            ("B#NA1", None),
            ("C#NA1", None),
            ("D#NA1", None),
        ]);
        let report = stack_query(&q, &players, &stacks, &recommender);

        assert_eq!(report.key, stack_one_key());
        assert!(report.stack.is_some());

        let with = report.with_positions.unwrap();
        assert_eq!(with.player_for(Role::Middle), Some("A#NA1"));
        // Only the unpinned lineup has games in every slot.
        assert!(!with.is_filtered);

        let without = report.without_positions.unwrap();
        assert_eq!(without.player_for(Role::Top), Some("A#NA1"));
        assert_eq!(without.player_for(Role::Middle), Some("C#NA1"));
        assert!(!without.is_filtered);
    }

    #[test]
    fn test_recommend_query_without_filter() {
        let index = winning_stack_index(6);
        let recommender = PositionRecommender::new(3);
        let players = overall_player_statistics(&index);

        let q = query(&[
            ("A#NA1", None),
            ("B#NA1", None),
            ("C#NA1", Some(Role::Top)),
            ("D#NA1", None),
            ("E#NA1", None),
        ]);
        let rec = recommend_query(&q, &players, &recommender, false).unwrap();
        assert_eq!(rec.player_for(Role::Top), Some("C#NA1"));
        assert!(!rec.is_filtered);
    }

    #[test]
    fn test_stack_query_unknown_players() {
        let index = winning_stack_index(2);
        let recommender = PositionRecommender::new(3);
        let players = overall_player_statistics(&index);
        let stacks = overall_stack_statistics(&index, &players, &recommender);

        let q = query(&[("A#NA1", None), ("B#NA1", None), ("Nobody#NA1", None)]);
        let report = stack_query(&q, &players, &stacks, &recommender);

        assert!(report.stack.is_none());
        assert!(report.with_positions.is_none());
        assert!(report.without_positions.is_none());
    }
}
