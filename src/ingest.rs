//! Batch pipeline.
//!
//! Selects qualifying matches, extracts per-player samples, folds them into
//! an [`AggregationIndex`] and synthesizes the reports.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info};

use crate::aggregate::AggregationIndex;
use crate::calculate::{
    group_aggregate_win, overall_player_statistics, overall_stack_statistics, stack_query,
};
use crate::config::QueryPlayer;
use crate::extract::{parse_match_statistics, MatchSamples};
use crate::models::{BatchReport, Match, STACK_SIZE};
use crate::recommend::PositionRecommender;
use crate::roster::Roster;

/// Keep matches played by exactly one full stack of tracked players on one team.
///
/// Duplicate match ids are dropped; the first occurrence wins.
pub fn select_qualifying_matches(matches: Vec<Match>, roster: &Roster) -> Vec<Match> {
    let total = matches.len();
    let mut seen = HashSet::new();
    let selected: Vec<Match> = matches
        .into_iter()
        .filter(|m| {
            if !seen.insert(m.id().to_string()) {
                debug!("Dropping duplicate match {}", m.id());
                return false;
            }
            let tracked = roster.tracked_count(m);
            if tracked != STACK_SIZE {
                debug!("Dropping match {} with {} tracked players", m.id(), tracked);
                return false;
            }
            if !roster.tracked_on_one_team(m) {
                debug!("Dropping match {} with tracked players on both teams", m.id());
                return false;
            }
            true
        })
        .collect();

    info!("Selected {} of {} matches", selected.len(), total);
    selected
}

/// Resolve query names through the roster's alias table.
pub fn canonical_query(query: &[QueryPlayer], roster: &Roster) -> Vec<QueryPlayer> {
    query
        .iter()
        .map(|q| QueryPlayer {
            player: roster.resolve_alias(&q.player).to_string(),
            position: q.position,
        })
        .collect()
}

/// Run extraction, folding and synthesis over a batch of matches.
pub fn run_batch(
    matches: &[Match],
    roster: &Roster,
    recommender: &PositionRecommender,
    query: Option<&[QueryPlayer]>,
) -> BatchReport {
    info!("Extracting samples from {} matches", matches.len());
    let samples: Vec<MatchSamples> = matches
        .iter()
        .map(|m| {
            let samples = parse_match_statistics(m, roster);
            debug!("Match {}: {} tracked players", m.id(), samples.len());
            samples
        })
        .collect();

    let mut index = AggregationIndex::new();
    index.fold_all(&samples);
    for name in roster.canonical_names() {
        if !index.players.contains_key(name) {
            debug!("No qualifying games for {}", name);
        }
    }

    let overall_players = overall_player_statistics(&index);
    let overall_stacks = overall_stack_statistics(&index, &overall_players, recommender);
    let group_win = group_aggregate_win(&overall_players);
    info!(
        "Group aggregate win {:.1}% over {} player games",
        group_win.percent * 100.0,
        group_win.count
    );

    let query = query.filter(|q| !q.is_empty()).map(|q| {
        let q = canonical_query(q, roster);
        stack_query(&q, &overall_players, &overall_stacks, recommender)
    });

    let AggregationIndex {
        players,
        stacks,
        duos,
        matches_folded,
    } = index;

    BatchReport {
        computed_at: Utc::now(),
        matches_folded,
        players,
        stacks,
        duos,
        overall_players,
        overall_stacks,
        group_win,
        query,
    }
}
