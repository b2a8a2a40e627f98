//! Batch aggregation of match samples.
//!
//! [`AggregationIndex`] owns the three running aggregates of a batch:
//! per player, per stack, and per duo role pair. It starts empty, is mutated
//! only through [`AggregationIndex::fold`], and is read once folding is done.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::extract::MatchSamples;
use crate::models::{
    duo_role_signature, BooleanStatistic, DuoKey, PlayerRoleAndAggregateStatistics, Role,
    RoleSlot, StackKey, STACK_SIZE,
};

/// Per-player statistics of one stack, keyed by canonical name.
pub type StackStatistics = BTreeMap<String, PlayerRoleAndAggregateStatistics>;

/// Win statistics of a duo, keyed by role-pair signature.
pub type DuoStatistics = BTreeMap<String, BooleanStatistic>;

/// Running aggregates over a batch of matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationIndex {
    pub players: BTreeMap<String, PlayerRoleAndAggregateStatistics>,
    pub stacks: BTreeMap<StackKey, StackStatistics>,
    pub duos: BTreeMap<DuoKey, DuoStatistics>,
    pub matches_folded: usize,
}

fn merge_player_into(
    map: &mut BTreeMap<String, PlayerRoleAndAggregateStatistics>,
    name: &str,
    stats: &PlayerRoleAndAggregateStatistics,
) {
    match map.get_mut(name) {
        Some(existing) => existing.absorb(stats),
        None => {
            map.insert(name.to_string(), stats.clone());
        }
    }
}

fn merge_duo_into(into: &mut DuoStatistics, from: &DuoStatistics) {
    for (signature, stat) in from {
        into.entry(signature.clone())
            .and_modify(|existing| *existing = existing.merge(stat))
            .or_insert(*stat);
    }
}

/// Slots a player held in a match: each populated role, then the aggregate.
fn slots(stats: &PlayerRoleAndAggregateStatistics) -> Vec<(RoleSlot, &BooleanStatistic)> {
    let mut slots: Vec<(RoleSlot, &BooleanStatistic)> = Role::ALL
        .into_iter()
        .filter_map(|role| stats.role(role).map(|s| (RoleSlot::Role(role), &s.stats.win)))
        .collect();
    slots.push((RoleSlot::Aggregate, &stats.aggregate.stats.win));
    slots
}

impl AggregationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one match's samples into every aggregate.
    ///
    /// The stack aggregate only receives matches where the full stack is
    /// present on one team; the player and duo aggregates receive every match.
    pub fn fold(&mut self, samples: &MatchSamples) {
        if samples.is_empty() {
            debug!("Match {} has no tracked players", samples.match_id);
            return;
        }

        if samples.len() == STACK_SIZE && samples.is_single_team() {
            let stack = self.stacks.entry(samples.stack_key()).or_default();
            for (name, stats) in &samples.players {
                merge_player_into(stack, name, stats);
            }
        } else {
            debug!(
                "Match {} has no full stack ({} tracked players), skipping stack aggregate",
                samples.match_id,
                samples.len()
            );
        }

        for (name, stats) in &samples.players {
            merge_player_into(&mut self.players, name, stats);
        }

        self.fold_duos(samples);
        self.matches_folded += 1;
    }

    /// Accumulate duo role-pair win statistics.
    ///
    /// Only teammates are paired, so player A's win outcome stands for the
    /// pair.
    fn fold_duos(&mut self, samples: &MatchSamples) {
        for (i, a) in samples.order.iter().enumerate() {
            for b in &samples.order[i + 1..] {
                if !samples.are_teammates(a, b) {
                    continue;
                }
                let (Some(a_stats), Some(b_stats)) =
                    (samples.players.get(a), samples.players.get(b))
                else {
                    continue;
                };
                let duo = self.duos.entry(DuoKey::new(a, b)).or_default();
                let b_slots = slots(b_stats);
                for (a_slot, win) in slots(a_stats) {
                    for (b_slot, _) in &b_slots {
                        let signature = duo_role_signature(a, a_slot, b, *b_slot);
                        duo.entry(signature)
                            .and_modify(|existing| *existing = existing.merge(win))
                            .or_insert(*win);
                    }
                }
            }
        }
    }

    /// Fold a whole batch in order.
    pub fn fold_all<'a, I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = &'a MatchSamples>,
    {
        for samples in batch {
            self.fold(samples);
        }
        info!(
            "Folded {} matches: {} players, {} stacks, {} duos",
            self.matches_folded,
            self.players.len(),
            self.stacks.len(),
            self.duos.len()
        );
    }

    /// Merge another index built from a disjoint part of the batch.
    pub fn merge(&mut self, other: &AggregationIndex) {
        for (name, stats) in &other.players {
            merge_player_into(&mut self.players, name, stats);
        }
        for (key, stack) in &other.stacks {
            let into = self.stacks.entry(key.clone()).or_default();
            for (name, stats) in stack {
                merge_player_into(into, name, stats);
            }
        }
        for (key, duo) in &other.duos {
            merge_duo_into(self.duos.entry(key.clone()).or_default(), duo);
        }
        self.matches_folded += other.matches_folded;
    }

    /// Stacks that include `player`.
    pub fn stacks_with<'a>(
        &'a self,
        player: &'a str,
    ) -> impl Iterator<Item = (&'a StackKey, &'a StackStatistics)> + 'a {
        self.stacks
            .iter()
            .filter(move |(_, stack)| stack.contains_key(player))
    }
}
