//! Role assignment recommendation.
//!
//! Given each candidate's per-role win statistics, search every way to give
//! the five candidates the five roles and keep the assignment whose
//! count-weighted win percent is highest.
//!
//! The search expects exactly [`STACK_SIZE`] candidates. With fewer no
//! complete assignment exists and the result is `None`; with more, only the
//! first five rows take part, so callers narrow the candidate list first.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{BooleanStatistic, Recommendation, Role, RoleWinStat, STACK_SIZE};

/// A candidate paired with their per-role win statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub roles: BTreeMap<Role, RoleWinStat>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, roles: BTreeMap<Role, RoleWinStat>) -> Self {
        Self {
            name: name.into(),
            roles,
        }
    }

    /// One entry per role in [`Role::ALL`] order, with `{0, 0}` for roles without data.
    fn row(&self) -> [(Role, RoleWinStat); STACK_SIZE] {
        Role::ALL.map(|role| (role, self.roles.get(&role).copied().unwrap_or_default()))
    }
}

/// Roles pinned to specific players.
pub type Prefill = BTreeMap<Role, String>;

/// One pick per candidate row: the role taken and its statistic.
pub type Assignment = [(Role, RoleWinStat); STACK_SIZE];

/// Lazy depth-first enumeration of one pick per row.
///
/// Yields every combination in row-major order: the last row varies fastest.
/// Combinations are not filtered here; see [`is_complete`].
pub struct Combinations {
    rows: Vec<[(Role, RoleWinStat); STACK_SIZE]>,
    cursor: [usize; STACK_SIZE],
    done: bool,
}

impl Combinations {
    pub fn new(candidates: &[Candidate]) -> Self {
        let rows: Vec<_> = candidates.iter().take(STACK_SIZE).map(Candidate::row).collect();
        Self {
            done: rows.len() < STACK_SIZE,
            rows,
            cursor: [0; STACK_SIZE],
        }
    }

    /// Advance the odometer; returns false once every position has been visited.
    fn advance(&mut self) -> bool {
        for depth in (0..STACK_SIZE).rev() {
            self.cursor[depth] += 1;
            if self.cursor[depth] < STACK_SIZE {
                return true;
            }
            self.cursor[depth] = 0;
        }
        false
    }
}

impl Iterator for Combinations {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current: Assignment =
            std::array::from_fn(|row| self.rows[row][self.cursor[row]]);
        self.done = !self.advance();
        Some(current)
    }
}

/// Whether every role appears exactly once.
pub fn is_complete(assignment: &Assignment) -> bool {
    Role::ALL
        .iter()
        .all(|role| assignment.iter().filter(|(r, _)| r == role).count() == 1)
}

/// Whether every pinned role is held by its pinned candidate.
fn honors_prefill(assignment: &Assignment, candidates: &[Candidate], prefilled: &Prefill) -> bool {
    assignment
        .iter()
        .zip(candidates)
        .all(|((role, _), candidate)| match prefilled.get(role) {
            Some(pinned) => *pinned == candidate.name,
            None => true,
        })
}

/// Count-weighted merge of the five picked statistics.
fn merged_win(assignment: &Assignment) -> BooleanStatistic {
    assignment.iter().map(|(_, stat)| stat.as_boolean()).sum()
}

/// Picks the best role assignment by historical win rate.
#[derive(Debug, Clone, Copy)]
pub struct PositionRecommender {
    minimum_number_of_games: u32,
}

impl PositionRecommender {
    pub fn new(minimum_number_of_games: u32) -> Self {
        Self {
            minimum_number_of_games,
        }
    }

    pub fn minimum_number_of_games(&self) -> u32 {
        self.minimum_number_of_games
    }

    /// Whether every slot has at least the minimum number of games.
    fn meets_minimum(&self, assignment: &Assignment) -> bool {
        assignment.iter().all(|(_, stat)| {
            stat.number_of_games > 0 && stat.number_of_games >= self.minimum_number_of_games
        })
    }

    /// Complete assignments that honor the pinned roles, in generation order.
    fn valid_assignments(&self, candidates: &[Candidate], prefilled: &Prefill) -> Vec<Assignment> {
        Combinations::new(candidates)
            .filter(is_complete)
            .filter(|a| honors_prefill(a, candidates, prefilled))
            .collect()
    }

    /// Whether some complete assignment meets the minimum-games threshold.
    pub fn can_satisfy_minimum(&self, candidates: &[Candidate], prefilled: &Prefill) -> bool {
        self.valid_assignments(candidates, prefilled)
            .iter()
            .any(|a| self.meets_minimum(a))
    }

    /// Find the assignment with the highest merged win percent.
    ///
    /// With `apply_filter`, assignments containing a slot below the minimum
    /// number of games are dropped, unless that would drop all of them, in
    /// which case the unfiltered set is used and `is_filtered` is false. Ties
    /// keep the first assignment in generation order.
    pub fn recommend(
        &self,
        candidates: &[Candidate],
        prefilled: &Prefill,
        apply_filter: bool,
    ) -> Option<Recommendation> {
        let combinations = self.valid_assignments(candidates, prefilled);
        if combinations.is_empty() {
            debug!(
                "No complete assignment for {} candidates with {} pinned roles",
                candidates.len(),
                prefilled.len()
            );
            return None;
        }

        let filtered: Vec<&Assignment> = if apply_filter {
            combinations.iter().filter(|a| self.meets_minimum(a)).collect()
        } else {
            Vec::new()
        };
        let is_filtered = !filtered.is_empty();
        let pool: Vec<&Assignment> = if is_filtered {
            filtered
        } else {
            combinations.iter().collect()
        };

        let mut best: Option<(&Assignment, BooleanStatistic)> = None;
        for assignment in pool {
            let win = merged_win(assignment);
            let replace = match &best {
                Some((_, current)) => win.percent > current.percent,
                None => true,
            };
            if replace {
                best = Some((assignment, win));
            }
        }

        let (assignment, win) = best?;
        let positions = assignment
            .iter()
            .zip(candidates)
            .map(|((role, _), candidate)| (*role, candidate.name.clone()))
            .collect();

        Some(Recommendation {
            positions,
            win_percent: win.percent,
            is_filtered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stats(entries: &[(Role, f64, u32)]) -> BTreeMap<Role, RoleWinStat> {
        entries
            .iter()
            .map(|(role, percent, games)| (*role, RoleWinStat::new(*percent, *games)))
            .collect()
    }

    /// Three candidates strong at TOP, decent at JUNGLE, plus two flexible ones.
    fn scenario() -> Vec<Candidate> {
        let top_jungle = stats(&[(Role::Top, 0.6, 10), (Role::Jungle, 0.4, 8)]);
        let flex = stats(&[
            (Role::Middle, 0.5, 5),
            (Role::Bottom, 0.5, 5),
            (Role::Utility, 0.5, 5),
        ]);
        vec![
            Candidate::new("A", top_jungle.clone()),
            Candidate::new("B", top_jungle.clone()),
            Candidate::new("C", top_jungle),
            Candidate::new("D", flex.clone()),
            Candidate::new("E", flex),
        ]
    }

    fn five(names: [&str; 5]) -> Vec<Candidate> {
        names
            .iter()
            .zip(Role::ALL)
            .map(|(name, role)| Candidate::new(*name, stats(&[(role, 0.5, 4)])))
            .collect()
    }

    #[test]
    fn test_combinations_count_and_order() {
        let candidates = five(["A", "B", "C", "D", "E"]);
        let all: Vec<Assignment> = Combinations::new(&candidates).collect();
        assert_eq!(all.len(), 3125);
        assert!(all[0].iter().all(|(r, _)| *r == Role::Top));
        assert_eq!(all[1][4].0, Role::Jungle);
        assert_eq!(all.iter().filter(|a| is_complete(a)).count(), 120);
    }

    #[test]
    fn test_combinations_restartable() {
        let candidates = five(["A", "B", "C", "D", "E"]);
        let first: Vec<Assignment> = Combinations::new(&candidates).take(10).collect();
        let second: Vec<Assignment> = Combinations::new(&candidates).take(10).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_too_few_candidates() {
        let mut candidates = five(["A", "B", "C", "D", "E"]);
        candidates.pop();
        assert_eq!(Combinations::new(&candidates).count(), 0);

        let recommender = PositionRecommender::new(0);
        assert_eq!(recommender.minimum_number_of_games(), 0);
        assert!(recommender.recommend(&candidates, &Prefill::new(), false).is_none());
        assert!(recommender.recommend(&[], &Prefill::new(), true).is_none());
    }

    #[test]
    fn test_recommend_obvious_assignment() {
        let candidates = five(["A", "B", "C", "D", "E"]);
        let rec = PositionRecommender::new(0)
            .recommend(&candidates, &Prefill::new(), false)
            .unwrap();

        assert_eq!(rec.player_for(Role::Top), Some("A"));
        assert_eq!(rec.player_for(Role::Jungle), Some("B"));
        assert_eq!(rec.player_for(Role::Middle), Some("C"));
        assert_eq!(rec.player_for(Role::Bottom), Some("D"));
        assert_eq!(rec.player_for(Role::Utility), Some("E"));
        // Every assignment with at least one populated slot ties at 0.5; the
        // first one generated wins.
        assert_eq!(rec.win_percent, 0.5);
        assert!(!rec.is_filtered);
    }

    #[test]
    fn test_scenario_is_deterministic() {
        let recommender = PositionRecommender::new(0);
        let first = recommender.recommend(&scenario(), &Prefill::new(), false).unwrap();
        let second = recommender.recommend(&scenario(), &Prefill::new(), false).unwrap();
        assert_eq!(first, second);

        // Only one of A, B, C can take TOP; putting the other two on empty
        // slots and sending D or E to the empty JUNGLE avoids diluting the
        // weighted rate with JUNGLE's 0.4: (0.6*10 + 0.5*5) / 15.
        let expected = (0.6 * 10.0 + 0.5 * 5.0) / 15.0;
        assert!((first.win_percent - expected).abs() < 1e-9);
        assert_eq!(first.positions.len(), 5);
        let top = first.player_for(Role::Top).unwrap();
        assert!(["A", "B", "C"].contains(&top));
        let jungle = first.player_for(Role::Jungle).unwrap();
        assert!(["D", "E"].contains(&jungle));
    }

    #[test]
    fn test_prefill_is_honored() {
        let recommender = PositionRecommender::new(0);
        let mut prefilled = Prefill::new();
        prefilled.insert(Role::Middle, "D".to_string());

        let rec = recommender.recommend(&scenario(), &prefilled, false).unwrap();
        assert_eq!(rec.player_for(Role::Middle), Some("D"));

        for names in [["P1", "P2", "P3", "P4", "P5"], ["P3", "P5", "P1", "P4", "P2"]] {
            let mut pinned = Prefill::new();
            pinned.insert(Role::Middle, "P3".to_string());
            let rec = recommender.recommend(&five(names), &pinned, true).unwrap();
            assert_eq!(rec.player_for(Role::Middle), Some("P3"));
        }
    }

    #[test]
    fn test_prefill_with_unknown_player_yields_none() {
        let mut prefilled = Prefill::new();
        prefilled.insert(Role::Top, "Nobody".to_string());
        let rec = PositionRecommender::new(0).recommend(&scenario(), &prefilled, false);
        assert!(rec.is_none());
    }

    #[test]
    fn test_filter_applied() {
        // Every candidate has enough games everywhere, but one slot is weak on games.
        let mut candidates = five(["A", "B", "C", "D", "E"]);
        for candidate in &mut candidates {
            for role in Role::ALL {
                candidate.roles.entry(role).or_insert(RoleWinStat::new(0.4, 6));
            }
        }
        // A is great at JUNGLE but only with one game.
        candidates[0].roles.insert(Role::Jungle, RoleWinStat::new(1.0, 1));
        candidates[1].roles.insert(Role::Top, RoleWinStat::new(1.0, 6));

        let recommender = PositionRecommender::new(3);
        let unfiltered = recommender.recommend(&candidates, &Prefill::new(), false).unwrap();
        let filtered = recommender.recommend(&candidates, &Prefill::new(), true).unwrap();

        assert!(filtered.is_filtered);
        assert!(!unfiltered.is_filtered);
        assert_ne!(filtered.player_for(Role::Jungle), Some("A"));
        assert_eq!(unfiltered.player_for(Role::Jungle), Some("A"));
        assert!(recommender.can_satisfy_minimum(&candidates, &Prefill::new()));
    }

    #[test]
    fn test_filter_falls_back_when_nothing_qualifies() {
        let recommender = PositionRecommender::new(100);
        let unfiltered = recommender.recommend(&scenario(), &Prefill::new(), false).unwrap();
        let fallback = recommender.recommend(&scenario(), &Prefill::new(), true).unwrap();

        assert!(!fallback.is_filtered);
        assert_eq!(fallback, unfiltered);
        assert!(!recommender.can_satisfy_minimum(&scenario(), &Prefill::new()));
    }

    #[test]
    fn test_zero_game_slots_never_pass_filter() {
        // Minimum of zero still rejects slots without any games.
        let recommender = PositionRecommender::new(0);
        let rec = recommender.recommend(&scenario(), &Prefill::new(), true).unwrap();
        assert!(!rec.is_filtered);
    }

    #[test]
    fn test_extra_candidates_are_ignored() {
        let mut candidates = five(["A", "B", "C", "D", "E"]);
        candidates.push(Candidate::new("F", stats(&[(Role::Top, 1.0, 50)])));
        let rec = PositionRecommender::new(0)
            .recommend(&candidates, &Prefill::new(), false)
            .unwrap();
        assert!(!rec.positions.values().any(|p| p == "F"));
    }
}
