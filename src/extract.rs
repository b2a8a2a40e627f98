//! Per-match statistic extraction.
//!
//! Turns one match into a sample per tracked participant. Extraction is
//! best-effort per field: a missing or zero counter simply leaves that
//! statistic out of the sample.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{
    BooleanStatistic, Match, MatchParticipant, MatchParticipantChallenge, NumericStatistic,
    PlayerRoleAndAggregateStatistics, PlayerStatistics, PlayerStatisticsWithEnemy, StackKey,
};
use crate::roster::Roster;

/// Samples of every tracked player found in one match.
#[derive(Debug, Clone)]
pub struct MatchSamples {
    pub match_id: String,
    /// Tracked players in participant order.
    pub order: Vec<String>,
    pub players: BTreeMap<String, PlayerRoleAndAggregateStatistics>,
    /// Team id of each tracked player.
    pub teams: BTreeMap<String, u32>,
}

impl MatchSamples {
    /// Key of the group of tracked players in this match.
    pub fn stack_key(&self) -> StackKey {
        StackKey::from_names(&self.order)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether both players are tracked in this match and on the same team.
    pub fn are_teammates(&self, a: &str, b: &str) -> bool {
        match (self.teams.get(a), self.teams.get(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Whether every tracked player was on one team.
    pub fn is_single_team(&self) -> bool {
        let mut teams = self.teams.values();
        match teams.next() {
            Some(first) => teams.all(|team| team == first),
            None => false,
        }
    }
}

/// Prefer the challenge value, falling back to the base counter when it is absent or zero.
fn prefer(challenge: Option<f64>, base: f64) -> f64 {
    match challenge {
        Some(value) if value != 0.0 => value,
        _ => base,
    }
}

fn challenge_numeric<F>(challenges: Option<&MatchParticipantChallenge>, field: F) -> Option<NumericStatistic>
where
    F: Fn(&MatchParticipantChallenge) -> f64,
{
    challenges.map(field).and_then(NumericStatistic::new)
}

/// Build a statistics sample for one participant.
///
/// Without a challenge `kda`, KDA is `(kills + assists) / deaths`; a deathless
/// game gives a non-finite ratio, which counts as no data.
pub fn parse_player_statistics(player: &MatchParticipant) -> PlayerStatistics {
    let c = player.challenges.as_ref();
    let local_kda = (player.kills + player.assists) / player.deaths;

    PlayerStatistics {
        number_of_games: BooleanStatistic::new(true),
        win: BooleanStatistic::new(player.win),
        kda: NumericStatistic::new(prefer(c.map(|c| c.kda), local_kda)),
        kills: NumericStatistic::new(player.kills),
        deaths: NumericStatistic::new(player.deaths),
        assists: NumericStatistic::new(player.assists),
        vision_score: NumericStatistic::new(player.vision_score),
        total_damage_dealt_to_champions: NumericStatistic::new(
            player.total_damage_dealt_to_champions,
        ),
        first_tower: BooleanStatistic::new(player.first_tower_kill || player.first_tower_assist),
        first_blood: BooleanStatistic::new(player.first_blood_kill || player.first_blood_assist),
        objectives_stolen: NumericStatistic::new(player.objectives_stolen),
        gold_earned: NumericStatistic::new(player.gold_earned),
        towers: NumericStatistic::new(player.turret_takedowns),
        dragons: NumericStatistic::new(prefer(c.map(|c| c.dragon_takedowns), player.dragon_kills)),
        barons: NumericStatistic::new(prefer(c.map(|c| c.baron_takedowns), player.baron_kills)),
        rift_herald: challenge_numeric(c, |c| c.rift_herald_takedowns),
        damage_per_minute: challenge_numeric(c, |c| c.damage_per_minute),
        earliest_baron: challenge_numeric(c, |c| c.earliest_baron),
        earliest_dragon_takedown: challenge_numeric(c, |c| c.earliest_dragon_takedown),
        epic_monster_steals: challenge_numeric(c, |c| c.epic_monster_steals),
        first_turret_killed: challenge_numeric(c, |c| c.first_turret_killed),
        first_turret_killed_time: challenge_numeric(c, |c| c.first_turret_killed_time),
        game_length: challenge_numeric(c, |c| c.game_length),
        gold_per_minute: challenge_numeric(c, |c| c.gold_per_minute),
        kill_participation: challenge_numeric(c, |c| c.kill_participation),
        lane_minions_first_10_minutes: challenge_numeric(c, |c| c.lane_minions_first_10_minutes),
        laning_phase_gold_exp_advantage: challenge_numeric(c, |c| {
            c.laning_phase_gold_exp_advantage
        }),
        max_cs_advantage_on_lane_opponent: challenge_numeric(c, |c| {
            c.max_cs_advantage_on_lane_opponent
        }),
        max_kill_deficit: challenge_numeric(c, |c| c.max_kill_deficit),
        max_level_lead_lane_opponent: challenge_numeric(c, |c| c.max_level_lead_lane_opponent),
        solo_kills: challenge_numeric(c, |c| c.solo_kills),
        solo_turrets_lategame: challenge_numeric(c, |c| c.solo_turrets_lategame),
        stealth_wards_placed: challenge_numeric(c, |c| c.stealth_wards_placed),
        takedown_on_first_turret: challenge_numeric(c, |c| c.takedown_on_first_turret),
        takedowns: challenge_numeric(c, |c| c.takedowns),
        takedowns_first_x_minutes: challenge_numeric(c, |c| c.takedowns_first_x_minutes),
        team_damage_percentage: challenge_numeric(c, |c| c.team_damage_percentage),
        turret_plates_taken: challenge_numeric(c, |c| c.turret_plates_taken),
        turret_takedowns: challenge_numeric(c, |c| c.turret_takedowns),
        vision_score_advantage_lane_opponent: challenge_numeric(c, |c| {
            c.vision_score_advantage_lane_opponent
        }),
        vision_score_per_minute: challenge_numeric(c, |c| c.vision_score_per_minute),
        ward_takedowns: challenge_numeric(c, |c| c.ward_takedowns),
        ward_takedowns_before_20_m: challenge_numeric(c, |c| c.ward_takedowns_before_20_m),
        wards_guarded: challenge_numeric(c, |c| c.wards_guarded),
    }
}

/// Extract samples for every tracked participant of a match.
///
/// Each sample lands in the player's role slot (when the role is known) and
/// in their aggregate. Players absent from the match produce no entry.
pub fn parse_match_statistics(m: &Match, roster: &Roster) -> MatchSamples {
    let mut order = Vec::new();
    let mut players = BTreeMap::new();
    let mut teams = BTreeMap::new();

    for (name, participant) in roster.tracked_in(m) {
        let enemy = m.enemy_laner(participant).map(parse_player_statistics);
        if enemy.is_none() {
            debug!(
                "No lane opponent for {} in {} (role {:?})",
                name,
                m.id(),
                participant.team_position
            );
        }
        let sample = PlayerStatisticsWithEnemy::new(parse_player_statistics(participant), enemy);
        let stats = PlayerRoleAndAggregateStatistics::from_sample(participant.team_position, sample);

        order.push(name.to_string());
        players.insert(name.to_string(), stats);
        teams.insert(name.to_string(), participant.team_id);
    }

    MatchSamples {
        match_id: m.id().to_string(),
        order,
        players,
        teams,
    }
}
