//! Match records as delivered by the match-v5 API.
//!
//! Only the fields the statistics engine reads are modelled. Missing numeric
//! fields default to zero, which the extractor treats as "no data".

use serde::{Deserialize, Serialize};

use super::role::{deserialize_team_position, Role};

/// A single match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

impl Match {
    pub fn id(&self) -> &str {
        &self.metadata.match_id
    }

    /// Find a participant by puuid.
    pub fn participant(&self, puuid: &str) -> Option<&MatchParticipant> {
        self.info.participants.iter().find(|p| p.puuid == puuid)
    }

    /// The opposing participant who played the same role as `player`.
    ///
    /// Returns `None` when `player` has no resolved role or nobody on the
    /// other team shares it.
    pub fn enemy_laner(&self, player: &MatchParticipant) -> Option<&MatchParticipant> {
        let role = player.team_position?;
        self.info
            .participants
            .iter()
            .find(|p| p.team_position == Some(role) && p.team_id != player.team_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    #[serde(default)]
    pub data_version: String,
    pub match_id: String,
    /// Participant puuids.
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    /// Seconds.
    #[serde(default)]
    pub game_duration: u64,
    #[serde(default)]
    pub participants: Vec<MatchParticipant>,
    #[serde(default)]
    pub platform_id: String,
    #[serde(default)]
    pub queue_id: u32,
}

/// Base counters of one participant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchParticipant {
    pub puuid: String,
    pub summoner_name: String,
    pub champion_name: String,
    pub team_id: u32,
    #[serde(deserialize_with = "deserialize_team_position")]
    pub team_position: Option<Role>,
    pub win: bool,

    pub kills: f64,
    pub deaths: f64,
    pub assists: f64,
    pub baron_kills: f64,
    pub dragon_kills: f64,
    pub turret_takedowns: f64,
    pub objectives_stolen: f64,
    pub gold_earned: f64,
    pub vision_score: f64,
    pub total_damage_dealt_to_champions: f64,

    pub first_blood_kill: bool,
    pub first_blood_assist: bool,
    pub first_tower_kill: bool,
    pub first_tower_assist: bool,

    pub challenges: Option<MatchParticipantChallenge>,
}

/// The richer per-participant "challenges" sub-record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchParticipantChallenge {
    pub baron_takedowns: f64,
    pub damage_per_minute: f64,
    pub dragon_takedowns: f64,
    pub earliest_baron: f64,
    pub earliest_dragon_takedown: f64,
    pub epic_monster_steals: f64,
    pub first_turret_killed: f64,
    pub first_turret_killed_time: f64,
    pub game_length: f64,
    pub gold_per_minute: f64,
    pub kda: f64,
    pub kill_participation: f64,
    pub lane_minions_first_10_minutes: f64,
    pub laning_phase_gold_exp_advantage: f64,
    pub max_cs_advantage_on_lane_opponent: f64,
    pub max_kill_deficit: f64,
    pub max_level_lead_lane_opponent: f64,
    pub rift_herald_takedowns: f64,
    pub solo_kills: f64,
    pub solo_turrets_lategame: f64,
    pub stealth_wards_placed: f64,
    pub takedown_on_first_turret: f64,
    pub takedowns: f64,
    pub takedowns_first_x_minutes: f64,
    pub team_damage_percentage: f64,
    pub turret_plates_taken: f64,
    pub turret_takedowns: f64,
    pub vision_score_advantage_lane_opponent: f64,
    pub vision_score_per_minute: f64,
    pub ward_takedowns: f64,
    pub ward_takedowns_before_20_m: f64,
    pub wards_guarded: f64,
}
