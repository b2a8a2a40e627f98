//! Per-player statistic records and their typed merges.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::statistic::{BooleanStatistic, Merge, NumericStatistic};
use super::Role;

/// Borrowed value of one statistic field, used to compare roles field by field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue<'a> {
    Numeric(Option<&'a NumericStatistic>),
    Boolean(&'a BooleanStatistic),
}

impl StatValue<'_> {
    /// Whether the field holds a sample.
    pub fn has_data(&self) -> bool {
        match self {
            StatValue::Numeric(value) => value.is_some(),
            StatValue::Boolean(_) => true,
        }
    }

    /// Whether `self` strictly beats `other`.
    ///
    /// Booleans compare by percent, numerics by average. No data never wins
    /// and always loses to data.
    pub fn is_better_than(&self, other: &StatValue<'_>) -> bool {
        match (self, other) {
            (StatValue::Boolean(a), StatValue::Boolean(b)) => a.percent > b.percent,
            (StatValue::Numeric(Some(a)), StatValue::Numeric(Some(b))) => a.average > b.average,
            (StatValue::Numeric(Some(_)), StatValue::Numeric(None)) => true,
            _ => false,
        }
    }
}

trait AsStatValue {
    fn as_stat_value(&self) -> StatValue<'_>;

    /// Numeric fields without a sample are left out of serialized output.
    fn lacks_data(&self) -> bool {
        !self.as_stat_value().has_data()
    }
}

impl AsStatValue for BooleanStatistic {
    fn as_stat_value(&self) -> StatValue<'_> {
        StatValue::Boolean(self)
    }
}

impl AsStatValue for Option<NumericStatistic> {
    fn as_stat_value(&self) -> StatValue<'_> {
        StatValue::Numeric(self.as_ref())
    }
}

/// Declares [`PlayerStatistics`], its field-wise merge, and the [`StatField`] index.
macro_rules! player_statistics {
    ($( $(#[$doc:meta])* $field:ident : $ty:ty => $variant:ident ),* $(,)?) => {
        /// One sample, or the running aggregate of many samples, for a player.
        #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct PlayerStatistics {
            $(
                $(#[$doc])*
                #[serde(skip_serializing_if = "AsStatValue::lacks_data")]
                pub $field: $ty,
            )*
        }

        impl PlayerStatistics {
            /// Merge every field with its kind's merge rule.
            pub fn merge(&self, other: &Self) -> Self {
                Self {
                    $( $field: self.$field.merge_with(&other.$field), )*
                }
            }

            /// Borrow the value of a single field.
            pub fn value(&self, field: StatField) -> StatValue<'_> {
                match field {
                    $( StatField::$variant => self.$field.as_stat_value(), )*
                }
            }
        }

        /// Names every field of [`PlayerStatistics`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum StatField {
            $( $variant, )*
        }

        impl StatField {
            /// All fields in declaration order.
            pub const ALL: &'static [StatField] = &[ $( StatField::$variant, )* ];
        }
    };
}

player_statistics! {
    /// Used purely as a game counter.
    number_of_games: BooleanStatistic => NumberOfGames,
    win: BooleanStatistic => Win,
    kda: Option<NumericStatistic> => Kda,
    kills: Option<NumericStatistic> => Kills,
    deaths: Option<NumericStatistic> => Deaths,
    assists: Option<NumericStatistic> => Assists,
    vision_score: Option<NumericStatistic> => VisionScore,
    total_damage_dealt_to_champions: Option<NumericStatistic> => TotalDamageDealtToChampions,
    first_tower: BooleanStatistic => FirstTower,
    first_blood: BooleanStatistic => FirstBlood,
    objectives_stolen: Option<NumericStatistic> => ObjectivesStolen,
    gold_earned: Option<NumericStatistic> => GoldEarned,
    towers: Option<NumericStatistic> => Towers,
    dragons: Option<NumericStatistic> => Dragons,
    barons: Option<NumericStatistic> => Barons,
    rift_herald: Option<NumericStatistic> => RiftHerald,
    damage_per_minute: Option<NumericStatistic> => DamagePerMinute,
    earliest_baron: Option<NumericStatistic> => EarliestBaron,
    earliest_dragon_takedown: Option<NumericStatistic> => EarliestDragonTakedown,
    epic_monster_steals: Option<NumericStatistic> => EpicMonsterSteals,
    first_turret_killed: Option<NumericStatistic> => FirstTurretKilled,
    first_turret_killed_time: Option<NumericStatistic> => FirstTurretKilledTime,
    game_length: Option<NumericStatistic> => GameLength,
    gold_per_minute: Option<NumericStatistic> => GoldPerMinute,
    kill_participation: Option<NumericStatistic> => KillParticipation,
    lane_minions_first_10_minutes: Option<NumericStatistic> => LaneMinionsFirst10Minutes,
    laning_phase_gold_exp_advantage: Option<NumericStatistic> => LaningPhaseGoldExpAdvantage,
    max_cs_advantage_on_lane_opponent: Option<NumericStatistic> => MaxCsAdvantageOnLaneOpponent,
    max_kill_deficit: Option<NumericStatistic> => MaxKillDeficit,
    max_level_lead_lane_opponent: Option<NumericStatistic> => MaxLevelLeadLaneOpponent,
    solo_kills: Option<NumericStatistic> => SoloKills,
    solo_turrets_lategame: Option<NumericStatistic> => SoloTurretsLategame,
    stealth_wards_placed: Option<NumericStatistic> => StealthWardsPlaced,
    takedown_on_first_turret: Option<NumericStatistic> => TakedownOnFirstTurret,
    takedowns: Option<NumericStatistic> => Takedowns,
    takedowns_first_x_minutes: Option<NumericStatistic> => TakedownsFirstXMinutes,
    team_damage_percentage: Option<NumericStatistic> => TeamDamagePercentage,
    turret_plates_taken: Option<NumericStatistic> => TurretPlatesTaken,
    turret_takedowns: Option<NumericStatistic> => TurretTakedowns,
    vision_score_advantage_lane_opponent: Option<NumericStatistic> => VisionScoreAdvantageLaneOpponent,
    vision_score_per_minute: Option<NumericStatistic> => VisionScorePerMinute,
    ward_takedowns: Option<NumericStatistic> => WardTakedowns,
    ward_takedowns_before_20_m: Option<NumericStatistic> => WardTakedownsBefore20M,
    wards_guarded: Option<NumericStatistic> => WardsGuarded,
}

/// A player's statistics together with their lane opponent's.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatisticsWithEnemy {
    #[serde(flatten)]
    pub stats: PlayerStatistics,

    /// Sampled from the opposing participant in the same role, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy_laner: Option<PlayerStatistics>,
}

impl PlayerStatisticsWithEnemy {
    pub fn new(stats: PlayerStatistics, enemy_laner: Option<PlayerStatistics>) -> Self {
        Self { stats, enemy_laner }
    }

    /// Merge both records; the lane opponent side falls back to whichever is present.
    pub fn merge(&self, other: &Self) -> Self {
        let enemy_laner = match (&self.enemy_laner, &other.enemy_laner) {
            (Some(a), Some(b)) => Some(a.merge(b)),
            (a, b) => a.clone().or_else(|| b.clone()),
        };
        Self {
            stats: self.stats.merge(&other.stats),
            enemy_laner,
        }
    }
}

fn merge_slot(
    a: &Option<PlayerStatisticsWithEnemy>,
    b: &Option<PlayerStatisticsWithEnemy>,
) -> Option<PlayerStatisticsWithEnemy> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge(b)),
        (a, b) => a.clone().or_else(|| b.clone()),
    }
}

/// Per-role statistics of one player plus the aggregate over every role played.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct PlayerRoleAndAggregateStatistics {
    #[serde(rename = "aggregate")]
    pub aggregate: PlayerStatisticsWithEnemy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<PlayerStatisticsWithEnemy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jungle: Option<PlayerStatisticsWithEnemy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle: Option<PlayerStatisticsWithEnemy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<PlayerStatisticsWithEnemy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utility: Option<PlayerStatisticsWithEnemy>,
}

impl PlayerRoleAndAggregateStatistics {
    /// Wrap one match sample: the aggregate plus, if known, the role slot.
    pub fn from_sample(role: Option<Role>, sample: PlayerStatisticsWithEnemy) -> Self {
        let mut stats = Self {
            aggregate: sample.clone(),
            ..Default::default()
        };
        if let Some(role) = role {
            *stats.role_mut(role) = Some(sample);
        }
        stats
    }

    pub fn role(&self, role: Role) -> Option<&PlayerStatisticsWithEnemy> {
        match role {
            Role::Top => self.top.as_ref(),
            Role::Jungle => self.jungle.as_ref(),
            Role::Middle => self.middle.as_ref(),
            Role::Bottom => self.bottom.as_ref(),
            Role::Utility => self.utility.as_ref(),
        }
    }

    fn role_mut(&mut self, role: Role) -> &mut Option<PlayerStatisticsWithEnemy> {
        match role {
            Role::Top => &mut self.top,
            Role::Jungle => &mut self.jungle,
            Role::Middle => &mut self.middle,
            Role::Bottom => &mut self.bottom,
            Role::Utility => &mut self.utility,
        }
    }

    /// Populated roles in [`Role::ALL`] order.
    pub fn roles(&self) -> impl Iterator<Item = (Role, &PlayerStatisticsWithEnemy)> + '_ {
        Role::ALL
            .into_iter()
            .filter_map(move |role| self.role(role).map(|stats| (role, stats)))
    }

    /// Merge the aggregate and each role slot independently.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            aggregate: self.aggregate.merge(&other.aggregate),
            top: merge_slot(&self.top, &other.top),
            jungle: merge_slot(&self.jungle, &other.jungle),
            middle: merge_slot(&self.middle, &other.middle),
            bottom: merge_slot(&self.bottom, &other.bottom),
            utility: merge_slot(&self.utility, &other.utility),
        }
    }

    /// Fold `other` into `self` in place.
    pub fn absorb(&mut self, other: &Self) {
        *self = self.merge(other);
    }

    /// Role with the highest win percent; ties keep the earlier role.
    pub fn best_position(&self) -> Option<Role> {
        self.rank_position(Ordering::Greater)
    }

    /// Role with the lowest win percent; ties keep the earlier role.
    pub fn worst_position(&self) -> Option<Role> {
        self.rank_position(Ordering::Less)
    }

    fn rank_position(&self, wanted: Ordering) -> Option<Role> {
        let mut best: Option<(Role, f64)> = None;
        for (role, stats) in self.roles() {
            let percent = stats.stats.win.percent;
            let replace = match best {
                Some((_, current)) => percent.partial_cmp(&current) == Some(wanted),
                None => true,
            };
            if replace {
                best = Some((role, percent));
            }
        }
        best.map(|(role, _)| role)
    }

    /// Role whose value for `field` is best; `None` when no role has data.
    pub fn best_role_for(&self, field: StatField) -> Option<Role> {
        let mut best: Option<(Role, StatValue<'_>)> = None;
        for (role, stats) in self.roles() {
            let candidate = stats.stats.value(field);
            if !candidate.has_data() {
                continue;
            }
            let replace = match &best {
                Some((_, current)) => candidate.is_better_than(current),
                None => true,
            };
            if replace {
                best = Some((role, candidate));
            }
        }
        best.map(|(role, _)| role)
    }
}
