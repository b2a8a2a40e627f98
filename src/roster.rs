//! Tracked roster and canonical player names.
//!
//! Every index is keyed on canonical names. A player's puuid resolves to the
//! Riot ID it was registered under, and the alias table then folds alternate
//! accounts onto one canonical name.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{Match, MatchParticipant};

/// Roster loading errors.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to read roster file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse roster: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid Riot ID (expected gameName#tagLine): {0}")]
    InvalidRiotId(String),

    #[error("Duplicate puuid in roster: {0}")]
    DuplicatePuuid(String),
}

/// A tracked account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPlayer {
    /// Riot ID, `gameName#tagLine`.
    pub name: String,
    pub puuid: String,
}

/// Serialized form of the roster file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterFile {
    pub players: Vec<TrackedPlayer>,
    /// Alternate name to canonical name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// Validate a `gameName#tagLine` Riot ID.
pub fn validate_riot_id(name: &str) -> Result<(), RosterError> {
    match name.split_once('#') {
        Some((game_name, tag_line))
            if !game_name.trim().is_empty()
                && !tag_line.is_empty()
                && !tag_line.contains('#')
                && tag_line.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            Ok(())
        }
        _ => Err(RosterError::InvalidRiotId(name.to_string())),
    }
}

/// The set of tracked players with puuid lookup and alias resolution.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<TrackedPlayer>,
    by_puuid: HashMap<String, usize>,
    aliases: BTreeMap<String, String>,
}

impl Roster {
    /// Build a roster, validating names and rejecting duplicate puuids.
    pub fn new(
        players: Vec<TrackedPlayer>,
        aliases: BTreeMap<String, String>,
    ) -> Result<Self, RosterError> {
        let mut by_puuid = HashMap::new();
        for (i, player) in players.iter().enumerate() {
            validate_riot_id(&player.name)?;
            if by_puuid.insert(player.puuid.clone(), i).is_some() {
                return Err(RosterError::DuplicatePuuid(player.puuid.clone()));
            }
        }
        for canonical in aliases.values() {
            validate_riot_id(canonical)?;
        }
        Ok(Self {
            players,
            by_puuid,
            aliases,
        })
    }

    /// Load a roster from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, RosterError> {
        let contents = std::fs::read_to_string(path)?;
        let file: RosterFile = serde_json::from_str(&contents)?;
        let roster = Self::new(file.players, file.aliases)?;
        debug!("Loaded roster of {} players from {:?}", roster.len(), path);
        Ok(roster)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_tracked(&self, puuid: &str) -> bool {
        self.by_puuid.contains_key(puuid)
    }

    /// Resolve a display name through the alias table.
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Canonical name of a tracked puuid.
    pub fn canonical_name(&self, puuid: &str) -> Option<&str> {
        let index = *self.by_puuid.get(puuid)?;
        Some(self.resolve_alias(&self.players[index].name))
    }

    /// Distinct canonical names across the roster, sorted.
    pub fn canonical_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut names: Vec<&str> = self
            .players
            .iter()
            .map(|p| self.resolve_alias(&p.name))
            .filter(|n| seen.insert(*n))
            .collect();
        names.sort_unstable();
        names
    }

    /// Tracked participants of a match, in participant order, with their canonical names.
    pub fn tracked_in<'m>(&self, m: &'m Match) -> Vec<(&str, &'m MatchParticipant)> {
        m.info
            .participants
            .iter()
            .filter_map(|p| self.canonical_name(&p.puuid).map(|name| (name, p)))
            .collect()
    }

    /// Whether every tracked participant of a match played on the same team.
    pub fn tracked_on_one_team(&self, m: &Match) -> bool {
        let mut teams = self.tracked_in(m).into_iter().map(|(_, p)| p.team_id);
        match teams.next() {
            Some(first) => teams.all(|team| team == first),
            None => false,
        }
    }

    /// Number of tracked puuids listed in a match's metadata.
    pub fn tracked_count(&self, m: &Match) -> usize {
        m.metadata
            .participants
            .iter()
            .filter(|puuid| self.is_tracked(puuid))
            .count()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Roster where puuid `p1` is `P1#NA1` and so on.
    pub fn roster(puuids: &[&str]) -> Roster {
        let players = puuids
            .iter()
            .map(|puuid| TrackedPlayer {
                name: format!("{}#NA1", puuid.to_uppercase()),
                puuid: puuid.to_string(),
            })
            .collect();
        Roster::new(players, BTreeMap::new()).unwrap()
    }
}
