use std::collections::HashSet;

use log::warn;

use super::models::Player;
use crate::errors::SelectionError;

/// Last-fetched copy of the player list
///
/// Only used to populate selections. It is replaced wholesale on every fetch
/// and is never patched locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterSnapshot {
    players: Vec<Player>,
}

impl RosterSnapshot {
    /// Builds a snapshot, keeping the first occurrence of each name
    pub fn from_players(players: Vec<Player>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(players.len());

        for player in players {
            if seen.insert(player.name.clone()) {
                unique.push(player);
            } else {
                warn!("Dropping duplicate roster entry for {}", player.name);
            }
        }

        Self { players: unique }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(|p| p.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players eligible for one side of a match, given the other side's pick
    pub fn candidates_excluding<'a>(&'a self, excluded: Option<&'a str>) -> Vec<&'a Player> {
        self.players
            .iter()
            .filter(|p| Some(p.name.as_str()) != excluded)
            .collect()
    }
}

/// Winner/loser picks for a match that has not been submitted yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSelection {
    winner: Option<String>,
    loser: Option<String>,
}

impl MatchSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn loser(&self) -> Option<&str> {
        self.loser.as_deref()
    }

    /// Options for the winner picker: the roster without the chosen loser
    pub fn winner_candidates<'a>(&'a self, roster: &'a RosterSnapshot) -> Vec<&'a Player> {
        roster.candidates_excluding(self.loser())
    }

    /// Options for the loser picker: the roster without the chosen winner
    pub fn loser_candidates<'a>(&'a self, roster: &'a RosterSnapshot) -> Vec<&'a Player> {
        roster.candidates_excluding(self.winner())
    }

    pub fn select_winner(
        &mut self,
        name: &str,
        roster: &RosterSnapshot,
    ) -> Result<(), SelectionError> {
        Self::check_pick(name, self.loser(), roster)?;
        self.winner = Some(name.to_string());
        Ok(())
    }

    pub fn select_loser(
        &mut self,
        name: &str,
        roster: &RosterSnapshot,
    ) -> Result<(), SelectionError> {
        Self::check_pick(name, self.winner(), roster)?;
        self.loser = Some(name.to_string());
        Ok(())
    }

    /// Drops picks that no longer appear in a freshly fetched roster
    pub fn retain_known(&mut self, roster: &RosterSnapshot) {
        if self.winner().is_some_and(|name| !roster.contains(name)) {
            self.winner = None;
        }
        if self.loser().is_some_and(|name| !roster.contains(name)) {
            self.loser = None;
        }
    }

    /// Returns `(winner, loser)` if both picks are valid for `roster`
    pub fn validate<'a>(&'a self, roster: &RosterSnapshot) -> Result<(&'a str, &'a str), SelectionError> {
        let (Some(winner), Some(loser)) = (self.winner(), self.loser()) else {
            return Err(SelectionError::Incomplete);
        };
        if winner == loser {
            return Err(SelectionError::SamePlayer(winner.to_string()));
        }
        for name in [winner, loser] {
            if !roster.contains(name) {
                return Err(SelectionError::UnknownPlayer(name.to_string()));
            }
        }
        Ok((winner, loser))
    }

    fn check_pick(
        name: &str,
        opposite: Option<&str>,
        roster: &RosterSnapshot,
    ) -> Result<(), SelectionError> {
        if !roster.contains(name) {
            return Err(SelectionError::UnknownPlayer(name.to_string()));
        }
        if opposite == Some(name) {
            return Err(SelectionError::SamePlayer(name.to_string()));
        }
        Ok(())
    }
}
