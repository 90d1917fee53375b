use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Bearer token issued by the Elo service
///
/// Opaque to the console: the expiry lives on the server and is never
/// introspected here.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Whether privileged controls may be shown for the current page load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthorizationState {
    #[default]
    Unauthorized,
    Authorized,
}

impl AuthorizationState {
    pub fn is_authorized(self) -> bool {
        self == AuthorizationState::Authorized
    }
}

/// Player as reported by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub elo: f64,
    #[serde(default, rename = "win")]
    pub wins: u32,
    #[serde(default, rename = "loss")]
    pub losses: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, elo: f64) -> Self {
        Self {
            name: name.into(),
            elo,
            wins: 0,
            losses: 0,
        }
    }

    pub fn with_record(mut self, wins: u32, losses: u32) -> Self {
        self.wins = wins;
        self.losses = losses;
        self
    }
}

/// A recorded match; never modified by the console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub winner: String,
    pub loser: String,
    pub date: String,
}

impl MatchRecord {
    /// The service writes naive ISO-8601 timestamps; offsets are accepted too.
    pub fn played_at(&self) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.date) {
            return Some(dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(&self.date, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}

/// Standings and history as published by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub last_hydrated: Option<String>,
    #[serde(default)]
    pub ordered_players: Vec<Player>,
    #[serde(default)]
    pub match_history: Vec<MatchRecord>,
}

/// Capitalizes each word of a player name and collapses whitespace
///
/// `"john   smith"` becomes `"John Smith"`.
pub fn normalize_player_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
