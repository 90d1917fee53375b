use serde::{Deserialize, Serialize};

use crate::domain::{Player, Summary};

/// `GET /players`
#[derive(Debug, Deserialize)]
pub struct PlayersResponse {
    #[serde(default)]
    pub players: Vec<Player>,
}

/// `POST /add_player`
#[derive(Debug, Serialize)]
pub struct AddPlayerRequest<'a> {
    pub name: &'a str,
}

/// `POST /match`
#[derive(Debug, Serialize)]
pub struct MatchRequest<'a> {
    pub winner: &'a str,
    pub loser: &'a str,
}

/// `POST /token`
///
/// `access_token` may come back null; that counts as a failed login.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// `GET /summary` wraps the summary document in a JSON string
#[derive(Debug, Deserialize)]
pub struct SummaryEnvelope {
    pub response_json_str: String,
}

impl SummaryEnvelope {
    pub fn into_summary(self) -> Result<Summary, serde_json::Error> {
        serde_json::from_str(&self.response_json_str)
    }
}
