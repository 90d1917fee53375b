use anyhow::Result;
use log::{debug, info};
use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::api::models::{
    AddPlayerRequest, MatchRequest, PlayersResponse, SummaryEnvelope, TokenResponse,
};
use crate::api::service::EloService;
use crate::config::ServiceSettings;
use crate::domain::{Credential, Player, Summary};
use crate::errors::ServiceError;
use crate::http::ServiceHttpClient;

const PLAYERS: &str = "/players";
const ADD_PLAYER: &str = "/add_player";
const MATCH: &str = "/match";
const IS_AUTHORIZED: &str = "/is_authorized";
const TOKEN: &str = "/token";
const SUMMARY: &str = "/summary";

/// Elo service API client
pub struct EloApiClient {
    client: ServiceHttpClient,
}

impl EloApiClient {
    /// Create a new Elo service client
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        let client = ServiceHttpClient::new(settings)?;
        Ok(Self { client })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    // --- Helper Methods ---

    async fn decode_json<T: DeserializeOwned>(
        endpoint: &'static str,
        response: Response,
    ) -> Result<T, ServiceError> {
        let text = response
            .text()
            .await
            .map_err(|source| ServiceError::Transport { endpoint, source })?;

        serde_json::from_str(&text).map_err(|e| ServiceError::malformed(endpoint, e.to_string()))
    }
}

impl EloService for EloApiClient {
    async fn verify_credential(&self, credential: &Credential) -> Result<(), ServiceError> {
        self.client.get(IS_AUTHORIZED, Some(credential)).await?;
        Ok(())
    }

    async fn issue_token(&self, username: &str, password: &str) -> Result<TokenResponse, ServiceError> {
        let params = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ];

        let response = self.client.post_form(TOKEN, &params).await?;
        Self::decode_json(TOKEN, response).await
    }

    async fn list_players(&self) -> Result<Vec<Player>, ServiceError> {
        info!("Fetching players");

        let response = self.client.get(PLAYERS, None).await?;
        let data: PlayersResponse = Self::decode_json(PLAYERS, response).await?;

        debug!("Fetched {} players", data.players.len());
        Ok(data.players)
    }

    async fn add_player(&self, name: &str, credential: &Credential) -> Result<(), ServiceError> {
        let body = AddPlayerRequest { name };
        self.client.post_json(ADD_PLAYER, &body, Some(credential)).await?;
        Ok(())
    }

    async fn record_match(
        &self,
        winner: &str,
        loser: &str,
        credential: &Credential,
    ) -> Result<(), ServiceError> {
        let body = MatchRequest { winner, loser };
        self.client.post_json(MATCH, &body, Some(credential)).await?;
        Ok(())
    }

    async fn fetch_summary(&self) -> Result<Summary, ServiceError> {
        let response = self.client.get(SUMMARY, None).await?;
        let envelope: SummaryEnvelope = Self::decode_json(SUMMARY, response).await?;

        envelope
            .into_summary()
            .map_err(|e| ServiceError::malformed(SUMMARY, format!("summary document: {}", e)))
    }
}
