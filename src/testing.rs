//! In-memory stand-in for the Elo service used by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::api::models::TokenResponse;
use crate::api::EloService;
use crate::domain::{Credential, MatchRecord, Player, Summary};
use crate::errors::ServiceError;

const ELO_STEP: f64 = 16.0;

pub(crate) struct FakeEloService {
    calls: Mutex<Vec<&'static str>>,
    valid_tokens: Vec<String>,
    login: Option<(String, String)>,
    issued_token: Option<String>,
    unreachable: bool,
    players: Mutex<Vec<Player>>,
    history: Mutex<Vec<MatchRecord>>,
    list_delays: Mutex<VecDeque<Duration>>,
}

impl FakeEloService {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            valid_tokens: Vec::new(),
            login: None,
            issued_token: None,
            unreachable: false,
            players: Mutex::new(Vec::new()),
            history: Mutex::new(Vec::new()),
            list_delays: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_players(self, players: &[(&str, f64)]) -> Self {
        *self.players.lock().unwrap() = players
            .iter()
            .map(|(name, elo)| Player::new(*name, *elo))
            .collect();
        self
    }

    pub fn with_valid_token(mut self, token: &str) -> Self {
        self.valid_tokens.push(token.to_string());
        self
    }

    /// Accept `username`/`password` and answer with `token` (`None` sends null)
    pub fn with_login(mut self, username: &str, password: &str, token: Option<&str>) -> Self {
        self.login = Some((username.to_string(), password.to_string()));
        self.issued_token = token.map(str::to_string);
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Delays applied to successive `list_players` calls
    pub fn with_list_delays(self, delays: &[Duration]) -> Self {
        self.list_delays.lock().unwrap().extend(delays.iter().copied());
        self
    }

    /// Change the roster behind the console's back
    pub fn insert_player(&self, name: &str) {
        self.players.lock().unwrap().push(Player::new(name, 1200.0));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.calls().iter().filter(|c| **c == endpoint).count()
    }

    fn enter(&self, endpoint: &'static str) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(endpoint);
        if self.unreachable {
            return Err(ServiceError::status(endpoint, 503, "service unavailable"));
        }
        Ok(())
    }

    fn check_token(&self, endpoint: &'static str, credential: &Credential) -> Result<(), ServiceError> {
        if self.valid_tokens.iter().any(|t| t == credential.as_str()) {
            Ok(())
        } else {
            Err(ServiceError::status(endpoint, 401, "Could not validate credentials"))
        }
    }
}

impl EloService for FakeEloService {
    async fn verify_credential(&self, credential: &Credential) -> Result<(), ServiceError> {
        self.enter("/is_authorized")?;
        self.check_token("/is_authorized", credential)
    }

    async fn issue_token(&self, username: &str, password: &str) -> Result<TokenResponse, ServiceError> {
        self.enter("/token")?;
        match &self.login {
            Some((u, p)) if u == username && p == password => Ok(TokenResponse {
                access_token: self.issued_token.clone(),
                token_type: Some("bearer".to_string()),
            }),
            _ => Err(ServiceError::status("/token", 401, "Incorrect username or password")),
        }
    }

    async fn list_players(&self) -> Result<Vec<Player>, ServiceError> {
        self.enter("/players")?;
        let players = self.players.lock().unwrap().clone();
        let delay = self.list_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(players)
    }

    async fn add_player(&self, name: &str, credential: &Credential) -> Result<(), ServiceError> {
        self.enter("/add_player")?;
        self.check_token("/add_player", credential)?;

        let mut players = self.players.lock().unwrap();
        if players.iter().any(|p| p.name == name) {
            return Err(ServiceError::status("/add_player", 500, "Player already exists"));
        }
        players.push(Player::new(name, 1200.0));
        Ok(())
    }

    async fn record_match(
        &self,
        winner: &str,
        loser: &str,
        credential: &Credential,
    ) -> Result<(), ServiceError> {
        self.enter("/match")?;
        self.check_token("/match", credential)?;

        let mut players = self.players.lock().unwrap();
        if !players.iter().any(|p| p.name == winner) || !players.iter().any(|p| p.name == loser) {
            return Err(ServiceError::status("/match", 500, "No row was found"));
        }
        for player in players.iter_mut() {
            if player.name == winner {
                player.wins += 1;
                player.elo += ELO_STEP;
            } else if player.name == loser {
                player.losses += 1;
                player.elo -= ELO_STEP;
            }
        }

        let mut history = self.history.lock().unwrap();
        let record = MatchRecord {
            winner: winner.to_string(),
            loser: loser.to_string(),
            date: format!("2024-05-01T12:00:{:02}", history.len()),
        };
        history.insert(0, record);
        Ok(())
    }

    async fn fetch_summary(&self) -> Result<Summary, ServiceError> {
        self.enter("/summary")?;

        let mut ordered_players = self.players.lock().unwrap().clone();
        ordered_players.sort_by(|a, b| b.elo.total_cmp(&a.elo));

        Ok(Summary {
            last_hydrated: Some("2024-05-01T12:00:00".to_string()),
            ordered_players,
            match_history: self.history.lock().unwrap().clone(),
        })
    }
}
