use std::future::Future;

use crate::api::models::TokenResponse;
use crate::domain::{Credential, Player, Summary};
use crate::errors::ServiceError;

/// Remote Elo service as seen by the console
///
/// The ranking computation and persistence live behind this seam; the
/// console only reads snapshots and submits mutations.
pub trait EloService: Send + Sync {
    /// `GET /is_authorized`; `Ok` iff the service accepts the credential
    fn verify_credential(
        &self,
        credential: &Credential,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;

    /// `POST /token` with a password grant
    fn issue_token(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<TokenResponse, ServiceError>> + Send;

    /// `GET /players`
    fn list_players(&self) -> impl Future<Output = Result<Vec<Player>, ServiceError>> + Send;

    /// `POST /add_player`
    fn add_player(
        &self,
        name: &str,
        credential: &Credential,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;

    /// `POST /match`
    fn record_match(
        &self,
        winner: &str,
        loser: &str,
        credential: &Credential,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;

    /// `GET /summary`
    fn fetch_summary(&self) -> impl Future<Output = Result<Summary, ServiceError>> + Send;
}
