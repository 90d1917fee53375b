use log::{error, info, warn};

use crate::api::EloService;
use crate::domain::AuthorizationState;
use crate::errors::FailureKind;
use crate::storage::CredentialStore;

/// Console controls that depend on the authorization decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Login,
    AddPlayer,
    RecordMatch,
}

impl Control {
    pub fn is_privileged(self) -> bool {
        matches!(self, Control::AddPlayer | Control::RecordMatch)
    }

    pub fn label(self) -> &'static str {
        match self {
            Control::Login => "Login",
            Control::AddPlayer => "Add Player",
            Control::RecordMatch => "Record Match",
        }
    }
}

/// Decides once per page load whether privileged controls are shown
///
/// Only reads the credential store; it never writes or clears it.
pub struct SessionGate<'a, S, C> {
    service: &'a S,
    store: &'a C,
}

impl<'a, S, C> SessionGate<'a, S, C>
where
    S: EloService,
    C: CredentialStore,
{
    pub fn new(service: &'a S, store: &'a C) -> Self {
        Self { service, store }
    }

    /// Resolves the authorization state; failures resolve to `Unauthorized`
    pub async fn check_authorization(&self) -> AuthorizationState {
        let credential = match self.store.get() {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                info!("No token. Skipping authorization check.");
                return AuthorizationState::Unauthorized;
            }
            Err(e) => {
                error!("Failed to read stored credential: {:?}", e);
                return AuthorizationState::Unauthorized;
            }
        };

        match self.service.verify_credential(&credential).await {
            Ok(()) => {
                info!("Successful token auth.");
                AuthorizationState::Authorized
            }
            Err(e) if e.kind() == FailureKind::Authorization => {
                warn!("Stored token was rejected: {}", e);
                AuthorizationState::Unauthorized
            }
            Err(e) => {
                error!("Authorization check failed: {}", e);
                AuthorizationState::Unauthorized
            }
        }
    }
}

/// Controls to render for `state`; privileged ones only when authorized
pub fn visible_controls(state: AuthorizationState) -> Vec<Control> {
    [Control::Login, Control::AddPlayer, Control::RecordMatch]
        .into_iter()
        .filter(|control| !control.is_privileged() || state.is_authorized())
        .collect()
}
