use log::{error, info};

use crate::api::EloService;
use crate::domain::Credential;
use crate::errors::FailureKind;
use crate::storage::CredentialStore;

/// Open/closed state of the login prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoginDialog {
    open: bool,
}

impl LoginDialog {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A fresh token was stored
    Issued,
    /// Nothing was stored; the kind is kept for logging only
    Failed(FailureKind),
}

/// Exchanges a username/password for a stored bearer credential
///
/// The only writer of the credential store.
pub struct CredentialIssuer<'a, S, C> {
    service: &'a S,
    store: &'a C,
}

impl<'a, S, C> CredentialIssuer<'a, S, C>
where
    S: EloService,
    C: CredentialStore,
{
    pub fn new(service: &'a S, store: &'a C) -> Self {
        Self { service, store }
    }

    /// Requests a token and stores it, closing `dialog` on success
    pub async fn login(
        &self,
        dialog: &mut LoginDialog,
        username: &str,
        password: &str,
    ) -> LoginOutcome {
        let response = match self.service.issue_token(username, password).await {
            Ok(response) => response,
            Err(e) => {
                error!("Login failed: {}", e);
                return LoginOutcome::Failed(e.kind());
            }
        };

        let Some(token) = response.access_token else {
            error!("Login failed: token endpoint returned no access token");
            return LoginOutcome::Failed(FailureKind::Malformed);
        };

        if let Err(e) = self.store.set(&Credential::new(token)) {
            error!("Login failed: credential storage error: {:?}", e);
            return LoginOutcome::Failed(FailureKind::Storage);
        }

        info!("Logged in as {}", username);
        dialog.close();
        LoginOutcome::Issued
    }
}
