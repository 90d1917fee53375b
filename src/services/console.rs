use std::sync::Arc;

use log::{info, warn};

use crate::api::EloService;
use crate::domain::{AuthorizationState, MatchSelection, Player, RosterSnapshot, Summary};
use crate::services::workflow::{MutationOutcome, RosterMutationWorkflow};
use crate::session::{
    visible_controls, Control, CredentialIssuer, LoginDialog, LoginOutcome, SessionGate,
};
use crate::storage::CredentialStore;

/// One loaded view of the console: authorization, roster, summary and the
/// dialogs acting on them
pub struct ConsolePage<S, C> {
    service: Arc<S>,
    store: Arc<C>,
    authorization: AuthorizationState,
    workflow: RosterMutationWorkflow<S, C>,
    login_dialog: LoginDialog,
    selection: MatchSelection,
}

impl<S, C> ConsolePage<S, C>
where
    S: EloService,
    C: CredentialStore,
{
    /// Page load: verify the stored credential and fetch roster and summary
    pub async fn load(service: Arc<S>, store: Arc<C>) -> Self {
        let workflow = RosterMutationWorkflow::new(service.clone(), store.clone());
        let mut page = Self {
            service,
            store,
            authorization: AuthorizationState::Unauthorized,
            workflow,
            login_dialog: LoginDialog::default(),
            selection: MatchSelection::new(),
        };
        page.reload().await;
        page
    }

    /// Re-derives everything from the service and the credential store
    pub async fn reload(&mut self) {
        let gate = SessionGate::new(&*self.service, &*self.store);
        let (authorization, ()) = tokio::join!(gate.check_authorization(), self.workflow.reconcile());

        self.authorization = authorization;
        self.selection.retain_known(&self.workflow.roster());
        info!(
            "Page loaded: {:?}, {} players",
            self.authorization,
            self.workflow.roster().len()
        );
    }

    pub fn authorization(&self) -> AuthorizationState {
        self.authorization
    }

    pub fn visible_controls(&self) -> Vec<Control> {
        visible_controls(self.authorization)
    }

    pub fn roster(&self) -> RosterSnapshot {
        self.workflow.roster()
    }

    pub fn summary(&self) -> Summary {
        self.workflow.summary()
    }

    pub fn login_dialog(&self) -> LoginDialog {
        self.login_dialog
    }

    /// Opens the login dialog and submits the credentials
    ///
    /// The page's authorization is left as loaded; it changes on the next
    /// load or reload.
    pub async fn login(&mut self, username: &str, password: &str) -> LoginOutcome {
        self.login_dialog.open();
        CredentialIssuer::new(&*self.service, &*self.store)
            .login(&mut self.login_dialog, username, password)
            .await
    }

    pub fn winner_candidates(&self) -> Vec<Player> {
        let roster = self.workflow.roster();
        self.selection
            .winner_candidates(&roster)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn loser_candidates(&self) -> Vec<Player> {
        let roster = self.workflow.roster();
        self.selection
            .loser_candidates(&roster)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn select_winner(&mut self, name: &str) -> Result<(), crate::errors::SelectionError> {
        let roster = self.workflow.roster();
        self.selection.select_winner(name, &roster)
    }

    pub fn select_loser(&mut self, name: &str) -> Result<(), crate::errors::SelectionError> {
        let roster = self.workflow.roster();
        self.selection.select_loser(name, &roster)
    }

    pub async fn add_player(&mut self, name: &str) -> MutationOutcome {
        if !self.is_visible(Control::AddPlayer) {
            return MutationOutcome::ControlHidden;
        }

        let outcome = self.workflow.add_player(name).await;
        self.after_mutation().await;
        outcome
    }

    /// Picks `winner` and `loser` from the current roster and records the match
    pub async fn record_match(&mut self, winner: &str, loser: &str) -> MutationOutcome {
        if !self.is_visible(Control::RecordMatch) {
            return MutationOutcome::ControlHidden;
        }

        self.selection = MatchSelection::new();
        if let Err(e) = self.select_winner(winner).and_then(|()| self.select_loser(loser)) {
            warn!("Invalid match selection: {}", e);
            return MutationOutcome::Invalid(e);
        }

        let outcome = self.workflow.record_match(&self.selection).await;
        self.selection = MatchSelection::new();
        self.after_mutation().await;
        outcome
    }

    /// Cancels outstanding requests; the page is unusable afterwards
    pub fn close(&self) {
        self.workflow.close();
    }

    // --- Helper Methods ---

    fn is_visible(&self, control: Control) -> bool {
        let visible = self.visible_controls().contains(&control);
        if !visible {
            warn!("{} is not available without authorization", control.label());
        }
        visible
    }

    /// The workflow has already re-fetched roster and summary
    async fn after_mutation(&mut self) {
        let gate = SessionGate::new(&*self.service, &*self.store);
        self.authorization = gate.check_authorization().await;
        self.selection.retain_known(&self.workflow.roster());
    }
}
