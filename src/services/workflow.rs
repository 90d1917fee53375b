use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, error, info, warn};
use tokio::sync::watch;

use crate::api::EloService;
use crate::domain::{Credential, MatchSelection, RosterSnapshot, Summary};
use crate::errors::{FailureKind, SelectionError, ServiceError};
use crate::storage::CredentialStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The service accepted the mutation
    Applied,
    /// Sent (or refused for lack of a credential) and failed
    Failed(FailureKind),
    /// Never sent
    Invalid(SelectionError),
    /// The control is not rendered for the current authorization state
    ControlHidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A later fetch was issued before this one returned
    Stale,
    Failed(FailureKind),
}

/// Monotonic request tickets; only the newest ticket may apply its response
#[derive(Default)]
struct RequestSequence {
    issued: AtomicU64,
}

impl RequestSequence {
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }
}

/// Performs the privileged roster mutations and keeps the local view in
/// step with the service
///
/// Local state is never patched speculatively: after every mutation the
/// roster and summary are fetched again and replaced wholesale.
pub struct RosterMutationWorkflow<S, C> {
    service: Arc<S>,
    store: Arc<C>,
    roster: RwLock<RosterSnapshot>,
    summary: RwLock<Summary>,
    roster_requests: RequestSequence,
    summary_requests: RequestSequence,
    closed: watch::Sender<bool>,
}

impl<S, C> RosterMutationWorkflow<S, C>
where
    S: EloService,
    C: CredentialStore,
{
    pub fn new(service: Arc<S>, store: Arc<C>) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            service,
            store,
            roster: RwLock::new(RosterSnapshot::default()),
            summary: RwLock::new(Summary::default()),
            roster_requests: RequestSequence::default(),
            summary_requests: RequestSequence::default(),
            closed,
        }
    }

    pub fn roster(&self) -> RosterSnapshot {
        self.roster.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn summary(&self) -> Summary {
        self.summary.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replaces the roster snapshot with the service's current player list
    pub async fn fetch_roster(&self) -> FetchOutcome {
        let ticket = self.roster_requests.issue();

        match self.until_closed(self.service.list_players()).await {
            Ok(players) => {
                let mut roster = self.roster.write().unwrap_or_else(PoisonError::into_inner);
                if !self.roster_requests.is_latest(ticket) {
                    debug!("Discarding stale roster response {}", ticket);
                    return FetchOutcome::Stale;
                }
                *roster = RosterSnapshot::from_players(players);
                info!("Roster refreshed: {} players", roster.len());
                FetchOutcome::Applied
            }
            Err(e) => {
                error!("Error fetching players: {}", e);
                FetchOutcome::Failed(e.kind())
            }
        }
    }

    /// Replaces the standings and match history
    pub async fn fetch_summary(&self) -> FetchOutcome {
        let ticket = self.summary_requests.issue();

        match self.until_closed(self.service.fetch_summary()).await {
            Ok(fresh) => {
                let mut summary = self.summary.write().unwrap_or_else(PoisonError::into_inner);
                if !self.summary_requests.is_latest(ticket) {
                    debug!("Discarding stale summary response {}", ticket);
                    return FetchOutcome::Stale;
                }
                *summary = fresh;
                FetchOutcome::Applied
            }
            Err(e) => {
                error!("Error fetching summary: {}", e);
                FetchOutcome::Failed(e.kind())
            }
        }
    }

    /// Re-derives roster and summary from the service
    pub async fn reconcile(&self) {
        let (roster, summary) = tokio::join!(self.fetch_roster(), self.fetch_summary());
        debug!("Reconciled: roster {:?}, summary {:?}", roster, summary);
    }

    pub async fn add_player(&self, name: &str) -> MutationOutcome {
        let name = name.trim();
        let outcome = if name.is_empty() {
            MutationOutcome::Invalid(SelectionError::EmptyName)
        } else {
            self.submit("adding new player", |credential| async move {
                self.service.add_player(name, &credential).await
            })
            .await
        };

        self.reconcile().await;
        outcome
    }

    /// Submits a match whose picks must be valid for the current roster
    pub async fn record_match(&self, selection: &MatchSelection) -> MutationOutcome {
        let roster = self.roster();
        let outcome = match selection.validate(&roster) {
            Ok((winner, loser)) => {
                self.submit("recording match", |credential| async move {
                    self.service.record_match(winner, loser, &credential).await
                })
                .await
            }
            Err(e) => {
                warn!("Refusing match selection: {}", e);
                MutationOutcome::Invalid(e)
            }
        };

        self.reconcile().await;
        outcome
    }

    /// Cancels every in-flight request of this workflow
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    // --- Helper Methods ---

    /// Attaches the stored credential and runs `request`; without a
    /// credential nothing is sent
    async fn submit<F, Fut>(&self, action: &str, request: F) -> MutationOutcome
    where
        F: FnOnce(Credential) -> Fut,
        Fut: Future<Output = Result<(), ServiceError>>,
    {
        let credential = match self.store.get() {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                error!("Error {}: {}", action, ServiceError::MissingToken);
                return MutationOutcome::Failed(FailureKind::Authorization);
            }
            Err(e) => {
                error!("Error {}: could not read credential: {:?}", action, e);
                return MutationOutcome::Failed(FailureKind::Storage);
            }
        };

        match self.until_closed(request(credential)).await {
            Ok(()) => {
                info!("Succeeded {}", action);
                MutationOutcome::Applied
            }
            Err(e) => {
                error!("Error {}: {}", action, e);
                MutationOutcome::Failed(e.kind())
            }
        }
    }

    async fn until_closed<T>(
        &self,
        request: impl Future<Output = Result<T, ServiceError>>,
    ) -> Result<T, ServiceError> {
        let mut closed = self.closed.subscribe();
        let closing = async move {
            let _ = closed.wait_for(|closed| *closed).await;
        };

        tokio::select! {
            biased;
            _ = closing => Err(ServiceError::Cancelled),
            result = request => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCredentialStore;
    use crate::testing::FakeEloService;
    use std::time::Duration;

    fn workflow(
        service: FakeEloService,
        token: Option<&str>,
    ) -> (Arc<FakeEloService>, RosterMutationWorkflow<FakeEloService, MemoryCredentialStore>) {
        let service = Arc::new(service);
        let store = match token {
            Some(token) => MemoryCredentialStore::with_credential(Credential::new(token)),
            None => MemoryCredentialStore::new(),
        };
        let workflow = RosterMutationWorkflow::new(service.clone(), Arc::new(store));
        (service, workflow)
    }

    fn two_players() -> FakeEloService {
        FakeEloService::new()
            .with_players(&[("A", 1200.0), ("B", 1180.0)])
            .with_valid_token("tok")
    }

    #[tokio::test]
    async fn test_fetch_roster_replaces_snapshot() {
        let (service, workflow) = workflow(two_players(), Some("tok"));

        assert_eq!(workflow.fetch_roster().await, FetchOutcome::Applied);
        assert_eq!(workflow.roster().len(), 2);

        service.insert_player("C");
        workflow.fetch_roster().await;
        let names: Vec<String> = workflow.roster().names().map(str::to_string).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_added_player_appears_once_after_refetch() {
        let (service, workflow) = workflow(two_players(), Some("tok"));
        workflow.fetch_roster().await;

        let outcome = workflow.add_player("X").await;
        workflow.fetch_roster().await;

        assert_eq!(outcome, MutationOutcome::Applied);
        let roster = workflow.roster();
        assert_eq!(roster.names().filter(|n| *n == "X").count(), 1);
        assert_eq!(service.count("/add_player"), 1);
    }

    #[tokio::test]
    async fn test_add_player_reconciles_after_settling() {
        let (service, workflow) = workflow(two_players(), Some("tok"));

        workflow.add_player("X").await;

        assert_eq!(service.calls()[0], "/add_player");
        assert!(workflow.roster().contains("X"));
        assert!(workflow.summary().ordered_players.iter().any(|p| p.name == "X"));
    }

    #[tokio::test]
    async fn test_duplicate_player_is_rejected_and_still_reconciles() {
        let (service, workflow) = workflow(two_players(), Some("tok"));

        let outcome = workflow.add_player("A").await;

        assert_eq!(outcome, MutationOutcome::Failed(FailureKind::Rejected));
        assert_eq!(service.count("/players"), 1);
        assert_eq!(service.count("/summary"), 1);
        assert_eq!(workflow.roster().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_name_is_never_sent() {
        let (service, workflow) = workflow(two_players(), Some("tok"));

        let outcome = workflow.add_player("   ").await;

        assert_eq!(outcome, MutationOutcome::Invalid(SelectionError::EmptyName));
        assert_eq!(service.count("/add_player"), 0);
    }

    #[tokio::test]
    async fn test_mutation_without_credential_is_not_sent() {
        let (service, workflow) = workflow(two_players(), None);

        let outcome = workflow.add_player("X").await;

        assert_eq!(outcome, MutationOutcome::Failed(FailureKind::Authorization));
        assert_eq!(service.count("/add_player"), 0);
    }

    #[tokio::test]
    async fn test_rejected_credential_on_mutation() {
        let (_, workflow) = workflow(two_players(), Some("expired"));

        let outcome = workflow.add_player("X").await;

        assert_eq!(outcome, MutationOutcome::Failed(FailureKind::Authorization));
        assert!(!workflow.roster().contains("X"));
    }

    #[tokio::test]
    async fn test_record_match_updates_counts_from_server() {
        let (_, workflow) = workflow(two_players(), Some("tok"));
        workflow.reconcile().await;

        let roster = workflow.roster();
        let mut selection = MatchSelection::new();
        selection.select_winner("A", &roster).unwrap();
        selection.select_loser("B", &roster).unwrap();

        let outcome = workflow.record_match(&selection).await;

        assert_eq!(outcome, MutationOutcome::Applied);
        let summary = workflow.summary();
        let a = summary.ordered_players.iter().find(|p| p.name == "A").unwrap();
        let b = summary.ordered_players.iter().find(|p| p.name == "B").unwrap();
        assert_eq!((a.wins, a.losses), (1, 0));
        assert_eq!((b.wins, b.losses), (0, 1));
        assert_eq!(summary.match_history[0].winner, "A");
    }

    #[tokio::test]
    async fn test_stale_selection_is_refused() {
        let (service, workflow) = workflow(two_players(), Some("tok"));
        workflow.fetch_roster().await;

        let mut selection = MatchSelection::new();
        let stale = RosterSnapshot::from_players(vec![
            crate::domain::Player::new("A", 1200.0),
            crate::domain::Player::new("Ghost", 1000.0),
        ]);
        selection.select_winner("A", &stale).unwrap();
        selection.select_loser("Ghost", &stale).unwrap();

        let outcome = workflow.record_match(&selection).await;

        assert_eq!(
            outcome,
            MutationOutcome::Invalid(SelectionError::UnknownPlayer("Ghost".into()))
        );
        assert_eq!(service.count("/match"), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_last_snapshot() {
        let (_, workflow) = workflow(two_players().unreachable(), Some("tok"));

        let outcome = workflow.fetch_roster().await;

        assert_eq!(outcome, FetchOutcome::Failed(FailureKind::Network));
        assert!(workflow.roster().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_fetch_does_not_clobber_newer_one() {
        let service = two_players().with_list_delays(&[Duration::from_secs(5), Duration::ZERO]);
        let (service, workflow) = workflow(service, Some("tok"));

        let slow = workflow.fetch_roster();
        let fast = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            service.insert_player("C");
            workflow.fetch_roster().await
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(fast, FetchOutcome::Applied);
        assert_eq!(slow, FetchOutcome::Stale);
        assert!(workflow.roster().contains("C"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_in_flight_fetch() {
        let service = two_players().with_list_delays(&[Duration::from_secs(60)]);
        let (_, workflow) = workflow(service, Some("tok"));

        let fetch = workflow.fetch_roster();
        let closer = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            workflow.close();
        };
        let (outcome, ()) = tokio::join!(fetch, closer);

        assert_eq!(outcome, FetchOutcome::Failed(FailureKind::Cancelled));
        assert!(workflow.is_closed());
        assert!(workflow.roster().is_empty());
    }
}
