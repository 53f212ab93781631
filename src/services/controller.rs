use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::services::{
    candidates::filter_candidates,
    providers::{ProviderReply, SearchError, SearchProvider, SearchResult},
    selection::{SelectionError, SelectionSnapshot, SelectionState, SelectionWatcher},
    servers::{ServerRegistry, ServerTemplate},
};

/// How a search ended, as far as the selection is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Eligible candidates were found; the first one is active
    Candidates(usize),
    /// The provider reported no matches
    ProviderEmpty,
    /// The provider returned records but none survived filtering
    NoEligibleCandidates,
    /// Blank query; nothing was sent
    EmptyQuery,
    /// A newer query was issued before this reply arrived; the reply was dropped
    Stale,
}

/// Identifies one issued query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub sequence: u64,
    pub query: String,
}

/// Binds search, candidate clicks and server switches to one selection.
///
/// Selecting a candidate always reverts to the primary server; switching
/// servers never touches the candidate. Replies to superseded queries are
/// discarded on arrival.
pub struct PlaybackController {
    provider: Arc<dyn SearchProvider>,
    state: Mutex<SelectionState>,
    latest: AtomicU64,
}

impl PlaybackController {
    pub fn new(provider: Arc<dyn SearchProvider>, registry: Arc<ServerRegistry>) -> Self {
        Self {
            provider,
            state: Mutex::new(SelectionState::new(registry)),
            latest: AtomicU64::new(0),
        }
    }

    pub async fn subscribe(&self) -> SelectionWatcher {
        self.state.lock().await.subscribe()
    }

    pub async fn snapshot(&self) -> SelectionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Runs one query end to end. The provider is called at most once.
    pub async fn search(&self, query: &str) -> SearchResult<SearchOutcome> {
        let ticket = self.begin_search(query).await;
        if ticket.query.is_empty() {
            return Ok(SearchOutcome::EmptyQuery);
        }

        let reply = self.provider.search(&ticket.query).await;
        self.complete_search(&ticket, reply).await
    }

    /// Issues a new ticket and discards the previous results
    pub async fn begin_search(&self, query: &str) -> SearchTicket {
        let query = query.trim().to_string();

        // The ticket is taken under the lock so tickets follow the order in
        // which searches touch the state
        let mut state = self.state.lock().await;
        let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        state.clear();
        if query.is_empty() {
            state.set_idle();
        } else {
            state.set_loading();
        }

        tracing::debug!(sequence, query = %query, "Search issued");

        SearchTicket { sequence, query }
    }

    /// Applies a provider reply if `ticket` is still the latest query
    pub async fn complete_search(
        &self,
        ticket: &SearchTicket,
        reply: SearchResult<ProviderReply>,
    ) -> SearchResult<SearchOutcome> {
        let mut state = self.state.lock().await;

        // Checked under the lock so a newer begin_search cannot interleave
        let latest = self.latest.load(Ordering::SeqCst);
        if latest != ticket.sequence {
            tracing::debug!(
                sequence = ticket.sequence,
                latest,
                query = %ticket.query,
                "Discarding stale search reply"
            );
            return Ok(SearchOutcome::Stale);
        }

        let results = match reply {
            Ok(ProviderReply::NotFound) => {
                state.replace_results(Vec::new());
                return Ok(SearchOutcome::ProviderEmpty);
            }
            Ok(ProviderReply::Matches(results)) => results,
            Err(e) => {
                tracing::warn!(error = %e, query = %ticket.query, "Search failed");
                state.clear();
                state.set_error(user_message(&e).to_string());
                return Err(e);
            }
        };

        let received = results.len();
        let candidates = filter_candidates(results);
        let eligible = candidates.len();
        state.replace_results(candidates);

        tracing::info!(
            query = %ticket.query,
            received,
            eligible,
            "Search applied"
        );

        Ok(match (received, eligible) {
            (0, _) => SearchOutcome::ProviderEmpty,
            (_, 0) => SearchOutcome::NoEligibleCandidates,
            (_, n) => SearchOutcome::Candidates(n),
        })
    }

    /// Candidate click: activates it and reverts to the primary server
    pub async fn select_candidate(&self, external_id: &str) -> Result<SelectionSnapshot, SelectionError> {
        let mut state = self.state.lock().await;
        state.select_candidate(external_id)?;
        Ok(state.snapshot())
    }

    /// Server click: switches playback source for the current candidate
    pub async fn select_server(&self, name: &str) -> Result<SelectionSnapshot, SelectionError> {
        let mut state = self.state.lock().await;
        state.select_server(name)?;
        Ok(state.snapshot())
    }

    /// Moves to the next server in registry order.
    ///
    /// Returns `None` without changing anything when nothing is selected or
    /// the last server is already active.
    pub async fn fail_over(&self) -> Option<ServerTemplate> {
        let mut state = self.state.lock().await;
        let active = state.active_candidate()?.external_id.clone();

        let next = state.active_server_index() + 1;
        let server = state.select_server_at(next).ok()?.clone();

        tracing::info!(
            candidate = %active,
            server = %server.name,
            "Failed over to next playback server"
        );

        Some(server)
    }
}

/// Message shown to the user for a failed search
fn user_message(error: &SearchError) -> &'static str {
    match error {
        SearchError::Config(_) => "Search is currently unavailable.",
        SearchError::HardFailure(_) => "Failed to fetch search results.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawResult;
    use crate::services::providers::MockSearchProvider;
    use crate::services::selection::SelectionPhase;
    use std::collections::HashMap;
    use tokio::sync::oneshot;

    fn raw(id: &str, poster: &str, kind: &str) -> RawResult {
        RawResult {
            external_id: Some(id.to_string()),
            title: Some(format!("Title {}", id)),
            poster: Some(poster.to_string()),
            year: Some("1999".to_string()),
            kind: Some(kind.to_string()),
        }
    }

    fn matrix_reply() -> ProviderReply {
        ProviderReply::Matches(vec![
            raw("tt0000001", "N/A", "movie"),
            raw("tt0133093", "https://img.example/matrix.jpg", "movie"),
        ])
    }

    fn controller(mock: MockSearchProvider) -> PlaybackController {
        PlaybackController::new(Arc::new(mock), Arc::new(ServerRegistry::default()))
    }

    #[tokio::test]
    async fn test_matrix_scenario_auto_activates_and_resolves() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search()
            .times(1)
            .returning(|_| Ok(matrix_reply()));
        let controller = controller(mock);

        let outcome = controller.search("Matrix").await.unwrap();
        assert_eq!(outcome, SearchOutcome::Candidates(1));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.phase, SelectionPhase::Resolved);
        assert_eq!(snapshot.candidates.len(), 1);
        assert_eq!(
            snapshot.active_candidate.unwrap().external_id,
            "tt0133093"
        );
        assert_eq!(
            snapshot.resolved_url.as_deref(),
            Some("https://vidsrc.me/embed/movie?imdb=tt0133093")
        );
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_soft_not_found_sets_no_error() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search()
            .times(1)
            .returning(|_| Ok(ProviderReply::NotFound));
        let controller = controller(mock);

        let outcome = controller.search("asdfgh").await.unwrap();
        assert_eq!(outcome, SearchOutcome::ProviderEmpty);

        let snapshot = controller.snapshot().await;
        assert!(snapshot.candidates.is_empty());
        assert_eq!(snapshot.error, None);
        assert_eq!(snapshot.phase, SelectionPhase::Empty);
    }

    #[tokio::test]
    async fn test_all_filtered_is_distinct_from_provider_empty() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search().times(1).returning(|_| {
            Ok(ProviderReply::Matches(vec![raw("tt1", "N/A", "movie")]))
        });
        let controller = controller(mock);

        let outcome = controller.search("Obscure").await.unwrap();
        assert_eq!(outcome, SearchOutcome::NoEligibleCandidates);
        assert_eq!(controller.snapshot().await.error, None);
    }

    #[tokio::test]
    async fn test_hard_failure_sets_error_without_retry() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search()
            .times(1)
            .returning(|_| Err(SearchError::HardFailure("503".to_string())));
        let controller = controller(mock);

        let result = controller.search("Matrix").await;
        assert_eq!(result, Err(SearchError::HardFailure("503".to_string())));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.error.as_deref(), Some("Failed to fetch search results."));
        assert_eq!(snapshot.phase, SelectionPhase::Empty);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_config_error_uses_generic_message() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search()
            .times(1)
            .returning(|_| Err(SearchError::Config("OMDB_API_KEY is not set".to_string())));
        let controller = controller(mock);

        assert!(controller.search("Matrix").await.is_err());
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.error.as_deref(), Some("Search is currently unavailable."));
    }

    #[tokio::test]
    async fn test_blank_query_never_reaches_provider() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search().never();
        let controller = controller(mock);

        let outcome = controller.search("   ").await.unwrap();
        assert_eq!(outcome, SearchOutcome::EmptyQuery);
        assert_eq!(controller.snapshot().await.phase, SelectionPhase::Empty);
    }

    #[tokio::test]
    async fn test_new_search_discards_previous_selection() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search().times(1).returning(|_| Ok(matrix_reply()));
        let controller = controller(mock);

        controller.search("Matrix").await.unwrap();
        let ticket = controller.begin_search("Alien").await;

        let snapshot = controller.snapshot().await;
        assert!(snapshot.candidates.is_empty());
        assert!(snapshot.loading);
        assert_eq!(ticket.query, "Alien");
    }

    #[tokio::test]
    async fn test_late_reply_does_not_overwrite_newer_results() {
        let mock = MockSearchProvider::new();
        let controller = controller(mock);

        let first = controller.begin_search("Matrix").await;
        let second = controller.begin_search("Alien").await;
        assert!(second.sequence > first.sequence);

        let alien = ProviderReply::Matches(vec![raw("tt0078748", "https://img.example/alien.jpg", "movie")]);
        let outcome = controller.complete_search(&second, Ok(alien)).await.unwrap();
        assert_eq!(outcome, SearchOutcome::Candidates(1));

        let outcome = controller.complete_search(&first, Ok(matrix_reply())).await.unwrap();
        assert_eq!(outcome, SearchOutcome::Stale);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.active_candidate.unwrap().external_id, "tt0078748");
    }

    #[tokio::test]
    async fn test_stale_failure_is_ignored() {
        let controller = controller(MockSearchProvider::new());

        let first = controller.begin_search("Matrix").await;
        let _second = controller.begin_search("Alien").await;

        let outcome = controller
            .complete_search(&first, Err(SearchError::HardFailure("late".to_string())))
            .await;
        assert_eq!(outcome, Ok(SearchOutcome::Stale));
        assert_eq!(controller.snapshot().await.error, None);
    }

    #[tokio::test]
    async fn test_ticket_is_taken_only_once_state_is_locked() {
        let controller = Arc::new(controller(MockSearchProvider::new()));

        let guard = controller.state.lock().await;
        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.begin_search("Matrix").await }
        });
        tokio::task::yield_now().await;

        // begin_search is parked on the lock and must not have claimed a ticket
        assert_eq!(controller.latest.load(Ordering::SeqCst), 0);

        drop(guard);
        let ticket = pending.await.unwrap();
        assert_eq!(ticket.sequence, 1);
        assert!(controller.snapshot().await.loading);
    }

    /// Provider whose replies are released by the test
    struct GatedProvider {
        gates: std::sync::Mutex<HashMap<String, oneshot::Receiver<ProviderReply>>>,
    }

    #[async_trait::async_trait]
    impl SearchProvider for GatedProvider {
        async fn search(&self, query: &str) -> SearchResult<ProviderReply> {
            let gate = self.gates.lock().unwrap().remove(query);
            match gate {
                Some(rx) => rx
                    .await
                    .map_err(|e| SearchError::HardFailure(e.to_string())),
                None => Ok(ProviderReply::NotFound),
            }
        }

        fn name(&self) -> &'static str {
            "gated"
        }
    }

    #[tokio::test]
    async fn test_concurrent_searches_keep_latest() {
        let (matrix_tx, matrix_rx) = oneshot::channel();
        let (alien_tx, alien_rx) = oneshot::channel();
        let mut gates = HashMap::new();
        gates.insert("Matrix".to_string(), matrix_rx);
        gates.insert("Alien".to_string(), alien_rx);

        let controller = PlaybackController::new(
            Arc::new(GatedProvider {
                gates: std::sync::Mutex::new(gates),
            }),
            Arc::new(ServerRegistry::default()),
        );

        let (matrix, alien, _) = tokio::join!(
            controller.search("Matrix"),
            controller.search("Alien"),
            async {
                alien_tx
                    .send(ProviderReply::Matches(vec![raw(
                        "tt0078748",
                        "https://img.example/alien.jpg",
                        "movie",
                    )]))
                    .unwrap();
                tokio::task::yield_now().await;
                matrix_tx.send(matrix_reply()).unwrap();
            }
        );

        assert_eq!(matrix, Ok(SearchOutcome::Stale));
        assert_eq!(alien, Ok(SearchOutcome::Candidates(1)));
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.active_candidate.unwrap().external_id, "tt0078748");
    }

    #[tokio::test]
    async fn test_candidate_click_resets_server_and_server_click_keeps_candidate() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search().times(1).returning(|_| {
            Ok(ProviderReply::Matches(vec![
                raw("tt0133093", "https://img.example/1.jpg", "movie"),
                raw("tt0903747", "https://img.example/2.jpg", "series"),
            ]))
        });
        let controller = controller(mock);
        controller.search("mixed").await.unwrap();

        let snapshot = controller.select_server("Server 2").await.unwrap();
        assert_eq!(snapshot.active_candidate.unwrap().external_id, "tt0133093");
        assert_eq!(
            snapshot.resolved_url.as_deref(),
            Some("https://vidsrc.to/embed/movie/tt0133093")
        );

        let snapshot = controller.select_candidate("tt0903747").await.unwrap();
        assert_eq!(snapshot.active_server.name, "Primary Server");
        assert_eq!(
            snapshot.resolved_url.as_deref(),
            Some("https://vidsrc.me/embed/tv?imdb=tt0903747&season=1&episode=1")
        );
    }

    #[tokio::test]
    async fn test_fail_over_walks_registry_then_stops() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search().times(1).returning(|_| Ok(matrix_reply()));
        let controller = controller(mock);

        assert_eq!(controller.fail_over().await, None);

        controller.search("Matrix").await.unwrap();
        assert_eq!(controller.fail_over().await.unwrap().name, "Server 2");
        assert_eq!(controller.fail_over().await.unwrap().name, "Server 3 (su)");
        assert_eq!(controller.fail_over().await, None);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.active_server.name, "Server 3 (su)");
        assert_eq!(
            snapshot.resolved_url.as_deref(),
            Some("https://embed.su/movie?imdb=tt0133093")
        );
    }

    #[tokio::test]
    async fn test_unknown_selection_errors_propagate() {
        let controller = controller(MockSearchProvider::new());
        assert_eq!(
            controller.select_candidate("tt404").await.unwrap_err(),
            SelectionError::UnknownCandidate("tt404".to_string())
        );
        assert!(controller.select_server("Missing").await.is_err());
    }
}
