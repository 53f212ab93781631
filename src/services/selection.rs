use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use crate::{
    models::Candidate,
    services::{
        resolver,
        servers::{ServerRegistry, ServerTemplate},
    },
};

/// Receiver for selection changes
pub type SelectionWatcher = watch::Receiver<SelectionSnapshot>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("No candidate with id {0} in the current results")]
    UnknownCandidate(String),

    #[error("No playback server named {0}")]
    UnknownServer(String),

    #[error("No playback server at position {0}")]
    ServerOutOfRange(usize),
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPhase {
    Empty,
    Resolved,
}

/// Everything a playback surface needs to render the current selection
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelectionSnapshot {
    pub phase: SelectionPhase,
    pub candidates: Vec<Candidate>,
    pub active_candidate: Option<Candidate>,
    pub active_server: ServerTemplate,
    pub resolved_url: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Active candidate and server for one display surface.
///
/// The active candidate is an index into the current result set and the
/// active server an index into the registry. Every mutation recomputes the
/// resolved URL and publishes a fresh snapshot to subscribers.
pub struct SelectionState {
    registry: Arc<ServerRegistry>,
    candidates: Vec<Candidate>,
    active_candidate: Option<usize>,
    active_server: usize,
    resolved_url: Option<String>,
    loading: bool,
    error: Option<String>,
    notifier: watch::Sender<SelectionSnapshot>,
}

impl SelectionState {
    pub fn new(registry: Arc<ServerRegistry>) -> Self {
        let initial = SelectionSnapshot {
            phase: SelectionPhase::Empty,
            candidates: Vec::new(),
            active_candidate: None,
            active_server: registry.primary().clone(),
            resolved_url: None,
            loading: false,
            error: None,
        };
        let (notifier, _) = watch::channel(initial);

        Self {
            registry,
            candidates: Vec::new(),
            active_candidate: None,
            active_server: 0,
            resolved_url: None,
            loading: false,
            error: None,
            notifier,
        }
    }

    /// Subscribe to selection changes
    pub fn subscribe(&self) -> SelectionWatcher {
        self.notifier.subscribe()
    }

    pub fn phase(&self) -> SelectionPhase {
        if self.active_candidate.is_some() {
            SelectionPhase::Resolved
        } else {
            SelectionPhase::Empty
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn active_candidate(&self) -> Option<&Candidate> {
        self.active_candidate.and_then(|i| self.candidates.get(i))
    }

    pub fn active_server(&self) -> &ServerTemplate {
        self.registry
            .get(self.active_server)
            .unwrap_or_else(|| self.registry.primary())
    }

    pub fn active_server_index(&self) -> usize {
        self.active_server
    }

    pub fn resolved_url(&self) -> Option<&str> {
        self.resolved_url.as_deref()
    }

    pub fn registry(&self) -> &ServerRegistry {
        &self.registry
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            phase: self.phase(),
            candidates: self.candidates.clone(),
            active_candidate: self.active_candidate().cloned(),
            active_server: self.active_server().clone(),
            resolved_url: self.resolved_url.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    /// Replaces the result set wholesale and activates its first candidate.
    /// An empty set clears the selection.
    pub fn replace_results(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.loading = false;
        self.error = None;

        if self.candidates.is_empty() {
            self.active_candidate = None;
            self.refresh();
        } else {
            self.activate(0);
        }
    }

    /// Activates the first candidate carrying `external_id` and reverts to the
    /// primary server.
    pub fn select_candidate(&mut self, external_id: &str) -> Result<&Candidate, SelectionError> {
        let index = self
            .candidates
            .iter()
            .position(|c| c.external_id == external_id)
            .ok_or_else(|| SelectionError::UnknownCandidate(external_id.to_string()))?;

        self.activate(index);
        Ok(&self.candidates[index])
    }

    /// Switches the server by name. The active candidate is left untouched.
    pub fn select_server(&mut self, name: &str) -> Result<&ServerTemplate, SelectionError> {
        let index = self
            .registry
            .position(name)
            .ok_or_else(|| SelectionError::UnknownServer(name.to_string()))?;

        self.select_server_at(index)
    }

    /// Switches the server by registry position
    pub fn select_server_at(&mut self, index: usize) -> Result<&ServerTemplate, SelectionError> {
        if index >= self.registry.len() {
            return Err(SelectionError::ServerOutOfRange(index));
        }

        self.active_server = index;
        self.refresh();
        Ok(self.active_server())
    }

    /// Drops the result set and the active candidate
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.active_candidate = None;
        self.refresh();
    }

    /// Marks a query as in flight. Any previous error is forgotten.
    pub fn set_loading(&mut self) {
        self.loading = true;
        self.error = None;
        self.publish();
    }

    /// Records a failed query
    pub fn set_error(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
        self.publish();
    }

    /// Records a query that finished without an eligible candidate
    pub fn set_idle(&mut self) {
        self.loading = false;
        self.publish();
    }

    fn activate(&mut self, index: usize) {
        self.active_candidate = Some(index);
        self.active_server = 0;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.resolved_url = self
            .active_candidate()
            .map(|candidate| resolver::resolve(candidate, self.active_server()));
        self.publish();
    }

    fn publish(&self) {
        self.notifier.send_replace(self.snapshot());
    }
}
