use tracing::{debug, info, warn};

use crate::analysis::{AnalysisResult, HistoryItem};
use crate::config::ScoutConfig;
use crate::history::HistoryStore;
use crate::session::{AnalysisError, AnalysisOutcome, AnalysisRequest, AnalysisSession, Completion};
use crate::storage::KeyValueStore;

/// State holder handed to the presentation layer.
///
/// Owns the analysis session and the query history. Every attempt, failed or
/// not, lands in history; only the latest request updates the current view.
#[derive(Debug)]
pub struct Dashboard<S: KeyValueStore> {
  session: AnalysisSession,
  history: HistoryStore<S>,
}

impl<S: KeyValueStore> Dashboard<S> {
  pub fn new(session: AnalysisSession, history: HistoryStore<S>) -> Self {
    Self { session, history }
  }

  pub fn open(storage: S, config: &ScoutConfig) -> Self {
    let history = HistoryStore::load(storage, config.max_history);
    info!(history_count = history.len(), "Dashboard initialized");
    Self::new(AnalysisSession::new(config), history)
  }

  pub fn current_analysis(&self) -> Option<&AnalysisResult> {
    self.session.current_analysis()
  }

  pub fn error(&self) -> Option<&str> {
    self.session.error()
  }

  pub fn is_loading(&self) -> bool {
    self.session.is_loading()
  }

  pub fn history(&self) -> &[HistoryItem] {
    self.history.items()
  }

  pub fn session(&self) -> &AnalysisSession {
    &self.session
  }

  pub fn session_mut(&mut self) -> &mut AnalysisSession {
    &mut self.session
  }

  pub fn into_storage(self) -> S {
    self.history.into_storage()
  }

  /// Run one request end to end
  pub async fn analyze(&mut self, url: &str) -> Result<AnalysisResult, AnalysisError> {
    let request = self.begin(url)?;
    let outcome = request.resolve().await;
    let result = outcome.result.clone();
    self.complete(outcome);
    result
  }

  /// Start a request. Validation failures are recorded in history right away.
  pub fn begin(&mut self, url: &str) -> Result<AnalysisRequest, AnalysisError> {
    match self.session.begin(url) {
      Ok(request) => Ok(request),
      Err(e) => {
        self.history.add(HistoryItem::failed(url.trim(), &e.to_string()));
        Err(e)
      }
    }
  }

  /// Record a finished request in history and, if it is still the latest,
  /// make it the current analysis or error.
  pub fn complete(&mut self, outcome: AnalysisOutcome) -> Completion {
    let completion = self.session.complete(&outcome);
    let item = outcome.history_item();

    if item.is_success() {
      debug!(url = %item.url, "Analysis added to history");
    } else {
      warn!(url = %item.url, "Failed analysis added to history");
    }
    self.history.add(item);

    completion
  }

  /// Re-run the analysis for a history entry
  pub async fn select_history_item(&mut self, id: &str) -> Result<AnalysisResult, AnalysisError> {
    let item = self
      .history
      .get(id)
      .cloned()
      .ok_or_else(|| AnalysisError::UnknownHistoryItem { id: id.to_string() })?;

    info!(url = %item.url, status = item.status.as_str(), "History item selected");
    self.analyze(&item.url).await
  }

  pub fn remove_history_item(&mut self, id: &str) -> bool {
    self.history.remove(id)
  }

  pub fn clear_history(&mut self) -> usize {
    let cleared = self.history.clear();
    warn!(items_cleared = cleared, "History cleared");
    cleared
  }

  pub fn clear_error(&mut self) {
    self.session.clear_error();
  }
}
