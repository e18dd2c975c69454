use scout::config::ScoutConfig;
use scout::history::{HistoryStore, HISTORY_KEY, MAX_HISTORY_ITEMS};
use scout::session::{AnalysisError, AnalysisSession, Completion, RequestCounter};
use scout::validate::ValidationError;
use scout::{AnalysisStatus, Dashboard, MemoryStore};
use std::time::Duration;

fn dashboard_with(every: u64, delay: Duration) -> Dashboard<MemoryStore> {
  let history = HistoryStore::load(MemoryStore::with_entry(HISTORY_KEY, "[]"), MAX_HISTORY_ITEMS);
  let session = AnalysisSession::with_counter(RequestCounter::new(every), delay, delay);
  Dashboard::new(session, history)
}

#[tokio::test]
async fn test_successful_analysis_updates_state_and_history() {
  let mut dashboard = dashboard_with(0, Duration::ZERO);

  let result = dashboard.analyze("stripe.com").await.unwrap();
  assert_eq!(result.url, "https://stripe.com");
  assert_eq!(dashboard.current_analysis(), Some(&result));
  assert!(dashboard.error().is_none());
  assert!(!dashboard.is_loading());

  let history = dashboard.history();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].id, result.id);
  assert_eq!(history[0].preview.as_deref(), Some("Stripe"));
}

#[tokio::test]
async fn test_every_third_request_fails() {
  let mut dashboard = dashboard_with(3, Duration::ZERO);

  assert!(dashboard.analyze("one.com").await.is_ok());
  assert!(dashboard.analyze("two.com").await.is_ok());
  let err = dashboard.analyze("three.com").await.unwrap_err();
  assert_eq!(err, AnalysisError::ServiceUnavailable);
  assert!(dashboard.analyze("four.com").await.is_ok());

  let failed = &dashboard.history()[1];
  assert_eq!(failed.url, "https://three.com");
  assert_eq!(failed.status, AnalysisStatus::Error);
  assert_eq!(
    failed.preview.as_deref(),
    Some("Analysis service temporarily unavailable. Please try again.")
  );
}

#[tokio::test]
async fn test_failure_keeps_previous_analysis_and_sets_error() {
  let mut dashboard = dashboard_with(2, Duration::ZERO);

  let first = dashboard.analyze("one.com").await.unwrap();
  assert!(dashboard.analyze("two.com").await.is_err());

  assert_eq!(dashboard.current_analysis().map(|r| r.id.as_str()), Some(first.id.as_str()));
  assert!(dashboard.error().unwrap().contains("temporarily unavailable"));

  dashboard.clear_error();
  assert!(dashboard.error().is_none());
}

#[tokio::test]
async fn test_counter_is_injectable() {
  let mut dashboard = dashboard_with(3, Duration::ZERO);
  *dashboard.session_mut().counter_mut() = RequestCounter::starting_at(2, 3);

  assert_eq!(dashboard.analyze("first.com").await.unwrap_err(), AnalysisError::ServiceUnavailable);
  assert_eq!(dashboard.session().counter().count(), 3);
}

#[tokio::test]
async fn test_validation_failure_is_recorded() {
  let mut dashboard = dashboard_with(3, Duration::ZERO);

  let err = dashboard.analyze("  ").await.unwrap_err();
  assert_eq!(err, AnalysisError::Validation(ValidationError::Empty));
  assert_eq!(dashboard.error(), Some("Please enter a URL"));
  assert_eq!(dashboard.session().counter().count(), 0);

  let history = dashboard.history();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].status, AnalysisStatus::Error);
  assert_eq!(history[0].preview.as_deref(), Some("Please enter a URL"));
}

#[tokio::test]
async fn test_latest_request_wins() {
  let mut dashboard = dashboard_with(0, Duration::ZERO);

  let older = dashboard.begin("older.com").unwrap();
  let newer = dashboard.begin("newer.com").unwrap();
  assert!(newer.token() > older.token());

  let newer_outcome = newer.resolve().await;
  let older_outcome = older.resolve().await;

  assert_eq!(dashboard.complete(newer_outcome), Completion::Applied);
  assert_eq!(dashboard.complete(older_outcome), Completion::Stale);

  let current = dashboard.current_analysis().unwrap();
  assert_eq!(current.url, "https://newer.com");
  assert!(!dashboard.is_loading());

  // Both attempts are still part of the history
  let urls: Vec<&str> = dashboard.history().iter().map(|i| i.url.as_str()).collect();
  assert_eq!(urls, vec!["https://older.com", "https://newer.com"]);
}

#[tokio::test]
async fn test_stale_request_does_not_clear_loading() {
  let mut dashboard = dashboard_with(0, Duration::ZERO);

  let older = dashboard.begin("older.com").unwrap();
  let _newer = dashboard.begin("newer.com").unwrap();

  let outcome = older.resolve().await;
  assert_eq!(dashboard.complete(outcome), Completion::Stale);
  assert!(dashboard.is_loading());
  assert!(dashboard.current_analysis().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_simulated_delay_is_awaited() {
  let mut dashboard = dashboard_with(0, Duration::from_millis(500));

  let start = tokio::time::Instant::now();
  dashboard.analyze("slow.com").await.unwrap();
  assert!(start.elapsed() >= Duration::from_millis(500));
}

#[tokio::test]
async fn test_select_history_item_reanalyzes() {
  let mut dashboard = dashboard_with(0, Duration::ZERO);

  let original = dashboard.analyze("figma.com").await.unwrap();
  dashboard.analyze("slack.com").await.unwrap();

  let again = dashboard.select_history_item(&original.id).await.unwrap();
  assert_eq!(again.url, original.url);
  assert_eq!(again.metrics, original.metrics);
  assert_ne!(again.id, original.id);

  assert_eq!(dashboard.history().len(), 2);
  assert_eq!(dashboard.history()[0].id, again.id);
}

#[tokio::test]
async fn test_select_unknown_history_item() {
  let mut dashboard = dashboard_with(0, Duration::ZERO);
  let err = dashboard.select_history_item("missing").await.unwrap_err();
  assert_eq!(err, AnalysisError::UnknownHistoryItem { id: "missing".to_string() });
}

#[tokio::test]
async fn test_remove_and_clear_history() {
  let mut dashboard = dashboard_with(0, Duration::ZERO);
  let kept = dashboard.analyze("kept.com").await.unwrap();
  let dropped = dashboard.analyze("dropped.com").await.unwrap();

  assert!(dashboard.remove_history_item(&dropped.id));
  assert_eq!(dashboard.history().len(), 1);
  assert_eq!(dashboard.history()[0].id, kept.id);

  assert_eq!(dashboard.clear_history(), 1);
  assert_eq!(dashboard.clear_history(), 0);
  assert!(dashboard.history().is_empty());
}

#[test]
fn test_open_seeds_history_from_config() {
  let dashboard = Dashboard::open(MemoryStore::new(), &ScoutConfig::instant());
  assert_eq!(dashboard.history().len(), 8);
  assert!(dashboard.current_analysis().is_none());

  let storage = dashboard.into_storage();
  assert!(storage.raw(HISTORY_KEY).is_some());
}
