//! Request harness around the mock generator.
//!
//! A session validates input, counts requests to decide simulated failures,
//! waits out a simulated service delay, and tracks the current analysis.
//! Each request gets a token; only the most recently issued token may
//! update session state, so an older request finishing late is discarded.

use rand::Rng;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::analysis::{AnalysisResult, HistoryItem};
use crate::config::ScoutConfig;
use crate::mock::generate_analysis;
use crate::validate::{validate_url, ValidationError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("Analysis service temporarily unavailable. Please try again.")]
  ServiceUnavailable,

  #[error("History item {id} not found")]
  UnknownHistoryItem { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
  pub fn value(&self) -> u64 {
    self.0
  }
}

/// Counts validated requests; every `every`th one fails. `every == 0` never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCounter {
  count: u64,
  every: u64,
}

impl RequestCounter {
  pub fn new(every: u64) -> Self {
    Self::starting_at(0, every)
  }

  pub fn starting_at(count: u64, every: u64) -> Self {
    Self { count, every }
  }

  pub fn count(&self) -> u64 {
    self.count
  }

  pub fn reset(&mut self) {
    self.count = 0;
  }

  /// Record one request and report whether it should fail
  pub fn tick(&mut self) -> bool {
    self.count += 1;
    self.every != 0 && self.count % self.every == 0
  }
}

/// A validated request waiting on its simulated delay
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
  token: RequestToken,
  url: String,
  fail: bool,
  delay: Duration,
}

impl AnalysisRequest {
  pub fn token(&self) -> RequestToken {
    self.token
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  pub fn will_fail(&self) -> bool {
    self.fail
  }

  pub fn delay(&self) -> Duration {
    self.delay
  }

  /// Wait out the delay, then produce the result or the simulated failure
  pub async fn resolve(self) -> AnalysisOutcome {
    tokio::time::sleep(self.delay).await;

    let result = if self.fail {
      Err(AnalysisError::ServiceUnavailable)
    } else {
      Ok(generate_analysis(&self.url))
    };

    AnalysisOutcome { token: self.token, url: self.url, result }
  }
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
  pub token: RequestToken,
  pub url: String,
  pub result: Result<AnalysisResult, AnalysisError>,
}

impl AnalysisOutcome {
  pub fn history_item(&self) -> HistoryItem {
    match &self.result {
      Ok(result) => result.to_history_item(),
      Err(e) => HistoryItem::failed(&self.url, &e.to_string()),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
  /// The outcome belonged to the latest request and updated the session
  Applied,
  /// A newer request was issued since; session state was left alone
  Stale,
}

#[derive(Debug)]
pub struct AnalysisSession {
  counter: RequestCounter,
  delay_min: Duration,
  delay_max: Duration,
  last_token: u64,
  current: Option<AnalysisResult>,
  error: Option<String>,
  is_loading: bool,
}

impl AnalysisSession {
  pub fn new(config: &ScoutConfig) -> Self {
    let (delay_min, delay_max) = config.delay_bounds();
    Self::with_counter(RequestCounter::new(config.failure_every), delay_min, delay_max)
  }

  pub fn with_counter(counter: RequestCounter, delay_min: Duration, delay_max: Duration) -> Self {
    Self {
      counter,
      delay_min,
      delay_max: delay_max.max(delay_min),
      last_token: 0,
      current: None,
      error: None,
      is_loading: false,
    }
  }

  pub fn counter(&self) -> &RequestCounter {
    &self.counter
  }

  pub fn counter_mut(&mut self) -> &mut RequestCounter {
    &mut self.counter
  }

  pub fn current_analysis(&self) -> Option<&AnalysisResult> {
    self.current.as_ref()
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn is_loading(&self) -> bool {
    self.is_loading
  }

  pub fn clear_error(&mut self) {
    self.error = None;
  }

  /// Start a request for `raw_url`. Invalid input fails immediately and
  /// does not count toward the failure cadence.
  pub fn begin(&mut self, raw_url: &str) -> Result<AnalysisRequest, AnalysisError> {
    self.last_token += 1;
    let token = RequestToken(self.last_token);
    self.error = None;

    let url = match validate_url(raw_url) {
      Ok(url) => url,
      Err(e) => {
        warn!(url = raw_url, error = %e, "URL validation failed");
        self.is_loading = false;
        self.error = Some(e.to_string());
        return Err(e.into());
      }
    };

    let fail = self.counter.tick();
    let delay = self.pick_delay();
    self.is_loading = true;

    info!(
      url = %url,
      request_count = self.counter.count(),
      token = token.0,
      delay_ms = delay.as_millis() as u64,
      "URL analysis started"
    );

    Ok(AnalysisRequest { token, url, fail, delay })
  }

  /// Apply a finished request unless a newer one has been issued since
  pub fn complete(&mut self, outcome: &AnalysisOutcome) -> Completion {
    if outcome.token.0 != self.last_token {
      debug!(token = outcome.token.0, latest = self.last_token, "Discarding stale analysis");
      return Completion::Stale;
    }

    self.is_loading = false;
    match &outcome.result {
      Ok(result) => {
        info!(
          url = %result.url,
          company = %result.firmographics.company_name,
          yoy_growth = result.metrics.yoy_growth,
          nrr = result.metrics.nrr,
          dau = result.metrics.dau,
          "URL analysis completed successfully"
        );
        self.current = Some(result.clone());
        self.error = None;
      }
      Err(e) => {
        error!(url = %outcome.url, request_count = self.counter.count(), error = %e, "URL analysis failed");
        self.error = Some(e.to_string());
      }
    }
    Completion::Applied
  }

  fn pick_delay(&self) -> Duration {
    if self.delay_max == self.delay_min {
      return self.delay_min;
    }
    let min = self.delay_min.as_millis() as u64;
    let max = self.delay_max.as_millis() as u64;
    Duration::from_millis(rand::thread_rng().gen_range(min..=max))
  }
}
