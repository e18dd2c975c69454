use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a single analysis attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
  Success,
  Error,
}

impl AnalysisStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      AnalysisStatus::Success => "success",
      AnalysisStatus::Error => "error",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerMetrics {
  /// Year over year growth percentage
  pub yoy_growth: i64,
  /// Net revenue retention percentage
  pub nrr: i64,
  /// Daily active users
  pub dau: i64,
  /// Customer satisfaction score (0-100)
  pub csat: i64,
  /// Net promoter score (-100 to 100)
  pub nps: i64,
  pub current_customers: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Firmographics {
  pub company_name: String,
  pub industry: String,
  /// Employee bucket, e.g. "1001-5000"
  pub employee_count: String,
  pub founded_year: i64,
  pub headquarters: String,
  /// Revenue bucket, e.g. "$10M-$50M"
  pub revenue: String,
  pub website: String,
}

/// Full result of one analysis. Only a [`HistoryItem`] summary is ever persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
  pub id: String,
  pub url: String,
  pub timestamp: DateTime<Utc>,
  pub status: AnalysisStatus,
  pub metrics: CustomerMetrics,
  pub firmographics: Firmographics,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error_message: Option<String>,
}

impl AnalysisResult {
  /// Summarize this result for the query history
  pub fn to_history_item(&self) -> HistoryItem {
    HistoryItem {
      id: self.id.clone(),
      url: self.url.clone(),
      timestamp: self.timestamp,
      status: self.status,
      preview: Some(self.firmographics.company_name.clone()),
    }
  }
}

/// Lightweight persisted summary of a past analysis attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
  pub id: String,
  pub url: String,
  pub timestamp: DateTime<Utc>,
  pub status: AnalysisStatus,
  /// Company name on success, error message on failure
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub preview: Option<String>,
}

impl HistoryItem {
  /// Record of a failed attempt against `url`
  pub fn failed(url: &str, message: &str) -> Self {
    Self {
      id: new_id(),
      url: url.to_string(),
      timestamp: Utc::now(),
      status: AnalysisStatus::Error,
      preview: Some(message.to_string()),
    }
  }

  pub fn is_success(&self) -> bool {
    self.status == AnalysisStatus::Success
  }
}

/// Fresh opaque identifier for results and history entries
pub fn new_id() -> String {
  Uuid::new_v4().to_string()
}
