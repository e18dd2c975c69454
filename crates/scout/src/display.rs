use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use colored::*;

use crate::analysis::{AnalysisResult, AnalysisStatus, CustomerMetrics, HistoryItem};

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
  #[default]
  Pretty,
  Json,
}

/// UTC timestamp rendered in the local timezone
pub fn format_timestamp(utc_time: DateTime<Utc>) -> String {
  let local_time: DateTime<Local> = utc_time.into();
  local_time.format("%b %d, %Y %H:%M").to_string()
}

fn format_count(value: i64) -> String {
  let digits = value.unsigned_abs().to_string();
  let mut grouped = String::new();
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }
  if value < 0 {
    format!("-{grouped}")
  } else {
    grouped
  }
}

fn format_signed(value: i64) -> String {
  if value > 0 {
    format!("+{value}")
  } else {
    value.to_string()
  }
}

/// Health direction shown next to a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
  Up,
  Down,
  Neutral,
}

impl Trend {
  fn banded(up: bool, down: bool) -> Self {
    if up {
      Trend::Up
    } else if down {
      Trend::Down
    } else {
      Trend::Neutral
    }
  }

  fn marker(self) -> ColoredString {
    match self {
      Trend::Up => "▲".green(),
      Trend::Down => "▼".red(),
      Trend::Neutral => "".normal(),
    }
  }
}

pub fn growth_trend(yoy_growth: i64) -> Trend {
  Trend::banded(yoy_growth > 100, yoy_growth < 50)
}

pub fn nrr_trend(nrr: i64) -> Trend {
  Trend::banded(nrr >= 100, nrr < 90)
}

pub fn csat_trend(csat: i64) -> Trend {
  Trend::banded(csat >= 80, csat < 70)
}

pub fn nps_trend(nps: i64) -> Trend {
  Trend::banded(nps > 30, nps < 0)
}

/// Label, rendered value and trend for each metric, in display order
fn metric_rows(metrics: &CustomerMetrics) -> [(&'static str, String, Trend); 6] {
  [
    ("YoY Growth", format!("{}%", metrics.yoy_growth), growth_trend(metrics.yoy_growth)),
    ("Net Revenue Retention", format!("{}%", metrics.nrr), nrr_trend(metrics.nrr)),
    ("Daily Active Users", format_count(metrics.dau), Trend::Neutral),
    ("Customer Satisfaction", format!("{}/100", metrics.csat), csat_trend(metrics.csat)),
    ("Net Promoter Score", format_signed(metrics.nps), nps_trend(metrics.nps)),
    ("Current Customers", format_count(metrics.current_customers), Trend::Neutral),
  ]
}

pub fn format_analysis(result: &AnalysisResult, format: OutputFormat) -> String {
  match format {
    OutputFormat::Pretty => format_analysis_pretty(result),
    OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string()),
  }
}

fn format_analysis_pretty(result: &AnalysisResult) -> String {
  let firm = &result.firmographics;
  let mut output = String::new();

  output.push_str(&format!(
    "{} {}\n",
    firm.company_name.bright_white().bold(),
    format!("({})", result.url).dimmed()
  ));
  output.push_str(&format!("{}\n", format_timestamp(result.timestamp).dimmed()));

  output.push_str(&format!("\n{}\n", "Metrics".cyan().bold()));
  for (label, value, trend) in metric_rows(&result.metrics) {
    let line = format!("  {:<24}{} {}", label, value.yellow(), trend.marker());
    output.push_str(line.trim_end());
    output.push('\n');
  }

  output.push_str(&format!("\n{}\n", "Firmographics".cyan().bold()));
  let rows = [
    ("Industry", firm.industry.as_str()),
    ("Employees", firm.employee_count.as_str()),
    ("Headquarters", firm.headquarters.as_str()),
    ("Revenue", firm.revenue.as_str()),
    ("Website", firm.website.as_str()),
  ];
  for (label, value) in rows {
    output.push_str(&format!("  {:<24}{}\n", label, value));
  }
  output.push_str(&format!("  {:<24}{}\n", "Founded", firm.founded_year));

  output
}

pub fn format_history(items: &[HistoryItem], format: OutputFormat) -> String {
  match format {
    OutputFormat::Pretty => format_history_pretty(items),
    OutputFormat::Json => serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string()),
  }
}

fn format_history_pretty(items: &[HistoryItem]) -> String {
  if items.is_empty() {
    return format!("{}\n", "No analysis history".dimmed());
  }

  let mut output = String::new();
  for item in items {
    let marker = match item.status {
      AnalysisStatus::Success => "✓".green(),
      AnalysisStatus::Error => "✗".red(),
    };
    let preview = item.preview.as_deref().unwrap_or("");
    output.push_str(&format!(
      "{} {} {}\n    {}  {}\n",
      marker,
      item.url.bright_white(),
      preview.cyan(),
      format_timestamp(item.timestamp).dimmed(),
      item.id.dimmed()
    ));
  }
  output.push_str(&format!("\n{} entries\n", items.len().to_string().bold()));
  output
}
