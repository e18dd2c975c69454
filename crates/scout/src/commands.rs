use anyhow::{anyhow, Result};
use colored::*;
use std::path::Path;

use crate::analysis::AnalysisResult;
use crate::config::ScoutConfig;
use crate::dashboard::Dashboard;
use crate::display::{format_analysis, format_history, OutputFormat};
use crate::session::AnalysisError;
use crate::storage::{get_scout_home, FileStore, KeyValueStore};

/// Config from `path`, else `<scout home>/config.json`, else defaults
pub fn load_config(path: Option<&Path>) -> Result<ScoutConfig> {
  let config = match path {
    Some(path) => {
      if !path.exists() {
        return Err(anyhow!("Config file {} not found", path.display()));
      }
      ScoutConfig::load_from_file(path)?
    }
    None => ScoutConfig::load_from_file(&get_scout_home()?.join("config.json"))?,
  };
  Ok(config)
}

pub fn open_dashboard(config: &ScoutConfig) -> Result<Dashboard<FileStore>> {
  Ok(Dashboard::open(FileStore::open_default()?, config))
}

fn print_result<S: KeyValueStore>(
  dashboard: &Dashboard<S>,
  url: &str,
  result: &Result<AnalysisResult, AnalysisError>,
  format: OutputFormat,
) {
  match result {
    Ok(analysis) => print!("{}", format_analysis(analysis, format)),
    Err(e) => {
      let message = dashboard.error().map(str::to_string).unwrap_or_else(|| e.to_string());
      eprintln!("{} {} {}", "✗".red(), url.yellow(), message);
    }
  }
}

/// Analyze each URL in order within one session, so the failure cadence
/// carries across them. Errors if any analysis failed.
pub async fn analyze_urls<S: KeyValueStore>(
  dashboard: &mut Dashboard<S>,
  urls: &[String],
  format: OutputFormat,
) -> Result<()> {
  let mut failures = 0;

  for (i, url) in urls.iter().enumerate() {
    if i > 0 && format == OutputFormat::Pretty {
      println!();
    }
    let result = dashboard.analyze(url).await;
    if result.is_err() {
      failures += 1;
    }
    print_result(dashboard, url, &result, format);
  }

  if failures > 0 {
    return Err(anyhow!("{} of {} analyses failed", failures, urls.len()));
  }
  Ok(())
}

pub async fn select_history_item<S: KeyValueStore>(
  dashboard: &mut Dashboard<S>,
  id: &str,
  format: OutputFormat,
) -> Result<()> {
  let url = history_url(dashboard, id);
  let result = dashboard.select_history_item(id).await;
  match &result {
    Err(e @ AnalysisError::UnknownHistoryItem { .. }) => Err(anyhow!("{e}")),
    Err(_) => {
      print_result(dashboard, &url, &result, format);
      Err(anyhow!("Analysis failed"))
    }
    Ok(_) => {
      print_result(dashboard, &url, &result, format);
      Ok(())
    }
  }
}

/// URL of history item `id`, or the id itself when it is not in the history
fn history_url<S: KeyValueStore>(dashboard: &Dashboard<S>, id: &str) -> String {
  dashboard
    .history()
    .iter()
    .find(|item| item.id == id)
    .map(|item| item.url.clone())
    .unwrap_or_else(|| id.to_string())
}

pub fn list_history<S: KeyValueStore>(dashboard: &Dashboard<S>, format: OutputFormat) {
  print!("{}", format_history(dashboard.history(), format));
}

pub fn remove_history_item<S: KeyValueStore>(dashboard: &mut Dashboard<S>, id: &str) -> Result<()> {
  if !dashboard.remove_history_item(id) {
    return Err(anyhow!("History item {} not found", id));
  }
  println!("{} Removed history item {}", "✓".green(), id.cyan());
  Ok(())
}

pub fn clear_history<S: KeyValueStore>(dashboard: &mut Dashboard<S>) {
  let cleared = dashboard.clear_history();
  println!("{} Cleared {} history entries", "✓".green(), cleared);
}
