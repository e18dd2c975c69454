//! Configuration for the analysis session and history store.
//!
//! Loaded from a JSON file; any missing field takes its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::history::MAX_HISTORY_ITEMS;

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Invalid config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Invalid config: {0}")]
  Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutConfig {
  /// Maximum number of history entries kept
  #[serde(default = "default_max_history")]
  pub max_history: usize,
  /// Every Nth validated request fails; 0 disables simulated failures
  #[serde(default = "default_failure_every")]
  pub failure_every: u64,
  /// Lower bound of the simulated analysis delay
  #[serde(default = "default_delay_min_ms")]
  pub delay_min_ms: u64,
  /// Upper bound of the simulated analysis delay
  #[serde(default = "default_delay_max_ms")]
  pub delay_max_ms: u64,
}

fn default_max_history() -> usize {
  MAX_HISTORY_ITEMS
}
fn default_failure_every() -> u64 {
  3
}
fn default_delay_min_ms() -> u64 {
  300
}
fn default_delay_max_ms() -> u64 {
  800
}

impl Default for ScoutConfig {
  fn default() -> Self {
    Self {
      max_history: default_max_history(),
      failure_every: default_failure_every(),
      delay_min_ms: default_delay_min_ms(),
      delay_max_ms: default_delay_max_ms(),
    }
  }
}

impl ScoutConfig {
  /// Load from `path`, falling back to defaults when the file is absent
  pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
    if !path.exists() {
      return Ok(Self::default());
    }

    let content = fs::read_to_string(path)
      .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let config: Self = serde_json::from_str(&content)
      .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.max_history == 0 {
      return Err(ConfigError::Invalid("max_history must be at least 1".to_string()));
    }
    if self.delay_min_ms > self.delay_max_ms {
      return Err(ConfigError::Invalid(format!(
        "delay_min_ms ({}) exceeds delay_max_ms ({})",
        self.delay_min_ms, self.delay_max_ms
      )));
    }
    Ok(())
  }

  pub fn delay_bounds(&self) -> (Duration, Duration) {
    (Duration::from_millis(self.delay_min_ms), Duration::from_millis(self.delay_max_ms))
  }

  /// No delay and no simulated failures
  pub fn instant() -> Self {
    Self { failure_every: 0, delay_min_ms: 0, delay_max_ms: 0, ..Self::default() }
  }
}
