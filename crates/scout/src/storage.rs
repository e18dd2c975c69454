//! Key-value persistence for dashboard state.
//!
//! Stores hold raw JSON text per key. The typed helpers on [`KeyValueStore`]
//! never fail: unreadable or unparsable values fall back to the caller's
//! default and write failures are logged and dropped.

use anyhow::{anyhow, Result};
use dirs::home_dir;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StorageError {
  #[error("Failed to access {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to encode value for key '{key}': {source}")]
  Serialize {
    key: String,
    #[source]
    source: serde_json::Error,
  },
}

pub trait KeyValueStore {
  /// Raw stored text for `key`, or `None` when nothing was ever written
  fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

  fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

  /// Typed read. Falls back to `default()` when the key is missing, the read
  /// fails, or the stored text does not parse.
  fn get_or_else<T, F>(&self, key: &str, default: F) -> T
  where
    Self: Sized,
    T: DeserializeOwned,
    F: FnOnce() -> T,
  {
    match self.read(key) {
      Ok(Some(raw)) => match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
          warn!(key, error = %e, "Stored value is unreadable, using default");
          default()
        }
      },
      Ok(None) => {
        debug!(key, "No stored value, using default");
        default()
      }
      Err(e) => {
        warn!(key, error = %e, "Storage read failed, using default");
        default()
      }
    }
  }

  /// Typed write. Failures are logged, never returned.
  fn set<T>(&mut self, key: &str, value: &T)
  where
    Self: Sized,
    T: Serialize + ?Sized,
  {
    let encoded = match serde_json::to_string(value) {
      Ok(encoded) => encoded,
      Err(source) => {
        let e = StorageError::Serialize { key: key.to_string(), source };
        warn!(error = %e, "Dropping storage write");
        return;
      }
    };

    if let Err(e) = self.write(key, &encoded) {
      warn!(key, error = %e, "Storage write failed");
    }
  }
}

/// In-process store, useful for tests and one-off sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
  entries: HashMap<String, String>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_entry(key: &str, value: &str) -> Self {
    let mut store = Self::new();
    store.entries.insert(key.to_string(), value.to_string());
    store
  }

  pub fn raw(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }
}

impl KeyValueStore for MemoryStore {
  fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
    Ok(self.entries.get(key).cloned())
  }

  fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
    self.entries.insert(key.to_string(), value.to_string());
    Ok(())
  }
}

/// One `<key>.json` file per key under a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
  root: PathBuf,
}

impl FileStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Store rooted at [`get_scout_home`]
  pub fn open_default() -> Result<Self> {
    Ok(Self::new(get_scout_home()?))
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn path_for(&self, key: &str) -> PathBuf {
    self.root.join(format!("{key}.json"))
  }
}

impl KeyValueStore for FileStore {
  fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
    let path = self.path_for(key);
    if !path.exists() {
      return Ok(None);
    }

    fs::read_to_string(&path).map(Some).map_err(|source| StorageError::Io { path, source })
  }

  fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
    fs::create_dir_all(&self.root)
      .map_err(|source| StorageError::Io { path: self.root.clone(), source })?;

    let path = self.path_for(key);
    fs::write(&path, value).map_err(|source| StorageError::Io { path, source })
  }
}

/// Get the scout home directory (~/.scout)
pub fn get_scout_home() -> Result<PathBuf> {
  // Allow tests or callers to override the home directory via env var
  if let Ok(custom_root) = std::env::var("SCOUT_HOME") {
    return Ok(PathBuf::from(custom_root));
  }

  let home = home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
  Ok(home.join(".scout"))
}
