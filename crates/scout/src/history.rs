use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::analysis::HistoryItem;
use crate::mock::initial_history;
use crate::storage::KeyValueStore;

pub const HISTORY_KEY: &str = "analysis-history";
pub const MAX_HISTORY_ITEMS: usize = 50;

/// Ordered, URL-unique, capacity-bounded list of past analyses.
///
/// Most recent first. Every mutation is written through to the backing
/// store; the store is the only writer of the persisted list.
#[derive(Debug)]
pub struct HistoryStore<S: KeyValueStore> {
  storage: S,
  items: Vec<HistoryItem>,
  max_items: usize,
}

impl<S: KeyValueStore> HistoryStore<S> {
  /// Rehydrate from `storage`, seeding the demo history when nothing usable
  /// has been persisted yet.
  ///
  /// A persisted list with repeated URLs or more than `max_items` entries is
  /// repaired on load and written back.
  pub fn load(storage: S, max_items: usize) -> Self {
    let mut seeded = false;
    let items: Vec<HistoryItem> = storage.get_or_else(HISTORY_KEY, || {
      seeded = true;
      initial_history(Utc::now())
    });

    let mut store = Self { storage, items, max_items };
    let repaired = store.normalize();
    if seeded {
      info!(count = store.items.len(), "Seeded query history");
      store.persist();
    } else if repaired {
      warn!(count = store.items.len(), "Repaired persisted query history");
      store.persist();
    } else {
      debug!(count = store.items.len(), "Loaded query history");
    }
    store
  }

  pub fn items(&self) -> &[HistoryItem] {
    &self.items
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn max_items(&self) -> usize {
    self.max_items
  }

  pub fn get(&self, id: &str) -> Option<&HistoryItem> {
    self.items.iter().find(|item| item.id == id)
  }

  /// Insert at the front, replacing any entry for the same URL
  pub fn add(&mut self, item: HistoryItem) {
    self.items.retain(|existing| existing.url != item.url);
    self.items.insert(0, item);
    self.items.truncate(self.max_items);
    self.persist();
  }

  /// Drop the entry with `id`. Returns whether anything was removed.
  pub fn remove(&mut self, id: &str) -> bool {
    let before = self.items.len();
    self.items.retain(|item| item.id != id);
    let removed = self.items.len() != before;
    if removed {
      self.persist();
    }
    removed
  }

  /// Returns how many entries were dropped
  pub fn clear(&mut self) -> usize {
    let cleared = self.items.len();
    self.items.clear();
    self.persist();
    cleared
  }

  pub fn into_storage(self) -> S {
    self.storage
  }

  /// Keep the first entry per URL, then cap. Returns whether anything changed.
  fn normalize(&mut self) -> bool {
    let before = self.items.len();
    let mut seen = HashSet::new();
    self.items.retain(|item| seen.insert(item.url.clone()));
    self.items.truncate(self.max_items);
    self.items.len() != before
  }

  fn persist(&mut self) {
    self.storage.set(HISTORY_KEY, &self.items);
  }
}
