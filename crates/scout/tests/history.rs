use chrono::{Duration, TimeZone, Utc};
use scout::history::{HistoryStore, HISTORY_KEY, MAX_HISTORY_ITEMS};
use scout::mock::SEED_URLS;
use scout::{AnalysisStatus, FileStore, HistoryItem, KeyValueStore, MemoryStore};
use std::fs;
use tempfile::TempDir;

fn item(id: &str, url: &str) -> HistoryItem {
  HistoryItem {
    id: id.to_string(),
    url: url.to_string(),
    timestamp: Utc::now(),
    status: AnalysisStatus::Success,
    preview: Some(format!("preview {id}")),
  }
}

fn empty_history() -> HistoryStore<MemoryStore> {
  HistoryStore::load(MemoryStore::with_entry(HISTORY_KEY, "[]"), MAX_HISTORY_ITEMS)
}

#[cfg(test)]
mod ordering_tests {
  use super::*;

  #[test]
  fn test_readding_url_moves_it_to_front() {
    let mut history = empty_history();
    history.add(item("a1", "a"));
    history.add(item("b1", "b"));
    history.add(item("a2", "a"));

    assert_eq!(history.len(), 2);
    assert_eq!(history.items()[0].id, "a2");
    assert_eq!(history.items()[0].preview.as_deref(), Some("preview a2"));
    assert_eq!(history.items()[1].id, "b1");
  }

  #[test]
  fn test_sixty_adds_keep_latest_fifty() {
    let mut history = empty_history();
    for n in 0..60 {
      history.add(item(&format!("id{n}"), &format!("https://site{n}.com")));
    }

    assert_eq!(history.len(), 50);
    assert_eq!(history.items()[0].id, "id59");
    assert_eq!(history.items()[49].id, "id10");
    assert!(history.get("id9").is_none());
  }

  #[test]
  fn test_urls_stay_unique() {
    let mut history = empty_history();
    for n in 0..30 {
      history.add(item(&format!("id{n}"), &format!("https://site{}.com", n % 4)));
    }

    let mut urls: Vec<&str> = history.items().iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls.len(), 4);
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 4);
  }

  #[test]
  fn test_clear_is_idempotent() {
    let mut history = empty_history();
    history.clear();
    assert!(history.is_empty());

    history.add(item("1", "a"));
    history.clear();
    history.clear();
    assert!(history.is_empty());
  }

  #[test]
  fn test_remove_by_id() {
    let mut history = empty_history();
    history.add(item("1", "a"));
    history.add(item("2", "b"));

    assert!(history.remove("1"));
    assert!(!history.remove("1"));
    assert_eq!(history.items().len(), 1);
    assert_eq!(history.items()[0].id, "2");
  }
}

#[cfg(test)]
mod persistence_tests {
  use super::*;

  #[test]
  fn test_fresh_storage_gets_seed_history() {
    let temp = TempDir::new().unwrap();
    let history = HistoryStore::load(FileStore::new(temp.path()), MAX_HISTORY_ITEMS);

    let urls: Vec<&str> = history.items().iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, SEED_URLS.to_vec());
    assert!(history.items().windows(2).all(|pair| pair[0].timestamp > pair[1].timestamp));
    assert!(temp.path().join("analysis-history.json").exists());
  }

  #[test]
  fn test_corrupt_file_falls_back_to_seed() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("analysis-history.json"), "{{ definitely not json").unwrap();

    let history = HistoryStore::load(FileStore::new(temp.path()), MAX_HISTORY_ITEMS);
    assert_eq!(history.len(), SEED_URLS.len());
  }

  #[test]
  fn test_reload_sees_previous_mutations() {
    let temp = TempDir::new().unwrap();

    let mut history = HistoryStore::load(FileStore::new(temp.path()), MAX_HISTORY_ITEMS);
    history.clear();
    history.add(item("kept", "https://kept.com"));
    drop(history);

    let reloaded = HistoryStore::load(FileStore::new(temp.path()), MAX_HISTORY_ITEMS);
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.items()[0].id, "kept");
  }

  #[test]
  fn test_timestamps_round_trip_exactly() {
    let temp = TempDir::new().unwrap();
    let precise = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();

    let mut history = HistoryStore::load(FileStore::new(temp.path()), MAX_HISTORY_ITEMS);
    history.clear();
    let mut entry = item("precise", "https://precise.io");
    entry.timestamp = precise;
    history.add(entry.clone());
    let later = item("later", "https://later.io");
    history.add(HistoryItem { timestamp: precise + Duration::nanoseconds(1), ..later });

    let reloaded = HistoryStore::load(FileStore::new(temp.path()), MAX_HISTORY_ITEMS);
    assert_eq!(reloaded.get("precise"), Some(&entry));
    assert_eq!(reloaded.items()[0].timestamp, precise + Duration::nanoseconds(1));
  }

  #[test]
  fn test_persisted_layout() {
    let mut history = empty_history();
    history.add(HistoryItem {
      id: "x".to_string(),
      url: "https://x.com".to_string(),
      timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
      status: AnalysisStatus::Error,
      preview: None,
    });

    let storage = history.into_storage();
    let raw = storage.read(HISTORY_KEY).unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed[0]["status"], "error");
    assert_eq!(parsed[0]["timestamp"], "2024-05-01T12:00:00Z");
    assert!(parsed[0].get("preview").is_none());
  }

  #[test]
  fn test_smaller_capacity_trims_on_load() {
    let temp = TempDir::new().unwrap();
    drop(HistoryStore::load(FileStore::new(temp.path()), MAX_HISTORY_ITEMS));

    let mut history = HistoryStore::load(FileStore::new(temp.path()), 3);
    let urls: Vec<&str> = history.items().iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, SEED_URLS[..3].to_vec());

    let reloaded = HistoryStore::load(FileStore::new(temp.path()), MAX_HISTORY_ITEMS);
    assert_eq!(reloaded.len(), 3);

    history.add(item("new", "https://new.com"));
    assert_eq!(history.len(), 3);
    assert_eq!(history.items()[0].id, "new");
  }

  #[test]
  fn test_repeated_urls_on_disk_are_collapsed() {
    let temp = TempDir::new().unwrap();
    let saved = vec![item("1", "https://same.com"), item("2", "https://same.com"), item("3", "https://same.com")];
    fs::write(temp.path().join("analysis-history.json"), serde_json::to_string(&saved).unwrap()).unwrap();

    let history = HistoryStore::load(FileStore::new(temp.path()), MAX_HISTORY_ITEMS);
    assert_eq!(history.len(), 1);
    assert_eq!(history.items()[0].id, "1");
  }
}
