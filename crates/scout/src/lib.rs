//! Scout - Customer URL Analysis Dashboard
//!
//! Analyzes a customer URL into growth metrics and firmographics, and keeps a
//! persisted, deduplicated history of past lookups. Analysis results are mock
//! data derived deterministically from the URL, so the same URL always yields
//! the same numbers.

pub mod analysis;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod history;
pub mod mock;
pub mod session;
pub mod storage;
pub mod validate;

pub use analysis::{AnalysisResult, AnalysisStatus, CustomerMetrics, Firmographics, HistoryItem};
pub use dashboard::Dashboard;
pub use history::HistoryStore;
pub use mock::generate_analysis;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
