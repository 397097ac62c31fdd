//! Engine types
//!
//! Run statistics for the sync engine.

use std::collections::BTreeMap;

/// Statistics from a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Records emitted per stream
    pub rows: BTreeMap<String, usize>,
    /// Surveys whose responses were fetched
    pub surveys_scanned: usize,
    /// Fetches that ran out of retries and were treated as empty
    pub degraded_fetches: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one emitted record
    pub fn add_row(&mut self, stream: &str) {
        *self.rows.entry(stream.to_string()).or_insert(0) += 1;
    }

    /// Records emitted for a stream
    pub fn rows_for(&self, stream: &str) -> usize {
        self.rows.get(stream).copied().unwrap_or(0)
    }

    /// Records emitted across all streams
    pub fn total_rows(&self) -> usize {
        self.rows.values().sum()
    }
}
