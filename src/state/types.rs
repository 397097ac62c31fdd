//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cursor field name → last seen value
pub type StreamBookmarks = BTreeMap<String, String>;

/// Complete state for the tap
///
/// Serialized as `{"bookmarks": {"<stream>": {"<cursor field>": "<value>"}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: BTreeMap<String, StreamBookmarks>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a bookmark value
    pub fn get_bookmark(&self, stream: &str, field: &str) -> Option<&str> {
        self.bookmarks.get(stream)?.get(field).map(String::as_str)
    }

    /// Set a bookmark value unconditionally
    pub fn set_bookmark(&mut self, stream: &str, field: &str, value: impl Into<String>) {
        self.bookmarks
            .entry(stream.to_string())
            .or_default()
            .insert(field.to_string(), value.into());
    }

    /// Move a bookmark forward to `candidate` if it is greater
    ///
    /// Values compare as strings. Empty candidates are ignored. Returns
    /// whether the bookmark changed.
    pub fn advance_bookmark(&mut self, stream: &str, field: &str, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }
        match self.get_bookmark(stream, field) {
            Some(current) if current >= candidate => false,
            _ => {
                self.set_bookmark(stream, field, candidate);
                true
            }
        }
    }
}
