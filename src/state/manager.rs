//! State manager implementation
//!
//! Loads the bookmark state a run starts from and persists the final
//! state with atomic writes.

use super::types::State;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// State manager for persisting and loading state
#[derive(Debug, Clone, Default)]
pub struct StateManager {
    /// File the state was loaded from, if any
    source: Option<PathBuf>,
    /// Current state
    state: State,
}

impl StateManager {
    /// Create an in-memory state manager starting from empty state
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Create a state manager around an existing state
    pub fn with_state(state: State) -> Self {
        Self {
            source: None,
            state,
        }
    }

    /// Create a state manager from a file, starting empty if it does not exist
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
            parse_state(&contents)?
        } else {
            State::new()
        };

        Ok(Self {
            source: Some(path),
            state,
        })
    }

    /// Create a state manager from inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::with_state(parse_state(json)?))
    }

    /// Save state to a file
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))?;

        // Write to temp file first, then rename for atomicity
        let path = path.as_ref();
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;

        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|e| Error::state(format!("Failed to rename state file: {e}")))?;

        Ok(())
    }

    /// Current state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Get a bookmark value
    pub fn get_bookmark(&self, stream: &str, field: &str) -> Option<&str> {
        self.state.get_bookmark(stream, field)
    }

    /// Move a bookmark forward (see [`State::advance_bookmark`])
    pub fn advance_bookmark(&mut self, stream: &str, field: &str, candidate: &str) -> bool {
        self.state.advance_bookmark(stream, field, candidate)
    }

    /// Export state as JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// File the state was loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.source.is_none()
    }
}

fn parse_state(contents: &str) -> Result<State> {
    // An empty state file is a fresh start
    if contents.trim().is_empty() {
        return Ok(State::new());
    }
    serde_json::from_str(contents)
        .map_err(|e| Error::state(format!("Failed to parse state: {e}")))
}
