//! State management module
//!
//! Handles bookmark tracking between runs.
//! State is persisted between sync runs to enable incremental syncs.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - Per-stream bookmarks keyed by cursor field
//! - `StateManager` - Loading from file or inline JSON and atomic saving

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{State, StreamBookmarks};
