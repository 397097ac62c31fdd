//! Output module
//!
//! Handles the record-emission protocol.
//!
//! # Overview
//!
//! This module provides:
//! - `Message` - Schema, record and state messages
//! - `RecordSink` - The consumer interface the sync engine writes to
//! - `JsonLinesSink` - One JSON message per line (stdout in production)
//! - `MemorySink` - Collects messages for inspection

mod sink;
mod types;
mod writer;

pub use sink::{MemorySink, RecordSink};
pub use types::Message;
pub use writer::JsonLinesSink;
