//! Record sink trait and the in-memory sink

use super::types::Message;
use crate::error::Result;
use crate::schema::StreamDefinition;
use crate::state::State;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Consumer of the messages a sync produces
pub trait RecordSink {
    /// Emit one message
    fn emit(&mut self, message: Message) -> Result<()>;

    /// Declare a stream's schema
    fn write_schema(&mut self, stream: &StreamDefinition) -> Result<()> {
        self.emit(Message::schema(stream))
    }

    /// Emit a record
    fn write_record(
        &mut self,
        stream: &str,
        record: Value,
        time_extracted: DateTime<Utc>,
    ) -> Result<()> {
        self.emit(Message::record(stream, record, time_extracted))
    }

    /// Emit a state checkpoint
    fn write_state(&mut self, state: &State) -> Result<()> {
        self.emit(Message::state(state.clone()))
    }
}

/// Sink that keeps every message in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Messages in emission order
    pub messages: Vec<Message>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Records emitted for a stream, in order
    pub fn records(&self, stream: &str) -> Vec<&Value> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Record {
                    stream: s, record, ..
                } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Streams whose schema was declared, in order
    pub fn schemas(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|m| m.is_schema())
            .filter_map(Message::stream)
            .collect()
    }

    /// State checkpoints, in order
    pub fn states(&self) -> Vec<&State> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::State { value } => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Most recent state checkpoint
    pub fn last_state(&self) -> Option<&State> {
        self.states().last().copied()
    }
}

impl RecordSink for MemorySink {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.messages.push(message);
        Ok(())
    }
}
