//! Stream schema module
//!
//! Static stream definitions: name, key fields, bookmark field and the
//! JSON schema declared downstream before a stream's first record.

mod catalog;
mod types;

pub use catalog::{
    Catalog, StreamDefinition, SURVEY, SURVEY_QUESTION, SURVEY_RESPONSE, SURVEY_RESPONSE_DATA,
};
pub use types::{JsonSchema, JsonType, SchemaProperty};

#[cfg(test)]
mod tests;
