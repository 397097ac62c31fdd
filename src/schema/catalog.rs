//! Stream catalog
//!
//! The four streams the tap emits, each an immutable definition built once
//! at startup and handed to whoever needs it.

use super::types::{JsonSchema, SchemaProperty};
use serde::Serialize;

/// Survey stream name
pub const SURVEY: &str = "survey";
/// Survey question stream name
pub const SURVEY_QUESTION: &str = "survey_question";
/// Survey response stream name
pub const SURVEY_RESPONSE: &str = "survey_response";
/// Survey response answer stream name
pub const SURVEY_RESPONSE_DATA: &str = "survey_response_data";

/// A named category of output record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamDefinition {
    /// Stream name
    #[serde(rename = "stream")]
    pub name: &'static str,
    /// Fields that identify a record
    pub key_properties: Vec<&'static str>,
    /// Cursor field the stream is bookmarked on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark_field: Option<&'static str>,
    /// Record schema
    pub schema: JsonSchema,
}

/// All streams the tap knows about
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    /// Surveys
    pub survey: StreamDefinition,
    /// Questions of each survey
    pub survey_question: StreamDefinition,
    /// Responses of each survey
    pub survey_response: StreamDefinition,
    /// One row per answer inside a response
    pub survey_response_data: StreamDefinition,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Build the catalog
    pub fn new() -> Self {
        Self {
            survey: survey_stream(),
            survey_question: survey_question_stream(),
            survey_response: survey_response_stream(),
            survey_response_data: survey_response_data_stream(),
        }
    }

    /// Streams in emission order
    pub fn streams(&self) -> [&StreamDefinition; 4] {
        [
            &self.survey,
            &self.survey_question,
            &self.survey_response,
            &self.survey_response_data,
        ]
    }

    /// Look up a stream by name
    pub fn get(&self, name: &str) -> Option<&StreamDefinition> {
        self.streams().into_iter().find(|s| s.name == name)
    }
}

fn survey_stream() -> StreamDefinition {
    StreamDefinition {
        name: SURVEY,
        key_properties: vec!["id"],
        bookmark_field: Some("modified_on"),
        schema: JsonSchema::new()
            .property("id", SchemaProperty::integer())
            .property("team", SchemaProperty::integer())
            .property("type", SchemaProperty::string())
            .property("status", SchemaProperty::string())
            .property("created_on", SchemaProperty::date_time())
            .property("modified_on", SchemaProperty::date_time())
            .property("title", SchemaProperty::string())
            .property("statistics", SchemaProperty::object())
            .property("links", SchemaProperty::object()),
    }
}

fn survey_question_stream() -> StreamDefinition {
    StreamDefinition {
        name: SURVEY_QUESTION,
        key_properties: vec!["id"],
        bookmark_field: None,
        schema: JsonSchema::new()
            .property("survey_id", SchemaProperty::integer())
            .property("id", SchemaProperty::integer())
            .property("type", SchemaProperty::string())
            .property("title", SchemaProperty::object())
            .property("base_type", SchemaProperty::string())
            .property("shortname", SchemaProperty::string())
            .property("varname", SchemaProperty::string())
            .property("description", SchemaProperty::string())
            .property("properties", SchemaProperty::object())
            .property("options", SchemaProperty::object())
            .property("comment", SchemaProperty::boolean())
            .property("has_showhide_deps", SchemaProperty::boolean()),
    }
}

fn survey_response_stream() -> StreamDefinition {
    StreamDefinition {
        name: SURVEY_RESPONSE,
        key_properties: vec!["response_id"],
        bookmark_field: Some("date_submitted"),
        schema: JsonSchema::new()
            .property("response_id", SchemaProperty::string())
            .property("survey_id", SchemaProperty::integer())
            .property("id", SchemaProperty::integer())
            .property("contact_id", SchemaProperty::string())
            .property("status", SchemaProperty::string())
            .property("is_test_data", SchemaProperty::integer())
            .property("session_id", SchemaProperty::string())
            .property("language", SchemaProperty::string())
            .property("ip_address", SchemaProperty::string())
            .property("url_variables", SchemaProperty::object())
            .property("referer", SchemaProperty::string())
            .property("user_agent", SchemaProperty::string())
            .property("country", SchemaProperty::string())
            .property("city", SchemaProperty::string())
            .property("postal", SchemaProperty::string())
            .property("region", SchemaProperty::string())
            .property("utm_source", SchemaProperty::string())
            .property("utm_medium", SchemaProperty::string())
            .property("utm_campaign", SchemaProperty::string())
            .property("link_id", SchemaProperty::integer())
            .property("response_time", SchemaProperty::integer())
            .property("dma", SchemaProperty::integer())
            .property("data_quality", SchemaProperty::object())
            .property("longitude", SchemaProperty::number())
            .property("latitude", SchemaProperty::number())
            .property("date_submitted", SchemaProperty::date_time())
            .property("date_started", SchemaProperty::date_time()),
    }
}

fn survey_response_data_stream() -> StreamDefinition {
    StreamDefinition {
        name: SURVEY_RESPONSE_DATA,
        key_properties: vec!["response_id"],
        bookmark_field: None,
        schema: JsonSchema::new()
            .property("response_id", SchemaProperty::string())
            .property("survey_id", SchemaProperty::integer())
            .property("survey_response_id", SchemaProperty::integer())
            .property("id", SchemaProperty::integer())
            .property("answer_id", SchemaProperty::integer())
            .property("section_id", SchemaProperty::integer())
            .property("question", SchemaProperty::string())
            .property("answer", SchemaProperty::string())
            .property("type", SchemaProperty::string())
            .property("shown", SchemaProperty::boolean()),
    }
}
