//! Record reshaping for the survey and response streams

use crate::error::{Error, Result};
use crate::http::RequestParams;
use crate::schema::{SURVEY_RESPONSE, SURVEY_RESPONSE_DATA};
use crate::timezone;
use crate::types::{is_truthy, scalar_to_string, JsonObject};
use serde_json::Value;

/// Cursor field of the survey stream
pub const SURVEY_CURSOR: &str = "modified_on";
/// Vendor filter field matching [`SURVEY_CURSOR`]
pub const SURVEY_FILTER_FIELD: &str = "date_modified";
/// Cursor field of the response stream, also its vendor filter field
pub const RESPONSE_CURSOR: &str = "date_submitted";

/// UTM parameters lifted out of `url_variables`
pub const UTM_FIELDS: [&str; 3] = ["utm_source", "utm_medium", "utm_campaign"];

/// Server-side `field > bookmark` filter, or no params without a bookmark
pub fn bookmark_filter(field: &str, bookmark: Option<&str>) -> RequestParams {
    match bookmark {
        Some(value) if !value.is_empty() => RequestParams::new()
            .with("filter[field][0]", field)
            .with("filter[operator][0]", ">")
            .with("filter[value][0]", value),
        _ => RequestParams::new(),
    }
}

/// `{survey_id}_{response_id}`
pub fn composite_response_id(survey_id: &Value, response_id: &Value) -> String {
    format!(
        "{}_{}",
        scalar_to_string(survey_id),
        scalar_to_string(response_id)
    )
}

/// Borrow a record as an object
pub fn as_object_mut<'a>(record: &'a mut Value, stream: &str) -> Result<&'a mut JsonObject> {
    record
        .as_object_mut()
        .ok_or_else(|| Error::record(stream, "record is not a JSON object"))
}

/// The record's `id`, which every vendor entity carries
pub fn record_id(record: &Value, stream: &str) -> Result<Value> {
    match record.get("id") {
        Some(id) if !id.is_null() => Ok(id.clone()),
        _ => Err(Error::record(stream, "record has no id")),
    }
}

/// Rewrite the named timestamp fields of a record to UTC in place
pub fn normalize_timestamps(record: &mut JsonObject, stream: &str, fields: &[&str]) -> Result<()> {
    for field in fields {
        let raw = match record.get(*field) {
            Some(Value::String(raw)) => raw,
            Some(other) => {
                return Err(Error::record(
                    stream,
                    format!("{field} is not a timestamp string: {other}"),
                ))
            }
            None => return Err(Error::record(stream, format!("missing {field}"))),
        };
        let utc = timezone::to_utc(raw)?;
        record.insert((*field).to_string(), Value::String(utc));
    }
    Ok(())
}

/// Lift `url_variables.<utm>.value` onto the record, defaulting to `""`
///
/// Does nothing when `url_variables` is absent or empty.
pub fn extract_utm(record: &mut JsonObject) {
    let Some(vars) = record.get("url_variables").filter(|v| is_truthy(v)) else {
        return;
    };

    let values: Vec<(&str, Value)> = UTM_FIELDS
        .iter()
        .map(|name| {
            let value = vars
                .get(name)
                .and_then(|v| v.get("value"))
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()));
            (*name, value)
        })
        .collect();

    for (name, value) in values {
        record.insert(name.to_string(), value);
    }
}

/// A response ready for emission, plus the answers detached from it
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedResponse {
    /// Response record without its answer collection
    pub record: Value,
    /// Vendor response id, `""` when the vendor sent none
    pub native_id: Value,
    /// Composite response id
    pub response_id: String,
    /// Normalized submission time, the bookmark candidate
    pub submitted: String,
    /// Detached answer collection
    pub answers: Vec<Value>,
}

/// Reshape a raw vendor response
///
/// Tags the survey and composite ids, lifts UTM parameters, normalizes
/// both timestamps to UTC and detaches `survey_data`.
pub fn prepare_response(mut response: Value, survey_id: &Value) -> Result<PreparedResponse> {
    let native_id = response
        .get("id")
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()));
    let response_id = composite_response_id(survey_id, &native_id);

    let record = as_object_mut(&mut response, SURVEY_RESPONSE)?;
    record.insert("survey_id".to_string(), survey_id.clone());
    record.insert("response_id".to_string(), Value::String(response_id.clone()));
    extract_utm(record);
    normalize_timestamps(record, SURVEY_RESPONSE, &["date_started", RESPONSE_CURSOR])?;

    let submitted = record
        .get(RESPONSE_CURSOR)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let answers = match record.remove("survey_data") {
        Some(Value::Object(map)) => map.into_iter().map(|(_, answer)| answer).collect(),
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            return Err(Error::record(
                SURVEY_RESPONSE,
                format!("survey_data is neither a map nor a list: {other}"),
            ))
        }
    };

    Ok(PreparedResponse {
        record: response,
        native_id,
        response_id,
        submitted,
        answers,
    })
}

/// Turn detached answers into answer rows tagged with their parent ids
pub fn expand_answers(
    answers: Vec<Value>,
    survey_id: &Value,
    native_response_id: &Value,
    response_id: &str,
) -> Result<Vec<Value>> {
    answers
        .into_iter()
        .map(|mut answer| {
            let row = as_object_mut(&mut answer, SURVEY_RESPONSE_DATA)?;
            row.insert("survey_id".to_string(), survey_id.clone());
            row.insert("survey_response_id".to_string(), native_response_id.clone());
            row.insert("response_id".to_string(), Value::String(response_id.to_string()));
            Ok(answer)
        })
        .collect()
}
