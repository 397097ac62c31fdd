//! Common types used throughout the tap
//!
//! Shared type aliases and small helpers for working with untyped
//! vendor JSON.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Value Helpers
// ============================================================================

/// Render a scalar JSON value the way it appears in a URL path or a
/// composite identifier: strings without quotes, numbers in their JSON
/// form, `null` as an empty string.
pub fn scalar_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Python-style truthiness, which is how the vendor payloads signal
/// "nothing here" (`[]`, `{}`, `""`, `0`, `false`, `null`).
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}
