//! Tests for schema module

use super::*;
use serde_json::json;

#[test]
fn test_property_serialization() {
    assert_eq!(
        serde_json::to_value(SchemaProperty::date_time()).unwrap(),
        json!({"type": "string", "format": "date-time"})
    );
    assert_eq!(
        serde_json::to_value(SchemaProperty::integer()).unwrap(),
        json!({"type": "integer"})
    );
}

#[test]
fn test_schema_builder() {
    let schema = JsonSchema::new()
        .property("id", SchemaProperty::integer())
        .property("title", SchemaProperty::string());

    assert_eq!(schema.properties.len(), 2);
    assert_eq!(
        schema.get_property("id").map(|p| p.json_type),
        Some(JsonType::Integer)
    );
    assert_eq!(
        schema.to_json(),
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "title": {"type": "string"}
            }
        })
    );
}

#[test]
fn test_catalog_stream_order() {
    let catalog = Catalog::new();
    let names: Vec<_> = catalog.streams().iter().map(|s| s.name).collect();
    assert_eq!(
        names,
        vec![SURVEY, SURVEY_QUESTION, SURVEY_RESPONSE, SURVEY_RESPONSE_DATA]
    );
}

#[test]
fn test_catalog_keys_and_bookmarks() {
    let catalog = Catalog::new();

    assert_eq!(catalog.survey.key_properties, vec!["id"]);
    assert_eq!(catalog.survey.bookmark_field, Some("modified_on"));
    assert_eq!(catalog.survey_response.key_properties, vec!["response_id"]);
    assert_eq!(catalog.survey_response.bookmark_field, Some("date_submitted"));
    assert!(catalog.survey_question.bookmark_field.is_none());
    assert_eq!(catalog.survey_response_data.key_properties, vec!["response_id"]);
}

#[test]
fn test_catalog_timestamps_are_date_time() {
    let catalog = Catalog::new();
    for (stream, field) in [
        (&catalog.survey, "created_on"),
        (&catalog.survey, "modified_on"),
        (&catalog.survey_response, "date_started"),
        (&catalog.survey_response, "date_submitted"),
    ] {
        let property = stream.schema.get_property(field).unwrap();
        assert_eq!(property.format.as_deref(), Some("date-time"), "{field}");
    }
}

#[test]
fn test_catalog_lookup() {
    let catalog = Catalog::new();
    assert_eq!(
        catalog.get("survey_response_data").map(|s| s.name),
        Some(SURVEY_RESPONSE_DATA)
    );
    assert!(catalog.get("contacts").is_none());
}

#[test]
fn test_stream_definition_serialization() {
    let catalog = Catalog::new();
    let value = serde_json::to_value(&catalog.survey_question).unwrap();

    assert_eq!(value["stream"], "survey_question");
    assert_eq!(value["key_properties"], json!(["id"]));
    assert!(value.get("bookmark_field").is_none());
    assert_eq!(value["schema"]["properties"]["title"]["type"], "object");
}
