//! Helpers for building tool input schemas.

use serde_json::{Value, json};

use crate::types::{ContentType, Language};

pub fn json_schema_object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

pub fn json_schema_string(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description,
    })
}

pub fn json_schema_number(description: &str) -> Value {
    json!({
        "type": "number",
        "description": description,
    })
}

pub fn json_schema_integer(description: &str, minimum: i64, default: Option<i64>) -> Value {
    let mut schema = json!({
        "type": "integer",
        "description": description,
        "minimum": minimum,
    });
    if let Some(default) = default {
        schema["default"] = json!(default);
    }
    schema
}

/// A code the upstream accepts either as text or as a number (`"1"` or `1`).
pub fn json_schema_code(description: &str) -> Value {
    json!({
        "type": ["string", "integer"],
        "description": description,
    })
}

/// Content-type label, enumerating every accepted label.
pub fn content_type_property() -> Value {
    json!({
        "type": "string",
        "description": format!(
            "Type of content (case-insensitive). One of: {}",
            ContentType::valid_labels()
        ),
        "enum": ContentType::all().map(ContentType::label).collect::<Vec<_>>(),
    })
}

pub fn language_property() -> Value {
    json!({
        "type": "string",
        "description": "Response language (default: server setting, usually \"en\")",
        "enum": Language::all().map(Language::code).collect::<Vec<_>>(),
    })
}

pub fn page_property() -> Value {
    json_schema_integer("Page number for pagination", 1, Some(1))
}

pub fn rows_property(default: i64) -> Value {
    json_schema_integer("Number of items per page", 1, Some(default))
}
