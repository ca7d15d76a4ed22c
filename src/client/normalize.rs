//! Upstream payload normalization.
//!
//! The upstream answers in JSON or XML depending on endpoint and failure
//! mode, and the item collection changes shape with the result size:
//!
//! - many results: `"items": {"item": [{...}, {...}]}`
//! - one result: `"items": {"item": {...}}`
//! - no results: `"items": ""`, `"items": {}` or no `items` at all
//!
//! XML bodies are first converted to the same JSON value tree, so a single
//! [`normalize()`] handles both. Authentication and quota failures usually
//! come back as an XML `OpenAPI_ServiceResponse` envelope with a success
//! HTTP status; those are turned into classified errors here.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::{Map, Value};

use crate::types::{Item, NormalizedResponse, Page};
use crate::{Result, TourismError};

const SUCCESS_CODES: &[&str] = &["0000", "00", "0"];
const NO_DATA_CODE: &str = "03";

/// Parse a raw response body and normalize it.
pub fn parse_payload(body: &str, page: Page) -> Result<NormalizedResponse> {
    let trimmed = body.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(TourismError::EmptyResponse);
    }
    let value = if trimmed.starts_with('<') {
        xml_to_value(trimmed)?
    } else {
        serde_json::from_str(trimmed)?
    };
    normalize(&value, page)
}

/// Extract a classified error from a non-success body, if it carries one.
pub(crate) fn error_from_body(body: &str) -> Option<TourismError> {
    let trimmed = body.trim();
    let value = if trimmed.starts_with('<') {
        xml_to_value(trimmed).ok()?
    } else {
        serde_json::from_str(trimmed).ok()?
    };
    normalize(&value, Page::default()).err()
}

/// Normalize a decoded payload into the uniform paginated shape.
///
/// Missing items become an empty list, missing counts become zero, a single
/// item becomes a one-element list and a missing page number falls back to
/// the requested one. Items beyond the requested row count are dropped.
pub fn normalize(payload: &Value, page: Page) -> Result<NormalizedResponse> {
    if let Some(envelope) = payload.get("OpenAPI_ServiceResponse") {
        return Err(envelope_error(envelope));
    }

    let root = payload.get("response").unwrap_or(payload);
    let header = root.get("header").unwrap_or(root);
    if let Some(code) = header.get("resultCode").and_then(scalar_text) {
        if code == NO_DATA_CODE {
            return Ok(NormalizedResponse::empty(page));
        }
        if !SUCCESS_CODES.contains(&code.as_str()) {
            let message = header
                .get("resultMsg")
                .and_then(scalar_text)
                .unwrap_or_else(|| code.clone());
            return Err(TourismError::from_result_code(&code, message));
        }
    }

    let body = root.get("body").unwrap_or(&Value::Null);
    let mut items = extract_items(body.get("items"));
    items.truncate(page.rows as usize);

    Ok(NormalizedResponse {
        items,
        total_count: body.get("totalCount").and_then(count).unwrap_or(0),
        page_no: body
            .get("pageNo")
            .and_then(count)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n >= 1)
            .unwrap_or(page.page),
        num_of_rows: body
            .get("numOfRows")
            .and_then(count)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
    })
}

fn envelope_error(envelope: &Value) -> TourismError {
    let header = envelope.get("cmmMsgHeader").unwrap_or(envelope);
    let text = |key: &str| header.get(key).and_then(scalar_text);
    let code = text("returnReasonCode").unwrap_or_else(|| "99".to_string());
    let message = text("returnAuthMsg")
        .or_else(|| text("errMsg"))
        .unwrap_or_else(|| "unknown upstream error".to_string());
    TourismError::from_result_code(&code, message)
}

fn extract_items(items: Option<&Value>) -> Vec<Item> {
    let inner = match items {
        Some(Value::Object(map)) => map.get("item"),
        Some(list @ Value::Array(_)) => Some(list),
        _ => None,
    };
    match inner {
        Some(Value::Array(list)) => list
            .iter()
            .filter_map(|v| v.as_object().cloned())
            .collect(),
        Some(Value::Object(single)) => vec![single.clone()],
        _ => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Map::new(),
            text: String::new(),
        }
    }

    fn into_value(self) -> Value {
        if self.children.is_empty() {
            Value::String(self.text)
        } else {
            Value::Object(self.children)
        }
    }
}

/// Convert an XML document into a JSON value tree.
///
/// Elements with children become objects, repeated sibling names become
/// arrays, leaf elements become their (unescaped) text. Attributes are
/// ignored; the upstream does not use them.
pub fn xml_to_value(xml: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack = vec![Frame::new(String::new())];
    loop {
        let event = reader
            .read_event()
            .map_err(|e| TourismError::Xml(e.to_string()))?;
        match event {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                stack.push(Frame::new(name));
            }
            Event::Empty(empty) => {
                let name = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    insert_child(&mut parent.children, name, Value::String(String::new()));
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| TourismError::Xml(e.to_string()))?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text);
                }
            }
            Event::CData(cdata) => {
                let bytes = cdata.into_inner();
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&bytes));
                }
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(TourismError::Xml("unbalanced closing tag".to_string()));
                }
                if let Some(frame) = stack.pop() {
                    let name = frame.name.clone();
                    let value = frame.into_value();
                    if let Some(parent) = stack.last_mut() {
                        insert_child(&mut parent.children, name, value);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(TourismError::Xml("unexpected end of document".to_string()));
    }
    match stack.pop() {
        Some(root) if !root.children.is_empty() => Ok(Value::Object(root.children)),
        _ => Err(TourismError::Xml("document has no root element".to_string())),
    }
}

fn insert_child(map: &mut Map<String, Value>, name: String, value: Value) {
    match map.get_mut(&name) {
        Some(Value::Array(existing)) => existing.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(name, value);
        }
    }
}
