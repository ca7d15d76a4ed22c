//! Argument decoding and validation shared by the tools.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{ContentType, Language};
use crate::{Result, TourismError};

pub(crate) const DEFAULT_PAGE: u32 = 1;
pub(crate) const DEFAULT_ROWS: u32 = 20;
pub(crate) const DEFAULT_AREA_CODE_ROWS: u32 = 100;
pub(crate) const DEFAULT_RADIUS: i64 = 1000;
pub(crate) const MAX_RADIUS: i64 = 20_000;

const DATE_FORMAT: &str = "%Y%m%d";

pub(crate) fn default_page() -> u32 {
    DEFAULT_PAGE
}

pub(crate) fn default_rows() -> u32 {
    DEFAULT_ROWS
}

/// Decode tool arguments; a missing argument object counts as `{}`.
pub(crate) fn decode<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| TourismError::InvalidArgument(e.to_string()))
}

/// Resolve an optional content-type label. Blank counts as absent.
pub(crate) fn content_type(label: Option<&str>) -> Result<Option<ContentType>> {
    match label.map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => ContentType::from_label(label).map(Some),
    }
}

/// Resolve an optional language code. Blank means the client default.
pub(crate) fn language(code: Option<&str>) -> Result<Option<Language>> {
    match code.map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => Language::parse(code).map(Some),
    }
}

/// Parse a `YYYYMMDD` calendar date.
pub(crate) fn date(field: &str, raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    let well_formed = raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit());
    well_formed
        .then(|| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
        .flatten()
        .ok_or_else(|| {
            TourismError::InvalidArgument(format!(
                "{field} must be a calendar date in YYYYMMDD format, got '{raw}'"
            ))
        })
}

pub(crate) fn radius(radius: i64) -> Result<u32> {
    if !(1..=MAX_RADIUS).contains(&radius) {
        return Err(TourismError::InvalidArgument(format!(
            "radius must be between 1 and {MAX_RADIUS} meters, got {radius}"
        )));
    }
    Ok(radius as u32)
}

pub(crate) fn coordinate(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(TourismError::InvalidArgument(format!(
            "{field} must be a finite number"
        )));
    }
    Ok(value)
}

/// A required identifier that must not be blank.
pub(crate) fn required(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TourismError::InvalidArgument(format!(
            "{field} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Codes and ids arrive as `"1"` or `1`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Code {
    Text(String),
    Number(i64),
}

impl Code {
    fn into_string(self) -> String {
        match self {
            Code::Text(s) => s.trim().to_string(),
            Code::Number(n) => n.to_string(),
        }
    }
}

/// Deserialize a required string-or-integer code.
pub(crate) fn code<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Code::deserialize(deserializer).map(Code::into_string)
}

/// Deserialize an optional string-or-integer code; blank becomes `None`.
pub(crate) fn optional_code<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Code>::deserialize(deserializer)?
        .map(Code::into_string)
        .filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Codes {
        #[serde(deserialize_with = "code")]
        content_id: String,
        #[serde(default, deserialize_with = "optional_code")]
        area_code: Option<String>,
    }

    #[test]
    fn codes_accept_strings_and_integers() {
        let codes: Codes = decode(json!({"content_id": 126508, "area_code": "1"})).unwrap();
        assert_eq!(codes.content_id, "126508");
        assert_eq!(codes.area_code.as_deref(), Some("1"));

        let codes: Codes = decode(json!({"content_id": "126508", "area_code": 31})).unwrap();
        assert_eq!(codes.area_code.as_deref(), Some("31"));
    }

    #[test]
    fn blank_optional_code_is_absent() {
        let codes: Codes = decode(json!({"content_id": "1", "area_code": " "})).unwrap();
        assert_eq!(codes.area_code, None);
        let codes: Codes = decode(json!({"content_id": "1", "area_code": null})).unwrap();
        assert_eq!(codes.area_code, None);
    }

    #[test]
    fn missing_required_field_is_invalid_argument() {
        let err = decode::<Codes>(json!({})).unwrap_err();
        assert!(matches!(err, TourismError::InvalidArgument(_)));
    }

    #[test]
    fn dates_must_be_real_calendar_days() {
        assert_eq!(
            date("start_date", "20250501").unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
        );
        assert!(date("start_date", "20250230").is_err());
        assert!(date("start_date", "2025-05-01").is_err());
        assert!(date("start_date", "2025051").is_err());
    }

    #[test]
    fn radius_bounds() {
        assert_eq!(radius(1).unwrap(), 1);
        assert_eq!(radius(20_000).unwrap(), 20_000);
        assert!(radius(0).is_err());
        assert!(radius(20_001).is_err());
    }

    #[test]
    fn blank_labels_are_absent() {
        assert_eq!(content_type(Some("  ")).unwrap(), None);
        assert_eq!(language(Some("")).unwrap(), None);
        assert_eq!(
            content_type(Some("restaurant")).unwrap(),
            Some(ContentType::Restaurant)
        );
    }
}
