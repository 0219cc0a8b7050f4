//! Inbound payload validation for bookmark create and partial update.
//!
//! Checks run in a fixed order (title, url, rating) and stop at the first
//! failure, so a client always hears about the earliest bad field.

use serde_json::{Map, Value};

use crate::types::bookmark::{BookmarkPatch, NewBookmark};
use crate::types::errors::ValidationError;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Reads a request body leniently: anything that is not a JSON object counts as `{}`.
pub fn body_fields(raw: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Validates a creation payload. Unknown fields are ignored.
pub fn validate_new_bookmark(fields: &Map<String, Value>) -> Result<NewBookmark, ValidationError> {
    let title = check_title(present(fields, "title"))?;
    let url = check_url(present(fields, "url"))?;
    let rating = check_rating(present(fields, "rating"))?;
    let description = present(fields, "description")
        .map(description_text)
        .unwrap_or_default();

    Ok(NewBookmark {
        title,
        url,
        rating,
        description,
    })
}

/// Builds a patch from the known fields supplied in the body.
///
/// Falsy values (`null`, `false`, `0`, `""`) count as not supplied, so
/// `{"title": ""}` yields an empty patch rather than a title error.
/// Supplied values obey the same rules as on creation. The returned patch
/// may be empty; the caller decides what that means.
pub fn validate_patch(fields: &Map<String, Value>) -> Result<BookmarkPatch, ValidationError> {
    let mut patch = BookmarkPatch::default();

    if let Some(value) = supplied(fields, "title") {
        patch.title = Some(check_title(Some(value))?);
    }
    if let Some(value) = supplied(fields, "url") {
        patch.url = Some(check_url(Some(value))?);
    }
    if let Some(value) = supplied(fields, "rating") {
        patch.rating = Some(check_rating(Some(value))?);
    }
    if let Some(value) = supplied(fields, "description") {
        patch.description = Some(description_text(value));
    }

    Ok(patch)
}

/// True when `url` passes the scheme check.
pub fn is_valid_url(url: &str) -> bool {
    url.starts_with("http")
}

/// Parses a rating given either as a JSON number or a numeric string.
pub fn parse_rating(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|value| !value.is_null())
}

fn supplied<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|value| !is_falsy(value))
}

/// JavaScript truthiness for JSON values: `null`, `false`, zero and `""` are falsy.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn check_title(value: Option<&Value>) -> Result<String, ValidationError> {
    match value.and_then(Value::as_str) {
        Some(title) if !title.is_empty() => Ok(title.to_string()),
        _ => Err(ValidationError::Title),
    }
}

fn check_url(value: Option<&Value>) -> Result<String, ValidationError> {
    match value.and_then(Value::as_str) {
        Some(url) if is_valid_url(url) => Ok(url.to_string()),
        _ => Err(ValidationError::Url),
    }
}

fn check_rating(value: Option<&Value>) -> Result<i64, ValidationError> {
    value
        .and_then(parse_rating)
        .filter(|rating| (MIN_RATING..=MAX_RATING).contains(rating))
        .ok_or(ValidationError::Rating)
}

fn description_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
