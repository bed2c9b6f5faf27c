//! Value helpers for request bodies and filters

use super::builder::FieldMapping;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Null or empty string
pub fn is_empty_value(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Drop null and empty-string entries, recursing into nested objects.
///
/// Nested objects left empty are dropped too. Arrays are kept as-is.
pub fn remove_empty_values(obj: &JsonObject) -> JsonObject {
    let mut result = JsonObject::new();

    for (key, value) in obj {
        match value {
            v if is_empty_value(v) => {}
            JsonValue::Object(nested) => {
                let nested = remove_empty_values(nested);
                if !nested.is_empty() {
                    result.insert(key.clone(), JsonValue::Object(nested));
                }
            }
            _ => {
                result.insert(key.clone(), value.clone());
            }
        }
    }

    result
}

/// Drop empty values and rename keys through `mapping`
pub fn map_fields(fields: &JsonObject, mapping: Option<&FieldMapping>) -> JsonObject {
    fields
        .iter()
        .filter(|(_, value)| !is_empty_value(value))
        .map(|(key, value)| {
            let name = mapping
                .and_then(|m| m.get(key))
                .filter(|mapped| !mapped.is_empty())
                .unwrap_or(key);
            (name.clone(), value.clone())
        })
        .collect()
}

/// Normalize a date or timestamp to `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Accepts RFC 3339 (any offset), a naive `YYYY-MM-DDTHH:MM:SS` taken as
/// UTC, or a plain `YYYY-MM-DD` taken as UTC midnight.
pub fn format_date(input: &str) -> Result<String> {
    let input = input.trim();

    let utc = if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        dt.with_timezone(&Utc)
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        naive.and_utc()
    } else if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0)
            .ok_or_else(|| Error::invalid_param("date", format!("invalid date '{input}'")))?
            .and_utc()
    } else {
        return Err(Error::invalid_param(
            "date",
            format!("'{input}' is not a recognized date"),
        ));
    };

    Ok(utc.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Katana takes quantities and prices as strings
pub fn format_numeric_for_api(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Parse a numeric string, `None` when empty or not a number
pub fn parse_numeric(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|n| !n.is_nan())
}
