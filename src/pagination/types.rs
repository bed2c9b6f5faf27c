//! Pagination types and response helpers
//!
//! Katana list endpoints answer with an envelope:
//!
//! ```json
//! { "data": [ ... ], "pagination": { "cursor_next": "..." } }
//! ```
//!
//! Some endpoints return a bare array or a bare object instead, so every
//! helper here tolerates all three shapes.

use crate::types::JsonValue;

/// Where the next-page token lives in a response
pub const CURSOR_PATH: &str = "pagination.cursor_next";

/// Result of inspecting one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Another page exists after this cursor
    Continue {
        /// Opaque continuation token
        cursor: String,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation
    pub fn with_cursor(cursor: impl Into<String>) -> Self {
        Self::Continue {
            cursor: cursor.into(),
        }
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Progress of one `fetch_all`
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages fetched so far
    pub page: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment page number
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// Records carried by a response.
///
/// `data` array first, then a bare array; anything else yields nothing.
pub fn extract_records(response: &JsonValue) -> Vec<JsonValue> {
    match response.get("data") {
        Some(JsonValue::Array(items)) => items.clone(),
        _ => match response {
            JsonValue::Array(items) => items.clone(),
            _ => Vec::new(),
        },
    }
}

/// Next-page token at `pagination.cursor_next`.
///
/// Null, missing and empty-string cursors all mean "no more pages". Numeric
/// cursors are accepted and stringified.
pub fn next_cursor(response: &JsonValue) -> Option<String> {
    let cursor = CURSOR_PATH
        .split('.')
        .try_fold(response, |current, key| current.get(key))?;

    match cursor {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `response.data` when present and truthy, otherwise the response itself
pub fn unwrap_envelope(response: JsonValue) -> JsonValue {
    match response {
        JsonValue::Object(mut map) if map.get("data").is_some_and(is_truthy) => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    }
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}
