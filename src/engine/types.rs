//! Engine types
//!
//! Invocation description, fetch settings and check results for the dispatcher.

use crate::catalog::OperationMode;
use crate::http::ApiRequest;
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Records returned by a limited list call when the caller gives no limit
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// How much a `list` operation fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fetch {
    /// Follow every page
    ReturnAll,
    /// One request with `limit=n`
    Limit(usize),
}

impl Default for Fetch {
    fn default() -> Self {
        Self::Limit(DEFAULT_LIST_LIMIT)
    }
}

/// One resource/operation call with its inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    /// Resource name, e.g. `sales_order`
    pub resource: String,
    /// Operation name, e.g. `get_all`
    pub operation: String,
    /// Values for path and fixed-query placeholders
    #[serde(default)]
    pub params: JsonObject,
    /// Request body fields
    #[serde(default)]
    pub body: JsonObject,
    /// Filters, flattened into the query
    #[serde(default)]
    pub filters: JsonObject,
    /// Fetch setting for `list` operations
    #[serde(default)]
    pub fetch: Fetch,
}

impl Invocation {
    /// Create an invocation with no inputs
    pub fn new(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            operation: operation.into(),
            ..Default::default()
        }
    }

    /// Set one path/query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Shorthand for `param("id", id)`
    #[must_use]
    pub fn id(self, id: impl Into<JsonValue>) -> Self {
        self.param("id", id)
    }

    /// Replace the body
    #[must_use]
    pub fn body(mut self, body: JsonObject) -> Self {
        self.body = body;
        self
    }

    /// Set one body field
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Replace the filters
    #[must_use]
    pub fn filters(mut self, filters: JsonObject) -> Self {
        self.filters = filters;
        self
    }

    /// Set one filter
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Follow every page
    #[must_use]
    pub fn return_all(mut self) -> Self {
        self.fetch = Fetch::ReturnAll;
        self
    }

    /// Fetch at most `n` records in one request
    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.fetch = Fetch::Limit(n);
        self
    }
}

/// An invocation resolved against the catalog, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCall {
    /// The request to send (first page for paginated modes)
    pub request: ApiRequest,
    /// How the response is gathered
    pub mode: OperationMode,
}

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
