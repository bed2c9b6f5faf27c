//! Request descriptor and the requester seam
//!
//! [`ApiRequest`] describes one call: method, endpoint relative to the API
//! root, optional JSON body and optional query map. Anything that can turn an
//! `ApiRequest` into a parsed JSON response implements [`Requester`]; the
//! pager and the dispatcher only depend on that trait.

use crate::error::Result;
use crate::types::{JsonObject, JsonValue, Method};
use async_trait::async_trait;
use std::sync::Arc;

/// One request against the Katana API
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API root, e.g. `/sales_orders`
    pub endpoint: String,
    /// JSON body, attached only when non-empty
    pub body: Option<JsonObject>,
    /// Query map, attached only when non-empty
    pub query: Option<JsonObject>,
}

impl ApiRequest {
    /// Create a request with no body or query
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            query: None,
        }
    }

    /// GET request
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    /// POST request
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    /// PATCH request
    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    /// DELETE request
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Set the JSON body
    #[must_use]
    pub fn body(mut self, body: JsonObject) -> Self {
        self.body = Some(body);
        self
    }

    /// Replace the query map
    #[must_use]
    pub fn query(mut self, query: JsonObject) -> Self {
        self.query = Some(query);
        self
    }

    /// Add one query parameter
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.query
            .get_or_insert_with(JsonObject::new)
            .insert(key.into(), value.into());
        self
    }

    /// Body if present and non-empty
    pub fn effective_body(&self) -> Option<&JsonObject> {
        self.body.as_ref().filter(|body| !body.is_empty())
    }

    /// Query encoded as URL pairs, empty when there is nothing to attach
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query.as_ref().map(encode_query).unwrap_or_default()
    }
}

/// Flatten a JSON query map into URL pairs.
///
/// Strings go as-is, numbers and booleans via `to_string`, nulls are dropped,
/// arrays repeat the key per element and nested objects use `key[sub]`.
pub fn encode_query(query: &JsonObject) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in query {
        push_pairs(&mut pairs, key, value);
    }
    pairs
}

fn push_pairs(pairs: &mut Vec<(String, String)>, key: &str, value: &JsonValue) {
    match value {
        JsonValue::Null => {}
        JsonValue::String(s) => pairs.push((key.to_string(), s.clone())),
        JsonValue::Number(n) => pairs.push((key.to_string(), n.to_string())),
        JsonValue::Bool(b) => pairs.push((key.to_string(), b.to_string())),
        JsonValue::Array(items) => {
            for item in items {
                push_pairs(pairs, key, item);
            }
        }
        JsonValue::Object(map) => {
            for (sub, inner) in map {
                push_pairs(pairs, &format!("{key}[{sub}]"), inner);
            }
        }
    }
}

/// Something that can execute an [`ApiRequest`]
///
/// Implementations own authentication, rate limiting and error
/// classification; callers only see parsed JSON or a classified error.
#[async_trait]
pub trait Requester: Send + Sync {
    /// Execute one request and return the parsed response body
    async fn execute(&self, request: ApiRequest) -> Result<JsonValue>;
}

#[async_trait]
impl<T: Requester + ?Sized> Requester for Arc<T> {
    async fn execute(&self, request: ApiRequest) -> Result<JsonValue> {
        (**self).execute(request).await
    }
}
