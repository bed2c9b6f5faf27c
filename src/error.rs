//! Error types for the Katana MRP client
//!
//! All public APIs return `Result<T, Error>`. Non-2xx upstream responses are
//! classified into an [`ApiError`] carrying an [`ErrorKind`], a human-readable
//! message and the raw upstream response as its source.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The main error type for the Katana MRP client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Catalog / Invocation Errors
    // ============================================================================
    #[error("Unknown resource: {resource}")]
    UnknownResource { resource: String },

    #[error("Unsupported operation '{operation}' for resource '{resource}'")]
    UnknownOperation { resource: String, operation: String },

    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    #[error("Invalid value for parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Classification of this error.
    ///
    /// Transport failures that never produced a status code are `Unknown`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Api(api) => api.kind,
            _ => ErrorKind::Unknown,
        }
    }

    /// The classified upstream error, if this is one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            _ => None,
        }
    }
}

/// Result type alias for the Katana MRP client
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Upstream error classification
// ============================================================================

/// Category assigned to a failed upstream response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 429
    RateLimited,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 422, with per-field detail when the body carries it
    Validation,
    /// Anything else, passed through uninterpreted
    Unknown,
}

impl ErrorKind {
    /// Map an HTTP status code to its classification
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            422 => Self::Validation,
            _ => Self::Unknown,
        }
    }

    /// Short stable name, suitable for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw non-2xx response as received from upstream
#[derive(Error, Debug, Clone, PartialEq)]
#[error("HTTP {status}: {body}")]
pub struct UpstreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body text (may be empty)
    pub body: String,
}

impl UpstreamResponse {
    /// Create a new upstream response record
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body parsed as JSON, if it is JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Per-field validation messages, in upstream order
pub type FieldErrors = Vec<(String, Vec<String>)>;

/// A classified upstream failure
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ApiError {
    /// Classification tag
    pub kind: ErrorKind,
    /// Short human-readable message
    pub message: String,
    /// Longer advisory text
    pub description: Option<String>,
    /// Per-field validation detail (422 only)
    pub field_errors: Option<FieldErrors>,
    /// The original response
    #[source]
    pub source: UpstreamResponse,
}

const VALIDATION_FALLBACK: &str = "The provided data was invalid.";

impl ApiError {
    /// Classify a raw upstream response
    pub fn classify(source: UpstreamResponse) -> Self {
        let kind = ErrorKind::from_status(source.status);
        let (message, description, field_errors) = match kind {
            ErrorKind::RateLimited => (
                "Rate limit exceeded. Maximum 5 requests/second, 300/minute.".to_string(),
                Some("Please wait before making more requests.".to_string()),
                None,
            ),
            ErrorKind::Unauthorized => (
                "Invalid API key".to_string(),
                Some("Please check your Katana API key in the credentials.".to_string()),
                None,
            ),
            ErrorKind::Forbidden => (
                "Access forbidden".to_string(),
                Some(
                    "API access requires a Professional or Professional Plus plan. \
                     Please upgrade your Katana subscription."
                        .to_string(),
                ),
                None,
            ),
            ErrorKind::NotFound => (
                "Resource not found".to_string(),
                Some("The requested resource does not exist.".to_string()),
                None,
            ),
            ErrorKind::Validation => {
                let fields = source.json().as_ref().and_then(parse_field_errors);
                match &fields {
                    Some(list) => {
                        let description = format_field_errors(list);
                        (
                            format!("Validation error: {description}"),
                            Some(description),
                            fields,
                        )
                    }
                    None => (
                        "Validation error".to_string(),
                        Some(VALIDATION_FALLBACK.to_string()),
                        None,
                    ),
                }
            }
            ErrorKind::Unknown => (source.to_string(), None, None),
        };

        Self {
            kind,
            message,
            description,
            field_errors,
            source,
        }
    }

    /// HTTP status of the original response
    pub fn status(&self) -> u16 {
        self.source.status
    }

    /// Message and description joined, as shown to an operator
    pub fn detail(&self) -> String {
        match &self.description {
            Some(description) if !self.message.ends_with(description.as_str()) => {
                format!("{}: {}", self.message, description)
            }
            Some(_) => self.message.clone(),
            None => self.message.clone(),
        }
    }
}

/// Pull `error.errors` out of a 422 body.
///
/// Each field maps to a list of messages; a lone string is accepted as a
/// one-message list. Returns `None` when the structure is missing.
fn parse_field_errors(body: &Value) -> Option<FieldErrors> {
    let errors = body.get("error")?.get("errors")?.as_object()?;

    let fields = errors
        .iter()
        .map(|(field, messages)| {
            let messages = match messages {
                Value::Array(items) => items.iter().map(message_text).collect(),
                other => vec![message_text(other)],
            };
            (field.clone(), messages)
        })
        .collect();

    Some(fields)
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `field: m1, m2; other: m3`
fn format_field_errors(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}
