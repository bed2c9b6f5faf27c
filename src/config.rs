//! Client configuration
//!
//! `ClientConfig` is the runtime configuration of [`KatanaClient`](crate::http::KatanaClient).
//! It can be assembled with a builder or loaded from YAML/JSON, where durations
//! are given in milliseconds:
//!
//! ```yaml
//! api_key: "kat_live_..."
//! base_url: https://api.katanamrp.com/v1   # optional
//! timeout_ms: 30000                         # optional
//! min_interval_ms: 200                      # optional
//! page_size: 100                            # optional
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://api.katanamrp.com/v1";

/// Minimum spacing between two dispatches (5 requests/second)
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(200);

/// Records requested per page when paginating
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "KATANA_API_KEY";

// ============================================================================
// Runtime Config
// ============================================================================

/// Configuration for the Katana client
#[derive(Clone)]
pub struct ClientConfig {
    /// API root all endpoints are relative to
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Minimum spacing between dispatched requests
    pub min_interval: Duration,
    /// Page size forced onto paginated requests
    pub page_size: u32,
    /// User agent string
    pub user_agent: String,
    /// Extra headers sent with every request
    pub default_headers: HashMap<String, String>,
}

impl ClientConfig {
    /// Create a config with defaults and the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            min_interval: DEFAULT_MIN_INTERVAL,
            page_size: DEFAULT_PAGE_SIZE,
            user_agent: format!("katana-mrp/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
        }
    }

    /// Create a new config builder
    pub fn builder(api_key: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::new(api_key),
        }
    }

    /// Read the API key from `KATANA_API_KEY`, defaults for everything else
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| Error::missing_field(API_KEY_ENV))?;
        let config = Self::new(api_key);
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let def: ClientConfigDef = serde_yaml::from_str(yaml)?;
        def.try_into()
    }

    /// Parse a JSON config document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let def: ClientConfigDef = serde_json::from_str(json)?;
        def.try_into()
    }

    /// Load config from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Check the config is usable
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::missing_field("api_key"));
        }

        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_config(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.page_size == 0 {
            return Err(Error::invalid_config("page_size", "must be at least 1"));
        }

        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("min_interval", &self.min_interval)
            .field("page_size", &self.page_size)
            .field("user_agent", &self.user_agent)
            .field("default_headers", &self.default_headers)
            .finish()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the minimum spacing between requests
    pub fn min_interval(mut self, interval: Duration) -> Self {
        self.config.min_interval = interval;
        self
    }

    /// Set the page size used when paginating
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// ============================================================================
// Config File Definition
// ============================================================================

/// Serialized form of [`ClientConfig`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfigDef {
    /// Bearer token
    pub api_key: String,

    /// API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Minimum spacing between requests in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Page size used when paginating
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Extra headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_min_interval_ms() -> u64 {
    DEFAULT_MIN_INTERVAL.as_millis() as u64
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl TryFrom<ClientConfigDef> for ClientConfig {
    type Error = Error;

    fn try_from(def: ClientConfigDef) -> Result<Self> {
        let mut config = ClientConfig::new(def.api_key);
        config.base_url = def.base_url;
        config.timeout = Duration::from_millis(def.timeout_ms);
        config.min_interval = Duration::from_millis(def.min_interval_ms);
        config.page_size = def.page_size;
        if let Some(agent) = def.user_agent {
            config.user_agent = agent;
        }
        config.default_headers = def.headers;

        config.validate()?;
        Ok(config)
    }
}
