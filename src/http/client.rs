//! Katana HTTP client
//!
//! Issues one authenticated request per call:
//! - waits on the shared [`RateGate`] before every dispatch
//! - sends `Authorization: Bearer <api key>` and JSON content negotiation
//! - attaches body and query only when non-empty
//! - classifies non-2xx responses into [`ApiError`]s
//!
//! There are no retries. Every failure goes back to the caller.

use super::rate_limit::RateGate;
use super::types::{ApiRequest, Requester};
use crate::config::ClientConfig;
use crate::error::{ApiError, Error, Result, UpstreamResponse};
use crate::pagination::CursorPager;
use crate::types::{JsonObject, JsonValue, Method};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, warn};

/// Authenticated, rate-limited client for the Katana API
pub struct KatanaClient {
    client: Client,
    config: ClientConfig,
    rate_gate: Arc<RateGate>,
}

impl KatanaClient {
    /// Create a client with its own rate gate
    pub fn new(config: ClientConfig) -> Result<Self> {
        let gate = Arc::new(RateGate::new(config.min_interval));
        Self::with_rate_gate(config, gate)
    }

    /// Create a client that shares an existing rate gate
    pub fn with_rate_gate(config: ClientConfig, rate_gate: Arc<RateGate>) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            config,
            rate_gate,
        })
    }

    /// Create a client from `KATANA_API_KEY`
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The gate this client waits on
    pub fn rate_gate(&self) -> &Arc<RateGate> {
        &self.rate_gate
    }

    /// Pager using this client's configured page size
    pub fn pager(&self) -> CursorPager {
        CursorPager::new(self.config.page_size)
    }

    /// Send one request and return the parsed response body
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<JsonObject>,
        query: Option<JsonObject>,
    ) -> Result<JsonValue> {
        self.execute(ApiRequest {
            method,
            endpoint: endpoint.to_string(),
            body,
            query,
        })
        .await
    }

    /// Fetch every page of a list endpoint, optionally capped at `limit` records
    pub async fn fetch_all(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<JsonObject>,
        query: Option<JsonObject>,
        limit: Option<usize>,
    ) -> Result<Vec<JsonValue>> {
        let request = ApiRequest {
            method,
            endpoint: endpoint.to_string(),
            body,
            query,
        };
        self.pager().fetch_all(self, request, limit).await
    }

    /// Build full URL from an endpoint path
    fn build_url(&self, endpoint: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        format!("{base}/{endpoint}")
    }
}

#[async_trait]
impl Requester for KatanaClient {
    async fn execute(&self, request: ApiRequest) -> Result<JsonValue> {
        let url = self.build_url(&request.endpoint);

        let mut req = self
            .client
            .request(request.method.into(), &url)
            .bearer_auth(&self.config.api_key)
            .header(ACCEPT, "application/json");

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let pairs = request.query_pairs();
        if !pairs.is_empty() {
            req = req.query(&pairs);
        }

        if let Some(body) = request.effective_body() {
            req = req.json(body);
        }

        self.rate_gate.acquire().await;
        debug!(method = %request.method, endpoint = %request.endpoint, "Dispatching request");

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let error = ApiError::classify(UpstreamResponse::new(status.as_u16(), text));
            warn!(
                method = %request.method,
                endpoint = %request.endpoint,
                status = status.as_u16(),
                kind = %error.kind,
                "Katana request failed"
            );
            return Err(error.into());
        }

        if text.trim().is_empty() {
            return Ok(JsonValue::Object(JsonObject::new()));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

impl std::fmt::Debug for KatanaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KatanaClient")
            .field("config", &self.config)
            .field("rate_gate", &self.rate_gate)
            .finish_non_exhaustive()
    }
}
