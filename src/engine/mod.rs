//! Execution engine module
//!
//! Turns resource/operation invocations into Request Executor and Pager calls.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Dispatcher` - Resolves an `Invocation` against the catalog and runs it
//! - `Invocation` - Resource, operation, params, body, filters and fetch setting
//! - `CheckResult` - Outcome of a credential check

mod types;

pub use types::{CheckResult, Fetch, Invocation, ResolvedCall, DEFAULT_LIST_LIMIT};

use crate::catalog::{Catalog, OperationMode};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, KatanaClient, Requester};
use crate::pagination::{unwrap_envelope, CursorPager};
use crate::query::{build_filter_query, remove_empty_values};
use crate::template;
use crate::types::{JsonObject, JsonValue};
use tracing::{debug, warn};

/// Dispatches invocations through a [`Requester`]
pub struct Dispatcher<R> {
    /// Transport
    requester: R,
    /// Resource catalog
    catalog: Catalog,
    /// Pager for `all` and `list` operations
    pager: CursorPager,
}

impl Dispatcher<KatanaClient> {
    /// Build a client from `config` and dispatch through it
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let pager = CursorPager::new(config.page_size);
        Ok(Self::new(KatanaClient::new(config)?)?.with_pager(pager))
    }
}

impl<R: Requester> Dispatcher<R> {
    /// Create a dispatcher over the built-in catalog
    pub fn new(requester: R) -> Result<Self> {
        Ok(Self {
            requester,
            catalog: Catalog::builtin()?,
            pager: CursorPager::default(),
        })
    }

    /// Use a different catalog
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Use a different pager
    #[must_use]
    pub fn with_pager(mut self, pager: CursorPager) -> Self {
        self.pager = pager;
        self
    }

    /// The catalog in use
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The underlying requester
    pub fn requester(&self) -> &R {
        &self.requester
    }

    /// Resolve an invocation into a request without sending it.
    ///
    /// The fixed query from the catalog wins over filters with the same key;
    /// the fixed body wins over caller body fields. Empty body values are
    /// stripped.
    pub fn resolve(&self, invocation: &Invocation) -> Result<ResolvedCall> {
        let op = self
            .catalog
            .operation(&invocation.resource, &invocation.operation)?;
        let params = &invocation.params;

        let endpoint = template::render_path(&op.path, params)?;

        let mut query = match &op.query {
            Some(fixed) => render_object(fixed, params)?,
            None => JsonObject::new(),
        };
        let filters = build_filter_query(&invocation.filters, op.filter_mapping.as_ref());
        for (key, value) in filters {
            query.entry(key).or_insert(value);
        }

        let mut body = invocation.body.clone();
        if let Some(fixed) = &op.body {
            body.extend(render_object(fixed, params)?);
        }
        let body = remove_empty_values(&body);

        let request = ApiRequest {
            method: op.method,
            endpoint,
            body: (!body.is_empty()).then_some(body),
            query: (!query.is_empty()).then_some(query),
        };

        Ok(ResolvedCall {
            request,
            mode: op.mode,
        })
    }

    /// Run an invocation and return its records.
    ///
    /// Arrays come back as their items; a single object comes back as a
    /// one-item list.
    pub async fn execute(&self, invocation: &Invocation) -> Result<Vec<JsonValue>> {
        let ResolvedCall { request, mode } = self.resolve(invocation)?;

        debug!(
            resource = %invocation.resource,
            operation = %invocation.operation,
            method = %request.method,
            endpoint = %request.endpoint,
            mode = ?mode,
            "Dispatching operation"
        );

        match (mode, invocation.fetch) {
            (OperationMode::Single, _) => {
                let response = self.requester.execute(request).await?;
                Ok(into_items(response))
            }
            (OperationMode::All, _) | (OperationMode::List, Fetch::ReturnAll) => {
                self.pager.fetch_all(&self.requester, request, None).await
            }
            (OperationMode::List, Fetch::Limit(n)) => {
                let response = self
                    .requester
                    .execute(request.query_param("limit", n))
                    .await?;
                Ok(into_items(unwrap_envelope(response)))
            }
        }
    }

    /// Verify the API key with a one-record request.
    ///
    /// Upstream and transport failures become a failed [`CheckResult`];
    /// only a broken check definition is an `Err`.
    pub async fn check(&self) -> Result<CheckResult> {
        let check = self.catalog.check();
        let endpoint = template::render(&check.path, &JsonObject::new())?;
        let request = ApiRequest::get(endpoint).query(check.query);

        match self.requester.execute(request).await {
            Ok(_) => Ok(CheckResult::success()),
            Err(err @ (Error::Api(_) | Error::Http(_) | Error::JsonParse(_))) => {
                warn!(kind = %err.kind(), "Connection check failed: {err}");
                Ok(CheckResult::failure(err.to_string()))
            }
            Err(err) => Err(err),
        }
    }
}

/// Render every value of a fixed object against `params`
fn render_object(fixed: &JsonObject, params: &JsonObject) -> Result<JsonObject> {
    fixed
        .iter()
        .map(|(key, value)| Ok((key.clone(), template::render_value(value, params)?)))
        .collect()
}

fn into_items(value: JsonValue) -> Vec<JsonValue> {
    match value {
        JsonValue::Array(items) => items,
        JsonValue::Null => Vec::new(),
        other => vec![other],
    }
}
