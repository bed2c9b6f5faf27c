// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Katana MRP API client
//!
//! Rate-limited, cursor-paginating transport for the Katana MRP REST API,
//! plus a declarative catalog of every resource and operation it exposes.
//!
//! ## Features
//!
//! - **Rate Gate**: at most one request per 200ms across every client sharing a gate
//! - **Request Executor**: bearer auth, JSON in/out, classified errors (429/401/403/404/422)
//! - **Pager**: follows `pagination.cursor_next` with an optional hard cap
//! - **Query Builder**: flattens range filters into `field[gte]` style keys
//! - **Dispatcher**: runs `resource.operation` invocations from the embedded catalog
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use katana_mrp::{ClientConfig, Dispatcher, Invocation, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let dispatcher = Dispatcher::from_config(ClientConfig::from_env()?)?;
//!
//!     // Check the API key
//!     let status = dispatcher.check().await?;
//!
//!     // Every open sales order
//!     let orders = dispatcher
//!         .execute(
//!             &Invocation::new("sales_order", "get_all")
//!                 .filter("status", "NOT_SHIPPED")
//!                 .return_all(),
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Dispatcher                             │
//! │  Invocation → catalog lookup → path/query/body → send/fetch_all │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴─────┬──────────────┬────────────┐
//! │   Catalog    │   Request Executor  │    Pager     │   Query    │
//! ├──────────────┼─────────────────────┼──────────────┼────────────┤
//! │ katana.yaml  │ Bearer auth         │ cursor_next  │ field[op]  │
//! │ 12 resources │ Rate Gate (200ms)   │ limit=100    │ mapping    │
//! │ templates    │ Error taxonomy      │ hard cap     │ empties    │
//! └──────────────┴─────────────────────┴──────────────┴────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and upstream error classification
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// HTTP client with rate limiting
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Filter query building and value helpers
pub mod query;

/// Template interpolation
pub mod template;

/// Resource and operation catalog
pub mod catalog;

/// Invocation dispatcher
pub mod engine;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{ApiError, Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use catalog::Catalog;
pub use config::ClientConfig;
pub use engine::{CheckResult, Dispatcher, Fetch, Invocation};
pub use http::{ApiRequest, KatanaClient, RateGate, Requester};
pub use pagination::CursorPager;
pub use query::build_filter_query;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
