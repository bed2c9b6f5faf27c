//! HTTP module
//!
//! Transport for the Katana API.
//!
//! # Features
//!
//! - **Rate Gate**: minimum spacing between dispatches, shared across clients
//! - **Request Executor**: bearer-authenticated JSON requests
//! - **Error Classification**: non-2xx responses become typed [`ApiError`](crate::error::ApiError)s
//! - **Requester seam**: the pager and dispatcher run against any [`Requester`]

mod client;
mod rate_limit;
mod types;

pub use client::KatanaClient;
pub use rate_limit::RateGate;
pub use types::{encode_query, ApiRequest, Requester};

#[cfg(test)]
mod tests;
