//! Cumulus API access layer
//!
//! # Module Structure
//!
//! - [`client`] - Request execution and response decoding
//! - [`error`] - Error taxonomy shared by every operation
//! - [`http`] - `reqwest` based invoker with retries
//! - [`pagination`] - Listing endpoints, page by page
//! - [`status`] - Retry eligibility of status codes
//! - [`upsert`] - Replace-or-create for keyed resources
//!
//! # Example
//!
//! ```ignore
//! use cumulus_cli::api::{CumulusClient, HttpInvoker};
//! use cumulus_cli::config::ClientConfig;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = CumulusClient::new(HttpInvoker::new(ClientConfig::default())?);
//!     let version = client.get("my-stack", "/version", None).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod pagination;
pub mod status;
pub mod upsert;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{
    ApiRequest, Body, CumulusClient, Invoke, InvokeRequest, Method, ProxyPayload, QueryParams,
    QueryValue, RawResponse,
};
pub use error::{ApiError, DomainError, Result};
pub use http::HttpInvoker;
pub use pagination::{fetch_pages, ListOptions, SortOrder};
pub use status::{is_retry_eligible, NO_RETRY_STATUS_CODES};
pub use upsert::{upsert, ResourceKind};

use std::borrow::Cow;

/// Percent-encode a single path segment taken from user input
pub fn path_segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
