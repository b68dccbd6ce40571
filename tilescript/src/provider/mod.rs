//! HTTP plumbing beneath script tile sources
//!
//! This module provides the connection handle scripts decorate with headers,
//! the HTTP client abstraction, and the retrying fetcher that turns a
//! connection source into tile bytes.
//!
//! # Example
//!
//! ```ignore
//! use tilescript::provider::{ReqwestClient, RetryingFetcher};
//!
//! let http_client = ReqwestClient::new()?;
//! let fetcher = RetryingFetcher::new(http_client).with_max_retries(3);
//! ```

mod connection;
mod fetcher;
mod http;
mod types;

pub use connection::{TileConnection, CONNECTION_TYPE_NAME};
pub use fetcher::{
    ConnectionSource, RetryingFetcher, TileFetcher, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF,
};
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests::MockHttpClient;
