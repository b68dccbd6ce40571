//! HTTP client abstraction for testability

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::connection::TileConnection;
use super::types::ProviderError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `User-Agent` sent when the script does not set one.
pub const DEFAULT_USER_AGENT: &str = concat!("tilescript/", env!("CARGO_PKG_VERSION"));

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Sends the request described by `connection` and returns the body.
    ///
    /// Headers set on the connection (for example by a script's
    /// `addHeaders` hook) are sent with the request.
    fn get(&self, connection: &TileConnection) -> Result<Vec<u8>, ProviderError>;
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    fn get(&self, connection: &TileConnection) -> Result<Vec<u8>, ProviderError> {
        (**self).get(connection)
    }
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_settings(DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT)
    }

    /// Creates a new ReqwestClient with custom timeout and user agent.
    pub fn with_settings(timeout_secs: u64, user_agent: &str) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, connection: &TileConnection) -> Result<Vec<u8>, ProviderError> {
        let url = connection.url().as_str();
        let headers = header_map(connection)?;

        let response = self
            .client
            .get(connection.url().clone())
            .headers(headers)
            .send()
            .map_err(|e| {
                if e.is_builder() {
                    ProviderError::InvalidRequest(e.to_string())
                } else {
                    ProviderError::HttpError(format!("Request failed: {}", e))
                }
            })?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        // Read response body
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::HttpError(format!("Failed to read response: {}", e)))
    }
}

/// Converts the connection's headers, rejecting names or values HTTP cannot carry.
fn header_map(connection: &TileConnection) -> Result<HeaderMap, ProviderError> {
    let mut headers = HeaderMap::new();
    for (name, value) in connection.headers() {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            ProviderError::InvalidRequest(format!("invalid header name '{}'", name))
        })?;
        let header_value = HeaderValue::from_str(&value).map_err(|_| {
            ProviderError::InvalidRequest(format!("invalid value for header '{}'", name))
        })?;
        headers.append(header_name, header_value);
    }
    Ok(headers)
}
