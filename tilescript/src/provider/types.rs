//! Provider error types

use std::fmt;

/// Errors raised by the HTTP layer while opening or reading a tile connection.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset)
    HttpError(String),
    /// Server answered with a non-success status code
    HttpStatus { status: u16, url: String },
    /// URL could not be parsed or uses an unsupported scheme
    InvalidUrl(String),
    /// Response body was unusable
    InvalidResponse(String),
    /// Request could not be built, e.g. a header set by the script is malformed
    InvalidRequest(String),
}

impl ProviderError {
    /// Returns true if retrying the same request may succeed.
    ///
    /// Transport failures, server errors and rate limiting are transient;
    /// client errors and malformed URLs are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::HttpError(_) => true,
            ProviderError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            ProviderError::InvalidUrl(_)
            | ProviderError::InvalidResponse(_)
            | ProviderError::InvalidRequest(_) => false,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::HttpStatus { status, url } => {
                write!(f, "HTTP {} from {}", status, url)
            }
            ProviderError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            ProviderError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}
