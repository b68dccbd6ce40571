//! Generic tile fetching with retry and backoff.
//!
//! The fetcher knows nothing about scripts. It asks a [`ConnectionSource`] for
//! a freshly opened connection on every attempt and hands it to the
//! [`HttpClient`].

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::connection::TileConnection;
use super::http::{HttpClient, ReqwestClient};
use super::types::ProviderError;
use crate::config::DownloadSettings;
use crate::coord::TileCoord;
use crate::source::{LoadMethod, SourceError};

/// Default number of retries after the first failed attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default delay before the first retry; doubled for each further retry.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Something that can open a connection for a tile coordinate.
pub trait ConnectionSource: Send + Sync {
    /// Opens a connection for `coord` with all request headers applied.
    fn open_connection(&self, coord: TileCoord) -> Result<TileConnection, SourceError>;
}

/// Downloads raw tile bytes on behalf of a tile source.
pub trait TileFetcher: Send + Sync {
    /// Fetches the bytes of one tile.
    ///
    /// Returns `Ok(None)` when no data is available without it being an
    /// error, for example a cache-only load with no cache attached.
    fn fetch(
        &self,
        connections: &dyn ConnectionSource,
        coord: TileCoord,
        load_method: LoadMethod,
    ) -> Result<Option<Vec<u8>>, SourceError>;
}

/// HTTP fetcher retrying transient failures with exponential backoff.
pub struct RetryingFetcher<C: HttpClient> {
    http_client: C,
    max_retries: u32,
    backoff: Duration,
}

impl<C: HttpClient> RetryingFetcher<C> {
    /// Creates a fetcher with the default retry policy.
    pub fn new(http_client: C) -> Self {
        Self {
            http_client,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Sets the number of retries after the first attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(1u32 << attempt.min(16))
    }
}

impl RetryingFetcher<ReqwestClient> {
    /// Creates an HTTP fetcher configured from `[download]` settings.
    pub fn from_settings(settings: &DownloadSettings) -> Result<Self, ProviderError> {
        let client = ReqwestClient::with_settings(settings.timeout, &settings.user_agent)?;
        Ok(Self::new(client)
            .with_max_retries(settings.retries)
            .with_backoff(settings.retry_backoff()))
    }
}

impl<C: HttpClient> TileFetcher for RetryingFetcher<C> {
    fn fetch(
        &self,
        connections: &dyn ConnectionSource,
        coord: TileCoord,
        load_method: LoadMethod,
    ) -> Result<Option<Vec<u8>>, SourceError> {
        if load_method == LoadMethod::Cache {
            debug!(tile = %coord, "Cache-only load with no tile cache attached");
            return Ok(None);
        }

        let mut attempt = 0;
        loop {
            let connection = connections.open_connection(coord)?;

            match self.http_client.get(&connection) {
                Ok(data) if data.is_empty() => {
                    return Err(SourceError::Network(ProviderError::InvalidResponse(
                        format!("empty body from {}", connection.url()),
                    )));
                }
                Ok(data) => return Ok(Some(data)),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        tile = %coord,
                        attempt = attempt + 1,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Tile download failed, retrying"
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
                Err(e) => return Err(SourceError::Network(e)),
            }
        }
    }
}
