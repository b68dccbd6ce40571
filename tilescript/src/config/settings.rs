//! Host settings structs and their defaults.

use std::time::Duration;

use crate::provider::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

/// Default maximum zoom applied when a script does not define `maxZoom`.
pub const DEFAULT_MAX_ZOOM: u8 = 22;

/// Default cap on operations a single script evaluation may perform.
pub const DEFAULT_MAX_OPERATIONS: u64 = 1_000_000;

/// Default cap on nested script function calls.
pub const DEFAULT_MAX_CALL_LEVELS: usize = 32;

/// Default retry backoff in milliseconds.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

/// Complete host configuration, as read from `config.ini`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostSettings {
    pub source: SourceSettings,
    pub script: ScriptLimits,
    pub download: DownloadSettings,
}

/// Settings applied to every script source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// Host global maximum zoom, used when a script omits `maxZoom`.
    pub default_max_zoom: u8,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            default_max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

/// Resource limits for the script evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLimits {
    pub max_operations: u64,
    pub max_call_levels: usize,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            max_operations: DEFAULT_MAX_OPERATIONS,
            max_call_levels: DEFAULT_MAX_CALL_LEVELS,
        }
    }
}

/// HTTP download settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSettings {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Retries after the first failed attempt.
    pub retries: u32,
    /// Delay before the first retry in milliseconds.
    pub retry_backoff_ms: u64,
    pub user_agent: String,
}

impl DownloadSettings {
    /// Retry backoff as a [`Duration`].
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
