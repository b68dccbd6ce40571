//! Host configuration
//!
//! Settings that apply to every script source a host loads: the global
//! maximum zoom, script resource limits and HTTP download behaviour.
//! They are read from an INI file; a missing file means defaults.

mod file;
mod parser;
mod settings;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    DownloadSettings, HostSettings, ScriptLimits, SourceSettings, DEFAULT_MAX_CALL_LEVELS,
    DEFAULT_MAX_OPERATIONS, DEFAULT_MAX_ZOOM, DEFAULT_RETRY_BACKOFF_MS,
};
