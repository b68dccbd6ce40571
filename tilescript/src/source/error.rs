//! Error taxonomy for script map sources.
//!
//! Load time: [`LoadError`] (wrapping [`ConfigError`] and script failures) is
//! terminal; the source is never constructed.
//!
//! Request time: [`SourceError`]. Everything except
//! [`SourceError::UrlFunction`] may be tolerated when the script sets
//! `ignoreErrors`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::color::ColorParseError;
use crate::provider::ProviderError;
use crate::script::ScriptError;

/// A script binding is missing, mistyped or holds an unusable value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `tileType` is mandatory.
    #[error("tileType definition missing")]
    MissingTileType,

    /// A binding holds a value of the wrong type.
    #[error("Invalid type for \"{key}\": expected {expected}, found {actual}")]
    InvalidType {
        key: &'static str,
        expected: &'static str,
        actual: String,
    },

    /// A binding has the right type but an unusable value.
    #[error("Invalid value for \"{key}\": {reason}")]
    InvalidValue { key: &'static str, reason: String },

    /// `tileType` names no registered tile image type.
    #[error("Unknown tile type '{0}'")]
    UnknownTileType(String),

    /// `backgroundColor` could not be parsed.
    #[error("Invalid backgroundColor: {0}")]
    InvalidColor(#[from] ColorParseError),

    #[error("minZoom {min} is greater than maxZoom {max}")]
    ZoomRange { min: u8, max: u8 },
}

/// Constructing a script map source failed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read script {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// Parse or evaluation failure while running the script.
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// The script does not define a required function.
    #[error("Script does not define required function {0}")]
    MissingFunction(String),

    #[error("Invalid script configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A single tile request failed.
#[derive(Debug, Error)]
pub enum SourceError {
    /// `getTileUrl` raised an error or returned a non-string.
    #[error("Tile URL function failed: {0}")]
    UrlFunction(#[source] ScriptError),

    /// `addHeaders` raised an error.
    #[error("Header hook failed: {0}")]
    Hook(#[source] ScriptError),

    /// Opening the connection or transferring data failed.
    #[error("Network failure: {0}")]
    Network(#[from] ProviderError),

    /// Downloaded bytes are not a valid image.
    #[error("Failed to decode tile image: {0}")]
    Decode(#[from] image::ImageError),
}

impl SourceError {
    /// Returns true if `ignoreErrors` may turn this failure into "no data".
    ///
    /// A broken URL function means the source itself does not work, so it
    /// is never tolerated.
    pub fn is_tolerable(&self) -> bool {
        !matches!(self, SourceError::UrlFunction(_))
    }
}
