//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use tilescript::config::ConfigFileError;
use tilescript::coord::TileCoord;
use tilescript::provider::ProviderError;
use tilescript::source::{LoadError, SourceError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Host settings file could not be read
    Config(ConfigFileError),
    /// Script could not be loaded
    Load { path: PathBuf, error: LoadError },
    /// HTTP client could not be created
    HttpClient(ProviderError),
    /// Tile coordinate outside the tile pyramid
    InvalidTile(TileCoord),
    /// Tile request failed
    Tile(SourceError),
    /// Source returned no tile
    NoTile(TileCoord),
    /// Connectivity check failed
    Connectivity(String),
    /// Failed to write output file
    FileWrite {
        path: PathBuf,
        error: image::ImageError,
    },
    /// Failed to serialize output
    Json(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Load {
                error: LoadError::MissingFunction(_),
                ..
            } => {
                eprintln!();
                eprintln!("Every script must define the URL function, for example:");
                eprintln!("  fn getTileUrl(zoom, x, y) {{");
                eprintln!("      `https://tiles.example.com/${{zoom}}/${{x}}/${{y}}.png`");
                eprintln!("  }}");
            }
            CliError::NoTile(_) => {
                eprintln!();
                eprintln!("Set `let ignoreErrors = true;` in the script to get placeholder tiles.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Load { path, error } => {
                write!(f, "Failed to load script '{}': {}", path.display(), error)
            }
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::InvalidTile(coord) => {
                write!(f, "Tile {} is outside the tile grid for its zoom level", coord)
            }
            CliError::Tile(e) => write!(f, "Tile request failed: {}", e),
            CliError::NoTile(coord) => write!(f, "No tile available for {}", coord),
            CliError::Connectivity(name) => {
                write!(f, "Could not open a connection for source '{}'", name)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::Json(e) => write!(f, "Failed to serialize output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Load { error, .. } => Some(error),
            CliError::HttpClient(e) => Some(e),
            CliError::Tile(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        CliError::Tile(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}
