//! Setup shared by all commands: host settings, naming and source loading.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use tilescript::config::{config_file_path, HostSettings};
use tilescript::coord::TileCoord;
use tilescript::provider::{ReqwestClient, RetryingFetcher};
use tilescript::source::{LoadOptions, ScriptMapSource, SourceNamer};

use crate::error::CliError;

/// Script source fetching over HTTP.
pub type HttpSource = ScriptMapSource<RetryingFetcher<ReqwestClient>>;

/// Host settings plus the naming counter for sources loaded in this run.
pub struct CliContext {
    settings: HostSettings,
    namer: SourceNamer,
}

impl CliContext {
    /// Load settings from `config`, or from the default location.
    pub fn load(config: Option<&Path>) -> Result<Self, CliError> {
        let path = config
            .map(Path::to_path_buf)
            .unwrap_or_else(config_file_path);
        let settings = HostSettings::load_from(&path)?;
        debug!(path = %path.display(), settings = ?settings, "Loaded host settings");

        Ok(Self::with_settings(settings))
    }

    pub fn with_settings(settings: HostSettings) -> Self {
        Self {
            settings,
            namer: SourceNamer::new(),
        }
    }

    /// Load a script file as an HTTP-backed tile source.
    pub fn load_source(&self, path: &Path) -> Result<HttpSource, CliError> {
        let fetcher = RetryingFetcher::from_settings(&self.settings.download)
            .map_err(CliError::HttpClient)?;
        let options = LoadOptions::from_settings(&self.settings, self.namer.next_name());

        let source = ScriptMapSource::load_file(path, &options, fetcher).map_err(|error| {
            CliError::Load {
                path: PathBuf::from(path),
                error,
            }
        })?;
        info!(path = %path.display(), source = %source.config().name, "Script loaded");
        Ok(source)
    }
}

/// Build a tile coordinate, rejecting tiles outside the grid for `zoom`.
pub fn tile_coord(zoom: u8, x: u32, y: u32) -> Result<TileCoord, CliError> {
    let coord = TileCoord::new(zoom, x, y);
    if coord.is_within_bounds() {
        Ok(coord)
    } else {
        Err(CliError::InvalidTile(coord))
    }
}
