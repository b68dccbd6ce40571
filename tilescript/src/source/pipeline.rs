//! Script map source: config, resolver and fetcher put together.

use std::path::Path;

use image::DynamicImage;
use tracing::{debug, info, warn};

use super::error::{LoadError, SourceError};
use super::extractor::{ConfigExtractor, MapSourceConfig};
use super::placeholder::placeholder_tile;
use super::resolver::TileRequestResolver;
use super::tile_source::TileSource;
use super::types::{LoadMethod, TileImageType, TileUpdate};
use crate::config::{HostSettings, ScriptLimits, DEFAULT_MAX_ZOOM};
use crate::coord::TileCoord;
use crate::provider::{TileConnection, TileFetcher};
use crate::script::{ScriptEnvironment, ScriptSource};

/// Host-side parameters for loading one script.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Name used when the script does not set `name`.
    pub fallback_name: String,
    /// `maxZoom` used when the script does not set one.
    pub default_max_zoom: u8,
    pub limits: ScriptLimits,
}

impl LoadOptions {
    pub fn new(fallback_name: impl Into<String>) -> Self {
        Self {
            fallback_name: fallback_name.into(),
            default_max_zoom: DEFAULT_MAX_ZOOM,
            limits: ScriptLimits::default(),
        }
    }

    pub fn from_settings(settings: &HostSettings, fallback_name: impl Into<String>) -> Self {
        Self {
            fallback_name: fallback_name.into(),
            default_max_zoom: settings.source.default_max_zoom,
            limits: settings.script.clone(),
        }
    }
}

/// A tile source defined by a user script.
///
/// Cheap to share between threads behind an `Arc`; URL building runs
/// concurrently and only the header hook is serialized.
pub struct ScriptMapSource<F: TileFetcher> {
    config: MapSourceConfig,
    resolver: TileRequestResolver,
    fetcher: F,
}

impl<F: TileFetcher> ScriptMapSource<F> {
    /// Loads `source`, extracts its configuration and detects its hooks.
    pub fn load(source: &ScriptSource, options: &LoadOptions, fetcher: F) -> Result<Self, LoadError> {
        let environment = ScriptEnvironment::load(source, &options.limits)?;
        let config = ConfigExtractor::new(
            &environment,
            options.fallback_name.clone(),
            options.default_max_zoom,
        )
        .extract()?;
        let resolver = TileRequestResolver::new(environment)?;

        info!(
            source = %config.name,
            tile_type = %config.tile_type,
            min_zoom = config.min_zoom,
            max_zoom = config.max_zoom,
            ignore_errors = config.ignore_errors,
            header_hook = ?resolver.header_hook(),
            "Loaded script map source"
        );

        Ok(Self {
            config,
            resolver,
            fetcher,
        })
    }

    /// Reads and loads a script file.
    pub fn load_file(
        path: impl AsRef<Path>,
        options: &LoadOptions,
        fetcher: F,
    ) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = ScriptSource::from_file(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&source, options, fetcher)
    }

    pub fn config(&self) -> &MapSourceConfig {
        &self.config
    }

    pub fn resolver(&self) -> &TileRequestResolver {
        &self.resolver
    }

    /// URL of a tile as the script builds it.
    pub fn build_url(&self, coord: TileCoord) -> Result<String, SourceError> {
        self.resolver.build_url(coord)
    }

    /// Resolves a connection for tile (minZoom, 0, 0) without downloading.
    ///
    /// Returns whether a connection could be obtained.
    pub fn test_connectivity(&self) -> bool {
        let coord = TileCoord::new(self.config.min_zoom, 0, 0);
        match self.resolver.resolve_connection(coord) {
            Ok(connection) => {
                debug!(source = %self.config.name, url = %connection.url(), "Connectivity check passed");
                true
            }
            Err(e) => {
                warn!(source = %self.config.name, error = %e, "Connectivity check failed");
                false
            }
        }
    }

    /// Applies the `ignoreErrors` policy to a failed request.
    fn tolerate<T>(&self, coord: TileCoord, error: SourceError) -> Result<Option<T>, SourceError> {
        if self.config.ignore_errors && error.is_tolerable() {
            debug!(
                source = %self.config.name,
                zoom = coord.zoom,
                x = coord.x,
                y = coord.y,
                error = %error,
                "Ignoring tile error"
            );
            Ok(None)
        } else {
            Err(error)
        }
    }

    fn decode(&self, coord: TileCoord, data: &[u8]) -> Result<Option<DynamicImage>, SourceError> {
        match image::load_from_memory(data) {
            Ok(image) => Ok(Some(image)),
            Err(e) => self.tolerate(coord, SourceError::Decode(e)),
        }
    }
}

impl<F: TileFetcher> TileSource for ScriptMapSource<F> {
    fn get_tile_data(
        &self,
        coord: TileCoord,
        load_method: LoadMethod,
    ) -> Result<Option<Vec<u8>>, SourceError> {
        match self.fetcher.fetch(&self.resolver, coord, load_method) {
            Ok(data) => Ok(data),
            Err(e) => self.tolerate(coord, e),
        }
    }

    fn get_tile_image(
        &self,
        coord: TileCoord,
        load_method: LoadMethod,
    ) -> Result<Option<DynamicImage>, SourceError> {
        let image = match self.get_tile_data(coord, load_method)? {
            Some(data) => self.decode(coord, &data)?,
            None => None,
        };

        match image {
            Some(image) => Ok(Some(image)),
            None if self.config.ignore_errors => Ok(Some(DynamicImage::ImageRgba8(
                placeholder_tile(self.config.tile_size, self.config.background_color),
            ))),
            None => Ok(None),
        }
    }

    fn get_tile_url_connection(&self, coord: TileCoord) -> Result<TileConnection, SourceError> {
        self.resolver.resolve_connection(coord)
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    fn min_zoom(&self) -> u8 {
        self.config.min_zoom
    }

    fn max_zoom(&self) -> u8 {
        self.config.max_zoom
    }

    fn tile_size(&self) -> u32 {
        self.config.tile_size
    }

    fn tile_type(&self) -> TileImageType {
        self.config.tile_type
    }

    fn tile_update(&self) -> TileUpdate {
        self.config.tile_update
    }

    fn hidden_default(&self) -> bool {
        self.config.hidden_default
    }
}
