//! Reads a source's configuration out of a loaded script.

use rhai::{Dynamic, INT};
use serde::Serialize;
use tracing::{debug, warn};

use super::color::{parse_color, Color};
use super::error::ConfigError;
use super::types::{MapSpaceType, TileImageType, TileUpdate};
use crate::coord::MAX_ZOOM;
use crate::script::ScriptEnvironment;

/// Edge length of a tile when the script does not set `tileSize`.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Largest accepted `tileSize`. Placeholders are allocated at this size.
pub const MAX_TILE_SIZE: u32 = 4096;

const NAME: &[&str] = &["name"];
const MAP_SPACE: &[&str] = &["mapSpaceType", "projection"];
const TILE_SIZE: &[&str] = &["tileSize"];
const MIN_ZOOM: &[&str] = &["minZoom"];
const MAX_ZOOM_KEY: &[&str] = &["maxZoom"];
const TILE_TYPE: &[&str] = &["tileType"];
const TILE_UPDATE: &[&str] = &["tileUpdate", "updatePolicy"];
const IGNORE_ERRORS: &[&str] = &["ignoreError", "ignoreErrors"];
const BACKGROUND_COLOR: &[&str] = &["backgroundColor"];
const HIDDEN_DEFAULT: &[&str] = &["hiddenDefault"];

/// Resolved configuration of a script map source.
///
/// Fixed after load; never changes for the lifetime of the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSourceConfig {
    pub name: String,
    pub map_space: MapSpaceType,
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub tile_type: TileImageType,
    pub tile_update: TileUpdate,
    pub ignore_errors: bool,
    pub background_color: Color,
    pub hidden_default: bool,
}

/// Applies defaults and type coercion to the bindings of a loaded script.
pub struct ConfigExtractor<'a> {
    environment: &'a ScriptEnvironment,
    fallback_name: String,
    default_max_zoom: u8,
}

impl<'a> ConfigExtractor<'a> {
    /// `fallback_name` is used when the script has no `name`;
    /// `default_max_zoom` when it has no `maxZoom`.
    pub fn new(
        environment: &'a ScriptEnvironment,
        fallback_name: impl Into<String>,
        default_max_zoom: u8,
    ) -> Self {
        Self {
            environment,
            fallback_name: fallback_name.into(),
            default_max_zoom,
        }
    }

    pub fn extract(&self) -> Result<MapSourceConfig, ConfigError> {
        let tile_type = self.tile_type()?;

        let name = match self.lookup(NAME) {
            Some((key, value)) => read_string(key, value)?,
            None => self.fallback_name.clone(),
        };

        let map_space = match self.lookup(MAP_SPACE) {
            Some((key, value)) => read_enum::<MapSpaceType>(key, value, "MapSpaceType")?,
            None => MapSpaceType::default(),
        };

        let tile_size = match self.lookup(TILE_SIZE) {
            Some((key, value)) => read_tile_size(key, value)?,
            None => DEFAULT_TILE_SIZE,
        };

        let min_zoom = match self.lookup(MIN_ZOOM) {
            Some((key, value)) => read_zoom(key, value)?,
            None => 0,
        };
        let max_zoom = match self.lookup(MAX_ZOOM_KEY) {
            Some((key, value)) => read_zoom(key, value)?,
            None => self.default_max_zoom,
        };
        if min_zoom > max_zoom {
            return Err(ConfigError::ZoomRange {
                min: min_zoom,
                max: max_zoom,
            });
        }

        let tile_update = match self.lookup(TILE_UPDATE) {
            Some((key, value)) => read_enum::<TileUpdate>(key, value, "TileUpdate")?,
            None => TileUpdate::default(),
        };

        let ignore_errors = match self.lookup(IGNORE_ERRORS) {
            Some((key, value)) => read_bool(key, value)?,
            None => false,
        };

        let background_color = match self.lookup(BACKGROUND_COLOR) {
            Some((key, value)) => parse_color(&read_string(key, value)?)?,
            None => Color::BLACK,
        };

        let hidden_default = match self.lookup(HIDDEN_DEFAULT) {
            Some((key, value)) => match read_bool(key, value) {
                Ok(flag) => flag,
                Err(e) => {
                    warn!(source = %name, error = %e, "Ignoring hiddenDefault");
                    false
                }
            },
            None => false,
        };

        let config = MapSourceConfig {
            name,
            map_space,
            tile_size,
            min_zoom,
            max_zoom,
            tile_type,
            tile_update,
            ignore_errors,
            background_color,
            hidden_default,
        };
        debug!(config = ?config, "Extracted script configuration");
        Ok(config)
    }

    fn tile_type(&self) -> Result<TileImageType, ConfigError> {
        let (key, value) = self
            .lookup(TILE_TYPE)
            .ok_or(ConfigError::MissingTileType)?;
        let name = read_string(key, value)?;
        TileImageType::from_name(&name).ok_or(ConfigError::UnknownTileType(name))
    }

    /// First alias that is bound wins; later aliases are only consulted
    /// when the earlier ones are absent.
    fn lookup(&self, aliases: &[&'static str]) -> Option<(&'static str, Dynamic)> {
        aliases
            .iter()
            .find_map(|key| self.environment.get(key).map(|value| (*key, value)))
    }
}

fn invalid_type(key: &'static str, expected: &'static str, value: &Dynamic) -> ConfigError {
    ConfigError::InvalidType {
        key,
        expected,
        actual: value.type_name().to_string(),
    }
}

fn read_string(key: &'static str, value: Dynamic) -> Result<String, ConfigError> {
    if value.is_string() {
        value
            .into_string()
            .map_err(|actual| ConfigError::InvalidType {
                key,
                expected: "string",
                actual: actual.to_string(),
            })
    } else {
        Err(invalid_type(key, "string", &value))
    }
}

fn read_int(key: &'static str, value: &Dynamic) -> Result<INT, ConfigError> {
    value.as_int().map_err(|_| invalid_type(key, "integer", value))
}

fn read_tile_size(key: &'static str, value: Dynamic) -> Result<u32, ConfigError> {
    let size = read_int(key, &value)?;
    u32::try_from(size)
        .ok()
        .filter(|s| (1..=MAX_TILE_SIZE).contains(s))
        .ok_or_else(|| ConfigError::InvalidValue {
            key,
            reason: format!("{} is outside 1-{}", size, MAX_TILE_SIZE),
        })
}

fn read_zoom(key: &'static str, value: Dynamic) -> Result<u8, ConfigError> {
    let zoom = read_int(key, &value)?;
    u8::try_from(zoom)
        .ok()
        .filter(|z| *z <= MAX_ZOOM)
        .ok_or_else(|| ConfigError::InvalidValue {
            key,
            reason: format!("{} is outside 0-{}", zoom, MAX_ZOOM),
        })
}

/// Booleans are taken as-is; strings are true only if they spell `true`
/// in any case.
fn read_bool(key: &'static str, value: Dynamic) -> Result<bool, ConfigError> {
    if let Ok(flag) = value.as_bool() {
        return Ok(flag);
    }
    if value.is_string() {
        return Ok(read_string(key, value)?.trim().eq_ignore_ascii_case("true"));
    }
    Err(invalid_type(key, "boolean or string", &value))
}

/// Accepts the preamble constant or its name as a string.
fn read_enum<T>(
    key: &'static str,
    value: Dynamic,
    type_name: &'static str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = String> + Clone + Send + Sync + 'static,
{
    if value.is::<T>() {
        return value
            .try_cast::<T>()
            .ok_or_else(|| ConfigError::InvalidType {
                key,
                expected: type_name,
                actual: type_name.to_string(),
            });
    }
    if value.is_string() {
        let text = read_string(key, value)?;
        return text
            .parse::<T>()
            .map_err(|reason| ConfigError::InvalidValue { key, reason });
    }
    Err(invalid_type(key, type_name, &value))
}
