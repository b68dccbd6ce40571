//! Script-defined map tile sources
//!
//! A [`ScriptMapSource`] is built from a user script in three steps:
//!
//! 1. the script runs once in a fresh [`ScriptEnvironment`](crate::script::ScriptEnvironment);
//! 2. [`ConfigExtractor`] reads its bindings into a [`MapSourceConfig`];
//! 3. [`TileRequestResolver`] checks which functions it defines.
//!
//! After that the source answers tile requests through the [`TileSource`]
//! trait, applying the script's `ignoreErrors` policy and rendering
//! placeholder tiles where needed.
//!
//! # Example
//!
//! ```ignore
//! use tilescript::provider::{ReqwestClient, RetryingFetcher};
//! use tilescript::script::ScriptSource;
//! use tilescript::source::{LoadOptions, ScriptMapSource, SourceNamer, TileSource};
//!
//! let namer = SourceNamer::new();
//! let fetcher = RetryingFetcher::new(ReqwestClient::new()?);
//! let source = ScriptMapSource::load_file("osm.rhai", &LoadOptions::new(namer.next_name()), fetcher)?;
//! let image = source.get_tile_image(TileCoord::new(3, 1, 2), LoadMethod::Default)?;
//! ```

mod classifier;
mod color;
mod error;
mod extractor;
mod naming;
mod pipeline;
mod placeholder;
mod resolver;
mod tile_source;
mod types;

pub use classifier::{ErrorClassifier, HEADER_HOOK_NAME};
pub use color::{parse_color, Color, ColorParseError};
pub use error::{ConfigError, LoadError, SourceError};
pub use extractor::{ConfigExtractor, MapSourceConfig, DEFAULT_TILE_SIZE, MAX_TILE_SIZE};
pub use naming::SourceNamer;
pub use pipeline::{LoadOptions, ScriptMapSource};
pub use placeholder::placeholder_tile;
pub use resolver::{HeaderHook, TileRequestResolver, CONNECTION_BINDING, URL_FUNCTION_NAME};
pub use tile_source::TileSource;
pub use types::{LoadMethod, MapSpaceType, TileImageType, TileUpdate};
