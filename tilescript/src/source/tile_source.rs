//! The tile-access interface generic tile machinery consumes.

use image::DynamicImage;

use super::error::SourceError;
use super::types::{LoadMethod, TileImageType, TileUpdate};
use crate::coord::TileCoord;
use crate::provider::TileConnection;

/// A source of raster map tiles.
///
/// Implementations must be thread-safe so tiles can be requested from
/// several download threads at once.
pub trait TileSource: Send + Sync {
    /// Raw tile bytes, or `None` when no data is available.
    fn get_tile_data(
        &self,
        coord: TileCoord,
        load_method: LoadMethod,
    ) -> Result<Option<Vec<u8>>, SourceError>;

    /// Decoded tile image, or `None` when no image is available.
    fn get_tile_image(
        &self,
        coord: TileCoord,
        load_method: LoadMethod,
    ) -> Result<Option<DynamicImage>, SourceError>;

    /// Connection for the tile, with all request headers applied, without
    /// transferring any data.
    fn get_tile_url_connection(&self, coord: TileCoord) -> Result<TileConnection, SourceError>;

    /// Human-readable source name.
    fn name(&self) -> &str;

    fn min_zoom(&self) -> u8;

    fn max_zoom(&self) -> u8;

    /// Edge length of a tile in pixels.
    fn tile_size(&self) -> u32;

    fn tile_type(&self) -> TileImageType;

    fn tile_update(&self) -> TileUpdate;

    /// Whether the source is hidden from source lists by default.
    fn hidden_default(&self) -> bool;

    /// Check if this source supports the given zoom level.
    fn supports_zoom(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom() && zoom <= self.max_zoom()
    }
}
