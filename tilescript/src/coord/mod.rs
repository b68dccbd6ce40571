//! Tile coordinate types
//!
//! Addresses a single raster tile in a Web Mercator style tiling pyramid as
//! a `(zoom, x, y)` triple, the form user scripts receive in `getTileUrl`.

use std::fmt;

/// Largest zoom level a tile coordinate can address.
///
/// Quadkeys and column/row counts stay within `u32` up to this level.
pub const MAX_ZOOM: u8 = 30;

/// A tile coordinate within the tiling pyramid.
///
/// `x` is the column (west to east), `y` the row (north to south).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level
    pub zoom: u8,
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    pub fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// Number of tiles along one axis at this coordinate's zoom level.
    #[inline]
    pub fn tiles_per_axis(&self) -> u64 {
        1u64 << self.zoom.min(MAX_ZOOM)
    }

    /// Returns true if `x` and `y` lie inside the pyramid at this zoom.
    pub fn is_within_bounds(&self) -> bool {
        self.zoom <= MAX_ZOOM
            && u64::from(self.x) < self.tiles_per_axis()
            && u64::from(self.y) < self.tiles_per_axis()
    }

    /// Row index counted from the south edge, as used by TMS servers.
    pub fn tms_y(&self) -> u32 {
        (self.tiles_per_axis() - 1 - u64::from(self.y).min(self.tiles_per_axis() - 1)) as u32
    }

    /// Bing-style quadtree key for this tile.
    ///
    /// One base-4 digit per zoom level, most significant first. Zoom 0 is
    /// the empty string.
    pub fn quadkey(&self) -> String {
        let mut key = String::with_capacity(self.zoom as usize);
        for level in (1..=self.zoom).rev() {
            let mask = 1u32 << (level - 1);
            let mut digit = b'0';
            if self.x & mask != 0 {
                digit += 1;
            }
            if self.y & mask != 0 {
                digit += 2;
            }
            key.push(digit as char);
        }
        key
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_zoom_x_y() {
        assert_eq!(TileCoord::new(3, 1, 2).to_string(), "3/1/2");
    }

    #[test]
    fn test_quadkey_known_values() {
        // Values from the Bing Maps tile system documentation
        assert_eq!(TileCoord::new(3, 3, 5).quadkey(), "213");
        assert_eq!(TileCoord::new(1, 0, 0).quadkey(), "0");
        assert_eq!(TileCoord::new(1, 1, 1).quadkey(), "3");
        assert_eq!(TileCoord::new(0, 0, 0).quadkey(), "");
    }

    #[test]
    fn test_tms_y_flips_rows() {
        assert_eq!(TileCoord::new(1, 0, 0).tms_y(), 1);
        assert_eq!(TileCoord::new(1, 0, 1).tms_y(), 0);
        assert_eq!(TileCoord::new(3, 0, 2).tms_y(), 5);
        assert_eq!(TileCoord::new(0, 0, 0).tms_y(), 0);
    }

    #[test]
    fn test_bounds() {
        assert!(TileCoord::new(0, 0, 0).is_within_bounds());
        assert!(TileCoord::new(2, 3, 3).is_within_bounds());
        assert!(!TileCoord::new(2, 4, 0).is_within_bounds());
        assert!(!TileCoord::new(31, 0, 0).is_within_bounds());
    }

    #[test]
    fn test_quadkey_length_matches_zoom() {
        for zoom in 0..=20u8 {
            let coord = TileCoord::new(zoom, 0, 0);
            assert_eq!(coord.quadkey().len(), zoom as usize);
        }
    }
}
