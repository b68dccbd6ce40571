//! Solid-color placeholder tiles.
//!
//! When a source tolerates errors and a tile cannot be fetched, callers still
//! get an image: a square of the source's tile size filled with its
//! background color. Map viewers show a uniform gap instead of a hole.

use image::{Rgba, RgbaImage};

use super::color::Color;

/// Generate a `tile_size` × `tile_size` image where every pixel is `color`.
///
/// # Examples
///
/// ```
/// use tilescript::source::{placeholder_tile, Color};
///
/// let tile = placeholder_tile(256, Color::rgb(0, 0, 255));
/// assert_eq!(tile.dimensions(), (256, 256));
/// assert_eq!(tile.get_pixel(17, 200).0, [0, 0, 255, 255]);
/// ```
pub fn placeholder_tile(tile_size: u32, color: Color) -> RgbaImage {
    RgbaImage::from_pixel(tile_size, tile_size, Rgba(color.to_array()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_dimensions() {
        let tile = placeholder_tile(512, Color::BLACK);
        assert_eq!(tile.width(), 512);
        assert_eq!(tile.height(), 512);
    }

    #[test]
    fn test_placeholder_is_uniform() {
        let color = Color::rgba(10, 20, 30, 40);
        let tile = placeholder_tile(64, color);
        assert!(tile.pixels().all(|p| p.0 == [10, 20, 30, 40]));
    }

    #[test]
    fn test_default_background_is_opaque_black() {
        let tile = placeholder_tile(8, Color::default());
        assert!(tile.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }
}
