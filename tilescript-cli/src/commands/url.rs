//! Url command - show the request a tile would be fetched with.

use std::path::PathBuf;

use tilescript::source::TileSource;

use super::common::{tile_coord, CliContext};
use crate::error::CliError;

/// Arguments for the url command.
pub struct UrlArgs {
    pub script: PathBuf,
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

/// Run the url command.
pub fn run(context: &CliContext, args: UrlArgs) -> Result<(), CliError> {
    let coord = tile_coord(args.zoom, args.x, args.y)?;
    let source = context.load_source(&args.script)?;

    if !source.supports_zoom(coord.zoom) {
        eprintln!(
            "Warning: zoom {} is outside the source's range {}-{}",
            coord.zoom,
            source.min_zoom(),
            source.max_zoom()
        );
    }

    let connection = source.get_tile_url_connection(coord)?;
    println!("{}", connection.url());
    for (name, value) in connection.headers() {
        println!("  {}: {}", name, value);
    }

    Ok(())
}
