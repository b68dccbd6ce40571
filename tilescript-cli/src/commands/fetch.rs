//! Fetch command - download one tile image to a file.

use std::path::PathBuf;
use std::time::Instant;

use clap::ValueEnum;
use tracing::info;

use tilescript::source::{LoadMethod, TileSource};

use super::common::{tile_coord, CliContext};
use crate::error::CliError;

/// Where tile data may come from.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LoadMethodArg {
    /// Cache first, then the network
    Default,
    /// Cache only (no cache is attached, so this yields no data)
    Cache,
    /// Always the network
    Source,
}

impl From<LoadMethodArg> for LoadMethod {
    fn from(arg: LoadMethodArg) -> Self {
        match arg {
            LoadMethodArg::Default => LoadMethod::Default,
            LoadMethodArg::Cache => LoadMethod::Cache,
            LoadMethodArg::Source => LoadMethod::Source,
        }
    }
}

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub script: PathBuf,
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
    pub output: PathBuf,
    pub load_method: LoadMethodArg,
}

/// Run the fetch command.
pub fn run(context: &CliContext, args: FetchArgs) -> Result<(), CliError> {
    let coord = tile_coord(args.zoom, args.x, args.y)?;
    let source = context.load_source(&args.script)?;

    println!("Fetching tile {} from {}", coord, source.name());
    let start = Instant::now();

    let image = source
        .get_tile_image(coord, args.load_method.into())?
        .ok_or(CliError::NoTile(coord))?;

    info!(
        tile = %coord,
        width = image.width(),
        height = image.height(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Tile fetched"
    );

    image.save(&args.output).map_err(|error| CliError::FileWrite {
        path: args.output.clone(),
        error,
    })?;
    println!(
        "Saved {}x{} image to {}",
        image.width(),
        image.height(),
        args.output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tilescript::config::HostSettings;

    fn write_script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("source.rhai");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_cache_only_fetch_saves_placeholder() {
        let temp = TempDir::new().unwrap();
        let script = write_script(
            &temp,
            r##"
                let tileType = "png";
                let tileSize = 32;
                let ignoreErrors = true;
                let backgroundColor = "#0000ff";
                fn getTileUrl(zoom, x, y) { "http://127.0.0.1:9/" + zoom }
            "##,
        );
        let output = temp.path().join("tile.png");

        let context = CliContext::with_settings(HostSettings::default());
        run(
            &context,
            FetchArgs {
                script,
                zoom: 2,
                x: 1,
                y: 1,
                output: output.clone(),
                load_method: LoadMethodArg::Cache,
            },
        )
        .unwrap();

        let saved = image::open(&output).unwrap().to_rgba8();
        assert_eq!(saved.dimensions(), (32, 32));
        assert_eq!(saved.get_pixel(5, 5).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_cache_only_fetch_without_ignore_errors_has_no_tile() {
        let temp = TempDir::new().unwrap();
        let script = write_script(
            &temp,
            "let tileType = \"png\";\nfn getTileUrl(zoom, x, y) { \"http://127.0.0.1:9/\" }\n",
        );

        let context = CliContext::with_settings(HostSettings::default());
        let result = run(
            &context,
            FetchArgs {
                script,
                zoom: 0,
                x: 0,
                y: 0,
                output: temp.path().join("tile.png"),
                load_method: LoadMethodArg::Cache,
            },
        );
        assert!(matches!(result, Err(CliError::NoTile(_))));
    }

    #[test]
    fn test_out_of_grid_tile_rejected() {
        let temp = TempDir::new().unwrap();
        let context = CliContext::with_settings(HostSettings::default());
        let result = run(
            &context,
            FetchArgs {
                script: temp.path().join("unused.rhai"),
                zoom: 1,
                x: 5,
                y: 0,
                output: temp.path().join("tile.png"),
                load_method: LoadMethodArg::Default,
            },
        );
        assert!(matches!(result, Err(CliError::InvalidTile(_))));
    }
}
