//! TileScript CLI - Command-line interface
//!
//! Load scripted map tile sources, inspect their configuration and fetch
//! individual tiles.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tilescript::logging::init_console_logging;

use commands::check::CheckArgs;
use commands::common::CliContext;
use commands::fetch::{FetchArgs, LoadMethodArg};
use commands::url::UrlArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "tilescript")]
#[command(version, about = "Scripted web map tile sources", long_about = None)]
struct Cli {
    /// Host settings file (default: ~/.tilescript/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a script and print its resolved configuration
    Check {
        /// Script file
        script: PathBuf,

        /// Print the configuration as JSON
        #[arg(long)]
        json: bool,

        /// Also resolve a connection for the first tile
        #[arg(long)]
        connect: bool,
    },

    /// Print the URL and request headers for a tile
    Url {
        /// Script file
        script: PathBuf,
        zoom: u8,
        x: u32,
        y: u32,
    },

    /// Download a tile image and save it
    Fetch {
        /// Script file
        script: PathBuf,
        zoom: u8,
        x: u32,
        y: u32,

        /// Output image path (format from extension)
        #[arg(short, long)]
        output: PathBuf,

        /// Where tile data may come from
        #[arg(long, value_enum, default_value = "default")]
        load_method: LoadMethodArg,
    },
}

fn main() {
    let cli = Cli::parse();
    init_console_logging(cli.verbose);

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let context = CliContext::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            script,
            json,
            connect,
        } => commands::check::run(
            &context,
            CheckArgs {
                script,
                json,
                connect,
            },
        ),
        Commands::Url { script, zoom, x, y } => {
            commands::url::run(&context, UrlArgs { script, zoom, x, y })
        }
        Commands::Fetch {
            script,
            zoom,
            x,
            y,
            output,
            load_method,
        } => commands::fetch::run(
            &context,
            FetchArgs {
                script,
                zoom,
                x,
                y,
                output,
                load_method,
            },
        ),
    }
}
