//! Check command - load a script and report its configuration.

use std::path::PathBuf;

use tilescript::script::FunctionSignature;
use tilescript::source::{HeaderHook, MapSourceConfig, TileSource};

use super::common::CliContext;
use crate::error::CliError;

/// Arguments for the check command.
pub struct CheckArgs {
    pub script: PathBuf,
    pub json: bool,
    pub connect: bool,
}

/// Run the check command.
pub fn run(context: &CliContext, args: CheckArgs) -> Result<(), CliError> {
    let source = context.load_source(&args.script)?;
    let config = source.config();

    if args.json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        let functions = source.resolver().environment().functions();
        print_config(config, source.resolver().header_hook(), &functions);
    }

    if args.connect {
        if !source.test_connectivity() {
            return Err(CliError::Connectivity(source.name().to_string()));
        }
        if !args.json {
            println!();
            println!("Connectivity: OK (zoom {} tile 0/0)", source.min_zoom());
        }
    }

    Ok(())
}

fn print_config(
    config: &MapSourceConfig,
    header_hook: HeaderHook,
    functions: &[FunctionSignature],
) {
    println!("Source: {}", config.name);
    println!("  Map space:        {}", config.map_space);
    println!(
        "  Tile type:        {} ({})",
        config.tile_type,
        config.tile_type.mime_type()
    );
    println!("  Tile size:        {}px", config.tile_size);
    println!("  Zoom range:       {}-{}", config.min_zoom, config.max_zoom);
    println!("  Tile update:      {}", config.tile_update);
    println!("  Ignore errors:    {}", config.ignore_errors);
    println!("  Background color: {}", config.background_color);
    println!("  Hidden default:   {}", config.hidden_default);
    println!(
        "  Header hook:      {}",
        match header_hook {
            HeaderHook::Present => "addHeaders(conn)",
            HeaderHook::Absent => "none",
        }
    );
    println!("  Functions:        {}", format_functions(functions));
}

/// Renders signatures as `name/arity`, comma separated.
fn format_functions(functions: &[FunctionSignature]) -> String {
    functions
        .iter()
        .map(|f| format!("{}/{}", f.name, f.arity))
        .collect::<Vec<_>>()
        .join(", ")
}
