//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`check`] - Load a script and print its resolved configuration
//! - [`url`] - Show the URL and request headers for one tile
//! - [`fetch`] - Download one tile image to a file

pub mod check;
pub mod common;
pub mod fetch;
pub mod url;
