//! TileScript - Script-defined web map tile sources
//!
//! This library lets users describe a web map tile server in a small
//! [Rhai](https://rhai.rs) script (URL pattern, zoom range, tile format,
//! request headers) and use it as a regular tile source: build URLs,
//! fetch tile bytes, decode images and render placeholders on failure.

pub mod config;
pub mod coord;
pub mod logging;
pub mod provider;
pub mod script;
pub mod source;
