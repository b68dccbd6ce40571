//! Embedded script evaluation
//!
//! User scripts are written in [Rhai](https://rhai.rs). A script defines
//! top-level variables (`name`, `tileType`, `maxZoom`, ...) and functions
//! (`getTileUrl(zoom, x, y)`, optionally `addHeaders(conn)`):
//!
//! ```text
//! let name = "OpenStreetMap";
//! let tileType = "png";
//! let maxZoom = 19;
//! const REFERER = "https://www.openstreetmap.org/";
//!
//! fn getTileUrl(zoom, x, y) {
//!     "https://tile.openstreetmap.org/" + zoom + "/" + x + "/" + y + ".png"
//! }
//!
//! fn addHeaders(conn) {
//!     conn.set_header("Referer", global::REFERER);
//! }
//! ```
//!
//! Functions read top-level variables through the `global::` namespace.

mod environment;
mod error;
mod preamble;

pub use environment::{
    CompiledCall, FunctionSignature, Namespace, ScriptEnvironment, ScriptSource,
};
pub use error::ScriptError;
