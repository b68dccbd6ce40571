//! Host symbols every script can use without importing anything.
//!
//! Registered before user code is compiled:
//!
//! - the `TileConnection` type handed to `addHeaders(conn)`
//! - `TileUpdate::*` and `MapSpaceType::*` constants
//! - `quadkey(zoom, x, y)` and `tms_y(zoom, y)` URL helpers
//!
//! `print` and `debug` output from scripts goes to `tracing`.

use rhai::{Dynamic, Engine, EvalAltResult, Module, INT};
use tracing::{debug, info};

use crate::config::ScriptLimits;
use crate::coord::{TileCoord, MAX_ZOOM};
use crate::provider::{TileConnection, CONNECTION_TYPE_NAME};
use crate::source::{MapSpaceType, TileUpdate};

const SCRIPT_LOG_TARGET: &str = "tilescript::script";

/// Creates an engine with resource limits and all host symbols registered.
pub(crate) fn build_engine(limits: &ScriptLimits) -> Engine {
    let mut engine = Engine::new();
    engine.set_max_operations(limits.max_operations);
    engine.set_max_call_levels(limits.max_call_levels);

    engine.on_print(|text| info!(target: SCRIPT_LOG_TARGET, "{}", text));
    engine.on_debug(|text, _source, pos| {
        debug!(target: SCRIPT_LOG_TARGET, position = %pos, "{}", text)
    });

    register_connection(&mut engine);
    register_enums(&mut engine);
    register_helpers(&mut engine);
    engine
}

fn register_connection(engine: &mut Engine) {
    engine
        .register_type_with_name::<TileConnection>(CONNECTION_TYPE_NAME)
        .register_get("url", |conn: &mut TileConnection| conn.url().to_string())
        .register_get("id", |conn: &mut TileConnection| conn.id() as INT)
        .register_fn(
            "set_header",
            |conn: &mut TileConnection, name: &str, value: &str| conn.set_header(name, value),
        )
        .register_fn(
            "add_header",
            |conn: &mut TileConnection, name: &str, value: &str| conn.add_header(name, value),
        )
        .register_fn("remove_header", |conn: &mut TileConnection, name: &str| {
            conn.remove_header(name)
        })
        .register_fn("header", |conn: &mut TileConnection, name: &str| {
            conn.header(name).map(Dynamic::from).unwrap_or(Dynamic::UNIT)
        })
        .register_fn("to_string", |conn: &mut TileConnection| {
            format!("{}({})", CONNECTION_TYPE_NAME, conn.url())
        });
}

fn register_enums(engine: &mut Engine) {
    engine
        .register_type_with_name::<TileUpdate>("TileUpdate")
        .register_fn("to_string", |value: &mut TileUpdate| {
            value.script_name().to_string()
        })
        .register_type_with_name::<MapSpaceType>("MapSpaceType")
        .register_fn("to_string", |value: &mut MapSpaceType| {
            value.script_name().to_string()
        });

    let mut tile_update = Module::new();
    for (name, value) in TileUpdate::SCRIPT_NAMES {
        tile_update.set_var(name, value);
    }
    engine.register_static_module("TileUpdate", tile_update.into());

    let mut map_space = Module::new();
    for (name, value) in MapSpaceType::SCRIPT_NAMES {
        map_space.set_var(name, value);
    }
    engine.register_static_module("MapSpaceType", map_space.into());
}

fn register_helpers(engine: &mut Engine) {
    engine
        .register_fn(
            "quadkey",
            |zoom: INT, x: INT, y: INT| -> Result<String, Box<EvalAltResult>> {
                Ok(script_coord(zoom, x, y)?.quadkey())
            },
        )
        .register_fn(
            "tms_y",
            |zoom: INT, y: INT| -> Result<INT, Box<EvalAltResult>> {
                Ok(script_coord(zoom, 0, y)?.tms_y() as INT)
            },
        );
}

fn script_coord(zoom: INT, x: INT, y: INT) -> Result<TileCoord, Box<EvalAltResult>> {
    let zoom = u8::try_from(zoom)
        .ok()
        .filter(|z| *z <= MAX_ZOOM)
        .ok_or_else(|| format!("zoom {} out of range 0-{}", zoom, MAX_ZOOM))?;
    let x = u32::try_from(x).map_err(|_| format!("tile x {} out of range", x))?;
    let y = u32::try_from(y).map_err(|_| format!("tile y {} out of range", y))?;
    Ok(TileCoord::new(zoom, x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        build_engine(&ScriptLimits::default())
    }

    #[test]
    fn test_quadkey_helper() {
        let key: String = engine().eval("quadkey(3, 3, 5)").unwrap();
        assert_eq!(key, "213");
    }

    #[test]
    fn test_quadkey_rejects_negative() {
        let result = engine().eval::<String>("quadkey(3, -1, 5)");
        assert!(result.is_err());
    }

    #[test]
    fn test_tms_y_helper() {
        let y: INT = engine().eval("tms_y(3, 2)").unwrap();
        assert_eq!(y, 5);
    }

    #[test]
    fn test_enum_constants_available() {
        let update: TileUpdate = engine().eval("TileUpdate::IfNoneMatch").unwrap();
        assert_eq!(update, TileUpdate::IfNoneMatch);

        let space: MapSpaceType = engine().eval("MapSpaceType::msMercatorEllipsoidal").unwrap();
        assert_eq!(space, MapSpaceType::MercatorEllipsoidal);
    }

    #[test]
    fn test_connection_methods_mutate_shared_headers() {
        let engine = engine();
        let conn = TileConnection::open(42, "https://tiles.example.com/1/0/0").unwrap();
        let mut scope = rhai::Scope::new();
        scope.push("conn", conn.clone());

        let id: INT = engine
            .eval_with_scope(
                &mut scope,
                r#"
                    conn.set_header("Referer", "https://example.com/");
                    conn.add_header("X-Tag", "a");
                    conn.add_header("X-Tag", "b");
                    conn.id
                "#,
            )
            .unwrap();

        assert_eq!(id, 42);
        assert_eq!(conn.header("Referer").as_deref(), Some("https://example.com/"));
        assert_eq!(conn.header_values("X-Tag"), vec!["a", "b"]);
    }

    #[test]
    fn test_connection_header_lookup_returns_unit_when_missing() {
        let engine = engine();
        let mut scope = rhai::Scope::new();
        scope.push("conn", TileConnection::open(1, "https://h/0/0/0").unwrap());

        let missing: bool = engine
            .eval_with_scope(&mut scope, r#"type_of(conn.header("Cookie")) == "()""#)
            .unwrap();
        assert!(missing);

        let url: String = engine.eval_with_scope(&mut scope, "conn.url").unwrap();
        assert_eq!(url, "https://h/0/0/0");
    }

    #[test]
    fn test_operation_limit_enforced() {
        let engine = build_engine(&ScriptLimits {
            max_operations: 1_000,
            max_call_levels: 8,
        });
        let result = engine.eval::<INT>("let x = 0; loop { x += 1; }");
        assert!(result.is_err());
    }
}
