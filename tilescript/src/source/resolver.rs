//! Turns tile coordinates into ready-to-send connections.
//!
//! URL building runs on private copies of the script namespace and never
//! blocks. The header hook needs the connection bound into the shared
//! namespace, so bind-then-call holds the namespace lock and the binding is
//! gone once the lock is released. Network I/O happens outside the lock.

use std::sync::atomic::{AtomicU64, Ordering};

use rhai::{Dynamic, INT};
use tracing::{debug, error, trace};

use super::classifier::{ErrorClassifier, HEADER_HOOK_NAME};
use super::error::{LoadError, SourceError};
use crate::coord::TileCoord;
use crate::provider::{ConnectionSource, TileConnection};
use crate::script::{CompiledCall, ScriptEnvironment, ScriptError};

/// Name of the mandatory URL function.
pub const URL_FUNCTION_NAME: &str = "getTileUrl";

/// Variable the connection is bound to before the header hook runs.
pub const CONNECTION_BINDING: &str = "conn";

/// Whether the script defines `addHeaders(conn)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderHook {
    Absent,
    Present,
}

/// Builds URLs and connections by calling into the script.
pub struct TileRequestResolver {
    environment: ScriptEnvironment,
    header_hook: HeaderHook,
    hook_call: CompiledCall,
    classifier: ErrorClassifier,
    next_connection_id: AtomicU64,
}

impl TileRequestResolver {
    /// Detects the script's capabilities and precompiles the hook call.
    ///
    /// Fails if `getTileUrl(zoom, x, y)` is not defined.
    pub fn new(environment: ScriptEnvironment) -> Result<Self, LoadError> {
        if !environment.has_function(URL_FUNCTION_NAME, 3) {
            return Err(LoadError::MissingFunction(format!(
                "{}(zoom, x, y)",
                URL_FUNCTION_NAME
            )));
        }

        let header_hook = if environment.has_function(HEADER_HOOK_NAME, 1) {
            HeaderHook::Present
        } else {
            HeaderHook::Absent
        };
        let hook_call =
            environment.compile_call(&format!("{}({})", HEADER_HOOK_NAME, CONNECTION_BINDING))?;

        Ok(Self {
            environment,
            header_hook,
            hook_call,
            classifier: ErrorClassifier::header_hook(),
            next_connection_id: AtomicU64::new(1),
        })
    }

    pub fn environment(&self) -> &ScriptEnvironment {
        &self.environment
    }

    pub fn header_hook(&self) -> HeaderHook {
        self.header_hook
    }

    /// Calls `getTileUrl(zoom, x, y)`.
    ///
    /// Errors and non-string results are URL function failures.
    pub fn build_url(&self, coord: TileCoord) -> Result<String, SourceError> {
        let args = (coord.zoom as INT, coord.x as INT, coord.y as INT);
        let value: Dynamic = self
            .environment
            .call_fn(URL_FUNCTION_NAME, args)
            .map_err(|e| {
                error!(tile = %coord, error = %e, "Tile URL function failed");
                SourceError::UrlFunction(e)
            })?;

        let actual = value.type_name();
        value.into_string().map_err(|_| {
            error!(tile = %coord, returned = actual, "Tile URL function returned a non-string");
            SourceError::UrlFunction(ScriptError::ReturnType {
                function: URL_FUNCTION_NAME.to_string(),
                expected: "string",
                actual: actual.to_string(),
            })
        })
    }

    /// Builds the URL, opens a connection to it and runs the header hook.
    pub fn resolve_connection(&self, coord: TileCoord) -> Result<TileConnection, SourceError> {
        let url = self.build_url(coord)?;
        let id = self.next_connection_id.fetch_add(1, Ordering::Relaxed);
        let connection = TileConnection::open(id, &url)?;

        if self.header_hook == HeaderHook::Present {
            self.apply_header_hook(coord, &connection)?;
        }

        trace!(
            tile = %coord,
            url = %connection.url(),
            headers = connection.headers().len(),
            "Resolved tile connection"
        );
        Ok(connection)
    }

    fn apply_header_hook(
        &self,
        coord: TileCoord,
        connection: &TileConnection,
    ) -> Result<(), SourceError> {
        let result = self.environment.lock().eval_with(
            CONNECTION_BINDING,
            connection.clone(),
            &self.hook_call,
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if self.classifier.is_hook_absent(&e) => {
                debug!(tile = %coord, "Header hook not defined");
                Ok(())
            }
            Err(e) => {
                error!(tile = %coord, url = %connection.url(), error = %e, "Header hook failed");
                Err(SourceError::Hook(e))
            }
        }
    }
}

impl ConnectionSource for TileRequestResolver {
    fn open_connection(&self, coord: TileCoord) -> Result<TileConnection, SourceError> {
        self.resolve_connection(coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScriptLimits;
    use crate::provider::ProviderError;
    use crate::script::ScriptSource;

    fn resolver(text: &str) -> TileRequestResolver {
        let env =
            ScriptEnvironment::load(&ScriptSource::new(text), &ScriptLimits::default()).unwrap();
        TileRequestResolver::new(env).unwrap()
    }

    const URL_ONLY: &str = r#"
        fn getTileUrl(zoom, x, y) { "http://h/" + zoom + "/" + x + "/" + y }
    "#;

    #[test]
    fn test_build_url() {
        let resolver = resolver(URL_ONLY);
        assert_eq!(
            resolver.build_url(TileCoord::new(3, 1, 2)).unwrap(),
            "http://h/3/1/2"
        );
    }

    #[test]
    fn test_missing_url_function_fails_load() {
        let env = ScriptEnvironment::load(
            &ScriptSource::new(r#"let tileType = "png";"#),
            &ScriptLimits::default(),
        )
        .unwrap();
        let result = TileRequestResolver::new(env);
        assert!(matches!(result, Err(LoadError::MissingFunction(_))));
    }

    #[test]
    fn test_wrong_arity_url_function_fails_load() {
        let env = ScriptEnvironment::load(
            &ScriptSource::new(r#"fn getTileUrl(zoom, x) { "" }"#),
            &ScriptLimits::default(),
        )
        .unwrap();
        assert!(TileRequestResolver::new(env).is_err());
    }

    #[test]
    fn test_url_function_error_is_url_failure() {
        let resolver = resolver(r#"fn getTileUrl(zoom, x, y) { throw "no tiles here"; }"#);
        let result = resolver.build_url(TileCoord::new(1, 0, 0));
        assert!(matches!(result, Err(SourceError::UrlFunction(ScriptError::Eval(_)))));
    }

    #[test]
    fn test_url_function_non_string_is_url_failure() {
        let resolver = resolver(r#"fn getTileUrl(zoom, x, y) { zoom + x + y }"#);
        let result = resolver.build_url(TileCoord::new(1, 0, 0));
        assert!(matches!(
            result,
            Err(SourceError::UrlFunction(ScriptError::ReturnType { .. }))
        ));
    }

    #[test]
    fn test_resolve_without_hook() {
        let resolver = resolver(URL_ONLY);
        assert_eq!(resolver.header_hook(), HeaderHook::Absent);

        let conn = resolver.resolve_connection(TileCoord::new(3, 1, 2)).unwrap();
        assert_eq!(conn.url().as_str(), "http://h/3/1/2");
        assert!(conn.headers().is_empty());
    }

    #[test]
    fn test_resolve_with_hook_applies_headers() {
        let resolver = resolver(
            r#"
                fn getTileUrl(zoom, x, y) { `https://tiles.example.com/${zoom}/${x}/${y}.png` }
                fn addHeaders(conn) {
                    conn.set_header("Referer", "https://example.com/");
                    conn.set_header("X-Url", conn.url);
                }
            "#,
        );
        assert_eq!(resolver.header_hook(), HeaderHook::Present);

        let conn = resolver.resolve_connection(TileCoord::new(5, 4, 3)).unwrap();
        assert_eq!(conn.header("Referer").as_deref(), Some("https://example.com/"));
        assert_eq!(
            conn.header("X-Url").as_deref(),
            Some("https://tiles.example.com/5/4/3.png")
        );
    }

    #[test]
    fn test_hook_and_url_function_read_global_constants() {
        let resolver = resolver(
            r#"
                const BASE = "https://tiles.example.com/";
                const REFERER = "https://example.com/map";
                fn getTileUrl(zoom, x, y) { global::BASE + zoom + "/" + x + "/" + y }
                fn addHeaders(conn) { conn.set_header("Referer", global::REFERER); }
            "#,
        );

        let conn = resolver.resolve_connection(TileCoord::new(2, 1, 3)).unwrap();
        assert_eq!(conn.url().as_str(), "https://tiles.example.com/2/1/3");
        assert_eq!(conn.header("Referer").as_deref(), Some("https://example.com/map"));
    }

    #[test]
    fn test_connection_binding_removed_after_hook() {
        let resolver = resolver(
            r#"
                fn getTileUrl(zoom, x, y) { "http://h/" + zoom }
                fn addHeaders(conn) { conn.set_header("A", "1"); }
            "#,
        );
        resolver.resolve_connection(TileCoord::new(1, 0, 0)).unwrap();
        assert!(resolver.environment().get(CONNECTION_BINDING).is_none());

        assert!(resolver.environment().eval_call("addHeaders(conn)").is_err());
    }

    #[test]
    fn test_failing_hook_is_hook_failure() {
        let resolver = resolver(
            r#"
                fn getTileUrl(zoom, x, y) { "http://h/" + zoom }
                fn addHeaders(conn) { throw "denied"; }
            "#,
        );
        let result = resolver.resolve_connection(TileCoord::new(1, 0, 0));
        assert!(matches!(result, Err(SourceError::Hook(_))));
    }

    #[test]
    fn test_hook_calling_undefined_helper_is_hook_failure() {
        let resolver = resolver(
            r#"
                fn getTileUrl(zoom, x, y) { "http://h/" + zoom }
                fn addHeaders(conn) { missingHelper(conn); }
            "#,
        );
        let result = resolver.resolve_connection(TileCoord::new(1, 0, 0));
        assert!(matches!(result, Err(SourceError::Hook(_))));
    }

    #[test]
    fn test_invalid_url_is_network_failure() {
        let resolver = resolver(r#"fn getTileUrl(zoom, x, y) { "not a url" }"#);
        let result = resolver.resolve_connection(TileCoord::new(1, 0, 0));
        assert!(matches!(
            result,
            Err(SourceError::Network(ProviderError::InvalidUrl(_)))
        ));
    }

    #[test]
    fn test_connection_ids_increase() {
        let resolver = resolver(URL_ONLY);
        let a = resolver.resolve_connection(TileCoord::new(0, 0, 0)).unwrap();
        let b = resolver.resolve_connection(TileCoord::new(0, 0, 0)).unwrap();
        assert!(b.id() > a.id());
    }
}
