//! Tile connection handle shared between the host and user scripts.
//!
//! A [`TileConnection`] is what `addHeaders(conn)` receives. Clones share the
//! same header set, so changes a script makes to its copy are visible to the
//! HTTP client that later sends the request.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::Url;

use super::types::ProviderError;

/// Name under which the connection type is registered with the script engine.
pub const CONNECTION_TYPE_NAME: &str = "TileConnection";

/// An opened, not yet sent, request for one tile.
#[derive(Clone)]
pub struct TileConnection {
    inner: Arc<ConnectionInner>,
}

struct ConnectionInner {
    id: u64,
    url: Url,
    headers: Mutex<Vec<(String, String)>>,
}

impl TileConnection {
    /// Opens a connection to `url`.
    ///
    /// No I/O happens here. The URL is parsed and must use `http` or `https`.
    pub fn open(id: u64, url: &str) -> Result<Self, ProviderError> {
        let parsed = Url::parse(url)
            .map_err(|e| ProviderError::InvalidUrl(format!("'{}': {}", url, e)))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ProviderError::InvalidUrl(format!(
                    "'{}': unsupported scheme '{}'",
                    url, other
                )))
            }
        }

        Ok(Self {
            inner: Arc::new(ConnectionInner {
                id,
                url: parsed,
                headers: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Identifier assigned by the source that opened this connection.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Target URL.
    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    /// Snapshot of the request headers in insertion order.
    pub fn headers(&self) -> Vec<(String, String)> {
        self.inner.headers.lock().clone()
    }

    /// Sets a header, replacing any existing values with the same name.
    ///
    /// Header names compare case-insensitively.
    pub fn set_header(&self, name: &str, value: &str) {
        let mut headers = self.inner.headers.lock();
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        headers.push((name.to_string(), value.to_string()));
    }

    /// Appends a header value without touching existing ones.
    pub fn add_header(&self, name: &str, value: &str) {
        self.inner
            .headers
            .lock()
            .push((name.to_string(), value.to_string()));
    }

    /// Removes every value of the named header.
    pub fn remove_header(&self, name: &str) {
        self.inner
            .headers
            .lock()
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
    }

    /// First value of the named header, if any.
    pub fn header(&self, name: &str) -> Option<String> {
        self.inner
            .headers
            .lock()
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }

    /// All values of the named header.
    pub fn header_values(&self, name: &str) -> Vec<String> {
        self.inner
            .headers
            .lock()
            .iter()
            .filter(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
            .collect()
    }
}

impl fmt::Debug for TileConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileConnection")
            .field("id", &self.inner.id)
            .field("url", &self.inner.url.as_str())
            .field("headers", &*self.inner.headers.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_valid_url() {
        let conn = TileConnection::open(7, "http://tiles.example.com/3/1/2.png").unwrap();
        assert_eq!(conn.id(), 7);
        assert_eq!(conn.url().as_str(), "http://tiles.example.com/3/1/2.png");
        assert!(conn.headers().is_empty());
    }

    #[test]
    fn test_open_rejects_garbage() {
        let result = TileConnection::open(1, "not a url");
        assert!(matches!(result, Err(ProviderError::InvalidUrl(_))));
    }

    #[test]
    fn test_open_rejects_non_http_scheme() {
        let result = TileConnection::open(1, "file:///etc/passwd");
        match result {
            Err(ProviderError::InvalidUrl(msg)) => assert!(msg.contains("file")),
            other => panic!("Expected InvalidUrl, got {:?}", other),
        }
    }

    #[test]
    fn test_clones_share_headers() {
        let conn = TileConnection::open(1, "https://h/0/0/0").unwrap();
        let copy = conn.clone();
        copy.set_header("Referer", "https://example.com/");

        assert_eq!(conn.header("referer").as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn test_set_header_replaces_add_header_appends() {
        let conn = TileConnection::open(1, "https://h/0/0/0").unwrap();
        conn.add_header("Cookie", "a=1");
        conn.add_header("cookie", "b=2");
        assert_eq!(conn.header_values("Cookie"), vec!["a=1", "b=2"]);

        conn.set_header("COOKIE", "c=3");
        assert_eq!(conn.header_values("Cookie"), vec!["c=3"]);

        conn.remove_header("cookie");
        assert!(conn.header("Cookie").is_none());
    }
}
