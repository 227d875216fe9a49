// Plain-text GET fetcher.
// Joins the server address and relative path, issues a blocking GET, and decodes UTF-8.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::error::{Result, WebberError};

const USER_AGENT: &str = concat!("webber/", env!("CARGO_PKG_VERSION"));

/// Source of raw response text for a server and relative path.
pub trait Fetcher: Send + Sync {
    fn fetch_text(&self, server: &str, path: &str) -> Result<String>;
}

/// Build the request URL as `<server>/<path>`, without normalizing either part.
pub fn request_url(server: &str, path: &str) -> Result<Url> {
    let raw = format!("{}/{}", server, path);
    Url::parse(&raw).map_err(|e| WebberError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Blocking HTTP fetcher.
///
/// The body of any response is returned, whatever its status, unless
/// [`HttpFetcher::error_for_status`] is set. The client is built on first
/// use, so the fetcher can be created from inside an async runtime.
/// Must not be called on an async worker thread.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    timeout: Option<Duration>,
    direct: bool,
    error_for_status: bool,
    client: OnceLock<Client>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up on requests that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ignore proxy settings from the environment.
    pub fn direct(mut self) -> Self {
        self.direct = true;
        self
    }

    /// Report non-2xx responses as [`WebberError::Status`] instead of returning their body.
    pub fn error_for_status(mut self) -> Self {
        self.error_for_status = true;
        self
    }

    fn client(&self) -> Result<Client> {
        if let Some(client) = self.client.get() {
            return Ok(client.clone());
        }

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if self.direct {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(WebberError::Network)?;
        // A racing caller may have set it first; either client works
        Ok(self.client.get_or_init(|| client).clone())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, server: &str, path: &str) -> Result<String> {
        let url = request_url(server, path)?;
        debug!(%url, "GET");

        let response = self.client()?.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            if self.error_for_status {
                return Err(WebberError::Status {
                    status: status.as_u16(),
                    url: response.url().to_string(),
                });
            }
            warn!(
                url = %response.url(),
                status = status.as_u16(),
                "Non-success status, using body"
            );
        }

        let body = response.bytes()?;
        Ok(String::from_utf8(body.to_vec())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response per connection on a local port.
    async fn serve(status_line: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status_line,
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(body).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    async fn fetch_with(
        fetcher: HttpFetcher,
        server: String,
        path: &'static str,
    ) -> Result<String> {
        tokio::task::spawn_blocking(move || fetcher.fetch_text(&server, path))
            .await
            .unwrap()
    }

    async fn fetch(server: String, path: &'static str) -> Result<String> {
        fetch_with(HttpFetcher::new().direct(), server, path).await
    }

    #[test]
    fn test_request_url_joins_with_slash() {
        let url = request_url("http://example.com/api", "items?page=2").unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/items?page=2");
    }

    #[test]
    fn test_request_url_rejects_empty_server() {
        let err = request_url("", "items").unwrap_err();
        assert!(matches!(err, WebberError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_fetch_text_ok() {
        let server = serve("200 OK", b"[1,2,3]").await;
        assert_eq!(fetch(server, "numbers").await.unwrap(), "[1,2,3]");
    }

    #[tokio::test]
    async fn test_fetch_text_returns_error_page_body() {
        let server = serve("404 Not Found", b"[\"error page\"]").await;
        assert_eq!(fetch(server, "nope").await.unwrap(), "[\"error page\"]");
    }

    #[tokio::test]
    async fn test_fetch_text_error_for_status() {
        let server = serve("500 Internal Server Error", b"boom").await;
        let fetcher = HttpFetcher::new().direct().error_for_status();
        let err = fetch_with(fetcher, server, "nope").await.unwrap_err();
        assert!(matches!(err, WebberError::Status { status: 500, .. }));
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_fetch_text_reuses_client() {
        let server = serve("200 OK", b"ok").await;
        let result = tokio::task::spawn_blocking(move || {
            let fetcher = HttpFetcher::new().direct();
            let first = fetcher.fetch_text(&server, "a").unwrap();
            let second = fetcher.fetch_text(&server, "b").unwrap();
            (first, second, fetcher.client.get().is_some())
        })
        .await
        .unwrap();
        assert_eq!(result, ("ok".to_string(), "ok".to_string(), true));
    }

    #[tokio::test]
    async fn test_error_page_is_cached_by_client() {
        use crate::cache::MemoryStore;
        use crate::net::ManualReachability;
        use crate::webber::Webber;

        let server = serve("404 Not Found", b"[\"error page\"]").await;
        let (fresh, cached, array) = tokio::task::spawn_blocking(move || {
            let webber = Webber::builder(server)
                .fetcher(HttpFetcher::new().direct())
                .reachability(ManualReachability::new(true))
                .store(MemoryStore::new())
                .build();
            (
                webber.get_from_api("x", true),
                webber.cache_get_from_api("x"),
                webber.get_json_array_from_api("x", true).map(|v| v.len()),
            )
        })
        .await
        .unwrap();

        assert_eq!(fresh.as_deref(), Some("[\"error page\"]"));
        assert_eq!(cached.as_deref(), Some("[\"error page\"]"));
        assert_eq!(array, Some(1));
    }

    #[tokio::test]
    async fn test_fetch_text_rejects_invalid_utf8() {
        let server = serve("200 OK", &[0xff, 0xfe, 0xfd]).await;
        let err = fetch(server, "binary").await.unwrap_err();
        assert!(matches!(err, WebberError::Encoding(_)));
    }

    #[tokio::test]
    async fn test_fetch_text_connection_refused() {
        // Bind then drop to get a port with nothing listening
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let err = fetch(format!("http://{}", addr), "x").await.unwrap_err();
        assert!(matches!(err, WebberError::Network(_)));
    }
}
