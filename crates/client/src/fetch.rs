//! HTTP page fetcher.
//!
//! ### Behavior
//! - Plain GET, no URL rewriting: the string is handed to reqwest as-is and
//!   anything it cannot parse fails the fetch.
//! - Follows up to 5 redirects.
//! - Bounded by a request timeout and a body size cap.
//! - Every failure (transport, timeout, non-2xx, oversize) is `Error::Fetch`.
//!   Nothing is retried.

use async_trait::async_trait;
use bytes::Bytes;
use pagemeta_core::Error;
use pagemeta_core::config::AppConfig;
use reqwest::{Client, header};
use std::time::{Duration, Instant};

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "pagemeta/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "pagemeta/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL string as requested
    pub url: String,
    /// The final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// Source of raw page bodies.
///
/// The orchestrator only talks to this trait so the transport can be swapped.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and return its body, or `Error::Fetch`.
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Error>;
}

/// reqwest-backed [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Fetch(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn too_large(&self, len: usize) -> Error {
        Error::Fetch(format!("{} bytes exceeds {}", len, self.config.max_bytes))
    }
}

#[async_trait]
impl Fetcher for FetchClient {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Fetch(format!("timed out after {}ms", self.config.timeout.as_millis()))
                } else {
                    Error::Fetch(format!("network error: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(self.too_large(len as usize));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Fetch(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(self.too_large(bytes.len()));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            url,
            final_url = %final_url,
            status = status.as_u16(),
            content_type = content_type.as_deref().unwrap_or(""),
            fetch_ms,
            bytes = bytes.len(),
            "fetched page"
        );

        Ok(FetchResponse { url: url.to_string(), final_url, status: status.as_u16(), content_type, bytes, fetch_ms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;

    const PAGE: &str = "<html><head><title>Local</title></head><body></body></html>";

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn test_router() -> Router {
        Router::new()
            .route("/page", get(|| async { ([(header::CONTENT_TYPE, "text/html")], PAGE) }))
            .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "nope") }))
            .route("/big", get(|| async { "x".repeat(4096) }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    PAGE
                }),
            )
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "pagemeta/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { user_agent: "ua-test".into(), max_bytes: 1024, timeout_ms: 750, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.user_agent, "ua-test");
        assert_eq!(config.max_bytes, 1024);
        assert_eq!(config.timeout, Duration::from_millis(750));
        assert_eq!(config.max_redirects, 5);
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let base = serve(test_router()).await;
        let client = FetchClient::new(FetchConfig::default()).unwrap();

        let url = format!("{base}/page");
        let response = client.fetch(&url).await.unwrap();

        assert_eq!(response.url, url);
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type.as_deref(), Some("text/html"));
        assert_eq!(response.bytes.as_ref(), PAGE.as_bytes());
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let base = serve(test_router()).await;
        let client = FetchClient::new(FetchConfig::default()).unwrap();

        let result = client.fetch(&format!("{base}/missing")).await;
        assert!(matches!(result, Err(Error::Fetch(msg)) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_fetch_too_large() {
        let base = serve(test_router()).await;
        let client = FetchClient::new(FetchConfig { max_bytes: 100, ..Default::default() }).unwrap();

        let result = client.fetch(&format!("{base}/big")).await;
        assert!(matches!(result, Err(Error::Fetch(msg)) if msg.contains("exceeds 100")));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let base = serve(test_router()).await;
        let client = FetchClient::new(FetchConfig { timeout: Duration::from_millis(200), ..Default::default() }).unwrap();

        let result = client.fetch(&format!("{base}/slow")).await;
        assert!(matches!(result, Err(Error::Fetch(msg)) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn test_fetch_malformed_url() {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let result = client.fetch("not a url").await;
        assert!(matches!(result, Err(Error::Fetch(_))));
    }
}
