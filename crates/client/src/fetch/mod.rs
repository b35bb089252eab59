//! HTTP fetch pipeline for shell assets, API calls, and GIF media.
//!
//! Every outbound URL passes through [`canonicalize`] so the URL that hits
//! the wire is the same one the cache will be keyed on. Redirects are capped
//! at 5 and bodies at a configurable 10MB.
//!
//! Non-2xx responses are returned to the caller, not raised as errors. Each
//! caching strategy decides what a given status means for it: cache-first
//! stores whatever arrived, network-first treats non-2xx as a reason to fall
//! back.

pub mod url;

use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use url::{UrlError, canonicalize};

use gifwall_core::{Error, StoredResponse};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "gifwall/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 10MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "gifwall/0.1".to_string(),
            max_bytes: 10 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The original URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Response headers
    pub headers: header::HeaderMap,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// Convert into the row shape the cache stores, stamping the fetch time.
    ///
    /// The stored URL is the one originally requested, not the post-redirect
    /// one: lookups key on what the caller asked for.
    pub fn into_stored(self) -> StoredResponse {
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| {
                (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned())
            })
            .collect();

        StoredResponse {
            url: self.url.to_string(),
            status: self.status.as_u16(),
            content_type: self.content_type,
            headers,
            body: self.bytes.to_vec(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Abstraction over HTTP fetching.
///
/// The caching strategies take a `Fetcher` rather than a concrete client so
/// tests can script responses without a network. [`FetchClient`] is the
/// production implementation.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a URL, returning raw bytes and metadata.
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Error>;
}

/// HTTP fetch client.
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
            .map_err(|e| Error::TransportFailure(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL, returning raw bytes and metadata.
    ///
    /// Canonicalizes the URL first and enforces the redirect/byte limits.
    /// Transport failures and oversized bodies are errors; HTTP error
    /// statuses are not.
    pub async fn fetch(&self, url_str: &str) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let url = canonicalize(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url.as_str())
            .header("Accept", "*/*")
            .send()
            .await
            .map_err(|e| transport_error(&url, "network error", &e))?;

        let status = response.status();
        if let Some(len) = response.content_length() {
            self.enforce_cap(len as usize)?;
        }

        let final_url = response.url().clone();
        let headers = response.headers().clone();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url, "failed to read response", &e))?;
        self.enforce_cap(bytes.len())?;

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} {} in {}ms ({} bytes)",
            url,
            final_url,
            status.as_u16(),
            fetch_ms,
            bytes.len()
        );

        Ok(FetchResponse { url, final_url, status, content_type, bytes, headers, fetch_ms })
    }

    fn enforce_cap(&self, len: usize) -> Result<(), Error> {
        if len > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }
        Ok(())
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

/// Classify a reqwest failure. Timeouts get their own code so a slow origin
/// reads differently from an unreachable one.
fn transport_error(url: &Url, action: &str, e: &reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::FetchTimeout(url.to_string())
    } else {
        Error::TransportFailure(format!("{action}: {e}"))
    }
}

#[async_trait::async_trait]
impl Fetcher for FetchClient {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Error> {
        FetchClient::fetch(self, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "gifwall/0.1");
        assert_eq!(config.max_bytes, 10 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_response_fields() {
        let response = FetchResponse {
            url: Url::parse("https://media.giphy.com/media/abc/giphy.gif").unwrap(),
            final_url: Url::parse("https://media2.giphy.com/media/abc/giphy.gif").unwrap(),
            status: StatusCode::OK,
            content_type: Some("image/gif".to_string()),
            bytes: Bytes::new(),
            headers: header::HeaderMap::new(),
            fetch_ms: 100,
        };

        assert_eq!(response.url.as_str(), "https://media.giphy.com/media/abc/giphy.gif");
        assert_eq!(response.final_url.as_str(), "https://media2.giphy.com/media/abc/giphy.gif");
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type, Some("image/gif".to_string()));
        assert_eq!(response.fetch_ms, 100);
    }

    #[test]
    fn test_into_stored_keeps_requested_url() {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "image/gif".parse().unwrap());
        headers.insert("x-giphy-id", "abc".parse().unwrap());

        let response = FetchResponse {
            url: Url::parse("https://media.giphy.com/media/abc/giphy.gif").unwrap(),
            final_url: Url::parse("https://media2.giphy.com/media/abc/giphy.gif").unwrap(),
            status: StatusCode::OK,
            content_type: Some("image/gif".to_string()),
            bytes: Bytes::from_static(b"GIF89a"),
            headers,
            fetch_ms: 7,
        };

        let stored = response.into_stored();
        assert_eq!(stored.url, "https://media.giphy.com/media/abc/giphy.gif");
        assert_eq!(stored.status, 200);
        assert_eq!(stored.body, b"GIF89a");
        assert!(stored.headers.iter().any(|(k, v)| k == "x-giphy-id" && v == "abc"));
        assert!(chrono::DateTime::parse_from_rfc3339(&stored.fetched_at).is_ok());
    }

    #[test]
    fn test_into_stored_non_success_status() {
        let response = FetchResponse {
            url: Url::parse("https://example.com/missing.gif").unwrap(),
            final_url: Url::parse("https://example.com/missing.gif").unwrap(),
            status: StatusCode::NOT_FOUND,
            content_type: None,
            bytes: Bytes::new(),
            headers: header::HeaderMap::new(),
            fetch_ms: 3,
        };

        let stored = response.into_stored();
        assert_eq!(stored.status, 404);
        assert!(!stored.is_success());
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        let config = FetchConfig::default();
        let client = FetchClient::new(config);
        assert!(client.is_ok());
    }
}
