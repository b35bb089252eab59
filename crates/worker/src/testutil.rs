//! Test doubles and helpers shared by the worker tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use gifwall_client::{FetchResponse, Fetcher};
use gifwall_core::{Error, RequestKey, Store, StoredResponse};

/// What a [`FakeFetcher`] does when asked for a given URL.
#[derive(Debug, Clone)]
enum FakeOutcome {
    Respond { status: u16, body: Bytes },
    Unreachable,
    Reject,
}

/// Scripted fetcher. Maps exact URLs to canned outcomes and counts calls;
/// unscripted URLs fail with a transport error.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    script: HashMap<String, FakeOutcome>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a 200 response with the given body.
    pub fn respond(self, url: &str, body: &[u8]) -> Self {
        self.respond_with_status(url, 200, body)
    }

    /// Script a response with an explicit status.
    pub fn respond_with_status(mut self, url: &str, status: u16, body: &[u8]) -> Self {
        self.script
            .insert(url.to_string(), FakeOutcome::Respond { status, body: Bytes::copy_from_slice(body) });
        self
    }

    /// Script a transport failure.
    pub fn unreachable(mut self, url: &str) -> Self {
        self.script.insert(url.to_string(), FakeOutcome::Unreachable);
        self
    }

    /// Script an invalid-URL rejection.
    pub fn reject(mut self, url: &str) -> Self {
        self.script.insert(url.to_string(), FakeOutcome::Reject);
        self
    }

    /// Number of fetch calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.script.get(url) {
            Some(FakeOutcome::Respond { status, body }) => {
                let parsed = url::Url::parse(url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
                Ok(FetchResponse {
                    url: parsed.clone(),
                    final_url: parsed,
                    status: StatusCode::from_u16(*status).unwrap(),
                    content_type: None,
                    bytes: body.clone(),
                    headers: HeaderMap::new(),
                    fetch_ms: 1,
                })
            }
            Some(FakeOutcome::Unreachable) => Err(Error::TransportFailure(format!("scripted failure for {}", url))),
            Some(FakeOutcome::Reject) => Err(Error::InvalidUrl(format!("scripted rejection of {}", url))),
            None => Err(Error::TransportFailure(format!("no script for {}", url))),
        }
    }
}

/// Build a stored response with the given body.
pub fn make_stored(url: &str, status: u16, body: &[u8]) -> StoredResponse {
    StoredResponse {
        url: url.to_string(),
        status,
        content_type: None,
        headers: vec![],
        body: body.to_vec(),
        fetched_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Poll until a background cache write lands. Panics after ~500ms.
pub async fn wait_for_entry(store: &Store, key: &RequestKey) -> StoredResponse {
    for _ in 0..50 {
        if let Some(hit) = store.match_request(key).await.unwrap() {
            return hit;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("entry for {} never appeared", key);
}
