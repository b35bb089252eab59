//! The page flow: what the GIF wall does on every launch.
//!
//! Mirrors a page load end to end. The worker is installed and activated,
//! the shell document is requested the way a navigation would request it,
//! the trending wall is refreshed through the worker, each rendition is
//! fetched so it lands in the media store, and the set still on screen is
//! posted back so the worker can drop the rest.

use std::sync::Arc;

use anyhow::{Context, Result};
use gifwall_client::fetch::{FetchClient, FetchConfig, FetchResponse, Fetcher};
use gifwall_client::giphy::{TrendingRequest, TrendingResponse, parse_trending};
use gifwall_core::{AppConfig, Error, StoreDb};
use gifwall_worker::{FetchOutcome, LifecyclePhase, PageMessage, Worker};

/// Shown when the trending refresh fails outright, like the page's alert.
const ALERT_TEXT: &str = "Unable to refresh trending GIFs. Check your connection.";

pub async fn run(config: &AppConfig, offline: bool) -> Result<()> {
    let db = StoreDb::open(&config.db_path).await.context("failed to open cache database")?;
    let fetcher = build_fetcher(config, offline)?;
    let mut worker = Worker::new(db.clone(), fetcher.clone(), config)?;

    boot(&mut worker, &db, config).await?;
    load_shell(&worker, config).await;
    update(&worker, fetcher.as_ref(), config).await
}

fn build_fetcher(config: &AppConfig, offline: bool) -> Result<Arc<dyn Fetcher>, Error> {
    if offline {
        return Ok(Arc::new(OfflineFetcher));
    }

    let client = FetchClient::new(FetchConfig {
        user_agent: config.user_agent.clone(),
        max_bytes: config.max_bytes,
        timeout: config.timeout(),
        ..FetchConfig::default()
    })?;
    Ok(Arc::new(client))
}

/// Stand-in for a dead network. Every request fails the way an unplugged
/// cable would, which forces the worker onto its cached fallbacks.
struct OfflineFetcher;

#[async_trait::async_trait]
impl Fetcher for OfflineFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Error> {
        Err(Error::TransportFailure(format!("offline mode: {url}")))
    }
}

/// Walk the worker through install and activate.
///
/// A failed install does not abort the launch. If an earlier run left a
/// complete precache for this version the worker activates against it;
/// otherwise the page runs without interception and install is retried on
/// the next launch.
async fn boot(worker: &mut Worker, db: &StoreDb, config: &AppConfig) -> Result<()> {
    match worker.install().await {
        Ok(()) => {}
        Err(e) => {
            let store = db.open_store(&config.static_store_name()).await?;
            if store.keys().await?.is_empty() {
                tracing::warn!("install failed, continuing without offline support: {}", e);
                return Ok(());
            }
            tracing::info!("install failed, reusing the precache from an earlier run: {}", e);
        }
    }

    worker.activate().await?;
    Ok(())
}

/// Request the page document the way a navigation would.
async fn load_shell(worker: &Worker, config: &AppConfig) {
    let Some(entry) = config.shell_manifest.first() else {
        return;
    };

    let url = format!("{}/{}", config.page_origin.trim_end_matches('/'), entry);
    match worker.handle_fetch(&url).await {
        Ok(FetchOutcome::Served(response)) => {
            tracing::debug!("shell {} served: {} bytes", url, response.body.len());
        }
        Ok(_) => tracing::debug!("shell {} not intercepted", url),
        Err(e) => tracing::warn!("shell load failed: {}", e),
    }
}

/// Refresh the trending wall.
///
/// The request goes through the worker so a fresh answer is cached and a
/// cached answer covers an unreachable API. Only when both come up empty
/// does the launch fail: the alert line goes to stderr and the error
/// propagates.
async fn update(worker: &Worker, fetcher: &dyn Fetcher, config: &AppConfig) -> Result<()> {
    let api_key = config.require_api_key()?;
    let request = TrendingRequest { limit: Some(config.limit), ..Default::default() };
    let url = request.to_url(&config.trending_endpoint, api_key).map_err(|e| Error::InvalidUrl(e.to_string()))?;

    let Some(body) = resolve(worker, fetcher, url.as_str()).await else {
        eprintln!("{ALERT_TEXT}");
        return Err(Error::CacheMiss(url.to_string()).into());
    };

    let trending = match parse_trending(&body) {
        Ok(trending) => trending,
        Err(e) => {
            eprintln!("{ALERT_TEXT}");
            return Err(e.into());
        }
    };

    render(&trending);

    let shown = trending.media_urls();
    warm_media(worker, &shown).await;

    if worker.phase() == LifecyclePhase::Active {
        worker.post_message(PageMessage::CleanGiphyCache { giphys: shown }).await?;
    }

    Ok(())
}

/// Resolve a URL through the worker, falling back to a direct fetch when
/// the worker does not intercept it.
async fn resolve(worker: &Worker, fetcher: &dyn Fetcher, url: &str) -> Option<Vec<u8>> {
    match worker.handle_fetch(url).await {
        Ok(FetchOutcome::Served(response)) if response.is_success() => Some(response.body),
        Ok(FetchOutcome::Served(response)) => {
            tracing::warn!("cached response for {} has status {}", url, response.status);
            None
        }
        Ok(FetchOutcome::Missing) => None,
        Ok(FetchOutcome::Bypass) => match fetcher.fetch(url).await {
            Ok(response) if response.status.is_success() => Some(response.bytes.to_vec()),
            Ok(response) => {
                tracing::warn!("{} answered {}", url, response.status.as_u16());
                None
            }
            Err(e) => {
                tracing::warn!("direct fetch of {} failed: {}", url, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("fetch of {} failed: {}", url, e);
            None
        }
    }
}

/// Print the wall the way the page lays it out, one GIF per row.
fn render(trending: &TrendingResponse) {
    println!("Trending GIFs ({})", trending.gif_count());
    for (idx, gif) in trending.gifs.iter().enumerate() {
        let title = if gif.title.is_empty() { "(untitled)" } else { &gif.title };
        println!("{:>3}. {}", idx + 1, title);
        println!("     {}", gif.media_url);
    }
}

/// Fetch each rendition through the worker so the media store fills the
/// way it would from the page's img tags. Failures skip the one GIF.
async fn warm_media(worker: &Worker, urls: &[String]) {
    for url in urls {
        match worker.handle_fetch(url).await {
            Ok(FetchOutcome::Served(_)) => {}
            Ok(_) => tracing::debug!("media {} not intercepted", url),
            Err(e) => tracing::warn!("media fetch of {} failed: {}", url, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_fetcher_always_fails() {
        let fetcher = OfflineFetcher;
        let err = fetcher.fetch("https://api.giphy.com/v1/gifs/trending").await.unwrap_err();
        assert!(matches!(err, Error::TransportFailure(_)));
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_build_fetcher_offline_needs_no_network_stack() {
        let config = AppConfig::default();
        assert!(build_fetcher(&config, true).is_ok());
    }

    #[tokio::test]
    async fn test_build_fetcher_online_uses_configured_client() {
        let config = AppConfig::default();
        assert!(build_fetcher(&config, false).is_ok());
    }
}
