//! The offline worker: lifecycle, routing, and message handling in one
//! place.

use std::sync::Arc;

use gifwall_client::Fetcher;
use gifwall_client::fetch::canonicalize;
use gifwall_core::version::MEDIA_STORE;
use gifwall_core::{AppConfig, Error, RequestKey, StoreDb, StoredResponse};

use crate::evict;
use crate::lifecycle::{self, LifecyclePhase};
use crate::message::PageMessage;
use crate::router::{Route, RouteTable};
use crate::strategy;

/// Result of routing one request through the worker.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The worker intercepted the request and produced a response.
    Served(StoredResponse),
    /// The worker intercepted the request but has nothing to serve: the
    /// network failed and the cache was empty.
    Missing,
    /// The worker does not intercept this request; the caller talks to the
    /// network itself.
    Bypass,
}

/// The offline worker.
///
/// Holds the store registry, the fetcher, and the route table, and walks the
/// install/activate lifecycle. Requests are only intercepted once the worker
/// is active.
pub struct Worker {
    db: StoreDb,
    fetcher: Arc<dyn Fetcher>,
    routes: RouteTable,
    version: String,
    static_store: String,
    origin: String,
    manifest: Vec<String>,
    phase: LifecyclePhase,
}

impl Worker {
    /// Build a worker over an open store registry.
    pub fn new(db: StoreDb, fetcher: Arc<dyn Fetcher>, config: &AppConfig) -> Result<Self, Error> {
        let routes = RouteTable::new(config)?;

        Ok(Self {
            db,
            fetcher,
            routes,
            version: config.version.clone(),
            static_store: config.static_store_name(),
            origin: config.page_origin.clone(),
            manifest: config.shell_manifest.clone(),
            phase: LifecyclePhase::New,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Name of the versioned shell store this worker serves from.
    pub fn static_store(&self) -> &str {
        &self.static_store
    }

    /// Precache the shell manifest. On failure the worker stays uninstalled
    /// and a later call may retry.
    pub async fn install(&mut self) -> Result<(), Error> {
        self.phase = LifecyclePhase::Installing;

        match lifecycle::install(&self.db, &self.fetcher, &self.static_store, &self.origin, &self.manifest).await {
            Ok(()) => {
                self.phase = LifecyclePhase::Installed;
                Ok(())
            }
            Err(e) => {
                self.phase = LifecyclePhase::New;
                Err(e)
            }
        }
    }

    /// Sweep out stale shell stores and start serving requests.
    pub async fn activate(&mut self) -> Result<(), Error> {
        self.phase = LifecyclePhase::Activating;
        lifecycle::activate(&self.db, &self.version).await?;
        self.phase = LifecyclePhase::Active;

        tracing::info!("worker active, serving {}", self.static_store);

        Ok(())
    }

    /// Route one outbound request.
    ///
    /// The URL is canonicalized, classified, and dispatched to the matching
    /// strategy and store. Unmatched requests and anything arriving before
    /// activation pass through untouched.
    pub async fn handle_fetch(&self, url: &str) -> Result<FetchOutcome, Error> {
        let canonical = canonicalize(url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        if self.phase != LifecyclePhase::Active {
            tracing::debug!("not active, passing {} through", canonical);
            return Ok(FetchOutcome::Bypass);
        }

        let Some(route) = self.routes.classify(&canonical) else {
            return Ok(FetchOutcome::Bypass);
        };

        let key = RequestKey::get(canonical.as_str());

        match route {
            Route::Shell => {
                let response =
                    strategy::cache_first(&self.db, self.fetcher.as_ref(), &self.static_store, &key).await?;
                Ok(FetchOutcome::Served(response))
            }
            Route::Trending => {
                match strategy::network_first(&self.db, self.fetcher.as_ref(), &self.static_store, &key).await? {
                    Some(response) => Ok(FetchOutcome::Served(response)),
                    None => Ok(FetchOutcome::Missing),
                }
            }
            Route::Media => {
                let response = strategy::cache_first(&self.db, self.fetcher.as_ref(), MEDIA_STORE, &key).await?;
                Ok(FetchOutcome::Served(response))
            }
        }
    }

    /// Handle a message posted by the page. No acknowledgment is produced.
    pub async fn post_message(&self, message: PageMessage) -> Result<(), Error> {
        match message {
            PageMessage::CleanGiphyCache { giphys } => {
                let deleted = evict::clean_media_cache(&self.db, &giphys).await?;
                tracing::debug!("page eviction pass removed {} entries", deleted);
                Ok(())
            }
        }
    }
}
