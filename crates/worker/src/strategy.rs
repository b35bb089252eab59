//! The two caching strategies.
//!
//! Both persist fetched responses without blocking the caller: the write is
//! spawned and its failure only logged, so a response can reach the consumer
//! before it is durably cached. A near-simultaneous lookup of the same key
//! may still miss during that window; the staleness tolerance here is one
//! page render.

use gifwall_client::Fetcher;
use gifwall_core::{Error, RequestKey, Store, StoreDb, StoredResponse};

/// Serve from the cache, falling back to the network on a miss.
///
/// A hit is terminal: the stored response comes back unmodified and the
/// network is never consulted. On a miss the fetched response is returned
/// as-is, whatever its status, and written to the store in the background.
/// Transport errors on the miss path propagate to the caller; a request
/// never cached has nothing to fall back to.
pub async fn cache_first(
    db: &StoreDb, fetcher: &dyn Fetcher, store_name: &str, key: &RequestKey,
) -> Result<StoredResponse, Error> {
    let store = db.open_store(store_name).await?;

    if let Some(hit) = store.match_request(key).await? {
        tracing::debug!("cache hit for {} in {}", key, store_name);
        return Ok(hit);
    }

    tracing::debug!("cache miss for {} in {}", key, store_name);
    let fetched = fetcher.fetch(key.url()).await?;
    let response = fetched.into_stored();

    spawn_write(store, key.clone(), response.clone());

    Ok(response)
}

/// Try the network first, falling back to the cache when it fails.
///
/// A non-2xx status counts as a failed fetch here and is never returned or
/// cached. Returns `Ok(None)` when the network failed and the store has
/// nothing either; the caller decides what an empty result means.
pub async fn network_first(
    db: &StoreDb, fetcher: &dyn Fetcher, store_name: &str, key: &RequestKey,
) -> Result<Option<StoredResponse>, Error> {
    match fetch_success(fetcher, key).await {
        Ok(response) => {
            let store = db.open_store(store_name).await?;
            spawn_write(store, key.clone(), response.clone());
            Ok(Some(response))
        }
        Err(e) if e.is_fetch_failure() => {
            tracing::debug!("network failed for {}, trying {}: {}", key, store_name, e);
            let store = db.open_store(store_name).await?;
            store.match_request(key).await
        }
        Err(e) => Err(e),
    }
}

async fn fetch_success(fetcher: &dyn Fetcher, key: &RequestKey) -> Result<StoredResponse, Error> {
    let fetched = fetcher.fetch(key.url()).await?;

    if !fetched.status.is_success() {
        return Err(Error::BadStatus(fetched.status.as_u16()));
    }

    Ok(fetched.into_stored())
}

fn spawn_write(store: Store, key: RequestKey, response: StoredResponse) {
    tokio::spawn(async move {
        if let Err(e) = store.put(&key, &response).await {
            tracing::warn!("failed to cache {}: {}", key, e);
        }
    });
}
