//! Media store eviction.
//!
//! The page periodically reports which rendition URLs it still shows; every
//! media entry outside that set is deleted. This is the only mechanism that
//! shrinks the media store. There is no TTL and no size bound.

use std::collections::HashSet;

use gifwall_client::fetch::canonicalize;
use gifwall_core::version::MEDIA_STORE;
use gifwall_core::{Error, StoreDb};

/// Delete media entries whose URL is not in `keep`.
///
/// Entries of `keep` are canonicalized before comparison; ones that fail to
/// parse are skipped with a warning rather than failing the sweep. Returns
/// the number of deleted entries. A second pass with the same set deletes
/// nothing.
pub async fn clean_media_cache(db: &StoreDb, keep: &[String]) -> Result<u64, Error> {
    let mut valid: HashSet<String> = HashSet::with_capacity(keep.len());
    for raw in keep {
        match canonicalize(raw) {
            Ok(url) => {
                valid.insert(url.to_string());
            }
            Err(e) => {
                tracing::warn!("skipping unparseable keep entry {:?}: {}", raw, e);
            }
        }
    }

    let store = db.open_store(MEDIA_STORE).await?;

    let mut deleted = 0u64;
    for key in store.keys().await? {
        if !valid.contains(key.url()) && store.delete(&key).await? {
            deleted += 1;
        }
    }

    if deleted > 0 {
        tracing::info!("evicted {} stale media entries", deleted);
    }

    Ok(deleted)
}
