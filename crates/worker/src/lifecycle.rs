//! Worker lifecycle: install and activate.
//!
//! Install precaches the shell manifest into the versioned store. Activate
//! sweeps out stores left behind by older versions. Both must fully settle
//! before the next phase begins.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use gifwall_client::Fetcher;
use gifwall_core::version::is_stale_static_store;
use gifwall_core::{Error, RequestKey, StoreDb};

/// Maximum concurrent asset fetches during install.
const INSTALL_CONCURRENCY: usize = 4;

/// Lifecycle states of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Built but never installed; every request passes through.
    New,
    /// Precache in progress.
    Installing,
    /// Precache complete, stale versions not yet swept.
    Installed,
    /// Stale-store sweep in progress.
    Activating,
    /// Serving requests.
    Active,
}

/// Fetch every shell asset and write the set into the versioned store.
///
/// All-or-nothing: a single failed or non-2xx asset fails the whole install
/// and nothing is written. Relative manifest paths are resolved against
/// `origin`.
pub async fn install(
    db: &StoreDb, fetcher: &Arc<dyn Fetcher>, store_name: &str, origin: &str, manifest: &[String],
) -> Result<(), Error> {
    if manifest.is_empty() {
        return Err(Error::InstallFailure("shell manifest is empty".into()));
    }

    let base = Url::parse(origin).map_err(|e| Error::InvalidUrl(format!("page origin {}: {}", origin, e)))?;

    let mut urls = Vec::with_capacity(manifest.len());
    for asset in manifest {
        let url = base.join(asset).map_err(|e| Error::InstallFailure(format!("{}: {}", asset, e)))?;
        urls.push(url);
    }

    let semaphore = Arc::new(Semaphore::new(INSTALL_CONCURRENCY));
    let mut join_set = JoinSet::new();

    for url in urls {
        let permit = semaphore.clone().acquire_owned().await.unwrap();
        let fetcher = fetcher.clone();

        join_set.spawn(async move {
            // NOTE: Hold permit for task duration to enforce concurrency limit
            let _permit = permit;
            let result = fetcher.fetch(url.as_str()).await;
            (url, result)
        });
    }

    let mut assets = Vec::new();

    while let Some(joined) = join_set.join_next().await {
        let (url, result) = joined.map_err(|e| Error::InstallFailure(e.to_string()))?;

        match result {
            Ok(response) if response.status.is_success() => {
                assets.push((RequestKey::get(url.as_str()), response.into_stored()));
            }
            Ok(response) => {
                join_set.shutdown().await;
                return Err(Error::InstallFailure(format!("{}: status {}", url, response.status.as_u16())));
            }
            Err(e) => {
                join_set.shutdown().await;
                return Err(Error::InstallFailure(format!("{}: {}", url, e)));
            }
        }
    }

    // Every asset arrived; only now touch the store.
    let store = db.open_store(store_name).await?;
    for (key, response) in &assets {
        store.put(key, response).await?;
    }

    tracing::info!("installed {} shell assets into {}", assets.len(), store_name);

    Ok(())
}

/// Delete shell stores belonging to versions other than `current_version`.
///
/// Every delete is awaited before this returns. Individual failures are
/// logged and skipped; one bad store must not hold activation open forever.
/// The media store is never touched.
pub async fn activate(db: &StoreDb, current_version: &str) -> Result<(), Error> {
    let names = db.store_names().await?;

    for name in names {
        if !is_stale_static_store(&name, current_version) {
            continue;
        }

        match db.delete_store(&name).await {
            Ok(_) => tracing::info!("deleted stale shell store {}", name),
            Err(e) => tracing::warn!("failed to delete stale shell store {}: {}", name, e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeFetcher;
    use gifwall_core::version::{MEDIA_STORE, static_store_name};

    const ORIGIN: &str = "http://localhost:8080";

    fn manifest(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| (*p).to_string()).collect()
    }

    fn arc(fetcher: FakeFetcher) -> Arc<dyn Fetcher> {
        Arc::new(fetcher)
    }

    #[tokio::test]
    async fn test_install_precaches_manifest() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let fetcher = arc(
            FakeFetcher::new()
                .respond("http://localhost:8080/index.html", b"<html>")
                .respond("http://localhost:8080/main.js", b"console.log(1)"),
        );

        install(&db, &fetcher, "static-1.0", ORIGIN, &manifest(&["index.html", "main.js"])).await.unwrap();

        let store = db.open_store("static-1.0").await.unwrap();
        let keys = store.keys().await.unwrap();
        assert_eq!(keys.len(), 2);

        let hit = store
            .match_request(&RequestKey::get("http://localhost:8080/index.html"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.body, b"<html>");
    }

    #[tokio::test]
    async fn test_install_resolves_relative_paths() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let fetcher = arc(FakeFetcher::new().respond("http://localhost:8080/vendor/bootstrap.min.css", b"body{}"));

        install(&db, &fetcher, "static-1.0", ORIGIN, &manifest(&["vendor/bootstrap.min.css"])).await.unwrap();

        let store = db.open_store("static-1.0").await.unwrap();
        let keys = store.keys().await.unwrap();
        assert_eq!(keys[0].url(), "http://localhost:8080/vendor/bootstrap.min.css");
    }

    #[tokio::test]
    async fn test_install_all_or_nothing_on_transport_error() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let fetcher = arc(
            FakeFetcher::new()
                .respond("http://localhost:8080/index.html", b"<html>")
                .unreachable("http://localhost:8080/main.js"),
        );

        let result = install(&db, &fetcher, "static-1.0", ORIGIN, &manifest(&["index.html", "main.js"])).await;
        assert!(matches!(result, Err(Error::InstallFailure(_))));

        let store = db.open_store("static-1.0").await.unwrap();
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_install_all_or_nothing_on_bad_status() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let fetcher = arc(
            FakeFetcher::new()
                .respond("http://localhost:8080/index.html", b"<html>")
                .respond_with_status("http://localhost:8080/missing.png", 404, b""),
        );

        let result = install(&db, &fetcher, "static-1.0", ORIGIN, &manifest(&["index.html", "missing.png"])).await;
        assert!(matches!(result, Err(Error::InstallFailure(_))));

        let store = db.open_store("static-1.0").await.unwrap();
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_install_empty_manifest_rejected() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let fetcher = arc(FakeFetcher::new());

        let result = install(&db, &fetcher, "static-1.0", ORIGIN, &[]).await;
        assert!(matches!(result, Err(Error::InstallFailure(_))));
    }

    #[tokio::test]
    async fn test_activate_sweeps_stale_versions_only() {
        let db = StoreDb::open_in_memory().await.unwrap();

        for name in ["static-0.9", "static-1.0", MEDIA_STORE] {
            db.open_store(name).await.unwrap();
        }

        activate(&db, "1.0").await.unwrap();

        let names = db.store_names().await.unwrap();
        assert_eq!(names, vec![MEDIA_STORE.to_string(), "static-1.0".to_string()]);
    }

    #[tokio::test]
    async fn test_activate_removes_stale_entries_with_store() {
        let db = StoreDb::open_in_memory().await.unwrap();

        let old = db.open_store("static-0.9").await.unwrap();
        let key = RequestKey::get("http://localhost:8080/index.html");
        old.put(&key, &crate::testutil::make_stored("http://localhost:8080/index.html", 200, b"old"))
            .await
            .unwrap();

        activate(&db, "1.0").await.unwrap();

        // Reopening the swept name yields a fresh, empty store.
        let reopened = db.open_store("static-0.9").await.unwrap();
        assert!(reopened.match_request(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_activate_with_no_stale_stores() {
        let db = StoreDb::open_in_memory().await.unwrap();
        db.open_store(&static_store_name("1.0")).await.unwrap();

        activate(&db, "1.0").await.unwrap();

        assert_eq!(db.store_names().await.unwrap(), vec!["static-1.0".to_string()]);
    }
}
