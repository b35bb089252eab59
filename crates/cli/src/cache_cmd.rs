//! Cache maintenance commands, for poking at the stores between launches.

use anyhow::{Context, Result};
use gifwall_client::fetch::canonicalize;
use gifwall_core::{AppConfig, Error, RequestKey, StoreDb};
use gifwall_worker::clean_media_cache;

use crate::cli::CacheCommand;

pub async fn run(command: &CacheCommand, config: &AppConfig) -> Result<()> {
    let db = StoreDb::open(&config.db_path).await.context("failed to open cache database")?;

    match command {
        CacheCommand::Stores => stores(&db).await,
        CacheCommand::Show { url } => show(&db, url).await,
        CacheCommand::Evict { keep } => evict(&db, keep).await,
    }
}

async fn stores(db: &StoreDb) -> Result<()> {
    let stats = db.store_stats().await?;

    if stats.is_empty() {
        println!("no stores");
        return Ok(());
    }

    for (name, entries) in stats {
        println!("{name:<24} {entries} entries");
    }

    Ok(())
}

/// Look a URL up across every store, the way the worker would after
/// canonicalizing it. Exits nonzero when nothing matches.
async fn show(db: &StoreDb, url: &str) -> Result<()> {
    let canonical = canonicalize(url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let key = RequestKey::get(canonical.as_str());

    for name in db.store_names().await? {
        let store = db.open_store(&name).await?;
        if let Some(response) = store.match_request(&key).await? {
            println!("store:        {name}");
            println!("url:          {}", response.url);
            println!("status:       {}", response.status);
            println!("content-type: {}", response.content_type.as_deref().unwrap_or("-"));
            println!("fetched-at:   {}", response.fetched_at);
            println!("body:         {} bytes", response.body.len());
            return Ok(());
        }
    }

    Err(Error::CacheMiss(canonical.to_string()).into())
}

async fn evict(db: &StoreDb, keep: &[String]) -> Result<()> {
    let deleted = clean_media_cache(db, keep).await?;
    println!("evicted {deleted} entries");
    Ok(())
}
