//! Command-line argument parsing.
//!
//! Flags override the loaded configuration but never replace it; everything
//! not given on the command line keeps its configured value.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gifwall_core::AppConfig;

/// Trending GIF wall with an offline cache
#[derive(Parser, Debug)]
#[command(name = "gifwall")]
#[command(about = "Trending GIF wall that keeps working offline")]
#[command(version)]
pub struct Cli {
    /// Path to the cache database
    #[arg(long, value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// How many GIFs to request (1-50)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=50))]
    pub limit: Option<u8>,

    /// Skip the network entirely and serve from the cache
    #[arg(long)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect or maintain the cache stores
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// List stores and their entry counts
    Stores,
    /// Show metadata for one cached response
    Show {
        /// URL of the cached response
        url: String,
    },
    /// Delete media entries that are not in the kept set
    Evict {
        /// URL to keep; repeat for each. With none, the media store is cleared
        #[arg(long = "keep", value_name = "URL")]
        keep: Vec<String>,
    },
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
    }
}
