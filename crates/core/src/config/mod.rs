//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (GIFWALL_*)
//! 2. TOML config file (if GIFWALL_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::version;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (GIFWALL_*)
/// 2. TOML config file (if GIFWALL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Giphy API key for the trending endpoint.
    ///
    /// Set via GIFWALL_API_KEY environment variable.
    /// Required only when the trending fetch actually goes to the network.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Path to the SQLite store registry database.
    ///
    /// Set via GIFWALL_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Shell bundle version tag; names the versioned store.
    ///
    /// Set via GIFWALL_VERSION environment variable.
    #[serde(default = "default_version")]
    pub version: String,

    /// Origin the page's own assets are served from.
    ///
    /// Set via GIFWALL_PAGE_ORIGIN environment variable.
    #[serde(default = "default_page_origin")]
    pub page_origin: String,

    /// Trending API endpoint URL.
    ///
    /// Set via GIFWALL_TRENDING_ENDPOINT environment variable.
    #[serde(default = "default_trending_endpoint")]
    pub trending_endpoint: String,

    /// Host suffix identifying third-party media URLs.
    ///
    /// Set via GIFWALL_MEDIA_HOST_SUFFIX environment variable.
    #[serde(default = "default_media_host_suffix")]
    pub media_host_suffix: String,

    /// Path prefix identifying third-party media URLs.
    ///
    /// Set via GIFWALL_MEDIA_PATH_PREFIX environment variable.
    #[serde(default = "default_media_path_prefix")]
    pub media_path_prefix: String,

    /// Shell assets precached at install, as paths relative to the page
    /// origin.
    #[serde(default = "default_shell_manifest")]
    pub shell_manifest: Vec<String>,

    /// How many trending GIFs to request per page load.
    ///
    /// Set via GIFWALL_LIMIT environment variable.
    #[serde(default = "default_limit")]
    pub limit: u8,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via GIFWALL_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via GIFWALL_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via GIFWALL_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./gifwall.db")
}

fn default_version() -> String {
    version::VERSION_TAG.to_string()
}

fn default_page_origin() -> String {
    "http://localhost:8080".into()
}

fn default_trending_endpoint() -> String {
    "https://api.giphy.com/v1/gifs/trending".into()
}

fn default_media_host_suffix() -> String {
    "giphy.com".into()
}

fn default_media_path_prefix() -> String {
    "/media".into()
}

fn default_shell_manifest() -> Vec<String> {
    [
        "index.html",
        "main.js",
        "images/flame.png",
        "images/icon.png",
        "images/launch.png",
        "images/logo.png",
        "images/sync.png",
        "vendor/bootstrap.min.css",
        "vendor/jquery.min.js",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_limit() -> u8 {
    12
}

fn default_user_agent() -> String {
    "gifwall/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    10_485_760 // 10MB; downsized GIF renditions run large
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            db_path: default_db_path(),
            version: default_version(),
            page_origin: default_page_origin(),
            trending_endpoint: default_trending_endpoint(),
            media_host_suffix: default_media_host_suffix(),
            media_path_prefix: default_media_path_prefix(),
            shell_manifest: default_shell_manifest(),
            limit: default_limit(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Name of the versioned shell store for the configured version.
    pub fn static_store_name(&self) -> String {
        version::static_store_name(&self.version)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `GIFWALL_`
    /// 2. TOML file from `GIFWALL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("GIFWALL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("GIFWALL_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the Giphy API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the API key is not set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "api_key".into(),
            hint: "Set GIFWALL_API_KEY environment variable".into(),
        })
    }
}
