//! Request routing.
//!
//! Predicates are evaluated in a fixed order and the first match wins:
//! page-origin assets, then the trending API, then GIF media. The order is
//! load-bearing; it encodes which store a contested URL lands in. Anything
//! unmatched is left to the network.

use url::Url;

use gifwall_core::{AppConfig, Error};

/// Where a matched request is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Same-origin shell asset: cache-first against the versioned store.
    Shell,
    /// Trending API call: network-first against the versioned store.
    Trending,
    /// GIF media: cache-first against the shared media store.
    Media,
}

/// Ordered predicate table deciding which requests are intercepted.
#[derive(Debug, Clone)]
pub struct RouteTable {
    page_origin: url::Origin,
    trending_host: String,
    trending_path: String,
    media_host_suffix: String,
    media_path_prefix: String,
}

impl RouteTable {
    /// Build the table from configuration.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let origin_url = Url::parse(&config.page_origin)
            .map_err(|e| Error::InvalidUrl(format!("page_origin {}: {}", config.page_origin, e)))?;
        let trending_url = Url::parse(&config.trending_endpoint)
            .map_err(|e| Error::InvalidUrl(format!("trending_endpoint {}: {}", config.trending_endpoint, e)))?;

        let trending_host = trending_url
            .host_str()
            .ok_or_else(|| Error::InvalidUrl(format!("trending_endpoint {} has no host", config.trending_endpoint)))?
            .to_string();

        Ok(Self {
            page_origin: origin_url.origin(),
            trending_host,
            trending_path: trending_url.path().to_string(),
            media_host_suffix: config.media_host_suffix.clone(),
            media_path_prefix: config.media_path_prefix.clone(),
        })
    }

    /// Classify a canonicalized URL. `None` means the request is not
    /// intercepted and default network behavior applies.
    pub fn classify(&self, url: &Url) -> Option<Route> {
        if url.origin() == self.page_origin {
            return Some(Route::Shell);
        }

        if self.is_trending(url) {
            return Some(Route::Trending);
        }

        if self.is_media(url) {
            return Some(Route::Media);
        }

        None
    }

    fn is_trending(&self, url: &Url) -> bool {
        url.host_str() == Some(self.trending_host.as_str()) && url.path().starts_with(&self.trending_path)
    }

    fn is_media(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };

        let host_matches =
            host == self.media_host_suffix || host.ends_with(&format!(".{}", self.media_host_suffix));

        host_matches && url.path().starts_with(&self.media_path_prefix)
    }
}
