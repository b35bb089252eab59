//! URL canonicalization.
//!
//! The canonical form doubles as the cache key, so install, lookup, and
//! eviction must all run their URLs through [`canonicalize`] before touching
//! a store.

/// Why a URL could not be turned into a cache key.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    Parse(String),
}

/// Canonicalize a URL string into its cache-key form.
///
/// Whitespace is trimmed, a missing scheme defaults to https, the host is
/// lowercased, and the fragment is dropped. Path and query survive exactly
/// as given: their case and order are significant to the origin, so two
/// keys differ whenever the origin could answer differently.
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = if trimmed.contains("://") {
        url::Url::parse(trimmed)
    } else {
        url::Url::parse(&format!("https://{trimmed}"))
    }
    .map_err(|e| UrlError::Parse(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UrlError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    if let Some(host) = parsed.host_str() {
        let lowered = host.to_ascii_lowercase();
        if lowered != host {
            parsed
                .set_host(Some(&lowered))
                .map_err(|e| UrlError::Parse(e.to_string()))?;
        }
    }

    parsed.set_fragment(None);

    Ok(parsed)
}
