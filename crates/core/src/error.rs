//! Unified error types for gifwall.
//!
//! Display strings carry stable SCREAMING_CASE codes so log lines and CLI
//! output can be grepped by kind.

use tokio_rusqlite::rusqlite;

/// Unified error types shared across the gifwall crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty store name).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Request URL failed to parse or canonicalize.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network-level failure: unreachable host, refused connection, DNS.
    #[error("TRANSPORT_FAILURE: {0}")]
    TransportFailure(String),

    /// Fetch timed out at the transport layer.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Response body exceeded the configured size cap.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Non-2xx HTTP status where a success was required.
    #[error("BAD_STATUS: {0}")]
    BadStatus(u16),

    /// No cache entry found where one was required.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// One or more shell assets failed to fetch during install.
    #[error("INSTALL_FAILED: {0}")]
    InstallFailure(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl Error {
    /// True for failures the network-first strategy recovers from by
    /// falling back to the cache.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::TransportFailure(_) | Error::FetchTimeout(_) | Error::FetchTooLarge(_) | Error::BadStatus(_)
        )
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
