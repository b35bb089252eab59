//! Giphy API error types.

/// Errors from the Giphy trending API surface.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GiphyError {
    /// No API key configured.
    #[error("missing API key: GIFWALL_API_KEY not set")]
    MissingApiKey,

    /// Invalid limit parameter (must be 1-50).
    #[error("invalid limit: must be 1-50")]
    InvalidLimit,

    /// Offset past what the API will page to.
    #[error("invalid offset: must not exceed 4999")]
    InvalidOffset,

    /// Rating outside the set the API defines.
    #[error("invalid rating: '{0}' is not one of g, pg, pg-13, r")]
    InvalidRating(String),

    /// Endpoint URL failed to parse.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Response body was not the expected JSON shape.
    #[error("parse error: {0}")]
    Parse(String),
}
