//! Trending request parameters and URL construction.

use serde::Serialize;

use super::GiphyError;

/// Request parameters for the Giphy trending endpoint.
///
/// Based on the Giphy API documentation:
/// https://developers.giphy.com/docs/api/endpoint#trending
#[derive(Debug, Clone, Serialize, Default)]
pub struct TrendingRequest {
    /// Number of GIFs to return (1-50, default 12).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u8>,

    /// Result offset (default 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,

    /// Content rating filter (e.g., "g", "pg-13").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

/// Largest offset the trending endpoint accepts.
const MAX_OFFSET: u32 = 4999;

/// Content ratings the API knows about.
const RATINGS: [&str; 4] = ["g", "pg", "pg-13", "r"];

impl TrendingRequest {
    /// Validate the request parameters.
    pub fn validate(&self) -> Result<(), GiphyError> {
        if let Some(limit) = self.limit
            && !(1..=50).contains(&limit)
        {
            return Err(GiphyError::InvalidLimit);
        }

        if let Some(offset) = self.offset
            && offset > MAX_OFFSET
        {
            return Err(GiphyError::InvalidOffset);
        }

        if let Some(rating) = &self.rating
            && !RATINGS.contains(&rating.as_str())
        {
            return Err(GiphyError::InvalidRating(rating.clone()));
        }

        Ok(())
    }

    /// Build the full request URL against `endpoint` with the API key attached.
    ///
    /// Query parameters are appended in a fixed order so equal requests
    /// produce byte-equal URLs, and therefore the same cache key.
    pub fn to_url(&self, endpoint: &str, api_key: &str) -> Result<url::Url, GiphyError> {
        self.validate()?;

        if api_key.is_empty() {
            return Err(GiphyError::MissingApiKey);
        }

        let mut url = url::Url::parse(endpoint).map_err(|e| GiphyError::InvalidEndpoint(e.to_string()))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", api_key);
            pairs.append_pair("limit", &self.get_limit().to_string());
            if let Some(offset) = self.offset {
                pairs.append_pair("offset", &offset.to_string());
            }
            if let Some(rating) = &self.rating {
                pairs.append_pair("rating", rating);
            }
        }

        Ok(url)
    }

    /// Get the effective limit (default 12).
    pub fn get_limit(&self) -> u8 {
        self.limit.unwrap_or(super::DEFAULT_LIMIT)
    }

    /// Get the effective offset (default 0).
    pub fn get_offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}
