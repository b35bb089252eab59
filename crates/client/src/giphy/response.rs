//! Giphy API response types and normalization.

use serde::{Deserialize, Serialize};

use super::GiphyError;

/// Raw response from the Giphy trending API.
#[derive(Debug, Deserialize)]
pub struct GiphyApiResponse {
    #[serde(default)]
    pub data: Vec<GifObject>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Individual GIF record from Giphy.
#[derive(Debug, Deserialize)]
pub struct GifObject {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Landing page on giphy.com.
    #[serde(default)]
    pub url: String,
    pub images: Images,
}

/// Rendition map for a GIF. Only the rendition the page embeds is decoded;
/// the rest of the map is ignored.
#[derive(Debug, Deserialize)]
pub struct Images {
    #[serde(default)]
    pub downsized_large: Option<Rendition>,
}

/// A single rendition of a GIF. Giphy reports dimensions as strings.
#[derive(Debug, Deserialize)]
pub struct Rendition {
    pub url: String,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
}

/// Pagination block from Giphy.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Meta block from Giphy.
#[derive(Debug, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub response_id: String,
}

/// Normalized trending response for internal use.
#[derive(Debug, Clone, Serialize)]
pub struct TrendingResponse {
    pub gifs: Vec<TrendingGif>,
    pub total_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

/// Normalized GIF entry.
#[derive(Debug, Clone, Serialize)]
pub struct TrendingGif {
    pub id: String,
    pub title: String,
    /// Landing page on giphy.com.
    pub page_url: String,
    /// The rendition URL the page embeds. These are the URLs the media cache
    /// keys on and the eviction message lists.
    pub media_url: String,
}

impl From<GiphyApiResponse> for TrendingResponse {
    /// Convert a raw Giphy payload to the normalized internal shape.
    ///
    /// Records without a `downsized_large` rendition are dropped; the page
    /// has nothing to embed for them.
    fn from(raw: GiphyApiResponse) -> Self {
        let gifs = raw
            .data
            .into_iter()
            .filter_map(|gif| {
                gif.images.downsized_large.map(|rendition| TrendingGif {
                    id: gif.id,
                    title: gif.title,
                    page_url: gif.url,
                    media_url: rendition.url,
                })
            })
            .collect();

        TrendingResponse {
            gifs,
            total_count: raw.pagination.map(|p| p.total_count).unwrap_or_default(),
            response_id: raw.meta.map(|m| m.response_id).filter(|id| !id.is_empty()),
        }
    }
}

impl TrendingResponse {
    /// Rendition URLs currently trending, in page order.
    pub fn media_urls(&self) -> Vec<String> {
        self.gifs.iter().map(|g| g.media_url.clone()).collect()
    }

    /// Get the number of GIFs.
    pub fn gif_count(&self) -> usize {
        self.gifs.len()
    }
}

/// Parse raw response bytes from the trending endpoint.
pub fn parse_trending(bytes: &[u8]) -> Result<TrendingResponse, GiphyError> {
    let raw: GiphyApiResponse = serde_json::from_slice(bytes).map_err(|e| GiphyError::Parse(e.to_string()))?;
    Ok(raw.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "data": [
            {
                "id": "abc123",
                "title": "Excited Dog GIF",
                "url": "https://giphy.com/gifs/abc123",
                "images": {
                    "downsized_large": {
                        "url": "https://media2.giphy.com/media/abc123/giphy-downsized-large.gif",
                        "width": "480",
                        "height": "270"
                    },
                    "fixed_height": {
                        "url": "https://media2.giphy.com/media/abc123/200.gif"
                    }
                }
            },
            {
                "id": "def456",
                "title": "Space Cat GIF",
                "url": "https://giphy.com/gifs/def456",
                "images": {
                    "downsized_large": {
                        "url": "https://media0.giphy.com/media/def456/giphy-downsized-large.gif",
                        "width": "400",
                        "height": "400"
                    }
                }
            }
        ],
        "pagination": {"total_count": 2412, "count": 2, "offset": 0},
        "meta": {"status": 200, "msg": "OK", "response_id": "resp-1"}
    }"#;

    #[test]
    fn test_deserialize_giphy_response() {
        let response: GiphyApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].id, "abc123");
        assert!(response.data[0].images.downsized_large.is_some());
        assert_eq!(response.pagination.unwrap().total_count, 2412);
        assert_eq!(response.meta.unwrap().response_id, "resp-1");
    }

    #[test]
    fn test_normalize_to_trending_response() {
        let raw: GiphyApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let normalized: TrendingResponse = raw.into();

        assert_eq!(normalized.gifs.len(), 2);
        assert_eq!(normalized.total_count, 2412);
        assert_eq!(normalized.response_id.as_deref(), Some("resp-1"));

        let first = &normalized.gifs[0];
        assert_eq!(first.id, "abc123");
        assert_eq!(first.title, "Excited Dog GIF");
        assert_eq!(first.page_url, "https://giphy.com/gifs/abc123");
        assert_eq!(first.media_url, "https://media2.giphy.com/media/abc123/giphy-downsized-large.gif");
    }

    #[test]
    fn test_record_without_rendition_dropped() {
        let json = r#"{
            "data": [
                {"id": "a", "title": "Has one", "url": "https://giphy.com/gifs/a",
                 "images": {"downsized_large": {"url": "https://media.giphy.com/media/a/giphy.gif"}}},
                {"id": "b", "title": "Has none", "url": "https://giphy.com/gifs/b", "images": {}}
            ]
        }"#;

        let normalized = parse_trending(json.as_bytes()).unwrap();
        assert_eq!(normalized.gifs.len(), 1);
        assert_eq!(normalized.gifs[0].id, "a");
    }

    #[test]
    fn test_empty_data() {
        let json = r#"{"data": [], "pagination": {"total_count": 0, "count": 0, "offset": 0}}"#;
        let normalized = parse_trending(json.as_bytes()).unwrap();

        assert_eq!(normalized.gif_count(), 0);
        assert_eq!(normalized.total_count, 0);
        assert!(normalized.response_id.is_none());
    }

    #[test]
    fn test_media_urls_in_page_order() {
        let raw: GiphyApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let normalized: TrendingResponse = raw.into();

        assert_eq!(
            normalized.media_urls(),
            vec![
                "https://media2.giphy.com/media/abc123/giphy-downsized-large.gif".to_string(),
                "https://media0.giphy.com/media/def456/giphy-downsized-large.gif".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_trending_invalid_json() {
        let result = parse_trending(b"<html>504 Gateway Timeout</html>");
        assert!(matches!(result, Err(GiphyError::Parse(_))));
    }
}
