//! Giphy trending API surface.
//!
//! Builds trending request URLs and normalizes responses. The HTTP round
//! trip itself goes through the offline worker so the result lands in the
//! versioned cache; this module never owns a connection.
//!
//! ### Specification
//!
//! - **Endpoint**: `https://api.giphy.com/v1/gifs/trending`
//! - **Authentication**: `api_key` query parameter.
//! - **Normalization**: Keeps the `downsized_large` rendition per GIF, the
//!   one the page embeds, and drops records without it.

pub mod error;
pub mod request;
pub mod response;

pub use error::GiphyError;
pub use request::TrendingRequest;
pub use response::{GifObject, GiphyApiResponse, TrendingGif, TrendingResponse, parse_trending};

/// Default trending endpoint.
pub const DEFAULT_TRENDING_ENDPOINT: &str = "https://api.giphy.com/v1/gifs/trending";

/// Default number of GIFs per request, matching what the page renders.
pub const DEFAULT_LIMIT: u8 = 12;
