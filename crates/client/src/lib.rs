//! Client code for gifwall.
//!
//! This crate provides the HTTP fetch pipeline and the Giphy trending API
//! surface shared by the worker and CLI.

pub mod fetch;
pub mod giphy;

pub use fetch::{FetchClient, FetchConfig, FetchResponse, Fetcher, canonicalize};
pub use giphy::{GiphyError, TrendingRequest, TrendingResponse, parse_trending};
