//! The offline worker for gifwall.
//!
//! Implements the caching core: the two caching strategies over named
//! response stores, the install/activate lifecycle, page-driven eviction,
//! and the request router that ties them together.

pub mod evict;
pub mod lifecycle;
pub mod message;
pub mod router;
pub mod strategy;
pub mod worker;

#[cfg(test)]
mod testutil;

pub use evict::clean_media_cache;
pub use lifecycle::LifecyclePhase;
pub use message::PageMessage;
pub use router::{Route, RouteTable};
pub use worker::{FetchOutcome, Worker};
