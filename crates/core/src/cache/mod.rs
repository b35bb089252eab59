//! SQLite-backed named response stores.
//!
//! This module provides the persistent key-response stores behind the
//! caching strategies, with async access via tokio-rusqlite. It supports:
//!
//! - Named stores created lazily on first open, sharing one database
//! - Request-keyed response entries with last-write-wins replacement
//! - Whole-store deletion for version cleanup
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod migrations;
pub mod registry;
pub mod responses;

pub use crate::Error;

pub use connection::StoreDb;
pub use registry::Store;
pub use responses::{RequestKey, StoredResponse};
