//! Core types and shared functionality for gifwall.
//!
//! This crate provides:
//! - The named store registry with a SQLite backend
//! - Version tag and store naming rules
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod version;

pub use cache::{RequestKey, Store, StoreDb, StoredResponse};
pub use config::AppConfig;
pub use error::Error;
