//! Build version tag and store naming.
//!
//! The shell store for a build is named by joining a fixed prefix with the
//! version tag, so activation can recognize stores left behind by older
//! builds purely by name.

/// Version tag of the current shell bundle.
pub const VERSION_TAG: &str = "1.0";

/// Prefix shared by every versioned shell store.
pub const STATIC_PREFIX: &str = "static-";

/// Name of the unversioned store holding third-party media.
pub const MEDIA_STORE: &str = "giphy";

/// Store name for the shell bundle of `version`.
pub fn static_store_name(version: &str) -> String {
    format!("{STATIC_PREFIX}{version}")
}

/// True if `name` is a shell store for some version.
pub fn is_static_store(name: &str) -> bool {
    name.starts_with(STATIC_PREFIX)
}

/// True if `name` is a shell store belonging to a version other than
/// `current`. The media store and other unversioned names never match.
pub fn is_stale_static_store(name: &str, current: &str) -> bool {
    is_static_store(name) && name != static_store_name(current)
}
