//! Post-load checks for `AppConfig`.
//!
//! Figment will happily deserialize values the rest of the system cannot
//! work with; `validate()` rejects those up front so failures name the
//! offending field instead of surfacing later as a bad request or a
//! zero-byte body cap.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

/// Largest accepted response body cap. Downsized GIFs stay well under
/// this; anything bigger points at a misconfigured value.
const MAX_BYTES_CEILING: usize = 50 * 1024 * 1024;

impl AppConfig {
    /// Check loaded values before anything opens a connection or builds
    /// a client from them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first field that is out
    /// of range: a zero or oversized `max_bytes`, a `timeout_ms` outside
    /// 100ms..5min, an empty `user_agent` or `version`, a `limit` outside
    /// 1..=50, a page origin or trending endpoint that is not http(s), or
    /// a shell manifest that is empty or lists absolute paths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > MAX_BYTES_CEILING {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.version.is_empty() {
            return Err(invalid("version", "must not be empty"));
        }

        if self.limit == 0 || self.limit > 50 {
            return Err(invalid("limit", "must be between 1 and 50"));
        }

        for (field, value) in [("page_origin", &self.page_origin), ("trending_endpoint", &self.trending_endpoint)] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(invalid(field, "must be an http(s) URL"));
            }
        }

        if self.shell_manifest.is_empty() {
            return Err(invalid("shell_manifest", "must list at least one asset"));
        }
        if let Some(bad) = self.shell_manifest.iter().find(|p| p.starts_with('/')) {
            return Err(invalid("shell_manifest", format!("entries must be relative to the page origin, got '{bad}'")));
        }

        Ok(())
    }
}
