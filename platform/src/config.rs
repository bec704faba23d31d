//! API endpoint configuration.
//!
//! The only tunable is the base URL; the browser bakes it in at compile time
//! and the CLI takes it from flags or the environment.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

/// Base URL used when nothing overrides it.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Client-side request timeout. Generous so cold-starting backends still answer.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings shared by every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiConfig {
    /// Build a config for `base_url`. Trailing slashes are dropped.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = if trimmed.is_empty() { DEFAULT_BASE_URL } else { trimmed };
        Self { base_url: base_url.to_owned(), timeout: REQUEST_TIMEOUT }
    }

    /// Config from the `LLL_API_URL` value captured at compile time.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::new(option_env!("LLL_API_URL").unwrap_or(DEFAULT_BASE_URL))
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for an API path such as `/markets/active`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.base_url)
    }
}
