//! Client context for talking to the portfolio API.
//!
//! Base URL and CSRF token are passed explicitly to the submitter rather
//! than installed as process-wide request defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default API origin for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Bulk trade creation endpoint, relative to the API origin.
pub const DEFAULT_BULK_PATH: &str = "/portfolio/api/bulk-trades/";

/// Header carrying the CSRF token.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Request timeout for the native submitter.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables read by [`ClientContext::from_env`].
pub const ENV_API_URL: &str = "TRADELOAD_API_URL";
pub const ENV_CSRF_TOKEN: &str = "TRADELOAD_CSRF_TOKEN";
pub const ENV_BULK_PATH: &str = "TRADELOAD_BULK_PATH";
pub const ENV_TIMEOUT_SECS: &str = "TRADELOAD_TIMEOUT_SECS";

/// Where and how to reach the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientContext {
    /// API origin, e.g. `https://tracker.example.com`. Empty means same-origin.
    pub base_url: String,
    /// Value sent in the `X-CSRFToken` header.
    pub csrf_token: Option<String>,
    /// Path of the bulk endpoint.
    pub bulk_path: String,
    pub timeout_secs: u64,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            csrf_token: None,
            bulk_path: DEFAULT_BULK_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.csrf_token = if token.trim().is_empty() { None } else { Some(token) };
        self
    }

    pub fn with_bulk_path(mut self, path: impl Into<String>) -> Self {
        self.bulk_path = path.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Build from `TRADELOAD_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ctx = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            ctx.base_url = url;
        }
        if let Some(token) = lookup(ENV_CSRF_TOKEN) {
            ctx = ctx.with_csrf_token(token);
        }
        if let Some(path) = lookup(ENV_BULK_PATH) {
            ctx.bulk_path = path;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            ctx.timeout_secs = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS,
                message: format!("'{}' is not a number of seconds", secs),
            })?;
        }

        ctx.validate()?;
        Ok(ctx)
    }

    /// Check that the context can produce a request URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.base_url.trim();
        if !base.is_empty() && !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: ENV_API_URL,
                message: format!("'{}' must start with http:// or https://", base),
            });
        }
        if self.bulk_path.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_BULK_PATH));
        }
        Ok(())
    }

    /// Full URL of the bulk endpoint.
    pub fn bulk_url(&self) -> String {
        join_url(&self.base_url, &self.bulk_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let path = path.trim();
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!("{}/{}", base, path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let ctx = ClientContext::from_lookup(lookup(&[])).unwrap();
        assert_eq!(ctx.bulk_url(), "http://localhost:8000/portfolio/api/bulk-trades/");
        assert_eq!(ctx.csrf_token, None);
        assert_eq!(ctx.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_lookup() {
        let ctx = ClientContext::from_lookup(lookup(&[
            (ENV_API_URL, "https://tracker.example.com/"),
            (ENV_CSRF_TOKEN, "abc123"),
            (ENV_BULK_PATH, "api/bulk/"),
            (ENV_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();

        assert_eq!(ctx.bulk_url(), "https://tracker.example.com/api/bulk/");
        assert_eq!(ctx.csrf_token.as_deref(), Some("abc123"));
        assert_eq!(ctx.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_timeout() {
        let err = ClientContext::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_TIMEOUT_SECS, .. }));
    }

    #[test]
    fn test_invalid_url() {
        let err = ClientContext::from_lookup(lookup(&[(ENV_API_URL, "localhost:8000")])).unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_blank_token_is_none() {
        let ctx = ClientContext::default().with_csrf_token("  ");
        assert_eq!(ctx.csrf_token, None);
    }

    #[test]
    fn test_same_origin_url() {
        let ctx = ClientContext::new("");
        assert_eq!(ctx.bulk_url(), "/portfolio/api/bulk-trades/");
    }
}
