//! Client runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the dispatcher and shells. The intent is to avoid reading process-wide
//! environment variables during dispatch, which can lead to inconsistent behaviour in
//! multi-threaded runtimes and test harnesses.

use crate::constants::{DEFAULT_API_URL, QUERY_ENDPOINT_PATH};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("api base URL cannot be empty")]
    EmptyApiUrl,
    #[error("api base URL must start with http:// or https:// (got '{0}')")]
    InvalidApiUrl(String),
    #[error("unknown backend mode '{0}' (expected 'local' or 'remote')")]
    UnknownBackendMode(String),
}

/// Which backend answers queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendMode {
    /// The in-process simulator; no network involved.
    #[default]
    Local,
    /// A real HTTP backend at the configured base URL.
    Remote,
}

impl BackendMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendMode::Local => "local",
            BackendMode::Remote => "remote",
        }
    }
}

impl std::str::FromStr for BackendMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(BackendMode::Local),
            "remote" => Ok(BackendMode::Remote),
            other => Err(ConfigError::UnknownBackendMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    mode: BackendMode,
    api_base_url: String,
}

impl ClientConfig {
    /// Create a new `ClientConfig`. Trailing slashes on the base URL are
    /// tolerated and trimmed.
    pub fn new(mode: BackendMode, api_base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = api_base_url.into();
        let trimmed = raw.trim().trim_end_matches('/');

        if trimmed.is_empty() {
            return Err(ConfigError::EmptyApiUrl);
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(ConfigError::InvalidApiUrl(trimmed.to_string()));
        }

        Ok(Self {
            mode,
            api_base_url: trimmed.to_string(),
        })
    }

    /// Resolve configuration from optional environment values without
    /// reading environment variables directly.
    ///
    /// `mode` comes from `FDQ_BACKEND` ("local" when unset), `api_url` from
    /// `FDQ_API_URL` (a local address when unset). Empty or whitespace-only
    /// values count as unset.
    pub fn from_env_values(
        mode: Option<String>,
        api_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mode = match non_empty(mode) {
            Some(raw) => raw.parse::<BackendMode>()?,
            None => BackendMode::default(),
        };
        let api_url = non_empty(api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self::new(mode, api_url)
    }

    pub fn mode(&self) -> BackendMode {
        self.mode
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// The fully-resolved query endpoint.
    pub fn query_endpoint(&self) -> String {
        format!("{}{}", self.api_base_url, QUERY_ENDPOINT_PATH)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_mode_and_local_address() {
        let config = ClientConfig::from_env_values(None, None).expect("config");
        assert_eq!(config.mode(), BackendMode::Local);
        assert_eq!(config.api_base_url(), "http://localhost:8000");
        assert_eq!(config.query_endpoint(), "http://localhost:8000/query");
    }

    #[test]
    fn empty_env_values_count_as_unset() {
        let config =
            ClientConfig::from_env_values(Some("  ".into()), Some("".into())).expect("config");
        assert_eq!(config.mode(), BackendMode::Local);
        assert_eq!(config.api_base_url(), "http://localhost:8000");
    }

    #[test]
    fn parses_remote_mode_case_insensitively() {
        let config =
            ClientConfig::from_env_values(Some("Remote".into()), None).expect("config");
        assert_eq!(config.mode(), BackendMode::Remote);
    }

    #[test]
    fn rejects_unknown_backend_mode() {
        let err = ClientConfig::from_env_values(Some("cloud".into()), None).expect_err("invalid");
        assert!(matches!(err, ConfigError::UnknownBackendMode(m) if m == "cloud"));
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let config = ClientConfig::new(BackendMode::Remote, "http://api.example.org:8000/")
            .expect("config");
        assert_eq!(config.query_endpoint(), "http://api.example.org:8000/query");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = ClientConfig::new(BackendMode::Remote, "ftp://api.example.org").expect_err("invalid");
        assert!(matches!(err, ConfigError::InvalidApiUrl(_)));
    }
}
