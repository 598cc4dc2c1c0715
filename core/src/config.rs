//! Connection settings for a panel instance.
//!
//! # Design
//! `PanelConfig` is validated once at construction and read-only afterwards.
//! The API key is wrapped in `ApiKey` so it never shows up in `Debug`
//! output or log lines.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use url::Url;

pub const ENV_URL: &str = "PANEL_URL";
pub const ENV_API_KEY: &str = "PANEL_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "PANEL_TIMEOUT_SECS";

const DEFAULT_USER_AGENT: &str = concat!("panel-core/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid panel URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("panel URL must use http or https, got {0:?}")]
    UnsupportedScheme(String),

    #[error("API key must not be empty")]
    EmptyApiKey,

    #[error("invalid timeout {0:?}, expected whole seconds")]
    InvalidTimeout(String),
}

/// Panel API token.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct PanelConfig {
    base_url: String,
    api_key: ApiKey,
    timeout: Option<Duration>,
    user_agent: String,
}

impl PanelConfig {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: ApiKey::new(api_key)?,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Reads `PANEL_URL`, `PANEL_API_KEY` and the optional
    /// `PANEL_TIMEOUT_SECS`, loading a `.env` file first when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_err() {
            debug!("no .env file loaded, reading panel settings from the process environment");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(ENV_URL).ok_or(ConfigError::Missing(ENV_URL))?;
        let key = lookup(ENV_API_KEY).ok_or(ConfigError::Missing(ENV_API_KEY))?;
        let mut config = Self::new(&url, key)?;
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = PanelConfig::new("https://panel.example.com/", "ptlc_key").unwrap();
        assert_eq!(config.base_url(), "https://panel.example.com");
    }

    #[test]
    fn api_path_prefix_is_kept() {
        let config = PanelConfig::new("https://panel.example.com/api/", "ptlc_key").unwrap();
        assert_eq!(config.base_url(), "https://panel.example.com/api");
    }

    #[test]
    fn rejects_unparseable_url() {
        let err = PanelConfig::new("not a url", "ptlc_key").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = PanelConfig::new("ftp://panel.example.com", "ptlc_key").unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedScheme("ftp".to_string()));
    }

    #[test]
    fn rejects_blank_key() {
        let err = PanelConfig::new("https://panel.example.com", "  ").unwrap_err();
        assert_eq!(err, ConfigError::EmptyApiKey);
    }

    #[test]
    fn debug_output_hides_key() {
        let config = PanelConfig::new("https://panel.example.com", "ptlc_secret").unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("ptlc_secret"));
        assert!(printed.contains("ApiKey(***)"));
    }

    #[test]
    fn bearer_header_value() {
        let key = ApiKey::new("ptlc_secret").unwrap();
        assert_eq!(key.bearer(), "Bearer ptlc_secret");
    }

    #[test]
    fn default_user_agent_names_crate() {
        let config = PanelConfig::new("http://localhost", "k").unwrap();
        assert!(config.user_agent().starts_with("panel-core/"));
        let config = config.with_user_agent("my-bot/1.0");
        assert_eq!(config.user_agent(), "my-bot/1.0");
    }

    #[test]
    fn lookup_reads_all_settings() {
        let config = PanelConfig::from_lookup(lookup_from(&[
            (ENV_URL, "https://panel.example.com"),
            (ENV_API_KEY, "ptlc_key"),
            (ENV_TIMEOUT_SECS, "15"),
        ]))
        .unwrap();
        assert_eq!(config.base_url(), "https://panel.example.com");
        assert_eq!(config.api_key().expose(), "ptlc_key");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn lookup_without_timeout_leaves_it_unset() {
        let config = PanelConfig::from_lookup(lookup_from(&[
            (ENV_URL, "https://panel.example.com"),
            (ENV_API_KEY, "ptlc_key"),
        ]))
        .unwrap();
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn lookup_reports_missing_key() {
        let err = PanelConfig::from_lookup(lookup_from(&[(ENV_URL, "https://panel.example.com")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_API_KEY));
    }

    #[test]
    fn lookup_rejects_bad_timeout() {
        let err = PanelConfig::from_lookup(lookup_from(&[
            (ENV_URL, "https://panel.example.com"),
            (ENV_API_KEY, "ptlc_key"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("soon".to_string()));
    }
}
