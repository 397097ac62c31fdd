//! Tap configuration
//!
//! The tap is configured with a JSON document holding the vendor
//! credentials and the account domain, plus a few optional knobs for the
//! HTTP client. Missing credentials are a fatal startup error.

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Fields that must be present (and non-blank) in every config
pub const REQUIRED_CONFIG_KEYS: [&str; 3] = ["api_token", "api_token_secret", "domain"];

/// Vendor API version segment
pub const API_VERSION: &str = "5";

/// Validated tap configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapConfig {
    /// API token sent as a query parameter on every request
    pub api_token: String,

    /// API token secret sent as a query parameter on every request
    pub api_token_secret: String,

    /// Account domain, e.g. `api.alchemer.com` or `api.alchemer.eu`
    pub domain: String,

    /// Override for the API root (defaults to `https://{domain}/v5`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Attempts per request before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts
    #[serde(default = "default_retry_wait_seconds")]
    pub retry_wait_seconds: u64,

    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Page size override; the vendor default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_per_page: Option<u32>,

    /// Pause between per-question option fetches
    #[serde(default)]
    pub option_fetch_delay_seconds: u64,
}

fn default_max_attempts() -> u32 {
    10
}

fn default_retry_wait_seconds() -> u64 {
    3
}

fn default_timeout_seconds() -> u64 {
    30
}

impl TapConfig {
    /// Build a config from the three required values, everything else default
    pub fn new(
        api_token: impl Into<String>,
        api_token_secret: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            api_token_secret: api_token_secret.into(),
            domain: domain.into(),
            base_url: None,
            max_attempts: default_max_attempts(),
            retry_wait_seconds: default_retry_wait_seconds(),
            timeout_seconds: default_timeout_seconds(),
            results_per_page: None,
            option_fetch_delay_seconds: 0,
        }
    }

    /// Parse and validate a config from a JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::config("Config must be a JSON object"))?;

        for key in REQUIRED_CONFIG_KEYS {
            let present = object
                .get(key)
                .and_then(serde_json::Value::as_str)
                .is_some_and(|s| !s.trim().is_empty());
            if !present {
                return Err(Error::missing_field(key));
            }
        }

        let config: TapConfig = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from an inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::invalid_value("max_attempts", "must be at least 1"));
        }
        if self.results_per_page == Some(0) {
            return Err(Error::invalid_value(
                "results_per_page",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// API root every endpoint path is appended to
    pub fn api_root(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}/v{API_VERSION}", self.domain),
        }
    }

    /// HTTP client settings derived from this config
    pub fn client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.api_root())
            .credentials(&self.api_token, &self.api_token_secret)
            .max_attempts(self.max_attempts)
            .retry_wait(Duration::from_secs(self.retry_wait_seconds))
            .timeout(Duration::from_secs(self.timeout_seconds));

        if let Some(size) = self.results_per_page {
            builder = builder.results_per_page(size);
        }

        builder.build()
    }

    /// Delay between per-question option fetches
    pub fn option_fetch_delay(&self) -> Duration {
        Duration::from_secs(self.option_fetch_delay_seconds)
    }
}
