//! HTTP client with bounded retry
//!
//! Provides the vendor HTTP client that handles:
//! - URL construction from path segments and query parameters
//! - Credential query parameters on every request
//! - A fixed number of attempts with a fixed delay between them
//! - Envelope unwrapping and the empty-payload sentinel

use crate::error::{Error, Result};
use crate::types::{is_truthy, JsonObject};
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// API root all endpoint paths are appended to
    pub base_url: Option<String>,
    /// API token query parameter
    pub api_token: String,
    /// API token secret query parameter
    pub api_token_secret: String,
    /// Request timeout
    pub timeout: Duration,
    /// Attempts per request (first try included)
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub retry_wait: Duration,
    /// Page size override, sent as `resultsperpage`
    pub results_per_page: Option<u32>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_token: String::new(),
            api_token_secret: String::new(),
            timeout: Duration::from_secs(30),
            max_attempts: 10,
            retry_wait: Duration::from_secs(3),
            results_per_page: None,
            user_agent: format!("alchemer-tap/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the API credentials
    pub fn credentials(mut self, token: impl Into<String>, secret: impl Into<String>) -> Self {
        self.config.api_token = token.into();
        self.config.api_token_secret = secret.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set attempts per request
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Set the delay between attempts
    pub fn retry_wait(mut self, wait: Duration) -> Self {
        self.config.retry_wait = wait;
        self
    }

    /// Set the page size override
    pub fn results_per_page(mut self, size: u32) -> Self {
        self.config.results_per_page = Some(size);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Query parameters for a single request
///
/// An owned value: deriving the parameters for another page produces a new
/// value and leaves the original untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    params: BTreeMap<String, String>,
}

impl RequestParams {
    /// Create empty request parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Copy of these parameters pointing at another page
    #[must_use]
    pub fn for_page(&self, page: u64) -> Self {
        self.clone().with("page", page)
    }

    /// Get a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Check whether a parameter is set
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over parameters
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if there are no parameters
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Page these parameters request (1 when unset)
    pub fn page(&self) -> u64 {
        self.get("page").and_then(|p| p.parse().ok()).unwrap_or(1)
    }
}

/// What part of the response body a fetch returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Only the inner `data` value when the body has one
    Unwrap,
    /// The whole body, pagination metadata included
    Keep,
}

/// HTTP client for the vendor API
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Build the full request URL
    ///
    /// Empty path segments are skipped. Credentials come first, followed by
    /// the page size override (when configured), `page` (defaulting to 1)
    /// and the caller's parameters.
    pub fn build_url<S: AsRef<str>>(&self, segments: &[S], params: &RequestParams) -> Result<Url> {
        let base = self
            .config
            .base_url
            .as_deref()
            .ok_or_else(|| Error::config("HTTP client has no base URL"))?
            .trim_end_matches('/');

        let endpoint = endpoint_path(segments);
        let mut url = Url::parse(&format!("{base}/{endpoint}/"))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_token", &self.config.api_token);
            query.append_pair("api_token_secret", &self.config.api_token_secret);

            if let Some(size) = self.config.results_per_page {
                if !params.contains("resultsperpage") {
                    query.append_pair("resultsperpage", &size.to_string());
                }
            }
            if !params.contains("page") {
                query.append_pair("page", "1");
            }
            for (key, value) in params.iter() {
                query.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// GET an endpoint, retrying failed attempts
    ///
    /// Returns the parsed body (or its `data` value, see [`Envelope`]).
    /// An empty or falsy payload comes back as an empty object. When every
    /// attempt fails the error is [`Error::RetriesExhausted`].
    pub async fn fetch<S: AsRef<str>>(
        &self,
        segments: &[S],
        params: &RequestParams,
        envelope: Envelope,
    ) -> Result<Value> {
        let url = self.build_url(segments, params)?;
        let endpoint = endpoint_path(segments);
        let max_attempts = self.config.max_attempts.max(1);

        info!("Fetching endpoint: {} page: {}", endpoint, params.page());

        let mut last_error = None;
        for attempt in 1..=max_attempts {
            match self.get_json(&url).await {
                Ok(body) => {
                    debug!("Request succeeded: GET {} (attempt {})", url.path(), attempt);
                    return Ok(unwrap_envelope(body, envelope));
                }
                Err(e) => {
                    if attempt < max_attempts {
                        warn!(
                            "{}, attempt {}/{}, trying again in {:?}",
                            e, attempt, max_attempts, self.config.retry_wait
                        );
                        tokio::time::sleep(self.config.retry_wait).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        error!("All {} attempts failed for {}", max_attempts, url.path());
        Err(Error::RetriesExhausted {
            url: url.path().to_string(),
            attempts: max_attempts,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    /// Issue one GET and parse the body as JSON
    async fn get_json(&self, url: &Url) -> Result<Value> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("max_attempts", &self.config.max_attempts)
            .field("retry_wait", &self.config.retry_wait)
            .finish_non_exhaustive()
    }
}

/// Join non-empty path segments with `/`
pub fn endpoint_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Apply the envelope rule and the empty-payload sentinel
fn unwrap_envelope(body: Value, envelope: Envelope) -> Value {
    let payload = match (envelope, body) {
        (Envelope::Unwrap, Value::Object(mut map)) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        (_, body) => body,
    };

    if is_truthy(&payload) {
        payload
    } else {
        Value::Object(JsonObject::new())
    }
}
