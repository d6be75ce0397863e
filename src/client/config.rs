//! Client configuration.

use crate::error::{OctoPrintError, Result};

/// Environment variable holding the OctoPrint base URL.
pub const ENV_URL: &str = "OCTOPRINT_URL";
/// Fallback environment variable for the base URL.
pub const ENV_HOST: &str = "OCTOPRINT_HOST";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "OCTOPRINT_API_KEY";

/// Configuration for [`OctoPrintClient`](crate::OctoPrintClient).
///
/// # Examples
///
/// ```
/// use octoprint_client::ClientConfig;
///
/// let config = ClientConfig::new("http://octopi.local")
///     .with_api_key("ABCDEF0123456789")
///     .with_retries(2);
/// assert_eq!(config.max_retries, 2);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root URL of the OctoPrint instance, e.g. `http://octopi.local`
    pub base_url: String,
    /// Application or user API key sent as `X-Api-Key`
    pub api_key: Option<String>,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Retries for retryable failures (0 disables retrying)
    pub max_retries: u32,
    /// Base delay for exponential backoff in milliseconds
    pub retry_delay_ms: u64,
    /// Emit `tracing` events for requests and retries
    pub enable_logging: bool,
    /// Proxy URL; empty for none
    pub proxy_url: String,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            api_key: None,
            request_timeout_ms: 30_000,
            max_retries: 0,
            retry_delay_ms: 500,
            enable_logging: true,
            proxy_url: String::new(),
            user_agent: concat!("octoprint-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Configuration for the instance at `base_url` with all other defaults.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Read `OCTOPRINT_URL` (or `OCTOPRINT_HOST`) and `OCTOPRINT_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |v: &String| !v.trim().is_empty();
        let base_url = lookup(ENV_URL)
            .filter(non_empty)
            .or_else(|| lookup(ENV_HOST).filter(non_empty))
            .ok_or_else(|| {
                OctoPrintError::Config(format!("neither {} nor {} is set", ENV_URL, ENV_HOST))
            })?;

        let mut config = Self::new(base_url);
        config.api_key = lookup(ENV_API_KEY).filter(|v| !v.is_empty());
        Ok(config)
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Set the retry budget for retryable failures.
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}
