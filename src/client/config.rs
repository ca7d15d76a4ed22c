//! Client configuration.
//!
//! [`ClientConfig`] is built once at process start (from the environment,
//! optionally layered over a config file section) and is read-only from then
//! on. It is validated when the client is constructed, not when it is
//! loaded, so a missing API key surfaces on first use.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Semaphore;

use super::retry::RetryConfig;
use crate::cache::CacheConfig;
use crate::{Result, TourismError};

/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://apis.data.go.kr/B551011";

/// Default `MobileApp` identifier sent with every request.
pub const DEFAULT_MOBILE_APP: &str = "KoreaTourismMCP";

/// Longest cache TTL the cache backend accepts.
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(1000 * 365 * 24 * 3600);

pub const ENV_API_KEY: &str = "KOREA_TOURISM_API_KEY";
pub const ENV_DEFAULT_LANGUAGE: &str = "MCP_TOURISM_DEFAULT_LANGUAGE";
pub const ENV_CACHE_TTL: &str = "MCP_TOURISM_CACHE_TTL";
pub const ENV_RATE_LIMIT_CALLS: &str = "MCP_TOURISM_RATE_LIMIT_CALLS";
pub const ENV_RATE_LIMIT_PERIOD: &str = "MCP_TOURISM_RATE_LIMIT_PERIOD";
pub const ENV_CONCURRENCY_LIMIT: &str = "MCP_TOURISM_CONCURRENCY_LIMIT";
pub const ENV_BASE_URL: &str = "MCP_TOURISM_API_BASE_URL";

/// Settings for [`TourismClient`](super::TourismClient).
///
/// ```rust
/// # use korea_tourism_mcp::ClientConfig;
/// # use std::time::Duration;
/// let config = ClientConfig::new("my-key")
///     .default_language("jp")
///     .rate_limit(10, Duration::from_secs(1))
///     .concurrency_limit(4);
/// assert_eq!(config.rate_limit_calls, 10);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Upstream service key. Empty means "not configured".
    pub api_key: String,
    /// Language code used when a call does not name one. Default: `en`.
    pub default_language: String,
    /// Response cache settings.
    pub cache: CacheConfig,
    /// Calls admitted per `rate_limit_period`. Default: 5.
    pub rate_limit_calls: u32,
    /// Sliding window length. Default: 1s.
    pub rate_limit_period: Duration,
    /// Upstream calls in flight at once. Default: 10.
    pub concurrency_limit: usize,
    /// Timeout per upstream attempt. Default: 30s.
    pub request_timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
    /// Upstream base URL (override for testing with wiremock).
    pub base_url: String,
    /// `MobileApp` identifier.
    pub mobile_app: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            default_language: "en".to_string(),
            cache: CacheConfig::default(),
            rate_limit_calls: 5,
            rate_limit_period: Duration::from_secs(1),
            concurrency_limit: 10,
            request_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            mobile_app: DEFAULT_MOBILE_APP.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache.ttl = ttl;
        self
    }

    pub fn rate_limit(mut self, calls: u32, period: Duration) -> Self {
        self.rate_limit_calls = calls;
        self.rate_limit_period = period;
        self
    }

    pub fn concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn mobile_app(mut self, app: impl Into<String>) -> Self {
        self.mobile_app = app.into();
        self
    }

    /// Apply a `[client]` section from the config file.
    pub fn with_file_settings(mut self, file: &ClientFileConfig) -> Self {
        if let Some(ref language) = file.default_language {
            self.default_language = language.clone();
        }
        if let Some(ttl) = file.cache_ttl_secs {
            self.cache.ttl = Duration::from_secs(ttl);
        }
        if let Some(max) = file.cache_max_entries {
            self.cache.max_entries = max;
        }
        if let Some(calls) = file.rate_limit_calls {
            self.rate_limit_calls = calls;
        }
        if let Some(period) = file.rate_limit_period_secs {
            self.rate_limit_period = Duration::from_secs(period);
        }
        if let Some(limit) = file.concurrency_limit {
            self.concurrency_limit = limit;
        }
        if let Some(timeout) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(timeout);
        }
        if let Some(attempts) = file.retry_attempts {
            self.retry.max_attempts = attempts;
        }
        if let Some(ref url) = file.base_url {
            self.base_url = url.clone();
        }
        if let Some(ref app) = file.mobile_app {
            self.mobile_app = app.clone();
        }
        self
    }

    /// Apply environment variables on top of the current values.
    ///
    /// `lookup` abstracts `std::env::var` so callers (and tests) can supply
    /// their own source. Unparseable numbers are configuration errors.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(language) = lookup(ENV_DEFAULT_LANGUAGE) {
            self.default_language = language;
        }
        if let Some(ttl) = parse_env::<u64, _>(&lookup, ENV_CACHE_TTL)? {
            self.cache.ttl = Duration::from_secs(ttl);
        }
        if let Some(calls) = parse_env(&lookup, ENV_RATE_LIMIT_CALLS)? {
            self.rate_limit_calls = calls;
        }
        if let Some(period) = parse_env::<u64, _>(&lookup, ENV_RATE_LIMIT_PERIOD)? {
            self.rate_limit_period = Duration::from_secs(period);
        }
        if let Some(limit) = parse_env(&lookup, ENV_CONCURRENCY_LIMIT)? {
            self.concurrency_limit = limit;
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        Ok(self)
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Check the settings a client cannot run without, and the bounds the
    /// cache and the concurrency gate can hold.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(TourismError::Configuration(format!(
                "{ENV_API_KEY} is not set; API calls need a valid service key"
            )));
        }
        if self.rate_limit_calls == 0 {
            return Err(TourismError::Configuration(
                "rate limit calls must be at least 1".to_string(),
            ));
        }
        if self.rate_limit_period.is_zero() {
            return Err(TourismError::Configuration(
                "rate limit period must be longer than zero".to_string(),
            ));
        }
        if self.concurrency_limit == 0 {
            return Err(TourismError::Configuration(
                "concurrency limit must be at least 1".to_string(),
            ));
        }
        if self.concurrency_limit > Semaphore::MAX_PERMITS {
            return Err(TourismError::Configuration(format!(
                "concurrency limit must be at most {}, got {}",
                Semaphore::MAX_PERMITS,
                self.concurrency_limit
            )));
        }
        if self.cache.ttl > MAX_CACHE_TTL {
            return Err(TourismError::Configuration(format!(
                "cache TTL must be at most {} seconds, got {}",
                MAX_CACHE_TTL.as_secs(),
                self.cache.ttl.as_secs()
            )));
        }
        Ok(())
    }
}

fn parse_env<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            TourismError::Configuration(format!("{key} must be a non-negative integer, got '{raw}'"))
        }),
    }
}

/// `[client]` section of the TOML config file.
///
/// The API key is deliberately absent: it only comes from the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFileConfig {
    #[serde(default)]
    pub default_language: Option<String>,
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,
    #[serde(default)]
    pub cache_max_entries: Option<u64>,
    #[serde(default)]
    pub rate_limit_calls: Option<u32>,
    #[serde(default)]
    pub rate_limit_period_secs: Option<u64>,
    #[serde(default)]
    pub concurrency_limit: Option<usize>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub retry_attempts: Option<u32>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub mobile_app: Option<String>,
}
