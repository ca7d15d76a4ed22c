//! Time-boxed cache of normalized upstream responses.
//!
//! [`ResponseCache`] sits in front of the rate/concurrency gates in
//! [`TourismClient`](crate::client::TourismClient). A hit returns without
//! touching either gate or the network. Only successful, normalized
//! responses are ever inserted, so a failed call is retried from scratch on
//! the next invocation.
//!
//! Entries older than the configured TTL are never returned; moka evicts
//! them lazily on lookup or when capacity pressure forces it.

use std::time::Duration;

use moka::future::Cache;
use serde_json::json;
use tracing::debug;

use crate::telemetry;
use crate::types::NormalizedResponse;

/// Configuration for the response cache.
///
/// ```rust
/// # use korea_tourism_mcp::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 1,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 24 hours.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1_000,
            ttl: Duration::from_secs(86_400),
        }
    }
}

impl CacheConfig {
    /// Create a new config with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Deterministic cache key for one upstream request.
///
/// Built from the operation name, the response language and every request
/// parameter. Parameters are sorted by name, so the order they were added
/// in does not matter; any differing value yields a different signature.
/// The encoding is a JSON array, which keeps values containing separators
/// (`&`, `=`, `,`) unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestSignature(String);

impl RequestSignature {
    pub fn new(operation: &str, language: &str, params: &[(&str, String)]) -> Self {
        let mut sorted: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        sorted.sort();
        Self(json!([operation, language, sorted]).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// In-memory TTL cache keyed by [`RequestSignature`].
pub struct ResponseCache {
    cache: Cache<RequestSignature, NormalizedResponse>,
}

impl ResponseCache {
    /// Create a new response cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { cache }
    }

    /// Look up a cached response.
    ///
    /// `operation` only labels metrics; the signature alone is the key.
    pub async fn get(
        &self,
        operation: &'static str,
        signature: &RequestSignature,
    ) -> Option<NormalizedResponse> {
        match self.cache.get(signature).await {
            Some(hit) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "operation" => operation)
                    .increment(1);
                debug!(operation, "response cache hit");
                Some(hit)
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => operation)
                    .increment(1);
                None
            }
        }
    }

    /// Store a successful response.
    pub async fn insert(&self, signature: RequestSignature, response: NormalizedResponse) {
        self.cache.insert(signature, response).await;
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
