//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus); without
//! a recorder installed, all metric calls are no-ops.
//!
//! All metrics are prefixed with `tourism_`. Counters end in `_total`,
//! histograms carry their unit.
//!
//! # Common labels
//!
//! - `operation`: upstream operation (e.g. "search_keyword", "detail_common")
//! - `tool`: MCP tool name
//! - `status`: "ok" or "error"

/// Upstream attempts issued over the network.
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "tourism_requests_total";

/// Upstream attempt duration in seconds, measured after both gates admit it.
///
/// Labels: `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "tourism_request_duration_seconds";

/// Retry attempts (not counting the initial request).
///
/// Labels: `operation`.
pub const RETRIES_TOTAL: &str = "tourism_retries_total";

/// Response cache hits.
///
/// Labels: `operation`.
pub const CACHE_HITS_TOTAL: &str = "tourism_cache_hits_total";

/// Response cache misses.
///
/// Labels: `operation`.
pub const CACHE_MISSES_TOTAL: &str = "tourism_cache_misses_total";

/// MCP tool invocations.
///
/// Labels: `tool`, `status` ("ok" | "error").
pub const TOOL_CALLS_TOTAL: &str = "tourism_tool_calls_total";
