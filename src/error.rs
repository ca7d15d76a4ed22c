//! Error types for the tourism client and tool layer.

use std::time::Duration;

/// Upstream result codes that indicate a temporary server-side condition.
const TRANSIENT_RESULT_CODES: &[&str] = &["01", "02", "04", "05"];

/// Errors surfaced by the API client and the tools built on it.
#[derive(Debug, thiserror::Error)]
pub enum TourismError {
    // Transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("upstream request timed out")]
    Timeout,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited by upstream, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The upstream answered with a non-success result code in its header.
    #[error("upstream error {code}: {message}")]
    Upstream { code: String, message: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("empty response from upstream")]
    EmptyResponse,

    // Caller errors
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("client has been shut down")]
    ClientClosed,

    // Transport errors on the serving side
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TourismError {
    /// Whether retrying the same request may succeed.
    ///
    /// Network failures, timeouts, throttling, 5xx statuses and the
    /// upstream's temporary result codes are transient. Everything else
    /// (bad keys, bad arguments, 4xx) fails immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            TourismError::Http(_)
            | TourismError::Timeout
            | TourismError::RateLimited { .. }
            | TourismError::EmptyResponse => true,
            TourismError::Api { status, .. } => *status >= 500,
            TourismError::Upstream { code, .. } => TRANSIENT_RESULT_CODES.contains(&code.as_str()),
            _ => false,
        }
    }

    /// Server-provided delay hint, if the upstream sent one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            TourismError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Classify an upstream result code from a response header or error envelope.
    pub(crate) fn from_result_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            "22" => TourismError::RateLimited { retry_after: None },
            "20" | "30" | "31" | "32" => TourismError::AuthenticationFailed(message),
            "10" | "11" => TourismError::InvalidArgument(message),
            _ => TourismError::Upstream {
                code: code.to_string(),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for TourismError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TourismError::Timeout
        } else {
            TourismError::Http(err.to_string())
        }
    }
}

/// Result type alias for tourism operations
pub type Result<T> = std::result::Result<T, TourismError>;
