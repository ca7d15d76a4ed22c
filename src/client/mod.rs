//! Korea Tourism open API client.
//!
//! [`TourismClient`] wraps every upstream call in the same pipeline:
//!
//! 1. build an [`UpstreamRequest`] and its [`RequestSignature`](crate::cache::RequestSignature)
//! 2. return a cached [`NormalizedResponse`] if one is fresh (no gate, no network)
//! 3. otherwise, under [`with_retry()`], pass the [`Gate`] (concurrency slot
//!    then rate window), send, classify the status and normalize the body
//! 4. cache the successful result
//!
//! Failures are never cached. The client is built lazily through
//! [`LazyClient`] and lives until [`TourismClient::close()`].

pub mod config;
pub mod gate;
mod lazy;
pub mod normalize;
pub mod query;
pub mod request;
pub mod retry;

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::info;

pub use config::{ClientConfig, ClientFileConfig};
pub use gate::{Gate, RateLimiter};
pub use lazy::LazyClient;
pub use query::{
    AreaCodeQuery, AreaQuery, DetailQuery, FestivalQuery, ImageQuery, KeywordQuery, LocationQuery,
    StayQuery,
};
pub use request::{Operation, UpstreamRequest};
pub use retry::{RetryConfig, with_retry};

use crate::cache::ResponseCache;
use crate::telemetry;
use crate::types::{ContentType, Language, NormalizedResponse, Page};
use crate::{Result, TourismError};

const DATE_FORMAT: &str = "%Y%m%d";
const MAX_ERROR_SNIPPET: usize = 200;

/// Client for the Korea Tourism Organization open API.
pub struct TourismClient {
    config: ClientConfig,
    default_language: Language,
    http: Mutex<Option<reqwest::Client>>,
    gate: Gate,
    cache: ResponseCache,
}

impl TourismClient {
    /// Validate the configuration and build the client.
    ///
    /// Fails with [`TourismError::Configuration`] when the API key is
    /// missing, a limit is zero, or the default language is unknown.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let default_language = Language::parse(&config.default_language)
            .map_err(|e| TourismError::Configuration(format!("default language: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| TourismError::Configuration(format!("failed to build HTTP client: {e}")))?;

        info!(
            default_language = default_language.code(),
            cache_ttl_secs = config.cache.ttl.as_secs(),
            rate_limit_calls = config.rate_limit_calls,
            rate_limit_period_secs = config.rate_limit_period.as_secs_f64(),
            concurrency_limit = config.concurrency_limit,
            base_url = %config.base_url,
            "tourism client initialized"
        );

        Ok(Self {
            gate: Gate::new(
                config.concurrency_limit,
                config.rate_limit_calls,
                config.rate_limit_period,
            ),
            cache: ResponseCache::new(&config.cache),
            http: Mutex::new(Some(http)),
            default_language,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    fn language(&self, requested: Option<Language>) -> Language {
        requested.unwrap_or(self.default_language)
    }

    /// Whether [`close()`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.http
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }

    /// Drop pooled connections and refuse further calls.
    ///
    /// Idempotent; later calls fail with [`TourismError::ClientClosed`].
    pub fn close(&self) {
        let previous = self
            .http
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if previous.is_some() {
            self.gate.close();
            self.cache.clear();
            info!("tourism client connections closed");
        }
    }

    fn http(&self) -> Result<reqwest::Client> {
        self.http
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or(TourismError::ClientClosed)
    }

    // ========================================================================
    // Upstream operations
    // ========================================================================

    /// Search items by keyword.
    pub async fn search_by_keyword(&self, query: &KeywordQuery) -> Result<NormalizedResponse> {
        let request = UpstreamRequest::new(
            Operation::SearchKeyword,
            self.language(query.language),
            query.page,
        )
        .param("keyword", &query.keyword)
        .param("listYN", "Y")
        .opt_param("contentTypeId", query.content_type.map(ContentType::code))
        .opt_param("areaCode", query.area_code.as_deref());
        self.execute(request).await
    }

    /// List items within an area (and optionally a district).
    pub async fn area_based_list(&self, query: &AreaQuery) -> Result<NormalizedResponse> {
        let request = UpstreamRequest::new(
            Operation::AreaBasedList,
            self.language(query.language),
            query.page,
        )
        .param("listYN", "Y")
        .opt_param("areaCode", query.area_code.as_deref())
        .opt_param("sigunguCode", query.sigungu_code.as_deref())
        .opt_param("contentTypeId", query.content_type.map(ContentType::code));
        self.execute(request).await
    }

    /// List items within `radius` meters of a point.
    pub async fn location_based_list(&self, query: &LocationQuery) -> Result<NormalizedResponse> {
        let request = UpstreamRequest::new(
            Operation::LocationBasedList,
            self.language(query.language),
            query.page,
        )
        .param("listYN", "Y")
        .param("mapX", query.longitude)
        .param("mapY", query.latitude)
        .param("radius", query.radius)
        .opt_param("contentTypeId", query.content_type.map(ContentType::code));
        self.execute(request).await
    }

    /// Search festivals running in a date range.
    pub async fn search_festival(&self, query: &FestivalQuery) -> Result<NormalizedResponse> {
        let request = UpstreamRequest::new(
            Operation::SearchFestival,
            self.language(query.language),
            query.page,
        )
        .param("listYN", "Y")
        .param("eventStartDate", query.start_date.format(DATE_FORMAT))
        .opt_param(
            "eventEndDate",
            query.end_date.map(|d| d.format(DATE_FORMAT).to_string()),
        )
        .opt_param("areaCode", query.area_code.as_deref());
        self.execute(request).await
    }

    /// Search accommodations.
    pub async fn search_stay(&self, query: &StayQuery) -> Result<NormalizedResponse> {
        let request = UpstreamRequest::new(
            Operation::SearchStay,
            self.language(query.language),
            query.page,
        )
        .param("listYN", "Y")
        .opt_param("areaCode", query.area_code.as_deref())
        .opt_param("sigunguCode", query.sigungu_code.as_deref());
        self.execute(request).await
    }

    /// Common detail (title, address, overview, first image, map position).
    pub async fn detail_common(&self, query: &DetailQuery) -> Result<NormalizedResponse> {
        let request = UpstreamRequest::new(
            Operation::DetailCommon,
            self.language(query.language),
            Page::default(),
        )
        .param("contentId", &query.content_id)
        .opt_param("contentTypeId", query.content_type.map(ContentType::code))
        .param("defaultYN", "Y")
        .param("firstImageYN", "Y")
        .param("areacodeYN", "Y")
        .param("addrinfoYN", "Y")
        .param("mapinfoYN", "Y")
        .param("overviewYN", "Y");
        self.execute(request).await
    }

    /// Type-specific introduction (opening hours, parking, ...).
    pub async fn detail_intro(
        &self,
        content_id: &str,
        content_type: ContentType,
        language: Option<Language>,
    ) -> Result<NormalizedResponse> {
        let request = UpstreamRequest::new(
            Operation::DetailIntro,
            self.language(language),
            Page::default(),
        )
        .param("contentId", content_id)
        .param("contentTypeId", content_type.code());
        self.execute(request).await
    }

    /// Type-specific additional information rows.
    pub async fn detail_info(
        &self,
        content_id: &str,
        content_type: ContentType,
        language: Option<Language>,
    ) -> Result<NormalizedResponse> {
        let request = UpstreamRequest::new(
            Operation::DetailInfo,
            self.language(language),
            Page::default(),
        )
        .param("contentId", content_id)
        .param("contentTypeId", content_type.code());
        self.execute(request).await
    }

    /// Image gallery of an item.
    pub async fn detail_images(&self, query: &ImageQuery) -> Result<NormalizedResponse> {
        let request = UpstreamRequest::new(
            Operation::DetailImage,
            self.language(query.language),
            query.page,
        )
        .param("contentId", &query.content_id)
        .param("imageYN", "Y")
        .param("subImageYN", "Y");
        self.execute(request).await
    }

    /// Area codes, or district codes below `parent_area_code`.
    pub async fn area_codes(&self, query: &AreaCodeQuery) -> Result<NormalizedResponse> {
        let request = UpstreamRequest::new(
            Operation::AreaCode,
            self.language(query.language),
            query.page,
        )
        .opt_param("areaCode", query.parent_area_code.as_deref());
        self.execute(request).await
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    async fn execute(&self, request: UpstreamRequest) -> Result<NormalizedResponse> {
        let operation = request.operation.name();
        let signature = request.signature();
        if let Some(hit) = self.cache.get(operation, &signature).await {
            return Ok(hit);
        }

        let response = with_retry(&self.config.retry, operation, || self.send(&request)).await?;
        self.cache.insert(signature, response.clone()).await;
        Ok(response)
    }

    /// One attempt: pass both gates, then call the upstream.
    async fn send(&self, request: &UpstreamRequest) -> Result<NormalizedResponse> {
        let http = self.http()?;
        let _permit = self.gate.admit().await?;

        let operation = request.operation.name();
        let start = Instant::now();
        let result = self.fetch(&http, request).await;

        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "operation" => operation)
            .record(start.elapsed().as_secs_f64());
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL, "operation" => operation, "status" => status)
            .increment(1);
        result
    }

    async fn fetch(
        &self,
        http: &reqwest::Client,
        request: &UpstreamRequest,
    ) -> Result<NormalizedResponse> {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            request.path()
        );

        let response = http
            .get(&url)
            .query(&[
                ("serviceKey", self.config.api_key.as_str()),
                ("MobileOS", "ETC"),
                ("MobileApp", self.config.mobile_app.as_str()),
                ("_type", "json"),
            ])
            .query(request.params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), retry_after, &body));
        }

        let body = response.text().await?;
        normalize::parse_payload(&body, request.page)
    }
}

/// Map a non-success HTTP status (and its body) to an error.
fn status_error(status: u16, retry_after: Option<Duration>, body: &str) -> TourismError {
    match status {
        429 => TourismError::RateLimited { retry_after },
        401 | 403 => TourismError::AuthenticationFailed(format!("upstream returned {status}")),
        _ => match normalize::error_from_body(body) {
            Some(err @ (TourismError::AuthenticationFailed(_) | TourismError::RateLimited { .. })) => {
                err
            }
            _ => TourismError::Api {
                status,
                message: body.chars().take(MAX_ERROR_SNIPPET).collect(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_429_is_rate_limited() {
        let err = status_error(429, Some(Duration::from_secs(2)), "");
        assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));
        assert!(err.is_transient());
    }

    #[test]
    fn status_500_with_key_error_body_is_permanent() {
        let body = "<OpenAPI_ServiceResponse><cmmMsgHeader><errMsg>SERVICE ERROR</errMsg>\
            <returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg>\
            <returnReasonCode>30</returnReasonCode></cmmMsgHeader></OpenAPI_ServiceResponse>";
        let err = status_error(500, None, body);
        assert!(matches!(err, TourismError::AuthenticationFailed(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn status_502_plain_body_is_transient() {
        let err = status_error(502, None, "bad gateway");
        assert!(matches!(err, TourismError::Api { status: 502, .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn status_404_is_permanent() {
        assert!(!status_error(404, None, "not found").is_transient());
    }
}
