//! Paged listing tools: keyword, area, nearby, festival, accommodation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::args::{self, default_page, default_rows};
use super::schema::{
    content_type_property, json_schema_code, json_schema_number, json_schema_object,
    json_schema_string, language_property, page_property, rows_property,
};
use super::{TextResource, Tool};
use crate::client::{AreaQuery, FestivalQuery, KeywordQuery, LazyClient, LocationQuery, StayQuery};
use crate::server::protocol::ToolSchema;
use crate::types::{NormalizedResponse, Page};
use crate::{Result, TourismError};

// ============================================================================
// search_tourism_by_keyword
// ============================================================================

pub struct KeywordSearchTool {
    client: Arc<LazyClient>,
}

impl KeywordSearchTool {
    pub fn new(client: Arc<LazyClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct KeywordArgs {
    keyword: String,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default, deserialize_with = "args::optional_code")]
    area_code: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_rows")]
    rows: u32,
}

#[async_trait]
impl Tool for KeywordSearchTool {
    fn name(&self) -> &'static str {
        "search_tourism_by_keyword"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: "Search for tourism information in Korea by keyword \
                (e.g. \"Gyeongbokgung\", \"Hanok\", \"Bibimbap\")."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "keyword": json_schema_string("Search keyword"),
                    "content_type": content_type_property(),
                    "area_code": json_schema_code("Area code to filter results (e.g. \"1\" for Seoul)"),
                    "language": language_property(),
                    "page": page_property(),
                    "rows": rows_property(args::DEFAULT_ROWS as i64),
                }),
                &["keyword"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> Result<TextResource> {
        let args: KeywordArgs = args::decode(arguments)?;
        let query = KeywordQuery {
            keyword: args::required("keyword", args.keyword)?,
            content_type: args::content_type(args.content_type.as_deref())?,
            area_code: args.area_code,
            language: args::language(args.language.as_deref())?,
            page: Page::new(args.page, args.rows)?,
        };

        let response = self.client.get().await?.search_by_keyword(&query).await?;
        TextResource::json(&format!("search/{}", query.keyword), &response)
    }
}

// ============================================================================
// get_tourism_by_area
// ============================================================================

pub struct AreaTool {
    client: Arc<LazyClient>,
}

impl AreaTool {
    pub fn new(client: Arc<LazyClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct AreaArgs {
    #[serde(deserialize_with = "args::code")]
    area_code: String,
    #[serde(default, deserialize_with = "args::optional_code")]
    sigungu_code: Option<String>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_rows")]
    rows: u32,
}

#[async_trait]
impl Tool for AreaTool {
    fn name(&self) -> &'static str {
        "get_tourism_by_area"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: "Browse tourism information by geographic area in Korea.".to_string(),
            input_schema: json_schema_object(
                json!({
                    "area_code": json_schema_code("Area code (e.g. \"1\" for Seoul)"),
                    "sigungu_code": json_schema_code("Sigungu (district) code within the area"),
                    "content_type": content_type_property(),
                    "language": language_property(),
                    "page": page_property(),
                    "rows": rows_property(args::DEFAULT_ROWS as i64),
                }),
                &["area_code"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> Result<TextResource> {
        let args: AreaArgs = args::decode(arguments)?;
        let area_code = args::required("area_code", args.area_code)?;
        let query = AreaQuery {
            area_code: Some(area_code.clone()),
            sigungu_code: args.sigungu_code,
            content_type: args::content_type(args.content_type.as_deref())?,
            language: args::language(args.language.as_deref())?,
            page: Page::new(args.page, args.rows)?,
        };

        let response = self.client.get().await?.area_based_list(&query).await?;
        TextResource::json(&format!("area/{area_code}"), &response)
    }
}

// ============================================================================
// find_nearby_attractions
// ============================================================================

pub struct NearbyTool {
    client: Arc<LazyClient>,
}

impl NearbyTool {
    pub fn new(client: Arc<LazyClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct NearbyArgs {
    longitude: f64,
    latitude: f64,
    #[serde(default = "default_radius")]
    radius: i64,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_rows")]
    rows: u32,
}

fn default_radius() -> i64 {
    args::DEFAULT_RADIUS
}

#[derive(Serialize)]
struct NearbyBody<'a> {
    #[serde(flatten)]
    response: &'a NormalizedResponse,
    search_radius: u32,
}

#[async_trait]
impl Tool for NearbyTool {
    fn name(&self) -> &'static str {
        "find_nearby_attractions"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: "Find tourism attractions near a location in Korea.".to_string(),
            input_schema: json_schema_object(
                json!({
                    "longitude": json_schema_number("Longitude (e.g. 126.9780)"),
                    "latitude": json_schema_number("Latitude (e.g. 37.5665)"),
                    "radius": {
                        "type": "integer",
                        "description": "Search radius in meters",
                        "minimum": 1,
                        "maximum": args::MAX_RADIUS,
                        "default": args::DEFAULT_RADIUS,
                    },
                    "content_type": content_type_property(),
                    "language": language_property(),
                    "page": page_property(),
                    "rows": rows_property(args::DEFAULT_ROWS as i64),
                }),
                &["longitude", "latitude"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> Result<TextResource> {
        let args: NearbyArgs = args::decode(arguments)?;
        let query = LocationQuery {
            longitude: args::coordinate("longitude", args.longitude)?,
            latitude: args::coordinate("latitude", args.latitude)?,
            radius: args::radius(args.radius)?,
            content_type: args::content_type(args.content_type.as_deref())?,
            language: args::language(args.language.as_deref())?,
            page: Page::new(args.page, args.rows)?,
        };

        let response = self.client.get().await?.location_based_list(&query).await?;
        let body = NearbyBody {
            response: &response,
            search_radius: query.radius,
        };
        // Debug formatting keeps the decimal point on whole coordinates.
        TextResource::json(
            &format!("nearby/{:?}/{:?}", query.longitude, query.latitude),
            &body,
        )
    }
}

// ============================================================================
// search_festivals_by_date
// ============================================================================

/// Reported as `end_date` when the search has no upper bound.
pub const ONGOING: &str = "ongoing";

pub struct FestivalTool {
    client: Arc<LazyClient>,
}

impl FestivalTool {
    pub fn new(client: Arc<LazyClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct FestivalArgs {
    start_date: String,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default, deserialize_with = "args::optional_code")]
    area_code: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_rows")]
    rows: u32,
}

#[derive(Serialize)]
struct FestivalBody<'a> {
    #[serde(flatten)]
    response: &'a NormalizedResponse,
    start_date: &'a str,
    end_date: &'a str,
}

#[async_trait]
impl Tool for FestivalTool {
    fn name(&self) -> &'static str {
        "search_festivals_by_date"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: "Find festivals in Korea by date range.".to_string(),
            input_schema: json_schema_object(
                json!({
                    "start_date": json_schema_string("Start date in YYYYMMDD format (e.g. \"20250501\")"),
                    "end_date": json_schema_string("Optional end date in YYYYMMDD format"),
                    "area_code": json_schema_code("Area code to filter results (e.g. \"1\" for Seoul)"),
                    "language": language_property(),
                    "page": page_property(),
                    "rows": rows_property(args::DEFAULT_ROWS as i64),
                }),
                &["start_date"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> Result<TextResource> {
        let args: FestivalArgs = args::decode(arguments)?;
        let start_date = args.start_date.trim().to_string();
        let end_date = args
            .end_date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let start = args::date("start_date", &start_date)?;
        let end = end_date
            .as_deref()
            .map(|d| args::date("end_date", d))
            .transpose()?;
        if end.is_some_and(|end| end < start) {
            return Err(TourismError::InvalidArgument(format!(
                "end_date {} is before start_date {start_date}",
                end_date.as_deref().unwrap_or_default()
            )));
        }

        let query = FestivalQuery {
            start_date: start,
            end_date: end,
            area_code: args.area_code,
            language: args::language(args.language.as_deref())?,
            page: Page::new(args.page, args.rows)?,
        };

        let response = self.client.get().await?.search_festival(&query).await?;
        let body = FestivalBody {
            response: &response,
            start_date: &start_date,
            end_date: end_date.as_deref().unwrap_or(ONGOING),
        };
        TextResource::json(&format!("festival/{start_date}"), &body)
    }
}

// ============================================================================
// find_accommodations
// ============================================================================

pub struct AccommodationTool {
    client: Arc<LazyClient>,
}

impl AccommodationTool {
    pub fn new(client: Arc<LazyClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct AccommodationArgs {
    #[serde(default, deserialize_with = "args::optional_code")]
    area_code: Option<String>,
    #[serde(default, deserialize_with = "args::optional_code")]
    sigungu_code: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_rows")]
    rows: u32,
}

#[async_trait]
impl Tool for AccommodationTool {
    fn name(&self) -> &'static str {
        "find_accommodations"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: "Find accommodations in Korea by area.".to_string(),
            input_schema: json_schema_object(
                json!({
                    "area_code": json_schema_code("Area code (e.g. \"1\" for Seoul)"),
                    "sigungu_code": json_schema_code("Sigungu (district) code within the area"),
                    "language": language_property(),
                    "page": page_property(),
                    "rows": rows_property(args::DEFAULT_ROWS as i64),
                }),
                &[],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> Result<TextResource> {
        let args: AccommodationArgs = args::decode(arguments)?;
        let query = StayQuery {
            area_code: args.area_code,
            sigungu_code: args.sigungu_code,
            language: args::language(args.language.as_deref())?,
            page: Page::new(args.page, args.rows)?,
        };

        let response = self.client.get().await?.search_stay(&query).await?;
        let area = query.area_code.as_deref().unwrap_or("all");
        TextResource::json(&format!("accommodation/{area}"), &response)
    }
}
