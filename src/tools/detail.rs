//! Per-item tools (detail, images) and the area-code taxonomy.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use super::args::{self, default_page, default_rows};
use super::schema::{
    content_type_property, json_schema_code, json_schema_object, language_property, page_property,
    rows_property,
};
use super::{TextResource, Tool};
use crate::Result;
use crate::client::{AreaCodeQuery, DetailQuery, ImageQuery, LazyClient};
use crate::server::protocol::ToolSchema;
use crate::types::{DetailRecord, Item, Page};

// ============================================================================
// get_detailed_information
// ============================================================================

/// Composite lookup: common detail, then (with a content type) the
/// type-specific intro and additional-info rows, merged into one record.
pub struct DetailTool {
    client: Arc<LazyClient>,
}

impl DetailTool {
    pub fn new(client: Arc<LazyClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct DetailArgs {
    #[serde(deserialize_with = "args::code")]
    content_id: String,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

#[async_trait]
impl Tool for DetailTool {
    fn name(&self) -> &'static str {
        "get_detailed_information"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: "Get detailed information about a specific tourism item in Korea. \
                Giving content_type adds type-specific details (hours, fees, facilities)."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "content_id": json_schema_code("Content ID of the tourism item"),
                    "content_type": content_type_property(),
                    "language": language_property(),
                }),
                &["content_id"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> Result<TextResource> {
        let args: DetailArgs = args::decode(arguments)?;
        let query = DetailQuery {
            content_id: args::required("content_id", args.content_id)?,
            content_type: args::content_type(args.content_type.as_deref())?,
            language: args::language(args.language.as_deref())?,
        };

        let client = self.client.get().await?;
        let mut record = DetailRecord {
            common: client.detail_common(&query).await?.first_item(),
            ..DetailRecord::default()
        };

        if let Some(content_type) = query.content_type {
            let intro = client
                .detail_intro(&query.content_id, content_type, query.language)
                .await?;
            record.intro = Some(intro.first_item());

            let info = client
                .detail_info(&query.content_id, content_type, query.language)
                .await?;
            record.additional_info = Some(info.items);
        } else {
            debug!(content_id = %query.content_id, "no content type, skipping intro and info lookups");
        }

        let merged: Item = record.merge();
        TextResource::json(&format!("detail/{}", query.content_id), &merged)
    }
}

// ============================================================================
// get_tourism_images
// ============================================================================

pub struct ImagesTool {
    client: Arc<LazyClient>,
}

impl ImagesTool {
    pub fn new(client: Arc<LazyClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ImagesArgs {
    #[serde(deserialize_with = "args::code")]
    content_id: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_rows")]
    rows: u32,
}

#[derive(Serialize)]
struct ImagesBody<'a> {
    total_count: u64,
    items: &'a [Item],
    content_id: &'a str,
}

#[async_trait]
impl Tool for ImagesTool {
    fn name(&self) -> &'static str {
        "get_tourism_images"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: "Get images for a specific tourism item in Korea.".to_string(),
            input_schema: json_schema_object(
                json!({
                    "content_id": json_schema_code("Content ID of the tourism item"),
                    "language": language_property(),
                    "page": page_property(),
                    "rows": rows_property(args::DEFAULT_ROWS as i64),
                }),
                &["content_id"],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> Result<TextResource> {
        let args: ImagesArgs = args::decode(arguments)?;
        let query = ImageQuery {
            content_id: args::required("content_id", args.content_id)?,
            language: args::language(args.language.as_deref())?,
            page: Page::new(args.page, args.rows)?,
        };

        let response = self.client.get().await?.detail_images(&query).await?;
        let body = ImagesBody {
            total_count: response.total_count,
            items: &response.items,
            content_id: &query.content_id,
        };
        TextResource::json(&format!("images/{}", query.content_id), &body)
    }
}

// ============================================================================
// get_area_codes
// ============================================================================

pub struct AreaCodesTool {
    client: Arc<LazyClient>,
}

impl AreaCodesTool {
    pub fn new(client: Arc<LazyClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct AreaCodesArgs {
    #[serde(default, deserialize_with = "args::optional_code")]
    parent_area_code: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_area_code_rows")]
    rows: u32,
}

fn default_area_code_rows() -> u32 {
    args::DEFAULT_AREA_CODE_ROWS
}

#[derive(Serialize)]
struct AreaCodesBody<'a> {
    total_count: u64,
    items: &'a [Item],
    parent_area_code: Option<&'a str>,
}

#[async_trait]
impl Tool for AreaCodesTool {
    fn name(&self) -> &'static str {
        "get_area_codes"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: "Get area codes for regions in Korea. Without parent_area_code the \
                top-level provinces and cities are listed; with it, their districts."
                .to_string(),
            input_schema: json_schema_object(
                json!({
                    "parent_area_code": json_schema_code("Parent area code to list sub-areas of"),
                    "language": language_property(),
                    "page": page_property(),
                    "rows": rows_property(args::DEFAULT_AREA_CODE_ROWS as i64),
                }),
                &[],
            ),
        }
    }

    async fn call(&self, arguments: Value) -> Result<TextResource> {
        let args: AreaCodesArgs = args::decode(arguments)?;
        let query = AreaCodeQuery {
            parent_area_code: args.parent_area_code,
            language: args::language(args.language.as_deref())?,
            page: Page::new(args.page, args.rows)?,
        };

        let response = self.client.get().await?.area_codes(&query).await?;
        let body = AreaCodesBody {
            total_count: response.total_count,
            items: &response.items,
            parent_area_code: query.parent_area_code.as_deref(),
        };
        TextResource::json("area-codes", &body)
    }
}
