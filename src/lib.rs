//! korea-tourism-mcp - Korea Tourism Organization open API as MCP tools
//!
//! This crate wraps the Korea Tourism Organization open API in a resilient
//! client (response cache, sliding-window rate limit, bounded concurrency,
//! retry with backoff, XML/JSON normalization) and exposes it as eight MCP
//! tools over stdio or HTTP.
//!
//! # Client Example
//!
//! ```rust,no_run
//! use korea_tourism_mcp::{ClientConfig, TourismClient};
//! use korea_tourism_mcp::client::KeywordQuery;
//! use korea_tourism_mcp::types::ContentType;
//!
//! #[tokio::main]
//! async fn main() -> korea_tourism_mcp::Result<()> {
//!     let client = TourismClient::new(ClientConfig::new("your-service-key"))?;
//!
//!     let mut query = KeywordQuery::new("Gyeongbokgung");
//!     query.content_type = Some(ContentType::TouristAttraction);
//!     let response = client.search_by_keyword(&query).await?;
//!
//!     println!("{} results", response.total_count);
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! # Tool Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use korea_tourism_mcp::{ClientConfig, LazyClient};
//! use korea_tourism_mcp::tools::{Tool, ToolRegistry};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> korea_tourism_mcp::Result<()> {
//!     let client = Arc::new(LazyClient::new(ClientConfig::from_env()?));
//!     let registry = ToolRegistry::with_defaults(client.clone());
//!
//!     if let Some(tool) = registry.get("search_festivals_by_date") {
//!         let resource = tool.call(json!({"start_date": "20250501"})).await?;
//!         println!("{}: {}", resource.uri, resource.text);
//!     }
//!     client.shutdown();
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod server;
pub mod telemetry;
pub mod tools;
pub mod types;

pub use cache::CacheConfig;
pub use client::{ClientConfig, LazyClient, RetryConfig, TourismClient};
pub use error::{Result, TourismError};
pub use types::{ContentType, Language, NormalizedResponse, Page};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
