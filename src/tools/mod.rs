//! MCP tools over the tourism client.
//!
//! Every tool follows the same shape: deserialize and validate its
//! arguments (content-type labels, language codes, dates, pagination), make
//! one or a short fixed sequence of [`TourismClient`](crate::TourismClient)
//! calls, reshape the normalized result and wrap it in a [`TextResource`]
//! addressed by a `korea-tourism://` URI.
//!
//! Argument errors are reported before the client is touched, so a bad
//! label never costs an upstream call (or a client construction).

mod args;
mod detail;
mod listing;
mod resource;
pub mod schema;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

pub use detail::{AreaCodesTool, DetailTool, ImagesTool};
pub use listing::{AccommodationTool, AreaTool, FestivalTool, KeywordSearchTool, NearbyTool};
pub use resource::{JSON_MIME_TYPE, TextResource, URI_SCHEME};

use crate::Result;
use crate::client::LazyClient;
use crate::server::protocol::ToolSchema;

/// A callable MCP tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &'static str;

    /// Definition advertised by `tools/list`.
    fn schema(&self) -> ToolSchema;

    /// Run the tool with raw JSON arguments.
    async fn call(&self, arguments: Value) -> Result<TextResource>;
}

/// Ordered set of tools; listing order is registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The eight tourism tools, all sharing one lazily built client.
    pub fn with_defaults(client: Arc<LazyClient>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(KeywordSearchTool::new(client.clone())));
        registry.register(Arc::new(AreaTool::new(client.clone())));
        registry.register(Arc::new(NearbyTool::new(client.clone())));
        registry.register(Arc::new(FestivalTool::new(client.clone())));
        registry.register(Arc::new(AccommodationTool::new(client.clone())));
        registry.register(Arc::new(DetailTool::new(client.clone())));
        registry.register(Arc::new(ImagesTool::new(client.clone())));
        registry.register(Arc::new(AreaCodesTool::new(client)));
        registry
    }

    /// Register a tool, replacing any tool with the same name in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
