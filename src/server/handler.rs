//! MCP method dispatch, shared by every transport.

use std::time::Instant;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JSONRPC_VERSION, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, Reply, ServerCapabilities, ServerInfo,
    ToolContent, ToolsCapability, negotiate_protocol_version,
};
use crate::TourismError;
use crate::telemetry;
use crate::tools::ToolRegistry;

pub const SERVER_NAME: &str = "korea-tourism-mcp";

const INSTRUCTIONS: &str = "Tools for browsing Korea Tourism Organization data: keyword and \
    area search, nearby attractions, festivals, accommodations, item details, images and \
    area codes. Use get_area_codes to discover area codes.";

/// Turns inbound JSON-RPC messages into replies.
pub struct McpHandler {
    registry: ToolRegistry,
}

impl McpHandler {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one raw message (a request, a notification or a batch).
    ///
    /// Returns `None` when nothing should be written back, i.e. the message
    /// held only notifications.
    pub async fn handle_str(&self, raw: &str) -> Option<Reply> {
        match serde_json::from_str::<Value>(raw) {
            Ok(message) => self.handle_value(message).await,
            Err(e) => {
                warn!(error = %e, "unparseable JSON-RPC message");
                Some(Reply::Single(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(e),
                )))
            }
        }
    }

    pub async fn handle_value(&self, message: Value) -> Option<Reply> {
        match message {
            Value::Array(batch) if batch.is_empty() => Some(Reply::Single(JsonRpcResponse::error(
                Value::Null,
                JsonRpcError::invalid_request("empty batch"),
            ))),
            Value::Array(batch) => {
                let mut replies = Vec::with_capacity(batch.len());
                for message in batch {
                    if let Some(reply) = self.handle_message(message).await {
                        replies.push(reply);
                    }
                }
                (!replies.is_empty()).then_some(Reply::Batch(replies))
            }
            message => self.handle_message(message).await.map(Reply::Single),
        }
    }

    async fn handle_message(&self, message: Value) -> Option<JsonRpcResponse> {
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request(e)));
            }
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!(
                    "unsupported jsonrpc version '{}'",
                    request.jsonrpc
                )),
            ));
        }

        if request.is_notification() {
            debug!(method = %request.method, "notification received");
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        let result = self.dispatch(&request.method, request.params).await;
        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, JsonRpcError> {
        match method {
            "initialize" => self.initialize(params.as_ref()),
            "ping" => Ok(json!({})),
            "tools/list" => to_result(ListToolsResult {
                tools: self.registry.schemas(),
            }),
            "tools/call" => self.call_tool(params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        }
    }

    fn initialize(&self, params: Option<&Value>) -> Result<Value, JsonRpcError> {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);
        let version = negotiate_protocol_version(requested);
        info!(requested = ?requested, negotiated = version, "client initialized session");

        to_result(InitializeResult {
            protocol_version: version.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: crate::PKG_VERSION.to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::invalid_params("tools/call requires params"))
            .and_then(|p| {
                serde_json::from_value(p).map_err(|e| JsonRpcError::invalid_params(e.to_string()))
            })?;

        let tool = self
            .registry
            .get(&params.name)
            .ok_or_else(|| JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)))?;

        let start = Instant::now();
        let outcome = tool.call(params.arguments.unwrap_or(Value::Null)).await;
        let status = if outcome.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::TOOL_CALLS_TOTAL, "tool" => tool.name(), "status" => status)
            .increment(1);

        match outcome {
            Ok(resource) => {
                debug!(
                    tool = tool.name(),
                    uri = %resource.uri,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "tool call succeeded"
                );
                to_result(CallToolResult {
                    content: vec![ToolContent::Resource { resource }],
                    is_error: None,
                })
            }
            Err(e) => {
                warn!(tool = tool.name(), error = %e, "tool call failed");
                Err(rpc_error(e))
            }
        }
    }
}

/// Map a tool failure onto a JSON-RPC error.
pub fn rpc_error(error: TourismError) -> JsonRpcError {
    match error {
        TourismError::InvalidArgument(message) => JsonRpcError::invalid_params(message),
        other => JsonRpcError::internal_error(other.to_string()),
    }
}

fn to_result<T: Serialize>(value: T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}
