//! HTTP transport: MCP over `POST {path}` and a `GET /health` probe.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::Transport;
use super::handler::McpHandler;
use crate::Result;
use crate::client::LazyClient;

pub const SERVICE_NAME: &str = "Korea Tourism API MCP Server";

/// Shared state behind every route.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<McpHandler>,
    pub client: Arc<LazyClient>,
    pub transport: Transport,
}

/// Build the router with the MCP endpoint mounted at `path`.
///
/// Methods other than POST on `path` are answered with 405.
pub fn router(state: AppState, path: &str) -> Router {
    Router::new()
        .route(path, post(handle_mcp))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `address` and serve until the listener fails.
pub async fn serve(address: &str, path: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!(address = %listener.local_addr()?, path, "serving MCP over HTTP");
    axum::serve(listener, router(state, path)).await?;
    Ok(())
}

async fn handle_mcp(State(state): State<AppState>, body: String) -> Response {
    match state.handler.handle_str(&body).await {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Liveness probe: healthy when the tourism client can be constructed.
async fn health(State(state): State<AppState>) -> Response {
    let timestamp = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
    match state.client.get().await {
        Ok(_) => Json(json!({
            "status": "healthy",
            "service": SERVICE_NAME,
            "transport": state.transport.as_str(),
            "timestamp": timestamp,
        }))
        .into_response(),
        Err(e) => {
            warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": SERVICE_NAME,
                    "error": e.to_string(),
                    "transport": state.transport.as_str(),
                    "timestamp": timestamp,
                })),
            )
                .into_response()
        }
    }
}
