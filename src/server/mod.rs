//! MCP server: protocol types, method dispatch and the two transports.
//!
//! - [`protocol`]: JSON-RPC 2.0 and MCP message types
//! - [`handler`]: [`McpHandler`], shared by both transports
//! - [`stdio`]: line-delimited stdin/stdout transport
//! - [`http`]: axum router with the MCP endpoint and `/health`
//! - [`config`]: transport selection and config-file loading

pub mod config;
pub mod handler;
pub mod http;
pub mod protocol;
pub mod stdio;

pub use config::{Config, ServerOverrides, ServerSettings, Transport};
pub use handler::McpHandler;
