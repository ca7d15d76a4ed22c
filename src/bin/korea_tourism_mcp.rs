//! korea-tourism-mcp: MCP server for the Korea Tourism Organization API.
//!
//! Serves the tourism tools over stdio (default) or HTTP, then closes the
//! upstream client on exit, whether the server stopped on its own or a
//! SIGINT/SIGTERM arrived.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use korea_tourism_mcp::server::http::{self, AppState};
use korea_tourism_mcp::server::{
    Config, McpHandler, ServerOverrides, ServerSettings, Transport, stdio,
};
use korea_tourism_mcp::tools::ToolRegistry;
use korea_tourism_mcp::{ClientConfig, LazyClient};

/// Korea Tourism API MCP server.
#[derive(Parser)]
#[command(name = "korea-tourism-mcp")]
#[command(version = korea_tourism_mcp::PKG_VERSION)]
#[command(about = "Korea Tourism API MCP Server")]
struct Args {
    /// Transport to serve on [env: MCP_TRANSPORT] [default: stdio]
    #[arg(long, value_enum)]
    transport: Option<Transport>,

    /// Host to bind for HTTP transports [env: MCP_HOST] [default: 127.0.0.1]
    #[arg(long)]
    host: Option<String>,

    /// Port to bind for HTTP transports [env: MCP_PORT] [default: 8000]
    #[arg(long)]
    port: Option<u16>,

    /// MCP endpoint path for HTTP transports [env: MCP_PATH] [default: /mcp]
    #[arg(long)]
    path: Option<String>,

    /// Log level [env: MCP_LOG_LEVEL] [default: INFO]
    #[arg(long)]
    log_level: Option<String>,

    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ServerOverrides {
        ServerOverrides {
            transport: self.transport,
            host: self.host.clone(),
            port: self.port,
            path: self.path.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

/// Closes the upstream client on every exit path.
struct ShutdownGuard(Arc<LazyClient>);

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        self.0.shutdown();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let env = |key: &str| std::env::var(key).ok();

    let config = Config::load(args.config.as_deref())?;
    let settings = ServerSettings::resolve(&args.overrides(), &config.server, env)?;

    // Logs go to stderr so stdout stays a clean protocol channel.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(settings.log_level.to_lowercase())
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let client_config = ClientConfig::default()
        .with_file_settings(&config.client)
        .with_env(env)?;
    if client_config.api_key.trim().is_empty() {
        warn!("KOREA_TOURISM_API_KEY is not set; tool calls will fail until it is");
    }

    let client = Arc::new(LazyClient::new(client_config));
    let _guard = ShutdownGuard(client.clone());
    let handler = Arc::new(McpHandler::new(ToolRegistry::with_defaults(client.clone())));

    info!(
        version = korea_tourism_mcp::PKG_VERSION,
        transport = %settings.transport,
        tools = handler.registry().len(),
        "korea-tourism-mcp starting"
    );

    let server = async {
        match settings.transport {
            Transport::Stdio => stdio::serve(handler.clone()).await,
            Transport::StreamableHttp => {
                let state = AppState {
                    handler: handler.clone(),
                    client: client.clone(),
                    transport: settings.transport,
                };
                http::serve(&settings.bind_address(), &settings.path, state).await
            }
        }
    };

    let outcome = tokio::select! {
        result = server => result,
        _ = shutdown_signal() => {
            info!("shutdown signal received");
            Ok(())
        }
    };

    client.shutdown();
    info!("korea-tourism-mcp stopped");
    outcome?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
