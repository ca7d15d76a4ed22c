//! Line-delimited stdio transport.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

use super::handler::McpHandler;
use super::protocol::{JsonRpcError, JsonRpcResponse, Reply};
use crate::Result;

/// Serve MCP on the process's stdin/stdout until stdin closes.
pub async fn serve(handler: Arc<McpHandler>) -> Result<()> {
    info!("serving MCP over stdio");
    serve_lines(
        &handler,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

/// One message per input line, one reply per output line.
///
/// Blank lines are skipped; end of input ends the session. A line that is
/// not valid UTF-8 gets a parse-error reply and the session continues.
pub async fn serve_lines<R, W>(handler: &McpHandler, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let reply = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                handler.handle_str(line).await
            }
            Err(e) => {
                warn!(error = %e, "input line is not valid UTF-8");
                Some(Reply::Single(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(e),
                )))
            }
        };
        let Some(reply) = reply else {
            continue;
        };
        match serde_json::to_string(&reply) {
            Ok(mut out) => {
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
            Err(e) => error!(error = %e, "failed to encode reply"),
        }
    }
    info!("stdin closed, ending stdio session");
    Ok(())
}
