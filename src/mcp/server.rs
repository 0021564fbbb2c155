// src/mcp/server.rs

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

use crate::{
    agent::tools::ToolRegistry,
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppContext,
};

/// Line-delimited JSON-RPC loop; runs until EOF or a write failure.
pub async fn run_mcp_server<R, W>(ctx: AppContext, reader: R, mut writer: W)
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Starting MCP server on stdin/stdout...");
    let registry = ToolRegistry::new(ctx.config.enable_transfers);
    let mut lines = reader.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("EOF received, shutting down MCP server");
                break;
            }
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!("Received: {}", line);

        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => handle_mcp_request(request, &ctx, &registry).await,
            Err(parse_error) => {
                error!("JSON parse error: {}", parse_error);
                Some(Response::error(
                    serde_json::Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", parse_error),
                ))
            }
        };

        if let Some(response) = response {
            if let Ok(response_json) = serde_json::to_string(&response) {
                debug!("Sending: {}", response_json);
                let written = async {
                    writer.write_all(response_json.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    writer.flush().await
                }
                .await;
                if let Err(e) = written {
                    error!("Failed to write response: {}", e);
                    break;
                }
            }
        }
    }

    info!("MCP server shutting down");
}
