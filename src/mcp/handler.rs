//! # MCP Handler Module
//!
//! Serves the agent's tool registry over the Model Context Protocol so that an
//! external MCP client can call the same balance (and, if enabled, transfer)
//! tools the interactive agent uses.
//!
//! ## Supported methods
//! - `initialize`
//! - `tools/list`
//! - `tools/call`
//! - each tool name directly, as an alias for `tools/call`

use serde_json::{json, Value};
use tracing::info;

use crate::{
    agent::tools::ToolRegistry,
    blockchain::models::ToolError,
    mcp::protocol::{error_codes, Request, Response},
    AppContext,
};

// Helper: produce a result Value that always contains a text content array
// and preserves structured data for JSON-friendly clients.
fn make_texty_result(text: String, payload: Value, is_error: bool) -> Value {
    let content = json!([{ "type": "text", "text": text }]);
    match payload {
        Value::Object(mut map) => {
            map.insert("content".into(), content);
            map.insert("isError".into(), Value::Bool(is_error));
            Value::Object(map)
        }
        other => json!({
            "data": other,
            "content": content,
            "isError": is_error,
        }),
    }
}

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(
    req: Request,
    ctx: &AppContext,
    registry: &ToolRegistry,
) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    if req.jsonrpc != "2.0" {
        return Some(Response::error(
            req.id,
            error_codes::INVALID_REQUEST,
            format!("Unsupported jsonrpc version: {}", req.jsonrpc),
        ));
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req, ctx),
        "tools/list" => handle_tools_list(&req, registry),
        "tools/call" => handle_tool_call(&req, ctx, registry).await,
        // Direct method calls are rewritten into tools/call
        method if registry.contains(method) => {
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": method,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(&wrapped, ctx, registry).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it to the registry.
async fn handle_tool_call(req: &Request, ctx: &AppContext, registry: &ToolRegistry) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id.clone(),
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name,
        None => {
            return Response::error(
                req.id.clone(),
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);

    match registry.call(ctx, tool_name, args).await {
        Ok(output) => {
            let text = output.render();
            let is_error = !output.is_success();
            let payload = serde_json::to_value(&output).unwrap_or(Value::Null);
            Response::success(req.id.clone(), make_texty_result(text, payload, is_error))
        }
        Err(err) => tool_error_response(req.id.clone(), &err),
    }
}

fn tool_error_response(id: Value, err: &ToolError) -> Response {
    Response::error_with_data(
        id,
        error_codes::INVALID_PARAMS,
        err.to_string(),
        Some(json!({ "code": err.code() })),
    )
}

fn handle_initialize(req: &Request, ctx: &AppContext) -> Response {
    let server_info = json!({
        "name": "sol_agent",
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions = format!(
        "Solana balance tools for wallet {}. Use check_sol_balance for SOL and \
         check_token_balance for SPL tokens.",
        ctx.wallet.address()
    );

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": "2025-06-18",
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request from the registry definitions.
fn handle_tools_list(req: &Request, registry: &ToolRegistry) -> Response {
    let tools: Vec<Value> = registry
        .definitions()
        .iter()
        .map(|d| d.to_mcp_spec())
        .collect();
    Response::success(req.id.clone(), json!({ "tools": tools }))
}
