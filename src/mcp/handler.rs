//! # MCP Handler Module
//!
//! This module implements the Model Context Protocol (MCP) for the Proof of
//! Invention server. It handles incoming MCP requests and dispatches them to
//! the single registered tool.
//!
//! ## Supported Tools
//!
//! - `create_proof_of_invention_request` - Upload a file to the Proof of
//!   Invention API and return the unsigned anchoring transaction
//!
//! Every ordinary failure of the tool (unreadable file, network or HTTP
//! error, unexpected response shape) is returned as an `isError` result.
//! A panic inside the invocation is not an ordinary failure and is re-raised.

use std::future::Future;

use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::{
    error::ToolError,
    mcp::{
        protocol::{error_codes, Request, Response, ToolResult},
        schema::{self, ToolRequest, TOOL_NAME},
    },
    poi::{map_response, models::ProofOfInventionRequest, PoiClient},
    AppState,
};

pub const SERVER_NAME: &str = "mcp-poi-server";
pub const SERVER_VERSION: &str = "1.0.0";
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "ping" => Response::success(req.id.clone(), json!({})),
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tool_call(req, state).await,
        // Direct method call from CLI clients, rewritten into tools/call
        TOOL_NAME => {
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": TOOL_NAME,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request. Malformed calls are rejected with
/// `INVALID_PARAMS` before the tool runs; everything after that yields a
/// tool result envelope.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match required_str(params, "name", &req.id) {
        Ok(name) => name,
        Err(resp) => return resp,
    };
    if tool_name != TOOL_NAME {
        return Response::error(
            req.id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Unknown tool: {}", tool_name),
        );
    }

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);
    let request = match ToolRequest::from_arguments(args) {
        Ok(request) => request,
        Err(message) => {
            return Response::error(req.id.clone(), error_codes::INVALID_PARAMS, message)
        }
    };

    let result = invoke_tool(&state, request).await;
    Response::success(req.id, result.into_value())
}

/// Runs one tool invocation to completion and renders its outcome.
pub async fn invoke_tool(state: &AppState, request: ToolRequest) -> ToolResult {
    let client = state.poi_client.clone();
    let filepath = request.filepath;
    debug!(filepath = %filepath, "Starting proof of invention request");

    let outcome = run_isolated(async move {
        create_proof_of_invention_request(&client, &filepath).await
    })
    .await;

    match outcome {
        Ok(payload) => {
            info!(
                chains = payload.supported_evm_chain_ids.len(),
                to = %payload.transaction_request.to,
                "Proof of invention request prepared"
            );
            ToolResult::Success(payload)
        }
        Err(err) => {
            warn!(error = %err, "Proof of invention request failed");
            ToolResult::from_error(&err)
        }
    }
}

/// Uploads the file and projects the remote response onto the tool output.
pub async fn create_proof_of_invention_request(
    client: &PoiClient,
    filepath: &str,
) -> Result<ProofOfInventionRequest, ToolError> {
    let payload = client.upload(filepath).await?;
    debug!("Upload complete, mapping response");
    map_response(payload)
}

// Runs the invocation on its own task so a panic cannot be mistaken for an
// ordinary failure. Panics are re-raised to the caller unchanged.
async fn run_isolated<F>(invocation: F) -> Result<ProofOfInventionRequest, ToolError>
where
    F: Future<Output = Result<ProofOfInventionRequest, ToolError>> + Send + 'static,
{
    match tokio::spawn(invocation).await {
        Ok(outcome) => outcome,
        Err(join_err) if join_err.is_panic() => {
            error!("Unrecoverable fault in tool invocation, re-raising");
            std::panic::resume_unwind(join_err.into_panic())
        }
        Err(join_err) => Err(ToolError::Upload(format!(
            "invocation cancelled: {}",
            join_err
        ))),
    }
}

fn required_str<'a>(params: &'a Value, key: &str, req_id: &Value) -> Result<&'a str, Response> {
    params.get(key).and_then(Value::as_str).ok_or_else(|| {
        Response::error(
            req_id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Missing '{}' field in params", key),
        )
    })
}

fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": SERVER_NAME,
        "version": SERVER_VERSION
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions = "Proof of Invention MCP server: uploads a local file and returns an unsigned EVM transaction that anchors its proof on-chain.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request by returning the single tool definition.
fn handle_tools_list(req: &Request) -> Response {
    Response::success(
        req.id.clone(),
        json!({ "tools": [schema::tool_definition()] }),
    )
}
