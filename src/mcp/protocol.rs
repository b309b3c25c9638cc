// src/mcp/protocol.rs

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::poi::models::ProofOfInventionRequest;

#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

fn default_jsonrpc() -> String {
    "2.0".to_string()
}

impl Request {
    pub fn is_notification(&self) -> bool {
        self.id.is_null()
    }
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(ErrorObject {
                code,
                message,
                data: None,
            }),
        }
    }
}

// Standard JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
}

/// Prefix of every error envelope message.
pub const ERROR_PREFIX: &str = "Failed to process file";
/// Message used when a failure carries no description of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Outcome of one tool invocation. Exactly one variant is produced per call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Success(ProofOfInventionRequest),
    Error { message: String },
}

impl ToolResult {
    pub fn from_error(err: &ToolError) -> Self {
        let detail = err.to_string();
        let detail = if detail.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            detail
        };
        ToolResult::Error {
            message: format!("{}: {}", ERROR_PREFIX, detail),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolResult::Error { .. })
    }

    /// Renders the MCP `tools/call` result envelope.
    pub fn into_value(self) -> Value {
        match self {
            ToolResult::Success(payload) => {
                let structured = json!(payload);
                let text = structured.to_string();
                json!({
                    "supported_evm_chainIds": payload.supported_evm_chain_ids,
                    "transaction_request": payload.transaction_request,
                    "structuredContent": structured,
                    "content": [{ "type": "text", "text": text }]
                })
            }
            ToolResult::Error { message } => json!({
                "isError": true,
                "content": [{ "type": "text", "text": message }]
            }),
        }
    }
}
