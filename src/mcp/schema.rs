//! Declared shape of the `create_proof_of_invention_request` tool.
//!
//! The input schema is enforced before the tool handler runs; the output
//! schema documents the success payload produced by the response mapper.

use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

pub const TOOL_NAME: &str = "create_proof_of_invention_request";
pub const TOOL_DESCRIPTION: &str = "Process a file from the filesystem and prepare an unsigned transaction request to anchor a Proof of Invention hash on an EVM blockchain.";

/// Arguments accepted by the tool. Unknown keys are ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ToolRequest {
    #[validate(length(min = 1, message = "filepath must not be empty"))]
    pub filepath: String,
}

impl ToolRequest {
    /// Parses and validates `tools/call` arguments.
    pub fn from_arguments(args: &Value) -> Result<Self, String> {
        let request: ToolRequest = serde_json::from_value(args.clone())
            .map_err(|e| format!("Invalid arguments for {}: {}", TOOL_NAME, e))?;
        request
            .validate()
            .map_err(|e| format!("Invalid arguments for {}: {}", TOOL_NAME, e))?;
        Ok(request)
    }
}

pub fn input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "filepath": {
                "type": "string",
                "minLength": 1,
                "description": "Path to the file to be processed"
            }
        },
        "required": ["filepath"],
        "additionalProperties": false
    })
}

pub fn output_schema() -> Value {
    let hex = json!({ "type": "string", "pattern": "^0x[0-9a-fA-F]*$" });
    json!({
        "type": "object",
        "properties": {
            "supported_evm_chainIds": {
                "type": "array",
                "items": { "type": "integer", "minimum": 0 },
                "description": "List of supported blockchain networks"
            },
            "transaction_request": {
                "type": "object",
                "properties": {
                    "to": hex.clone(),
                    "data": hex,
                    "value": { "type": "integer", "const": 0 }
                },
                "required": ["to", "data", "value"],
                "description": "Unsigned transaction request parameters that can be used to build a transaction to be transmitted to a supported blockchain network"
            }
        },
        "required": ["supported_evm_chainIds", "transaction_request"]
    })
}

/// Entry returned by `tools/list`.
pub fn tool_definition() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": TOOL_DESCRIPTION,
        "inputSchema": input_schema(),
        "outputSchema": output_schema()
    })
}
