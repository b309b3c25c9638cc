//! Projection of the Proof of Invention API response onto the tool output.

use serde_json::Value;

use crate::error::ToolError;
use crate::poi::models::{ProofOfInventionRequest, RemoteProofResponse, TransactionRequest};

/// Validates the raw JSON payload against [`RemoteProofResponse`] and keeps
/// only the chain ids and the transaction target/calldata.
pub fn map_response(payload: Value) -> Result<ProofOfInventionRequest, ToolError> {
    let response: RemoteProofResponse = serde_json::from_value(payload)
        .map_err(|e| ToolError::MalformedResponse(e.to_string()))?;

    if response.success == Some(false) {
        return Err(ToolError::MalformedResponse(
            "remote service reported success=false".to_string(),
        ));
    }

    let transaction = response.data.transaction;
    ensure_hex("data.transaction.to", &transaction.to)?;
    ensure_hex("data.transaction.data", &transaction.data)?;

    Ok(ProofOfInventionRequest {
        supported_evm_chain_ids: response.metadata.supported_evm_chain_ids,
        transaction_request: TransactionRequest::new(transaction.to, transaction.data),
    })
}

fn ensure_hex(field: &str, value: &str) -> Result<(), ToolError> {
    let valid = value
        .strip_prefix("0x")
        .map(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(ToolError::MalformedResponse(format!(
            "{} is not a 0x-prefixed hex string: '{}'",
            field, value
        )))
    }
}
