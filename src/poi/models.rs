// src/poi/models.rs
use serde::{Deserialize, Serialize};

// --- Remote API models ---
//
// Only the fields the tool projects are declared. Everything else the service
// returns (proof tree, leaf values, top-level `to`) is ignored by serde.

/// Payload returned by the Proof of Invention API after an upload.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProofResponse {
    /// Absent on older API versions.
    #[serde(default)]
    pub success: Option<bool>,
    pub data: RemoteProofData,
    pub metadata: RemoteProofMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProofData {
    pub transaction: RemoteTransaction,
}

/// Unsigned anchoring transaction prepared by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTransaction {
    pub to: String,
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProofMetadata {
    pub supported_evm_chain_ids: Vec<u64>,
}

// --- Tool output models ---

/// Success payload of `create_proof_of_invention_request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOfInventionRequest {
    /// EVM chains the anchoring contract is deployed on
    #[serde(rename = "supported_evm_chainIds")]
    pub supported_evm_chain_ids: Vec<u64>,
    /// Unsigned transaction the caller can sign and broadcast
    pub transaction_request: TransactionRequest,
}

/// Unsigned transaction parameters. `value` is always zero: anchoring a
/// proof never transfers funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub to: String,
    pub data: String,
    pub value: u64,
}

impl TransactionRequest {
    pub fn new(to: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            data: data.into(),
            value: 0,
        }
    }
}
