//! Canonical transaction record

use serde::{Deserialize, Serialize};

use super::chain::Chain;

/// Lifecycle state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
}

/// What a transaction does, normalized across chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    /// Plain value transfer on a UTXO chain
    Transfer,
    Coinbase,
    ContractCall,
    TokenTransfer,
    ContractDeploy,
    TenureChange,
    /// BIP300 peg-in into a sidechain
    Deposit,
    /// BIP300 peg-out from a sidechain
    Withdrawal,
    Other,
}

/// UTXO-style input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInput {
    pub address: String,
    pub value: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vout: Option<u32>,
}

/// UTXO-style output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutput {
    pub address: String,
    pub value: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_type: Option<String>,
}

/// One typed argument of a contract call, as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionArg {
    pub name: String,
    /// Human-readable Clarity representation, e.g. `u1000` or `'SP...`
    pub repr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Contract-call payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCall {
    pub contract_id: String,
    pub function_name: String,
    pub args: Vec<FunctionArg>,
}

impl ContractCall {
    /// Find the first argument whose name matches one of `names`, in order
    pub fn arg(&self, names: &[&str]) -> Option<&FunctionArg> {
        names
            .iter()
            .find_map(|name| self.args.iter().find(|arg| arg.name == *name))
    }
}

/// Token-transfer payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    /// Fully-qualified asset id (`contract::token`), or `None` for the native token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_identifier: Option<String>,
    pub recipient: String,
    pub amount: u64,
    /// Hex-encoded memo bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// One entry of the transaction's event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxEvent {
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    /// Printable payload (Clarity repr for contract logs)
    pub payload: String,
}

/// Chain-agnostic transaction shape every adapter normalizes into
///
/// A transaction belongs to exactly one chain for its lifetime. `value` and
/// `fee` are in the chain's minor unit. `inputs`/`outputs` are empty for
/// account-model chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalTransaction {
    pub id: String,
    pub chain: Chain,
    pub status: TxStatus,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub timestamp_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
    pub sender: String,
    pub recipient: String,
    pub value: u64,
    pub fee: u64,
    pub confirmations: u64,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_call: Option<ContractCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_transfer: Option<TokenTransfer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<TxEvent>,
}

impl CanonicalTransaction {
    /// Sum of all input values (UTXO chains)
    pub fn total_input(&self) -> u64 {
        self.inputs
            .iter()
            .fold(0u64, |acc, input| acc.saturating_add(input.value))
    }

    /// Sum of all output values (UTXO chains)
    pub fn total_output(&self) -> u64 {
        self.outputs
            .iter()
            .fold(0u64, |acc, output| acc.saturating_add(output.value))
    }
}
