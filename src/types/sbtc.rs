//! sBTC bridge operation record

use serde::{Deserialize, Serialize};

use super::fees::GasCostAnalysis;
use super::transaction::TxStatus;

/// Sub-type of an sBTC bridge operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// BTC locked on Bitcoin, sBTC minted on Stacks
    Deposit,
    /// sBTC burned on Stacks, BTC released on Bitcoin
    Withdrawal,
    /// sBTC moved between Stacks principals
    Transfer,
    /// Touches an sBTC contract but matched no known function pattern
    Unknown,
}

impl OperationType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OperationType::Deposit => "deposit",
            OperationType::Withdrawal => "withdrawal",
            OperationType::Transfer => "transfer",
            OperationType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bridge-level status of an sBTC operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SbtcStatus {
    Pending,
    Complete,
    Failed,
}

impl From<TxStatus> for SbtcStatus {
    fn from(status: TxStatus) -> Self {
        match status {
            TxStatus::Pending => SbtcStatus::Pending,
            TxStatus::Confirmed => SbtcStatus::Complete,
            TxStatus::Failed => SbtcStatus::Failed,
        }
    }
}

/// An sBTC operation derived from a canonical transaction
///
/// Always recomputed from the transaction; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbtcOperation {
    pub tx_id: String,
    pub operation_type: OperationType,
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Amount in sats (sBTC shares Bitcoin's precision)
    pub amount: u64,
    pub status: SbtcStatus,
    /// Bitcoin-side leg of a deposit or withdrawal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_chain_tx_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_cost_analysis: Option<GasCostAnalysis>,
}
