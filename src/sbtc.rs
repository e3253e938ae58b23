// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! sBTC bridge operation classification
//!
//! [`SbtcClassifier`] inspects a canonical Stacks transaction and decides
//! whether it is an sBTC bridge operation. The decision is heuristic:
//!
//! 1. Only contract calls and token transfers are considered.
//! 2. The contract (or token asset) must belong to a configured sBTC principal
//!    or carry an sBTC marker in its name.
//! 3. The operation type comes from an ordered `(substring, type)` table over
//!    the function name. A matching contract with no table hit is `unknown`.
//!
//! Arguments are read by name from the typed Clarity arguments; the first
//! 64-hex run found in any event payload is taken as the linked Bitcoin
//! transaction.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::constants::sbtc::NAME_MARKERS;
use crate::config::NetworkRegistry;
use crate::fees::FeeAnalyzer;
use crate::tracing::spans;
use crate::types::amount::Decimals;
use crate::types::chain::Chain;
use crate::types::fees::FeeTierThresholds;
use crate::types::sbtc::{OperationType, SbtcOperation};
use crate::types::transaction::{CanonicalTransaction, ContractCall, TokenTransfer, TxKind};

/// Function-name substrings in match order
///
/// Deposit keywords lead the table, with one exception: the withdrawal keyword
/// `unwrap` sits ahead of the deposit keyword `wrap`, which it contains.
/// Otherwise `unwrap` could never match.
pub const OPERATION_TABLE: [(&str, OperationType); 7] = [
    ("deposit", OperationType::Deposit),
    ("mint", OperationType::Deposit),
    ("unwrap", OperationType::Withdrawal),
    ("wrap", OperationType::Deposit),
    ("withdraw", OperationType::Withdrawal),
    ("burn", OperationType::Withdrawal),
    ("transfer", OperationType::Transfer),
];

static LINKED_TX_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9a-fA-F]{64}").expect("static regex"));

/// Operation type for a function name, `Unknown` when nothing in the table matches
pub fn operation_type(function_name: &str) -> OperationType {
    let name = function_name.to_ascii_lowercase();
    OPERATION_TABLE
        .iter()
        .find(|(needle, _)| name.contains(needle))
        .map(|(_, op)| *op)
        .unwrap_or(OperationType::Unknown)
}

/// Classifies transactions as sBTC operations
#[derive(Debug, Clone)]
pub struct SbtcClassifier {
    contracts: Vec<String>,
    analyzer: FeeAnalyzer,
    decimals: Decimals,
    stx_usd: f64,
}

impl SbtcClassifier {
    pub fn new(registry: &NetworkRegistry) -> Self {
        let stacks = registry.descriptor(Chain::Stacks);
        Self {
            contracts: registry
                .sbtc_contracts()
                .iter()
                .map(|c| c.to_ascii_lowercase())
                .collect(),
            analyzer: FeeAnalyzer::new(
                stacks
                    .map(|d| d.fee_tiers)
                    .unwrap_or(FeeTierThresholds::STACKS),
            ),
            decimals: stacks.map(|d| d.decimals).unwrap_or(Decimals::STACKS),
            stx_usd: registry.prices().native_usd(Chain::Stacks),
        }
    }

    /// Classify `tx`, returning `None` when it is not an sBTC operation
    pub fn classify(&self, tx: &CanonicalTransaction) -> Option<SbtcOperation> {
        let _span = spans::classify_sbtc(&tx.id).entered();

        let mut op = match (tx.kind, &tx.contract_call, &tx.token_transfer) {
            (TxKind::ContractCall, Some(call), _) => self.from_contract_call(tx, call)?,
            (TxKind::TokenTransfer, _, Some(transfer)) => self.from_token_transfer(tx, transfer)?,
            _ => return None,
        };

        op.linked_chain_tx_id = tx
            .events
            .iter()
            .find_map(|event| LINKED_TX_ID.find(&event.payload))
            .map(|m| m.as_str().to_ascii_lowercase());
        if tx.fee > 0 {
            op.gas_cost_analysis =
                Some(self.analyzer.analyze(tx.fee as u128, self.decimals, self.stx_usd));
        }

        tracing::debug!(
            tx_id = %tx.id,
            operation = %op.operation_type,
            "Classified sBTC operation"
        );
        Some(op)
    }

    /// Whether a contract id or asset identifier belongs to sBTC
    pub fn is_sbtc_identifier(&self, identifier: &str) -> bool {
        let identifier = identifier.to_ascii_lowercase();
        self.contracts.iter().any(|c| identifier.contains(c.as_str()))
            || NAME_MARKERS.iter().any(|m| identifier.contains(m))
    }

    fn from_contract_call(
        &self,
        tx: &CanonicalTransaction,
        call: &ContractCall,
    ) -> Option<SbtcOperation> {
        if !self.is_sbtc_identifier(&call.contract_id) {
            return None;
        }
        Some(SbtcOperation {
            tx_id: tx.id.clone(),
            operation_type: operation_type(&call.function_name),
            sender: tx.sender.clone(),
            recipient: call
                .arg(&["recipient", "to"])
                .map(|arg| parse_principal(&arg.repr)),
            amount: call
                .arg(&["amount", "value"])
                .and_then(|arg| parse_uint(&arg.repr))
                .unwrap_or(0),
            status: tx.status.into(),
            linked_chain_tx_id: None,
            memo: call.arg(&["memo"]).and_then(|arg| decode_memo(&arg.repr)),
            contract_id: Some(call.contract_id.clone()),
            function_name: Some(call.function_name.clone()),
            gas_cost_analysis: None,
        })
    }

    fn from_token_transfer(
        &self,
        tx: &CanonicalTransaction,
        transfer: &TokenTransfer,
    ) -> Option<SbtcOperation> {
        let asset = transfer.asset_identifier.as_deref()?;
        if !self.is_sbtc_identifier(asset) {
            return None;
        }
        Some(SbtcOperation {
            tx_id: tx.id.clone(),
            operation_type: OperationType::Transfer,
            sender: tx.sender.clone(),
            recipient: Some(transfer.recipient.clone()),
            amount: transfer.amount,
            status: tx.status.into(),
            linked_chain_tx_id: None,
            memo: transfer.memo.as_deref().and_then(decode_memo),
            contract_id: asset.split("::").next().map(str::to_string),
            function_name: None,
            gas_cost_analysis: None,
        })
    }
}

/// `u123` or `123` to 123
fn parse_uint(repr: &str) -> Option<u64> {
    let repr = repr.trim();
    repr.strip_prefix('u').unwrap_or(repr).parse().ok()
}

/// Strip the Clarity principal quote: `'SP…` to `SP…`
fn parse_principal(repr: &str) -> String {
    let repr = repr.trim();
    repr.strip_prefix('\'').unwrap_or(repr).to_string()
}

/// Hex memo (`0x…` or `(some 0x…)`) to UTF-8 with NULs removed
///
/// Anything that fails to decode yields `None`.
pub fn decode_memo(repr: &str) -> Option<String> {
    let repr = repr.trim();
    let inner = repr
        .strip_prefix("(some ")
        .and_then(|r| r.strip_suffix(')'))
        .unwrap_or(repr)
        .trim();
    let hex_digits = inner.strip_prefix("0x").unwrap_or(inner);
    let bytes = hex::decode(hex_digits).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let text: String = text.chars().filter(|c| *c != '\0').collect();
    (!text.is_empty()).then_some(text)
}
