// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Stacks adapter over the Hiro API
//!
//! Hiro pages blocks in at most 30 and transactions in at most 50 per request,
//! so larger limits are served by several consecutive requests against the
//! same provider.

use async_trait::async_trait;
use tracing::Instrument;

use super::{check_limit, require_identifier, ChainAdapter, KnownTip};
use crate::config::{NetworkDescriptor, ProviderEndpoint};
use crate::errors::{AdapterError, ProviderError};
use crate::fallback::FallbackSynthesizer;
use crate::tracing::spans;
use crate::transport::{first_success, live_or_synthetic, JsonClient};
use crate::types::address::{CanonicalAddress, NetworkStats};
use crate::types::block::{BlockRef, CanonicalBlock};
use crate::types::chain::{Chain, Network};
use crate::types::sourced::Sourced;
use crate::types::transaction::CanonicalTransaction;

const BLOCK_PAGE: usize = 30;
const TX_PAGE: usize = 50;

/// Adapter for the Stacks chain
#[derive(Debug, Clone)]
pub struct StacksAdapter {
    chain: Chain,
    providers: Vec<ProviderEndpoint>,
    client: JsonClient,
    synth: FallbackSynthesizer,
    known_tip: KnownTip,
}

impl StacksAdapter {
    pub fn new(descriptor: &NetworkDescriptor, network: Network, client: JsonClient) -> Self {
        Self {
            chain: descriptor.chain,
            providers: descriptor.providers.clone(),
            client,
            synth: FallbackSynthesizer::new(descriptor, network),
            known_tip: KnownTip::default(),
        }
    }

    async fn fetch_tip(&self, provider: &ProviderEndpoint) -> Result<u64, ProviderError> {
        let info: raw::CoreInfo = self.client.get_json(provider, "/v2/info").await?;
        self.known_tip.record(info.stacks_tip_height);
        Ok(info.stacks_tip_height)
    }

    async fn fetch_recent_blocks(
        &self,
        provider: &ProviderEndpoint,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CanonicalBlock>, ProviderError> {
        let tip = self.fetch_tip(provider).await?;
        let mut blocks = Vec::with_capacity(limit);

        while blocks.len() < limit {
            let page_size = (limit - blocks.len()).min(BLOCK_PAGE);
            let path = format!(
                "/extended/v2/blocks?limit={page_size}&offset={}",
                offset.saturating_add(blocks.len())
            );
            let page: raw::Page<raw::Block> = self.client.get_json(provider, &path).await?;
            let received = page.results.len();
            blocks.extend(page.results.into_iter().map(|b| b.into_canonical(Some(tip))));
            if received < page_size {
                break;
            }
        }

        Ok(blocks)
    }

    async fn fetch_block(
        &self,
        provider: &ProviderEndpoint,
        reference: &BlockRef,
    ) -> Result<CanonicalBlock, ProviderError> {
        let block: raw::Block = self
            .client
            .get_json(provider, &format!("/extended/v2/blocks/{reference}"))
            .await?;
        let tip = self.fetch_tip(provider).await.ok();
        Ok(block.into_canonical(tip))
    }

    async fn fetch_transaction(
        &self,
        provider: &ProviderEndpoint,
        id: &str,
    ) -> Result<CanonicalTransaction, ProviderError> {
        let tx: raw::Transaction = self
            .client
            .get_json(provider, &format!("/extended/v1/tx/{id}"))
            .await?;
        let tip = match tx.block_height {
            Some(_) => self.fetch_tip(provider).await.ok(),
            None => None,
        };
        tx.into_canonical(self.chain, tip)
            .map_err(|details| ProviderError::malformed(&provider.name, details))
    }

    async fn fetch_recent_transactions(
        &self,
        provider: &ProviderEndpoint,
        limit: usize,
    ) -> Result<Vec<CanonicalTransaction>, ProviderError> {
        let tip = self.fetch_tip(provider).await.ok();
        let mut txs = Vec::with_capacity(limit);

        while txs.len() < limit {
            let page_size = (limit - txs.len()).min(TX_PAGE);
            let path = format!("/extended/v1/tx?limit={page_size}&offset={}", txs.len());
            let page: raw::Page<raw::Transaction> = self.client.get_json(provider, &path).await?;
            let received = page.results.len();
            for tx in page.results {
                let tx = tx
                    .into_canonical(self.chain, tip)
                    .map_err(|details| ProviderError::malformed(&provider.name, details))?;
                txs.push(tx);
            }
            if received < page_size {
                break;
            }
        }

        Ok(txs)
    }

    async fn fetch_address(
        &self,
        provider: &ProviderEndpoint,
        address: &str,
    ) -> Result<CanonicalAddress, ProviderError> {
        let balances_path = format!("/extended/v1/address/{address}/balances");
        let history_path = format!("/extended/v1/address/{address}/transactions?limit=1");
        let (balances, history) = tokio::try_join!(
            self.client.get_json::<raw::Balances>(provider, &balances_path),
            self.client
                .get_json::<raw::Page<serde_json::Value>>(provider, &history_path),
        )?;
        let balance = raw::parse_amount(&balances.stx.balance).ok_or_else(|| {
            ProviderError::malformed(
                &provider.name,
                format!("stx balance {:?} is not an integer", balances.stx.balance),
            )
        })?;
        Ok(CanonicalAddress {
            address: address.to_string(),
            chain: self.chain,
            balance,
            unconfirmed_balance: 0,
            tx_count: history.total,
        })
    }

    async fn fetch_stats(
        &self,
        provider: &ProviderEndpoint,
    ) -> Result<NetworkStats, ProviderError> {
        let (tip, fees, mempool) = tokio::try_join!(
            self.fetch_tip(provider),
            self.client
                .get_json::<raw::MempoolFees>(provider, "/extended/v2/mempool/fees"),
            self.client
                .get_json::<raw::MempoolStats>(provider, "/extended/v1/tx/mempool/stats"),
        )?;
        Ok(NetworkStats {
            chain: self.chain,
            tip_height: tip,
            mempool_tx_count: mempool.total(),
            fees: fees.recommendation(),
        })
    }
}

/// Hiro expects `0x`-prefixed transaction ids
fn normalize_tx_id(id: &str) -> String {
    if id.starts_with("0x") {
        id.to_string()
    } else {
        format!("0x{id}")
    }
}

#[async_trait]
impl ChainAdapter for StacksAdapter {
    fn chain(&self) -> Chain {
        self.chain
    }

    async fn recent_blocks(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Sourced<Vec<CanonicalBlock>>, AdapterError> {
        check_limit(limit)?;
        if limit == 0 {
            return Ok(Sourced::Live(Vec::new()));
        }
        async {
            let result = first_success("recent_blocks", &self.providers, |p| {
                self.fetch_recent_blocks(p, limit, offset)
            })
            .await;
            Ok(live_or_synthetic(self.chain, "recent_blocks", result, || {
                let _span = spans::synthesize(self.chain, "recent_blocks").entered();
                self.synth.recent_blocks(self.known_tip.get(), limit, offset)
            }))
        }
        .instrument(spans::adapter_operation(self.chain, "recent_blocks"))
        .await
    }

    async fn block(&self, reference: BlockRef) -> Result<Sourced<CanonicalBlock>, AdapterError> {
        if let BlockRef::Hash(hash) = &reference {
            require_identifier(hash, "block")?;
        }
        async {
            let result =
                first_success("block", &self.providers, |p| self.fetch_block(p, &reference)).await;
            Ok(live_or_synthetic(self.chain, "block", result, || {
                let _span = spans::synthesize(self.chain, "block").entered();
                self.synth.block(&reference)
            }))
        }
        .instrument(spans::adapter_operation(self.chain, "block"))
        .await
    }

    async fn transaction(&self, id: &str) -> Result<Sourced<CanonicalTransaction>, AdapterError> {
        let id = normalize_tx_id(require_identifier(id, "transaction")?);
        async {
            let result = first_success("transaction", &self.providers, |p| {
                self.fetch_transaction(p, &id)
            })
            .await;
            Ok(live_or_synthetic(self.chain, "transaction", result, || {
                let _span = spans::synthesize(self.chain, "transaction").entered();
                self.synth.transaction(&id)
            }))
        }
        .instrument(spans::adapter_operation(self.chain, "transaction"))
        .await
    }

    async fn recent_transactions(
        &self,
        limit: usize,
    ) -> Result<Sourced<Vec<CanonicalTransaction>>, AdapterError> {
        check_limit(limit)?;
        if limit == 0 {
            return Ok(Sourced::Live(Vec::new()));
        }
        async {
            let result = first_success("recent_transactions", &self.providers, |p| {
                self.fetch_recent_transactions(p, limit)
            })
            .await;
            Ok(live_or_synthetic(self.chain, "recent_transactions", result, || {
                let _span = spans::synthesize(self.chain, "recent_transactions").entered();
                self.synth.recent_transactions(limit)
            }))
        }
        .instrument(spans::adapter_operation(self.chain, "recent_transactions"))
        .await
    }

    async fn address(&self, address: &str) -> Result<Sourced<CanonicalAddress>, AdapterError> {
        let address = require_identifier(address, "address")?;
        async {
            let result =
                first_success("address", &self.providers, |p| self.fetch_address(p, address)).await;
            Ok(live_or_synthetic(self.chain, "address", result, || {
                let _span = spans::synthesize(self.chain, "address").entered();
                self.synth.address(address)
            }))
        }
        .instrument(spans::adapter_operation(self.chain, "address"))
        .await
    }

    async fn stats(&self) -> Result<Sourced<NetworkStats>, AdapterError> {
        async {
            let result = first_success("stats", &self.providers, |p| self.fetch_stats(p)).await;
            Ok(live_or_synthetic(self.chain, "stats", result, || {
                let _span = spans::synthesize(self.chain, "stats").entered();
                self.synth.stats()
            }))
        }
        .instrument(spans::adapter_operation(self.chain, "stats"))
        .await
    }
}

/// Hiro API response payloads
pub(crate) mod raw {
    use std::collections::HashMap;

    use serde::Deserialize;

    use super::super::{confirmations, timestamp_ms};
    use crate::types::address::FeeRecommendation;
    use crate::types::block::CanonicalBlock;
    use crate::types::chain::Chain;
    use crate::types::transaction::{
        CanonicalTransaction, ContractCall, FunctionArg, TokenTransfer, TxEvent, TxKind, TxStatus,
    };

    /// Hiro encodes integer amounts as decimal strings
    pub fn parse_amount(value: &str) -> Option<u64> {
        value.trim().parse::<u64>().ok()
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Page<T> {
        #[serde(default)]
        pub total: u64,
        pub results: Vec<T>,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct CoreInfo {
        pub stacks_tip_height: u64,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Block {
        pub hash: String,
        pub height: u64,
        #[serde(default)]
        pub block_time: Option<i64>,
        #[serde(default)]
        pub tx_count: Option<u64>,
        #[serde(default)]
        pub parent_block_hash: Option<String>,
    }

    impl Block {
        /// Stacks blocks carry no size, merkle root, nonce or bits; those map to defaults
        pub fn into_canonical(self, tip: Option<u64>) -> CanonicalBlock {
            CanonicalBlock {
                confirmations: confirmations(tip, Some(self.height)),
                hash: self.hash,
                height: self.height,
                timestamp_ms: timestamp_ms(self.block_time),
                tx_count: self.tx_count.unwrap_or(0),
                size_bytes: 0,
                prev_hash: self.parent_block_hash.unwrap_or_default(),
                merkle_root: String::new(),
                nonce: 0,
                bits: 0,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct RawTokenTransfer {
        pub recipient_address: String,
        pub amount: String,
        #[serde(default)]
        pub memo: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct RawFunctionArg {
        #[serde(default)]
        pub hex: Option<String>,
        pub repr: String,
        pub name: String,
        #[serde(rename = "type")]
        pub type_name: String,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct RawContractCall {
        pub contract_id: String,
        pub function_name: String,
        #[serde(default)]
        pub function_args: Vec<RawFunctionArg>,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct RawSmartContract {
        pub contract_id: String,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct ClarityValue {
        pub repr: String,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct ContractLog {
        pub contract_id: String,
        pub value: ClarityValue,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Asset {
        #[serde(default)]
        pub asset_event_type: Option<String>,
        #[serde(default)]
        pub asset_id: Option<String>,
        #[serde(default)]
        pub sender: Option<String>,
        #[serde(default)]
        pub recipient: Option<String>,
        #[serde(default)]
        pub amount: Option<String>,
        #[serde(default)]
        pub memo: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Event {
        pub event_type: String,
        #[serde(default)]
        pub contract_log: Option<ContractLog>,
        #[serde(default)]
        pub asset: Option<Asset>,
    }

    impl Event {
        fn into_canonical(self) -> TxEvent {
            match (self.contract_log, self.asset) {
                (Some(log), _) => TxEvent {
                    event_type: self.event_type,
                    contract_id: Some(log.contract_id),
                    asset_id: None,
                    payload: log.value.repr,
                },
                (None, Some(asset)) => {
                    let payload = [
                        asset.asset_event_type.as_deref(),
                        asset.amount.as_deref(),
                        asset.sender.as_deref(),
                        asset.recipient.as_deref(),
                        asset.memo.as_deref(),
                    ]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                    TxEvent {
                        event_type: self.event_type,
                        contract_id: None,
                        asset_id: asset.asset_id,
                        payload,
                    }
                }
                (None, None) => TxEvent {
                    event_type: self.event_type,
                    contract_id: None,
                    asset_id: None,
                    payload: String::new(),
                },
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Transaction {
        pub tx_id: String,
        pub tx_type: String,
        pub tx_status: String,
        #[serde(default)]
        pub fee_rate: Option<String>,
        pub sender_address: String,
        #[serde(default)]
        pub block_height: Option<u64>,
        #[serde(default)]
        pub block_time: Option<i64>,
        #[serde(default)]
        pub burn_block_time: Option<i64>,
        #[serde(default)]
        pub receipt_time: Option<i64>,
        #[serde(default)]
        pub token_transfer: Option<RawTokenTransfer>,
        #[serde(default)]
        pub contract_call: Option<RawContractCall>,
        #[serde(default)]
        pub smart_contract: Option<RawSmartContract>,
        #[serde(default)]
        pub events: Vec<Event>,
    }

    pub(crate) fn map_kind(tx_type: &str) -> TxKind {
        match tx_type {
            "token_transfer" => TxKind::TokenTransfer,
            "contract_call" => TxKind::ContractCall,
            "smart_contract" | "versioned_smart_contract" => TxKind::ContractDeploy,
            "coinbase" => TxKind::Coinbase,
            "tenure_change" => TxKind::TenureChange,
            _ => TxKind::Other,
        }
    }

    /// `success` confirms, `abort_*`/`dropped_*` fail, anything else is still pending
    pub(crate) fn map_status(tx_status: &str) -> TxStatus {
        match tx_status {
            "success" => TxStatus::Confirmed,
            s if s.starts_with("abort") || s.starts_with("dropped") => TxStatus::Failed,
            _ => TxStatus::Pending,
        }
    }

    impl Transaction {
        /// Map to the canonical record, rejecting payloads whose type and body disagree
        pub fn into_canonical(
            self,
            chain: Chain,
            tip: Option<u64>,
        ) -> Result<CanonicalTransaction, String> {
            let kind = map_kind(&self.tx_type);
            let status = map_status(&self.tx_status);

            let token_transfer = match (kind, self.token_transfer) {
                (TxKind::TokenTransfer, None) => {
                    return Err(format!("{}: token_transfer body missing", self.tx_id))
                }
                (_, Some(raw)) => {
                    let amount = parse_amount(&raw.amount).ok_or_else(|| {
                        format!(
                            "{}: transfer amount {:?} is not an integer",
                            self.tx_id, raw.amount
                        )
                    })?;
                    Some(TokenTransfer {
                        asset_identifier: None,
                        recipient: raw.recipient_address,
                        amount,
                        memo: raw.memo.filter(|m| !m.is_empty()),
                    })
                }
                (_, None) => None,
            };

            let contract_call = match (kind, self.contract_call) {
                (TxKind::ContractCall, None) => {
                    return Err(format!("{}: contract_call body missing", self.tx_id))
                }
                (_, Some(raw)) => Some(ContractCall {
                    contract_id: raw.contract_id,
                    function_name: raw.function_name,
                    args: raw
                        .function_args
                        .into_iter()
                        .map(|arg| FunctionArg {
                            name: arg.name,
                            repr: arg.repr,
                            hex: arg.hex,
                            type_name: arg.type_name,
                        })
                        .collect(),
                }),
                (_, None) => None,
            };

            let recipient = token_transfer
                .as_ref()
                .map(|t| t.recipient.clone())
                .or_else(|| contract_call.as_ref().map(|c| c.contract_id.clone()))
                .or_else(|| self.smart_contract.map(|s| s.contract_id))
                .unwrap_or_default();
            let value = token_transfer.as_ref().map(|t| t.amount).unwrap_or(0);
            let block_height = self.block_height.filter(|_| status != TxStatus::Pending);

            Ok(CanonicalTransaction {
                id: self.tx_id,
                chain,
                status,
                kind,
                timestamp_ms: timestamp_ms(
                    self.block_time
                        .or(self.burn_block_time)
                        .or(self.receipt_time),
                ),
                block_height,
                sender: self.sender_address,
                recipient,
                value,
                fee: self
                    .fee_rate
                    .as_deref()
                    .and_then(parse_amount)
                    .unwrap_or(0),
                confirmations: confirmations(tip, block_height),
                inputs: Vec::new(),
                outputs: Vec::new(),
                contract_call,
                token_transfer,
                events: self.events.into_iter().map(Event::into_canonical).collect(),
            })
        }
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct StxBalance {
        pub balance: String,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Balances {
        pub stx: StxBalance,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(crate) struct FeePriorities {
        #[serde(default)]
        pub low_priority: f64,
        #[serde(default)]
        pub medium_priority: f64,
        #[serde(default)]
        pub high_priority: f64,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct MempoolFees {
        #[serde(default)]
        pub all: FeePriorities,
    }

    impl MempoolFees {
        pub fn recommendation(&self) -> FeeRecommendation {
            let micro = |v: f64| if v.is_finite() && v > 0.0 { v.ceil() as u64 } else { 0 };
            FeeRecommendation {
                fast: micro(self.all.high_priority),
                medium: micro(self.all.medium_priority),
                slow: micro(self.all.low_priority),
            }
            .normalized()
        }
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct MempoolStats {
        #[serde(default)]
        pub tx_type_counts: HashMap<String, u64>,
    }

    impl MempoolStats {
        pub fn total(&self) -> u64 {
            self.tx_type_counts
                .values()
                .fold(0u64, |total, count| total.saturating_add(*count))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::raw;
    use super::*;
    use crate::types::transaction::{TxKind, TxStatus};
    use serde_json::json;

    fn contract_call_json() -> serde_json::Value {
        json!({
            "tx_id": "0x5b5f4a1d3e4c2d0b8a9f7e6d5c4b3a29180706f5e4d3c2b1a09f8e7d6c5b4a39",
            "tx_type": "contract_call",
            "tx_status": "success",
            "fee_rate": "5000",
            "sender_address": "SP3K8BC0PPEVCV7NZ6QSRWPQ2JE9E5B6N3PA0KBR9",
            "block_height": 150,
            "block_time": 1_720_000_000,
            "contract_call": {
                "contract_id": "SM3VDXK3WZZSA84XXFKAFAF15NNZX32CTSG82JFQ4.sbtc-withdrawal",
                "function_name": "initiate-withdrawal-request",
                "function_args": [
                    {"hex": "0x0100000000000000000000000000002710", "repr": "u10000", "name": "amount", "type": "uint"}
                ]
            },
            "events": [
                {
                    "event_index": 0,
                    "event_type": "smart_contract_log",
                    "contract_log": {
                        "contract_id": "SM3VDXK3WZZSA84XXFKAFAF15NNZX32CTSG82JFQ4.sbtc-registry",
                        "topic": "print",
                        "value": {"hex": "0x0c", "repr": "(tuple (topic \"withdrawal-create\"))"}
                    }
                },
                {
                    "event_index": 1,
                    "event_type": "fungible_token_asset",
                    "asset": {
                        "asset_event_type": "burn",
                        "asset_id": "SM3VDXK3WZZSA84XXFKAFAF15NNZX32CTSG82JFQ4.sbtc-token::sbtc-token",
                        "sender": "SP3K8BC0PPEVCV7NZ6QSRWPQ2JE9E5B6N3PA0KBR9",
                        "amount": "10000"
                    }
                }
            ]
        })
    }

    #[test]
    fn test_contract_call_mapping() {
        let tx: raw::Transaction = serde_json::from_value(contract_call_json()).unwrap();
        let tx = tx.into_canonical(Chain::Stacks, Some(151)).unwrap();

        assert_eq!(tx.kind, TxKind::ContractCall);
        assert_eq!(tx.status, TxStatus::Confirmed);
        assert_eq!(tx.fee, 5_000);
        assert_eq!(tx.confirmations, 2);
        assert_eq!(tx.timestamp_ms, 1_720_000_000_000);
        assert!(tx.inputs.is_empty() && tx.outputs.is_empty());
        let call = tx.contract_call.as_ref().unwrap();
        assert_eq!(call.function_name, "initiate-withdrawal-request");
        assert_eq!(call.args[0].type_name, "uint");
        assert_eq!(tx.recipient, call.contract_id);
        assert_eq!(tx.events.len(), 2);
        assert_eq!(tx.events[0].payload, "(tuple (topic \"withdrawal-create\"))");
        assert_eq!(
            tx.events[1].asset_id.as_deref(),
            Some("SM3VDXK3WZZSA84XXFKAFAF15NNZX32CTSG82JFQ4.sbtc-token::sbtc-token")
        );
    }

    #[test]
    fn test_token_transfer_mapping() {
        let tx: raw::Transaction = serde_json::from_value(json!({
            "tx_id": "0xaa",
            "tx_type": "token_transfer",
            "tx_status": "pending",
            "fee_rate": "180",
            "sender_address": "SP1",
            "receipt_time": 1_720_000_000,
            "token_transfer": {"recipient_address": "SP2", "amount": "1000000", "memo": "0x00"}
        }))
        .unwrap();
        let tx = tx.into_canonical(Chain::Stacks, None).unwrap();
        assert_eq!(tx.kind, TxKind::TokenTransfer);
        assert_eq!(tx.status, TxStatus::Pending);
        assert_eq!(tx.value, 1_000_000);
        assert_eq!(tx.recipient, "SP2");
        assert_eq!(tx.confirmations, 0);
    }

    #[test]
    fn test_mismatched_body_is_malformed() {
        let tx: raw::Transaction = serde_json::from_value(json!({
            "tx_id": "0xaa",
            "tx_type": "contract_call",
            "tx_status": "success",
            "sender_address": "SP1"
        }))
        .unwrap();
        assert!(tx.into_canonical(Chain::Stacks, None).is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(raw::map_status("success"), TxStatus::Confirmed);
        assert_eq!(raw::map_status("pending"), TxStatus::Pending);
        assert_eq!(raw::map_status("abort_by_response"), TxStatus::Failed);
        assert_eq!(raw::map_status("abort_by_post_condition"), TxStatus::Failed);
        assert_eq!(raw::map_status("dropped_replace_by_fee"), TxStatus::Failed);
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(raw::map_kind("smart_contract"), TxKind::ContractDeploy);
        assert_eq!(raw::map_kind("tenure_change"), TxKind::TenureChange);
        assert_eq!(raw::map_kind("poison_microblock"), TxKind::Other);
    }

    #[test]
    fn test_mempool_fees_and_stats() {
        let fees: raw::MempoolFees = serde_json::from_value(json!({
            "all": {"no_priority": 180, "low_priority": 500.5, "medium_priority": 3000, "high_priority": 12000}
        }))
        .unwrap();
        let fees = fees.recommendation();
        assert_eq!((fees.fast, fees.medium, fees.slow), (12_000, 3_000, 501));

        let stats: raw::MempoolStats = serde_json::from_value(json!({
            "tx_type_counts": {"token_transfer": 10, "contract_call": 25, "smart_contract": 1}
        }))
        .unwrap();
        assert_eq!(stats.total(), 36);
    }

    #[test]
    fn test_mempool_count_saturates() {
        let stats: raw::MempoolStats = serde_json::from_value(json!({
            "tx_type_counts": {"token_transfer": u64::MAX, "contract_call": 1}
        }))
        .unwrap();
        assert_eq!(stats.total(), u64::MAX);
    }

    #[test]
    fn test_normalize_tx_id() {
        assert_eq!(normalize_tx_id("abc"), "0xabc");
        assert_eq!(normalize_tx_id("0xabc"), "0xabc");
    }
}
