// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Bitcoin adapter over the Esplora REST API
//!
//! mempool.space and blockstream.info expose identical Esplora path shapes, so
//! one adapter serves both; the registry decides the order they are attempted.

use async_trait::async_trait;
use tracing::Instrument;

use super::{
    check_limit, confirmations, require_identifier, timestamp_ms, ChainAdapter, KnownTip,
};
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

/// Esplora returns blocks in pages of this size
const ESPLORA_PAGE: usize = 10;

/// Adapter for the Bitcoin chain
#[derive(Debug, Clone)]
pub struct BitcoinAdapter {
    chain: Chain,
    providers: Vec<ProviderEndpoint>,
    client: JsonClient,
    synth: FallbackSynthesizer,
    known_tip: KnownTip,
}

impl BitcoinAdapter {
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
        let text = self.client.get_text(provider, "/blocks/tip/height").await?;
        let tip = text.parse::<u64>().map_err(|e| {
            ProviderError::malformed(&provider.name, format!("tip height {text:?}: {e}"))
        })?;
        self.known_tip.record(tip);
        Ok(tip)
    }

    async fn fetch_recent_blocks(
        &self,
        provider: &ProviderEndpoint,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CanonicalBlock>, ProviderError> {
        let tip = self.fetch_tip(provider).await?;
        let mut blocks = Vec::with_capacity(limit);
        let mut next = Some(tip.saturating_sub(offset as u64)).filter(|_| offset as u64 <= tip);

        while let Some(start) = next {
            if blocks.len() >= limit {
                break;
            }
            let page: Vec<raw::Block> = self
                .client
                .get_json(provider, &format!("/blocks/{start}"))
                .await?;
            if page.is_empty() {
                break;
            }
            next = page
                .last()
                .and_then(|b| b.height.checked_sub(1))
                .filter(|_| page.len() >= ESPLORA_PAGE);
            blocks.extend(
                page.into_iter()
                    .take(limit - blocks.len())
                    .map(|b| b.into_canonical(Some(tip))),
            );
        }

        Ok(blocks)
    }

    async fn fetch_block(
        &self,
        provider: &ProviderEndpoint,
        reference: &BlockRef,
    ) -> Result<CanonicalBlock, ProviderError> {
        let hash = match reference {
            BlockRef::Hash(hash) => hash.clone(),
            BlockRef::Height(height) => {
                self.client
                    .get_text(provider, &format!("/block-height/{height}"))
                    .await?
            }
        };
        let block: raw::Block = self.client.get_json(provider, &format!("/block/{hash}")).await?;
        let tip = self.fetch_tip(provider).await.ok();
        Ok(block.into_canonical(tip))
    }

    async fn fetch_transaction(
        &self,
        provider: &ProviderEndpoint,
        id: &str,
    ) -> Result<CanonicalTransaction, ProviderError> {
        let tx: raw::Transaction = self.client.get_json(provider, &format!("/tx/{id}")).await?;
        let tip = if tx.status.confirmed {
            self.fetch_tip(provider).await.ok()
        } else {
            None
        };
        Ok(tx.into_canonical(self.chain, tip))
    }

    async fn fetch_recent_transactions(
        &self,
        provider: &ProviderEndpoint,
        limit: usize,
    ) -> Result<Vec<CanonicalTransaction>, ProviderError> {
        let recent: Vec<raw::MempoolRecent> =
            self.client.get_json(provider, "/mempool/recent").await?;
        Ok(recent
            .into_iter()
            .take(limit)
            .map(|entry| entry.into_canonical(self.chain))
            .collect())
    }

    async fn fetch_address(
        &self,
        provider: &ProviderEndpoint,
        address: &str,
    ) -> Result<CanonicalAddress, ProviderError> {
        let raw: raw::Address = self
            .client
            .get_json(provider, &format!("/address/{address}"))
            .await?;
        Ok(raw.into_canonical(self.chain))
    }

    async fn fetch_stats(
        &self,
        provider: &ProviderEndpoint,
    ) -> Result<NetworkStats, ProviderError> {
        let (tip, mempool, fees) = tokio::try_join!(
            self.fetch_tip(provider),
            self.client.get_json::<raw::Mempool>(provider, "/mempool"),
            self.client.get_json::<raw::FeeEstimates>(provider, "/fee-estimates"),
        )?;
        Ok(NetworkStats {
            chain: self.chain,
            tip_height: tip,
            mempool_tx_count: mempool.count,
            fees: fees.recommendation(),
        })
    }
}

#[async_trait]
impl ChainAdapter for BitcoinAdapter {
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
        let id = require_identifier(id, "transaction")?;
        async {
            let result =
                first_success("transaction", &self.providers, |p| self.fetch_transaction(p, id))
                    .await;
            Ok(live_or_synthetic(self.chain, "transaction", result, || {
                let _span = spans::synthesize(self.chain, "transaction").entered();
                self.synth.transaction(id)
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

/// Esplora response payloads
pub(crate) mod raw {
    use std::collections::HashMap;

    use serde::Deserialize;

    use super::{confirmations, timestamp_ms};
    use crate::types::address::{CanonicalAddress, FeeRecommendation};
    use crate::types::block::CanonicalBlock;
    use crate::types::chain::Chain;
    use crate::types::transaction::{
        CanonicalTransaction, TxInput, TxKind, TxOutput, TxStatus,
    };

    #[derive(Debug, Deserialize)]
    pub(crate) struct Block {
        pub id: String,
        pub height: u64,
        #[serde(default)]
        pub timestamp: Option<i64>,
        #[serde(default)]
        pub tx_count: Option<u64>,
        #[serde(default)]
        pub size: Option<u64>,
        #[serde(default)]
        pub previousblockhash: Option<String>,
        #[serde(default)]
        pub merkle_root: Option<String>,
        #[serde(default)]
        pub nonce: Option<u64>,
        #[serde(default)]
        pub bits: Option<u64>,
    }

    impl Block {
        /// Missing counts and sizes default to 0, missing timestamp to now
        pub fn into_canonical(self, tip: Option<u64>) -> CanonicalBlock {
            CanonicalBlock {
                confirmations: confirmations(tip, Some(self.height)),
                hash: self.id,
                height: self.height,
                timestamp_ms: timestamp_ms(self.timestamp),
                tx_count: self.tx_count.unwrap_or(0),
                size_bytes: self.size.unwrap_or(0),
                prev_hash: self.previousblockhash.unwrap_or_default(),
                merkle_root: self.merkle_root.unwrap_or_default(),
                nonce: self.nonce.unwrap_or(0),
                bits: self.bits.unwrap_or(0),
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Prevout {
        #[serde(default)]
        pub scriptpubkey_address: Option<String>,
        #[serde(default)]
        pub value: u64,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Vin {
        #[serde(default)]
        pub txid: Option<String>,
        #[serde(default)]
        pub vout: Option<u32>,
        #[serde(default)]
        pub prevout: Option<Prevout>,
        #[serde(default)]
        pub is_coinbase: bool,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Vout {
        #[serde(default)]
        pub scriptpubkey_address: Option<String>,
        #[serde(default)]
        pub scriptpubkey_type: Option<String>,
        #[serde(default)]
        pub value: u64,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Status {
        pub confirmed: bool,
        #[serde(default)]
        pub block_height: Option<u64>,
        #[serde(default)]
        pub block_time: Option<i64>,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Transaction {
        pub txid: String,
        #[serde(default)]
        pub vin: Vec<Vin>,
        #[serde(default)]
        pub vout: Vec<Vout>,
        #[serde(default)]
        pub fee: Option<u64>,
        pub status: Status,
    }

    impl Transaction {
        pub fn into_canonical(self, chain: Chain, tip: Option<u64>) -> CanonicalTransaction {
            let coinbase = self.vin.iter().any(|vin| vin.is_coinbase);
            let inputs: Vec<TxInput> = self
                .vin
                .into_iter()
                .map(|vin| {
                    let (address, value) = match (vin.is_coinbase, vin.prevout) {
                        (true, _) => ("coinbase".to_string(), 0),
                        (false, Some(prevout)) => (
                            prevout.scriptpubkey_address.unwrap_or_default(),
                            prevout.value,
                        ),
                        (false, None) => (String::new(), 0),
                    };
                    TxInput {
                        address,
                        value,
                        prev_txid: vin.txid.filter(|_| !vin.is_coinbase),
                        vout: vin.vout,
                    }
                })
                .collect();
            let outputs: Vec<TxOutput> = self
                .vout
                .into_iter()
                .map(|vout| TxOutput {
                    address: vout
                        .scriptpubkey_address
                        .or_else(|| vout.scriptpubkey_type.clone())
                        .unwrap_or_default(),
                    value: vout.value,
                    script_type: vout.scriptpubkey_type,
                })
                .collect();

            let sender = inputs
                .first()
                .map(|i| i.address.clone())
                .unwrap_or_default();
            let recipient = outputs
                .iter()
                .find(|o| o.address != sender && !o.address.is_empty())
                .or_else(|| outputs.first())
                .map(|o| o.address.clone())
                .unwrap_or_default();
            let value = outputs
                .iter()
                .fold(0u64, |acc, o| acc.saturating_add(o.value));

            let (status, block_height) = if self.status.confirmed {
                (TxStatus::Confirmed, self.status.block_height)
            } else {
                (TxStatus::Pending, None)
            };

            CanonicalTransaction {
                id: self.txid,
                chain,
                status,
                kind: if coinbase {
                    TxKind::Coinbase
                } else {
                    TxKind::Transfer
                },
                timestamp_ms: timestamp_ms(self.status.block_time),
                block_height,
                sender,
                recipient,
                value,
                fee: self.fee.unwrap_or(0),
                confirmations: confirmations(tip, block_height),
                inputs,
                outputs,
                contract_call: None,
                token_transfer: None,
                events: Vec::new(),
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct MempoolRecent {
        pub txid: String,
        #[serde(default)]
        pub fee: u64,
        #[serde(default)]
        pub value: u64,
    }

    impl MempoolRecent {
        pub fn into_canonical(self, chain: Chain) -> CanonicalTransaction {
            CanonicalTransaction {
                id: self.txid,
                chain,
                status: TxStatus::Pending,
                kind: TxKind::Transfer,
                timestamp_ms: timestamp_ms(None),
                block_height: None,
                sender: String::new(),
                recipient: String::new(),
                value: self.value,
                fee: self.fee,
                confirmations: 0,
                inputs: Vec::new(),
                outputs: Vec::new(),
                contract_call: None,
                token_transfer: None,
                events: Vec::new(),
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    pub(crate) struct TxoStats {
        #[serde(default)]
        pub funded_txo_sum: u64,
        #[serde(default)]
        pub spent_txo_sum: u64,
        #[serde(default)]
        pub tx_count: u64,
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Address {
        pub address: String,
        #[serde(default)]
        pub chain_stats: TxoStats,
        #[serde(default)]
        pub mempool_stats: TxoStats,
    }

    impl Address {
        pub fn into_canonical(self, chain: Chain) -> CanonicalAddress {
            let pending = self.mempool_stats.funded_txo_sum as i128
                - self.mempool_stats.spent_txo_sum as i128;
            CanonicalAddress {
                address: self.address,
                chain,
                balance: self
                    .chain_stats
                    .funded_txo_sum
                    .saturating_sub(self.chain_stats.spent_txo_sum),
                unconfirmed_balance: pending.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
                tx_count: self
                    .chain_stats
                    .tx_count
                    .saturating_add(self.mempool_stats.tx_count),
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub(crate) struct Mempool {
        pub count: u64,
    }

    /// Confirmation target (blocks) to sat/vB
    #[derive(Debug, Deserialize)]
    #[serde(transparent)]
    pub(crate) struct FeeEstimates(pub HashMap<String, f64>);

    impl FeeEstimates {
        /// Next block, ~1 hour and ~1 day targets
        pub fn recommendation(&self) -> FeeRecommendation {
            let rate = |target: &str| {
                self.0
                    .get(target)
                    .filter(|v| v.is_finite() && **v > 0.0)
                    .map(|v| v.ceil() as u64)
                    .unwrap_or(1)
            };
            FeeRecommendation {
                fast: rate("1"),
                medium: rate("6"),
                slow: rate("144"),
            }
            .normalized()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::raw;
    use crate::types::chain::Chain;
    use crate::types::transaction::{TxKind, TxStatus};

    #[test]
    fn test_block_defaults() {
        let block: raw::Block =
            serde_json::from_value(serde_json::json!({"id": "00ab", "height": 5})).unwrap();
        let block = block.into_canonical(Some(9));
        assert_eq!(block.tx_count, 0);
        assert_eq!(block.size_bytes, 0);
        assert_eq!(block.nonce, 0);
        assert_eq!(block.confirmations, 5);
        assert!(block.timestamp_ms > 0);
    }

    #[test]
    fn test_transaction_mapping() {
        let tx: raw::Transaction = serde_json::from_value(serde_json::json!({
            "txid": "aa",
            "vin": [{
                "txid": "bb",
                "vout": 1,
                "is_coinbase": false,
                "prevout": {"scriptpubkey_address": "bc1qsender", "value": 10_000}
            }],
            "vout": [
                {"scriptpubkey_address": "bc1qrecipient", "scriptpubkey_type": "v0_p2wpkh", "value": 7_000},
                {"scriptpubkey_address": "bc1qsender", "scriptpubkey_type": "v0_p2wpkh", "value": 2_500}
            ],
            "fee": 500,
            "status": {"confirmed": true, "block_height": 100, "block_time": 1_700_000_000}
        }))
        .unwrap();
        let tx = tx.into_canonical(Chain::Bitcoin, Some(101));

        assert_eq!(tx.status, TxStatus::Confirmed);
        assert_eq!(tx.kind, TxKind::Transfer);
        assert_eq!(tx.sender, "bc1qsender");
        assert_eq!(tx.recipient, "bc1qrecipient");
        assert_eq!(tx.value, 9_500);
        assert_eq!(tx.fee, 500);
        assert_eq!(tx.confirmations, 2);
        assert_eq!(tx.timestamp_ms, 1_700_000_000_000);
        assert_eq!(tx.total_input(), tx.total_output() + tx.fee);
    }

    #[test]
    fn test_coinbase_and_pending() {
        let tx: raw::Transaction = serde_json::from_value(serde_json::json!({
            "txid": "cc",
            "vin": [{"is_coinbase": true, "txid": "0000"}],
            "vout": [{"scriptpubkey_type": "op_return", "value": 0}],
            "status": {"confirmed": false}
        }))
        .unwrap();
        let tx = tx.into_canonical(Chain::Bitcoin, None);
        assert_eq!(tx.kind, TxKind::Coinbase);
        assert_eq!(tx.status, TxStatus::Pending);
        assert_eq!(tx.block_height, None);
        assert_eq!(tx.confirmations, 0);
        assert_eq!(tx.fee, 0);
        assert_eq!(tx.inputs[0].prev_txid, None);
        assert_eq!(tx.outputs[0].address, "op_return");
    }

    #[test]
    fn test_address_pending_spend_is_negative() {
        let address: raw::Address = serde_json::from_value(serde_json::json!({
            "address": "bc1qx",
            "chain_stats": {"funded_txo_sum": 5_000, "spent_txo_sum": 1_000, "tx_count": 3},
            "mempool_stats": {"funded_txo_sum": 0, "spent_txo_sum": 2_000, "tx_count": 1}
        }))
        .unwrap();
        let address = address.into_canonical(Chain::Bitcoin);
        assert_eq!(address.balance, 4_000);
        assert_eq!(address.unconfirmed_balance, -2_000);
        assert_eq!(address.tx_count, 4);
    }

    #[test]
    fn test_address_tx_count_saturates() {
        let address: raw::Address = serde_json::from_value(serde_json::json!({
            "address": "bc1qx",
            "chain_stats": {"tx_count": u64::MAX},
            "mempool_stats": {"tx_count": 1}
        }))
        .unwrap();
        assert_eq!(address.into_canonical(Chain::Bitcoin).tx_count, u64::MAX);
    }

    #[test]
    fn test_fee_estimates() {
        let fees: raw::FeeEstimates =
            serde_json::from_value(serde_json::json!({"1": 25.3, "6": 12.0, "144": 1.1})).unwrap();
        let fees = fees.recommendation();
        assert_eq!((fees.fast, fees.medium, fees.slow), (26, 12, 2));
    }
}
