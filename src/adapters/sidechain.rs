//! BIP300 sidechain adapter (Thunder, zSide, BitNames)
//!
//! One instance per sidechain, each pointing at that sidechain node's REST API.
//! Sidechains are UTXO chains; two-way peg deposits and withdrawals are tagged
//! by the node and map to [`TxKind::Deposit`] and [`TxKind::Withdrawal`].

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
use crate::types::transaction::{CanonicalTransaction, TxKind};

/// Adapter for one BIP300 sidechain
#[derive(Debug, Clone)]
pub struct SidechainAdapter {
    chain: Chain,
    providers: Vec<ProviderEndpoint>,
    client: JsonClient,
    synth: FallbackSynthesizer,
    known_tip: KnownTip,
}

impl SidechainAdapter {
    pub fn new(descriptor: &NetworkDescriptor, network: Network, client: JsonClient) -> Self {
        Self {
            chain: descriptor.chain,
            providers: descriptor.providers.clone(),
            client,
            synth: FallbackSynthesizer::new(descriptor, network),
            known_tip: KnownTip::default(),
        }
    }

    async fn fetch_status(
        &self,
        provider: &ProviderEndpoint,
    ) -> Result<raw::Status, ProviderError> {
        let status: raw::Status = self.client.get_json(provider, "/status").await?;
        self.known_tip.record(status.height);
        Ok(status)
    }

    async fn fetch_recent_blocks(
        &self,
        provider: &ProviderEndpoint,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CanonicalBlock>, ProviderError> {
        let path = format!("/blocks?limit={limit}&offset={offset}");
        // Both requests run to completion so a good status still records the tip
        let (status, blocks) = tokio::join!(
            self.fetch_status(provider),
            self.client.get_json::<Vec<raw::Block>>(provider, &path),
        );
        let (status, blocks) = (status?, blocks?);
        Ok(blocks
            .into_iter()
            .take(limit)
            .map(|b| b.into_canonical(Some(status.height)))
            .collect())
    }

    async fn fetch_block(
        &self,
        provider: &ProviderEndpoint,
        reference: &BlockRef,
    ) -> Result<CanonicalBlock, ProviderError> {
        let path = match reference {
            BlockRef::Height(height) => format!("/block/{height}"),
            BlockRef::Hash(hash) => format!("/block/hash/{hash}"),
        };
        let block: raw::Block = self.client.get_json(provider, &path).await?;
        let tip = self.fetch_status(provider).await.ok().map(|s| s.height);
        Ok(block.into_canonical(tip))
    }

    async fn fetch_transaction(
        &self,
        provider: &ProviderEndpoint,
        id: &str,
    ) -> Result<CanonicalTransaction, ProviderError> {
        let tx: raw::Transaction = self.client.get_json(provider, &format!("/tx/{id}")).await?;
        let tip = match tx.block_height {
            Some(_) => self.fetch_status(provider).await.ok().map(|s| s.height),
            None => None,
        };
        Ok(tx.into_canonical(self.chain, tip))
    }

    async fn fetch_recent_transactions(
        &self,
        provider: &ProviderEndpoint,
        limit: usize,
    ) -> Result<Vec<CanonicalTransaction>, ProviderError> {
        let path = format!("/txs/recent?limit={limit}");
        let (status, txs) = tokio::try_join!(
            self.fetch_status(provider),
            self.client.get_json::<Vec<raw::Transaction>>(provider, &path),
        )?;
        Ok(txs
            .into_iter()
            .take(limit)
            .map(|tx| tx.into_canonical(self.chain, Some(status.height)))
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
        let (status, fees) = tokio::try_join!(
            self.fetch_status(provider),
            self.client.get_json::<raw::Fees>(provider, "/fees"),
        )?;
        Ok(NetworkStats {
            chain: self.chain,
            tip_height: status.height,
            mempool_tx_count: status.mempool_size.unwrap_or(0),
            fees: fees.recommendation(),
        })
    }
}

#[async_trait]
impl ChainAdapter for SidechainAdapter {
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

/// Map the node's peg tag to a transaction kind
fn map_kind(kind: Option<&str>) -> TxKind {
    match kind {
        Some("deposit") => TxKind::Deposit,
        Some("withdrawal") => TxKind::Withdrawal,
        Some("coinbase") => TxKind::Coinbase,
        Some("transfer") | None => TxKind::Transfer,
        Some(_) => TxKind::Other,
    }
}

mod raw {
    use serde::Deserialize;

    use super::super::{confirmations, timestamp_ms};
    use super::map_kind;
    use crate::types::address::{CanonicalAddress, FeeRecommendation};
    use crate::types::block::CanonicalBlock;
    use crate::types::chain::Chain;
    use crate::types::transaction::{CanonicalTransaction, TxInput, TxOutput, TxStatus};

    #[derive(Debug, Deserialize)]
    pub(super) struct Status {
        pub height: u64,
        #[serde(default)]
        pub mempool_size: Option<u64>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Block {
        pub hash: String,
        pub height: u64,
        #[serde(default)]
        pub time: Option<i64>,
        #[serde(default)]
        pub tx_count: Option<u64>,
        #[serde(default)]
        pub size: Option<u64>,
        #[serde(default)]
        pub prev_hash: Option<String>,
        #[serde(default)]
        pub merkle_root: Option<String>,
    }

    impl Block {
        pub fn into_canonical(self, tip: Option<u64>) -> CanonicalBlock {
            CanonicalBlock {
                confirmations: confirmations(tip, Some(self.height)),
                hash: self.hash,
                height: self.height,
                timestamp_ms: timestamp_ms(self.time),
                tx_count: self.tx_count.unwrap_or(0),
                size_bytes: self.size.unwrap_or(0),
                prev_hash: self.prev_hash.unwrap_or_default(),
                merkle_root: self.merkle_root.unwrap_or_default(),
                nonce: 0,
                bits: 0,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Input {
        #[serde(default)]
        pub address: String,
        #[serde(default)]
        pub value: u64,
        #[serde(default)]
        pub prev_txid: Option<String>,
        #[serde(default)]
        pub vout: Option<u32>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Output {
        #[serde(default)]
        pub address: String,
        #[serde(default)]
        pub value: u64,
        #[serde(default)]
        pub content: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Transaction {
        pub txid: String,
        #[serde(default)]
        pub kind: Option<String>,
        #[serde(default)]
        pub inputs: Vec<Input>,
        #[serde(default)]
        pub outputs: Vec<Output>,
        #[serde(default)]
        pub fee: Option<u64>,
        #[serde(default)]
        pub block_height: Option<u64>,
        #[serde(default)]
        pub time: Option<i64>,
    }

    impl Transaction {
        pub fn into_canonical(self, chain: Chain, tip: Option<u64>) -> CanonicalTransaction {
            let inputs: Vec<TxInput> = self
                .inputs
                .into_iter()
                .map(|i| TxInput {
                    address: i.address,
                    value: i.value,
                    prev_txid: i.prev_txid,
                    vout: i.vout,
                })
                .collect();
            let outputs: Vec<TxOutput> = self
                .outputs
                .into_iter()
                .map(|o| TxOutput {
                    address: o.address,
                    value: o.value,
                    script_type: o.content,
                })
                .collect();
            let sender = inputs
                .first()
                .map(|i| i.address.clone())
                .unwrap_or_default();
            let recipient = outputs
                .iter()
                .find(|o| o.address != sender)
                .or_else(|| outputs.first())
                .map(|o| o.address.clone())
                .unwrap_or_default();
            let value = outputs
                .iter()
                .fold(0u64, |acc, o| acc.saturating_add(o.value));
            let status = if self.block_height.is_some() {
                TxStatus::Confirmed
            } else {
                TxStatus::Pending
            };

            CanonicalTransaction {
                id: self.txid,
                chain,
                status,
                kind: map_kind(self.kind.as_deref()),
                timestamp_ms: timestamp_ms(self.time),
                block_height: self.block_height,
                sender,
                recipient,
                value,
                fee: self.fee.unwrap_or(0),
                confirmations: confirmations(tip, self.block_height),
                inputs,
                outputs,
                contract_call: None,
                token_transfer: None,
                events: Vec::new(),
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Address {
        pub address: String,
        #[serde(default)]
        pub balance: u64,
        #[serde(default)]
        pub unconfirmed_balance: i64,
        #[serde(default)]
        pub tx_count: u64,
    }

    impl Address {
        pub fn into_canonical(self, chain: Chain) -> CanonicalAddress {
            CanonicalAddress {
                address: self.address,
                chain,
                balance: self.balance,
                unconfirmed_balance: self.unconfirmed_balance,
                tx_count: self.tx_count,
            }
        }
    }

    /// sat/vB estimates
    #[derive(Debug, Deserialize)]
    pub(super) struct Fees {
        pub fast: f64,
        pub medium: f64,
        pub slow: f64,
    }

    impl Fees {
        pub fn recommendation(&self) -> FeeRecommendation {
            let rate = |v: f64| if v.is_finite() && v > 0.0 { v.ceil() as u64 } else { 1 };
            FeeRecommendation {
                fast: rate(self.fast),
                medium: rate(self.medium),
                slow: rate(self.slow),
            }
            .normalized()
        }
    }
}
