// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Synthetic placeholder records for unreachable providers.
//!
//! When every provider for a chain fails, adapters return records produced
//! here, wrapped in [`crate::Sourced::Synthetic`]. The records have the same
//! shape and value ranges as live ones so downstream code never special-cases
//! failure:
//!
//! - hashes are 64 hex characters (Bitcoin-family block hashes carry the usual
//!   leading zeros, Stacks hashes the `0x` prefix Hiro uses)
//! - recent block lists have strictly decreasing heights and each block's
//!   `prev_hash` is the hash of the next block in the batch
//! - Bitcoin-family transactions balance: `Σinputs = Σoutputs + fee`
//! - addresses carry chain-appropriate prefixes (`bc1q`/`tb1q`, `SP`/`ST`,
//!   `s{slot}_…_{checksum}`)

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::NetworkDescriptor;
use crate::types::address::{CanonicalAddress, FeeRecommendation, NetworkStats};
use crate::types::block::{BlockRef, CanonicalBlock};
use crate::types::chain::{Chain, ChainFamily, Network};
use crate::types::transaction::{
    CanonicalTransaction, TokenTransfer, TxInput, TxKind, TxOutput, TxStatus,
};

const BECH32_CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const BASE58_CHARSET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const C32_CHARSET: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Produces synthetic records for one chain
#[derive(Debug, Clone)]
pub struct FallbackSynthesizer {
    chain: Chain,
    network: Network,
    seed_height: u64,
}

impl FallbackSynthesizer {
    pub fn new(descriptor: &NetworkDescriptor, network: Network) -> Self {
        Self {
            chain: descriptor.chain,
            network,
            seed_height: descriptor.seed_height,
        }
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// `limit` blocks below `tip` (or the seed height), skipping `offset`
    ///
    /// Heights strictly decrease and the list stops at genesis. An offset past
    /// genesis yields no blocks.
    pub fn recent_blocks(
        &self,
        tip: Option<u64>,
        limit: usize,
        offset: usize,
    ) -> Vec<CanonicalBlock> {
        let tip = tip.unwrap_or(self.seed_height);
        if offset as u64 > tip {
            return Vec::new();
        }
        let mut rng = rand::thread_rng();
        let start = tip.saturating_sub(offset as u64);
        let count = limit.min(start.saturating_add(1) as usize);
        let now_ms = Utc::now().timestamp_millis();
        let interval_ms = self.block_interval_ms();

        let hashes: Vec<String> = (0..=count).map(|_| self.block_hash(&mut rng)).collect();

        (0..count)
            .map(|i| {
                let depth = offset as u64 + i as u64;
                let height = start - i as u64;
                CanonicalBlock {
                    hash: hashes[i].clone(),
                    height,
                    timestamp_ms: now_ms - interval_ms * (depth as i64),
                    tx_count: self.tx_count(&mut rng),
                    size_bytes: self.block_size(&mut rng),
                    prev_hash: hashes[i + 1].clone(),
                    merkle_root: random_hex(&mut rng, 32),
                    nonce: self.nonce(&mut rng),
                    bits: self.bits(),
                    confirmations: depth + 1,
                }
            })
            .collect()
    }

    /// A single block matching `reference`
    pub fn block(&self, reference: &BlockRef) -> CanonicalBlock {
        let mut rng = rand::thread_rng();
        let (height, hash) = match reference {
            BlockRef::Height(height) => (*height, self.block_hash(&mut rng)),
            BlockRef::Hash(hash) => (
                self.seed_height.saturating_sub(rng.gen_range(0..100)),
                hash.clone(),
            ),
        };
        let confirmations = self.seed_height.saturating_sub(height) + 1;
        CanonicalBlock {
            hash,
            height,
            timestamp_ms: Utc::now().timestamp_millis()
                - self.block_interval_ms() * (confirmations as i64 - 1),
            tx_count: self.tx_count(&mut rng),
            size_bytes: self.block_size(&mut rng),
            prev_hash: self.block_hash(&mut rng),
            merkle_root: random_hex(&mut rng, 32),
            nonce: self.nonce(&mut rng),
            bits: self.bits(),
            confirmations,
        }
    }

    /// A transaction carrying the requested `id`
    pub fn transaction(&self, id: &str) -> CanonicalTransaction {
        let mut rng = rand::thread_rng();
        self.transaction_with(&mut rng, id.to_string())
    }

    /// `limit` recent transactions, newest first
    pub fn recent_transactions(&self, limit: usize) -> Vec<CanonicalTransaction> {
        let mut rng = rand::thread_rng();
        (0..limit)
            .map(|_| {
                let id = self.tx_id(&mut rng);
                self.transaction_with(&mut rng, id)
            })
            .collect()
    }

    /// Balance summary for `address`
    pub fn address(&self, address: &str) -> CanonicalAddress {
        let mut rng = rand::thread_rng();
        let (balance, swing) = match self.chain.family() {
            ChainFamily::Stacks => (rng.gen_range(0..50_000_000_000), 5_000_000),
            ChainFamily::Bitcoin | ChainFamily::Sidechain => {
                (rng.gen_range(0..500_000_000), 100_000)
            }
        };
        CanonicalAddress {
            address: address.to_string(),
            chain: self.chain,
            balance,
            unconfirmed_balance: if rng.gen_bool(0.2) {
                rng.gen_range(-swing..=swing)
            } else {
                0
            },
            tx_count: rng.gen_range(1..500),
        }
    }

    /// Tip, mempool size and fee recommendations
    pub fn stats(&self) -> NetworkStats {
        let mut rng = rand::thread_rng();
        let fees = match self.chain.family() {
            ChainFamily::Bitcoin => FeeRecommendation {
                fast: rng.gen_range(20..80),
                medium: rng.gen_range(8..20),
                slow: rng.gen_range(1..8),
            },
            ChainFamily::Stacks => FeeRecommendation {
                fast: rng.gen_range(5_000..20_000),
                medium: rng.gen_range(1_000..5_000),
                slow: rng.gen_range(180..1_000),
            },
            ChainFamily::Sidechain => FeeRecommendation {
                fast: rng.gen_range(3..10),
                medium: rng.gen_range(2..=3),
                slow: 1,
            },
        };
        NetworkStats {
            chain: self.chain,
            tip_height: self.seed_height,
            mempool_tx_count: match self.chain.family() {
                ChainFamily::Bitcoin => rng.gen_range(5_000..60_000),
                ChainFamily::Stacks => rng.gen_range(50..1_500),
                ChainFamily::Sidechain => rng.gen_range(0..50),
            },
            fees,
        }
    }

    /// A fresh address in this chain's format
    pub fn address_string(&self) -> String {
        let mut rng = rand::thread_rng();
        self.random_address(&mut rng)
    }

    fn transaction_with(&self, rng: &mut impl Rng, id: String) -> CanonicalTransaction {
        let block_height = self.seed_height.saturating_sub(rng.gen_range(0..6));
        let confirmations = self.seed_height - block_height + 1;
        let timestamp_ms =
            Utc::now().timestamp_millis() - self.block_interval_ms() * (confirmations as i64 - 1);

        match self.chain.family() {
            ChainFamily::Stacks => {
                let sender = self.random_address(rng);
                let recipient = self.random_address(rng);
                let amount = rng.gen_range(1_000..100_000_000);
                CanonicalTransaction {
                    id,
                    chain: self.chain,
                    status: TxStatus::Confirmed,
                    kind: TxKind::TokenTransfer,
                    timestamp_ms,
                    block_height: Some(block_height),
                    sender,
                    recipient: recipient.clone(),
                    value: amount,
                    fee: rng.gen_range(180..5_000),
                    confirmations,
                    inputs: Vec::new(),
                    outputs: Vec::new(),
                    contract_call: None,
                    token_transfer: Some(TokenTransfer {
                        asset_identifier: None,
                        recipient,
                        amount,
                        memo: None,
                    }),
                    events: Vec::new(),
                }
            }
            ChainFamily::Bitcoin | ChainFamily::Sidechain => {
                let outputs: Vec<TxOutput> = (0..rng.gen_range(1..=2))
                    .map(|_| TxOutput {
                        address: self.random_address(rng),
                        value: rng.gen_range(546..50_000_000),
                        script_type: Some(self.script_type().to_string()),
                    })
                    .collect();
                let fee: u64 = rng.gen_range(200..20_000);
                let total_out: u64 = outputs.iter().map(|o| o.value).sum();
                let inputs = split_inputs(rng, total_out + fee, self);

                CanonicalTransaction {
                    id,
                    chain: self.chain,
                    status: TxStatus::Confirmed,
                    kind: TxKind::Transfer,
                    timestamp_ms,
                    block_height: Some(block_height),
                    sender: inputs
                        .first()
                        .map(|i| i.address.clone())
                        .unwrap_or_default(),
                    recipient: outputs
                        .first()
                        .map(|o| o.address.clone())
                        .unwrap_or_default(),
                    value: total_out,
                    fee,
                    confirmations,
                    inputs,
                    outputs,
                    contract_call: None,
                    token_transfer: None,
                    events: Vec::new(),
                }
            }
        }
    }

    fn random_address(&self, rng: &mut impl Rng) -> String {
        match self.chain.family() {
            ChainFamily::Bitcoin => {
                let hrp = match self.network {
                    Network::Mainnet => "bc1q",
                    Network::Testnet => "tb1q",
                };
                format!("{hrp}{}", random_from(rng, BECH32_CHARSET, 38))
            }
            ChainFamily::Stacks => {
                let prefix = match self.network {
                    Network::Mainnet => "SP",
                    Network::Testnet => "ST",
                };
                format!("{prefix}{}", random_from(rng, C32_CHARSET, 33))
            }
            ChainFamily::Sidechain => {
                let slot = self.chain.sidechain_slot().unwrap_or_default();
                let body = random_from(rng, BASE58_CHARSET, 34);
                format!("s{slot}_{body}_{}", random_hex(rng, 3))
            }
        }
    }

    fn block_hash(&self, rng: &mut impl Rng) -> String {
        match self.chain.family() {
            ChainFamily::Stacks => format!("0x{}", random_hex(rng, 32)),
            ChainFamily::Bitcoin | ChainFamily::Sidechain => {
                format!("00000000{}", random_hex(rng, 28))
            }
        }
    }

    fn tx_id(&self, rng: &mut impl Rng) -> String {
        match self.chain.family() {
            ChainFamily::Stacks => format!("0x{}", random_hex(rng, 32)),
            ChainFamily::Bitcoin | ChainFamily::Sidechain => random_hex(rng, 32),
        }
    }

    fn block_interval_ms(&self) -> i64 {
        match self.chain.family() {
            ChainFamily::Stacks => 10_000,
            ChainFamily::Bitcoin | ChainFamily::Sidechain => 600_000,
        }
    }

    fn tx_count(&self, rng: &mut impl Rng) -> u64 {
        match self.chain.family() {
            ChainFamily::Bitcoin => rng.gen_range(1_000..4_500),
            ChainFamily::Stacks => rng.gen_range(1..60),
            ChainFamily::Sidechain => rng.gen_range(1..40),
        }
    }

    fn block_size(&self, rng: &mut impl Rng) -> u64 {
        match self.chain.family() {
            ChainFamily::Bitcoin => rng.gen_range(800_000..2_000_000),
            ChainFamily::Stacks => rng.gen_range(1_000..200_000),
            ChainFamily::Sidechain => rng.gen_range(250..50_000),
        }
    }

    fn nonce(&self, rng: &mut impl Rng) -> u64 {
        match self.chain.family() {
            ChainFamily::Stacks => 0,
            ChainFamily::Bitcoin | ChainFamily::Sidechain => rng.gen::<u32>() as u64,
        }
    }

    fn bits(&self) -> u64 {
        match self.chain.family() {
            ChainFamily::Bitcoin => 0x1703_1abe,
            ChainFamily::Stacks | ChainFamily::Sidechain => 0,
        }
    }

    fn script_type(&self) -> &'static str {
        match self.chain.family() {
            ChainFamily::Sidechain => "sidechain",
            ChainFamily::Bitcoin | ChainFamily::Stacks => "v0_p2wpkh",
        }
    }
}

/// Split `total` across one to three inputs that sum exactly to it
fn split_inputs(rng: &mut impl Rng, total: u64, synth: &FallbackSynthesizer) -> Vec<TxInput> {
    let parts = rng.gen_range(1..=3u64).min(total.max(1));
    let mut cuts: Vec<u64> = (1..parts).map(|_| rng.gen_range(1..total.max(2))).collect();
    cuts.push(0);
    cuts.push(total);
    cuts.sort_unstable();
    cuts.dedup();

    cuts.windows(2)
        .enumerate()
        .map(|(vout, window)| TxInput {
            address: synth.random_address(rng),
            value: window[1] - window[0],
            prev_txid: Some(random_hex(rng, 32)),
            vout: Some(vout as u32),
        })
        .collect()
}

fn random_hex(rng: &mut impl Rng, bytes: usize) -> String {
    let buf: Vec<u8> = (0..bytes).map(|_| rng.gen()).collect();
    hex::encode(buf)
}

fn random_from(rng: &mut impl Rng, charset: &[u8], len: usize) -> String {
    (0..len)
        .filter_map(|_| charset.choose(rng).map(|&b| b as char))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkRegistry;

    fn synth(chain: Chain) -> FallbackSynthesizer {
        let registry = NetworkRegistry::mainnet().unwrap();
        FallbackSynthesizer::new(registry.descriptor(chain).unwrap(), Network::Mainnet)
    }

    fn is_hex64(s: &str) -> bool {
        let s = s.strip_prefix("0x").unwrap_or(s);
        s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn test_recent_blocks_chain_together() {
        let blocks = synth(Chain::Bitcoin).recent_blocks(Some(1_000), 10, 0);
        assert_eq!(blocks.len(), 10);
        assert_eq!(blocks[0].height, 1_000);
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].height, pair[1].height + 1);
            assert_eq!(pair[0].prev_hash, pair[1].hash);
        }
        assert!(blocks.iter().all(|b| is_hex64(&b.hash) && b.hash.starts_with("00000000")));
    }

    #[test]
    fn test_recent_blocks_stop_at_genesis() {
        let blocks = synth(Chain::Thunder).recent_blocks(Some(3), 10, 1);
        let heights: Vec<u64> = blocks.iter().map(|b| b.height).collect();
        assert_eq!(heights, vec![2, 1, 0]);
    }

    #[test]
    fn test_recent_blocks_offset_past_genesis_is_empty() {
        let synth = synth(Chain::Bitcoin);
        assert!(synth.recent_blocks(Some(3), 10, 4).is_empty());
        assert_eq!(synth.recent_blocks(Some(3), 10, 3).len(), 1);
    }

    #[test]
    fn test_block_by_reference() {
        let s = synth(Chain::Stacks);
        let block = s.block(&BlockRef::Height(42));
        assert_eq!(block.height, 42);
        assert!(block.hash.starts_with("0x") && is_hex64(&block.hash));

        let hash = "ab".repeat(32);
        let block = s.block(&BlockRef::Hash(hash.clone()));
        assert_eq!(block.hash, hash);
    }

    #[test]
    fn test_bitcoin_transaction_balances() {
        let tx = synth(Chain::Bitcoin).transaction("deadbeef");
        assert_eq!(tx.id, "deadbeef");
        assert_eq!(tx.total_input(), tx.total_output() + tx.fee);
        assert_eq!(tx.value, tx.total_output());
        assert!(tx.sender.starts_with("bc1q"));
    }

    #[test]
    fn test_stacks_transaction_shape() {
        let tx = synth(Chain::Stacks).transaction("0xabc");
        assert!(tx.inputs.is_empty() && tx.outputs.is_empty());
        assert!(tx.sender.starts_with("SP"));
        assert_eq!(tx.sender.len(), 35);
        assert_eq!(tx.kind, TxKind::TokenTransfer);
    }

    #[test]
    fn test_sidechain_address_format() {
        let address = synth(Chain::ZSide).address_string();
        let parts: Vec<&str> = address.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "s13");
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn test_testnet_address_prefixes() {
        let registry = NetworkRegistry::testnet().unwrap();
        let bitcoin = FallbackSynthesizer::new(
            registry.descriptor(Chain::Bitcoin).unwrap(),
            Network::Testnet,
        );
        assert!(bitcoin.address_string().starts_with("tb1q"));
        let stacks =
            FallbackSynthesizer::new(registry.descriptor(Chain::Stacks).unwrap(), Network::Testnet);
        assert!(stacks.address_string().starts_with("ST"));
    }

    #[test]
    fn test_stats_fees_are_ordered() {
        for chain in Chain::ALL {
            let stats = synth(chain).stats();
            assert_eq!(stats.chain, chain);
            assert!(stats.fees.fast >= stats.fees.medium);
            assert!(stats.fees.medium >= stats.fees.slow);
        }
    }
}
