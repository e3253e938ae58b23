// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain adapters: fetch chain data and map it to canonical records
//!
//! Each chain family has its own adapter wrapping an ordered provider list.
//! The adapters share one contract, [`ChainAdapter`]:
//!
//! - the only error an operation returns is [`AdapterError::InvalidArgument`]
//! - transport failures and malformed payloads move on to the next provider
//! - when every provider fails, the result is a synthesized record tagged
//!   [`Sourced::Synthetic`]
//!
//! Raw provider payloads are deserialized into explicit per-endpoint structs
//! (see each adapter's `raw` module) and mapped to canonical records by total
//! functions with documented defaults. Amounts stay in minor units.
//!
//! # Adapters
//!
//! - [`BitcoinAdapter`]: Esplora API (mempool.space, then blockstream.info)
//! - [`StacksAdapter`]: Hiro API
//! - [`SidechainAdapter`]: BIP300 sidechain node REST API (Thunder, zSide, BitNames)
//!
//! # Example
//!
//! ```rust,ignore
//! use sbtcscan::adapters::{build_adapter, ChainAdapter};
//! use sbtcscan::{Chain, NetworkRegistry};
//!
//! let registry = NetworkRegistry::mainnet()?;
//! let bitcoin = build_adapter(&registry, Chain::Bitcoin)?;
//! let blocks = bitcoin.recent_blocks(10, 0).await?;
//! if blocks.is_synthetic() {
//!     eprintln!("providers unreachable, showing placeholders");
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::config::constants::MAX_PAGE_LIMIT;
use crate::config::NetworkRegistry;
use crate::errors::{AdapterError, SbtcscanError};
use crate::transport::JsonClient;
use crate::types::address::{CanonicalAddress, NetworkStats};
use crate::types::block::{BlockRef, CanonicalBlock};
use crate::types::chain::{Chain, ChainFamily};
use crate::types::sourced::Sourced;
use crate::types::transaction::CanonicalTransaction;

mod bitcoin;
mod sidechain;
mod stacks;

pub use bitcoin::BitcoinAdapter;
pub use sidechain::SidechainAdapter;
pub use stacks::StacksAdapter;

/// Uniform read-only access to one chain
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// Chain served by this adapter
    fn chain(&self) -> Chain;

    /// Most recent blocks, newest first
    ///
    /// `limit` may not exceed 100. `offset` skips that many blocks below the tip.
    async fn recent_blocks(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Sourced<Vec<CanonicalBlock>>, AdapterError>;

    /// One block by height or hash
    async fn block(&self, reference: BlockRef) -> Result<Sourced<CanonicalBlock>, AdapterError>;

    /// One transaction by id
    async fn transaction(&self, id: &str) -> Result<Sourced<CanonicalTransaction>, AdapterError>;

    /// Most recent transactions, newest first (mempool where the chain has one)
    async fn recent_transactions(
        &self,
        limit: usize,
    ) -> Result<Sourced<Vec<CanonicalTransaction>>, AdapterError>;

    /// Balance summary for one address
    async fn address(&self, address: &str) -> Result<Sourced<CanonicalAddress>, AdapterError>;

    /// Tip height, mempool size and fee recommendations
    async fn stats(&self) -> Result<Sourced<NetworkStats>, AdapterError>;
}

/// Build the adapter for `chain` from the registry
pub fn build_adapter(
    registry: &NetworkRegistry,
    chain: Chain,
) -> Result<Arc<dyn ChainAdapter>, SbtcscanError> {
    let descriptor = registry
        .descriptor(chain)
        .ok_or(SbtcscanError::ChainNotConfigured(chain))?;
    let client = JsonClient::new(registry.http())?;
    let network = registry.network();

    let adapter: Arc<dyn ChainAdapter> = match chain.family() {
        ChainFamily::Bitcoin => Arc::new(BitcoinAdapter::new(descriptor, network, client)),
        ChainFamily::Stacks => Arc::new(StacksAdapter::new(descriptor, network, client)),
        ChainFamily::Sidechain => Arc::new(SidechainAdapter::new(descriptor, network, client)),
    };
    Ok(adapter)
}

/// Reject page sizes above the cap
pub(crate) fn check_limit(limit: usize) -> Result<(), AdapterError> {
    if limit > MAX_PAGE_LIMIT {
        return Err(AdapterError::invalid_argument(format!(
            "limit {limit} exceeds maximum of {MAX_PAGE_LIMIT}"
        )));
    }
    Ok(())
}

/// Trim an identifier and reject it if empty
pub(crate) fn require_identifier<'a>(value: &'a str, what: &str) -> Result<&'a str, AdapterError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AdapterError::empty_identifier(what));
    }
    Ok(value)
}

/// Unix seconds to milliseconds, defaulting to the fetch time
pub(crate) fn timestamp_ms(secs: Option<i64>) -> i64 {
    match secs {
        Some(secs) => secs.saturating_mul(1_000),
        None => Utc::now().timestamp_millis(),
    }
}

/// Confirmations for a record at `height` given the current tip
pub(crate) fn confirmations(tip: Option<u64>, height: Option<u64>) -> u64 {
    match (tip, height) {
        (Some(tip), Some(height)) if tip >= height => tip - height + 1,
        (_, Some(_)) => 1,
        _ => 0,
    }
}

/// Last tip height a provider reported to an adapter
///
/// Synthesized blocks continue from here instead of the seed height.
#[derive(Debug, Clone, Default)]
pub(crate) struct KnownTip(Arc<AtomicU64>);

impl KnownTip {
    // Stored as height + 1; zero means no tip has been observed
    pub fn record(&self, height: u64) {
        self.0.store(height.saturating_add(1), Ordering::Relaxed);
    }

    pub fn get(&self) -> Option<u64> {
        self.0.load(Ordering::Relaxed).checked_sub(1)
    }
}
