// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Explorer facade
//!
//! [`Explorer`] owns one adapter per configured chain and ties the pieces
//! together: identifier classification, adapter dispatch, sBTC classification
//! and insight generation.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sbtcscan::{Chain, Explorer, NetworkRegistry, SearchOutcome};
//!
//! let explorer = Explorer::new(Arc::new(NetworkRegistry::mainnet()?))?;
//! match explorer.search("SP3K8BC0PPEVCV7NZ6QSRWPQ2JE9E5B6N3PA0KBR9", Chain::Stacks).await? {
//!     SearchOutcome::Address { address, .. } => println!("{:?}", address.as_inner()),
//!     other => println!("{other:?}"),
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::Instrument;

use crate::adapters::{build_adapter, ChainAdapter};
use crate::config::NetworkRegistry;
use crate::errors::SbtcscanError;
use crate::fees::FeeAnalyzer;
use crate::identifier::{classify, AddressKind, Identifier};
use crate::insights;
use crate::sbtc::SbtcClassifier;
use crate::tracing::spans;
use crate::types::address::{CanonicalAddress, NetworkStats};
use crate::types::block::CanonicalBlock;
use crate::types::chain::{Chain, ChainFamily};
use crate::types::fees::GasCostAnalysis;
use crate::types::sbtc::SbtcOperation;
use crate::types::sourced::Sourced;
use crate::types::transaction::CanonicalTransaction;

/// Result of a free-text search
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchOutcome {
    /// A transaction, with its sBTC reading when it is a Stacks bridge operation
    Transaction {
        transaction: Sourced<CanonicalTransaction>,
        /// Fee tier and USD cost in the chain's native unit, absent for fee-less transactions
        #[serde(skip_serializing_if = "Option::is_none")]
        fee_analysis: Option<GasCostAnalysis>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sbtc: Option<SbtcOperation>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        insights: Vec<String>,
    },
    Address {
        address: Sourced<CanonicalAddress>,
        subtype: AddressKind,
    },
    /// Input matched no identifier pattern
    Query { query: String },
}

/// Recent activity for one chain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainOverview {
    pub chain: Chain,
    pub blocks: Sourced<Vec<CanonicalBlock>>,
    pub transactions: Sourced<Vec<CanonicalTransaction>>,
    pub stats: Sourced<NetworkStats>,
}

/// Multi-chain explorer over a shared registry
pub struct Explorer {
    registry: Arc<NetworkRegistry>,
    adapters: BTreeMap<Chain, Arc<dyn ChainAdapter>>,
    classifier: SbtcClassifier,
}

impl Explorer {
    /// Build one adapter per chain the registry configures
    pub fn new(registry: Arc<NetworkRegistry>) -> Result<Self, SbtcscanError> {
        let adapters = registry
            .chains()
            .map(|chain| build_adapter(&registry, chain).map(|adapter| (chain, adapter)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        let classifier = SbtcClassifier::new(&registry);

        tracing::debug!(
            network = %registry.network(),
            chains = adapters.len(),
            "Explorer initialized"
        );
        Ok(Self {
            registry,
            adapters,
            classifier,
        })
    }

    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    pub fn classifier(&self) -> &SbtcClassifier {
        &self.classifier
    }

    /// Adapter for `chain`, or [`SbtcscanError::ChainNotConfigured`]
    pub fn adapter(&self, chain: Chain) -> Result<&Arc<dyn ChainAdapter>, SbtcscanError> {
        self.adapters
            .get(&chain)
            .ok_or(SbtcscanError::ChainNotConfigured(chain))
    }

    /// Classify `query` in the `context` chain and fetch what it refers to
    pub async fn search(
        &self,
        query: &str,
        context: Chain,
    ) -> Result<SearchOutcome, SbtcscanError> {
        let query = query.trim();
        let identifier = classify(query, context);
        let span = spans::search(context, identifier.kind());
        self.dispatch(query, identifier).instrument(span).await
    }

    async fn dispatch(
        &self,
        query: &str,
        identifier: Identifier,
    ) -> Result<SearchOutcome, SbtcscanError> {
        match identifier {
            Identifier::Tx { chain } => {
                let transaction = self.adapter(chain)?.transaction(query).await?;
                let fee_analysis = self.fee_analysis(transaction.as_inner());
                let sbtc = match chain.family() {
                    ChainFamily::Stacks => self.classifier.classify(transaction.as_inner()),
                    _ => None,
                };
                let insights = sbtc.as_ref().map(insights::generate).unwrap_or_default();
                Ok(SearchOutcome::Transaction {
                    transaction,
                    fee_analysis,
                    sbtc,
                    insights,
                })
            }
            Identifier::Address { chain, subtype } => {
                let address = self.adapter(chain)?.address(query).await?;
                Ok(SearchOutcome::Address { address, subtype })
            }
            Identifier::Query => {
                tracing::debug!(query, "Input matched no identifier pattern");
                Ok(SearchOutcome::Query {
                    query: query.to_string(),
                })
            }
        }
    }

    /// Tier `tx.fee` against its chain's thresholds, priced at the chain's native USD rate
    pub fn fee_analysis(&self, tx: &CanonicalTransaction) -> Option<GasCostAnalysis> {
        if tx.fee == 0 {
            return None;
        }
        let descriptor = self.registry.descriptor(tx.chain)?;
        let price = self.registry.prices().native_usd(tx.chain);
        Some(FeeAnalyzer::new(descriptor.fee_tiers).analyze(
            u128::from(tx.fee),
            descriptor.decimals,
            price,
        ))
    }

    /// Recent blocks, recent transactions and stats for `chain`, fetched concurrently
    pub async fn overview(
        &self,
        chain: Chain,
        limit: usize,
    ) -> Result<ChainOverview, SbtcscanError> {
        let adapter = self.adapter(chain)?;

        let (blocks, transactions, stats) = async {
            tokio::join!(
                adapter.recent_blocks(limit, 0),
                adapter.recent_transactions(limit),
                adapter.stats(),
            )
        }
        .instrument(spans::overview(chain, limit))
        .await;

        Ok(ChainOverview {
            chain,
            blocks: blocks?,
            transactions: transactions?,
            stats: stats?,
        })
    }

    /// Stats for every configured chain, in chain order
    pub async fn network_stats(&self) -> Result<Vec<Sourced<NetworkStats>>, SbtcscanError> {
        let fetches = self.adapters.values().map(|adapter| adapter.stats());
        join_all(fetches)
            .await
            .into_iter()
            .map(|result| result.map_err(SbtcscanError::from))
            .collect()
    }
}

impl std::fmt::Debug for Explorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explorer")
            .field("network", &self.registry.network())
            .field("chains", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}
