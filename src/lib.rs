// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # sbtcscan
//!
//! Normalization and sBTC-operation classification engine for a multi-chain
//! explorer covering Bitcoin, Stacks and the BIP300 sidechains (Thunder, zSide,
//! BitNames).
//!
//! - [`classify`] decides whether free text is a transaction id, an address or
//!   a plain query, and for which chain.
//! - [`ChainAdapter`] implementations fetch from ordered provider lists, map
//!   payloads into canonical records, and fall back to synthesized records
//!   tagged [`Sourced::Synthetic`] when every provider fails.
//! - [`SbtcClassifier`] reads sBTC deposits, withdrawals and transfers out of
//!   Stacks transactions; [`FeeAnalyzer`] and [`insights::generate`] describe them.
//! - [`Explorer`] ties it together over one immutable [`NetworkRegistry`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sbtcscan::{Chain, Explorer, NetworkRegistry};
//!
//! let explorer = Explorer::new(Arc::new(NetworkRegistry::from_env()?))?;
//! let overview = explorer.overview(Chain::Stacks, 10).await?;
//! println!("tip: {}", overview.stats.as_inner().tip_height);
//! ```

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod errors;
mod explorer;
pub mod fallback;
mod fees;
mod identifier;
pub mod insights;
mod sbtc;
mod tracing;
pub mod transport;
mod types;

pub use adapters::ChainAdapter;
pub use config::{NetworkDescriptor, NetworkRegistry, NetworkRegistryBuilder};
pub use errors::{AdapterError, ConfigError, ProviderError, SbtcscanError};
pub use explorer::{ChainOverview, Explorer, SearchOutcome};
pub use fees::{FeeAnalyzer, HIGH_FEE_OPTIMIZATION};
pub use identifier::{classify, AddressKind, Identifier};
pub use sbtc::{decode_memo, operation_type, SbtcClassifier, OPERATION_TABLE};
pub use types::address::{CanonicalAddress, FeeRecommendation, NetworkStats};
pub use types::amount::{format_minor_units, format_with_symbol, Decimals};
pub use types::block::{BlockRef, CanonicalBlock};
pub use types::chain::{Chain, ChainFamily, Network, UnknownNameError};
pub use types::fees::{CostTier, FeeTierThresholds, GasCostAnalysis};
pub use types::sbtc::{OperationType, SbtcOperation, SbtcStatus};
pub use types::sourced::Sourced;
pub use types::transaction::{
    CanonicalTransaction, ContractCall, FunctionArg, TokenTransfer, TxEvent, TxInput, TxKind,
    TxOutput, TxStatus,
};
