// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the sbtcscan library.
//!
//! This module provides strongly-typed errors for all public APIs in sbtcscan.
//! It follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling (`AdapterError`,
//!   `ConfigError`, `ProviderError`)
//! - **Unified error type** (`SbtcscanError`) for convenience when you don't need
//!   to distinguish between error sources
//!
//! # Recovery policy
//!
//! - [`ProviderError`] - transport and malformed-payload failures. Recovered
//!   inside adapters (next provider, then synthesis) and only logged.
//! - [`AdapterError`] - invalid arguments. The only error an adapter returns.
//! - [`ConfigError`] - registry construction failures, surfaced at startup.
//!
//! Classification ambiguity is not an error: an unrecognized identifier is a
//! free-text query and an unmatched sBTC function is an `unknown` operation.
//!
//! # Examples
//!
//! ```rust,ignore
//! use sbtcscan::{Chain, Explorer, NetworkRegistry, SbtcscanError};
//! use std::sync::Arc;
//!
//! async fn example() -> Result<(), SbtcscanError> {
//!     let registry = Arc::new(NetworkRegistry::mainnet()?);
//!     let explorer = Explorer::new(registry)?;
//!     // Errors automatically convert to SbtcscanError via From implementations
//!     let outcome = explorer.search("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq", Chain::Bitcoin).await?;
//!     Ok(())
//! }
//! ```

mod adapter;
mod config;
mod provider;

pub use adapter::AdapterError;
pub use config::ConfigError;
pub use provider::ProviderError;

/// Unified error type for all sbtcscan operations.
///
/// All module-specific error types automatically convert to `SbtcscanError` via
/// `From` implementations, so you can use `?` to propagate errors naturally.
#[derive(Debug, thiserror::Error)]
pub enum SbtcscanError {
    /// Caller passed an invalid argument to an adapter operation.
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    /// Registry construction failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A chain was requested that the registry does not configure.
    #[error("Chain {0} is not configured")]
    ChainNotConfigured(crate::Chain),

    /// Low-level provider failure, only surfaced by direct transport users.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}
