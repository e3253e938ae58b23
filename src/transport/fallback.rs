// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Ordered provider fallback.
//!
//! Adapters never nest provider retries by hand. They hand the ordered provider
//! list to [`first_success`], then pass the outcome to [`live_or_synthetic`],
//! which swaps in a synthesized record when every provider failed.

use std::future::Future;

use tracing::{debug, warn};

use crate::config::ProviderEndpoint;
use crate::errors::ProviderError;
use crate::types::chain::Chain;
use crate::types::sourced::Sourced;

/// Attempt `attempt` against each provider in order, returning the first success
///
/// Every failure is logged and the next provider is tried. If all fail, the
/// last error is returned. An empty provider list yields
/// [`ProviderError::NoProviders`].
pub async fn first_success<'a, T, F, Fut>(
    operation: &str,
    providers: &'a [ProviderEndpoint],
    mut attempt: F,
) -> Result<T, ProviderError>
where
    F: FnMut(&'a ProviderEndpoint) -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut last_error = None;

    for (index, provider) in providers.iter().enumerate() {
        match attempt(provider).await {
            Ok(value) => {
                if index > 0 {
                    debug!(
                        provider = %provider.name,
                        operation,
                        attempt = index + 1,
                        "Secondary provider succeeded"
                    );
                }
                return Ok(value);
            }
            Err(error) => {
                warn!(
                    provider = %provider.name,
                    operation,
                    attempt = index + 1,
                    remaining = providers.len() - index - 1,
                    error = %error,
                    "Provider attempt failed"
                );
                last_error = Some(error);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ProviderError::no_providers(operation)))
}

/// Tag a provider outcome, synthesizing a substitute on failure
pub fn live_or_synthetic<T>(
    chain: Chain,
    operation: &str,
    result: Result<T, ProviderError>,
    synthesize: impl FnOnce() -> T,
) -> Sourced<T> {
    match result {
        Ok(value) => Sourced::Live(value),
        Err(error) => {
            warn!(
                chain = %chain,
                operation,
                error = %error,
                "All providers failed, returning synthetic record"
            );
            Sourced::Synthetic(synthesize())
        }
    }
}
