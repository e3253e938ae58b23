//! Span creation helpers for sbtcscan operations.
//!
//! Telemetry is kept out of business logic: instead of `#[instrument]`
//! attributes, each instrumented operation has a span helper here.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     let span = spans::my_operation(param_value);
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(span)
//!     .await
//! }
//! ```

use tracing::{Level, Span};

use crate::types::chain::Chain;

/// Create span for one adapter operation.
///
/// Parent: explorer search/overview span, or none when adapters are used directly
/// Children: provider_request spans (one per attempted provider)
#[inline]
pub(crate) fn adapter_operation(chain: Chain, operation: &'static str) -> Span {
    tracing::span!(
        Level::INFO,
        "sbtcscan.adapter_operation",
        chain = %chain,
        operation = operation,
    )
}

/// Create span for a single outbound provider request.
///
/// Parent: adapter_operation span
#[inline]
pub(crate) fn provider_request(provider: &str, url: &str) -> Span {
    tracing::debug_span!("sbtcscan.provider_request", provider = provider, url = url,)
}

/// Create span for synthesizing fallback records.
///
/// Parent: adapter_operation span
#[inline]
pub(crate) fn synthesize(chain: Chain, kind: &'static str) -> Span {
    tracing::debug_span!("sbtcscan.synthesize", chain = %chain, kind = kind,)
}

/// Create span for sBTC classification of one transaction.
#[inline]
pub(crate) fn classify_sbtc(tx_id: &str) -> Span {
    tracing::trace_span!("sbtcscan.classify_sbtc", tx_id = tx_id,)
}

/// Create span for an explorer search.
///
/// Parent: None (root span for this operation)
/// Children: adapter_operation span
#[inline]
pub(crate) fn search(context: Chain, identifier_kind: &'static str) -> Span {
    tracing::span!(
        Level::INFO,
        "sbtcscan.search",
        context = %context,
        identifier_kind = identifier_kind,
    )
}

/// Create span for building a chain overview.
///
/// Parent: None (root span for this operation)
/// Children: three concurrent adapter_operation spans
#[inline]
pub(crate) fn overview(chain: Chain, limit: usize) -> Span {
    tracing::span!(
        Level::INFO,
        "sbtcscan.overview",
        chain = %chain,
        limit = limit,
    )
}
