//! Error types for upstream HTTP provider calls.
//!
//! These errors never escape an adapter operation: the adapter logs them, moves
//! on to the next provider, and finally falls back to synthesis. They are public
//! because [`crate::transport::JsonClient`] is usable on its own.

/// Errors that can occur while fetching and decoding a provider response.
///
/// Every variant records which provider failed so fallback logs can name it.
///
/// # Examples
///
/// ```rust
/// use sbtcscan::ProviderError;
///
/// let error = ProviderError::Status {
///     provider: "mempool.space".to_string(),
///     url: "https://mempool.space/api/tx/abc".to_string(),
///     status: 404,
/// };
/// assert!(error.to_string().contains("404"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a non-2xx status.
    #[error("{provider} returned HTTP {status} for {url}")]
    Status {
        /// Provider name from the network descriptor
        provider: String,
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The request did not complete within the configured timeout.
    #[error("{provider} timed out requesting {url}")]
    Timeout {
        /// Provider name from the network descriptor
        provider: String,
        /// Requested URL
        url: String,
    },

    /// Connection-level failure (DNS, TLS, reset, ...).
    #[error("{provider} request to {url} failed")]
    Network {
        /// Provider name from the network descriptor
        provider: String,
        /// Requested URL
        url: String,
        /// The underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The body was not the JSON shape we expected, or a required field was
    /// missing with no documented default.
    #[error("{provider} sent a malformed response: {details}")]
    Malformed {
        /// Provider name from the network descriptor
        provider: String,
        /// What was wrong with the payload
        details: String,
    },

    /// A request URL could not be built from the provider base URL.
    #[error("invalid request URL {url}: {details}")]
    InvalidUrl {
        /// The URL that failed to parse
        url: String,
        /// Parser message
        details: String,
    },

    /// The ordered provider list was empty.
    #[error("no providers configured for {operation}")]
    NoProviders {
        /// Operation that was attempted
        operation: String,
    },
}

impl ProviderError {
    /// Create a `Malformed` error for a provider.
    pub fn malformed(provider: impl Into<String>, details: impl Into<String>) -> Self {
        ProviderError::Malformed {
            provider: provider.into(),
            details: details.into(),
        }
    }

    /// Create a `Network` error from any error type.
    pub fn network(
        provider: impl Into<String>,
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ProviderError::Network {
            provider: provider.into(),
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// Create a `NoProviders` error.
    pub fn no_providers(operation: impl Into<String>) -> Self {
        ProviderError::NoProviders {
            operation: operation.into(),
        }
    }

    /// Whether this failure came from the remote side rather than a local
    /// misconfiguration.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProviderError::Status { .. }
                | ProviderError::Timeout { .. }
                | ProviderError::Network { .. }
        )
    }
}
