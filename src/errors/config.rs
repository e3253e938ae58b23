//! Error types for building the network registry.

/// Errors that can occur while building a [`crate::NetworkRegistry`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A provider, explorer or proxy URL did not parse.
    #[error("Invalid URL for {key}: {value}")]
    InvalidUrl {
        /// Setting the URL came from
        key: String,
        /// Offending value
        value: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// A numeric setting did not parse or was out of range.
    #[error("Invalid number for {key}: {value}")]
    InvalidNumber {
        /// Setting name
        key: String,
        /// Offending value
        value: String,
    },

    /// A chain or network name was not recognized.
    #[error("Unknown name for {key}: {source}")]
    UnknownName {
        /// Setting name
        key: String,
        /// Parse error carrying the offending value
        #[source]
        source: crate::types::chain::UnknownNameError,
    },

    /// A chain was configured without any provider.
    #[error("No providers configured for {chain}")]
    NoProviders {
        /// Chain missing providers
        chain: crate::Chain,
    },

    /// Fee-tier thresholds were not ordered `low_max < high_min`.
    #[error("Fee tiers for {chain} must satisfy low_max < high_min (got {low_max} / {high_min})")]
    InvalidFeeTiers {
        /// Chain whose thresholds are inconsistent
        chain: crate::Chain,
        /// Low-tier ceiling
        low_max: f64,
        /// High-tier floor
        high_min: f64,
    },
}

impl ConfigError {
    /// Create an `InvalidUrl` error.
    pub fn invalid_url(
        key: impl Into<String>,
        value: impl Into<String>,
        source: url::ParseError,
    ) -> Self {
        ConfigError::InvalidUrl {
            key: key.into(),
            value: value.into(),
            source,
        }
    }

    /// Create an `InvalidNumber` error.
    pub fn invalid_number(key: impl Into<String>, value: impl Into<String>) -> Self {
        ConfigError::InvalidNumber {
            key: key.into(),
            value: value.into(),
        }
    }
}
