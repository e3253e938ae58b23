//! Error types for chain adapter operations.

/// Errors returned synchronously by chain adapter operations.
///
/// Transport and payload failures are recovered inside the adapter, so the only
/// thing that reaches a caller is a caller mistake: an empty identifier, a
/// negative height or an oversized page request.
///
/// # Examples
///
/// ```rust
/// use sbtcscan::AdapterError;
///
/// let error = AdapterError::empty_identifier("transaction");
/// assert_eq!(error.to_string(), "Invalid argument: transaction identifier is empty");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// The caller passed an argument outside the operation's domain.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument
        reason: String,
    },
}

impl AdapterError {
    /// Create an `InvalidArgument` error with a reason.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        AdapterError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create an `InvalidArgument` error for an empty identifier.
    pub fn empty_identifier(what: &str) -> Self {
        AdapterError::InvalidArgument {
            reason: format!("{what} identifier is empty"),
        }
    }
}
