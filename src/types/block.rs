//! Canonical block record

use serde::{Deserialize, Serialize};

use crate::errors::AdapterError;

/// Chain-agnostic block shape every adapter normalizes into
///
/// Heights are monotonically non-decreasing per chain and hashes are unique per
/// chain. Fields a provider does not report default to zero or the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalBlock {
    pub hash: String,
    pub height: u64,
    pub timestamp_ms: i64,
    pub tx_count: u64,
    pub size_bytes: u64,
    pub prev_hash: String,
    pub merkle_root: String,
    pub nonce: u64,
    pub bits: u64,
    pub confirmations: u64,
}

/// How a caller addresses a single block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRef {
    Height(u64),
    Hash(String),
}

impl BlockRef {
    /// Parse user input into a block reference
    ///
    /// Decimal digits select a height; anything else is treated as a hash.
    /// Negative numbers and empty input are caller errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use sbtcscan::BlockRef;
    ///
    /// assert_eq!(BlockRef::parse("840000").unwrap(), BlockRef::Height(840_000));
    /// assert!(BlockRef::parse("-5").is_err());
    /// assert!(BlockRef::parse("  ").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, AdapterError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AdapterError::empty_identifier("block"));
        }
        if let Some(rest) = input.strip_prefix('-') {
            if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                return Err(AdapterError::invalid_argument(format!(
                    "block height must be non-negative, got {input}"
                )));
            }
        }
        if input.chars().all(|c| c.is_ascii_digit()) {
            return input
                .parse::<u64>()
                .map(BlockRef::Height)
                .map_err(|e| AdapterError::invalid_argument(format!("block height {input}: {e}")));
        }
        Ok(BlockRef::Hash(input.to_string()))
    }
}

impl std::fmt::Display for BlockRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockRef::Height(height) => write!(f, "{height}"),
            BlockRef::Hash(hash) => f.write_str(hash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_height_and_hash() {
        assert_eq!(BlockRef::parse("0").unwrap(), BlockRef::Height(0));
        let hash = "00000000000000000002a7c4c1e48d76c5a37902165a270156b7a8d72728a054";
        assert_eq!(
            BlockRef::parse(hash).unwrap(),
            BlockRef::Hash(hash.to_string())
        );
    }

    #[test]
    fn test_parse_rejects_negative_and_empty() {
        assert!(matches!(
            BlockRef::parse("-1"),
            Err(AdapterError::InvalidArgument { .. })
        ));
        assert!(matches!(
            BlockRef::parse(""),
            Err(AdapterError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_overflowing_height() {
        assert!(BlockRef::parse("99999999999999999999999").is_err());
    }

    #[test]
    fn test_block_serializes_camel_case() {
        let block = CanonicalBlock {
            hash: "aa".into(),
            height: 1,
            timestamp_ms: 1_700_000_000_000,
            tx_count: 2,
            size_bytes: 300,
            prev_hash: "bb".into(),
            merkle_root: "cc".into(),
            nonce: 7,
            bits: 386_089_497,
            confirmations: 1,
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["timestampMs"], 1_700_000_000_000i64);
        assert_eq!(json["prevHash"], "bb");
        assert_eq!(json["txCount"], 2);
    }
}
