//! Free-text identifier classification.
//!
//! [`classify`] decides whether a user query is a transaction id, an address or
//! plain text. Matching is exact: near-misses such as a 63-character hash fall
//! through to [`Identifier::Query`] instead of producing an error.
//!
//! Priority order:
//!
//! 1. 64 hex characters without prefix: Bitcoin-family transaction id, unless
//!    the context chain is Stacks
//! 2. `0x` + 64 hex, or bare 64 hex in Stacks context: Stacks transaction id
//! 3. Bitcoin address (P2PKH, P2SH, Bech32, testnet P2PKH, testnet Bech32)
//! 4. `SP`/`ST` + 33 to 39 upper-case alphanumerics: Stacks address
//! 5. anything else: free-text query

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::chain::{Chain, ChainFamily};

static BARE_TX_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{64}$").expect("static regex"));
static PREFIXED_TX_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{64}$").expect("static regex"));

// Base58 excludes 0, O, I and l.
static P2PKH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[1-9A-HJ-NP-Za-km-z]{25,34}$").expect("static regex"));
static P2SH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^3[1-9A-HJ-NP-Za-km-z]{25,34}$").expect("static regex"));
static TESTNET_P2PKH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[mn2][1-9A-HJ-NP-Za-km-z]{25,34}$").expect("static regex"));

// Bech32 data charset excludes 1, b, i and o. Mixed case is invalid.
static BECH32: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:bc1[ac-hj-np-z02-9]{25,89}|BC1[AC-HJ-NP-Z02-9]{25,89})$")
        .expect("static regex")
});
static TESTNET_BECH32: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:tb1[ac-hj-np-z02-9]{25,89}|TB1[AC-HJ-NP-Z02-9]{25,89})$")
        .expect("static regex")
});

static STACKS_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^S[PT][0-9A-Z]{33,39}$").expect("static regex"));

/// Address sub-type recorded by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    P2pkh,
    P2sh,
    Bech32,
    TestnetP2pkh,
    TestnetBech32,
    StacksMainnet,
    StacksTestnet,
}

/// What a free-text input refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Identifier {
    Tx { chain: Chain },
    Address { chain: Chain, subtype: AddressKind },
    Query,
}

impl Identifier {
    /// Short label used in logs and spans
    pub const fn kind(&self) -> &'static str {
        match self {
            Identifier::Tx { .. } => "tx",
            Identifier::Address { .. } => "address",
            Identifier::Query => "query",
        }
    }
}

/// Classify `input` in the context of the currently selected chain
///
/// The input is trimmed first. Empty input is a [`Identifier::Query`].
///
/// # Examples
///
/// ```rust
/// use sbtcscan::{classify, AddressKind, Chain, Identifier};
///
/// let id = classify("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq", Chain::Bitcoin);
/// assert_eq!(
///     id,
///     Identifier::Address { chain: Chain::Bitcoin, subtype: AddressKind::Bech32 }
/// );
/// assert_eq!(classify("what is sBTC?", Chain::Bitcoin), Identifier::Query);
/// ```
pub fn classify(input: &str, context: Chain) -> Identifier {
    let input = input.trim();

    if BARE_TX_ID.is_match(input) {
        let chain = match context.family() {
            ChainFamily::Stacks => Chain::Stacks,
            ChainFamily::Sidechain => context,
            ChainFamily::Bitcoin => Chain::Bitcoin,
        };
        return Identifier::Tx { chain };
    }

    if PREFIXED_TX_ID.is_match(input) {
        return Identifier::Tx {
            chain: Chain::Stacks,
        };
    }

    if let Some(subtype) = bitcoin_address_kind(input) {
        return Identifier::Address {
            chain: Chain::Bitcoin,
            subtype,
        };
    }

    if STACKS_ADDRESS.is_match(input) {
        let subtype = if input.starts_with("SP") {
            AddressKind::StacksMainnet
        } else {
            AddressKind::StacksTestnet
        };
        return Identifier::Address {
            chain: Chain::Stacks,
            subtype,
        };
    }

    Identifier::Query
}

fn bitcoin_address_kind(input: &str) -> Option<AddressKind> {
    if P2PKH.is_match(input) {
        Some(AddressKind::P2pkh)
    } else if P2SH.is_match(input) {
        Some(AddressKind::P2sh)
    } else if BECH32.is_match(input) {
        Some(AddressKind::Bech32)
    } else if TESTNET_P2PKH.is_match(input) {
        Some(AddressKind::TestnetP2pkh)
    } else if TESTNET_BECH32.is_match(input) {
        Some(AddressKind::TestnetBech32)
    } else {
        None
    }
}
