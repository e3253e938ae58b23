// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain and network identifiers

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A chain whose data can be fetched and normalized.
///
/// The three sidechains are BIP300 drivechains pegged to Bitcoin. Each one
/// owns a fixed sidechain slot, which also shows up in its deposit address
/// format (`s{slot}_{address}_{checksum}`).
///
/// # Examples
///
/// ```
/// use sbtcscan::{Chain, ChainFamily};
///
/// assert_eq!(Chain::Thunder.family(), ChainFamily::Sidechain);
/// assert_eq!(Chain::Thunder.sidechain_slot(), Some(9));
/// assert_eq!("stacks".parse::<Chain>().unwrap(), Chain::Stacks);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Bitcoin,
    Stacks,
    Thunder,
    #[serde(rename = "zside")]
    ZSide,
    #[serde(rename = "bitnames")]
    BitNames,
}

/// Adapter family a chain belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainFamily {
    /// UTXO chain served by Esplora-compatible providers
    Bitcoin,
    /// Account-model chain served by the Hiro API
    Stacks,
    /// BIP300 sidechain served by a per-sidechain REST API
    Sidechain,
}

impl Chain {
    /// Every supported chain, in display order
    pub const ALL: [Chain; 5] = [
        Chain::Bitcoin,
        Chain::Stacks,
        Chain::Thunder,
        Chain::ZSide,
        Chain::BitNames,
    ];

    /// The BIP300 sidechains
    pub const SIDECHAINS: [Chain; 3] = [Chain::Thunder, Chain::ZSide, Chain::BitNames];

    pub const fn family(&self) -> ChainFamily {
        match self {
            Chain::Bitcoin => ChainFamily::Bitcoin,
            Chain::Stacks => ChainFamily::Stacks,
            Chain::Thunder | Chain::ZSide | Chain::BitNames => ChainFamily::Sidechain,
        }
    }

    /// BIP300 slot number, `None` for non-sidechains
    pub const fn sidechain_slot(&self) -> Option<u8> {
        match self {
            Chain::BitNames => Some(2),
            Chain::Thunder => Some(9),
            Chain::ZSide => Some(13),
            Chain::Bitcoin | Chain::Stacks => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "bitcoin",
            Chain::Stacks => "stacks",
            Chain::Thunder => "thunder",
            Chain::ZSide => "zside",
            Chain::BitNames => "bitnames",
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown chain or network name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownNameError {
    kind: &'static str,
    value: String,
}

impl FromStr for Chain {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chain::ALL
            .into_iter()
            .find(|chain| chain.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownNameError {
                kind: "chain",
                value: s.to_string(),
            })
    }
}

/// Bitcoin/Stacks network the registry is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            _ => Err(UnknownNameError {
                kind: "network",
                value: s.to_string(),
            }),
        }
    }
}
