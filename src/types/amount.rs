// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Native-unit decimal precision and minor-unit formatting
//!
//! Adapters always produce amounts in the provider's minor unit (satoshis,
//! micro-STX). Conversion to display units happens only here.

use serde::{Deserialize, Serialize};

/// Decimal precision of a chain's native unit
///
/// # Examples
///
/// ```
/// use sbtcscan::Decimals;
///
/// assert_eq!(Decimals::BITCOIN.as_u8(), 8);
/// assert_eq!(Decimals::STACKS.as_u8(), 6);
/// assert_eq!(Decimals::STACKS.divisor(), 1_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decimals(u8);

impl Decimals {
    /// Largest precision whose divisor still fits in a `u128`
    pub const MAX: u8 = 38;

    /// Satoshis per BTC (also used by sBTC and the BIP300 sidechains)
    pub const BITCOIN: Self = Self(8);

    /// Micro-STX per STX
    pub const STACKS: Self = Self(6);

    /// Create a precision value, clamped to [`Decimals::MAX`]
    pub const fn new(decimals: u8) -> Self {
        if decimals > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(decimals)
        }
    }

    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// `10^decimals` as an integer
    pub fn divisor(&self) -> u128 {
        10u128.pow(self.0 as u32)
    }

    /// Convert a native-unit amount (e.g. `0.0001` BTC) into minor units, rounding
    /// to the nearest unit.
    pub fn native_to_minor(&self, native: f64) -> u128 {
        if native <= 0.0 || !native.is_finite() {
            return 0;
        }
        (native * self.divisor() as f64).round() as u128
    }
}

impl From<u8> for Decimals {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for Decimals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} decimals", self.0)
    }
}

/// Render `value / 10^decimals` with exactly `decimals` fractional digits
///
/// Zero renders as `"0"`. Never uses scientific notation.
///
/// # Examples
///
/// ```
/// use sbtcscan::{format_minor_units, Decimals};
///
/// assert_eq!(format_minor_units(100_000_000, Decimals::BITCOIN), "1.00000000");
/// assert_eq!(format_minor_units(5_000, Decimals::STACKS), "0.005000");
/// assert_eq!(format_minor_units(0, Decimals::BITCOIN), "0");
/// ```
pub fn format_minor_units(value: u128, decimals: Decimals) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let places = decimals.as_u8() as usize;
    if places == 0 {
        return value.to_string();
    }

    let divisor = decimals.divisor();
    let whole = value / divisor;
    let fraction = value % divisor;
    format!("{whole}.{fraction:0>places$}")
}

/// Like [`format_minor_units`] but appends the native symbol, e.g. `"0.50000000 BTC"`
pub fn format_with_symbol(value: u128, decimals: Decimals, symbol: &str) -> String {
    format!("{} {}", format_minor_units(value, decimals), symbol)
}
