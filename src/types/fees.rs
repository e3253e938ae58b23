// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for fee-tier analysis
//!
//! Thresholds are expressed in the native unit (e.g. BTC, STX) because that is
//! how operators reason about them, but comparisons are done in minor units so
//! that float rounding never moves a fee across a tier boundary.

use serde::{Deserialize, Serialize};

use super::amount::Decimals;

/// Cost tier of a transaction fee relative to the network baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Low,
    Average,
    High,
}

impl CostTier {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CostTier::Low => "low",
            CostTier::Average => "average",
            CostTier::High => "high",
        }
    }
}

impl std::fmt::Display for CostTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static per-network fee-tier boundaries, in native units
///
/// A fee at or below `low_max` is [`CostTier::Low`], at or above `high_min` is
/// [`CostTier::High`], and anything between is [`CostTier::Average`].
///
/// # Examples
///
/// ```
/// use sbtcscan::{CostTier, Decimals, FeeTierThresholds};
///
/// let thresholds = FeeTierThresholds::STACKS;
/// assert_eq!(thresholds.tier_for(500, Decimals::STACKS), CostTier::Low);
/// assert_eq!(thresholds.tier_for(5_000, Decimals::STACKS), CostTier::Average);
/// assert_eq!(thresholds.tier_for(50_000, Decimals::STACKS), CostTier::High);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTierThresholds {
    pub low_max: f64,
    pub high_min: f64,
}

impl FeeTierThresholds {
    /// Bitcoin-family defaults: ≤ 0.00010 BTC is low, ≥ 0.00090 BTC is high
    pub const BITCOIN: Self = Self {
        low_max: 0.0001,
        high_min: 0.0009,
    };

    /// Stacks defaults: ≤ 0.001 STX is low, ≥ 0.01 STX is high
    pub const STACKS: Self = Self {
        low_max: 0.001,
        high_min: 0.01,
    };

    pub const fn new(low_max: f64, high_min: f64) -> Self {
        Self { low_max, high_min }
    }

    /// Classify a fee given in minor units at the given precision
    pub fn tier_for(&self, fee_minor_units: u128, decimals: Decimals) -> CostTier {
        let low_max = decimals.native_to_minor(self.low_max);
        let high_min = decimals.native_to_minor(self.high_min);

        if fee_minor_units <= low_max {
            CostTier::Low
        } else if fee_minor_units >= high_min {
            CostTier::High
        } else {
            CostTier::Average
        }
    }
}

impl Default for FeeTierThresholds {
    fn default() -> Self {
        Self::BITCOIN
    }
}

/// Cost breakdown of a transaction fee
///
/// `optimization` is only present for [`CostTier::High`]; it is omitted from
/// serialized output otherwise rather than emitted as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostAnalysis {
    /// Fee in native units with exactly `decimals` fractional digits
    pub cost_in_native: String,
    /// Fee converted at the configured USD price
    pub cost_in_usd: f64,
    pub tier: CostTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitcoin_boundaries_are_inclusive() {
        let t = FeeTierThresholds::BITCOIN;
        assert_eq!(t.tier_for(10_000, Decimals::BITCOIN), CostTier::Low);
        assert_eq!(t.tier_for(10_001, Decimals::BITCOIN), CostTier::Average);
        assert_eq!(t.tier_for(89_999, Decimals::BITCOIN), CostTier::Average);
        assert_eq!(t.tier_for(90_000, Decimals::BITCOIN), CostTier::High);
    }

    #[test]
    fn test_stacks_boundaries() {
        let t = FeeTierThresholds::STACKS;
        assert_eq!(t.tier_for(0, Decimals::STACKS), CostTier::Low);
        assert_eq!(t.tier_for(1_000, Decimals::STACKS), CostTier::Low);
        assert_eq!(t.tier_for(10_000, Decimals::STACKS), CostTier::High);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(CostTier::Average.to_string(), "average");
        assert_eq!(
            serde_json::to_string(&CostTier::High).unwrap(),
            "\"high\""
        );
    }

    #[test]
    fn test_optimization_omitted_when_absent() {
        let analysis = GasCostAnalysis {
            cost_in_native: "0.000500".into(),
            cost_in_usd: 0.001,
            tier: CostTier::Low,
            optimization: None,
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("optimization").is_none());
        assert_eq!(json["costInNative"], "0.000500");
    }
}
