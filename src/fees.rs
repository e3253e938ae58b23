//! Fee cost analysis
//!
//! [`FeeAnalyzer`] turns a raw fee in minor units into a [`GasCostAnalysis`]:
//! the native amount as a fixed-point string, its USD value, and a cost tier
//! against per-network thresholds.

use crate::types::amount::{format_minor_units, Decimals};
use crate::types::fees::{CostTier, FeeTierThresholds, GasCostAnalysis};

/// Hint attached to high-tier fees
pub const HIGH_FEE_OPTIMIZATION: &str =
    "Fees are high relative to typical activity; consider submitting when the mempool is less congested or lowering the fee rate.";

/// Tiered fee analysis for one network
///
/// # Example
///
/// ```rust
/// use sbtcscan::{CostTier, Decimals, FeeAnalyzer, FeeTierThresholds};
///
/// let analyzer = FeeAnalyzer::new(FeeTierThresholds::STACKS);
/// let analysis = analyzer.analyze(5_000, Decimals::STACKS, 2.0);
/// assert_eq!(analysis.cost_in_native, "0.005000");
/// assert_eq!(analysis.tier, CostTier::Average);
/// assert!(analysis.optimization.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeeAnalyzer {
    thresholds: FeeTierThresholds,
}

impl FeeAnalyzer {
    pub fn new(thresholds: FeeTierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> FeeTierThresholds {
        self.thresholds
    }

    /// Analyze a fee of `fee_minor_units` at `decimals`, priced at `price_usd` per native unit
    pub fn analyze(
        &self,
        fee_minor_units: u128,
        decimals: Decimals,
        price_usd: f64,
    ) -> GasCostAnalysis {
        let tier = self.thresholds.tier_for(fee_minor_units, decimals);
        let native = fee_minor_units as f64 / decimals.divisor() as f64;
        let cost_in_usd = if price_usd.is_finite() && price_usd > 0.0 {
            native * price_usd
        } else {
            0.0
        };

        GasCostAnalysis {
            cost_in_native: format_minor_units(fee_minor_units, decimals),
            cost_in_usd,
            tier,
            optimization: (tier == CostTier::High).then(|| HIGH_FEE_OPTIMIZATION.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacks_tiers() {
        let analyzer = FeeAnalyzer::new(FeeTierThresholds::STACKS);

        let low = analyzer.analyze(500, Decimals::STACKS, 1.8);
        assert_eq!(low.tier, CostTier::Low);
        assert!(low.optimization.is_none());
        assert_eq!(low.cost_in_native, "0.000500");

        let average = analyzer.analyze(5_000, Decimals::STACKS, 1.8);
        assert_eq!(average.tier, CostTier::Average);
        assert_eq!(average.cost_in_native, "0.005000");

        let high = analyzer.analyze(50_000, Decimals::STACKS, 1.8);
        assert_eq!(high.tier, CostTier::High);
        assert!(!high.optimization.unwrap().is_empty());
    }

    #[test]
    fn test_bitcoin_tiers() {
        let analyzer = FeeAnalyzer::new(FeeTierThresholds::BITCOIN);
        assert_eq!(analyzer.analyze(2_000, Decimals::BITCOIN, 65_000.0).tier, CostTier::Low);
        assert_eq!(analyzer.analyze(50_000, Decimals::BITCOIN, 65_000.0).tier, CostTier::Average);
        assert_eq!(analyzer.analyze(100_000, Decimals::BITCOIN, 65_000.0).tier, CostTier::High);
    }

    #[test]
    fn test_usd_conversion() {
        let analyzer = FeeAnalyzer::new(FeeTierThresholds::BITCOIN);
        let analysis = analyzer.analyze(100_000_000, Decimals::BITCOIN, 65_000.0);
        assert!((analysis.cost_in_usd - 65_000.0).abs() < 1e-6);
        assert_eq!(analysis.cost_in_native, "1.00000000");
    }

    #[test]
    fn test_invalid_price_is_zero_usd() {
        let analyzer = FeeAnalyzer::default();
        assert_eq!(analyzer.analyze(1_000, Decimals::BITCOIN, f64::NAN).cost_in_usd, 0.0);
        assert_eq!(analyzer.analyze(1_000, Decimals::BITCOIN, -5.0).cost_in_usd, 0.0);
    }

    #[test]
    fn test_zero_fee() {
        let analysis =
            FeeAnalyzer::new(FeeTierThresholds::STACKS).analyze(0, Decimals::STACKS, 2.0);
        assert_eq!(analysis.cost_in_native, "0");
        assert_eq!(analysis.tier, CostTier::Low);
    }
}
