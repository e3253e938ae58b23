//! Canonical address and network-stats records

use serde::{Deserialize, Serialize};

use super::chain::Chain;

/// Chain-agnostic address summary
///
/// `balance` is the confirmed balance in minor units. `unconfirmed_balance` is
/// the net mempool delta and may be negative when pending spends exceed
/// pending receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAddress {
    pub address: String,
    pub chain: Chain,
    pub balance: u64,
    pub unconfirmed_balance: i64,
    pub tx_count: u64,
}

/// Fee recommendations in minor units (sat/vB for Bitcoin-family chains,
/// micro-STX per transaction for Stacks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecommendation {
    pub fast: u64,
    pub medium: u64,
    pub slow: u64,
}

impl FeeRecommendation {
    /// Reorder so that `fast >= medium >= slow`; providers occasionally report
    /// crossed estimates for near-empty mempools.
    pub fn normalized(self) -> Self {
        let mut values = [self.fast, self.medium, self.slow];
        values.sort_unstable_by(|a, b| b.cmp(a));
        Self {
            fast: values[0],
            medium: values[1],
            slow: values[2],
        }
    }
}

/// Network-level summary for one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub chain: Chain,
    pub tip_height: u64,
    pub mempool_tx_count: u64,
    pub fees: FeeRecommendation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_recommendation_normalized() {
        let fees = FeeRecommendation {
            fast: 2,
            medium: 9,
            slow: 5,
        }
        .normalized();
        assert_eq!(
            fees,
            FeeRecommendation {
                fast: 9,
                medium: 5,
                slow: 2
            }
        );
    }

    #[test]
    fn test_address_negative_unconfirmed_serializes() {
        let address = CanonicalAddress {
            address: "bc1qexample".into(),
            chain: Chain::Bitcoin,
            balance: 10,
            unconfirmed_balance: -5,
            tx_count: 2,
        };
        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["unconfirmedBalance"], -5);
        assert_eq!(json["txCount"], 2);
    }
}
