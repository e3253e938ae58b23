//! Human-readable insight sentences for sBTC operations
//!
//! Pure template expansion keyed by operation type, status and fee tier.
//! The same operation always yields the same sentences in the same order.

use crate::types::amount::{format_with_symbol, Decimals};
use crate::types::fees::CostTier;
use crate::types::sbtc::{OperationType, SbtcOperation, SbtcStatus};

const SBTC_SYMBOL: &str = "sBTC";

/// Generate insight sentences for `op`; never empty
pub fn generate(op: &SbtcOperation) -> Vec<String> {
    let mut insights = vec![summary(op)];

    if op.amount > 0 {
        insights.push(format!(
            "Amount moved: {}.",
            format_with_symbol(op.amount as u128, Decimals::BITCOIN, SBTC_SYMBOL)
        ));
    }
    if let Some(recipient) = &op.recipient {
        insights.push(format!("Recipient: {recipient}."));
    }
    if let Some(linked) = &op.linked_chain_tx_id {
        insights.push(format!("Linked Bitcoin transaction: {linked}."));
    }
    if let Some(memo) = &op.memo {
        insights.push(format!("Memo: \"{memo}\"."));
    }

    match op.status {
        SbtcStatus::Pending => {
            insights.push("The operation is still pending confirmation.".to_string())
        }
        SbtcStatus::Failed => {
            insights.push("The operation failed on-chain; no sBTC moved.".to_string())
        }
        SbtcStatus::Complete => {}
    }

    if let Some(gas) = &op.gas_cost_analysis {
        let sentence = match gas.tier {
            CostTier::Low => format!(
                "Fees were low at {} STX (${:.4}).",
                gas.cost_in_native, gas.cost_in_usd
            ),
            CostTier::Average => format!(
                "Fees were typical at {} STX (${:.4}).",
                gas.cost_in_native, gas.cost_in_usd
            ),
            CostTier::High => format!(
                "Fees were high at {} STX (${:.4}).",
                gas.cost_in_native, gas.cost_in_usd
            ),
        };
        insights.push(sentence);
        if let Some(hint) = &gas.optimization {
            insights.push(hint.clone());
        }
    }

    insights
}

fn summary(op: &SbtcOperation) -> String {
    match op.operation_type {
        OperationType::Deposit => {
            "sBTC deposit: BTC locked on Bitcoin is minted as sBTC on Stacks.".to_string()
        }
        OperationType::Withdrawal => {
            "sBTC withdrawal: sBTC is burned on Stacks and BTC is released on Bitcoin.".to_string()
        }
        OperationType::Transfer => "sBTC transfer between Stacks principals.".to_string(),
        OperationType::Unknown => match &op.function_name {
            Some(function) => format!(
                "Interaction with an sBTC contract through `{function}`, not a recognized bridge operation."
            ),
            None => "Interaction with an sBTC contract that is not a recognized bridge operation."
                .to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fees::GasCostAnalysis;

    fn operation(operation_type: OperationType) -> SbtcOperation {
        SbtcOperation {
            tx_id: "0x01".into(),
            operation_type,
            sender: "SP1".into(),
            recipient: None,
            amount: 0,
            status: SbtcStatus::Complete,
            linked_chain_tx_id: None,
            memo: None,
            contract_id: None,
            function_name: None,
            gas_cost_analysis: None,
        }
    }

    #[test]
    fn test_minimal_operation_has_one_sentence() {
        for op_type in [
            OperationType::Deposit,
            OperationType::Withdrawal,
            OperationType::Transfer,
            OperationType::Unknown,
        ] {
            let insights = generate(&operation(op_type));
            assert_eq!(insights.len(), 1, "{op_type}");
            assert!(!insights[0].is_empty());
        }
    }

    #[test]
    fn test_deterministic() {
        let mut op = operation(OperationType::Withdrawal);
        op.amount = 150_000;
        op.recipient = Some("bc1qexample".into());
        op.status = SbtcStatus::Pending;
        assert_eq!(generate(&op), generate(&op));
    }

    #[test]
    fn test_full_operation() {
        let mut op = operation(OperationType::Deposit);
        op.amount = 100_000_000;
        op.recipient = Some("SP2".into());
        op.linked_chain_tx_id = Some("ab".repeat(32));
        op.memo = Some("hi".into());
        op.status = SbtcStatus::Failed;
        op.gas_cost_analysis = Some(GasCostAnalysis {
            cost_in_native: "0.050000".into(),
            cost_in_usd: 0.1,
            tier: CostTier::High,
            optimization: Some("wait".into()),
        });

        let insights = generate(&op);
        assert!(insights[0].starts_with("sBTC deposit"));
        assert!(insights.contains(&"Amount moved: 1.00000000 sBTC.".to_string()));
        assert!(insights.iter().any(|s| s.contains("failed")));
        assert!(insights.iter().any(|s| s == "Fees were high at 0.050000 STX ($0.1000)."));
        assert_eq!(insights.last().map(String::as_str), Some("wait"));
    }

    #[test]
    fn test_unknown_mentions_function() {
        let mut op = operation(OperationType::Unknown);
        op.function_name = Some("get-signers".into());
        assert!(generate(&op)[0].contains("get-signers"));
    }
}
