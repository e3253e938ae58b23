//! Integration tests for sBTC classification against registry configuration

use sbtcscan::{
    insights, Chain, ContractCall, FunctionArg, NetworkRegistry, NetworkRegistryBuilder,
    OperationType, SbtcClassifier, TxKind, TxStatus,
};

fn contract_call(
    contract_id: &str,
    function_name: &str,
    args: &[(&str, &str)],
) -> sbtcscan::CanonicalTransaction {
    sbtcscan::CanonicalTransaction {
        id: "0x01".into(),
        chain: Chain::Stacks,
        status: TxStatus::Pending,
        kind: TxKind::ContractCall,
        timestamp_ms: 1_730_000_000_000,
        block_height: None,
        sender: "ST2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7".into(),
        recipient: contract_id.into(),
        value: 0,
        fee: 0,
        confirmations: 0,
        inputs: vec![],
        outputs: vec![],
        contract_call: Some(ContractCall {
            contract_id: contract_id.into(),
            function_name: function_name.into(),
            args: args
                .iter()
                .map(|(name, repr)| FunctionArg {
                    name: name.to_string(),
                    repr: repr.to_string(),
                    hex: None,
                    type_name: "uint".into(),
                })
                .collect(),
        }),
        token_transfer: None,
        events: vec![],
    }
}

#[test]
fn test_testnet_deployer_is_recognized() {
    let classifier = SbtcClassifier::new(&NetworkRegistry::testnet().unwrap());
    let tx = contract_call(
        "ST1F7QA2MDF17S807EPA36TSS8AMEFY4KA9TVGWXT.bridge-v1",
        "request-deposit",
        &[("amount", "u1000"), ("memo", "0x746573746e6574")],
    );

    let op = classifier.classify(&tx).unwrap();
    assert_eq!(op.operation_type, OperationType::Deposit);
    assert_eq!(op.amount, 1_000);
    assert_eq!(op.memo.as_deref(), Some("testnet"));
}

#[test]
fn test_custom_contract_list() {
    let registry = NetworkRegistryBuilder::new(sbtcscan::Network::Mainnet)
        .sbtc_contracts(["SP3FBR2AGK5H9QBDH3EEN6DF8EK8JY7RX8QJ5SVTE.bridge"])
        .build()
        .unwrap();
    let classifier = SbtcClassifier::new(&registry);

    let matched = contract_call(
        "SP3FBR2AGK5H9QBDH3EEN6DF8EK8JY7RX8QJ5SVTE.bridge",
        "unwrap",
        &[("value", "u77"), ("to", "'SP3FBR2AGK5H9QBDH3EEN6DF8EK8JY7RX8QJ5SVTE")],
    );
    let op = classifier.classify(&matched).unwrap();
    assert_eq!(op.operation_type, OperationType::Withdrawal);
    assert_eq!(op.amount, 77);
    assert_eq!(
        op.recipient.as_deref(),
        Some("SP3FBR2AGK5H9QBDH3EEN6DF8EK8JY7RX8QJ5SVTE")
    );

    let unrelated = contract_call("SP3FBR2AGK5H9QBDH3EEN6DF8EK8JY7RX8QJ5SVTE.pool", "unwrap", &[]);
    assert!(classifier.classify(&unrelated).is_none());
}

#[test]
fn test_classification_is_pure() {
    let classifier = SbtcClassifier::new(&NetworkRegistry::mainnet().unwrap());
    let mut tx = contract_call(
        "SM3VDXK3WZZSA84XXFKAFAF15NNZX32CTSG82JFQ4.sbtc-token",
        "transfer",
        &[("amount", "u5"), ("recipient", "'SP2")],
    );
    tx.fee = 500;

    let first = classifier.classify(&tx).unwrap();
    let second = classifier.classify(&tx).unwrap();
    assert_eq!(first, second);
    assert_eq!(insights::generate(&first), insights::generate(&second));
    assert!(insights::generate(&first)
        .iter()
        .any(|s| s.contains("pending")));
}
