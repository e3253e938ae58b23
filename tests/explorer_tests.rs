// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the explorer facade
//!
//! Search dispatch, sBTC enrichment of Stacks transactions, and concurrent
//! overview fetches with independent fallback.

mod helpers;

use std::sync::Arc;

use helpers::*;
use httpmock::prelude::*;
use sbtcscan::{
    AddressKind, Chain, CostTier, Explorer, OperationType, SbtcStatus, SearchOutcome,
};

#[tokio::test]
async fn test_search_stacks_withdrawal_attaches_sbtc_and_insights() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/extended/v1/tx/{STACKS_TXID}"));
            then.status(200).json_body(hiro_withdrawal(STACKS_TXID));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/info");
            then.status(200).json_body(hiro_info(180_000));
        })
        .await;

    let registry = registry_with(Chain::Stacks, &[("hiro", &server.base_url())]);
    let explorer = Explorer::new(Arc::new(registry)).unwrap();

    let outcome = explorer.search(STACKS_TXID, Chain::Stacks).await.unwrap();
    let SearchOutcome::Transaction {
        transaction,
        fee_analysis,
        sbtc,
        insights,
    } = outcome
    else {
        panic!("expected a transaction outcome");
    };

    assert!(transaction.is_live());
    let op = sbtc.expect("sBTC operation");
    assert_eq!(op.operation_type, OperationType::Withdrawal);
    assert_eq!(op.amount, 250_000);
    assert_eq!(op.status, SbtcStatus::Complete);
    assert_eq!(op.linked_chain_tx_id.as_deref(), Some(BTC_TXID));
    assert_eq!(op.gas_cost_analysis.as_ref().unwrap().tier, CostTier::Average);
    assert_eq!(fee_analysis, op.gas_cost_analysis);
    assert!(!insights.is_empty());
    assert!(insights[0].contains("withdrawal"));
}

#[tokio::test]
async fn test_search_bitcoin_tx_has_no_sbtc_reading() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/tx/{BTC_TXID}"));
            then.status(200).json_body(esplora_transaction(BTC_TXID));
        })
        .await;

    let registry = offline_builder()
        .providers(Chain::Bitcoin, [("esplora", server.base_url().as_str())])
        .btc_usd_price(100_000.0)
        .build()
        .unwrap();
    let explorer = Explorer::new(Arc::new(registry)).unwrap();

    match explorer.search(BTC_TXID, Chain::Bitcoin).await.unwrap() {
        SearchOutcome::Transaction {
            transaction,
            fee_analysis,
            sbtc,
            insights,
        } => {
            assert!(transaction.is_live());
            assert!(sbtc.is_none());
            assert!(insights.is_empty());

            // 1_000 sats at $100k/BTC
            let fees = fee_analysis.expect("fee analysis");
            assert_eq!(fees.cost_in_native, "0.00001000");
            assert!((fees.cost_in_usd - 1.0).abs() < 1e-9);
            assert_eq!(fees.tier, CostTier::Low);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_search_stacks_address_routes_to_stacks() {
    let server = MockServer::start_async().await;
    let address = "SP3K8BC0PPEVCV7NZ6QSRWPQ2JE9E5B6N3PA0KBR9";
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/extended/v1/address/{address}/balances"));
            then.status(200)
                .json_body(serde_json::json!({ "stx": { "balance": "1500000" } }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/extended/v1/address/{address}/transactions"));
            then.status(200)
                .json_body(serde_json::json!({ "total": 12, "results": [] }));
        })
        .await;

    let registry = registry_with(Chain::Stacks, &[("hiro", &server.base_url())]);
    let explorer = Explorer::new(Arc::new(registry)).unwrap();

    // Context is Bitcoin, but the SP prefix wins
    match explorer.search(address, Chain::Bitcoin).await.unwrap() {
        SearchOutcome::Address {
            address: record,
            subtype,
        } => {
            assert_eq!(subtype, AddressKind::StacksMainnet);
            assert!(record.is_live());
            let record = record.into_inner();
            assert_eq!(record.chain, Chain::Stacks);
            assert_eq!(record.balance, 1_500_000);
            assert_eq!(record.tx_count, 12);
            assert_eq!(record.unconfirmed_balance, 0);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_overview_mixes_live_and_synthetic_parts() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/status");
            then.status(200)
                .json_body(serde_json::json!({ "height": 500, "mempool_size": 2 }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/fees");
            then.status(200)
                .json_body(serde_json::json!({ "fast": 5, "medium": 3, "slow": 1 }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/blocks");
            then.status(502);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/txs/recent");
            then.status(200).json_body(serde_json::json!([]));
        })
        .await;

    let registry = registry_with(Chain::BitNames, &[("bitnames", &server.base_url())]);
    let explorer = Explorer::new(Arc::new(registry)).unwrap();

    let overview = explorer.overview(Chain::BitNames, 5).await.unwrap();
    assert_eq!(overview.chain, Chain::BitNames);
    assert!(overview.stats.is_live());
    assert_eq!(overview.stats.as_inner().tip_height, 500);
    assert!(overview.transactions.is_live());
    assert!(overview.transactions.as_inner().is_empty());
    assert!(overview.blocks.is_synthetic());

    let blocks = overview.blocks.into_inner();
    assert_eq!(blocks.len(), 5);
    assert_eq!(blocks[0].height, 500);
    for pair in blocks.windows(2) {
        assert!(pair[0].height > pair[1].height);
        assert_eq!(pair[0].prev_hash, pair[1].hash);
    }
}

#[tokio::test]
async fn test_overview_serializes_with_source_tags() {
    let explorer = Explorer::new(Arc::new(offline_builder().build().unwrap())).unwrap();
    let overview = explorer.overview(Chain::Stacks, 3).await.unwrap();

    let json = serde_json::to_value(&overview).unwrap();
    assert_eq!(json["chain"], "stacks");
    assert_eq!(json["blocks"]["source"], "synthetic");
    assert_eq!(json["blocks"]["record"].as_array().unwrap().len(), 3);
    assert_eq!(json["stats"]["source"], "synthetic");
}
