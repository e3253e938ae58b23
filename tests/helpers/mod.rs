// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for sbtcscan integration tests
//!
//! Provides registries wired to local mock servers and provider payload
//! fixtures, so adapters can be exercised without reaching real providers.

#![allow(dead_code)]

use std::time::Duration;

use sbtcscan::{Chain, Network, NetworkRegistry, NetworkRegistryBuilder};
use serde_json::{json, Value};

/// Loopback address that refuses connections
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub const BTC_TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";
pub const STACKS_TXID: &str = "0x5b5f4a1d3e4c2d0b8a9f7e6d5c4b3a29180706f5e4d3c2b1a09f8e7d6c5b4a39";
pub const SBTC_DEPLOYER: &str = "SM3VDXK3WZZSA84XXFKAFAF15NNZX32CTSG82JFQ4";

/// Builder with every chain pointed at an unreachable provider
pub fn offline_builder() -> NetworkRegistryBuilder {
    let mut builder =
        NetworkRegistryBuilder::new(Network::Mainnet).http_timeout(Duration::from_secs(2));
    for chain in Chain::ALL {
        builder = builder.providers(chain, [("offline", UNREACHABLE)]);
    }
    builder
}

/// Registry whose `chain` uses the given named providers, others offline
pub fn registry_with(chain: Chain, providers: &[(&str, &str)]) -> NetworkRegistry {
    offline_builder()
        .providers(chain, providers.iter().copied())
        .build()
        .expect("test registry")
}

/// Esplora `/tx/{id}` payload: 1 input of 100_000 sats, 2 outputs, 1_000 fee
pub fn esplora_transaction(txid: &str) -> Value {
    json!({
        "txid": txid,
        "vin": [{
            "txid": "ab".repeat(32),
            "vout": 1,
            "is_coinbase": false,
            "prevout": {
                "scriptpubkey_address": "bc1qsender0000000000000000000000000000000",
                "value": 100_000
            }
        }],
        "vout": [
            {
                "scriptpubkey_address": "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq",
                "scriptpubkey_type": "v0_p2wpkh",
                "value": 60_000
            },
            {
                "scriptpubkey_address": "bc1qsender0000000000000000000000000000000",
                "scriptpubkey_type": "v0_p2wpkh",
                "value": 39_000
            }
        ],
        "fee": 1_000,
        "status": {
            "confirmed": true,
            "block_height": 840_000,
            "block_time": 1_713_571_767
        }
    })
}

/// Esplora `/blocks/{start}` page of `count` blocks descending from `start`
pub fn esplora_blocks(start: u64, count: u64) -> Value {
    let blocks: Vec<Value> = (0..count)
        .map(|i| {
            let height = start - i;
            json!({
                "id": format!("{:064x}", height),
                "height": height,
                "timestamp": 1_713_571_767 - (i as i64) * 600,
                "tx_count": 3_000,
                "size": 1_500_000,
                "previousblockhash": format!("{:064x}", height - 1),
                "merkle_root": "cd".repeat(32),
                "nonce": 42,
                "bits": 386_089_497u64
            })
        })
        .collect();
    Value::Array(blocks)
}

/// Hiro `/extended/v1/tx/{id}` payload for an sBTC withdrawal request
pub fn hiro_withdrawal(tx_id: &str) -> Value {
    json!({
        "tx_id": tx_id,
        "tx_type": "contract_call",
        "tx_status": "success",
        "fee_rate": "3000",
        "sender_address": "SP3K8BC0PPEVCV7NZ6QSRWPQ2JE9E5B6N3PA0KBR9",
        "block_height": 180_000,
        "block_time": 1_730_000_000,
        "contract_call": {
            "contract_id": format!("{SBTC_DEPLOYER}.sbtc-withdrawal"),
            "function_name": "initiate-withdrawal-request",
            "function_args": [
                { "hex": "0x01", "repr": "u250000", "name": "amount", "type": "uint" },
                {
                    "hex": "0x0c",
                    "repr": "(tuple (hashbytes 0x00) (version 0x00))",
                    "name": "recipient",
                    "type": "tuple"
                },
                { "hex": "0x01", "repr": "u3000", "name": "max-fee", "type": "uint" }
            ]
        },
        "events": [{
            "event_type": "smart_contract_log",
            "contract_log": {
                "contract_id": format!("{SBTC_DEPLOYER}.sbtc-registry"),
                "value": {
                    "repr": format!("(tuple (bitcoin-txid 0x{BTC_TXID}) (topic \"withdrawal-create\"))")
                }
            }
        }]
    })
}

/// Hiro `/v2/info` payload
pub fn hiro_info(tip: u64) -> Value {
    json!({ "stacks_tip_height": tip, "burn_block_height": 870_000 })
}
