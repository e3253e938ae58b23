// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Network registry: the immutable per-chain configuration
//!
//! The registry is built once at startup and shared as `Arc<NetworkRegistry>`.
//! Nothing mutates it afterwards; every adapter and classifier receives it
//! explicitly through its constructor.
//!
//! # Example: Using presets
//!
//! ```rust
//! use sbtcscan::{Chain, NetworkRegistry};
//!
//! let registry = NetworkRegistry::mainnet().unwrap();
//! let bitcoin = registry.descriptor(Chain::Bitcoin).unwrap();
//! assert_eq!(bitcoin.providers.len(), 2); // mempool.space, then blockstream.info
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use sbtcscan::{Chain, FeeTierThresholds, Network, NetworkRegistryBuilder};
//! use std::time::Duration;
//!
//! let registry = NetworkRegistryBuilder::new(Network::Testnet)
//!     .provider_urls(Chain::Stacks, ["http://localhost:3999"])
//!     .fee_tiers(Chain::Bitcoin, FeeTierThresholds::new(0.0002, 0.001))
//!     .http_timeout(Duration::from_secs(5))
//!     .build()
//!     .unwrap();
//! assert_eq!(registry.http().timeout, Duration::from_secs(5));
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::errors::ConfigError;
use crate::types::amount::Decimals;
use crate::types::chain::{Chain, ChainFamily, Network};
use crate::types::fees::FeeTierThresholds;

pub mod constants;

use constants::{endpoints, prices, seed_heights};

/// One upstream HTTP provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderEndpoint {
    /// Short name used in logs, e.g. `mempool.space`
    pub name: String,
    /// Base URL without trailing slash; path templates are appended to it
    pub base_url: Url,
}

impl ProviderEndpoint {
    /// Base URL as a string with any trailing slash removed
    pub fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

/// Static configuration of one chain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    pub chain: Chain,
    pub display_name: String,
    /// Providers in the order they are attempted
    pub providers: Vec<ProviderEndpoint>,
    pub explorer_url: Url,
    /// Presentation color tag (hex)
    pub color: String,
    pub features: Vec<String>,
    pub native_symbol: String,
    pub decimals: Decimals,
    pub fee_tiers: FeeTierThresholds,
    /// sBTC principals for the active network (Stacks only)
    pub sbtc_contracts: Vec<String>,
    /// Height the fallback synthesizer starts from
    pub seed_height: u64,
}

/// Settings for the outbound request helper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Per-request timeout
    pub timeout: Duration,
    /// When set, requests are sent as `GET {proxy}?url={target}`
    pub proxy_url: Option<Url>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(constants::DEFAULT_HTTP_TIMEOUT_SECS),
            proxy_url: None,
        }
    }
}

/// USD conversion rates
///
/// These are static configuration, not a live feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSettings {
    pub btc_usd: f64,
    pub stx_usd: f64,
}

impl Default for PriceSettings {
    fn default() -> Self {
        Self {
            btc_usd: prices::BTC_USD,
            stx_usd: prices::STX_USD,
        }
    }
}

impl PriceSettings {
    /// USD price of the native unit of `chain`
    ///
    /// Sidechain coins are pegged 1:1 to BTC.
    pub fn native_usd(&self, chain: Chain) -> f64 {
        match chain.family() {
            ChainFamily::Stacks => self.stx_usd,
            ChainFamily::Bitcoin | ChainFamily::Sidechain => self.btc_usd,
        }
    }
}

/// Immutable registry of network descriptors
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    network: Network,
    descriptors: BTreeMap<Chain, NetworkDescriptor>,
    http: HttpSettings,
    prices: PriceSettings,
}

impl NetworkRegistry {
    /// Mainnet defaults for every chain
    pub fn mainnet() -> Result<Self, ConfigError> {
        NetworkRegistryBuilder::new(Network::Mainnet).build()
    }

    /// Testnet defaults for every chain
    pub fn testnet() -> Result<Self, ConfigError> {
        NetworkRegistryBuilder::new(Network::Testnet).build()
    }

    /// Build from process environment (and `.env` if present)
    ///
    /// Recognized variables:
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `SBTCSCAN_NETWORK` | `mainnet` (default) or `testnet` |
    /// | `BITCOIN_API_URLS` | comma-separated Esplora base URLs, in fallback order |
    /// | `STACKS_API_URL` | Hiro API base URL |
    /// | `THUNDER_API_URL`, `ZSIDE_API_URL`, `BITNAMES_API_URL` | sidechain base URLs |
    /// | `SBTC_CONTRACTS` | comma-separated sBTC principals |
    /// | `HTTP_PROXY_URL` | proxy endpoint for browser-style forwarding |
    /// | `HTTP_TIMEOUT_SECS` | request timeout |
    /// | `BTC_USD_PRICE`, `STX_USD_PRICE` | USD conversion rates |
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by [`Self::from_env`] and tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let network = match lookup("SBTCSCAN_NETWORK") {
            Some(value) => value
                .parse::<Network>()
                .map_err(|source| ConfigError::UnknownName {
                    key: "SBTCSCAN_NETWORK".to_string(),
                    source,
                })?,
            None => Network::Mainnet,
        };

        let mut builder = NetworkRegistryBuilder::new(network);

        if let Some(urls) = lookup("BITCOIN_API_URLS") {
            builder = builder.provider_urls(Chain::Bitcoin, split_list(&urls));
        }
        if let Some(url) = lookup("STACKS_API_URL") {
            builder = builder.provider_urls(Chain::Stacks, [url]);
        }
        for chain in Chain::SIDECHAINS {
            let key = format!("{}_API_URL", chain.as_str().to_ascii_uppercase());
            if let Some(url) = lookup(&key) {
                builder = builder.provider_urls(chain, [url]);
            }
        }
        if let Some(contracts) = lookup("SBTC_CONTRACTS") {
            builder = builder.sbtc_contracts(split_list(&contracts));
        }
        if let Some(proxy) = lookup("HTTP_PROXY_URL") {
            builder = builder.proxy_url(proxy);
        }
        if let Some(secs) = lookup("HTTP_TIMEOUT_SECS") {
            let secs = secs
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::invalid_number("HTTP_TIMEOUT_SECS", &secs))?;
            builder = builder.http_timeout(Duration::from_secs(secs));
        }
        if let Some(price) = lookup("BTC_USD_PRICE") {
            builder = builder.btc_usd_price(parse_price("BTC_USD_PRICE", &price)?);
        }
        if let Some(price) = lookup("STX_USD_PRICE") {
            builder = builder.stx_usd_price(parse_price("STX_USD_PRICE", &price)?);
        }

        builder.build()
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn descriptor(&self, chain: Chain) -> Option<&NetworkDescriptor> {
        self.descriptors.get(&chain)
    }

    /// Configured chains, in [`Chain`] order
    pub fn chains(&self) -> impl Iterator<Item = Chain> + '_ {
        self.descriptors.keys().copied()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.descriptors.values()
    }

    pub fn http(&self) -> &HttpSettings {
        &self.http
    }

    pub fn prices(&self) -> &PriceSettings {
        &self.prices
    }

    /// sBTC principals for the active network (empty if Stacks is not configured)
    pub fn sbtc_contracts(&self) -> &[String] {
        self.descriptor(Chain::Stacks)
            .map(|d| d.sbtc_contracts.as_slice())
            .unwrap_or(&[])
    }
}

/// Unvalidated descriptor kept by the builder
#[derive(Debug, Clone)]
struct DescriptorDraft {
    display_name: String,
    providers: Vec<(String, String)>,
    explorer_url: String,
    color: String,
    features: Vec<String>,
    native_symbol: String,
    decimals: Decimals,
    fee_tiers: FeeTierThresholds,
    sbtc_contracts: Vec<String>,
    seed_height: u64,
}

/// Builder for [`NetworkRegistry`]
///
/// Starts from the defaults for the chosen network; every setter overrides one
/// piece. URLs are validated in [`NetworkRegistryBuilder::build`].
#[derive(Debug, Clone)]
pub struct NetworkRegistryBuilder {
    network: Network,
    drafts: BTreeMap<Chain, DescriptorDraft>,
    http_timeout: Duration,
    proxy_url: Option<String>,
    prices: PriceSettings,
}

impl NetworkRegistryBuilder {
    /// Create a builder with defaults for `network`
    pub fn new(network: Network) -> Self {
        let drafts = Chain::ALL
            .into_iter()
            .map(|chain| (chain, default_draft(chain, network)))
            .collect();

        Self {
            network,
            drafts,
            http_timeout: Duration::from_secs(constants::DEFAULT_HTTP_TIMEOUT_SECS),
            proxy_url: None,
            prices: PriceSettings::default(),
        }
    }

    /// Replace a chain's providers with bare URLs, named after their host
    pub fn provider_urls<I, S>(mut self, chain: Chain, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(draft) = self.drafts.get_mut(&chain) {
            draft.providers = urls
                .into_iter()
                .map(|url| {
                    let url = url.into();
                    (provider_name(&url), url)
                })
                .collect();
        }
        self
    }

    /// Replace a chain's providers with explicitly named endpoints
    pub fn providers<I, N, U>(mut self, chain: Chain, providers: I) -> Self
    where
        I: IntoIterator<Item = (N, U)>,
        N: Into<String>,
        U: Into<String>,
    {
        if let Some(draft) = self.drafts.get_mut(&chain) {
            draft.providers = providers
                .into_iter()
                .map(|(name, url)| (name.into(), url.into()))
                .collect();
        }
        self
    }

    pub fn fee_tiers(mut self, chain: Chain, thresholds: FeeTierThresholds) -> Self {
        if let Some(draft) = self.drafts.get_mut(&chain) {
            draft.fee_tiers = thresholds;
        }
        self
    }

    pub fn seed_height(mut self, chain: Chain, height: u64) -> Self {
        if let Some(draft) = self.drafts.get_mut(&chain) {
            draft.seed_height = height;
        }
        self
    }

    /// Replace the sBTC principals matched by the classifier
    pub fn sbtc_contracts<I, S>(mut self, contracts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(draft) = self.drafts.get_mut(&Chain::Stacks) {
            draft.sbtc_contracts = contracts.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Drop a chain from the registry entirely
    pub fn without_chain(mut self, chain: Chain) -> Self {
        self.drafts.remove(&chain);
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn btc_usd_price(mut self, price: f64) -> Self {
        self.prices.btc_usd = price;
        self
    }

    pub fn stx_usd_price(mut self, price: f64) -> Self {
        self.prices.stx_usd = price;
        self
    }

    /// Validate and freeze the configuration
    pub fn build(self) -> Result<NetworkRegistry, ConfigError> {
        let mut descriptors = BTreeMap::new();

        for (chain, draft) in self.drafts {
            if draft.providers.is_empty() {
                return Err(ConfigError::NoProviders { chain });
            }
            if !(draft.fee_tiers.low_max < draft.fee_tiers.high_min) {
                return Err(ConfigError::InvalidFeeTiers {
                    chain,
                    low_max: draft.fee_tiers.low_max,
                    high_min: draft.fee_tiers.high_min,
                });
            }

            let providers = draft
                .providers
                .into_iter()
                .map(|(name, url)| {
                    let key = format!("{chain} provider {name}");
                    parse_url(&key, &url).map(|base_url| ProviderEndpoint { name, base_url })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let explorer_url = parse_url(&format!("{chain} explorer"), &draft.explorer_url)?;

            descriptors.insert(
                chain,
                NetworkDescriptor {
                    chain,
                    display_name: draft.display_name,
                    providers,
                    explorer_url,
                    color: draft.color,
                    features: draft.features,
                    native_symbol: draft.native_symbol,
                    decimals: draft.decimals,
                    fee_tiers: draft.fee_tiers,
                    sbtc_contracts: draft.sbtc_contracts,
                    seed_height: draft.seed_height,
                },
            );
        }

        let proxy_url = self
            .proxy_url
            .map(|proxy| parse_url("HTTP_PROXY_URL", &proxy))
            .transpose()?;

        Ok(NetworkRegistry {
            network: self.network,
            descriptors,
            http: HttpSettings {
                timeout: self.http_timeout,
                proxy_url,
            },
            prices: self.prices,
        })
    }
}

fn default_draft(chain: Chain, network: Network) -> DescriptorDraft {
    let testnet = network == Network::Testnet;
    let features = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    match chain {
        Chain::Bitcoin => DescriptorDraft {
            display_name: if testnet { "Bitcoin Testnet" } else { "Bitcoin" }.to_string(),
            providers: if testnet {
                vec![
                    ("mempool.space".into(), endpoints::MEMPOOL_TESTNET.into()),
                    ("blockstream.info".into(), endpoints::BLOCKSTREAM_TESTNET.into()),
                ]
            } else {
                vec![
                    ("mempool.space".into(), endpoints::MEMPOOL_MAINNET.into()),
                    ("blockstream.info".into(), endpoints::BLOCKSTREAM_MAINNET.into()),
                ]
            },
            explorer_url: if testnet {
                endpoints::MEMPOOL_EXPLORER_TESTNET
            } else {
                endpoints::MEMPOOL_EXPLORER_MAINNET
            }
            .to_string(),
            color: "#F7931A".into(),
            features: features(&[
                "blocks",
                "transactions",
                "addresses",
                "mempool",
                "fee-estimates",
            ]),
            native_symbol: "BTC".into(),
            decimals: Decimals::BITCOIN,
            fee_tiers: FeeTierThresholds::BITCOIN,
            sbtc_contracts: Vec::new(),
            seed_height: if testnet {
                seed_heights::BITCOIN_TESTNET
            } else {
                seed_heights::BITCOIN_MAINNET
            },
        },
        Chain::Stacks => DescriptorDraft {
            display_name: if testnet { "Stacks Testnet" } else { "Stacks" }.to_string(),
            providers: vec![(
                "hiro".into(),
                if testnet {
                    endpoints::HIRO_TESTNET
                } else {
                    endpoints::HIRO_MAINNET
                }
                .into(),
            )],
            explorer_url: endpoints::HIRO_EXPLORER.into(),
            color: "#5546FF".into(),
            features: features(&["blocks", "transactions", "addresses", "smart-contracts", "sbtc"]),
            native_symbol: "STX".into(),
            decimals: Decimals::STACKS,
            fee_tiers: FeeTierThresholds::STACKS,
            sbtc_contracts: vec![if testnet {
                constants::sbtc::TESTNET_DEPLOYER
            } else {
                constants::sbtc::MAINNET_DEPLOYER
            }
            .to_string()],
            seed_height: if testnet {
                seed_heights::STACKS_TESTNET
            } else {
                seed_heights::STACKS_MAINNET
            },
        },
        Chain::Thunder | Chain::ZSide | Chain::BitNames => {
            let slot = chain.sidechain_slot().unwrap_or_default();
            let base = format!("http://127.0.0.1:{}", endpoints::sidechain_port(slot));
            let (display_name, color, extra) = match chain {
                Chain::Thunder => ("Thunder", "#FFC107", "payments"),
                Chain::ZSide => ("zSide", "#2E8B57", "shielded-transfers"),
                _ => ("BitNames", "#8A2BE2", "name-registry"),
            };
            DescriptorDraft {
                display_name: display_name.to_string(),
                providers: vec![(format!("{chain}-node"), format!("{base}/api"))],
                explorer_url: base,
                color: color.to_string(),
                features: features(&["blocks", "transactions", "addresses", "two-way-peg", extra]),
                native_symbol: "BTC".into(),
                decimals: Decimals::BITCOIN,
                fee_tiers: FeeTierThresholds::BITCOIN,
                sbtc_contracts: Vec::new(),
                seed_height: seed_heights::SIDECHAIN,
            }
        }
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|e| ConfigError::invalid_url(key, value, e))
}

fn parse_price(key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
        .ok_or_else(|| ConfigError::invalid_number(key, value))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Name a provider after its URL host, falling back to the raw URL
fn provider_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_mainnet_defaults() {
        let registry = NetworkRegistry::mainnet().unwrap();
        assert_eq!(registry.network(), Network::Mainnet);
        assert_eq!(registry.chains().count(), Chain::ALL.len());

        let bitcoin = registry.descriptor(Chain::Bitcoin).unwrap();
        assert_eq!(bitcoin.providers[0].name, "mempool.space");
        assert_eq!(bitcoin.providers[1].name, "blockstream.info");
        assert_eq!(bitcoin.providers[0].base(), "https://mempool.space/api");
        assert_eq!(bitcoin.decimals, Decimals::BITCOIN);

        assert_eq!(
            registry.sbtc_contracts(),
            &[constants::sbtc::MAINNET_DEPLOYER.to_string()]
        );
    }

    #[test]
    fn test_testnet_swaps_contracts_and_urls() {
        let registry = NetworkRegistry::testnet().unwrap();
        assert_eq!(
            registry.sbtc_contracts(),
            &[constants::sbtc::TESTNET_DEPLOYER.to_string()]
        );
        let stacks = registry.descriptor(Chain::Stacks).unwrap();
        assert_eq!(stacks.providers[0].base(), "https://api.testnet.hiro.so");
    }

    #[test]
    fn test_sidechain_defaults_use_slot_ports() {
        let registry = NetworkRegistry::mainnet().unwrap();
        let thunder = registry.descriptor(Chain::Thunder).unwrap();
        assert_eq!(thunder.providers[0].base(), "http://127.0.0.1:6009/api");
        assert_eq!(thunder.native_symbol, "BTC");
    }

    #[test]
    fn test_builder_overrides() {
        let registry = NetworkRegistryBuilder::new(Network::Mainnet)
            .provider_urls(Chain::Bitcoin, ["http://localhost:3000/api"])
            .fee_tiers(Chain::Stacks, FeeTierThresholds::new(0.002, 0.02))
            .btc_usd_price(100_000.0)
            .without_chain(Chain::ZSide)
            .build()
            .unwrap();

        let bitcoin = registry.descriptor(Chain::Bitcoin).unwrap();
        assert_eq!(bitcoin.providers.len(), 1);
        assert_eq!(bitcoin.providers[0].name, "localhost");
        assert_eq!(
            registry.descriptor(Chain::Stacks).unwrap().fee_tiers,
            FeeTierThresholds::new(0.002, 0.02)
        );
        assert_eq!(registry.prices().btc_usd, 100_000.0);
        assert!(registry.descriptor(Chain::ZSide).is_none());
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let result = NetworkRegistryBuilder::new(Network::Mainnet)
            .provider_urls(Chain::Stacks, ["not a url"])
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_builder_rejects_empty_providers() {
        let result = NetworkRegistryBuilder::new(Network::Mainnet)
            .provider_urls(Chain::Bitcoin, Vec::<String>::new())
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::NoProviders {
                chain: Chain::Bitcoin
            })
        ));
    }

    #[test]
    fn test_builder_rejects_crossed_tiers() {
        let result = NetworkRegistryBuilder::new(Network::Mainnet)
            .fee_tiers(Chain::Bitcoin, FeeTierThresholds::new(0.01, 0.001))
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidFeeTiers { .. })));
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SBTCSCAN_NETWORK", "testnet"),
            (
                "BITCOIN_API_URLS",
                "http://one.example/api, http://two.example/api",
            ),
            ("HTTP_PROXY_URL", "http://localhost:8080/api/proxy"),
            ("HTTP_TIMEOUT_SECS", "3"),
            ("STX_USD_PRICE", "2.5"),
        ]);
        let registry =
            NetworkRegistry::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(registry.network(), Network::Testnet);
        let bitcoin = registry.descriptor(Chain::Bitcoin).unwrap();
        assert_eq!(bitcoin.providers.len(), 2);
        assert_eq!(bitcoin.providers[1].name, "two.example");
        assert_eq!(registry.http().timeout, Duration::from_secs(3));
        assert_eq!(
            registry.http().proxy_url.as_ref().unwrap().as_str(),
            "http://localhost:8080/api/proxy"
        );
        assert_eq!(registry.prices().stx_usd, 2.5);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let bad_network = NetworkRegistry::from_lookup(|key| {
            (key == "SBTCSCAN_NETWORK").then(|| "regtest".to_string())
        });
        assert!(matches!(bad_network, Err(ConfigError::UnknownName { .. })));

        let bad_price = NetworkRegistry::from_lookup(|key| {
            (key == "BTC_USD_PRICE").then(|| "-3".to_string())
        });
        assert!(matches!(bad_price, Err(ConfigError::InvalidNumber { .. })));
    }

    #[test]
    fn test_native_usd() {
        let prices = PriceSettings {
            btc_usd: 50_000.0,
            stx_usd: 2.0,
        };
        assert_eq!(prices.native_usd(Chain::Stacks), 2.0);
        assert_eq!(prices.native_usd(Chain::Thunder), 50_000.0);
    }
}
