//! Well-known principals, endpoints and defaults
//!
//! This module centralizes magic constants used throughout the sbtcscan crate,
//! improving discoverability and maintainability.

/// sBTC deployer principals
///
/// The bridge contracts (`sbtc-token`, `sbtc-deposit`, `sbtc-withdrawal`,
/// `sbtc-registry`) are all deployed by one principal per network, so matching
/// on the principal catches every bridge contract.
pub mod sbtc {
    /// Mainnet sBTC deployer
    pub const MAINNET_DEPLOYER: &str = "SM3VDXK3WZZSA84XXFKAFAF15NNZX32CTSG82JFQ4";

    /// Testnet sBTC deployer
    pub const TESTNET_DEPLOYER: &str = "ST1F7QA2MDF17S807EPA36TSS8AMEFY4KA9TVGWXT";

    /// Mainnet sBTC fungible token asset identifier
    pub const MAINNET_TOKEN_ASSET: &str =
        "SM3VDXK3WZZSA84XXFKAFAF15NNZX32CTSG82JFQ4.sbtc-token::sbtc-token";

    /// Case-insensitive substrings that mark a contract or asset as sBTC-related
    /// even when it is not deployed by a configured principal
    pub const NAME_MARKERS: [&str; 2] = ["sbtc", "wrapped-bitcoin"];
}

/// Default provider base URLs
pub mod endpoints {
    pub const MEMPOOL_MAINNET: &str = "https://mempool.space/api";
    pub const MEMPOOL_TESTNET: &str = "https://mempool.space/testnet/api";
    pub const BLOCKSTREAM_MAINNET: &str = "https://blockstream.info/api";
    pub const BLOCKSTREAM_TESTNET: &str = "https://blockstream.info/testnet/api";

    pub const HIRO_MAINNET: &str = "https://api.hiro.so";
    pub const HIRO_TESTNET: &str = "https://api.testnet.hiro.so";

    pub const MEMPOOL_EXPLORER_MAINNET: &str = "https://mempool.space";
    pub const MEMPOOL_EXPLORER_TESTNET: &str = "https://mempool.space/testnet";
    pub const HIRO_EXPLORER: &str = "https://explorer.hiro.so";

    /// Local REST port for a BIP300 sidechain node: `6000 + slot`
    pub const fn sidechain_port(slot: u8) -> u16 {
        6000 + slot as u16
    }
}

/// Heights the fallback synthesizer starts from when no live height is known
pub mod seed_heights {
    pub const BITCOIN_MAINNET: u64 = 870_000;
    pub const BITCOIN_TESTNET: u64 = 3_000_000;
    pub const STACKS_MAINNET: u64 = 1_900_000;
    pub const STACKS_TESTNET: u64 = 250_000;
    pub const SIDECHAIN: u64 = 12_000;
}

/// Example USD prices used when no price is configured
pub mod prices {
    pub const BTC_USD: f64 = 65_000.0;
    pub const STX_USD: f64 = 1.80;
}

/// Largest page an adapter serves in one call
pub const MAX_PAGE_LIMIT: usize = 100;

/// Default HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
