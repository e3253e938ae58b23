use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde::Serialize;
use tracing::info;

use crate::{Chain, Explorer, Network, NetworkRegistry};

/// Command-line interface of the `sbtcscan` binary
#[derive(Debug, Parser)]
#[command(author, version, about = "Bitcoin, Stacks and sidechain explorer with sBTC insights")]
pub struct Cli {
    /// Network to query; overrides SBTCSCAN_NETWORK
    #[arg(long, global = true)]
    pub network: Option<Network>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify a transaction id, address or free-text query and look it up
    Search {
        query: String,
        /// Chain the query was entered in
        #[arg(long, default_value = "bitcoin")]
        chain: Chain,
    },
    /// Recent blocks, recent transactions and stats for one chain
    Overview {
        chain: Chain,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Stats for every configured chain
    Stats,
}

/// Main entry point for the application.
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    execute(Cli::parse()).await
}

/// Run one parsed command and print its result as pretty JSON
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let network = cli.network.map(|n| n.as_str().to_string());
    let registry = NetworkRegistry::from_lookup(|key| match (key, &network) {
        ("SBTCSCAN_NETWORK", Some(network)) => Some(network.clone()),
        _ => dotenvy::var(key).ok(),
    })?;
    info!(network = %registry.network(), "Loaded network registry");

    let explorer = Explorer::new(Arc::new(registry))?;

    match cli.command {
        Command::Search { query, chain } => print_json(&explorer.search(&query, chain).await?),
        Command::Overview { chain, limit } => print_json(&explorer.overview(chain, limit).await?),
        Command::Stats => print_json(&explorer.network_stats().await?),
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search_with_chain() {
        let cli =
            Cli::try_parse_from(["sbtcscan", "search", "SP000", "--chain", "stacks"]).unwrap();
        match cli.command {
            Command::Search { query, chain } => {
                assert_eq!(query, "SP000");
                assert_eq!(chain, Chain::Stacks);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(cli.network.is_none());
    }

    #[test]
    fn test_parse_overview_defaults() {
        let cli = Cli::try_parse_from([
            "sbtcscan",
            "overview",
            "thunder",
            "--network",
            "testnet",
        ])
        .unwrap();
        assert_eq!(cli.network, Some(Network::Testnet));
        match cli.command {
            Command::Overview { chain, limit } => {
                assert_eq!(chain, Chain::Thunder);
                assert_eq!(limit, 10);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_chain_is_rejected() {
        assert!(Cli::try_parse_from(["sbtcscan", "overview", "ethereum"]).is_err());
    }
}
