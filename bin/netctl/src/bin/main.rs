//! Operator CLI for the token factory network registry.
//!
//! - `networks`: list registered networks
//! - `show`: print one network's descriptor
//! - `address`: print a contract address on a network
//! - `explorer`: print explorer links
//! - `switch`: ask a wallet to switch (or add) a network
//! - `status`: check a network's RPC endpoint and deployed contracts

use alloy_primitives::{Address, TxHash};
use clap::{Parser, Subcommand};
use config::{ContractName, NetworkRegistry};
use netctl::{
    check_network_status, format_network, format_network_line, format_report, load_registry,
    parse_address_arg, parse_tx_hash_arg, settings::Settings, switch_network, utf8_vars,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "netctl")]
#[command(about = "Inspect token factory networks and switch wallets between them")]
struct Cli {
    /// Path to the netctl settings file (defaults to ./netctl.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network table replacing the built-in one
    #[arg(short, long, env = "NETWORKS_FILE")]
    networks: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered networks
    Networks {
        /// Only test networks
        #[arg(long, conflicts_with = "mainnets")]
        testnets: bool,

        /// Only production networks
        #[arg(long)]
        mainnets: bool,

        /// Only networks hosting this contract (e.g. FACTORY_ADDRESS_V4)
        #[arg(long)]
        supporting: Option<ContractName>,
    },

    /// Show a network's configuration
    Show {
        chain_id: u64,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a contract address (e.g. FACTORY_ADDRESS_V4)
    Address {
        chain_id: u64,
        contract: ContractName,
    },

    /// Print explorer links
    Explorer {
        chain_id: u64,

        /// Link to an account or contract page
        #[arg(long, value_parser = parse_address_arg, conflicts_with = "tx")]
        address: Option<Address>,

        /// Link to a transaction page
        #[arg(long, value_parser = parse_tx_hash_arg)]
        tx: Option<TxHash>,
    },

    /// Ask the wallet to switch to a network, adding it if needed
    Switch {
        chain_id: u64,

        /// Wallet JSON-RPC endpoint
        #[arg(long, env = "WALLET_URL")]
        wallet_url: Option<String>,
    },

    /// Check the RPC endpoint and deployed contracts of a network
    Status {
        chain_id: u64,

        /// RPC endpoint to use instead of the network's default
        #[arg(long)]
        rpc_url: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let settings = Settings::load(cli.config.as_deref())?;
    let networks = cli.networks.clone().or_else(|| settings.networks.clone());
    if let Some(path) = &networks {
        info!("Loading network table: {}", path.display());
    }

    let registry = load_registry(networks.as_deref(), utf8_vars(std::env::vars_os()))?;

    match cli.command {
        Command::Networks {
            testnets,
            mainnets,
            supporting,
        } => {
            let selected: Vec<_> = match supporting {
                Some(contract) => registry.supporting(contract).collect(),
                None => registry.networks().collect(),
            };

            for network in selected
                .into_iter()
                .filter(|n| !testnets || n.is_testnet)
                .filter(|n| !mainnets || !n.is_testnet)
            {
                println!("{}", format_network_line(network));
            }
        }
        Command::Show { chain_id, json } => {
            let network = registry.resolve(chain_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(network)?);
            } else {
                print!("{}", format_network(&registry, network));
            }
        }
        Command::Address { chain_id, contract } => {
            let address = registry.contract_address(chain_id, contract)?;
            println!("{address}");
        }
        Command::Explorer {
            chain_id,
            address,
            tx,
        } => {
            warn_if_unregistered(&registry, chain_id);

            match (address, tx) {
                (Some(address), _) => {
                    println!("{}", registry.explorer_address_url(chain_id, address));
                }
                (None, Some(tx)) => println!("{}", registry.explorer_tx_url(chain_id, tx)),
                (None, None) => println!("{}", registry.explorer_url(chain_id)),
            }
        }
        Command::Switch {
            chain_id,
            wallet_url,
        } => {
            let wallet_url = wallet_url.or(settings.wallet_url);
            info!(chain_id, "Requesting network switch");

            switch_network(&registry, wallet_url.as_deref(), chain_id)
                .await
                .map_err(|e| eyre::eyre!("switch to {} failed: {}", chain_id, e.reason()))?;

            println!(
                "switched to {} ({})",
                chain_id,
                registry
                    .resolve(chain_id)
                    .map(|n| n.name.as_str())
                    .unwrap_or("unregistered network")
            );
        }
        Command::Status {
            chain_id,
            rpc_url,
            json,
        } => {
            info!(chain_id, "Checking network status");

            let report = check_network_status(&registry, chain_id, rpc_url.as_deref()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", format_report(&registry, &report));
            }

            if !report.is_healthy() {
                eyre::bail!("network {} is not healthy", chain_id);
            }
        }
    }

    Ok(())
}

fn warn_if_unregistered(registry: &NetworkRegistry, chain_id: u64) {
    if !registry.contains(chain_id) {
        warn!(chain_id, "Network not registered, using default explorer");
    }
}
