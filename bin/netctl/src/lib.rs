pub mod settings;

use alloy_primitives::{Address, TxHash};
use client::{request_switch, RpcWallet, SwitchError, Wallet};
use config::{NetworkDescriptor, NetworkRegistry, NetworksFile};
use status::{probe::StatusProbe, NetworkReport};
use std::{ffi::OsString, fmt::Write, path::Path};

/// Load the network table and apply `NETWORK_*` overrides from `vars`.
pub fn load_registry<I>(networks: Option<&Path>, vars: I) -> eyre::Result<NetworkRegistry>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut file = match networks {
        Some(path) => NetworksFile::from_file(path)?,
        None => NetworksFile::builtin()?,
    };
    file.apply_overrides(vars);

    Ok(file.into_registry()?)
}

/// Keep the variables whose name and value are valid UTF-8.
pub fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

/// Ask the wallet behind `wallet_url` to switch to `chain_id`.
pub async fn switch_network(
    registry: &NetworkRegistry,
    wallet_url: Option<&str>,
    chain_id: u64,
) -> Result<(), SwitchError> {
    let wallet = wallet_url.map(RpcWallet::new);
    request_switch(
        wallet.as_ref().map(|wallet| wallet as &dyn Wallet),
        registry,
        chain_id,
    )
    .await
}

/// Check a network's RPC endpoint and configured contracts.
///
/// Uses `rpc_url` if given, otherwise the network's default endpoint.
pub async fn check_network_status(
    registry: &NetworkRegistry,
    chain_id: u64,
    rpc_url: Option<&str>,
) -> eyre::Result<NetworkReport> {
    let network = registry.resolve(chain_id)?;

    match rpc_url {
        Some(url) => {
            let probe = StatusProbe::new(client::create_provider(url)?);
            NetworkReport::collect(&probe, network).await
        }
        None => {
            let probe = StatusProbe::new(client::create_network_provider(registry, chain_id)?);
            NetworkReport::collect(&probe, network).await
        }
    }
}

/// One line per network for `netctl networks`.
pub fn format_network_line(network: &NetworkDescriptor) -> String {
    let factories: Vec<String> = network
        .contracts
        .keys()
        .filter_map(|name| name.factory_version())
        .map(|version| format!("V{version}"))
        .collect();

    format!(
        "{:>9}  {:<18} {:<6} {:<8} factories: {}",
        network.chain_id,
        network.name,
        network.native_currency.symbol,
        if network.is_testnet { "testnet" } else { "mainnet" },
        if factories.is_empty() {
            "-".to_string()
        } else {
            factories.join(",")
        }
    )
}

/// Full description for `netctl show`.
pub fn format_network(registry: &NetworkRegistry, network: &NetworkDescriptor) -> String {
    let mut out = String::new();
    let kind = if network.is_testnet { "testnet" } else { "mainnet" };
    let currency = &network.native_currency;

    writeln!(out, "{} (chain {}, {kind})", network.name, network.chain_id).ok();
    writeln!(
        out,
        "  currency:  {} ({}, {} decimals)",
        currency.symbol, currency.name, currency.decimals
    ).ok();

    if network.is_display_only() {
        writeln!(out, "  rpc:       - (display only)").ok();
    }
    for (i, url) in network.rpc_urls.iter().enumerate() {
        let label = if i == 0 { "rpc:" } else { "" };
        writeln!(out, "  {label:<10} {url}").ok();
    }

    writeln!(out, "  explorer:  {}", registry.explorer_url(network.chain_id)).ok();

    if network.contracts.is_empty() {
        writeln!(out, "  contracts: -").ok();
    } else {
        writeln!(out, "  contracts:").ok();
        for (name, address) in &network.contracts {
            writeln!(out, "    {:<20} {address}", name.as_str()).ok();
        }
    }

    out
}

/// Human readable status report for `netctl status`.
pub fn format_report(registry: &NetworkRegistry, report: &NetworkReport) -> String {
    let mut out = String::new();

    writeln!(out, "{} (chain {})", report.name, report.chain_id).ok();
    if report.chain_id_matches() {
        writeln!(out, "  rpc chain id: {} ok", report.rpc_chain_id).ok();
    } else {
        writeln!(
            out,
            "  rpc chain id: {} MISMATCH (expected {})",
            report.rpc_chain_id, report.chain_id
        ).ok();
    }

    for status in &report.contracts {
        let state = if status.is_deployed() {
            format!("{} bytes", status.code_size)
        } else {
            "NO CODE".to_string()
        };
        writeln!(
            out,
            "  {:<20} {}  {state}",
            status.contract.as_str(),
            status.address
        ).ok();
        if let Some(owner) = status.owner {
            writeln!(out, "    owner:          {owner}").ok();
        }
        if let Some(implementation) = status.implementation {
            writeln!(out, "    implementation: {implementation}").ok();
        }
        writeln!(
            out,
            "    explorer:       {}",
            registry.explorer_address_url(report.chain_id, status.address)
        ).ok();
    }

    out
}

/// Parse a `0x`-prefixed address argument.
pub fn parse_address_arg(value: &str) -> Result<Address, String> {
    match config::parse_address(value)? {
        Some(address) => Ok(address),
        None => Err("zero or empty address".to_string()),
    }
}

/// Parse a `0x`-prefixed transaction hash argument.
pub fn parse_tx_hash_arg(value: &str) -> Result<TxHash, String> {
    value.parse().map_err(|e| format!("invalid transaction hash: {e}"))
}
