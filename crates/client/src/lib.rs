//! RPC and wallet clients.
//!
//! - [`create_provider`] builds a read-only provider for a network's RPC endpoint
//! - [`Wallet`] is the injected wallet capability, [`RpcWallet`] reaches one over JSON-RPC
//! - [`request_switch`] runs the switch-then-add network protocol against a wallet

mod rpc_wallet;
pub mod switch;
pub mod wallet;

use alloy_provider::{Provider, ProviderBuilder};
use config::{LookupError, NetworkRegistry};
pub use rpc_wallet::RpcWallet;
pub use switch::{request_switch, SwitchError};
use thiserror::Error;
pub use wallet::{AddChainParameter, SwitchChainParameter, Wallet, WalletRpcError};

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// The network is unknown to the registry
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The network has no RPC endpoint configured
    #[error("Network {0} has no RPC endpoint")]
    NoRpcEndpoint(u64),
}

/// Convenience function to create an ethereum rpc provider from url.
pub fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

/// Create a provider for the default RPC endpoint of a registered network.
pub fn create_network_provider(
    registry: &NetworkRegistry,
    chain_id: u64,
) -> Result<impl Provider + Clone, ClientError> {
    let network = registry.resolve(chain_id)?;
    let rpc_url = network
        .default_rpc_url()
        .ok_or(ClientError::NoRpcEndpoint(chain_id))?;

    create_provider(rpc_url)
}
