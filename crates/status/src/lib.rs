//! Deployment status checks for configured networks.
//!
//! This crate replaces the ad hoc "check-status" scripts: it asks a network's
//! RPC endpoint which chain it serves and inspects every contract the
//! registry lists for that network (bytecode present, current owner, proxy
//! implementation).

pub mod probe;

use alloy_primitives::Address;
use config::{ContractName, NetworkDescriptor};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

/// On-chain state of one configured contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStatus {
    /// Registry name of the contract
    pub contract: ContractName,
    /// Configured address
    pub address: Address,
    /// Size of the deployed bytecode, zero if nothing is deployed
    pub code_size: usize,
    /// Result of `owner()`, if the contract is Ownable
    pub owner: Option<Address>,
    /// ERC-1967 implementation, if the contract is a proxy
    pub implementation: Option<Address>,
}

impl ContractStatus {
    pub const fn is_deployed(&self) -> bool {
        self.code_size > 0
    }
}

/// Status of a whole network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkReport {
    /// Chain id the registry expects
    pub chain_id: u64,
    /// Chain id reported by the RPC endpoint
    pub rpc_chain_id: u64,
    /// Network display name
    pub name: String,
    /// Status of every configured contract
    pub contracts: Vec<ContractStatus>,
}

impl NetworkReport {
    /// Check every contract configured for a network.
    pub async fn collect<P>(probe: &P, network: &NetworkDescriptor) -> eyre::Result<Self>
    where
        P: Probe,
    {
        let rpc_chain_id = probe.chain_id().await?;
        debug!(
            "Collecting status: network={}, expected={}, rpc={}",
            network.name, network.chain_id, rpc_chain_id
        );

        let mut contracts = Vec::with_capacity(network.contracts.len());
        for (contract, address) in &network.contracts {
            contracts.push(probe.contract_status(*contract, *address).await?);
        }

        Ok(Self {
            chain_id: network.chain_id,
            rpc_chain_id,
            name: network.name.clone(),
            contracts,
        })
    }

    pub const fn chain_id_matches(&self) -> bool {
        self.chain_id == self.rpc_chain_id
    }

    /// Configured contracts without bytecode.
    pub fn missing(&self) -> impl Iterator<Item = &ContractStatus> {
        self.contracts.iter().filter(|status| !status.is_deployed())
    }

    /// The endpoint serves the expected chain and every contract is deployed.
    pub fn is_healthy(&self) -> bool {
        self.chain_id_matches() && self.missing().next().is_none()
    }
}

/// Read-only view of a network used by status checks.
pub trait Probe: Send + Sync {
    /// Chain id reported by the endpoint.
    fn chain_id(&self) -> impl Future<Output = eyre::Result<u64>> + Send;

    /// Inspect a single contract.
    fn contract_status(
        &self,
        contract: ContractName,
        address: Address,
    ) -> impl Future<Output = eyre::Result<ContractStatus>> + Send;
}
