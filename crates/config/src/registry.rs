//! Process-wide table of network descriptors.
//!
//! The registry is built once at startup and is read-only afterwards. Lookups
//! that can legitimately miss (an unregistered chain, a contract that is not
//! deployed on a chain) return [`LookupError`]; display helpers such as
//! [`NetworkRegistry::explorer_url`] never fail and fall back to documented
//! defaults instead.

use crate::network::{ContractName, NetworkDescriptor};
use alloy_primitives::{Address, TxHash};
use std::collections::BTreeMap;
use thiserror::Error;

/// Explorer used when a chain is unknown or has no explorer configured.
pub const DEFAULT_EXPLORER_URL: &str = "https://etherscan.io";

/// Currency symbol shown when a chain is unknown.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "ETH";

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two descriptors share a chain id
    #[error("duplicate chain id {0}")]
    DuplicateChainId(u64),

    /// Chain id zero is reserved
    #[error("invalid chain id {0}")]
    InvalidChainId(u64),

    /// A contract is stored as the zero address instead of being left out
    #[error("chain {chain_id}: {contract} is the zero address")]
    ZeroAddress {
        chain_id: u64,
        contract: ContractName,
    },
}

/// Expected lookup misses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The chain has no registered descriptor
    #[error("network {0} is not registered")]
    NotFound(u64),

    /// The chain is unknown or does not host the requested contract
    #[error("{contract} is not configured on network {chain_id}")]
    NotConfigured {
        chain_id: u64,
        contract: ContractName,
    },
}

/// Read-only registry of network descriptors keyed by chain id.
#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry {
    networks: BTreeMap<u64, NetworkDescriptor>,
}

impl NetworkRegistry {
    /// Build a registry, failing on the first invalid or duplicate descriptor.
    pub fn new(
        descriptors: impl IntoIterator<Item = NetworkDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut networks = BTreeMap::new();

        for descriptor in descriptors {
            if descriptor.chain_id == 0 {
                return Err(RegistryError::InvalidChainId(descriptor.chain_id));
            }

            if let Some((contract, _)) = descriptor
                .contracts
                .iter()
                .find(|(_, address)| address.is_zero())
            {
                return Err(RegistryError::ZeroAddress {
                    chain_id: descriptor.chain_id,
                    contract: *contract,
                });
            }

            if networks.contains_key(&descriptor.chain_id) {
                return Err(RegistryError::DuplicateChainId(descriptor.chain_id));
            }
            networks.insert(descriptor.chain_id, descriptor);
        }

        Ok(Self { networks })
    }

    /// Descriptor for a chain.
    pub fn resolve(&self, chain_id: u64) -> Result<&NetworkDescriptor, LookupError> {
        self.networks
            .get(&chain_id)
            .ok_or(LookupError::NotFound(chain_id))
    }

    /// Address of a named contract on a chain.
    ///
    /// Returns [`LookupError::NotConfigured`] both for unknown chains and for
    /// chains that do not host the contract. The zero address is never
    /// returned.
    pub fn contract_address(
        &self,
        chain_id: u64,
        contract: ContractName,
    ) -> Result<Address, LookupError> {
        self.networks
            .get(&chain_id)
            .and_then(|network| network.contract(contract))
            .ok_or(LookupError::NotConfigured { chain_id, contract })
    }

    /// Explorer base URL, or [`DEFAULT_EXPLORER_URL`].
    pub fn explorer_url(&self, chain_id: u64) -> &str {
        self.networks
            .get(&chain_id)
            .and_then(|network| network.block_explorer_url.as_deref())
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_EXPLORER_URL)
    }

    /// Explorer page for an account or contract.
    pub fn explorer_address_url(&self, chain_id: u64, address: Address) -> String {
        format!(
            "{}/address/{}",
            self.explorer_url(chain_id).trim_end_matches('/'),
            address
        )
    }

    /// Explorer page for a transaction.
    pub fn explorer_tx_url(&self, chain_id: u64, tx_hash: TxHash) -> String {
        format!(
            "{}/tx/{}",
            self.explorer_url(chain_id).trim_end_matches('/'),
            tx_hash
        )
    }

    /// Native currency symbol, or [`DEFAULT_CURRENCY_SYMBOL`].
    pub fn currency_symbol(&self, chain_id: u64) -> &str {
        self.networks
            .get(&chain_id)
            .map(|network| network.native_currency.symbol.as_str())
            .filter(|symbol| !symbol.is_empty())
            .unwrap_or(DEFAULT_CURRENCY_SYMBOL)
    }

    /// All networks in ascending chain id order.
    pub fn networks(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.networks.values()
    }

    pub fn testnets(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.networks().filter(|network| network.is_testnet)
    }

    pub fn mainnets(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.networks().filter(|network| !network.is_testnet)
    }

    /// Networks on which `contract` is configured.
    pub fn supporting(&self, contract: ContractName) -> impl Iterator<Item = &NetworkDescriptor> {
        self.networks()
            .filter(move |network| network.contracts.contains_key(&contract))
    }

    pub fn contains(&self, chain_id: u64) -> bool {
        self.networks.contains_key(&chain_id)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
