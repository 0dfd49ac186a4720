//! Per-chain network descriptors.
//!
//! A [`NetworkDescriptor`] carries everything the frontend and the operator
//! tooling need to target one chain: display metadata, RPC endpoints, the
//! block explorer and the addresses of the contracts deployed there.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Native currency of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    /// Currency name (e.g. "Ether")
    pub name: String,
    /// Ticker symbol (e.g. "ETH")
    pub symbol: String,
    /// Number of decimals, 18 on every EVM chain we target
    pub decimals: u8,
}

impl NativeCurrency {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Ether with 18 decimals.
    pub fn ether() -> Self {
        Self::new("Ether", "ETH", 18)
    }
}

/// Logical name of a contract that may be deployed on a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractName {
    FactoryAddressV1,
    FactoryAddressV2,
    FactoryAddressV3,
    FactoryAddressV4,
    RouterAddress,
    MulticallAddress,
}

impl ContractName {
    /// Every contract name, factories first in version order.
    pub const ALL: [Self; 6] = [
        Self::FactoryAddressV1,
        Self::FactoryAddressV2,
        Self::FactoryAddressV3,
        Self::FactoryAddressV4,
        Self::RouterAddress,
        Self::MulticallAddress,
    ];

    /// The configuration key for this contract.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FactoryAddressV1 => "FACTORY_ADDRESS_V1",
            Self::FactoryAddressV2 => "FACTORY_ADDRESS_V2",
            Self::FactoryAddressV3 => "FACTORY_ADDRESS_V3",
            Self::FactoryAddressV4 => "FACTORY_ADDRESS_V4",
            Self::RouterAddress => "ROUTER_ADDRESS",
            Self::MulticallAddress => "MULTICALL_ADDRESS",
        }
    }

    /// Factory version for factory contracts, `None` for helpers.
    pub const fn factory_version(&self) -> Option<u8> {
        match self {
            Self::FactoryAddressV1 => Some(1),
            Self::FactoryAddressV2 => Some(2),
            Self::FactoryAddressV3 => Some(3),
            Self::FactoryAddressV4 => Some(4),
            Self::RouterAddress | Self::MulticallAddress => None,
        }
    }
}

impl fmt::Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown contract name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown contract name: {0}")]
pub struct UnknownContractName(pub String);

impl FromStr for ContractName {
    type Err = UnknownContractName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownContractName(s.to_string()))
    }
}

/// Configuration of a single chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    /// Chain ID
    pub chain_id: u64,
    /// Display name
    pub name: String,
    /// Native currency metadata
    pub native_currency: NativeCurrency,
    /// RPC endpoints, the first one is the default.
    ///
    /// Empty for display-only networks, which cannot be switched to or added
    /// to a wallet.
    pub rpc_urls: Vec<String>,
    /// Block explorer base URL
    pub block_explorer_url: Option<String>,
    /// Whether this is a test network
    pub is_testnet: bool,
    /// Deployed contract addresses, a missing key means "not deployed here"
    pub contracts: BTreeMap<ContractName, Address>,
}

impl NetworkDescriptor {
    /// Address of a named contract on this network.
    pub fn contract(&self, name: ContractName) -> Option<Address> {
        self.contracts.get(&name).copied()
    }

    /// Default RPC endpoint.
    pub fn default_rpc_url(&self) -> Option<&str> {
        self.rpc_urls.first().map(String::as_str)
    }

    /// A descriptor without RPC endpoints can be displayed but not targeted.
    pub fn is_display_only(&self) -> bool {
        self.rpc_urls.is_empty()
    }

    /// The newest factory deployed on this network.
    pub fn latest_factory(&self) -> Option<(ContractName, Address)> {
        self.contracts
            .iter()
            .filter(|(name, _)| name.factory_version().is_some())
            .max_by_key(|(name, _)| name.factory_version())
            .map(|(name, address)| (*name, *address))
    }

    /// Hex-encoded chain id as wallets expect it (`0x61` for 97).
    pub fn hex_chain_id(&self) -> String {
        hex_chain_id(self.chain_id)
    }
}

/// Format a chain id the way EIP-3085/EIP-3326 request parameters expect.
pub fn hex_chain_id(chain_id: u64) -> String {
    format!("{chain_id:#x}")
}

/// Builder for descriptors assembled in code rather than loaded from TOML.
#[derive(Debug, Clone)]
pub struct NetworkDescriptorBuilder {
    descriptor: NetworkDescriptor,
}

impl NetworkDescriptorBuilder {
    /// Start a descriptor with Ether as native currency and no endpoints.
    pub fn new(chain_id: u64, name: impl Into<String>) -> Self {
        Self {
            descriptor: NetworkDescriptor {
                chain_id,
                name: name.into(),
                native_currency: NativeCurrency::ether(),
                rpc_urls: Vec::new(),
                block_explorer_url: None,
                is_testnet: false,
                contracts: BTreeMap::new(),
            },
        }
    }

    pub fn native_currency(mut self, currency: NativeCurrency) -> Self {
        self.descriptor.native_currency = currency;
        self
    }

    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.descriptor.rpc_urls.push(url.into());
        self
    }

    pub fn block_explorer_url(mut self, url: impl Into<String>) -> Self {
        self.descriptor.block_explorer_url = Some(url.into());
        self
    }

    pub const fn testnet(mut self, is_testnet: bool) -> Self {
        self.descriptor.is_testnet = is_testnet;
        self
    }

    pub fn contract(mut self, name: ContractName, address: Address) -> Self {
        self.descriptor.contracts.insert(name, address);
        self
    }

    pub fn build(self) -> NetworkDescriptor {
        self.descriptor
    }
}
