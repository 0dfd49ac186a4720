//! Network configuration for the token factory deployments.
//!
//! This crate provides:
//! - Network descriptors (native currency, RPC endpoints, explorer, contracts)
//! - The read-only [`NetworkRegistry`] with lookup and display helpers
//! - Loading the network table from TOML with environment overrides

pub mod loader;
pub mod network;
pub mod registry;

pub use loader::{parse_address, ConfigError, NetworkEntry, NetworksFile, ENV_PREFIX};
pub use network::{
    hex_chain_id, ContractName, NativeCurrency, NetworkDescriptor, NetworkDescriptorBuilder,
    UnknownContractName,
};
pub use registry::{
    LookupError, NetworkRegistry, RegistryError, DEFAULT_CURRENCY_SYMBOL, DEFAULT_EXPLORER_URL,
};

/// Chain ids of the networks in the built-in table.
pub mod chains {
    pub const MAINNET: u64 = 1;
    pub const BSC: u64 = 56;
    pub const BSC_TESTNET: u64 = 97;
    pub const POLYGON: u64 = 137;
    pub const LOCALHOST: u64 = 31337;
    pub const POLYGON_AMOY: u64 = 80002;
    pub const BASE_SEPOLIA: u64 = 84532;
    pub const ARBITRUM_SEPOLIA: u64 = 421614;
    pub const SEPOLIA: u64 = 11155111;
}
