//! Loading the network table from TOML and the process environment.
//!
//! The on-disk format keeps addresses as strings so that "unset" can be
//! written as an empty string, the way the deployment scripts record it.
//! Unset entries are dropped here and never reach the registry.

use crate::{
    network::{ContractName, NativeCurrency, NetworkDescriptor},
    registry::{NetworkRegistry, RegistryError},
};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Network table shipped with the crate.
const BUILTIN_NETWORKS: &str = include_str!("../networks.toml");

/// Prefix of environment variables that override the network table.
pub const ENV_PREFIX: &str = "NETWORK_";

/// Errors raised while loading network configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse network table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("chain {chain_id}: unknown contract name {name}")]
    UnknownContract { chain_id: u64, name: String },

    #[error("chain {chain_id}: invalid address for {contract} ({value}): {reason}")]
    InvalidAddress {
        chain_id: u64,
        contract: ContractName,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// One `[[network]]` entry as written in the TOML table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEntry {
    pub chain_id: u64,
    pub name: String,
    pub native_currency: NativeCurrency,
    #[serde(default)]
    pub rpc_urls: Vec<String>,
    #[serde(default)]
    pub block_explorer_url: Option<String>,
    #[serde(default)]
    pub is_testnet: bool,
    /// Contract name to address, an empty string means unset
    #[serde(default)]
    pub contracts: BTreeMap<String, String>,
}

/// The network table before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworksFile {
    #[serde(rename = "network", default)]
    pub networks: Vec<NetworkEntry>,
}

impl NetworksFile {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// The table embedded in this crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN_NETWORKS)
    }

    /// Apply `NETWORK_<CHAIN_ID>_<KEY>` overrides.
    ///
    /// Recognized keys are `RPC_URL` (comma separated, replaces the list),
    /// `EXPLORER_URL` and any contract name. An empty value unsets the
    /// explorer or contract. Variables for chains missing from the table are
    /// skipped.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            let Some((chain_id, field)) = parse_override_key(key) else {
                continue;
            };

            let Some(entry) = self.networks.iter_mut().find(|n| n.chain_id == chain_id) else {
                warn!(key, "Ignoring override for unregistered network");
                continue;
            };

            match field {
                "RPC_URL" => {
                    entry.rpc_urls = value
                        .split(',')
                        .map(str::trim)
                        .filter(|url| !url.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "EXPLORER_URL" => {
                    entry.block_explorer_url = (!value.is_empty()).then(|| value.to_string());
                }
                other => match ContractName::from_str(other) {
                    Ok(contract) => {
                        entry
                            .contracts
                            .retain(|name, _| name.parse::<ContractName>() != Ok(contract));
                        entry
                            .contracts
                            .insert(contract.to_string(), value.to_string());
                    }
                    Err(_) => {
                        warn!(key, "Ignoring unknown network override");
                        continue;
                    }
                },
            }

            debug!(key, "Applied network override");
        }
    }

    /// Validate every entry and build the registry.
    pub fn into_registry(self) -> Result<NetworkRegistry, ConfigError> {
        let descriptors = self
            .networks
            .into_iter()
            .map(NetworkEntry::into_descriptor)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NetworkRegistry::new(descriptors)?)
    }
}

impl NetworkEntry {
    fn into_descriptor(self) -> Result<NetworkDescriptor, ConfigError> {
        let mut contracts = BTreeMap::new();

        for (name, value) in self.contracts {
            let contract =
                ContractName::from_str(&name).map_err(|_| ConfigError::UnknownContract {
                    chain_id: self.chain_id,
                    name: name.clone(),
                })?;

            let address =
                parse_address(&value).map_err(|reason| ConfigError::InvalidAddress {
                    chain_id: self.chain_id,
                    contract,
                    value: value.clone(),
                    reason,
                })?;

            if let Some(address) = address {
                contracts.insert(contract, address);
            }
        }

        Ok(NetworkDescriptor {
            chain_id: self.chain_id,
            name: self.name,
            native_currency: self.native_currency,
            rpc_urls: self
                .rpc_urls
                .into_iter()
                .filter(|url| !url.trim().is_empty())
                .collect(),
            block_explorer_url: self.block_explorer_url.filter(|url| !url.trim().is_empty()),
            is_testnet: self.is_testnet,
            contracts,
        })
    }
}

/// Split `NETWORK_97_FACTORY_ADDRESS_V4` into `(97, "FACTORY_ADDRESS_V4")`.
fn parse_override_key(key: &str) -> Option<(u64, &str)> {
    let rest = key.strip_prefix(ENV_PREFIX)?;
    let (chain_id, field) = rest.split_once('_')?;
    let chain_id = chain_id.parse().ok()?;
    Some((chain_id, field))
}

/// Parse a configured address.
///
/// Empty strings and the zero address mean "unset" and yield `None`. Values
/// must be `0x` followed by 40 hex digits; mixed-case values must carry a
/// valid EIP-55 checksum.
pub fn parse_address(value: &str) -> Result<Option<Address>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let Some(digits) = value.strip_prefix("0x") else {
        return Err("missing 0x prefix".to_string());
    };

    if digits.len() != 40 {
        return Err(format!("expected 40 hex digits, got {}", digits.len()));
    }

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("contains non-hex characters".to_string());
    }

    let mixed_case = digits.chars().any(|c| c.is_ascii_lowercase())
        && digits.chars().any(|c| c.is_ascii_uppercase());

    let address = if mixed_case {
        Address::parse_checksummed(value, None).map_err(|e| e.to_string())?
    } else {
        Address::from_str(value).map_err(|e| e.to_string())?
    };

    Ok((!address.is_zero()).then_some(address))
}

impl NetworkRegistry {
    /// Registry built from the embedded network table.
    pub fn builtin() -> Result<Self, ConfigError> {
        NetworksFile::builtin()?.into_registry()
    }

    /// Registry built from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        NetworksFile::from_file(path)?.into_registry()
    }
}
