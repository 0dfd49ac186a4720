//! Wallet capability used for network switching.
//!
//! Wallets expose an EIP-1193 style `request(method, params)` call. Error
//! objects differ between wallet implementations, so [`WalletRpcError`] keeps
//! the raw code, message and data and offers classifiers for the conditions
//! the switch protocol cares about.

use async_trait::async_trait;
use config::{hex_chain_id, NativeCurrency, NetworkDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// EIP-3326 method asking the wallet to change its active chain.
pub const WALLET_SWITCH_ETHEREUM_CHAIN: &str = "wallet_switchEthereumChain";

/// EIP-3085 method asking the wallet to register a chain.
pub const WALLET_ADD_ETHEREUM_CHAIN: &str = "wallet_addEthereumChain";

/// The user rejected the request (EIP-1193).
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// The wallet does not know the requested chain.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

/// JSON-RPC internal error.
pub const INTERNAL_ERROR: i64 = -32603;

/// An injected wallet.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Send a request to the wallet and wait for the user's answer.
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletRpcError>;
}

/// Error object returned by a wallet.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("wallet error {code}: {message}")]
pub struct WalletRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl WalletRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Error raised on our side of the wallet connection.
    pub fn internal(message: impl ToString) -> Self {
        Self::new(INTERNAL_ERROR, message.to_string())
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Code of the underlying wallet error.
    ///
    /// Some mobile wallets wrap the real error inside an internal error's
    /// `data.originalError`.
    pub fn effective_code(&self) -> i64 {
        if self.code != INTERNAL_ERROR {
            return self.code;
        }

        self.data
            .as_ref()
            .and_then(|data| data.get("originalError"))
            .and_then(|original| original.get("code"))
            .and_then(Value::as_i64)
            .unwrap_or(self.code)
    }

    /// The wallet does not know the chain and it has to be added first.
    pub fn is_unrecognized_chain(&self) -> bool {
        self.effective_code() == UNRECOGNIZED_CHAIN
    }

    /// The user declined the prompt.
    pub fn is_user_rejection(&self) -> bool {
        self.effective_code() == USER_REJECTED_REQUEST
    }
}

/// Parameter of `wallet_switchEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChainParameter {
    pub chain_id: String,
}

impl SwitchChainParameter {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id: hex_chain_id(chain_id),
        }
    }
}

/// Parameter of `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParameter {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_explorer_urls: Option<Vec<String>>,
}

impl From<&NetworkDescriptor> for AddChainParameter {
    fn from(descriptor: &NetworkDescriptor) -> Self {
        Self {
            chain_id: descriptor.hex_chain_id(),
            chain_name: descriptor.name.clone(),
            native_currency: descriptor.native_currency.clone(),
            rpc_urls: descriptor.rpc_urls.clone(),
            block_explorer_urls: descriptor
                .block_explorer_url
                .as_ref()
                .map(|url| vec![url.clone()]),
        }
    }
}
