//! Switching the wallet's active network.
//!
//! Wallets only ship with a handful of chains. Switching first and adding on
//! an "unrecognized chain" answer avoids a second prompt on chains the
//! wallet already knows. Nothing here is retried: every failure depends on
//! the wallet being present or on the user's answer.

use crate::wallet::{
    AddChainParameter, SwitchChainParameter, Wallet, WalletRpcError, WALLET_ADD_ETHEREUM_CHAIN,
    WALLET_SWITCH_ETHEREUM_CHAIN,
};
use config::NetworkRegistry;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

/// Why a network switch did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwitchError {
    /// No wallet is available in this environment
    #[error("no wallet available")]
    NoWallet,

    /// The wallet needs the chain added but the registry cannot describe it
    #[error("network {0} is not registered")]
    UnregisteredNetwork(u64),

    /// The network has no RPC endpoint and cannot be targeted
    #[error("network {0} is display-only")]
    DisplayOnly(u64),

    /// The user declined the wallet prompt
    #[error("request rejected in wallet")]
    WalletRejected,

    /// Any other wallet failure
    #[error("wallet error: {0}")]
    Wallet(String),
}

impl SwitchError {
    /// Stable reason string for display.
    pub fn reason(&self) -> &str {
        match self {
            Self::NoWallet => "no-wallet",
            Self::UnregisteredNetwork(_) => "unregistered-network",
            Self::DisplayOnly(_) => "display-only-network",
            Self::WalletRejected => "wallet-rejected",
            Self::Wallet(message) => message,
        }
    }
}

impl From<WalletRpcError> for SwitchError {
    fn from(error: WalletRpcError) -> Self {
        if error.is_user_rejection() {
            Self::WalletRejected
        } else {
            Self::Wallet(error.message)
        }
    }
}

/// Ask the wallet to make `chain_id` its active network.
///
/// Sends `wallet_switchEthereumChain`; when the wallet answers that the
/// chain is unknown, registers it with `wallet_addEthereumChain` using the
/// registry's descriptor. Wallets activate a chain once it is added.
pub async fn request_switch(
    wallet: Option<&dyn Wallet>,
    registry: &NetworkRegistry,
    chain_id: u64,
) -> Result<(), SwitchError> {
    let Some(wallet) = wallet else {
        return Err(SwitchError::NoWallet);
    };

    let descriptor = registry.resolve(chain_id).ok();
    if descriptor.is_some_and(|descriptor| descriptor.is_display_only()) {
        return Err(SwitchError::DisplayOnly(chain_id));
    }

    let switch = json!([SwitchChainParameter::new(chain_id)]);
    match wallet.request(WALLET_SWITCH_ETHEREUM_CHAIN, switch).await {
        Ok(_) => {
            info!(chain_id, "Wallet switched network");
            return Ok(());
        }
        Err(error) if error.is_unrecognized_chain() => {
            debug!(chain_id, %error, "Wallet does not know network, adding it");
        }
        Err(error) => return Err(error.into()),
    }

    let descriptor = descriptor.ok_or(SwitchError::UnregisteredNetwork(chain_id))?;

    let add = json!([AddChainParameter::from(descriptor)]);
    wallet.request(WALLET_ADD_ETHEREUM_CHAIN, add).await?;

    info!(chain_id, name = %descriptor.name, "Wallet added network");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use config::{chains, NetworkDescriptorBuilder};
    use serde_json::Value;
    use std::sync::Mutex;

    /// Wallet double that records requests and answers from a script.
    #[derive(Default)]
    struct FakeWallet {
        calls: Mutex<Vec<(String, Value)>>,
        switch_error: Option<WalletRpcError>,
        add_error: Option<WalletRpcError>,
    }

    impl FakeWallet {
        fn unknown_chain() -> Self {
            Self {
                switch_error: Some(WalletRpcError::new(4902, "Unrecognized chain ID")),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }

        fn methods(&self) -> Vec<String> {
            self.calls().into_iter().map(|(method, _)| method).collect()
        }
    }

    #[async_trait]
    impl Wallet for FakeWallet {
        async fn request(&self, method: &str, params: Value) -> Result<Value, WalletRpcError> {
            self.calls.lock().unwrap().push((method.to_string(), params));

            let error = match method {
                WALLET_SWITCH_ETHEREUM_CHAIN => self.switch_error.clone(),
                WALLET_ADD_ETHEREUM_CHAIN => self.add_error.clone(),
                _ => Some(WalletRpcError::new(-32601, "method not found")),
            };

            match error {
                Some(error) => Err(error),
                None => Ok(Value::Null),
            }
        }
    }

    fn registry() -> NetworkRegistry {
        NetworkRegistry::builtin().unwrap()
    }

    #[tokio::test]
    async fn test_no_wallet() {
        let result = request_switch(None, &registry(), chains::SEPOLIA).await;

        assert_eq!(result, Err(SwitchError::NoWallet));
        assert_eq!(result.unwrap_err().reason(), "no-wallet");
    }

    #[tokio::test]
    async fn test_known_chain_switches_directly() {
        let wallet = FakeWallet::default();
        let result = request_switch(Some(&wallet), &registry(), chains::SEPOLIA).await;

        assert_eq!(result, Ok(()));
        assert_eq!(
            wallet.calls(),
            vec![(
                WALLET_SWITCH_ETHEREUM_CHAIN.to_string(),
                json!([{ "chainId": "0xaa36a7" }]),
            )]
        );
    }

    #[tokio::test]
    async fn test_unknown_chain_is_added_from_descriptor() {
        let registry = registry();
        let wallet = FakeWallet::unknown_chain();

        let result = request_switch(Some(&wallet), &registry, chains::POLYGON_AMOY).await;
        assert_eq!(result, Ok(()));

        let calls = wallet.calls();
        assert_eq!(
            wallet.methods(),
            vec![WALLET_SWITCH_ETHEREUM_CHAIN, WALLET_ADD_ETHEREUM_CHAIN]
        );

        let amoy = registry.resolve(chains::POLYGON_AMOY).unwrap();
        let added = &calls[1].1[0];
        assert_eq!(added["chainId"], "0x13882");
        assert_eq!(added["chainName"], amoy.name.as_str());
        assert_eq!(
            added["nativeCurrency"]["symbol"],
            amoy.native_currency.symbol.as_str()
        );
        assert_eq!(
            added["nativeCurrency"]["decimals"],
            u64::from(amoy.native_currency.decimals)
        );
        assert_eq!(added["rpcUrls"], json!(amoy.rpc_urls));
        assert_eq!(
            added["blockExplorerUrls"],
            json!([amoy.block_explorer_url.as_deref().unwrap()])
        );
    }

    #[tokio::test]
    async fn test_unknown_chain_unregistered() {
        let wallet = FakeWallet::unknown_chain();
        let result = request_switch(Some(&wallet), &registry(), 999999).await;

        assert_eq!(result, Err(SwitchError::UnregisteredNetwork(999999)));
        assert_eq!(result.unwrap_err().reason(), "unregistered-network");
        assert_eq!(wallet.methods(), vec![WALLET_SWITCH_ETHEREUM_CHAIN]);
    }

    #[tokio::test]
    async fn test_unregistered_chain_known_to_wallet() {
        let wallet = FakeWallet::default();
        let result = request_switch(Some(&wallet), &registry(), 999999).await;

        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_wrapped_unknown_chain_error() {
        let wallet = FakeWallet {
            switch_error: Some(
                WalletRpcError::internal("Internal JSON-RPC error.")
                    .with_data(json!({ "originalError": { "code": 4902 } })),
            ),
            ..Default::default()
        };

        let result = request_switch(Some(&wallet), &registry(), chains::BASE_SEPOLIA).await;
        assert_eq!(result, Ok(()));
        assert_eq!(wallet.methods().len(), 2);
    }

    #[tokio::test]
    async fn test_rejected_switch() {
        let wallet = FakeWallet {
            switch_error: Some(WalletRpcError::new(4001, "User rejected the request.")),
            ..Default::default()
        };

        let result = request_switch(Some(&wallet), &registry(), chains::SEPOLIA).await;
        assert_eq!(result, Err(SwitchError::WalletRejected));
        assert_eq!(wallet.methods(), vec![WALLET_SWITCH_ETHEREUM_CHAIN]);
    }

    #[tokio::test]
    async fn test_wrapped_rejection() {
        let wallet = FakeWallet {
            switch_error: Some(
                WalletRpcError::internal("Internal JSON-RPC error.")
                    .with_data(json!({ "originalError": { "code": 4001 } })),
            ),
            ..Default::default()
        };

        let result = request_switch(Some(&wallet), &registry(), chains::BSC_TESTNET).await;
        assert_eq!(result, Err(SwitchError::WalletRejected));
        assert_eq!(result.unwrap_err().reason(), "wallet-rejected");
        assert_eq!(wallet.methods(), vec![WALLET_SWITCH_ETHEREUM_CHAIN]);
    }

    #[tokio::test]
    async fn test_add_failure_surfaces_wallet_message() {
        let wallet = FakeWallet {
            switch_error: Some(WalletRpcError::new(4902, "Unrecognized chain ID")),
            add_error: Some(WalletRpcError::new(-32602, "Invalid rpcUrls")),
            ..Default::default()
        };

        let result = request_switch(Some(&wallet), &registry(), chains::ARBITRUM_SEPOLIA).await;
        let error = result.unwrap_err();
        assert_eq!(error, SwitchError::Wallet("Invalid rpcUrls".to_string()));
        assert_eq!(error.reason(), "Invalid rpcUrls");
        assert_eq!(wallet.methods().len(), 2);
    }

    #[tokio::test]
    async fn test_display_only_network_rejected() {
        let registry = NetworkRegistry::new([NetworkDescriptorBuilder::new(5, "Goerli")
            .block_explorer_url("https://goerli.etherscan.io")
            .testnet(true)
            .build()])
        .unwrap();
        let wallet = FakeWallet::default();

        let result = request_switch(Some(&wallet), &registry, 5).await;
        assert_eq!(result, Err(SwitchError::DisplayOnly(5)));
        assert!(wallet.calls().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_switch_is_idempotent() {
        let registry = registry();
        let wallet = FakeWallet::default();

        let first = request_switch(Some(&wallet), &registry, chains::BSC_TESTNET).await;
        let second = request_switch(Some(&wallet), &registry, chains::BSC_TESTNET).await;

        assert_eq!(first, Ok(()));
        assert_eq!(second, first);
        assert_eq!(
            wallet.methods(),
            vec![WALLET_SWITCH_ETHEREUM_CHAIN, WALLET_SWITCH_ETHEREUM_CHAIN]
        );
    }
}
