//! Wallet reached over HTTP JSON-RPC.
//!
//! Wallet bridges and signer-proxy services expose the EIP-1193 methods as
//! plain JSON-RPC. The wallet's error object is passed through unchanged so
//! the switch protocol can classify it.

use crate::wallet::{Wallet, WalletRpcError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A wallet that forwards requests to a JSON-RPC endpoint.
///
/// # Example
///
/// ```ignore
/// let wallet = RpcWallet::new("http://localhost:9060");
/// client::request_switch(Some(&wallet), &registry, 97).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RpcWallet {
    client: reqwest::Client,
    url: String,
}

impl RpcWallet {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Creates a wallet with a custom HTTP client.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Wallet for RpcWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletRpcError> {
        debug!(method, url = %self.url, "Sending wallet request");

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(WalletRpcError::internal)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(WalletRpcError::internal(format!(
                "wallet endpoint returned {status}: {body}"
            )));
        }

        let rpc_response: JsonRpcResponse = response.json().await.map_err(WalletRpcError::internal)?;
        rpc_response.into_result()
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u32,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<WalletRpcError>,
}

impl JsonRpcResponse {
    /// Wallet methods answer `null` on success, which deserializes to `None`.
    fn into_result(self) -> Result<Value, WalletRpcError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}
