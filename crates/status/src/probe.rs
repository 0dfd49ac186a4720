use crate::{ContractStatus, Probe};
use alloy_primitives::{Address, B256, U256};
use alloy_provider::Provider;
use binding::{
    factory::IOwnable,
    proxy::{slot_address, IMPLEMENTATION_SLOT},
};
use config::ContractName;
use eyre::Result;
use tracing::debug;

/// Interpret the result of an `owner()` call.
///
/// A contract that answers with an RPC error (revert) or with data that does
/// not decode simply is not Ownable. Failing to reach the endpoint is an error.
fn owner_or_revert(
    address: Address,
    result: std::result::Result<Address, alloy_contract::Error>,
) -> Result<Option<Address>> {
    match result {
        Ok(owner) => Ok(Some(owner)),
        Err(alloy_contract::Error::TransportError(e)) if e.as_error_resp().is_none() => {
            Err(eyre::eyre!("owner() call failed: address={}, error={}", address, e))
        }
        Err(e) => {
            debug!("owner() unavailable: address={}, error={}", address, e);
            Ok(None)
        }
    }
}

// Status probe backed by an RPC provider.
pub struct StatusProbe<P> {
    provider: P,
}

impl<P> StatusProbe<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Owner of an Ownable contract, `None` when the call reverts.
    async fn query_owner(&self, address: Address) -> Result<Option<Address>> {
        let contract = IOwnable::new(address, &self.provider);
        owner_or_revert(address, contract.owner().call().await)
    }

    /// ERC-1967 implementation behind a proxy.
    async fn query_implementation(&self, address: Address) -> Result<Option<Address>> {
        let slot = U256::from_be_bytes(IMPLEMENTATION_SLOT.0);
        let word = self.provider.get_storage_at(address, slot).await?;

        Ok(slot_address(B256::from(word.to_be_bytes::<32>())))
    }
}

impl<P> Probe for StatusProbe<P>
where
    P: Provider + Clone,
{
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn contract_status(&self, contract: ContractName, address: Address) -> Result<ContractStatus> {
        debug!("Querying contract status: contract={}, address={}", contract, address);

        let code = self.provider.get_code_at(address).await?;
        if code.is_empty() {
            return Ok(ContractStatus {
                contract,
                address,
                code_size: 0,
                owner: None,
                implementation: None,
            });
        }

        let owner = self.query_owner(address).await?;
        let implementation = self.query_implementation(address).await?;

        Ok(ContractStatus {
            contract,
            address,
            code_size: code.len(),
            owner,
            implementation,
        })
    }
}
