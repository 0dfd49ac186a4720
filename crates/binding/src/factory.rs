//! Token factory contract bindings.

use alloy_sol_types::sol;

sol! {
    /// Owner-gated token factory (OpenZeppelin `Ownable`)
    #[sol(rpc)]
    interface IOwnable {
        /// Current owner of the factory
        function owner() external view returns (address);
    }
}
