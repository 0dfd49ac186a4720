//! Contract bindings for the token factory deployments.
//!
//! Only the read-only views used by deployment status checks are bound:
//! - Ownable factories (`owner()`)
//! - ERC-1967 proxy storage slots
//!
//! Bindings are generated using alloy's `sol!` macro.

pub mod factory;
pub mod proxy;
