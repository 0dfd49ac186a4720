//! ERC-1967 proxy storage layout.
//!
//! Upgradeable factories sit behind OpenZeppelin proxies; the implementation
//! and admin addresses live in fixed storage slots.

use alloy_primitives::{b256, Address, B256};

/// `bytes32(uint256(keccak256("eip1967.proxy.implementation")) - 1)`
pub const IMPLEMENTATION_SLOT: B256 =
    b256!("0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc");

/// `bytes32(uint256(keccak256("eip1967.proxy.admin")) - 1)`
pub const ADMIN_SLOT: B256 =
    b256!("0xb53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103");

/// Address stored in a slot word, `None` when the slot is empty.
pub fn slot_address(word: B256) -> Option<Address> {
    let address = Address::from_word(word);
    (!address.is_zero()).then_some(address)
}
