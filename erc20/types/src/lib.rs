mod allowance;
mod binary;
mod buffer;
mod callbacks;
mod coin;
mod context;
mod denom;
mod error;
mod events;
mod gas;
mod mock;
mod params;
mod storage;
mod token_pair;
mod transfer;

pub use {
    allowance::*, binary::*, buffer::*, callbacks::*, coin::*, context::*, denom::*, error::*,
    events::*, gas::*, mock::*, params::*, storage::*, token_pair::*, transfer::*,
};

/// Re-export the EVM primitive types, so that downstream crates don't need to
/// depend on `alloy` directly.
pub use alloy::primitives::{keccak256, Address, B256, U256};
