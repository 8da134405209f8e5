use {
    crate::{StdError, StdResult},
    alloy::primitives::{Address, U256},
    serde::{Deserialize, Serialize},
};

/// A spending grant on the bank-backed balance of a bridge pair, mirroring the
/// ERC-20 `approve` relationship.
///
/// A value of zero is never stored; setting an allowance to zero deletes the
/// record instead.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Allowance {
    pub erc20_address: Address,
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
}

impl Allowance {
    pub fn validate(&self) -> StdResult<()> {
        if self.owner == Address::ZERO {
            return Err(StdError::invalid_address(self.owner, "owner cannot be the zero address"));
        }

        if self.spender == Address::ZERO {
            return Err(StdError::invalid_address(self.spender, "spender cannot be the zero address"));
        }

        if self.value.is_zero() {
            return Err(StdError::invalid_amount(self.value, "allowance cannot be zero"));
        }

        Ok(())
    }
}

// ----------------------------------- tests -----------------------------------
