use {
    erc20_core::BankKeeper,
    erc20_storage::Map,
    erc20_types::{Address, Denom, StdError, StdResult, Storage, U256},
};

const BALANCES: Map<(Address, Denom), U256> = Map::new("mock_bank_balance");

/// An in-storage bank with configurable transfer policy.
#[derive(Default, Clone)]
pub struct MockBank {
    pub send_disabled: Vec<Denom>,
    pub blocked: Vec<Address>,
}

impl MockBank {
    pub fn mint(
        &self,
        storage: &mut dyn Storage,
        to: Address,
        denom: &Denom,
        amount: U256,
    ) -> StdResult<()> {
        BALANCES.may_update(storage, (to, denom.clone()), |balance| -> StdResult<_> {
            Ok(balance.unwrap_or_default() + amount)
        })?;

        Ok(())
    }
}

impl BankKeeper for MockBank {
    fn balance(&self, storage: &dyn Storage, address: Address, denom: &Denom) -> StdResult<U256> {
        Ok(BALANCES
            .may_load(storage, (address, denom.clone()))?
            .unwrap_or_default())
    }

    fn send(
        &self,
        storage: &mut dyn Storage,
        from: Address,
        to: Address,
        denom: &Denom,
        amount: U256,
    ) -> StdResult<()> {
        BALANCES.may_update(storage, (from, denom.clone()), |balance| {
            balance
                .unwrap_or_default()
                .checked_sub(amount)
                .ok_or_else(|| StdError::invalid_amount(amount, "insufficient balance"))
        })?;

        BALANCES.may_update(storage, (to, denom.clone()), |balance| -> StdResult<_> {
            Ok(balance.unwrap_or_default() + amount)
        })?;

        Ok(())
    }

    fn is_send_enabled(&self, _storage: &dyn Storage, denom: &Denom) -> bool {
        !self.send_disabled.contains(denom)
    }

    fn is_blocked(&self, address: Address) -> bool {
        self.blocked.contains(&address)
    }
}
