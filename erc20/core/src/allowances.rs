use {
    crate::{Error, Keeper, Result, ALLOWANCES},
    erc20_types::{Address, Allowance, Order, StdResult, Storage, U256},
};

impl<B, E, A> Keeper<B, E, A> {
    /// The allowance `spender` holds on `owner`'s bank-backed balance of the
    /// given contract's token. Absent records read as zero.
    pub fn allowance(
        &self,
        storage: &dyn Storage,
        erc20_address: Address,
        owner: Address,
        spender: Address,
    ) -> StdResult<U256> {
        Ok(ALLOWANCES
            .may_load(storage, (erc20_address, owner, spender))?
            .map(|allowance| allowance.value)
            .unwrap_or_default())
    }

    pub fn set_allowance(
        &self,
        storage: &mut dyn Storage,
        erc20_address: Address,
        owner: Address,
        spender: Address,
        value: U256,
    ) -> Result<()> {
        self.set_allowance_inner(storage, erc20_address, owner, spender, value, false)
    }

    /// Like [`set_allowance`](Self::set_allowance), but skips the pair's
    /// conversion switch. Used when restoring state from a genesis dump,
    /// where disabled pairs legitimately carry allowances.
    pub fn unsafe_set_allowance(
        &self,
        storage: &mut dyn Storage,
        erc20_address: Address,
        owner: Address,
        spender: Address,
        value: U256,
    ) -> Result<()> {
        self.set_allowance_inner(storage, erc20_address, owner, spender, value, true)
    }

    pub fn delete_allowance(
        &self,
        storage: &mut dyn Storage,
        erc20_address: Address,
        owner: Address,
        spender: Address,
    ) -> Result<()> {
        self.set_allowance_inner(storage, erc20_address, owner, spender, U256::ZERO, false)
    }

    fn set_allowance_inner(
        &self,
        storage: &mut dyn Storage,
        erc20_address: Address,
        owner: Address,
        spender: Address,
        value: U256,
        skip_enabled_check: bool,
    ) -> Result<()> {
        let pair = self
            .pair_by_erc20(storage, erc20_address)?
            .ok_or_else(|| Error::token_pair_not_found(erc20_address.to_checksum(None)))?;

        if !skip_enabled_check && !pair.enabled {
            return Err(Error::TokenPairDisabled {
                denom: pair.denom,
                erc20_address,
            });
        }

        // A zero value deletes the record rather than storing a zero.
        if value.is_zero() {
            ALLOWANCES.remove(storage, (erc20_address, owner, spender));
            return Ok(());
        }

        let allowance = Allowance {
            erc20_address,
            owner,
            spender,
            value,
        };
        allowance.validate()?;

        ALLOWANCES
            .save(storage, (erc20_address, owner, spender), &allowance)
            .map_err(Into::into)
    }

    pub fn allowances(&self, storage: &dyn Storage) -> StdResult<Vec<Allowance>> {
        ALLOWANCES
            .values(storage, None, None, Order::Ascending)
            .collect()
    }

    /// Drop every allowance granted on a contract. Called when its pair is
    /// deleted.
    pub fn delete_allowances(&self, storage: &mut dyn Storage, erc20_address: Address) {
        ALLOWANCES.prefix(erc20_address).clear(storage, None, None);
    }
}

// ----------------------------------- tests -----------------------------------
