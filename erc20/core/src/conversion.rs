use {
    crate::{
        BankKeeper, Erc20Call, Error, EvmExecutor, EvmLog, Keeper, Result, MODULE_ADDRESS, PARAMS,
    },
    erc20_types::{Address, CoinConverted, Ctx, Denom, Storage, TokenPair, U256},
};

/// A conversion call into an ERC-20 contract must emit exactly one `Transfer`
/// from the token itself, and no `Approval`. Anything else means the contract
/// moved balances it wasn't asked to move.
pub fn validate_transfer_logs(logs: &[EvmLog], token: Address) -> Result<()> {
    let mut transfers = 0;

    for log in logs.iter().filter(|log| log.address == token) {
        if log.is_approval() {
            return Err(Error::UnexpectedEvent {
                contract: token,
                event: "Approval",
            });
        }

        if log.is_transfer() {
            transfers += 1;
        }
    }

    match transfers {
        0 => Err(Error::MissingEvent {
            contract: token,
            event: "Transfer",
        }),
        1 => Ok(()),
        _ => Err(Error::UnexpectedEvent {
            contract: token,
            event: "Transfer",
        }),
    }
}

impl<B, E, A> Keeper<B, E, A>
where
    B: BankKeeper,
    E: EvmExecutor,
{
    /// The checks gating any release of a pair's contract-side tokens, in
    /// order: the module switch, pair existence, the pair's own switch, the
    /// bank's transfer policy for the denom, and the receiver not being a
    /// blocked account.
    pub fn minting_enabled(
        &self,
        storage: &dyn Storage,
        receiver: Address,
        token: &Denom,
    ) -> Result<TokenPair> {
        let params = PARAMS.load(storage)?;
        if !params.enable_erc20 {
            return Err(Error::ConversionDisabled);
        }

        let pair = self
            .pair_by_denom(storage, token)?
            .ok_or_else(|| Error::token_pair_not_found(token))?;

        if !pair.enabled {
            return Err(Error::TokenPairDisabled {
                denom: pair.denom,
                erc20_address: pair.erc20_address,
            });
        }

        if !self.bank.is_send_enabled(storage, &pair.denom) {
            return Err(Error::SendDisabled { denom: pair.denom });
        }

        if self.bank.is_blocked(receiver) {
            return Err(Error::BlockedReceiver { receiver });
        }

        Ok(pair)
    }

    /// Convert `amount` of the receiver's bank-held vouchers for an external
    /// ERC-20 into the contract tokens themselves: the vouchers move into the
    /// bridge's escrow, and escrowed contract tokens move out to the
    /// receiver.
    ///
    /// The sum of a holder's voucher balance and contract balance is
    /// conserved; the balance checks around the contract call enforce the
    /// contract's half of that invariant.
    pub fn convert_coin_native_erc20<S>(
        &self,
        ctx: &mut Ctx<S>,
        pair: &TokenPair,
        amount: U256,
        receiver: Address,
    ) -> Result<()>
    where
        S: Storage,
    {
        self.bank.send(
            &mut ctx.storage,
            receiver,
            *MODULE_ADDRESS,
            &pair.denom,
            amount,
        )?;

        let balance_before = self.balance_of(&mut ctx.storage, pair.erc20_address, receiver)?;

        let res = self.evm.call_erc20(
            &mut ctx.storage,
            *MODULE_ADDRESS,
            pair.erc20_address,
            Erc20Call::Transfer {
                to: receiver,
                amount,
            },
            None,
        )?;
        validate_transfer_logs(&res.logs, pair.erc20_address)?;

        let balance_after = self.balance_of(&mut ctx.storage, pair.erc20_address, receiver)?;
        let expected = balance_before.checked_add(amount).ok_or(
            Error::BalanceInvariance {
                erc20_address: pair.erc20_address,
                expected: U256::MAX,
                actual: balance_after,
            },
        )?;
        if balance_after != expected {
            return Err(Error::BalanceInvariance {
                erc20_address: pair.erc20_address,
                expected,
                actual: balance_after,
            });
        }

        ctx.emit(CoinConverted {
            sender: receiver,
            receiver,
            denom: pair.denom.clone(),
            erc20_address: pair.erc20_address,
            amount,
        });

        Ok(())
    }

    pub fn balance_of(
        &self,
        storage: &mut dyn Storage,
        token: Address,
        account: Address,
    ) -> Result<U256> {
        let res = self.evm.call_erc20(
            storage,
            *MODULE_ADDRESS,
            token,
            Erc20Call::BalanceOf { account },
            None,
        )?;

        res.ret_u256().map_err(Into::into)
    }
}

// ----------------------------------- tests -----------------------------------
