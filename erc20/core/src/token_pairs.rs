use {
    crate::{
        Error, EvmExecutor, Keeper, Result, PAIRS_BY_DENOM, PAIRS_BY_ERC20, PARAMS, TOKEN_PAIRS,
    },
    erc20_types::{
        derive_decimals, Address, Ctx, Denom, Owner, PairRegistered, PairToggled, Storage,
        TokenPair, B256,
    },
};

impl<B, E, A> Keeper<B, E, A> {
    /// Write a pair and its two lookup indexes. Errors if either the denom or
    /// the contract address is already taken; in particular, a derived
    /// contract address colliding with an existing record is a hard failure,
    /// never silently overwritten.
    pub fn set_token_pair(&self, storage: &mut dyn Storage, pair: &TokenPair) -> Result<B256> {
        if PAIRS_BY_DENOM.has(storage, pair.denom.clone()) {
            return Err(Error::token_already_registered(&pair.denom));
        }

        if PAIRS_BY_ERC20.has(storage, pair.erc20_address) {
            return Err(Error::token_already_registered(
                pair.erc20_address.to_checksum(None),
            ));
        }

        let id = pair.id();
        TOKEN_PAIRS.save(storage, id, pair)?;
        PAIRS_BY_DENOM.save(storage, pair.denom.clone(), &id)?;
        PAIRS_BY_ERC20.save(storage, pair.erc20_address, &id)?;

        Ok(id)
    }

    pub fn pair_by_id(&self, storage: &dyn Storage, id: B256) -> Result<TokenPair> {
        TOKEN_PAIRS.load(storage, id).map_err(Into::into)
    }

    pub fn pair_by_denom(
        &self,
        storage: &dyn Storage,
        denom: &Denom,
    ) -> Result<Option<TokenPair>> {
        let Some(id) = PAIRS_BY_DENOM.may_load(storage, denom.clone())? else {
            return Ok(None);
        };

        TOKEN_PAIRS.may_load(storage, id).map_err(Into::into)
    }

    pub fn pair_by_erc20(
        &self,
        storage: &dyn Storage,
        erc20_address: Address,
    ) -> Result<Option<TokenPair>> {
        let Some(id) = PAIRS_BY_ERC20.may_load(storage, erc20_address)? else {
            return Ok(None);
        };

        TOKEN_PAIRS.may_load(storage, id).map_err(Into::into)
    }

    pub fn is_denom_registered(&self, storage: &dyn Storage, denom: &Denom) -> bool {
        PAIRS_BY_DENOM.has(storage, denom.clone())
    }

    pub fn is_erc20_registered(&self, storage: &dyn Storage, erc20_address: Address) -> bool {
        PAIRS_BY_ERC20.has(storage, erc20_address)
    }

    /// Remove a pair, its indexes, and every allowance granted on its
    /// contract.
    pub fn delete_token_pair(&self, storage: &mut dyn Storage, id: B256) -> Result<()> {
        let pair = TOKEN_PAIRS.load(storage, id)?;

        TOKEN_PAIRS.remove(storage, id);
        PAIRS_BY_DENOM.remove(storage, pair.denom.clone());
        PAIRS_BY_ERC20.remove(storage, pair.erc20_address);

        self.delete_allowances(storage, pair.erc20_address);

        Ok(())
    }

    /// Flip a pair's conversion switch, returning the updated record.
    pub fn toggle_conversion<S>(&self, ctx: &mut Ctx<S>, id: B256) -> Result<TokenPair>
    where
        S: Storage,
    {
        let mut pair = TOKEN_PAIRS.load(&ctx.storage, id)?;
        pair.enabled = !pair.enabled;
        TOKEN_PAIRS.save(&mut ctx.storage, id, &pair)?;

        ctx.emit(PairToggled {
            id,
            denom: pair.denom.clone(),
            erc20_address: pair.erc20_address,
            enabled: pair.enabled,
        });

        Ok(pair)
    }
}

impl<B, E, A> Keeper<B, E, A>
where
    E: EvmExecutor,
{
    /// Register a bridge pair for an unseen voucher denom and enable its
    /// derived contract address as a dynamic precompile.
    ///
    /// The base denom must carry a recognized metric prefix; it determines
    /// the decimals the precompile reports.
    pub fn register_erc20_extension(
        &self,
        storage: &mut dyn Storage,
        denom: Denom,
        base_denom: &str,
    ) -> Result<TokenPair> {
        let _decimals = derive_decimals(base_denom)?;

        let pair = TokenPair::new_dynamic(denom);
        self.set_token_pair(storage, &pair)?;
        self.enable_dynamic_precompile(storage, pair.erc20_address)?;

        Ok(pair)
    }

    /// Register a pre-existing ERC-20 contract as a bridge pair, making its
    /// balance transferable as a bank coin under the `erc20:` denom.
    pub fn register_erc20<S>(&self, ctx: &mut Ctx<S>, erc20_address: Address) -> Result<TokenPair>
    where
        S: Storage,
    {
        let params = PARAMS.load(&ctx.storage)?;
        if !params.permissionless_registration {
            return Err(Error::RegistrationRestricted);
        }

        let account = self.evm.account(&ctx.storage, erc20_address)?;
        if !account.is_some_and(|account| account.has_code()) {
            return Err(Error::ContractHasNoCode {
                address: erc20_address,
            });
        }

        // The contract must respond to the metadata queries; a token without
        // them cannot be represented as a coin.
        self.erc20_metadata(&mut ctx.storage, erc20_address)?;

        let pair = TokenPair {
            erc20_address,
            denom: Denom::erc20(erc20_address),
            enabled: true,
            owner: Owner::External,
        };
        let id = self.set_token_pair(&mut ctx.storage, &pair)?;

        ctx.emit(PairRegistered {
            id,
            denom: pair.denom.clone(),
            erc20_address,
            channel: None,
        });

        Ok(pair)
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        erc20_core::Error,
        erc20_testing::setup,
        erc20_types::{Event, Params},
    };

    const TOKEN: Address = Address::repeat_byte(0xaa);

    #[test]
    fn all_lookups_agree() {
        let (mut ctx, keeper) = setup();

        let pair = TokenPair {
            erc20_address: TOKEN,
            denom: Denom::erc20(TOKEN),
            enabled: true,
            owner: Owner::External,
        };
        let id = keeper.set_token_pair(&mut ctx.storage, &pair).unwrap();

        assert_eq!(keeper.pair_by_id(&ctx.storage, id).unwrap(), pair);
        assert_eq!(
            keeper.pair_by_denom(&ctx.storage, &pair.denom).unwrap(),
            Some(pair.clone()),
        );
        assert_eq!(
            keeper.pair_by_erc20(&ctx.storage, TOKEN).unwrap(),
            Some(pair),
        );
    }

    #[test]
    fn duplicate_registrations_are_rejected() {
        let (mut ctx, keeper) = setup();

        let pair = TokenPair {
            erc20_address: TOKEN,
            denom: Denom::erc20(TOKEN),
            enabled: true,
            owner: Owner::External,
        };
        keeper.set_token_pair(&mut ctx.storage, &pair).unwrap();

        // Same denom, different address.
        let clash = TokenPair {
            erc20_address: Address::repeat_byte(0xbb),
            ..pair.clone()
        };
        assert!(matches!(
            keeper.set_token_pair(&mut ctx.storage, &clash),
            Err(Error::TokenAlreadyRegistered { .. }),
        ));

        // Same address, different denom.
        let clash = TokenPair {
            denom: Denom::new_unchecked("uother"),
            ..pair
        };
        assert!(matches!(
            keeper.set_token_pair(&mut ctx.storage, &clash),
            Err(Error::TokenAlreadyRegistered { .. }),
        ));
    }

    #[test]
    fn toggling_flips_the_switch() {
        let (mut ctx, keeper) = setup();

        let pair = TokenPair::new_dynamic(Denom::new_unchecked("ibc/ABCD"));
        let id = keeper.set_token_pair(&mut ctx.storage, &pair).unwrap();

        let toggled = keeper.toggle_conversion(&mut ctx, id).unwrap();
        assert!(!toggled.enabled);
        assert!(matches!(
            ctx.events.last(),
            Some(Event::PairToggled(event)) if !event.enabled,
        ));

        let toggled = keeper.toggle_conversion(&mut ctx, id).unwrap();
        assert!(toggled.enabled);

        // Unknown pairs can't be toggled.
        assert!(keeper
            .toggle_conversion(&mut ctx, erc20_types::B256::ZERO)
            .is_err());
    }

    #[test]
    fn extensions_require_a_metric_prefix() {
        let (mut ctx, keeper) = setup();

        assert!(keeper
            .register_erc20_extension(
                &mut ctx.storage,
                Denom::new_unchecked("ibc/ABCD"),
                "xatom",
            )
            .is_err());

        let pair = keeper
            .register_erc20_extension(&mut ctx.storage, Denom::new_unchecked("ibc/ABCD"), "uatom")
            .unwrap();

        // The derived address resolves as a dynamic precompile.
        assert_eq!(
            keeper
                .precompile_instance(&ctx.storage, pair.erc20_address)
                .unwrap(),
            Some(pair),
        );
    }

    #[test]
    fn registering_an_external_contract() {
        let (mut ctx, keeper) = setup();

        // No code at the address yet.
        assert!(matches!(
            keeper.register_erc20(&mut ctx, TOKEN),
            Err(Error::ContractHasNoCode { .. }),
        ));

        keeper.evm.deploy(&mut ctx.storage, TOKEN).unwrap();

        let pair = keeper.register_erc20(&mut ctx, TOKEN).unwrap();
        assert_eq!(pair.denom, Denom::erc20(TOKEN));
        assert_eq!(pair.owner, Owner::External);

        // Re-registration is a duplicate.
        assert!(keeper.register_erc20(&mut ctx, TOKEN).is_err());
    }

    #[test]
    fn registration_can_be_restricted_to_governance() {
        let (mut ctx, keeper) = setup();

        PARAMS
            .save(&mut ctx.storage, &Params {
                permissionless_registration: false,
                ..Default::default()
            })
            .unwrap();

        keeper.evm.deploy(&mut ctx.storage, TOKEN).unwrap();

        assert!(matches!(
            keeper.register_erc20(&mut ctx, TOKEN),
            Err(Error::RegistrationRestricted),
        ));
    }
}
