use {
    crate::{EvmExecutor, Keeper, Result, PARAMS, TOKEN_PAIRS},
    erc20_types::{Address, Allowance, Order, Params, StdError, StdResult, Storage, TokenPair},
    serde::{Deserialize, Serialize},
    std::str::FromStr,
};

/// The module's complete persisted state, in import/export form.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GenesisState {
    pub params: Params,
    pub token_pairs: Vec<TokenPair>,
    pub allowances: Vec<Allowance>,
    /// Checksummed hex addresses, sorted.
    pub native_precompiles: Vec<String>,
    pub dynamic_precompiles: Vec<String>,
}

impl<B, E, A> Keeper<B, E, A>
where
    E: EvmExecutor,
{
    /// Populate an empty store from a genesis dump. Pairs must come before
    /// allowances, since allowances validate against their pair.
    pub fn init_genesis(&self, storage: &mut dyn Storage, state: GenesisState) -> Result<()> {
        PARAMS.save(storage, &state.params)?;

        for pair in &state.token_pairs {
            self.set_token_pair(storage, pair)?;
        }

        for address in &state.native_precompiles {
            self.enable_native_precompile(storage, parse_address(address)?)?;
        }

        for address in &state.dynamic_precompiles {
            self.enable_dynamic_precompile(storage, parse_address(address)?)?;
        }

        for allowance in &state.allowances {
            self.unsafe_set_allowance(
                storage,
                allowance.erc20_address,
                allowance.owner,
                allowance.spender,
                allowance.value,
            )?;
        }

        Ok(())
    }

    pub fn export_genesis(&self, storage: &dyn Storage) -> Result<GenesisState> {
        Ok(GenesisState {
            params: PARAMS.load(storage)?,
            token_pairs: TOKEN_PAIRS
                .values(storage, None, None, Order::Ascending)
                .collect::<StdResult<_>>()?,
            allowances: self.allowances(storage)?,
            native_precompiles: self.native_precompiles(storage)?,
            dynamic_precompiles: self.dynamic_precompiles(storage)?,
        })
    }
}

fn parse_address(s: &str) -> StdResult<Address> {
    Address::from_str(s).map_err(|err| StdError::invalid_address(s, err))
}
