use {
    crate::{Erc20Call, Error, EvmExecutor, Keeper, Result, MODULE_ADDRESS, PARAMS, TOKEN_PAIRS},
    erc20_storage::Bound,
    erc20_types::{Address, Denom, Order, Params, StdResult, Storage, TokenPair, B256},
    serde::{Deserialize, Serialize},
    std::str::FromStr,
};

pub const DEFAULT_PAGE_LIMIT: u32 = 30;

/// The metadata an ERC-20 contract reports about itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Erc20Metadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl<B, E, A> Keeper<B, E, A> {
    pub fn query_params(&self, storage: &dyn Storage) -> StdResult<Params> {
        PARAMS.load(storage)
    }

    /// Look up a single pair by either its contract address (0x-prefixed hex)
    /// or its denom.
    pub fn query_token_pair(&self, storage: &dyn Storage, token: &str) -> Result<TokenPair> {
        let pair = if let Ok(address) = Address::from_str(token) {
            self.pair_by_erc20(storage, address)?
        } else {
            self.pair_by_denom(storage, &Denom::try_from(token)?)?
        };

        pair.ok_or_else(|| Error::token_pair_not_found(token))
    }

    pub fn query_token_pairs(
        &self,
        storage: &dyn Storage,
        start_after: Option<B256>,
        limit: Option<u32>,
    ) -> StdResult<Vec<TokenPair>> {
        let start = start_after.map(Bound::Exclusive);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        TOKEN_PAIRS
            .values(storage, start, None, Order::Ascending)
            .take(limit as usize)
            .collect()
    }
}

impl<B, E, A> Keeper<B, E, A>
where
    E: EvmExecutor,
{
    /// Query an ERC-20 contract's self-reported metadata.
    pub fn erc20_metadata(
        &self,
        storage: &mut dyn Storage,
        erc20_address: Address,
    ) -> Result<Erc20Metadata> {
        let name = self.evm.call_erc20(
            storage,
            *MODULE_ADDRESS,
            erc20_address,
            Erc20Call::Name,
            None,
        )?;
        let symbol = self.evm.call_erc20(
            storage,
            *MODULE_ADDRESS,
            erc20_address,
            Erc20Call::Symbol,
            None,
        )?;
        let decimals = self.evm.call_erc20(
            storage,
            *MODULE_ADDRESS,
            erc20_address,
            Erc20Call::Decimals,
            None,
        )?;

        Ok(Erc20Metadata {
            name: String::from_utf8_lossy(&name.ret).into_owned(),
            symbol: String::from_utf8_lossy(&symbol.ret).into_owned(),
            decimals: decimals.ret_u256()?.saturating_to(),
        })
    }
}
