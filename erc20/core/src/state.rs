use {
    erc20_storage::{Item, Map, Set},
    erc20_types::{Address, Allowance, Denom, Params, TokenPair, B256},
};

pub const PARAMS: Item<Params> = Item::new("params");

/// Registered bridge pairs, keyed by the pair identifier.
pub const TOKEN_PAIRS: Map<B256, TokenPair> = Map::new("token_pair");

/// Lookup indexes into `TOKEN_PAIRS`. Maintained together with the primary
/// record; a pair is either present in all three or in none.
pub const PAIRS_BY_ERC20: Map<Address, B256> = Map::new("pair__erc20");
pub const PAIRS_BY_DENOM: Map<Denom, B256> = Map::new("pair__denom");

/// Spending grants keyed by (contract, owner, spender). The triple encodes to
/// a fixed-width key, so prefix iteration by contract is exact.
pub const ALLOWANCES: Map<(Address, Address, Address), Allowance> = Map::new("allowance");

/// Precompile memberships, keyed by the checksummed hex rendering of the
/// contract address. The two sets are disjoint: a contract is native-owned or
/// bridge-deployed, never both.
pub const NATIVE_PRECOMPILES: Set<String> = Set::new("native_precompile");
pub const DYNAMIC_PRECOMPILES: Set<String> = Set::new("dynamic_precompile");
