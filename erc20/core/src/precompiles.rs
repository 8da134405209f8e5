use {
    crate::{
        Error, EvmAccount, EvmExecutor, Keeper, Result, DYNAMIC_PRECOMPILES, NATIVE_PRECOMPILES,
    },
    erc20_types::{Address, Order, StdResult, Storage, TokenPair, U256},
    hex_literal::hex,
};

/// The shared bytecode every bridge-managed ERC-20 contract address is bound
/// to. The VM intercepts calls to addresses carrying this code and routes
/// them to the bridge, so the bytes only serve as a stable, non-empty marker.
pub const ERC20_BYTECODE: &[u8] = &hex!("608060405260043610601c57600080fd");

impl<B, E, A> Keeper<B, E, A> {
    /// Resolve a call target to its bridge pair, if the address is enabled as
    /// a precompile.
    ///
    /// An address in neither set is simply not a precompile. An address in a
    /// set but without a pair record is a corrupt installation and fails
    /// loudly.
    pub fn precompile_instance(
        &self,
        storage: &dyn Storage,
        address: Address,
    ) -> Result<Option<TokenPair>> {
        let key = address.to_checksum(None);

        if !NATIVE_PRECOMPILES.has(storage, key.clone()) && !DYNAMIC_PRECOMPILES.has(storage, key)
        {
            return Ok(None);
        }

        self.pair_by_erc20(storage, address)?
            .ok_or(Error::PrecompileNotInitialized { address })
            .map(Some)
    }

    pub fn native_precompiles(&self, storage: &dyn Storage) -> StdResult<Vec<String>> {
        NATIVE_PRECOMPILES
            .range(storage, None, None, Order::Ascending)
            .collect()
    }

    pub fn dynamic_precompiles(&self, storage: &dyn Storage) -> StdResult<Vec<String>> {
        DYNAMIC_PRECOMPILES
            .range(storage, None, None, Order::Ascending)
            .collect()
    }

    /// Remove an address from the native precompile set. The account and its
    /// code are left in place; the VM just stops routing calls to the bridge.
    pub fn disable_native_precompile(&self, storage: &mut dyn Storage, address: Address) {
        NATIVE_PRECOMPILES.remove(storage, address.to_checksum(None));
    }

    /// Remove an address from the dynamic precompile set.
    pub fn disable_dynamic_precompile(&self, storage: &mut dyn Storage, address: Address) {
        DYNAMIC_PRECOMPILES.remove(storage, address.to_checksum(None));
    }
}

impl<B, E, A> Keeper<B, E, A>
where
    E: EvmExecutor,
{
    /// Enable a pre-existing contract address as a precompile.
    pub fn enable_native_precompile(
        &self,
        storage: &mut dyn Storage,
        address: Address,
    ) -> Result<()> {
        NATIVE_PRECOMPILES.insert(storage, address.to_checksum(None));
        self.register_code_hash(storage, address)
    }

    /// Enable a bridge-derived contract address as a precompile.
    pub fn enable_dynamic_precompile(
        &self,
        storage: &mut dyn Storage,
        address: Address,
    ) -> Result<()> {
        DYNAMIC_PRECOMPILES.insert(storage, address.to_checksum(None));
        self.register_code_hash(storage, address)
    }

    /// Bind the shared bytecode to the address. Idempotent; an account
    /// already present keeps its nonce and balance.
    fn register_code_hash(&self, storage: &mut dyn Storage, address: Address) -> Result<()> {
        let code_hash = self.evm.save_code(storage, ERC20_BYTECODE)?;

        let account = match self.evm.account(storage, address)? {
            Some(mut account) => {
                if account.code_hash == code_hash {
                    return Ok(());
                }
                account.code_hash = code_hash;
                account
            },
            None => EvmAccount {
                nonce: 0,
                balance: U256::ZERO,
                code_hash,
            },
        };

        self.evm.save_account(storage, address, &account)?;

        Ok(())
    }
}

// ----------------------------------- tests -----------------------------------
