use {
    crate::MockEvm,
    erc20_core::{AccountRegistry, EvmAccount, EvmExecutor},
    erc20_types::{Address, StdResult, Storage},
};

/// An account registry backed by the mock VM's account store.
#[derive(Default, Clone)]
pub struct MockAccounts {
    pub module_accounts: Vec<Address>,
}

impl AccountRegistry for MockAccounts {
    fn is_module_account(&self, _storage: &dyn Storage, address: Address) -> bool {
        self.module_accounts.contains(&address)
    }

    fn ensure_account(&self, storage: &mut dyn Storage, address: Address) -> StdResult<()> {
        let evm = MockEvm::default();

        if evm.account(storage, address)?.is_none() {
            evm.save_account(storage, address, &EvmAccount::new_eoa())?;
        }

        Ok(())
    }
}
