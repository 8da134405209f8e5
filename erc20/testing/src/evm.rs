use {
    erc20_core::{Erc20Call, EvmAccount, EvmError, EvmExecutor, EvmLog, EvmResponse, LifecycleCall},
    erc20_storage::{Item, Map, Raw},
    erc20_types::{keccak256, Address, StdResult, Storage, B256, U256},
    std::collections::HashMap,
};

const ACCOUNTS: Map<Address, EvmAccount> = Map::new("mock_evm_account");
const CODES: Map<B256, Vec<u8>, Raw> = Map::new("mock_evm_code");
const TOKEN_BALANCES: Map<(Address, Address), U256> = Map::new("mock_evm_token_balance");
const TOKEN_ALLOWANCES: Map<(Address, Address, Address), U256> =
    Map::new("mock_evm_token_allowance");

/// Lifecycle calls received by contracts, in order. Lives in storage so that
/// a discarded sandbox also discards the record of the call.
pub const LIFECYCLE_LOG: Item<Vec<String>> = Item::new("mock_evm_lifecycle_log");

/// Scripted behavior for a contract address, standing in for actual
/// bytecode execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractBehavior {
    /// On any raw call, pull the caller's entire allowance on the given token
    /// into the contract's own balance.
    DrainAllowance { token: Address },
    /// On any raw call, do nothing, leaving the granted allowance (and the
    /// caller's balance) untouched.
    LeaveAllowance,
    /// Revert every call.
    Revert,
    /// `approve` succeeds but returns false.
    ApproveReturnsFalse,
    /// `transfer` moves the balance but emits no event.
    TransferWithoutLog,
    /// `transfer` emits a spurious `Approval` alongside the `Transfer`.
    TransferEmitsApproval,
    /// `transfer` credits one token less than requested (fee-on-transfer).
    TransferShortsReceiver,
}

/// A stand-in VM exposing just enough ERC-20 and lifecycle semantics to
/// exercise conversions and callbacks. All token state lives in the storage
/// handed to each call.
#[derive(Clone)]
pub struct MockEvm {
    pub behaviors: HashMap<Address, ContractBehavior>,
    /// Flat gas charge per call.
    pub gas_per_call: u64,
}

impl Default for MockEvm {
    fn default() -> Self {
        Self {
            behaviors: HashMap::new(),
            gas_per_call: 50_000,
        }
    }
}

impl MockEvm {
    pub fn with_behavior(mut self, contract: Address, behavior: ContractBehavior) -> Self {
        self.behaviors.insert(contract, behavior);
        self
    }

    /// Credit `amount` of `token` to `holder`, bypassing transfer rules.
    pub fn fund(
        &self,
        storage: &mut dyn Storage,
        token: Address,
        holder: Address,
        amount: U256,
    ) -> StdResult<()> {
        TOKEN_BALANCES.may_update(storage, (token, holder), |balance| -> StdResult<_> {
            Ok(balance.unwrap_or_default() + amount)
        })?;

        Ok(())
    }

    pub fn token_balance(
        &self,
        storage: &dyn Storage,
        token: Address,
        holder: Address,
    ) -> StdResult<U256> {
        Ok(TOKEN_BALANCES
            .may_load(storage, (token, holder))?
            .unwrap_or_default())
    }

    pub fn token_allowance(
        &self,
        storage: &dyn Storage,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> StdResult<U256> {
        Ok(TOKEN_ALLOWANCES
            .may_load(storage, (token, owner, spender))?
            .unwrap_or_default())
    }

    /// Install a contract account with placeholder bytecode at the address.
    pub fn deploy(&self, storage: &mut dyn Storage, address: Address) -> StdResult<()> {
        let code_hash = self.save_code(storage, &[0xfe])?;
        self.save_account(storage, address, &EvmAccount {
            nonce: 1,
            balance: U256::ZERO,
            code_hash,
        })
    }

    fn charge(&self, gas_limit: Option<u64>) -> Result<u64, EvmError> {
        if gas_limit.is_some_and(|limit| limit < self.gas_per_call) {
            return Err(EvmError::new("out of gas"));
        }

        Ok(self.gas_per_call)
    }

    fn move_tokens(
        storage: &mut dyn Storage,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), EvmError> {
        TOKEN_BALANCES
            .may_update(storage, (token, from), |balance| {
                balance
                    .unwrap_or_default()
                    .checked_sub(amount)
                    .ok_or_else(|| EvmError::new("erc20: transfer amount exceeds balance"))
            })?;

        TOKEN_BALANCES
            .may_update(storage, (token, to), |balance| -> Result<_, EvmError> {
                Ok(balance.unwrap_or_default() + amount)
            })?;

        Ok(())
    }
}

fn bool_word(value: bool) -> Vec<u8> {
    U256::from(value as u8).to_be_bytes::<32>().to_vec()
}

impl EvmExecutor for MockEvm {
    fn call_erc20(
        &self,
        storage: &mut dyn Storage,
        caller: Address,
        contract: Address,
        call: Erc20Call,
        gas_limit: Option<u64>,
    ) -> Result<EvmResponse, EvmError> {
        let gas_used = self.charge(gas_limit)?;
        let behavior = self.behaviors.get(&contract);

        if behavior == Some(&ContractBehavior::Revert) {
            return Err(EvmError::new("execution reverted"));
        }

        let mut logs = Vec::new();
        let ret = match call {
            Erc20Call::Approve { spender, amount } => {
                if behavior == Some(&ContractBehavior::ApproveReturnsFalse) {
                    bool_word(false)
                } else {
                    TOKEN_ALLOWANCES.save(storage, (contract, caller, spender), &amount)?;
                    logs.push(EvmLog::approval(contract, caller, spender, amount));
                    bool_word(true)
                }
            },

            Erc20Call::Transfer { to, amount } => {
                let credited = if behavior == Some(&ContractBehavior::TransferShortsReceiver) {
                    amount - U256::from(1)
                } else {
                    amount
                };
                Self::move_tokens(storage, contract, caller, to, credited)?;

                match behavior {
                    Some(ContractBehavior::TransferWithoutLog) => {},
                    Some(ContractBehavior::TransferEmitsApproval) => {
                        logs.push(EvmLog::transfer(contract, caller, to, credited));
                        logs.push(EvmLog::approval(contract, caller, to, credited));
                    },
                    _ => logs.push(EvmLog::transfer(contract, caller, to, credited)),
                }

                bool_word(true)
            },

            Erc20Call::TransferFrom { from, to, amount } => {
                TOKEN_ALLOWANCES.may_update(storage, (contract, from, caller), |allowance| {
                    allowance
                        .unwrap_or_default()
                        .checked_sub(amount)
                        .ok_or_else(|| EvmError::new("erc20: insufficient allowance"))
                })?;
                Self::move_tokens(storage, contract, from, to, amount)?;
                logs.push(EvmLog::transfer(contract, from, to, amount));

                bool_word(true)
            },

            Erc20Call::BalanceOf { account } => TOKEN_BALANCES
                .may_load(storage, (contract, account))?
                .unwrap_or_default()
                .to_be_bytes::<32>()
                .to_vec(),

            Erc20Call::Name => b"Mock Token".to_vec(),
            Erc20Call::Symbol => b"MOCK".to_vec(),
            Erc20Call::Decimals => U256::from(18).to_be_bytes::<32>().to_vec(),
        };

        Ok(EvmResponse {
            ret,
            gas_used,
            logs,
        })
    }

    fn call_raw(
        &self,
        storage: &mut dyn Storage,
        caller: Address,
        contract: Address,
        _input: &[u8],
        gas_limit: Option<u64>,
    ) -> Result<EvmResponse, EvmError> {
        let gas_used = self.charge(gas_limit)?;

        let mut logs = Vec::new();
        match self.behaviors.get(&contract) {
            Some(ContractBehavior::Revert) => {
                return Err(EvmError::new("execution reverted"));
            },

            Some(ContractBehavior::DrainAllowance { token }) => {
                let allowance = TOKEN_ALLOWANCES
                    .may_load(storage, (*token, caller, contract))?
                    .unwrap_or_default();
                if !allowance.is_zero() {
                    TOKEN_ALLOWANCES.remove(storage, (*token, caller, contract));
                    Self::move_tokens(storage, *token, caller, contract, allowance)?;
                    logs.push(EvmLog::transfer(*token, caller, contract, allowance));
                }
            },

            _ => {},
        }

        Ok(EvmResponse {
            ret: Vec::new(),
            gas_used,
            logs,
        })
    }

    fn call_lifecycle(
        &self,
        storage: &mut dyn Storage,
        _caller: Address,
        contract: Address,
        call: LifecycleCall,
        gas_limit: Option<u64>,
    ) -> Result<EvmResponse, EvmError> {
        let gas_used = self.charge(gas_limit)?;

        if self.behaviors.get(&contract) == Some(&ContractBehavior::Revert) {
            return Err(EvmError::new("execution reverted"));
        }

        let entry = match call {
            LifecycleCall::Acknowledgement {
                source_channel,
                sequence,
                ..
            } => format!("{contract}: onPacketAcknowledgement {source_channel} {sequence}"),
            LifecycleCall::Timeout {
                source_channel,
                sequence,
                ..
            } => format!("{contract}: onPacketTimeout {source_channel} {sequence}"),
        };

        let mut log = LIFECYCLE_LOG.may_load(storage)?.unwrap_or_default();
        log.push(entry);
        LIFECYCLE_LOG.save(storage, &log)?;

        Ok(EvmResponse {
            ret: Vec::new(),
            gas_used,
            logs: Vec::new(),
        })
    }

    fn account(&self, storage: &dyn Storage, address: Address) -> StdResult<Option<EvmAccount>> {
        ACCOUNTS.may_load(storage, address)
    }

    fn save_account(
        &self,
        storage: &mut dyn Storage,
        address: Address,
        account: &EvmAccount,
    ) -> StdResult<()> {
        ACCOUNTS.save(storage, address, account)
    }

    fn code(&self, storage: &dyn Storage, code_hash: B256) -> StdResult<Option<Vec<u8>>> {
        CODES.may_load(storage, code_hash)
    }

    fn save_code(&self, storage: &mut dyn Storage, bytecode: &[u8]) -> StdResult<B256> {
        let code_hash = keccak256(bytecode);
        CODES.save(storage, code_hash, &bytecode.to_vec())?;

        Ok(code_hash)
    }
}
