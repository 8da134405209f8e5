use {
    crate::EvmError,
    erc20_types::{keccak256, Address, Denom, StdError, StdResult, Storage, B256, U256},
    serde::{Deserialize, Serialize},
    sha2::{Digest, Sha256},
    std::sync::LazyLock,
};

/// The bridge module's own account address, holder of escrowed balances.
pub static MODULE_ADDRESS: LazyLock<Address> =
    LazyLock::new(|| Address::from_slice(&Sha256::digest(b"erc20")[..20]));

/// Topic of the ERC-20 `Transfer(address,address,uint256)` event.
pub static TRANSFER_TOPIC: LazyLock<B256> =
    LazyLock::new(|| keccak256(b"Transfer(address,address,uint256)"));

/// Topic of the ERC-20 `Approval(address,address,uint256)` event.
pub static APPROVAL_TOPIC: LazyLock<B256> =
    LazyLock::new(|| keccak256(b"Approval(address,address,uint256)"));

/// Chain-level knobs the bridge is constructed with, as opposed to the
/// governance-adjustable [`Params`](erc20_types::Params) kept in state.
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// The staking denom. Inbound packets carrying it always pass through.
    pub bond_denom: Denom,
    /// Denom namespaces the bridge leaves entirely alone, e.g. token factory
    /// denoms under `factory/...`.
    pub excluded_namespaces: Vec<String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            bond_denom: Denom::new_unchecked("ustake"),
            excluded_namespaces: vec!["factory".to_string()],
        }
    }
}

/// The bridge keeper. Generic over its three collaborators so that tests can
/// substitute mocks without touching the conversion logic.
pub struct Keeper<B, E, A> {
    pub bank: B,
    pub evm: E,
    pub accounts: A,
    pub config: ConversionConfig,
}

impl<B, E, A> Keeper<B, E, A> {
    pub fn new(bank: B, evm: E, accounts: A, config: ConversionConfig) -> Self {
        Self {
            bank,
            evm,
            accounts,
            config,
        }
    }
}

// --------------------------------- bank ----------------------------------

/// The slice of the bank module the bridge needs: moving coins in and out of
/// escrow, and the transfer-policy checks consulted before minting.
pub trait BankKeeper {
    fn balance(&self, storage: &dyn Storage, address: Address, denom: &Denom) -> StdResult<U256>;

    fn send(
        &self,
        storage: &mut dyn Storage,
        from: Address,
        to: Address,
        denom: &Denom,
        amount: U256,
    ) -> StdResult<()>;

    fn is_send_enabled(&self, storage: &dyn Storage, denom: &Denom) -> bool;

    /// Whether the address is barred from receiving funds, e.g. a module
    /// escrow account.
    fn is_blocked(&self, address: Address) -> bool;
}

// -------------------------------- accounts --------------------------------

pub trait AccountRegistry {
    fn is_module_account(&self, storage: &dyn Storage, address: Address) -> bool;

    /// Make sure an account record exists for the address, creating an empty
    /// one if necessary.
    fn ensure_account(&self, storage: &mut dyn Storage, address: Address) -> StdResult<()>;
}

// ---------------------------------- vm ------------------------------------

/// An account as the embedded VM sees it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EvmAccount {
    pub nonce: u64,
    pub balance: U256,
    pub code_hash: B256,
}

impl EvmAccount {
    pub fn new_eoa() -> Self {
        Self {
            nonce: 0,
            balance: U256::ZERO,
            code_hash: keccak256(b""),
        }
    }

    pub fn has_code(&self) -> bool {
        self.code_hash != B256::ZERO && self.code_hash != keccak256(b"")
    }
}

/// An event emitted by a contract during a VM call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EvmLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Vec<u8>,
}

impl EvmLog {
    pub fn transfer(token: Address, from: Address, to: Address, amount: U256) -> Self {
        Self {
            address: token,
            topics: vec![
                *TRANSFER_TOPIC,
                from.into_word(),
                to.into_word(),
            ],
            data: amount.to_be_bytes::<32>().to_vec(),
        }
    }

    pub fn approval(token: Address, owner: Address, spender: Address, amount: U256) -> Self {
        Self {
            address: token,
            topics: vec![
                *APPROVAL_TOPIC,
                owner.into_word(),
                spender.into_word(),
            ],
            data: amount.to_be_bytes::<32>().to_vec(),
        }
    }

    pub fn is_transfer(&self) -> bool {
        self.topics.first() == Some(&*TRANSFER_TOPIC)
    }

    pub fn is_approval(&self) -> bool {
        self.topics.first() == Some(&*APPROVAL_TOPIC)
    }
}

/// The outcome of a successful VM call. Reverts and other failures surface as
/// [`EvmError`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmResponse {
    pub ret: Vec<u8>,
    pub gas_used: u64,
    pub logs: Vec<EvmLog>,
}

impl EvmResponse {
    /// Interpret the return data as an ABI boolean: a word whose last byte is
    /// one and all other bytes are zero.
    pub fn ret_bool(&self) -> bool {
        match self.ret.split_last() {
            Some((last, rest)) => *last == 1 && rest.iter().all(|b| *b == 0),
            None => false,
        }
    }

    /// Interpret the return data as a big-endian unsigned integer of at most
    /// one word.
    pub fn ret_u256(&self) -> StdResult<U256> {
        if self.ret.len() > 32 {
            return Err(StdError::invalid_amount(
                self.ret.len(),
                "return data longer than one word",
            ));
        }

        Ok(U256::from_be_slice(&self.ret))
    }
}

/// A call into the standard ERC-20 interface of a contract. The executor owns
/// the ABI encoding; conversion logic works at this level only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Erc20Call {
    Approve { spender: Address, amount: U256 },
    Transfer { to: Address, amount: U256 },
    TransferFrom { from: Address, to: Address, amount: U256 },
    BalanceOf { account: Address },
    Name,
    Symbol,
    Decimals,
}

/// A call into the packet lifecycle interface implemented by contracts that
/// subscribe to source-side callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleCall<'a> {
    Acknowledgement {
        source_channel: &'a str,
        source_port: &'a str,
        sequence: u64,
        data: &'a [u8],
        acknowledgement: &'a [u8],
    },
    Timeout {
        source_channel: &'a str,
        source_port: &'a str,
        sequence: u64,
        data: &'a [u8],
    },
}

/// The slice of the embedded VM the bridge needs.
///
/// All state lives in the storage handed to each method, so that running a
/// call against a buffered storage sandboxes it: dropping the buffer discards
/// every side effect of the call.
pub trait EvmExecutor {
    fn call_erc20(
        &self,
        storage: &mut dyn Storage,
        caller: Address,
        contract: Address,
        call: Erc20Call,
        gas_limit: Option<u64>,
    ) -> Result<EvmResponse, EvmError>;

    fn call_raw(
        &self,
        storage: &mut dyn Storage,
        caller: Address,
        contract: Address,
        input: &[u8],
        gas_limit: Option<u64>,
    ) -> Result<EvmResponse, EvmError>;

    fn call_lifecycle(
        &self,
        storage: &mut dyn Storage,
        caller: Address,
        contract: Address,
        call: LifecycleCall,
        gas_limit: Option<u64>,
    ) -> Result<EvmResponse, EvmError>;

    fn account(&self, storage: &dyn Storage, address: Address) -> StdResult<Option<EvmAccount>>;

    fn save_account(
        &self,
        storage: &mut dyn Storage,
        address: Address,
        account: &EvmAccount,
    ) -> StdResult<()>;

    fn code(&self, storage: &dyn Storage, code_hash: B256) -> StdResult<Option<Vec<u8>>>;

    /// Store bytecode in the content-addressed code store, returning its
    /// hash. Idempotent.
    fn save_code(&self, storage: &mut dyn Storage, bytecode: &[u8]) -> StdResult<B256>;
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_return_data() {
        let mut res = EvmResponse {
            ret: U256::from(1).to_be_bytes::<32>().to_vec(),
            gas_used: 0,
            logs: vec![],
        };
        assert!(res.ret_bool());

        res.ret = U256::from(2).to_be_bytes::<32>().to_vec();
        assert!(!res.ret_bool());

        res.ret = vec![];
        assert!(!res.ret_bool());
    }

    #[test]
    fn log_classification() {
        let token = Address::repeat_byte(1);
        let a = Address::repeat_byte(2);
        let b = Address::repeat_byte(3);

        let log = EvmLog::transfer(token, a, b, U256::from(5));
        assert!(log.is_transfer());
        assert!(!log.is_approval());

        let log = EvmLog::approval(token, a, b, U256::from(5));
        assert!(log.is_approval());
    }

    #[test]
    fn fresh_accounts_have_no_code() {
        assert!(!EvmAccount::new_eoa().has_code());
    }
}
