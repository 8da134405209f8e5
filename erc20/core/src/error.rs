use {
    erc20_types::{Address, Denom, StdError, U256},
    thiserror::Error,
};

/// A failed call into the embedded VM. The reason string is whatever the VM
/// reported, typically a revert message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("vm call failed: {reason}")]
pub struct EvmError {
    pub reason: String,
}

impl EvmError {
    pub fn new<R>(reason: R) -> Self
    where
        R: ToString,
    {
        Self {
            reason: reason.to_string(),
        }
    }
}

// Lets VM implementations bubble storage errors out of a call with `?`.
impl From<StdError> for EvmError {
    fn from(err: StdError) -> Self {
        Self::new(err)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    Evm(#[from] EvmError),

    #[error("conversion is disabled by module params")]
    ConversionDisabled,

    #[error("registration of new token pairs is restricted to governance")]
    RegistrationRestricted,

    #[error("token pair not found for `{token}`")]
    TokenPairNotFound { token: String },

    #[error("conversion is disabled for pair `{denom}` ({erc20_address})")]
    TokenPairDisabled {
        denom: Denom,
        erc20_address: Address,
    },

    #[error("token `{token}` is already registered")]
    TokenAlreadyRegistered { token: String },

    #[error("denom `{denom}` cannot be transferred by the bank")]
    SendDisabled { denom: Denom },

    #[error("receiver `{receiver}` is not allowed to receive funds")]
    BlockedReceiver { receiver: Address },

    #[error("contract `{address}` has no code")]
    ContractHasNoCode { address: Address },

    #[error("precompiled contract `{address}` is enabled but not initialized with a token pair")]
    PrecompileNotInitialized { address: Address },

    #[error("contract `{contract}` emitted an unexpected `{event}` event")]
    UnexpectedEvent {
        contract: Address,
        event: &'static str,
    },

    #[error("contract `{contract}` did not emit the expected `{event}` event")]
    MissingEvent {
        contract: Address,
        event: &'static str,
    },

    #[error("balance invariant violated on `{erc20_address}`: expected {expected}, got {actual}")]
    BalanceInvariance {
        erc20_address: Address,
        expected: U256,
        actual: U256,
    },
}

impl Error {
    pub fn token_pair_not_found<T>(token: T) -> Self
    where
        T: ToString,
    {
        Self::TokenPairNotFound {
            token: token.to_string(),
        }
    }

    pub fn token_already_registered<T>(token: T) -> Self
    where
        T: ToString,
    {
        Self::TokenAlreadyRegistered {
            token: token.to_string(),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
