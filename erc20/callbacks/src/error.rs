use {
    erc20_types::{Address, StdError, U256},
    thiserror::Error,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    Core(#[from] erc20_core::Error),

    #[error("receiver `{receiver}` does not match the isolated address `{expected}` for this channel and sender")]
    ReceiverNotIsolated {
        receiver: Address,
        expected: Address,
    },

    #[error("callback target `{address}` has no code")]
    ContractHasNoCode { address: Address },

    #[error("calldata is only allowed on destination callbacks")]
    UnexpectedCalldata,

    #[error("token pair not found for received denom `{denom}`")]
    TokenPairNotFound { denom: String },

    #[error("contract `{contract}` did not accept the allowance")]
    AllowanceNotAccepted { contract: Address },

    #[error("contract `{contract}` left {remaining} tokens unrecoverable on the isolated address")]
    UnrecoverableTokens {
        contract: Address,
        remaining: U256,
    },
}

impl From<erc20_core::EvmError> for Error {
    fn from(err: erc20_core::EvmError) -> Self {
        Self::Core(err.into())
    }
}

pub type Result<T> = core::result::Result<T, Error>;
