use {
    crate::Denom,
    alloy::primitives::{Address, B256, U256},
    serde::{Deserialize, Serialize},
};

/// An inbound voucher denom was seen for the first time and a bridge pair was
/// created for it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PairRegistered {
    pub id: B256,
    pub denom: Denom,
    pub erc20_address: Address,
    /// The channel the registering packet arrived on, if the pair was created
    /// by packet handling rather than by governance.
    pub channel: Option<String>,
}

/// A bridge pair's conversion switch was flipped.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PairToggled {
    pub id: B256,
    pub denom: Denom,
    pub erc20_address: Address,
    pub enabled: bool,
}

/// A bank balance was converted into its contract representation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CoinConverted {
    pub sender: Address,
    pub receiver: Address,
    pub denom: Denom,
    pub erc20_address: Address,
    pub amount: U256,
}

/// A conversion attempted during refund handling failed. The refund of the
/// bank balance itself still went through; only the hand-off to the contract
/// representation is left undone.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConversionFailed {
    pub denom: Denom,
    pub erc20_address: Address,
    pub amount: U256,
    pub reason: String,
}

/// A packet lifecycle callback was dispatched to a contract.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CallbackExecuted {
    pub contract: Address,
    pub callback_type: CallbackType,
    pub gas_used: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CallbackType {
    ReceivePacket,
    Acknowledgement,
    Timeout,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    PairRegistered(PairRegistered),
    PairToggled(PairToggled),
    CoinConverted(CoinConverted),
    ConversionFailed(ConversionFailed),
    CallbackExecuted(CallbackExecuted),
}

macro_rules! impl_from_event {
    ($($variant:ident),+ $(,)?) => {
        $(impl From<$variant> for Event {
            fn from(event: $variant) -> Self {
                Event::$variant(event)
            }
        })+
    };
}

impl_from_event! {
    PairRegistered,
    PairToggled,
    CoinConverted,
    ConversionFailed,
    CallbackExecuted,
}
