use {
    crate::{Binary, StdError, StdResult},
    alloy::primitives::{Address, U256},
    serde::{Deserialize, Serialize},
    sha2::{Digest, Sha256},
    std::{str::FromStr, sync::LazyLock},
};

/// The 32-byte sentinel acknowledgement written when a packet's effects must
/// be reverted without leaking the failure reason onto the wire.
pub static UNIVERSAL_ERROR_ACK: LazyLock<[u8; 32]> =
    LazyLock::new(|| Sha256::digest(b"UNIVERSAL ERROR ACKNOWLEDGEMENT").into());

pub fn is_universal_error_ack(bytes: &[u8]) -> bool {
    bytes == UNIVERSAL_ERROR_ACK.as_slice()
}

/// A fungible token transfer packet, in the JSON schema of the ICS-20
/// transfer application.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FungibleTokenPacketData {
    pub denom: String,
    pub amount: String,
    pub sender: String,
    pub receiver: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
}

impl FungibleTokenPacketData {
    pub fn amount(&self) -> StdResult<U256> {
        U256::from_str(&self.amount)
            .map_err(|_| StdError::invalid_amount(&self.amount, "not a base-10 unsigned integer"))
    }

    /// The receiver parsed as a VM address. Errors if it isn't a 0x-prefixed
    /// 20-byte hex string.
    pub fn receiver_address(&self) -> StdResult<Address> {
        parse_address(&self.receiver)
    }

    pub fn sender_address(&self) -> StdResult<Address> {
        parse_address(&self.sender)
    }
}

fn parse_address(s: &str) -> StdResult<Address> {
    Address::from_str(s).map_err(|err| StdError::invalid_address(s, err))
}

/// The transport-level packet envelope. `data` is the JSON-encoded
/// [`FungibleTokenPacketData`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub sequence: u64,
    pub source_port: String,
    pub source_channel: String,
    pub destination_port: String,
    pub destination_channel: String,
    pub data: Binary,
}

impl Packet {
    pub fn parse_data(&self) -> StdResult<FungibleTokenPacketData> {
        serde_json::from_slice(&self.data)
            .map_err(|err| StdError::deserialize::<FungibleTokenPacketData, _>("json", err))
    }
}

/// A transfer acknowledgement, in the JSON schema of the ICS-20 transfer
/// application: either `{"result": "<base64>"}` or `{"error": "<message>"}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Acknowledgement {
    Result(Binary),
    Error(String),
}

impl Acknowledgement {
    pub fn success() -> Self {
        // The conventional non-empty success payload, `base64(0x01)`.
        Self::Result(Binary::from([1]))
    }

    pub fn error<E>(err: E) -> Self
    where
        E: ToString,
    {
        Self::Error(err.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Result(_))
    }

    pub fn encode(&self) -> Vec<u8> {
        // Serialization of this enum to JSON cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Decode acknowledgement bytes. The universal error sentinel is not
    /// JSON; it decodes to an error with a fixed message.
    pub fn decode(bytes: &[u8]) -> StdResult<Self> {
        if is_universal_error_ack(bytes) {
            return Ok(Self::Error("universal error acknowledgement".to_string()));
        }

        serde_json::from_slice(bytes)
            .map_err(|err| StdError::deserialize::<Acknowledgement, _>("json", err))
    }
}

// ----------------------------------- tests -----------------------------------
