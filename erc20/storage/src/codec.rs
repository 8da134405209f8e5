use {
    erc20_types::{StdError, StdResult},
    serde::{de::DeserializeOwned, ser::Serialize},
};

/// How a container's values are converted to and from raw bytes.
///
/// Every [`Map`](crate::Map) and [`Item`](crate::Item) picks a codec as a
/// type parameter, defaulting to [`Serde`].
pub trait Codec<T> {
    fn to_bytes(data: &T) -> StdResult<Vec<u8>>;

    fn from_bytes(bytes: &[u8]) -> StdResult<T>;
}

/// JSON encoding via `serde_json`.
pub struct Serde;

impl<T> Codec<T> for Serde
where
    T: Serialize + DeserializeOwned,
{
    fn to_bytes(data: &T) -> StdResult<Vec<u8>> {
        serde_json::to_vec(data).map_err(|err| StdError::serialize::<T, _>("json", err))
    }

    fn from_bytes(bytes: &[u8]) -> StdResult<T> {
        serde_json::from_slice(bytes).map_err(|err| StdError::deserialize::<T, _>("json", err))
    }
}

/// No encoding at all; the value already is raw bytes. Used where JSON would
/// only add overhead, e.g. contract bytecode keyed by its hash.
pub struct Raw;

impl Codec<Vec<u8>> for Raw {
    fn to_bytes(data: &Vec<u8>) -> StdResult<Vec<u8>> {
        Ok(data.clone())
    }

    fn from_bytes(bytes: &[u8]) -> StdResult<Vec<u8>> {
        Ok(bytes.to_vec())
    }
}
