use {
    crate::{StdError, StdResult},
    alloy::primitives::Address,
    data_encoding::HEXLOWER_PERMISSIVE,
    serde::{Deserialize, Serialize},
    std::str::FromStr,
};

/// The packet memo as interpreted by the callback middleware. Senders request
/// callbacks by embedding `dest_callback` and/or `src_callback` objects in
/// the transfer memo.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackMemo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_callback: Option<CallbackRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_callback: Option<CallbackRequest>,
}

impl CallbackMemo {
    /// Parse a raw memo string. A memo that is empty, not JSON, or JSON
    /// without callback keys simply requests no callbacks; only a malformed
    /// callback object is an error.
    pub fn parse(memo: &str) -> StdResult<Self> {
        if memo.is_empty() {
            return Ok(Self::default());
        }

        let value: serde_json::Value = match serde_json::from_str(memo) {
            Ok(value) => value,
            Err(_) => return Ok(Self::default()),
        };

        if !value.is_object() {
            return Ok(Self::default());
        }

        serde_json::from_value(value)
            .map_err(|err| StdError::deserialize::<CallbackMemo, _>("json", err))
    }
}

/// A single callback request, all fields in their wire (string) form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CallbackRequest {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calldata: Option<String>,
}

impl CallbackRequest {
    pub fn address(&self) -> StdResult<Address> {
        Address::from_str(&self.address)
            .map_err(|err| StdError::invalid_address(&self.address, err))
    }

    /// The requested gas limit, a base-10 string on the wire.
    pub fn gas_limit(&self) -> StdResult<Option<u64>> {
        self.gas_limit
            .as_deref()
            .map(|s| {
                s.parse()
                    .map_err(|_| StdError::invalid_amount(s, "not a base-10 unsigned integer"))
            })
            .transpose()
    }

    /// The hex-encoded calldata, with or without a `0x` prefix.
    pub fn calldata(&self) -> StdResult<Option<Vec<u8>>> {
        self.calldata
            .as_deref()
            .map(|s| {
                let hex = s.strip_prefix("0x").unwrap_or(s);
                HEXLOWER_PERMISSIVE
                    .decode(hex.as_bytes())
                    .map_err(|err| StdError::deserialize::<Vec<u8>, _>("hex", err))
            })
            .transpose()
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_non_json_memos_request_nothing() {
        assert_eq!(CallbackMemo::parse("").unwrap(), CallbackMemo::default());
        assert_eq!(
            CallbackMemo::parse("just a note").unwrap(),
            CallbackMemo::default(),
        );
        assert_eq!(
            CallbackMemo::parse(r#"{"wasm":{}}"#).unwrap().dest_callback,
            None,
        );
    }

    #[test]
    fn parsing_a_dest_callback() {
        let memo = r#"{
            "dest_callback": {
                "address": "0x2222222222222222222222222222222222222222",
                "gas_limit": "500000",
                "calldata": "0xdeadbeef"
            }
        }"#;

        let parsed = CallbackMemo::parse(memo).unwrap();
        let request = parsed.dest_callback.unwrap();

        assert_eq!(request.address().unwrap(), Address::repeat_byte(0x22));
        assert_eq!(request.gas_limit().unwrap(), Some(500000));
        assert_eq!(request.calldata().unwrap(), Some(vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(parsed.src_callback, None);
    }

    #[test]
    fn malformed_callback_objects_are_errors() {
        let memo = r#"{"dest_callback": {"gas_limit": "500000"}}"#;
        assert!(CallbackMemo::parse(memo).is_err());
    }

    #[test]
    fn unprefixed_calldata_is_accepted() {
        let request = CallbackRequest {
            address: "0x2222222222222222222222222222222222222222".to_string(),
            gas_limit: None,
            calldata: Some("ABCD".to_string()),
        };

        assert_eq!(request.calldata().unwrap(), Some(vec![0xab, 0xcd]));
        assert_eq!(request.gas_limit().unwrap(), None);
    }
}
