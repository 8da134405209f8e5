use {
    crate::{StdError, StdResult},
    alloy::primitives::Address,
    serde::{de, Serialize},
    sha2::{Digest, Sha256},
    std::{
        fmt::{self, Display, Formatter},
        str::FromStr,
    },
};

/// Prefix of voucher denominations minted for bridged balances, e.g.
/// `ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2`.
pub const VOUCHER_PREFIX: &str = "ibc/";

/// Prefix of ledger denominations that wrap a real VM contract's balance,
/// e.g. `erc20:0xdAC17F958D2ee523a2206206994597C13D831ec7`.
///
/// The literal includes the colon. Matching or trimming with a slash variant
/// silently resolves to the wrong record, so all prefix logic must go through
/// the helpers here.
pub const ERC20_PREFIX: &str = "erc20:";

/// A validated ledger denomination.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Denom(String);

impl Denom {
    /// Create a denom without validation. Only use in constants and tests.
    pub fn new_unchecked<T>(s: T) -> Self
    where
        T: Into<String>,
    {
        Self(s.into())
    }

    /// The synthetic denom wrapping the given VM contract's balance.
    pub fn erc20(address: Address) -> Self {
        Self(format!("{ERC20_PREFIX}{}", address.to_checksum(None)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_voucher(&self) -> bool {
        self.0.starts_with(VOUCHER_PREFIX)
    }

    /// The namespace is the first path segment, e.g. `factory` for
    /// `factory/osmo1.../bitcoin`. A denom without a slash has no namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.0.split_once('/').map(|(ns, _)| ns)
    }

    /// If this is an `erc20:`-prefixed synthetic denom, the wrapped contract
    /// address.
    pub fn as_erc20_address(&self) -> Option<Address> {
        let hex = self.0.strip_prefix(ERC20_PREFIX)?;
        Address::from_str(hex).ok()
    }
}

impl AsRef<str> for Denom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Denom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Denom {
    type Error = StdError;

    fn try_from(s: String) -> StdResult<Self> {
        if s.len() < 2 {
            return Err(StdError::invalid_denom(s, "too short"));
        }

        if s.len() > 128 {
            return Err(StdError::invalid_denom(s, "too long"));
        }

        if !s
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '/' | ':' | '.' | '_' | '-'))
        {
            return Err(StdError::invalid_denom(s, "illegal character"));
        }

        Ok(Self(s))
    }
}

impl TryFrom<&str> for Denom {
    type Error = StdError;

    fn try_from(s: &str) -> StdResult<Self> {
        Denom::try_from(s.to_string())
    }
}

impl FromStr for Denom {
    type Err = StdError;

    fn from_str(s: &str) -> StdResult<Self> {
        Denom::try_from(s.to_string())
    }
}

impl<'de> de::Deserialize<'de> for Denom {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Denom::try_from(s).map_err(de::Error::custom)
    }
}

/// The number of decimals implied by a base denomination's metric prefix:
/// micro (`u`) is 6, atto (`a`) is 18. Anything else is an error.
pub fn derive_decimals(base_denom: &str) -> StdResult<u8> {
    match base_denom.chars().next() {
        Some('u') => Ok(6),
        Some('a') => Ok(18),
        Some(_) => Err(StdError::invalid_denom(
            base_denom,
            "expecting a micro (`u`) or atto (`a`) metric prefix",
        )),
        None => Err(StdError::invalid_denom(
            base_denom,
            "base denom cannot be empty",
        )),
    }
}

// ------------------------------- trace path ---------------------------------

/// A packet denomination interpreted as a transfer trace: zero or more
/// port/channel hops followed by the base denom, e.g.
/// `transfer/channel-0/uatom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceDenom {
    hops: Vec<(String, String)>,
    base: String,
}

impl TraceDenom {
    /// Parse a raw packet denom. Path segments pair up as (port, channel)
    /// hops; the remainder is the base denom. An odd-looking tail (e.g. a
    /// base denom that itself contains slashes, like `factory/...`) is kept
    /// as the base.
    pub fn parse(raw: &str) -> Self {
        let segments = raw.split('/').collect::<Vec<_>>();

        let mut hops = Vec::new();
        let mut index = 0;
        while index + 1 < segments.len() && is_channel_id(segments[index + 1]) {
            hops.push((segments[index].to_string(), segments[index + 1].to_string()));
            index += 2;
        }

        Self {
            hops,
            base: segments[index..].join("/"),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether the first hop matches the given port and channel, i.e. this
    /// chain is the origin of the token per the packet's source identifiers.
    pub fn has_prefix(&self, port: &str, channel: &str) -> bool {
        self.hops
            .first()
            .is_some_and(|(p, c)| p == port && c == channel)
    }

    /// Drop the first hop. Panics if there is none; callers must check
    /// `has_prefix` first.
    pub fn trim_first_hop(&mut self) {
        self.hops.remove(0);
    }

    /// Prepend a hop for this chain's destination port and channel.
    pub fn prepend_hop(&mut self, port: &str, channel: &str) {
        self.hops.insert(0, (port.to_string(), channel.to_string()));
    }

    /// The full trace path, hops joined with the base denom.
    pub fn path(&self) -> String {
        let mut out = String::new();
        for (port, channel) in &self.hops {
            out.push_str(port);
            out.push('/');
            out.push_str(channel);
            out.push('/');
        }
        out.push_str(&self.base);
        out
    }

    /// The ledger denomination this trace resolves to: the base denom if
    /// there are no hops, otherwise the `ibc/<hash>` voucher denom derived
    /// from the full path.
    pub fn into_ledger_denom(self) -> Denom {
        if self.hops.is_empty() {
            Denom::new_unchecked(self.base)
        } else {
            let hash = Sha256::digest(self.path().as_bytes());
            let mut out = String::with_capacity(VOUCHER_PREFIX.len() + 64);
            out.push_str(VOUCHER_PREFIX);
            for byte in hash {
                out.push_str(&format!("{byte:02X}"));
            }
            Denom::new_unchecked(out)
        }
    }
}

fn is_channel_id(segment: &str) -> bool {
    segment
        .strip_prefix("channel-")
        .is_some_and(|tail| !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()))
}

// ----------------------------------- tests -----------------------------------
