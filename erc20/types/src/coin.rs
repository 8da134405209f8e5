use {
    crate::Denom,
    alloy::primitives::U256,
    serde::{Deserialize, Serialize},
    std::fmt::{self, Display, Formatter},
};

/// An amount of a ledger denomination.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub denom: Denom,
    pub amount: U256,
}

impl Coin {
    pub fn new(denom: Denom, amount: U256) -> Self {
        Self { denom, amount }
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
