use {
    crate::Denom,
    alloy::primitives::{keccak256, Address, B256},
    serde::{Deserialize, Serialize},
    sha2::{Digest, Sha256},
};

/// Who controls the contract side of a bridge pair.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    /// The bridge module deployed the contract; the token originated as a
    /// bank coin.
    Module,
    /// The contract pre-existed; the token originated in the VM.
    External,
}

/// A registered mapping between a bank denomination and a VM contract.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub erc20_address: Address,
    pub denom: Denom,
    pub enabled: bool,
    pub owner: Owner,
}

impl TokenPair {
    /// The pair created automatically when an unseen voucher denom arrives:
    /// module-owned, enabled, with the contract address derived from the
    /// denom.
    pub fn new_dynamic(denom: Denom) -> Self {
        Self {
            erc20_address: derive_erc20_address(&denom),
            denom,
            enabled: true,
            owner: Owner::Module,
        }
    }

    /// The pair's unique identifier, a hash over the checksummed contract
    /// address and the denom. Two pairs with the same address and denom are
    /// the same pair.
    pub fn id(&self) -> B256 {
        let mut hasher = Sha256::new();
        hasher.update(self.erc20_address.to_checksum(None).as_bytes());
        hasher.update(b"|");
        hasher.update(self.denom.as_str().as_bytes());
        B256::from_slice(&hasher.finalize())
    }

    pub fn is_native_coin(&self) -> bool {
        self.owner == Owner::Module
    }

    pub fn is_native_erc20(&self) -> bool {
        self.owner == Owner::External
    }
}

/// Deterministically derive the contract address for a module-owned pair from
/// its denom.
pub fn derive_erc20_address(denom: &Denom) -> Address {
    Address::from_slice(&keccak256(denom.as_str().as_bytes())[12..])
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_ids_are_stable() {
        let pair = TokenPair::new_dynamic(Denom::new_unchecked("ibc/ABCD"));

        assert_eq!(pair.id(), pair.clone().id());

        let other = TokenPair::new_dynamic(Denom::new_unchecked("ibc/EF01"));
        assert_ne!(pair.id(), other.id());
    }

    #[test]
    fn same_address_and_denom_means_same_id() {
        let a = TokenPair {
            erc20_address: Address::repeat_byte(0x22),
            denom: Denom::new_unchecked("uatom"),
            enabled: true,
            owner: Owner::Module,
        };
        let b = TokenPair {
            enabled: false,
            owner: Owner::External,
            ..a.clone()
        };

        // Only the address and denom feed the identifier.
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn dynamic_pairs_are_module_owned_and_enabled() {
        let pair = TokenPair::new_dynamic(Denom::new_unchecked("ibc/ABCD"));

        assert!(pair.enabled);
        assert!(pair.is_native_coin());
        assert!(!pair.is_native_erc20());
        assert_eq!(
            pair.erc20_address,
            derive_erc20_address(&Denom::new_unchecked("ibc/ABCD")),
        );
    }
}
