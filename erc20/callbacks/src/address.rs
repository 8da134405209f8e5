use {
    erc20_types::Address,
    sha2::{Digest, Sha256},
};

const ISOLATION_MODULE: &str = "ibc-callbacks";

/// `sha256(sha256(typ) ++ key)`, the composed hash underlying module account
/// address derivation.
fn hash(typ: &[u8], key: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(Sha256::digest(typ));
    hasher.update(key);
    hasher.finalize().into()
}

fn derive(address: &[u8], key: &[u8]) -> [u8; 32] {
    hash(address, key)
}

/// A module account address derived from the module name and a chain of
/// derivation keys.
pub fn module_address(name: &str, derivation_keys: &[&[u8]]) -> Vec<u8> {
    let Some((first, rest)) = derivation_keys.split_first() else {
        return Sha256::digest(name.as_bytes())[..20].to_vec();
    };

    let mut key = name.as_bytes().to_vec();
    key.push(0);
    key.extend_from_slice(first);

    let mut address = hash(b"module", &key);
    for derivation_key in rest {
        address = derive(&address, derivation_key);
    }

    address.to_vec()
}

/// The unique receiver address a callback-carrying packet must target,
/// derived from the channel it arrives on and the sender behind it.
///
/// Funds land on this address before the callback runs, so a contract
/// draining its allowance can never touch balances of any other
/// (channel, sender) combination.
pub fn isolated_address(channel_id: &str, sender: &str) -> Address {
    let address = module_address(
        ISOLATION_MODULE,
        &[channel_id.as_bytes(), sender.as_bytes()],
    );

    Address::from_slice(&address[..20])
}

// ----------------------------------- tests -----------------------------------
