mod accounts;
mod bank;
mod evm;

pub use {accounts::*, bank::*, evm::*};

use {
    erc20_core::{ConversionConfig, Keeper, MODULE_ADDRESS, PARAMS},
    erc20_types::{
        Address, Binary, Ctx, Denom, FungibleTokenPacketData, GasMeter, MockStorage, Owner,
        Packet, Params, TokenPair, U256,
    },
};

pub type TestKeeper = Keeper<MockBank, MockEvm, MockAccounts>;

/// A fresh context and keeper over empty storage, with default params
/// already saved.
pub fn setup() -> (Ctx, TestKeeper) {
    setup_with(
        MockBank::default(),
        MockEvm::default(),
        MockAccounts::default(),
    )
}

pub fn setup_with(bank: MockBank, evm: MockEvm, accounts: MockAccounts) -> (Ctx, TestKeeper) {
    let mut ctx: Ctx = Ctx::new(Box::new(MockStorage::new()), GasMeter::unlimited());
    let keeper = Keeper::new(bank, evm, accounts, ConversionConfig::default());

    PARAMS.save(&mut ctx.storage, &Params::default()).unwrap();

    (ctx, keeper)
}

/// Register an external ERC-20 pair and escrow `escrow` of its tokens with
/// the bridge, as if holders had previously sent them out over the transfer
/// channel.
pub fn seed_native_erc20(
    ctx: &mut Ctx,
    keeper: &TestKeeper,
    token: Address,
    escrow: U256,
) -> TokenPair {
    keeper.evm.deploy(&mut ctx.storage, token).unwrap();

    let pair = TokenPair {
        erc20_address: token,
        denom: Denom::erc20(token),
        enabled: true,
        owner: Owner::External,
    };
    keeper.set_token_pair(&mut ctx.storage, &pair).unwrap();

    keeper
        .evm
        .fund(&mut ctx.storage, token, *MODULE_ADDRESS, escrow)
        .unwrap();

    pair
}

/// An inbound transfer packet carrying the given raw denom and amount.
pub fn transfer_packet(raw_denom: &str, amount: U256, receiver: Address, memo: &str) -> Packet {
    let data = FungibleTokenPacketData {
        denom: raw_denom.to_string(),
        amount: amount.to_string(),
        sender: "cosmos1qperwt9wrnkg5k9e5gzfgjppzpqhyav5j24d66".to_string(),
        receiver: receiver.to_string(),
        memo: memo.to_string(),
    };

    Packet {
        sequence: 1,
        source_port: "transfer".to_string(),
        source_channel: "channel-0".to_string(),
        destination_port: "transfer".to_string(),
        destination_channel: "channel-7".to_string(),
        data: Binary::from(serde_json::to_vec(&data).unwrap()),
    }
}
