use {
    erc20_core::{received_coin, sent_coin, BankKeeper, MODULE_ADDRESS, PARAMS},
    erc20_testing::{
        seed_native_erc20, setup, setup_with, transfer_packet, ContractBehavior, MockAccounts,
        MockBank, MockEvm,
    },
    erc20_types::{
        Acknowledgement, Address, Binary, Ctx, Denom, Event, FungibleTokenPacketData, Owner,
        Packet, Params, TokenPair, UNIVERSAL_ERROR_ACK, U256,
    },
};

const TOKEN: Address = Address::repeat_byte(0xaa);
const RECEIVER: Address = Address::repeat_byte(0x11);

const AMOUNT: U256 = U256::from_limbs([100, 0, 0, 0]);

/// The raw denom under which an external ERC-20 of ours returns home: the
/// counterparty's hop, which matches the packet's source identifiers.
fn returning_denom(token: Address) -> String {
    format!("transfer/channel-0/{}", Denom::erc20(token))
}

fn recv(
    ctx: &mut Ctx,
    keeper: &erc20_testing::TestKeeper,
    packet: &Packet,
) -> Acknowledgement {
    keeper.on_recv_packet(ctx, packet, Acknowledgement::success())
}

// ------------------------------ receive path -------------------------------

#[test]
fn first_voucher_sighting_registers_a_pair() {
    let (mut ctx, keeper) = setup();

    let packet = transfer_packet("uatom", AMOUNT, RECEIVER, "");
    let ack = recv(&mut ctx, &keeper, &packet);
    assert!(ack.is_success());

    let coin = received_coin(&packet, "uatom", AMOUNT);
    let pair = keeper
        .pair_by_denom(&ctx.storage, &coin.denom)
        .unwrap()
        .expect("pair should have been auto-registered");

    assert!(pair.enabled);
    assert!(pair.is_native_coin());

    // The registration is announced with the channel it came from.
    assert!(matches!(
        &ctx.events[..],
        [Event::PairRegistered(event)] if event.channel.as_deref() == Some("channel-0"),
    ));

    // The derived address now resolves as a dynamic precompile.
    assert_eq!(
        keeper
            .precompile_instance(&ctx.storage, pair.erc20_address)
            .unwrap(),
        Some(pair),
    );

    // A second receipt of the same denom registers nothing new.
    let ack = recv(&mut ctx, &keeper, &packet);
    assert!(ack.is_success());
    assert_eq!(ctx.events.len(), 1);
}

#[test]
fn returning_erc20_converts_to_contract_tokens() {
    let (mut ctx, keeper) = setup();
    let pair = seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::from(1000));

    // The transfer application has already credited the vouchers.
    keeper
        .bank
        .mint(&mut ctx.storage, RECEIVER, &pair.denom, AMOUNT)
        .unwrap();

    let packet = transfer_packet(&returning_denom(TOKEN), AMOUNT, RECEIVER, "");
    let ack = recv(&mut ctx, &keeper, &packet);
    assert!(ack.is_success());

    // The receiver traded the vouchers for contract tokens out of escrow.
    assert_eq!(
        keeper
            .evm
            .token_balance(&ctx.storage, TOKEN, RECEIVER)
            .unwrap(),
        AMOUNT,
    );
    assert_eq!(
        keeper
            .evm
            .token_balance(&ctx.storage, TOKEN, *MODULE_ADDRESS)
            .unwrap(),
        U256::from(900),
    );
    assert_eq!(
        keeper
            .bank
            .balance(&ctx.storage, RECEIVER, &pair.denom)
            .unwrap(),
        U256::ZERO,
    );
    assert_eq!(
        keeper
            .bank
            .balance(&ctx.storage, *MODULE_ADDRESS, &pair.denom)
            .unwrap(),
        AMOUNT,
    );

    assert!(matches!(&ctx.events[..], [Event::CoinConverted(_)]));
}

#[test]
fn conversion_failure_answers_with_an_error_ack() {
    let evm = MockEvm::default()
        .with_behavior(TOKEN, ContractBehavior::TransferShortsReceiver);
    let (mut ctx, keeper) = setup_with(MockBank::default(), evm, MockAccounts::default());
    let pair = seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::from(1000));

    keeper
        .bank
        .mint(&mut ctx.storage, RECEIVER, &pair.denom, AMOUNT)
        .unwrap();

    let packet = transfer_packet(&returning_denom(TOKEN), AMOUNT, RECEIVER, "");
    let ack = recv(&mut ctx, &keeper, &packet);
    assert!(!ack.is_success());

    // The half-done conversion was discarded: the vouchers are still with
    // the receiver, the escrow untouched.
    assert_eq!(
        keeper
            .bank
            .balance(&ctx.storage, RECEIVER, &pair.denom)
            .unwrap(),
        AMOUNT,
    );
    assert_eq!(
        keeper
            .evm
            .token_balance(&ctx.storage, TOKEN, *MODULE_ADDRESS)
            .unwrap(),
        U256::from(1000),
    );
}

#[test]
fn blocked_receivers_fail_the_minting_guard() {
    let bank = MockBank {
        blocked: vec![RECEIVER],
        ..Default::default()
    };
    let (mut ctx, keeper) = setup_with(bank, MockEvm::default(), MockAccounts::default());
    let pair = seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::from(1000));

    keeper
        .bank
        .mint(&mut ctx.storage, RECEIVER, &pair.denom, AMOUNT)
        .unwrap();

    let packet = transfer_packet(&returning_denom(TOKEN), AMOUNT, RECEIVER, "");
    let ack = recv(&mut ctx, &keeper, &packet);

    assert!(!ack.is_success());
    assert!(matches!(&ctx.events[..], [Event::ConversionFailed(_)]));
}

#[test]
fn send_disabled_denoms_fail_the_minting_guard() {
    let bank = MockBank {
        send_disabled: vec![Denom::erc20(TOKEN)],
        ..Default::default()
    };
    let (mut ctx, keeper) = setup_with(bank, MockEvm::default(), MockAccounts::default());
    seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::from(1000));

    let packet = transfer_packet(&returning_denom(TOKEN), AMOUNT, RECEIVER, "");
    let ack = recv(&mut ctx, &keeper, &packet);

    assert!(!ack.is_success());
}

#[test]
fn disabled_pairs_pass_through() {
    let (mut ctx, keeper) = setup();
    let pair = seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::from(1000));
    keeper.toggle_conversion(&mut ctx, pair.id()).unwrap();
    ctx.events.clear();

    keeper
        .bank
        .mint(&mut ctx.storage, RECEIVER, &pair.denom, AMOUNT)
        .unwrap();

    let packet = transfer_packet(&returning_denom(TOKEN), AMOUNT, RECEIVER, "");
    let ack = recv(&mut ctx, &keeper, &packet);

    // No conversion, no error: the receiver keeps the vouchers.
    assert!(ack.is_success());
    assert!(ctx.events.is_empty());
    assert_eq!(
        keeper
            .bank
            .balance(&ctx.storage, RECEIVER, &pair.denom)
            .unwrap(),
        AMOUNT,
    );
}

#[test]
fn pass_through_cases() {
    let accounts = MockAccounts {
        module_accounts: vec![Address::repeat_byte(0x99)],
    };
    let (mut ctx, keeper) = setup_with(MockBank::default(), MockEvm::default(), accounts);

    // Module switch off: even a voucher sighting does nothing.
    PARAMS
        .save(&mut ctx.storage, &Params {
            enable_erc20: false,
            ..Default::default()
        })
        .unwrap();
    let packet = transfer_packet("uatom", AMOUNT, RECEIVER, "");
    assert!(recv(&mut ctx, &keeper, &packet).is_success());
    PARAMS.save(&mut ctx.storage, &Params::default()).unwrap();

    // Excluded namespace.
    let packet = transfer_packet("factory/creator123/bitcoin", AMOUNT, RECEIVER, "");
    assert!(recv(&mut ctx, &keeper, &packet).is_success());

    // The staking denom coming home.
    let packet = transfer_packet("transfer/channel-0/ustake", AMOUNT, RECEIVER, "");
    assert!(recv(&mut ctx, &keeper, &packet).is_success());

    // A module account receiving.
    let packet = transfer_packet("uatom", AMOUNT, Address::repeat_byte(0x99), "");
    assert!(recv(&mut ctx, &keeper, &packet).is_success());

    // None of these registered a pair or emitted an event.
    assert!(ctx.events.is_empty());
    assert_eq!(
        keeper
            .query_token_pairs(&ctx.storage, None, None)
            .unwrap()
            .len(),
        0,
    );
}

#[test]
fn undecodable_packet_data_is_an_error_ack() {
    let (mut ctx, keeper) = setup();

    let mut packet = transfer_packet("uatom", AMOUNT, RECEIVER, "");
    packet.data = Binary::from(b"not json".to_vec());

    assert!(!recv(&mut ctx, &keeper, &packet).is_success());

    // A non-integer amount is just as undecodable.
    let data = FungibleTokenPacketData {
        denom: "uatom".to_string(),
        amount: "10.5".to_string(),
        sender: "cosmos1sender".to_string(),
        receiver: RECEIVER.to_string(),
        memo: String::new(),
    };
    packet.data = Binary::from(serde_json::to_vec(&data).unwrap());

    assert!(!recv(&mut ctx, &keeper, &packet).is_success());
}

// ------------------------------ refund path --------------------------------

/// An outbound packet sending `amount` of the pair's voucher denom, with the
/// local (hex) sender refunds go back to.
fn outbound_packet(raw_denom: &str, amount: U256, sender: Address) -> Packet {
    let data = FungibleTokenPacketData {
        denom: raw_denom.to_string(),
        amount: amount.to_string(),
        sender: sender.to_string(),
        receiver: "cosmos1qperwt9wrnkg5k9e5gzfgjppzpqhyav5j24d66".to_string(),
        memo: String::new(),
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

#[test]
fn error_ack_converts_the_refund() {
    let (mut ctx, keeper) = setup();
    let pair = seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::from(1000));

    // The transfer application has refunded the vouchers to the sender.
    keeper
        .bank
        .mint(&mut ctx.storage, RECEIVER, &pair.denom, AMOUNT)
        .unwrap();

    let packet = outbound_packet(pair.denom.as_str(), AMOUNT, RECEIVER);
    keeper
        .on_acknowledgement_packet(&mut ctx, &packet, br#"{"error":"insufficient funds"}"#)
        .unwrap();

    // The refund was converted into contract tokens.
    assert_eq!(
        keeper
            .evm
            .token_balance(&ctx.storage, TOKEN, RECEIVER)
            .unwrap(),
        AMOUNT,
    );
    assert_eq!(
        keeper
            .bank
            .balance(&ctx.storage, RECEIVER, &pair.denom)
            .unwrap(),
        U256::ZERO,
    );
}

#[test]
fn success_ack_is_a_no_op() {
    let (mut ctx, keeper) = setup();
    let pair = seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::from(1000));

    keeper
        .bank
        .mint(&mut ctx.storage, RECEIVER, &pair.denom, AMOUNT)
        .unwrap();

    let packet = outbound_packet(pair.denom.as_str(), AMOUNT, RECEIVER);
    keeper
        .on_acknowledgement_packet(&mut ctx, &packet, br#"{"result":"AQ=="}"#)
        .unwrap();

    assert_eq!(
        keeper
            .bank
            .balance(&ctx.storage, RECEIVER, &pair.denom)
            .unwrap(),
        AMOUNT,
    );
    assert!(ctx.events.is_empty());
}

#[test]
fn universal_error_ack_triggers_the_refund() {
    let (mut ctx, keeper) = setup();
    let pair = seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::from(1000));

    keeper
        .bank
        .mint(&mut ctx.storage, RECEIVER, &pair.denom, AMOUNT)
        .unwrap();

    let packet = outbound_packet(pair.denom.as_str(), AMOUNT, RECEIVER);
    keeper
        .on_acknowledgement_packet(&mut ctx, &packet, UNIVERSAL_ERROR_ACK.as_slice())
        .unwrap();

    assert_eq!(
        keeper
            .evm
            .token_balance(&ctx.storage, TOKEN, RECEIVER)
            .unwrap(),
        AMOUNT,
    );
}

#[test]
fn timeout_converts_the_refund() {
    let (mut ctx, keeper) = setup();
    let pair = seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::from(1000));

    keeper
        .bank
        .mint(&mut ctx.storage, RECEIVER, &pair.denom, AMOUNT)
        .unwrap();

    let packet = outbound_packet(pair.denom.as_str(), AMOUNT, RECEIVER);
    keeper.on_timeout_packet(&mut ctx, &packet).unwrap();

    assert_eq!(
        keeper
            .evm
            .token_balance(&ctx.storage, TOKEN, RECEIVER)
            .unwrap(),
        AMOUNT,
    );
}

#[test]
fn refund_conversion_failures_are_swallowed() {
    let evm = MockEvm::default().with_behavior(TOKEN, ContractBehavior::Revert);
    let (mut ctx, keeper) = setup_with(MockBank::default(), evm, MockAccounts::default());
    let pair = seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::from(1000));

    keeper
        .bank
        .mint(&mut ctx.storage, RECEIVER, &pair.denom, AMOUNT)
        .unwrap();

    let packet = outbound_packet(pair.denom.as_str(), AMOUNT, RECEIVER);

    // The handler must not error: erroring here would jeopardize the refund
    // itself.
    keeper.on_timeout_packet(&mut ctx, &packet).unwrap();

    // The sender keeps the vouchers and can convert manually later.
    assert_eq!(
        keeper
            .bank
            .balance(&ctx.storage, RECEIVER, &pair.denom)
            .unwrap(),
        AMOUNT,
    );
    assert!(matches!(&ctx.events[..], [Event::ConversionFailed(_)]));
}

#[test]
fn refunds_resolve_the_denom_trace() {
    let (mut ctx, keeper) = setup();

    // An external contract registered under the voucher denom a multi-hop
    // trace hashes to. The pair is keyed by the voucher, not by the raw
    // packet denom.
    let raw_denom = "transfer/channel-0/uatom";
    let voucher = sent_coin(raw_denom, AMOUNT).denom;

    keeper.evm.deploy(&mut ctx.storage, TOKEN).unwrap();
    keeper
        .set_token_pair(&mut ctx.storage, &TokenPair {
            erc20_address: TOKEN,
            denom: voucher.clone(),
            enabled: true,
            owner: Owner::External,
        })
        .unwrap();
    keeper
        .evm
        .fund(&mut ctx.storage, TOKEN, *MODULE_ADDRESS, U256::from(1000))
        .unwrap();
    keeper
        .bank
        .mint(&mut ctx.storage, RECEIVER, &voucher, AMOUNT)
        .unwrap();

    let packet = outbound_packet(raw_denom, AMOUNT, RECEIVER);
    keeper.on_timeout_packet(&mut ctx, &packet).unwrap();

    // The refund found the pair through the resolved voucher and converted.
    assert_eq!(
        keeper
            .evm
            .token_balance(&ctx.storage, TOKEN, RECEIVER)
            .unwrap(),
        AMOUNT,
    );
    assert_eq!(
        keeper
            .bank
            .balance(&ctx.storage, RECEIVER, &voucher)
            .unwrap(),
        U256::ZERO,
    );
}

#[test]
fn refunds_of_unregistered_denoms_are_no_ops() {
    let (mut ctx, keeper) = setup();

    let packet = outbound_packet("uatom", AMOUNT, RECEIVER);
    keeper.on_timeout_packet(&mut ctx, &packet).unwrap();

    assert!(ctx.events.is_empty());
}
