use {
    erc20_callbacks::{isolated_address, CallbackKeeper, Error},
    erc20_testing::{
        seed_native_erc20, setup, setup_with, transfer_packet, ContractBehavior, MockAccounts,
        MockBank, MockEvm, LIFECYCLE_LOG,
    },
    erc20_types::{
        Address, Binary, CallbackType, Ctx, Denom, Event, FungibleTokenPacketData, GasMeter,
        Packet, U256,
    },
};

const TOKEN: Address = Address::repeat_byte(0xaa);
const CONTRACT: Address = Address::repeat_byte(0xcc);
const SENDER: &str = "cosmos1qperwt9wrnkg5k9e5gzfgjppzpqhyav5j24d66";

const AMOUNT: U256 = U256::from_limbs([100, 0, 0, 0]);

fn dest_memo(gas_limit: Option<&str>) -> String {
    match gas_limit {
        Some(limit) => format!(
            r#"{{"dest_callback":{{"address":"{CONTRACT}","gas_limit":"{limit}"}}}}"#
        ),
        None => format!(r#"{{"dest_callback":{{"address":"{CONTRACT}"}}}}"#),
    }
}

/// A keeper whose callback target drains its allowance, plus an inbound
/// packet targeting the isolated address, with the received tokens already
/// sitting on it.
fn setup_receive(behavior: ContractBehavior, memo: &str) -> (Ctx, CallbackKeeper<MockBank, MockEvm, MockAccounts>, Packet, Address) {
    let evm = MockEvm::default().with_behavior(CONTRACT, behavior);
    let (mut ctx, keeper) = setup_with(MockBank::default(), evm, MockAccounts::default());

    seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::ZERO);
    keeper.evm.deploy(&mut ctx.storage, CONTRACT).unwrap();

    let isolated = isolated_address("channel-7", SENDER);
    keeper
        .evm
        .fund(&mut ctx.storage, TOKEN, isolated, AMOUNT)
        .unwrap();

    let raw_denom = format!("transfer/channel-0/{}", Denom::erc20(TOKEN));
    let packet = transfer_packet(&raw_denom, AMOUNT, isolated, memo);

    (ctx, CallbackKeeper::new(keeper), packet, isolated)
}

#[test]
fn a_contract_draining_its_allowance_commits() {
    let (mut ctx, keeper, packet, isolated) = setup_receive(
        ContractBehavior::DrainAllowance { token: TOKEN },
        &dest_memo(Some("400000")),
    );

    keeper.on_recv_packet_callback(&mut ctx, &packet).unwrap();

    // The contract pulled everything; nothing stranded on the isolated
    // address, no allowance left dangling.
    assert_eq!(
        keeper
            .inner
            .evm
            .token_balance(&ctx.storage, TOKEN, CONTRACT)
            .unwrap(),
        AMOUNT,
    );
    assert_eq!(
        keeper
            .inner
            .evm
            .token_balance(&ctx.storage, TOKEN, isolated)
            .unwrap(),
        U256::ZERO,
    );
    assert_eq!(
        keeper
            .inner
            .evm
            .token_allowance(&ctx.storage, TOKEN, isolated, CONTRACT)
            .unwrap(),
        U256::ZERO,
    );

    // One approve plus one execution on both meters.
    assert_eq!(ctx.gas.used(), 100_000);
    assert!(matches!(
        &ctx.events[..],
        [Event::CallbackExecuted(event)]
            if event.callback_type == CallbackType::ReceivePacket && event.gas_used == 100_000,
    ));
}

#[test]
fn leftover_tokens_abort_the_callback() {
    let (mut ctx, keeper, packet, isolated) =
        setup_receive(ContractBehavior::LeaveAllowance, &dest_memo(None));

    let err = keeper
        .on_recv_packet_callback(&mut ctx, &packet)
        .unwrap_err();
    assert!(matches!(err, Error::UnrecoverableTokens { .. }));

    // Everything the callback did was discarded: the tokens are still on
    // the isolated address and the allowance was never granted.
    assert_eq!(
        keeper
            .inner
            .evm
            .token_balance(&ctx.storage, TOKEN, isolated)
            .unwrap(),
        AMOUNT,
    );
    assert_eq!(
        keeper
            .inner
            .evm
            .token_allowance(&ctx.storage, TOKEN, isolated, CONTRACT)
            .unwrap(),
        U256::ZERO,
    );
    assert!(ctx.events.is_empty());
}

#[test]
fn a_reverting_contract_aborts_the_callback() {
    let (mut ctx, keeper, packet, isolated) =
        setup_receive(ContractBehavior::Revert, &dest_memo(None));

    assert!(keeper.on_recv_packet_callback(&mut ctx, &packet).is_err());

    assert_eq!(
        keeper
            .inner
            .evm
            .token_balance(&ctx.storage, TOKEN, isolated)
            .unwrap(),
        AMOUNT,
    );
}

#[test]
fn running_out_of_gas_rolls_back_the_allowance() {
    let (mut ctx, keeper, packet, isolated) = setup_receive(
        ContractBehavior::DrainAllowance { token: TOKEN },
        &dest_memo(None),
    );

    // Enough for the approve, not for the execution.
    ctx.gas = GasMeter::new(60_000);

    assert!(keeper.on_recv_packet_callback(&mut ctx, &packet).is_err());

    // The approve went through inside the sandbox, then got discarded with
    // it; only the gas actually burned sticks.
    assert_eq!(ctx.gas.used(), 50_000);
    assert_eq!(
        keeper
            .inner
            .evm
            .token_allowance(&ctx.storage, TOKEN, isolated, CONTRACT)
            .unwrap(),
        U256::ZERO,
    );
}

#[test]
fn a_memo_gas_limit_caps_the_budget() {
    let (mut ctx, keeper, packet, _) = setup_receive(
        ContractBehavior::DrainAllowance { token: TOKEN },
        &dest_memo(Some("10000")),
    );

    // The requested limit doesn't even cover the approve.
    assert!(keeper.on_recv_packet_callback(&mut ctx, &packet).is_err());
    assert_eq!(ctx.gas.used(), 0);
}

#[test]
fn the_receiver_must_be_the_isolated_address() {
    let (mut ctx, keeper, _, _) = setup_receive(
        ContractBehavior::DrainAllowance { token: TOKEN },
        &dest_memo(None),
    );

    let raw_denom = format!("transfer/channel-0/{}", Denom::erc20(TOKEN));
    let packet = transfer_packet(&raw_denom, AMOUNT, Address::repeat_byte(0x11), &dest_memo(None));

    assert!(matches!(
        keeper.on_recv_packet_callback(&mut ctx, &packet),
        Err(Error::ReceiverNotIsolated { .. }),
    ));
}

#[test]
fn a_wrong_receiver_outranks_a_codeless_target() {
    let (mut ctx, keeper) = setup();
    seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::ZERO);

    // The callback target was never deployed AND the receiver isn't the
    // isolated address; the authorization failure is the one reported.
    let raw_denom = format!("transfer/channel-0/{}", Denom::erc20(TOKEN));
    let packet = transfer_packet(
        &raw_denom,
        AMOUNT,
        Address::repeat_byte(0x11),
        &dest_memo(None),
    );

    let keeper = CallbackKeeper::new(keeper);
    assert!(matches!(
        keeper.on_recv_packet_callback(&mut ctx, &packet),
        Err(Error::ReceiverNotIsolated { .. }),
    ));
}

#[test]
fn the_target_must_have_code() {
    let (mut ctx, keeper) = setup();
    seed_native_erc20(&mut ctx, &keeper, TOKEN, U256::ZERO);

    let isolated = isolated_address("channel-7", SENDER);
    let raw_denom = format!("transfer/channel-0/{}", Denom::erc20(TOKEN));
    let packet = transfer_packet(&raw_denom, AMOUNT, isolated, &dest_memo(None));

    let keeper = CallbackKeeper::new(keeper);
    assert!(matches!(
        keeper.on_recv_packet_callback(&mut ctx, &packet),
        Err(Error::ContractHasNoCode { .. }),
    ));
}

#[test]
fn received_denoms_without_a_pair_are_errors() {
    let evm = MockEvm::default();
    let (mut ctx, keeper) = setup_with(MockBank::default(), evm, MockAccounts::default());
    keeper.evm.deploy(&mut ctx.storage, CONTRACT).unwrap();

    let isolated = isolated_address("channel-7", SENDER);
    let packet = transfer_packet("uatom", AMOUNT, isolated, &dest_memo(None));

    let keeper = CallbackKeeper::new(keeper);
    assert!(matches!(
        keeper.on_recv_packet_callback(&mut ctx, &packet),
        Err(Error::TokenPairNotFound { .. }),
    ));
}

#[test]
fn packets_without_a_callback_memo_are_no_ops() {
    let (mut ctx, keeper) = setup();
    let keeper = CallbackKeeper::new(keeper);

    let packet = transfer_packet("uatom", AMOUNT, Address::repeat_byte(0x11), "");
    keeper.on_recv_packet_callback(&mut ctx, &packet).unwrap();

    let packet = transfer_packet("uatom", AMOUNT, Address::repeat_byte(0x11), "just a note");
    keeper.on_recv_packet_callback(&mut ctx, &packet).unwrap();

    assert!(ctx.events.is_empty());
}

// ----------------------------- source callbacks -----------------------------

fn outbound_packet(memo: &str) -> Packet {
    let data = FungibleTokenPacketData {
        denom: "uatom".to_string(),
        amount: AMOUNT.to_string(),
        sender: Address::repeat_byte(0x11).to_string(),
        receiver: SENDER.to_string(),
        memo: memo.to_string(),
    };

    Packet {
        sequence: 42,
        source_port: "transfer".to_string(),
        source_channel: "channel-0".to_string(),
        destination_port: "transfer".to_string(),
        destination_channel: "channel-7".to_string(),
        data: Binary::from(serde_json::to_vec(&data).unwrap()),
    }
}

fn setup_source(behavior: Option<ContractBehavior>) -> (Ctx, CallbackKeeper<MockBank, MockEvm, MockAccounts>) {
    let mut evm = MockEvm::default();
    if let Some(behavior) = behavior {
        evm = evm.with_behavior(CONTRACT, behavior);
    }

    let (mut ctx, keeper) = setup_with(MockBank::default(), evm, MockAccounts::default());
    keeper.evm.deploy(&mut ctx.storage, CONTRACT).unwrap();

    (ctx, CallbackKeeper::new(keeper))
}

#[test]
fn acknowledgements_reach_the_contract() {
    let (mut ctx, keeper) = setup_source(None);

    let memo = format!(r#"{{"src_callback":{{"address":"{CONTRACT}"}}}}"#);
    let packet = outbound_packet(&memo);

    keeper
        .on_acknowledgement_packet_callback(&mut ctx, &packet, br#"{"result":"AQ=="}"#)
        .unwrap();

    let log = LIFECYCLE_LOG.load(&ctx.storage).unwrap();
    assert_eq!(log.len(), 1);
    assert!(log[0].contains("onPacketAcknowledgement channel-0 42"));

    assert!(matches!(
        &ctx.events[..],
        [Event::CallbackExecuted(event)]
            if event.callback_type == CallbackType::Acknowledgement,
    ));
}

#[test]
fn timeouts_reach_the_contract() {
    let (mut ctx, keeper) = setup_source(None);

    let memo = format!(r#"{{"src_callback":{{"address":"{CONTRACT}"}}}}"#);
    let packet = outbound_packet(&memo);

    keeper.on_timeout_packet_callback(&mut ctx, &packet).unwrap();

    let log = LIFECYCLE_LOG.load(&ctx.storage).unwrap();
    assert!(log[0].contains("onPacketTimeout channel-0 42"));
}

#[test]
fn calldata_is_rejected_on_source_callbacks() {
    let (mut ctx, keeper) = setup_source(None);

    let memo = format!(
        r#"{{"src_callback":{{"address":"{CONTRACT}","calldata":"0xdeadbeef"}}}}"#
    );
    let packet = outbound_packet(&memo);

    assert!(matches!(
        keeper.on_timeout_packet_callback(&mut ctx, &packet),
        Err(Error::UnexpectedCalldata),
    ));
}

#[test]
fn a_reverting_source_callback_leaves_no_trace() {
    let (mut ctx, keeper) = setup_source(Some(ContractBehavior::Revert));

    let memo = format!(r#"{{"src_callback":{{"address":"{CONTRACT}"}}}}"#);
    let packet = outbound_packet(&memo);

    assert!(keeper.on_timeout_packet_callback(&mut ctx, &packet).is_err());

    assert_eq!(LIFECYCLE_LOG.may_load(&ctx.storage).unwrap(), None);
    assert!(ctx.events.is_empty());
}

#[test]
fn sends_are_no_ops() {
    let (mut ctx, keeper) = setup_source(None);

    let memo = format!(r#"{{"src_callback":{{"address":"{CONTRACT}"}}}}"#);
    let packet = outbound_packet(&memo);

    keeper.on_send_packet_callback(&mut ctx, &packet).unwrap();
    assert!(ctx.events.is_empty());
}
