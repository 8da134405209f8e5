use {
    crate::{isolated_address, Error, Result},
    erc20_core::{
        received_coin, AccountRegistry, BankKeeper, Erc20Call, EvmExecutor, Keeper, LifecycleCall,
    },
    erc20_types::{
        Address, Buffer, CallbackExecuted, CallbackMemo, CallbackRequest, CallbackType, Ctx,
        GasMeter, Packet, Storage,
    },
};

/// The transfer-stack middleware executing contract callbacks on packet
/// lifecycle events. Wraps the bridge keeper: callbacks operate on the same
/// pairs and the same VM.
pub struct CallbackKeeper<B, E, A> {
    pub inner: Keeper<B, E, A>,
}

impl<B, E, A> CallbackKeeper<B, E, A>
where
    B: BankKeeper,
    E: EvmExecutor,
    A: AccountRegistry,
{
    pub fn new(inner: Keeper<B, E, A>) -> Self {
        Self { inner }
    }

    /// Run the destination callback requested in an inbound packet's memo,
    /// after the transfer and any conversion have completed.
    ///
    /// The packet's receiver must be the isolated address for its channel and
    /// sender. The callback gets a time-boxed allowance on the received
    /// tokens and must consume it fully: any balance left on the isolated
    /// address afterwards would be stranded, so the whole callback is
    /// discarded instead.
    pub fn on_recv_packet_callback(&self, ctx: &mut Ctx, packet: &Packet) -> Result<()> {
        let data = packet.parse_data()?;

        let memo = CallbackMemo::parse(&data.memo)?;
        let Some(request) = memo.dest_callback else {
            return Ok(());
        };

        let contract = request.address()?;

        // Authorization first: a packet addressed to the wrong receiver is
        // rejected as such, even if the target also has no code.
        let receiver = data.receiver_address()?;
        let expected = isolated_address(&packet.destination_channel, &data.sender);
        if receiver != expected {
            return Err(Error::ReceiverNotIsolated { receiver, expected });
        }

        self.ensure_contract(&ctx.storage, contract)?;

        self.inner
            .accounts
            .ensure_account(&mut ctx.storage, receiver)?;

        let amount = data.amount()?;
        let coin = received_coin(packet, &data.denom, amount);
        let pair = self
            .inner
            .pair_by_denom(&ctx.storage, &coin.denom)?
            .ok_or_else(|| Error::TokenPairNotFound {
                denom: coin.denom.to_string(),
            })?;

        let mut branched = ctx.branch(self.callback_gas(ctx, &request)?);

        // Grant the contract a spending allowance on the received tokens,
        // from the isolated address.
        let res = self.inner.evm.call_erc20(
            &mut branched.storage,
            receiver,
            pair.erc20_address,
            Erc20Call::Approve {
                spender: contract,
                amount,
            },
            Some(branched.gas.remaining()),
        )?;
        settle_gas(ctx, &mut branched, res.gas_used, "callback allowance")?;
        if !res.ret_bool() {
            return Err(Error::AllowanceNotAccepted { contract });
        }

        let calldata = request.calldata()?.unwrap_or_default();
        let res = self.inner.evm.call_raw(
            &mut branched.storage,
            receiver,
            contract,
            &calldata,
            Some(branched.gas.remaining()),
        )?;
        settle_gas(ctx, &mut branched, res.gas_used, "callback execution")?;

        // Whatever the contract didn't pull must not stay behind: nothing
        // spends from the isolated address after this point.
        let remaining =
            self.inner
                .balance_of(&mut branched.storage, pair.erc20_address, receiver)?;
        if !remaining.is_zero() {
            return Err(Error::UnrecoverableTokens {
                contract: pair.erc20_address,
                remaining,
            });
        }

        let gas_used = branched.gas.used();
        branched.commit(ctx);

        tracing::debug!(
            contract = %contract,
            gas_used,
            "Executed receive callback",
        );

        ctx.emit(CallbackExecuted {
            contract,
            callback_type: CallbackType::ReceivePacket,
            gas_used,
        });

        Ok(())
    }

    /// Run the source callback requested in an outbound packet's memo, once
    /// the counterparty's acknowledgement arrives.
    pub fn on_acknowledgement_packet_callback(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        ack_bytes: &[u8],
    ) -> Result<()> {
        self.on_source_callback(ctx, packet, CallbackType::Acknowledgement, Some(ack_bytes))
    }

    /// Run the source callback requested in an outbound packet's memo, once
    /// the packet times out.
    pub fn on_timeout_packet_callback(&self, ctx: &mut Ctx, packet: &Packet) -> Result<()> {
        self.on_source_callback(ctx, packet, CallbackType::Timeout, None)
    }

    /// Nothing to do at send time; the source callback fires on the
    /// acknowledgement or timeout.
    pub fn on_send_packet_callback(&self, _ctx: &mut Ctx, _packet: &Packet) -> Result<()> {
        Ok(())
    }

    fn on_source_callback(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        callback_type: CallbackType,
        ack_bytes: Option<&[u8]>,
    ) -> Result<()> {
        let data = packet.parse_data()?;

        let memo = CallbackMemo::parse(&data.memo)?;
        let Some(request) = memo.src_callback else {
            return Ok(());
        };

        // Source callbacks invoke a fixed interface; caller-supplied calldata
        // has no meaning here and likely signals a misconstructed memo.
        if request.calldata.is_some() {
            return Err(Error::UnexpectedCalldata);
        }

        let contract = request.address()?;
        self.ensure_contract(&ctx.storage, contract)?;

        // On the source chain the sender is a local VM address.
        let caller = data.sender_address()?;

        let call = match ack_bytes {
            Some(acknowledgement) => LifecycleCall::Acknowledgement {
                source_channel: &packet.source_channel,
                source_port: &packet.source_port,
                sequence: packet.sequence,
                data: &packet.data,
                acknowledgement,
            },
            None => LifecycleCall::Timeout {
                source_channel: &packet.source_channel,
                source_port: &packet.source_port,
                sequence: packet.sequence,
                data: &packet.data,
            },
        };

        let mut branched = ctx.branch(self.callback_gas(ctx, &request)?);

        let res = self.inner.evm.call_lifecycle(
            &mut branched.storage,
            caller,
            contract,
            call,
            Some(branched.gas.remaining()),
        )?;
        settle_gas(ctx, &mut branched, res.gas_used, "callback execution")?;

        let gas_used = branched.gas.used();
        branched.commit(ctx);

        tracing::debug!(
            contract = %contract,
            sequence = packet.sequence,
            gas_used,
            "Executed source callback",
        );

        ctx.emit(CallbackExecuted {
            contract,
            callback_type,
            gas_used,
        });

        Ok(())
    }

    fn ensure_contract(&self, storage: &dyn Storage, address: Address) -> Result<()> {
        let account = self.inner.evm.account(storage, address)?;
        if !account.is_some_and(|account| account.has_code()) {
            return Err(Error::ContractHasNoCode { address });
        }

        Ok(())
    }

    /// The VM budget for a callback: the gas limit requested in the memo,
    /// capped at what's left on the transport meter.
    fn callback_gas(&self, ctx: &Ctx, request: &CallbackRequest) -> Result<GasMeter> {
        let remaining = ctx.gas.remaining();
        let limit = match request.gas_limit()? {
            Some(requested) => requested.min(remaining),
            None => remaining,
        };

        Ok(GasMeter::new(limit))
    }
}

/// Charge a VM call's gas on both meters: the callback's own budget and the
/// transport meter it was carved out of. Either running out aborts the
/// callback.
fn settle_gas(
    ctx: &mut Ctx,
    branched: &mut Ctx<Buffer<Box<dyn Storage>>>,
    gas_used: u64,
    comment: &'static str,
) -> Result<()> {
    branched.gas.consume(gas_used, comment)?;
    ctx.gas.consume(gas_used, comment)?;

    Ok(())
}
