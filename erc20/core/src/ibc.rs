use {
    crate::{AccountRegistry, BankKeeper, EvmExecutor, Keeper, Result, PARAMS},
    erc20_types::{
        Acknowledgement, Coin, ConversionFailed, Ctx, FungibleTokenPacketData, GasMeter, Packet,
        PairRegistered, TraceDenom, U256,
    },
};

/// The ledger coin credited on this chain for an inbound transfer.
///
/// If the packet's source identifiers prefix the denom trace, the token is
/// returning home and the first hop is dropped; otherwise this chain is a new
/// hop and gets prepended. No hops left means the base denom itself;
/// otherwise the hashed voucher denom.
pub fn received_coin(packet: &Packet, raw_denom: &str, amount: U256) -> Coin {
    let mut trace = TraceDenom::parse(raw_denom);

    if trace.has_prefix(&packet.source_port, &packet.source_channel) {
        trace.trim_first_hop();
    } else {
        trace.prepend_hop(&packet.destination_port, &packet.destination_channel);
    }

    Coin::new(trace.into_ledger_denom(), amount)
}

/// The ledger coin refunded on this chain when an outbound transfer fails.
pub fn sent_coin(raw_denom: &str, amount: U256) -> Coin {
    Coin::new(TraceDenom::parse(raw_denom).into_ledger_denom(), amount)
}

impl<B, E, A> Keeper<B, E, A>
where
    B: BankKeeper,
    E: EvmExecutor,
    A: AccountRegistry,
{
    /// Handle an inbound transfer packet, after the transfer application has
    /// already credited the ledger coin.
    ///
    /// `ack` is the acknowledgement the rest of the stack produced; packets
    /// the bridge doesn't act on pass it through unchanged. The bridge never
    /// errors out of this handler, it answers with an error acknowledgement
    /// instead.
    pub fn on_recv_packet(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        ack: Acknowledgement,
    ) -> Acknowledgement {
        let params = match PARAMS.load(&ctx.storage) {
            Ok(params) => params,
            Err(err) => return Acknowledgement::error(err),
        };
        if !params.enable_erc20 {
            return ack;
        }

        let data = match packet.parse_data() {
            Ok(data) => data,
            Err(err) => return Acknowledgement::error(err),
        };
        let amount = match data.amount() {
            Ok(amount) => amount,
            Err(err) => return Acknowledgement::error(err),
        };
        let receiver = match data.receiver_address() {
            Ok(receiver) => receiver,
            Err(err) => return Acknowledgement::error(err),
        };

        // Transfers into module accounts are escrow movements, not user
        // deposits.
        if self.accounts.is_module_account(&ctx.storage, receiver) {
            return ack;
        }

        // Excluded namespaces are judged on the raw packet denom.
        if let Some((namespace, _)) = data.denom.split_once('/') {
            if self
                .config
                .excluded_namespaces
                .iter()
                .any(|excluded| excluded == namespace)
            {
                return ack;
            }
        }

        let coin = received_coin(packet, &data.denom, amount);
        if coin.denom == self.config.bond_denom {
            return ack;
        }

        let pair = match self.pair_by_denom(&ctx.storage, &coin.denom) {
            Ok(pair) => pair,
            Err(err) => return Acknowledgement::error(err),
        };

        match pair {
            // First sighting of a voucher denom: register a pair for it so
            // the holder can interact with it as an ERC-20. The coins
            // themselves stay in the bank on this receipt.
            None if coin.denom.is_voucher() => {
                if !params.permissionless_registration {
                    return ack;
                }

                let base = TraceDenom::parse(&data.denom).base().to_string();
                match self.register_erc20_extension(&mut ctx.storage, coin.denom, &base) {
                    Ok(pair) => {
                        ctx.emit(PairRegistered {
                            id: pair.id(),
                            denom: pair.denom.clone(),
                            erc20_address: pair.erc20_address,
                            channel: Some(packet.source_channel.clone()),
                        });
                        ack
                    },
                    Err(err) => Acknowledgement::error(err),
                }
            },

            // A returning external ERC-20: swap the freshly credited
            // vouchers for the escrowed contract tokens.
            Some(pair) if pair.is_native_erc20() && pair.enabled => {
                let pair = match self.minting_enabled(&ctx.storage, receiver, &coin.denom) {
                    Ok(pair) => pair,
                    Err(err) => {
                        ctx.emit(ConversionFailed {
                            denom: pair.denom,
                            erc20_address: pair.erc20_address,
                            amount,
                            reason: err.to_string(),
                        });
                        return Acknowledgement::error(err);
                    },
                };

                let mut branched = ctx.branch(GasMeter::unlimited());
                match self.convert_coin_native_erc20(&mut branched, &pair, amount, receiver) {
                    Ok(()) => {
                        branched.commit(ctx);
                        ack
                    },
                    Err(err) => Acknowledgement::error(err),
                }
            },

            // Registered but disabled pairs, and module-owned pairs, keep
            // their bank representation.
            _ => ack,
        }
    }

    /// Handle the acknowledgement of an outbound transfer. Only error
    /// acknowledgements matter: the transfer application has refunded the
    /// ledger coin, and if it was an external ERC-20's voucher, the refund is
    /// converted back into contract tokens.
    pub fn on_acknowledgement_packet(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        ack_bytes: &[u8],
    ) -> Result<()> {
        let ack = Acknowledgement::decode(ack_bytes)?;
        if ack.is_success() {
            return Ok(());
        }

        let data = packet.parse_data()?;
        self.convert_refund(ctx, &data)
    }

    /// Handle the timeout of an outbound transfer; the refund treatment is
    /// the same as for an error acknowledgement.
    pub fn on_timeout_packet(&self, ctx: &mut Ctx, packet: &Packet) -> Result<()> {
        let data = packet.parse_data()?;
        self.convert_refund(ctx, &data)
    }

    /// Convert a refunded voucher back into contract tokens, if the refunded
    /// denom belongs to an external ERC-20 pair.
    ///
    /// The refund of the bank coin itself has already happened and must not
    /// be jeopardized: any conversion failure here is swallowed into an event
    /// so the holder keeps the voucher and can retry the conversion manually.
    fn convert_refund(&self, ctx: &mut Ctx, data: &FungibleTokenPacketData) -> Result<()> {
        // The packet carries the full trace from this chain's perspective;
        // resolve it back to the ledger denom that was refunded. An outbound
        // external ERC-20 travels under its own `erc20:` denom, with no hops
        // to strip.
        let amount = data.amount()?;
        let coin = sent_coin(&data.denom, amount);

        let Some(pair) = self.pair_by_denom(&ctx.storage, &coin.denom)? else {
            return Ok(());
        };
        if !pair.is_native_erc20() {
            return Ok(());
        }

        let params = PARAMS.load(&ctx.storage)?;
        if !params.enable_erc20 {
            return Ok(());
        }

        let sender = data.sender_address()?;
        if self.accounts.is_module_account(&ctx.storage, sender) {
            return Ok(());
        }

        let mut branched = ctx.branch(GasMeter::unlimited());
        match self.convert_coin_native_erc20(&mut branched, &pair, amount, sender) {
            Ok(()) => branched.commit(ctx),
            Err(err) => {
                tracing::warn!(
                    denom = %pair.denom,
                    error = %err,
                    "Failed to convert refunded coins back to their contract representation",
                );

                ctx.emit(ConversionFailed {
                    denom: pair.denom.clone(),
                    erc20_address: pair.erc20_address,
                    amount,
                    reason: err.to_string(),
                });
            },
        }

        Ok(())
    }
}

// ----------------------------------- tests -----------------------------------
