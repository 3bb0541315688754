//! Transfer preparation shared by `Quote` and `Bridge`
//!
//! Everything a transfer costs is derived here from current state, so a quote
//! and a bridge made in the same state see identical numbers.
//!
//! Amounts are normalized to canonical precision before the fee manager is
//! consulted. Sub-canonical dust is never pulled from the sender, so every
//! local amount below converts to canonical units exactly.

use common::channel::{query_quote, ChannelQuoteResponse};
use common::fee::{strip_dust, to_canonical, FeeBreakdown, AMOUNT_CEILING, CANONICAL_DECIMALS};
use common::TransferRecord;
use cosmwasm_std::{Addr, Binary, Deps, Uint128};
use fee_manager::msg::{ComputeFeeResponse, QueryMsg as FeeManagerQueryMsg};

use crate::error::ContractError;
use crate::msg::{QuoteResponse, TransferRequest};
use crate::peers::ensure_route_ready;
use crate::registry::resolve_outgoing;
use crate::state::{Config, TokenMapping};

/// A validated, fully priced outbound transfer
#[derive(Debug)]
pub struct PreparedTransfer {
    pub token: Addr,
    pub mapping: TokenMapping,
    /// Requested amount, local units
    pub gross_amount: Uint128,
    /// Amount pulled from the sender, local units
    pub transfer_amount: Uint128,
    /// Fee breakdown in canonical units
    pub canonical_fees: FeeBreakdown,
    /// Fee breakdown in local units
    pub local_fees: FeeBreakdown,
    pub record: TransferRecord,
    pub payload: Binary,
    pub channel_fee: ChannelQuoteResponse,
}

impl PreparedTransfer {
    pub fn to_quote(&self, fee_denom: &str) -> QuoteResponse {
        QuoteResponse {
            gross_amount: self.gross_amount,
            transfer_amount: self.transfer_amount,
            net_amount: self.local_fees.net,
            delivered_amount: self.record.amount,
            tier_index: self.local_fees.tier_index,
            fee_rate_bps: self.local_fees.fee_rate_bps,
            components: self.local_fees.components.clone(),
            native_fee: self.channel_fee.native_fee,
            alt_fee: self.channel_fee.alt_fee,
            fee_denom: fee_denom.to_string(),
        }
    }
}

/// Validate `request`, compute its fees and quote the channel
pub fn prepare_transfer(
    deps: Deps,
    config: &Config,
    sender: &Addr,
    request: &TransferRequest,
    options: Binary,
    pay_in_alt_asset: bool,
) -> Result<PreparedTransfer, ContractError> {
    if request.amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "amount must be greater than zero".to_string(),
        });
    }
    if request.recipient.trim().is_empty() {
        return Err(ContractError::InvalidRecipient {
            reason: "recipient cannot be empty".to_string(),
        });
    }
    if request.dest_chain == config.this_chain {
        return Err(ContractError::InvalidChainId {
            chain_id: request.dest_chain,
        });
    }
    if pay_in_alt_asset && config.alt_fee_token.is_none() {
        return Err(ContractError::AltFeeNotSupported);
    }

    ensure_route_ready(deps.storage, request.dest_chain)?;

    let token = deps.api.addr_validate(&request.token)?;
    let mapping = resolve_outgoing(deps.storage, request.dest_chain, &token)?;

    let canonical_amount = to_canonical(request.amount, mapping.local_decimals)?;
    if canonical_amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: format!(
                "{} is below the smallest transferable unit",
                request.amount
            ),
        });
    }
    if canonical_amount > Uint128::new(AMOUNT_CEILING) {
        return Err(ContractError::InvalidAmount {
            reason: format!(
                "{} exceeds the transferable ceiling {}",
                canonical_amount, AMOUNT_CEILING
            ),
        });
    }
    let transfer_amount = strip_dust(request.amount, mapping.local_decimals)?;

    let fee: ComputeFeeResponse = deps.querier.query_wasm_smart(
        &config.fee_manager,
        &FeeManagerQueryMsg::ComputeFee {
            amount: canonical_amount,
            decimals: CANONICAL_DECIMALS,
        },
    )?;
    if fee.net_amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "nothing left to deliver after fees".to_string(),
        });
    }

    let canonical_fees = FeeBreakdown {
        gross: fee.amount,
        net: fee.net_amount,
        tier_index: fee.tier_index,
        fee_rate_bps: fee.fee_rate_bps,
        components: fee.components,
    };
    let local_fees = canonical_fees.to_local(mapping.local_decimals)?;

    let record = TransferRecord {
        token: token.to_string(),
        recipient: request.recipient.trim().to_string(),
        sender: sender.to_string(),
        amount: canonical_fees.net,
        src_chain: config.this_chain,
        nonce: 0,
    };
    let payload = record.encode()?;

    let channel_fee = query_quote(
        &deps.querier,
        &config.channel,
        request.dest_chain,
        payload.clone(),
        options,
        pay_in_alt_asset,
    )?;

    Ok(PreparedTransfer {
        token,
        mapping,
        gross_amount: request.amount,
        transfer_amount,
        canonical_fees,
        local_fees,
        record,
        payload,
        channel_fee,
    })
}
