//! Message channel interface
//!
//! The transport that moves payloads between chains is an external contract.
//! Stations only rely on this surface: a fee quote, a paid send, and the
//! channel executing the station's `OnMessage` once a message is verified.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Coin, CosmosMsg, QuerierWrapper, StdResult, Uint128, WasmMsg,
};

#[cw_serde]
pub enum ChannelExecuteMsg {
    /// Deliver `payload` to the peer station on `dest_chain`.
    /// The native fee is attached as funds.
    Send {
        dest_chain: u32,
        payload: Binary,
        options: Binary,
        refund_address: String,
        pay_in_alt_asset: bool,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum ChannelQueryMsg {
    /// Delivery cost of `payload` to `dest_chain`
    #[returns(ChannelQuoteResponse)]
    Quote {
        dest_chain: u32,
        payload: Binary,
        options: Binary,
        pay_in_alt_asset: bool,
    },
}

#[cw_serde]
pub struct ChannelQuoteResponse {
    /// Fee payable in the chain's native denom
    pub native_fee: Uint128,
    /// Fee payable in the channel's alternate asset (zero unless requested)
    pub alt_fee: Uint128,
}

/// Opaque receipt a channel may return as `Send` response data
#[cw_serde]
pub struct SendReceipt {
    pub guid: Binary,
    pub nonce: u64,
}

pub fn query_quote(
    querier: &QuerierWrapper,
    channel: &Addr,
    dest_chain: u32,
    payload: Binary,
    options: Binary,
    pay_in_alt_asset: bool,
) -> StdResult<ChannelQuoteResponse> {
    querier.query_wasm_smart(
        channel,
        &ChannelQueryMsg::Quote {
            dest_chain,
            payload,
            options,
            pay_in_alt_asset,
        },
    )
}

#[allow(clippy::too_many_arguments)]
pub fn send_msg(
    channel: &Addr,
    dest_chain: u32,
    payload: Binary,
    options: Binary,
    refund_address: &Addr,
    pay_in_alt_asset: bool,
    fee_denom: &str,
    native_fee: Uint128,
) -> StdResult<CosmosMsg> {
    let funds = if native_fee.is_zero() {
        vec![]
    } else {
        vec![Coin {
            denom: fee_denom.to_string(),
            amount: native_fee,
        }]
    };
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: channel.to_string(),
        msg: to_json_binary(&ChannelExecuteMsg::Send {
            dest_chain,
            payload,
            options,
            refund_address: refund_address.to_string(),
            pay_in_alt_asset,
        })?,
        funds,
    }))
}
