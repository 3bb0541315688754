//! Outgoing transfer handler (Bridge).
//!
//! Pulls the tokens from the sender, pays out the fee components, locks or
//! burns the net amount and hands the encoded record to the message channel.

use common::channel::send_msg;
use common::fee::FeeComponentKind;
use common::hash::{bytes32_to_hex, keccak256};
use cosmwasm_std::{
    to_json_binary, Addr, BankMsg, Binary, Coin, CosmosMsg, Deps, DepsMut, Env, MessageInfo,
    Response, StdError, Uint128, WasmMsg,
};
use cw20::{AllowanceResponse, BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};

use crate::error::ContractError;
use crate::msg::TransferRequest;
use crate::state::{Config, CONFIG, LOCKED_BALANCES, STATS};
use crate::transfer::prepare_transfer;

pub fn execute_bridge(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request: TransferRequest,
    options: Binary,
    pay_in_alt_asset: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if config.paused {
        return Err(ContractError::Paused);
    }

    let prepared = prepare_transfer(
        deps.as_ref(),
        &config,
        &info.sender,
        &request,
        options.clone(),
        pay_in_alt_asset,
    )?;

    // Channel fee in the alternate asset, if any
    let alt_payment = if pay_in_alt_asset && !prepared.channel_fee.alt_fee.is_zero() {
        let alt_token = config
            .alt_fee_token
            .clone()
            .ok_or(ContractError::AltFeeNotSupported)?;
        Some((alt_token, prepared.channel_fee.alt_fee))
    } else {
        None
    };

    // Allowance and balance for the principal, plus the alt fee when both
    // are drawn from the same token
    match &alt_payment {
        Some((alt_token, alt_fee)) if *alt_token == prepared.token => {
            let required = prepared
                .transfer_amount
                .checked_add(*alt_fee)
                .map_err(StdError::from)?;
            ensure_spendable(deps.as_ref(), &env, &prepared.token, &info.sender, required)?;
        }
        Some((alt_token, alt_fee)) => {
            ensure_spendable(
                deps.as_ref(),
                &env,
                &prepared.token,
                &info.sender,
                prepared.transfer_amount,
            )?;
            ensure_spendable(deps.as_ref(), &env, alt_token, &info.sender, *alt_fee)?;
        }
        None => {
            ensure_spendable(
                deps.as_ref(),
                &env,
                &prepared.token,
                &info.sender,
                prepared.transfer_amount,
            )?;
        }
    }

    // Channel fee in the native denom
    let refund = collect_native_fee(&config, &info, prepared.channel_fee.native_fee)?;

    let station = env.contract.address.clone();
    let mut messages: Vec<CosmosMsg> = vec![cw20_msg(
        &prepared.token,
        &Cw20ExecuteMsg::TransferFrom {
            owner: info.sender.to_string(),
            recipient: station.to_string(),
            amount: prepared.transfer_amount,
        },
    )?];

    for component in &prepared.local_fees.components {
        if component.amount.is_zero() {
            continue;
        }
        let recipient = match component.kind {
            FeeComponentKind::Protocol => &config.protocol_fee_recipient,
            FeeComponentKind::Relayer => &config.relayer_fee_recipient,
        };
        messages.push(cw20_msg(
            &prepared.token,
            &Cw20ExecuteMsg::Transfer {
                recipient: recipient.to_string(),
                amount: component.amount,
            },
        )?);
    }

    let net_amount = prepared.local_fees.net;
    let mode = if prepared.mapping.is_native {
        let locked = LOCKED_BALANCES
            .may_load(deps.storage, &prepared.token)?
            .unwrap_or_default();
        LOCKED_BALANCES.save(deps.storage, &prepared.token, &(locked + net_amount))?;
        "lock"
    } else {
        messages.push(cw20_msg(
            &prepared.token,
            &Cw20ExecuteMsg::Burn { amount: net_amount },
        )?);
        "burn"
    };

    if let Some((alt_token, alt_fee)) = &alt_payment {
        messages.push(cw20_msg(
            alt_token,
            &Cw20ExecuteMsg::TransferFrom {
                owner: info.sender.to_string(),
                recipient: config.channel.to_string(),
                amount: *alt_fee,
            },
        )?);
    }

    messages.push(send_msg(
        &config.channel,
        request.dest_chain,
        prepared.payload.clone(),
        options,
        &info.sender,
        pay_in_alt_asset,
        &config.fee_denom,
        prepared.channel_fee.native_fee,
    )?);

    if !refund.is_zero() {
        messages.push(CosmosMsg::Bank(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![Coin {
                denom: config.fee_denom.clone(),
                amount: refund,
            }],
        }));
    }

    let mut stats = STATS.load(deps.storage)?;
    stats.total_outgoing += 1;
    STATS.save(deps.storage, &stats)?;

    let fees = &prepared.local_fees;
    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "bridge")
        .add_attribute("mode", mode)
        .add_attribute("sender", info.sender)
        .add_attribute("recipient", prepared.record.recipient.clone())
        .add_attribute("token", prepared.token.to_string())
        .add_attribute("remote_token", prepared.mapping.remote_token.clone())
        .add_attribute("dest_chain", request.dest_chain.to_string())
        .add_attribute("gross_amount", prepared.gross_amount.to_string())
        .add_attribute("transfer_amount", prepared.transfer_amount.to_string())
        .add_attribute("net_amount", net_amount.to_string())
        .add_attribute("delivered_amount", prepared.record.amount.to_string())
        .add_attribute("tier_index", fees.tier_index.to_string())
        .add_attribute("fee_rate_bps", fees.fee_rate_bps.to_string())
        .add_attribute(
            "protocol_fee",
            fees.component(FeeComponentKind::Protocol).to_string(),
        )
        .add_attribute(
            "relayer_fee",
            fees.component(FeeComponentKind::Relayer).to_string(),
        )
        .add_attribute("native_fee", prepared.channel_fee.native_fee.to_string())
        .add_attribute("alt_fee", prepared.channel_fee.alt_fee.to_string())
        .add_attribute("payload_hash", bytes32_to_hex(&keccak256(&prepared.payload))))
}

/// Fail unless `owner` holds and has approved at least `amount` of `token`
fn ensure_spendable(
    deps: Deps,
    env: &Env,
    token: &Addr,
    owner: &Addr,
    amount: Uint128,
) -> Result<(), ContractError> {
    let allowance: AllowanceResponse = deps.querier.query_wasm_smart(
        token,
        &Cw20QueryMsg::Allowance {
            owner: owner.to_string(),
            spender: env.contract.address.to_string(),
        },
    )?;
    let approved = if allowance.expires.is_expired(&env.block) {
        Uint128::zero()
    } else {
        allowance.allowance
    };
    if approved < amount {
        return Err(ContractError::InsufficientAllowance {
            required: amount,
            approved,
        });
    }

    let balance: BalanceResponse = deps.querier.query_wasm_smart(
        token,
        &Cw20QueryMsg::Balance {
            address: owner.to_string(),
        },
    )?;
    if balance.balance < amount {
        return Err(ContractError::InsufficientBalance {
            required: amount,
            available: balance.balance,
        });
    }

    Ok(())
}

/// Check the attached funds cover `native_fee`; returns the excess to refund
fn collect_native_fee(
    config: &Config,
    info: &MessageInfo,
    native_fee: Uint128,
) -> Result<Uint128, ContractError> {
    let mut paid = Uint128::zero();
    for coin in &info.funds {
        if coin.denom != config.fee_denom {
            return Err(ContractError::UnexpectedFunds {
                denom: coin.denom.clone(),
            });
        }
        paid += coin.amount;
    }

    if paid < native_fee {
        return Err(ContractError::InsufficientFee {
            denom: config.fee_denom.clone(),
            expected: native_fee,
            got: paid,
        });
    }

    Ok(paid - native_fee)
}

pub(crate) fn cw20_msg(token: &Addr, msg: &Cw20ExecuteMsg) -> Result<CosmosMsg, ContractError> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(msg)?,
        funds: vec![],
    }))
}
