//! Inbound message handlers (OnMessage, settlement reply, remediation).
//!
//! A delivered message is validated, marked processed and then paid out
//! through a reply-always submessage. A payout that fails does not unmark
//! the nonce: the reply records a `FailedSettlement` that an admin can
//! re-dispatch with `RemediateSettlement`.

use common::fee::from_canonical;
use common::hash::{bytes32_to_hex, compute_transfer_id};
use common::{Role, TransferRecord};
use cosmwasm_std::{
    Addr, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Response, Storage, SubMsg, SubMsgResult,
    Uint128,
};
use cw20::Cw20ExecuteMsg;

use super::admin::ensure_role;
use super::bridge::cw20_msg;
use crate::error::ContractError;
use crate::peers;
use crate::registry;
use crate::state::{
    FailedSettlement, ProcessedMessage, Settlement, CONFIG, FAILED_SETTLEMENTS, LOCKED_BALANCES,
    PENDING_SETTLEMENT, PROCESSED_NONCES, SETTLEMENT_REPLY_ID, STATS,
};

// ============================================================================
// OnMessage - Channel-initiated
// ============================================================================

/// Accept a message the channel verified as coming from `sender` on `src_chain`.
///
/// Source, replay, payload and token checks run before the nonce is marked,
/// so a message rejected by them leaves no trace. Once those pass the sender
/// has been debited on the source chain, and anything else that stops the
/// payout is recorded as a `FailedSettlement` instead.
pub fn execute_on_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    src_chain: u32,
    sender: String,
    nonce: u64,
    payload: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if info.sender != config.channel {
        return Err(ContractError::UnauthorizedChannel);
    }
    if config.paused {
        return Err(ContractError::Paused);
    }
    if !peers::is_trusted(deps.storage, src_chain, &sender)? {
        return Err(ContractError::UntrustedSource {
            chain_id: src_chain,
            sender,
        });
    }
    if PROCESSED_NONCES.has(deps.storage, (src_chain, nonce)) {
        return Err(ContractError::AlreadyProcessed { src_chain, nonce });
    }

    let record =
        TransferRecord::decode(&payload, nonce).map_err(|e| ContractError::InvalidPayload {
            reason: e.to_string(),
        })?;
    if record.src_chain != src_chain {
        return Err(ContractError::ChainMismatch {
            reported: src_chain,
            encoded: record.src_chain,
        });
    }

    let mapping = registry::resolve(deps.storage, src_chain, &record.token)?;
    let amount = from_canonical(record.amount, mapping.local_decimals)?;
    if amount.is_zero() {
        return Err(ContractError::InvalidPayload {
            reason: "zero amount".to_string(),
        });
    }

    // Mark before paying out
    let transfer_id = compute_transfer_id(src_chain, config.this_chain, nonce, &payload);
    PROCESSED_NONCES.save(
        deps.storage,
        (src_chain, nonce),
        &ProcessedMessage {
            transfer_id,
            processed_at: env.block.time,
        },
    )?;

    let mut stats = STATS.load(deps.storage)?;
    stats.total_incoming += 1;
    STATS.save(deps.storage, &stats)?;

    let settlement = Settlement {
        src_chain,
        nonce,
        transfer_id,
        local_token: mapping.local_token,
        recipient: record.recipient,
        amount,
        is_native: mapping.is_native,
    };

    let response = Response::new()
        .add_attribute("method", "on_message")
        .add_attribute("src_chain", src_chain.to_string())
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("sender", record.sender)
        .add_attribute("recipient", settlement.recipient.clone())
        .add_attribute("token", settlement.local_token.to_string())
        .add_attribute("amount", amount.to_string())
        .add_attribute("mode", settlement_mode(&settlement))
        .add_attribute("transfer_id", bytes32_to_hex(&transfer_id));

    if let Err(err) = validate_recipient(deps.as_ref(), &settlement.recipient) {
        record_failure(deps.storage, &env, settlement, err.to_string())?;
        return Ok(response.add_attribute("settlement", "failed"));
    }
    if settlement.is_native {
        if let Err(err) = take_locked(deps.storage, &settlement) {
            record_failure(deps.storage, &env, settlement, err.to_string())?;
            return Ok(response.add_attribute("settlement", "failed"));
        }
    }

    PENDING_SETTLEMENT.save(deps.storage, &settlement)?;
    let payout = SubMsg::reply_always(payout_msg(&settlement)?, SETTLEMENT_REPLY_ID);

    Ok(response
        .add_submessage(payout)
        .add_attribute("settlement", "dispatched"))
}

// ============================================================================
// Settlement Reply
// ============================================================================

/// Outcome of the payout dispatched by `OnMessage`
pub fn handle_settlement_reply(
    deps: DepsMut,
    env: Env,
    result: SubMsgResult,
) -> Result<Response, ContractError> {
    let settlement = PENDING_SETTLEMENT.load(deps.storage)?;
    PENDING_SETTLEMENT.remove(deps.storage);

    match result {
        SubMsgResult::Ok(_) => Ok(Response::new()
            .add_attribute("method", "settlement_complete")
            .add_attribute("src_chain", settlement.src_chain.to_string())
            .add_attribute("nonce", settlement.nonce.to_string())),
        SubMsgResult::Err(reason) => {
            // The payout's own state changes were reverted; custody was not
            if settlement.is_native {
                let locked = LOCKED_BALANCES
                    .may_load(deps.storage, &settlement.local_token)?
                    .unwrap_or_default();
                LOCKED_BALANCES.save(
                    deps.storage,
                    &settlement.local_token,
                    &(locked + settlement.amount),
                )?;
            }

            let src_chain = settlement.src_chain;
            let nonce = settlement.nonce;
            record_failure(deps.storage, &env, settlement, reason.clone())?;

            Ok(Response::new()
                .add_attribute("method", "settlement_failed")
                .add_attribute("src_chain", src_chain.to_string())
                .add_attribute("nonce", nonce.to_string())
                .add_attribute("reason", reason))
        }
    }
}

// ============================================================================
// RemediateSettlement - Admin
// ============================================================================

/// Re-dispatch a failed payout, optionally to a corrected `recipient`. The
/// payout is a plain message, so if it fails again the whole transaction
/// reverts and the record stays.
pub fn execute_remediate_settlement(
    deps: DepsMut,
    info: MessageInfo,
    src_chain: u32,
    nonce: u64,
    recipient: Option<String>,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::DefaultAdmin, &info.sender)?;

    let failed = FAILED_SETTLEMENTS
        .may_load(deps.storage, (src_chain, nonce))?
        .ok_or(ContractError::SettlementNotFound { src_chain, nonce })?;
    let mut settlement = failed.settlement;
    if let Some(recipient) = recipient {
        settlement.recipient = recipient.trim().to_string();
    }
    validate_recipient(deps.as_ref(), &settlement.recipient)?;

    if settlement.is_native {
        take_locked(deps.storage, &settlement)?;
    }
    FAILED_SETTLEMENTS.remove(deps.storage, (src_chain, nonce));

    let mut stats = STATS.load(deps.storage)?;
    stats.total_remediated += 1;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_message(payout_msg(&settlement)?)
        .add_attribute("method", "remediate_settlement")
        .add_attribute("src_chain", src_chain.to_string())
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("recipient", settlement.recipient.clone())
        .add_attribute("token", settlement.local_token.to_string())
        .add_attribute("amount", settlement.amount.to_string())
        .add_attribute("mode", settlement_mode(&settlement))
        .add_attribute("transfer_id", bytes32_to_hex(&settlement.transfer_id)))
}

// ============================================================================
// Helpers
// ============================================================================

fn settlement_mode(settlement: &Settlement) -> &'static str {
    if settlement.is_native {
        "release"
    } else {
        "mint"
    }
}

fn payout_msg(settlement: &Settlement) -> Result<CosmosMsg, ContractError> {
    let msg = if settlement.is_native {
        Cw20ExecuteMsg::Transfer {
            recipient: settlement.recipient.clone(),
            amount: settlement.amount,
        }
    } else {
        Cw20ExecuteMsg::Mint {
            recipient: settlement.recipient.clone(),
            amount: settlement.amount,
        }
    };
    cw20_msg(&settlement.local_token, &msg)
}

fn validate_recipient(deps: Deps, recipient: &str) -> Result<Addr, ContractError> {
    deps.api
        .addr_validate(recipient)
        .map_err(|e| ContractError::InvalidRecipient {
            reason: format!("{}: {}", recipient, e),
        })
}

/// Release `settlement.amount` from custody accounting
fn take_locked(storage: &mut dyn Storage, settlement: &Settlement) -> Result<(), ContractError> {
    let locked = LOCKED_BALANCES
        .may_load(storage, &settlement.local_token)?
        .unwrap_or_default();
    if locked < settlement.amount {
        return Err(ContractError::InsufficientLiquidity {
            locked,
            requested: settlement.amount,
        });
    }
    let remaining: Uint128 = locked - settlement.amount;
    LOCKED_BALANCES.save(storage, &settlement.local_token, &remaining)?;
    Ok(())
}

fn record_failure(
    storage: &mut dyn Storage,
    env: &Env,
    settlement: Settlement,
    reason: String,
) -> Result<(), ContractError> {
    let key = (settlement.src_chain, settlement.nonce);
    FAILED_SETTLEMENTS.save(
        storage,
        key,
        &FailedSettlement {
            settlement,
            reason,
            failed_at: env.block.time,
        },
    )?;

    let mut stats = STATS.load(storage)?;
    stats.total_failed_settlements += 1;
    STATS.save(storage, &stats)?;
    Ok(())
}
