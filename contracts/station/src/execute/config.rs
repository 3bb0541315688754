//! Route configuration handlers.
//!
//! This module handles:
//! - Peer management (set/remove)
//! - Token registry (register/deregister)

use common::fee::CANONICAL_DECIMALS;
use common::Role;
use cosmwasm_std::{DepsMut, MessageInfo, Response};
use cw20::{Cw20QueryMsg, TokenInfoResponse};

use super::admin::ensure_role;
use crate::error::ContractError;
use crate::peers;
use crate::registry;
use crate::state::{TokenMapping, CONFIG};

// ============================================================================
// Peer Management
// ============================================================================

/// Trust `peer` as the station on `chain`, replacing any previous peer.
pub fn execute_set_peer(
    deps: DepsMut,
    info: MessageInfo,
    chain: u32,
    peer: String,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::DefaultAdmin, &info.sender)?;

    let config = CONFIG.load(deps.storage)?;
    if chain == 0 || chain == config.this_chain {
        return Err(ContractError::InvalidChainId { chain_id: chain });
    }

    let peer = peers::set_peer(deps.storage, chain, &peer)?;

    Ok(Response::new()
        .add_attribute("method", "set_peer")
        .add_attribute("chain", chain.to_string())
        .add_attribute("peer", peer))
}

pub fn execute_remove_peer(
    deps: DepsMut,
    info: MessageInfo,
    chain: u32,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::DefaultAdmin, &info.sender)?;

    let removed = peers::remove_peer(deps.storage, chain);

    Ok(Response::new()
        .add_attribute("method", "remove_peer")
        .add_attribute("chain", chain.to_string())
        .add_attribute("changed", removed.to_string()))
}

// ============================================================================
// Token Registry
// ============================================================================

/// Map a remote token to a local CW20. Decimals are read from the token.
pub fn execute_register_token(
    deps: DepsMut,
    info: MessageInfo,
    remote_chain: u32,
    remote_token: String,
    local_token: String,
    is_native: bool,
    overwrite: bool,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::TokenManager, &info.sender)?;

    let config = CONFIG.load(deps.storage)?;
    if remote_chain == 0 || remote_chain == config.this_chain {
        return Err(ContractError::InvalidChainId {
            chain_id: remote_chain,
        });
    }
    if remote_token.trim().is_empty() {
        return Err(ContractError::InvalidToken {
            reason: "remote token cannot be empty".to_string(),
        });
    }

    let local_token = deps.api.addr_validate(&local_token)?;
    let token_info: TokenInfoResponse = deps
        .querier
        .query_wasm_smart(&local_token, &Cw20QueryMsg::TokenInfo {})
        .map_err(|e| ContractError::InvalidToken {
            reason: format!("{} is not a CW20: {}", local_token, e),
        })?;
    if token_info.decimals < CANONICAL_DECIMALS {
        return Err(common::FeeError::InvalidDecimals {
            decimals: token_info.decimals,
            min: CANONICAL_DECIMALS,
        }
        .into());
    }

    let mapping = TokenMapping {
        remote_chain,
        remote_token: remote_token.trim().to_string(),
        local_token,
        is_native,
        local_decimals: token_info.decimals,
    };
    registry::register(deps.storage, &mapping, overwrite)?;

    Ok(Response::new()
        .add_attribute("method", "register_token")
        .add_attribute("remote_chain", remote_chain.to_string())
        .add_attribute("remote_token", mapping.remote_token)
        .add_attribute("local_token", mapping.local_token)
        .add_attribute("is_native", is_native.to_string())
        .add_attribute("decimals", token_info.decimals.to_string())
        .add_attribute("overwrite", overwrite.to_string()))
}

pub fn execute_deregister_token(
    deps: DepsMut,
    info: MessageInfo,
    remote_chain: u32,
    remote_token: String,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::TokenManager, &info.sender)?;

    let remote_token = remote_token.trim();
    let mapping = registry::deregister(deps.storage, remote_chain, remote_token)?;

    Ok(Response::new()
        .add_attribute("method", "deregister_token")
        .add_attribute("remote_chain", remote_chain.to_string())
        .add_attribute("remote_token", remote_token)
        .add_attribute("local_token", mapping.local_token))
}
