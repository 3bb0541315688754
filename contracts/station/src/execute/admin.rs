//! Admin operations handlers.
//!
//! This module handles:
//! - Role checks, grants and revocations
//! - Pause/unpause
//! - Configuration updates (channel, fee manager, fee routing)

use common::access::{grant_role, has_role, revoke_role};
use common::Role;
use cosmwasm_std::{Addr, DepsMut, MessageInfo, Response, Storage};

use crate::error::ContractError;
use crate::state::CONFIG;

/// Fail unless `account` holds `role`
pub fn ensure_role(storage: &dyn Storage, role: Role, account: &Addr) -> Result<(), ContractError> {
    if !has_role(storage, role, account)? {
        return Err(ContractError::Unauthorized {
            role: role.as_str().to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// Roles
// ============================================================================

pub fn execute_grant_role(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
    account: String,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::DefaultAdmin, &info.sender)?;

    let account = deps.api.addr_validate(&account)?;
    let granted = grant_role(deps.storage, role, &account)?;

    Ok(Response::new()
        .add_attribute("method", "grant_role")
        .add_attribute("role", role.as_str())
        .add_attribute("account", account)
        .add_attribute("changed", granted.to_string()))
}

pub fn execute_revoke_role(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
    account: String,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::DefaultAdmin, &info.sender)?;

    let account = deps.api.addr_validate(&account)?;
    let revoked = revoke_role(deps.storage, role, &account)?;

    Ok(Response::new()
        .add_attribute("method", "revoke_role")
        .add_attribute("role", role.as_str())
        .add_attribute("account", account)
        .add_attribute("changed", revoked.to_string()))
}

// ============================================================================
// Pause/Unpause
// ============================================================================

/// Pause the station (stops bridging and delivery).
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::DefaultAdmin, &info.sender)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.paused = true;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "pause"))
}

/// Unpause the station.
pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::DefaultAdmin, &info.sender)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.paused = false;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "unpause"))
}

// ============================================================================
// Configuration
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub fn execute_update_config(
    deps: DepsMut,
    info: MessageInfo,
    channel: Option<String>,
    fee_manager: Option<String>,
    fee_denom: Option<String>,
    alt_fee_token: Option<String>,
    protocol_fee_recipient: Option<String>,
    relayer_fee_recipient: Option<String>,
) -> Result<Response, ContractError> {
    ensure_role(deps.storage, Role::DefaultAdmin, &info.sender)?;

    let mut config = CONFIG.load(deps.storage)?;
    let mut response = Response::new().add_attribute("method", "update_config");

    if let Some(channel) = channel {
        config.channel = deps.api.addr_validate(&channel)?;
        response = response.add_attribute("channel", channel);
    }
    if let Some(fee_manager) = fee_manager {
        config.fee_manager = deps.api.addr_validate(&fee_manager)?;
        response = response.add_attribute("fee_manager", fee_manager);
    }
    if let Some(fee_denom) = fee_denom {
        if fee_denom.is_empty() {
            return Err(ContractError::InvalidToken {
                reason: "fee denom cannot be empty".to_string(),
            });
        }
        config.fee_denom = fee_denom.clone();
        response = response.add_attribute("fee_denom", fee_denom);
    }
    if let Some(alt_fee_token) = alt_fee_token {
        // An empty string disables the alternate fee asset
        config.alt_fee_token = if alt_fee_token.is_empty() {
            None
        } else {
            Some(deps.api.addr_validate(&alt_fee_token)?)
        };
        response = response.add_attribute("alt_fee_token", alt_fee_token);
    }
    if let Some(recipient) = protocol_fee_recipient {
        config.protocol_fee_recipient = deps.api.addr_validate(&recipient)?;
        response = response.add_attribute("protocol_fee_recipient", recipient);
    }
    if let Some(recipient) = relayer_fee_recipient {
        config.relayer_fee_recipient = deps.api.addr_validate(&recipient)?;
        response = response.add_attribute("relayer_fee_recipient", recipient);
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(response)
}
