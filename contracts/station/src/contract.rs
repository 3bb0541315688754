//! Stablecoin Station - Entry Points
//!
//! Thin dispatch layer; handlers live in `execute` and `query`.

use common::access::grant_role;
use common::Role;
use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdError, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_bridge, execute_deregister_token, execute_grant_role, execute_on_message,
    execute_pause, execute_register_token, execute_remediate_settlement, execute_remove_peer,
    execute_revoke_role, execute_set_peer, execute_unpause, execute_update_config,
    handle_settlement_reply,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_config, query_failed_settlement, query_failed_settlements, query_has_role,
    query_is_registered, query_is_trusted_peer, query_locked_balance, query_outgoing_mapping,
    query_peer, query_peers, query_processed, query_quote, query_roles, query_route,
    query_stats, query_token_mapping, query_token_mappings,
};
use crate::state::{
    Config, Stats, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, SETTLEMENT_REPLY_ID, STATS,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.this_chain == 0 {
        return Err(ContractError::InvalidChainId { chain_id: 0 });
    }
    if msg.fee_denom.is_empty() {
        return Err(ContractError::InvalidToken {
            reason: "fee denom cannot be empty".to_string(),
        });
    }

    let admin = match msg.admin {
        Some(admin) => deps.api.addr_validate(&admin)?,
        None => info.sender,
    };

    let config = Config {
        this_chain: msg.this_chain,
        channel: deps.api.addr_validate(&msg.channel)?,
        fee_manager: deps.api.addr_validate(&msg.fee_manager)?,
        fee_denom: msg.fee_denom,
        alt_fee_token: msg
            .alt_fee_token
            .map(|token| deps.api.addr_validate(&token))
            .transpose()?,
        protocol_fee_recipient: deps.api.addr_validate(&msg.protocol_fee_recipient)?,
        relayer_fee_recipient: deps.api.addr_validate(&msg.relayer_fee_recipient)?,
        paused: false,
    };
    CONFIG.save(deps.storage, &config)?;
    STATS.save(deps.storage, &Stats::default())?;

    for role in [Role::DefaultAdmin, Role::TokenManager, Role::FeeManager] {
        grant_role(deps.storage, role, &admin)?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", admin)
        .add_attribute("this_chain", config.this_chain.to_string())
        .add_attribute("channel", config.channel)
        .add_attribute("fee_manager", config.fee_manager))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Transfers
        ExecuteMsg::Bridge {
            request,
            options,
            pay_in_alt_asset,
        } => execute_bridge(deps, env, info, request, options, pay_in_alt_asset),
        ExecuteMsg::OnMessage {
            src_chain,
            sender,
            nonce,
            payload,
        } => execute_on_message(deps, env, info, src_chain, sender, nonce, payload),

        // Peers
        ExecuteMsg::SetPeer { chain, peer } => execute_set_peer(deps, info, chain, peer),
        ExecuteMsg::RemovePeer { chain } => execute_remove_peer(deps, info, chain),

        // Registry
        ExecuteMsg::RegisterToken {
            remote_chain,
            remote_token,
            local_token,
            is_native,
            overwrite,
        } => execute_register_token(
            deps,
            info,
            remote_chain,
            remote_token,
            local_token,
            is_native,
            overwrite,
        ),
        ExecuteMsg::DeregisterToken {
            remote_chain,
            remote_token,
        } => execute_deregister_token(deps, info, remote_chain, remote_token),

        // Settlement
        ExecuteMsg::RemediateSettlement {
            src_chain,
            nonce,
            recipient,
        } => execute_remediate_settlement(deps, info, src_chain, nonce, recipient),

        // Administration
        ExecuteMsg::GrantRole { role, account } => execute_grant_role(deps, info, role, account),
        ExecuteMsg::RevokeRole { role, account } => {
            execute_revoke_role(deps, info, role, account)
        }
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
        ExecuteMsg::UpdateConfig {
            channel,
            fee_manager,
            fee_denom,
            alt_fee_token,
            protocol_fee_recipient,
            relayer_fee_recipient,
        } => execute_update_config(
            deps,
            info,
            channel,
            fee_manager,
            fee_denom,
            alt_fee_token,
            protocol_fee_recipient,
            relayer_fee_recipient,
        ),
    }
}

// ============================================================================
// Reply
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        SETTLEMENT_REPLY_ID => handle_settlement_reply(deps, env, msg.result),
        id => Err(StdError::generic_err(format!("unknown reply id {}", id)).into()),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Stats {} => to_json_binary(&query_stats(deps)?),
        QueryMsg::Quote {
            sender,
            request,
            options,
            pay_in_alt_asset,
        } => to_json_binary(&query_quote(
            deps,
            sender,
            request,
            options,
            pay_in_alt_asset,
        )?),
        QueryMsg::Peer { chain } => to_json_binary(&query_peer(deps, chain)?),
        QueryMsg::Peers { start_after, limit } => {
            to_json_binary(&query_peers(deps, start_after, limit)?)
        }
        QueryMsg::IsTrustedPeer { chain, address } => {
            to_json_binary(&query_is_trusted_peer(deps, chain, address)?)
        }
        QueryMsg::Route { remote_chain } => to_json_binary(&query_route(deps, remote_chain)?),
        QueryMsg::TokenMapping {
            remote_chain,
            remote_token,
        } => to_json_binary(&query_token_mapping(deps, remote_chain, remote_token)?),
        QueryMsg::TokenMappings { start_after, limit } => {
            to_json_binary(&query_token_mappings(deps, start_after, limit)?)
        }
        QueryMsg::IsRegistered {
            remote_chain,
            remote_token,
        } => to_json_binary(&query_is_registered(deps, remote_chain, remote_token)?),
        QueryMsg::OutgoingMapping {
            remote_chain,
            local_token,
        } => to_json_binary(&query_outgoing_mapping(deps, remote_chain, local_token)?),
        QueryMsg::Processed { src_chain, nonce } => {
            to_json_binary(&query_processed(deps, src_chain, nonce)?)
        }
        QueryMsg::FailedSettlement { src_chain, nonce } => {
            to_json_binary(&query_failed_settlement(deps, src_chain, nonce)?)
        }
        QueryMsg::FailedSettlements { start_after, limit } => {
            to_json_binary(&query_failed_settlements(deps, start_after, limit)?)
        }
        QueryMsg::LockedBalance { token } => to_json_binary(&query_locked_balance(deps, token)?),
        QueryMsg::Roles { account } => to_json_binary(&query_roles(deps, account)?),
        QueryMsg::HasRole { role, account } => {
            to_json_binary(&query_has_role(deps, role, account)?)
        }
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if STATS.may_load(deps.storage)?.is_none() {
        STATS.save(deps.storage, &Stats::default())?;
    }

    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
