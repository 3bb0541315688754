//! Query handlers for the stablecoin station.

use common::access::{has_role, roles_of};
use common::hash::bytes32_to_hex;
use common::Role;
use cosmwasm_std::{Binary, Deps, Order, StdError, StdResult};
use cw_storage_plus::Bound;

use crate::msg::{
    ConfigResponse, FailedSettlementsResponse, HasRoleResponse, IsRegisteredResponse,
    IsTrustedPeerResponse, LockedBalanceResponse, PeerEntry, PeerResponse, PeersResponse,
    ProcessedResponse, QuoteResponse, RolesResponse, RouteResponse, StatsResponse,
    TokenMappingsResponse, TransferRequest,
};
use crate::peers;
use crate::registry;
use crate::state::{
    FailedSettlement, TokenMapping, CONFIG, FAILED_SETTLEMENTS, LOCKED_BALANCES, PEERS,
    PROCESSED_NONCES, STATS, TOKEN_MAPPINGS,
};
use crate::transfer::prepare_transfer;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

// ============================================================================
// Core Queries
// ============================================================================

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        this_chain: config.this_chain,
        channel: config.channel,
        fee_manager: config.fee_manager,
        fee_denom: config.fee_denom,
        alt_fee_token: config.alt_fee_token,
        protocol_fee_recipient: config.protocol_fee_recipient,
        relayer_fee_recipient: config.relayer_fee_recipient,
        paused: config.paused,
    })
}

pub fn query_stats(deps: Deps) -> StdResult<StatsResponse> {
    let stats = STATS.load(deps.storage)?;
    Ok(StatsResponse {
        total_outgoing: stats.total_outgoing,
        total_incoming: stats.total_incoming,
        total_failed_settlements: stats.total_failed_settlements,
        total_remediated: stats.total_remediated,
    })
}

/// Price a transfer exactly as `Bridge` would in the current state.
/// Pausing does not affect quotes.
pub fn query_quote(
    deps: Deps,
    sender: String,
    request: TransferRequest,
    options: Binary,
    pay_in_alt_asset: bool,
) -> StdResult<QuoteResponse> {
    let config = CONFIG.load(deps.storage)?;
    let sender = deps.api.addr_validate(&sender)?;
    let prepared = prepare_transfer(
        deps,
        &config,
        &sender,
        &request,
        options,
        pay_in_alt_asset,
    )
    .map_err(|e| StdError::generic_err(e.to_string()))?;

    Ok(prepared.to_quote(&config.fee_denom))
}

// ============================================================================
// Peer Queries
// ============================================================================

pub fn query_peer(deps: Deps, chain: u32) -> StdResult<PeerResponse> {
    Ok(PeerResponse {
        chain,
        peer: peers::load_peer(deps.storage, chain)?,
    })
}

pub fn query_peers(
    deps: Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<PeersResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let peers = PEERS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(chain, peer)| PeerEntry { chain, peer }))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(PeersResponse { peers })
}

pub fn query_is_trusted_peer(
    deps: Deps,
    chain: u32,
    address: String,
) -> StdResult<IsTrustedPeerResponse> {
    Ok(IsTrustedPeerResponse {
        trusted: peers::is_trusted(deps.storage, chain, &address)?,
    })
}

pub fn query_route(deps: Deps, remote_chain: u32) -> StdResult<RouteResponse> {
    Ok(RouteResponse {
        remote_chain,
        state: peers::route_state(deps.storage, remote_chain)?,
        peer: peers::load_peer(deps.storage, remote_chain)?,
        token_count: registry::token_count(deps.storage, remote_chain)?,
    })
}

// ============================================================================
// Registry Queries
// ============================================================================

pub fn query_token_mapping(
    deps: Deps,
    remote_chain: u32,
    remote_token: String,
) -> StdResult<Option<TokenMapping>> {
    TOKEN_MAPPINGS.may_load(deps.storage, (remote_chain, remote_token.as_str()))
}

pub fn query_token_mappings(
    deps: Deps,
    start_after: Option<(u32, String)>,
    limit: Option<u32>,
) -> StdResult<TokenMappingsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after
        .as_ref()
        .map(|(chain, token)| Bound::exclusive((*chain, token.as_str())));

    let mappings = TOKEN_MAPPINGS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, mapping)| mapping))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(TokenMappingsResponse { mappings })
}

pub fn query_is_registered(
    deps: Deps,
    remote_chain: u32,
    remote_token: String,
) -> StdResult<IsRegisteredResponse> {
    Ok(IsRegisteredResponse {
        registered: registry::is_registered(deps.storage, remote_chain, &remote_token),
    })
}

pub fn query_outgoing_mapping(
    deps: Deps,
    remote_chain: u32,
    local_token: String,
) -> StdResult<Option<TokenMapping>> {
    let local_token = deps.api.addr_validate(&local_token)?;
    Ok(registry::resolve_outgoing(deps.storage, remote_chain, &local_token).ok())
}

// ============================================================================
// Inbound Queries
// ============================================================================

pub fn query_processed(deps: Deps, src_chain: u32, nonce: u64) -> StdResult<ProcessedResponse> {
    let processed = PROCESSED_NONCES.may_load(deps.storage, (src_chain, nonce))?;
    Ok(ProcessedResponse {
        processed: processed.is_some(),
        transfer_id: processed
            .as_ref()
            .map(|p| bytes32_to_hex(&p.transfer_id)),
        processed_at: processed.map(|p| p.processed_at),
    })
}

pub fn query_failed_settlement(
    deps: Deps,
    src_chain: u32,
    nonce: u64,
) -> StdResult<Option<FailedSettlement>> {
    FAILED_SETTLEMENTS.may_load(deps.storage, (src_chain, nonce))
}

pub fn query_failed_settlements(
    deps: Deps,
    start_after: Option<(u32, u64)>,
    limit: Option<u32>,
) -> StdResult<FailedSettlementsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let settlements = FAILED_SETTLEMENTS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, failed)| failed))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(FailedSettlementsResponse { settlements })
}

pub fn query_locked_balance(deps: Deps, token: String) -> StdResult<LockedBalanceResponse> {
    let token = deps.api.addr_validate(&token)?;
    let locked = LOCKED_BALANCES
        .may_load(deps.storage, &token)?
        .unwrap_or_default();
    Ok(LockedBalanceResponse { token, locked })
}

// ============================================================================
// Role Queries
// ============================================================================

pub fn query_roles(deps: Deps, account: String) -> StdResult<RolesResponse> {
    let account = deps.api.addr_validate(&account)?;
    Ok(RolesResponse {
        roles: roles_of(deps.storage, &account)?,
        account,
    })
}

pub fn query_has_role(deps: Deps, role: Role, account: String) -> StdResult<HasRoleResponse> {
    let account = deps.api.addr_validate(&account)?;
    Ok(HasRoleResponse {
        has_role: has_role(deps.storage, role, &account)?,
        account,
        role,
    })
}
