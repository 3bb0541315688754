//! Message types for the stablecoin station
//!
//! Instantiation, execution and query messages plus their response types.

use common::fee::FeeComponent;
use common::Role;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128};

use crate::state::{FailedSettlement, TokenMapping};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Receives every role (defaults to the instantiator)
    pub admin: Option<String>,
    /// Chain id of this chain (non-zero)
    pub this_chain: u32,
    /// Message channel contract
    pub channel: String,
    /// Fee manager contract
    pub fee_manager: String,
    /// Native denom channel fees are paid in
    pub fee_denom: String,
    /// CW20 accepted by the channel as an alternate fee asset
    pub alt_fee_token: Option<String>,
    /// Receives the protocol fee component
    pub protocol_fee_recipient: String,
    /// Receives the relayer fee component
    pub relayer_fee_recipient: String,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// A transfer as the user requests it
#[cw_serde]
pub struct TransferRequest {
    /// Local CW20 to bridge
    pub token: String,
    /// Recipient on the destination chain
    pub recipient: String,
    /// Gross amount in local token units
    pub amount: Uint128,
    /// Destination chain id
    pub dest_chain: u32,
}

#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Transfers
    // ========================================================================
    /// Bridge `request.amount` of `request.token` to `request.dest_chain`.
    ///
    /// The station pulls the tokens with `TransferFrom`, so the caller must
    /// first approve the station. The channel's native fee is attached as
    /// funds in the configured fee denom; any excess is refunded.
    Bridge {
        request: TransferRequest,
        /// Opaque channel execution options
        options: Binary,
        /// Pay the channel fee in the alternate fee asset
        pay_in_alt_asset: bool,
    },

    /// Deliver a verified message from the peer station on `src_chain`.
    ///
    /// Authorization: configured message channel
    OnMessage {
        src_chain: u32,
        /// Remote station that sent the message
        sender: String,
        nonce: u64,
        payload: Binary,
    },

    // ========================================================================
    // Peer Trust Table
    // ========================================================================
    /// Trust `peer` as the only station allowed to originate messages from `chain`
    ///
    /// Authorization: default_admin
    SetPeer { chain: u32, peer: String },

    /// Authorization: default_admin
    RemovePeer { chain: u32 },

    // ========================================================================
    // Token Registry
    // ========================================================================
    /// Map `remote_token` on `remote_chain` to `local_token`.
    ///
    /// Authorization: token_manager
    RegisterToken {
        remote_chain: u32,
        remote_token: String,
        local_token: String,
        /// true: lock/release custody; false: burn/mint wrapped supply
        is_native: bool,
        /// Replace an existing mapping instead of failing
        #[serde(default)]
        overwrite: bool,
    },

    /// Authorization: token_manager
    DeregisterToken {
        remote_chain: u32,
        remote_token: String,
    },

    // ========================================================================
    // Settlement
    // ========================================================================
    /// Re-dispatch a failed payout, to `recipient` if given instead of the
    /// recorded one
    ///
    /// Authorization: default_admin
    RemediateSettlement {
        src_chain: u32,
        nonce: u64,
        recipient: Option<String>,
    },

    // ========================================================================
    // Administration
    // ========================================================================
    /// Authorization: default_admin
    GrantRole { role: Role, account: String },

    /// Authorization: default_admin
    RevokeRole { role: Role, account: String },

    /// Authorization: default_admin
    Pause {},

    /// Authorization: default_admin
    Unpause {},

    /// Authorization: default_admin
    UpdateConfig {
        channel: Option<String>,
        fee_manager: Option<String>,
        fee_denom: Option<String>,
        alt_fee_token: Option<String>,
        protocol_fee_recipient: Option<String>,
        relayer_fee_recipient: Option<String>,
    },
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(StatsResponse)]
    Stats {},

    /// Full cost breakdown of a transfer `sender` would make with `request`.
    /// Matches what `Bridge` charges in the same state.
    #[returns(QuoteResponse)]
    Quote {
        sender: String,
        request: TransferRequest,
        options: Binary,
        pay_in_alt_asset: bool,
    },

    #[returns(PeerResponse)]
    Peer { chain: u32 },

    #[returns(PeersResponse)]
    Peers {
        start_after: Option<u32>,
        limit: Option<u32>,
    },

    #[returns(IsTrustedPeerResponse)]
    IsTrustedPeer { chain: u32, address: String },

    /// Readiness of the route to `remote_chain`
    #[returns(RouteResponse)]
    Route { remote_chain: u32 },

    #[returns(Option<TokenMapping>)]
    TokenMapping {
        remote_chain: u32,
        remote_token: String,
    },

    #[returns(TokenMappingsResponse)]
    TokenMappings {
        start_after: Option<(u32, String)>,
        limit: Option<u32>,
    },

    #[returns(IsRegisteredResponse)]
    IsRegistered {
        remote_chain: u32,
        remote_token: String,
    },

    /// Remote token a local token is bridged to on `remote_chain`
    #[returns(Option<TokenMapping>)]
    OutgoingMapping {
        remote_chain: u32,
        local_token: String,
    },

    #[returns(ProcessedResponse)]
    Processed { src_chain: u32, nonce: u64 },

    #[returns(Option<FailedSettlement>)]
    FailedSettlement { src_chain: u32, nonce: u64 },

    #[returns(FailedSettlementsResponse)]
    FailedSettlements {
        start_after: Option<(u32, u64)>,
        limit: Option<u32>,
    },

    #[returns(LockedBalanceResponse)]
    LockedBalance { token: String },

    #[returns(RolesResponse)]
    Roles { account: String },

    #[returns(HasRoleResponse)]
    HasRole { role: Role, account: String },
}

// ============================================================================
// Response Types
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub this_chain: u32,
    pub channel: Addr,
    pub fee_manager: Addr,
    pub fee_denom: String,
    pub alt_fee_token: Option<Addr>,
    pub protocol_fee_recipient: Addr,
    pub relayer_fee_recipient: Addr,
    pub paused: bool,
}

#[cw_serde]
pub struct StatsResponse {
    pub total_outgoing: u64,
    pub total_incoming: u64,
    pub total_failed_settlements: u64,
    pub total_remediated: u64,
}

#[cw_serde]
pub struct QuoteResponse {
    /// Amount requested, in local units
    pub gross_amount: Uint128,
    /// Amount pulled from the sender (gross without sub-canonical dust)
    pub transfer_amount: Uint128,
    /// Amount locked or burned after fees, in local units
    pub net_amount: Uint128,
    /// Amount carried in the payload, in canonical units
    pub delivered_amount: Uint128,
    pub tier_index: u32,
    pub fee_rate_bps: u64,
    /// Fee components in local units
    pub components: Vec<FeeComponent>,
    /// Channel fee payable in the native fee denom
    pub native_fee: Uint128,
    /// Channel fee payable in the alternate asset
    pub alt_fee: Uint128,
    pub fee_denom: String,
}

#[cw_serde]
pub struct PeerResponse {
    pub chain: u32,
    pub peer: Option<String>,
}

#[cw_serde]
pub struct PeerEntry {
    pub chain: u32,
    pub peer: String,
}

#[cw_serde]
pub struct PeersResponse {
    pub peers: Vec<PeerEntry>,
}

#[cw_serde]
pub struct IsTrustedPeerResponse {
    pub trusted: bool,
}

/// Lifecycle of the route to one remote chain
#[cw_serde]
pub enum RouteState {
    /// No peer and no tokens
    Unconfigured,
    /// Peer set, no tokens registered
    PeerTrusted,
    /// Tokens registered, no peer set
    TokenRegistered,
    /// Peer set and at least one token registered
    Bridgeable,
}

#[cw_serde]
pub struct RouteResponse {
    pub remote_chain: u32,
    pub state: RouteState,
    pub peer: Option<String>,
    pub token_count: u32,
}

#[cw_serde]
pub struct TokenMappingsResponse {
    pub mappings: Vec<TokenMapping>,
}

#[cw_serde]
pub struct IsRegisteredResponse {
    pub registered: bool,
}

#[cw_serde]
pub struct ProcessedResponse {
    pub processed: bool,
    pub transfer_id: Option<String>,
    pub processed_at: Option<Timestamp>,
}

#[cw_serde]
pub struct FailedSettlementsResponse {
    pub settlements: Vec<FailedSettlement>,
}

#[cw_serde]
pub struct LockedBalanceResponse {
    pub token: Addr,
    pub locked: Uint128,
}

#[cw_serde]
pub struct RolesResponse {
    pub account: Addr,
    pub roles: Vec<Role>,
}

#[cw_serde]
pub struct HasRoleResponse {
    pub account: Addr,
    pub role: Role,
    pub has_role: bool,
}
