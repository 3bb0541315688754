//! State definitions for the stablecoin station
//!
//! Storage is grouped the same way the handlers are: configuration, the peer
//! trust table, the token registry, inbound exactly-once tracking and the
//! settlement bookkeeping that backs failed payouts.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Chain id of the chain this station is deployed on
    pub this_chain: u32,
    /// Message channel contract; the only caller allowed to deliver messages
    pub channel: Addr,
    /// Fee manager contract consulted for every quote and bridge
    pub fee_manager: Addr,
    /// Native denom the channel fee is paid in
    pub fee_denom: String,
    /// CW20 the channel accepts as an alternate fee asset, if any
    pub alt_fee_token: Option<Addr>,
    /// Receives the protocol fee component
    pub protocol_fee_recipient: Addr,
    /// Receives the relayer fee component
    pub relayer_fee_recipient: Addr,
    /// Whether bridging and delivery are currently halted
    pub paused: bool,
}

/// Registry entry mapping a remote token to a local CW20
#[cw_serde]
pub struct TokenMapping {
    /// Chain the remote token lives on
    pub remote_chain: u32,
    /// Remote token identity as the remote station reports it
    pub remote_token: String,
    /// Local CW20 contract
    pub local_token: Addr,
    /// true: local token is the origin asset and is locked/released.
    /// false: local token is a wrapped representation that is burned/minted.
    pub is_native: bool,
    /// Local token decimals, read from the token at registration
    pub local_decimals: u8,
}

/// Record of a delivered message, written before the payout is attempted
#[cw_serde]
pub struct ProcessedMessage {
    pub transfer_id: [u8; 32],
    pub processed_at: Timestamp,
}

/// A payout owed to a recipient of a delivered message
#[cw_serde]
pub struct Settlement {
    pub src_chain: u32,
    pub nonce: u64,
    pub transfer_id: [u8; 32],
    pub local_token: Addr,
    /// Recipient as encoded by the source station, validated at payout
    pub recipient: String,
    /// Amount in local token units
    pub amount: Uint128,
    pub is_native: bool,
}

/// A payout that could not be completed when the message was delivered
#[cw_serde]
pub struct FailedSettlement {
    pub settlement: Settlement,
    pub reason: String,
    pub failed_at: Timestamp,
}

/// Station statistics
#[cw_serde]
#[derive(Default)]
pub struct Stats {
    /// Transfers handed to the channel
    pub total_outgoing: u64,
    /// Messages accepted and marked processed
    pub total_incoming: u64,
    /// Payouts recorded as failed
    pub total_failed_settlements: u64,
    /// Failed payouts later completed by an admin
    pub total_remediated: u64,
}

// ============================================================================
// Storage Keys
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:stablecoin-station";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reply id of the payout submessage dispatched by `OnMessage`
pub const SETTLEMENT_REPLY_ID: u64 = 1;

// ============================================================================
// Core State
// ============================================================================

/// Contract configuration
pub const CONFIG: Item<Config> = Item::new("config");

/// Station statistics
pub const STATS: Item<Stats> = Item::new("stats");

// ============================================================================
// Peer Trust Table
// ============================================================================

/// Trusted remote station per chain id
pub const PEERS: Map<u32, String> = Map::new("peers");

// ============================================================================
// Token Registry
// ============================================================================

/// Registry entries keyed by (remote_chain, remote_token)
pub const TOKEN_MAPPINGS: Map<(u32, &str), TokenMapping> = Map::new("token_mappings");

/// Reverse index keyed by (remote_chain, local_token) → remote_token,
/// used to resolve the destination token for outbound transfers
pub const LOCAL_TOKEN_INDEX: Map<(u32, &Addr), String> = Map::new("local_token_index");

/// Number of registry entries per remote chain
pub const ROUTE_TOKEN_COUNT: Map<u32, u32> = Map::new("route_token_count");

// ============================================================================
// Inbound Tracking
// ============================================================================

/// Delivered messages keyed by (src_chain, nonce). Membership only, so
/// nonces may arrive in any order.
pub const PROCESSED_NONCES: Map<(u32, u64), ProcessedMessage> = Map::new("processed_nonces");

/// Payouts whose dispatch failed, keyed by (src_chain, nonce)
pub const FAILED_SETTLEMENTS: Map<(u32, u64), FailedSettlement> = Map::new("failed_settlements");

/// Payout in flight between `OnMessage` and its reply
pub const PENDING_SETTLEMENT: Item<Settlement> = Item::new("pending_settlement");

// ============================================================================
// Liquidity
// ============================================================================

/// Origin tokens held in custody for outstanding wrapped supply elsewhere
pub const LOCKED_BALANCES: Map<&Addr, Uint128> = Map::new("locked_balances");
