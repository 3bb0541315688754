//! Error types for the stablecoin station

use common::FeeError;
use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Fee(#[from] FeeError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: caller lacks role {role}")]
    Unauthorized { role: String },

    #[error("Unauthorized: only the message channel can deliver messages")]
    UnauthorizedChannel,

    // ========================================================================
    // Station State Errors
    // ========================================================================

    #[error("Station is paused")]
    Paused,

    #[error("Invalid chain ID: {chain_id}")]
    InvalidChainId { chain_id: u32 },

    #[error("Route to chain {chain_id} not ready: {reason}")]
    RouteNotReady { chain_id: u32, reason: String },

    #[error("Alternate fee asset not supported")]
    AltFeeNotSupported,

    #[error("Invalid peer: {reason}")]
    InvalidPeer { reason: String },

    // ========================================================================
    // Registry Errors
    // ========================================================================

    #[error("Unknown token: {token} for chain {chain_id}")]
    UnknownToken { chain_id: u32, token: String },

    #[error("Token already registered: {token} for chain {chain_id}")]
    AlreadyRegistered { chain_id: u32, token: String },

    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    // ========================================================================
    // Inbound Errors
    // ========================================================================

    #[error("Untrusted source: {sender} is not the peer for chain {chain_id}")]
    UntrustedSource { chain_id: u32, sender: String },

    #[error("Message already processed: chain {src_chain} nonce {nonce}")]
    AlreadyProcessed { src_chain: u32, nonce: u64 },

    #[error("Invalid payload: {reason}")]
    InvalidPayload { reason: String },

    #[error("Chain mismatch: channel reported {reported}, payload carries {encoded}")]
    ChainMismatch { reported: u32, encoded: u32 },

    #[error("No failed settlement for chain {src_chain} nonce {nonce}")]
    SettlementNotFound { src_chain: u32, nonce: u64 },

    // ========================================================================
    // Amount & Funds Errors
    // ========================================================================

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Invalid recipient: {reason}")]
    InvalidRecipient { reason: String },

    #[error("Insufficient allowance: need {required}, approved {approved}")]
    InsufficientAllowance { required: Uint128, approved: Uint128 },

    #[error("Insufficient balance: need {required}, have {available}")]
    InsufficientBalance { required: Uint128, available: Uint128 },

    #[error("Insufficient fee: expected {expected} {denom}, got {got}")]
    InsufficientFee {
        denom: String,
        expected: Uint128,
        got: Uint128,
    },

    #[error("Unexpected funds: {denom}")]
    UnexpectedFunds { denom: String },

    #[error("Insufficient station liquidity: locked {locked}, requested {requested}")]
    InsufficientLiquidity { locked: Uint128, requested: Uint128 },
}
