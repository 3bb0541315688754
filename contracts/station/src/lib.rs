//! Stablecoin Station - Cross-Chain Stablecoin Transfers
//!
//! One station runs per chain. Stations trust exactly one peer per remote
//! chain and move value through an external message channel.
//!
//! # Outgoing Flow (Bridge)
//! 1. User approves the station and calls `Bridge` with the channel fee attached
//! 2. The fee manager prices the transfer; fee components go to their recipients
//! 3. The net amount is locked (origin token) or burned (wrapped token)
//! 4. The encoded transfer record is handed to the channel
//!
//! # Incoming Flow (OnMessage)
//! 1. The channel delivers a verified message from the peer station
//! 2. The (source chain, nonce) pair is marked processed
//! 3. The recipient is paid: release from custody or mint wrapped supply
//! 4. A failed payout is recorded and can be remediated by an admin
//!
//! # Security
//! - Exactly-once delivery per (source chain, nonce), in any order
//! - Single trusted peer per remote chain
//! - Role-gated configuration (default_admin, token_manager)
//! - Emergency pause

pub mod contract;
pub mod error;
mod execute;
pub mod msg;
pub mod peers;
mod query;
pub mod registry;
pub mod state;
pub mod transfer;

pub use crate::error::ContractError;
pub use crate::transfer::{prepare_transfer, PreparedTransfer};
