//! Common - Shared Types and Utilities for the Station Contracts
//!
//! This package provides the pieces both sides of a bridge route must agree on:
//! - `fee` - the tiered fee engine and canonical decimal normalization
//! - `codec` - the `TransferRecord` wire format carried by the message channel
//! - `access` - the role table used by every mutating entry point
//! - `channel` - the interface of the external message channel
//! - `hash` - keccak helpers for payload hashes and transfer ids

pub mod access;
pub mod channel;
pub mod codec;
pub mod fee;
pub mod hash;

pub use access::Role;
pub use codec::TransferRecord;
pub use fee::{compute_fee, FeeBreakdown, FeeError, FeeSplit, FeeTier, FeeTierTable};
