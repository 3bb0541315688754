//! Fee Manager Contract - Shared Tier Table for the Stations
//!
//! Holds the fee tier table and the component split that every station on a
//! chain charges against. Stations call the `ComputeFee` query for both their
//! quotes and their sends, so a table change takes effect for both at once.
//!
//! # Roles
//! - `default_admin` - grants and revokes roles
//! - `fee_manager` - replaces the tier table and the split

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;

pub use crate::error::FeeManagerError;
