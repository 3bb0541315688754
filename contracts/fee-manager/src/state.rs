//! State definitions for the fee manager contract

use common::{FeeSplit, FeeTierTable};
use cw_storage_plus::Item;

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:station-fee-manager";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Active tier table
pub const FEE_TIERS: Item<FeeTierTable> = Item::new("fee_tiers");

/// Active component split
pub const FEE_SPLIT: Item<FeeSplit> = Item::new("fee_split");
