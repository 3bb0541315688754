//! Message types for the fee manager contract

use common::fee::FeeComponent;
use common::{FeeSplit, FeeTier, Role};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct InstantiateMsg {
    /// Receives `default_admin` and `fee_manager` (defaults to the instantiator)
    pub admin: Option<String>,
    /// Tier table (defaults to the five-tier table)
    pub tiers: Option<Vec<FeeTier>>,
    /// Component split (defaults to 80/20 protocol/relayer)
    pub split: Option<FeeSplit>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Replace the tier table
    ///
    /// Authorization: fee_manager
    SetFeeTiers { tiers: Vec<FeeTier> },

    /// Replace the component split
    ///
    /// Authorization: fee_manager
    SetFeeSplit { split: FeeSplit },

    /// Authorization: default_admin
    GrantRole { role: Role, account: String },

    /// Authorization: default_admin
    RevokeRole { role: Role, account: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Tier thresholds in table order
    #[returns(ThresholdsResponse)]
    Thresholds {},

    #[returns(FeeTiersResponse)]
    FeeTiers {},

    #[returns(FeeSplit)]
    FeeSplit {},

    /// Net amount and fee components for `amount` at `decimals` precision
    #[returns(ComputeFeeResponse)]
    ComputeFee { amount: Uint128, decimals: u8 },

    #[returns(HasRoleResponse)]
    HasRole { role: Role, account: String },
}

#[cw_serde]
pub struct ThresholdsResponse {
    pub thresholds: Vec<Uint128>,
}

#[cw_serde]
pub struct FeeTiersResponse {
    pub tiers: Vec<FeeTier>,
}

#[cw_serde]
pub struct ComputeFeeResponse {
    pub amount: Uint128,
    pub net_amount: Uint128,
    pub tier_index: u32,
    pub fee_rate_bps: u64,
    pub components: Vec<FeeComponent>,
}

#[cw_serde]
pub struct HasRoleResponse {
    pub account: Addr,
    pub role: Role,
    pub has_role: bool,
}
