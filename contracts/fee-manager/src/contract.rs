//! Fee Manager Contract - Entry Points

use common::access::{grant_role, has_role, revoke_role};
use common::{compute_fee, FeeSplit, FeeTier, FeeTierTable, Role};
use cosmwasm_std::{
    entry_point, to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response,
    StdError, StdResult, Storage, Uint128,
};
use cw2::set_contract_version;

use crate::error::FeeManagerError;
use crate::msg::{
    ComputeFeeResponse, ExecuteMsg, FeeTiersResponse, HasRoleResponse, InstantiateMsg, MigrateMsg,
    QueryMsg, ThresholdsResponse,
};
use crate::state::{CONTRACT_NAME, CONTRACT_VERSION, FEE_SPLIT, FEE_TIERS};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, FeeManagerError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = match msg.admin {
        Some(admin) => deps.api.addr_validate(&admin)?,
        None => info.sender,
    };

    let table = match msg.tiers {
        Some(tiers) => FeeTierTable::new(tiers)?,
        None => FeeTierTable::default_tiers(),
    };
    let split = msg.split.unwrap_or_default();
    split.validate()?;

    FEE_TIERS.save(deps.storage, &table)?;
    FEE_SPLIT.save(deps.storage, &split)?;

    grant_role(deps.storage, Role::DefaultAdmin, &admin)?;
    grant_role(deps.storage, Role::FeeManager, &admin)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", admin)
        .add_attribute("tier_count", table.tiers.len().to_string())
        .add_attribute("protocol_share_bps", split.protocol_share_bps.to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, FeeManagerError> {
    match msg {
        ExecuteMsg::SetFeeTiers { tiers } => execute_set_fee_tiers(deps, info, tiers),
        ExecuteMsg::SetFeeSplit { split } => execute_set_fee_split(deps, info, split),
        ExecuteMsg::GrantRole { role, account } => execute_grant_role(deps, info, role, account),
        ExecuteMsg::RevokeRole { role, account } => {
            execute_revoke_role(deps, info, role, account)
        }
    }
}

fn ensure_role(storage: &dyn Storage, role: Role, account: &Addr) -> Result<(), FeeManagerError> {
    if !has_role(storage, role, account)? {
        return Err(FeeManagerError::Unauthorized {
            role: role.as_str().to_string(),
        });
    }
    Ok(())
}

fn execute_set_fee_tiers(
    deps: DepsMut,
    info: MessageInfo,
    tiers: Vec<FeeTier>,
) -> Result<Response, FeeManagerError> {
    ensure_role(deps.storage, Role::FeeManager, &info.sender)?;

    let table = FeeTierTable::new(tiers)?;
    FEE_TIERS.save(deps.storage, &table)?;

    let thresholds = table
        .thresholds()
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",");

    Ok(Response::new()
        .add_attribute("method", "set_fee_tiers")
        .add_attribute("tier_count", table.tiers.len().to_string())
        .add_attribute("thresholds", thresholds))
}

fn execute_set_fee_split(
    deps: DepsMut,
    info: MessageInfo,
    split: FeeSplit,
) -> Result<Response, FeeManagerError> {
    ensure_role(deps.storage, Role::FeeManager, &info.sender)?;

    split.validate()?;
    FEE_SPLIT.save(deps.storage, &split)?;

    Ok(Response::new()
        .add_attribute("method", "set_fee_split")
        .add_attribute("protocol_share_bps", split.protocol_share_bps.to_string()))
}

fn execute_grant_role(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
    account: String,
) -> Result<Response, FeeManagerError> {
    ensure_role(deps.storage, Role::DefaultAdmin, &info.sender)?;

    let account = deps.api.addr_validate(&account)?;
    let granted = grant_role(deps.storage, role, &account)?;

    Ok(Response::new()
        .add_attribute("method", "grant_role")
        .add_attribute("role", role.as_str())
        .add_attribute("account", account)
        .add_attribute("changed", granted.to_string()))
}

fn execute_revoke_role(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
    account: String,
) -> Result<Response, FeeManagerError> {
    ensure_role(deps.storage, Role::DefaultAdmin, &info.sender)?;

    let account = deps.api.addr_validate(&account)?;
    let revoked = revoke_role(deps.storage, role, &account)?;

    Ok(Response::new()
        .add_attribute("method", "revoke_role")
        .add_attribute("role", role.as_str())
        .add_attribute("account", account)
        .add_attribute("changed", revoked.to_string()))
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Thresholds {} => to_json_binary(&ThresholdsResponse {
            thresholds: FEE_TIERS.load(deps.storage)?.thresholds(),
        }),
        QueryMsg::FeeTiers {} => to_json_binary(&FeeTiersResponse {
            tiers: FEE_TIERS.load(deps.storage)?.tiers,
        }),
        QueryMsg::FeeSplit {} => to_json_binary(&FEE_SPLIT.load(deps.storage)?),
        QueryMsg::ComputeFee { amount, decimals } => {
            to_json_binary(&query_compute_fee(deps, amount, decimals)?)
        }
        QueryMsg::HasRole { role, account } => {
            let account = deps.api.addr_validate(&account)?;
            to_json_binary(&HasRoleResponse {
                has_role: has_role(deps.storage, role, &account)?,
                account,
                role,
            })
        }
    }
}

pub fn query_compute_fee(deps: Deps, amount: Uint128, decimals: u8) -> StdResult<ComputeFeeResponse> {
    let table = FEE_TIERS.load(deps.storage)?;
    let split = FEE_SPLIT.load(deps.storage)?;
    let breakdown = compute_fee(amount, decimals, &table, &split)
        .map_err(|e| StdError::generic_err(e.to_string()))?;

    Ok(ComputeFeeResponse {
        amount: breakdown.gross,
        net_amount: breakdown.net,
        tier_index: breakdown.tier_index,
        fee_rate_bps: breakdown.fee_rate_bps,
        components: breakdown.components,
    })
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, FeeManagerError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if FEE_SPLIT.may_load(deps.storage)?.is_none() {
        FEE_SPLIT.save(deps.storage, &FeeSplit::default())?;
    }

    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::{mock_dependencies, mock_env, mock_info};
    use cosmwasm_std::{from_json, Addr};

    #[test]
    fn test_instantiate_grants_both_roles() {
        let mut deps = mock_dependencies();
        instantiate(
            deps.as_mut(),
            mock_env(),
            mock_info("deployer", &[]),
            InstantiateMsg {
                admin: None,
                tiers: None,
                split: None,
            },
        )
        .unwrap();

        let deployer = Addr::unchecked("deployer");
        assert!(has_role(deps.as_ref().storage, Role::DefaultAdmin, &deployer).unwrap());
        assert!(has_role(deps.as_ref().storage, Role::FeeManager, &deployer).unwrap());
        assert!(!has_role(deps.as_ref().storage, Role::TokenManager, &deployer).unwrap());
    }

    #[test]
    fn test_instantiate_rejects_invalid_table() {
        let mut deps = mock_dependencies();
        let err = instantiate(
            deps.as_mut(),
            mock_env(),
            mock_info("deployer", &[]),
            InstantiateMsg {
                admin: None,
                tiers: Some(vec![FeeTier {
                    threshold: Uint128::new(1_000),
                    fee_rate_bps: 100,
                }]),
                split: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, FeeManagerError::Fee(_)));
    }

    #[test]
    fn test_compute_fee_query() {
        let mut deps = mock_dependencies();
        instantiate(
            deps.as_mut(),
            mock_env(),
            mock_info("deployer", &[]),
            InstantiateMsg {
                admin: None,
                tiers: None,
                split: None,
            },
        )
        .unwrap();

        let res: ComputeFeeResponse = from_json(
            query(
                deps.as_ref(),
                mock_env(),
                QueryMsg::ComputeFee {
                    amount: Uint128::new(1_000_000),
                    decimals: 6,
                },
            )
            .unwrap(),
        )
        .unwrap();

        assert_eq!(res.net_amount, Uint128::new(990_000));
        assert_eq!(res.components[0].amount, Uint128::new(8_000));
        assert_eq!(res.components[1].amount, Uint128::new(2_000));

        let err = query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::ComputeFee {
                amount: Uint128::zero(),
                decimals: 6,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid amount"));
    }
}
