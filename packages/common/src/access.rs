//! Role-based access control
//!
//! An explicit `(account, role)` table. Every mutating entry point checks the
//! caller against it before any domain logic runs; only `DefaultAdmin` holders
//! may grant or revoke roles.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Order, StdResult, Storage};
use cw_storage_plus::Map;

#[cw_serde]
#[derive(Copy, Eq)]
pub enum Role {
    DefaultAdmin,
    TokenManager,
    FeeManager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::DefaultAdmin => "default_admin",
            Role::TokenManager => "token_manager",
            Role::FeeManager => "fee_manager",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "default_admin" => Some(Role::DefaultAdmin),
            "token_manager" => Some(Role::TokenManager),
            "fee_manager" => Some(Role::FeeManager),
            _ => None,
        }
    }
}

/// Role membership
/// Key: (account, role name), Value: always true while granted
pub const ROLES: Map<(&Addr, &str), bool> = Map::new("roles");

pub fn has_role(storage: &dyn Storage, role: Role, account: &Addr) -> StdResult<bool> {
    Ok(ROLES
        .may_load(storage, (account, role.as_str()))?
        .unwrap_or(false))
}

/// Grant `role`; returns false if the account already held it
pub fn grant_role(storage: &mut dyn Storage, role: Role, account: &Addr) -> StdResult<bool> {
    if has_role(storage, role, account)? {
        return Ok(false);
    }
    ROLES.save(storage, (account, role.as_str()), &true)?;
    Ok(true)
}

/// Revoke `role`; returns false if the account did not hold it
pub fn revoke_role(storage: &mut dyn Storage, role: Role, account: &Addr) -> StdResult<bool> {
    if !has_role(storage, role, account)? {
        return Ok(false);
    }
    ROLES.remove(storage, (account, role.as_str()));
    Ok(true)
}

/// All roles held by `account`
pub fn roles_of(storage: &dyn Storage, account: &Addr) -> StdResult<Vec<Role>> {
    ROLES
        .prefix(account)
        .keys(storage, None, None, Order::Ascending)
        .filter_map(|key| match key {
            Ok(name) => Role::parse(&name).map(Ok),
            Err(e) => Some(Err(e)),
        })
        .collect()
}
