//! Token Registry
//!
//! Maps (remote_chain, remote_token) to a local CW20 and keeps a reverse
//! index so outbound transfers can find the remote token for a local one.
//! Both directions are written and removed together.

use cosmwasm_std::{Addr, StdResult, Storage};

use crate::error::ContractError;
use crate::state::{TokenMapping, LOCAL_TOKEN_INDEX, ROUTE_TOKEN_COUNT, TOKEN_MAPPINGS};

/// Store `mapping`. Without `overwrite`, an existing entry for the remote
/// token, or another remote token already bound to the same local token,
/// is rejected and nothing changes.
pub fn register(
    storage: &mut dyn Storage,
    mapping: &TokenMapping,
    overwrite: bool,
) -> Result<(), ContractError> {
    let chain = mapping.remote_chain;
    let existing = TOKEN_MAPPINGS.may_load(storage, (chain, mapping.remote_token.as_str()))?;
    let bound_remote = LOCAL_TOKEN_INDEX
        .may_load(storage, (chain, &mapping.local_token))?
        .filter(|remote| *remote != mapping.remote_token);

    if !overwrite {
        if existing.is_some() {
            return Err(ContractError::AlreadyRegistered {
                chain_id: chain,
                token: mapping.remote_token.clone(),
            });
        }
        if bound_remote.is_some() {
            return Err(ContractError::AlreadyRegistered {
                chain_id: chain,
                token: mapping.local_token.to_string(),
            });
        }
    }

    let mut count = ROUTE_TOKEN_COUNT.may_load(storage, chain)?.unwrap_or(0);

    if let Some(old) = existing {
        LOCAL_TOKEN_INDEX.remove(storage, (chain, &old.local_token));
        count = count.saturating_sub(1);
    }
    if let Some(other) = bound_remote {
        TOKEN_MAPPINGS.remove(storage, (chain, other.as_str()));
        count = count.saturating_sub(1);
    }

    TOKEN_MAPPINGS.save(storage, (chain, mapping.remote_token.as_str()), mapping)?;
    LOCAL_TOKEN_INDEX.save(storage, (chain, &mapping.local_token), &mapping.remote_token)?;
    ROUTE_TOKEN_COUNT.save(storage, chain, &(count + 1))?;

    Ok(())
}

/// Remove the mapping for `remote_token` and its reverse index entry
pub fn deregister(
    storage: &mut dyn Storage,
    remote_chain: u32,
    remote_token: &str,
) -> Result<TokenMapping, ContractError> {
    let mapping = resolve(storage, remote_chain, remote_token)?;

    TOKEN_MAPPINGS.remove(storage, (remote_chain, remote_token));
    LOCAL_TOKEN_INDEX.remove(storage, (remote_chain, &mapping.local_token));

    let count = ROUTE_TOKEN_COUNT.may_load(storage, remote_chain)?.unwrap_or(0);
    if count <= 1 {
        ROUTE_TOKEN_COUNT.remove(storage, remote_chain);
    } else {
        ROUTE_TOKEN_COUNT.save(storage, remote_chain, &(count - 1))?;
    }

    Ok(mapping)
}

/// Local mapping for a token arriving from `remote_chain`
pub fn resolve(
    storage: &dyn Storage,
    remote_chain: u32,
    remote_token: &str,
) -> Result<TokenMapping, ContractError> {
    TOKEN_MAPPINGS
        .may_load(storage, (remote_chain, remote_token))?
        .ok_or_else(|| ContractError::UnknownToken {
            chain_id: remote_chain,
            token: remote_token.to_string(),
        })
}

/// Mapping used to send `local_token` to `remote_chain`
pub fn resolve_outgoing(
    storage: &dyn Storage,
    remote_chain: u32,
    local_token: &Addr,
) -> Result<TokenMapping, ContractError> {
    let remote_token = LOCAL_TOKEN_INDEX
        .may_load(storage, (remote_chain, local_token))?
        .ok_or_else(|| ContractError::UnknownToken {
            chain_id: remote_chain,
            token: local_token.to_string(),
        })?;
    resolve(storage, remote_chain, &remote_token)
}

pub fn is_registered(storage: &dyn Storage, remote_chain: u32, remote_token: &str) -> bool {
    TOKEN_MAPPINGS.has(storage, (remote_chain, remote_token))
}

pub fn token_count(storage: &dyn Storage, remote_chain: u32) -> StdResult<u32> {
    Ok(ROUTE_TOKEN_COUNT
        .may_load(storage, remote_chain)?
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;

    fn mapping(remote_token: &str, local_token: &str) -> TokenMapping {
        TokenMapping {
            remote_chain: 2,
            remote_token: remote_token.to_string(),
            local_token: Addr::unchecked(local_token),
            is_native: true,
            local_decimals: 6,
        }
    }

    #[test]
    fn test_register_and_resolve_both_directions() {
        let mut storage = MockStorage::new();
        register(&mut storage, &mapping("0xremote", "usdc"), false).unwrap();

        assert_eq!(
            resolve(&storage, 2, "0xremote").unwrap().local_token,
            Addr::unchecked("usdc")
        );
        assert_eq!(
            resolve_outgoing(&storage, 2, &Addr::unchecked("usdc"))
                .unwrap()
                .remote_token,
            "0xremote"
        );
        assert_eq!(token_count(&storage, 2).unwrap(), 1);
        assert!(is_registered(&storage, 2, "0xremote"));
        assert!(!is_registered(&storage, 3, "0xremote"));
    }

    #[test]
    fn test_duplicate_register_leaves_state_unchanged() {
        let mut storage = MockStorage::new();
        register(&mut storage, &mapping("0xremote", "usdc"), false).unwrap();

        let err = register(&mut storage, &mapping("0xremote", "other"), false).unwrap_err();
        assert!(matches!(err, ContractError::AlreadyRegistered { .. }));

        let err = register(&mut storage, &mapping("0xsecond", "usdc"), false).unwrap_err();
        assert!(matches!(err, ContractError::AlreadyRegistered { .. }));

        assert_eq!(
            resolve(&storage, 2, "0xremote").unwrap().local_token,
            Addr::unchecked("usdc")
        );
        assert!(resolve_outgoing(&storage, 2, &Addr::unchecked("other")).is_err());
        assert_eq!(token_count(&storage, 2).unwrap(), 1);
    }

    #[test]
    fn test_overwrite_rebinds_local_token() {
        let mut storage = MockStorage::new();
        register(&mut storage, &mapping("0xremote", "usdc"), false).unwrap();
        register(&mut storage, &mapping("0xremote", "usdt"), true).unwrap();

        assert!(resolve_outgoing(&storage, 2, &Addr::unchecked("usdc")).is_err());
        assert_eq!(
            resolve_outgoing(&storage, 2, &Addr::unchecked("usdt"))
                .unwrap()
                .remote_token,
            "0xremote"
        );
        assert_eq!(token_count(&storage, 2).unwrap(), 1);

        // Binding usdt to a different remote token drops the old entry
        register(&mut storage, &mapping("0xnew", "usdt"), true).unwrap();
        assert!(resolve(&storage, 2, "0xremote").is_err());
        assert_eq!(token_count(&storage, 2).unwrap(), 1);
    }

    #[test]
    fn test_deregister() {
        let mut storage = MockStorage::new();
        register(&mut storage, &mapping("0xremote", "usdc"), false).unwrap();
        register(&mut storage, &mapping("0xother", "usdt"), false).unwrap();
        assert_eq!(token_count(&storage, 2).unwrap(), 2);

        deregister(&mut storage, 2, "0xremote").unwrap();
        assert_eq!(token_count(&storage, 2).unwrap(), 1);
        assert!(resolve_outgoing(&storage, 2, &Addr::unchecked("usdc")).is_err());

        deregister(&mut storage, 2, "0xother").unwrap();
        assert_eq!(token_count(&storage, 2).unwrap(), 0);

        let err = deregister(&mut storage, 2, "0xother").unwrap_err();
        assert!(matches!(err, ContractError::UnknownToken { .. }));
    }
}
