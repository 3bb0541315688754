//! Peer Trust Table
//!
//! One trusted remote station per chain id. Inbound messages are accepted
//! only when the channel-reported sender equals the stored peer.

use cosmwasm_std::{StdResult, Storage};

use crate::error::ContractError;
use crate::msg::RouteState;
use crate::registry;
use crate::state::PEERS;

/// Remote addresses are compared case-insensitively (hex and bech32 alike)
fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

pub fn set_peer(storage: &mut dyn Storage, chain: u32, peer: &str) -> Result<String, ContractError> {
    let peer = normalize(peer);
    if peer.is_empty() {
        return Err(ContractError::InvalidPeer {
            reason: "peer address cannot be empty".to_string(),
        });
    }
    PEERS.save(storage, chain, &peer)?;
    Ok(peer)
}

/// Returns whether a peer was configured
pub fn remove_peer(storage: &mut dyn Storage, chain: u32) -> bool {
    let existed = PEERS.has(storage, chain);
    PEERS.remove(storage, chain);
    existed
}

pub fn load_peer(storage: &dyn Storage, chain: u32) -> StdResult<Option<String>> {
    PEERS.may_load(storage, chain)
}

pub fn is_trusted(storage: &dyn Storage, chain: u32, sender: &str) -> StdResult<bool> {
    Ok(load_peer(storage, chain)?
        .map(|peer| peer == normalize(sender))
        .unwrap_or(false))
}

pub fn route_state(storage: &dyn Storage, remote_chain: u32) -> StdResult<RouteState> {
    let has_peer = PEERS.has(storage, remote_chain);
    let has_tokens = registry::token_count(storage, remote_chain)? > 0;

    Ok(match (has_peer, has_tokens) {
        (false, false) => RouteState::Unconfigured,
        (true, false) => RouteState::PeerTrusted,
        (false, true) => RouteState::TokenRegistered,
        (true, true) => RouteState::Bridgeable,
    })
}

/// Fails unless the route to `remote_chain` is bridgeable
pub fn ensure_route_ready(storage: &dyn Storage, remote_chain: u32) -> Result<(), ContractError> {
    let reason = match route_state(storage, remote_chain)? {
        RouteState::Bridgeable => return Ok(()),
        RouteState::Unconfigured => "no peer and no tokens",
        RouteState::PeerTrusted => "no tokens registered",
        RouteState::TokenRegistered => "no peer set",
    };
    Err(ContractError::RouteNotReady {
        chain_id: remote_chain,
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TokenMapping;
    use cosmwasm_std::testing::MockStorage;
    use cosmwasm_std::Addr;

    #[test]
    fn test_trust_is_exact_per_chain() {
        let mut storage = MockStorage::new();
        set_peer(&mut storage, 2, "0xAbC").unwrap();

        assert!(is_trusted(&storage, 2, "0xabc").unwrap());
        assert!(!is_trusted(&storage, 2, "0xabd").unwrap());
        assert!(!is_trusted(&storage, 3, "0xabc").unwrap());

        assert!(remove_peer(&mut storage, 2));
        assert!(!is_trusted(&storage, 2, "0xabc").unwrap());
        assert!(!remove_peer(&mut storage, 2));
    }

    #[test]
    fn test_route_lifecycle() {
        let mut storage = MockStorage::new();
        assert_eq!(route_state(&storage, 2).unwrap(), RouteState::Unconfigured);
        assert!(ensure_route_ready(&storage, 2).is_err());

        set_peer(&mut storage, 2, "peer").unwrap();
        assert_eq!(route_state(&storage, 2).unwrap(), RouteState::PeerTrusted);

        registry::register(
            &mut storage,
            &TokenMapping {
                remote_chain: 2,
                remote_token: "remote".to_string(),
                local_token: Addr::unchecked("local"),
                is_native: true,
                local_decimals: 6,
            },
            false,
        )
        .unwrap();
        assert_eq!(route_state(&storage, 2).unwrap(), RouteState::Bridgeable);
        ensure_route_ready(&storage, 2).unwrap();

        remove_peer(&mut storage, 2);
        assert_eq!(route_state(&storage, 2).unwrap(), RouteState::TokenRegistered);
    }

    #[test]
    fn test_empty_peer_rejected() {
        let mut storage = MockStorage::new();
        assert!(set_peer(&mut storage, 2, "  ").is_err());
        assert_eq!(load_peer(&storage, 2).unwrap(), None);
    }
}
