//! Hash helpers for payload audit trails
//!
//! # Transfer Id Layout (16 bytes + payload)
//! - Bytes 0-3:   source chain id (u32, big-endian)
//! - Bytes 4-7:   destination chain id (u32, big-endian)
//! - Bytes 8-15:  channel nonce (u64, big-endian)
//! - Bytes 16-:   encoded payload

use tiny_keccak::{Hasher, Keccak};

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Identifier of a delivered message, identical on both stations' event logs
pub fn compute_transfer_id(src_chain: u32, dest_chain: u32, nonce: u64, payload: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(&src_chain.to_be_bytes());
    hasher.update(&dest_chain.to_be_bytes());
    hasher.update(&nonce.to_be_bytes());
    hasher.update(payload);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Convert bytes32 to hex string with 0x prefix
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            bytes32_to_hex(&keccak256(b"")),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_transfer_id_matches_concatenation() {
        let payload = b"payload";
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(&7u64.to_be_bytes());
        data.extend_from_slice(payload);

        assert_eq!(compute_transfer_id(1, 2, 7, payload), keccak256(&data));
    }

    #[test]
    fn test_transfer_id_depends_on_nonce() {
        assert_ne!(
            compute_transfer_id(1, 2, 7, b"x"),
            compute_transfer_id(1, 2, 8, b"x")
        );
    }
}
