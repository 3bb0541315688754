//! Transfer record wire format
//!
//! The payload a station hands to the message channel. The nonce is not part
//! of the payload: the channel assigns it and reports it on delivery, and the
//! receiving station attaches it when decoding.
//!
//! # Byte Layout (version 1)
//! - Byte 0:        version (`0x01`)
//! - Bytes 1-4:     source chain id (u32, big-endian)
//! - Bytes 5-20:    amount in canonical units (u128, big-endian)
//! - then three length-prefixed UTF-8 strings (u16 big-endian length):
//!   token on the source chain, recipient on the destination chain, sender

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, StdError, StdResult, Uint128};

pub const PAYLOAD_VERSION: u8 = 1;

/// Fixed-size prefix: version + chain id + amount
const HEADER_LEN: usize = 1 + 4 + 16;

/// A transfer in transit between two stations
#[cw_serde]
pub struct TransferRecord {
    /// Token identity on the source chain
    pub token: String,
    /// Recipient on the destination chain
    pub recipient: String,
    /// Depositor on the source chain
    pub sender: String,
    /// Net amount in canonical units
    pub amount: Uint128,
    /// Chain the transfer was initiated on
    pub src_chain: u32,
    /// Channel-assigned nonce (zero until delivered)
    pub nonce: u64,
}

impl TransferRecord {
    pub fn encode(&self) -> StdResult<Binary> {
        let mut out = Vec::with_capacity(
            HEADER_LEN + 6 + self.token.len() + self.recipient.len() + self.sender.len(),
        );
        out.push(PAYLOAD_VERSION);
        out.extend_from_slice(&self.src_chain.to_be_bytes());
        out.extend_from_slice(&self.amount.u128().to_be_bytes());
        write_str(&mut out, "token", &self.token)?;
        write_str(&mut out, "recipient", &self.recipient)?;
        write_str(&mut out, "sender", &self.sender)?;
        Ok(Binary::from(out))
    }

    pub fn decode(payload: &[u8], nonce: u64) -> StdResult<Self> {
        let mut reader = Reader::new(payload);

        let version = reader.take(1)?[0];
        if version != PAYLOAD_VERSION {
            return Err(parse_err(format!("unsupported payload version {}", version)));
        }
        let src_chain = u32::from_be_bytes(reader.array::<4>()?);
        let amount = u128::from_be_bytes(reader.array::<16>()?);
        let token = reader.string("token")?;
        let recipient = reader.string("recipient")?;
        let sender = reader.string("sender")?;

        if !reader.is_empty() {
            return Err(parse_err(format!(
                "{} trailing bytes after record",
                reader.remaining()
            )));
        }

        Ok(Self {
            token,
            recipient,
            sender,
            amount: Uint128::new(amount),
            src_chain,
            nonce,
        })
    }
}

fn parse_err(msg: impl ToString) -> StdError {
    StdError::parse_err("TransferRecord", msg)
}

fn write_str(out: &mut Vec<u8>, field: &str, value: &str) -> StdResult<()> {
    if value.is_empty() {
        return Err(parse_err(format!("{} must not be empty", field)));
    }
    let len: u16 = value
        .len()
        .try_into()
        .map_err(|_| parse_err(format!("{} exceeds {} bytes", field, u16::MAX)))?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(value.as_bytes());
    Ok(())
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> StdResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(parse_err(format!(
                "truncated payload: need {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> StdResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn string(&mut self, field: &str) -> StdResult<String> {
        let len = u16::from_be_bytes(self.array::<2>()?) as usize;
        if len == 0 {
            return Err(parse_err(format!("{} must not be empty", field)));
        }
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| parse_err(format!("{} is not valid UTF-8", field)))
    }
}
