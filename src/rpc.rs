//! Value-type marshalling for the standard Ethereum JSON-RPC wire format,
//! and the narrow transport boundary the core depends on but never
//! implements.
//!
//! The core does not speak HTTP or WebSocket and does not parse JSON; a
//! host program's Provider owns that layer and uses these helpers to get
//! quantities and byte strings into and out of the shapes `eth_*` methods
//! expect.

use crate::error::{Error, Result};
use alloc::string::String;
use alloc::vec::Vec;

/// Encodes an integer as a JSON-RPC "quantity": minimal-nibble hex with a
/// `0x` prefix, no leading zeros, and `"0x0"` for zero.
pub fn encode_quantity(value: u64) -> String {
    if value == 0 {
        return String::from("0x0");
    }
    alloc::format!("0x{value:x}")
}

/// Decodes a JSON-RPC quantity string back into a `u64`.
pub fn decode_quantity(s: &str) -> Result<u64> {
    let stripped = s.strip_prefix("0x").ok_or(Error::InvalidHex)?;
    if stripped.is_empty() || (stripped.len() > 1 && stripped.starts_with('0')) {
        return Err(Error::InvalidHex);
    }
    u64::from_str_radix(stripped, 16).map_err(|_| Error::InvalidHex)
}

/// Encodes a byte string as even-length hex with a `0x` prefix (`"0x"` for
/// an empty string).
pub fn encode_bytes(data: &[u8]) -> String {
    crate::hex::encode_prefixed(data)
}

/// Decodes a JSON-RPC byte-string field.
pub fn decode_bytes(s: &str) -> Result<Vec<u8>> {
    crate::hex::decode(s)
}

/// Block identifiers accepted alongside an explicit block number/hash in
/// `eth_*` calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Earliest,
    Pending,
    Safe,
    Finalized,
}

impl BlockTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockTag::Latest => "latest",
            BlockTag::Earliest => "earliest",
            BlockTag::Pending => "pending",
            BlockTag::Safe => "safe",
            BlockTag::Finalized => "finalized",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "latest" => Ok(BlockTag::Latest),
            "earliest" => Ok(BlockTag::Earliest),
            "pending" => Ok(BlockTag::Pending),
            "safe" => Ok(BlockTag::Safe),
            "finalized" => Ok(BlockTag::Finalized),
            _ => Err(Error::InvalidRange),
        }
    }
}

/// A contract event log entry, decoded from an `eth_getLogs` response.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Log {
    pub address: crate::address::Address,
    pub topics: Vec<crate::address::Hash>,
    pub data: Vec<u8>,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<crate::address::Hash>,
    pub log_index: Option<u64>,
    pub removed: bool,
}

/// A transaction receipt, decoded from `eth_getTransactionReceipt`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionReceipt {
    pub transaction_hash: crate::address::Hash,
    pub block_number: u64,
    pub gas_used: u64,
    pub status: bool,
    pub logs: Vec<Log>,
    pub contract_address: Option<crate::address::Address>,
}

/// The only two points of contact between the core and the outside world.
/// A host program implements this over whatever HTTP/WebSocket transport
/// it prefers; the core never calls out on its own.
pub trait Provider {
    type Error;

    /// `eth_call` equivalent: executes `calldata` against `to` and returns
    /// the raw return data.
    fn call(&self, to: crate::address::Address, calldata: &[u8]) -> core::result::Result<Vec<u8>, Self::Error>;

    /// `eth_sendRawTransaction` equivalent: broadcasts a signed transaction
    /// and returns its hash.
    fn send_raw(&self, signed_tx: &[u8]) -> core::result::Result<crate::address::Hash, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_zero_is_0x0() {
        assert_eq!(encode_quantity(0), "0x0");
        assert_eq!(decode_quantity("0x0").unwrap(), 0);
    }

    #[test]
    fn quantity_round_trips() {
        assert_eq!(encode_quantity(255), "0xff");
        assert_eq!(decode_quantity("0xff").unwrap(), 255);
        assert_eq!(encode_quantity(1), "0x1");
    }

    #[test]
    fn quantity_rejects_leading_zero() {
        assert!(decode_quantity("0x0f").is_err());
    }

    #[test]
    fn bytes_empty_is_bare_prefix() {
        assert_eq!(encode_bytes(&[]), "0x");
        assert_eq!(decode_bytes("0x").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn bytes_round_trip() {
        let data = [0xde, 0xad, 0xbe, 0xef];
        let encoded = encode_bytes(&data);
        assert_eq!(encoded, "0xdeadbeef");
        assert_eq!(decode_bytes(&encoded).unwrap(), data);
    }

    #[test]
    fn block_tag_parses_all_five_values() {
        for (tag, s) in [
            (BlockTag::Latest, "latest"),
            (BlockTag::Earliest, "earliest"),
            (BlockTag::Pending, "pending"),
            (BlockTag::Safe, "safe"),
            (BlockTag::Finalized, "finalized"),
        ] {
            assert_eq!(BlockTag::parse(s).unwrap(), tag);
            assert_eq!(tag.as_str(), s);
        }
    }

    #[test]
    fn block_tag_rejects_unknown_string() {
        assert!(BlockTag::parse("confirmed").is_err());
    }
}
