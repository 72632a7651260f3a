//! `Address` (20 bytes) and `Hash` (32 bytes) value types, plus EIP-55
//! checksummed textual form.

use crate::error::{Error, Result};
use crate::keccak;
use alloc::string::String;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// A 20-byte Ethereum address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Zeroize)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 20 {
            return Err(Error::InvalidLength);
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(bytes);
        Ok(Address(out))
    }

    /// Lowercase hex with `0x` prefix.
    pub fn to_lower_hex(&self) -> String {
        crate::hex::encode_prefixed(&self.0)
    }

    /// EIP-55 checksummed textual form: hash the lowercase hex digits and
    /// uppercase each alphabetic character whose corresponding nibble
    /// exceeds 7.
    pub fn to_checksum(&self) -> String {
        let lower = crate::hex::encode(&self.0);
        let digest = keccak::hash(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push('0');
        out.push('x');
        for (i, c) in lower.bytes().enumerate() {
            let hash_byte = digest[i / 2];
            let nibble = if i % 2 == 0 {
                hash_byte >> 4
            } else {
                hash_byte & 0x0f
            };
            let upper = c.is_ascii_alphabetic() && nibble >= 8;
            out.push(if upper {
                (c as char).to_ascii_uppercase()
            } else {
                c as char
            });
        }
        out
    }

    /// Parses either the lowercase or EIP-55 checksummed form. Does not
    /// itself validate the checksum (use [`Address::from_checksum`] for
    /// that).
    pub fn from_hex(s: &str) -> Result<Self> {
        Self::from_slice(&crate::hex::decode(s)?)
    }

    /// Parses a checksummed string, verifying the checksum matches.
    pub fn from_checksum(s: &str) -> Result<Self> {
        let addr = Self::from_hex(s)?;
        if addr.to_checksum() != s {
            return Err(Error::InvalidRange);
        }
        Ok(addr)
    }

    /// Constant-time equality, for comparing a recovered address against an
    /// expected one without leaking the position of a mismatched byte.
    pub fn ct_eq(&self, other: &Address) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl core::fmt::Debug for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 32-byte hash (transaction hash, block hash, storage slot, namehash,
/// or a raw Keccak digest).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    pub const ZERO: Hash = Hash([0u8; 32]);

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(Error::InvalidLength);
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(bytes);
        Ok(Hash(out))
    }

    pub fn to_hex(&self) -> String {
        crate::hex::encode_prefixed(&self.0)
    }

    /// Constant-time equality.
    pub fn ct_eq(&self, other: &Hash) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl core::fmt::Debug for Hash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Hash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Hash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        let bytes = crate::hex::decode(&s).map_err(serde::de::Error::custom)?;
        Hash::from_slice(&bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eip55_checksum() {
        let addr = Address::from_hex("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap();
        assert_eq!(addr.to_checksum(), "0xFb6916095ca1df60bB79Ce92cE3Ea74c37c5d359");
    }

    #[test]
    fn checksum_roundtrip() {
        let s = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        let addr = Address::from_checksum(s).unwrap();
        assert_eq!(addr.to_checksum(), s);
    }

    #[test]
    fn rejects_bad_checksum() {
        assert!(Address::from_checksum("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").is_err());
    }

    #[test]
    fn ct_eq_matches_equality() {
        let a = Address::from_hex("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap();
        let b = a;
        let c = Address::ZERO;
        assert!(a.ct_eq(&b));
        assert!(!a.ct_eq(&c));
    }
}
