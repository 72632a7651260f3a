//! Solidity Contract ABI encoding/decoding: head/tail layout for static and
//! dynamic types, function selectors, and event topics.
//!
//! Encoding follows the Solidity ABI spec: a tuple of values lays down one
//! 32-byte head slot per top-level value (a composite static type occupies
//! several consecutive slots instead), dynamic values additionally append
//! their content to a shared tail and the corresponding head slot holds the
//! tail's byte offset. The same head/tail recursion handles function
//! arguments, tuples, and array elements.

use crate::address::Address;
use crate::bigint::{I256, U256};
use crate::error::{Error, Result};
use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

/// A Solidity type descriptor, used to drive decoding (encoding is
/// self-describing through [`AbiValue`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiType {
    Uint(u16),
    Int(u16),
    Bool,
    Address,
    FixedBytes(u8),
    Bytes,
    String,
    FixedArray(Box<AbiType>, usize),
    DynamicArray(Box<AbiType>),
    Tuple(Vec<AbiType>),
}

impl AbiType {
    /// The canonical signature fragment, e.g. `uint256`, `address[]`,
    /// `(uint256,bool)`.
    pub fn canonical(&self) -> String {
        match self {
            AbiType::Uint(bits) => format!("uint{bits}"),
            AbiType::Int(bits) => format!("int{bits}"),
            AbiType::Bool => "bool".to_string(),
            AbiType::Address => "address".to_string(),
            AbiType::FixedBytes(len) => format!("bytes{len}"),
            AbiType::Bytes => "bytes".to_string(),
            AbiType::String => "string".to_string(),
            AbiType::FixedArray(elem, n) => format!("{}[{n}]", elem.canonical()),
            AbiType::DynamicArray(elem) => format!("{}[]", elem.canonical()),
            AbiType::Tuple(fields) => {
                let parts: Vec<String> = fields.iter().map(AbiType::canonical).collect();
                format!("({})", parts.join(","))
            }
        }
    }

    fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Bytes | AbiType::String | AbiType::DynamicArray(_) => true,
            AbiType::FixedArray(elem, _) => elem.is_dynamic(),
            AbiType::Tuple(fields) => fields.iter().any(AbiType::is_dynamic),
            _ => false,
        }
    }

    /// Number of 32-byte words this type occupies in a head, when static.
    /// Meaningless (and unused) for dynamic types, which occupy exactly
    /// one offset slot.
    fn head_words(&self) -> usize {
        match self {
            AbiType::FixedArray(elem, n) if !self.is_dynamic() => n * elem.head_words(),
            AbiType::Tuple(fields) if !self.is_dynamic() => {
                fields.iter().map(AbiType::head_words).sum()
            }
            _ => 1,
        }
    }
}

/// A decoded or to-be-encoded ABI value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiValue {
    Uint { bits: u16, value: U256 },
    Int { bits: u16, value: I256 },
    Bool(bool),
    Address(Address),
    FixedBytes { len: u8, bytes: [u8; 32] },
    Bytes(Vec<u8>),
    String(String),
    FixedArray(Vec<AbiValue>),
    DynamicArray(Vec<AbiValue>),
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    fn is_dynamic(&self) -> bool {
        match self {
            AbiValue::Bytes(_) | AbiValue::String(_) | AbiValue::DynamicArray(_) => true,
            AbiValue::FixedArray(elems) | AbiValue::Tuple(elems) => {
                elems.iter().any(AbiValue::is_dynamic)
            }
            _ => false,
        }
    }
}

// -- encoding ---------------------------------------------------------------

fn word(bytes: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[..bytes.len()].copy_from_slice(bytes);
    out
}

fn right_pad_32(data: &[u8]) -> Vec<u8> {
    let pad = (32 - data.len() % 32) % 32;
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.extend(core::iter::repeat(0u8).take(pad));
    out
}

fn encode_length_prefixed(data: &[u8]) -> Vec<u8> {
    let mut out = U256::from_u64(data.len() as u64).to_be_bytes().to_vec();
    out.extend(right_pad_32(data));
    out
}

/// Encodes a single value as it would appear in a tail (or as a standalone
/// top-level value): a composite value's own internal head/tail structure,
/// fully resolved.
pub fn encode_one(value: &AbiValue) -> Result<Vec<u8>> {
    match value {
        AbiValue::Uint { value, .. } => Ok(value.to_be_bytes().to_vec()),
        AbiValue::Int { value, .. } => Ok(value.to_be_bytes().to_vec()),
        AbiValue::Bool(b) => {
            let mut w = [0u8; 32];
            w[31] = *b as u8;
            Ok(w.to_vec())
        }
        AbiValue::Address(addr) => {
            let mut w = [0u8; 32];
            w[12..].copy_from_slice(&addr.0);
            Ok(w.to_vec())
        }
        AbiValue::FixedBytes { len, bytes } => Ok(word(&bytes[..*len as usize]).to_vec()),
        AbiValue::Bytes(data) => Ok(encode_length_prefixed(data)),
        AbiValue::String(s) => Ok(encode_length_prefixed(s.as_bytes())),
        AbiValue::FixedArray(elems) => encode_tuple(elems),
        AbiValue::DynamicArray(elems) => {
            let mut out = U256::from_u64(elems.len() as u64).to_be_bytes().to_vec();
            out.extend(encode_tuple(elems)?);
            Ok(out)
        }
        AbiValue::Tuple(fields) => encode_tuple(fields),
    }
}

/// The head/tail encoding of a sequence of values (function arguments,
/// tuple fields, or array elements).
pub fn encode_tuple(items: &[AbiValue]) -> Result<Vec<u8>> {
    let mut contents: Vec<Vec<u8>> = Vec::with_capacity(items.len());
    for item in items {
        contents.push(encode_one(item)?);
    }

    let head_len: usize = items
        .iter()
        .zip(&contents)
        .map(|(item, content)| if item.is_dynamic() { 32 } else { content.len() })
        .sum();

    let mut head = Vec::new();
    let mut tail = Vec::new();
    let mut running_offset = head_len;
    for (item, content) in items.iter().zip(contents) {
        if item.is_dynamic() {
            head.extend_from_slice(&U256::from_u64(running_offset as u64).to_be_bytes());
            running_offset += content.len();
            tail.extend_from_slice(&content);
        } else {
            head.extend_from_slice(&content);
        }
    }
    head.extend_from_slice(&tail);
    Ok(head)
}

/// Full calldata for a function call: `selector(sig) ‖ encode(args)`.
pub fn encode_call(name: &str, params: &[AbiType], args: &[AbiValue]) -> Result<Vec<u8>> {
    if params.len() != args.len() {
        return Err(Error::InvalidAbi);
    }
    let sig = format!(
        "{name}({})",
        params.iter().map(AbiType::canonical).collect::<Vec<_>>().join(",")
    );
    let mut out = crate::keccak::selector(&sig).to_vec();
    out.extend(encode_tuple(args)?);
    Ok(out)
}

/// A 32-byte indexed-event-topic encoding: static values encode directly,
/// dynamic values contribute the Keccak-256 of their own encoding.
pub fn encode_indexed_topic(value: &AbiValue) -> Result<[u8; 32]> {
    let encoded = encode_one(value)?;
    if value.is_dynamic() {
        Ok(crate::keccak::hash(&encoded))
    } else {
        let mut out = [0u8; 32];
        out.copy_from_slice(&encoded[..32]);
        Ok(out)
    }
}

/// `topic0` for an event: `Keccak256(canonical_event_signature)`.
pub fn event_topic0(name: &str, params: &[AbiType]) -> [u8; 32] {
    let sig = format!(
        "{name}({})",
        params.iter().map(AbiType::canonical).collect::<Vec<_>>().join(",")
    );
    crate::keccak::hash(sig.as_bytes())
}

// -- decoding -----------------------------------------------------------

fn read_usize(data: &[u8], pos: usize) -> Result<usize> {
    if data.len() < pos + 32 {
        return Err(Error::InvalidAbi);
    }
    let v = U256::from_be_bytes(&word(&data[pos..pos + 32]));
    if v.bits() > 63 {
        return Err(Error::InvalidAbi);
    }
    let be = v.to_be_bytes();
    let mut low8 = [0u8; 8];
    low8.copy_from_slice(&be[24..]);
    Ok(u64::from_be_bytes(low8) as usize)
}

fn word_at(data: &[u8], pos: usize) -> Result<[u8; 32]> {
    if data.len() < pos + 32 {
        return Err(Error::InvalidAbi);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&data[pos..pos + 32]);
    Ok(out)
}

/// Decodes a sequence of values (the inverse of [`encode_tuple`]).
pub fn decode_tuple(types: &[AbiType], data: &[u8]) -> Result<Vec<AbiValue>> {
    let mut head_pos = 0usize;
    let mut out = Vec::with_capacity(types.len());
    for ty in types {
        if ty.is_dynamic() {
            let offset = read_usize(data, head_pos)?;
            if offset > data.len() {
                return Err(Error::InvalidAbi);
            }
            out.push(decode_one(ty, &data[offset..])?);
            head_pos += 32;
        } else {
            let words = ty.head_words();
            let end = head_pos.checked_add(words * 32).ok_or(Error::InvalidAbi)?;
            if data.len() < end {
                return Err(Error::InvalidAbi);
            }
            out.push(decode_one(ty, &data[head_pos..end])?);
            head_pos = end;
        }
    }
    Ok(out)
}

fn check_zero(bytes: &[u8]) -> Result<()> {
    if bytes.iter().all(|&b| b == 0) {
        Ok(())
    } else {
        Err(Error::InvalidAbi)
    }
}

/// Decodes a single value whose own encoding begins at the start of
/// `slice` (a head sub-slice for static types, or the resolved tail region
/// for dynamic types).
fn decode_one(ty: &AbiType, slice: &[u8]) -> Result<AbiValue> {
    match ty {
        AbiType::Uint(bits) => {
            let w = word_at(slice, 0)?;
            let value = U256::from_be_bytes(&w);
            if *bits < 256 && value.bits() > *bits as u32 {
                return Err(Error::InvalidAbi);
            }
            Ok(AbiValue::Uint { bits: *bits, value })
        }
        AbiType::Int(bits) => {
            let w = word_at(slice, 0)?;
            let raw = U256::from_be_bytes(&w);
            if *bits < 256 {
                let low_mask_bits = *bits as u32;
                let low = if low_mask_bits == 0 { U256::ZERO } else { raw.bitand(&U256::MAX.shr(256 - low_mask_bits)) };
                let reconstructed = I256::sign_extend(low, low_mask_bits).0;
                if reconstructed != raw {
                    return Err(Error::InvalidAbi);
                }
            }
            Ok(AbiValue::Int { bits: *bits, value: I256(raw) })
        }
        AbiType::Bool => {
            let w = word_at(slice, 0)?;
            check_zero(&w[..31])?;
            if w[31] > 1 {
                return Err(Error::InvalidAbi);
            }
            Ok(AbiValue::Bool(w[31] == 1))
        }
        AbiType::Address => {
            let w = word_at(slice, 0)?;
            check_zero(&w[..12])?;
            Ok(AbiValue::Address(Address::from_slice(&w[12..])?))
        }
        AbiType::FixedBytes(len) => {
            let w = word_at(slice, 0)?;
            check_zero(&w[*len as usize..])?;
            Ok(AbiValue::FixedBytes { len: *len, bytes: w })
        }
        AbiType::Bytes => {
            let len = read_usize(slice, 0)?;
            let end = 32usize.checked_add(len).ok_or(Error::InvalidAbi)?;
            if slice.len() < end {
                return Err(Error::InvalidAbi);
            }
            let padded_end = 32 + ((len + 31) / 32) * 32;
            if slice.len() >= padded_end {
                check_zero(&slice[end..padded_end])?;
            }
            Ok(AbiValue::Bytes(slice[32..end].to_vec()))
        }
        AbiType::String => {
            let len = read_usize(slice, 0)?;
            let end = 32usize.checked_add(len).ok_or(Error::InvalidAbi)?;
            if slice.len() < end {
                return Err(Error::InvalidAbi);
            }
            let s = core::str::from_utf8(&slice[32..end]).map_err(|_| Error::InvalidAbi)?;
            Ok(AbiValue::String(s.to_string()))
        }
        AbiType::FixedArray(elem, n) => {
            let elems = decode_tuple(&vec![(**elem).clone(); *n], slice)?;
            Ok(AbiValue::FixedArray(elems))
        }
        AbiType::DynamicArray(elem) => {
            let len = read_usize(slice, 0)?;
            let min_tail = len.checked_mul(32).ok_or(Error::InvalidAbi)?;
            let min_len = 32usize.checked_add(min_tail).ok_or(Error::InvalidAbi)?;
            if slice.len() < min_len {
                return Err(Error::InvalidAbi);
            }
            let elems = decode_tuple(&vec![(**elem).clone(); len], &slice[32..])?;
            Ok(AbiValue::DynamicArray(elems))
        }
        AbiType::Tuple(fields) => {
            let elems = decode_tuple(fields, slice)?;
            Ok(AbiValue::Tuple(elems))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_signature_fragments() {
        assert_eq!(AbiType::Uint(256).canonical(), "uint256");
        assert_eq!(
            AbiType::DynamicArray(Box::new(AbiType::Address)).canonical(),
            "address[]"
        );
        assert_eq!(
            AbiType::Tuple(vec![AbiType::Uint(256), AbiType::Bool]).canonical(),
            "(uint256,bool)"
        );
    }

    #[test]
    fn transfer_selector_matches_known_value() {
        let params = [AbiType::Address, AbiType::Uint(256)];
        let call = encode_call(
            "transfer",
            &params,
            &[
                AbiValue::Address(Address::from_hex("0x0000000000000000000000000000000000dead").unwrap()),
                AbiValue::Uint { bits: 256, value: U256::from_u64(1000) },
            ],
        )
        .unwrap();
        assert_eq!(&call[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn transfer_event_topic0_matches_known_value() {
        let topic = event_topic0("Transfer", &[AbiType::Address, AbiType::Address, AbiType::Uint(256)]);
        assert_eq!(
            crate::hex::encode(&topic),
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn encodes_and_decodes_static_tuple() {
        let values = vec![
            AbiValue::Uint { bits: 256, value: U256::from_u64(42) },
            AbiValue::Bool(true),
        ];
        let encoded = encode_tuple(&values).unwrap();
        assert_eq!(encoded.len(), 64);
        let decoded = decode_tuple(&[AbiType::Uint(256), AbiType::Bool], &encoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn encodes_and_decodes_dynamic_bytes() {
        let values = vec![
            AbiValue::Uint { bits: 256, value: U256::from_u64(7) },
            AbiValue::Bytes(b"hello world, this exceeds one word".to_vec()),
        ];
        let encoded = encode_tuple(&values).unwrap();
        let decoded = decode_tuple(&[AbiType::Uint(256), AbiType::Bytes], &encoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn encodes_and_decodes_dynamic_array() {
        let elems = vec![
            AbiValue::Uint { bits: 256, value: U256::from_u64(1) },
            AbiValue::Uint { bits: 256, value: U256::from_u64(2) },
            AbiValue::Uint { bits: 256, value: U256::from_u64(3) },
        ];
        let values = vec![AbiValue::DynamicArray(elems.clone())];
        let encoded = encode_tuple(&values).unwrap();
        let decoded =
            decode_tuple(&[AbiType::DynamicArray(Box::new(AbiType::Uint(256)))], &encoded).unwrap();
        assert_eq!(decoded, vec![AbiValue::DynamicArray(elems)]);
    }

    #[test]
    fn encodes_and_decodes_tuple_with_mixed_static_and_dynamic_fields() {
        let inner = AbiValue::Tuple(vec![
            AbiValue::Bool(true),
            AbiValue::String("hi".to_string()),
            AbiValue::Uint { bits: 8, value: U256::from_u64(3) },
        ]);
        let values = vec![inner.clone()];
        let ty = AbiType::Tuple(vec![AbiType::Bool, AbiType::String, AbiType::Uint(8)]);
        let encoded = encode_tuple(&values).unwrap();
        let decoded = decode_tuple(&[ty], &encoded).unwrap();
        assert_eq!(decoded, vec![inner]);
    }

    #[test]
    fn rejects_non_zero_padding_on_bool() {
        let mut encoded = vec![0u8; 32];
        encoded[0] = 1;
        encoded[31] = 1;
        assert!(decode_tuple(&[AbiType::Bool], &encoded).is_err());
    }

    #[test]
    fn rejects_uint_with_value_exceeding_declared_width() {
        let mut encoded = vec![0u8; 32];
        encoded[30] = 0x01;
        assert!(decode_tuple(&[AbiType::Uint(8)], &encoded).is_err());
    }

    #[test]
    fn rejects_offset_pointing_past_the_buffer() {
        let mut encoded = vec![0u8; 32];
        encoded[31] = 0xff;
        assert!(decode_tuple(&[AbiType::Bytes], &encoded).is_err());
    }

    #[test]
    fn indexed_topic_for_dynamic_value_is_its_hash() {
        let value = AbiValue::String("transfer event data".to_string());
        let topic = encode_indexed_topic(&value).unwrap();
        let expected = crate::keccak::hash(&encode_one(&value).unwrap());
        assert_eq!(topic, expected);
    }
}
