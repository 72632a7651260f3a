//! The four Ethereum transaction envelopes — legacy, EIP-2930, EIP-1559,
//! EIP-4844 — their canonical sighash pre-images, signing, and the
//! canonical post-signature RLP encoding.

use crate::address::{Address, Hash};
use crate::bigint::U256;
use crate::error::{Error, Result};
use crate::rlp;
use crate::signer::{self, PrivateKey, Signature};
use alloc::vec::Vec;

/// One entry of an EIP-2930 access list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessListItem {
    pub address: Address,
    pub storage_keys: Vec<Hash>,
}

pub type AccessList = Vec<AccessListItem>;

/// An unsigned transaction of one of the four envelope types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transaction {
    Legacy {
        nonce: u64,
        gas_price: U256,
        gas_limit: u64,
        to: Option<Address>,
        value: U256,
        data: Vec<u8>,
        /// `None` produces the pre-EIP-155 sighash and `v = 27 + recid`.
        chain_id: Option<u64>,
    },
    Eip2930 {
        chain_id: u64,
        nonce: u64,
        gas_price: U256,
        gas_limit: u64,
        to: Option<Address>,
        value: U256,
        data: Vec<u8>,
        access_list: AccessList,
    },
    Eip1559 {
        chain_id: u64,
        nonce: u64,
        max_priority_fee_per_gas: U256,
        max_fee_per_gas: U256,
        gas_limit: u64,
        to: Option<Address>,
        value: U256,
        data: Vec<u8>,
        access_list: AccessList,
    },
    Eip4844 {
        chain_id: u64,
        nonce: u64,
        max_priority_fee_per_gas: U256,
        max_fee_per_gas: U256,
        gas_limit: u64,
        to: Address,
        value: U256,
        data: Vec<u8>,
        access_list: AccessList,
        max_fee_per_blob_gas: U256,
        blob_versioned_hashes: Vec<Hash>,
    },
}

fn encode_to(to: &Option<Address>) -> Vec<u8> {
    match to {
        Some(addr) => rlp::encode_bytes(&addr.0),
        None => rlp::encode_bytes(&[]),
    }
}

fn encode_access_list(list: &AccessList) -> Vec<u8> {
    let items: Vec<Vec<u8>> = list
        .iter()
        .map(|item| {
            let keys: Vec<Vec<u8>> = item.storage_keys.iter().map(|h| rlp::encode_bytes(&h.0)).collect();
            rlp::encode_list_of(&[rlp::encode_bytes(&item.address.0), rlp::encode_list_of(&keys)])
        })
        .collect();
    rlp::encode_list_of(&items)
}

fn encode_blob_hashes(hashes: &[Hash]) -> Vec<u8> {
    let items: Vec<Vec<u8>> = hashes.iter().map(|h| rlp::encode_bytes(&h.0)).collect();
    rlp::encode_list_of(&items)
}

impl Transaction {
    /// The EIP-2718 type byte, or `None` for a legacy transaction (which
    /// has no type prefix on the wire).
    pub fn type_byte(&self) -> Option<u8> {
        match self {
            Transaction::Legacy { .. } => None,
            Transaction::Eip2930 { .. } => Some(0x01),
            Transaction::Eip1559 { .. } => Some(0x02),
            Transaction::Eip4844 { .. } => Some(0x03),
        }
    }

    /// The RLP pre-image fields, before the `0x<type>` prefix (if any) and
    /// before signing.
    fn unsigned_fields(&self) -> Vec<Vec<u8>> {
        match self {
            Transaction::Legacy { nonce, gas_price, gas_limit, to, value, data, chain_id } => {
                let mut fields = alloc::vec![
                    rlp::encode_u64(*nonce),
                    rlp::encode_u256(gas_price),
                    rlp::encode_u64(*gas_limit),
                    encode_to(to),
                    rlp::encode_u256(value),
                    rlp::encode_bytes(data),
                ];
                if let Some(id) = chain_id {
                    fields.push(rlp::encode_u64(*id));
                    fields.push(rlp::encode_u64(0));
                    fields.push(rlp::encode_u64(0));
                }
                fields
            }
            Transaction::Eip2930 { chain_id, nonce, gas_price, gas_limit, to, value, data, access_list } => {
                alloc::vec![
                    rlp::encode_u64(*chain_id),
                    rlp::encode_u64(*nonce),
                    rlp::encode_u256(gas_price),
                    rlp::encode_u64(*gas_limit),
                    encode_to(to),
                    rlp::encode_u256(value),
                    rlp::encode_bytes(data),
                    encode_access_list(access_list),
                ]
            }
            Transaction::Eip1559 {
                chain_id,
                nonce,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                gas_limit,
                to,
                value,
                data,
                access_list,
            } => alloc::vec![
                rlp::encode_u64(*chain_id),
                rlp::encode_u64(*nonce),
                rlp::encode_u256(max_priority_fee_per_gas),
                rlp::encode_u256(max_fee_per_gas),
                rlp::encode_u64(*gas_limit),
                encode_to(to),
                rlp::encode_u256(value),
                rlp::encode_bytes(data),
                encode_access_list(access_list),
            ],
            Transaction::Eip4844 {
                chain_id,
                nonce,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                gas_limit,
                to,
                value,
                data,
                access_list,
                max_fee_per_blob_gas,
                blob_versioned_hashes,
            } => alloc::vec![
                rlp::encode_u64(*chain_id),
                rlp::encode_u64(*nonce),
                rlp::encode_u256(max_priority_fee_per_gas),
                rlp::encode_u256(max_fee_per_gas),
                rlp::encode_u64(*gas_limit),
                rlp::encode_bytes(&to.0),
                rlp::encode_u256(value),
                rlp::encode_bytes(data),
                encode_access_list(access_list),
                rlp::encode_u256(max_fee_per_blob_gas),
                encode_blob_hashes(blob_versioned_hashes),
            ],
        }
    }

    fn pre_image(&self) -> Vec<u8> {
        let body = rlp::encode_list_of(&self.unsigned_fields());
        match self.type_byte() {
            Some(t) => {
                let mut out = alloc::vec![t];
                out.extend(body);
                out
            }
            None => body,
        }
    }

    /// The Keccak-256 digest that [`crate::signer`] signs.
    pub fn sighash(&self) -> [u8; 32] {
        crate::keccak::hash(&self.pre_image())
    }

    /// Signs this transaction, producing its final wire encoding.
    pub fn sign(&self, key: &PrivateKey) -> Result<SignedTransaction> {
        let hash = self.sighash();
        let signature = signer::sign_prehash(key, &hash)?;
        Ok(SignedTransaction { transaction: self.clone(), signature })
    }
}

/// A transaction paired with its signature, ready for RLP serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: Signature,
}

impl SignedTransaction {
    /// The `v` value for a legacy transaction: EIP-155-encoded when the
    /// transaction carries a chain id, else the bare `{27,28}` form.
    fn legacy_v(&self, chain_id: Option<u64>) -> Result<u64> {
        let recid = self.signature.recovery_id;
        match chain_id {
            Some(id) => apply_eip155(recid, id),
            None => Ok(27 + recid as u64),
        }
    }

    /// The canonical signed RLP encoding, with its EIP-2718 type prefix if
    /// applicable.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let sig = &self.signature;
        let r = rlp::encode_u256(&sig.r);
        let s = rlp::encode_u256(&sig.s);

        match &self.transaction {
            Transaction::Legacy { chain_id, .. } => {
                let mut fields = self.transaction.unsigned_fields();
                let v = self.legacy_v(*chain_id)?;
                fields.push(rlp::encode_u64(v));
                fields.push(r);
                fields.push(s);
                Ok(rlp::encode_list_of(&fields))
            }
            _ => {
                let mut fields = self.transaction.unsigned_fields();
                let y_parity = (sig.recovery_id & 1) as u64;
                fields.push(rlp::encode_u64(y_parity));
                fields.push(r);
                fields.push(s);
                let body = rlp::encode_list_of(&fields);
                let mut out = alloc::vec![self.transaction.type_byte().expect("typed variant")];
                out.extend(body);
                Ok(out)
            }
        }
    }

    /// The transaction hash: `Keccak256(signed_encoding)`.
    pub fn hash(&self) -> Result<[u8; 32]> {
        Ok(crate::keccak::hash(&self.encode()?))
    }
}

/// Derives an EIP-4844 blob versioned hash from a 48-byte KZG commitment:
/// `Keccak256(commitment)` with the first byte forced to `0x01`.
pub fn blob_versioned_hash(commitment: &[u8; 48]) -> Hash {
    let mut hash = crate::keccak::hash(commitment);
    hash[0] = 0x01;
    Hash(hash)
}

/// A versioned hash is well-formed iff its first byte is `0x01`.
pub fn is_valid_versioned_hash(hash: &Hash) -> bool {
    hash.0[0] == 0x01
}

/// EIP-155's `v` encoding: `chain_id * 2 + 35 + recovery_id`.
pub fn apply_eip155(recovery_id: u8, chain_id: u64) -> Result<u64> {
    chain_id
        .checked_mul(2)
        .and_then(|v| v.checked_add(35))
        .and_then(|v| v.checked_add(recovery_id as u64))
        .ok_or(Error::ArithmeticOverflow)
}

/// Recovers the chain id an EIP-155 `v` value was computed against.
pub fn chain_id_from_v(v: u64) -> Result<u64> {
    if v < 35 {
        return Err(Error::InvalidSignature);
    }
    Ok((v - 35) / 2)
}

/// Recovers the recovery id from an EIP-155 `v` value and its chain id.
pub fn recovery_id_from_v(v: u64, chain_id: u64) -> Result<u8> {
    let base = apply_eip155(0, chain_id)?;
    if v < base || v - base > 1 {
        return Err(Error::InvalidSignature);
    }
    Ok((v - base) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> PrivateKey {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x42;
        PrivateKey::from_bytes(&bytes).unwrap()
    }

    fn sample_legacy(chain_id: Option<u64>) -> Transaction {
        Transaction::Legacy {
            nonce: 9,
            gas_price: U256::from_u64(20_000_000_000),
            gas_limit: 21_000,
            to: Some(Address::from_hex("0x3535353535353535353535353535353535353535").unwrap()),
            value: U256::from_u64(1_000_000_000_000_000_000),
            data: Vec::new(),
            chain_id,
        }
    }

    #[test]
    fn legacy_pre_eip155_v_is_27_or_28() {
        let tx = sample_legacy(None);
        let signed = tx.sign(&key()).unwrap();
        let v = signed.legacy_v(None).unwrap();
        assert!(v == 27 || v == 28);
    }

    #[test]
    fn legacy_eip155_v_encodes_chain_id() {
        let tx = sample_legacy(Some(1));
        let signed = tx.sign(&key()).unwrap();
        let v = signed.legacy_v(Some(1)).unwrap();
        assert!(v == 37 || v == 38);
    }

    #[test]
    fn signed_transaction_recovers_to_signer_address() {
        let tx = sample_legacy(Some(1));
        let signed = tx.sign(&key()).unwrap();
        let hash = tx.sighash();
        let recovered = signer::recover(&signed.signature, &hash).unwrap();
        assert_eq!(recovered, key().public_key());
    }

    #[test]
    fn eip1559_type_byte_and_round_trip_hash() {
        let tx = Transaction::Eip1559 {
            chain_id: 1,
            nonce: 0,
            max_priority_fee_per_gas: U256::from_u64(1_000_000_000),
            max_fee_per_gas: U256::from_u64(50_000_000_000),
            gas_limit: 21_000,
            to: Some(Address::ZERO),
            value: U256::ZERO,
            data: Vec::new(),
            access_list: Vec::new(),
        };
        assert_eq!(tx.type_byte(), Some(0x02));
        let signed = tx.sign(&key()).unwrap();
        let encoded = signed.encode().unwrap();
        assert_eq!(encoded[0], 0x02);
        let hash = signed.hash().unwrap();
        assert_eq!(hash, crate::keccak::hash(&encoded));
    }

    #[test]
    fn empty_access_list_encodes_as_empty_rlp_list() {
        assert_eq!(encode_access_list(&Vec::new()), alloc::vec![0xc0]);
    }

    #[test]
    fn blob_versioned_hash_has_version_byte() {
        let commitment = [0u8; 48];
        let hash = blob_versioned_hash(&commitment);
        assert!(is_valid_versioned_hash(&hash));
        assert_eq!(hash.0[0], 0x01);
    }

    #[test]
    fn malformed_versioned_hash_is_rejected() {
        let hash = Hash([0u8; 32]);
        assert!(!is_valid_versioned_hash(&hash));
    }

    #[test]
    fn eip155_v_round_trips_recovery_id_and_chain_id() {
        assert_eq!(apply_eip155(0, 1).unwrap(), 37);
        assert_eq!(apply_eip155(1, 1).unwrap(), 38);
        assert_eq!(chain_id_from_v(147).unwrap(), 56);
        assert_eq!(recovery_id_from_v(37, 1).unwrap(), 0);
        assert_eq!(recovery_id_from_v(38, 1).unwrap(), 1);
    }
}
