//! ECDSA over secp256k1 with RFC 6979 deterministic nonces, EIP-2 low-S
//! normalization, and recovery-id computation.
//!
//! # Security
//!
//! The private scalar only ever drives [`crate::secp256k1::scalar_mul`]'s
//! constant-time Montgomery ladder; no branch in this module inspects a
//! secret bit. [`PrivateKey`] zeroizes its scalar on drop.

use crate::bigint::U256;
use crate::error::{Error, Result};
use crate::secp256k1::{self, Point};
use zeroize::Zeroize;

/// A secp256k1 private key: a scalar in `[1, n)`.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct PrivateKey(U256);

impl PrivateKey {
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self> {
        let scalar = U256::from_be_bytes(bytes);
        if scalar.is_zero() || scalar >= secp256k1::n() {
            return Err(Error::InvalidRange);
        }
        Ok(PrivateKey(scalar))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_be_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(secp256k1::scalar_mul_base(&self.0))
    }

    fn scalar(&self) -> &U256 {
        &self.0
    }
}

/// A secp256k1 public key, always a valid affine curve point.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PublicKey(Point);

impl PublicKey {
    pub fn point(&self) -> Point {
        self.0
    }

    pub fn to_uncompressed(&self) -> Result<[u8; 64]> {
        self.0.to_uncompressed()
    }

    pub fn to_compressed(&self) -> Result<[u8; 33]> {
        self.0.to_compressed()
    }

    /// The Ethereum address derived from this key: the low 20 bytes of
    /// `keccak256(uncompressed_point)`.
    pub fn to_address(&self) -> Result<crate::address::Address> {
        let encoded = self.to_uncompressed()?;
        let hash = crate::keccak::hash(&encoded);
        crate::address::Address::from_slice(&hash[12..])
    }
}

/// A raw `(r, s)` ECDSA signature plus recovery id, Ethereum's
/// `{v, r, s}` representation without a chain-id-specific `v` encoding.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Signature {
    pub r: U256,
    pub s: U256,
    pub recovery_id: u8,
}

impl Signature {
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r.to_be_bytes());
        out[32..64].copy_from_slice(&self.s.to_be_bytes());
        out[64] = self.recovery_id;
        out
    }
}

/// RFC 6979 deterministic nonce generation using HMAC-SHA256, specialized
/// to secp256k1's 256-bit group order (`qlen == hlen`, so there is no bit
/// truncation/padding step to perform on `h1` or the candidate `k`).
fn rfc6979_nonce(private_key: &U256, hash: &[u8; 32]) -> U256 {
    let n = secp256k1::n();
    let x = private_key.to_be_bytes();
    let h1 = reduce_hash_to_scalar(hash, &n).to_be_bytes();

    let mut v = [0x01u8; 32];
    let mut k = [0x00u8; 32];

    let mut data = [0u8; 97];
    data[32] = 0x00;
    data[33..65].copy_from_slice(&x);
    data[65..97].copy_from_slice(&h1);

    data[..32].copy_from_slice(&v);
    k = crate::hmac::hmac_sha256(&k, &data[..97]);
    v = crate::hmac::hmac_sha256(&k, &v);

    data[32] = 0x01;
    data[..32].copy_from_slice(&v);
    k = crate::hmac::hmac_sha256(&k, &data[..97]);
    v = crate::hmac::hmac_sha256(&k, &v);

    loop {
        v = crate::hmac::hmac_sha256(&k, &v);
        let candidate = U256::from_be_bytes(&v);
        if !candidate.is_zero() && candidate < n {
            return candidate;
        }
        let mut next = [0u8; 33];
        next[..32].copy_from_slice(&v);
        next[32] = 0x00;
        k = crate::hmac::hmac_sha256(&k, &next[..33]);
        v = crate::hmac::hmac_sha256(&k, &v);
    }
}

/// Reduces a 32-byte hash to a scalar mod `n` (a no-op unless the raw hash,
/// interpreted as an integer, is already `>= n`).
fn reduce_hash_to_scalar(hash: &[u8; 32], n: &U256) -> U256 {
    let value = U256::from_be_bytes(hash);
    if value >= *n {
        value.wrapping_sub(n)
    } else {
        value
    }
}

/// Signs a 32-byte prehash (the caller is responsible for computing the
/// correct digest — Keccak-256 of an RLP/EIP-712/EIP-191 payload).
pub fn sign_prehash(private_key: &PrivateKey, hash: &[u8; 32]) -> Result<Signature> {
    let n = secp256k1::n();
    let z = reduce_hash_to_scalar(hash, &n);
    let d = private_key.scalar();

    let k = rfc6979_nonce(d, hash);
    let r_point = secp256k1::scalar_mul_base(&k);
    let (rx, ry) = match r_point {
        Point::Affine(x, y) => (x, y),
        Point::Infinity => return Err(Error::InvalidSignature),
    };
    let r = rx.checked_rem(&n).ok_or(Error::InvalidSignature)?;
    if r.is_zero() {
        return Err(Error::InvalidSignature);
    }

    let k_inv = k.mod_inverse(&n).ok_or(Error::InvalidSignature)?;
    let rd = r.mul_mod(d, &n);
    let zrd = z.add_mod(&rd, &n);
    let mut s = k_inv.mul_mod(&zrd, &n);
    if s.is_zero() {
        return Err(Error::InvalidSignature);
    }

    // EIP-2 low-S normalization: Ethereum rejects s > n/2 to remove
    // signature malleability.
    let half_n = n.shr(1);
    let mut recovery_id = (ry.bit(0)) as u8;
    if rx >= n {
        recovery_id |= 2;
    }
    if s > half_n {
        s = n.wrapping_sub(&s);
        recovery_id ^= 1;
    }

    Ok(Signature { r, s, recovery_id })
}

/// Recovers the signer's public key from a signature and the digest it was
/// computed over. Used to implement Ethereum's `ecrecover` precompile
/// semantics and to self-check a freshly produced signature.
pub fn recover(signature: &Signature, hash: &[u8; 32]) -> Result<PublicKey> {
    let n = secp256k1::n();
    if signature.r.is_zero() || signature.s.is_zero() || signature.s > n {
        return Err(Error::InvalidSignature);
    }
    let r_point = secp256k1::recover_point(&signature.r, signature.recovery_id)?;
    let z = reduce_hash_to_scalar(hash, &n);

    let r_inv = signature.r.mod_inverse(&n).ok_or(Error::InvalidSignature)?;
    let u1 = n.wrapping_sub(&z).checked_rem(&n).unwrap_or(U256::ZERO).mul_mod(&r_inv, &n);
    let u2 = signature.s.mul_mod(&r_inv, &n);

    let point = secp256k1::add(
        &secp256k1::scalar_mul_base(&u1),
        &secp256k1::scalar_mul(&r_point, &u2),
    );
    match point {
        Point::Affine(_, _) => Ok(PublicKey(point)),
        Point::Infinity => Err(Error::InvalidSignature),
    }
}

/// Recovers the signer and compares it against `expected` in constant time,
/// the pattern the spec calls for when checking a recovered address against
/// a caller-supplied one (e.g. verifying a `personal_sign` proof).
pub fn recovered_address_matches(
    signature: &Signature,
    hash: &[u8; 32],
    expected: &crate::address::Address,
) -> Result<bool> {
    let recovered = recover(signature, hash)?.to_address()?;
    Ok(recovered.ct_eq(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sk(byte: u8) -> PrivateKey {
        let mut bytes = [0u8; 32];
        bytes[31] = byte;
        PrivateKey::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn rejects_zero_and_out_of_range_keys() {
        assert!(PrivateKey::from_bytes(&[0u8; 32]).is_err());
        assert!(PrivateKey::from_bytes(&secp256k1::n().to_be_bytes()).is_err());
    }

    #[test]
    fn sign_then_recover_round_trips() {
        let key = sk(7);
        let hash = crate::keccak::hash(b"sign then recover");
        let sig = sign_prehash(&key, &hash).unwrap();
        let recovered = recover(&sig, &hash).unwrap();
        assert_eq!(recovered, key.public_key());
    }

    #[test]
    fn signature_is_low_s() {
        let key = sk(42);
        let hash = crate::keccak::hash(b"low s check");
        let sig = sign_prehash(&key, &hash).unwrap();
        assert!(sig.s <= secp256k1::n().shr(1));
    }

    #[test]
    fn signing_is_deterministic() {
        let key = sk(99);
        let hash = crate::keccak::hash(b"deterministic nonce");
        let sig1 = sign_prehash(&key, &hash).unwrap();
        let sig2 = sign_prehash(&key, &hash).unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn address_from_public_key_is_twenty_bytes_of_keccak() {
        let key = sk(1);
        let pk = key.public_key();
        let addr = pk.to_address().unwrap();
        let encoded = pk.to_uncompressed().unwrap();
        let hash = crate::keccak::hash(&encoded);
        assert_eq!(&addr.0[..], &hash[12..]);
    }
}
