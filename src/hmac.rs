//! HMAC over SHA-256 and SHA-512, used by [`crate::signer`] (RFC 6979) and
//! [`crate::hdwallet`] (BIP-32 child derivation, BIP-39 seed stretching).

use crate::sha2::{sha256, sha512};
use alloc::vec::Vec;

const SHA256_BLOCK: usize = 64;
const SHA512_BLOCK: usize = 128;

fn hmac_generic<const BLOCK: usize, const OUT: usize>(
    key: &[u8],
    data: &[u8],
    hash: impl Fn(&[u8]) -> Vec<u8>,
) -> [u8; OUT] {
    let mut key_block = [0u8; BLOCK];
    if key.len() > BLOCK {
        let hashed = hash(key);
        key_block[..hashed.len()].copy_from_slice(&hashed);
    } else {
        key_block[..key.len()].copy_from_slice(key);
    }

    let mut ipad = [0x36u8; BLOCK];
    let mut opad = [0x5cu8; BLOCK];
    for i in 0..BLOCK {
        ipad[i] ^= key_block[i];
        opad[i] ^= key_block[i];
    }

    let mut inner_input = Vec::with_capacity(BLOCK + data.len());
    inner_input.extend_from_slice(&ipad);
    inner_input.extend_from_slice(data);
    let inner = hash(&inner_input);

    let mut outer_input = Vec::with_capacity(BLOCK + inner.len());
    outer_input.extend_from_slice(&opad);
    outer_input.extend_from_slice(&inner);
    let outer = hash(&outer_input);

    let mut out = [0u8; OUT];
    out.copy_from_slice(&outer);
    out
}

/// HMAC-SHA256.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    hmac_generic::<SHA256_BLOCK, 32>(key, data, |d| sha256(d).to_vec())
}

/// HMAC-SHA512.
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    hmac_generic::<SHA512_BLOCK, 64>(key, data, |d| sha512(d).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_sha256_rfc4231_case1() {
        let key = [0x0bu8; 20];
        let data = b"Hi There";
        let mac = hmac_sha256(&key, data);
        assert_eq!(
            crate::hex::encode(&mac),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn hmac_sha512_rfc4231_case1() {
        let key = [0x0bu8; 20];
        let data = b"Hi There";
        let mac = hmac_sha512(&key, data);
        assert_eq!(
            crate::hex::encode(&mac),
            "87aa7cdea5ef619d4ff0b4241a1d6cb02379f4e2ce4ec2787ad0b30545e17cdedaa833b7d6b8a702038b274eaea3f4e4be9d914eeb61f1702e696c203a126854"
        );
    }
}
