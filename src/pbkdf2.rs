//! PBKDF2-HMAC-SHA512, used by BIP-39 (`"mnemonic" || passphrase` salt,
//! 2048 iterations, 64-byte output) to turn a mnemonic into a seed.

use crate::hmac::hmac_sha512;
use alloc::vec::Vec;

/// Derives `dklen` bytes from `password`/`salt` using PBKDF2-HMAC-SHA512.
pub fn pbkdf2_hmac_sha512(password: &[u8], salt: &[u8], iterations: u32, dklen: usize) -> Vec<u8> {
    let hlen = 64usize;
    let blocks_needed = (dklen + hlen - 1) / hlen;
    let mut out = Vec::with_capacity(blocks_needed * hlen);

    for block_index in 1..=blocks_needed as u32 {
        let mut salt_block = Vec::with_capacity(salt.len() + 4);
        salt_block.extend_from_slice(salt);
        salt_block.extend_from_slice(&block_index.to_be_bytes());

        let mut u = hmac_sha512(password, &salt_block);
        let mut t = u;
        for _ in 1..iterations {
            u = hmac_sha512(password, &u);
            for i in 0..hlen {
                t[i] ^= u[i];
            }
        }
        out.extend_from_slice(&t);
    }
    out.truncate(dklen);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bip39_canonical_vector() {
        let mnemonic =
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let salt = b"mnemonic";
        let seed = pbkdf2_hmac_sha512(mnemonic.as_bytes(), salt, 2048, 64);
        assert_eq!(crate::hex::encode(&seed[..8]), "5eb00bbddcf06908");
    }
}
