//! EIP-191 personal message hashing: `keccak256("\x19Ethereum Signed
//! Message:\n" || len(message) || message)`.

use alloc::format;
use alloc::vec::Vec;

const PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// Builds the EIP-191-prefixed byte sequence that gets hashed and signed.
pub fn prefixed_message(message: &[u8]) -> Vec<u8> {
    let len = format!("{}", message.len());
    let mut out = Vec::with_capacity(PREFIX.len() + len.len() + message.len());
    out.extend_from_slice(PREFIX);
    out.extend_from_slice(len.as_bytes());
    out.extend_from_slice(message);
    out
}

/// The digest that gets passed to [`crate::signer::sign_prehash`] for a
/// personal-message signature.
pub fn hash(message: &[u8]) -> [u8; 32] {
    crate::keccak::hash(&prefixed_message(message))
}

/// Signs a message under EIP-191: `sign_prehash(key, hash(message))`.
pub fn sign_personal(
    key: &crate::signer::PrivateKey,
    message: &[u8],
) -> crate::error::Result<crate::signer::Signature> {
    crate::signer::sign_prehash(key, &hash(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_includes_decimal_length() {
        let framed = prefixed_message(b"hello");
        assert_eq!(framed, b"\x19Ethereum Signed Message:\n5hello");
    }

    #[test]
    fn hash_matches_keccak_of_framed_message() {
        let expected = crate::keccak::hash(b"\x19Ethereum Signed Message:\n5hello");
        assert_eq!(hash(b"hello"), expected);
    }

    #[test]
    fn empty_message_is_still_framed() {
        let framed = prefixed_message(b"");
        assert_eq!(framed, b"\x19Ethereum Signed Message:\n0");
    }

    #[test]
    fn sign_personal_recovers_to_signer_address() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x11;
        let key = crate::signer::PrivateKey::from_bytes(&bytes).unwrap();
        let sig = sign_personal(&key, b"hello").unwrap();
        let recovered = crate::signer::recover(&sig, &hash(b"hello")).unwrap();
        assert_eq!(recovered, key.public_key());
    }
}
