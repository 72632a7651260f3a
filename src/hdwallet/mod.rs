//! BIP-32 hierarchical deterministic keys, BIP-39 mnemonics, and BIP-44
//! derivation paths, specialized to Ethereum's `m/44'/60'/account'/change/index`
//! convention.

mod wordlist;

use crate::bigint::U256;
use crate::error::{Error, Result};
use crate::hmac::hmac_sha512;
use crate::secp256k1;
use crate::signer::PrivateKey;
use alloc::string::String;
use alloc::vec::Vec;
use zeroize::Zeroize;
pub use wordlist::WORDLIST;

/// Marks a path component as hardened (bit 31 set), per BIP-32.
pub const HARDENED: u32 = 0x8000_0000;

/// A BIP-32 derivation path: a sequence of 32-bit components, each either
/// hardened (bit 31 set) or normal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivationPath {
    pub components: Vec<u32>,
}

const MAX_PATH_DEPTH: usize = 10;

impl DerivationPath {
    pub fn new() -> Self {
        DerivationPath { components: Vec::new() }
    }

    pub fn from_slice(components: &[u32]) -> Self {
        DerivationPath { components: components.to_vec() }
    }

    /// The standard Ethereum path `m/44'/60'/account'/change/index`.
    pub fn ethereum(account: u32, change: u32, index: u32) -> Self {
        DerivationPath {
            components: alloc::vec![
                44 | HARDENED,
                60 | HARDENED,
                account | HARDENED,
                change,
                index,
            ],
        }
    }

    /// Parses a textual path such as `m/44'/60'/0'/0/0` (`'` or `h` marks a
    /// hardened component).
    pub fn parse(path: &str) -> Result<Self> {
        let mut parts = path.split('/');
        match parts.next() {
            Some("m") | Some("M") => {}
            _ => return Err(Error::InvalidDerivation),
        }
        let mut components = Vec::new();
        for part in parts {
            if part.is_empty() {
                return Err(Error::InvalidDerivation);
            }
            let hardened = part.ends_with('\'') || part.ends_with('h') || part.ends_with('H');
            let digits = if hardened { &part[..part.len() - 1] } else { part };
            let value: u32 = digits.parse().map_err(|_| Error::InvalidDerivation)?;
            if value & HARDENED != 0 {
                return Err(Error::InvalidDerivation);
            }
            components.push(if hardened { value | HARDENED } else { value });
        }
        Ok(DerivationPath { components })
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Validates the conventional shape `44'/60'/account'/change/index`:
    /// purpose and coin type fixed to Ethereum's registered values, account
    /// hardened, change/index not hardened.
    pub fn is_valid_ethereum_path(&self) -> bool {
        if self.components.len() < 3 || self.components.len() > MAX_PATH_DEPTH {
            return false;
        }
        if self.components[0] != (44 | HARDENED) {
            return false;
        }
        if self.components[1] != (60 | HARDENED) {
            return false;
        }
        if self.components.len() >= 3 && self.components[2] & HARDENED == 0 {
            return false;
        }
        for &component in &self.components[3..] {
            if component & HARDENED != 0 {
                return false;
            }
        }
        true
    }
}

impl Default for DerivationPath {
    fn default() -> Self {
        Self::new()
    }
}

/// An extended private key: the 32-byte private scalar plus its 32-byte
/// chain code, per BIP-32.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct ExtendedPrivateKey {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl ExtendedPrivateKey {
    /// Derives the master key from a BIP-39 seed via `HMAC-SHA512("Bitcoin
    /// seed", seed)`.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let i = hmac_sha512(b"Bitcoin seed", seed);
        let (il, ir) = i.split_at(32);
        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(il);
        chain_code.copy_from_slice(ir);

        let scalar = U256::from_be_bytes(&key);
        if scalar.is_zero() || scalar >= secp256k1::n() {
            return Err(Error::InvalidDerivation);
        }
        Ok(ExtendedPrivateKey { key, chain_code })
    }

    /// Derives a single child key, hardened if `index & HARDENED != 0`.
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        let mut data = [0u8; 37];
        if index & HARDENED != 0 {
            data[1..33].copy_from_slice(&self.key);
        } else {
            let point = secp256k1::scalar_mul_base(&U256::from_be_bytes(&self.key));
            let compressed = point.to_compressed().map_err(|_| Error::InvalidDerivation)?;
            data[..33].copy_from_slice(&compressed);
        }
        data[33..].copy_from_slice(&index.to_be_bytes());

        let i = hmac_sha512(&self.chain_code, &data);
        let (il, ir) = i.split_at(32);

        let n = secp256k1::n();
        let il_scalar = U256::from_be_slice(il)?;
        if il_scalar >= n {
            return Err(Error::InvalidDerivation);
        }
        let parent_scalar = U256::from_be_bytes(&self.key);
        let child_scalar = il_scalar.add_mod(&parent_scalar, &n);
        if child_scalar.is_zero() {
            return Err(Error::InvalidDerivation);
        }

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);
        Ok(ExtendedPrivateKey { key: child_scalar.to_be_bytes(), chain_code })
    }

    /// Walks every component of `path` from this key.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let mut key = ExtendedPrivateKey { key: self.key, chain_code: self.chain_code };
        for &component in &path.components {
            key = key.derive_child(component)?;
        }
        Ok(key)
    }

    pub fn private_key(&self) -> Result<PrivateKey> {
        PrivateKey::from_bytes(&self.key)
    }
}

/// Derives the Ethereum signing key at `m/44'/60'/account'/change/index`
/// from a BIP-39 seed.
pub fn derive_ethereum_key(seed: &[u8], account: u32, change: u32, index: u32) -> Result<PrivateKey> {
    let master = ExtendedPrivateKey::from_seed(seed)?;
    let path = DerivationPath::ethereum(account, change, index);
    master.derive_path(&path)?.private_key()
}

// -- BIP-39 -----------------------------------------------------------------

/// Turns a mnemonic phrase into a 64-byte seed via PBKDF2-HMAC-SHA512,
/// 2048 iterations, salt `"mnemonic" || passphrase`.
pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> [u8; 64] {
    let mut salt = alloc::vec::Vec::with_capacity(8 + passphrase.len());
    salt.extend_from_slice(b"mnemonic");
    salt.extend_from_slice(passphrase.as_bytes());
    let seed = crate::pbkdf2::pbkdf2_hmac_sha512(mnemonic.as_bytes(), &salt, 2048, 64);
    let mut out = [0u8; 64];
    out.copy_from_slice(&seed);
    out
}

/// Looks up a word's index in the wordlist.
fn word_index(word: &str) -> Result<u16> {
    WORDLIST
        .binary_search(&word)
        .map(|i| i as u16)
        .map_err(|_| Error::InvalidMnemonic)
}

/// Validates a mnemonic's word count and checksum, per BIP-39 §"Generating
/// the mnemonic code".
pub fn validate_mnemonic(mnemonic: &str) -> Result<()> {
    mnemonic_to_entropy(mnemonic).map(|_| ())
}

/// Recovers the original entropy bytes from a mnemonic phrase, verifying
/// the trailing checksum bits.
pub fn mnemonic_to_entropy(mnemonic: &str) -> Result<Vec<u8>> {
    let words: Vec<&str> = mnemonic.split_whitespace().collect();
    if !matches!(words.len(), 12 | 15 | 18 | 21 | 24) {
        return Err(Error::InvalidMnemonic);
    }

    let mut bits = Vec::with_capacity(words.len() * 11);
    for word in &words {
        let index = word_index(word)?;
        for b in (0..11).rev() {
            bits.push((index >> b) & 1 == 1);
        }
    }

    let checksum_bits = words.len() * 11 / 33;
    let entropy_bits = bits.len() - checksum_bits;

    let mut entropy = alloc::vec![0u8; entropy_bits / 8];
    for (i, chunk) in entropy.iter_mut().enumerate() {
        let mut byte = 0u8;
        for b in 0..8 {
            byte = (byte << 1) | bits[i * 8 + b] as u8;
        }
        *chunk = byte;
    }

    let hash = crate::sha2::sha256(&entropy);
    for i in 0..checksum_bits {
        let expected = (hash[i / 8] >> (7 - i % 8)) & 1 == 1;
        if bits[entropy_bits + i] != expected {
            return Err(Error::InvalidMnemonic);
        }
    }

    Ok(entropy)
}

/// Encodes raw entropy (16/20/24/28/32 bytes) as a mnemonic phrase with its
/// checksum word(s) appended.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<String> {
    if !matches!(entropy.len(), 16 | 20 | 24 | 28 | 32) {
        return Err(Error::InvalidMnemonic);
    }
    let hash = crate::sha2::sha256(entropy);
    let checksum_bits = entropy.len() * 8 / 32;

    let mut bits = Vec::with_capacity(entropy.len() * 8 + checksum_bits);
    for &byte in entropy {
        for b in (0..8).rev() {
            bits.push((byte >> b) & 1 == 1);
        }
    }
    for i in 0..checksum_bits {
        bits.push((hash[i / 8] >> (7 - i % 8)) & 1 == 1);
    }

    let mut words = Vec::with_capacity(bits.len() / 11);
    for chunk in bits.chunks(11) {
        let mut index = 0u16;
        for &bit in chunk {
            index = (index << 1) | bit as u16;
        }
        words.push(WORDLIST[index as usize]);
    }
    Ok(words.join(" "))
}
