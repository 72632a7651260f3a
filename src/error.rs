//! Error taxonomy for the core.
//!
//! One variant per error kind in the spec's error table. Messages are kept
//! terse and do not echo back secret-dependent values (signing paths should
//! never leak *why* a scalar or signature was rejected beyond its kind).

use core::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Every fallible core operation yields one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Malformed hex input: odd length or a non-hex character.
    InvalidHex,
    /// A fixed-size decode received the wrong number of bytes.
    InvalidLength,
    /// An integer parsed outside its declared bit width, or a scalar
    /// outside `[1, n)`.
    InvalidRange,
    /// Non-canonical RLP length prefix, truncated input, or nested overrun.
    InvalidRlp,
    /// ABI offset out of range, non-zero padding where zero is required, or
    /// a mismatched type/value pair.
    InvalidAbi,
    /// `r`/`s` outside `[1, n)`, `s > n/2` in strict mode, or failed
    /// signature recovery.
    InvalidSignature,
    /// Wrong mnemonic word count, an unknown word, or a checksum failure.
    InvalidMnemonic,
    /// Hardened child requested without a secret, or the derived scalar
    /// rolled to zero/out-of-range and must be re-derived by the caller
    /// with the next index.
    InvalidDerivation,
    /// A checked arithmetic operation would wrap.
    ArithmeticOverflow,
    /// The global allocator refused a request; propagated verbatim rather
    /// than converted, since the caller's recovery strategy (if any) is
    /// allocator-specific.
    OutOfMemory,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidHex => "invalid hex",
            Error::InvalidLength => "invalid length",
            Error::InvalidRange => "value out of range",
            Error::InvalidRlp => "invalid RLP",
            Error::InvalidAbi => "invalid ABI encoding",
            Error::InvalidSignature => "invalid signature",
            Error::InvalidMnemonic => "invalid mnemonic",
            Error::InvalidDerivation => "invalid key derivation",
            Error::ArithmeticOverflow => "arithmetic overflow",
            Error::OutOfMemory => "allocator refusal",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
