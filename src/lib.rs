//! Pure, dependency-free Ethereum transaction, ABI, and signing core.
//!
//! Layer order (leaves first): [`hex`], [`bigint`], [`keccak`], [`sha2`],
//! [`hmac`], [`pbkdf2`] sit at L0; [`secp256k1`] and [`rlp`] at L1;
//! [`signer`] and [`hdwallet`] at L2; [`abi`], [`transaction`], [`eip712`],
//! [`personal`] at L3. [`rpc`] describes the boundary to the external
//! JSON-RPC transport and Provider, which this crate does not implement.

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod abi;
pub mod address;
pub mod bigint;
pub mod eip712;
pub mod error;
pub mod hdwallet;
pub mod hex;
pub mod hmac;
pub mod keccak;
pub mod pbkdf2;
pub mod personal;
pub mod rlp;
pub mod rpc;
pub mod secp256k1;
pub mod sha2;
pub mod signer;
pub mod transaction;

pub use address::{Address, Hash};
pub use bigint::{I256, U256};
pub use error::{Error, Result};
