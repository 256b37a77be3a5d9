//! Property-based tests for the crypto module.
//!
//! These tests verify properties that must always hold:
//! - Encryption is reversible with the correct key and IV
//! - Ciphertext length follows PKCS#7 block padding
//! - Checksums are stable and well-formed

use autosoft_crypto::{
    checksums_match, decrypt, encrypt, sha256_hex, AesIv, AesKey, BLOCK_SIZE, DIGEST_HEX_LEN,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn key_strategy() -> impl Strategy<Value = AesKey> {
    prop::array::uniform32(any::<u8>()).prop_map(AesKey::from_bytes)
}

fn iv_strategy() -> impl Strategy<Value = AesIv> {
    prop::array::uniform16(any::<u8>()).prop_map(AesIv::from_bytes)
}

fn plaintext_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..4096)
}

// =============================================================================
// CIPHER PROPERTIES
// =============================================================================

mod cipher_properties {
    use super::*;

    proptest! {
        /// Encryption followed by decryption returns the original plaintext
        #[test]
        fn roundtrip_preserves_data(
            plaintext in plaintext_strategy(),
            key in key_strategy(),
            iv in iv_strategy(),
        ) {
            let encrypted = encrypt(&plaintext, &key, &iv);
            let decrypted = decrypt(&encrypted, &key, &iv).unwrap();
            prop_assert_eq!(decrypted, plaintext);
        }

        /// Ciphertext is the plaintext rounded up to the next whole block
        #[test]
        fn ciphertext_is_padded_to_next_block(
            plaintext in plaintext_strategy(),
            key in key_strategy(),
            iv in iv_strategy(),
        ) {
            let raw = STANDARD.decode(encrypt(&plaintext, &key, &iv)).unwrap();
            let expected = (plaintext.len() / BLOCK_SIZE + 1) * BLOCK_SIZE;
            prop_assert_eq!(raw.len(), expected);
        }

        /// Different IVs produce different ciphertexts for the same plaintext
        #[test]
        fn different_ivs_different_ciphertexts(
            plaintext in plaintext_strategy(),
            key in key_strategy(),
            iv1 in iv_strategy(),
            iv2 in iv_strategy(),
        ) {
            prop_assume!(iv1.as_bytes() != iv2.as_bytes());
            prop_assert_ne!(encrypt(&plaintext, &key, &iv1), encrypt(&plaintext, &key, &iv2));
        }
    }
}

// =============================================================================
// CHECKSUM PROPERTIES
// =============================================================================

mod checksum_properties {
    use super::*;

    proptest! {
        /// Every digest is 64 lowercase hex characters
        #[test]
        fn digest_is_well_formed(data in plaintext_strategy()) {
            let hex = sha256_hex(&data);
            prop_assert_eq!(hex.len(), DIGEST_HEX_LEN);
            prop_assert!(hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        }

        /// A digest always matches its own upper-cased rendering
        #[test]
        fn digest_matches_itself_in_any_case(data in plaintext_strategy()) {
            let hex = sha256_hex(&data);
            prop_assert!(checksums_match(&hex, &hex.to_uppercase()));
        }

        /// Appending a byte changes the digest
        #[test]
        fn digest_changes_with_input(data in plaintext_strategy(), extra in any::<u8>()) {
            let mut longer = data.clone();
            longer.push(extra);
            prop_assert!(!checksums_match(&sha256_hex(&data), &sha256_hex(&longer)));
        }
    }
}
