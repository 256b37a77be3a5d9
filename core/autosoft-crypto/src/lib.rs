//! Cryptographic primitives for Autosoft license artifacts.
//!
//! This crate provides:
//! - SHA-256 checksums rendered as lowercase hex
//! - AES-256-CBC (PKCS#7) encryption with a Base64 text envelope
//! - Fixed-length key and IV material loaded from Base64 configuration
//!
//! # Security Model
//!
//! The cipher is unauthenticated. Tamper detection is layered on top by
//! embedding a checksum in the encrypted payload and re-verifying it after
//! decryption. A wrong key or IV almost always fails at the padding check;
//! the rare survivor fails the checksum.

mod checksum;
mod cipher;
mod error;
mod key;

pub use checksum::{checksums_match, sha256_hex, DIGEST_HEX_LEN};
pub use cipher::{decrypt, decrypt_string, encrypt, encrypt_string, BLOCK_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use key::{generate_random_iv, generate_random_key, AesIv, AesKey, CipherMaterial, IV_SIZE, KEY_SIZE};
