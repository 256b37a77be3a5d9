//! Key and IV material for AES-256-CBC.
//!
//! Both values are delivered as Base64 strings from external configuration
//! and must decode to exact lengths. Nothing here truncates or pads.

use crate::error::{CryptoError, CryptoResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of the CBC initialization vector in bytes.
pub const IV_SIZE: usize = 16;

/// A 256-bit AES key with automatic zeroization on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AesKey {
    bytes: [u8; KEY_SIZE],
}

impl AesKey {
    /// Creates a key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates a key from a slice, rejecting any length other than 32.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self { bytes })
    }

    /// Decodes a key from standard Base64.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let decoded = decode_setting("aes_key", encoded)?;
        Self::from_slice(&decoded)
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Encodes the key as standard Base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.bytes)
    }
}

impl std::fmt::Debug for AesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// A 128-bit CBC initialization vector.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AesIv {
    bytes: [u8; IV_SIZE],
}

impl AesIv {
    /// Creates an IV from raw bytes.
    pub fn from_bytes(bytes: [u8; IV_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates an IV from a slice, rejecting any length other than 16.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; IV_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidIvLength {
            expected: IV_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self { bytes })
    }

    /// Decodes an IV from standard Base64.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let decoded = decode_setting("aes_iv", encoded)?;
        Self::from_slice(&decoded)
    }

    /// Returns the IV bytes.
    pub fn as_bytes(&self) -> &[u8; IV_SIZE] {
        &self.bytes
    }

    /// Encodes the IV as standard Base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.bytes)
    }
}

impl std::fmt::Debug for AesIv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesIv")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// The key/IV pair deployed with the issuing and verifying applications.
#[derive(Clone, Debug)]
pub struct CipherMaterial {
    pub key: AesKey,
    pub iv: AesIv,
}

impl CipherMaterial {
    pub fn new(key: AesKey, iv: AesIv) -> Self {
        Self { key, iv }
    }

    /// Decodes both values from Base64 configuration strings.
    ///
    /// Blank values are reported as missing rather than as a length error.
    pub fn from_base64(key: &str, iv: &str) -> CryptoResult<Self> {
        if key.trim().is_empty() {
            return Err(CryptoError::Missing("aes_key"));
        }
        if iv.trim().is_empty() {
            return Err(CryptoError::Missing("aes_iv"));
        }
        Ok(Self {
            key: AesKey::from_base64(key)?,
            iv: AesIv::from_base64(iv)?,
        })
    }

    /// Generates fresh random material (for provisioning and tests).
    pub fn random() -> Self {
        Self {
            key: generate_random_key(),
            iv: generate_random_iv(),
        }
    }
}

fn decode_setting(name: &'static str, encoded: &str) -> CryptoResult<Vec<u8>> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| CryptoError::InvalidBase64 {
            name,
            reason: e.to_string(),
        })
}

/// Generates a random AES-256 key.
pub fn generate_random_key() -> AesKey {
    let mut bytes = [0u8; KEY_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    AesKey::from_bytes(bytes)
}

/// Generates a random CBC IV.
pub fn generate_random_iv() -> AesIv {
    let mut bytes = [0u8; IV_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    AesIv::from_bytes(bytes)
}
