//! Artifact encryption using AES-256-CBC with PKCS#7 padding.
//!
//! Ciphertext travels as a single standard-Base64 string with no line
//! breaks. The IV is not embedded; both sides hold the same configured IV.

use crate::error::{CryptoError, CryptoResult};
use crate::key::{AesIv, AesKey};
use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Encrypts `plaintext` and returns the Base64 ciphertext.
///
/// Encryption is deterministic for a fixed key and IV.
pub fn encrypt(plaintext: &[u8], key: &AesKey, iv: &AesIv) -> String {
    let ciphertext = Aes256CbcEnc::new(key.as_bytes().into(), iv.as_bytes().into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    STANDARD.encode(ciphertext)
}

/// Decrypts a Base64 ciphertext produced by [`encrypt`].
///
/// # Errors
///
/// Returns [`CryptoError::Decryption`] when the text is not Base64, is not a
/// whole number of blocks, or does not unpad under this key and IV.
pub fn decrypt(encoded: &str, key: &AesKey, iv: &AesIv) -> CryptoResult<Vec<u8>> {
    let ciphertext = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CryptoError::Decryption(format!("invalid base64: {e}")))?;

    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::Decryption(
            "ciphertext is not a whole number of blocks".to_string(),
        ));
    }

    Aes256CbcDec::new(key.as_bytes().into(), iv.as_bytes().into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| CryptoError::Decryption("bad padding (wrong key or tampered data)".to_string()))
}

/// Encrypts a UTF-8 string and returns the Base64 ciphertext.
pub fn encrypt_string(plaintext: &str, key: &AesKey, iv: &AesIv) -> String {
    encrypt(plaintext.as_bytes(), key, iv)
}

/// Decrypts a Base64 ciphertext into a UTF-8 string.
pub fn decrypt_string(encoded: &str, key: &AesKey, iv: &AesIv) -> CryptoResult<String> {
    let plaintext = decrypt(encoded, key, iv)?;
    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::Decryption(format!("invalid UTF-8: {e}")))
}
