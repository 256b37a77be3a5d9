//! Error types for the crypto layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Decryption failed (bad Base64, bad padding, wrong key or IV).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Invalid IV length.
    #[error("invalid iv length: expected {expected}, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    /// Key material is not valid Base64.
    #[error("invalid base64 for {name}: {reason}")]
    InvalidBase64 { name: &'static str, reason: String },

    /// Required key material was not supplied.
    #[error("missing key material: {0}")]
    Missing(&'static str),
}
