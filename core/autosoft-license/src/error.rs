//! Error types for the licensing module.
//!
//! The `Display` text of every user-facing variant is part of the external
//! contract. UI code and tests compare it exactly, so it never embeds the
//! internal cause.

use autosoft_crypto::CryptoError;
use thiserror::Error;

/// Stable user-facing messages.
pub mod messages {
    pub const INVALID_LICENSE_REQUEST: &str = "Invalid license request file.";
    pub const INVALID_LICENSE_FILE: &str = "Invalid license file.";
    pub const TAMPERED_LICENSE_FILE: &str = "Invalid or tampered license file.";
    pub const DEMO_LICENSE_EXPIRED: &str = "Demo license expired.";
    pub const LICENSE_EXPIRED: &str = "License expired.";
    pub const OPERATION_FAILED: &str = "Operation failed. Contact admin.";
    pub const DUPLICATE_LICENSE: &str =
        "A license for this company and product already exists for the same period.";
    pub const IMPORT_SUCCESS: &str = "License imported successfully.";
}

/// Broad class of a failure, for callers that branch on kind rather than text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// Malformed input or configuration. Not retriable without intervention.
    Structural,
    /// Decryption failure or checksum mismatch.
    Integrity,
    /// A legitimate license state the caller must branch on (expired, wrong type).
    Business,
    /// Internal or collaborator failure.
    Operational,
}

/// Errors raised by the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected or failed the operation.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The .ARL request could not be parsed or failed validation.
    #[error("Invalid license request file.")]
    InvalidRequest,

    /// The decrypted payload passed its checksum but is not a valid license.
    #[error("Invalid license file.")]
    InvalidLicense,

    /// Decryption failed or the embedded checksum did not match.
    #[error("Invalid or tampered license file.")]
    Tampered,

    /// A demo license is past its validity window.
    #[error("Demo license expired.")]
    DemoExpired,

    /// A paid license is past its validity window.
    #[error("License expired.")]
    Expired,

    /// A license with the same company, product and period was already issued.
    #[error("A license for this company and product already exists for the same period.")]
    Duplicate,

    /// Key generation exhausted its attempts, or canonical serialization faulted.
    #[error("Operation failed. Contact admin.")]
    OperationFailed,

    /// Key or IV configuration is missing or has the wrong length.
    #[error("invalid crypto configuration: {0}")]
    Configuration(#[from] CryptoError),

    /// Configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The persistence collaborator failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl LicenseError {
    /// Returns the failure class of this error.
    #[must_use]
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::InvalidRequest | Self::Configuration(_) | Self::Config(_) => {
                FailureCategory::Structural
            }
            Self::Tampered => FailureCategory::Integrity,
            Self::InvalidLicense | Self::DemoExpired | Self::Expired | Self::Duplicate => {
                FailureCategory::Business
            }
            Self::OperationFailed | Self::Store(_) => FailureCategory::Operational,
        }
    }

    /// Returns true when the failure reports an expired license.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::DemoExpired | Self::Expired)
    }

    /// Returns true when functionality gated on this license should be hidden.
    ///
    /// Only failures that describe the license itself qualify. A paid
    /// license that expired keeps its features visible.
    #[must_use]
    pub fn hides_dependent_features(&self) -> bool {
        matches!(self, Self::DemoExpired | Self::Tampered | Self::InvalidLicense)
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
