//! Licensing for Autosoft products.
//!
//! This module handles:
//! - Turning license requests (`.ARL`) into license records
//! - Issuing encrypted license artifacts (`.ASL`)
//! - Importing artifacts with tamper detection and expiry rules
//! - Handing verified licenses to the persistence layer
//!
//! # Artifact Format
//!
//! An artifact is `base64(AES-256-CBC(canonical_json))`. The JSON carries a
//! `ChecksumSHA256` member: the SHA-256 of the same canonical JSON with that
//! member absent. Import decrypts, strips and recomputes the checksum, and
//! rejects any mismatch as tampering.
//!
//! # Design Principles
//!
//! - **Deterministic serialization**: the checksum is only as stable as the
//!   canonical JSON it covers
//! - **One tamper outcome**: bad Base64, a wrong key and a checksum mismatch
//!   all surface as the same error
//! - **Explicit collaborators**: storage and time are injected, never global

mod canonical;
mod clock;
mod config;
mod error;
mod integrity;
mod keygen;
mod pipeline;
mod record;
mod request;
mod store;
mod validation;

pub use autosoft_crypto::{AesIv, AesKey, CipherMaterial};
pub use canonical::{canonicalize, canonicalize_value, is_sentinel, EMPTY_OBJECT};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CryptoSettings, FeatureToggles, KeyGenerationSettings, LicensingConfig};
pub use error::{messages, FailureCategory, LicenseError, LicenseResult, StoreError, StoreResult};
pub use integrity::{build_with_checksum, checksum_of, verify, IntegrityReport};
pub use keygen::{
    prefix_for, LicenseKeyGenerator, DEFAULT_MAX_ATTEMPTS, FALLBACK_PREFIX, GROUP_COUNT,
    GROUP_WIDTH,
};
pub use pipeline::{IssuedLicense, LicensePipeline};
pub use record::{utc_seconds, LicenseRecord, LicenseStatus, LicenseType, CHECKSUM_FIELD};
pub use request::{LicenseRequest, RequestedLicenseType, MAX_PERIOD_MONTHS, MIN_PERIOD_MONTHS};
pub use store::{LicenseMetadata, LicenseStore, LicenseSummary, MemoryStore, User};
pub use validation::{assess, is_expired, validate_record, LicenseCheck, LicenseState};
