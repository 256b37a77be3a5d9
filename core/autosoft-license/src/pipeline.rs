//! Issuing, importing and activating license artifacts.
//!
//! Generation: validate → canonical JSON with checksum → AES → Base64.
//! Import: Base64 → AES → checksum re-verification → business rules.
//!
//! Every call is independent; the pipeline holds no mutable state and may
//! be shared across threads. Collaborators are injected at construction.

use crate::canonical::canonicalize;
use crate::clock::{Clock, SystemClock};
use crate::config::LicensingConfig;
use crate::error::{LicenseError, LicenseResult};
use crate::integrity::{build_with_checksum, checksum_of, verify};
use crate::keygen::LicenseKeyGenerator;
use crate::record::{LicenseRecord, LicenseStatus};
use crate::request::LicenseRequest;
use crate::store::{LicenseMetadata, LicenseStore};
use crate::validation::{assess, expiry_error, is_expired, validate_record, LicenseCheck, LicenseState};
use autosoft_crypto::{decrypt_string, encrypt_string, CipherMaterial};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A freshly issued license and its encrypted artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedLicense {
    /// The record as encrypted, with its checksum populated.
    pub record: LicenseRecord,
    /// Base64 `.ASL` text.
    pub artifact: String,
}

/// Orchestrates license generation, import and activation.
pub struct LicensePipeline {
    material: CipherMaterial,
    store: Arc<dyn LicenseStore>,
    key_generator: LicenseKeyGenerator,
    clock: Arc<dyn Clock>,
    store_raw_files: bool,
}

impl LicensePipeline {
    /// Creates a pipeline using the system clock and a default key generator
    /// that checks `store` for already-issued keys.
    pub fn new(material: CipherMaterial, store: Arc<dyn LicenseStore>) -> Self {
        Self {
            material,
            key_generator: LicenseKeyGenerator::default().with_store(Arc::clone(&store)),
            store,
            clock: Arc::new(SystemClock),
            store_raw_files: true,
        }
    }

    /// Creates a pipeline from loaded configuration.
    ///
    /// # Errors
    ///
    /// Fails with [`LicenseError::Configuration`] when the key or IV is
    /// missing or has the wrong length.
    pub fn from_config(config: &LicensingConfig, store: Arc<dyn LicenseStore>) -> LicenseResult<Self> {
        let material = config.crypto.material()?;
        let key_generator = LicenseKeyGenerator::new(config.key_generation.max_attempts)
            .with_store(Arc::clone(&store));
        Ok(Self::new(material, store)
            .with_key_generator(key_generator)
            .with_store_raw_files(config.feature_toggles.store_raw_files))
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_key_generator(mut self, key_generator: LicenseKeyGenerator) -> Self {
        self.key_generator = key_generator;
        self
    }

    #[must_use]
    pub fn with_store_raw_files(mut self, enabled: bool) -> Self {
        self.store_raw_files = enabled;
        self
    }

    #[must_use]
    pub fn key_generator(&self) -> &LicenseKeyGenerator {
        &self.key_generator
    }

    /// Validates `record` and encrypts it into a Base64 artifact.
    ///
    /// Any checksum already on the record is replaced. The record is
    /// validated as given, before timestamps are truncated to seconds.
    pub fn generate_artifact(&self, record: &LicenseRecord) -> LicenseResult<String> {
        validate_record(record)?;
        let mut record = record.without_checksum();
        record.normalize();

        let payload = build_with_checksum(&record)?;
        debug!(
            product = %record.product_id,
            license_type = %record.license_type,
            "built license payload"
        );
        Ok(encrypt_string(&payload, &self.material.key, &self.material.iv))
    }

    /// Issues a license for a parsed `.ARL` request.
    ///
    /// Rejects requests that duplicate an existing license period, and fills
    /// a blank license key from the key generator.
    pub fn issue_from_request<I, S>(
        &self,
        request: &LicenseRequest,
        valid_from_utc: DateTime<Utc>,
        module_codes: I,
    ) -> LicenseResult<IssuedLicense>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut record = request.to_record(valid_from_utc, module_codes)?;
        record.normalize();

        if self.store.duplicate_exists(
            &record.company_name,
            &record.product_id,
            record.valid_from_utc,
            record.valid_to_utc,
        )? {
            return Err(LicenseError::Duplicate);
        }

        if record.license_key.is_empty() {
            record.license_key = self
                .key_generator
                .generate(&record.company_name, &record.product_id, None)?;
        }

        let artifact = self.generate_artifact(&record)?;
        record.checksum_sha256 = Some(checksum_of(&record)?);
        info!(
            product = %record.product_id,
            license_type = %record.license_type,
            valid_to = %record.valid_to_utc,
            "issued license"
        );
        Ok(IssuedLicense { record, artifact })
    }

    /// Decrypts and verifies an artifact, then applies business rules.
    ///
    /// # Errors
    ///
    /// - [`LicenseError::Tampered`] for any decryption or checksum failure.
    ///   Bad Base64, a wrong key and a modified payload are indistinguishable.
    /// - [`LicenseError::InvalidLicense`] when the verified payload is not a
    ///   valid record.
    /// - [`LicenseError::DemoExpired`] / [`LicenseError::Expired`] past `valid_to`.
    pub fn import_artifact(&self, artifact: &str) -> LicenseResult<LicenseRecord> {
        let payload = decrypt_string(artifact, &self.material.key, &self.material.iv)
            .map_err(|_| LicenseError::Tampered)?;

        let report = verify(&payload);
        if !report.valid {
            return Err(LicenseError::Tampered);
        }
        let record = report.record.ok_or(LicenseError::InvalidLicense)?;
        validate_record(&record)?;

        match assess(
            record.license_type,
            record.valid_to_utc,
            None,
            self.clock.now_utc(),
        ) {
            LicenseState::Active => Ok(record),
            LicenseState::Expired { .. } => Err(expiry_error(record.license_type)),
        }
    }

    /// Persists a verified record.
    ///
    /// `actor` is resolved to a user id when it names a known user. The raw
    /// artifact is kept only when raw-file storage is enabled. Uniqueness of
    /// (product, company) is left to the store.
    pub fn activate(
        &self,
        record: &LicenseRecord,
        actor: Option<&str>,
        raw_artifact: Option<&str>,
    ) -> LicenseResult<LicenseMetadata> {
        let imported_by = match actor {
            Some(username) => {
                let user = self.store.find_user(username)?;
                if user.is_none() {
                    warn!(username, "activating user not found, recording no importer");
                }
                user.map(|u| u.id)
            }
            None => None,
        };

        let now = self.clock.now_utc();
        let status = if is_expired(record.valid_to_utc, now) {
            LicenseStatus::Expired
        } else {
            LicenseStatus::Valid
        };

        let mut license = LicenseMetadata::from_record(record, status, now, imported_by);
        if self.store_raw_files {
            license.raw_asl_base64 = raw_artifact.map(str::to_string);
        }

        let id = self.store.insert_license(&license)?;
        self.store.set_license_modules(id, &license.module_codes)?;
        license.id = id;

        info!(
            id,
            product = %license.product_id,
            status = license.status.as_str(),
            "activated license"
        );
        Ok(license)
    }

    /// Imports an artifact and activates it in one step.
    pub fn import_and_activate(
        &self,
        artifact: &str,
        actor: Option<&str>,
    ) -> LicenseResult<LicenseMetadata> {
        let record = self.import_artifact(artifact)?;
        self.activate(&record, actor, Some(artifact))
    }

    /// Checks the latest stored license for a product and company.
    pub fn check_license(&self, product_id: &str, company_name: &str) -> LicenseResult<LicenseCheck> {
        let Some(summary) = self.store.find_active_license(product_id, company_name)? else {
            return Ok(LicenseCheck::missing());
        };

        let state = assess(
            summary.license_type,
            summary.valid_to_utc,
            Some(summary.status),
            self.clock.now_utc(),
        );
        Ok(match state {
            LicenseState::Active => LicenseCheck::valid(),
            LicenseState::Expired { .. } => LicenseCheck::expired(summary.license_type),
        })
    }

    /// Canonical JSON of a record with its checksum stripped, for display.
    #[must_use]
    pub fn preview_json(&self, record: &LicenseRecord) -> String {
        canonicalize(&record.without_checksum())
    }
}
