//! Business validity rules for license records.

use crate::error::{messages, LicenseError, LicenseResult};
use crate::record::{LicenseRecord, LicenseStatus, LicenseType};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Checks the structural invariants of a record.
///
/// Required text fields must be non-blank and the validity window must not
/// be inverted. The license type is already constrained by its enum.
pub fn validate_record(record: &LicenseRecord) -> LicenseResult<()> {
    let dealer_code = record.dealer_code.as_deref().unwrap_or_default();
    let required = [
        record.company_name.as_str(),
        record.product_id.as_str(),
        dealer_code,
        record.license_key.as_str(),
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(LicenseError::InvalidLicense);
    }
    if record.valid_from_utc > record.valid_to_utc {
        return Err(LicenseError::InvalidLicense);
    }
    if !writable_year(record.valid_from_utc) || !writable_year(record.valid_to_utc) {
        return Err(LicenseError::InvalidLicense);
    }
    Ok(())
}

/// The wire format only round-trips four-digit years.
fn writable_year(instant: DateTime<Utc>) -> bool {
    (0..=9999).contains(&instant.year())
}

/// A license expires strictly after its `valid_to` instant.
#[must_use]
pub fn is_expired(valid_to_utc: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    valid_to_utc < now
}

/// Temporal state of a license at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseState {
    Active,
    Expired {
        /// Demo licenses hide gated functionality once expired; paid ones only flag it.
        hide_dependent_features: bool,
    },
}

impl LicenseState {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Classifies a license as active or expired.
///
/// A stored status of [`LicenseStatus::Expired`] forces expiry regardless of
/// the dates.
#[must_use]
pub fn assess(
    license_type: LicenseType,
    valid_to_utc: DateTime<Utc>,
    status: Option<LicenseStatus>,
    now: DateTime<Utc>,
) -> LicenseState {
    if is_expired(valid_to_utc, now) || status == Some(LicenseStatus::Expired) {
        LicenseState::Expired {
            hide_dependent_features: license_type.is_demo(),
        }
    } else {
        LicenseState::Active
    }
}

/// Maps an expired state to the error the caller surfaces.
pub(crate) fn expiry_error(license_type: LicenseType) -> LicenseError {
    if license_type.is_demo() {
        LicenseError::DemoExpired
    } else {
        LicenseError::Expired
    }
}

/// Result of checking the stored license for a product and company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseCheck {
    pub valid: bool,
    /// Empty when valid, otherwise one of the fixed user-facing messages.
    pub message: String,
    pub hide_dependent_features: bool,
}

impl LicenseCheck {
    pub(crate) fn valid() -> Self {
        Self {
            valid: true,
            message: String::new(),
            hide_dependent_features: false,
        }
    }

    pub(crate) fn missing() -> Self {
        Self {
            valid: false,
            message: messages::INVALID_LICENSE_FILE.to_string(),
            hide_dependent_features: true,
        }
    }

    pub(crate) fn expired(license_type: LicenseType) -> Self {
        let message = if license_type.is_demo() {
            messages::DEMO_LICENSE_EXPIRED
        } else {
            messages::LICENSE_EXPIRED
        };
        Self {
            valid: false,
            message: message.to_string(),
            hide_dependent_features: license_type.is_demo(),
        }
    }
}
