//! Checksum embedding and verification for license payloads.
//!
//! The checksum is the SHA-256 of the canonical JSON of the record with the
//! `ChecksumSHA256` member absent. After the digest is injected the text is
//! canonicalized again, so the member lands in its sorted position.

use crate::canonical::{canonicalize_value, is_sentinel};
use crate::error::{LicenseError, LicenseResult};
use crate::record::{LicenseRecord, CHECKSUM_FIELD};
use autosoft_crypto::{checksums_match, sha256_hex};
use serde_json::Value;

/// Outcome of [`verify`].
///
/// `valid` covers the checksum alone. `record` is `None` when the text does
/// not deserialize into a [`LicenseRecord`], which can happen even when the
/// checksum matches (for example an unknown license type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub record: Option<LicenseRecord>,
    pub valid: bool,
}

impl IntegrityReport {
    fn invalid() -> Self {
        Self {
            record: None,
            valid: false,
        }
    }
}

/// Computes the checksum a record should carry.
pub fn checksum_of(record: &LicenseRecord) -> LicenseResult<String> {
    let tree = to_tree(record)?;
    let canonical = canonicalize_value(&tree);
    if is_sentinel(&canonical) {
        return Err(LicenseError::OperationFailed);
    }
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Produces canonical JSON of `record` with its checksum member populated.
///
/// Any checksum already present on `record` is ignored.
///
/// # Errors
///
/// Returns [`LicenseError::OperationFailed`] if canonical serialization faults.
pub fn build_with_checksum(record: &LicenseRecord) -> LicenseResult<String> {
    let mut tree = to_tree(record)?;
    let canonical = canonicalize_value(&tree);
    if is_sentinel(&canonical) {
        return Err(LicenseError::OperationFailed);
    }
    let digest = sha256_hex(canonical.as_bytes());

    let Value::Object(members) = &mut tree else {
        return Err(LicenseError::OperationFailed);
    };
    members.insert(CHECKSUM_FIELD.to_string(), Value::String(digest));

    Ok(canonicalize_value(&tree))
}

/// Parses `text`, strips and recomputes its checksum, and compares.
///
/// Parse failures, a missing or non-string checksum member, and mismatches
/// all report `valid == false`.
#[must_use]
pub fn verify(text: &str) -> IntegrityReport {
    let Ok(mut tree) = serde_json::from_str::<Value>(text) else {
        return IntegrityReport::invalid();
    };
    let Some(members) = tree.as_object_mut() else {
        return IntegrityReport::invalid();
    };
    let embedded = match members.remove(CHECKSUM_FIELD) {
        Some(Value::String(checksum)) => checksum,
        _ => return IntegrityReport::invalid(),
    };

    let canonical = canonicalize_value(&tree);
    if is_sentinel(&canonical) {
        return IntegrityReport::invalid();
    }
    let valid = checksums_match(&sha256_hex(canonical.as_bytes()), &embedded);

    let record = serde_json::from_value::<LicenseRecord>(tree)
        .ok()
        .map(|mut record| {
            record.checksum_sha256 = Some(embedded);
            record
        });

    IntegrityReport { record, valid }
}

fn to_tree(record: &LicenseRecord) -> LicenseResult<Value> {
    let tree = serde_json::to_value(record.without_checksum())
        .map_err(|_| LicenseError::OperationFailed)?;
    if !tree.is_object() {
        return Err(LicenseError::OperationFailed);
    }
    Ok(tree)
}
