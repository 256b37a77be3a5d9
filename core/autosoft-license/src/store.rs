//! Persistence collaborator for activated licenses.
//!
//! The pipeline only talks to storage through [`LicenseStore`]. Relational
//! backends live outside this crate; [`MemoryStore`] backs tests and the
//! command-line tool.

use crate::error::{StoreError, StoreResult};
use crate::record::{LicenseRecord, LicenseStatus, LicenseType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// An operator account that can import licenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
}

/// A license row as persisted after activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseMetadata {
    pub id: i64,
    pub company_name: String,
    pub product_id: String,
    pub dealer_code: Option<String>,
    pub license_key: String,
    pub license_type: LicenseType,
    pub valid_from_utc: DateTime<Utc>,
    pub valid_to_utc: DateTime<Utc>,
    pub currency_code: Option<String>,
    pub status: LicenseStatus,
    pub imported_on_utc: DateTime<Utc>,
    pub imported_by_user_id: Option<i64>,
    pub raw_asl_base64: Option<String>,
    pub module_codes: Vec<String>,
}

impl LicenseMetadata {
    /// Builds an unsaved row (`id == 0`) from a verified record.
    pub fn from_record(
        record: &LicenseRecord,
        status: LicenseStatus,
        imported_on_utc: DateTime<Utc>,
        imported_by_user_id: Option<i64>,
    ) -> Self {
        Self {
            id: 0,
            company_name: record.company_name.clone(),
            product_id: record.product_id.clone(),
            dealer_code: record.dealer_code.clone(),
            license_key: record.license_key.clone(),
            license_type: record.license_type,
            valid_from_utc: record.valid_from_utc,
            valid_to_utc: record.valid_to_utc,
            currency_code: record.currency_code.clone(),
            status,
            imported_on_utc,
            imported_by_user_id,
            raw_asl_base64: None,
            module_codes: record.module_codes.clone(),
        }
    }

    /// Returns the summary used for startup validity checks.
    #[must_use]
    pub fn summary(&self) -> LicenseSummary {
        LicenseSummary {
            license_type: self.license_type,
            valid_from_utc: self.valid_from_utc,
            valid_to_utc: self.valid_to_utc,
            status: self.status,
        }
    }
}

/// The latest license on file for a (product, company) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseSummary {
    pub license_type: LicenseType,
    pub valid_from_utc: DateTime<Utc>,
    pub valid_to_utc: DateTime<Utc>,
    pub status: LicenseStatus,
}

/// Storage operations the pipeline depends on.
///
/// Implementations must be thread-safe; the pipeline does not serialize calls.
pub trait LicenseStore: Send + Sync {
    /// Looks up an operator by username.
    fn find_user(&self, username: &str) -> StoreResult<Option<User>>;

    /// Inserts an activated license and returns its new id.
    fn insert_license(&self, license: &LicenseMetadata) -> StoreResult<i64>;

    /// Returns the most recently imported license for a product and company.
    fn find_active_license(
        &self,
        product_id: &str,
        company_name: &str,
    ) -> StoreResult<Option<LicenseSummary>>;

    /// Replaces the module codes enabled for a license.
    fn set_license_modules(&self, license_id: i64, module_codes: &[String]) -> StoreResult<()>;

    /// Returns true if a license key has already been issued.
    fn license_key_exists(&self, license_key: &str) -> StoreResult<bool>;

    /// Returns true if a license with the same company, product and period exists.
    fn duplicate_exists(
        &self,
        company_name: &str,
        product_id: &str,
        valid_from_utc: DateTime<Utc>,
        valid_to_utc: DateTime<Utc>,
    ) -> StoreResult<bool>;
}

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    licenses: Vec<LicenseMetadata>,
    issued_keys: Vec<String>,
}

/// In-memory [`LicenseStore`].
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an operator account.
    pub fn add_user(&self, username: &str, display_name: &str) -> StoreResult<User> {
        let mut state = self.lock()?;
        let user = User {
            id: state.users.len() as i64 + 1,
            username: username.to_string(),
            display_name: display_name.to_string(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    /// Records a key as issued without activating a license for it.
    pub fn reserve_key(&self, license_key: &str) -> StoreResult<()> {
        self.lock()?.issued_keys.push(license_key.to_string());
        Ok(())
    }

    /// Returns a snapshot of all stored licenses.
    pub fn licenses(&self) -> StoreResult<Vec<LicenseMetadata>> {
        Ok(self.lock()?.licenses.clone())
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

impl LicenseStore for MemoryStore {
    fn find_user(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.lock()?;
        Ok(state
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    fn insert_license(&self, license: &LicenseMetadata) -> StoreResult<i64> {
        let mut state = self.lock()?;
        let id = state.licenses.len() as i64 + 1;
        let mut row = license.clone();
        row.id = id;
        state.issued_keys.push(row.license_key.clone());
        state.licenses.push(row);
        Ok(id)
    }

    fn find_active_license(
        &self,
        product_id: &str,
        company_name: &str,
    ) -> StoreResult<Option<LicenseSummary>> {
        let state = self.lock()?;
        Ok(state
            .licenses
            .iter()
            .filter(|l| l.product_id == product_id && l.company_name == company_name)
            .max_by_key(|l| (l.imported_on_utc, l.id))
            .map(LicenseMetadata::summary))
    }

    fn set_license_modules(&self, license_id: i64, module_codes: &[String]) -> StoreResult<()> {
        let mut state = self.lock()?;
        let row = state
            .licenses
            .iter_mut()
            .find(|l| l.id == license_id)
            .ok_or_else(|| StoreError::NotFound(format!("license {license_id}")))?;
        row.module_codes = module_codes.to_vec();
        Ok(())
    }

    fn license_key_exists(&self, license_key: &str) -> StoreResult<bool> {
        Ok(self.lock()?.issued_keys.iter().any(|k| k == license_key))
    }

    fn duplicate_exists(
        &self,
        company_name: &str,
        product_id: &str,
        valid_from_utc: DateTime<Utc>,
        valid_to_utc: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let state = self.lock()?;
        Ok(state.licenses.iter().any(|l| {
            l.company_name == company_name
                && l.product_id == product_id
                && l.valid_from_utc == valid_from_utc
                && l.valid_to_utc == valid_to_utc
        }))
    }
}
