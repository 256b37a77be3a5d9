//! Shared test helpers for license tests.

#![allow(dead_code)]

use autosoft_license::{
    CipherMaterial, FixedClock, LicenseMetadata, LicensePipeline, LicenseRecord, LicenseStore,
    LicenseSummary, LicenseType, MemoryStore, StoreError, StoreResult, User,
};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Development key and IV (Base64), fixed so artifacts are reproducible.
pub const DEV_KEY: &str = "Zkfwt0M/OOZcMAb5qSLjOKKw6LeqIm9/PYtuZlRpBdw=";
pub const DEV_IV: &str = "Fvwy7WRbrjUaNmk6QGZsAg==";

pub fn dev_material() -> CipherMaterial {
    CipherMaterial::from_base64(DEV_KEY, DEV_IV).unwrap()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

/// The fixed "now" used by pipeline tests.
pub fn now() -> DateTime<Utc> {
    utc(2025, 6, 15, 12, 0, 0)
}

/// A complete, currently valid record.
pub fn sample_record(license_type: LicenseType) -> LicenseRecord {
    LicenseRecord::new(
        "RoundTripCo",
        "RT-01",
        license_type,
        utc(2025, 6, 1, 0, 0, 0),
        utc(2025, 7, 1, 0, 0, 0),
        "KEY-RT-001",
    )
    .with_dealer_code("DLR-RT")
    .with_currency_code("USD")
    .with_modules(["MODA", "MODB"])
}

pub fn pipeline_with(store: Arc<dyn LicenseStore>, now: DateTime<Utc>) -> LicensePipeline {
    LicensePipeline::new(dev_material(), store).with_clock(Arc::new(FixedClock(now)))
}

pub fn pipeline_at(now: DateTime<Utc>) -> LicensePipeline {
    pipeline_with(Arc::new(MemoryStore::new()), now)
}

/// Replaces the character at `pos` with a different Base64 alphabet character.
pub fn flip_char(text: &str, pos: usize) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    chars[pos] = match chars[pos] {
        'A' => 'B',
        _ => 'A',
    };
    chars.into_iter().collect()
}

/// A store whose key-existence check always reports a collision and counts calls.
#[derive(Default)]
pub struct CollidingStore {
    pub key_checks: AtomicUsize,
}

impl CollidingStore {
    pub fn key_checks(&self) -> usize {
        self.key_checks.load(Ordering::SeqCst)
    }
}

impl LicenseStore for CollidingStore {
    fn find_user(&self, _username: &str) -> StoreResult<Option<User>> {
        Ok(None)
    }

    fn insert_license(&self, _license: &LicenseMetadata) -> StoreResult<i64> {
        Ok(1)
    }

    fn find_active_license(
        &self,
        _product_id: &str,
        _company_name: &str,
    ) -> StoreResult<Option<LicenseSummary>> {
        Ok(None)
    }

    fn set_license_modules(&self, _license_id: i64, _module_codes: &[String]) -> StoreResult<()> {
        Ok(())
    }

    fn license_key_exists(&self, _license_key: &str) -> StoreResult<bool> {
        self.key_checks.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    fn duplicate_exists(
        &self,
        _company_name: &str,
        _product_id: &str,
        _valid_from_utc: DateTime<Utc>,
        _valid_to_utc: DateTime<Utc>,
    ) -> StoreResult<bool> {
        Ok(false)
    }
}

/// A store where every call fails.
pub struct FailingStore;

impl LicenseStore for FailingStore {
    fn find_user(&self, _username: &str) -> StoreResult<Option<User>> {
        Err(StoreError::Backend("connection refused".into()))
    }

    fn insert_license(&self, _license: &LicenseMetadata) -> StoreResult<i64> {
        Err(StoreError::Backend("connection refused".into()))
    }

    fn find_active_license(
        &self,
        _product_id: &str,
        _company_name: &str,
    ) -> StoreResult<Option<LicenseSummary>> {
        Err(StoreError::Backend("connection refused".into()))
    }

    fn set_license_modules(&self, _license_id: i64, _module_codes: &[String]) -> StoreResult<()> {
        Err(StoreError::Backend("connection refused".into()))
    }

    fn license_key_exists(&self, _license_key: &str) -> StoreResult<bool> {
        Err(StoreError::Backend("connection refused".into()))
    }

    fn duplicate_exists(
        &self,
        _company_name: &str,
        _product_id: &str,
        _valid_from_utc: DateTime<Utc>,
        _valid_to_utc: DateTime<Utc>,
    ) -> StoreResult<bool> {
        Err(StoreError::Backend("connection refused".into()))
    }
}
