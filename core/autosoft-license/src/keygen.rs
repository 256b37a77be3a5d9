//! Human-readable license key generation.
//!
//! Keys look like `PROD-1A2B-3C4D-5E6F-7A8B-9C0D`: a prefix of up to four
//! uppercase alphanumerics taken from the product id (or `GEN`), followed by
//! five groups of four uppercase hex characters. The groups are the first
//! 80 bits of `SHA-256(company|product|entropy|attempt)`.
//!
//! With a seed the entropy is the seed itself, so the same seed always
//! yields the same key. Without one it is a random v4 UUID plus the current
//! time.

use crate::error::{LicenseError, LicenseResult};
use crate::store::LicenseStore;
use autosoft_crypto::sha256_hex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default number of attempts before giving up on a unique key.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Number of hex groups after the prefix.
pub const GROUP_COUNT: usize = 5;

/// Characters per hex group.
pub const GROUP_WIDTH: usize = 4;

/// Prefix used when the product id has no usable characters.
pub const FALLBACK_PREFIX: &str = "GEN";

const PREFIX_MAX_LEN: usize = 4;
const DELIMITER: char = '-';

/// Generates license keys, retrying on collision with already-issued keys.
#[derive(Clone)]
pub struct LicenseKeyGenerator {
    store: Option<Arc<dyn LicenseStore>>,
    max_attempts: u32,
}

impl Default for LicenseKeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl std::fmt::Debug for LicenseKeyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseKeyGenerator")
            .field("has_store", &self.store.is_some())
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl LicenseKeyGenerator {
    /// Creates a generator with no duplicate check. `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            store: None,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Consults `store` for already-issued keys before returning one.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn LicenseStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Generates a key for `company_name` and `product_id`.
    ///
    /// # Errors
    ///
    /// - [`LicenseError::OperationFailed`] if every attempt collided.
    /// - [`LicenseError::Store`] if the duplicate check itself fails.
    pub fn generate(
        &self,
        company_name: &str,
        product_id: &str,
        seed: Option<u64>,
    ) -> LicenseResult<String> {
        for attempt in 0..self.max_attempts {
            let entropy = match seed {
                Some(seed) => format!("seed:{seed}"),
                None => random_entropy(),
            };
            let key = format_key(
                product_id,
                &format!("{company_name}|{product_id}|{entropy}|{attempt}"),
            );

            let Some(store) = &self.store else {
                return Ok(key);
            };
            if !store.license_key_exists(&key)? {
                return Ok(key);
            }
            debug!(attempt, "generated license key already exists, retrying");
        }

        warn!(
            attempts = self.max_attempts,
            "could not generate a unique license key"
        );
        Err(LicenseError::OperationFailed)
    }
}

fn random_entropy() -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}|{nanos}", uuid::Uuid::new_v4().simple())
}

fn format_key(product_id: &str, raw: &str) -> String {
    let hex = sha256_hex(raw.as_bytes()).to_ascii_uppercase();
    let mut key = prefix_for(product_id);
    for group in 0..GROUP_COUNT {
        key.push(DELIMITER);
        key.push_str(&hex[group * GROUP_WIDTH..(group + 1) * GROUP_WIDTH]);
    }
    key
}

/// Derives the readable key prefix from a product id.
#[must_use]
pub fn prefix_for(product_id: &str) -> String {
    let prefix: String = product_id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .take(PREFIX_MAX_LEN)
        .collect();
    if prefix.is_empty() {
        FALLBACK_PREFIX.to_string()
    } else {
        prefix
    }
}
