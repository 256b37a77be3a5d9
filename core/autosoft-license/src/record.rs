//! The decrypted license payload carried inside an `.ASL` artifact.
//!
//! Field names are PascalCase on the wire (`CompanyName`, `ProductID`, ...)
//! and enumerations serialize by name, never by ordinal, so adding a variant
//! cannot shift the meaning of previously issued artifacts.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Name of the embedded checksum member.
pub const CHECKSUM_FIELD: &str = "ChecksumSHA256";

/// The kind of license being issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseType {
    /// Time-limited evaluation. Dependent features are hidden on expiry.
    Demo,
    /// Paid, time-limited license. Also accepted as "Paid".
    #[serde(alias = "Paid")]
    Subscription,
    /// Paid license with a far-future expiry.
    Permanent,
}

impl LicenseType {
    /// Returns the canonical wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demo => "Demo",
            Self::Subscription => "Subscription",
            Self::Permanent => "Permanent",
        }
    }

    /// Parses a wire name, accepting "Paid" for [`LicenseType::Subscription`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Demo" => Some(Self::Demo),
            "Subscription" | "Paid" => Some(Self::Subscription),
            "Permanent" => Some(Self::Permanent),
            _ => None,
        }
    }

    /// Returns true for the evaluation license type.
    #[must_use]
    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo)
    }
}

impl std::fmt::Display for LicenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a stored license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseStatus {
    Valid,
    Expired,
    Invalid,
}

impl LicenseStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::Expired => "Expired",
            Self::Invalid => "Invalid",
        }
    }
}

/// License data as carried in the encrypted payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LicenseRecord {
    pub company_name: String,
    #[serde(rename = "ProductID")]
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    pub license_type: LicenseType,
    #[serde(with = "utc_seconds")]
    pub valid_from_utc: DateTime<Utc>,
    #[serde(with = "utc_seconds")]
    pub valid_to_utc: DateTime<Utc>,
    pub license_key: String,
    #[serde(default)]
    pub module_codes: Vec<String>,
    #[serde(rename = "ChecksumSHA256", default, skip_serializing_if = "Option::is_none")]
    pub checksum_sha256: Option<String>,
}

impl LicenseRecord {
    /// Creates a record with no dealer, currency, modules or checksum.
    pub fn new(
        company_name: impl Into<String>,
        product_id: impl Into<String>,
        license_type: LicenseType,
        valid_from_utc: DateTime<Utc>,
        valid_to_utc: DateTime<Utc>,
        license_key: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            product_id: product_id.into(),
            dealer_code: None,
            currency_code: None,
            license_type,
            valid_from_utc,
            valid_to_utc,
            license_key: license_key.into(),
            module_codes: Vec::new(),
            checksum_sha256: None,
        }
    }

    #[must_use]
    pub fn with_dealer_code(mut self, dealer_code: impl Into<String>) -> Self {
        self.dealer_code = Some(dealer_code.into());
        self
    }

    #[must_use]
    pub fn with_currency_code(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = Some(currency_code.into());
        self
    }

    #[must_use]
    pub fn with_modules<I, S>(mut self, module_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_codes = module_codes.into_iter().map(Into::into).collect();
        self
    }

    /// Returns a copy with the checksum field cleared.
    #[must_use]
    pub fn without_checksum(&self) -> Self {
        Self {
            checksum_sha256: None,
            ..self.clone()
        }
    }

    /// Brings the record into the exact form that is serialized.
    ///
    /// Module codes form a set, so they are sorted and de-duplicated.
    /// Timestamps are truncated to whole seconds, matching the wire format.
    pub fn normalize(&mut self) {
        self.module_codes.sort();
        self.module_codes.dedup();
        self.valid_from_utc = self.valid_from_utc.trunc_subsecs(0);
        self.valid_to_utc = self.valid_to_utc.trunc_subsecs(0);
    }
}

/// Serde adapter writing UTC instants as `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Fractional seconds are never written. On input any RFC 3339 offset is
/// converted to UTC, and a value without an offset is read as UTC.
pub mod utc_seconds {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid UTC timestamp: {raw}")))
    }

    /// Parses a timestamp in any of the accepted input forms.
    #[must_use]
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
