//! License requests (`.ARL` files).
//!
//! A request is UTF-8 JSON written by the customer-side plugin. Any module
//! codes it carries are ignored: modules are chosen by the issuer, never by
//! the requester.

use crate::error::{LicenseError, LicenseResult};
use crate::record::{utc_seconds, LicenseRecord, LicenseType};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

/// Smallest accepted requested period, in months.
pub const MIN_PERIOD_MONTHS: u32 = 1;

/// Largest accepted requested period, in months (100 years).
pub const MAX_PERIOD_MONTHS: u32 = 1200;

/// License type as named in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestedLicenseType {
    Demo,
    Paid,
}

impl RequestedLicenseType {
    /// Returns the license type issued for this request type.
    #[must_use]
    pub fn issued_type(&self) -> LicenseType {
        match self {
            Self::Demo => LicenseType::Demo,
            Self::Paid => LicenseType::Subscription,
        }
    }
}

/// A validated license request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LicenseRequest {
    pub company_name: String,
    #[serde(rename = "ProductID")]
    pub product_id: String,
    pub dealer_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(with = "utc_seconds")]
    pub request_date_utc: DateTime<Utc>,
    /// Nominal key supplied by the requester. May be blank.
    pub license_key: String,
    pub license_type: RequestedLicenseType,
    #[serde(alias = "RequestedPeriod")]
    pub requested_period_months: u32,
}

impl LicenseRequest {
    /// Parses and validates `.ARL` JSON text.
    ///
    /// # Errors
    ///
    /// Every parse or validation failure is [`LicenseError::InvalidRequest`].
    pub fn parse_arl(json: &str) -> LicenseResult<Self> {
        let json = json.strip_prefix('\u{feff}').unwrap_or(json);
        let request: Self =
            serde_json::from_str(json).map_err(|_| LicenseError::InvalidRequest)?;
        request.validate()?;
        Ok(request)
    }

    /// Parses a Base64-wrapped `.ARL` payload.
    pub fn parse_arl_base64(encoded: &str) -> LicenseResult<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| LicenseError::InvalidRequest)?;
        let json = String::from_utf8(bytes).map_err(|_| LicenseError::InvalidRequest)?;
        Self::parse_arl(&json)
    }

    /// Checks required fields and the requested period range.
    pub fn validate(&self) -> LicenseResult<()> {
        let required = [
            self.company_name.as_str(),
            self.product_id.as_str(),
            self.dealer_code.as_str(),
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(LicenseError::InvalidRequest);
        }
        if !(MIN_PERIOD_MONTHS..=MAX_PERIOD_MONTHS).contains(&self.requested_period_months) {
            return Err(LicenseError::InvalidRequest);
        }
        Ok(())
    }

    /// Serializes the request as indented `.ARL` JSON.
    pub fn to_arl_json(&self) -> LicenseResult<String> {
        serde_json::to_string_pretty(self).map_err(|_| LicenseError::InvalidRequest)
    }

    /// Builds the license record this request asks for.
    ///
    /// The validity window starts at `valid_from_utc` and spans the requested
    /// number of calendar months.
    pub fn to_record<I, S>(
        &self,
        valid_from_utc: DateTime<Utc>,
        module_codes: I,
    ) -> LicenseResult<LicenseRecord>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validate()?;
        let valid_to_utc = valid_from_utc
            .checked_add_months(Months::new(self.requested_period_months))
            .ok_or(LicenseError::InvalidRequest)?;

        let mut record = LicenseRecord::new(
            self.company_name.trim(),
            self.product_id.trim(),
            self.license_type.issued_type(),
            valid_from_utc,
            valid_to_utc,
            self.license_key.trim(),
        )
        .with_dealer_code(self.dealer_code.trim())
        .with_modules(module_codes);
        record.currency_code = self.currency_code.clone();
        Ok(record)
    }
}
