//! File-level operations behind the `autosoft-tool` binary.

use anyhow::{Context, Result};
use autosoft_license::{
    IssuedLicense, LicenseKeyGenerator, LicensePipeline, LicenseRequest, LicensingConfig,
    MemoryStore, RequestedLicenseType,
};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Loads configuration, applying key/IV overrides on top of the file.
///
/// Without a file, the overrides must supply the whole key material.
pub fn load_config(
    path: Option<&Path>,
    aes_key: Option<&str>,
    aes_iv: Option<&str>,
) -> Result<LicensingConfig> {
    let mut config = match path {
        Some(path) => LicensingConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => LicensingConfig::default(),
    };
    if let Some(key) = aes_key {
        config.crypto.aes_key = key.to_string();
    }
    if let Some(iv) = aes_iv {
        config.crypto.aes_iv = iv.to_string();
    }
    Ok(config)
}

/// Builds a pipeline backed by an empty in-memory store.
pub fn build_pipeline(config: &LicensingConfig) -> Result<LicensePipeline> {
    LicensePipeline::from_config(config, Arc::new(MemoryStore::new()))
        .context("Failed to initialize license pipeline")
}

/// Generates a license key without consulting any store.
pub fn keygen(
    config: &LicensingConfig,
    company: &str,
    product: &str,
    seed: Option<u64>,
) -> Result<String> {
    let generator = LicenseKeyGenerator::new(config.key_generation.max_attempts);
    Ok(generator.generate(company, product, seed)?)
}

/// Fields for a new `.ARL` request.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub company: String,
    pub product: String,
    pub dealer: String,
    pub currency: Option<String>,
    pub license_key: Option<String>,
    pub license_type: RequestedLicenseType,
    pub months: u32,
}

/// Validates and writes a request file.
pub fn write_request(
    fields: &NewRequest,
    request_date_utc: DateTime<Utc>,
    out: &Path,
) -> Result<LicenseRequest> {
    let request = LicenseRequest {
        company_name: fields.company.clone(),
        product_id: fields.product.clone(),
        dealer_code: fields.dealer.clone(),
        currency_code: fields.currency.clone(),
        request_date_utc,
        license_key: fields.license_key.clone().unwrap_or_default(),
        license_type: fields.license_type,
        requested_period_months: fields.months,
    };
    request.validate()?;

    fs::write(out, request.to_arl_json()?)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    info!("Wrote license request to {:?}", out);
    Ok(request)
}

/// Issues a license for the request at `request_path` and writes the artifact.
pub fn issue(
    pipeline: &LicensePipeline,
    request_path: &Path,
    valid_from_utc: DateTime<Utc>,
    module_codes: &[String],
    out: &Path,
) -> Result<IssuedLicense> {
    let text = fs::read_to_string(request_path)
        .with_context(|| format!("Failed to read {}", request_path.display()))?;
    let request = LicenseRequest::parse_arl(&text)?;

    let issued = pipeline.issue_from_request(&request, valid_from_utc, module_codes.iter().cloned())?;
    fs::write(out, &issued.artifact)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    info!("Wrote license {} to {:?}", issued.record.license_key, out);
    Ok(issued)
}

/// Imports the artifact at `path` and returns its record as canonical JSON.
pub fn inspect(pipeline: &LicensePipeline, path: &Path) -> Result<String> {
    let artifact = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let record = pipeline.import_artifact(artifact.trim())?;
    Ok(pipeline.preview_json(&record))
}
