//! Licensing configuration, read from TOML.
//!
//! ```toml
//! [crypto]
//! aes_key = "Zkfwt0M/OOZcMAb5qSLjOKKw6LeqIm9/PYtuZlRpBdw="
//! aes_iv = "Fvwy7WRbrjUaNmk6QGZsAg=="
//!
//! [feature_toggles]
//! store_raw_files = true
//!
//! [key_generation]
//! max_attempts = 5
//! ```

use crate::error::{LicenseError, LicenseResult};
use crate::keygen::DEFAULT_MAX_ATTEMPTS;
use autosoft_crypto::CipherMaterial;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Base64 key material for the artifact cipher.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CryptoSettings {
    #[serde(default)]
    pub aes_key: String,
    #[serde(default)]
    pub aes_iv: String,
}

impl CryptoSettings {
    /// Decodes the settings, failing fast on missing values or wrong lengths.
    pub fn material(&self) -> LicenseResult<CipherMaterial> {
        Ok(CipherMaterial::from_base64(&self.aes_key, &self.aes_iv)?)
    }
}

impl std::fmt::Debug for CryptoSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoSettings")
            .field("aes_key", &"[REDACTED]")
            .field("aes_iv", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureToggles {
    /// Keep the raw Base64 artifact alongside activated licenses.
    #[serde(default = "default_store_raw_files")]
    pub store_raw_files: bool,
}

fn default_store_raw_files() -> bool {
    true
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            store_raw_files: default_store_raw_files(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyGenerationSettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for KeyGenerationSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

/// Top-level licensing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicensingConfig {
    #[serde(default)]
    pub crypto: CryptoSettings,
    #[serde(default)]
    pub feature_toggles: FeatureToggles,
    #[serde(default)]
    pub key_generation: KeyGenerationSettings,
}

impl LicensingConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(text: &str) -> LicenseResult<Self> {
        toml::from_str(text).map_err(|e| LicenseError::Config(e.to_string()))
    }

    /// Reads configuration from a TOML file.
    pub fn load(path: &Path) -> LicenseResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LicenseError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded licensing configuration from {:?}", path);
        Ok(config)
    }
}
